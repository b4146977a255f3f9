// Prompt constants for the AI analysis merger.

/// System prompt for the narrative critique.
pub const AI_ANALYSIS_SYSTEM: &str =
    "You are an expert resume reviewer and recruiting consultant. \
    Critique resumes against a target role honestly and concretely. \
    Structure your response with ## section headers and use bullet points \
    (lines starting with '-') inside the Strengths, Areas for Improvement, \
    and Recommendations sections.";

/// Narrative prompt template. Replace `{job_role}`, `{job_category}`,
/// `{resume_text}`, and `{job_description}` before sending.
pub const AI_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this resume for a {job_role} position in {job_category}.

Resume:
{resume_text}

{job_description}

Provide a comprehensive analysis including:
1. Overall assessment (1-2 paragraphs)
2. Skills analysis and match with the role's requirements
3. Experience analysis
4. Education analysis
5. Key strengths (bullet points)
6. Areas for improvement (bullet points)
7. ATS optimization assessment
8. Specific recommendations for improvement (bullet points)

Format your response with clear sections using ## headers."#;
