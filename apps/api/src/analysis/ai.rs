//! AI analysis merger — sends the extracted resume and role context to the
//! narrative provider and normalizes the free-form critique into the same
//! result shape as standard analysis. The provider is a black box: the
//! parser is tolerant, and an unparseable narrative still lands intact in
//! `full_response` rather than failing the analysis.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::analysis::error::AnalysisError;
use crate::analysis::extract::NormalizedText;
use crate::analysis::prompts::{AI_ANALYSIS_PROMPT_TEMPLATE, AI_ANALYSIS_SYSTEM};
use crate::analysis::taxonomy::JobProfile;
use crate::llm_client::LlmClient;

/// Structured view of the provider's critique plus the raw narrative.
/// Present on a result only when AI mode was requested and the call
/// succeeded; absence is a first-class state, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub full_response: String,
}

/// Wraps the LLM client with the caller-imposed timeout. The one pipeline
/// stage permitted to fail independently of the rest.
pub struct AiMerger {
    llm: LlmClient,
    timeout: Duration,
}

impl AiMerger {
    pub fn new(llm: LlmClient, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    pub async fn generate(
        &self,
        text: &NormalizedText,
        profile: &JobProfile,
        job_description: Option<&str>,
    ) -> Result<AiAnalysis, AnalysisError> {
        let prompt = build_prompt(text, profile, job_description);

        let response = tokio::time::timeout(self.timeout, self.llm.call(&prompt, AI_ANALYSIS_SYSTEM))
            .await
            .map_err(|_| {
                AnalysisError::AiProviderUnavailable(format!(
                    "provider call exceeded {}s timeout",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| AnalysisError::AiProviderUnavailable(e.to_string()))?;

        let narrative = response
            .text()
            .ok_or_else(|| {
                AnalysisError::AiProviderUnavailable("provider returned no text content".into())
            })?
            .to_string();

        debug!(chars = narrative.len(), "AI narrative received");
        Ok(parse_narrative(&narrative))
    }
}

fn build_prompt(
    text: &NormalizedText,
    profile: &JobProfile,
    job_description: Option<&str>,
) -> String {
    AI_ANALYSIS_PROMPT_TEMPLATE
        .replace("{job_role}", &profile.role)
        .replace("{job_category}", &profile.category)
        .replace("{resume_text}", &text.joined())
        .replace(
            "{job_description}",
            &job_description
                .map(|jd| format!("Job description:\n{jd}"))
                .unwrap_or_default(),
        )
}

#[derive(Clone, Copy, PartialEq)]
enum NarrativeSection {
    Strengths,
    Weaknesses,
    Recommendations,
    Other,
}

/// Best-effort split of the narrative into strengths, weaknesses, and
/// recommendations. Falls back to empty lists (narrative preserved whole)
/// when the expected section markers are not found — never an error.
pub fn parse_narrative(narrative: &str) -> AiAnalysis {
    let mut current = NarrativeSection::Other;
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut recommendations = Vec::new();

    for line in narrative.lines() {
        let trimmed = line.trim();
        if let Some(section) = detect_narrative_heading(trimmed) {
            current = section;
            continue;
        }
        if let Some(item) = bullet_text(trimmed) {
            match current {
                NarrativeSection::Strengths => strengths.push(item),
                NarrativeSection::Weaknesses => weaknesses.push(item),
                NarrativeSection::Recommendations => recommendations.push(item),
                NarrativeSection::Other => {}
            }
        }
    }

    AiAnalysis {
        strengths,
        weaknesses,
        recommendations,
        full_response: narrative.to_string(),
    }
}

fn detect_narrative_heading(line: &str) -> Option<NarrativeSection> {
    if bullet_text(line).is_some() {
        return None;
    }
    let heading = line.trim_start_matches('#').trim();
    // Only treat short header-ish lines as section markers.
    if heading.len() > 60 || heading.is_empty() {
        return None;
    }
    let lower = heading.to_lowercase();
    let lower = lower
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')' || c == ' ')
        .trim_end_matches(':');

    if lower.contains("strength") {
        Some(NarrativeSection::Strengths)
    } else if lower.contains("weakness") || lower.contains("areas for improvement") {
        Some(NarrativeSection::Weaknesses)
    } else if lower.contains("recommendation") {
        Some(NarrativeSection::Recommendations)
    } else if line.starts_with('#') {
        Some(NarrativeSection::Other)
    } else {
        None
    }
}

fn bullet_text(line: &str) -> Option<String> {
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            let rest = rest.trim();
            if !rest.is_empty() {
                return Some(rest.to_string());
            }
        }
    }
    None
}
