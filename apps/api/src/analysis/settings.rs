//! Engine configuration — heading vocabulary, phrase dictionary, role
//! taxonomy, scoring weights, and caps. Loaded once at startup into an
//! immutable `Arc<EngineConfig>`; nothing mutates it afterwards, so no
//! synchronization is needed anywhere in the pipeline.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::sections::Section;
use crate::analysis::taxonomy::{RoleCategory, RoleSpec, RoleTaxonomy};

/// Heading vocabulary entry: the section a heading opens plus the synonyms
/// that open it. Externally overridable so new synonyms can be added
/// without touching scoring logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingRule {
    pub section: Section,
    pub synonyms: Vec<String>,
}

/// Fixed weights combining the four sub-scores into `overall`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub ats: f64,
    pub keyword: f64,
    pub section: f64,
    pub format: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        // Documented policy: ats 40%, keyword 30%, section 20%, format 10%.
        Self {
            ats: 0.40,
            keyword: 0.30,
            section: 0.20,
            format: 0.10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upload ceiling, checked before any parsing. 10 MiB.
    pub max_document_bytes: usize,
    /// Lines longer than this suggest tables or multi-column layouts.
    pub long_line_threshold: usize,
    pub max_suggestions_per_category: usize,
    /// How many missing keywords a skills suggestion lists.
    pub missing_keyword_display_limit: usize,
    pub weights: ScoreWeights,
    pub headings: Vec<HeadingRule>,
    /// Known multi-word skill phrases, re-joined before keyword matching.
    pub phrases: Vec<String>,
    pub taxonomy: RoleTaxonomy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_document_bytes: 10 * 1024 * 1024,
            long_line_threshold: 120,
            max_suggestions_per_category: 5,
            missing_keyword_display_limit: 5,
            weights: ScoreWeights::default(),
            headings: default_headings(),
            phrases: default_phrases(),
            taxonomy: default_taxonomy(),
        }
    }
}

impl EngineConfig {
    /// Loads the config from a JSON file when a path is given, else the
    /// compiled-in defaults. Called once in `main`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading engine config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing engine config {}", path.display()))
            }
            None => Ok(EngineConfig::default()),
        }
    }
}

fn rule(section: Section, synonyms: &[&str]) -> HeadingRule {
    HeadingRule {
        section,
        synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
    }
}

fn default_headings() -> Vec<HeadingRule> {
    vec![
        rule(
            Section::Contact,
            &["contact", "contact information", "contact details"],
        ),
        rule(
            Section::Summary,
            &[
                "summary",
                "professional summary",
                "objective",
                "career objective",
                "profile",
                "about me",
            ],
        ),
        rule(
            Section::Skills,
            &[
                "skills",
                "technical skills",
                "core skills",
                "technologies",
                "core competencies",
                "tools",
            ],
        ),
        rule(
            Section::Experience,
            &[
                "experience",
                "work experience",
                "professional experience",
                "employment history",
                "work history",
                "employment",
            ],
        ),
        rule(
            Section::Education,
            &[
                "education",
                "academic background",
                "academics",
                "qualifications",
                "certifications",
            ],
        ),
    ]
}

fn default_phrases() -> Vec<String> {
    [
        "machine learning",
        "deep learning",
        "data analysis",
        "data engineering",
        "power bi",
        "project management",
        "version control",
        "unit testing",
        "rest api",
        "spring boot",
        "react native",
        "natural language processing",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

fn role(name: &str, description: &str, skills: &[&str]) -> RoleSpec {
    RoleSpec {
        name: name.to_string(),
        description: description.to_string(),
        required_skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}

fn default_taxonomy() -> RoleTaxonomy {
    RoleTaxonomy {
        categories: vec![
            RoleCategory {
                name: "Software Development".to_string(),
                roles: vec![
                    role(
                        "Frontend Developer",
                        "Develops user-facing web applications",
                        &["JavaScript", "React", "HTML", "CSS", "TypeScript", "Vue.js", "Angular"],
                    ),
                    role(
                        "Backend Developer",
                        "Develops server-side applications and APIs",
                        &["Node.js", "Python", "Java", "C#", "SQL", "MongoDB", "Express.js"],
                    ),
                    role(
                        "Full Stack Developer",
                        "Develops both frontend and backend applications",
                        &["JavaScript", "React", "Node.js", "Python", "SQL", "MongoDB", "Express.js"],
                    ),
                ],
            },
            RoleCategory {
                name: "Data Science".to_string(),
                roles: vec![
                    role(
                        "Data Scientist",
                        "Analyzes data to extract insights and build models",
                        &["Python", "R", "SQL", "Machine Learning", "Statistics", "Pandas", "NumPy"],
                    ),
                    role(
                        "Data Analyst",
                        "Analyzes data to provide business insights",
                        &["SQL", "Excel", "Python", "Tableau", "Power BI", "Statistics"],
                    ),
                ],
            },
            RoleCategory {
                name: "DevOps".to_string(),
                roles: vec![role(
                    "DevOps Engineer",
                    "Manages infrastructure and deployment processes",
                    &["Docker", "Kubernetes", "AWS", "Linux", "CI/CD", "Jenkins", "Terraform"],
                )],
            },
        ],
    }
}
