//! Role taxonomy and job profiles — the target-role descriptors that drive
//! keyword matching. Profiles come from the static taxonomy or are derived
//! lexically from a free-text job description.

use serde::{Deserialize, Serialize};

use crate::analysis::error::AnalysisError;
use crate::analysis::keywords::{normalize_keyword, tokenize};

/// Target-role descriptor: role name, category, and the ordered,
/// case-insensitively deduplicated required keywords.
#[derive(Debug, Clone, Serialize)]
pub struct JobProfile {
    pub role: String,
    pub category: String,
    pub keywords: Vec<String>,
}

impl JobProfile {
    pub fn new(role: &str, category: &str, keywords: &[&str]) -> Self {
        Self::with_keywords(
            role.to_string(),
            category.to_string(),
            keywords.iter().map(|k| k.to_string()).collect(),
        )
    }

    /// Builds a profile, deduplicating keywords case-insensitively while
    /// preserving first-seen order and casing.
    pub fn with_keywords(role: String, category: String, keywords: Vec<String>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let keywords = keywords
            .into_iter()
            .filter(|k| !k.trim().is_empty())
            .filter(|k| seen.insert(normalize_keyword(k)))
            .collect();
        JobProfile {
            role,
            category,
            keywords,
        }
    }
}

/// One role within a taxonomy category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleSpec {
    pub name: String,
    pub description: String,
    pub required_skills: Vec<String>,
}

/// One taxonomy category and its roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCategory {
    pub name: String,
    pub roles: Vec<RoleSpec>,
}

/// The static role taxonomy, loaded once at startup and shared read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleTaxonomy {
    pub categories: Vec<RoleCategory>,
}

impl RoleTaxonomy {
    /// Resolves a role/category pair (case-insensitive) into a profile.
    pub fn resolve(&self, category: &str, role: &str) -> Option<JobProfile> {
        let cat = self
            .categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(category))?;
        let spec = cat
            .roles
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(role))?;
        Some(JobProfile::with_keywords(
            spec.name.clone(),
            cat.name.clone(),
            spec.required_skills.clone(),
        ))
    }

    /// Every known skill keyword across the taxonomy, normalized. Used as
    /// the vocabulary for free-text job-description derivation.
    pub fn skill_vocabulary(&self) -> Vec<(String, String)> {
        let mut seen = std::collections::HashSet::new();
        let mut vocabulary = Vec::new();
        for category in &self.categories {
            for role in &category.roles {
                for skill in &role.required_skills {
                    let normalized = normalize_keyword(skill);
                    if seen.insert(normalized.clone()) {
                        vocabulary.push((normalized, skill.clone()));
                    }
                }
            }
        }
        vocabulary
    }
}

/// Derives a profile from a free-text job description: the description is
/// tokenized and every known skill (taxonomy vocabulary plus phrase
/// dictionary) found in it becomes a required keyword, in stable
/// vocabulary order. No extractable keywords is a valid outcome — the
/// keyword sub-score then falls back to neutral rather than penalizing
/// the caller.
pub fn profile_from_description(
    role: &str,
    category: &str,
    description: &str,
    taxonomy: &RoleTaxonomy,
    phrase_dictionary: &[String],
) -> JobProfile {
    let vocabulary = taxonomy.skill_vocabulary();
    let tokens = tokenize(description);
    let token_text = tokens.join(" ");

    let mut keywords = Vec::new();
    for (normalized, original) in &vocabulary {
        let found = if normalized.contains(' ') {
            contains_phrase(&token_text, normalized)
        } else {
            tokens.iter().any(|t| t == normalized)
        };
        if found {
            keywords.push(original.clone());
        }
    }
    for phrase in phrase_dictionary {
        let normalized = normalize_keyword(phrase);
        if contains_phrase(&token_text, &normalized)
            && !keywords.iter().any(|k| normalize_keyword(k) == normalized)
        {
            keywords.push(phrase.clone());
        }
    }

    JobProfile::with_keywords(role.to_string(), category.to_string(), keywords)
}

/// Whole-token phrase containment over a space-joined token stream.
fn contains_phrase(token_text: &str, phrase: &str) -> bool {
    token_text
        .split(' ')
        .collect::<Vec<_>>()
        .windows(phrase.split(' ').count())
        .any(|w| w.join(" ") == phrase)
}

/// Resolves the request's profile selector: taxonomy role/category when
/// both resolve, else a supplied free-text job description, else
/// `InvalidJobProfile`.
pub fn resolve_profile(
    taxonomy: &RoleTaxonomy,
    phrase_dictionary: &[String],
    role: &str,
    category: &str,
    job_description: Option<&str>,
) -> Result<JobProfile, AnalysisError> {
    if let Some(profile) = taxonomy.resolve(category, role) {
        return Ok(profile);
    }
    match job_description.map(str::trim).filter(|d| !d.is_empty()) {
        Some(description) => Ok(profile_from_description(
            role,
            category,
            description,
            taxonomy,
            phrase_dictionary,
        )),
        None => Err(AnalysisError::InvalidJobProfile(format!(
            "unknown role '{role}' in category '{category}' and no job description supplied"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::settings::EngineConfig;

    fn taxonomy() -> RoleTaxonomy {
        EngineConfig::default().taxonomy
    }

    #[test]
    fn test_resolve_known_role_case_insensitive() {
        let profile = taxonomy()
            .resolve("software development", "frontend developer")
            .expect("role should resolve");
        assert_eq!(profile.role, "Frontend Developer");
        assert!(profile.keywords.iter().any(|k| k == "React"));
    }

    #[test]
    fn test_resolve_unknown_role_is_none() {
        assert!(taxonomy().resolve("Software Development", "Blacksmith").is_none());
    }

    #[test]
    fn test_profile_keywords_deduplicated_case_insensitive() {
        let profile = JobProfile::with_keywords(
            "r".into(),
            "c".into(),
            vec!["React".into(), "react".into(), "SQL".into()],
        );
        assert_eq!(profile.keywords, vec!["React", "SQL"]);
    }

    #[test]
    fn test_description_derivation_finds_known_skills() {
        let cfg = EngineConfig::default();
        let profile = profile_from_description(
            "Custom Role",
            "Custom",
            "We need strong Python and SQL plus Machine Learning chops.",
            &cfg.taxonomy,
            &cfg.phrases,
        );
        assert!(profile.keywords.iter().any(|k| k == "Python"));
        assert!(profile.keywords.iter().any(|k| k == "SQL"));
        assert!(profile.keywords.iter().any(|k| k == "Machine Learning"));
    }

    #[test]
    fn test_description_with_no_known_skills_yields_empty_profile() {
        let cfg = EngineConfig::default();
        let profile = profile_from_description(
            "Custom Role",
            "Custom",
            "We want friendly people who enjoy teamwork.",
            &cfg.taxonomy,
            &cfg.phrases,
        );
        assert!(profile.keywords.is_empty());
    }

    #[test]
    fn test_resolve_profile_falls_back_to_description() {
        let cfg = EngineConfig::default();
        let profile = resolve_profile(
            &cfg.taxonomy,
            &cfg.phrases,
            "Platform Engineer",
            "Infrastructure",
            Some("Kubernetes and Docker on AWS"),
        )
        .expect("description fallback should succeed");
        assert_eq!(profile.role, "Platform Engineer");
        assert!(profile.keywords.iter().any(|k| k == "Kubernetes"));
    }

    #[test]
    fn test_resolve_profile_errors_without_description() {
        let cfg = EngineConfig::default();
        let err = resolve_profile(&cfg.taxonomy, &cfg.phrases, "Nobody", "Nowhere", None)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidJobProfile(_)));
    }
}
