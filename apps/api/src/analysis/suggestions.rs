//! Suggestion rule engine — a fixed-priority rule list per category,
//! evaluated as pure predicates over the classified document, the scores,
//! and the keyword match. Output is deduplicated, capped, and stable
//! across runs for identical input. No rule inspects the AI narrative.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::keywords::KeywordMatchResult;
use crate::analysis::scoring::FormatSignals;
use crate::analysis::sections::{Section, SectionMap};
use crate::analysis::settings::EngineConfig;

/// Suggestion category. Mirrors the sections plus a cross-cutting `format`
/// bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Contact,
    Summary,
    Skills,
    Experience,
    Education,
    Format,
}

/// Ordered suggestions per category. Empty categories are never inserted,
/// so serialization omits them rather than emitting empty lists.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuggestionSet(pub BTreeMap<SuggestionCategory, Vec<String>>);

impl SuggestionSet {
    pub fn get(&self, category: SuggestionCategory) -> &[String] {
        self.0.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Keeps the highest-priority entries: dedup first, then cap.
    fn insert_capped(&mut self, category: SuggestionCategory, rules: Vec<String>, cap: usize) {
        let mut seen = std::collections::HashSet::new();
        let list: Vec<String> = rules
            .into_iter()
            .filter(|s| seen.insert(s.clone()))
            .take(cap)
            .collect();
        if !list.is_empty() {
            self.0.insert(category, list);
        }
    }
}

/// Evaluates the rule set. Rules within a category appear in priority
/// order; the per-category cap keeps the highest-priority matches first.
pub fn build_suggestions(
    sections: &SectionMap,
    matches: &KeywordMatchResult,
    signals: &FormatSignals,
    config: &EngineConfig,
) -> SuggestionSet {
    let cap = config.max_suggestions_per_category;
    let mut set = SuggestionSet::default();

    let mut contact = Vec::new();
    if signals.contact.email.is_none() {
        contact.push("Add your email address".to_string());
    }
    if signals.contact.phone.is_none() {
        contact.push("Add your phone number".to_string());
    }
    if signals.contact.linkedin.is_none() {
        contact.push("Add your LinkedIn profile".to_string());
    }
    set.insert_capped(SuggestionCategory::Contact, contact, cap);

    let mut summary = Vec::new();
    if !sections.is_present(Section::Summary) {
        summary.push("Add a professional summary section".to_string());
    } else if summary_line_count(sections) < 2 {
        summary.push(
            "Expand your summary to two or three lines highlighting your strongest results"
                .to_string(),
        );
    }
    set.insert_capped(SuggestionCategory::Summary, summary, cap);

    let mut skills = Vec::new();
    if !sections.is_present(Section::Skills) {
        skills.push("Add a dedicated skills section".to_string());
    }
    if !matches.missing.is_empty() {
        let shown: Vec<&str> = matches
            .missing
            .iter()
            .take(config.missing_keyword_display_limit)
            .map(String::as_str)
            .collect();
        skills.push(format!("Consider adding these skills: {}", shown.join(", ")));
    }
    set.insert_capped(SuggestionCategory::Skills, skills, cap);

    let mut experience = Vec::new();
    if !sections.is_present(Section::Experience) {
        experience.push("Add a work experience section".to_string());
    } else {
        if signals.bullet_lines_in_experience == 0 {
            experience.push(
                "Use bullet points to describe your responsibilities and results".to_string(),
            );
        }
        if signals.digit_lines_in_experience == 0 {
            experience.push(
                "Quantify your achievements with numbers, percentages, or timeframes".to_string(),
            );
        }
    }
    set.insert_capped(SuggestionCategory::Experience, experience, cap);

    let mut education = Vec::new();
    if !sections.is_present(Section::Education) {
        education.push("Add an education section".to_string());
    }
    set.insert_capped(SuggestionCategory::Education, education, cap);

    let mut format = Vec::new();
    if signals.long_lines >= 3 {
        format.push(
            "Avoid tables and multi-column layouts; they often break automated resume parsers"
                .to_string(),
        );
    }
    if signals.control_char_anomalies {
        format.push("Remove unusual characters or encodings from the document".to_string());
    }
    if signals.total_chars < 500 {
        format.push("Add more detail; very short resumes score poorly with screeners".to_string());
    }
    set.insert_capped(SuggestionCategory::Format, format, cap);

    set
}

fn summary_line_count(sections: &SectionMap) -> usize {
    sections
        .ranges(Section::Summary)
        .iter()
        .map(|r| r.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract::NormalizedText;
    use crate::analysis::keywords::match_keywords;
    use crate::analysis::scoring::FormatSignals;
    use crate::analysis::sections::{classify_sections, extract_contact};
    use crate::analysis::taxonomy::JobProfile;

    fn suggestions(text: &str, keywords: &[&str]) -> SuggestionSet {
        let config = EngineConfig::default();
        let normalized = NormalizedText::from_plain(text);
        let sections = classify_sections(&normalized, &config.headings);
        let profile = JobProfile::new("Backend Developer", "Software Development", keywords);
        let matches = match_keywords(&normalized.joined(), &profile, &config.phrases);
        let contact = extract_contact(&normalized);
        let signals =
            FormatSignals::collect(&normalized, &sections, contact, config.long_line_threshold);
        build_suggestions(&sections, &matches, &signals, &config)
    }

    #[test]
    fn test_unstructured_document_suggests_every_missing_section() {
        let set = suggestions("plain prose with no headings at all", &[]);
        assert!(set
            .get(SuggestionCategory::Summary)
            .iter()
            .any(|s| s.contains("summary")));
        assert!(set
            .get(SuggestionCategory::Skills)
            .iter()
            .any(|s| s.contains("skills section")));
        assert!(set
            .get(SuggestionCategory::Experience)
            .iter()
            .any(|s| s.contains("experience")));
        assert!(set
            .get(SuggestionCategory::Education)
            .iter()
            .any(|s| s.contains("education")));
        assert!(set
            .get(SuggestionCategory::Contact)
            .iter()
            .any(|s| s.contains("email")));
    }

    #[test]
    fn test_missing_keywords_listed_in_skills_suggestion() {
        let set = suggestions("Skills\nJavaScript", &["react", "node.js"]);
        let skills = set.get(SuggestionCategory::Skills);
        assert!(skills.iter().any(|s| s.contains("react") && s.contains("node.js")));
    }

    #[test]
    fn test_missing_keyword_list_is_truncated() {
        let keywords = ["a1", "b2", "c3", "d4", "e5", "f6", "g7"];
        let set = suggestions("Skills\nnothing relevant", &keywords);
        let line = set
            .get(SuggestionCategory::Skills)
            .iter()
            .find(|s| s.starts_with("Consider adding"))
            .expect("missing-skills suggestion");
        assert!(line.contains("e5"));
        assert!(!line.contains("f6"));
    }

    #[test]
    fn test_no_bullets_in_experience_triggers_rule() {
        let set = suggestions("Experience\nWrote software for 3 years at Initech", &[]);
        assert!(set
            .get(SuggestionCategory::Experience)
            .iter()
            .any(|s| s.contains("bullet points")));
    }

    #[test]
    fn test_unquantified_experience_triggers_rule() {
        let set = suggestions("Experience\n- Maintained internal services", &[]);
        assert!(set
            .get(SuggestionCategory::Experience)
            .iter()
            .any(|s| s.contains("Quantify")));
    }

    #[test]
    fn test_complete_category_is_omitted_not_empty() {
        let set = suggestions(
            "jane@example.com\n(555) 123-4567\nlinkedin.com/in/jane\nExperience\n- Shipped 4 services",
            &[],
        );
        assert!(!set.0.contains_key(&SuggestionCategory::Contact));
    }

    #[test]
    fn test_suggestions_deduplicated_and_capped() {
        let config = EngineConfig::default();
        let mut set = SuggestionSet::default();
        set.insert_capped(
            SuggestionCategory::Format,
            vec![
                "a".to_string(),
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string(),
                "e".to_string(),
                "f".to_string(),
            ],
            config.max_suggestions_per_category,
        );
        let list = set.get(SuggestionCategory::Format);
        assert_eq!(list, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_stable_output_across_runs() {
        let text = "Experience\nWorked on things\nSkills\nJavaScript";
        let first = suggestions(text, &["react"]);
        let second = suggestions(text, &["react"]);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
