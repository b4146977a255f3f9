//! Scoring aggregator — combines section presence, formatting signals, and
//! keyword overlap into the four sub-scores and the weighted overall score.
//! Every score here is a pure function of its inputs: identical input
//! produces identical output, which is the invariant separating standard
//! analysis from the AI narrative.

use serde::Serialize;

use crate::analysis::extract::NormalizedText;
use crate::analysis::keywords::KeywordMatchResult;
use crate::analysis::sections::{ContactInfo, Section, SectionMap};
use crate::analysis::settings::EngineConfig;
use crate::analysis::taxonomy::JobProfile;

/// The four sub-scores plus the derived overall, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSet {
    pub ats_score: u8,
    pub format_score: u8,
    pub section_score: u8,
    pub keyword_score: u8,
    pub overall_score: u8,
}

/// Formatting signals gathered in one pass over the normalized text.
#[derive(Debug, Clone)]
pub struct FormatSignals {
    pub total_chars: usize,
    pub long_lines: usize,
    pub bullet_lines_in_experience: usize,
    /// Experience lines carrying at least one digit — a quantified-impact
    /// proxy for the suggestion rules.
    pub digit_lines_in_experience: usize,
    pub control_char_anomalies: bool,
    pub contact: ContactInfo,
}

const BULLET_MARKERS: &[&str] = &["-", "*", "•", "·", "‣"];

fn is_bullet_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    BULLET_MARKERS.iter().any(|m| trimmed.starts_with(m))
}

impl FormatSignals {
    pub fn collect(
        text: &NormalizedText,
        sections: &SectionMap,
        contact: ContactInfo,
        long_line_threshold: usize,
    ) -> Self {
        let total_chars = text.lines.iter().map(|l| l.text.chars().count()).sum();
        let long_lines = text
            .lines
            .iter()
            .filter(|l| l.text.chars().count() > long_line_threshold)
            .count();
        let bullet_lines_in_experience = sections
            .lines(Section::Experience, text)
            .filter(|l| is_bullet_line(l))
            .count();
        let digit_lines_in_experience = sections
            .lines(Section::Experience, text)
            .filter(|l| l.chars().any(|c| c.is_ascii_digit()))
            .count();

        FormatSignals {
            total_chars,
            long_lines,
            bullet_lines_in_experience,
            digit_lines_in_experience,
            control_char_anomalies: text.stripped_control_chars > 0,
            contact,
        }
    }
}

// Format anti-pattern penalties, deducted from a baseline of 100.
const PENALTY_NO_EXPERIENCE_BULLETS: i32 = 15;
const PENALTY_LONG_LINES: i32 = 15;
const PENALTY_MISSING_CONTACT_BLOCK: i32 = 20;
const PENALTY_CONTROL_ANOMALIES: i32 = 10;
/// Long-line count at which the tables/columns penalty kicks in.
const LONG_LINE_TOLERANCE: usize = 3;
/// Documents shorter than this read as thin to automated parsers.
const THIN_DOCUMENT_CHARS: usize = 500;

/// Neutral keyword score when the profile declares no requirements.
pub const NEUTRAL_KEYWORD_SCORE: u8 = 50;

fn clamp_score(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}

/// Percentage of the five tracked sections present and non-empty.
pub fn section_score(sections: &SectionMap) -> u8 {
    let present = Section::TRACKED
        .iter()
        .filter(|s| sections.is_present(**s))
        .count();
    clamp_score((present as i32 * 100) / Section::TRACKED.len() as i32)
}

/// Baseline 100 minus fixed anti-pattern penalties, floored at 0.
pub fn format_score(sections: &SectionMap, signals: &FormatSignals) -> u8 {
    let mut score: i32 = 100;
    if sections.is_present(Section::Experience) && signals.bullet_lines_in_experience == 0 {
        score -= PENALTY_NO_EXPERIENCE_BULLETS;
    }
    if signals.long_lines >= LONG_LINE_TOLERANCE {
        score -= PENALTY_LONG_LINES;
    }
    if !signals.contact.is_complete() {
        score -= PENALTY_MISSING_CONTACT_BLOCK;
    }
    if signals.control_char_anomalies {
        score -= PENALTY_CONTROL_ANOMALIES;
    }
    clamp_score(score)
}

/// Matched over required, rounded; neutral when nothing is required.
pub fn keyword_score(matches: &KeywordMatchResult, profile: &JobProfile) -> u8 {
    if profile.keywords.is_empty() {
        return NEUTRAL_KEYWORD_SCORE;
    }
    let ratio = matches.matched.len() as f64 / profile.keywords.len() as f64;
    clamp_score((ratio * 100.0).round() as i32)
}

// ATS penalties weigh structural outliers heavier than the format score
// does; machine parseability is dominated by anomalies, not averages.
const ATS_PENALTY_LONG_LINES: i32 = 15;
const ATS_PENALTY_CONTROL_ANOMALIES: i32 = 15;
const ATS_PENALTY_NO_EMAIL: i32 = 10;
const ATS_PENALTY_NO_PHONE: i32 = 5;
const ATS_PENALTY_THIN_DOCUMENT: i32 = 10;

/// Composite machine-parseability proxy, computed independently of the
/// plain format/section averages.
pub fn ats_score(format: u8, section: u8, signals: &FormatSignals) -> u8 {
    let mut score = (0.5 * format as f64 + 0.5 * section as f64).round() as i32;
    if signals.long_lines >= LONG_LINE_TOLERANCE {
        score -= ATS_PENALTY_LONG_LINES;
    }
    if signals.control_char_anomalies {
        score -= ATS_PENALTY_CONTROL_ANOMALIES;
    }
    if signals.contact.email.is_none() {
        score -= ATS_PENALTY_NO_EMAIL;
    }
    if signals.contact.phone.is_none() {
        score -= ATS_PENALTY_NO_PHONE;
    }
    if signals.total_chars < THIN_DOCUMENT_CHARS {
        score -= ATS_PENALTY_THIN_DOCUMENT;
    }
    clamp_score(score)
}

/// Computes the full `ScoreSet` from the classified document, the keyword
/// match, and the formatting signals.
pub fn compute_scores(
    sections: &SectionMap,
    matches: &KeywordMatchResult,
    profile: &JobProfile,
    signals: &FormatSignals,
    config: &EngineConfig,
) -> ScoreSet {
    let section = section_score(sections);
    let format = format_score(sections, signals);
    let keyword = keyword_score(matches, profile);
    let ats = ats_score(format, section, signals);

    let w = &config.weights;
    let overall = (w.ats * ats as f64
        + w.keyword * keyword as f64
        + w.section * section as f64
        + w.format * format as f64)
        .round() as i32;

    ScoreSet {
        ats_score: ats,
        format_score: format,
        section_score: section,
        keyword_score: keyword,
        overall_score: clamp_score(overall),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract::NormalizedText;
    use crate::analysis::keywords::match_keywords;
    use crate::analysis::sections::{classify_sections, extract_contact};
    use crate::analysis::taxonomy::JobProfile;

    const FULL_RESUME: &str = "Jane Doe\njane@example.com\n(555) 123-4567\nSummary\nBackend engineer with 8 years of production experience across several platform teams, focused on reliability work.\nSkills\nNode.js, Python, SQL, MongoDB, Express.js, Java, C#\nExperience\n- Built an API platform serving 2M requests/day\n- Cut p99 latency by 45% with query tuning\nEducation\nBS Computer Science, State University";

    fn score(text: &str, keywords: &[&str]) -> ScoreSet {
        let config = EngineConfig::default();
        let normalized = NormalizedText::from_plain(text);
        let sections = classify_sections(&normalized, &config.headings);
        let profile = JobProfile::new("Backend Developer", "Software Development", keywords);
        let matches = match_keywords(&normalized.joined(), &profile, &config.phrases);
        let contact = extract_contact(&normalized);
        let signals =
            FormatSignals::collect(&normalized, &sections, contact, config.long_line_threshold);
        compute_scores(&sections, &matches, &profile, &signals, &config)
    }

    #[test]
    fn test_all_scores_within_bounds() {
        let scores = score(FULL_RESUME, &["node.js", "python", "sql"]);
        for value in [
            scores.ats_score,
            scores.format_score,
            scores.section_score,
            scores.keyword_score,
            scores.overall_score,
        ] {
            assert!(value <= 100);
        }
    }

    #[test]
    fn test_complete_resume_hits_section_and_keyword_ceiling() {
        let scores = score(FULL_RESUME, &["node.js", "python", "sql"]);
        assert_eq!(scores.section_score, 100);
        assert_eq!(scores.keyword_score, 100);
    }

    #[test]
    fn test_empty_document_floors_without_crashing() {
        let scores = score("", &["react"]);
        assert_eq!(scores.section_score, 0);
        assert_eq!(scores.keyword_score, 0);
        assert!(scores.ats_score <= 25);
        assert!(scores.overall_score < 50);
    }

    #[test]
    fn test_unstructured_document_scores_section_zero() {
        let scores = score("some free text with no headings anywhere", &[]);
        assert_eq!(scores.section_score, 0);
    }

    #[test]
    fn test_keyword_score_half_match_rounds_to_fifty() {
        let text = "Experience\nBuilt a React dashboard.\nSkills\nJavaScript, React";
        let scores = score(text, &["react", "node.js"]);
        assert_eq!(scores.keyword_score, 50);
    }

    #[test]
    fn test_empty_profile_keyword_score_is_neutral() {
        let scores = score(FULL_RESUME, &[]);
        assert_eq!(scores.keyword_score, NEUTRAL_KEYWORD_SCORE);
    }

    #[test]
    fn test_adding_missing_keyword_increases_keyword_score() {
        let before = score(FULL_RESUME, &["node.js", "kafka"]);
        let after = score(&format!("{FULL_RESUME}\nKafka"), &["node.js", "kafka"]);
        assert!(after.keyword_score > before.keyword_score);
    }

    #[test]
    fn test_missing_contact_block_penalizes_format() {
        let with_contact = score(FULL_RESUME, &[]);
        let stripped = FULL_RESUME
            .replace("jane@example.com", "")
            .replace("(555) 123-4567", "");
        let without_contact = score(&stripped, &[]);
        assert!(without_contact.format_score < with_contact.format_score);
    }

    #[test]
    fn test_long_lines_penalize_ats_harder_than_format() {
        let wide = "x".repeat(200);
        let tabular = format!("{FULL_RESUME}\n{wide}\n{wide}\n{wide}");
        let clean = score(FULL_RESUME, &[]);
        let messy = score(&tabular, &[]);
        assert!(messy.format_score < clean.format_score);
        assert!(
            clean.ats_score - messy.ats_score >= clean.format_score - messy.format_score,
            "structural anomalies must weigh heavier on ats"
        );
    }

    #[test]
    fn test_overall_is_weighted_combination() {
        let scores = score(FULL_RESUME, &["node.js", "python", "sql"]);
        let expected = (0.40 * scores.ats_score as f64
            + 0.30 * scores.keyword_score as f64
            + 0.20 * scores.section_score as f64
            + 0.10 * scores.format_score as f64)
            .round() as u8;
        assert_eq!(scores.overall_score, expected);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let first = score(FULL_RESUME, &["node.js", "python"]);
        let second = score(FULL_RESUME, &["node.js", "python"]);
        assert_eq!(first, second);
    }
}
