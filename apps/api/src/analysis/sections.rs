//! Section classifier — segments normalized resume text into canonical
//! sections by scanning for heading lines against a configurable vocabulary.

use std::collections::BTreeMap;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::extract::NormalizedText;
use crate::analysis::settings::HeadingRule;

/// Canonical resume section. Lines that match no recognized heading fall
/// into `Other`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Contact,
    Summary,
    Skills,
    Experience,
    Education,
    Other,
}

impl Section {
    /// The five sections whose presence drives the section score.
    /// `Other` is deliberately excluded.
    pub const TRACKED: [Section; 5] = [
        Section::Contact,
        Section::Summary,
        Section::Skills,
        Section::Experience,
        Section::Education,
    ];
}

/// Mapping from section to the ordered, non-overlapping line ranges
/// (indices into `NormalizedText::lines`) belonging to it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SectionMap {
    ranges: BTreeMap<Section, Vec<Range<usize>>>,
}

impl SectionMap {
    pub fn ranges(&self, section: Section) -> &[Range<usize>] {
        self.ranges.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    /// A section is present when it owns at least one non-empty line range.
    pub fn is_present(&self, section: Section) -> bool {
        self.ranges(section).iter().any(|r| !r.is_empty())
    }

    /// Iterates the lines of `section` in document order.
    pub fn lines<'a>(
        &'a self,
        section: Section,
        text: &'a NormalizedText,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.ranges(section)
            .iter()
            .flat_map(move |r| text.lines[r.clone()].iter().map(|l| l.text.as_str()))
    }

    fn push_line(&mut self, section: Section, index: usize) {
        let ranges = self.ranges.entry(section).or_default();
        match ranges.last_mut() {
            Some(last) if last.end == index => last.end = index + 1,
            _ => ranges.push(index..index + 1),
        }
    }
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?\d{1,2}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap()
});
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://\S+|www\.\S+|linkedin\.com/\S+|github\.com/\S+)").unwrap()
});

static LINKEDIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)linkedin\.com/in/[A-Za-z0-9_-]+").unwrap());
static GITHUB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)github\.com/[A-Za-z0-9_-]+").unwrap());

/// True when a line looks like part of a contact block (email, phone, URL).
pub fn is_contact_line(line: &str) -> bool {
    EMAIL_RE.is_match(line) || PHONE_RE.is_match(line) || URL_RE.is_match(line)
}

/// Contact details recovered from the document. Drives the
/// contact-completeness signal and the contact suggestion rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

impl ContactInfo {
    /// Email plus phone is what automated parsers minimally expect.
    pub fn is_complete(&self) -> bool {
        self.email.is_some() && self.phone.is_some()
    }
}

/// Extracts contact details with the pattern heuristics. The name falls
/// back to the first line that is neither contact-patterned nor a heading.
pub fn extract_contact(text: &NormalizedText) -> ContactInfo {
    let joined = text.joined();
    let first = |re: &Regex| re.find(&joined).map(|m| m.as_str().to_string());

    let name = text
        .lines
        .iter()
        .take(5)
        .map(|l| l.text.as_str())
        .find(|line| !is_contact_line(line) && line.split_whitespace().count() <= 5)
        .map(str::to_string);

    ContactInfo {
        name,
        email: first(&EMAIL_RE),
        phone: first(&PHONE_RE),
        linkedin: first(&LINKEDIN_RE),
        github: first(&GITHUB_RE),
    }
}

/// Classifies normalized text into a `SectionMap`.
///
/// Scan lines in order. A recognized heading opens its section; every
/// subsequent line belongs to it until the next heading. Lines before the
/// first heading go to `contact` when they match contact-pattern
/// heuristics, else `other`. Zero headings is not an error — the whole
/// document classifies as `other`.
pub fn classify_sections(text: &NormalizedText, headings: &[HeadingRule]) -> SectionMap {
    let mut map = SectionMap::default();
    let mut current: Option<Section> = None;

    for (index, line) in text.lines.iter().enumerate() {
        if let Some(section) = detect_heading(&line.text, headings) {
            current = Some(section);
            continue; // the heading line itself belongs to no range
        }

        match current {
            Some(section) => map.push_line(section, index),
            None => {
                let section = if is_contact_line(&line.text) {
                    Section::Contact
                } else {
                    Section::Other
                };
                map.push_line(section, index);
            }
        }
    }

    map
}

/// Maximum length for a shape-heuristic heading (short, upper-cased line).
const SHAPE_HEADING_MAX_LEN: usize = 32;
/// Slack allowed between a vocabulary entry and the full heading line, so
/// "Work Experience:" still matches "work experience".
const HEADING_TRAILING_SLACK: usize = 3;

/// Returns the section a heading line opens, or `None` for body lines.
///
/// Vocabulary match: the normalized line starts with a synonym and carries
/// at most `HEADING_TRAILING_SLACK` extra characters. Ties across sections
/// resolve to the longest matched synonym. A short all-uppercase line that
/// matches no vocabulary entry still opens a section, but an untracked one
/// (`Other`).
fn detect_heading(line: &str, headings: &[HeadingRule]) -> Option<Section> {
    let normalized = line
        .trim()
        .trim_end_matches(|c| c == ':' || c == '-')
        .trim()
        .to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let mut best: Option<(Section, usize)> = None;
    for rule in headings {
        for synonym in &rule.synonyms {
            if normalized.starts_with(synonym.as_str())
                && normalized.len() <= synonym.len() + HEADING_TRAILING_SLACK
                && best.map_or(true, |(_, len)| synonym.len() > len)
            {
                best = Some((rule.section, synonym.len()));
            }
        }
    }
    if let Some((section, _)) = best {
        return Some(section);
    }

    let trimmed = line.trim();
    let letters: Vec<char> = trimmed.chars().filter(|c| c.is_alphabetic()).collect();
    if trimmed.len() <= SHAPE_HEADING_MAX_LEN
        && letters.len() >= 3
        && letters.iter().all(|c| c.is_uppercase())
    {
        return Some(Section::Other);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract::NormalizedText;
    use crate::analysis::settings::EngineConfig;

    fn classify(text: &str) -> SectionMap {
        let cfg = EngineConfig::default();
        classify_sections(&NormalizedText::from_plain(text), &cfg.headings)
    }

    #[test]
    fn test_recognizes_canonical_headings() {
        let map = classify(
            "Summary\nSeasoned engineer.\nExperience\nBuilt things.\nEducation\nBS in Computer Science\nSkills\nRust, SQL",
        );
        assert!(map.is_present(Section::Summary));
        assert!(map.is_present(Section::Experience));
        assert!(map.is_present(Section::Education));
        assert!(map.is_present(Section::Skills));
    }

    #[test]
    fn test_heading_synonyms_map_to_same_section() {
        for heading in ["Work Experience", "Employment History", "EXPERIENCE"] {
            let map = classify(&format!("{heading}\nShipped a platform."));
            assert!(
                map.is_present(Section::Experience),
                "'{heading}' did not open experience"
            );
        }
    }

    #[test]
    fn test_heading_with_trailing_colon() {
        let map = classify("Skills:\nRust");
        assert!(map.is_present(Section::Skills));
    }

    #[test]
    fn test_lines_before_first_heading_split_contact_other() {
        let map = classify("Jane Doe\njane@example.com\nExperience\nDid work.");
        assert!(map.is_present(Section::Contact));
        assert!(map.is_present(Section::Other)); // the name line
        assert!(map.is_present(Section::Experience));
    }

    #[test]
    fn test_no_headings_classifies_as_other() {
        let map = classify("just some prose\nwith no structure at all");
        assert!(map.is_present(Section::Other));
        for section in Section::TRACKED {
            assert!(!map.is_present(section), "{section:?} should be absent");
        }
    }

    #[test]
    fn test_empty_document_has_no_sections() {
        let map = classify("");
        for section in Section::TRACKED {
            assert!(!map.is_present(section));
        }
        assert!(!map.is_present(Section::Other));
    }

    #[test]
    fn test_uppercase_unknown_heading_opens_other() {
        let map = classify("HOBBIES\nChess and hiking.");
        assert!(map.is_present(Section::Other));
        assert!(!map.is_present(Section::Experience));
    }

    #[test]
    fn test_tie_resolves_to_longest_synonym() {
        // "work experience" (experience) must win over any shorter match.
        let cfg = EngineConfig::default();
        let section = detect_heading("Work Experience", &cfg.headings);
        assert_eq!(section, Some(Section::Experience));
    }

    #[test]
    fn test_body_line_mentioning_section_word_is_not_heading() {
        let map = classify(
            "Summary\nTen years of experience building education software for skills training.",
        );
        assert!(map.is_present(Section::Summary));
        assert!(!map.is_present(Section::Experience));
        assert!(!map.is_present(Section::Education));
    }

    #[test]
    fn test_ranges_are_sorted_and_non_overlapping() {
        let map = classify(
            "Experience\nrole one\nSkills\nRust\nExperience\nrole two\nmore detail",
        );
        let ranges = map.ranges(Section::Experience);
        assert_eq!(ranges.len(), 2);
        for pair in ranges.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn test_extract_contact_finds_details() {
        let text = NormalizedText::from_plain(
            "Jane Doe\njane@example.com | (555) 123-4567\nlinkedin.com/in/janedoe\ngithub.com/janedoe",
        );
        let contact = extract_contact(&text);
        assert_eq!(contact.name.as_deref(), Some("Jane Doe"));
        assert_eq!(contact.email.as_deref(), Some("jane@example.com"));
        assert!(contact.phone.is_some());
        assert_eq!(contact.linkedin.as_deref(), Some("linkedin.com/in/janedoe"));
        assert_eq!(contact.github.as_deref(), Some("github.com/janedoe"));
        assert!(contact.is_complete());
    }

    #[test]
    fn test_extract_contact_incomplete_without_phone() {
        let text = NormalizedText::from_plain("Jane Doe\njane@example.com");
        let contact = extract_contact(&text);
        assert!(contact.phone.is_none());
        assert!(!contact.is_complete());
    }

    #[test]
    fn test_contact_line_detection() {
        assert!(is_contact_line("jane@example.com"));
        assert!(is_contact_line("(555) 123-4567"));
        assert!(is_contact_line("linkedin.com/in/janedoe"));
        assert!(!is_contact_line("Built a React dashboard"));
    }
}
