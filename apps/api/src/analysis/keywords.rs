//! Keyword & skill matcher — tokenizes resume text, re-joins known
//! multi-word skill phrases, and computes the matched/missing split against
//! a job profile. Matching is exact on the normalized token or phrase; no
//! fuzzy or partial credit, so results stay reproducible and explainable.

use std::collections::HashSet;

use serde::Serialize;

use crate::analysis::taxonomy::JobProfile;

/// Outcome of keyword matching. `matched` and `missing` are disjoint and
/// together cover the profile's keyword set, original casing preserved.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KeywordMatchResult {
    #[serde(rename = "matchedSkills")]
    pub matched: Vec<String>,
    #[serde(rename = "missingSkills")]
    pub missing: Vec<String>,
}

/// Splits text into normalized tokens: lowercase, whitespace/hyphen/slash
/// separated, punctuation stripped. '+' and '#' survive so "C++" and "C#"
/// stay distinct tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '/' || c == ',' || c == ';')
        .map(|raw| {
            raw.chars()
                .filter(|c| c.is_alphanumeric() || *c == '+' || *c == '#')
                .collect::<String>()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// Normalizes a keyword to its canonical form: the tokenized pieces joined
/// by single spaces ("Machine-Learning" and "machine learning" coincide).
pub fn normalize_keyword(keyword: &str) -> String {
    tokenize(keyword).join(" ")
}

const MAX_PHRASE_TOKENS: usize = 4;

/// Merges adjacent tokens into phrase tokens wherever a consecutive run
/// appears in `phrases` (normalized multi-word entries). Longest match
/// wins at each position.
fn merge_phrases(tokens: Vec<String>, phrases: &HashSet<String>) -> Vec<String> {
    let mut merged = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let mut consumed = 0;
        let max_len = MAX_PHRASE_TOKENS.min(tokens.len() - i);
        for len in (2..=max_len).rev() {
            let candidate = tokens[i..i + len].join(" ");
            if phrases.contains(&candidate) {
                merged.push(candidate);
                consumed = len;
                break;
            }
        }
        if consumed == 0 {
            merged.push(tokens[i].clone());
            i += 1;
        } else {
            i += consumed;
        }
    }
    merged
}

/// Computes the matched/missing keyword split for a resume against a job
/// profile. Multi-word profile keywords and configured phrase-dictionary
/// entries are re-joined before comparison so they are not falsely marked
/// missing by single-token splitting. An empty profile yields empty sets
/// (the keyword sub-score then defaults to neutral, see scoring).
pub fn match_keywords(
    resume_text: &str,
    profile: &JobProfile,
    phrase_dictionary: &[String],
) -> KeywordMatchResult {
    if profile.keywords.is_empty() {
        return KeywordMatchResult::default();
    }

    let mut phrases: HashSet<String> = phrase_dictionary
        .iter()
        .map(|p| normalize_keyword(p))
        .filter(|p| p.contains(' '))
        .collect();
    for keyword in &profile.keywords {
        let normalized = normalize_keyword(keyword);
        if normalized.contains(' ') {
            phrases.insert(normalized);
        }
    }

    let tokens = merge_phrases(tokenize(resume_text), &phrases);
    let present: HashSet<&str> = tokens.iter().map(String::as_str).collect();

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    for keyword in &profile.keywords {
        if present.contains(normalize_keyword(keyword).as_str()) {
            matched.push(keyword.clone());
        } else {
            missing.push(keyword.clone());
        }
    }

    KeywordMatchResult { matched, missing }
}
