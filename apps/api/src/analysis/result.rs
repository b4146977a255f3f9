//! Result assembler — pure combination of the pipeline outputs plus
//! request metadata into the single immutable `AnalysisResult` every
//! downstream surface consumes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::ai::AiAnalysis;
use crate::analysis::keywords::KeywordMatchResult;
use crate::analysis::scoring::ScoreSet;
use crate::analysis::sections::ContactInfo;
use crate::analysis::suggestions::SuggestionSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Standard,
    Ai,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Standard => "standard",
            AnalysisType::Ai => "ai",
        }
    }
}

/// Request metadata carried through the pipeline into the result.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub document_id: Uuid,
    pub source_filename: String,
    pub job_role: String,
    pub job_category: String,
}

/// The immutable aggregate consumed identically by the analyzer page,
/// dashboard summaries, the history list, and exports. Never mutated
/// after assembly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub analysis_type: AnalysisType,
    pub scores: ScoreSet,
    pub keyword_match: KeywordMatchResult,
    pub suggestions: SuggestionSet,
    pub contact: ContactInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<AiAnalysis>,
    /// Set when AI mode was requested but the provider was unavailable;
    /// the deterministic fields above are still fully populated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_unavailable: Option<String>,
    pub document_id: Uuid,
    pub source_filename: String,
    pub job_role: String,
    pub job_category: String,
    pub created_at: DateTime<Utc>,
}

/// Assembles the final result. No computation happens here; the contract
/// is structural completeness and immutability after construction.
#[allow(clippy::too_many_arguments)]
pub fn assemble(
    analysis_type: AnalysisType,
    meta: RequestMeta,
    scores: ScoreSet,
    keyword_match: KeywordMatchResult,
    suggestions: SuggestionSet,
    contact: ContactInfo,
    ai_analysis: Option<AiAnalysis>,
    ai_unavailable: Option<String>,
) -> AnalysisResult {
    AnalysisResult {
        analysis_type,
        scores,
        keyword_match,
        suggestions,
        contact,
        ai_analysis,
        ai_unavailable,
        document_id: meta.document_id,
        source_filename: meta.source_filename,
        job_role: meta.job_role,
        job_category: meta.job_category,
        created_at: Utc::now(),
    }
}
