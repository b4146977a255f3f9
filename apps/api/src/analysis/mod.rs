//! Resume analysis engine.
//!
//! The pipeline is Extractor → Classifier → {Matcher, Aggregator} →
//! Suggestion Engine → (optionally) AI Merger → Assembler. Each stage is a
//! pure function of its input plus the immutable `EngineConfig`; no stage
//! mutates shared state, so the pipeline runs safely across concurrent
//! requests.
//!
//! Standard and AI analysis are two implementations of the one `Analyzer`
//! capability, selected by caller mode. The deterministic path is fully
//! testable in isolation from the non-deterministic one.

pub mod ai;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod keywords;
pub mod prompts;
pub mod result;
pub mod scoring;
pub mod sections;
pub mod settings;
pub mod store;
pub mod suggestions;
pub mod taxonomy;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::analysis::ai::AiMerger;
use crate::analysis::error::AnalysisError;
use crate::analysis::extract::{extract_text, NormalizedText, RawDocument};
use crate::analysis::keywords::{match_keywords, KeywordMatchResult};
use crate::analysis::result::{assemble, AnalysisResult, AnalysisType, RequestMeta};
use crate::analysis::scoring::{compute_scores, FormatSignals, ScoreSet};
use crate::analysis::sections::{classify_sections, extract_contact, ContactInfo};
use crate::analysis::settings::EngineConfig;
use crate::analysis::suggestions::{build_suggestions, SuggestionSet};
use crate::analysis::taxonomy::JobProfile;

/// One analysis invocation: the uploaded document, the resolved target
/// profile, and the optional free-text job description. Owns all of its
/// working data; nothing is shared across requests.
#[derive(Debug)]
pub struct AnalysisRequest {
    pub document: RawDocument,
    pub profile: JobProfile,
    pub job_description: Option<String>,
    pub meta: RequestMeta,
}

/// The analysis capability. `AppState` holds one implementation per mode
/// as `Arc<dyn Analyzer>`; handlers pick by the caller's mode flag.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn produce_analysis(
        &self,
        request: AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError>;
}

/// Deterministic outputs of the standard pipeline, reused by both modes.
struct StandardOutcome {
    text: NormalizedText,
    scores: ScoreSet,
    keyword_match: KeywordMatchResult,
    suggestions: SuggestionSet,
    contact: ContactInfo,
}

/// The deterministic core: classification through suggestion generation
/// over already-normalized text. Pure CPU work on owned data — identical
/// input always yields an identical outcome.
fn analyze_normalized(
    config: &EngineConfig,
    text: NormalizedText,
    profile: &JobProfile,
) -> StandardOutcome {
    let sections = classify_sections(&text, &config.headings);
    let contact = extract_contact(&text);
    let keyword_match = match_keywords(&text.joined(), profile, &config.phrases);
    let signals =
        FormatSignals::collect(&text, &sections, contact.clone(), config.long_line_threshold);
    let scores = compute_scores(&sections, &keyword_match, profile, &signals, config);
    let suggestions = build_suggestions(&sections, &keyword_match, &signals, config);

    StandardOutcome {
        text,
        scores,
        keyword_match,
        suggestions,
        contact,
    }
}

/// Runs extraction (on the blocking pool) and then the deterministic core.
async fn run_standard_pipeline(
    config: &EngineConfig,
    document: RawDocument,
    profile: &JobProfile,
) -> Result<StandardOutcome, AnalysisError> {
    let text = extract_text(document, config.max_document_bytes).await?;
    Ok(analyze_normalized(config, text, profile))
}

/// The deterministic scoring path (standard mode).
pub struct StandardAnalyzer {
    config: Arc<EngineConfig>,
}

impl StandardAnalyzer {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Analyzer for StandardAnalyzer {
    async fn produce_analysis(
        &self,
        request: AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        let outcome =
            run_standard_pipeline(&self.config, request.document, &request.profile).await?;
        Ok(assemble(
            AnalysisType::Standard,
            request.meta,
            outcome.scores,
            outcome.keyword_match,
            outcome.suggestions,
            outcome.contact,
            None,
            None,
        ))
    }
}

/// Standard scoring plus the narrative critique. The merger is the only
/// stage allowed to fail independently: on provider failure the result
/// still carries the full deterministic analysis, annotated.
pub struct AiAnalyzer {
    config: Arc<EngineConfig>,
    merger: AiMerger,
}

impl AiAnalyzer {
    pub fn new(config: Arc<EngineConfig>, merger: AiMerger) -> Self {
        Self { config, merger }
    }
}

#[async_trait]
impl Analyzer for AiAnalyzer {
    async fn produce_analysis(
        &self,
        request: AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        let outcome =
            run_standard_pipeline(&self.config, request.document, &request.profile).await?;

        let (ai_analysis, ai_unavailable) = match self
            .merger
            .generate(
                &outcome.text,
                &request.profile,
                request.job_description.as_deref(),
            )
            .await
        {
            Ok(analysis) => (Some(analysis), None),
            Err(e) => {
                warn!("AI merger degraded to standard analysis: {e}");
                (None, Some(e.to_string()))
            }
        };

        Ok(assemble(
            AnalysisType::Ai,
            request.meta,
            outcome.scores,
            outcome.keyword_match,
            outcome.suggestions,
            outcome.contact,
            ai_analysis,
            ai_unavailable,
        ))
    }
}
