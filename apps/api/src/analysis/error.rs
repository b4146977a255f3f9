use thiserror::Error;

/// Engine-level error taxonomy.
///
/// The first four are fatal to the whole request. `AiProviderUnavailable`
/// is not: the deterministic scores are still returned and the result is
/// annotated instead (see `AiAnalyzer`).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Document exceeds the {limit}-byte upload ceiling ({actual} bytes)")]
    DocumentTooLarge { limit: usize, actual: usize },

    #[error("Could not extract any text from the document: {0}")]
    ExtractionFailed(String),

    #[error("Unresolvable job profile: {0}")]
    InvalidJobProfile(String),

    #[error("AI provider unavailable: {0}")]
    AiProviderUnavailable(String),
}
