use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::result::AnalysisType;
use crate::analysis::settings::EngineConfig;
use crate::analysis::Analyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum
/// extractors. Everything here is immutable or internally synchronized;
/// no per-request mutable state lives in it.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Engine configuration: loaded once at startup, read-only thereafter.
    pub engine: Arc<EngineConfig>,
    /// One `Analyzer` implementation per analysis mode, selected by the
    /// caller's mode flag.
    pub standard_analyzer: Arc<dyn Analyzer>,
    pub ai_analyzer: Arc<dyn Analyzer>,
}

impl AppState {
    pub fn analyzer(&self, mode: AnalysisType) -> Arc<dyn Analyzer> {
        match mode {
            AnalysisType::Standard => self.standard_analyzer.clone(),
            AnalysisType::Ai => self.ai_analyzer.clone(),
        }
    }
}
