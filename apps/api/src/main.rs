mod analysis;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::ai::AiMerger;
use crate::analysis::settings::EngineConfig;
use crate::analysis::{AiAnalyzer, StandardAnalyzer};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let crate_target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", crate_target, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeLens API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Load the immutable engine configuration (taxonomy, heading
    // vocabulary, phrase dictionary, weights). Shared read-only.
    let engine = Arc::new(EngineConfig::load(
        config.engine_config_path.as_deref().map(Path::new),
    )?);
    info!(
        "Engine config loaded: {} role categories, {} heading rules",
        engine.taxonomy.categories.len(),
        engine.headings.len()
    );

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // One analyzer per analysis mode; the AI path carries its own timeout
    // so provider latency never blocks the deterministic path.
    let standard_analyzer = Arc::new(StandardAnalyzer::new(engine.clone()));
    let ai_analyzer = Arc::new(AiAnalyzer::new(
        engine.clone(),
        AiMerger::new(llm, Duration::from_secs(config.ai_timeout_secs)),
    ));

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        engine,
        standard_analyzer,
        ai_analyzer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
