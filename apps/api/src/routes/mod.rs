pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

/// Upload routes accept documents up to the 10 MiB engine ceiling; the
/// body limit adds headroom for multipart framing, and the engine enforces
/// the exact ceiling itself.
const UPLOAD_BODY_LIMIT: usize = 12 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/roles", get(handlers::handle_list_roles))
        .route(
            "/api/v1/analysis/standard",
            post(handlers::handle_standard_analysis),
        )
        .route("/api/v1/analysis/ai", post(handlers::handle_ai_analysis))
        .route("/api/v1/analysis", get(handlers::handle_list_analyses))
        .route(
            "/api/v1/analysis/:id",
            get(handlers::handle_get_analysis).delete(handlers::handle_delete_analysis),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(state)
}
