pub mod health;
pub mod quiz;

use crate::{middleware::cors::permissive_cors, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Room for the non-file multipart fields on top of the document itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(health::root))
        .route("/api/health", get(health::health))
        .route("/api/test", get(health::api_test))
        .route("/api/generate-quiz", post(quiz::generate_quiz))
        .fallback(health::not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(permissive_cors())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
}
