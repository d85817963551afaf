use crate::AppState;
use axum::{extract::State, http::StatusCode, http::Uri, response::IntoResponse, Json};
use serde_json::json;

const SERVICE_NAME: &str = "Quiz Generator API";
const API_ENDPOINTS: [&str; 3] = ["GET /api/health", "GET /api/test", "POST /api/generate-quiz"];

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "status": "ok",
        "message": "Quiz Generator API is working",
        "timestamp": chrono::Utc::now(),
        "endpoints": [
            "GET / - This message",
            "GET /api/health - Health check",
            "GET /api/test - Route check",
            "POST /api/generate-quiz - Generate quiz from document"
        ],
    });
    (StatusCode::OK, Json(body))
}

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let body = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "uptime": state.started_at.elapsed().as_secs_f64(),
    });
    (StatusCode::OK, Json(body))
}

pub async fn api_test() -> impl IntoResponse {
    Json(json!({
        "message": "API routes are working!",
        "timestamp": chrono::Utc::now(),
    }))
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    let body = json!({
        "success": false,
        "error": format!("API endpoint {} not found", uri.path()),
        "available_endpoints": API_ENDPOINTS,
    });
    (StatusCode::NOT_FOUND, Json(body))
}
