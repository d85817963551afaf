use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use quiz_backend::{config::Config, routes, AppState};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

async fn get(uri: &str) -> (StatusCode, JsonValue) {
    let app = routes::router(AppState::new(Config::default()).expect("state"));
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_service_details() {
    let (status, body) = get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "Quiz Generator API");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn root_lists_endpoints() {
    let (status, body) = get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["endpoints"].as_array().unwrap().len() >= 3);
}

#[tokio::test]
async fn test_route_answers() {
    let (status, body) = get("/api/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "API routes are working!");
}

#[tokio::test]
async fn unknown_api_route_is_json_404() {
    let (status, body) = get("/api/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "API endpoint /api/does-not-exist not found");
    assert!(body["available_endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e == "POST /api/generate-quiz"));
}
