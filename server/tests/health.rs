mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use common::{test_app, test_config};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_reports_alive_without_upstream() {
    // Nothing listens on the target; health must not care.
    let app = test_app(test_config("http://127.0.0.1:9", false, "dist".into()));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "web-bff");
    assert!(body["uptimeSeconds"].is_u64());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn health_carries_csp_with_websockets_in_dev() {
    let app = test_app(test_config("http://127.0.0.1:9", false, "dist".into()));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let csp = response
        .headers()
        .get("content-security-policy")
        .and_then(|v| v.to_str().ok())
        .expect("csp header");
    assert!(csp.contains("ws:"));
    assert!(csp.contains("wss:"));
}

#[tokio::test]
async fn dev_not_found_still_carries_csp() {
    let app = test_app(test_config("http://127.0.0.1:9", false, "dist".into()));

    let response = app
        .oneshot(Request::get("/no-such-page").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response
        .headers()
        .get("content-security-policy")
        .is_some());
}

#[tokio::test]
async fn dev_root_returns_banner() {
    let app = test_app(test_config("http://127.0.0.1:9", false, "dist".into()));

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["mode"], "development");
    assert_eq!(body["api_proxy_target"], "http://127.0.0.1:9/");
}
