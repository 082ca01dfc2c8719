use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::models::responses::HealthResponse;
use crate::state::AppState;

/// Liveness probe. Reports on the BFF process only, no downstream check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "web-bff".to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// Root banner in development mode, where a separate dev server owns the
/// static assets.
pub async fn dev_banner(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": "web-bff",
        "mode": "development",
        "api_proxy_target": state.config.api_target.as_str(),
        "message": "static serving disabled; run the frontend dev server for assets",
    }))
}
