use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::handlers::health_handlers::{dev_banner, health};
use crate::middleware::{
    cache_control::cache_control, security_headers::security_headers,
};
use crate::state::AppState;

/// Health plus the static site. In production every unmatched path falls back
/// to the SPA shell; in development a separate dev server owns the assets and
/// the root serves a banner instead.
pub fn site_routes(state: &AppState) -> Router<AppState> {
    let router = Router::new().route("/health", get(health));

    let router = if state.config.is_production {
        let index = state.config.static_dir.join("index.html");
        let files = ServeDir::new(&state.config.static_dir).fallback(ServeFile::new(index));
        router.fallback_service(files).layer(from_fn(cache_control))
    } else {
        // A fallback inside this router keeps dev 404s under the CSP layer.
        router.route("/", get(dev_banner)).fallback(not_found)
    };

    router.layer(from_fn_with_state(state.clone(), security_headers))
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
