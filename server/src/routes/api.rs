use axum::{routing::any, Router};

use crate::handlers::proxy_handlers::proxy;
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api", any(proxy))
        .route("/api/{*path}", any(proxy))
}
