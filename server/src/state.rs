use std::{sync::Arc, time::Instant};

use axum::http::HeaderValue;
use reqwest::Client;

use crate::config::Config;

// Dev policy additionally allows websocket connections for hot-reload.
const CSP_PROD: &str = "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; \
     img-src 'self' data:; font-src 'self' data:; connect-src 'self'; \
     object-src 'none'; base-uri 'self'; frame-ancestors 'none'";
const CSP_DEV: &str = "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; \
     img-src 'self' data:; font-src 'self' data:; connect-src 'self' ws: wss:; \
     object-src 'none'; base-uri 'self'; frame-ancestors 'none'";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: Client,
    pub started_at: Instant,
    pub csp: HeaderValue,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let csp = if config.is_production {
            HeaderValue::from_static(CSP_PROD)
        } else {
            HeaderValue::from_static(CSP_DEV)
        };

        AppState {
            config: Arc::new(config),
            http: Client::new(),
            started_at: Instant::now(),
            csp,
        }
    }
}
