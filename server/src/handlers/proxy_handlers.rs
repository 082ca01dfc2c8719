use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderName, HeaderValue},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");

// Slightly above the upstream's 20 MB upload limit, leaving room for
// multipart framing. Larger bodies are rejected before they buffer.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

// Hop-by-hop headers are connection-scoped and must not be forwarded.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Forwards any `/api/**` request to the upstream analysis service with the
/// `/api` prefix stripped. Method, headers, body and query string pass
/// through; a connection failure surfaces as 502 without retrying.
pub async fn proxy(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, AppError> {
    let is_production = state.config.is_production;
    let (parts, body) = req.into_parts();

    let stripped = parts
        .uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(parts.uri.path());
    let path = if stripped.is_empty() { "/" } else { stripped };

    let mut target = format!(
        "{}{}",
        state.config.api_target.as_str().trim_end_matches('/'),
        path
    );
    if let Some(query) = parts.uri.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut headers = parts.headers.clone();
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
    // Content length is recomputed from the buffered body.
    headers.remove(header::CONTENT_LENGTH);
    if let Some(host) = headers.remove(header::HOST) {
        headers.insert(X_FORWARDED_HOST, host);
    }
    if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
        if let Ok(ip) = HeaderValue::from_str(&addr.ip().to_string()) {
            headers.insert(X_REAL_IP, ip);
        }
    }

    let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| AppError::PayloadTooLarge {
            limit_mb: (MAX_BODY_BYTES / (1024 * 1024)) as u64,
        })?;

    let upstream = state
        .http
        .request(parts.method, &target)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| AppError::upstream(e, is_production))?;

    let mut builder = Response::builder().status(upstream.status());
    if let Some(out) = builder.headers_mut() {
        for (name, value) in upstream.headers() {
            if !HOP_BY_HOP.contains(name) {
                out.append(name.clone(), value.clone());
            }
        }
    }

    builder
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| AppError::internal(e, is_production))
}
