use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

const ASSET_EXTENSIONS: [&str; 8] = ["js", "css", "png", "jpg", "jpeg", "gif", "svg", "ico"];

const NO_STORE: HeaderValue = HeaderValue::from_static("no-cache, no-store, must-revalidate");
const ONE_DAY: HeaderValue = HeaderValue::from_static("public, max-age=86400");

/// Cache policy for the static site: long-lived caching for fingerprinted
/// assets, the no-cache trio for anything HTML so client-side routing always
/// gets a fresh shell.
pub async fn cache_control(req: Request, next: Next) -> Response {
    let is_asset = req
        .uri()
        .path()
        .rsplit('/')
        .next()
        .and_then(|file| file.rsplit_once('.'))
        .map(|(_, ext)| ASSET_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a)))
        .unwrap_or(false);

    let mut response = next.run(req).await;

    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("text/html"))
        .unwrap_or(false);

    if is_html {
        response.headers_mut().insert(header::CACHE_CONTROL, NO_STORE);
    } else if is_asset && response.status().is_success() {
        response.headers_mut().insert(header::CACHE_CONTROL, ONE_DAY);
    }

    response
}
