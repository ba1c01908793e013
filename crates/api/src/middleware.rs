use std::time::Instant;

use axum::{
    http::{HeaderMap, Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use pvz_auth::AccessToken;

/// Attach the caller's [`AccessToken`] to the request.
///
/// A missing or malformed header is not rejected here: handlers get an empty
/// token and the use case decides, so every refusal carries a domain error.
pub async fn bearer_token(mut req: Request<axum::body::Body>, next: Next) -> Response {
    let token = extract_bearer(req.headers());
    req.extensions_mut().insert(token);
    next.run(req).await
}

/// One line per request at `info`.
pub async fn trace_requests(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let res = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = res.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    res
}

fn extract_bearer(headers: &HeaderMap) -> AccessToken {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| AccessToken::new(t.trim()))
        .unwrap_or_else(AccessToken::empty)
}
