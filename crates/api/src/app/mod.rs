use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use pvz_app::UseCases;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the HTTP router over a wired set of use cases.
pub fn build_app(use_cases: UseCases) -> Router {
    let api = routes::router()
        .layer(Extension(Arc::new(use_cases)))
        .layer(axum::middleware::from_fn(middleware::bearer_token));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(api)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::trace_requests)))
}
