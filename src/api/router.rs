//! API router.
//!
//! Returns a composable `Router` with every endpoint nested under `/api/`.
//! Trailing-slash normalisation and CORS are added by `server`, so the
//! router can be driven directly in tests.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::db::HearingTestRepository;

/// Build the API router over the given store.
pub fn api_router(repo: Arc<dyn HearingTestRepository>) -> Router {
    build_router(ApiContext::new(repo))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    // Each method router falls back to a JSON 405.
    let routes = Router::new()
        .route(
            "/health",
            get(endpoints::health::check).fallback(endpoints::method_not_allowed),
        )
        .route(
            "/save-results",
            post(endpoints::results::save).fallback(endpoints::method_not_allowed),
        )
        .route(
            "/results/:id",
            get(endpoints::results::detail).fallback(endpoints::method_not_allowed),
        )
        .route(
            "/patient-tests",
            get(endpoints::patients::search).fallback(endpoints::method_not_allowed),
        )
        .route(
            "/calibration",
            get(endpoints::calibration::table).fallback(endpoints::method_not_allowed),
        )
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .fallback(endpoints::not_found)
        .layer(axum::middleware::from_fn(middleware::request_log::log_request))
}
