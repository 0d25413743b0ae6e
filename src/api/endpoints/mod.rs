//! API endpoint handlers.
//!
//! Handlers stay thin: decode, call into `crate::audiometry`, wrap the
//! result. Errors convert into `ApiError`.

pub mod calibration;
pub mod health;
pub mod patients;
pub mod results;

use axum::http::Method;

use crate::api::error::ApiError;

/// Fallback for unknown routes, so even a 404 carries a status field.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".into())
}

/// Fallback for a known path called with an unsupported method.
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(format!("{method} is not supported on this route"))
}
