//! Test result endpoints.
//!
//! Two endpoints:
//! - `POST /api/save-results` — score and store a finished test
//! - `GET /api/results/:id` — one stored test

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, Success};
use crate::audiometry::{self, SubmitOutcome, SubmitRequest};
use crate::models::HearingTestResult;

/// `POST /api/save-results` — trials plus patient identity in, scores out.
pub async fn save(
    State(ctx): State<ApiContext>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<Success<SubmitOutcome>>, ApiError> {
    let Json(request) = payload?;
    let outcome = audiometry::submit_test(ctx.repo.as_ref(), request)?;
    Ok(Json(Success::new(outcome)))
}

/// `GET /api/results/:id` — full stored record.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<HearingTestResult>, ApiError> {
    let record = audiometry::get_result(ctx.repo.as_ref(), &id)?;
    Ok(Json(record))
}
