//! Patient search endpoint.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::audiometry::{self, PatientSearchQuery};
use crate::models::HearingTestResult;

/// `GET /api/patient-tests?last_name=&first_name=&birth_date=` — newest first.
pub async fn search(
    State(ctx): State<ApiContext>,
    query: Result<Query<PatientSearchQuery>, QueryRejection>,
) -> Result<Json<Vec<HearingTestResult>>, ApiError> {
    let Query(query) = query?;
    let records = audiometry::search_results(ctx.repo.as_ref(), query)?;
    Ok(Json(records))
}
