use axum::Json;

use crate::api::types::Success;
use crate::audiometry::{self, CalibrationSnapshot};

/// `GET /api/calibration` — static calibration table with server time.
pub async fn table() -> Json<Success<CalibrationSnapshot>> {
    Json(Success::new(audiometry::calibration_snapshot()))
}
