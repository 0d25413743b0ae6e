//! API error types with structured JSON responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::audiometry::{LookupError, SubmitError};

/// Error body shared by every endpoint: `{"status": "error", "message": ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::MethodNotAllowed(detail) => (StatusCode::METHOD_NOT_ALLOWED, detail),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "API internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
        };

        let body = ErrorBody {
            status: "error",
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Storage(e) => ApiError::Internal(e.to_string()),
            other => {
                tracing::warn!(error = %other, "Rejected test submission");
                ApiError::BadRequest(other.to_string())
            }
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            missing @ LookupError::NotFound => ApiError::NotFound(missing.to_string()),
            LookupError::InvalidQuery(detail) => ApiError::BadRequest(detail),
            LookupError::Storage(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseError;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn bad_request_returns_400() {
        let response = ApiError::BadRequest("Invalid data format".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Invalid data format");
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::from(LookupError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Test not found");
    }

    #[tokio::test]
    async fn method_not_allowed_returns_405() {
        let response = ApiError::MethodNotAllowed("GET".into()).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "GET");
    }

    #[tokio::test]
    async fn internal_keeps_underlying_message() {
        let err = SubmitError::Storage(DatabaseError::ConstraintViolation("disk full".into()));
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert!(json["message"].as_str().unwrap().contains("disk full"));
    }

    #[test]
    fn invalid_input_maps_to_bad_request() {
        assert!(matches!(
            ApiError::from(SubmitError::InvalidFormat),
            ApiError::BadRequest(ref m) if m == "Invalid data format"
        ));
        assert!(matches!(
            ApiError::from(SubmitError::InvalidTrial { index: 3 }),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(LookupError::InvalidQuery("bad date".into())),
            ApiError::BadRequest(ref m) if m == "bad date"
        ));
    }
}
