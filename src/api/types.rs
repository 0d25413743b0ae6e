//! Shared types for the API layer.

use std::sync::Arc;

use serde::Serialize;

use crate::db::HearingTestRepository;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub repo: Arc<dyn HearingTestRepository>,
}

impl ApiContext {
    pub fn new(repo: Arc<dyn HearingTestRepository>) -> Self {
        Self { repo }
    }
}

/// Success envelope: `{"status": "success", ...body}`.
#[derive(Debug, Serialize)]
pub struct Success<T: Serialize> {
    pub status: &'static str,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Success<T> {
    pub fn new(body: T) -> Self {
        Self {
            status: "success",
            body,
        }
    }
}
