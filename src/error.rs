//! Error taxonomy at the HTTP boundary.
//!
//! Service code works in `anyhow::Result`; handlers map failures into
//! `ApiError`, which owns the JSON shape the browser sees.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::store::DataUnavailable;

/// Message returned for any failed external analysis call. The underlying
/// cause stays in the server log.
pub const ANALYSIS_FAILED_MESSAGE: &str = "An error occurred while analyzing the trade";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Sheet grid missing or too short to build a player collection.
    #[error("Player data unavailable: {0}")]
    DataUnavailable(String),

    /// Request rejected before any external call was made.
    #[error("{0}")]
    Validation(String),

    /// External text-generation call failed.
    #[error("An error occurred while analyzing the trade")]
    AnalysisFailed,
}

impl From<DataUnavailable> for ApiError {
    fn from(err: DataUnavailable) -> Self {
        ApiError::DataUnavailable(err.0)
    }
}

impl ApiError {
    fn body(&self) -> serde_json::Value {
        match self {
            ApiError::DataUnavailable(details) => json!({
                "error": "Failed to load player data",
                "details": details,
            }),
            ApiError::Validation(message) => json!({ "error": message }),
            ApiError::AnalysisFailed => json!({ "error": ANALYSIS_FAILED_MESSAGE }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self.body())).into_response()
    }
}
