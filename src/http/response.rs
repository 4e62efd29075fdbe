//! Error responses.
//!
//! # Responsibilities
//! - Map gateway and predictor failures to HTTP status codes
//! - Render the JSON error envelopes callers rely on
//!
//! # Design Decisions
//! - Every predictor failure is a 500; the category travels in `message`
//! - Raw diagnostics are passed through untouched in `details`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::predictor::PredictorError;

/// Body of every 400 and 500 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub status: String,
    pub message: String,
    pub details: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: details.into(),
        }
    }
}

/// Failures surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    NotFound,

    /// Body was not a well-formed prediction request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Predictor(#[from] PredictorError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Predictor(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::MethodNotAllowed | ApiError::NotFound => {
                (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
            }
            ApiError::InvalidRequest(details) => {
                (status, Json(ErrorEnvelope::new("InvalidRequest", details))).into_response()
            }
            ApiError::Predictor(e) => {
                (status, Json(ErrorEnvelope::new(e.category(), e.details()))).into_response()
            }
        }
    }
}
