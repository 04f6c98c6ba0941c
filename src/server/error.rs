//! Error types for the REST API server

use crate::error::EngineError;
use crate::render::RenderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Rejected selection (mode, period, category, field, op or window)
    InvalidInput(EngineError),
    /// Invalid parameter in request
    InvalidParameter(String),
    /// Date that could not be parsed
    InvalidDateRange(String),
    /// Report could not be rendered
    RenderFailed(String),
    /// Internal server error
    InternalError(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidInput(err) => write!(f, "Invalid input: {}", err),
            ApiError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            ApiError::InvalidDateRange(msg) => write!(f, "Invalid date range: {}", msg),
            ApiError::RenderFailed(msg) => write!(f, "Rendering failed: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

fn engine_error_type(err: &EngineError) -> &'static str {
    match err {
        EngineError::InvalidMode(_) => "InvalidMode",
        EngineError::InvalidPeriod(_) => "InvalidPeriod",
        EngineError::InvalidCategory(_) => "InvalidCategory",
        EngineError::InvalidField(_) => "InvalidField",
        EngineError::InvalidOp(_) => "InvalidOp",
        EngineError::InvalidWindow { .. } | EngineError::DateOutOfRange(_) => "InvalidDateRange",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::InvalidInput(err) => {
                (StatusCode::BAD_REQUEST, engine_error_type(err), err.to_string())
            }
            ApiError::InvalidParameter(msg) => {
                (StatusCode::BAD_REQUEST, "InvalidParameter", msg.clone())
            }
            ApiError::InvalidDateRange(msg) => {
                (StatusCode::BAD_REQUEST, "InvalidDateRange", msg.clone())
            }
            ApiError::RenderFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "RenderFailed",
                msg.clone(),
            ),
            ApiError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalError",
                msg.clone(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": error_type,
            "message": message,
        }));

        (status, body).into_response()
    }
}

// Conversions from other error types

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::InvalidInput(err)
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError::RenderFailed(err.to_string())
    }
}

impl From<chrono::ParseError> for ApiError {
    fn from(err: chrono::ParseError) -> Self {
        ApiError::InvalidDateRange(format!("Date parse error: {}", err))
    }
}
