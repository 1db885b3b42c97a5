use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::services::registration::RegistrationError;

/// Failures of the sizing engine. All of them are local computation
/// failures; there is nothing to retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A caller-supplied value is missing, non-finite or out of range.
    #[error("invalid input `{field}`: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Annual savings are zero, so the investment is never recovered.
    #[error("payback undefined: annual savings are zero")]
    DivisionByZero,

    /// The engine constants or the pricing table are unusable.
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput { field, reason: reason.into() }
    }
}

/// Error type returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("location not found: {0}")]
    LocationNotFound(String),

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ApiError::Engine(EngineError::InvalidInput { field, .. }) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": message, "field": field })),
            )
                .into_response(),
            ApiError::Engine(EngineError::DivisionByZero) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "error": message, "code": "payback_undefined" })),
            )
                .into_response(),
            ApiError::Engine(EngineError::InvalidConfig(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
            ApiError::LocationNotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
            ApiError::Registration(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "error": message, "fields": err.fields })),
            )
                .into_response(),
        }
    }
}
