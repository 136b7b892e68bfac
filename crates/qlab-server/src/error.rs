//! Error types for the server API.
//!
//! Only faults *outside* an executed script become HTTP errors; script
//! faults are captured into response bodies by the executor.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// API error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Simulation error: {0}")]
    SimulationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::SimulationError(_) => (StatusCode::BAD_REQUEST, "simulation_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<qlab_ir::IrError> for ApiError {
    fn from(e: qlab_ir::IrError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<qlab_sim::SimError> for ApiError {
    fn from(e: qlab_sim::SimError) -> Self {
        ApiError::SimulationError(e.to_string())
    }
}

impl From<qlab_render::RenderError> for ApiError {
    fn from(e: qlab_render::RenderError) -> Self {
        match e {
            qlab_render::RenderError::UnknownComponent(_)
            | qlab_render::RenderError::InvalidRoute { .. } => ApiError::BadRequest(e.to_string()),
            _ => ApiError::Internal(e.to_string()),
        }
    }
}
