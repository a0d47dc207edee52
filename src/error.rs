use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::engine::SequenceError;
use crate::evaluator::EvaluationError;
use crate::orchestration::SimulationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unprocessable: {0}")]
    Unprocessable(String),
}

impl From<EvaluationError> for AppError {
    fn from(err: EvaluationError) -> Self {
        AppError::Unprocessable(err.to_string())
    }
}

impl From<SequenceError> for AppError {
    fn from(err: SequenceError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<SimulationError> for AppError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::Sequence(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
