use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::state::turns::TurnError;

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The referenced user is malformed or unknown.
    #[error("invalid user reference: {0}")]
    InvalidUser(String),
    /// Join-code allocation exhausted its retry budget.
    #[error("could not allocate a unique room code")]
    CodeExhausted,
    /// The supplied join code does not match the expected format.
    #[error("invalid room code format: {0}")]
    InvalidCodeFormat(String),
    /// No room with that code is currently accepting players.
    #[error("room is not joinable")]
    RoomNotJoinable,
    /// The referenced room does not exist.
    #[error("room `{0}` not found")]
    RoomNotFound(Uuid),
    /// The question pool has no question matching the requested filters.
    #[error("no questions available for the requested filters")]
    NoQuestionsAvailable,
    /// The submission is malformed or was made out of turn.
    #[error("invalid submission: {0}")]
    InvalidSubmission(String),
    /// The submitted question id does not match the turn's assigned question.
    #[error("question does not match the current turn assignment")]
    UnknownQuestion,
    /// The current turn has already been adjudicated.
    #[error("turn has already been answered")]
    TurnAlreadyAnswered,
    /// Unauthorized access attempt.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Operation cannot be performed in the current room state.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl From<TurnError> for ServiceError {
    fn from(err: TurnError) -> Self {
        match err {
            TurnError::NoActiveParticipants => {
                ServiceError::InvalidState("no active participants for this stage".into())
            }
            TurnError::NotActive => ServiceError::InvalidState("stage has no active turn".into()),
            TurnError::OutOfTurn { .. } => {
                ServiceError::InvalidSubmission("it is not this participant's turn".into())
            }
            TurnError::AlreadyAnswered => ServiceError::TurnAlreadyAnswered,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Unauthorized access attempt.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidUser(_)
            | ServiceError::InvalidCodeFormat(_)
            | ServiceError::InvalidSubmission(_) => AppError::BadRequest(err.to_string()),
            ServiceError::RoomNotFound(_)
            | ServiceError::NoQuestionsAvailable
            | ServiceError::UnknownQuestion => AppError::NotFound(err.to_string()),
            ServiceError::CodeExhausted
            | ServiceError::RoomNotJoinable
            | ServiceError::TurnAlreadyAnswered
            | ServiceError::InvalidState(_) => AppError::Conflict(err.to_string()),
            ServiceError::Unauthorized(message) => AppError::Unauthorized(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
