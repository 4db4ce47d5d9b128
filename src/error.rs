use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ErrorResponse, IllegalTransition};
use crate::services::store::StoreError;

/// Errors surfaced by the engine's operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{0}")]
    Validation(String),

    /// Request body present but not valid JSON for the endpoint
    #[error("Invalid JSON: {0}")]
    InvalidBody(String),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl EngineError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        EngineError::NotFound { entity, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation(message.into())
    }

    fn kind(&self) -> &'static str {
        match self {
            EngineError::NotFound { .. } => "not_found",
            EngineError::Validation(_) => "validation_error",
            EngineError::InvalidBody(_) => "invalid_json",
            EngineError::Storage(_) => "storage_error",
        }
    }
}

impl From<IllegalTransition> for EngineError {
    fn from(err: IllegalTransition) -> Self {
        EngineError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        EngineError::Validation(errors.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

impl ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            EngineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchStatus;

    #[test]
    fn test_status_codes() {
        let id = Uuid::new_v4();
        assert_eq!(EngineError::not_found("plot", id).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            EngineError::validation("missing FAR").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            EngineError::InvalidBody("expected value".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EngineError::from(StoreError::Corrupt("bad row".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_illegal_transition_is_validation() {
        let err: EngineError = IllegalTransition {
            from: MatchStatus::Rejected,
            to: MatchStatus::Accepted,
        }
        .into();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(err.to_string(), "match cannot move from REJECTED to ACCEPTED");
    }

    #[test]
    fn test_not_found_message() {
        let id = Uuid::nil();
        let err = EngineError::not_found("project", id);
        assert_eq!(err.to_string(), format!("project {} not found", id));
    }
}
