use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, LoanEngineError>;

#[derive(Error, Debug)]
pub enum LoanEngineError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Underwriting error: {0}")]
    Underwriting(#[from] underwriting_core::Error),

    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    #[error("Loan not found: {0}")]
    LoanNotFound(Uuid),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for LoanEngineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        LoanEngineError::Validation(errors.to_string())
    }
}

impl ResponseError for LoanEngineError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(json!({
            "error": {
                "code": status_code.as_u16(),
                "message": error_message,
                "type": self.error_type()
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            LoanEngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LoanEngineError::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LoanEngineError::Validation(_) => StatusCode::BAD_REQUEST,
            LoanEngineError::Underwriting(underwriting_core::Error::InvalidArgument(_)) => {
                StatusCode::BAD_REQUEST
            }
            LoanEngineError::Underwriting(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LoanEngineError::CustomerNotFound(_) => StatusCode::NOT_FOUND,
            LoanEngineError::LoanNotFound(_) => StatusCode::NOT_FOUND,
            LoanEngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl LoanEngineError {
    fn error_type(&self) -> &str {
        match self {
            LoanEngineError::Database(_) => "database_error",
            LoanEngineError::Migration(_) => "database_error",
            LoanEngineError::Validation(_) => "validation_error",
            LoanEngineError::Underwriting(underwriting_core::Error::InvalidArgument(_)) => {
                "invalid_argument"
            }
            LoanEngineError::Underwriting(_) => "underwriting_error",
            LoanEngineError::CustomerNotFound(_) => "not_found",
            LoanEngineError::LoanNotFound(_) => "not_found",
            LoanEngineError::Internal(_) => "internal_error",
        }
    }
}
