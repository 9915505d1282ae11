use crate::expense::TotalsOverflow;
use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use finance_repo::expense_repo::ExpenseRepoError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    ExpenseRepoError(#[from] ExpenseRepoError),
    #[error(transparent)]
    TotalsOverflow(#[from] TotalsOverflow),
}

impl HandlerError {
    /// Message sent to the client. The underlying error chain only goes to the log.
    fn client_message(&self) -> String {
        match self {
            HandlerError::ExpenseRepoError(e @ ExpenseRepoError::ExpenseNotFound(_)) => {
                e.to_string()
            }
            HandlerError::ExpenseRepoError(ExpenseRepoError::StorageUnavailable(_)) => {
                "Storage unavailable".to_owned()
            }
            HandlerError::ExpenseRepoError(ExpenseRepoError::Other(_)) => {
                "Internal server error".to_owned()
            }
            HandlerError::TotalsOverflow(e) => e.to_string(),
        }
    }
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::ExpenseRepoError(ExpenseRepoError::ExpenseNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            HandlerError::ExpenseRepoError(ExpenseRepoError::StorageUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            HandlerError::ExpenseRepoError(ExpenseRepoError::Other(_))
            | HandlerError::TotalsOverflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {:#}", self);
        }
        let error_body = serde_json::json!({
            "error": self.client_message(),
        });
        HttpResponse::build(status).json(error_body)
    }
}
