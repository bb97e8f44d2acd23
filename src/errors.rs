use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::handlers::response::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Blocking task failed: {0}")]
    Blocking(#[from] BlockingError),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Domain(e) => e.kind(),
            AppError::Blocking(_) => "INTERNAL",
        }
    }

    /// Text shown to the client. Internal details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Domain(DomainError::Internal(_)) | AppError::Blocking(_) => {
                "Internal server error".to_string()
            }
            AppError::Domain(e) => e.to_string(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(e) => match e {
                DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
                DomainError::Unauthenticated => StatusCode::UNAUTHORIZED,
                DomainError::InvalidCode
                | DomainError::SeatsExhausted
                | DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                DomainError::ClaimNotActive | DomainError::Conflict(_) => StatusCode::CONFLICT,
                DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(ApiResponse::<()>::failure(
            self.kind(),
            self.public_message(),
        ))
    }
}
