use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Forbidden: {0}")]
    Forbidden(&'static str),
    #[error("The code you entered is incorrect")]
    InvalidCode,
    #[error("All the seats are already taken at this table")]
    SeatsExhausted,
    #[error("Table claim has been closed and ordering new dishes is not possible")]
    ClaimNotActive,
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("Conflict: {0}")]
    Conflict(&'static str),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Stable machine-readable classification used in response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::NotFound(_) => "NOT_FOUND",
            DomainError::Forbidden(_) => "FORBIDDEN",
            DomainError::InvalidCode => "INVALID_CODE",
            DomainError::SeatsExhausted => "SEATS_EXHAUSTED",
            DomainError::ClaimNotActive => "CLAIM_NOT_ACTIVE",
            DomainError::Unauthenticated => "UNAUTHENTICATED",
            DomainError::Conflict(_) => "CONFLICT",
            DomainError::InvalidInput(_) => "INVALID_INPUT",
            DomainError::Internal(_) => "INTERNAL",
        }
    }
}
