// probity-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbityError {
    // --- DOMAIN ERRORS (rule sets, operators, attributes) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, parsing, drivers) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATION ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unsafe path traversal detected: {0}")]
    UnsafePath(String),
}

impl ProbityError {
    /// Configuration and rule errors abort a check; everything else is data.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, ProbityError::Domain(_))
    }
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for ProbityError {
    fn from(err: std::io::Error) -> Self {
        ProbityError::Infrastructure(InfrastructureError::Io(err))
    }
}
