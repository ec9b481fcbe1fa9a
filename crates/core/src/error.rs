// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
///
/// Every service operation fails with exactly one of these kinds. Callers
/// (the shell, tests) match on the variant; the message is for humans.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    #[error("Duplicate email: {0}")]
    DuplicateEmail(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Short machine-friendly kind, used in structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Domain(crate::domain::DomainError::Validation { .. }) => "validation",
            AppError::Domain(crate::domain::DomainError::InvalidRange { .. }) => "invalid_range",
            AppError::DuplicateName(_) => "duplicate_name",
            AppError::DuplicateEmail(_) => "duplicate_email",
            AppError::InvalidReference(_) => "invalid_reference",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Storage(_) => "storage",
            AppError::Config(_) => "config",
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite
// by converting to AppError::Storage(String)
