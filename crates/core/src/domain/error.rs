// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error ({field}): {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Invalid age range: {min}..={max}")]
    InvalidRange { min: i32, max: i32 },
}

pub type Result<T> = std::result::Result<T, DomainError>;
