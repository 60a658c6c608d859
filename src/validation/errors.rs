//! Validation errors
//!
//! Messages are shown to the operator verbatim before a re-prompt.

use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty!")]
    Empty { field: String },

    #[error("{field} contains invalid character: '{found}'. Only letters, numbers, and basic punctuation allowed.")]
    InvalidCharacter { field: String, found: char },

    #[error("{field} can only contain letters! Found invalid character: '{found}'")]
    LettersOnly { field: String, found: char },

    #[error("{field} must be a valid number!")]
    NotANumber { field: String },

    #[error("{field} must be between {min} and {max}!")]
    OutOfRange { field: String, min: String, max: String },

    #[error("Invalid date '{0}'! Please use YYYY-MM-DD (e.g., 2025-11-01)")]
    InvalidDate(String),

    #[error("{field} cannot contain '{found}'")]
    ReservedCharacter { field: String, found: char },
}
