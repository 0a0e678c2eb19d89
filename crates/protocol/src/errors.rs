//! Movie service errors module

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors surfaced to API callers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MovieError {
    #[error("Validation failed: {errors}")]
    ValidationFailed { errors: ValidationErrors },

    #[error("Movie not found: {id}")]
    NotFound { id: String },
}

impl MovieError {
    /// Human-readable message for a missing record, as returned to clients.
    pub const NOT_FOUND_MESSAGE: &'static str = "Movie not found";

    pub fn not_found(id: impl Into<String>) -> Self {
        MovieError::NotFound { id: id.into() }
    }
}

impl From<ValidationErrors> for MovieError {
    fn from(errors: ValidationErrors) -> Self {
        MovieError::ValidationFailed { errors }
    }
}
