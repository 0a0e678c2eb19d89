//! Marquee protocol types and payload validation
//!
//! This crate defines the movie record shared by the catalog and the HTTP
//! adapter, the schema checks applied to create and update payloads, and the
//! errors callers can observe.

pub mod errors;
pub mod movie;
pub mod validation;

pub use errors::MovieError;
pub use movie::{Genre, Movie, MovieDraft, MoviePatch};
pub use validation::{
    validate_movie, validate_partial_movie, IssueCode, MovieValidator, PathSegment,
    ValidationErrors, ValidationIssue, ValidatorConfig,
};

/// Result type for movie service operations
pub type Result<T> = std::result::Result<T, MovieError>;
