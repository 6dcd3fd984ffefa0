//! Error types for glob parsing

use thiserror::Error;

/// Errors raised while parsing an attribute glob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlobError {
    /// The pattern is empty (or only a negation marker)
    #[error("Invalid attribute glob: empty pattern {0:?}")]
    EmptyPattern(String),

    /// The pattern contains an empty path segment (e.g. `user..name`)
    #[error("Invalid attribute glob: empty path segment in {0:?}")]
    EmptySegment(String),

    /// A path segment holds more than one wildcard (e.g. `*a*`)
    #[error("Invalid attribute glob: more than one wildcard in a segment of {0:?}")]
    RepeatedWildcard(String),
}

/// Result type for glob operations.
pub type GlobResult<T> = Result<T, GlobError>;
