//! Error types for rule parsing.

use thiserror::Error;

/// Result type for rule parsing.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Reasons a rule string could not be parsed.
///
/// These never escape evaluation: a rule that fails to parse simply does not
/// match. They are surfaced by the `parse` constructors for callers that want
/// to validate rule text up front.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Rule text was empty or whitespace
    #[error("Empty rule")]
    Empty,

    /// Level operand is not a non-negative integer
    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    /// Level range is not of the form `MIN-MAX`
    #[error("Invalid level range: {0}")]
    InvalidRange(String),

    /// Version operand does not match `INT ("." INT)* ["-" TAG]`
    #[error("Invalid version: {0}")]
    InvalidVersion(String),
}
