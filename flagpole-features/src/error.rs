//! Error types for the feature registry.
//!
//! Flag queries never fail; a missing flag reads as a default. Errors only
//! come from configuration and from loading stored definitions.

use thiserror::Error;

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors raised by a [`DefinitionLoader`](crate::DefinitionLoader).
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Underlying storage could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data is not a list of feature definitions
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Backend is not reachable or not set up
    #[error("Loader unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for LoaderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Deserialization(err.to_string())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Registry-level errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A reload was requested but no loader was configured
    #[error("No definition loader configured")]
    NoLoader,

    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
