//! Error types for config detection and validation.

use thiserror::Error;

/// Errors returned while detecting or validating config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A specific field failed validation.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// Generic validation failure.
    #[error("invalid config: {0}")]
    Invalid(String),
}
