//! Configuration models and environment detection.
//!
//! This crate owns the Confab config schema and the detection of
//! deployment facts (remote-store credentials, writable data directory)
//! consumed by the service binary.

mod error;
mod model;

/// Public error type returned by config detection and validation APIs.
pub use error::ConfigError;
/// Configuration schema models.
pub use model::*;
