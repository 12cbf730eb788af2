//! Error types for storage backends.

/// Errors returned by storage backends.
///
/// These never reach append/load callers: the chain degrades to the next
/// tier instead of propagating.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Remote store answered with a non-success status.
    #[error("remote store returned status {0}")]
    RemoteStatus(u16),
}
