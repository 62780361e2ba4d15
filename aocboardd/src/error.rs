//! Daemon error types.

use aocboard_connectors::RemoteFetchError;
use aocboard_domain::{CredentialError, DomainError};
use thiserror::Error;

/// Daemon-level errors.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Credential error
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// API server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Result type for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;

/// Failure of one refresh attempt.
///
/// Contained within the attempt: the loop logs it and keeps the cached snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// The leaderboard could not be fetched
    #[error("Fetch failed: {0}")]
    Fetch(#[from] RemoteFetchError),

    /// The fetched document could not be built into a snapshot
    #[error("Build failed: {0}")]
    Build(#[from] DomainError),
}
