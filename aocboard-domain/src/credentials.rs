//! Session Credential Domain Types
//!
//! The private leaderboard endpoint is authorized by the `session` cookie of a
//! logged-in account. The token is a secret:
//!
//! - Never logged (`Debug` is redacted)
//! - Never serialized
//! - Zeroized when dropped

use std::fmt;
use zeroize::Zeroizing;

/// Environment variable holding the session cookie.
pub const DEFAULT_SESSION_ENV_VAR: &str = "AOC_SESSION_COOKIE";

// =============================================================================
// Session Token
// =============================================================================

/// Session cookie value used to authenticate leaderboard fetches.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(Zeroizing<String>);

impl SessionToken {
    /// Wrap a raw cookie value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Raw cookie value, for building the request header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the token carries no value.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Credential-related errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// The environment variable is unset or blank
    #[error("Session credential environment variable {var} is not set")]
    Missing {
        /// Name of the variable that was read
        var: String,
    },
}

// =============================================================================
// Tests
// =============================================================================
