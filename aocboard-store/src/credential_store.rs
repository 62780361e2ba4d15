//! Credential Store: runtime holder for the leaderboard session cookie.
//!
//! Session cookies expire, so the value can be swapped at runtime without
//! restarting the daemon. `reload` re-reads the configured environment
//! variable; on failure the previous value stays in place.
//!
//! # Usage
//!
//! ```rust
//! use aocboard_domain::SessionToken;
//! use aocboard_store::CredentialStore;
//!
//! let store = CredentialStore::new("AOC_SESSION_COOKIE", SessionToken::new("initial"));
//! assert_eq!(store.get().expose(), "initial");
//! ```

use std::env;
use std::sync::RwLock;

use aocboard_domain::{CredentialError, SessionToken};
use tracing::{info, warn};

/// Holder of the current session token.
///
/// Callers of [`CredentialStore::reload`] are authorized upstream; the store
/// trusts them.
pub struct CredentialStore {
    /// Environment variable re-read by `reload`
    env_var: String,
    /// Current token
    current: RwLock<SessionToken>,
}

impl CredentialStore {
    /// Create a store with an initial token.
    pub fn new(env_var: impl Into<String>, initial: SessionToken) -> Self {
        Self {
            env_var: env_var.into(),
            current: RwLock::new(initial),
        }
    }

    /// Create a store seeded from `env_var`.
    ///
    /// # Errors
    /// Returns `CredentialError::Missing` if the variable is unset or blank.
    pub fn from_env(env_var: impl Into<String>) -> Result<Self, CredentialError> {
        let env_var = env_var.into();
        let token = read_env(&env_var)?;
        Ok(Self::new(env_var, token))
    }

    /// The current token.
    ///
    /// A fetch that already took a copy keeps using it even if `reload` runs
    /// in the meantime.
    pub fn get(&self) -> SessionToken {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Re-read the token from the environment.
    ///
    /// # Errors
    /// Returns `CredentialError::Missing` if the variable is unset or blank;
    /// the previous token is kept.
    pub fn reload(&self) -> Result<(), CredentialError> {
        match read_env(&self.env_var) {
            Ok(token) => {
                self.replace(token);
                info!(env_var = %self.env_var, "Session credential reloaded");
                Ok(())
            }
            Err(e) => {
                warn!(env_var = %self.env_var, "Session credential variable is not set, keeping previous value");
                Err(e)
            }
        }
    }

    /// Set the token directly.
    pub fn replace(&self, token: SessionToken) {
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token;
    }

    /// Name of the environment variable read by `reload`.
    pub fn env_var(&self) -> &str {
        &self.env_var
    }
}

fn read_env(var: &str) -> Result<SessionToken, CredentialError> {
    let token = env::var(var).map(SessionToken::new).map_err(|_| CredentialError::Missing {
        var: var.to_string(),
    })?;

    if token.is_empty() {
        return Err(CredentialError::Missing {
            var: var.to_string(),
        });
    }

    Ok(token)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable; tests run in parallel within the process.

    #[test]
    fn test_get_returns_initial() {
        let store = CredentialStore::new("AOCBOARD_TEST_UNUSED", SessionToken::new("first"));

        assert_eq!(store.get().expose(), "first");
        assert_eq!(store.env_var(), "AOCBOARD_TEST_UNUSED");
    }

    #[test]
    fn test_reload_picks_up_new_value() {
        let var = "AOCBOARD_TEST_RELOAD_NEW";
        let store = CredentialStore::new(var, SessionToken::new("old"));

        env::set_var(var, "rotated");
        store.reload().unwrap();

        assert_eq!(store.get().expose(), "rotated");
        env::remove_var(var);
    }

    #[test]
    fn test_reload_missing_keeps_previous() {
        let var = "AOCBOARD_TEST_RELOAD_MISSING";
        env::remove_var(var);
        let store = CredentialStore::new(var, SessionToken::new("still-good"));

        let err = store.reload().unwrap_err();

        assert_eq!(err, CredentialError::Missing { var: var.to_string() });
        assert_eq!(store.get().expose(), "still-good");
    }

    #[test]
    fn test_reload_blank_keeps_previous() {
        let var = "AOCBOARD_TEST_RELOAD_BLANK";
        env::set_var(var, "  ");
        let store = CredentialStore::new(var, SessionToken::new("still-good"));

        assert!(store.reload().is_err());
        assert_eq!(store.get().expose(), "still-good");
        env::remove_var(var);
    }

    #[test]
    fn test_copy_taken_before_reload_is_unchanged() {
        let var = "AOCBOARD_TEST_RELOAD_INFLIGHT";
        let store = CredentialStore::new(var, SessionToken::new("before"));

        let in_flight = store.get();
        env::set_var(var, "after");
        store.reload().unwrap();

        assert_eq!(in_flight.expose(), "before");
        assert_eq!(store.get().expose(), "after");
        env::remove_var(var);
    }

    #[test]
    fn test_from_env() {
        let var = "AOCBOARD_TEST_FROM_ENV";
        env::set_var(var, "seeded");

        let store = CredentialStore::from_env(var).unwrap();
        assert_eq!(store.get().expose(), "seeded");

        env::remove_var(var);
        assert!(CredentialStore::from_env(var).is_err());
    }
}
