//! Stub implementations for testing.
//!
//! Simulates the leaderboard API without making real requests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use aocboard_domain::SessionToken;

use crate::aoc_rest::RemoteFetchError;
use crate::ports::LeaderboardSource;

// =============================================================================
// Stub Leaderboard Source
// =============================================================================

/// Stub leaderboard source.
///
/// Returns queued responses in order, then falls back to the default response.
/// Records the session cookie of every call.
pub struct StubLeaderboardSource {
    /// Responses to hand out before the default
    queued: Mutex<VecDeque<Result<Value, RemoteFetchError>>>,
    /// Response once the queue is drained
    default_response: Mutex<Result<Value, RemoteFetchError>>,
    /// Session values seen, in call order
    sessions: Mutex<Vec<String>>,
}

impl StubLeaderboardSource {
    /// Create a stub that always returns `body`.
    pub fn new(body: Value) -> Self {
        Self::with_default(Ok(body))
    }

    /// Create a stub that always fails with `error`.
    pub fn failing(error: RemoteFetchError) -> Self {
        Self::with_default(Err(error))
    }

    fn with_default(default_response: Result<Value, RemoteFetchError>) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            default_response: Mutex::new(default_response),
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Queue a one-off response.
    pub fn push_response(&self, response: Result<Value, RemoteFetchError>) {
        lock(&self.queued).push_back(response);
    }

    /// Replace the default response.
    pub fn set_default(&self, response: Result<Value, RemoteFetchError>) {
        *lock(&self.default_response) = response;
    }

    /// Number of fetches made so far.
    pub fn call_count(&self) -> usize {
        lock(&self.sessions).len()
    }

    /// Session cookie values seen, in call order.
    pub fn sessions_seen(&self) -> Vec<String> {
        lock(&self.sessions).clone()
    }
}

#[async_trait]
impl LeaderboardSource for StubLeaderboardSource {
    async fn fetch_leaderboard(&self, session: &SessionToken) -> Result<Value, RemoteFetchError> {
        lock(&self.sessions).push(session.expose().to_string());

        if let Some(response) = lock(&self.queued).pop_front() {
            return response;
        }
        lock(&self.default_response).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =============================================================================
// Tests
// =============================================================================
