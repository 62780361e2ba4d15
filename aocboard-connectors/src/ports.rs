//! Port for leaderboard sources.
//!
//! The refresh loop only depends on this trait, so it runs unchanged against
//! the real API client or a stub.
//!
//! Implementations:
//! - `AocRestClient` - Advent of Code private leaderboard API
//! - `StubLeaderboardSource` - Scripted responses for tests

use async_trait::async_trait;
use serde_json::Value;

use aocboard_domain::SessionToken;

use crate::aoc_rest::{AocRestClient, RemoteFetchError};

/// Source of raw leaderboard documents.
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    /// Fetch the current raw leaderboard JSON using `session`.
    ///
    /// # Returns
    ///
    /// The parsed body on success. Implementations never return partial data.
    async fn fetch_leaderboard(&self, session: &SessionToken) -> Result<Value, RemoteFetchError>;
}

#[async_trait]
impl LeaderboardSource for AocRestClient {
    async fn fetch_leaderboard(&self, session: &SessionToken) -> Result<Value, RemoteFetchError> {
        self.get_leaderboard(session).await
    }
}
