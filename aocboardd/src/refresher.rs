//! Leaderboard Refresher: background loop keeping the cache current.
//!
//! Each cycle reads the current session cookie, fetches the leaderboard,
//! builds a fresh snapshot and swaps it into the cache. A failed cycle keeps
//! the cached snapshot (stale data beats no data) and the loop carries on at
//! its normal interval.
//!
//! ```text
//!   ┌──────┐  tick   ┌────────────┐
//!   │ Idle │ ──────► │ Refreshing │
//!   └──────┘ ◄────── └────────────┘
//!          success or failure
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use aocboard_connectors::LeaderboardSource;
use aocboard_domain::LeaderboardSnapshot;
use aocboard_store::{CredentialStore, LeaderboardCache};

use crate::error::RefreshError;

// =============================================================================
// Refresh Statistics
// =============================================================================

/// Outcome counters of the refresh loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshStats {
    /// Attempts made
    pub attempts: u64,
    /// Attempts that failed
    pub failures: u64,
    /// Failures since the last success
    pub consecutive_failures: u32,
    /// When the last successful attempt finished
    pub last_success_at: Option<DateTime<Utc>>,
    /// Error of the last attempt, if it failed
    pub last_error: Option<String>,
}

impl RefreshStats {
    fn record_success(&mut self) {
        self.attempts += 1;
        self.consecutive_failures = 0;
        self.last_success_at = Some(Utc::now());
        self.last_error = None;
    }

    fn record_failure(&mut self, error: &RefreshError) {
        self.attempts += 1;
        self.failures += 1;
        self.consecutive_failures += 1;
        self.last_error = Some(error.to_string());
    }
}

// =============================================================================
// Leaderboard Refresher
// =============================================================================

/// Sole writer of the leaderboard cache.
pub struct LeaderboardRefresher {
    /// Where leaderboards come from
    source: Arc<dyn LeaderboardSource>,
    /// Cache shared with command handlers
    cache: Arc<LeaderboardCache>,
    /// Session cookie holder
    credentials: Arc<CredentialStore>,
    /// Time between attempts
    interval: Duration,
    /// Outcome counters
    stats: Mutex<RefreshStats>,
}

impl LeaderboardRefresher {
    /// Create a new refresher.
    pub fn new(
        source: Arc<dyn LeaderboardSource>,
        cache: Arc<LeaderboardCache>,
        credentials: Arc<CredentialStore>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            credentials,
            interval,
            stats: Mutex::new(RefreshStats::default()),
        }
    }

    /// Run one fetch, build and swap cycle.
    ///
    /// On error the cache is left untouched.
    pub async fn refresh_once(&self) -> Result<Arc<LeaderboardSnapshot>, RefreshError> {
        // Captured once: a reload during the fetch applies from the next cycle.
        let session = self.credentials.get();

        let raw = self.source.fetch_leaderboard(&session).await?;
        let snapshot = LeaderboardSnapshot::from_json(&raw)?;

        Ok(self.cache.replace(snapshot))
    }

    /// Start the loop in the background.
    ///
    /// The first refresh runs immediately. Returns a JoinHandle that finishes
    /// once `shutdown` is cancelled.
    pub fn start(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    /// Run the loop until `shutdown` is cancelled.
    ///
    /// Cycles never overlap: the next sleep only starts after the current
    /// attempt has finished.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(interval_secs = self.interval.as_secs(), "Leaderboard refresher started");

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = self.refresh_and_record() => {}
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!("Leaderboard refresher stopped");
    }

    /// Snapshot of the outcome counters.
    pub fn stats(&self) -> RefreshStats {
        self.stats
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Configured interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    async fn refresh_and_record(&self) {
        debug!("Refreshing leaderboard");
        let result = self.refresh_once().await;

        let mut stats = self.stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        match result {
            Ok(snapshot) => {
                stats.record_success();
                info!(
                    members = snapshot.len(),
                    event_year = snapshot.event_year(),
                    "Leaderboard refreshed"
                );
            }
            Err(e) => {
                stats.record_failure(&e);
                let kept = self.cache.has_cache();
                match &e {
                    RefreshError::Fetch(fetch) => warn!(
                        error = %fetch,
                        status = ?fetch.status_code(),
                        consecutive_failures = stats.consecutive_failures,
                        kept_cached = kept,
                        "Leaderboard fetch failed, keeping cached snapshot"
                    ),
                    RefreshError::Build(build) => error!(
                        error = %build,
                        consecutive_failures = stats.consecutive_failures,
                        kept_cached = kept,
                        "Leaderboard response malformed, keeping cached snapshot"
                    ),
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use aocboard_connectors::{RemoteFetchError, StubLeaderboardSource};
    use aocboard_domain::SessionToken;
    use serde_json::{json, Value};

    fn leaderboard(owner_id: u64, scores: &[u64]) -> Value {
        let mut members = serde_json::Map::new();
        for (i, score) in scores.iter().enumerate() {
            members.insert(
                i.to_string(),
                json!({
                    "name": format!("member-{i}"),
                    "id": i.to_string(),
                    "stars": 0,
                    "completion_day_level": {},
                    "local_score": score,
                    "global_score": 0
                }),
            );
        }
        json!({ "members": members, "owner_id": owner_id, "event": "2018" })
    }

    fn refresher(
        source: Arc<StubLeaderboardSource>,
        credentials: Arc<CredentialStore>,
    ) -> (Arc<LeaderboardRefresher>, Arc<LeaderboardCache>) {
        let cache = Arc::new(LeaderboardCache::new());
        let refresher = Arc::new(LeaderboardRefresher::new(
            source,
            cache.clone(),
            credentials,
            Duration::from_secs(60),
        ));
        (refresher, cache)
    }

    fn credentials(value: &str) -> Arc<CredentialStore> {
        Arc::new(CredentialStore::new("AOCBOARD_TEST_REFRESHER", SessionToken::new(value)))
    }

    #[tokio::test]
    async fn test_refresh_once_populates_cache() {
        let source = Arc::new(StubLeaderboardSource::new(leaderboard(1, &[10, 30, 20])));
        let (refresher, cache) = refresher(source.clone(), credentials("cookie"));

        let snapshot = refresher.refresh_once().await.unwrap();

        let cached = cache.read().unwrap();
        assert!(Arc::ptr_eq(&snapshot, &cached));
        let scores: Vec<_> = cached.members().iter().map(|m| m.local_score).collect();
        assert_eq!(scores, vec![30, 20, 10]);
        assert_eq!(source.sessions_seen(), vec!["cookie"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_snapshot() {
        let source = Arc::new(StubLeaderboardSource::new(leaderboard(1, &[5])));
        let (refresher, cache) = refresher(source.clone(), credentials("cookie"));

        let before = refresher.refresh_once().await.unwrap();
        source.set_default(Err(RemoteFetchError::Status { status_code: 500 }));

        let err = refresher.refresh_once().await.unwrap_err();

        assert_eq!(err, RefreshError::Fetch(RemoteFetchError::Status { status_code: 500 }));
        assert!(Arc::ptr_eq(&before, &cache.read().unwrap()));
    }

    #[tokio::test]
    async fn test_fetch_failure_on_empty_cache_stays_empty() {
        let source = Arc::new(StubLeaderboardSource::failing(RemoteFetchError::Transport(
            "connection reset".into(),
        )));
        let (refresher, cache) = refresher(source, credentials("cookie"));

        assert!(refresher.refresh_once().await.is_err());
        assert!(cache.read().is_none());
    }

    #[tokio::test]
    async fn test_malformed_response_keeps_previous_snapshot() {
        let source = Arc::new(StubLeaderboardSource::new(leaderboard(1, &[5])));
        let (refresher, cache) = refresher(source.clone(), credentials("cookie"));

        let before = refresher.refresh_once().await.unwrap();
        source.set_default(Ok(json!({ "members": "nope", "owner_id": 1, "event": "2018" })));

        let err = refresher.refresh_once().await.unwrap_err();

        assert!(matches!(err, RefreshError::Build(_)));
        assert!(Arc::ptr_eq(&before, &cache.read().unwrap()));
    }

    #[tokio::test]
    async fn test_reloaded_credential_used_on_next_cycle() {
        let var = "AOCBOARD_TEST_REFRESHER_ROTATE";
        let source = Arc::new(StubLeaderboardSource::new(leaderboard(1, &[5])));
        let store = Arc::new(CredentialStore::new(var, SessionToken::new("old")));
        let (refresher, _cache) = refresher(source.clone(), store.clone());

        refresher.refresh_once().await.unwrap();
        std::env::set_var(var, "new");
        store.reload().unwrap();
        refresher.refresh_once().await.unwrap();
        std::env::remove_var(var);

        assert_eq!(source.sessions_seen(), vec!["old", "new"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_refreshes_on_interval_and_survives_failures() {
        let source = Arc::new(StubLeaderboardSource::new(leaderboard(4, &[1])));
        source.push_response(Ok(leaderboard(1, &[1])));
        source.push_response(Err(RemoteFetchError::Timeout { secs: 10 }));
        source.push_response(Ok(json!({ "owner_id": 3 })));
        let (refresher, cache) = refresher(source.clone(), credentials("cookie"));

        let shutdown = CancellationToken::new();
        let handle = refresher.clone().start(shutdown.clone());

        // First cycle runs immediately
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.call_count(), 1);
        assert_eq!(cache.read().unwrap().owner_id(), 1);

        // t=60: fetch times out, cache kept
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.call_count(), 2);
        assert_eq!(cache.read().unwrap().owner_id(), 1);

        // t=120: malformed body, cache kept
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.call_count(), 3);
        assert_eq!(cache.read().unwrap().owner_id(), 1);

        // t=180: recovers
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.call_count(), 4);
        assert_eq!(cache.read().unwrap().owner_id(), 4);

        let stats = refresher.stats();
        assert_eq!(stats.attempts, 4);
        assert_eq!(stats.failures, 2);
        assert_eq!(stats.consecutive_failures, 0);
        assert!(stats.last_error.is_none());

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_stops_on_shutdown() {
        let source = Arc::new(StubLeaderboardSource::new(leaderboard(1, &[1])));
        let (refresher, _cache) = refresher(source.clone(), credentials("cookie"));

        let shutdown = CancellationToken::new();
        let handle = refresher.start(shutdown.clone());

        tokio::time::sleep(Duration::from_secs(1)).await;
        shutdown.cancel();
        handle.await.unwrap();

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(source.call_count(), 1);
    }

    #[test]
    fn test_stats_track_consecutive_failures() {
        let mut stats = RefreshStats::default();
        let err = RefreshError::Fetch(RemoteFetchError::Status { status_code: 502 });

        stats.record_failure(&err);
        stats.record_failure(&err);
        assert_eq!(stats.consecutive_failures, 2);
        assert!(stats.last_error.as_deref().unwrap().contains("502"));

        stats.record_success();
        assert_eq!(stats.consecutive_failures, 0);
        assert_eq!(stats.failures, 2);
        assert_eq!(stats.attempts, 3);
    }
}
