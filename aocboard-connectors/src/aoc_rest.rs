//! Advent of Code REST Client for Private Leaderboards
//!
//! Fetches the JSON view of one private leaderboard:
//!
//! `GET {base}/{year}/leaderboard/private/view/{id}.json`
//!
//! # Authentication
//!
//! The endpoint is authorized by the `session` cookie of an account that is a
//! member of the leaderboard. The API also asks automated clients to identify
//! themselves through the `User-Agent` header.

use reqwest::header::{COOKIE, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

use aocboard_domain::SessionToken;

// =============================================================================
// Constants
// =============================================================================

/// Advent of Code base URL
pub const AOC_BASE_URL: &str = "https://adventofcode.com";

/// Identifying user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("aocboard/", env!("CARGO_PKG_VERSION"), " private leaderboard bot");

/// Request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur while fetching a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteFetchError {
    /// Server answered with a status other than 200
    #[error("Leaderboard API returned HTTP {status_code}")]
    Status { status_code: u16 },

    /// Connection, DNS or protocol failure
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// No response within the request timeout
    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// 200 response whose body is not JSON
    #[error("Failed to parse response body: {0}")]
    InvalidBody(String),
}

impl RemoteFetchError {
    /// Whether this is a network-level failure (timeouts included).
    pub fn is_transport(&self) -> bool {
        matches!(self, RemoteFetchError::Transport(_) | RemoteFetchError::Timeout { .. })
    }

    /// HTTP status for `Status` errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RemoteFetchError::Status { status_code } => Some(*status_code),
            _ => None,
        }
    }
}

// =============================================================================
// AoC REST Client
// =============================================================================

/// Client for one private leaderboard of one event year.
pub struct AocRestClient {
    /// HTTP client
    client: Client,
    /// API base URL
    base_url: String,
    /// Event year
    year: i32,
    /// Private leaderboard id
    leaderboard_id: u64,
    /// Per-request timeout
    request_timeout: Duration,
    /// User agent header value
    user_agent: String,
}

impl AocRestClient {
    /// Create a client for the public Advent of Code site.
    ///
    /// # Arguments
    ///
    /// * `year` - Event year, e.g. 2018
    /// * `leaderboard_id` - Private leaderboard id (the owner's member id)
    pub fn new(year: i32, leaderboard_id: u64) -> Self {
        Self {
            client: Client::new(),
            base_url: AOC_BASE_URL.to_string(),
            year,
            leaderboard_id,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Point the client at another host (local test servers, mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Override the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Event year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Private leaderboard id.
    pub fn leaderboard_id(&self) -> u64 {
        self.leaderboard_id
    }

    /// URL of the JSON API view.
    pub fn api_url(&self) -> String {
        format!(
            "{}/{}/leaderboard/private/view/{}.json",
            self.base_url, self.year, self.leaderboard_id
        )
    }

    /// Fetch and parse the leaderboard JSON.
    ///
    /// No partial data is ever returned: any status other than 200 is an error.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = AocRestClient::new(2018, 123456);
    /// let raw = client.get_leaderboard(&SessionToken::new(cookie)).await?;
    /// let snapshot = LeaderboardSnapshot::from_json(&raw)?;
    /// ```
    pub async fn get_leaderboard(&self, session: &SessionToken) -> Result<Value, RemoteFetchError> {
        let url = self.api_url();
        debug!(%url, "Querying private leaderboard API");

        let secs = self.request_timeout.as_secs();

        // One deadline covers the request and reading the body.
        let body = timeout(self.request_timeout, self.send_and_read(&url, session))
            .await
            .map_err(|_| RemoteFetchError::Timeout { secs })??;

        serde_json::from_str(&body).map_err(|e| RemoteFetchError::InvalidBody(e.to_string()))
    }

    async fn send_and_read(&self, url: &str, session: &SessionToken) -> Result<String, RemoteFetchError> {
        let response = self
            .client
            .get(url)
            .header(COOKIE, format!("session={}", session.expose()))
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| RemoteFetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Bad response from leaderboard API, check session cookie");
            return Err(RemoteFetchError::Status {
                status_code: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| RemoteFetchError::Transport(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
