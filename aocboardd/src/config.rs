//! Daemon configuration.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The session cookie itself is not part of the config; it is read by the
//! `CredentialStore` so it can be reloaded at runtime.

use crate::error::{DaemonError, DaemonResult};
use aocboard_connectors::{AOC_BASE_URL, REQUEST_TIMEOUT_SECS};
use aocboard_domain::DEFAULT_SESSION_ENV_VAR;
use chrono::{Datelike, Utc};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default refresh period (one hour).
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 3600;

// =============================================================================
// Configuration
// =============================================================================

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Leaderboard configuration
    pub leaderboard: LeaderboardConfig,

    /// Environment (test, development, production)
    pub environment: Environment,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Bearer token for administrative commands; `None` disables them
    pub admin_token: Option<String>,
}

/// Leaderboard configuration.
#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    /// Event API base URL
    pub base_url: String,
    /// Event year
    pub year: i32,
    /// Private leaderboard id
    pub leaderboard_id: u64,
    /// Code members use to join the private leaderboard
    pub join_code: String,
    /// Environment variable holding the session cookie
    pub session_env_var: String,
    /// Time between refreshes
    pub refresh_interval: Duration,
    /// Timeout for one fetch
    pub request_timeout: Duration,
}

impl LeaderboardConfig {
    /// Browser link to the full private leaderboard.
    pub fn leaderboard_link(&self) -> String {
        format!(
            "{}/{}/leaderboard/private/view/{}",
            self.base_url.trim_end_matches('/'),
            self.year,
            self.leaderboard_id
        )
    }
}

/// Environment type.
///
/// Informational only: it is reported at startup and does not change behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment (`Config::test`)
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> DaemonResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> DaemonResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Self::load_environment(&lookup)?;
        let api = Self::load_api_config(&lookup)?;
        let leaderboard = Self::load_leaderboard_config(&lookup)?;

        Ok(Self {
            api,
            leaderboard,
            environment,
        })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                admin_token: Some("test-admin-token".to_string()),
            },
            leaderboard: LeaderboardConfig {
                base_url: AOC_BASE_URL.to_string(),
                year: 2018,
                leaderboard_id: 12345,
                join_code: "12345-abcdef01".to_string(),
                session_env_var: DEFAULT_SESSION_ENV_VAR.to_string(),
                refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
                request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            },
            environment: Environment::Test,
        }
    }

    fn load_environment<F>(lookup: &F) -> DaemonResult<Environment>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_str = lookup("AOCBOARD_ENV").unwrap_or_else(|| "development".to_string());

        match env_str.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(DaemonError::Config(format!(
                "Invalid AOCBOARD_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }

    fn load_api_config<F>(lookup: &F) -> DaemonResult<ApiConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("AOCBOARD_API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = Self::load_parsed(lookup, "AOCBOARD_API_PORT", 8080u16)?;
        let admin_token = lookup("AOCBOARD_ADMIN_TOKEN").filter(|t| !t.trim().is_empty());

        Ok(ApiConfig {
            host,
            port,
            admin_token,
        })
    }

    fn load_leaderboard_config<F>(lookup: &F) -> DaemonResult<LeaderboardConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("AOC_BASE_URL").unwrap_or_else(|| AOC_BASE_URL.to_string());
        let year = Self::load_parsed(lookup, "AOC_YEAR", Utc::now().year())?;
        let leaderboard_id = Self::load_required::<u64, F>(lookup, "AOC_LEADERBOARD_ID")?;
        let join_code = Self::load_required::<String, F>(lookup, "AOC_JOIN_CODE")?;

        let refresh_secs =
            Self::load_parsed(lookup, "AOC_REFRESH_INTERVAL_SECS", DEFAULT_REFRESH_INTERVAL_SECS)?;
        if refresh_secs == 0 {
            return Err(DaemonError::Config(
                "AOC_REFRESH_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        let timeout_secs = Self::load_parsed(lookup, "AOC_REQUEST_TIMEOUT_SECS", REQUEST_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(DaemonError::Config(
                "AOC_REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(LeaderboardConfig {
            base_url,
            year,
            leaderboard_id,
            join_code,
            session_env_var: DEFAULT_SESSION_ENV_VAR.to_string(),
            refresh_interval: Duration::from_secs(refresh_secs),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn load_parsed<T, F>(lookup: &F, key: &str, default: T) -> DaemonResult<T>
    where
        T: FromStr,
        F: Fn(&str) -> Option<String>,
    {
        match lookup(key) {
            Some(val) => val
                .trim()
                .parse::<T>()
                .map_err(|_| DaemonError::Config(format!("Invalid {} value: {}", key, val))),
            None => Ok(default),
        }
    }

    fn load_required<T, F>(lookup: &F, key: &str) -> DaemonResult<T>
    where
        T: FromStr,
        F: Fn(&str) -> Option<String>,
    {
        let val = lookup(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| DaemonError::Config(format!("{} is required but not set", key)))?;

        val.trim()
            .parse::<T>()
            .map_err(|_| DaemonError::Config(format!("Invalid {} value: {}", key, val)))
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
