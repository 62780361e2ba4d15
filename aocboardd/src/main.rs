//! aocboard Daemon
//!
//! Private leaderboard cache and command server.
//!
//! # Usage
//!
//! ```bash
//! # Start with the required settings
//! AOC_SESSION_COOKIE=... AOC_LEADERBOARD_ID=12345 AOC_JOIN_CODE=12345-abcdef01 cargo run -p aocboardd
//!
//! # Start on another port with verbose logs
//! RUST_LOG=aocboardd=debug AOCBOARD_API_PORT=8081 cargo run -p aocboardd
//! ```
//!
//! # Environment Variables
//!
//! - `AOCBOARD_ENV`: Environment (test, development, production)
//! - `AOCBOARD_API_HOST`: API host (default: 0.0.0.0)
//! - `AOCBOARD_API_PORT`: API port (default: 8080)
//! - `AOCBOARD_ADMIN_TOKEN`: Bearer token for reauthenticate (unset disables it)
//! - `AOC_SESSION_COOKIE`: Session cookie (required)
//! - `AOC_BASE_URL`: Event site (default: https://adventofcode.com)
//! - `AOC_YEAR`: Event year (default: current year)
//! - `AOC_LEADERBOARD_ID`: Private leaderboard id (required)
//! - `AOC_JOIN_CODE`: Private leaderboard join code (required)
//! - `AOC_REFRESH_INTERVAL_SECS`: Refresh period (default: 3600)
//! - `AOC_REQUEST_TIMEOUT_SECS`: Fetch timeout (default: 10)

use aocboardd::{Config, Daemon};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("aocboardd=info".parse()?))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        api_host = %config.api.host,
        api_port = config.api.port,
        leaderboard = %config.leaderboard.leaderboard_link(),
        "aocboard Daemon"
    );

    // Create and run daemon
    let daemon = Daemon::new(config)?;
    daemon.run().await?;

    Ok(())
}
