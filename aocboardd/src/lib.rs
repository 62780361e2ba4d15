//! aocboard Daemon Library
//!
//! Keeps a cached copy of an Advent of Code private leaderboard and serves
//! leaderboard commands from it.
//!
//! # Architecture
//!
//! ```text
//! Event API ──► Refresher ──► LeaderboardCache ◄── API Server ◄── Commands
//!                  ▲                                   │
//!                  └──────── CredentialStore ◄─────────┘ (reauthenticate)
//! ```
//!
//! # Components
//!
//! - **Daemon**: Main runtime orchestrator
//! - **Refresher**: Periodic fetch, build and swap loop
//! - **Commands**: Table rendering and command replies
//! - **API**: HTTP endpoints for the command surface
//! - **Config**: Environment-based configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use aocboardd::{Config, Daemon};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("Failed to load config");
//!     let daemon = Daemon::new(config).expect("Session cookie not set");
//!     daemon.run().await.expect("Daemon error");
//! }
//! ```

#![warn(clippy::all)]

pub mod api;
pub mod commands;
pub mod config;
pub mod daemon;
pub mod error;
pub mod refresher;

// Re-exports for convenience
pub use api::{create_router, ApiState, CommandSettings};
pub use config::{ApiConfig, Config, Environment, LeaderboardConfig};
pub use daemon::Daemon;
pub use error::{DaemonError, DaemonResult, RefreshError};
pub use refresher::{LeaderboardRefresher, RefreshStats};
