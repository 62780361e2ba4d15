//! aocboard Connectors
//!
//! Adapters for the Advent of Code API.
//! Returns raw JSON; decoding into domain types happens in `aocboard-domain`.

#![warn(clippy::all)]

// Public modules
pub mod aoc_rest;
pub mod ports;
pub mod stub;

// Re-exports
pub use aoc_rest::{AocRestClient, RemoteFetchError, AOC_BASE_URL, DEFAULT_USER_AGENT, REQUEST_TIMEOUT_SECS};
pub use ports::LeaderboardSource;
pub use stub::StubLeaderboardSource;
