//! aocboard Storage Layer
//!
//! Process-local state shared between the refresh loop and command handlers.
//! Nothing here is persisted; a restart starts from an empty cache.
//!
//! # Architecture
//!
//! - **LeaderboardCache**: latest snapshot, swapped atomically by the refresh loop
//! - **CredentialStore**: session cookie, reloadable from the environment
//!
//! # Usage
//!
//! ```rust
//! use aocboard_store::LeaderboardCache;
//!
//! let cache = LeaderboardCache::new();
//! assert!(!cache.has_cache());
//! assert!(cache.top_n(10).is_empty());
//! ```

#![warn(clippy::all)]

// Modules
mod cache;
mod credential_store;

// Re-exports
pub use cache::LeaderboardCache;
pub use credential_store::CredentialStore;
