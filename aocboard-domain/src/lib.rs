//! aocboard Domain Layer
//!
//! Pure leaderboard model with zero I/O dependencies: the per-day starboard,
//! member records and the ranked snapshot, plus the session credential type.
//!
//! Every builder takes raw `serde_json::Value` from the event API and fails
//! fast with [`DomainError::InvalidInput`] on a shape mismatch.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod credentials;
pub mod leaderboard;
pub mod member;
pub mod starboard;
pub mod value_objects;

// Re-export commonly used types
pub use credentials::{CredentialError, SessionToken, DEFAULT_SESSION_ENV_VAR};
pub use leaderboard::LeaderboardSnapshot;
pub use member::{MemberRecord, ANONYMOUS_NAME};
pub use starboard::{CompletionGrid, CompletionSummary, DayProgress, EVENT_DAYS};
pub use value_objects::{DomainError, NumericField};
