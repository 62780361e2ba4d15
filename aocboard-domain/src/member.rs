//! Member records built from the per-member leaderboard JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::starboard::{CompletionGrid, CompletionSummary};
use crate::value_objects::{DomainError, NumericField};

/// Label used when a participant has no public name.
pub const ANONYMOUS_NAME: &str = "Anonymous User";

/// Member entry as sent by the API.
#[derive(Debug, Deserialize)]
struct RawMember {
    name: Option<String>,
    id: NumericField,
    stars: u32,
    completion_day_level: Value,
    local_score: u64,
    global_score: u64,
}

/// One participant of the private leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRecord {
    /// Public name, or [`ANONYMOUS_NAME`]
    pub display_name: String,
    /// Numeric member id
    pub member_id: u64,
    /// Total stars
    pub star_count: u32,
    /// Per-day completion
    pub grid: CompletionGrid,
    /// Completion counts folded from `grid`
    pub summary: CompletionSummary,
    /// Score within the private leaderboard
    pub local_score: u64,
    /// Score on the global leaderboard
    pub global_score: u64,
}

impl MemberRecord {
    /// Build a member from its raw JSON object.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidInput` on a missing or mistyped field, a
    /// non-integer `id`, or a malformed `completion_day_level`.
    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let raw = RawMember::deserialize(value)
            .map_err(|e| DomainError::invalid_input(format!("member: {e}")))?;

        let member_id = raw.id.to_u64("member id")?;
        let grid = CompletionGrid::from_json(&raw.completion_day_level)?;

        let display_name = match raw.name {
            Some(name) if !name.is_empty() => name,
            _ => ANONYMOUS_NAME.to_string(),
        };

        Ok(Self {
            display_name,
            member_id,
            star_count: raw.stars,
            summary: grid.summary(),
            grid,
            local_score: raw.local_score,
            global_score: raw.global_score,
        })
    }

    /// Whether the member has no public name.
    pub fn is_anonymous(&self) -> bool {
        self.display_name == ANONYMOUS_NAME
    }

    /// Name shown to users; anonymous members get their id appended so they can
    /// be told apart.
    pub fn label(&self) -> String {
        if self.is_anonymous() {
            format!("{} #{}", self.display_name, self.member_id)
        } else {
            self.display_name.clone()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
