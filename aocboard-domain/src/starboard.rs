//! Starboard: per-day two-star completion record for one participant.
//!
//! The upstream API reports progress as
//! `completion_day_level: { "<day>": { "<star>": {...} } }` where day keys are
//! 1-indexed strings and star keys are `"1"` and/or `"2"`. A day that is absent
//! has no stars.

use serde::Serialize;
use serde_json::Value;

use crate::value_objects::DomainError;

/// Number of puzzle days in one event.
pub const EVENT_DAYS: usize = 25;

// =============================================================================
// DayProgress
// =============================================================================

/// Completion state of one day.
///
/// Part two can only be solved after part one, so the state is a ladder rather
/// than two independent flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayProgress {
    /// No star earned
    #[default]
    NotStarted,
    /// First star only
    PartOne,
    /// Both stars
    BothParts,
}

impl DayProgress {
    /// Whether the first star is earned.
    pub fn part_one_done(&self) -> bool {
        !matches!(self, DayProgress::NotStarted)
    }

    /// Whether the second star is earned.
    pub fn part_two_done(&self) -> bool {
        matches!(self, DayProgress::BothParts)
    }

    /// The `(part_one_done, part_two_done)` pair.
    pub fn as_pair(&self) -> (bool, bool) {
        (self.part_one_done(), self.part_two_done())
    }
}

// =============================================================================
// CompletionSummary
// =============================================================================

/// Count of days with part one and part two completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CompletionSummary {
    /// Days with at least the first star
    pub part_one: u32,
    /// Days with both stars
    pub part_two: u32,
}

// =============================================================================
// CompletionGrid
// =============================================================================

/// Fixed 25-slot grid, slot `i` holds day `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionGrid {
    days: [DayProgress; EVENT_DAYS],
}

impl Default for CompletionGrid {
    fn default() -> Self {
        Self {
            days: [DayProgress::NotStarted; EVENT_DAYS],
        }
    }
}

impl CompletionGrid {
    /// Parse a `completion_day_level` object.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidInput` if the value is not an object, a day
    /// key is not an integer in `1..=25`, or a day entry is not an object.
    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let days = value.as_object().ok_or_else(|| {
            DomainError::invalid_input(format!(
                "completion_day_level must be an object, got {}",
                json_kind(value)
            ))
        })?;

        let mut grid = Self::default();

        for (key, stars) in days {
            let slot = day_slot(key)?;

            let stars = stars.as_object().ok_or_else(|| {
                DomainError::invalid_input(format!(
                    "completion for day {key} must be an object, got {}",
                    json_kind(stars)
                ))
            })?;

            // A present day always carries the first star.
            grid.days[slot] = if stars.contains_key("2") {
                DayProgress::BothParts
            } else {
                DayProgress::PartOne
            };
        }

        Ok(grid)
    }

    /// Progress for a 1-indexed day, `None` outside `1..=25`.
    pub fn day(&self, day: usize) -> Option<DayProgress> {
        day.checked_sub(1).and_then(|i| self.days.get(i)).copied()
    }

    /// All 25 slots in day order.
    pub fn days(&self) -> &[DayProgress; EVENT_DAYS] {
        &self.days
    }

    /// Fold the grid into per-part completion counts.
    pub fn summary(&self) -> CompletionSummary {
        self.days
            .iter()
            .fold(CompletionSummary::default(), |mut acc, day| {
                if day.part_one_done() {
                    acc.part_one += 1;
                }
                if day.part_two_done() {
                    acc.part_two += 1;
                }
                acc
            })
    }
}

/// Convert a 1-indexed day key to a slot index.
fn day_slot(key: &str) -> Result<usize, DomainError> {
    // Canonical decimal only: no sign, no leading zeros, no whitespace.
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && !key.starts_with('0');
    if !canonical {
        return Err(DomainError::invalid_input(format!(
            "day key is not a day number: {key:?}"
        )));
    }

    let day: usize = key
        .parse()
        .map_err(|_| DomainError::invalid_input(format!("day key is not a day number: {key:?}")))?;

    if !(1..=EVENT_DAYS).contains(&day) {
        return Err(DomainError::invalid_input(format!(
            "day key out of range 1..={EVENT_DAYS}: {day}"
        )));
    }

    Ok(day - 1)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Tests
// =============================================================================
