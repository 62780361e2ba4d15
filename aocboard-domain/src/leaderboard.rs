//! Leaderboard snapshot: one complete, immutable ranking at a point in time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::member::MemberRecord;
use crate::value_objects::{DomainError, NumericField};

/// Private leaderboard document as sent by the API.
#[derive(Debug, Deserialize)]
struct RawLeaderboard {
    members: Map<String, Value>,
    owner_id: NumericField,
    event: NumericField,
}

/// Ranked leaderboard built from one API response.
///
/// # Invariants
/// - `members` is ordered by `local_score` descending
/// - Members with equal `local_score` keep their document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardSnapshot {
    members: Vec<MemberRecord>,
    owner_id: u64,
    event_year: i32,
    last_updated: DateTime<Utc>,
}

impl LeaderboardSnapshot {
    /// Build a snapshot from the raw leaderboard JSON, stamped with the current time.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidInput` if `members`, `owner_id` or `event`
    /// is missing or mistyped, or if any member fails to build.
    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        Self::from_json_at(value, Utc::now())
    }

    /// Build a snapshot with an explicit `last_updated` time.
    pub fn from_json_at(value: &Value, built_at: DateTime<Utc>) -> Result<Self, DomainError> {
        let raw = RawLeaderboard::deserialize(value)
            .map_err(|e| DomainError::invalid_input(format!("leaderboard: {e}")))?;

        let members = raw
            .members
            .iter()
            .map(|(key, member)| {
                MemberRecord::from_json(member).map_err(|e| match e {
                    DomainError::InvalidInput(msg) => {
                        DomainError::invalid_input(format!("member {key}: {msg}"))
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(
            members,
            raw.owner_id.to_u64("owner_id")?,
            raw.event.to_i32("event")?,
            built_at,
        ))
    }

    /// Assemble a snapshot from already-built members, ranking them.
    pub fn new(
        mut members: Vec<MemberRecord>,
        owner_id: u64,
        event_year: i32,
        last_updated: DateTime<Utc>,
    ) -> Self {
        // sort_by is stable: ties keep their incoming order.
        members.sort_by(|a, b| b.local_score.cmp(&a.local_score));

        Self {
            members,
            owner_id,
            event_year,
            last_updated,
        }
    }

    /// Ranked members.
    pub fn members(&self) -> &[MemberRecord] {
        &self.members
    }

    /// The first `n` members, or all of them if there are fewer.
    pub fn top_n(&self, n: usize) -> &[MemberRecord] {
        &self.members[..n.min(self.members.len())]
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the leaderboard has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Leaderboard owner id.
    pub fn owner_id(&self) -> u64 {
        self.owner_id
    }

    /// Event year.
    pub fn event_year(&self) -> i32 {
        self.event_year
    }

    /// When this snapshot was built.
    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn member(name: &str, id: u64, local_score: u64) -> Value {
        json!({
            "name": name,
            "id": id.to_string(),
            "stars": 0,
            "completion_day_level": {},
            "local_score": local_score,
            "global_score": 0
        })
    }

    fn leaderboard(members: Vec<(&str, Value)>) -> Value {
        let mut map = Map::new();
        for (key, value) in members {
            map.insert(key.to_string(), value);
        }
        json!({ "members": map, "owner_id": "12345", "event": "2018" })
    }

    #[test]
    fn test_build_sorts_by_local_score_desc() {
        let raw = leaderboard(vec![
            ("1", member("low", 1, 10)),
            ("2", member("high", 2, 300)),
            ("3", member("mid", 3, 150)),
        ]);

        let snapshot = LeaderboardSnapshot::from_json(&raw).unwrap();

        let names: Vec<_> = snapshot.members().iter().map(|m| m.display_name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
        assert_eq!(snapshot.owner_id(), 12345);
        assert_eq!(snapshot.event_year(), 2018);
    }

    #[test]
    fn test_ties_keep_document_order() {
        let raw = leaderboard(vec![
            ("9", member("first", 9, 50)),
            ("1", member("top", 1, 80)),
            ("5", member("second", 5, 50)),
            ("3", member("third", 3, 50)),
        ]);

        let snapshot = LeaderboardSnapshot::from_json(&raw).unwrap();

        let ids: Vec<_> = snapshot.members().iter().map(|m| m.member_id).collect();
        assert_eq!(ids, vec![1, 9, 5, 3]);

        // Rebuilding yields the identical ordering
        let again = LeaderboardSnapshot::from_json(&raw).unwrap();
        let ids_again: Vec<_> = again.members().iter().map(|m| m.member_id).collect();
        assert_eq!(ids, ids_again);
    }

    #[test]
    fn test_member_count_and_monotonic_scores() {
        let members: Vec<(String, Value)> = (0..40u64)
            .map(|i| (i.to_string(), member(&format!("m{i}"), i, (i * 37) % 11)))
            .collect();
        let raw = leaderboard(members.iter().map(|(k, v)| (k.as_str(), v.clone())).collect());

        let snapshot = LeaderboardSnapshot::from_json(&raw).unwrap();

        assert_eq!(snapshot.len(), 40);
        assert!(snapshot
            .members()
            .windows(2)
            .all(|w| w[0].local_score >= w[1].local_score));
    }

    #[test]
    fn test_top_n_clamps_to_len() {
        let raw = leaderboard(vec![("1", member("a", 1, 2)), ("2", member("b", 2, 1))]);
        let snapshot = LeaderboardSnapshot::from_json(&raw).unwrap();

        assert_eq!(snapshot.top_n(1).len(), 1);
        assert_eq!(snapshot.top_n(15).len(), 2);
        assert!(snapshot.top_n(0).is_empty());
    }

    #[test]
    fn test_numeric_owner_and_event() {
        let raw = json!({ "members": {}, "owner_id": 777, "event": 2023 });

        let snapshot = LeaderboardSnapshot::from_json(&raw).unwrap();

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.owner_id(), 777);
        assert_eq!(snapshot.event_year(), 2023);
    }

    #[test]
    fn test_last_updated_is_build_time() {
        let at = DateTime::parse_from_rfc3339("2018-12-05T10:00:00Z").unwrap().with_timezone(&Utc);
        let raw = json!({ "members": {}, "owner_id": 1, "event": "2018" });

        let snapshot = LeaderboardSnapshot::from_json_at(&raw, at).unwrap();

        assert_eq!(snapshot.last_updated(), at);
    }

    #[test]
    fn test_missing_top_level_fields_rejected() {
        for raw in [
            json!({ "owner_id": 1, "event": "2018" }),
            json!({ "members": {}, "event": "2018" }),
            json!({ "members": {}, "owner_id": 1 }),
        ] {
            let err = LeaderboardSnapshot::from_json(&raw).unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_bad_member_fails_whole_build() {
        let mut bad = member("broken", 2, 5);
        bad["completion_day_level"] = json!({ "31": { "1": {} } });
        let raw = leaderboard(vec![("1", member("ok", 1, 10)), ("2", bad)]);

        let err = LeaderboardSnapshot::from_json(&raw).unwrap_err();
        assert!(err.to_string().contains("member 2"));
    }
}
