//! Command formatting for the leaderboard commands.
//!
//! Pure functions turning cached members into user-facing text. The API layer
//! decides when to call them.

use aocboard_domain::MemberRecord;
use serde::Serialize;

/// Most entries a leaderboard command will print.
pub const MAX_ENTRIES: usize = 10;

/// Star glyph used in table headers.
pub const STAR: &str = "★";

/// Explanation of the event, shown by the about command.
pub const ABOUT_TEXT: &str = include_str!("../resources/about.txt");

/// Reply when the refresher has not produced a snapshot yet.
pub const NO_CACHE_MESSAGE: &str =
    "Something's gone wrong and there's no cached leaderboard!\n\nPlease check in with a staff member.";

// =============================================================================
// Entry Count
// =============================================================================

/// Number of entries to show, after clamping the caller's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryCount {
    /// Entries to show
    pub count: usize,
    /// Whether the request was outside `1..=MAX_ENTRIES`
    pub clamped: bool,
}

impl EntryCount {
    /// Resolve a requested count; anything outside `1..=MAX_ENTRIES` becomes
    /// `MAX_ENTRIES` and is flagged so the caller can point at the full board.
    pub fn resolve(requested: i64) -> Self {
        match usize::try_from(requested) {
            Ok(n) if (1..=MAX_ENTRIES).contains(&n) => Self {
                count: n,
                clamped: false,
            },
            _ => Self::clamped(),
        }
    }

    /// Resolve a raw query value.
    ///
    /// Blank means the default. Anything that is not an in-range integer,
    /// including integers too large for `i64`, is clamped.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::default();
        }

        raw.parse::<i64>().map(Self::resolve).unwrap_or_else(|_| Self::clamped())
    }

    fn clamped() -> Self {
        Self {
            count: MAX_ENTRIES,
            clamped: true,
        }
    }
}

impl Default for EntryCount {
    fn default() -> Self {
        Self {
            count: MAX_ENTRIES,
            clamped: false,
        }
    }
}

// =============================================================================
// Table Rendering
// =============================================================================

/// One row of the rendered leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub label: String,
    pub member_id: u64,
    pub local_score: u64,
    pub stars: u32,
    pub part_one: u32,
    pub part_two: u32,
}

impl LeaderboardEntry {
    /// Build the entries for already-ranked members.
    pub fn from_members(members: &[MemberRecord]) -> Vec<Self> {
        members
            .iter()
            .enumerate()
            .map(|(i, m)| Self {
                rank: i + 1,
                label: m.label(),
                member_id: m.member_id,
                local_score: m.local_score,
                stars: m.star_count,
                part_one: m.summary.part_one,
                part_two: m.summary.part_two,
            })
            .collect()
    }
}

/// Render ranked members as a fixed-width table inside a code fence.
///
/// ```text
///    Score           Name            ★, ★★
/// --------------------------------------------
///  1)  312 Ada Lovelace              (12, 10)
/// ```
pub fn render_table(members: &[MemberRecord]) -> String {
    let star_group = format!("{STAR}, {STAR}{STAR}");
    let header = format!("{}Score {:^25} {:^7}\n{}", " ".repeat(3), "Name", star_group, "-".repeat(44));

    let rows: String = LeaderboardEntry::from_members(members)
        .iter()
        .map(|e| {
            format!(
                "{:>2}) {:>4} {:<25.25} ({:>2}, {:>2})\n",
                e.rank, e.local_score, e.label, e.part_one, e.part_two
            )
        })
        .collect();

    format!("```{header}\n{rows}```")
}

/// Headline above the table.
pub fn title(count: usize) -> String {
    format!("Here's the current Top {count}!")
}

/// Notice returned with a clamped request.
pub fn clamp_notice(leaderboard_link: &str) -> String {
    format!(
        "Number of entries to display must be a positive integer less than or equal to {MAX_ENTRIES}\n\n\
         Head to {leaderboard_link} to view the entire leaderboard"
    )
}

/// Instructions for joining the private leaderboard.
pub fn join_message(base_url: &str, join_code: &str) -> String {
    format!(
        "Head over to {}/leaderboard/private with code `{}` to join the private leaderboard!",
        base_url.trim_end_matches('/'),
        join_code
    )
}

// =============================================================================
// Tests
// =============================================================================
