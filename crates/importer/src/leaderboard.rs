//! Leaderboard token handling: positions, holes thru and round state.

use std::collections::HashSet;

use lazy_static::lazy_static;

pub const HOLES_PER_ROUND: i32 = 18;

lazy_static! {
    /// Position tokens for players who are done with the tournament.
    static ref FINISHED_POSITIONS: HashSet<&'static str> =
        ["WD", "DQ", "CUT", "MC", "MDF", "DNS", "DNF"].into_iter().collect();
}

pub fn is_finished_position(position: &str) -> bool {
    FINISHED_POSITIONS.contains(position.trim().to_ascii_uppercase().as_str())
}

/// Numeric leaderboard place, ignoring a leading "T" tie marker.
///
/// ```
/// use importer::leaderboard::parse_position;
///
/// assert_eq!(parse_position("T5"), Some(5));
/// assert_eq!(parse_position("12"), Some(12));
/// assert_eq!(parse_position("CUT"), None);
/// ```
pub fn parse_position(position: &str) -> Option<i32> {
    let trimmed = position.trim();
    let digits = trimmed
        .strip_prefix('T')
        .or_else(|| trimmed.strip_prefix('t'))
        .unwrap_or(trimmed);
    digits.parse().ok()
}

/// Places gained between two syncs; positive means the player moved up.
/// Zero whenever either side is missing or not numeric.
pub fn position_change(previous: Option<&str>, next: Option<&str>) -> i32 {
    match (previous.and_then(parse_position), next.and_then(parse_position)) {
        (Some(prev), Some(next)) => prev - next,
        _ => 0,
    }
}

/// Holes completed in the current round. "F" means finished (18) and a
/// trailing "*" (started on the back nine) is ignored. Unparseable input is
/// absent, never zero.
pub fn parse_thru(thru: &str) -> Option<i32> {
    let trimmed = thru.trim().trim_end_matches('*').trim();
    if trimmed.eq_ignore_ascii_case("F") {
        return Some(HOLES_PER_ROUND);
    }
    trimmed.parse().ok()
}

/// True when at least one player is mid-round: not finished, and strictly
/// between hole 0 and hole 18.
///
/// Rows are `(position, thru)` pairs as reported by the live feed.
pub fn is_round_running<'a, I>(rows: I) -> bool
where
    I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    rows.into_iter().any(|(position, thru)| {
        if position.is_some_and(is_finished_position) {
            return false;
        }
        matches!(
            thru.and_then(parse_thru),
            Some(holes) if holes > 0 && holes < HOLES_PER_ROUND
        )
    })
}
