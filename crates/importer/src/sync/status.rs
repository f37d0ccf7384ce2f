//! Tournament lifecycle transitions.
//!
//! Rules are evaluated in order and the first one that applies decides the
//! next status. `cancelled` is sticky and wins over everything else.

use storage::models::{FINAL_ROUND, FINISHED_ROUND, TournamentStatus};

/// Signals a sync derives from the stored tournament and the live feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInputs {
    pub current: TournamentStatus,
    pub current_round: Option<i16>,
    pub round_running: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub status: TournamentStatus,
    pub current_round: Option<i16>,
    pub live_play: bool,
}

type Rule = (&'static str, fn(&StatusInputs) -> Option<TournamentStatus>);

const RULES: [Rule; 5] = [
    ("cancelled is sticky", cancelled_is_sticky),
    ("completed now", completed_now),
    ("previously completed", previously_completed),
    ("round running", round_running),
    ("retain", retain),
];

fn cancelled_is_sticky(inputs: &StatusInputs) -> Option<TournamentStatus> {
    (inputs.current == TournamentStatus::Cancelled).then_some(TournamentStatus::Cancelled)
}

fn completed_now(inputs: &StatusInputs) -> Option<TournamentStatus> {
    inputs.completed.then_some(TournamentStatus::Completed)
}

fn previously_completed(inputs: &StatusInputs) -> Option<TournamentStatus> {
    (inputs.current == TournamentStatus::Completed).then_some(TournamentStatus::Completed)
}

fn round_running(inputs: &StatusInputs) -> Option<TournamentStatus> {
    inputs.round_running.then_some(TournamentStatus::Active)
}

fn retain(inputs: &StatusInputs) -> Option<TournamentStatus> {
    Some(inputs.current)
}

/// Next status for the given inputs.
pub fn next_status(inputs: &StatusInputs) -> TournamentStatus {
    RULES
        .iter()
        .find_map(|(_, rule)| rule(inputs))
        .unwrap_or(inputs.current)
}

/// Name of the rule that decides `inputs`, for logging.
pub fn deciding_rule(inputs: &StatusInputs) -> &'static str {
    RULES
        .iter()
        .find(|(_, rule)| rule(inputs).is_some())
        .map_or("retain", |(name, _)| name)
}

/// The tournament is over once no round is running and the stored round was
/// already the final one. An empty live feed has no running round.
pub fn is_completed(round_running: bool, stored_round: Option<i16>) -> bool {
    !round_running && stored_round == Some(FINAL_ROUND)
}

/// Next round number. Completion forces the finished marker; otherwise the
/// feed's round is taken when it does not move backwards, and a finished
/// tournament stays finished.
pub fn next_round(stored: Option<i16>, reported: Option<i32>, completed: bool) -> Option<i16> {
    if completed || stored == Some(FINISHED_ROUND) {
        return Some(FINISHED_ROUND);
    }

    let reported = reported
        .and_then(|r| i16::try_from(r).ok())
        .filter(|r| (1..=FINAL_ROUND).contains(r));

    match (stored, reported) {
        (Some(stored), Some(reported)) => Some(stored.max(reported)),
        (stored, reported) => reported.or(stored),
    }
}

/// Full transition for one sync. `live_play` mirrors whether a round is
/// running.
pub fn resolve(
    current: TournamentStatus,
    stored_round: Option<i16>,
    reported_round: Option<i32>,
    round_running: bool,
) -> Transition {
    let completed = is_completed(round_running, stored_round);
    let inputs = StatusInputs {
        current,
        current_round: stored_round,
        round_running,
        completed,
    };

    Transition {
        status: next_status(&inputs),
        current_round: next_round(stored_round, reported_round, completed),
        live_play: round_running,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::models::TournamentStatus::*;

    fn inputs(current: TournamentStatus, round_running: bool, completed: bool) -> StatusInputs {
        StatusInputs {
            current,
            current_round: Some(2),
            round_running,
            completed,
        }
    }

    #[test]
    fn test_transition_table() {
        let cases = [
            (Cancelled, true, true, Cancelled),
            (Cancelled, false, false, Cancelled),
            (Upcoming, false, true, Completed),
            (Active, false, true, Completed),
            (Completed, true, false, Completed),
            (Completed, false, false, Completed),
            (Upcoming, true, false, Active),
            (Active, true, false, Active),
            (Upcoming, false, false, Upcoming),
            (Active, false, false, Active),
        ];

        for (current, running, completed, expected) in cases {
            let inputs = inputs(current, running, completed);
            assert_eq!(next_status(&inputs), expected, "{:?}", inputs);
        }
    }

    #[test]
    fn test_deciding_rule_names() {
        assert_eq!(deciding_rule(&inputs(Cancelled, true, true)), "cancelled is sticky");
        assert_eq!(deciding_rule(&inputs(Upcoming, true, false)), "round running");
        assert_eq!(deciding_rule(&inputs(Active, false, false)), "retain");
    }

    #[test]
    fn test_completion_requires_final_round() {
        assert!(is_completed(false, Some(4)));
        assert!(!is_completed(true, Some(4)));
        assert!(!is_completed(false, Some(3)));
        assert!(!is_completed(false, None));
        assert!(!is_completed(false, Some(5)));
    }

    #[test]
    fn test_next_round() {
        assert_eq!(next_round(Some(4), Some(4), true), Some(5));
        assert_eq!(next_round(Some(5), Some(1), false), Some(5));
        assert_eq!(next_round(None, Some(1), false), Some(1));
        assert_eq!(next_round(Some(3), Some(2), false), Some(3));
        assert_eq!(next_round(Some(2), Some(3), false), Some(3));
        assert_eq!(next_round(Some(2), None, false), Some(2));
        assert_eq!(next_round(None, Some(9), false), None);
    }

    #[test]
    fn test_resolve_completion() {
        let transition = resolve(Active, Some(4), Some(4), false);
        assert_eq!(
            transition,
            Transition {
                status: Completed,
                current_round: Some(5),
                live_play: false,
            }
        );
    }

    #[test]
    fn test_resolve_cancelled_keeps_status() {
        let transition = resolve(Cancelled, Some(2), Some(2), true);
        assert_eq!(transition.status, Cancelled);
        assert!(transition.live_play);
    }

    #[test]
    fn test_resolve_completes_without_live_rows() {
        let transition = resolve(Active, Some(4), None, false);
        assert_eq!(transition.status, Completed);
        assert_eq!(transition.current_round, Some(5));
        assert!(!transition.live_play);
    }
}
