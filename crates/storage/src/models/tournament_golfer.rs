use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Participation of one golfer in one tournament. Unique on
/// `(golfer_id, tournament_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TournamentGolfer {
    pub tournament_golfer_id: Uuid,
    pub golfer_id: Uuid,
    pub tournament_id: Uuid,
    /// Leaderboard position, possibly a token such as "T5", "CUT" or "WD".
    pub position: Option<String>,
    /// Places gained since the previous sync; positive means moved up.
    pub position_change: Option<i32>,
    pub score: Option<i32>,
    pub today: Option<i32>,
    pub thru: Option<i32>,
    pub end_hole: Option<i32>,
    pub round_one: Option<i32>,
    pub round_two: Option<i32>,
    pub round_three: Option<i32>,
    pub round_four: Option<i32>,
    pub round_one_tee_time: Option<String>,
    pub round_two_tee_time: Option<String>,
    pub round_three_tee_time: Option<String>,
    pub round_four_tee_time: Option<String>,
    pub make_cut: Option<f64>,
    pub top_ten: Option<f64>,
    pub top_twenty: Option<f64>,
    pub win: Option<f64>,
    pub world_rank: Option<i32>,
    pub rating: Option<f64>,
    pub usage: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl TournamentGolfer {
    /// A fresh participation row with no scoring data yet.
    pub fn new(golfer_id: Uuid, tournament_id: Uuid, updated_at: DateTime<Utc>) -> Self {
        Self {
            tournament_golfer_id: Uuid::new_v4(),
            golfer_id,
            tournament_id,
            position: None,
            position_change: None,
            score: None,
            today: None,
            thru: None,
            end_hole: None,
            round_one: None,
            round_two: None,
            round_three: None,
            round_four: None,
            round_one_tee_time: None,
            round_two_tee_time: None,
            round_three_tee_time: None,
            round_four_tee_time: None,
            make_cut: None,
            top_ten: None,
            top_twenty: None,
            win: None,
            world_rank: None,
            rating: None,
            usage: None,
            updated_at,
        }
    }

    pub fn tee_times(&self) -> [Option<&str>; 4] {
        [
            self.round_one_tee_time.as_deref(),
            self.round_two_tee_time.as_deref(),
            self.round_three_tee_time.as_deref(),
            self.round_four_tee_time.as_deref(),
        ]
    }

    /// Sets each round's tee time, keeping the stored value where `incoming`
    /// has none.
    pub fn merge_tee_times(&mut self, incoming: [Option<String>; 4]) {
        let [one, two, three, four] = incoming;
        self.round_one_tee_time = one.or_else(|| self.round_one_tee_time.take());
        self.round_two_tee_time = two.or_else(|| self.round_two_tee_time.take());
        self.round_three_tee_time = three.or_else(|| self.round_three_tee_time.take());
        self.round_four_tee_time = four.or_else(|| self.round_four_tee_time.take());
    }

    /// Compares stored state, ignoring the row timestamp.
    pub fn same_state_as(&self, other: &Self) -> bool {
        let mut normalized = self.clone();
        normalized.updated_at = other.updated_at;
        &normalized == other
    }
}

/// A participation row together with its golfer's provider id.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Participant {
    #[sqlx(flatten)]
    pub row: TournamentGolfer,
    pub golfer_api_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_tee_times_prefers_incoming() {
        let mut row = TournamentGolfer::new(Uuid::new_v4(), Uuid::new_v4(), Utc::now());
        row.round_one_tee_time = Some("2025-04-10 08:00".to_string());
        row.round_two_tee_time = Some("2025-04-11 13:00".to_string());

        row.merge_tee_times([Some("2025-04-10 08:10".to_string()), None, None, None]);

        assert_eq!(row.round_one_tee_time.as_deref(), Some("2025-04-10 08:10"));
        assert_eq!(row.round_two_tee_time.as_deref(), Some("2025-04-11 13:00"));
        assert_eq!(row.round_three_tee_time, None);
    }

    #[test]
    fn test_same_state_ignores_timestamp() {
        let row = TournamentGolfer::new(Uuid::new_v4(), Uuid::new_v4(), Utc::now());
        let mut later = row.clone();
        later.updated_at = row.updated_at + chrono::Duration::minutes(5);
        assert!(row.same_state_as(&later));

        later.position = Some("T5".to_string());
        assert!(!row.same_state_as(&later));
    }
}
