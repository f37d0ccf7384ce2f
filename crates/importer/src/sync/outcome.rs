use serde::Serialize;
use storage::models::TournamentStatus;
use uuid::Uuid;

/// What happened to one player row during a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOutcome {
    Inserted,
    Updated,
    Unchanged,
    SkippedUnknownGolfer,
    SkippedMissingParticipation,
}

impl RowOutcome {
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::SkippedUnknownGolfer | Self::SkippedMissingParticipation
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub api_id: i64,
    pub reason: RowOutcome,
}

/// Result of one sync invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncSummary {
    pub ok: bool,
    pub tournament_id: Uuid,
    /// Event name reported by the feeds.
    pub event_name: Option<String>,
    pub tournament_status: TournamentStatus,
    pub tournament_completed: bool,
    pub current_round: Option<i16>,
    pub live_play: bool,
    pub golfers_inserted: usize,
    pub golfers_updated: usize,
    pub tournament_golfers_inserted: usize,
    pub tournament_golfers_updated: usize,
    pub tournament_golfers_deleted: usize,
    pub live_players: usize,
    pub skipped: Vec<SkippedRow>,
    pub tournament_patched: bool,
}

impl SyncSummary {
    pub fn new(tournament_id: Uuid, status: TournamentStatus) -> Self {
        Self {
            ok: true,
            tournament_id,
            event_name: None,
            tournament_status: status,
            tournament_completed: false,
            current_round: None,
            live_play: false,
            golfers_inserted: 0,
            golfers_updated: 0,
            tournament_golfers_inserted: 0,
            tournament_golfers_updated: 0,
            tournament_golfers_deleted: 0,
            live_players: 0,
            skipped: Vec::new(),
            tournament_patched: false,
        }
    }

    /// Counts a participation row outcome.
    pub fn record(&mut self, api_id: i64, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Inserted => self.tournament_golfers_inserted += 1,
            RowOutcome::Updated => self.tournament_golfers_updated += 1,
            RowOutcome::Unchanged => {}
            RowOutcome::SkippedUnknownGolfer | RowOutcome::SkippedMissingParticipation => {
                self.skipped.push(SkippedRow {
                    api_id,
                    reason: outcome,
                })
            }
        }
    }

    pub fn skipped_count(&self, reason: RowOutcome) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_outcomes() {
        let mut summary = SyncSummary::new(Uuid::new_v4(), TournamentStatus::Active);
        summary.record(1, RowOutcome::Inserted);
        summary.record(2, RowOutcome::Updated);
        summary.record(3, RowOutcome::Updated);
        summary.record(4, RowOutcome::Unchanged);
        summary.record(5, RowOutcome::SkippedUnknownGolfer);
        summary.record(6, RowOutcome::SkippedMissingParticipation);

        assert_eq!(summary.tournament_golfers_inserted, 1);
        assert_eq!(summary.tournament_golfers_updated, 2);
        assert_eq!(summary.skipped.len(), 2);
        assert_eq!(summary.skipped_count(RowOutcome::SkippedUnknownGolfer), 1);
        assert!(summary.skipped.iter().all(|s| s.reason.is_skip()));
    }

    #[test]
    fn test_serializes_status_lowercase() {
        let summary = SyncSummary::new(Uuid::nil(), TournamentStatus::Completed);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["tournament_status"], "completed");
        assert_eq!(json["ok"], true);
        assert!(json["event_name"].is_null());
    }
}
