//! Live-data reconciliation.
//!
//! One invocation reconciles one tournament: the joined feeds are applied
//! through a single [`LiveSyncStore`] session that is committed only after
//! every step succeeds. Per-player work is sequential because later lookups
//! must see earlier writes.

mod outcome;
mod status;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use storage::error::StorageError;
use storage::models::{
    Golfer, NewGolfer, Tournament, TournamentGolfer, TournamentPatch, TournamentStatus,
};
use storage::services::compute_usage;
use storage::{LiveSyncStore, SyncGateway};
use tracing::{debug, info};
use uuid::Uuid;

pub use outcome::{RowOutcome, SkippedRow, SyncSummary};
pub use status::{
    StatusInputs, Transition, deciding_rule, is_completed, next_round, next_status, resolve,
};

use crate::error::{ImporterError, Result};
use crate::leaderboard::{is_round_running, parse_thru, position_change};
use crate::sources::datagolf::models::LiveEntry;
use crate::sources::datagolf::{EnrichedPlayer, FeedSnapshot, FeedValidator, JoinedFeeds, join_feeds};

/// Validates, joins and reconciles one feed snapshot into a tournament.
///
/// Nothing is written unless the whole reconciliation succeeds.
pub async fn apply_live_sync<G: SyncGateway>(
    gateway: &G,
    tournament_id: Uuid,
    snapshot: &FeedSnapshot,
    now: DateTime<Utc>,
) -> Result<SyncSummary> {
    let report = FeedValidator::validate(snapshot)?;
    report.log_warnings();

    let joined = join_feeds(snapshot);

    let mut session = gateway.begin().await?;
    let summary = reconcile(&mut session, tournament_id, &joined, now).await?;
    gateway.commit(session).await?;

    info!(
        "Synced tournament {} ({}): status={} round={:?} live_play={} golfers +{} ~{}, rows +{} ~{} -{}, {} live player(s), {} skipped",
        summary.tournament_id,
        summary.event_name.as_deref().unwrap_or("unnamed event"),
        summary.tournament_status,
        summary.current_round,
        summary.live_play,
        summary.golfers_inserted,
        summary.golfers_updated,
        summary.tournament_golfers_inserted,
        summary.tournament_golfers_updated,
        summary.tournament_golfers_deleted,
        summary.live_players,
        summary.skipped.len()
    );

    Ok(summary)
}

/// True once play has begun: the tournament is active or completed, live
/// play was already flagged, or a non-upcoming tournament is past its start.
pub fn has_started(tournament: &Tournament, status: TournamentStatus, now: DateTime<Utc>) -> bool {
    matches!(status, TournamentStatus::Active | TournamentStatus::Completed)
        || tournament.live_play
        || (status != TournamentStatus::Upcoming && tournament.start_date <= now)
}

pub async fn reconcile<S: LiveSyncStore + ?Sized>(
    store: &mut S,
    tournament_id: Uuid,
    joined: &JoinedFeeds,
    now: DateTime<Utc>,
) -> Result<SyncSummary> {
    let tournament = store
        .find_tournament(tournament_id)
        .await?
        .ok_or(ImporterError::TournamentNotFound(tournament_id))?;
    let status = tournament.parsed_status()?;
    let started = has_started(&tournament, status, now);

    let mut summary = SyncSummary::new(tournament_id, status);
    summary.event_name = joined.event_name.clone();
    let mut patch = TournamentPatch::default();

    if !started {
        if joined.field_ids.is_empty() && joined.live_ids.is_empty() {
            return Err(ImporterError::EmptyRoster(tournament_id));
        }

        if let Some(earliest) = joined.earliest_tee_time {
            if earliest != tournament.start_date {
                info!(
                    "Moving start of tournament {} from {} to {}",
                    tournament_id, tournament.start_date, earliest
                );
                patch.start_date = Some(earliest);
            }
        }

        summary.tournament_golfers_deleted = prune_roster(store, tournament_id, joined).await?;

        let teams = store.list_teams(tournament_id).await?;
        let usage = Usage::new(compute_usage(&teams), teams.is_empty());

        for player in joined.roster() {
            let golfer = upsert_golfer(store, player, now, &mut summary).await?;
            let outcome =
                upsert_roster_row(store, tournament_id, &golfer, player, usage.of(player.api_id), now)
                    .await?;
            summary.record(player.api_id, outcome);
        }
    }

    for (player, live) in joined.live_players() {
        let outcome = apply_live_row(store, tournament_id, player, live, started, now).await?;
        if outcome.is_skip() {
            debug!("Skipping live row for {}: {:?}", player.api_id, outcome);
        }
        summary.record(player.api_id, outcome);
    }
    summary.live_players = joined.live_ids.len();

    let tokens = joined
        .live_players()
        .map(|(_, live)| (live.position(), live.thru_token()))
        .collect::<Vec<_>>();
    let running = is_round_running(tokens.iter().map(|(p, t)| (p.as_deref(), t.as_deref())));

    let transition = resolve(status, tournament.current_round, joined.current_round, running);
    let inputs = StatusInputs {
        current: status,
        current_round: tournament.current_round,
        round_running: running,
        completed: is_completed(running, tournament.current_round),
    };
    debug!(
        "Tournament {} transition: {:?} by rule '{}'",
        tournament_id,
        transition,
        deciding_rule(&inputs)
    );

    if transition.status != status {
        patch.status = Some(transition.status);
    }
    if transition.current_round != tournament.current_round {
        patch.current_round = transition.current_round;
    }
    if transition.live_play != tournament.live_play {
        patch.live_play = Some(transition.live_play);
    }
    if let Some(last_update) = joined.last_update {
        if tournament.leaderboard_last_updated != Some(last_update) {
            patch.leaderboard_last_updated = Some(last_update);
        }
    }

    if !patch.is_empty() {
        store.patch_tournament(tournament_id, &patch).await?;
        summary.tournament_patched = true;
    }

    summary.tournament_status = transition.status;
    summary.tournament_completed = transition.status == TournamentStatus::Completed;
    summary.current_round = transition.current_round;
    summary.live_play = transition.live_play;

    Ok(summary)
}

/// Usage percentages for a tournament. Without rosters there is no usage,
/// so stored values are kept.
struct Usage {
    by_golfer: HashMap<i64, f64>,
    no_rosters: bool,
}

impl Usage {
    fn new(by_golfer: HashMap<i64, f64>, no_rosters: bool) -> Self {
        Self {
            by_golfer,
            no_rosters,
        }
    }

    fn of(&self, api_id: i64) -> Option<f64> {
        if self.no_rosters {
            None
        } else {
            Some(self.by_golfer.get(&api_id).copied().unwrap_or(0.0))
        }
    }
}

/// Deletes participation rows for players missing from both feeds.
async fn prune_roster<S: LiveSyncStore + ?Sized>(
    store: &mut S,
    tournament_id: Uuid,
    joined: &JoinedFeeds,
) -> Result<usize> {
    let mut deleted = 0;
    for participant in store.list_participants(tournament_id).await? {
        if joined.contains(participant.golfer_api_id) {
            continue;
        }

        info!(
            "Removing golfer {} from tournament {}: no longer in the field",
            participant.golfer_api_id, tournament_id
        );
        store
            .delete_tournament_golfer(participant.row.tournament_golfer_id)
            .await?;
        deleted += 1;
    }
    Ok(deleted)
}

async fn upsert_golfer<S: LiveSyncStore + ?Sized>(
    store: &mut S,
    player: &EnrichedPlayer,
    now: DateTime<Utc>,
    summary: &mut SyncSummary,
) -> Result<Golfer> {
    let incoming = NewGolfer {
        api_id: player.api_id,
        name: player.name.as_str().to_string(),
        country: player.country.clone(),
        world_rank: player.world_rank,
        updated_at: now,
    };

    let existing = match store.find_golfer_by_api_id(player.api_id).await? {
        Some(golfer) => golfer,
        None => match store.insert_golfer(&incoming).await {
            Ok(golfer) => {
                summary.golfers_inserted += 1;
                return Ok(golfer);
            }
            Err(err) if err.is_unique_violation() => {
                debug!("Golfer {} inserted concurrently, merging", player.api_id);
                store
                    .find_golfer_by_api_id(player.api_id)
                    .await?
                    .ok_or(StorageError::NotFound)?
            }
            Err(err) => return Err(err.into()),
        },
    };

    match existing.merge(&incoming) {
        Some(update) => {
            summary.golfers_updated += 1;
            Ok(store.update_golfer(existing.golfer_id, &update).await?)
        }
        None => Ok(existing),
    }
}

/// Pre-start metadata: tee times, world rank, rating and usage. Live-scoring
/// fields are left alone.
fn with_roster_data(
    row: &TournamentGolfer,
    player: &EnrichedPlayer,
    usage: Option<f64>,
    now: DateTime<Utc>,
) -> TournamentGolfer {
    let mut next = row.clone();
    next.merge_tee_times(player.tee_times.clone());
    next.world_rank = player.world_rank.or(row.world_rank);
    next.rating = Some(player.rating_or(row.rating));
    next.usage = usage.or(row.usage);
    next.updated_at = now;
    next
}

fn with_live_scoring(
    row: &TournamentGolfer,
    player: &EnrichedPlayer,
    live: &LiveEntry,
    now: DateTime<Utc>,
) -> TournamentGolfer {
    let mut next = row.clone();
    let position = live.position();

    next.position_change = Some(position_change(row.position.as_deref(), position.as_deref()));
    next.position = position;
    next.score = live.current_score;
    next.today = live.today;
    next.thru = live.thru_token().as_deref().and_then(parse_thru);
    next.end_hole = live.end_hole;
    next.round_one = live.r1;
    next.round_two = live.r2;
    next.round_three = live.r3;
    next.round_four = live.r4;
    next.make_cut = live.make_cut;
    next.top_ten = live.top_10;
    next.top_twenty = live.top_20;
    next.win = live.win;
    next.merge_tee_times(player.tee_times.clone());
    next.world_rank = player.world_rank.or(row.world_rank);
    next.rating = Some(player.rating_or(row.rating));
    next.updated_at = now;
    next
}

async fn upsert_roster_row<S: LiveSyncStore + ?Sized>(
    store: &mut S,
    tournament_id: Uuid,
    golfer: &Golfer,
    player: &EnrichedPlayer,
    usage: Option<f64>,
    now: DateTime<Utc>,
) -> Result<RowOutcome> {
    match store
        .find_tournament_golfer(golfer.golfer_id, tournament_id)
        .await?
    {
        Some(row) => {
            let next = with_roster_data(&row, player, usage, now);
            write_if_changed(store, &row, &next).await
        }
        None => {
            let fresh = TournamentGolfer::new(golfer.golfer_id, tournament_id, now);
            let row = with_roster_data(&fresh, player, usage, now);
            insert_or_patch(store, &row, |current| {
                with_roster_data(current, player, usage, now)
            })
            .await
        }
    }
}

async fn apply_live_row<S: LiveSyncStore + ?Sized>(
    store: &mut S,
    tournament_id: Uuid,
    player: &EnrichedPlayer,
    live: &LiveEntry,
    started: bool,
    now: DateTime<Utc>,
) -> Result<RowOutcome> {
    let Some(golfer) = store.find_golfer_by_api_id(player.api_id).await? else {
        return Ok(RowOutcome::SkippedUnknownGolfer);
    };

    match store
        .find_tournament_golfer(golfer.golfer_id, tournament_id)
        .await?
    {
        Some(row) => {
            let next = with_live_scoring(&row, player, live, now);
            write_if_changed(store, &row, &next).await
        }
        None if started => {
            let fresh = TournamentGolfer::new(golfer.golfer_id, tournament_id, now);
            let row = with_live_scoring(&fresh, player, live, now);
            insert_or_patch(store, &row, |current| {
                with_live_scoring(current, player, live, now)
            })
            .await
        }
        None => Ok(RowOutcome::SkippedMissingParticipation),
    }
}

async fn write_if_changed<S: LiveSyncStore + ?Sized>(
    store: &mut S,
    current: &TournamentGolfer,
    next: &TournamentGolfer,
) -> Result<RowOutcome> {
    if next.same_state_as(current) {
        return Ok(RowOutcome::Unchanged);
    }
    store.update_tournament_golfer(next).await?;
    Ok(RowOutcome::Updated)
}

/// Inserts `row`; if another writer created the pair first, re-reads it and
/// applies `patch` to the stored row instead.
async fn insert_or_patch<S, F>(store: &mut S, row: &TournamentGolfer, patch: F) -> Result<RowOutcome>
where
    S: LiveSyncStore + ?Sized,
    F: Fn(&TournamentGolfer) -> TournamentGolfer,
{
    match store.insert_tournament_golfer(row).await {
        Ok(()) => Ok(RowOutcome::Inserted),
        Err(err) if err.is_unique_violation() => {
            debug!(
                "Participation ({}, {}) already exists, patching",
                row.golfer_id, row.tournament_id
            );
            let current = store
                .find_tournament_golfer(row.golfer_id, row.tournament_id)
                .await?
                .ok_or(StorageError::NotFound)?;
            let next = patch(&current);
            write_if_changed(store, &current, &next).await
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn tournament(status: &str, live_play: bool, start_date: DateTime<Utc>) -> Tournament {
        Tournament {
            tournament_id: Uuid::new_v4(),
            name: "Test Open".to_string(),
            status: status.to_string(),
            current_round: None,
            live_play,
            start_date,
            leaderboard_last_updated: None,
        }
    }

    #[test]
    fn test_has_started() {
        let now = Utc.with_ymd_and_hms(2025, 4, 10, 12, 0, 0).unwrap();
        let past = now - Duration::hours(3);
        let future = now + Duration::days(2);
        let check = |status: &str, live_play: bool, start| {
            let t = tournament(status, live_play, start);
            has_started(&t, t.parsed_status().unwrap(), now)
        };

        assert!(check("active", false, future));
        assert!(check("completed", false, future));
        assert!(check("upcoming", true, future));
        assert!(check("cancelled", false, past));
        assert!(!check("upcoming", false, past));
        assert!(!check("upcoming", false, future));
        assert!(!check("cancelled", false, future));
    }

    #[test]
    fn test_usage_without_rosters_keeps_stored_value() {
        let usage = Usage::new(HashMap::new(), true);
        assert_eq!(usage.of(1), None);

        let usage = Usage::new(HashMap::from([(1, 50.0)]), false);
        assert_eq!(usage.of(1), Some(50.0));
        assert_eq!(usage.of(2), Some(0.0));
    }

    #[test]
    fn test_live_scoring_computes_position_change() {
        let player: EnrichedPlayer = crate::sources::datagolf::join_feeds(&FeedSnapshot {
            live: serde_json::from_value(serde_json::json!({
                "data": [{"dg_id": 7, "player_name": "Lowry, Shane", "current_pos": "2", "thru": "F",
                          "current_score": -9, "R1": 66}]
            }))
            .unwrap(),
            ..FeedSnapshot::default()
        })
        .players[&7]
            .clone();
        let live = player.live.clone().unwrap();

        let mut row = TournamentGolfer::new(Uuid::new_v4(), Uuid::new_v4(), Utc::now());
        row.position = Some("T5".to_string());
        row.round_one_tee_time = Some("2025-04-10 08:00".to_string());
        row.rating = Some(61.0);

        let next = with_live_scoring(&row, &player, &live, Utc::now());
        assert_eq!(next.position.as_deref(), Some("2"));
        assert_eq!(next.position_change, Some(3));
        assert_eq!(next.thru, Some(18));
        assert_eq!(next.score, Some(-9));
        assert_eq!(next.round_one, Some(66));
        assert_eq!(next.round_one_tee_time.as_deref(), Some("2025-04-10 08:00"));
        assert_eq!(next.rating, Some(61.0));

        let again = with_live_scoring(&next, &player, &live, Utc::now());
        assert_eq!(again.position_change, Some(0));
    }
}
