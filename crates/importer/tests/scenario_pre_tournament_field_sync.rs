//! Scenario: pre-tournament field sync
//!
//! # Invariants under test
//!
//! 1. An upcoming tournament with a three-player field and an empty live feed
//!    creates three golfers and three participation rows, moves the start
//!    date to the earliest round-one tee time and leaves status and live play
//!    untouched.
//! 2. Re-applying the same snapshot writes nothing.
//! 3. Players gone from both feeds before play starts are removed from the
//!    tournament, but their golfer profiles survive.
//! 4. Golfer profiles are merged monotonically.
//! 5. An empty field and live feed before start aborts without writes.
//! 6. An empty field falls back to the live feed as the roster.
//!
//! All tests run against the in-memory gateway; no DB or network required.

mod common;

use common::*;
use importer::sync::apply_live_sync;
use importer::{ImporterError, RowOutcome};
use serde_json::json;
use storage::models::TournamentStatus;
use storage::services::{fallback_rating, normalize_rating};
use uuid::Uuid;

fn three_player_field() -> Vec<serde_json::Value> {
    vec![
        field_player(18417, "Scheffler, Scottie", "2025-04-10 09:10"),
        field_player(22085, "McIlroy, Rory", "2025-04-10 09:00"),
        field_player(10091, "Fitzpatrick, Matthew, Jr", "2025-04-10 09:20"),
    ]
}

fn rankings() -> Vec<serde_json::Value> {
    vec![
        ranked(18417, "Scheffler, Scottie", 3.1, 1),
        ranked(22085, "McIlroy, Rory", 2.0, 2),
    ]
}

#[tokio::test]
async fn field_list_seeds_golfers_rows_and_start_date() {
    let world = World::new(tournament("upcoming", None))
        .with_team(&[18417, 22085])
        .with_team(&[18417]);
    let gateway = world.gateway();
    let tid = world.tournament.tournament_id;

    let summary = apply_live_sync(&gateway, tid, &snapshot(three_player_field(), rankings(), vec![]), now())
        .await
        .unwrap();

    assert!(summary.ok);
    assert_eq!(summary.golfers_inserted, 3);
    assert_eq!(summary.tournament_golfers_inserted, 3);
    assert_eq!(summary.tournament_golfers_updated, 0);
    assert_eq!(summary.live_players, 0);
    assert_eq!(summary.tournament_status, TournamentStatus::Upcoming);
    assert!(!summary.tournament_completed);
    assert!(!summary.live_play);

    let state = gateway.snapshot();
    let stored = &state.tournaments[&tid];
    assert_eq!(stored.start_date, at(9, 0));
    assert_eq!(stored.status, "upcoming");
    assert!(!stored.live_play);

    let names = {
        let mut names = state.golfers.values().map(|g| g.name.clone()).collect::<Vec<_>>();
        names.sort();
        names
    };
    assert_eq!(
        names,
        vec!["Matthew Fitzpatrick Jr.", "Rory McIlroy", "Scottie Scheffler"]
    );

    let scheffler = row_for(&state, 18417, &world.tournament);
    assert_eq!(scheffler.round_one_tee_time.as_deref(), Some("2025-04-10 09:10"));
    assert_eq!(scheffler.rating, Some(normalize_rating(3.1)));
    assert_eq!(scheffler.world_rank, Some(1));
    assert_eq!(scheffler.usage, Some(100.0));
    assert_eq!(scheffler.position, None);
    assert_eq!(scheffler.score, None);

    let mcilroy = row_for(&state, 22085, &world.tournament);
    assert_eq!(mcilroy.rating, Some(100.0));
    assert_eq!(mcilroy.usage, Some(50.0));

    let fitzpatrick = row_for(&state, 10091, &world.tournament);
    assert_eq!(fitzpatrick.rating, Some(fallback_rating()));
    assert_eq!(fitzpatrick.usage, Some(0.0));
}

#[tokio::test]
async fn resync_with_same_snapshot_changes_nothing() {
    let world = World::new(tournament("upcoming", None));
    let gateway = world.gateway();
    let tid = world.tournament.tournament_id;
    let feeds = snapshot(three_player_field(), rankings(), vec![]);

    apply_live_sync(&gateway, tid, &feeds, now()).await.unwrap();
    let after_first = gateway.snapshot();

    let summary = apply_live_sync(&gateway, tid, &feeds, now() + chrono::Duration::minutes(5))
        .await
        .unwrap();

    assert_eq!(summary.golfers_inserted, 0);
    assert_eq!(summary.golfers_updated, 0);
    assert_eq!(summary.tournament_golfers_inserted, 0);
    assert_eq!(summary.tournament_golfers_updated, 0);
    assert!(!summary.tournament_patched);
    assert_eq!(gateway.snapshot(), after_first);
}

#[tokio::test]
async fn player_dropped_from_field_is_pruned_before_start() {
    let world = World::new(tournament("upcoming", None))
        .with_golfer(18417, "Scottie Scheffler", true)
        .with_golfer(99999, "Withdrawn Player", true);
    let gateway = world.gateway();
    let tid = world.tournament.tournament_id;

    let feeds = snapshot(
        vec![field_player(18417, "Scheffler, Scottie", "2025-04-10 09:10")],
        vec![],
        vec![],
    );
    let summary = apply_live_sync(&gateway, tid, &feeds, now()).await.unwrap();

    assert_eq!(summary.tournament_golfers_deleted, 1);
    assert_eq!(summary.golfers_inserted, 0);

    let state = gateway.snapshot();
    assert!(state.tournament_golfer_for(99999, tid).is_none());
    assert!(state.tournament_golfer_for(18417, tid).is_some());
    assert!(state.golfer_by_api_id(99999).is_some());
}

#[tokio::test]
async fn player_only_in_live_feed_is_not_pruned() {
    let world = World::new(tournament("upcoming", None))
        .with_golfer(18417, "Scottie Scheffler", true)
        .with_golfer(22085, "Rory McIlroy", true);
    let gateway = world.gateway();
    let tid = world.tournament.tournament_id;

    let feeds = snapshot(
        vec![field_player(18417, "Scheffler, Scottie", "2025-04-10 09:10")],
        vec![],
        vec![live_player(22085, "McIlroy, Rory", "T1", json!(0))],
    );
    let summary = apply_live_sync(&gateway, tid, &feeds, now()).await.unwrap();

    assert_eq!(summary.tournament_golfers_deleted, 0);
    assert!(gateway.snapshot().tournament_golfer_for(22085, tid).is_some());
}

#[tokio::test]
async fn golfer_profiles_never_lose_known_values() {
    let world = World::new(tournament("upcoming", None)).with_golfer(18417, "Scheffler, Scottie", false);
    let gateway = world.gateway();
    let tid = world.tournament.tournament_id;

    let mut player = field_player(18417, "Scheffler, Scottie", "2025-04-10 09:10");
    player["country"] = json!("Unknown");
    let summary = apply_live_sync(&gateway, tid, &snapshot(vec![player], vec![], vec![]), now())
        .await
        .unwrap();

    assert_eq!(summary.golfers_inserted, 0);
    assert_eq!(summary.golfers_updated, 1);
    assert_eq!(summary.tournament_golfers_inserted, 1);

    let state = gateway.snapshot();
    let golfer = state.golfer_by_api_id(18417).unwrap();
    assert_eq!(golfer.name, "Scottie Scheffler");
    assert_eq!(golfer.country.as_deref(), Some("USA"));
    assert_eq!(golfer.world_rank, Some(10));
}

#[tokio::test]
async fn empty_roster_before_start_aborts_without_writes() {
    let world = World::new(tournament("upcoming", None));
    let gateway = world.gateway();
    let before = gateway.snapshot();
    let tid = world.tournament.tournament_id;

    let err = apply_live_sync(&gateway, tid, &snapshot(vec![], rankings(), vec![]), now())
        .await
        .unwrap_err();

    assert!(matches!(err, ImporterError::EmptyRoster(id) if id == tid));
    assert_eq!(gateway.snapshot(), before);
}

#[tokio::test]
async fn live_feed_is_the_roster_when_field_is_empty() {
    let world = World::new(tournament("upcoming", None));
    let gateway = world.gateway();
    let tid = world.tournament.tournament_id;

    let feeds = snapshot(
        vec![],
        vec![],
        vec![
            live_player(18417, "Scheffler, Scottie", "T1", json!(0)),
            live_player(22085, "McIlroy, Rory", "T1", json!(0)),
        ],
    );
    let summary = apply_live_sync(&gateway, tid, &feeds, now()).await.unwrap();

    assert_eq!(summary.golfers_inserted, 2);
    assert_eq!(summary.tournament_golfers_inserted, 2);
    assert_eq!(summary.tournament_golfers_updated, 2);
    assert_eq!(summary.live_players, 2);
    assert!(summary.skipped.is_empty());

    let state = gateway.snapshot();
    assert_eq!(state.tournaments[&tid].start_date, at(12, 0));
    assert_eq!(row_for(&state, 18417, &world.tournament).position.as_deref(), Some("T1"));
}

#[tokio::test]
async fn unknown_tournament_is_an_error() {
    let gateway = World::new(tournament("upcoming", None)).gateway();
    let missing = Uuid::new_v4();

    let err = apply_live_sync(&gateway, missing, &snapshot(three_player_field(), vec![], vec![]), now())
        .await
        .unwrap_err();

    assert!(matches!(err, ImporterError::TournamentNotFound(id) if id == missing));
}

#[tokio::test]
async fn live_row_without_participation_is_skipped_before_start() {
    let world = World::new(tournament("upcoming", None)).with_golfer(22085, "Rory McIlroy", false);
    let gateway = world.gateway();
    let tid = world.tournament.tournament_id;

    let feeds = snapshot(
        vec![field_player(18417, "Scheffler, Scottie", "2025-04-10 09:10")],
        vec![],
        vec![
            live_player(22085, "McIlroy, Rory", "T1", json!(0)),
            live_player(55555, "Unknown, Player", "T1", json!(0)),
        ],
    );
    let summary = apply_live_sync(&gateway, tid, &feeds, now()).await.unwrap();

    assert_eq!(summary.skipped_count(RowOutcome::SkippedMissingParticipation), 1);
    assert_eq!(summary.skipped_count(RowOutcome::SkippedUnknownGolfer), 1);
    assert!(gateway.snapshot().tournament_golfer_for(22085, tid).is_none());
}
