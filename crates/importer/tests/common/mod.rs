//! Shared fixtures for the sync scenarios.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use importer::FeedSnapshot;
use serde_json::{Value, json};
use storage::MemoryGateway;
use storage::memory::MemoryState;
use storage::models::{Golfer, Team, Tournament, TournamentGolfer};
use uuid::Uuid;

/// Wall clock used by every scenario: two days before the first tee time.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 8, 12, 0, 0).unwrap()
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 10, hour, minute, 0).unwrap()
}

pub fn tournament(status: &str, current_round: Option<i16>) -> Tournament {
    Tournament {
        tournament_id: Uuid::new_v4(),
        name: "The Masters".to_string(),
        status: status.to_string(),
        current_round,
        live_play: false,
        start_date: at(12, 0),
        leaderboard_last_updated: None,
    }
}

pub fn golfer(api_id: i64, name: &str) -> Golfer {
    Golfer {
        golfer_id: Uuid::new_v4(),
        api_id,
        name: name.to_string(),
        country: Some("USA".to_string()),
        world_rank: Some(10),
        updated_at: now(),
    }
}

pub fn participation(golfer: &Golfer, tournament: &Tournament) -> TournamentGolfer {
    TournamentGolfer::new(golfer.golfer_id, tournament.tournament_id, now())
}

pub fn team(tournament: &Tournament, api_ids: &[i64]) -> Team {
    Team {
        team_id: Uuid::new_v4(),
        tournament_id: tournament.tournament_id,
        golfer_api_ids: api_ids.to_vec(),
    }
}

pub struct World {
    pub tournament: Tournament,
    pub golfers: Vec<Golfer>,
    pub rows: Vec<TournamentGolfer>,
    pub teams: Vec<Team>,
}

impl World {
    pub fn new(tournament: Tournament) -> Self {
        Self {
            tournament,
            golfers: Vec::new(),
            rows: Vec::new(),
            teams: Vec::new(),
        }
    }

    /// Adds a known golfer, optionally already entered in the tournament.
    pub fn with_golfer(mut self, api_id: i64, name: &str, entered: bool) -> Self {
        let golfer = golfer(api_id, name);
        if entered {
            self.rows.push(participation(&golfer, &self.tournament));
        }
        self.golfers.push(golfer);
        self
    }

    pub fn with_team(mut self, api_ids: &[i64]) -> Self {
        self.teams.push(team(&self.tournament, api_ids));
        self
    }

    pub fn gateway(&self) -> MemoryGateway {
        let mut state = MemoryState::default();
        state
            .tournaments
            .insert(self.tournament.tournament_id, self.tournament.clone());
        for golfer in &self.golfers {
            state.golfers.insert(golfer.golfer_id, golfer.clone());
        }
        for row in &self.rows {
            state
                .tournament_golfers
                .insert(row.tournament_golfer_id, row.clone());
        }
        state.teams = self.teams.clone();
        MemoryGateway::new(state)
    }
}

pub fn field_player(dg_id: i64, name: &str, r1_teetime: &str) -> Value {
    json!({
        "am": 0,
        "country": "USA",
        "dg_id": dg_id,
        "dk_salary": 9000,
        "fd_salary": 11000,
        "player_name": name,
        "r1_teetime": r1_teetime,
        "r2_teetime": null,
        "r3_teetime": null,
        "r4_teetime": null,
        "unofficial": 0
    })
}

pub fn ranked(dg_id: i64, name: &str, skill_estimate: f64, owgr_rank: i32) -> Value {
    json!({
        "am": 0,
        "country": "USA",
        "datagolf_rank": owgr_rank,
        "dg_id": dg_id,
        "dg_skill_estimate": skill_estimate,
        "owgr_rank": owgr_rank,
        "player_name": name,
        "primary_tour": "PGA"
    })
}

pub fn live_player(dg_id: i64, name: &str, position: &str, thru: Value) -> Value {
    json!({
        "country": "USA",
        "current_pos": position,
        "current_score": -4,
        "dg_id": dg_id,
        "end_hole": 18,
        "make_cut": 0.95,
        "player_name": name,
        "R1": 68,
        "R2": null,
        "R3": null,
        "R4": null,
        "round": -2,
        "thru": thru,
        "today": -2,
        "top_5": 0.2,
        "top_10": 0.35,
        "top_20": 0.6,
        "win": 0.05
    })
}

pub fn snapshot(field: Vec<Value>, rankings: Vec<Value>, live: Vec<Value>) -> FeedSnapshot {
    snapshot_with_round(field, rankings, live, 1)
}

pub fn snapshot_with_round(
    field: Vec<Value>,
    rankings: Vec<Value>,
    live: Vec<Value>,
    current_round: i32,
) -> FeedSnapshot {
    serde_json::from_value(json!({
        "field": {
            "current_round": current_round,
            "event_name": "The Masters",
            "field": field
        },
        "rankings": {
            "last_updated": "2025-04-07 10:00:00",
            "rankings": rankings
        },
        "live": {
            "data": live,
            "info": {
                "current_round": current_round,
                "event_name": "The Masters",
                "last_update": "2025-04-10 18:30:00"
            }
        }
    }))
    .unwrap()
}

pub fn row_for(state: &MemoryState, api_id: i64, tournament: &Tournament) -> TournamentGolfer {
    state
        .tournament_golfer_for(api_id, tournament.tournament_id)
        .cloned()
        .unwrap_or_else(|| panic!("no participation row for {api_id}"))
}
