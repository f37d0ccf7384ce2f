use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Round number used once the final stroke-play round is over.
pub const FINISHED_ROUND: i16 = 5;

/// The final stroke-play round.
pub const FINAL_ROUND: i16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tournament status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for TournamentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tournament {
    pub tournament_id: Uuid,
    pub name: String,
    pub status: String,
    pub current_round: Option<i16>,
    pub live_play: bool,
    pub start_date: DateTime<Utc>,
    pub leaderboard_last_updated: Option<DateTime<Utc>>,
}

impl Tournament {
    pub fn parsed_status(&self) -> Result<TournamentStatus, UnknownStatus> {
        self.status.parse()
    }
}

/// Fields of a tournament the live sync may change. `None` leaves the stored
/// value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TournamentPatch {
    pub status: Option<TournamentStatus>,
    pub current_round: Option<i16>,
    pub live_play: Option<bool>,
    pub start_date: Option<DateTime<Utc>>,
    pub leaderboard_last_updated: Option<DateTime<Utc>>,
}

impl TournamentPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(&self, tournament: &mut Tournament) {
        if let Some(status) = self.status {
            tournament.status = status.as_str().to_string();
        }
        if let Some(round) = self.current_round {
            tournament.current_round = Some(round);
        }
        if let Some(live_play) = self.live_play {
            tournament.live_play = live_play;
        }
        if let Some(start_date) = self.start_date {
            tournament.start_date = start_date;
        }
        if let Some(updated) = self.leaderboard_last_updated {
            tournament.leaderboard_last_updated = Some(updated);
        }
    }
}
