use serde::{Deserialize, Serialize};

/// A scalar the provider sends as a number, a bool or a string depending on
/// the field and the day.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum FeedToken {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl FeedToken {
    pub fn as_text(&self) -> String {
        match self {
            Self::Int(i) => i.to_string(),
            Self::Float(f) if f.fract() == 0.0 && f.is_finite() => format!("{}", *f as i64),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }

    /// Interprets the token as a yes/no flag.
    pub fn is_set(&self) -> bool {
        match self {
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Bool(b) => *b,
            Self::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "y" | "wd"
            ),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct FieldUpdates {
    pub current_round: Option<i32>,
    pub event_name: Option<String>,
    #[serde(default)]
    pub field: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldEntry {
    pub am: Option<FeedToken>,
    pub country: Option<String>,
    pub dg_id: i64,
    pub dk_salary: Option<FeedToken>,
    pub fd_salary: Option<FeedToken>,
    pub player_name: String,
    pub r1_teetime: Option<String>,
    pub r2_teetime: Option<String>,
    pub r3_teetime: Option<String>,
    pub r4_teetime: Option<String>,
    pub unofficial: Option<FeedToken>,
    pub wd: Option<FeedToken>,
}

impl FieldEntry {
    pub fn tee_times(&self) -> [Option<String>; 4] {
        [
            self.r1_teetime.clone(),
            self.r2_teetime.clone(),
            self.r3_teetime.clone(),
            self.r4_teetime.clone(),
        ]
        .map(|t| t.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
    }

    pub fn withdrawn(&self) -> bool {
        self.wd.as_ref().is_some_and(FeedToken::is_set)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DgRankings {
    pub last_updated: Option<String>,
    #[serde(default)]
    pub rankings: Vec<RankingEntry>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RankingEntry {
    pub am: Option<FeedToken>,
    pub country: Option<String>,
    pub datagolf_rank: Option<i32>,
    pub dg_id: i64,
    pub dg_skill_estimate: Option<f64>,
    pub owgr_rank: Option<i32>,
    pub player_name: String,
    pub primary_tour: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct InPlay {
    #[serde(default)]
    pub data: Vec<LiveEntry>,
    #[serde(default)]
    pub info: InPlayInfo,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct InPlayInfo {
    pub current_round: Option<i32>,
    pub event_name: Option<String>,
    pub last_update: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LiveEntry {
    pub country: Option<String>,
    pub current_pos: Option<FeedToken>,
    pub current_score: Option<i32>,
    pub dg_id: i64,
    pub end_hole: Option<i32>,
    pub make_cut: Option<f64>,
    pub player_name: String,
    #[serde(rename = "R1")]
    pub r1: Option<i32>,
    #[serde(rename = "R2")]
    pub r2: Option<i32>,
    #[serde(rename = "R3")]
    pub r3: Option<i32>,
    #[serde(rename = "R4")]
    pub r4: Option<i32>,
    pub round: Option<i32>,
    pub thru: Option<FeedToken>,
    pub today: Option<i32>,
    pub top_5: Option<f64>,
    pub top_10: Option<f64>,
    pub top_20: Option<f64>,
    pub win: Option<f64>,
}

impl LiveEntry {
    pub fn position(&self) -> Option<String> {
        self.current_pos
            .as_ref()
            .map(FeedToken::as_text)
            .filter(|s| !s.is_empty())
    }

    pub fn thru_token(&self) -> Option<String> {
        self.thru
            .as_ref()
            .map(FeedToken::as_text)
            .filter(|s| !s.is_empty())
    }
}
