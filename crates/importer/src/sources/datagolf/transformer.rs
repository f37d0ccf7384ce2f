//! Joins the three DataGolf feeds into one typed record per player before
//! any write logic runs.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDateTime, Utc};
use storage::models::{NormalizedGolferName, normalize_country};
use storage::services::{fallback_rating, normalize_rating};

use super::models::{FieldEntry, LiveEntry, RankingEntry};
use super::FeedSnapshot;

/// Everything the feeds say about one player.
#[derive(Debug, Clone)]
pub struct EnrichedPlayer {
    pub api_id: i64,
    pub name: NormalizedGolferName,
    pub country: Option<String>,
    pub world_rank: Option<i32>,
    pub skill_estimate: Option<f64>,
    pub tee_times: [Option<String>; 4],
    /// Listed in the field feed.
    pub in_field: bool,
    pub live: Option<LiveEntry>,
}

impl EnrichedPlayer {
    fn new(api_id: i64) -> Self {
        Self {
            api_id,
            name: NormalizedGolferName::from_provider(""),
            country: None,
            world_rank: None,
            skill_estimate: None,
            tee_times: Default::default(),
            in_field: false,
            live: None,
        }
    }

    /// Display rating from the rankings feed, if the player is ranked.
    pub fn rating(&self) -> Option<f64> {
        self.skill_estimate.map(normalize_rating)
    }

    /// Rating to store: the fresh one, else `previous`, else the rating of an
    /// unranked player.
    pub fn rating_or(&self, previous: Option<f64>) -> f64 {
        self.rating().or(previous).unwrap_or_else(fallback_rating)
    }

    fn absorb_field(&mut self, entry: &FieldEntry) {
        self.name = NormalizedGolferName::from_provider(&entry.player_name);
        self.country = normalize_country(entry.country.as_deref()).or(self.country.take());
        self.tee_times = entry.tee_times();
        self.in_field = true;
    }

    fn absorb_live(&mut self, entry: &LiveEntry) {
        if self.name.as_str().is_empty() {
            self.name = NormalizedGolferName::from_provider(&entry.player_name);
        }
        if self.country.is_none() {
            self.country = normalize_country(entry.country.as_deref());
        }
        self.live = Some(entry.clone());
    }

    fn absorb_ranking(&mut self, entry: &RankingEntry) {
        if self.name.as_str().is_empty() {
            self.name = NormalizedGolferName::from_provider(&entry.player_name);
        }
        if self.country.is_none() {
            self.country = normalize_country(entry.country.as_deref());
        }
        self.world_rank = entry.owgr_rank;
        self.skill_estimate = entry.dg_skill_estimate.filter(|x| x.is_finite());
    }
}

#[derive(Debug, Clone, Default)]
pub struct JoinedFeeds {
    pub players: BTreeMap<i64, EnrichedPlayer>,
    pub field_ids: BTreeSet<i64>,
    pub live_ids: BTreeSet<i64>,
    pub current_round: Option<i32>,
    pub event_name: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    /// Earliest parseable round-one tee time in the field list.
    pub earliest_tee_time: Option<DateTime<Utc>>,
}

impl JoinedFeeds {
    /// Players the tournament should have before play starts: the field
    /// list, or the live feed when the field list is empty.
    pub fn roster(&self) -> impl Iterator<Item = &EnrichedPlayer> {
        let from_field = !self.field_ids.is_empty();
        self.players.values().filter(move |p| {
            if from_field {
                p.in_field
            } else {
                p.live.is_some()
            }
        })
    }

    pub fn live_players(&self) -> impl Iterator<Item = (&EnrichedPlayer, &LiveEntry)> {
        self.players
            .values()
            .filter_map(|p| p.live.as_ref().map(|live| (p, live)))
    }

    /// True when the player appears in either the field or the live feed.
    pub fn contains(&self, api_id: i64) -> bool {
        self.field_ids.contains(&api_id) || self.live_ids.contains(&api_id)
    }
}

/// Merges field, rankings and live feeds by provider id.
///
/// Rankings cover hundreds of players outside the event, so they only enrich
/// players already present in the field or live feed.
pub fn join_feeds(snapshot: &FeedSnapshot) -> JoinedFeeds {
    let mut joined = JoinedFeeds {
        current_round: snapshot
            .live
            .info
            .current_round
            .or(snapshot.field.current_round),
        event_name: snapshot
            .live
            .info
            .event_name
            .clone()
            .or_else(|| snapshot.field.event_name.clone()),
        last_update: snapshot
            .live
            .info
            .last_update
            .as_deref()
            .and_then(parse_timestamp),
        ..JoinedFeeds::default()
    };

    for entry in &snapshot.field.field {
        joined
            .players
            .entry(entry.dg_id)
            .or_insert_with(|| EnrichedPlayer::new(entry.dg_id))
            .absorb_field(entry);
        joined.field_ids.insert(entry.dg_id);

        if let Some(tee_time) = entry.r1_teetime.as_deref().and_then(parse_timestamp) {
            joined.earliest_tee_time = Some(match joined.earliest_tee_time {
                Some(current) => current.min(tee_time),
                None => tee_time,
            });
        }
    }

    for entry in &snapshot.live.data {
        joined
            .players
            .entry(entry.dg_id)
            .or_insert_with(|| EnrichedPlayer::new(entry.dg_id))
            .absorb_live(entry);
        joined.live_ids.insert(entry.dg_id);
    }

    for entry in &snapshot.rankings.rankings {
        if let Some(player) = joined.players.get_mut(&entry.dg_id) {
            player.absorb_ranking(entry);
        }
    }

    joined
}

/// Parses a provider timestamp as UTC. Accepts RFC 3339 and
/// `YYYY-MM-DD HH:MM[:SS]` with a space or `T` separator.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
