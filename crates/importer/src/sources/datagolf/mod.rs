//! DataGolf feeds: field list, skill rankings and live in-play scoring.

mod client;
pub mod models;
mod transformer;
mod validator;

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use storage::SyncGateway;
use tracing::info;
use uuid::Uuid;

pub use client::DataGolfClient;
pub use models::{DgRankings, FeedToken, FieldUpdates, InPlay};
pub use transformer::{EnrichedPlayer, JoinedFeeds, join_feeds, parse_timestamp};
pub use validator::{FeedValidator, ValidationReport};

use crate::fetch::HttpTransport;
use crate::sync::{SyncSummary, apply_live_sync};
use crate::{ImportContext, Result, traits::TournamentImporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Field,
    Rankings,
    Live,
}

impl Feed {
    pub const ALL: [Feed; 3] = [Feed::Field, Feed::Rankings, Feed::Live];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Field => "field-updates",
            Self::Rankings => "preds/get-dg-rankings",
            Self::Live => "preds/in-play",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Rankings => "rankings",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three feeds as fetched at one point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub field: FieldUpdates,
    pub rankings: DgRankings,
    pub live: InPlay,
}

impl FeedSnapshot {
    /// Pretty JSON of one feed, in the provider's own shape.
    pub fn feed_json(&self, feed: Feed) -> Result<String> {
        let json = match feed {
            Feed::Field => serde_json::to_string_pretty(&self.field)?,
            Feed::Rankings => serde_json::to_string_pretty(&self.rankings)?,
            Feed::Live => serde_json::to_string_pretty(&self.live)?,
        };
        Ok(json)
    }

    /// Writes each feed to `<dir>/<prefix>_<feed>.json`, creating `dir` if
    /// needed. Returns the written paths in [`Feed::ALL`] order.
    pub async fn save(&self, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(dir).await?;

        let mut paths = Vec::with_capacity(Feed::ALL.len());
        for feed in Feed::ALL {
            let path = dir.join(format!("{}_{}.json", prefix, feed));
            tokio::fs::write(&path, self.feed_json(feed)?).await?;
            info!("Exported {} feed to: {}", feed, path.display());
            paths.push(path);
        }
        Ok(paths)
    }

    pub async fn load(field: &Path, rankings: &Path, live: &Path) -> Result<Self> {
        Ok(Self {
            field: read_feed(field).await?,
            rankings: read_feed(rankings).await?,
            live: read_feed(live).await?,
        })
    }
}

async fn read_feed<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading snapshot from: {}", path.display());
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

/// Fetches the DataGolf feeds and reconciles them into one tournament.
pub struct DataGolfImporter<T = crate::fetch::ReqwestTransport> {
    client: DataGolfClient<T>,
}

impl<T: HttpTransport> DataGolfImporter<T> {
    pub fn new(client: DataGolfClient<T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &DataGolfClient<T> {
        &self.client
    }
}

#[async_trait]
impl<T: HttpTransport> TournamentImporter for DataGolfImporter<T> {
    async fn import<G: SyncGateway>(
        &self,
        tournament_id: Uuid,
        context: &ImportContext<'_, G>,
    ) -> Result<SyncSummary> {
        info!("Syncing tournament {} from DataGolf", tournament_id);

        let snapshot = self.client.fetch_snapshot().await?;
        apply_live_sync(context.gateway, tournament_id, &snapshot, Utc::now()).await
    }

    fn name(&self) -> &'static str {
        "DataGolf"
    }
}
