use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use super::models::{DgRankings, FieldUpdates, InPlay};
use super::{Feed, FeedSnapshot};
use crate::config::DataGolfConfig;
use crate::error::{ImporterError, Result};
use crate::fetch::{FetchRequest, HttpTransport, ReqwestTransport, ResilientClient};
use crate::query::{build_query, endpoint_url, redact_key};

pub struct DataGolfClient<T = ReqwestTransport> {
    config: DataGolfConfig,
    http: ResilientClient<T>,
}

impl DataGolfClient<ReqwestTransport> {
    pub fn new(config: DataGolfConfig) -> Result<Self> {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> DataGolfClient<T> {
    /// Fails with [`ImporterError::MissingApiKey`] before any request when no
    /// key is configured.
    pub fn with_transport(config: DataGolfConfig, transport: T) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ImporterError::MissingApiKey);
        }

        let http = ResilientClient::new(transport, config.fetch.clone());
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &DataGolfConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        self.http.transport()
    }

    pub fn url(&self, feed: Feed) -> String {
        let tour = Some(self.config.tour.as_str());
        let key = Some(self.config.api_key.as_str());
        let json = Some("json");

        let query = match feed {
            Feed::Field => build_query([("tour", tour), ("file_format", json), ("key", key)]),
            Feed::Rankings => build_query([("file_format", json), ("key", key)]),
            Feed::Live => build_query([
                ("tour", tour),
                ("dead_heat", Some("no")),
                ("odds_format", Some("percent")),
                ("file_format", json),
                ("key", key),
            ]),
        };

        endpoint_url(&self.config.base_url, feed.path(), &query)
    }

    pub async fn fetch_field(&self) -> Result<FieldUpdates> {
        self.fetch_feed(Feed::Field, |v| v.get("field").is_some_and(Value::is_array))
            .await
    }

    pub async fn fetch_rankings(&self) -> Result<DgRankings> {
        self.fetch_feed(Feed::Rankings, |v| {
            v.get("rankings").is_some_and(Value::is_array)
        })
        .await
    }

    pub async fn fetch_live(&self) -> Result<InPlay> {
        self.fetch_feed(Feed::Live, Value::is_object).await
    }

    /// Fetches all three feeds concurrently. Any feed failing fails the
    /// whole snapshot.
    pub async fn fetch_snapshot(&self) -> Result<FeedSnapshot> {
        let (field, rankings, live) =
            tokio::try_join!(self.fetch_field(), self.fetch_rankings(), self.fetch_live())?;

        Ok(FeedSnapshot {
            field,
            rankings,
            live,
        })
    }

    async fn fetch_feed<D, F>(&self, feed: Feed, shape: F) -> Result<D>
    where
        D: DeserializeOwned,
        F: Fn(&Value) -> bool,
    {
        let url = self.url(feed);
        info!("Fetching {} feed from {}", feed, redact_key(&url));

        let fetched = self
            .http
            .fetch_validated(&FetchRequest::get(url), shape)
            .await
            .map_err(|failure| ImporterError::FetchError { feed, failure })?;

        info!("Fetched {} feed in {} attempt(s)", feed, fetched.attempts);
        Ok(fetched.data)
    }
}
