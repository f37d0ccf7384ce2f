use crate::fetch::FetchConfig;

pub const DEFAULT_BASE_URL: &str = "https://feeds.datagolf.com";
pub const DEFAULT_TOUR: &str = "pga";

/// Connection settings for the DataGolf feeds.
///
/// Built by the caller and handed to the client; nothing below the binary
/// reads the environment.
#[derive(Debug, Clone)]
pub struct DataGolfConfig {
    pub base_url: String,
    pub api_key: String,
    pub tour: String,
    pub fetch: FetchConfig,
}

impl DataGolfConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            tour: DEFAULT_TOUR.to_string(),
            fetch: FetchConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_tour(mut self, tour: impl Into<String>) -> Self {
        self.tour = tour.into();
        self
    }

    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }
}
