use storage::error::StorageError;
use storage::models::UnknownStatus;
use thiserror::Error;
use uuid::Uuid;

use crate::fetch::FetchFailure;
use crate::sources::datagolf::Feed;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("DataGolf API key is not configured")]
    MissingApiKey,

    #[error("Failed to fetch {feed} feed: {failure}")]
    FetchError { feed: Feed, failure: FetchFailure },

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Tournament {0} not found")]
    TournamentNotFound(Uuid),

    #[error("Tournament {0} has no roster: field and live feeds are both empty")]
    EmptyRoster(Uuid),

    #[error("Invalid tournament status: {0}")]
    InvalidStatus(#[from] UnknownStatus),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ImporterError {
    /// Feed that failed, for fetch errors.
    pub fn feed(&self) -> Option<Feed> {
        match self {
            Self::FetchError { feed, .. } => Some(*feed),
            _ => None,
        }
    }
}
