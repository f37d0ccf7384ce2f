pub mod config;
pub mod error;
pub mod fetch;
pub mod leaderboard;
pub mod query;
pub mod sources;
pub mod sync;
pub mod traits;

pub use config::DataGolfConfig;
pub use error::{ImporterError, Result};
pub use traits::{ImportContext, TournamentImporter};

pub use sources::datagolf::{DataGolfClient, DataGolfImporter, Feed, FeedSnapshot, FeedValidator};
pub use sync::{RowOutcome, SyncSummary, apply_live_sync};
