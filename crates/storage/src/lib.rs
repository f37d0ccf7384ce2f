pub mod database;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod models;
pub mod repository;
pub mod services;

pub use database::{Database, PgSyncSession};
pub use error::{Result, StorageError};
pub use gateway::{LiveSyncStore, SyncGateway};
pub use memory::{MemoryGateway, MemoryState};
