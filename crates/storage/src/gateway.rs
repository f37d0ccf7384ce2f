//! Persistence seams used by the live sync.
//!
//! The sync runs inside a single session: every read and write goes through
//! one [`LiveSyncStore`], and nothing becomes visible until the owning
//! [`SyncGateway`] commits it. Dropping a session without committing discards
//! its writes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Golfer, GolferUpdate, NewGolfer, Participant, Team, Tournament, TournamentGolfer,
    TournamentPatch,
};

#[async_trait]
pub trait LiveSyncStore: Send {
    async fn find_tournament(&mut self, tournament_id: Uuid) -> Result<Option<Tournament>>;

    async fn patch_tournament(&mut self, tournament_id: Uuid, patch: &TournamentPatch)
    -> Result<()>;

    async fn find_golfer_by_api_id(&mut self, api_id: i64) -> Result<Option<Golfer>>;

    /// Fails with a unique violation when the external id already exists.
    async fn insert_golfer(&mut self, golfer: &NewGolfer) -> Result<Golfer>;

    async fn update_golfer(&mut self, golfer_id: Uuid, update: &GolferUpdate) -> Result<Golfer>;

    async fn list_participants(&mut self, tournament_id: Uuid) -> Result<Vec<Participant>>;

    async fn find_tournament_golfer(
        &mut self,
        golfer_id: Uuid,
        tournament_id: Uuid,
    ) -> Result<Option<TournamentGolfer>>;

    /// Fails with a unique violation when the `(golfer, tournament)` pair
    /// already has a row.
    async fn insert_tournament_golfer(&mut self, row: &TournamentGolfer) -> Result<()>;

    async fn update_tournament_golfer(&mut self, row: &TournamentGolfer) -> Result<()>;

    async fn delete_tournament_golfer(&mut self, tournament_golfer_id: Uuid) -> Result<()>;

    async fn list_teams(&mut self, tournament_id: Uuid) -> Result<Vec<Team>>;
}

#[async_trait]
pub trait SyncGateway: Send + Sync {
    type Session: LiveSyncStore;

    async fn begin(&self) -> Result<Self::Session>;

    async fn commit(&self, session: Self::Session) -> Result<()>;
}
