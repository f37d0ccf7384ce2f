use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::Result;
use crate::gateway::{LiveSyncStore, SyncGateway};
use crate::models::{
    Golfer, GolferUpdate, NewGolfer, Participant, Team, Tournament, TournamentGolfer,
    TournamentPatch,
};
use crate::repository::{
    GolferRepository, TeamRepository, TournamentGolferRepository, TournamentRepository,
};

/// PostgreSQL-backed gateway.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// One sync's worth of reads and writes in a single transaction.
pub struct PgSyncSession {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl SyncGateway for Database {
    type Session = PgSyncSession;

    async fn begin(&self) -> Result<PgSyncSession> {
        let tx = self.pool.begin().await?;
        Ok(PgSyncSession { tx })
    }

    async fn commit(&self, session: PgSyncSession) -> Result<()> {
        session.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl LiveSyncStore for PgSyncSession {
    async fn find_tournament(&mut self, tournament_id: Uuid) -> Result<Option<Tournament>> {
        TournamentRepository::new(&mut *self.tx)
            .find_by_id(tournament_id)
            .await
    }

    async fn patch_tournament(
        &mut self,
        tournament_id: Uuid,
        patch: &TournamentPatch,
    ) -> Result<()> {
        TournamentRepository::new(&mut *self.tx)
            .patch(tournament_id, patch)
            .await
    }

    async fn find_golfer_by_api_id(&mut self, api_id: i64) -> Result<Option<Golfer>> {
        GolferRepository::new(&mut *self.tx)
            .find_by_api_id(api_id)
            .await
    }

    async fn insert_golfer(&mut self, golfer: &NewGolfer) -> Result<Golfer> {
        GolferRepository::new(&mut *self.tx).create(golfer).await
    }

    async fn update_golfer(&mut self, golfer_id: Uuid, update: &GolferUpdate) -> Result<Golfer> {
        GolferRepository::new(&mut *self.tx)
            .update(golfer_id, update)
            .await
    }

    async fn list_participants(&mut self, tournament_id: Uuid) -> Result<Vec<Participant>> {
        TournamentGolferRepository::new(&mut *self.tx)
            .list_participants(tournament_id)
            .await
    }

    async fn find_tournament_golfer(
        &mut self,
        golfer_id: Uuid,
        tournament_id: Uuid,
    ) -> Result<Option<TournamentGolfer>> {
        TournamentGolferRepository::new(&mut *self.tx)
            .find(golfer_id, tournament_id)
            .await
    }

    async fn insert_tournament_golfer(&mut self, row: &TournamentGolfer) -> Result<()> {
        TournamentGolferRepository::new(&mut *self.tx).create(row).await
    }

    async fn update_tournament_golfer(&mut self, row: &TournamentGolfer) -> Result<()> {
        TournamentGolferRepository::new(&mut *self.tx).update(row).await
    }

    async fn delete_tournament_golfer(&mut self, tournament_golfer_id: Uuid) -> Result<()> {
        TournamentGolferRepository::new(&mut *self.tx)
            .delete(tournament_golfer_id)
            .await
    }

    async fn list_teams(&mut self, tournament_id: Uuid) -> Result<Vec<Team>> {
        TeamRepository::new(&mut *self.tx)
            .list_for_tournament(tournament_id)
            .await
    }
}
