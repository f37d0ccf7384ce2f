use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Tournament, TournamentPatch};

const TOURNAMENT_COLUMNS: &str = "tournament_id, name, status, current_round, live_play, \
     start_date, leaderboard_last_updated";

/// Repository for tournament rows inside a sync transaction
pub struct TournamentRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> TournamentRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&mut self, id: Uuid) -> Result<Option<Tournament>> {
        let tournament = sqlx::query_as::<_, Tournament>(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE tournament_id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(tournament)
    }

    /// Applies the set fields of `patch`; unset fields keep their value.
    pub async fn patch(&mut self, id: Uuid, patch: &TournamentPatch) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE tournaments
            SET status = COALESCE($2, status),
                current_round = COALESCE($3, current_round),
                live_play = COALESCE($4, live_play),
                start_date = COALESCE($5, start_date),
                leaderboard_last_updated = COALESCE($6, leaderboard_last_updated),
                updated_at = now()
            WHERE tournament_id = $1
            "#,
        )
        .bind(id)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.current_round)
        .bind(patch.live_play)
        .bind(patch.start_date)
        .bind(patch.leaderboard_last_updated)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
