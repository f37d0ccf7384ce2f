use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Team;

pub struct TeamRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> TeamRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Rosters entered for a tournament
    pub async fn list_for_tournament(&mut self, tournament_id: Uuid) -> Result<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT team_id, tournament_id, golfer_api_ids
            FROM teams
            WHERE tournament_id = $1
            ORDER BY team_id
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(teams)
    }
}
