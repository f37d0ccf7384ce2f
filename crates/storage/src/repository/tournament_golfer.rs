use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Participant, TournamentGolfer};

const TOURNAMENT_GOLFER_COLUMNS: &str = "tg.tournament_golfer_id, tg.golfer_id, tg.tournament_id, \
     tg.position, tg.position_change, tg.score, tg.today, tg.thru, tg.end_hole, \
     tg.round_one, tg.round_two, tg.round_three, tg.round_four, \
     tg.round_one_tee_time, tg.round_two_tee_time, tg.round_three_tee_time, tg.round_four_tee_time, \
     tg.make_cut, tg.top_ten, tg.top_twenty, tg.win, tg.world_rank, tg.rating, tg.usage, tg.updated_at";

pub struct TournamentGolferRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> TournamentGolferRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// List participation rows of a tournament with each golfer's provider id
    pub async fn list_participants(&mut self, tournament_id: Uuid) -> Result<Vec<Participant>> {
        let participants = sqlx::query_as::<_, Participant>(&format!(
            r#"
            SELECT {TOURNAMENT_GOLFER_COLUMNS}, g.api_id AS golfer_api_id
            FROM tournament_golfers tg
            JOIN golfers g ON g.golfer_id = tg.golfer_id
            WHERE tg.tournament_id = $1
            ORDER BY g.api_id
            "#
        ))
        .bind(tournament_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(participants)
    }

    pub async fn find(
        &mut self,
        golfer_id: Uuid,
        tournament_id: Uuid,
    ) -> Result<Option<TournamentGolfer>> {
        let row = sqlx::query_as::<_, TournamentGolfer>(&format!(
            r#"
            SELECT {TOURNAMENT_GOLFER_COLUMNS}
            FROM tournament_golfers tg
            WHERE tg.golfer_id = $1 AND tg.tournament_id = $2
            "#
        ))
        .bind(golfer_id)
        .bind(tournament_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row)
    }

    pub async fn create(&mut self, row: &TournamentGolfer) -> Result<()> {
        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO tournament_golfers (
                tournament_golfer_id, golfer_id, tournament_id,
                position, position_change, score, today, thru, end_hole,
                round_one, round_two, round_three, round_four,
                round_one_tee_time, round_two_tee_time, round_three_tee_time, round_four_tee_time,
                make_cut, top_ten, top_twenty, win, world_rank, rating, usage, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25)
            ON CONFLICT (golfer_id, tournament_id) DO NOTHING
            RETURNING tournament_golfer_id
            "#,
        )
        .bind(row.tournament_golfer_id)
        .bind(row.golfer_id)
        .bind(row.tournament_id)
        .bind(&row.position)
        .bind(row.position_change)
        .bind(row.score)
        .bind(row.today)
        .bind(row.thru)
        .bind(row.end_hole)
        .bind(row.round_one)
        .bind(row.round_two)
        .bind(row.round_three)
        .bind(row.round_four)
        .bind(&row.round_one_tee_time)
        .bind(&row.round_two_tee_time)
        .bind(&row.round_three_tee_time)
        .bind(&row.round_four_tee_time)
        .bind(row.make_cut)
        .bind(row.top_ten)
        .bind(row.top_twenty)
        .bind(row.win)
        .bind(row.world_rank)
        .bind(row.rating)
        .bind(row.usage)
        .bind(row.updated_at)
        .fetch_optional(&mut *self.conn)
        .await?;

        match inserted {
            Some(_) => Ok(()),
            None => Err(StorageError::UniqueViolation(format!(
                "tournament_golfers ({}, {})",
                row.golfer_id, row.tournament_id
            ))),
        }
    }

    pub async fn update(&mut self, row: &TournamentGolfer) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE tournament_golfers
            SET position = $2, position_change = $3, score = $4, today = $5, thru = $6,
                end_hole = $7, round_one = $8, round_two = $9, round_three = $10,
                round_four = $11, round_one_tee_time = $12, round_two_tee_time = $13,
                round_three_tee_time = $14, round_four_tee_time = $15, make_cut = $16,
                top_ten = $17, top_twenty = $18, win = $19, world_rank = $20, rating = $21,
                usage = $22, updated_at = $23
            WHERE tournament_golfer_id = $1
            "#,
        )
        .bind(row.tournament_golfer_id)
        .bind(&row.position)
        .bind(row.position_change)
        .bind(row.score)
        .bind(row.today)
        .bind(row.thru)
        .bind(row.end_hole)
        .bind(row.round_one)
        .bind(row.round_two)
        .bind(row.round_three)
        .bind(row.round_four)
        .bind(&row.round_one_tee_time)
        .bind(&row.round_two_tee_time)
        .bind(&row.round_three_tee_time)
        .bind(&row.round_four_tee_time)
        .bind(row.make_cut)
        .bind(row.top_ten)
        .bind(row.top_twenty)
        .bind(row.win)
        .bind(row.world_rank)
        .bind(row.rating)
        .bind(row.usage)
        .bind(row.updated_at)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Delete a participation row by ID
    pub async fn delete(&mut self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tournament_golfers WHERE tournament_golfer_id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
