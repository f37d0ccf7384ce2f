use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Golfer, GolferUpdate, NewGolfer};

const GOLFER_COLUMNS: &str = "golfer_id, api_id, name, country, world_rank, updated_at";

pub struct GolferRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> GolferRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Find golfer by provider id
    pub async fn find_by_api_id(&mut self, api_id: i64) -> Result<Option<Golfer>> {
        let golfer = sqlx::query_as::<_, Golfer>(&format!(
            "SELECT {GOLFER_COLUMNS} FROM golfers WHERE api_id = $1"
        ))
        .bind(api_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(golfer)
    }

    /// Insert a golfer. A concurrent writer that got there first surfaces as
    /// `UniqueViolation` without aborting the surrounding transaction.
    pub async fn create(&mut self, golfer: &NewGolfer) -> Result<Golfer> {
        sqlx::query_as::<_, Golfer>(&format!(
            r#"
            INSERT INTO golfers (golfer_id, api_id, name, country, world_rank, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (api_id) DO NOTHING
            RETURNING {GOLFER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(golfer.api_id)
        .bind(&golfer.name)
        .bind(&golfer.country)
        .bind(golfer.world_rank)
        .bind(golfer.updated_at)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| StorageError::UniqueViolation(format!("golfers.api_id = {}", golfer.api_id)))
    }

    pub async fn update(&mut self, id: Uuid, update: &GolferUpdate) -> Result<Golfer> {
        sqlx::query_as::<_, Golfer>(&format!(
            r#"
            UPDATE golfers
            SET name = $2, country = $3, world_rank = $4, updated_at = $5
            WHERE golfer_id = $1
            RETURNING {GOLFER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.name)
        .bind(&update.country)
        .bind(update.world_rank)
        .bind(update.updated_at)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or(StorageError::NotFound)
    }
}
