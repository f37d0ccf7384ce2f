use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A fantasy entrant's roster for one tournament, by provider golfer id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub team_id: Uuid,
    pub tournament_id: Uuid,
    pub golfer_api_ids: Vec<i64>,
}
