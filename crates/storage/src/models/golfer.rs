use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A player profile keyed by the provider's stable external id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Golfer {
    pub golfer_id: Uuid,
    pub api_id: i64,
    pub name: String,
    pub country: Option<String>,
    pub world_rank: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

/// Profile data observed in a feed for one external id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGolfer {
    pub api_id: i64,
    pub name: String,
    pub country: Option<String>,
    pub world_rank: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GolferUpdate {
    pub name: String,
    pub country: Option<String>,
    pub world_rank: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl Golfer {
    /// Merges freshly observed profile data into this golfer.
    ///
    /// Other ingestion paths write the same profiles, so the merge is
    /// monotonic: a known country or world rank is never replaced by an
    /// absent one. Returns `None` when nothing would change.
    pub fn merge(&self, incoming: &NewGolfer) -> Option<GolferUpdate> {
        let name = if incoming.name.is_empty() {
            self.name.clone()
        } else {
            incoming.name.clone()
        };
        let country = incoming.country.clone().or_else(|| self.country.clone());
        let world_rank = incoming.world_rank.or(self.world_rank);

        if name == self.name && country == self.country && world_rank == self.world_rank {
            return None;
        }

        Some(GolferUpdate {
            name,
            country,
            world_rank,
            updated_at: incoming.updated_at,
        })
    }
}

/// Trims a provider country and maps empty or "unknown" to absent.
pub fn normalize_country(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn golfer(country: Option<&str>, world_rank: Option<i32>) -> Golfer {
        Golfer {
            golfer_id: Uuid::new_v4(),
            api_id: 18417,
            name: "Scottie Scheffler".to_string(),
            country: country.map(str::to_string),
            world_rank,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn observed(country: Option<&str>, world_rank: Option<i32>) -> NewGolfer {
        NewGolfer {
            api_id: 18417,
            name: "Scottie Scheffler".to_string(),
            country: country.map(str::to_string),
            world_rank,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_merge_never_downgrades_to_absent() {
        let existing = golfer(Some("USA"), Some(1));
        assert_eq!(existing.merge(&observed(None, None)), None);
    }

    #[test]
    fn test_merge_takes_new_values() {
        let existing = golfer(None, Some(3));
        let update = existing.merge(&observed(Some("USA"), Some(1))).unwrap();
        assert_eq!(update.country.as_deref(), Some("USA"));
        assert_eq!(update.world_rank, Some(1));
    }

    #[test]
    fn test_merge_refreshes_name() {
        let existing = golfer(Some("USA"), Some(1));
        let mut incoming = observed(None, None);
        incoming.name = "Scottie Scheffler Jr.".to_string();
        let update = existing.merge(&incoming).unwrap();
        assert_eq!(update.name, "Scottie Scheffler Jr.");
        assert_eq!(update.country.as_deref(), Some("USA"));
    }

    #[test]
    fn test_normalize_country() {
        assert_eq!(normalize_country(Some("  USA ")), Some("USA".to_string()));
        assert_eq!(normalize_country(Some("Unknown")), None);
        assert_eq!(normalize_country(Some("UNKNOWN")), None);
        assert_eq!(normalize_country(Some("   ")), None);
        assert_eq!(normalize_country(None), None);
    }
}
