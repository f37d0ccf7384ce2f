//! In-process gateway with the same transactional behaviour as PostgreSQL:
//! a session works on a private copy that replaces the shared state only on
//! commit. Used by scenario tests and offline replays.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::gateway::{LiveSyncStore, SyncGateway};
use crate::models::{
    Golfer, GolferUpdate, NewGolfer, Participant, Team, Tournament, TournamentGolfer,
    TournamentPatch,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryState {
    pub tournaments: BTreeMap<Uuid, Tournament>,
    pub golfers: BTreeMap<Uuid, Golfer>,
    pub tournament_golfers: BTreeMap<Uuid, TournamentGolfer>,
    pub teams: Vec<Team>,
}

impl MemoryState {
    pub fn golfer_by_api_id(&self, api_id: i64) -> Option<&Golfer> {
        self.golfers.values().find(|g| g.api_id == api_id)
    }

    pub fn tournament_golfer_for(&self, api_id: i64, tournament_id: Uuid) -> Option<&TournamentGolfer> {
        let golfer = self.golfer_by_api_id(api_id)?;
        self.tournament_golfers
            .values()
            .find(|tg| tg.golfer_id == golfer.golfer_id && tg.tournament_id == tournament_id)
    }

    pub fn rows_for_tournament(&self, tournament_id: Uuid) -> Vec<&TournamentGolfer> {
        self.tournament_golfers
            .values()
            .filter(|tg| tg.tournament_id == tournament_id)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryGateway {
    pub fn new(state: MemoryState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Copy of the committed state.
    pub fn snapshot(&self) -> MemoryState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct MemorySession {
    state: MemoryState,
}

#[async_trait]
impl SyncGateway for MemoryGateway {
    type Session = MemorySession;

    async fn begin(&self) -> Result<MemorySession> {
        Ok(MemorySession {
            state: self.snapshot(),
        })
    }

    async fn commit(&self, session: MemorySession) -> Result<()> {
        *self.lock() = session.state;
        Ok(())
    }
}

#[async_trait]
impl LiveSyncStore for MemorySession {
    async fn find_tournament(&mut self, tournament_id: Uuid) -> Result<Option<Tournament>> {
        Ok(self.state.tournaments.get(&tournament_id).cloned())
    }

    async fn patch_tournament(
        &mut self,
        tournament_id: Uuid,
        patch: &TournamentPatch,
    ) -> Result<()> {
        let tournament = self
            .state
            .tournaments
            .get_mut(&tournament_id)
            .ok_or(StorageError::NotFound)?;
        patch.apply_to(tournament);
        Ok(())
    }

    async fn find_golfer_by_api_id(&mut self, api_id: i64) -> Result<Option<Golfer>> {
        Ok(self.state.golfer_by_api_id(api_id).cloned())
    }

    async fn insert_golfer(&mut self, golfer: &NewGolfer) -> Result<Golfer> {
        if self.state.golfer_by_api_id(golfer.api_id).is_some() {
            return Err(StorageError::UniqueViolation(format!(
                "golfers.api_id = {}",
                golfer.api_id
            )));
        }

        let created = Golfer {
            golfer_id: Uuid::new_v4(),
            api_id: golfer.api_id,
            name: golfer.name.clone(),
            country: golfer.country.clone(),
            world_rank: golfer.world_rank,
            updated_at: golfer.updated_at,
        };
        self.state.golfers.insert(created.golfer_id, created.clone());
        Ok(created)
    }

    async fn update_golfer(&mut self, golfer_id: Uuid, update: &GolferUpdate) -> Result<Golfer> {
        let golfer = self
            .state
            .golfers
            .get_mut(&golfer_id)
            .ok_or(StorageError::NotFound)?;
        golfer.name = update.name.clone();
        golfer.country = update.country.clone();
        golfer.world_rank = update.world_rank;
        golfer.updated_at = update.updated_at;
        Ok(golfer.clone())
    }

    async fn list_participants(&mut self, tournament_id: Uuid) -> Result<Vec<Participant>> {
        let mut participants = self
            .state
            .rows_for_tournament(tournament_id)
            .into_iter()
            .filter_map(|row| {
                let golfer = self.state.golfers.get(&row.golfer_id)?;
                Some(Participant {
                    row: row.clone(),
                    golfer_api_id: golfer.api_id,
                })
            })
            .collect::<Vec<_>>();
        participants.sort_by_key(|p| p.golfer_api_id);
        Ok(participants)
    }

    async fn find_tournament_golfer(
        &mut self,
        golfer_id: Uuid,
        tournament_id: Uuid,
    ) -> Result<Option<TournamentGolfer>> {
        Ok(self
            .state
            .tournament_golfers
            .values()
            .find(|tg| tg.golfer_id == golfer_id && tg.tournament_id == tournament_id)
            .cloned())
    }

    async fn insert_tournament_golfer(&mut self, row: &TournamentGolfer) -> Result<()> {
        let duplicate = self
            .state
            .tournament_golfers
            .values()
            .any(|tg| tg.golfer_id == row.golfer_id && tg.tournament_id == row.tournament_id);
        if duplicate {
            return Err(StorageError::UniqueViolation(format!(
                "tournament_golfers ({}, {})",
                row.golfer_id, row.tournament_id
            )));
        }

        self.state
            .tournament_golfers
            .insert(row.tournament_golfer_id, row.clone());
        Ok(())
    }

    async fn update_tournament_golfer(&mut self, row: &TournamentGolfer) -> Result<()> {
        let stored = self
            .state
            .tournament_golfers
            .get_mut(&row.tournament_golfer_id)
            .ok_or(StorageError::NotFound)?;
        *stored = row.clone();
        Ok(())
    }

    async fn delete_tournament_golfer(&mut self, tournament_golfer_id: Uuid) -> Result<()> {
        self.state
            .tournament_golfers
            .remove(&tournament_golfer_id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    async fn list_teams(&mut self, tournament_id: Uuid) -> Result<Vec<Team>> {
        Ok(self
            .state
            .teams
            .iter()
            .filter(|t| t.tournament_id == tournament_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn new_golfer(api_id: i64) -> NewGolfer {
        NewGolfer {
            api_id,
            name: "Rory McIlroy".to_string(),
            country: Some("NIR".to_string()),
            world_rank: Some(2),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_writes_visible_only_after_commit() {
        let gateway = MemoryGateway::default();
        let mut session = gateway.begin().await.unwrap();
        session.insert_golfer(&new_golfer(28237)).await.unwrap();

        assert!(gateway.snapshot().golfers.is_empty());
        gateway.commit(session).await.unwrap();
        assert!(gateway.snapshot().golfer_by_api_id(28237).is_some());
    }

    #[tokio::test]
    async fn test_dropped_session_discards_writes() {
        let gateway = MemoryGateway::default();
        {
            let mut session = gateway.begin().await.unwrap();
            session.insert_golfer(&new_golfer(28237)).await.unwrap();
        }
        assert!(gateway.snapshot().golfers.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_api_id_is_unique_violation() {
        let gateway = MemoryGateway::default();
        let mut session = gateway.begin().await.unwrap();
        session.insert_golfer(&new_golfer(28237)).await.unwrap();

        let err = session.insert_golfer(&new_golfer(28237)).await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_duplicate_participation_is_unique_violation() {
        let gateway = MemoryGateway::default();
        let mut session = gateway.begin().await.unwrap();
        let golfer = session.insert_golfer(&new_golfer(28237)).await.unwrap();
        let tournament_id = Uuid::new_v4();

        let first = TournamentGolfer::new(golfer.golfer_id, tournament_id, Utc::now());
        session.insert_tournament_golfer(&first).await.unwrap();

        let second = TournamentGolfer::new(golfer.golfer_id, tournament_id, Utc::now());
        let err = session.insert_tournament_golfer(&second).await.unwrap_err();
        assert!(err.is_unique_violation());
    }
}
