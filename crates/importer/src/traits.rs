use storage::SyncGateway;
use uuid::Uuid;

use crate::Result;
use crate::sync::SyncSummary;

pub struct ImportContext<'a, G> {
    pub gateway: &'a G,
}

#[async_trait::async_trait]
pub trait TournamentImporter: Send + Sync {
    async fn import<G: SyncGateway>(
        &self,
        tournament_id: Uuid,
        context: &ImportContext<'_, G>,
    ) -> Result<SyncSummary>;

    fn name(&self) -> &'static str;
}
