//! Clients in both shapes, per-coach client lists and bulk reassignment.

use tracing::info;

use super::DataAccess;
use crate::cache::registry::{
    keys, ActiveAlerts, AllClients, ClientCheckIns, ClientSummaries, CoachClients, CoachStatsFor,
};
use crate::cache::CacheManager;
use crate::models::{Client, ClientSummary, ClientUpdate, Id, NewClient};
use crate::remote::{RemoteError, RemoteResult};

/// Invalidates every client view touched by a change to clients of `coaches`.
fn invalidate_client_views(cache: &CacheManager, coaches: &[Option<Id>]) {
    cache.evict(&AllClients);
    cache.evict(&ClientSummaries);
    for coach_id in coaches.iter().flatten() {
        cache.evict(&CoachClients(*coach_id));
        cache.evict(&CoachStatsFor(*coach_id));
    }
}

impl DataAccess {
    pub async fn clients(&self, bypass_cache: bool) -> RemoteResult<Vec<Client>> {
        self.read_through(AllClients, bypass_cache, || self.remote.list_clients())
            .await
    }

    pub async fn client_summaries(&self, bypass_cache: bool) -> RemoteResult<Vec<ClientSummary>> {
        self.read_through(ClientSummaries, bypass_cache, || {
            self.remote.list_client_summaries()
        })
        .await
    }

    pub async fn coach_clients(
        &self,
        coach_id: Id,
        bypass_cache: bool,
    ) -> RemoteResult<Vec<Client>> {
        self.read_through(CoachClients(coach_id), bypass_cache, || {
            self.remote.list_clients_for_coach(coach_id)
        })
        .await
    }

    pub async fn create_client(&self, client: NewClient) -> RemoteResult<Client> {
        self.write_then_invalidate(self.remote.create_client(client), |cache, created| {
            invalidate_client_views(cache, &[created.coach_id]);
        })
        .await
    }

    /// Updates a client. Its alerts move with it, and churning raises one.
    pub async fn update_client(&self, id: Id, update: ClientUpdate) -> RemoteResult<Client> {
        let mutation = async {
            let before = self.remote.get_client(id).await?;
            let after = self.remote.update_client(id, update).await?;
            Ok::<_, RemoteError>((before.coach_id, after))
        };

        let (_, client) = self
            .write_then_invalidate(mutation, |cache, (previous_coach, after)| {
                invalidate_client_views(cache, &[*previous_coach, after.coach_id]);
                cache.evict(&ActiveAlerts);
            })
            .await?;
        Ok(client)
    }

    pub async fn delete_client(&self, id: Id) -> RemoteResult<Client> {
        self.write_then_invalidate(self.remote.delete_client(id), |cache, deleted| {
            invalidate_client_views(cache, &[deleted.coach_id]);
            cache.evict(&ClientCheckIns(id));
            cache.evict(&ActiveAlerts);
        })
        .await
    }

    /// Moves every client of `from` to `to`.
    ///
    /// Alerts follow their clients, so every per-coach view may be stale.
    pub async fn reassign_clients(&self, from: Id, to: Id) -> RemoteResult<usize> {
        self.write_then_invalidate(self.remote.reassign_clients(from, to), |cache, moved| {
            cache.evict(&AllClients);
            cache.evict(&ClientSummaries);
            cache.evict(&ActiveAlerts);
            let removed = cache.invalidate_pattern(&keys::family(keys::COACH_CLIENTS))
                + cache.invalidate_pattern(&keys::family(keys::COACH_STATS));
            info!(from, to, moved, removed, "clients reassigned");
        })
        .await
    }
}
