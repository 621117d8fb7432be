//! Client check-ins.

use super::DataAccess;
use crate::cache::registry::{ActiveAlerts, ClientCheckIns, CoachStatsFor};
use crate::models::{CheckIn, Id, NewCheckIn};
use crate::remote::{RemoteError, RemoteResult};

impl DataAccess {
    pub async fn check_ins(
        &self,
        client_id: Id,
        bypass_cache: bool,
    ) -> RemoteResult<Vec<CheckIn>> {
        self.read_through(ClientCheckIns(client_id), bypass_cache, || {
            self.remote.list_check_ins(client_id)
        })
        .await
    }

    /// Records a check-in. It can raise alerts and moves the coach's stats.
    pub async fn submit_check_in(
        &self,
        client_id: Id,
        check_in: NewCheckIn,
    ) -> RemoteResult<CheckIn> {
        let mutation = async {
            let client = self.remote.get_client(client_id).await?;
            let created = self.remote.create_check_in(client_id, check_in).await?;
            Ok::<_, RemoteError>((client.coach_id, created))
        };

        let (_, created) = self
            .write_then_invalidate(mutation, |cache, (coach_id, _)| {
                cache.evict(&ClientCheckIns(client_id));
                cache.evict(&ActiveAlerts);
                if let Some(coach_id) = coach_id {
                    cache.evict(&CoachStatsFor(*coach_id));
                }
            })
            .await?;
        Ok(created)
    }
}
