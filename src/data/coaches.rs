//! Coach roster and per-coach stats.

use super::DataAccess;
use crate::cache::registry::{AllCoaches, CoachClients, CoachStatsFor};
use crate::models::{Coach, CoachStats, CoachUpdate, Id, NewCoach};
use crate::remote::RemoteResult;

impl DataAccess {
    pub async fn coaches(&self, bypass_cache: bool) -> RemoteResult<Vec<Coach>> {
        self.read_through(AllCoaches, bypass_cache, || self.remote.list_coaches())
            .await
    }

    pub async fn coach_stats(&self, coach_id: Id, bypass_cache: bool) -> RemoteResult<CoachStats> {
        self.read_through(CoachStatsFor(coach_id), bypass_cache, || {
            self.remote.coach_stats(coach_id)
        })
        .await
    }

    pub async fn create_coach(&self, coach: NewCoach) -> RemoteResult<Coach> {
        self.write_then_invalidate(self.remote.create_coach(coach), |cache, _| {
            cache.evict(&AllCoaches);
        })
        .await
    }

    pub async fn update_coach(&self, id: Id, update: CoachUpdate) -> RemoteResult<Coach> {
        self.write_then_invalidate(self.remote.update_coach(id, update), |cache, _| {
            cache.evict(&AllCoaches);
        })
        .await
    }

    pub async fn delete_coach(&self, id: Id) -> RemoteResult<Coach> {
        self.write_then_invalidate(self.remote.delete_coach(id), |cache, _| {
            cache.evict(&AllCoaches);
            cache.evict(&CoachStatsFor(id));
            cache.evict(&CoachClients(id));
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::data::test_support::fixture;
    use crate::models::{CoachUpdate, NewCoach};
    use crate::remote::RemoteError;

    fn new_coach(name: &str) -> NewCoach {
        NewCoach {
            name: name.to_string(),
            email: format!("{}@example.com", name),
            specialty: None,
        }
    }

    #[tokio::test]
    async fn test_coaches_served_from_cache() {
        let f = fixture();
        f.data.create_coach(new_coach("kim")).await.unwrap();

        f.data.coaches(false).await.unwrap();
        let calls = f.remote.call_count();
        f.data.coaches(false).await.unwrap();

        assert_eq!(f.remote.call_count(), calls);
    }

    #[tokio::test]
    async fn test_cached_roster_expires_after_medium_tier() {
        let f = fixture();
        f.data.create_coach(new_coach("kim")).await.unwrap();
        f.data.coaches(false).await.unwrap();
        let calls = f.remote.call_count();

        f.clock.advance(f.data.cache().ttl_policy().medium_ms + 1);
        f.data.coaches(false).await.unwrap();

        assert_eq!(f.remote.call_count(), calls + 1);
    }

    #[tokio::test]
    async fn test_create_coach_invalidates_roster() {
        let f = fixture();
        assert!(f.data.coaches(false).await.unwrap().is_empty());

        f.data.create_coach(new_coach("kim")).await.unwrap();

        assert_eq!(f.data.coaches(false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_coach_invalidates_roster() {
        let f = fixture();
        let coach = f.data.create_coach(new_coach("kim")).await.unwrap();
        f.data.coaches(false).await.unwrap();

        f.data
            .update_coach(
                coach.id,
                CoachUpdate {
                    active: Some(false),
                    ..CoachUpdate::default()
                },
            )
            .await
            .unwrap();

        assert!(!f.data.coaches(false).await.unwrap()[0].active);
    }

    #[tokio::test]
    async fn test_delete_coach_invalidates_roster_and_stats() {
        let f = fixture();
        let coach = f.data.create_coach(new_coach("kim")).await.unwrap();
        f.data.coaches(false).await.unwrap();
        f.data.coach_stats(coach.id, false).await.unwrap();

        f.data.delete_coach(coach.id).await.unwrap();

        assert!(f.data.coaches(false).await.unwrap().is_empty());
        let err = f.data.coach_stats(coach.id, false).await.unwrap_err();
        assert!(matches!(err, RemoteError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_bypass_skips_cache() {
        let f = fixture();
        f.data.coaches(false).await.unwrap();
        let calls = f.remote.call_count();

        f.data.coaches(true).await.unwrap();

        assert_eq!(f.remote.call_count(), calls + 1);
    }
}
