//! Active churn and adherence alerts.

use super::DataAccess;
use crate::cache::registry::{ActiveAlerts, CoachStatsFor};
use crate::models::{Alert, Id};
use crate::remote::RemoteResult;

impl DataAccess {
    pub async fn active_alerts(&self, bypass_cache: bool) -> RemoteResult<Vec<Alert>> {
        self.read_through(ActiveAlerts, bypass_cache, || {
            self.remote.list_active_alerts()
        })
        .await
    }

    pub async fn resolve_alert(&self, id: Id) -> RemoteResult<Alert> {
        self.write_then_invalidate(self.remote.resolve_alert(id), |cache, alert| {
            cache.evict(&ActiveAlerts);
            // open_alerts is part of the coach's stats
            if let Some(coach_id) = alert.coach_id {
                cache.evict(&CoachStatsFor(coach_id));
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::data::test_support::fixture;
    use crate::models::{NewCheckIn, NewClient, NewCoach};

    #[tokio::test]
    async fn test_resolve_refreshes_alerts_and_stats() {
        let f = fixture();
        let kim = f
            .data
            .create_coach(NewCoach {
                name: "kim".to_string(),
                email: "kim@example.com".to_string(),
                specialty: None,
            })
            .await
            .unwrap();
        let jo = f
            .data
            .create_client(NewClient {
                name: "jo".to_string(),
                email: "jo@example.com".to_string(),
                coach_id: Some(kim.id),
                pricing_tier_id: None,
            })
            .await
            .unwrap();
        f.data
            .submit_check_in(
                jo.id,
                NewCheckIn {
                    weight_kg: None,
                    mood: 4,
                    adherence: 10,
                    notes: None,
                },
            )
            .await
            .unwrap();

        let alerts = f.data.active_alerts(false).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(f.data.coach_stats(kim.id, false).await.unwrap().open_alerts, 1);

        f.data.resolve_alert(alerts[0].id).await.unwrap();

        assert!(f.data.active_alerts(false).await.unwrap().is_empty());
        assert_eq!(f.data.coach_stats(kim.id, false).await.unwrap().open_alerts, 0);
    }

    #[tokio::test]
    async fn test_alerts_expire_after_short_tier() {
        let f = fixture();
        f.data.active_alerts(false).await.unwrap();
        let calls = f.remote.call_count();

        f.clock.advance(f.data.cache().ttl_policy().short_ms);
        f.data.active_alerts(false).await.unwrap();
        assert_eq!(f.remote.call_count(), calls, "still fresh at expiry");

        f.clock.advance(1);
        f.data.active_alerts(false).await.unwrap();
        assert_eq!(f.remote.call_count(), calls + 1);
    }
}
