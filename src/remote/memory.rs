//! In-process stand-in for the hosted store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use super::{RemoteError, RemoteResult, RemoteStore};
use crate::models::{
    Alert, AlertKind, AlertStatus, CheckIn, Client, ClientStatus, ClientSummary, ClientUpdate,
    Coach, CoachStats, CoachUpdate, Id, NewCheckIn, NewClient, NewCoach, PricingTier,
    PricingUpdate,
};

/// Adherence percentage below which a check-in raises an alert
const LOW_ADHERENCE: u8 = 50;
/// Mood score at or below which a check-in raises an alert
const LOW_MOOD: u8 = 2;

#[derive(Debug, Default)]
struct Tables {
    next_id: Id,
    coaches: BTreeMap<Id, Coach>,
    clients: BTreeMap<Id, Client>,
    check_ins: BTreeMap<Id, CheckIn>,
    alerts: BTreeMap<Id, Alert>,
    pricing: BTreeMap<Id, PricingTier>,
}

impl Tables {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    fn require_coach(&self, id: Id) -> RemoteResult<()> {
        if self.coaches.contains_key(&id) {
            Ok(())
        } else {
            Err(RemoteError::NotFound(format!("coach {}", id)))
        }
    }

    fn require_tier(&self, id: Id) -> RemoteResult<()> {
        if self.pricing.contains_key(&id) {
            Ok(())
        } else {
            Err(RemoteError::NotFound(format!("pricing tier {}", id)))
        }
    }

    fn raise_alert(&mut self, client_id: Id, coach_id: Option<Id>, kind: AlertKind) {
        let id = self.next_id();
        self.alerts.insert(
            id,
            Alert {
                id,
                client_id,
                coach_id,
                kind,
                status: AlertStatus::New,
                created_at: Utc::now(),
            },
        );
    }

    /// Alerts belong to whichever coach currently owns the client.
    fn move_alerts(&mut self, client_id: Id, coach_id: Option<Id>) {
        for alert in self.alerts.values_mut().filter(|a| a.client_id == client_id) {
            alert.coach_id = coach_id;
        }
    }
}

/// Table storage behind a tokio lock, with auto-increment ids.
///
/// Counts every call so tests can tell cache hits from remote reads, and can
/// be switched offline to exercise error paths.
#[derive(Debug)]
pub struct InMemoryRemote {
    tables: RwLock<Tables>,
    calls: AtomicUsize,
    available: AtomicBool,
}

impl Default for InMemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRemote {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_tables(Tables::default())
    }

    fn with_tables(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
            calls: AtomicUsize::new(0),
            available: AtomicBool::new(true),
        }
    }

    /// Creates a store with a small demo roster.
    pub fn seeded() -> Self {
        let mut t = Tables::default();
        let basic = t.next_id();
        t.pricing.insert(
            basic,
            PricingTier {
                id: basic,
                name: "Basic".to_string(),
                monthly_price_cents: 9_900,
                description: Some("Monthly plan and check-in review".to_string()),
            },
        );
        let premium = t.next_id();
        t.pricing.insert(
            premium,
            PricingTier {
                id: premium,
                name: "Premium".to_string(),
                monthly_price_cents: 24_900,
                description: Some("Weekly calls and custom programming".to_string()),
            },
        );

        let coach = t.next_id();
        t.coaches.insert(
            coach,
            Coach {
                id: coach,
                name: "Alex Moreno".to_string(),
                email: "alex@example.com".to_string(),
                specialty: Some("Strength".to_string()),
                active: true,
            },
        );
        for (name, tier) in [("Sam Lee", basic), ("Riley Chen", premium)] {
            let id = t.next_id();
            t.clients.insert(
                id,
                Client {
                    id,
                    name: name.to_string(),
                    email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                    coach_id: Some(coach),
                    pricing_tier_id: Some(tier),
                    status: ClientStatus::Active,
                    joined_at: Utc::now() - Duration::days(30),
                    notes: None,
                },
            );
        }

        Self::with_tables(t)
    }

    /// Number of calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Simulates the store going offline or coming back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn begin(&self) -> RemoteResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RemoteError::Unavailable("connection refused".to_string()))
        }
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemote {
    async fn list_coaches(&self) -> RemoteResult<Vec<Coach>> {
        self.begin()?;
        Ok(self.tables.read().await.coaches.values().cloned().collect())
    }

    async fn create_coach(&self, coach: NewCoach) -> RemoteResult<Coach> {
        self.begin()?;
        if coach.name.trim().is_empty() {
            return Err(RemoteError::Invalid("coach name cannot be empty".to_string()));
        }

        let mut t = self.tables.write().await;
        let id = t.next_id();
        let coach = Coach {
            id,
            name: coach.name,
            email: coach.email,
            specialty: coach.specialty,
            active: true,
        };
        t.coaches.insert(id, coach.clone());
        Ok(coach)
    }

    async fn update_coach(&self, id: Id, update: CoachUpdate) -> RemoteResult<Coach> {
        self.begin()?;
        let mut t = self.tables.write().await;
        let coach = t
            .coaches
            .get_mut(&id)
            .ok_or_else(|| RemoteError::NotFound(format!("coach {}", id)))?;

        if let Some(name) = update.name {
            coach.name = name;
        }
        if let Some(email) = update.email {
            coach.email = email;
        }
        if let Some(specialty) = update.specialty {
            coach.specialty = Some(specialty);
        }
        if let Some(active) = update.active {
            coach.active = active;
        }
        Ok(coach.clone())
    }

    async fn delete_coach(&self, id: Id) -> RemoteResult<Coach> {
        self.begin()?;
        let mut t = self.tables.write().await;
        t.require_coach(id)?;

        let assigned = t
            .clients
            .values()
            .filter(|c| c.coach_id == Some(id))
            .count();
        if assigned > 0 {
            return Err(RemoteError::Invalid(format!(
                "coach {} still has {} clients assigned",
                id, assigned
            )));
        }

        t.coaches
            .remove(&id)
            .ok_or_else(|| RemoteError::NotFound(format!("coach {}", id)))
    }

    async fn coach_stats(&self, coach_id: Id) -> RemoteResult<CoachStats> {
        self.begin()?;
        let t = self.tables.read().await;
        t.require_coach(coach_id)?;

        let clients: Vec<&Client> = t
            .clients
            .values()
            .filter(|c| c.coach_id == Some(coach_id))
            .collect();
        let since = Utc::now() - Duration::days(7);
        let recent: Vec<&CheckIn> = t
            .check_ins
            .values()
            .filter(|ci| ci.submitted_at >= since)
            .filter(|ci| clients.iter().any(|c| c.id == ci.client_id))
            .collect();
        let average_adherence = if recent.is_empty() {
            None
        } else {
            let total: f64 = recent.iter().map(|ci| f64::from(ci.adherence)).sum();
            Some(total / recent.len() as f64)
        };

        Ok(CoachStats {
            coach_id,
            client_count: clients.len(),
            active_clients: clients
                .iter()
                .filter(|c| c.status == ClientStatus::Active)
                .count(),
            check_ins_last_7_days: recent.len(),
            open_alerts: t
                .alerts
                .values()
                .filter(|a| a.coach_id == Some(coach_id) && a.status == AlertStatus::New)
                .count(),
            average_adherence,
        })
    }

    async fn list_clients(&self) -> RemoteResult<Vec<Client>> {
        self.begin()?;
        Ok(self.tables.read().await.clients.values().cloned().collect())
    }

    async fn list_client_summaries(&self) -> RemoteResult<Vec<ClientSummary>> {
        self.begin()?;
        Ok(self
            .tables
            .read()
            .await
            .clients
            .values()
            .map(ClientSummary::from)
            .collect())
    }

    async fn list_clients_for_coach(&self, coach_id: Id) -> RemoteResult<Vec<Client>> {
        self.begin()?;
        Ok(self
            .tables
            .read()
            .await
            .clients
            .values()
            .filter(|c| c.coach_id == Some(coach_id))
            .cloned()
            .collect())
    }

    async fn get_client(&self, id: Id) -> RemoteResult<Client> {
        self.begin()?;
        self.tables
            .read()
            .await
            .clients
            .get(&id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("client {}", id)))
    }

    async fn create_client(&self, client: NewClient) -> RemoteResult<Client> {
        self.begin()?;
        if client.name.trim().is_empty() {
            return Err(RemoteError::Invalid("client name cannot be empty".to_string()));
        }

        let mut t = self.tables.write().await;
        if let Some(coach_id) = client.coach_id {
            t.require_coach(coach_id)?;
        }
        if let Some(tier) = client.pricing_tier_id {
            t.require_tier(tier)?;
        }

        let id = t.next_id();
        let client = Client {
            id,
            name: client.name,
            email: client.email,
            coach_id: client.coach_id,
            pricing_tier_id: client.pricing_tier_id,
            status: ClientStatus::Active,
            joined_at: Utc::now(),
            notes: None,
        };
        t.clients.insert(id, client.clone());
        Ok(client)
    }

    async fn update_client(&self, id: Id, update: ClientUpdate) -> RemoteResult<Client> {
        self.begin()?;
        let mut t = self.tables.write().await;
        if let Some(coach_id) = update.coach_id {
            t.require_coach(coach_id)?;
        }
        if let Some(tier) = update.pricing_tier_id {
            t.require_tier(tier)?;
        }

        let client = t
            .clients
            .get_mut(&id)
            .ok_or_else(|| RemoteError::NotFound(format!("client {}", id)))?;
        let previous_coach = client.coach_id;
        let previous_status = client.status;
        if let Some(name) = update.name {
            client.name = name;
        }
        if let Some(email) = update.email {
            client.email = email;
        }
        if let Some(coach_id) = update.coach_id {
            client.coach_id = Some(coach_id);
        }
        if let Some(tier) = update.pricing_tier_id {
            client.pricing_tier_id = Some(tier);
        }
        if let Some(status) = update.status {
            client.status = status;
        }
        if let Some(notes) = update.notes {
            client.notes = Some(notes);
        }
        let client = client.clone();

        if client.coach_id != previous_coach {
            t.move_alerts(id, client.coach_id);
        }
        if client.status == ClientStatus::Churned && previous_status != ClientStatus::Churned {
            t.raise_alert(id, client.coach_id, AlertKind::ChurnRisk);
        }
        Ok(client)
    }

    async fn delete_client(&self, id: Id) -> RemoteResult<Client> {
        self.begin()?;
        let mut t = self.tables.write().await;
        let client = t
            .clients
            .remove(&id)
            .ok_or_else(|| RemoteError::NotFound(format!("client {}", id)))?;

        t.check_ins.retain(|_, ci| ci.client_id != id);
        t.alerts.retain(|_, a| a.client_id != id);
        Ok(client)
    }

    async fn reassign_clients(&self, from: Id, to: Id) -> RemoteResult<usize> {
        self.begin()?;
        let mut t = self.tables.write().await;
        t.require_coach(from)?;
        t.require_coach(to)?;

        let moved: Vec<Id> = t
            .clients
            .values_mut()
            .filter(|c| c.coach_id == Some(from))
            .map(|c| {
                c.coach_id = Some(to);
                c.id
            })
            .collect();
        for client_id in &moved {
            t.move_alerts(*client_id, Some(to));
        }
        Ok(moved.len())
    }

    async fn list_check_ins(&self, client_id: Id) -> RemoteResult<Vec<CheckIn>> {
        self.begin()?;
        let t = self.tables.read().await;
        if !t.clients.contains_key(&client_id) {
            return Err(RemoteError::NotFound(format!("client {}", client_id)));
        }

        let mut check_ins: Vec<CheckIn> = t
            .check_ins
            .values()
            .filter(|ci| ci.client_id == client_id)
            .cloned()
            .collect();
        check_ins.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
        Ok(check_ins)
    }

    async fn create_check_in(
        &self,
        client_id: Id,
        check_in: NewCheckIn,
    ) -> RemoteResult<CheckIn> {
        self.begin()?;
        if !(1..=5).contains(&check_in.mood) {
            return Err(RemoteError::Invalid("mood must be between 1 and 5".to_string()));
        }
        if check_in.adherence > 100 {
            return Err(RemoteError::Invalid(
                "adherence must be between 0 and 100".to_string(),
            ));
        }

        let mut t = self.tables.write().await;
        let coach_id = t
            .clients
            .get(&client_id)
            .ok_or_else(|| RemoteError::NotFound(format!("client {}", client_id)))?
            .coach_id;

        let id = t.next_id();
        let record = CheckIn {
            id,
            client_id,
            submitted_at: Utc::now(),
            weight_kg: check_in.weight_kg,
            mood: check_in.mood,
            adherence: check_in.adherence,
            notes: check_in.notes,
        };
        t.check_ins.insert(id, record.clone());

        if record.adherence < LOW_ADHERENCE {
            t.raise_alert(client_id, coach_id, AlertKind::LowAdherence);
        }
        if record.mood <= LOW_MOOD {
            t.raise_alert(client_id, coach_id, AlertKind::LowMood);
        }

        Ok(record)
    }

    async fn list_active_alerts(&self) -> RemoteResult<Vec<Alert>> {
        self.begin()?;
        Ok(self
            .tables
            .read()
            .await
            .alerts
            .values()
            .filter(|a| a.status == AlertStatus::New)
            .cloned()
            .collect())
    }

    async fn resolve_alert(&self, id: Id) -> RemoteResult<Alert> {
        self.begin()?;
        let mut t = self.tables.write().await;
        let alert = t
            .alerts
            .get_mut(&id)
            .ok_or_else(|| RemoteError::NotFound(format!("alert {}", id)))?;
        alert.status = AlertStatus::Resolved;
        Ok(alert.clone())
    }

    async fn list_pricing_tiers(&self) -> RemoteResult<Vec<PricingTier>> {
        self.begin()?;
        Ok(self.tables.read().await.pricing.values().cloned().collect())
    }

    async fn update_pricing_tier(
        &self,
        id: Id,
        update: PricingUpdate,
    ) -> RemoteResult<PricingTier> {
        self.begin()?;
        let mut t = self.tables.write().await;
        let tier = t
            .pricing
            .get_mut(&id)
            .ok_or_else(|| RemoteError::NotFound(format!("pricing tier {}", id)))?;
        if let Some(name) = update.name {
            tier.name = name;
        }
        if let Some(price) = update.monthly_price_cents {
            tier.monthly_price_cents = price;
        }
        if let Some(description) = update.description {
            tier.description = Some(description);
        }
        Ok(tier.clone())
    }
}
