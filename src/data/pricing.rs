//! Pricing tiers.

use super::DataAccess;
use crate::cache::registry::PricingTiers;
use crate::models::{Id, PricingTier, PricingUpdate};
use crate::remote::RemoteResult;

impl DataAccess {
    pub async fn pricing_tiers(&self, bypass_cache: bool) -> RemoteResult<Vec<PricingTier>> {
        self.read_through(PricingTiers, bypass_cache, || {
            self.remote.list_pricing_tiers()
        })
        .await
    }

    pub async fn update_pricing_tier(
        &self,
        id: Id,
        update: PricingUpdate,
    ) -> RemoteResult<PricingTier> {
        self.write_then_invalidate(self.remote.update_pricing_tier(id, update), |cache, _| {
            cache.evict(&PricingTiers);
        })
        .await
    }
}
