use std::sync::Arc;

use tracing::{debug, warn};

use billing_store::{BillingStateStore, BillingStoreError, BillingSyncEvent, UpsertOutcome};
use entitlement_cache::EntitlementCache;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SyncOutcome {
    Applied,
    /// Duplicate or out-of-order delivery; the stored state was untouched.
    Ignored,
}

/// Consumes payment-provider billing-change events: newer-wins upsert,
/// then tenant-wide cache invalidation before returning, so any check that
/// starts after `apply` returns observes the post-sync state.
pub struct BillingSyncHandler {
    billing: Arc<BillingStateStore>,
    cache: Arc<EntitlementCache>,
}

impl BillingSyncHandler {
    pub fn new(billing: Arc<BillingStateStore>, cache: Arc<EntitlementCache>) -> Self {
        Self { billing, cache }
    }

    /// Idempotent under at-least-once delivery. Invalidation runs
    /// unconditionally — a duplicate delivery may correspond to an upstream
    /// retry whose effects the cache has not yet observed, and a failed
    /// upsert still signals change upstream.
    pub async fn apply(&self, event: BillingSyncEvent) -> Result<SyncOutcome, BillingStoreError> {
        let tenant_id = event.tenant_id.clone();
        let event_id = event.event_id.clone();
        let upsert = self.billing.upsert(event.into_state()).await;

        let removed = self.cache.invalidate_tenant(&tenant_id);
        debug!(tenant = %tenant_id, event = %event_id, removed, "billing sync invalidated cache");

        match upsert {
            Ok(UpsertOutcome::Applied) => Ok(SyncOutcome::Applied),
            Ok(UpsertOutcome::Stale) => {
                debug!(tenant = %tenant_id, event = %event_id, "stale billing event ignored");
                Ok(SyncOutcome::Ignored)
            }
            Err(err) => {
                warn!(tenant = %tenant_id, event = %event_id, error = %err, "billing sync upsert failed");
                Err(err)
            }
        }
    }
}
