use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parcelbase_core_types::{BillingStatus, TenantId, Tier};

/// Per-tenant billing record. Created implicitly (free/active) the first
/// time a tenant is checked with no stored record; mutated only by billing
/// sync; never deleted, only superseded by newer sync events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BillingState {
    pub tenant_id: TenantId,
    pub tier: Tier,
    pub status: BillingStatus,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub trial_end: Option<DateTime<Utc>>,
    pub last_sync_event_id: Option<String>,
    pub synced_at: Option<DateTime<Utc>>,
}

impl BillingState {
    /// Fail-closed default: an unknown or unreachable tenant record must
    /// never unlock a paid feature.
    pub fn default_for(tenant_id: &TenantId) -> Self {
        Self {
            tenant_id: tenant_id.clone(),
            tier: Tier::Free,
            status: BillingStatus::Active,
            current_period_start: None,
            current_period_end: None,
            trial_end: None,
            last_sync_event_id: None,
            synced_at: None,
        }
    }

    /// Newer-wins ordering for idempotent sync replay: only a strictly
    /// newer sync timestamp supersedes. A state with no sync marker never
    /// supersedes anything.
    pub fn supersedes(&self, other: &BillingState) -> bool {
        match (self.synced_at, other.synced_at) {
            (Some(mine), Some(theirs)) => mine > theirs,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// Billing-change event as delivered by the payment-provider webhook.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BillingSyncEvent {
    pub event_id: String,
    pub tenant_id: TenantId,
    pub tier: Tier,
    pub status: BillingStatus,
    pub period_start: Option<DateTime<Utc>>,
    pub period_end: Option<DateTime<Utc>>,
    pub trial_end: Option<DateTime<Utc>>,
    /// Provider-side timestamp used for newer-wins ordering.
    pub occurred_at: DateTime<Utc>,
}

impl BillingSyncEvent {
    pub fn into_state(self) -> BillingState {
        BillingState {
            tenant_id: self.tenant_id,
            tier: self.tier,
            status: self.status,
            current_period_start: self.period_start,
            current_period_end: self.period_end,
            trial_end: self.trial_end,
            last_sync_event_id: Some(self.event_id),
            synced_at: Some(self.occurred_at),
        }
    }
}
