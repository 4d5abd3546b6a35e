use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use parcelbase_core_types::{BillingStatus, TenantId, Tier};

use crate::api::{
    BillingBackend, BillingStateStore, MemoryBillingBackend, UpsertOutcome,
};
use crate::errors::BillingStoreError;
use crate::model::{BillingState, BillingSyncEvent};

fn event(tenant: &TenantId, event_id: &str, tier: Tier, minute: u32) -> BillingSyncEvent {
    BillingSyncEvent {
        event_id: event_id.into(),
        tenant_id: tenant.clone(),
        tier,
        status: BillingStatus::Active,
        period_start: None,
        period_end: None,
        trial_end: None,
        occurred_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap(),
    }
}

struct FailingBackend;

#[async_trait]
impl BillingBackend for FailingBackend {
    async fn fetch(&self, _: &TenantId) -> Result<Option<BillingState>, BillingStoreError> {
        Err(BillingStoreError::Backend("connection refused".into()))
    }

    async fn upsert_if_newer(
        &self,
        _: BillingState,
    ) -> Result<UpsertOutcome, BillingStoreError> {
        Err(BillingStoreError::Backend("connection refused".into()))
    }
}

struct HangingBackend;

#[async_trait]
impl BillingBackend for HangingBackend {
    async fn fetch(&self, _: &TenantId) -> Result<Option<BillingState>, BillingStoreError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(None)
    }

    async fn upsert_if_newer(
        &self,
        _: BillingState,
    ) -> Result<UpsertOutcome, BillingStoreError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(UpsertOutcome::Applied)
    }
}

#[tokio::test]
async fn missing_record_fails_closed_to_free_active() {
    let store = BillingStateStore::new(Arc::new(MemoryBillingBackend::new()));
    let tenant = TenantId::new("ws-1");
    let state = store.get(&tenant).await;
    assert_eq!(state.tier, Tier::Free);
    assert_eq!(state.status, BillingStatus::Active);
    assert!(state.synced_at.is_none());
}

#[tokio::test]
async fn backend_error_fails_closed_to_free_active() {
    let store = BillingStateStore::new(Arc::new(FailingBackend));
    let state = store.get(&TenantId::new("ws-1")).await;
    assert_eq!(state.tier, Tier::Free);
    assert_eq!(state.status, BillingStatus::Active);
}

#[tokio::test]
async fn backend_timeout_fails_closed_to_free_active() {
    let store =
        BillingStateStore::with_timeout(Arc::new(HangingBackend), Duration::from_millis(20));
    let state = store.get(&TenantId::new("ws-1")).await;
    assert_eq!(state.tier, Tier::Free);
}

#[tokio::test]
async fn upsert_timeout_surfaces_error() {
    let store =
        BillingStateStore::with_timeout(Arc::new(HangingBackend), Duration::from_millis(20));
    let tenant = TenantId::new("ws-1");
    let result = store.upsert(event(&tenant, "evt-1", Tier::Pro, 0).into_state()).await;
    assert!(matches!(result, Err(BillingStoreError::Timeout(_))));
}

#[tokio::test]
async fn newer_event_supersedes_stored_state() {
    let store = BillingStateStore::new(Arc::new(MemoryBillingBackend::new()));
    let tenant = TenantId::new("ws-1");

    let first = store.upsert(event(&tenant, "evt-1", Tier::Pro, 0).into_state()).await.unwrap();
    assert_eq!(first, UpsertOutcome::Applied);

    let second = store
        .upsert(event(&tenant, "evt-2", Tier::Enterprise, 5).into_state())
        .await
        .unwrap();
    assert_eq!(second, UpsertOutcome::Applied);

    let state = store.get(&tenant).await;
    assert_eq!(state.tier, Tier::Enterprise);
    assert_eq!(state.last_sync_event_id.as_deref(), Some("evt-2"));
}

#[tokio::test]
async fn replayed_event_is_a_no_op() {
    let store = BillingStateStore::new(Arc::new(MemoryBillingBackend::new()));
    let tenant = TenantId::new("ws-1");

    store.upsert(event(&tenant, "evt-1", Tier::Pro, 3).into_state()).await.unwrap();
    let replay = store.upsert(event(&tenant, "evt-1", Tier::Pro, 3).into_state()).await.unwrap();
    assert_eq!(replay, UpsertOutcome::Stale);

    let state = store.get(&tenant).await;
    assert_eq!(state.tier, Tier::Pro);
}

#[tokio::test]
async fn older_event_after_newer_is_ignored() {
    let store = BillingStateStore::new(Arc::new(MemoryBillingBackend::new()));
    let tenant = TenantId::new("ws-1");

    store
        .upsert(event(&tenant, "evt-2", Tier::Enterprise, 10).into_state())
        .await
        .unwrap();
    let stale = store.upsert(event(&tenant, "evt-1", Tier::Free, 2).into_state()).await.unwrap();
    assert_eq!(stale, UpsertOutcome::Stale);

    let state = store.get(&tenant).await;
    assert_eq!(state.tier, Tier::Enterprise);
    assert_eq!(state.last_sync_event_id.as_deref(), Some("evt-2"));
}

#[test]
fn default_state_never_supersedes_synced_state() {
    let tenant = TenantId::new("ws-1");
    let synced = event(&tenant, "evt-1", Tier::Pro, 0).into_state();
    let default = BillingState::default_for(&tenant);
    assert!(!default.supersedes(&synced));
    assert!(synced.supersedes(&default));
    assert!(!synced.supersedes(&synced.clone()));
}
