use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::time::timeout;
use tracing::warn;

use parcelbase_core_types::TenantId;

use crate::errors::BillingStoreError;
use crate::model::BillingState;

/// Result of a newer-wins upsert attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UpsertOutcome {
    Applied,
    /// Incoming state was not strictly newer than the stored one; no-op.
    Stale,
}

/// Pluggable persistence seam for billing records.
#[async_trait]
pub trait BillingBackend: Send + Sync {
    async fn fetch(&self, tenant_id: &TenantId) -> Result<Option<BillingState>, BillingStoreError>;

    /// Stores `state` only if it supersedes the current record for the
    /// tenant. Must be atomic per tenant.
    async fn upsert_if_newer(&self, state: BillingState)
        -> Result<UpsertOutcome, BillingStoreError>;
}

/// In-memory reference backend keyed by tenant.
#[derive(Debug, Default)]
pub struct MemoryBillingBackend {
    records: DashMap<TenantId, BillingState>,
}

impl MemoryBillingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl BillingBackend for MemoryBillingBackend {
    async fn fetch(&self, tenant_id: &TenantId) -> Result<Option<BillingState>, BillingStoreError> {
        Ok(self.records.get(tenant_id).map(|entry| entry.clone()))
    }

    async fn upsert_if_newer(
        &self,
        state: BillingState,
    ) -> Result<UpsertOutcome, BillingStoreError> {
        match self.records.entry(state.tenant_id.clone()) {
            Entry::Occupied(mut occupied) => {
                if state.supersedes(occupied.get()) {
                    occupied.insert(state);
                    Ok(UpsertOutcome::Applied)
                } else {
                    Ok(UpsertOutcome::Stale)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(state);
                Ok(UpsertOutcome::Applied)
            }
        }
    }
}

/// Fail-closed store front: reads are bounded and infallible, writes are
/// bounded but surface errors so webhook delivery can retry.
pub struct BillingStateStore {
    backend: Arc<dyn BillingBackend>,
    op_timeout: Duration,
}

pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(2);

impl BillingStateStore {
    pub fn new(backend: Arc<dyn BillingBackend>) -> Self {
        Self::with_timeout(backend, DEFAULT_OP_TIMEOUT)
    }

    pub fn with_timeout(backend: Arc<dyn BillingBackend>, op_timeout: Duration) -> Self {
        Self {
            backend,
            op_timeout,
        }
    }

    /// Never fails the caller: a missing record, backend error, or timeout
    /// all resolve to the free/active default.
    pub async fn get(&self, tenant_id: &TenantId) -> BillingState {
        match timeout(self.op_timeout, self.backend.fetch(tenant_id)).await {
            Ok(Ok(Some(state))) => state,
            Ok(Ok(None)) => BillingState::default_for(tenant_id),
            Ok(Err(err)) => {
                warn!(tenant = %tenant_id, error = %err, "billing read failed; failing closed");
                BillingState::default_for(tenant_id)
            }
            Err(_) => {
                warn!(
                    tenant = %tenant_id,
                    timeout_ms = self.op_timeout.as_millis() as u64,
                    "billing read timed out; failing closed"
                );
                BillingState::default_for(tenant_id)
            }
        }
    }

    /// Idempotent newer-wins upsert; out-of-order or replayed events
    /// resolve to `Stale` without touching the stored record.
    pub async fn upsert(&self, state: BillingState) -> Result<UpsertOutcome, BillingStoreError> {
        match timeout(self.op_timeout, self.backend.upsert_if_newer(state)).await {
            Ok(result) => result,
            Err(_) => Err(BillingStoreError::Timeout(self.op_timeout.as_millis() as u64)),
        }
    }
}
