use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use audit_sink::{AuditEntry, AuditSink};
use billing_store::BillingStateStore;
use entitlement_cache::{EntitlementCache, DEFAULT_TTL};
use parcelbase_core_types::{ActorId, EntitlementCheckResult, TenantId};
use parcelbase_tier_policy::TierPolicyTable;

use crate::errors::EngineError;
use crate::resolver;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub cache_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL,
        }
    }
}

/// Orchestrates entitlement resolution: cache lookup, fail-closed billing
/// read, pure denial resolution, cache fill, fire-and-forget audit.
pub struct EntitlementEngine {
    policy: Arc<TierPolicyTable>,
    billing: Arc<BillingStateStore>,
    cache: Arc<EntitlementCache>,
    audit: Arc<dyn AuditSink>,
    config: EngineConfig,
}

impl EntitlementEngine {
    pub fn new(
        policy: Arc<TierPolicyTable>,
        billing: Arc<BillingStateStore>,
        cache: Arc<EntitlementCache>,
        audit: Arc<dyn AuditSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            policy,
            billing,
            cache,
            audit,
            config,
        }
    }

    /// Resolves whether `feature` is usable for `tenant_id` right now.
    ///
    /// Always returns a well-formed result for runtime conditions; the only
    /// error is a blank tenant id. When `actor_id` is given, an audit entry
    /// is submitted without delaying the return.
    pub async fn check(
        &self,
        tenant_id: &TenantId,
        feature: &str,
        actor_id: Option<&ActorId>,
    ) -> Result<EntitlementCheckResult, EngineError> {
        if tenant_id.is_blank() {
            return Err(EngineError::EmptyTenantId);
        }

        // Caller error, not a billing question: no store read, no cache
        // write, no audit of billing state.
        let Some(required) = self.policy.required_tier(feature) else {
            debug!(tenant = %tenant_id, feature, "unknown feature requested");
            return Ok(EntitlementCheckResult::unavailable(feature));
        };

        if let Some(hit) = self.cache.get(tenant_id, feature) {
            return Ok(hit);
        }

        let billing = self.billing.get(tenant_id).await;
        let reason = resolver::resolve(&billing, required, Utc::now());
        let result = EntitlementCheckResult::resolved(feature, billing.tier, reason);
        self.cache
            .put(tenant_id, feature, result.clone(), self.config.cache_ttl);

        if let Some(actor_id) = actor_id {
            self.audit
                .append(AuditEntry::entitlement_check(tenant_id, actor_id, &result));
        }

        Ok(result)
    }

    /// Per-feature fan-out for multi-feature UI gating. Each resolution is
    /// independent and order-insensitive; cache hits short-circuit
    /// individually.
    pub async fn check_many(
        &self,
        tenant_id: &TenantId,
        features: &[&str],
        actor_id: Option<&ActorId>,
    ) -> Result<HashMap<String, EntitlementCheckResult>, EngineError> {
        let mut results = HashMap::with_capacity(features.len());
        for feature in features {
            let result = self.check(tenant_id, feature, actor_id).await?;
            results.insert((*feature).to_string(), result);
        }
        Ok(results)
    }
}
