use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parcelbase_core_types::{
    ActorId, DenialReason, EntitlementCheckResult, TenantId, Tier,
};

/// What kind of activity an audit row records. Entitlement checks and
/// tenant-configuration mutations (membership, role, plan, settings) share
/// the same row shape.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    EntitlementCheck,
    ConfigChange,
}

/// Append-only audit row. Never updated or deleted by application code;
/// retention/archival happens outside this subsystem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub tenant_id: TenantId,
    pub actor_id: Option<ActorId>,
    pub kind: AuditKind,
    /// Feature key for checks; action name for config changes.
    pub action: String,
    pub allowed: Option<bool>,
    pub reason: Option<DenialReason>,
    pub tier: Option<Tier>,
    pub cached: Option<bool>,
    pub timestamp: DateTime<Utc>,
    pub metadata: serde_json::Value,
}

impl AuditEntry {
    pub fn entitlement_check(
        tenant_id: &TenantId,
        actor_id: &ActorId,
        result: &EntitlementCheckResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.clone(),
            actor_id: Some(actor_id.clone()),
            kind: AuditKind::EntitlementCheck,
            action: result.feature.clone(),
            allowed: Some(result.enabled),
            reason: result.reason,
            tier: Some(result.tier),
            cached: Some(result.cached),
            timestamp: Utc::now(),
            metadata: serde_json::Value::Null,
        }
    }

    pub fn config_change(
        tenant_id: &TenantId,
        actor_id: &ActorId,
        action: impl Into<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.clone(),
            actor_id: Some(actor_id.clone()),
            kind: AuditKind::ConfigChange,
            action: action.into(),
            allowed: None,
            reason: None,
            tier: None,
            cached: None,
            timestamp: Utc::now(),
            metadata,
        }
    }
}
