use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billable unit an entitlement check is scoped to (a workspace).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Member performing an action on behalf of a tenant.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered subscription level. Declaration order is the total order;
/// comparisons go through `ordinal`, never name equality.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Free,
    Pro,
    ProPlus,
    Portfolio,
    Enterprise,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Free,
        Tier::Pro,
        Tier::ProPlus,
        Tier::Portfolio,
        Tier::Enterprise,
    ];

    pub fn ordinal(self) -> u8 {
        match self {
            Tier::Free => 0,
            Tier::Pro => 1,
            Tier::ProPlus => 2,
            Tier::Portfolio => 3,
            Tier::Enterprise => 4,
        }
    }

    /// True when this tier grants access to a feature requiring `need`.
    pub fn is_sufficient_for(self, need: Tier) -> bool {
        self.ordinal() >= need.ordinal()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
            Tier::ProPlus => "pro_plus",
            Tier::Portfolio => "portfolio",
            Tier::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription standing as reported by the payment provider.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    Active,
    Cancelled,
    PastDue,
    Unpaid,
    Trial,
}

impl BillingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BillingStatus::Active => "active",
            BillingStatus::Cancelled => "cancelled",
            BillingStatus::PastDue => "past_due",
            BillingStatus::Unpaid => "unpaid",
            BillingStatus::Trial => "trial",
        }
    }
}

impl fmt::Display for BillingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable reason-code enumeration shared by every gating layer.
///
/// The entitlement resolver emits only `TierInsufficient`,
/// `GracePeriodExpired`, `SubscriptionInactive`, and `FeatureUnavailable`;
/// the remaining codes belong to other layers and round-trip unchanged.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenialReason {
    TierInsufficient,
    FeatureDisabled,
    GracePeriodExpired,
    SubscriptionInactive,
    TrialNotStarted,
    FeatureUnavailable,
    SystemMaintenance,
    RateLimitExceeded,
}

impl DenialReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DenialReason::TierInsufficient => "TIER_INSUFFICIENT",
            DenialReason::FeatureDisabled => "FEATURE_DISABLED",
            DenialReason::GracePeriodExpired => "GRACE_PERIOD_EXPIRED",
            DenialReason::SubscriptionInactive => "SUBSCRIPTION_INACTIVE",
            DenialReason::TrialNotStarted => "TRIAL_NOT_STARTED",
            DenialReason::FeatureUnavailable => "FEATURE_UNAVAILABLE",
            DenialReason::SystemMaintenance => "SYSTEM_MAINTENANCE",
            DenialReason::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved allow/deny outcome for a (tenant, feature) pair.
///
/// Invariant: `enabled == reason.is_none()`. Construct through the helpers
/// below so the invariant holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntitlementCheckResult {
    pub feature: String,
    pub enabled: bool,
    pub tier: Tier,
    pub reason: Option<DenialReason>,
    pub resolved_at: DateTime<Utc>,
    pub cached: bool,
    pub cache_ttl_remaining_ms: Option<u64>,
}

impl EntitlementCheckResult {
    /// Freshly computed outcome (not served from cache).
    pub fn resolved(feature: impl Into<String>, tier: Tier, reason: Option<DenialReason>) -> Self {
        Self {
            feature: feature.into(),
            enabled: reason.is_none(),
            tier,
            reason,
            resolved_at: Utc::now(),
            cached: false,
            cache_ttl_remaining_ms: None,
        }
    }

    pub fn allowed(feature: impl Into<String>, tier: Tier) -> Self {
        Self::resolved(feature, tier, None)
    }

    pub fn denied(feature: impl Into<String>, tier: Tier, reason: DenialReason) -> Self {
        Self::resolved(feature, tier, Some(reason))
    }

    /// Fixed outcome for a feature missing from the policy table.
    pub fn unavailable(feature: impl Into<String>) -> Self {
        Self::denied(feature, Tier::Free, DenialReason::FeatureUnavailable)
    }

    /// Shallow copy served on a cache hit with the remaining TTL recomputed.
    pub fn as_cache_hit(&self, remaining: Duration) -> Self {
        let mut copy = self.clone();
        copy.cached = true;
        copy.cache_ttl_remaining_ms = Some(remaining.as_millis().max(1) as u64);
        copy
    }
}
