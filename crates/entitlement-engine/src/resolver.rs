use chrono::{DateTime, Utc};

use billing_store::BillingState;
use parcelbase_core_types::{BillingStatus, DenialReason, Tier};

/// Maps a billing state and required tier to the one canonical denial
/// reason, or `None` when access is allowed. Deterministic, total, pure.
///
/// First match wins; account-status problems take precedence over plan
/// sufficiency. Unknown features never reach this function — the engine
/// short-circuits them before loading billing state.
pub fn resolve(
    billing: &BillingState,
    required: Tier,
    now: DateTime<Utc>,
) -> Option<DenialReason> {
    match billing.status {
        BillingStatus::Cancelled => return Some(DenialReason::SubscriptionInactive),
        BillingStatus::PastDue | BillingStatus::Unpaid => {
            return Some(DenialReason::SubscriptionInactive)
        }
        BillingStatus::Trial => {
            // A trial with no recorded end is treated as still running.
            if let Some(trial_end) = billing.trial_end {
                if now > trial_end {
                    return Some(DenialReason::GracePeriodExpired);
                }
            }
        }
        BillingStatus::Active => {}
    }
    if !billing.tier.is_sufficient_for(required) {
        return Some(DenialReason::TierInsufficient);
    }
    None
}
