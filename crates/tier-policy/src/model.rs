use std::collections::HashMap;

use parcelbase_core_types::Tier;

/// Versioned mapping from feature key to the minimum tier that unlocks it.
///
/// Loaded once at process start and immutable afterwards; changing policy
/// means shipping a new table revision, not mutating a live one.
#[derive(Clone, Debug, Default)]
pub struct TierPolicyTable {
    rev: u64,
    required: HashMap<String, Tier>,
}

impl TierPolicyTable {
    pub fn from_entries<I, K>(rev: u64, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Tier)>,
        K: Into<String>,
    {
        Self {
            rev,
            required: entries
                .into_iter()
                .map(|(key, tier)| (key.into(), tier))
                .collect(),
        }
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn required_tier(&self, feature: &str) -> Option<Tier> {
        self.required.get(feature).copied()
    }

    pub fn is_known_feature(&self, feature: &str) -> bool {
        self.required.contains_key(feature)
    }

    /// Ordinal comparison over the tier total order.
    pub fn is_sufficient(&self, have: Tier, need: Tier) -> bool {
        have.is_sufficient_for(need)
    }

    pub fn features(&self) -> impl Iterator<Item = (&str, Tier)> {
        self.required.iter().map(|(key, tier)| (key.as_str(), *tier))
    }

    pub fn len(&self) -> usize {
        self.required.len()
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    pub(crate) fn merge_entry(&mut self, feature: String, tier: Tier) {
        self.required.insert(feature, tier);
    }

    pub(crate) fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }
}
