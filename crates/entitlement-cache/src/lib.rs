use std::time::{Duration, Instant};

use dashmap::DashMap;

use parcelbase_core_types::{EntitlementCheckResult, TenantId};

/// Default lifetime of a resolved entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct CacheKey {
    tenant: TenantId,
    feature: String,
}

#[derive(Clone, Debug)]
struct CacheEntry {
    result: EntitlementCheckResult,
    expires_at: Instant,
}

/// Counters reported by `stats`. `size` is the entry count before the
/// sweep; `live + expired == size`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    pub size: usize,
    pub live: usize,
    pub expired: usize,
}

/// Sharded TTL store of resolved entitlement results.
///
/// Entries are value types replaced atomically by key; expiry is lazy on
/// read and swept during `stats`. Denied results are cached with the same
/// TTL as allowed ones (this is not a negative cache), so an upgraded
/// tenant either waits out the TTL or gets explicit invalidation from
/// billing sync.
#[derive(Debug, Default)]
pub struct EntitlementCache {
    entries: DashMap<CacheKey, CacheEntry>,
}

impl EntitlementCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live hit returns a copy flagged `cached` with the remaining TTL
    /// recomputed; an entry at or past its deadline is removed and treated
    /// as absent.
    pub fn get(&self, tenant: &TenantId, feature: &str) -> Option<EntitlementCheckResult> {
        let key = CacheKey {
            tenant: tenant.clone(),
            feature: feature.to_string(),
        };
        if let Some(entry) = self.entries.get(&key) {
            let now = Instant::now();
            if entry.expires_at > now {
                return Some(entry.result.as_cache_hit(entry.expires_at - now));
            }
        }
        // Guard dropped above; safe to remove the expired entry.
        self.entries
            .remove_if(&key, |_, entry| entry.expires_at <= Instant::now());
        None
    }

    pub fn put(
        &self,
        tenant: &TenantId,
        feature: &str,
        result: EntitlementCheckResult,
        ttl: Duration,
    ) {
        let key = CacheKey {
            tenant: tenant.clone(),
            feature: feature.to_string(),
        };
        self.entries.insert(
            key,
            CacheEntry {
                result,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Removes every entry for the tenant. Completes before returning, so
    /// a check that starts afterwards cannot observe a pre-sync entry.
    pub fn invalidate_tenant(&self, tenant: &TenantId) -> usize {
        let mut removed = 0;
        self.entries.retain(|key, _| {
            if &key.tenant == tenant {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Counts entries and opportunistically sweeps the expired ones.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let mut stats = CacheStats::default();
        self.entries.retain(|_, entry| {
            stats.size += 1;
            if entry.expires_at > now {
                stats.live += 1;
                true
            } else {
                stats.expired += 1;
                false
            }
        });
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
