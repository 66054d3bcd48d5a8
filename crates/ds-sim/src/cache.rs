//! Per-policy result cache keyed by the full scheduling input.
//!
//! Results are pure functions of `(policy, head, queue, direction,
//! track_limit)`, so a cached value can be handed out again for as long as
//! those fields match.  Spliced results from dynamic arrivals depend on
//! playback history as well and are never stored here.

use ds_core::{SchedulingResult, Workload};
use ds_policy::PolicyKey;

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

/// Entries kept before the cache is cleared wholesale.  Reconfiguration is
/// operator-paced, so a small bound is plenty.
const MAX_ENTRIES: usize = 64;

#[derive(Default)]
pub struct ResultCache {
    entries: Map<(PolicyKey, Workload), SchedulingResult>,
    hits:    u64,
    misses:  u64,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, policy: PolicyKey, workload: &Workload) -> Option<&SchedulingResult> {
        // Keyed by an owned tuple, so lookups clone the workload.  Queues are
        // bounded at 1000 entries and lookups only happen on reconfiguration.
        let hit = self.entries.get(&(policy, workload.clone()));
        match hit {
            Some(_) => self.hits += 1,
            None    => self.misses += 1,
        }
        hit
    }

    pub fn insert(&mut self, policy: PolicyKey, workload: &Workload, result: SchedulingResult) {
        if self.entries.len() >= MAX_ENTRIES {
            self.entries.clear();
        }
        self.entries.insert((policy, workload.clone()), result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
