use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

const RESET_WINDOW_SECS: i64 = 300;

/// Assigns bounded TTLs to negative cache entries.
///
/// An empty answer section has no TTL of its own, and an unbounded sentinel
/// would pin NXDOMAIN answers forever. Names that keep coming back get a
/// short TTL so a freshly created record becomes visible quickly; rarely
/// queried names hold their negative answer longer.
pub struct NegativeTtlTracker {
    query_counts: DashMap<String, QueryCounter, FxBuildHasher>,

    frequent_ttl: u32,

    rare_ttl: u32,

    frequency_threshold: u64,
}

struct QueryCounter {
    count: AtomicU64,
    /// UNIX timestamp (seconds) of the last counter reset.
    last_reset: i64,
}

impl NegativeTtlTracker {
    pub fn new() -> Self {
        Self {
            query_counts: DashMap::with_hasher(FxBuildHasher),
            frequent_ttl: 60,
            rare_ttl: 300,
            frequency_threshold: 5,
        }
    }

    pub fn with_config(frequent_ttl: u32, rare_ttl: u32, frequency_threshold: u64) -> Self {
        Self {
            query_counts: DashMap::with_hasher(FxBuildHasher),
            frequent_ttl,
            rare_ttl,
            frequency_threshold,
        }
    }

    pub fn record_and_get_ttl(&self, name: &str, now: i64) -> u32 {
        let mut entry = self
            .query_counts
            .entry(name.to_string())
            .or_insert_with(|| QueryCounter {
                count: AtomicU64::new(0),
                last_reset: now,
            });

        let counter = entry.value();

        if now.saturating_sub(counter.last_reset) >= RESET_WINDOW_SECS {
            *entry.value_mut() = QueryCounter {
                count: AtomicU64::new(1),
                last_reset: now,
            };
            return self.rare_ttl;
        }

        let count = counter.count.fetch_add(1, AtomicOrdering::Relaxed) + 1;

        if count > self.frequency_threshold {
            self.frequent_ttl
        } else {
            self.rare_ttl
        }
    }

    /// Drops counters that have been idle for a full window.
    pub fn cleanup_old_entries(&self, now: i64) -> usize {
        let mut removed = 0;

        self.query_counts.retain(|_name, counter| {
            if now.saturating_sub(counter.last_reset) >= RESET_WINDOW_SECS {
                removed += 1;
                false
            } else {
                true
            }
        });

        removed
    }
}

impl Default for NegativeTtlTracker {
    fn default() -> Self {
        Self::new()
    }
}
