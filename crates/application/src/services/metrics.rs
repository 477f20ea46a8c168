use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

// align(64) keeps the request-path counters on their own cache line, away
// from the worker-side counters.
#[derive(Default)]
#[repr(align(64))]
pub struct PluginMetrics {
    // Hot counters, touched on every query.
    // hits(8) + misses(8) + _hot_pad(48) fill the 64-byte line exactly.
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    _hot_pad: [u64; 6],

    // Cold counters, worker-side and failure paths.
    pub discard_cache: AtomicU64,
    pub redis_errors: AtomicU64,
    pub published: AtomicU64,
    pub received: AtomicU64,
    pub suppressed_loopback: AtomicU64,
    pub queue_dropped: AtomicU64,
}

impl PluginMetrics {
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(AtomicOrdering::Relaxed) as f64;
        let total = hits + self.misses.load(AtomicOrdering::Relaxed) as f64;

        if total > 0.0 {
            (hits / total) * 100.0
        } else {
            0.0
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hits: self.hits.load(AtomicOrdering::Relaxed),
            misses: self.misses.load(AtomicOrdering::Relaxed),
            discard_cache: self.discard_cache.load(AtomicOrdering::Relaxed),
            redis_errors: self.redis_errors.load(AtomicOrdering::Relaxed),
            published: self.published.load(AtomicOrdering::Relaxed),
            received: self.received.load(AtomicOrdering::Relaxed),
            suppressed_loopback: self.suppressed_loopback.load(AtomicOrdering::Relaxed),
            queue_dropped: self.queue_dropped.load(AtomicOrdering::Relaxed),
            hit_rate: self.hit_rate(),
        }
    }
}

/// Point-in-time counter values for the host's metrics exporter.
///
/// The canonical exported names are `dcache_hits_total`,
/// `dcache_misses_total`, `dcache_discard_cache_total` and
/// `dcache_redis_errors_total`; the transport is the host's concern.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub discard_cache: u64,
    pub redis_errors: u64,
    pub published: u64,
    pub received: u64,
    pub suppressed_loopback: u64,
    pub queue_dropped: u64,
    pub hit_rate: f64,
}
