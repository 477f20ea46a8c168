use crate::services::PluginMetrics;
use dcache_domain::CacheEnvelope;
use std::collections::VecDeque;
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Process-local FIFO between the request path and the publisher worker.
///
/// Strictly decouples request latency from broker latency. Bounded: on
/// overflow the oldest envelope is dropped, mirroring the best-effort
/// posture of the broker path itself. Enqueue never blocks.
pub struct PublishQueue {
    items: Mutex<VecDeque<CacheEnvelope>>,
    capacity: usize,
    notify: Notify,
    metrics: Arc<PluginMetrics>,
}

impl PublishQueue {
    pub fn new(capacity: usize, metrics: Arc<PluginMetrics>) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity.min(1_024))),
            capacity,
            notify: Notify::new(),
            metrics,
        }
    }

    pub fn enqueue(&self, envelope: CacheEnvelope) {
        {
            let mut items = self.items.lock().unwrap();
            if items.len() >= self.capacity {
                items.pop_front();
                self.metrics
                    .queue_dropped
                    .fetch_add(1, AtomicOrdering::Relaxed);
            }
            items.push_back(envelope);
        }
        self.notify.notify_one();
    }

    pub fn try_dequeue(&self) -> Option<CacheEnvelope> {
        self.items.lock().unwrap().pop_front()
    }

    /// Takes everything queued right now, front first.
    pub fn drain(&self) -> Vec<CacheEnvelope> {
        self.items.lock().unwrap().drain(..).collect()
    }

    /// Parks until an enqueue happens. The consumer pairs this with a poll
    /// timeout so a missed wakeup costs at most one poll interval.
    pub async fn notified(&self) {
        self.notify.notified().await;
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }
}
