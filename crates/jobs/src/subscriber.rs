use dcache_application::{AnswerStore, MessageBus, PluginMetrics};
use dcache_domain::{CacheEnvelope, NodeId};
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const DEFAULT_RECEIVE_BACKOFF: Duration = Duration::from_secs(10);

/// Consumes the bus and feeds peer-resolved answers into the local caches.
/// Exactly one runs per node.
///
/// Broker failures back off for a fixed interval and resubscribe on a fresh
/// connection; malformed payloads are skipped without touching the
/// subscription.
pub struct SubscriberJob {
    bus: Arc<dyn MessageBus>,
    store: Arc<dyn AnswerStore>,
    metrics: Arc<PluginMetrics>,
    node_id: NodeId,
    receive_backoff: Duration,
    shutdown: CancellationToken,
}

impl SubscriberJob {
    pub fn new(
        bus: Arc<dyn MessageBus>,
        store: Arc<dyn AnswerStore>,
        metrics: Arc<PluginMetrics>,
        node_id: NodeId,
    ) -> Self {
        Self {
            bus,
            store,
            metrics,
            node_id,
            receive_backoff: DEFAULT_RECEIVE_BACKOFF,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_receive_backoff(mut self, backoff: Duration) -> Self {
        self.receive_backoff = backoff;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(node = %self.node_id, "Starting subscribe worker");

        'outer: loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            let mut subscription = match self.bus.subscribe().await {
                Ok(subscription) => subscription,
                Err(e) => {
                    self.metrics
                        .redis_errors
                        .fetch_add(1, AtomicOrdering::Relaxed);
                    warn!(error = %e, "subscribe failed, backing off");
                    if self.backoff_interrupted().await {
                        break;
                    }
                    continue;
                }
            };

            loop {
                let payload = tokio::select! {
                    _ = self.shutdown.cancelled() => break 'outer,
                    received = subscription.next_message() => match received {
                        Ok(payload) => payload,
                        Err(e) => {
                            self.metrics
                                .redis_errors
                                .fetch_add(1, AtomicOrdering::Relaxed);
                            warn!(error = %e, "receive failed, backing off");
                            if self.backoff_interrupted().await {
                                break 'outer;
                            }
                            // Resubscribe on a fresh connection.
                            continue 'outer;
                        }
                    }
                };

                self.handle_payload(&payload);
            }
        }

        // Dropping the subscription closes its broker connection.
        info!("Subscribe worker: shutting down");
    }

    fn handle_payload(&self, payload: &[u8]) {
        let envelope = match CacheEnvelope::decode(payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "skipping undecodable bus message");
                return;
            }
        };

        // Our own publication echoed back by the broker.
        if self.node_id == envelope.by.as_str() {
            self.metrics
                .suppressed_loopback
                .fetch_add(1, AtomicOrdering::Relaxed);
            return;
        }

        debug!(name = %envelope.name, by = %envelope.by, error = envelope.error, "received cache entry");
        match self.store.store(envelope) {
            Ok(()) => {
                self.metrics.received.fetch_add(1, AtomicOrdering::Relaxed);
            }
            Err(e) => {
                warn!(error = %e, "skipping unusable cache entry");
            }
        }
    }

    /// Returns true when the backoff was cut short by shutdown.
    async fn backoff_interrupted(&self) -> bool {
        tokio::select! {
            _ = self.shutdown.cancelled() => true,
            _ = tokio::time::sleep(self.receive_backoff) => false,
        }
    }
}
