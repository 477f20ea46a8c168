use dcache_application::{MessageBus, PluginMetrics, PublishQueue};
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Drains the publish queue onto the bus. Exactly one runs per node.
///
/// A failed publish is counted and the envelope discarded. The next
/// cacheable response for the same key carries equivalent information, so
/// retrying buys nothing.
pub struct PublisherJob {
    queue: Arc<PublishQueue>,
    bus: Arc<dyn MessageBus>,
    metrics: Arc<PluginMetrics>,
    poll_interval: Duration,
    shutdown: CancellationToken,
}

impl PublisherJob {
    pub fn new(
        queue: Arc<PublishQueue>,
        bus: Arc<dyn MessageBus>,
        metrics: Arc<PluginMetrics>,
    ) -> Self {
        Self {
            queue,
            bus,
            metrics,
            poll_interval: DEFAULT_POLL_INTERVAL,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!("Starting publish worker");

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    // Flush whatever the request path queued after our last
                    // pass, then exit.
                    self.drain().await;
                    info!("Publish worker: shutting down");
                    break;
                }
                _ = self.queue.notified() => {}
                _ = tokio::time::sleep(self.poll_interval) => {}
            }

            self.drain().await;
        }
    }

    async fn drain(&self) {
        while let Some(envelope) = self.queue.try_dequeue() {
            let payload = match envelope.encode() {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(error = %e, name = %envelope.name, "dropping unencodable envelope");
                    continue;
                }
            };

            match self.bus.publish(payload).await {
                Ok(()) => {
                    self.metrics.published.fetch_add(1, AtomicOrdering::Relaxed);
                    debug!(name = %envelope.name, rtype = envelope.rtype, "published cache entry");
                }
                Err(e) => {
                    self.metrics
                        .redis_errors
                        .fetch_add(1, AtomicOrdering::Relaxed);
                    warn!(error = %e, name = %envelope.name, "publish failed, entry lost for peers");
                }
            }
        }
    }
}
