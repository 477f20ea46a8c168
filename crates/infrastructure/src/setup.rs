use crate::bus::RedisMessageBus;
use crate::dns::cache::{CacheRepository, NegativeTtlTracker};
use crate::dns::handler::Dcache;
use crate::dns::writer::DnsHandler;
use dcache_application::{MessageBus, PluginMetrics, PublishQueue};
use dcache_domain::{DcacheConfig, DomainError, NodeId};
use std::sync::Arc;
use tracing::info;

/// Assembles the plugin from a parsed `dcache` directive.
///
/// The host registers the returned handler in its chain and hands the
/// queue, cache and bus to a job runner for the publisher and subscriber
/// workers. Broker health is checked here: a dead broker refuses startup
/// rather than degrading silently at runtime.
pub struct DcacheBuilder {
    config: DcacheConfig,
    bus: Option<Arc<dyn MessageBus>>,
}

/// Everything setup produced, ready for wiring into the host.
pub struct DcacheRuntime {
    pub handler: Arc<Dcache>,
    pub cache: Arc<CacheRepository>,
    pub queue: Arc<PublishQueue>,
    pub bus: Arc<dyn MessageBus>,
    pub metrics: Arc<PluginMetrics>,
    pub node_id: NodeId,
}

impl DcacheBuilder {
    pub fn new(config: DcacheConfig) -> Self {
        Self { config, bus: None }
    }

    /// Replaces the Redis backend, e.g. with a `LoopbackBus` for standalone
    /// runs and tests.
    pub fn with_bus(mut self, bus: Arc<dyn MessageBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub async fn build(self, next: Arc<dyn DnsHandler>) -> Result<DcacheRuntime, DomainError> {
        let bus = match self.bus {
            Some(bus) => bus,
            None => Arc::new(RedisMessageBus::connect(&self.config).await?) as Arc<dyn MessageBus>,
        };
        bus.health_check().await?;

        let metrics = Arc::new(PluginMetrics::default());
        let cache = Arc::new(CacheRepository::new(&self.config, Arc::clone(&metrics)));
        let queue = Arc::new(PublishQueue::new(
            self.config.queue_capacity,
            Arc::clone(&metrics),
        ));
        let negative_ttl = Arc::new(NegativeTtlTracker::new());
        let node_id = NodeId::generate();

        let handler = Arc::new(Dcache::new(
            Arc::clone(&cache),
            Arc::clone(&queue),
            negative_ttl,
            Arc::clone(&metrics),
            node_id.clone(),
            next,
        ));

        info!(node = %node_id, broker = %self.config.broker_addr(), "dcache ready");

        Ok(DcacheRuntime {
            handler,
            cache,
            queue,
            bus,
            metrics,
            node_id,
        })
    }
}
