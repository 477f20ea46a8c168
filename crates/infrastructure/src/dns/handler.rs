use crate::dns::cache::{CacheRepository, NegativeTtlTracker};
use crate::dns::classify::classify;
use crate::dns::clock::unix_now_secs;
use crate::dns::filter::filter_records;
use crate::dns::interceptor::PublishingWriter;
use crate::dns::writer::{DnsHandler, ResponseWriter};
use async_trait::async_trait;
use dcache_application::{PluginMetrics, PublishQueue};
use dcache_domain::{DomainError, NodeId};
use hickory_proto::op::{Message, ResponseCode};
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::Arc;
use tracing::debug;

/// The dcache handler: a read-through answer cache shared across the fleet,
/// sitting in front of the host's resolver chain.
pub struct Dcache {
    cache: Arc<CacheRepository>,
    queue: Arc<PublishQueue>,
    negative_ttl: Arc<NegativeTtlTracker>,
    metrics: Arc<PluginMetrics>,
    node_id: NodeId,
    next: Arc<dyn DnsHandler>,
}

impl Dcache {
    pub fn new(
        cache: Arc<CacheRepository>,
        queue: Arc<PublishQueue>,
        negative_ttl: Arc<NegativeTtlTracker>,
        metrics: Arc<PluginMetrics>,
        node_id: NodeId,
        next: Arc<dyn DnsHandler>,
    ) -> Self {
        Self {
            cache,
            queue,
            negative_ttl,
            metrics,
            node_id,
            next,
        }
    }

    pub fn metrics(&self) -> Arc<PluginMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }
}

#[async_trait]
impl DnsHandler for Dcache {
    async fn serve_dns(
        &self,
        request: &Message,
        writer: &mut dyn ResponseWriter,
    ) -> Result<ResponseCode, DomainError> {
        let now = unix_now_secs();

        if let Some(answer) = self.cache.lookup(now, request) {
            self.metrics.hits.fetch_add(1, AtomicOrdering::Relaxed);
            debug!(name = %answer.name, rtype = answer.rtype, by = %answer.by, "cache hit");

            // The stored record keeps its DNSSEC records; each client sees
            // the view its own DO bit asks for.
            let (_, client_do) = classify(request);
            let mut reply = answer.reply_for(request);
            filter_records(&mut reply, client_do);

            writer.write_msg(reply).await?;
            return Ok(ResponseCode::NoError);
        }

        self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);

        let mut interceptor = PublishingWriter::new(
            writer,
            Arc::clone(&self.cache),
            Arc::clone(&self.queue),
            Arc::clone(&self.negative_ttl),
            self.node_id.clone(),
        );
        self.next.serve_dns(request, &mut interceptor).await
    }
}
