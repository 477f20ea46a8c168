use crate::dns::answer::{min_answer_ttl, CachedAnswer};
use crate::dns::cache::{CacheRepository, NegativeTtlTracker};
use crate::dns::classify::classify;
use crate::dns::clock::unix_now_secs;
use crate::dns::filter::filter_records;
use crate::dns::writer::ResponseWriter;
use async_trait::async_trait;
use dcache_application::PublishQueue;
use dcache_domain::{CacheDisposition, DomainError, NodeId, ResponseClass};
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::warn;

/// Decorates the downstream response writer.
///
/// On every outbound write: classify, filter the client-visible view,
/// insert the cacheable result into the local caches, and enqueue it for
/// publication to peers. The client write always happens, whatever the
/// capture path did.
pub struct PublishingWriter<'a> {
    inner: &'a mut dyn ResponseWriter,
    cache: Arc<CacheRepository>,
    queue: Arc<PublishQueue>,
    negative_ttl: Arc<NegativeTtlTracker>,
    node_id: NodeId,
}

impl<'a> PublishingWriter<'a> {
    pub fn new(
        inner: &'a mut dyn ResponseWriter,
        cache: Arc<CacheRepository>,
        queue: Arc<PublishQueue>,
        negative_ttl: Arc<NegativeTtlTracker>,
        node_id: NodeId,
    ) -> Self {
        Self {
            inner,
            cache,
            queue,
            negative_ttl,
            node_id,
        }
    }

    fn capture(&self, response: &Message, class: ResponseClass, dnssec_ok: bool) {
        if response.truncated() {
            return;
        }

        let disposition = class.disposition();
        if disposition == CacheDisposition::Skip {
            return;
        }

        let Some(query) = response.queries().first() else {
            return;
        };

        let now = unix_now_secs();
        let name = query.name().to_utf8();

        let ttl = match disposition {
            CacheDisposition::Positive => min_answer_ttl(response).unwrap_or(0),
            CacheDisposition::Negative => {
                let tracked = self.negative_ttl.record_and_get_ttl(&name, now);
                match min_answer_ttl(response) {
                    Some(answer_ttl) => tracked.min(answer_ttl),
                    None => tracked,
                }
            }
            CacheDisposition::Skip => unreachable!(),
        };

        let answer = CachedAnswer {
            name,
            rtype: u16::from(query.query_type()),
            dnssec_ok,
            response: response.clone(),
            time_to_die: now + i64::from(ttl),
            by: self.node_id.to_string(),
            error: disposition == CacheDisposition::Negative,
        };

        // Self-cache before publishing; the broker echo of this record comes
        // back with our own node id and is suppressed by the subscriber.
        self.cache.store_answer(answer.clone());

        match answer.to_envelope() {
            Ok(envelope) => self.queue.enqueue(envelope),
            Err(e) => {
                warn!(error = %e, name = %answer.name, "response did not pack, skipping publish");
            }
        }
    }
}

#[async_trait]
impl ResponseWriter for PublishingWriter<'_> {
    async fn write_msg(&mut self, mut response: Message) -> Result<(), DomainError> {
        let (class, dnssec_ok) = classify(&response);
        filter_records(&mut response, dnssec_ok);
        self.capture(&response, class, dnssec_ok);
        self.inner.write_msg(response).await
    }

    fn remote_addr(&self) -> SocketAddr {
        self.inner.remote_addr()
    }

    fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr()
    }
}
