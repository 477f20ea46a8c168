use crate::dns::answer::CachedAnswer;
use crate::dns::cache::AnswerCache;
use crate::dns::classify::classify;
use dcache_application::{AnswerStore, PluginMetrics};
use dcache_domain::{CacheDisposition, CacheEnvelope, DcacheConfig, DomainError};
use hickory_proto::op::Message;
use std::sync::Arc;
use tracing::debug;

/// The node's answer store: a positive and a negative LRU behind one front.
///
/// Every insert, local or received from a peer, is routed by the response's
/// own classification, so a mislabeled envelope can never put a negative
/// answer into the positive cache or vice versa.
pub struct CacheRepository {
    positive: AnswerCache,
    negative: AnswerCache,
}

impl CacheRepository {
    pub fn new(config: &DcacheConfig, metrics: Arc<PluginMetrics>) -> Self {
        Self {
            positive: AnswerCache::new(config.positive_capacity, true, Arc::clone(&metrics)),
            negative: AnswerCache::new(config.negative_capacity, false, metrics),
        }
    }

    /// Negative-first lookup: a previously observed NXDOMAIN or SERVFAIL
    /// short-circuits before the positive path is even consulted.
    pub fn lookup(&self, now: i64, request: &Message) -> Option<Arc<CachedAnswer>> {
        self.negative
            .get(now, request)
            .or_else(|| self.positive.get(now, request))
    }

    /// Routes a record into the cache its classification belongs to.
    /// Records whose error flag disagrees with the response are dropped.
    pub fn store_answer(&self, answer: CachedAnswer) {
        if answer.response.truncated() {
            return;
        }

        let (class, _) = classify(&answer.response);
        match class.disposition() {
            CacheDisposition::Positive if !answer.error => self.positive.set(answer),
            CacheDisposition::Negative if answer.error => self.negative.set(answer),
            CacheDisposition::Skip => {}
            _ => {
                debug!(
                    class = %class,
                    error = answer.error,
                    name = %answer.name,
                    "dropping entry whose error flag disagrees with its class"
                );
            }
        }
    }

    pub fn positive_len(&self) -> usize {
        self.positive.len()
    }

    pub fn negative_len(&self) -> usize {
        self.negative.len()
    }
}

impl AnswerStore for CacheRepository {
    fn store(&self, envelope: CacheEnvelope) -> Result<(), DomainError> {
        let answer = CachedAnswer::from_envelope(envelope)?;
        self.store_answer(answer);
        Ok(())
    }
}
