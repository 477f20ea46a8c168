use crate::dns::answer::CachedAnswer;
use crate::dns::classify::{classify, message_key};
use crate::dns::filter::strip_opt;
use dcache_application::PluginMetrics;
use hickory_proto::op::Message;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::{Arc, Mutex};

/// One bounded strict-LRU cache of answers, keyed by the 64-bit cache key.
///
/// Two instances exist per node: one for positive answers, one for negative
/// ones. The `lru` container handles recency and overflow eviction; the
/// outer mutex makes the whole read-verify-expire sequence atomic.
pub struct AnswerCache {
    items: Mutex<LruCache<u64, Arc<CachedAnswer>>>,
    positive: bool,
    metrics: Arc<PluginMetrics>,
}

impl AnswerCache {
    pub fn new(capacity: usize, positive: bool, metrics: Arc<PluginMetrics>) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        Self {
            items: Mutex::new(LruCache::new(capacity)),
            positive,
            metrics,
        }
    }

    /// TTL-gated lookup.
    ///
    /// The stored (name, type) pair is re-verified against the request so a
    /// key collision reads as a counted miss, never as a wrong answer.
    /// Expired entries are removed on the way out.
    pub fn get(&self, now: i64, request: &Message) -> Option<Arc<CachedAnswer>> {
        let key = message_key(request)?.value();
        let query = request.queries().first()?;
        let qname = query.name().to_utf8();
        let qtype = u16::from(query.query_type());

        let mut items = self.items.lock().unwrap();
        let answer = Arc::clone(items.get(&key)?);

        if answer.rtype != qtype || answer.name != qname {
            items.pop(&key);
            self.metrics
                .discard_cache
                .fetch_add(1, AtomicOrdering::Relaxed);
            return None;
        }

        if answer.is_expired(now) {
            items.pop(&key);
            return None;
        }

        Some(answer)
    }

    /// Inserts, overwriting any prior entry for the key.
    ///
    /// Non-keyable responses, and empty answer sections in the positive
    /// instance, are a silent no-op. The stored response never carries an
    /// OPT record.
    pub fn set(&self, mut answer: CachedAnswer) {
        if answer.response.truncated() {
            return;
        }
        let (class, _) = classify(&answer.response);
        if !class.is_keyable() {
            return;
        }
        if self.positive && answer.response.answers().is_empty() {
            return;
        }

        strip_opt(&mut answer.response);
        let key = answer.key().value();
        self.items.lock().unwrap().put(key, Arc::new(answer));
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }
}
