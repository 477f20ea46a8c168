use dcache_domain::{CacheEnvelope, DomainError};

/// Sink for envelopes received from the bus.
///
/// Implementations unpack the carried wire message and route it into the
/// positive or negative cache according to the envelope's error flag.
pub trait AnswerStore: Send + Sync {
    fn store(&self, envelope: CacheEnvelope) -> Result<(), DomainError>;
}
