use async_trait::async_trait;
use dcache_domain::DomainError;

/// Port to the pub/sub broker.
///
/// Each node holds two logical connections: one for publishing, one for
/// subscribing. Delivery is best-effort fan-out with no acknowledgements.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Publishes one payload on the cache topic. A lost message is not
    /// retried; the next cacheable response for the same key carries
    /// equivalent information.
    async fn publish(&self, payload: Vec<u8>) -> Result<(), DomainError>;

    /// Opens a fresh subscription on the cache topic.
    async fn subscribe(&self) -> Result<Box<dyn BusSubscription>, DomainError>;

    /// Setup-time liveness probe; failure must refuse plugin startup.
    async fn health_check(&self) -> Result<(), DomainError>;
}

/// A live subscription. Dropping it closes the underlying connection.
#[async_trait]
pub trait BusSubscription: Send {
    /// Waits for the next raw payload. `Err` signals a broker-level failure
    /// the caller should back off from before resubscribing.
    async fn next_message(&mut self) -> Result<Vec<u8>, DomainError>;
}
