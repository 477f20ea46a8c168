use async_trait::async_trait;
use dcache_application::{BusSubscription, MessageBus};
use dcache_domain::DomainError;
use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 1_024;

/// In-process bus with the broker's fan-out contract, minus the network.
///
/// Used for standalone (single-node) deployments and for tests; several
/// handlers subscribed to one `LoopbackBus` behave like a fleet sharing a
/// broker.
#[derive(Clone)]
pub struct LoopbackBus {
    sender: broadcast::Sender<Vec<u8>>,
}

impl LoopbackBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }
}

impl Default for LoopbackBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBus for LoopbackBus {
    async fn publish(&self, payload: Vec<u8>) -> Result<(), DomainError> {
        // No live subscribers is not an error; fan-out is best-effort.
        let _ = self.sender.send(payload);
        Ok(())
    }

    async fn subscribe(&self) -> Result<Box<dyn BusSubscription>, DomainError> {
        Ok(Box::new(LoopbackSubscription {
            receiver: self.sender.subscribe(),
        }))
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

struct LoopbackSubscription {
    receiver: broadcast::Receiver<Vec<u8>>,
}

#[async_trait]
impl BusSubscription for LoopbackSubscription {
    async fn next_message(&mut self) -> Result<Vec<u8>, DomainError> {
        loop {
            match self.receiver.recv().await {
                Ok(payload) => return Ok(payload),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Overflow dropped the oldest messages; keep reading.
                    debug!(skipped, "loopback subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(DomainError::BrokerReceive(
                        "loopback bus closed".to_string(),
                    ));
                }
            }
        }
    }
}
