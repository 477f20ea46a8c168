#![allow(dead_code)]

use async_trait::async_trait;
use dcache_application::{AnswerStore, BusSubscription, MessageBus};
use dcache_domain::{CacheEnvelope, DomainError};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::broadcast;

// ============================================================================
// Channel-backed bus
// ============================================================================

/// In-process stand-in for the broker: records every publish and fans the
/// payload out to all live subscriptions.
pub struct ChannelBus {
    sender: broadcast::Sender<Vec<u8>>,
    published: Mutex<Vec<Vec<u8>>>,
}

impl ChannelBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self {
            sender,
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn published(&self) -> Vec<Vec<u8>> {
        self.published.lock().unwrap().clone()
    }

    pub fn published_count(&self) -> usize {
        self.published.lock().unwrap().len()
    }

    /// Injects a payload as if a peer had published it.
    pub fn inject(&self, payload: Vec<u8>) {
        let _ = self.sender.send(payload);
    }
}

#[async_trait]
impl MessageBus for ChannelBus {
    async fn publish(&self, payload: Vec<u8>) -> Result<(), DomainError> {
        self.published.lock().unwrap().push(payload.clone());
        let _ = self.sender.send(payload);
        Ok(())
    }

    async fn subscribe(&self) -> Result<Box<dyn BusSubscription>, DomainError> {
        Ok(Box::new(ChannelSubscription {
            receiver: self.sender.subscribe(),
        }))
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

struct ChannelSubscription {
    receiver: broadcast::Receiver<Vec<u8>>,
}

#[async_trait]
impl BusSubscription for ChannelSubscription {
    async fn next_message(&mut self) -> Result<Vec<u8>, DomainError> {
        self.receiver
            .recv()
            .await
            .map_err(|e| DomainError::BrokerReceive(e.to_string()))
    }
}

// ============================================================================
// Failing bus
// ============================================================================

/// A bus whose every operation fails, for exercising the error paths.
pub struct FailingBus;

#[async_trait]
impl MessageBus for FailingBus {
    async fn publish(&self, _payload: Vec<u8>) -> Result<(), DomainError> {
        Err(DomainError::BrokerPublish("connection refused".to_string()))
    }

    async fn subscribe(&self) -> Result<Box<dyn BusSubscription>, DomainError> {
        Err(DomainError::BrokerConnect("connection refused".to_string()))
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        Err(DomainError::BrokerConnect("connection refused".to_string()))
    }
}

// ============================================================================
// Recording store
// ============================================================================

/// `AnswerStore` that just remembers what it was given.
pub struct RecordingStore {
    envelopes: Mutex<Vec<CacheEnvelope>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            envelopes: Mutex::new(Vec::new()),
        }
    }

    pub fn stored(&self) -> Vec<CacheEnvelope> {
        self.envelopes.lock().unwrap().clone()
    }

    pub fn stored_count(&self) -> usize {
        self.envelopes.lock().unwrap().len()
    }
}

impl AnswerStore for RecordingStore {
    fn store(&self, envelope: CacheEnvelope) -> Result<(), DomainError> {
        self.envelopes.lock().unwrap().push(envelope);
        Ok(())
    }
}

// ============================================================================
// Misc
// ============================================================================

pub fn envelope(name: &str, by: &str, error: bool) -> CacheEnvelope {
    CacheEnvelope {
        response: vec![0u8; 12],
        rtype: 1,
        dnssec_ok: false,
        time_to_die: 4_000_000_000,
        by: by.to_string(),
        error,
        name: name.to_string(),
    }
}

/// Polls `condition` until it holds or the deadline passes.
pub async fn wait_until<F: Fn() -> bool>(deadline: Duration, condition: F) -> bool {
    let start = tokio::time::Instant::now();
    while start.elapsed() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
