use async_trait::async_trait;
use dcache_application::{BusSubscription, MessageBus};
use dcache_domain::{DcacheConfig, DomainError};
use futures::stream::BoxStream;
use futures::StreamExt;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

/// Topic every node publishes and subscribes on; also the plugin name.
pub const TOPIC: &str = "dcache";

/// Redis-backed message bus.
///
/// Two logical connections per node: a multiplexed connection manager for
/// publishing and a dedicated pub/sub connection per subscription. Redis
/// PUBLISH/SUBSCRIBE gives best-effort at-most-once fan-out, which is all
/// the cache needs.
pub struct RedisMessageBus {
    client: redis::Client,
    publisher: ConnectionManager,
}

impl RedisMessageBus {
    pub async fn connect(config: &DcacheConfig) -> Result<Self, DomainError> {
        let url = if config.broker_host.contains(':') {
            format!("redis://[{}]:{}", config.broker_host, config.broker_port)
        } else {
            format!("redis://{}:{}", config.broker_host, config.broker_port)
        };

        let client = redis::Client::open(url.as_str())
            .map_err(|e| DomainError::BrokerConnect(e.to_string()))?;
        let publisher = client
            .get_connection_manager()
            .await
            .map_err(|e| DomainError::BrokerConnect(e.to_string()))?;

        debug!(broker = %config.broker_addr(), "connected to broker");
        Ok(Self { client, publisher })
    }
}

#[async_trait]
impl MessageBus for RedisMessageBus {
    async fn publish(&self, payload: Vec<u8>) -> Result<(), DomainError> {
        let mut conn = self.publisher.clone();
        let _receivers: i64 = conn
            .publish(TOPIC, payload)
            .await
            .map_err(|e| DomainError::BrokerPublish(e.to_string()))?;
        Ok(())
    }

    async fn subscribe(&self) -> Result<Box<dyn BusSubscription>, DomainError> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| DomainError::BrokerConnect(e.to_string()))?;
        pubsub
            .subscribe(TOPIC)
            .await
            .map_err(|e| DomainError::BrokerConnect(e.to_string()))?;

        Ok(Box::new(RedisSubscription {
            stream: pubsub.into_on_message().boxed(),
        }))
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        let mut publish_conn = self.publisher.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut publish_conn)
            .await
            .map_err(|e| DomainError::BrokerConnect(e.to_string()))?;

        // The subscribe path opens its own connection; probe that too so a
        // half-reachable broker fails at setup instead of at runtime.
        let mut subscribe_conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| DomainError::BrokerConnect(e.to_string()))?;
        let _: String = redis::cmd("PING")
            .query_async(&mut subscribe_conn)
            .await
            .map_err(|e| DomainError::BrokerConnect(e.to_string()))?;

        Ok(())
    }
}

/// Owns the pub/sub connection; dropping it closes the connection.
struct RedisSubscription {
    stream: BoxStream<'static, redis::Msg>,
}

#[async_trait]
impl BusSubscription for RedisSubscription {
    async fn next_message(&mut self) -> Result<Vec<u8>, DomainError> {
        match self.stream.next().await {
            Some(msg) => Ok(msg.get_payload_bytes().to_vec()),
            // The stream only ends when the connection is gone.
            None => Err(DomainError::BrokerReceive(
                "subscription stream closed".to_string(),
            )),
        }
    }
}
