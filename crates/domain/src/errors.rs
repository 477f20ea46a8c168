use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid broker address: {0}")]
    InvalidBrokerAddress(String),

    #[error("Broker connection failed: {0}")]
    BrokerConnect(String),

    #[error("Broker publish failed: {0}")]
    BrokerPublish(String),

    #[error("Broker receive failed: {0}")]
    BrokerReceive(String),

    #[error("Envelope encode failed: {0}")]
    EnvelopeEncode(String),

    #[error("Envelope decode failed: {0}")]
    EnvelopeDecode(String),

    #[error("DNS message pack failed: {0}")]
    MessagePack(String),

    #[error("DNS message unpack failed: {0}")]
    MessageUnpack(String),

    #[error("Downstream handler failed: {0}")]
    Downstream(String),
}
