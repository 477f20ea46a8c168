use async_trait::async_trait;
use dcache_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use std::net::SocketAddr;

/// Capability set of the host's response writer.
///
/// The outbound interceptor composes with one of these; a plain struct
/// holding the inner writer is all the decoration needed.
#[async_trait]
pub trait ResponseWriter: Send {
    async fn write_msg(&mut self, response: Message) -> Result<(), DomainError>;

    /// Address of the querying client.
    fn remote_addr(&self) -> SocketAddr;

    /// Local socket the query arrived on.
    fn local_addr(&self) -> SocketAddr;
}

/// A link in the host's handler chain.
#[async_trait]
pub trait DnsHandler: Send + Sync {
    /// Serves one request, writing the response through `writer`, and
    /// returns the response code the host should account the query under.
    async fn serve_dns(
        &self,
        request: &Message,
        writer: &mut dyn ResponseWriter,
    ) -> Result<ResponseCode, DomainError>;
}
