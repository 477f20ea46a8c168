use dcache_domain::{CacheEnvelope, CacheKey, DomainError};
use hickory_proto::op::{Message, MessageType};
use hickory_proto::rr::Record;

/// A cached response plus the metadata needed to key, expire, and republish
/// it. Doubles as the decoded form of the bus envelope: the envelope carries
/// the response in packed wire format, this carries it parsed.
#[derive(Debug, Clone)]
pub struct CachedAnswer {
    /// Question name as transmitted, case preserved.
    pub name: String,
    /// Question RR type.
    pub rtype: u16,
    /// DO bit of the producing exchange.
    pub dnssec_ok: bool,
    pub response: Message,
    /// Absolute expiry, UNIX seconds, computed by the producer.
    pub time_to_die: i64,
    /// Producer node id.
    pub by: String,
    /// True for negative responses.
    pub error: bool,
}

impl CachedAnswer {
    pub fn key(&self) -> CacheKey {
        CacheKey::new(&self.name, self.rtype)
    }

    #[inline]
    pub fn is_expired(&self, now: i64) -> bool {
        now > self.time_to_die
    }

    /// Packs the response into wire format for the bus envelope.
    pub fn to_envelope(&self) -> Result<CacheEnvelope, DomainError> {
        let bytes = self
            .response
            .to_vec()
            .map_err(|e| DomainError::MessagePack(e.to_string()))?;
        Ok(CacheEnvelope {
            response: bytes,
            rtype: self.rtype,
            dnssec_ok: self.dnssec_ok,
            time_to_die: self.time_to_die,
            by: self.by.clone(),
            error: self.error,
            name: self.name.clone(),
        })
    }

    /// Reconstructs an answer from a received envelope.
    pub fn from_envelope(envelope: CacheEnvelope) -> Result<Self, DomainError> {
        let response = Message::from_vec(&envelope.response)
            .map_err(|e| DomainError::MessageUnpack(e.to_string()))?;
        Ok(Self {
            name: envelope.name,
            rtype: envelope.rtype,
            dnssec_ok: envelope.dnssec_ok,
            response,
            time_to_die: envelope.time_to_die,
            by: envelope.by,
            error: envelope.error,
        })
    }

    /// Builds the reply for the current request: id, opcode, RD flag and the
    /// question section come from the request. The cached rcode survives so
    /// negative answers stay negative.
    pub fn reply_for(&self, request: &Message) -> Message {
        let mut reply = Message::new();
        reply.set_id(request.id());
        reply.set_message_type(MessageType::Response);
        reply.set_op_code(request.op_code());
        reply.set_recursion_desired(request.recursion_desired());
        reply.set_recursion_available(self.response.recursion_available());
        reply.set_authoritative(self.response.authoritative());
        reply.set_authentic_data(self.response.authentic_data());
        reply.set_response_code(self.response.response_code());
        reply.add_queries(request.queries().to_vec());
        reply.insert_answers(self.response.answers().to_vec());
        reply.insert_name_servers(self.response.name_servers().to_vec());
        reply.insert_additionals(self.response.additionals().to_vec());
        reply
    }
}

/// Minimum TTL over the answer section; `None` when there are no answers.
/// Negative responses get their bounded TTL from the tracker instead.
pub fn min_answer_ttl(msg: &Message) -> Option<u32> {
    msg.answers().iter().map(Record::ttl).min()
}
