#![allow(dead_code)]

use async_trait::async_trait;
use dcache_application::MessageBus;
use dcache_domain::DomainError;
use dcache_infrastructure::{DnsHandler, ResponseWriter};
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::null::NULL;
use hickory_proto::rr::rdata::{A, MX, SOA};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;
use std::time::Duration;

pub const TYPE_RRSIG: u16 = 46;
pub const TYPE_NSEC: u16 = 47;

// ============================================================================
// Message builders
// ============================================================================

pub fn query(name: &str, rtype: RecordType) -> Message {
    let mut q = Query::new();
    q.set_name(Name::from_str(name).unwrap());
    q.set_query_type(rtype);

    let mut msg = Message::new();
    msg.set_id(4660);
    msg.set_message_type(MessageType::Query);
    msg.set_op_code(OpCode::Query);
    msg.set_recursion_desired(true);
    msg.add_query(q);
    msg
}

pub fn query_with_do(name: &str, rtype: RecordType) -> Message {
    let mut msg = query(name, rtype);
    let mut edns = Edns::new();
    edns.set_max_payload(4096);
    edns.set_dnssec_ok(true);
    msg.set_edns(edns);
    msg
}

/// Response skeleton echoing a request's question and id.
pub fn response(request: &Message, rcode: ResponseCode) -> Message {
    let mut msg = Message::new();
    msg.set_id(request.id());
    msg.set_message_type(MessageType::Response);
    msg.set_op_code(OpCode::Query);
    msg.set_recursion_desired(request.recursion_desired());
    msg.set_recursion_available(true);
    msg.set_response_code(rcode);
    msg.add_queries(request.queries().to_vec());
    msg
}

pub fn mx_record(owner: &str, ttl: u32, preference: u16, exchange: &str) -> Record {
    Record::from_rdata(
        Name::from_str(owner).unwrap(),
        ttl,
        RData::MX(MX::new(preference, Name::from_str(exchange).unwrap())),
    )
}

pub fn a_record(owner: &str, ttl: u32, octets: [u8; 4]) -> Record {
    Record::from_rdata(
        Name::from_str(owner).unwrap(),
        ttl,
        RData::A(A::new(octets[0], octets[1], octets[2], octets[3])),
    )
}

pub fn soa_record(owner: &str, ttl: u32) -> Record {
    Record::from_rdata(
        Name::from_str(owner).unwrap(),
        ttl,
        RData::SOA(SOA::new(
            Name::from_str("sns.dns.icann.org.").unwrap(),
            Name::from_str("noc.dns.icann.org.").unwrap(),
            2016082540,
            7200,
            3600,
            1209600,
            3600,
        )),
    )
}

pub fn ns_record(owner: &str, ttl: u32, target: &str) -> Record {
    Record::from_rdata(
        Name::from_str(owner).unwrap(),
        ttl,
        RData::NS(hickory_proto::rr::rdata::NS(
            Name::from_str(target).unwrap(),
        )),
    )
}

/// A record carrying an arbitrary RR type code with opaque rdata; stands in
/// for DNSSEC records without needing a DNSSEC-enabled rdata build.
pub fn opaque_record(owner: &str, ttl: u32, code: u16) -> Record {
    Record::from_rdata(
        Name::from_str(owner).unwrap(),
        ttl,
        RData::Unknown {
            code: RecordType::Unknown(code),
            rdata: NULL::with(vec![0xAB; 18]),
        },
    )
}

pub fn has_type_code(records: &[Record], code: u16) -> bool {
    records
        .iter()
        .any(|r| u16::from(r.record_type()) == code)
}

// ============================================================================
// Response writer stub
// ============================================================================

pub struct StubWriter {
    pub written: Vec<Message>,
}

impl StubWriter {
    pub fn new() -> Self {
        Self {
            written: Vec::new(),
        }
    }

    pub fn last(&self) -> &Message {
        self.written.last().expect("no response written")
    }
}

#[async_trait]
impl ResponseWriter for StubWriter {
    async fn write_msg(&mut self, response: Message) -> Result<(), DomainError> {
        self.written.push(response);
        Ok(())
    }

    fn remote_addr(&self) -> SocketAddr {
        "127.0.0.1:53531".parse().unwrap()
    }

    fn local_addr(&self) -> SocketAddr {
        "127.0.0.1:53".parse().unwrap()
    }
}

// ============================================================================
// Next-handler stubs
// ============================================================================

/// Chain tail answering every request from a canned response template.
pub struct UpstreamHandler {
    template: Mutex<Message>,
    calls: AtomicUsize,
}

impl UpstreamHandler {
    pub fn new(template: Message) -> Self {
        Self {
            template: Mutex::new(template),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_template(&self, template: Message) {
        *self.template.lock().unwrap() = template;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::Relaxed)
    }
}

#[async_trait]
impl DnsHandler for UpstreamHandler {
    async fn serve_dns(
        &self,
        request: &Message,
        writer: &mut dyn ResponseWriter,
    ) -> Result<ResponseCode, DomainError> {
        self.calls.fetch_add(1, AtomicOrdering::Relaxed);
        let mut response = self.template.lock().unwrap().clone();
        response.set_id(request.id());
        let code = response.response_code();
        writer.write_msg(response).await?;
        Ok(code)
    }
}

/// Chain tail that always fails, for error propagation tests.
pub struct FailingHandler;

#[async_trait]
impl DnsHandler for FailingHandler {
    async fn serve_dns(
        &self,
        _request: &Message,
        _writer: &mut dyn ResponseWriter,
    ) -> Result<ResponseCode, DomainError> {
        Err(DomainError::Downstream("upstream unreachable".to_string()))
    }
}

// ============================================================================
// Failing bus
// ============================================================================

pub struct FailingBus;

#[async_trait]
impl MessageBus for FailingBus {
    async fn publish(&self, _payload: Vec<u8>) -> Result<(), DomainError> {
        Err(DomainError::BrokerPublish("connection refused".to_string()))
    }

    async fn subscribe(
        &self,
    ) -> Result<Box<dyn dcache_application::BusSubscription>, DomainError> {
        Err(DomainError::BrokerConnect("connection refused".to_string()))
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        Err(DomainError::BrokerConnect("connection refused".to_string()))
    }
}

// ============================================================================
// Misc
// ============================================================================

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
