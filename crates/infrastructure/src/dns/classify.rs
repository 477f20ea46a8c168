use dcache_domain::{CacheKey, ResponseClass};
use hickory_proto::op::{Message, OpCode, ResponseCode};
use hickory_proto::rr::RecordType;

/// Classifies a DNS message and reads the DO bit from its EDNS0 OPT record.
///
/// Total: every message maps to exactly one tag.
pub fn classify(msg: &Message) -> (ResponseClass, bool) {
    let dnssec_ok = msg
        .extensions()
        .as_ref()
        .map_or(false, |edns| edns.flags().dnssec_ok);
    (classify_message(msg), dnssec_ok)
}

fn classify_message(msg: &Message) -> ResponseClass {
    match msg.op_code() {
        OpCode::Update => return ResponseClass::Update,
        OpCode::Notify | OpCode::Status => return ResponseClass::Meta,
        _ => {}
    }

    let Some(query) = msg.queries().first() else {
        return ResponseClass::Meta;
    };
    if matches!(query.query_type(), RecordType::AXFR | RecordType::IXFR) {
        return ResponseClass::Meta;
    }

    match msg.response_code() {
        ResponseCode::NoError => {
            if !msg.answers().is_empty() {
                return ResponseClass::NoError;
            }

            // Referral: NS records in the authority section without an SOA.
            let mut soa = false;
            let mut ns = 0;
            for record in msg.name_servers() {
                match record.record_type() {
                    RecordType::SOA => soa = true,
                    RecordType::NS => ns += 1,
                    _ => {}
                }
            }
            if !soa && ns > 0 {
                ResponseClass::Delegation
            } else {
                ResponseClass::NoData
            }
        }
        ResponseCode::NXDomain => ResponseClass::NameError,
        ResponseCode::ServFail => ResponseClass::ServerFailure,
        _ => ResponseClass::OtherError,
    }
}

/// Computes the cache key for a message, if the message may participate in
/// caching at all: truncated messages and the Meta / Update / OtherError
/// classes are not keyable.
///
/// The key covers the question name exactly as transmitted plus the query
/// type; requests and responses for the same question therefore agree.
pub fn message_key(msg: &Message) -> Option<CacheKey> {
    if msg.truncated() {
        return None;
    }
    let (class, _) = classify(msg);
    if !class.is_keyable() {
        return None;
    }
    let query = msg.queries().first()?;
    Some(CacheKey::new(
        &query.name().to_utf8(),
        u16::from(query.query_type()),
    ))
}
