use hickory_proto::op::Message;
use hickory_proto::rr::Record;

// RR type codes, matched numerically so records hickory parses as
// unknown-rdata filter the same way as fully-typed ones.
const TYPE_SIG: u16 = 24;
const TYPE_OPT: u16 = 41;
const TYPE_DS: u16 = 43;
const TYPE_RRSIG: u16 = 46;
const TYPE_NSEC: u16 = 47;
const TYPE_NSEC3: u16 = 50;

fn keep_record(record: &Record, dnssec_ok: bool) -> bool {
    match u16::from(record.record_type()) {
        TYPE_OPT => false,
        TYPE_SIG | TYPE_DS | TYPE_RRSIG | TYPE_NSEC | TYPE_NSEC3 => dnssec_ok,
        _ => true,
    }
}

/// Filters the Answer, Authority and Additional sections in place.
///
/// OPT pseudo-records are dropped unconditionally (including the parsed
/// EDNS view); DNSSEC records survive only when the client set the DO bit.
pub fn filter_records(msg: &mut Message, dnssec_ok: bool) {
    let answers: Vec<Record> = msg
        .take_answers()
        .into_iter()
        .filter(|r| keep_record(r, dnssec_ok))
        .collect();
    msg.insert_answers(answers);

    let authorities: Vec<Record> = msg
        .take_name_servers()
        .into_iter()
        .filter(|r| keep_record(r, dnssec_ok))
        .collect();
    msg.insert_name_servers(authorities);

    let additionals: Vec<Record> = msg
        .take_additionals()
        .into_iter()
        .filter(|r| keep_record(r, dnssec_ok))
        .collect();
    msg.insert_additionals(additionals);

    msg.extensions_mut().take();
}

/// Removes the EDNS0 OPT pseudo-record before a response is stored.
pub fn strip_opt(msg: &mut Message) {
    msg.extensions_mut().take();

    let additionals: Vec<Record> = msg
        .take_additionals()
        .into_iter()
        .filter(|r| u16::from(r.record_type()) != TYPE_OPT)
        .collect();
    msg.insert_additionals(additionals);
}
