mod helpers;

use dcache_domain::ResponseClass;
use dcache_infrastructure::{classify, message_key};
use helpers::{
    mx_record, ns_record, query, query_with_do, response, soa_record,
};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::RecordType;

#[test]
fn noerror_with_answers_is_a_positive_answer() {
    let request = query("bootjp.me.", RecordType::MX);
    let mut msg = response(&request, ResponseCode::NoError);
    msg.insert_answers(vec![mx_record("bootjp.me.", 3600, 1, "aspmx.l.google.com.")]);

    let (class, dnssec_ok) = classify(&msg);
    assert_eq!(class, ResponseClass::NoError);
    assert!(!dnssec_ok);
}

#[test]
fn noerror_without_answers_is_nodata() {
    let request = query("bootjp.me.", RecordType::AAAA);
    let mut msg = response(&request, ResponseCode::NoError);
    msg.insert_name_servers(vec![soa_record("bootjp.me.", 3600)]);

    assert_eq!(classify(&msg).0, ResponseClass::NoData);
}

#[test]
fn ns_authority_without_soa_is_a_delegation() {
    let request = query("www.example.org.", RecordType::A);
    let mut msg = response(&request, ResponseCode::NoError);
    msg.insert_name_servers(vec![
        ns_record("example.org.", 3600, "a.iana-servers.net."),
        ns_record("example.org.", 3600, "b.iana-servers.net."),
    ]);

    assert_eq!(classify(&msg).0, ResponseClass::Delegation);
}

#[test]
fn nxdomain_is_a_name_error() {
    let request = query("example.org.", RecordType::A);
    let mut msg = response(&request, ResponseCode::NXDomain);
    msg.insert_name_servers(vec![soa_record("example.org.", 3600)]);

    assert_eq!(classify(&msg).0, ResponseClass::NameError);
}

#[test]
fn servfail_is_a_server_failure() {
    let request = query("example.org.", RecordType::A);
    let msg = response(&request, ResponseCode::ServFail);
    assert_eq!(classify(&msg).0, ResponseClass::ServerFailure);
}

#[test]
fn other_rcodes_are_other_errors() {
    let request = query("example.org.", RecordType::A);
    for rcode in [
        ResponseCode::NotImp,
        ResponseCode::Refused,
        ResponseCode::FormErr,
    ] {
        let msg = response(&request, rcode);
        assert_eq!(classify(&msg).0, ResponseClass::OtherError, "{rcode:?}");
    }
}

#[test]
fn zone_transfers_and_questionless_messages_are_meta() {
    let axfr = query("example.org.", RecordType::AXFR);
    assert_eq!(classify(&axfr).0, ResponseClass::Meta);

    let mut empty = Message::new();
    empty.set_id(1);
    empty.set_message_type(MessageType::Query);
    empty.set_op_code(OpCode::Query);
    assert_eq!(classify(&empty).0, ResponseClass::Meta);

    let mut notify = Message::new();
    notify.set_id(1);
    notify.set_message_type(MessageType::Query);
    notify.set_op_code(OpCode::Notify);
    assert_eq!(classify(&notify).0, ResponseClass::Meta);
}

#[test]
fn update_opcode_is_update() {
    let mut msg = Message::new();
    msg.set_id(1);
    msg.set_message_type(MessageType::Query);
    msg.set_op_code(OpCode::Update);
    assert_eq!(classify(&msg).0, ResponseClass::Update);
}

#[test]
fn do_bit_is_read_from_the_opt_record() {
    let plain = query("bootjp.me.", RecordType::MX);
    assert!(!classify(&plain).1);

    let with_do = query_with_do("bootjp.me.", RecordType::MX);
    assert!(classify(&with_do).1);
}

#[test]
fn requests_and_responses_for_one_question_share_a_key() {
    let request = query("bootjp.me.", RecordType::MX);
    let mut resp = response(&request, ResponseCode::NoError);
    resp.insert_answers(vec![mx_record("bootjp.me.", 3600, 1, "aspmx.l.google.com.")]);

    assert_eq!(message_key(&request), message_key(&resp));
    assert!(message_key(&request).is_some());
}

#[test]
fn truncated_and_meta_messages_are_not_keyable() {
    let mut truncated = query("bootjp.me.", RecordType::MX);
    truncated.set_truncated(true);
    assert!(message_key(&truncated).is_none());

    let axfr = query("example.org.", RecordType::AXFR);
    assert!(message_key(&axfr).is_none());

    let request = query("example.org.", RecordType::A);
    let notimp = response(&request, ResponseCode::NotImp);
    assert!(message_key(&notimp).is_none());
}

#[test]
fn keys_differ_by_name_and_type() {
    let a = message_key(&query("bootjp.me.", RecordType::A)).unwrap();
    let mx = message_key(&query("bootjp.me.", RecordType::MX)).unwrap();
    let other = message_key(&query("example.com.", RecordType::A)).unwrap();

    assert_ne!(a, mx);
    assert_ne!(a, other);
}
