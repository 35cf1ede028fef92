mod common;
use common::*;

use smc_llc::hexdump::hex_dump;
use smc_llc::llc::*;
use smc_llc::Render;

#[test]
fn llc_fixture_dispatch() {
    let fixtures = [
        ("confirm_link.dat", MessageType::CONFIRM_LINK),
        ("add_link.dat", MessageType::ADD_LINK),
        ("add_link_cont.dat", MessageType::ADD_LINK_CONT),
        ("delete_link.dat", MessageType::DELETE_LINK),
        ("confirm_rkey.dat", MessageType::CONFIRM_RKEY),
        ("test_link.dat", MessageType::TEST_LINK),
        ("confirm_rkey_cont.dat", MessageType::CONFIRM_RKEY_CONT),
        ("delete_rkey.dat", MessageType::DELETE_RKEY),
        ("cdc.dat", MessageType::CDC),
        ("other.dat", MessageType::OTHER),
    ];

    for (fname, typ) in fixtures {
        let payload = file_to_packet(fname);
        let msg = decode_message(&payload);
        assert_eq!(msg.msg_type(), typ, "{}", fname);
        assert_eq!(msg.raw(), &payload[..]);
        assert_eq!(msg.hex(), hex_dump(&payload));

        let compact = msg.to_compact();
        let verbose = msg.to_verbose();
        assert!(compact.ends_with('\n') && compact.matches('\n').count() == 1);
        assert!(verbose.ends_with('\n') && verbose.matches('\n').count() == 1);
        assert!(verbose.len() >= compact.len());
        if typ != MessageType::OTHER {
            assert!(verbose.contains("Reserved: "), "{}", fname);
            assert!(!compact.contains("Reserved: "), "{}", fname);
        }
    }
}

#[test]
fn confirm_link_parsing_test() {
    let payload = file_to_packet("confirm_link.dat");
    let msg = match decode_message(&payload) {
        Message::ConfirmLink(m) => m,
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(msg.reply(), false);
    assert_eq!(msg.sender_mac().to_string(), "98:03:9b:ab:cd:ef");
    assert_eq!(msg.sender_gid().to_string(), "fe80::9a03:9bff:feab:cdef");
    assert_eq!(msg.sender_qp(), 263);
    assert_eq!(msg.link(), 0);
    assert_eq!(msg.sender_link_user_id(), 65536);
    assert_eq!(msg.max_links(), 2);
    assert_eq!(
        msg.to_verbose(),
        "LLC Confirm Link: Type: 1, Length: 44, Reserved: 0x0, \
         Reply: false, Reserved: 0x3, \
         Sender MAC: 98:03:9b:ab:cd:ef, \
         Sender GID: fe80::9a03:9bff:feab:cdef, \
         Sender QP: 263, Link: 0, Sender Link UserID: 65536, \
         Max Links: 2, Reserved: 0x000000000000000000\n"
    );
}

#[test]
fn add_link_parsing_test() {
    let payload = file_to_packet("add_link.dat");
    let msg = match decode_message(&payload) {
        Message::AddLink(m) => m,
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(msg.reason(), AddLinkReason::from(0));
    assert_eq!(msg.mtu(), QpMtu::from(0));
    assert_eq!(msg.sender_gid().to_string(), "fe80::9a03:9bff:feab:cdef");
    assert_eq!(
        msg.to_string(),
        "LLC Add Link: Type: 2, Length: 44, \
         Reason Code: 0 (unknown), Reply: false, Rejection: false, \
         Sender MAC: 98:03:9b:ab:cd:ef, \
         Sender GID: fe80::9a03:9bff:feab:cdef, \
         Sender QP: 0, Link: 0, MTU: 0 (reserved), Initial PSN: 0\n"
    );
}

#[test]
fn add_link_cont_shows_both_pairs() {
    let payload = file_to_packet("add_link_cont.dat");
    let msg = match decode_message(&payload) {
        Message::AddLinkCont(m) => m,
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(msg.reply(), true);
    assert_eq!(msg.link(), 1);
    assert_eq!(msg.num_rtokens(), 1);
    let compact = msg.to_compact();
    assert!(compact.contains(
        "RKey Pair 1: [Reference RKey: 1, New RKey: 2, New Virtual Address: 0x3]"
    ));
    assert!(compact.ends_with(
        "RKey Pair 2: [Reference RKey: 4, New RKey: 5, New Virtual Address: 0x6]\n"
    ));
}

#[test]
fn confirm_rkey_cont_parsing_test() {
    let payload = file_to_packet("confirm_rkey_cont.dat");
    let msg = match decode_message(&payload) {
        Message::ConfirmRkeyCont(m) => m,
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(msg.reply(), true);
    assert_eq!(msg.reject(), true);
    assert_eq!(msg.num_tokens(), 1);
    assert!(msg.to_compact().ends_with(
        "Other Link RMB 3: [Link: 7, RKey: 8, Virtual Address: 0x9]\n"
    ));
}

#[test]
fn delete_rkey_parsing_test() {
    let payload = file_to_packet("delete_rkey.dat");
    let msg = match decode_message(&payload) {
        Message::DeleteRkey(m) => m,
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(msg.count(), 1);
    assert_eq!(msg.error_mask(), 0);
    assert_eq!(msg.rkeys(), &[5469, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn cdc_parsing_test() {
    let payload = file_to_packet("cdc.dat");
    let msg = match decode_message(&payload) {
        Message::Cdc(m) => m,
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(msg.seq_num(), 1);
    assert_eq!(msg.alert_token(), 3);
    assert_eq!(msg.producer(), (0, 13));
    assert_eq!(msg.consumer(), (0, 0));
    assert_eq!(msg.writer_blocked(), false);
    assert_eq!(msg.abnormal_close(), false);
    assert!(msg.to_compact().starts_with("CDC: Type: 254, Length 44, Sequence Number: 1, "));
}

#[test]
fn wrong_length_is_other() {
    let mut payload = file_to_packet("confirm_link.dat");
    payload.push(0);
    let msg = decode_message(&payload);
    assert_eq!(msg.msg_type(), MessageType::OTHER);
    assert_eq!(msg.to_compact(), "Other Payload\n");
    assert_eq!(msg.to_verbose(), "Other Payload\n");
    assert_eq!(msg.raw().len(), 45);

    let payload = file_to_packet("other.dat");
    let msg = decode_message(&payload);
    assert_eq!(
        msg.hex(),
        "00000000  0a 00 00 01                                       |....|\n"
    );
}

#[test]
fn unknown_type_is_other() {
    let mut payload = file_to_packet("test_link.dat");
    payload[0] = 0x05;
    assert_eq!(decode_message(&payload).msg_type(), MessageType::OTHER);
    payload[0] = 0x0a;
    assert_eq!(decode_message(&payload).msg_type(), MessageType::OTHER);
}
