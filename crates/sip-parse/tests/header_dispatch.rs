// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use proptest::prelude::*;
use sip_core::{EncodeFlags, Header, MsgHome};
use sip_extra::{X_FS_CORE_UUID, X_FS_CORE_UUID_CLASS};
use sip_parse::{
    decode_header, decode_headers, default_registry, encode_header_line, encode_headers,
    parse_header_block,
};

fn sample_block() -> &'static str {
    "Via: SIP/2.0/UDP host;branch=z9hG4bK776\r\n\
From: <sip:alice@example.com>;tag=123\r\n\
X-FS-Core-UUID: 3f2a9c1e-8b4d-4e7a-9f10-2c6d5e8b7a41\r\n\
Call-ID: abc123\r\n\
x-fs-core-uuid: 00000000-0000-0000-0000-000000000000\r\n\
Content-Length: 0\r\n\r\n"
}

#[test]
fn decodes_block_and_keeps_first_uuid_authoritative() {
    let headers = parse_header_block(sample_block()).expect("parse");
    let mut home = MsgHome::new();
    let report = decode_headers(default_registry(), &mut home, &headers);

    assert_eq!(report.decoded, 2);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.unknown, 4);
    assert!(report.discarded.is_empty());

    let uuid = home.first(&X_FS_CORE_UUID_CLASS).expect("uuid");
    assert_eq!(uuid.value(), "3f2a9c1e-8b4d-4e7a-9f10-2c6d5e8b7a41");
    assert!(uuid.next().is_none());
    assert_eq!(home.duplicates().count(), 1);

    let span = uuid.common().span().cloned().expect("span");
    assert_eq!(&sample_block()[span], uuid.value());
}

#[test]
fn folded_value_round_trips_to_single_line() {
    let block = "X-FS-Core-UUID: core-a\r\n\tcore-b\r\n\r\n";
    let headers = parse_header_block(block).expect("parse");
    let mut home = MsgHome::new();
    decode_headers(default_registry(), &mut home, &headers);

    let wire = encode_headers(default_registry(), &home, EncodeFlags::empty());
    assert_eq!(wire.as_ref(), b"X-FS-Core-UUID: core-a core-b\r\n");
}

#[test]
fn malformed_uuid_header_is_discarded() {
    let block = "X-FS-Core-UUID: \"quoted\"\r\n\r\n";
    let headers = parse_header_block(block).expect("parse");
    let mut home = MsgHome::new();
    let report = decode_headers(default_registry(), &mut home, &headers);
    assert_eq!(report.decoded, 0);
    assert_eq!(report.discarded.len(), 1);
    assert!(home.is_empty());
    assert!(encode_headers(default_registry(), &home, EncodeFlags::empty()).is_empty());
}

proptest! {
    /// Dry-run sizing of a header line equals what a real encode writes.
    #[test]
    fn line_dry_run_matches_write(
        tokens in prop::collection::vec("[a-f0-9-]{1,36}", 1..4),
        compact in any::<bool>(),
        no_crlf in any::<bool>(),
    ) {
        let mut home = MsgHome::new();
        let field = Header::new("X-FS-Core-UUID", tokens.join("  "));
        let id = decode_header(default_registry(), &mut home, &field).expect("decode");
        let header = home.get(id).unwrap();

        let mut flags = EncodeFlags::empty();
        flags.set(EncodeFlags::COMPACT, compact);
        flags.set(EncodeFlags::NO_CRLF, no_crlf);

        let needed = encode_header_line(&X_FS_CORE_UUID, header, flags, None).unwrap();
        let mut buf = vec![0u8; needed];
        let written = encode_header_line(&X_FS_CORE_UUID, header, flags, Some(&mut buf)).unwrap();
        prop_assert_eq!(written, needed);

        let mut expected = format!("X-FS-Core-UUID: {}", tokens.join(" "));
        if !no_crlf {
            expected.push_str("\r\n");
        }
        prop_assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }
}
