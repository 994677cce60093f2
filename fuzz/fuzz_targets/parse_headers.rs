// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![no_main]
use libfuzzer_sys::fuzz_target;
use sip_core::{EncodeFlags, MsgHome};
use sip_parse::{decode_headers, default_registry, encode_headers, parse_header_block};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let Ok(block) = std::str::from_utf8(data) else {
        return;
    };
    let Some(headers) = parse_header_block(block) else {
        return;
    };

    let mut home = MsgHome::new();
    decode_headers(default_registry(), &mut home, &headers);
    let wire = encode_headers(default_registry(), &home, EncodeFlags::empty());

    // Encoded output must decode back to the same headers.
    let text = std::str::from_utf8(&wire).expect("encoded headers are ASCII");
    let reparsed = parse_header_block(text).expect("encoded headers reparse");
    let mut again = MsgHome::new();
    let report = decode_headers(default_registry(), &mut again, &reparsed);
    assert!(report.discarded.is_empty());
    assert_eq!(
        encode_headers(default_registry(), &again, EncodeFlags::empty()),
        wire
    );
});
