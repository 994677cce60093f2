// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![no_main]
use libfuzzer_sys::fuzz_target;
use sip_core::{EncodeFlags, HeaderCodec, MsgHome};
use sip_extra::{X_FS_CORE_UUID, X_FS_CORE_UUID_CLASS};

fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 {
        return;
    }

    let mut home = MsgHome::new();
    let mut header = home.new_header(&X_FS_CORE_UUID_CLASS);
    let mut buf = data.to_vec();
    let Ok(consumed) = X_FS_CORE_UUID.decode(&mut home, &mut header, &mut buf) else {
        assert!(header.is_empty());
        return;
    };
    assert_eq!(consumed, data.len());

    // Dry-run sizing must match the real write exactly.
    let needed = X_FS_CORE_UUID
        .encode(None, &header, EncodeFlags::empty())
        .expect("dry run");
    let mut out = vec![0u8; needed];
    let written = X_FS_CORE_UUID
        .encode(Some(&mut out), &header, EncodeFlags::empty())
        .expect("encode");
    assert_eq!(written, needed);
    assert!(!out.starts_with(b" ") && !out.ends_with(b" "));
    assert!(!out.windows(2).any(|w| w == b"  "));
});
