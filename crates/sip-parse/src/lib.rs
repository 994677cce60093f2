// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Header dispatch for the Siphon SIP stack.
//!
//! Splits a raw header block into fields, hands each registered field to its
//! codec, and serialises decoded headers back to wire form.
//!
//! # Example
//! ```
//! use sip_core::{EncodeFlags, MsgHome};
//! use sip_parse::{decode_headers, default_registry, encode_headers, parse_header_block};
//!
//! let block = "Call-ID: abc@host\r\nX-FS-Core-UUID:  3f2a9c1e-8b4d\r\n\r\n";
//! let headers = parse_header_block(block).unwrap();
//!
//! let mut home = MsgHome::new();
//! let report = decode_headers(default_registry(), &mut home, &headers);
//! assert_eq!(report.decoded, 1);
//!
//! let wire = encode_headers(default_registry(), &home, EncodeFlags::empty());
//! assert_eq!(wire.as_ref(), b"X-FS-Core-UUID: 3f2a9c1e-8b4d\r\n");
//! ```

use once_cell::sync::Lazy;
use sip_core::{is_token, Header, HeaderRegistry, Headers};
use smol_str::SmolStr;

mod dispatch;

pub use dispatch::{
    decode_header, decode_headers, encode_header_line, encode_headers, DecodeReport,
    DispatchError,
};

pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;

static DEFAULT_REGISTRY: Lazy<HeaderRegistry> = Lazy::new(|| {
    let mut registry = HeaderRegistry::new();
    if let Err(err) = sip_extra::register_extra_headers(&mut registry) {
        tracing::warn!(error = %err, "failed to register extension headers");
    }
    registry
});

/// Process-wide registry holding every header class shipped with the stack.
pub fn default_registry() -> &'static HeaderRegistry {
    &DEFAULT_REGISTRY
}

/// Splits a CRLF separated header block into raw fields.
pub fn parse_header_block(block: &str) -> Option<Headers> {
    parse_header_block_with_limit(block, DEFAULT_MAX_MESSAGE_SIZE)
}

struct PendingField {
    name: SmolStr,
    value: String,
    start: usize,
    end: usize,
}

impl PendingField {
    fn finish(self) -> Header {
        Header::new(self.name, self.value).with_span(self.start..self.end)
    }
}

/// SIP linear white space is SP and HTAB only.
fn is_lws_char(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn trim_lws(s: &str) -> &str {
    s.trim_matches(is_lws_char)
}

/// Splits a header block with an explicit size check.
///
/// Folded continuation lines (RFC 3261 §7.3.1) are joined with a single SP.
/// Each field records the span of its value in `block`. Parsing stops at the
/// first empty line. Returns `None` for a line that is neither a field nor a
/// continuation, or for an invalid field name.
pub fn parse_header_block_with_limit(block: &str, max_size: usize) -> Option<Headers> {
    if block.len() > max_size {
        return None;
    }

    let mut headers = Headers::new();
    let mut current: Option<PendingField> = None;
    let mut offset = 0;

    for line in block.split("\r\n") {
        let line_start = offset;
        offset += line.len() + 2;

        if line.is_empty() {
            break;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            let value = trim_lws(line);
            if value.is_empty() {
                continue;
            }
            let pending = current.as_mut()?;
            if !pending.value.is_empty() {
                pending.value.push(' ');
            }
            pending.value.push_str(value);
            pending.end = line_start + line.trim_end_matches(is_lws_char).len();
            continue;
        }

        let (name, value) = line.split_once(':')?;
        let name = trim_lws(name);
        if !is_token(name) {
            return None;
        }
        if let Some(prev) = current.take() {
            headers.push_header(prev.finish());
        }

        let value_start = line_start + line.len() - value.trim_start_matches(is_lws_char).len();
        let value = trim_lws(value);
        current = Some(PendingField {
            name: SmolStr::new(name),
            value: value.to_owned(),
            start: value_start,
            end: value_start + value.len(),
        });
    }

    if let Some(last) = current.take() {
        headers.push_header(last.finish());
    }

    Some(headers)
}
