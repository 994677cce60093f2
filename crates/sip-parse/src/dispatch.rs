// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use sip_core::{
    write_checked, DecodeError, EncodeError, EncodeFlags, GenericHeader, Header, HeaderCodec,
    HeaderId, HeaderRegistry, Headers, MsgHome,
};
use sip_observe::parse_metrics;
use smol_str::SmolStr;

/// Why a single header field was not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No codec is registered under the field name.
    Unknown(SmolStr),
    /// The codec rejected the value.
    Decode(DecodeError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(name) => write!(f, "no codec registered for {}", name),
            Self::Decode(err) => write!(f, "decode failed: {}", err),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unknown(_) => None,
            Self::Decode(err) => Some(err),
        }
    }
}

impl From<DecodeError> for DispatchError {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

/// Outcome of decoding a whole header list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Fields stored in the message home, duplicates included.
    pub decoded: usize,
    /// Stored fields that repeat a single header.
    pub duplicates: usize,
    /// Fields with no registered codec.
    pub unknown: usize,
    /// Fields whose codec rejected the value, with the reason.
    pub discarded: Vec<(SmolStr, DecodeError)>,
}

impl DecodeReport {
    pub fn is_clean(&self) -> bool {
        self.discarded.is_empty() && self.duplicates == 0
    }
}

fn reason_label(err: &DecodeError) -> &'static str {
    match err {
        DecodeError::Empty => "empty",
        DecodeError::InvalidCharacter { .. } => "invalid-character",
        DecodeError::ArenaExhausted { .. } => "arena-exhausted",
        DecodeError::TooManyHeaders { .. } => "too-many-headers",
    }
}

/// Decodes one raw field through the registry and stores it in `home`.
///
/// On failure nothing is stored and no arena space is charged.
pub fn decode_header(
    registry: &HeaderRegistry,
    home: &mut MsgHome,
    field: &Header,
) -> Result<HeaderId, DispatchError> {
    let codec = registry
        .lookup(&field.name)
        .ok_or_else(|| DispatchError::Unknown(field.name.clone()))?;
    home.reserve_header()?;

    let mut header = home.new_header(codec.class());
    if let Some(span) = &field.span {
        header.set_span(span.clone());
    }
    let mut buf = field.value.as_bytes().to_vec();
    codec.decode(home, &mut header, &mut buf)?;
    Ok(home.insert(header)?)
}

/// Decodes every registered field of `headers` into `home`.
///
/// Unknown fields are skipped and rejected values are discarded; both are
/// counted in the returned report. This never fails as a whole.
pub fn decode_headers(
    registry: &HeaderRegistry,
    home: &mut MsgHome,
    headers: &Headers,
) -> DecodeReport {
    let metrics = parse_metrics();
    let mut report = DecodeReport::default();

    for field in headers {
        match decode_header(registry, home, field) {
            Ok(id) => {
                report.decoded += 1;
                metrics.on_decoded(&field.name);
                if home.is_duplicate(id) {
                    report.duplicates += 1;
                    metrics.on_duplicate(&field.name);
                    tracing::debug!(header = %field.name, "duplicate single header kept aside");
                }
            }
            Err(DispatchError::Unknown(name)) => {
                report.unknown += 1;
                metrics.on_unknown(&name);
                tracing::trace!(header = %name, "skipping unregistered header");
            }
            Err(DispatchError::Decode(err)) => {
                metrics.on_decode_failed(&field.name, reason_label(&err));
                tracing::debug!(header = %field.name, error = %err, "discarding malformed header");
                report.discarded.push((field.name.clone(), err));
            }
        }
    }

    report
}

/// Encodes a full header line, `Name: value` followed by CRLF unless
/// [`EncodeFlags::NO_CRLF`] is set.
///
/// Follows the codec rules: `None` sizes the line, and a short buffer fails
/// without being written.
pub fn encode_header_line(
    codec: &dyn HeaderCodec,
    header: &GenericHeader,
    flags: EncodeFlags,
    buf: Option<&mut [u8]>,
) -> Result<usize, EncodeError> {
    let name = header.class().wire_name(flags).as_bytes();
    let value_len = codec.encode(None, header, flags)?;
    let crlf: &[u8] = if flags.contains(EncodeFlags::NO_CRLF) {
        b""
    } else {
        b"\r\n"
    };
    let needed = name.len() + 2 + value_len + crlf.len();

    let Some(buf) = buf else {
        return Ok(needed);
    };
    if buf.len() < needed {
        return Err(EncodeError::BufferTooSmall {
            needed,
            capacity: buf.len(),
        });
    }

    let mut at = write_checked(Some(&mut buf[..]), name)?;
    at += write_checked(Some(&mut buf[at..]), b": ")?;
    at += codec.encode(Some(&mut buf[at..at + value_len]), header, flags)?;
    at += write_checked(Some(&mut buf[at..]), crlf)?;
    Ok(at)
}

/// Serialises every linked header in `home` whose class is registered.
///
/// Classes are emitted in the order they first appeared; within a class the
/// chain order is kept. Duplicates of single headers are not emitted.
pub fn encode_headers(registry: &HeaderRegistry, home: &MsgHome, flags: EncodeFlags) -> Bytes {
    let metrics = parse_metrics();
    let mut out = BytesMut::new();

    for head in home.heads() {
        let class = head.class();
        let Some(codec) = registry.lookup_class(class) else {
            tracing::trace!(header = class.name(), "no codec registered, not encoding");
            continue;
        };
        for header in home.iter_class(class) {
            // Sizing first keeps the output free of partial lines.
            let Ok(needed) = encode_header_line(codec, header, flags, None) else {
                continue;
            };
            let start = out.len();
            out.put_bytes(0, needed);
            match encode_header_line(codec, header, flags, Some(&mut out[start..])) {
                Ok(written) => {
                    out.truncate(start + written);
                    metrics.on_encoded(class.name(), written);
                }
                Err(err) => {
                    out.truncate(start);
                    tracing::debug!(header = class.name(), error = %err, "failed to encode header");
                }
            }
        }
    }

    out.freeze()
}
