// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generic token-list headers.
//!
//! Many extension headers carry nothing more than a run of tokens:
//!
//! ```text
//! generic-value = token *(LWS token)
//! ```
//!
//! They share one storage shape, [`GenericHeader`], and one pair of routines,
//! [`decode_generic`] and [`encode_generic`]. A concrete header either uses
//! [`GenericCodec`] directly or delegates to these routines from its own
//! [`HeaderCodec`] implementation.
//!
//! Decoded values are canonical: tokens are joined by a single SP, with no
//! leading or trailing white space, so encoding a decoded header reproduces
//! the input up to white space normalisation.

use std::ops::Range;

use bytes::Bytes;

use crate::{
    class::HeaderClass,
    codec::{write_checked, DecodeError, EncodeError, EncodeFlags, HeaderCodec},
    home::{HeaderId, MsgHome},
    token::{first_invalid_offset, is_token_byte, is_wsp},
};

/// Bookkeeping shared by every decoded header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCommon {
    class: &'static HeaderClass,
    span: Option<Range<usize>>,
}

impl HeaderCommon {
    pub fn class(&self) -> &'static HeaderClass {
        self.class
    }

    /// Position of the value region inside the original header block, when
    /// the host recorded one.
    pub fn span(&self) -> Option<&Range<usize>> {
        self.span.as_ref()
    }
}

/// A decoded generic header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericHeader {
    common: HeaderCommon,
    next: Option<HeaderId>,
    value: Bytes,
}

impl GenericHeader {
    /// Creates an empty header slot of the given class.
    pub fn new(class: &'static HeaderClass) -> Self {
        Self {
            common: HeaderCommon { class, span: None },
            next: None,
            value: Bytes::new(),
        }
    }

    pub fn common(&self) -> &HeaderCommon {
        &self.common
    }

    pub fn class(&self) -> &'static HeaderClass {
        self.common.class
    }

    pub fn is_class(&self, class: &HeaderClass) -> bool {
        self.common.class.is(class)
    }

    /// Records where the value region sits in the original header block.
    pub fn set_span(&mut self, span: Range<usize>) {
        self.common.span = Some(span);
    }

    /// Next header of the same class in the owning message home.
    pub fn next(&self) -> Option<HeaderId> {
        self.next
    }

    pub(crate) fn set_next(&mut self, next: Option<HeaderId>) {
        self.next = next;
    }

    /// The canonical value string.
    pub fn value(&self) -> &str {
        // Only token bytes and SP are ever stored.
        std::str::from_utf8(&self.value).unwrap_or_default()
    }

    pub fn value_bytes(&self) -> &Bytes {
        &self.value
    }

    /// Individual tokens of the value.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.value().split(' ').filter(|t| !t.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Decodes a generic token-list value region into `header`.
///
/// The region is canonicalised in place, then copied into `home`. On success
/// the whole region, including an optional trailing CRLF, is consumed and its
/// length returned. On failure `header` is left unchanged.
///
/// # Examples
///
/// ```
/// use sip_core::{decode_generic, GenericHeader, HeaderClass, MsgHome, Multiplicity};
///
/// static X_TAGS: HeaderClass = HeaderClass::new("X-Tags", "", Multiplicity::Append);
///
/// let mut home = MsgHome::new();
/// let mut header = GenericHeader::new(&X_TAGS);
/// let mut region = *b"red \t green";
///
/// let consumed = decode_generic(&mut home, &mut header, &mut region).unwrap();
/// assert_eq!(consumed, 11);
/// assert_eq!(header.value(), "red green");
/// ```
pub fn decode_generic(
    home: &mut MsgHome,
    header: &mut GenericHeader,
    buf: &mut [u8],
) -> Result<usize, DecodeError> {
    if buf
        .iter()
        .all(|&b| is_wsp(b) || b == b'\r' || b == b'\n')
    {
        return Err(DecodeError::Empty);
    }

    if let Some(offset) = first_invalid_offset(buf) {
        return Err(DecodeError::InvalidCharacter {
            offset,
            byte: buf.get(offset).copied().unwrap_or_default(),
        });
    }

    let consumed = buf.len();
    let len = canonicalize_in_place(buf);
    let value = home.alloc_str(&buf[..len])?;
    header.value = value;
    Ok(consumed)
}

/// Encodes the value of a generic header.
///
/// Generic values are stored canonically, so `flags` does not change the
/// output.
pub fn encode_generic(
    buf: Option<&mut [u8]>,
    header: &GenericHeader,
    _flags: EncodeFlags,
) -> Result<usize, EncodeError> {
    write_checked(buf, &header.value)
}

/// Collapses every separator run in a validated token list to one SP and
/// drops leading and trailing separators. Returns the new length.
fn canonicalize_in_place(buf: &mut [u8]) -> usize {
    let mut write = 0;
    let mut pending_sep = false;
    for read in 0..buf.len() {
        let b = buf[read];
        if is_token_byte(b) {
            if pending_sep && write > 0 {
                buf[write] = b' ';
                write += 1;
            }
            pending_sep = false;
            buf[write] = b;
            write += 1;
        } else {
            pending_sep = true;
        }
    }
    write
}

/// Codec for any header class that is a plain token list.
#[derive(Debug, Clone, Copy)]
pub struct GenericCodec {
    class: &'static HeaderClass,
}

impl GenericCodec {
    pub const fn new(class: &'static HeaderClass) -> Self {
        Self { class }
    }
}

impl HeaderCodec for GenericCodec {
    fn class(&self) -> &'static HeaderClass {
        self.class
    }

    fn decode(
        &self,
        home: &mut MsgHome,
        header: &mut GenericHeader,
        buf: &mut [u8],
    ) -> Result<usize, DecodeError> {
        decode_generic(home, header, buf)
    }

    fn encode(
        &self,
        buf: Option<&mut [u8]>,
        header: &GenericHeader,
        flags: EncodeFlags,
    ) -> Result<usize, EncodeError> {
        debug_assert!(
            header.is_class(self.class),
            "{} codec asked to encode a {} header",
            self.class,
            header.class()
        );
        encode_generic(buf, header, flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{class::Multiplicity, home::HomeLimits};

    static X_TAGS: HeaderClass = HeaderClass::new("X-Tags", "", Multiplicity::Append);
    static X_OTHER: HeaderClass = HeaderClass::new("X-Other", "", Multiplicity::Append);
    static TAGS_CODEC: GenericCodec = GenericCodec::new(&X_TAGS);

    fn decode(input: &str) -> Result<(usize, GenericHeader), DecodeError> {
        let mut home = MsgHome::new();
        let mut header = home.new_header(&X_TAGS);
        let mut buf = input.as_bytes().to_vec();
        let consumed = decode_generic(&mut home, &mut header, &mut buf)?;
        Ok((consumed, header))
    }

    #[test]
    fn decodes_single_token() {
        let (consumed, header) = decode("abc").unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(header.value(), "abc");
        assert_eq!(header.tokens().collect::<Vec<_>>(), vec!["abc"]);
    }

    #[test]
    fn collapses_white_space() {
        let (consumed, header) = decode("  one\t\ttwo \r\n three  ").unwrap();
        assert_eq!(consumed, 22);
        assert_eq!(header.value(), "one two three");
    }

    #[test]
    fn consumes_trailing_crlf() {
        let (consumed, header) = decode("abc def\r\n").unwrap();
        assert_eq!(consumed, 9);
        assert_eq!(header.value(), "abc def");
    }

    #[test]
    fn rejects_empty_region() {
        assert_eq!(decode("").unwrap_err(), DecodeError::Empty);
        assert_eq!(decode(" \t ").unwrap_err(), DecodeError::Empty);
        assert_eq!(decode("\r\n").unwrap_err(), DecodeError::Empty);
    }

    #[test]
    fn rejects_non_token_bytes() {
        assert_eq!(
            decode("abc \"def\"").unwrap_err(),
            DecodeError::InvalidCharacter {
                offset: 4,
                byte: b'"'
            }
        );
        assert_eq!(
            decode("abc\x07").unwrap_err(),
            DecodeError::InvalidCharacter {
                offset: 3,
                byte: 0x07
            }
        );
        assert!(matches!(
            decode("a,b").unwrap_err(),
            DecodeError::InvalidCharacter { offset: 1, .. }
        ));
        assert_eq!(
            decode("abc \r\nx").unwrap_err(),
            DecodeError::InvalidCharacter {
                offset: 4,
                byte: b'\r'
            }
        );
    }

    #[test]
    fn accepts_tokens_that_are_not_uuids() {
        let (_, header) = decode("not-a-uuid ~~~ 42").unwrap();
        assert_eq!(header.value(), "not-a-uuid ~~~ 42");
    }

    #[test]
    fn failed_decode_leaves_header_untouched() {
        let mut home = MsgHome::with_limits(HomeLimits::default().with_max_bytes(4));
        let mut header = home.new_header(&X_TAGS);
        let mut buf = b"abcdef".to_vec();
        let err = decode_generic(&mut home, &mut header, &mut buf).unwrap_err();
        assert_eq!(
            err,
            DecodeError::ArenaExhausted {
                requested: 6,
                remaining: 4
            }
        );
        assert!(header.is_empty());
        assert_eq!(home.bytes_used(), 0);
    }

    #[test]
    fn encode_dry_run_and_write() {
        let (_, header) = decode("abc123-def   456xyz").unwrap();
        let needed = TAGS_CODEC.encode(None, &header, EncodeFlags::empty()).unwrap();
        assert_eq!(needed, "abc123-def 456xyz".len());

        let mut out = vec![0u8; needed];
        let written = TAGS_CODEC
            .encode(Some(&mut out), &header, EncodeFlags::empty())
            .unwrap();
        assert_eq!(written, needed);
        assert_eq!(out, b"abc123-def 456xyz");
    }

    #[test]
    fn encode_into_short_buffer_fails_without_writing() {
        let (_, header) = decode("abc def").unwrap();
        let mut out = [b'#'; 3];
        let err = TAGS_CODEC
            .encode(Some(&mut out), &header, EncodeFlags::empty())
            .unwrap_err();
        assert_eq!(
            err,
            EncodeError::BufferTooSmall {
                needed: 7,
                capacity: 3
            }
        );
        assert_eq!(&out, b"###");
    }

    #[test]
    fn flags_do_not_change_generic_output() {
        let (_, header) = decode("a b").unwrap();
        let flags = EncodeFlags::COMPACT | EncodeFlags::CANONIC;
        assert_eq!(encode_generic(None, &header, flags).unwrap(), 3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "codec asked to encode")]
    fn encoding_foreign_class_is_a_contract_violation() {
        let header = GenericHeader::new(&X_OTHER);
        let _ = TAGS_CODEC.encode(None, &header, EncodeFlags::empty());
    }
}
