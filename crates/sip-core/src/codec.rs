// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decode/encode capability implemented by every header class.
//!
//! The host parser looks a codec up by header name (see
//! [`HeaderRegistry`](crate::HeaderRegistry)) and calls [`HeaderCodec::decode`]
//! with the raw value region. Serialisation goes back through
//! [`HeaderCodec::encode`], which supports a dry run for sizing.

use std::fmt;

use crate::{class::HeaderClass, generic::GenericHeader, home::MsgHome};

bitflags::bitflags! {
    /// Formatting toggles for header encoding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EncodeFlags: u32 {
        /// Use the compact header name when the class defines one.
        const COMPACT = 0b0000_0001;
        /// Canonical value form. Generic values are always stored
        /// canonically, so this only matters for structured headers.
        const CANONIC = 0b0000_0010;
        /// Leave out the CRLF after a header line.
        const NO_CRLF = 0b0000_0100;
    }
}

/// Errors produced while decoding a header value region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The value region is empty or contains only white space.
    Empty,
    /// A byte outside the header grammar was found at `offset`.
    InvalidCharacter { offset: usize, byte: u8 },
    /// The message home has no room left for the decoded value.
    ArenaExhausted { requested: usize, remaining: usize },
    /// The message home already holds its maximum number of headers.
    TooManyHeaders { max: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "header value is empty"),
            Self::InvalidCharacter { offset, byte } => {
                write!(f, "invalid byte 0x{:02x} at offset {}", byte, offset)
            }
            Self::ArenaExhausted {
                requested,
                remaining,
            } => write!(
                f,
                "message arena exhausted (requested {}, remaining {})",
                requested, remaining
            ),
            Self::TooManyHeaders { max } => write!(f, "too many headers (max {})", max),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Errors produced while encoding a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The output buffer cannot hold the encoded form.
    BufferTooSmall { needed: usize, capacity: usize },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { needed, capacity } => write!(
                f,
                "output buffer too small (needed {}, capacity {})",
                needed, capacity
            ),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Decode/encode capability of a header class.
pub trait HeaderCodec: Send + Sync + 'static {
    /// Static descriptor of the class this codec handles.
    fn class(&self) -> &'static HeaderClass;

    /// Parses the value region in `buf` into `header`.
    ///
    /// `buf` may be rewritten in place. Any storage the header needs is taken
    /// from `home`. Returns the number of bytes of `buf` consumed.
    fn decode(
        &self,
        home: &mut MsgHome,
        header: &mut GenericHeader,
        buf: &mut [u8],
    ) -> Result<usize, DecodeError>;

    /// Writes the header value into `buf`.
    ///
    /// Passing `None` performs a dry run and returns the exact number of
    /// bytes a real call would write. A buffer that is too short fails
    /// without writing anything.
    fn encode(
        &self,
        buf: Option<&mut [u8]>,
        header: &GenericHeader,
        flags: EncodeFlags,
    ) -> Result<usize, EncodeError>;
}

impl fmt::Debug for dyn HeaderCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderCodec")
            .field("class", &self.class().name())
            .finish()
    }
}

/// Copies `src` into `buf` after checking capacity, or just reports the
/// length for a dry run.
pub fn write_checked(buf: Option<&mut [u8]>, src: &[u8]) -> Result<usize, EncodeError> {
    let needed = src.len();
    if let Some(buf) = buf {
        if buf.len() < needed {
            return Err(EncodeError::BufferTooSmall {
                needed,
                capacity: buf.len(),
            });
        }
        buf[..needed].copy_from_slice(src);
    }
    Ok(needed)
}
