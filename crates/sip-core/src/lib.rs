// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core header machinery for the Siphon SIP stack.
//!
//! This crate provides what every header class plugs into:
//! - **Classes**: [`HeaderClass`] descriptors with [`Multiplicity`] policy
//! - **Codecs**: the [`HeaderCodec`] decode/encode capability and [`EncodeFlags`]
//! - **Generic headers**: [`GenericHeader`] storage with [`decode_generic`] /
//!   [`encode_generic`] for token-list values
//! - **Message home**: [`MsgHome`], the per-message owner of decoded headers
//! - **Registry**: [`HeaderRegistry`], selecting codecs by header name
//! - **Raw fields**: [`Headers`] as split from a header block
//!
//! Header values are stored as [`Bytes`](bytes::Bytes) carved out of the
//! message home; names use [`SmolStr`](smol_str::SmolStr).
//!
//! # Examples
//!
//! ```
//! # use sip_core::*;
//! static X_TAGS: HeaderClass = HeaderClass::new("X-Tags", "", Multiplicity::Append);
//! static X_TAGS_CODEC: GenericCodec = GenericCodec::new(&X_TAGS);
//!
//! let mut home = MsgHome::new();
//! let mut header = home.new_header(&X_TAGS);
//! let mut value = *b"alpha  beta";
//! X_TAGS_CODEC.decode(&mut home, &mut header, &mut value).unwrap();
//!
//! let len = X_TAGS_CODEC.encode(None, &header, EncodeFlags::empty()).unwrap();
//! assert_eq!(len, "alpha beta".len());
//! ```

pub mod class;
pub mod codec;
pub mod generic;
pub mod headers;
pub mod home;
pub mod registry;
pub mod token;

pub use class::{HeaderClass, Multiplicity};
pub use codec::{write_checked, DecodeError, EncodeError, EncodeFlags, HeaderCodec};
pub use generic::{decode_generic, encode_generic, GenericCodec, GenericHeader, HeaderCommon};
pub use headers::{Header, Headers};
pub use home::{
    ClassIter, HeaderId, HomeLimits, MsgHome, DEFAULT_MAX_HEADERS, DEFAULT_MAX_HOME_BYTES,
};
pub use registry::{HeaderRegistry, RegistryError};
pub use token::{is_token, is_token_byte};
