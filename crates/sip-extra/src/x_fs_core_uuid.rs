// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! X-FS-Core-UUID header.
//!
//! Carries the UUID of the switch core that handled a call. The value is a
//! plain token list; nothing checks that the tokens look like UUIDs.
//!
//! # Format
//!
//! ```text
//! X-FS-Core-UUID = "X-FS-Core-UUID" HCOLON uuid *(LWS uuid)
//! uuid           = token
//! ```
//!
//! # Example
//!
//! ```text
//! X-FS-Core-UUID: 3f2a9c1e-8b4d-4e7a-9f10-2c6d5e8b7a41
//! ```

use sip_core::{
    decode_generic, encode_generic, DecodeError, EncodeError, EncodeFlags, GenericHeader,
    HeaderClass, HeaderCodec, MsgHome, Multiplicity,
};

/// Class descriptor of the X-FS-Core-UUID header.
pub static X_FS_CORE_UUID_CLASS: HeaderClass =
    HeaderClass::new("X-FS-Core-UUID", "", Multiplicity::Single);

/// Codec registered for X-FS-Core-UUID.
pub static X_FS_CORE_UUID: XFsCoreUuid = XFsCoreUuid;

/// Decoded X-FS-Core-UUID header.
pub type XFsCoreUuidHeader = GenericHeader;

#[derive(Debug, Clone, Copy, Default)]
pub struct XFsCoreUuid;

impl HeaderCodec for XFsCoreUuid {
    fn class(&self) -> &'static HeaderClass {
        &X_FS_CORE_UUID_CLASS
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
            is_x_fs_core_uuid(header),
            "X-FS-Core-UUID codec asked to encode a {} header",
            header.class()
        );
        encode_generic(buf, header, flags)
    }
}

/// Returns `true` when `header` is an X-FS-Core-UUID header.
pub fn is_x_fs_core_uuid(header: &GenericHeader) -> bool {
    header.is_class(&X_FS_CORE_UUID_CLASS)
}
