// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Non-standard extension headers for the Siphon SIP stack.
//!
//! Each header is a [`HeaderClass`](sip_core::HeaderClass) plus a
//! [`HeaderCodec`](sip_core::HeaderCodec). [`register_extra_headers`] adds all
//! of them to a registry.
//!
//! # Example
//! ```
//! use sip_core::HeaderRegistry;
//! use sip_extra::register_extra_headers;
//!
//! let mut registry = HeaderRegistry::new();
//! register_extra_headers(&mut registry).unwrap();
//! assert!(registry.lookup("X-FS-Core-UUID").is_some());
//! ```

use sip_core::{HeaderCodec, HeaderRegistry, RegistryError};

pub mod x_fs_core_uuid;

pub use x_fs_core_uuid::{
    is_x_fs_core_uuid, XFsCoreUuid, XFsCoreUuidHeader, X_FS_CORE_UUID, X_FS_CORE_UUID_CLASS,
};

/// Every extension codec provided by this crate.
pub fn extra_codecs() -> [&'static dyn HeaderCodec; 1] {
    [&X_FS_CORE_UUID]
}

/// Registers every extension header with `registry`.
pub fn register_extra_headers(registry: &mut HeaderRegistry) -> Result<(), RegistryError> {
    for codec in extra_codecs() {
        registry.register(codec)?;
    }
    Ok(())
}
