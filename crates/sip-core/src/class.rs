// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Header class descriptors.
//!
//! A [`HeaderClass`] is the static identity of a header: its wire names and
//! how repeated occurrences inside one message are treated. Classes are
//! declared as `static` items and compared by address.

use std::fmt;

use crate::codec::EncodeFlags;

/// How repeated occurrences of a header inside one message are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Multiplicity {
    /// At most one occurrence is authoritative; later ones are kept aside
    /// as duplicates.
    Single,
    /// Occurrences are chained in the order they appear.
    Append,
    /// Each new occurrence becomes the head of the chain.
    Prepend,
}

impl Multiplicity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Multiplicity::Single => "single",
            Multiplicity::Append => "append",
            Multiplicity::Prepend => "prepend",
        }
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static descriptor of a header class.
///
/// # Examples
///
/// ```
/// use sip_core::{HeaderClass, Multiplicity};
///
/// static USER_TAG: HeaderClass = HeaderClass::new("X-User-Tag", "", Multiplicity::Single);
///
/// assert!(USER_TAG.matches_name("x-user-tag"));
/// assert!(!USER_TAG.has_compact_name());
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct HeaderClass {
    name: &'static str,
    compact_name: &'static str,
    multiplicity: Multiplicity,
}

impl HeaderClass {
    pub const fn new(
        name: &'static str,
        compact_name: &'static str,
        multiplicity: Multiplicity,
    ) -> Self {
        Self {
            name,
            compact_name,
            multiplicity,
        }
    }

    /// Long header name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Compact alias, empty when the header has none.
    pub fn compact_name(&self) -> &'static str {
        self.compact_name
    }

    pub fn has_compact_name(&self) -> bool {
        !self.compact_name.is_empty()
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    /// Case-insensitive match against the long or compact name.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || (self.has_compact_name() && self.compact_name.eq_ignore_ascii_case(name))
    }

    /// Name to put on the wire for the given flags.
    ///
    /// Falls back to the long name when compact form is requested but the
    /// class has no compact alias.
    pub fn wire_name(&self, flags: EncodeFlags) -> &'static str {
        if flags.contains(EncodeFlags::COMPACT) && self.has_compact_name() {
            self.compact_name
        } else {
            self.name
        }
    }

    /// Identity comparison; two classes are the same only if they are the
    /// same static item.
    pub fn is(&self, other: &HeaderClass) -> bool {
        std::ptr::eq(self, other)
    }
}

impl fmt::Display for HeaderClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
