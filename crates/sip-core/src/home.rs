// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-message memory home.
//!
//! A [`MsgHome`] owns every header decoded for one message together with the
//! string storage behind their values. Headers refer to each other through
//! [`HeaderId`] indices rather than pointers, and nothing is freed
//! individually: dropping the home releases the whole message.
//!
//! # Security
//!
//! The home enforces [`HomeLimits`] so a hostile message cannot grow it
//! without bound. Exceeding either limit makes the decode that needed the
//! space fail.

use bytes::{Bytes, BytesMut};

use crate::{
    class::{HeaderClass, Multiplicity},
    codec::DecodeError,
    generic::GenericHeader,
};

/// Default string budget of a message home.
pub const DEFAULT_MAX_HOME_BYTES: usize = 64 * 1024;
/// Default number of headers a message home may hold.
pub const DEFAULT_MAX_HEADERS: usize = 256;

const INITIAL_CHUNK: usize = 512;

/// Size limits applied to a [`MsgHome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeLimits {
    pub max_bytes: usize,
    pub max_headers: usize,
}

impl Default for HomeLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_HOME_BYTES,
            max_headers: DEFAULT_MAX_HEADERS,
        }
    }
}

impl HomeLimits {
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_max_headers(mut self, max_headers: usize) -> Self {
        self.max_headers = max_headers;
        self
    }
}

/// Index of a header inside its [`MsgHome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeaderId(usize);

impl HeaderId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owner of all headers decoded for one message.
#[derive(Debug)]
pub struct MsgHome {
    limits: HomeLimits,
    strings: BytesMut,
    used: usize,
    headers: Vec<GenericHeader>,
    heads: Vec<(&'static HeaderClass, HeaderId)>,
    duplicates: Vec<HeaderId>,
}

impl Default for MsgHome {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgHome {
    pub fn new() -> Self {
        Self::with_limits(HomeLimits::default())
    }

    pub fn with_limits(limits: HomeLimits) -> Self {
        Self {
            limits,
            strings: BytesMut::with_capacity(limits.max_bytes.min(INITIAL_CHUNK)),
            used: 0,
            headers: Vec::new(),
            heads: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    pub fn limits(&self) -> HomeLimits {
        self.limits
    }

    /// Bytes of string storage handed out so far.
    pub fn bytes_used(&self) -> usize {
        self.used
    }

    pub fn remaining_bytes(&self) -> usize {
        self.limits.max_bytes.saturating_sub(self.used)
    }

    /// Copies `src` into the home's string storage.
    ///
    /// Consecutive allocations share the same backing chunk until it fills.
    pub fn alloc_str(&mut self, src: &[u8]) -> Result<Bytes, DecodeError> {
        let remaining = self.remaining_bytes();
        if src.len() > remaining {
            return Err(DecodeError::ArenaExhausted {
                requested: src.len(),
                remaining,
            });
        }
        if self.strings.capacity() < src.len() {
            self.strings
                .reserve(src.len().max(INITIAL_CHUNK).min(remaining));
        }
        self.strings.extend_from_slice(src);
        self.used += src.len();
        Ok(self.strings.split().freeze())
    }

    /// Returns `true` while another header fits in the header budget.
    pub fn has_room(&self) -> bool {
        self.headers.len() < self.limits.max_headers
    }

    /// Fails with [`DecodeError::TooManyHeaders`] once the header budget is
    /// spent. Call before decoding so a rejected header allocates nothing.
    pub fn reserve_header(&self) -> Result<(), DecodeError> {
        if self.has_room() {
            Ok(())
        } else {
            Err(DecodeError::TooManyHeaders {
                max: self.limits.max_headers,
            })
        }
    }

    /// Creates an empty header slot of `class`, ready to be decoded into.
    pub fn new_header(&self, class: &'static HeaderClass) -> GenericHeader {
        GenericHeader::new(class)
    }

    /// Stores a decoded header and links it into its class chain.
    ///
    /// For [`Multiplicity::Single`] classes only the first occurrence is
    /// linked; later ones are kept as duplicates.
    pub fn insert(&mut self, mut header: GenericHeader) -> Result<HeaderId, DecodeError> {
        self.reserve_header()?;

        let id = HeaderId(self.headers.len());
        let class = header.class();
        header.set_next(None);

        match self.head_position(class) {
            None => self.heads.push((class, id)),
            Some(pos) => match class.multiplicity() {
                Multiplicity::Single => self.duplicates.push(id),
                Multiplicity::Append => {
                    let tail = self.tail_of(self.heads[pos].1);
                    self.headers[tail.0].set_next(Some(id));
                }
                Multiplicity::Prepend => {
                    header.set_next(Some(self.heads[pos].1));
                    self.heads[pos].1 = id;
                }
            },
        }

        self.headers.push(header);
        Ok(id)
    }

    pub fn get(&self, id: HeaderId) -> Option<&GenericHeader> {
        self.headers.get(id.0)
    }

    /// Head of the chain for `class`, the authoritative occurrence for
    /// single headers.
    pub fn first(&self, class: &HeaderClass) -> Option<&GenericHeader> {
        let pos = self.head_position(class)?;
        self.get(self.heads[pos].1)
    }

    /// Walks the chain for `class` through the `next` links.
    pub fn iter_class<'a>(&'a self, class: &HeaderClass) -> ClassIter<'a> {
        ClassIter {
            home: self,
            cursor: self.head_position(class).map(|pos| self.heads[pos].1),
        }
    }

    /// Every stored header in insertion order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = (HeaderId, &GenericHeader)> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, h)| (HeaderId(idx), h))
    }

    /// Heads of every class chain, in the order the classes first appeared.
    pub fn heads(&self) -> impl Iterator<Item = &GenericHeader> {
        self.heads.iter().filter_map(move |(_, id)| self.get(*id))
    }

    /// Extra occurrences of single headers.
    pub fn duplicates(&self) -> impl Iterator<Item = &GenericHeader> {
        self.duplicates.iter().filter_map(move |id| self.get(*id))
    }

    pub fn is_duplicate(&self, id: HeaderId) -> bool {
        self.duplicates.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    fn head_position(&self, class: &HeaderClass) -> Option<usize> {
        self.heads.iter().position(|(c, _)| c.is(class))
    }

    fn tail_of(&self, mut id: HeaderId) -> HeaderId {
        while let Some(next) = self.headers[id.0].next() {
            id = next;
        }
        id
    }
}

/// Iterator over one class chain of a [`MsgHome`].
#[derive(Debug)]
pub struct ClassIter<'a> {
    home: &'a MsgHome,
    cursor: Option<HeaderId>,
}

impl<'a> Iterator for ClassIter<'a> {
    type Item = &'a GenericHeader;

    fn next(&mut self) -> Option<Self::Item> {
        let header = self.home.get(self.cursor?)?;
        self.cursor = header.next();
        Some(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generic::decode_generic;

    static SINGLE: HeaderClass = HeaderClass::new("X-Single", "", Multiplicity::Single);
    static APPEND: HeaderClass = HeaderClass::new("X-Append", "", Multiplicity::Append);
    static PREPEND: HeaderClass = HeaderClass::new("X-Prepend", "", Multiplicity::Prepend);

    fn add(home: &mut MsgHome, class: &'static HeaderClass, value: &str) -> HeaderId {
        let mut header = home.new_header(class);
        let mut buf = value.as_bytes().to_vec();
        decode_generic(home, &mut header, &mut buf).expect("decode");
        home.insert(header).expect("insert")
    }

    fn values<'a>(home: &'a MsgHome, class: &HeaderClass) -> Vec<&'a str> {
        home.iter_class(class).map(|h| h.value()).collect()
    }

    #[test]
    fn append_links_in_order() {
        let mut home = MsgHome::new();
        add(&mut home, &APPEND, "a");
        add(&mut home, &APPEND, "b");
        add(&mut home, &APPEND, "c");
        assert_eq!(values(&home, &APPEND), vec!["a", "b", "c"]);
        assert_eq!(home.first(&APPEND).unwrap().value(), "a");
    }

    #[test]
    fn prepend_links_newest_first() {
        let mut home = MsgHome::new();
        add(&mut home, &PREPEND, "a");
        add(&mut home, &PREPEND, "b");
        assert_eq!(values(&home, &PREPEND), vec!["b", "a"]);
    }

    #[test]
    fn single_keeps_first_and_sets_duplicates_aside() {
        let mut home = MsgHome::new();
        let first = add(&mut home, &SINGLE, "one");
        let second = add(&mut home, &SINGLE, "two");
        assert_eq!(values(&home, &SINGLE), vec!["one"]);
        assert!(!home.is_duplicate(first));
        assert!(home.is_duplicate(second));
        let dups: Vec<&str> = home.duplicates().map(|h| h.value()).collect();
        assert_eq!(dups, vec!["two"]);
        assert_eq!(home.len(), 2);
    }

    #[test]
    fn classes_do_not_mix() {
        let mut home = MsgHome::new();
        add(&mut home, &APPEND, "a1");
        add(&mut home, &SINGLE, "s");
        add(&mut home, &APPEND, "a2");
        assert_eq!(values(&home, &APPEND), vec!["a1", "a2"]);
        assert_eq!(values(&home, &SINGLE), vec!["s"]);
        assert!(home.iter_class(&PREPEND).next().is_none());
        let heads: Vec<&str> = home.heads().map(|h| h.value()).collect();
        assert_eq!(heads, vec!["a1", "s"]);
    }

    #[test]
    fn alloc_respects_byte_budget() {
        let mut home = MsgHome::with_limits(HomeLimits::default().with_max_bytes(8));
        let a = home.alloc_str(b"abcde").unwrap();
        assert_eq!(a.as_ref(), b"abcde");
        assert_eq!(home.remaining_bytes(), 3);
        assert_eq!(
            home.alloc_str(b"wxyz").unwrap_err(),
            DecodeError::ArenaExhausted {
                requested: 4,
                remaining: 3
            }
        );
        let b = home.alloc_str(b"xyz").unwrap();
        assert_eq!(b.as_ref(), b"xyz");
        assert_eq!(a.as_ref(), b"abcde");
        assert_eq!(home.bytes_used(), 8);
    }

    #[test]
    fn insert_respects_header_budget() {
        let mut home = MsgHome::with_limits(HomeLimits::default().with_max_headers(1));
        add(&mut home, &APPEND, "a");
        let header = home.new_header(&APPEND);
        assert_eq!(
            home.insert(header).unwrap_err(),
            DecodeError::TooManyHeaders { max: 1 }
        );
        assert_eq!(home.len(), 1);
    }

    #[test]
    fn reserve_header_tracks_header_budget() {
        let mut home = MsgHome::with_limits(HomeLimits::default().with_max_headers(1));
        assert!(home.has_room());
        assert_eq!(home.reserve_header(), Ok(()));
        add(&mut home, &APPEND, "a");
        assert!(!home.has_room());
        assert_eq!(
            home.reserve_header(),
            Err(DecodeError::TooManyHeaders { max: 1 })
        );
    }

    #[test]
    fn ids_follow_insertion_order() {
        let mut home = MsgHome::new();
        let a = add(&mut home, &APPEND, "a");
        let b = add(&mut home, &SINGLE, "b");
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        let seen: Vec<HeaderId> = home.iter().map(|(id, _)| id).collect();
        assert_eq!(seen, vec![a, b]);
    }
}
