// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Name-keyed table of header codecs.
//!
//! The host parser consults a [`HeaderRegistry`] for every header field it
//! meets. Both the long and the compact name of a class select its codec;
//! lookups ignore ASCII case.

use std::collections::HashMap;
use std::fmt;

use smol_str::SmolStr;

use crate::{class::HeaderClass, codec::HeaderCodec, token::is_token};

/// Errors returned when registering a codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Another codec already answers to this name.
    Duplicate(SmolStr),
    /// The class name is not a valid header name token.
    InvalidName(SmolStr),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(name) => write!(f, "header name already registered: {}", name),
            Self::InvalidName(name) => write!(f, "invalid header name: {:?}", name),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Registry of header codecs keyed by lowercase header name.
#[derive(Debug, Default)]
pub struct HeaderRegistry {
    codecs: Vec<&'static dyn HeaderCodec>,
    by_name: HashMap<SmolStr, usize>,
}

impl HeaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a codec under its class's long and compact names.
    ///
    /// Nothing is registered when either name is invalid or already taken.
    ///
    /// # Examples
    ///
    /// ```
    /// use sip_core::{GenericCodec, HeaderClass, HeaderRegistry, Multiplicity};
    ///
    /// static X_TRACE: HeaderClass = HeaderClass::new("X-Trace", "", Multiplicity::Append);
    /// static X_TRACE_CODEC: GenericCodec = GenericCodec::new(&X_TRACE);
    ///
    /// let mut registry = HeaderRegistry::new();
    /// registry.register(&X_TRACE_CODEC).unwrap();
    /// assert!(registry.lookup("x-trace").is_some());
    /// assert!(registry.register(&X_TRACE_CODEC).is_err());
    /// ```
    pub fn register(&mut self, codec: &'static dyn HeaderCodec) -> Result<(), RegistryError> {
        let class = codec.class();
        let mut keys = vec![class.name()];
        if class.has_compact_name() {
            keys.push(class.compact_name());
        }

        for key in &keys {
            if !is_token(key) {
                return Err(RegistryError::InvalidName(SmolStr::new(key)));
            }
            if self.by_name.contains_key(key.to_ascii_lowercase().as_str()) {
                return Err(RegistryError::Duplicate(SmolStr::new(key)));
            }
        }

        let idx = self.codecs.len();
        self.codecs.push(codec);
        for key in keys {
            self.by_name
                .insert(SmolStr::new(key.to_ascii_lowercase()), idx);
        }
        Ok(())
    }

    /// Finds the codec for a header name, long or compact, ignoring case.
    pub fn lookup(&self, name: &str) -> Option<&'static dyn HeaderCodec> {
        let key = name.trim().to_ascii_lowercase();
        self.by_name.get(key.as_str()).map(|&idx| self.codecs[idx])
    }

    /// Finds the codec registered for exactly this class.
    pub fn lookup_class(&self, class: &HeaderClass) -> Option<&'static dyn HeaderCodec> {
        self.codecs.iter().copied().find(|c| c.class().is(class))
    }

    /// Registered classes, in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &'static HeaderClass> + '_ {
        self.codecs.iter().map(|c| c.class())
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}
