// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Capability lookup seam between terminal setup and the database

use std::collections::{BTreeMap, BTreeSet};

/// Errors reported by a capability lookup collaborator
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The terminal name has no entry in the database
    #[error("terminal not found")]
    NotFound,
    /// The database exists but could not be read
    #[error("cannot access the terminfo database")]
    Database(#[from] std::io::Error),
    /// Any other collaborator-specific condition
    #[error("{0}")]
    Other(String),
}

/// Capability record for one terminal type
///
/// Owned analogue of a parsed terminfo entry. Capability names use the
/// terminfo short names (`am`, `cols`, `cup`, ...). The record is filled
/// by a [`Lookup`] implementation and never modified afterwards; terminal
/// setup keeps its own copy of the geometry numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub booleans: BTreeSet<String>,
    pub numbers: BTreeMap<String, i32>,
    pub strings: BTreeMap<String, Vec<u8>>,
}

impl Capabilities {
    /// Return true if the boolean capability is present
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.booleans.contains(name)
    }

    /// Return the numeric capability, if present
    #[must_use]
    pub fn number(&self, name: &str) -> Option<i32> {
        self.numbers.get(name).copied()
    }

    /// Return the string capability, if present
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&[u8]> {
        self.strings.get(name).map(Vec::as_slice)
    }

    /// Return true for a generic terminal class (terminfo `gn`)
    ///
    /// Generic entries name a terminal family without any real, usable
    /// capability set.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.flag("gn")
    }

    /// Return true for a hardcopy terminal class (terminfo `hc`)
    #[must_use]
    pub fn is_hardcopy(&self) -> bool {
        self.flag("hc")
    }
}

/// Capability lookup collaborator
///
/// Implemented by whatever resolves a terminal name to a capability record:
/// a terminfo database reader, an in-memory table, a test double. This
/// crate only consumes the trait.
pub trait Lookup {
    /// Look up the capability record for `name`
    ///
    /// # Arguments
    ///
    /// * `name`  - terminal type name.
    /// * `depth` - use-definition chaining depth, starts at 0. Internal to
    ///   the collaborator; implementations without `use=` chaining may
    ///   ignore it.
    fn lookup(&self, name: &str, depth: usize) -> Result<Capabilities, Error>;
}
