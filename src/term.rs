// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! In-memory record of one terminal's capabilities and geometry

use std::os::fd::RawFd;

use crate::lookup::Capabilities;

/// A fully constructed terminal handle
///
/// Produced by [`resolve_terminal`](crate::setup::resolve_terminal); there
/// is no way to obtain a partially initialized handle. Geometry fields keep
/// the historical short width, so all writes narrow with a truncating cast.
/// The handle references its output descriptor but does not own it.
#[derive(Debug)]
pub struct Terminal {
    name: String,
    caps: Capabilities,
    lines: i16,
    columns: i16,
    fd: RawFd,
    baud: u32,
}

impl Terminal {
    /// Seed geometry from the database `lines`/`cols` numbers, 0 when absent.
    pub(crate) fn new(name: String, caps: Capabilities, fd: RawFd, baud: u32) -> Self {
        let lines = caps.number("lines").unwrap_or(0) as i16;
        let columns = caps.number("cols").unwrap_or(0) as i16;
        Self {
            name,
            caps,
            lines,
            columns,
            fd,
            baud,
        }
    }

    /// Resolved terminal type name, never empty
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capability record loaded for this terminal
    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    /// Row count, 0 when unknown
    #[must_use]
    pub const fn lines(&self) -> i16 {
        self.lines
    }

    /// Column count, 0 when unknown
    #[must_use]
    pub const fn columns(&self) -> i16 {
        self.columns
    }

    /// Output descriptor used for device queries, referenced not owned
    #[must_use]
    pub const fn fd(&self) -> RawFd {
        self.fd
    }

    /// Output line speed at construction time, 0 when the descriptor has
    /// no line discipline
    #[must_use]
    pub const fn baud(&self) -> u32 {
        self.baud
    }

    pub(crate) const fn set_lines(&mut self, lines: i16) {
        self.lines = lines;
    }

    pub(crate) const fn set_columns(&mut self, columns: i16) {
        self.columns = columns;
    }
}
