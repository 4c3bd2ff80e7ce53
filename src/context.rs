// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Current-terminal registry and environment override policy

use std::{os::fd::BorrowedFd, sync::Mutex};

use crate::{
    lookup::Lookup,
    setup::{self, OK, resolve_terminal},
    term::Terminal,
};

/// Current-terminal slot and environment override policy
///
/// Explicit replacement for the pair of process globals behind the
/// historical `setupterm`/`set_curterm`/`use_env` interface. Library users
/// should own a `TermContext` and pass it where capability queries happen;
/// [`process_context`] exists only for source compatibility with
/// single-terminal programs.
#[derive(Debug)]
pub struct TermContext {
    current: Option<Terminal>,
    honor_env: bool,
}

impl Default for TermContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TermContext {
    /// Return a context with an empty slot that honors the environment
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: None,
            honor_env: true,
        }
    }

    /// Install `term` as the current terminal
    ///
    /// Returns the displaced terminal, if any; nothing is destroyed
    /// implicitly and the caller decides its fate.
    pub fn install(&mut self, term: Terminal) -> Option<Terminal> {
        self.current.replace(term)
    }

    /// The current terminal, for downstream capability queries
    #[must_use]
    pub const fn current(&self) -> Option<&Terminal> {
        self.current.as_ref()
    }

    /// Remove and return the current terminal, leaving the slot empty
    pub fn take(&mut self) -> Option<Terminal> {
        self.current.take()
    }

    /// Set whether `LINES`/`COLUMNS` may override geometry
    ///
    /// Takes effect on the next setup call through this context only, not
    /// retroactively.
    pub const fn set_honor_environment(&mut self, honor: bool) {
        self.honor_env = honor;
    }

    /// Whether setup calls through this context honor the environment
    #[must_use]
    pub const fn honors_environment(&self) -> bool {
        self.honor_env
    }

    /// Resolve a terminal and install it as current
    ///
    /// Convenience wrapper around
    /// [`resolve_terminal`](crate::setup::resolve_terminal) using this
    /// context's environment policy. On success the handle is installed,
    /// any displaced terminal is dropped, and the historical success
    /// status [`OK`] is returned. On failure the slot is untouched.
    pub fn setupterm(
        &mut self,
        db: &impl Lookup,
        name: Option<&str>,
        output: BorrowedFd<'_>,
    ) -> Result<i32, setup::Error> {
        let term = resolve_terminal(db, name, output, self.honor_env)?;
        self.current = Some(term);
        Ok(OK)
    }
}

/// The process-wide default context
///
/// Provided for source compatibility only. The mutex makes the shared slot
/// expressible in safe Rust; the contract is unchanged from the historical
/// interface, callers serialize setup calls themselves.
#[must_use]
pub fn process_context() -> &'static Mutex<TermContext> {
    static CONTEXT: Mutex<TermContext> = Mutex::new(TermContext::new());
    &CONTEXT
}
