// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Terminal setup and current-terminal management
//!
//! Builds an in-memory [`Terminal`] handle from a capability record, the
//! device window size and the environment, and manages the "current
//! terminal" slot that downstream capability queries read. Capability
//! database access is behind the [`Lookup`] trait and is not implemented
//! here.

pub mod context;
pub mod lookup;
pub mod setup;
pub mod size;
pub mod term;

pub use context::{TermContext, process_context};
pub use lookup::{Capabilities, Lookup};
pub use setup::{OK, resolve_terminal, resolve_terminal_or_exit};
pub use size::resolve_geometry;
pub use term::Terminal;
