// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Terminal setup orchestration

use std::{
    env,
    os::fd::{AsRawFd, BorrowedFd},
    process,
};

use rustix::{stdio, termios};

use crate::{
    lookup::{self, Lookup},
    size::resolve_geometry,
    term::Terminal,
};

/// Numeric status for a successful setup, as POSIX requires
pub const OK: i32 = 1;

/// Errors reported when setting up a terminal
///
/// Every variant carries the historical numeric status via
/// [`code`](Self::code); the `Display` form is the historical diagnostic.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// No explicit name and `TERM` is unset or empty
    #[error("TERM environment variable not set")]
    NoTermSet,
    /// The terminal structure could not be allocated
    ///
    /// Kept so the historical code set is complete; recoverable allocation
    /// failure is not observable through this crate's own paths.
    #[error("not enough memory to create terminal structure")]
    OutOfMemory,
    /// The capability database could not be accessed
    #[error("cannot access the terminfo database")]
    DatabaseUnavailable,
    /// The database has no entry for the terminal name
    #[error("{0}: terminal not listed in terminfo database")]
    TermNotFound(String),
    /// The lookup collaborator failed in a way this crate does not classify
    #[error("unknown error")]
    UnknownLookupError,
    /// The entry describes a generic terminal with no usable capabilities
    #[error("{0}: generic terminal")]
    GenericTerminal(String),
    /// The entry describes a printing-only device
    #[error("{0}: hardcopy terminal")]
    HardcopyTerminal(String),
}

impl Error {
    /// Historical numeric status for this failure
    ///
    /// 0 for name, lookup and generic-class failures, 1 for the hardcopy
    /// rejection (same value as [`OK`], distinguished by context), -1 for
    /// resource, database and unknown failures. These values are
    /// load-bearing for compatible callers.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::NoTermSet | Self::TermNotFound(_) | Self::GenericTerminal(_) => 0,
            Self::HardcopyTerminal(_) => 1,
            Self::OutOfMemory | Self::DatabaseUnavailable | Self::UnknownLookupError => -1,
        }
    }
}

/// Construct a terminal handle for `name` on `output`
///
/// The `setupterm` core. Resolves the name (falling back to `TERM`), asks
/// the lookup collaborator for the capability record, rejects generic and
/// hardcopy terminal classes, records the output descriptor and its line
/// speed, and resolves geometry. All-or-nothing: on any failure every
/// partially constructed resource is dropped and no handle escapes.
///
/// When `output` is the standard output descriptor but is not attached to
/// a terminal, the standard error descriptor is recorded and probed
/// instead. Output destination policy, not an error.
///
/// # Arguments
///
/// * `db`        - capability lookup collaborator.
/// * `name`      - terminal type name; `None` reads `TERM`.
/// * `output`    - descriptor the terminal will be driven through.
/// * `honor_env` - whether `LINES`/`COLUMNS` may override geometry.
pub fn resolve_terminal(
    db: &impl Lookup,
    name: Option<&str>,
    output: BorrowedFd<'_>,
    honor_env: bool,
) -> Result<Terminal, Error> {
    let name = match name {
        Some(name) => name.to_owned(),
        None => env::var("TERM").unwrap_or_default(),
    };
    if name.is_empty() {
        return Err(Error::NoTermSet);
    }

    let probe = if output.as_raw_fd() == stdio::raw_stdout() && !termios::isatty(output) {
        stdio::stderr()
    } else {
        output
    };

    let caps = match db.lookup(&name, 0) {
        Ok(caps) => caps,
        Err(lookup::Error::NotFound) => return Err(Error::TermNotFound(name)),
        Err(lookup::Error::Database(_)) => return Err(Error::DatabaseUnavailable),
        Err(_) => return Err(Error::UnknownLookupError),
    };

    let baud = termios::tcgetattr(probe).map_or(0, |tio| tio.output_speed());

    if caps.is_generic() {
        return Err(Error::GenericTerminal(name));
    }
    if caps.is_hardcopy() {
        return Err(Error::HardcopyTerminal(name));
    }

    let mut term = Terminal::new(name, caps, probe.as_raw_fd(), baud);
    resolve_geometry(&mut term, probe, honor_env);
    Ok(term)
}

/// Construct a terminal handle or terminate the process
///
/// Fail-fast variant of [`resolve_terminal`] for callers that prefer a
/// diagnostic over structured recovery: any error is printed to standard
/// error and the process exits with status 1 before any further logic
/// runs. Never returns an error.
pub fn resolve_terminal_or_exit(
    db: &impl Lookup,
    name: Option<&str>,
    output: BorrowedFd<'_>,
    honor_env: bool,
) -> Terminal {
    match resolve_terminal(db, name, output, honor_env) {
        Ok(term) => term,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod test {
    use std::{collections::BTreeMap, io, os::fd::AsFd};

    use collection_literals::collection;
    use tempfile::tempfile;

    use crate::lookup::Capabilities;

    use super::*;

    struct TableDb(BTreeMap<String, Capabilities>);

    impl Lookup for TableDb {
        fn lookup(&self, name: &str, _depth: usize) -> Result<Capabilities, lookup::Error> {
            self.0.get(name).cloned().ok_or(lookup::Error::NotFound)
        }
    }

    struct FailingDb(fn() -> lookup::Error);

    impl Lookup for FailingDb {
        fn lookup(&self, _name: &str, _depth: usize) -> Result<Capabilities, lookup::Error> {
            Err(self.0())
        }
    }

    fn plain_db() -> TableDb {
        let caps = Capabilities {
            booleans: collection!("am".to_owned()),
            numbers: collection!("lines".to_owned() => 24, "cols".to_owned() => 80),
            ..Default::default()
        };
        TableDb(collection!("ansi".to_owned() => caps))
    }

    fn clean_env(body: impl FnOnce()) {
        temp_env::with_vars(
            [
                ("TERM", None::<&str>),
                ("LINES", None),
                ("COLUMNS", None),
            ],
            body,
        );
    }

    #[test]
    fn no_name_and_no_term_variable() {
        let file = tempfile().unwrap();
        clean_env(|| {
            let err = resolve_terminal(&plain_db(), None, file.as_fd(), true).unwrap_err();
            assert_eq!(err, Error::NoTermSet);
            assert_eq!(err.code(), 0);
        });
    }

    #[test]
    fn empty_term_variable() {
        let file = tempfile().unwrap();
        temp_env::with_vars([("TERM", Some(""))], || {
            let err = resolve_terminal(&plain_db(), None, file.as_fd(), true).unwrap_err();
            assert_eq!(err, Error::NoTermSet);
        });
    }

    #[test]
    fn empty_explicit_name() {
        let file = tempfile().unwrap();
        temp_env::with_vars([("TERM", Some("ansi"))], || {
            let err = resolve_terminal(&plain_db(), Some(""), file.as_fd(), true).unwrap_err();
            assert_eq!(err, Error::NoTermSet);
        });
    }

    #[test]
    fn name_from_term_variable() {
        let file = tempfile().unwrap();
        temp_env::with_vars(
            [("TERM", Some("ansi")), ("LINES", None), ("COLUMNS", None)],
            || {
                let term = resolve_terminal(&plain_db(), None, file.as_fd(), true).unwrap();
                assert_eq!(term.name(), "ansi");
            },
        );
    }

    #[test]
    fn terminal_not_listed() {
        let file = tempfile().unwrap();
        let err =
            resolve_terminal(&plain_db(), Some("no-such-terminal"), file.as_fd(), true)
                .unwrap_err();
        assert_eq!(err, Error::TermNotFound("no-such-terminal".to_owned()));
        assert_eq!(err.code(), 0);
        assert_eq!(
            err.to_string(),
            "no-such-terminal: terminal not listed in terminfo database"
        );
    }

    #[test]
    fn database_not_accessible() {
        let file = tempfile().unwrap();
        let db = FailingDb(|| {
            lookup::Error::Database(io::Error::from(io::ErrorKind::PermissionDenied))
        });
        let err = resolve_terminal(&db, Some("ansi"), file.as_fd(), true).unwrap_err();
        assert_eq!(err, Error::DatabaseUnavailable);
        assert_eq!(err.code(), -1);
    }

    #[test]
    fn unclassified_lookup_failure() {
        let file = tempfile().unwrap();
        let db = FailingDb(|| lookup::Error::Other("use= loop".to_owned()));
        let err = resolve_terminal(&db, Some("ansi"), file.as_fd(), true).unwrap_err();
        assert_eq!(err, Error::UnknownLookupError);
        assert_eq!(err.code(), -1);
        assert_eq!(err.to_string(), "unknown error");
    }

    #[test]
    fn generic_terminal_rejected() {
        let file = tempfile().unwrap();
        let caps = Capabilities {
            booleans: collection!("gn".to_owned(), "am".to_owned()),
            numbers: collection!("lines".to_owned() => 24, "cols".to_owned() => 80),
            ..Default::default()
        };
        let db = TableDb(collection!("dialup".to_owned() => caps));
        let err = resolve_terminal(&db, Some("dialup"), file.as_fd(), true).unwrap_err();
        assert_eq!(err, Error::GenericTerminal("dialup".to_owned()));
        assert_eq!(err.code(), 0);
        assert_eq!(err.to_string(), "dialup: generic terminal");
    }

    #[test]
    fn hardcopy_terminal_rejected() {
        let file = tempfile().unwrap();
        let caps = Capabilities {
            booleans: collection!("hc".to_owned(), "os".to_owned()),
            ..Default::default()
        };
        let db = TableDb(collection!("oldprinter".to_owned() => caps));
        let err = resolve_terminal(&db, Some("oldprinter"), file.as_fd(), true).unwrap_err();
        assert_eq!(err, Error::HardcopyTerminal("oldprinter".to_owned()));
        assert_eq!(err.code(), 1);
        assert_eq!(err.to_string(), "oldprinter: hardcopy terminal");
    }

    #[test]
    fn success_records_descriptor_and_database_geometry() {
        let file = tempfile().unwrap();
        clean_env(|| {
            let term = resolve_terminal(&plain_db(), Some("ansi"), file.as_fd(), true).unwrap();
            assert_eq!(term.name(), "ansi");
            assert_eq!(term.fd(), file.as_fd().as_raw_fd());
            // A regular file has no window size and no line discipline.
            assert_eq!(term.lines(), 24);
            assert_eq!(term.columns(), 80);
            assert_eq!(term.baud(), 0);
            assert!(term.capabilities().flag("am"));
        });
    }

    #[test]
    fn environment_overrides_database_geometry() {
        let file = tempfile().unwrap();
        temp_env::with_vars([("LINES", Some("50")), ("COLUMNS", Some("132"))], || {
            let term = resolve_terminal(&plain_db(), Some("ansi"), file.as_fd(), true).unwrap();
            assert_eq!(term.lines(), 50);
            assert_eq!(term.columns(), 132);
        });
    }

    #[test]
    fn policy_switch_disables_environment_override() {
        let file = tempfile().unwrap();
        temp_env::with_vars([("LINES", Some("999")), ("COLUMNS", None)], || {
            let term = resolve_terminal(&plain_db(), Some("ansi"), file.as_fd(), false).unwrap();
            assert_eq!(term.lines(), 24);
        });
    }

    #[test]
    fn resolving_twice_is_deterministic() {
        let file = tempfile().unwrap();
        clean_env(|| {
            let db = plain_db();
            let first = resolve_terminal(&db, Some("ansi"), file.as_fd(), true).unwrap();
            let second = resolve_terminal(&db, Some("ansi"), file.as_fd(), true).unwrap();
            assert_eq!(first.capabilities(), second.capabilities());
            assert_eq!(first.lines(), second.lines());
            assert_eq!(first.columns(), second.columns());
        });
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            Error::NoTermSet.to_string(),
            "TERM environment variable not set"
        );
        assert_eq!(
            Error::OutOfMemory.to_string(),
            "not enough memory to create terminal structure"
        );
        assert_eq!(
            Error::DatabaseUnavailable.to_string(),
            "cannot access the terminfo database"
        );
        assert_eq!(Error::OutOfMemory.code(), -1);
    }
}
