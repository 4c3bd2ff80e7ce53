// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Terminal geometry from the device, the database and the environment

use std::{env, os::fd::BorrowedFd};

use rustix::termios;

use crate::term::Terminal;

/// Populate the terminal's `lines`/`columns`
///
/// Never fails; every degraded outcome leaves the database-seeded geometry
/// in place. Precedence, lowest to highest:
///
/// 1. database defaults already on the handle,
/// 2. the device window size, taken only when the query succeeds and both
///    dimensions are non-zero,
/// 3. the `LINES` and `COLUMNS` environment variables, each applied
///    independently when `honor_env` is set and the value starts with a
///    parseable integer (POSIX requires the environment to override).
///
/// Values are narrowed to the handle's short-width storage with a
/// truncating cast. Out-of-range geometry is truncated, not rejected.
pub fn resolve_geometry(term: &mut Terminal, output: BorrowedFd<'_>, honor_env: bool) {
    if let Ok(win) = termios::tcgetwinsize(output)
        && win.ws_row != 0
        && win.ws_col != 0
    {
        term.set_lines(win.ws_row as i16);
        term.set_columns(win.ws_col as i16);
    }

    if honor_env {
        if let Ok(value) = env::var("LINES")
            && let Some(lines) = parse_env_number(&value)
        {
            term.set_lines(lines as i16);
        }
        if let Ok(value) = env::var("COLUMNS")
            && let Some(columns) = parse_env_number(&value)
        {
            term.set_columns(columns as i16);
        }
    }
}

/// Parse the leading integer of an environment value, `strtol` style
///
/// Intentionally permissive: leading whitespace and a sign are accepted,
/// the base is self-detected (`0x` hex, leading `0` octal, else decimal),
/// and parsing stops at the first invalid character, so partial parses
/// like `"123abc"` yield 123. Overflow saturates. Returns `None` only when
/// no digit is consumed; tightening any of this would change observable
/// behavior for malformed environment values.
fn parse_env_number(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    let mut pos = 0;

    while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }

    let negative = match bytes.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let mut radix = 10;
    if bytes.get(pos) == Some(&b'0') {
        if matches!(bytes.get(pos + 1), Some(b'x' | b'X'))
            && bytes.get(pos + 2).is_some_and(u8::is_ascii_hexdigit)
        {
            radix = 16;
            pos += 2;
        } else {
            radix = 8;
        }
    }

    // Accumulate as a negative magnitude so both saturation limits are
    // reachable.
    let mut value: i64 = 0;
    let mut digits = 0;
    while let Some(digit) = bytes
        .get(pos)
        .and_then(|byte| char::from(*byte).to_digit(radix))
    {
        value = value
            .saturating_mul(i64::from(radix))
            .saturating_sub(i64::from(digit));
        digits += 1;
        pos += 1;
    }

    if digits == 0 {
        return None;
    }
    Some(if negative { value } else { value.saturating_neg() })
}
