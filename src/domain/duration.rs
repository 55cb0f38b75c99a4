// SPDX-License-Identifier: MIT OR Apache-2.0

//! Duration strings in the `1h30m`, `3200ms`, `1.5s` notation.
//!
//! The grammar is a sequence of decimal numbers, each with an optional fraction and
//! a mandatory unit suffix, optionally preceded by a sign. Valid units are `ns`,
//! `us` (or `µs`/`μs`), `ms`, `s`, `m` and `h`. A lone `0` needs no unit.

use std::time::Duration;
use thiserror::Error;

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

/// Largest representable magnitude, in nanoseconds.
const MAX_NANOS: u64 = 1 << 63;

/// Fraction digits past this are consumed but ignored.
const MAX_FRACTION_DIGITS: u32 = 18;

/// Errors produced by [`parse_duration`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDurationError {
    /// The input is empty or does not follow the grammar.
    #[error("invalid duration \"{0}\"")]
    Invalid(String),

    /// A number is not followed by a unit.
    #[error("missing unit in duration \"{0}\"")]
    MissingUnit(String),

    /// A unit suffix is not recognized.
    #[error("unknown unit \"{unit}\" in duration \"{input}\"")]
    UnknownUnit {
        /// The offending unit
        unit: String,
        /// The whole input
        input: String,
    },

    /// The value does not fit in a signed 64-bit nanosecond count.
    #[error("duration \"{0}\" is out of range")]
    Overflow(String),

    /// The value is below zero.
    #[error("duration \"{0}\" is negative")]
    Negative(String),
}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(NANOSECOND),
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Splits the leading run of ASCII digits off `s`.
fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

/// Parses a duration string.
///
/// # Examples
///
/// ```
/// use flowscfg::domain::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("3200ms").unwrap(), Duration::from_millis(3200));
/// assert_eq!(parse_duration("1h2m").unwrap(), Duration::from_secs(3720));
/// assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
/// assert!(parse_duration("invalid timeout").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, ParseDurationError> {
    let invalid = || ParseDurationError::Invalid(input.to_string());
    let overflow = || ParseDurationError::Overflow(input.to_string());

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        let (int_digits, after_int) = split_digits(rest);
        let mut value: u64 = 0;
        for digit in int_digits.bytes() {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(digit - b'0')))
                .filter(|v| *v <= MAX_NANOS)
                .ok_or_else(overflow)?;
        }
        rest = after_int;

        let mut fraction: u64 = 0;
        let mut scale: u64 = 1;
        let mut has_fraction = false;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (frac_digits, after_frac) = split_digits(after_dot);
            has_fraction = !frac_digits.is_empty();
            for (i, digit) in frac_digits.bytes().enumerate() {
                if i as u32 >= MAX_FRACTION_DIGITS {
                    break;
                }
                fraction = fraction * 10 + u64::from(digit - b'0');
                scale *= 10;
            }
            rest = after_frac;
        }

        if int_digits.is_empty() && !has_fraction {
            return Err(invalid());
        }

        let unit_end = rest
            .bytes()
            .position(|b| b == b'.' || b.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_end == 0 {
            return Err(ParseDurationError::MissingUnit(input.to_string()));
        }
        let (unit, after_unit) = rest.split_at(unit_end);
        let unit_ns = unit_nanos(unit).ok_or_else(|| ParseDurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;
        rest = after_unit;

        if value > MAX_NANOS / unit_ns {
            return Err(overflow());
        }
        value *= unit_ns;
        if fraction > 0 {
            let extra = u128::from(fraction) * u128::from(unit_ns) / u128::from(scale);
            value = u64::try_from(extra)
                .ok()
                .and_then(|e| value.checked_add(e))
                .filter(|v| *v <= MAX_NANOS)
                .ok_or_else(overflow)?;
        }

        total = total
            .checked_add(value)
            .filter(|v| *v <= MAX_NANOS)
            .ok_or_else(overflow)?;
    }

    if negative {
        if total != 0 {
            return Err(ParseDurationError::Negative(input.to_string()));
        }
        return Ok(Duration::ZERO);
    }
    if total > MAX_NANOS - 1 {
        return Err(overflow());
    }
    Ok(Duration::from_nanos(total))
}
