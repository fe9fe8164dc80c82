use std::sync::OnceLock;

use chrono::{NaiveDateTime, Timelike};
use regex::Regex;

use crate::error::{CdrError, Result};
use crate::settings::{TIMESTAMP_FORMAT, TIMESTAMP_PATTERN};

// ── Timestamp shape ───────────────────────────────────────────────────────────

fn timestamp_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(TIMESTAMP_PATTERN).expect("regex is valid"))
}

// ── Parsing / formatting ──────────────────────────────────────────────────────

/// Parse a `YYYY-MM-DD HH:MM:SS` string into a [`NaiveDateTime`].
///
/// The string must match the fixed shape exactly (zero-padded fields, a single
/// space separator, no fractional seconds or zone suffix) and describe a real
/// calendar instant. Anything else is [`CdrError::InvalidFormat`].
///
/// # Examples
///
/// ```
/// use cdr_core::time_utils::parse_timestamp;
///
/// let ts = parse_timestamp("2024-10-10 13:30:00").unwrap();
/// assert_eq!(ts.to_string(), "2024-10-10 13:30:00");
/// assert!(parse_timestamp("not-a-date").is_err());
/// assert!(parse_timestamp("2024-10-10T13:30:00").is_err());
/// ```
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    if !timestamp_shape().is_match(s) {
        return Err(CdrError::InvalidFormat(s.to_string()));
    }
    let ts = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|_| CdrError::InvalidFormat(s.to_string()))?;
    // chrono encodes a `:60` leap second as an overflowing nanosecond field.
    if ts.nanosecond() >= 1_000_000_000 {
        return Err(CdrError::InvalidFormat(s.to_string()));
    }
    Ok(ts)
}

/// Render a timestamp in the fixed `YYYY-MM-DD HH:MM:SS` form.
///
/// # Examples
///
/// ```
/// use cdr_core::time_utils::{format_timestamp, parse_timestamp};
///
/// let ts = parse_timestamp("2024-01-05 07:01:05").unwrap();
/// assert_eq!(format_timestamp(&ts), "2024-01-05 07:01:05");
/// ```
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse an inclusive `[start, end]` window, failing if either bound is malformed.
///
/// No ordering is enforced between the bounds; an inverted window simply
/// matches nothing.
pub fn parse_time_range(start: &str, end: &str) -> Result<(NaiveDateTime, NaiveDateTime)> {
    Ok((parse_timestamp(start)?, parse_timestamp(end)?))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
