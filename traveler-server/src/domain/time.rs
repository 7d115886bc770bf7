//! Navitia compact datetime handling.
//!
//! The journeys API exchanges datetimes as `YYYYMMDDTHHMMSS` strings in
//! the local time of the coverage region. This module parses and formats
//! that representation.

use chrono::NaiveDateTime;

/// Error returned when parsing an invalid compact datetime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid datetime: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

const COMPACT_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Parse a compact `YYYYMMDDTHHMMSS` datetime string.
///
/// # Examples
///
/// ```
/// use traveler_server::domain::parse_compact;
///
/// let dt = parse_compact("20260829T143000").unwrap();
/// assert_eq!(dt.to_string(), "2026-08-29 14:30:00");
///
/// assert!(parse_compact("2026-08-29T14:30:00").is_err());
/// assert!(parse_compact("20260829").is_err());
/// ```
pub fn parse_compact(s: &str) -> Result<NaiveDateTime, TimeError> {
    if s.len() != 15 {
        return Err(TimeError {
            reason: "expected 15 characters (YYYYMMDDTHHMMSS)",
        });
    }

    NaiveDateTime::parse_from_str(s, COMPACT_FORMAT).map_err(|_| TimeError {
        reason: "expected YYYYMMDDTHHMMSS",
    })
}

/// Format a datetime in the compact `YYYYMMDDTHHMMSS` form used in queries.
pub fn format_compact(dt: NaiveDateTime) -> String {
    dt.format(COMPACT_FORMAT).to_string()
}
