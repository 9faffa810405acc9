//! HTTP cache validation module
//!
//! `Last-Modified` generation and `If-Modified-Since` evaluation. Only
//! whole seconds are compared since HTTP-dates carry no sub-second part.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::time::SystemTime;

/// Format a timestamp as an HTTP-date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    let utc: DateTime<Utc> = time.into();
    utc.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Obsolete HTTP-date layouts recipients still have to accept.
/// Two-digit RFC 850 years are tried before four-digit ones.
const OBSOLETE_DATE_FORMATS: [&str; 3] = [
    "%A, %d-%b-%y %H:%M:%S GMT",
    "%A, %d-%b-%Y %H:%M:%S GMT",
    "%a %b %d %H:%M:%S %Y",
];

/// Parse an HTTP-date header value. Returns `None` for anything malformed.
///
/// Accepts IMF-fixdate, RFC 850 (`Sunday, 06-Nov-94 08:49:37 GMT`) and
/// asctime (`Sun Nov  6 08:49:37 1994`).
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(value.trim()) {
        return Some(dt.with_timezone(&Utc));
    }

    // asctime pads single-digit days with a space
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
    OBSOLETE_DATE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(&normalized, format)
            .ok()
            .map(|naive| naive.and_utc())
    })
}

/// Decide whether a conditional GET can be answered with 304
///
/// `If-None-Match` takes precedence over `If-Modified-Since`; since no
/// entity tags are issued, its presence simply disables the date check.
///
/// # Arguments
/// * `if_modified_since` - Client-sent If-Modified-Since header
/// * `has_if_none_match` - Whether the request carried If-None-Match
/// * `modified` - File modification time
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
    modified: SystemTime,
) -> bool {
    if has_if_none_match {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };

    let modified: DateTime<Utc> = modified.into();
    modified.timestamp() <= since.timestamp()
}
