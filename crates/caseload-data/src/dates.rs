//! Date parsing for collaborator export strings.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

/// Parse an ISO-8601 date (or date-time) string into a [`NaiveDate`].
///
/// Accepts `"2024-01-05"`, `"2024-01-05T13:45:00"`, and the space-separated
/// date-time form; any time-of-day component is discarded since the domain
/// works at whole-day granularity. Returns `None` (with a warning) for
/// anything else.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }

    warn!("Could not parse date string \"{}\"", s);
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
