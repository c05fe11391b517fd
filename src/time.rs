use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use tracing_subscriber::fmt::time::FormatTime;

/// Timestamp format used in the per-host metadata files (UTC).
pub const METADATA_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// DateTime format for logging that includes date, time, and timezone (YYYY-MM-DD HH:MM:SS.mmmmmm+00:00)
/// Same as `ChronoLocal::rfc_3339()` but with a custom format
pub struct LocalDateTime;

impl FormatTime for LocalDateTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f%:z"))
    }
}

/// Time format for logging that only includes the time (HH:MM:SS.mmmmmm+00:00)
pub struct LocalTimeOnly;

impl FormatTime for LocalTimeOnly {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.6f%:z"))
    }
}

/// Format an instant for the issue_date / expiration_date files.
pub fn format_metadata(ts: DateTime<Utc>) -> String {
    ts.format(METADATA_TIME_FORMAT).to_string()
}

/// Parse a metadata timestamp back into an instant. Returns None on any
/// deviation from the expected format.
pub fn parse_metadata(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s.trim(), METADATA_TIME_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Local wall-clock timestamp for audit log headers.
pub fn audit_stamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S%.6f%:z")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn metadata_roundtrip() {
        let ts = Utc.with_ymd_and_hms(2026, 8, 30, 12, 34, 56).unwrap();
        let formatted = format_metadata(ts);
        assert_eq!(formatted, "2026-08-30T12:34:56Z");
        assert_eq!(parse_metadata(&formatted), Some(ts));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_metadata("not a timestamp"), None);
        assert_eq!(parse_metadata(""), None);
    }

    #[test]
    fn parse_tolerates_surrounding_whitespace() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_metadata(" 2024-01-02T03:04:05Z\n"), Some(ts));
    }
}
