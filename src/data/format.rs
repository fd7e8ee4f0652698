//! Display formatting helpers.
//!
//! Date formatters never fail: values that cannot be parsed render as a
//! placeholder string.

use std::time::Duration;

use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub const INVALID_DATE: &str = "Invalid date";
pub const INVALID_TIME: &str = "Invalid time";

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `YYYY-MM-DD HH:MM:SS` in UTC, or [`INVALID_DATE`].
pub fn format_date_safely(value: &str) -> String {
    match parse_timestamp(value) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// `HH:MM:SS` in UTC, or [`INVALID_TIME`].
pub fn format_time_safely(value: &str) -> String {
    match parse_timestamp(value) {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => INVALID_TIME.to_string(),
    }
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Suffix to milliseconds multiplier (longer suffixes first)
const UNITS: &[(&str, f64)] = &[("ms", 1.0), ("s", 1_000.0), ("m", 60_000.0)];

/// Parse duration strings like "1s", "500ms", "1.5s" or a bare millisecond count.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    if let Ok(ms) = s.parse::<u64>() {
        return Ok(Duration::from_millis(ms));
    }

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.trim().parse()?;
            if val < 0.0 || !val.is_finite() {
                bail!("Duration must be a non-negative number: {}", s);
            }
            return Ok(Duration::from_millis((val * multiplier).round() as u64));
        }
    }

    bail!("Unknown duration format: {}", s)
}

/// Format a duration for display
pub fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();
    if millis < 1_000 {
        format!("{}ms", millis)
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

/// Truncate a string to `max` characters, appending an ellipsis if cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max <= 1 {
        "…".chars().take(max).collect()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_rfc3339() {
        assert_eq!(format_date_safely("2024-03-20T10:30:05Z"), "2024-03-20 10:30:05");
        assert_eq!(format_time_safely("2024-03-20T10:30:05Z"), "10:30:05");
    }

    #[test]
    fn test_format_date_offset_is_normalized() {
        assert_eq!(format_date_safely("2024-03-20T12:30:05+02:00"), "2024-03-20 10:30:05");
    }

    #[test]
    fn test_format_bare_date() {
        assert_eq!(format_date_safely("2024-03-20"), "2024-03-20 00:00:00");
        assert_eq!(format_time_safely("2024-03-20"), "00:00:00");
    }

    #[test]
    fn test_invalid_placeholders() {
        assert_eq!(format_date_safely("yesterday"), INVALID_DATE);
        assert_eq!(format_time_safely(""), INVALID_TIME);
        assert_eq!(format_date_safely("2024-13-45"), INVALID_DATE);
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1_500));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("250").unwrap(), Duration::from_millis(250));
        assert!(parse_duration("fast").is_err());
        assert!(parse_duration("-1s").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(800)), "800ms");
        assert_eq!(format_duration(Duration::from_millis(2_000)), "2.0s");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234), "1.2K");
        assert_eq!(format_count(1_234_567), "1.2M");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 6), "hello…");
    }
}
