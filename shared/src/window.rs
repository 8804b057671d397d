//! Query window resolution.
//!
//! The widget may pass `timeMin`/`timeMax` bounds. Anything missing or
//! unparseable falls back to a default range anchored on the current time.

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use tracing::debug;

/// Months looked back when no lower bound is supplied.
pub const DEFAULT_MONTHS_BACK: u32 = 6;

/// Months looked ahead when no upper bound is supplied.
pub const DEFAULT_MONTHS_AHEAD: u32 = 12;

/// The `[start, end)` range used to bound the upstream query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QueryWindow {
    /// Default window: six months back to twelve months ahead of `now`.
    pub fn default_for(now: DateTime<Utc>) -> Self {
        Self {
            start: months_back(now),
            end: months_ahead(now),
        }
    }

    /// Resolve the effective window from optional caller bounds.
    ///
    /// Never fails. A supplied bound that does not parse is treated as absent.
    /// Valid caller bounds are kept as given; only a defaulted bound moves to
    /// keep `start < end`. When both parse but are not ordered, `timeMax` is
    /// dropped and the upper bound defaults from `timeMin`.
    pub fn resolve(raw_min: Option<&str>, raw_max: Option<&str>, now: DateTime<Utc>) -> Self {
        let start = raw_min.and_then(|raw| parse_bound(raw, "timeMin"));
        let end = raw_max.and_then(|raw| parse_bound(raw, "timeMax"));

        let end = match (start, end) {
            (Some(start), Some(end)) if start >= end => {
                debug!("timeMax {} not after timeMin {}, ignoring it", end, start);
                None
            }
            _ => end,
        };

        match (start, end) {
            (Some(start), Some(end)) => Self { start, end },
            (Some(start), None) => {
                let end = months_ahead(now);
                let end = if start < end { end } else { months_ahead(start) };
                Self { start, end }
            }
            (None, Some(end)) => {
                let start = months_back(now);
                let start = if start < end { start } else { months_back(end) };
                Self { start, end }
            }
            (None, None) => Self::default_for(now),
        }
    }

    /// Lower bound as sent upstream (`2024-05-01T00:00:00.000Z`).
    pub fn time_min(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Upper bound as sent upstream.
    pub fn time_max(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

fn months_back(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(DEFAULT_MONTHS_BACK))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn months_ahead(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_add_months(Months::new(DEFAULT_MONTHS_AHEAD))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn parse_bound(raw: &str, name: &str) -> Option<DateTime<Utc>> {
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
        debug!("Ignoring unparseable {} '{}'", name, raw);
    }
    parsed
}

/// Parse an ISO-8601-ish timestamp.
///
/// Accepts RFC 3339, a naive date-time (taken as UTC) or a bare date
/// (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_supplied_bounds_pass_through() {
        let window = QueryWindow::resolve(
            Some("2024-04-28T00:00:00Z"),
            Some("2024-06-09T00:00:00Z"),
            now(),
        );
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 4, 28, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 6, 9, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_offset_bounds_normalised_to_utc() {
        let window = QueryWindow::resolve(
            Some("2024-04-28T00:00:00-04:00"),
            Some("2024-06-09"),
            now(),
        );
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 4, 28, 4, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 6, 9, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_absent_bounds_use_defaults() {
        let window = QueryWindow::resolve(None, None, now());
        assert_eq!(window.start, Utc.with_ymd_and_hms(2023, 11, 15, 12, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 5, 15, 12, 0, 0).unwrap());
        assert_eq!(window, QueryWindow::default_for(now()));
    }

    #[test]
    fn test_malformed_bounds_fall_back_independently() {
        let window = QueryWindow::resolve(Some("last tuesday"), Some("2024-07-01T00:00:00Z"), now());
        assert_eq!(window.start, Utc.with_ymd_and_hms(2023, 11, 15, 12, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap());

        let window = QueryWindow::resolve(Some("2024-05-01"), Some(""), now());
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 5, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_unordered_bounds_keep_time_min() {
        let window = QueryWindow::resolve(
            Some("2024-06-09T00:00:00Z"),
            Some("2024-04-28T00:00:00Z"),
            now(),
        );
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 6, 9, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 5, 15, 12, 0, 0).unwrap());

        let window = QueryWindow::resolve(
            Some("2024-06-01T00:00:00Z"),
            Some("2024-06-01T00:00:00Z"),
            now(),
        );
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert!(window.start < window.end);
    }

    #[test]
    fn test_lone_bound_beyond_default_moves_other_side() {
        let window = QueryWindow::resolve(Some("2026-01-01T00:00:00Z"), None, now());
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap());

        let window = QueryWindow::resolve(None, Some("2023-01-01T00:00:00Z"), now());
        assert_eq!(window.start, Utc.with_ymd_and_hms(2022, 7, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_month_arithmetic_clamps_to_month_end() {
        let now = Utc.with_ymd_and_hms(2024, 8, 31, 9, 30, 0).unwrap();
        let window = QueryWindow::default_for(now);
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 2, 29, 9, 30, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 8, 31, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_upstream_format() {
        let window = QueryWindow::resolve(Some("2024-04-28T00:00:00.5Z"), None, now());
        assert_eq!(window.time_min(), "2024-04-28T00:00:00.500Z");
        assert_eq!(window.time_max(), "2025-05-15T12:00:00.000Z");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-05-01T10:00:00").is_some());
        assert!(parse_timestamp("2024-05-01T10:00").is_some());
        assert!(parse_timestamp(" 2024-05-01 ").is_some());
        assert!(parse_timestamp("2024-13-01").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
