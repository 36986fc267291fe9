//! Row parsing and SQL-building helpers.
//!
//! Timestamps are written as RFC 3339 with microsecond precision and a `Z`
//! suffix, so lexical order in SQL equals chronological order and values
//! round-trip exactly.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::error::DatabaseError;

/// Current time truncated to the precision we store.
#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Format a timestamp for storage.
#[must_use]
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a TEXT column as `DateTime<Utc>`.
///
/// Accepts RFC 3339 and `SQLite`'s `datetime('now')` format.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if neither format matches.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into one of the enumerated core values.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the stored string is not a known variant.
pub fn parse_value<T>(s: &str) -> Result<T, DatabaseError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    s.parse::<T>()
        .map_err(|e| DatabaseError::Query(format!("Bad stored value '{s}': {e}")))
}

/// Read a nullable TEXT column. `None` for SQL NULL and for the empty string.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// `?{start}, ?{start+1}, ...` for an `IN (...)` clause of `count` values.
#[must_use]
pub fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reorder rows fetched by an `IN (...)` query to match the requested id order.
///
/// Ids that did not resolve are skipped.
pub fn order_by_ids<T>(ids: &[String], mut rows: Vec<T>, id_of: impl Fn(&T) -> &str) -> Vec<T> {
    let mut ordered = Vec::with_capacity(rows.len());
    for id in ids {
        if let Some(pos) = rows.iter().position(|r| id_of(r) == id) {
            ordered.push(rows.swap_remove(pos));
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use inbox_core::enums::Action;

    #[test]
    fn timestamp_roundtrip_is_exact() {
        let now = now_utc();
        let parsed = parse_datetime(&format_timestamp(&now)).unwrap();
        assert_eq!(parsed, now);
    }

    #[test]
    fn parses_sqlite_default_format() {
        let dt = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(format_timestamp(&dt), "2026-02-09T14:30:00.000000Z");
    }

    #[test]
    fn parse_value_rejects_unknown() {
        assert_eq!(parse_value::<Action>("ignore").unwrap(), Action::Ignore);
        assert!(parse_value::<Action>("snooze").is_err());
    }

    #[test]
    fn placeholders_are_numbered() {
        assert_eq!(placeholders(1, 3), "?1, ?2, ?3");
        assert_eq!(placeholders(2, 1), "?2");
    }

    #[test]
    fn order_by_ids_follows_request_and_skips_missing() {
        let ids = vec!["b".to_string(), "x".to_string(), "a".to_string()];
        let rows = vec!["a".to_string(), "b".to_string()];
        let ordered = order_by_ids(&ids, rows, String::as_str);
        assert_eq!(ordered, vec!["b".to_string(), "a".to_string()]);
    }
}
