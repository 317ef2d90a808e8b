//! Row-to-entity parsing helpers.
//!
//! Portal tables are loosely typed: titles and names may be NULL, dates are
//! stored as TEXT in several formats. These helpers isolate that parsing so
//! the snapshot loader stays focused on which columns it reads.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::DatabaseError;

/// Parse a TEXT date column as a calendar date.
///
/// Accepts a plain date (`"2024-03-05"`), RFC 3339 (`"2024-03-05T10:00:00+09:00"`),
/// and `SQLite`'s default datetime format (`"2024-03-05 10:00:00"`). For values
/// carrying an offset the local calendar date is kept, not the UTC one.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string matches none of the formats.
pub fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.date())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse date '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
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

/// Read a nullable TEXT column, mapping NULL to the empty string.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_string_or_empty(row: &libsql::Row, idx: i32) -> Result<String, DatabaseError> {
    Ok(get_opt_string(row, idx)?.unwrap_or_default())
}
