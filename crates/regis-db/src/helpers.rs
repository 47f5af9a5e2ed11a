//! Row-to-entity parsing helpers.
//!
//! Every gateway converts `libsql::Row` (column-indexed) into typed entity
//! structs, and builds `libsql::Value` parameter lists from optional fields.
//! These helpers isolate that conversion.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00.123Z"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Format a timestamp for storage: RFC 3339, UTC, millisecond precision.
///
/// Fixed width, so lexical order in SQL matches chronological order.
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an optional `YYYY-MM-DD` column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not a date.
pub fn parse_optional_date(s: Option<&str>) -> Result<Option<NaiveDate>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| DatabaseError::Query(format!("Failed to parse date '{s}': {e}"))),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with the regis-core enums that serialize as their symbolic names.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
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

/// Read a required INTEGER column that holds a 32-bit value.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the stored value is out of range.
pub fn get_i32(row: &libsql::Row, idx: i32) -> Result<i32, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    i32::try_from(raw)
        .map_err(|_| DatabaseError::InvalidState(format!("column {idx} out of range: {raw}")))
}

/// Read a nullable INTEGER column that holds a 32-bit value.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the stored value is out of range.
pub fn get_opt_i32(row: &libsql::Row, idx: i32) -> Result<Option<i32>, DatabaseError> {
    row.get::<Option<i64>>(idx)?
        .map(|raw| {
            i32::try_from(raw).map_err(|_| {
                DatabaseError::InvalidState(format!("column {idx} out of range: {raw}"))
            })
        })
        .transpose()
}

/// Read a nullable INTEGER column holding `0`/`1`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_bool(row: &libsql::Row, idx: i32) -> Result<Option<bool>, DatabaseError> {
    Ok(row.get::<Option<i64>>(idx)?.map(|v| v != 0))
}

// ---------------------------------------------------------------------------
// Parameter values
// ---------------------------------------------------------------------------

pub fn text(s: &str) -> libsql::Value {
    libsql::Value::Text(s.to_string())
}

pub fn opt_text(s: Option<&str>) -> libsql::Value {
    s.map_or(libsql::Value::Null, text)
}

pub fn opt_id(id: Option<i64>) -> libsql::Value {
    id.map_or(libsql::Value::Null, libsql::Value::Integer)
}

pub fn opt_int(v: Option<i32>) -> libsql::Value {
    v.map_or(libsql::Value::Null, |v| libsql::Value::Integer(i64::from(v)))
}

pub fn opt_real(v: Option<f64>) -> libsql::Value {
    v.map_or(libsql::Value::Null, libsql::Value::Real)
}

pub fn bool_int(v: bool) -> libsql::Value {
    libsql::Value::Integer(i64::from(v))
}

pub fn opt_bool(v: Option<bool>) -> libsql::Value {
    v.map_or(libsql::Value::Null, bool_int)
}

pub fn opt_date(v: Option<NaiveDate>) -> libsql::Value {
    v.map_or(libsql::Value::Null, |d| {
        libsql::Value::Text(d.format("%Y-%m-%d").to_string())
    })
}

/// Whether a libSQL error is a UNIQUE constraint violation.
#[must_use]
pub fn is_unique_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("UNIQUE constraint failed")
}
