//! Conversions between SQLite TEXT columns and chrono values.

use crate::core::day_boundary::LogicalDayKey;
use crate::errors::AppError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;

/// Instants are stored as UTC RFC 3339 with milliseconds
/// (`2024-01-01T09:00:00.000Z`), which sorts correctly as text.
pub fn fmt_utc(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_utc(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                Type::Text,
                Box::new(AppError::InvalidDate(raw.to_string())),
            )
        })
}

pub fn parse_opt_utc(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    raw.map(|s| parse_utc(idx, &s)).transpose()
}

pub fn parse_day(idx: usize, raw: &str) -> rusqlite::Result<LogicalDayKey> {
    raw.parse::<LogicalDayKey>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
    })
}
