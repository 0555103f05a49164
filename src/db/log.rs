//! The internal audit log: one row per mutating command.

use crate::db::rows::fmt_utc;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use chrono::Utc;
use rusqlite::Connection;
use rusqlite::params;

/// Write an internal log line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = fmt_utc(&Utc::now());

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Like [`ttlog`], but a failure only produces a warning.
pub fn audit(conn: &Connection, operation: &str, target: &str, message: &str) {
    if let Err(e) = ttlog(conn, operation, target, message) {
        warning(format!("Failed to write internal log: {}", e));
    }
}

/// One row of the internal log.
#[derive(Debug, Clone)]
pub struct LogRow {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

/// Log rows oldest first; with `tail`, only the last `tail` of them.
pub fn load_log(conn: &Connection, tail: Option<usize>) -> AppResult<Vec<LogRow>> {
    let limit = tail.map(|n| n as i64).unwrap_or(-1);
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, target, message FROM (
             SELECT * FROM log ORDER BY id DESC LIMIT ?1
         ) ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([limit], |row| {
        Ok(LogRow {
            id: row.get(0)?,
            date: row.get(1)?,
            operation: row.get(2)?,
            target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            message: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
