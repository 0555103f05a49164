use crate::db::rows::{fmt_utc, parse_utc};
use crate::errors::AppResult;
use crate::models::entry::TimeEntry;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<TimeEntry> {
    let start: String = row.get("start_time")?;
    let end: String = row.get("end_time")?;

    Ok(TimeEntry {
        id: row.get("id")?,
        category_id: row.get("category_id")?,
        todo_id: row.get("todo_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        start_time: parse_utc(0, &start)?,
        end_time: parse_utc(0, &end)?,
        duration_minutes: row.get("duration_minutes")?,
    })
}

fn collect(conn: &Connection, sql: &str, args: impl rusqlite::Params) -> AppResult<Vec<TimeEntry>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_all_entries(conn: &Connection) -> AppResult<Vec<TimeEntry>> {
    collect(conn, "SELECT * FROM entries ORDER BY start_time ASC", [])
}

/// Entries whose start lies in `[from, to)`.
pub fn load_entries_between(
    conn: &Connection,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> AppResult<Vec<TimeEntry>> {
    collect(
        conn,
        "SELECT * FROM entries
         WHERE start_time >= ?1 AND start_time < ?2
         ORDER BY start_time ASC",
        params![fmt_utc(from), fmt_utc(to)],
    )
}

pub fn load_entries_by_category(conn: &Connection, category_id: &str) -> AppResult<Vec<TimeEntry>> {
    collect(
        conn,
        "SELECT * FROM entries WHERE category_id = ?1 ORDER BY start_time ASC",
        [category_id],
    )
}

pub fn get_entry(conn: &Connection, id: &str) -> AppResult<Option<TimeEntry>> {
    let entry = conn
        .query_row("SELECT * FROM entries WHERE id = ?1", [id], map_row)
        .optional()?;
    Ok(entry)
}

pub fn insert_entry(conn: &Connection, e: &TimeEntry) -> AppResult<()> {
    conn.execute(
        "INSERT INTO entries (id, category_id, todo_id, title, description, start_time, end_time, duration_minutes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            e.id,
            e.category_id,
            e.todo_id,
            e.title,
            e.description,
            fmt_utc(&e.start_time),
            fmt_utc(&e.end_time),
            e.duration_minutes,
        ],
    )?;
    Ok(())
}

pub fn update_entry(conn: &Connection, e: &TimeEntry) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE entries
         SET category_id = ?2, todo_id = ?3, title = ?4, description = ?5,
             start_time = ?6, end_time = ?7, duration_minutes = ?8
         WHERE id = ?1",
        params![
            e.id,
            e.category_id,
            e.todo_id,
            e.title,
            e.description,
            fmt_utc(&e.start_time),
            fmt_utc(&e.end_time),
            e.duration_minutes,
        ],
    )?;
    Ok(n)
}

pub fn delete_entry(conn: &Connection, id: &str) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM entries WHERE id = ?1", [id])?;
    Ok(n)
}

pub fn reassign_category(conn: &Connection, from: &str, to: &str) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE entries SET category_id = ?2 WHERE category_id = ?1",
        params![from, to],
    )?;
    Ok(n)
}

/// Total count plus the first and last start instants.
pub fn entry_span(conn: &Connection) -> AppResult<(usize, Option<String>, Option<String>)> {
    let row = conn.query_row(
        "SELECT COUNT(*), MIN(start_time), MAX(start_time) FROM entries",
        [],
        |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, Option<String>>(1)?,
                r.get::<_, Option<String>>(2)?,
            ))
        },
    )?;
    Ok((row.0 as usize, row.1, row.2))
}
