use crate::db::rows::{fmt_utc, parse_day, parse_utc};
use crate::errors::AppResult;
use crate::models::chapter::Chapter;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<Chapter> {
    let start: String = row.get("start_date")?;
    let end: String = row.get("end_date")?;
    let created: String = row.get("created_at")?;
    let tasks_raw: String = row.get("tasks")?;

    let tasks: Vec<String> = serde_json::from_str(&tasks_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Chapter {
        id: row.get("id")?,
        name: row.get("name")?,
        start_date: parse_day(0, &start)?,
        end_date: parse_day(0, &end)?,
        color: row.get("color")?,
        description: row.get("description")?,
        tasks,
        created_at: parse_utc(0, &created)?,
    })
}

pub fn load_chapters(conn: &Connection) -> AppResult<Vec<Chapter>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM chapters
         ORDER BY start_date ASC, created_at ASC",
    )?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_chapter(conn: &Connection, id: &str) -> AppResult<Option<Chapter>> {
    let ch = conn
        .query_row("SELECT * FROM chapters WHERE id = ?1", [id], map_row)
        .optional()?;
    Ok(ch)
}

pub fn insert_chapter(conn: &Connection, ch: &Chapter) -> AppResult<()> {
    conn.execute(
        "INSERT INTO chapters (id, name, start_date, end_date, color, description, tasks, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            ch.id,
            ch.name,
            ch.start_date.to_string(),
            ch.end_date.to_string(),
            ch.color,
            ch.description,
            serde_json::to_string(&ch.tasks)?,
            fmt_utc(&ch.created_at),
        ],
    )?;
    Ok(())
}

pub fn update_chapter(conn: &Connection, ch: &Chapter) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE chapters
         SET name = ?2, start_date = ?3, end_date = ?4, color = ?5, description = ?6, tasks = ?7
         WHERE id = ?1",
        params![
            ch.id,
            ch.name,
            ch.start_date.to_string(),
            ch.end_date.to_string(),
            ch.color,
            ch.description,
            serde_json::to_string(&ch.tasks)?,
        ],
    )?;
    Ok(n)
}

pub fn delete_chapter(conn: &Connection, id: &str) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM chapters WHERE id = ?1", [id])?;
    Ok(n)
}

pub fn count_chapters(conn: &Connection) -> AppResult<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM chapters", [], |r| r.get(0))?;
    Ok(n as usize)
}
