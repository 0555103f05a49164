use crate::db::rows::{fmt_utc, parse_opt_utc, parse_utc};
use crate::errors::{AppError, AppResult};
use crate::models::todo::{Priority, TodoItem};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<TodoItem> {
    let raw_priority: u8 = row.get("priority")?;
    let priority = Priority::from_u8(raw_priority).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Integer,
            Box::new(AppError::InvalidPriority(raw_priority)),
        )
    })?;

    let created_at: String = row.get("created_at")?;

    Ok(TodoItem {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        category_id: row.get("category_id")?,
        priority,
        completed: row.get::<_, i64>("completed")? == 1,
        created_at: parse_utc(0, &created_at)?,
        completed_at: parse_opt_utc(0, row.get("completed_at")?)?,
    })
}

/// Priority first (P1 on top), then oldest first.
pub fn load_todos(conn: &Connection) -> AppResult<Vec<TodoItem>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM todos
         ORDER BY priority ASC, created_at ASC",
    )?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_todo(conn: &Connection, id: &str) -> AppResult<Option<TodoItem>> {
    let todo = conn
        .query_row("SELECT * FROM todos WHERE id = ?1", [id], map_row)
        .optional()?;
    Ok(todo)
}

pub fn insert_todo(conn: &Connection, todo: &TodoItem) -> AppResult<()> {
    conn.execute(
        "INSERT INTO todos (id, title, description, category_id, priority, completed, created_at, completed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            todo.id,
            todo.title,
            todo.description,
            todo.category_id,
            todo.priority.as_u8(),
            todo.completed as i64,
            fmt_utc(&todo.created_at),
            todo.completed_at.as_ref().map(fmt_utc),
        ],
    )?;
    Ok(())
}

pub fn update_todo(conn: &Connection, todo: &TodoItem) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE todos
         SET title = ?2, description = ?3, category_id = ?4, priority = ?5,
             completed = ?6, completed_at = ?7
         WHERE id = ?1",
        params![
            todo.id,
            todo.title,
            todo.description,
            todo.category_id,
            todo.priority.as_u8(),
            todo.completed as i64,
            todo.completed_at.as_ref().map(fmt_utc),
        ],
    )?;
    Ok(n)
}

pub fn delete_todo(conn: &Connection, id: &str) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM todos WHERE id = ?1", [id])?;
    Ok(n)
}

/// Point every todo of `from` at `to`. Returns the number of rows moved.
pub fn reassign_category(conn: &Connection, from: &str, to: &str) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE todos SET category_id = ?2 WHERE category_id = ?1",
        params![from, to],
    )?;
    Ok(n)
}

pub fn count_todos(conn: &Connection) -> AppResult<(usize, usize)> {
    let (total, done): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(completed), 0) FROM todos",
        [],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    Ok((total as usize, done as usize))
}
