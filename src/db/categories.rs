use crate::db::rows::fmt_utc;
use crate::errors::AppResult;
use crate::models::category::Category;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
        abbreviation: row.get("abbreviation")?,
        color: row.get("color")?,
        is_default: row.get::<_, i64>("is_default")? == 1,
    })
}

/// Default categories first, then in creation order.
pub fn load_categories(conn: &Connection) -> AppResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM categories
         ORDER BY is_default DESC, created_at ASC, name ASC",
    )?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_category(conn: &Connection, id: &str) -> AppResult<Option<Category>> {
    let cat = conn
        .query_row("SELECT * FROM categories WHERE id = ?1", [id], map_row)
        .optional()?;
    Ok(cat)
}

pub fn insert_category(conn: &Connection, cat: &Category) -> AppResult<()> {
    conn.execute(
        "INSERT INTO categories (id, name, abbreviation, color, is_default, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            cat.id,
            cat.name,
            cat.abbreviation,
            cat.color,
            cat.is_default as i64,
            fmt_utc(&Utc::now())
        ],
    )?;
    Ok(())
}

pub fn update_category(conn: &Connection, cat: &Category) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE categories SET name = ?2, abbreviation = ?3, color = ?4 WHERE id = ?1",
        params![cat.id, cat.name, cat.abbreviation, cat.color],
    )?;
    Ok(n)
}

pub fn delete_category(conn: &Connection, id: &str) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM categories WHERE id = ?1", [id])?;
    Ok(n)
}

pub fn count_categories(conn: &Connection) -> AppResult<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    Ok(n as usize)
}
