//! `db --info`: file size, schema state and row counts.

use crate::db::categories::count_categories;
use crate::db::chapters::count_chapters;
use crate::db::entries::entry_span;
use crate::db::migrate::{known_versions, pending_versions};
use crate::db::pool::DbPool;
use crate::db::todos::count_todos;
use crate::errors::AppResult;
use crate::ui::messages::{detail, header};
use crate::utils::colors::{GREEN, RESET, YELLOW, or_placeholder};
use chrono::{DateTime, Local};
use std::fs;

/// Stored UTC start time shown in local time; raw text if it does not parse.
fn local_stamp(raw: Option<String>) -> Option<String> {
    raw.map(|s| match DateTime::parse_from_rfc3339(&s) {
        Ok(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => s,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    let conn = &pool.conn;
    header("Database");

    let size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    detail("File", format!("{}{}{}", YELLOW, db_path, RESET));
    detail("Size", format!("{:.2} KB", size as f64 / 1024.0));

    let known = known_versions().len();
    let pending = pending_versions(conn)?.len();
    detail(
        "Schema",
        format!("{}{}/{}{} migrations applied", GREEN, known - pending, known, RESET),
    );

    let (todos, done) = count_todos(conn)?;
    detail("Categories", count_categories(conn)?);
    detail("Todos", format!("{} ({} completed)", todos, done));
    detail("Chapters", count_chapters(conn)?);

    let (entries, first, last) = entry_span(conn)?;
    detail("Entries", entries);
    detail("First entry", or_placeholder(local_stamp(first).as_deref()));
    detail("Last entry", or_placeholder(local_stamp(last).as_deref()));

    println!();
    Ok(())
}
