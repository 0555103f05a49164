use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, Result};

/// A schema step. Applied steps are marked in the `log` table with
/// operation `migration_applied` and the version as target.
struct Migration {
    version: &'static str,
    message: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20240101_0001_categories",
        message: "Created categories table with the default category",
        sql: r#"
        CREATE TABLE IF NOT EXISTS categories (
            id           TEXT PRIMARY KEY,
            name         TEXT NOT NULL,
            abbreviation TEXT NOT NULL,
            color        TEXT NOT NULL,
            is_default   INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL
        );

        INSERT OR IGNORE INTO categories (id, name, abbreviation, color, is_default, created_at)
        VALUES ('cat-wasted', 'Wasted Time', 'WT', '#6b7280', 1, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'));
        "#,
    },
    Migration {
        version: "20240101_0002_todos",
        message: "Created todos table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS todos (
            id           TEXT PRIMARY KEY,
            title        TEXT NOT NULL,
            description  TEXT,
            category_id  TEXT NOT NULL,
            priority     INTEGER NOT NULL DEFAULT 2 CHECK(priority IN (1,2,3)),
            completed    INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL,
            completed_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_todos_order ON todos(priority, created_at);
        "#,
    },
    Migration {
        version: "20240101_0003_entries",
        message: "Created entries table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS entries (
            id               TEXT PRIMARY KEY,
            category_id      TEXT NOT NULL,
            todo_id          TEXT,
            title            TEXT,
            description      TEXT,
            start_time       TEXT NOT NULL,
            end_time         TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL CHECK(duration_minutes >= 1)
        );

        CREATE INDEX IF NOT EXISTS idx_entries_start ON entries(start_time);
        CREATE INDEX IF NOT EXISTS idx_entries_category ON entries(category_id);
        "#,
    },
    Migration {
        version: "20240101_0004_chapters",
        message: "Created chapters table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS chapters (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            start_date  TEXT NOT NULL,
            end_date    TEXT NOT NULL,
            color       TEXT NOT NULL,
            description TEXT,
            tasks       TEXT NOT NULL DEFAULT '[]',
            created_at  TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20240101_0005_kv_store",
        message: "Created kv_store table for timer and queue state",
        sql: r#"
        CREATE TABLE IF NOT EXISTS kv_store (
            key        TEXT PRIMARY KEY,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.message],
    )?;
    tx.commit()
}

/// Versions known to this build, oldest first.
pub fn known_versions() -> Vec<&'static str> {
    MIGRATIONS.iter().map(|m| m.version).collect()
}

/// Versions not yet recorded as applied.
pub fn pending_versions(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Silent; returns the versions applied by this call so callers such as
/// `init` and `db --migrate` can report them.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m).map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;
        applied.push(m.version);
    }

    Ok(applied)
}
