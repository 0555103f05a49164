//! The single SQLite connection a command works with.

use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open the database with the schema brought up to date.
    pub fn new(path: impl AsRef<Path>) -> AppResult<Self> {
        let pool = Self::open(path)?;
        run_pending_migrations(&pool.conn)?;
        Ok(pool)
    }

    /// Open the database as is. Callers that report on migrations run
    /// them themselves.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let conn = Connection::open(path)?;
        Self::configure(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory database with the full schema, used by tests.
    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        run_pending_migrations(&conn)?;
        Ok(Self { conn })
    }

    fn configure(conn: &Connection) -> AppResult<()> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    }

    /// Apply pending migrations, returning the versions applied now.
    pub fn migrate(&self) -> AppResult<Vec<&'static str>> {
        run_pending_migrations(&self.conn)
    }
}
