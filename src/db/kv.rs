//! Key/value blobs: the persisted timer record and the task queue.

use crate::core::queue::{self, Queue};
use crate::core::timer::{self, PersistedTimer, TimerStore};
use crate::db::rows::fmt_utc;
use crate::errors::AppResult;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

pub fn kv_get(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |r| {
            r.get::<_, String>(0)
        })
        .optional()?;
    Ok(value)
}

pub fn kv_set(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, fmt_utc(&Utc::now())],
    )?;
    Ok(())
}

/// Timer persistence backed by the `kv_store` table.
pub struct SqliteTimerStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteTimerStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl TimerStore for SqliteTimerStore<'_> {
    fn load(&mut self) -> AppResult<Option<PersistedTimer>> {
        match kv_get(self.conn, timer::STORAGE_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, record: &PersistedTimer) -> AppResult<()> {
        let raw = serde_json::to_string(record)?;
        kv_set(self.conn, timer::STORAGE_KEY, &raw)
    }
}

pub fn load_queue(conn: &Connection) -> AppResult<Queue> {
    match kv_get(conn, queue::STORAGE_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Queue::new()),
    }
}

pub fn save_queue(conn: &Connection, q: &Queue) -> AppResult<()> {
    let raw = serde_json::to_string(q)?;
    kv_set(conn, queue::STORAGE_KEY, &raw)
}
