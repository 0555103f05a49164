//! The error type shared by every layer above the pure core.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid priority: {0} (expected 1, 2 or 3)")]
    InvalidPriority(u8),

    #[error("Invalid color: {0} (expected #rrggbb)")]
    InvalidColor(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Todo not found: {0}")]
    TodoNotFound(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Chapter not found: {0}")]
    ChapterNotFound(String),

    #[error("The default category '{0}' cannot be deleted")]
    DefaultCategory(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot read configuration {}: {source}", path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("Cannot tell the export format of '{0}' (use --format csv|json)")]
    InvalidExportFormat(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Internal error: {0}")]
    Other(String),
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
