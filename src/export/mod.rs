//! Entry export to CSV or JSON.

mod fs_utils;
mod json_csv;
pub mod logic;
mod model;

pub use logic::ExportLogic;
pub use model::EntryExport;

use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

pub(crate) fn notify_export_success(label: &str, rows: usize, path: &Path) {
    success(format!("{label} export completed: {rows} entries to {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// The explicit format, else the one named by the file extension.
    pub fn resolve(explicit: Option<ExportFormat>, path: &Path) -> AppResult<Self> {
        if let Some(f) = explicit {
            return Ok(f);
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("csv") => Ok(ExportFormat::Csv),
            Some("json") => Ok(ExportFormat::Json),
            _ => Err(AppError::InvalidExportFormat(path.display().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_comes_from_the_extension_unless_given() {
        let p = Path::new("/tmp/out.JSON");
        assert_eq!(ExportFormat::resolve(None, p).unwrap(), ExportFormat::Json);
        assert_eq!(
            ExportFormat::resolve(Some(ExportFormat::Csv), p).unwrap(),
            ExportFormat::Csv
        );
        assert_eq!(
            ExportFormat::resolve(None, Path::new("/tmp/out.csv")).unwrap(),
            ExportFormat::Csv
        );
        assert!(ExportFormat::resolve(None, Path::new("/tmp/out.xlsx")).is_err());
        assert!(ExportFormat::resolve(None, Path::new("/tmp/out")).is_err());
    }
}
