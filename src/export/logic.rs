use crate::core::category::CategoryLogic;
use crate::core::entry::EntryLogic;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::EntryExport;
use crate::ui::messages::warning;
use crate::utils::date::parse_period;
use crate::utils::path::expand_tilde;
use chrono::Local;

pub struct ExportLogic;

impl ExportLogic {
    /// Export time entries.
    ///
    /// - `format`: `None` to take it from the file extension
    /// - `file`: absolute output path
    /// - `period`: `None` for everything, otherwise a period expression
    ///   (`YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `START:END`) over logical days
    pub fn export(
        pool: &mut DbPool,
        format: Option<ExportFormat>,
        file: &str,
        period: Option<&str>,
        boundary_hour: u32,
        force: bool,
    ) -> AppResult<usize> {
        let path = expand_tilde(file);
        let path = path.as_path();
        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        let format = ExportFormat::resolve(format, path)?;
        ensure_writable(path, force)?;

        let entries = match period {
            None => EntryLogic::all(&pool.conn)?,
            Some(p) => {
                let (first, last) = parse_period(p)?;
                EntryLogic::in_range(&pool.conn, first, last, &Local, boundary_hour)?
            }
        };

        if entries.is_empty() {
            warning("No entries found for the selected period. Nothing to export.");
            return Ok(0);
        }

        let categories = CategoryLogic::list(&pool.conn)?;
        let rows: Vec<EntryExport> = entries
            .iter()
            .map(|e| EntryExport::from_entry(e, &categories, &Local, boundary_hour))
            .collect();

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        audit(
            &pool.conn,
            "export",
            format.as_str(),
            &format!("{} entries to {}", rows.len(), path.display()),
        );

        Ok(rows.len())
    }
}
