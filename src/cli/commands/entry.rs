use crate::cli::parser::EntryAction;
use crate::config::Config;
use crate::core::category::CategoryLogic;
use crate::core::day_boundary::logical_today;
use crate::core::entry::{EntryLength, EntryLogic, EntryPatch, NewEntry};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::models::category::Category;
use crate::models::entry::TimeEntry;
use crate::ui::messages::{info, success};
use crate::utils::date::{parse_period, resolve_day};
use crate::utils::formatting::mins2readable;
use crate::utils::table::Table;
use crate::utils::time::{parse_optional_time, parse_required_time};
use chrono::Local;

pub fn handle(action: &EntryAction, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::new(&cfg.database)?;
    let boundary = cfg.day_ends_at_hour;
    let now = Local::now();

    match action {
        EntryAction::Add {
            day,
            start,
            end,
            hours,
            category,
            title,
            description,
        } => {
            let day = resolve_day(day, &now, boundary)?;
            let start = parse_required_time(start)?;
            let length = match parse_optional_time(end.as_ref())? {
                Some(end) => EntryLength::Until(end),
                None => EntryLength::Hours(hours.unwrap_or(1.0)),
            };

            let entry = EntryLogic::add(
                &pool.conn,
                NewEntry {
                    day,
                    start,
                    length,
                    category_id: category.clone(),
                    title: title.clone(),
                    description: description.clone(),
                },
                &Local,
                boundary,
            )?;
            success(format!(
                "Entry added on {}: {} ({})",
                day,
                mins2readable(entry.duration_minutes, false),
                entry.id
            ));
        }

        EntryAction::Edit {
            id,
            day,
            start,
            end,
            category,
            title,
            description,
        } => {
            let patch = EntryPatch {
                day: day.as_deref().map(|d| resolve_day(d, &now, boundary)).transpose()?,
                start: parse_optional_time(start.as_ref())?,
                end: parse_optional_time(end.as_ref())?,
                category_id: category.clone(),
                title: title.clone(),
                description: description.clone(),
            };
            let entry = EntryLogic::edit(&pool.conn, id, patch, &Local, boundary)?;
            success(format!(
                "Entry updated: {} ({})",
                entry.id,
                mins2readable(entry.duration_minutes, false)
            ));
        }

        EntryAction::Del { id } => {
            let entry = EntryLogic::delete(&pool.conn, id)?;
            success(format!("Entry deleted: {}", entry.id));
        }

        EntryAction::List {
            day,
            period,
            category,
        } => {
            let (first, last) = match (day, period) {
                (Some(d), _) => {
                    let d = resolve_day(d, &now, boundary)?;
                    (d, d)
                }
                (None, Some(p)) => parse_period(p)?,
                (None, None) => {
                    let today = logical_today(&now, boundary);
                    (today, today)
                }
            };

            let mut entries = EntryLogic::in_range(&pool.conn, first, last, &Local, boundary)?;
            if let Some(c) = category {
                CategoryLogic::require(&pool.conn, c)?;
                entries.retain(|e| &e.category_id == c);
            }

            if entries.is_empty() {
                info("No entries for the selected period.");
                return Ok(());
            }

            let cats = CategoryLogic::list(&pool.conn)?;
            print_entries(&entries, &cats, boundary);
        }

        EntryAction::Export {
            format,
            file,
            period,
            force,
        } => {
            ExportLogic::export(&mut pool, *format, file, period.as_deref(), boundary, *force)?;
        }
    }

    Ok(())
}

pub(crate) fn print_entries(entries: &[TimeEntry], cats: &[Category], boundary: u32) {
    let mut table = Table::new(["ID", "DAY", "START", "END", "DURATION", "CAT", "TITLE"]);
    let mut total = 0;

    for e in entries {
        let abbr = cats
            .iter()
            .find(|c| c.id == e.category_id)
            .map(|c| c.abbreviation.clone())
            .unwrap_or_else(|| "?".to_string());
        table.add_row(vec![
            e.id.clone(),
            e.logical_day(boundary).to_string(),
            e.start_local().format("%H:%M").to_string(),
            e.end_local().format("%H:%M").to_string(),
            mins2readable(e.duration_minutes, true),
            abbr,
            e.title.clone().unwrap_or_default(),
        ]);
        total += e.duration_minutes;
    }

    print!("{}", table.render());
    println!("Total: {}", mins2readable(total, false));
}
