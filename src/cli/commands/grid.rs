use crate::config::Config;
use crate::core::chapter::ChapterLogic;
use crate::core::day_boundary::{LogicalDayKey, day_range, days_between, logical_today};
use crate::core::entry::EntryLogic;
use crate::core::category::CategoryLogic;
use crate::core::grid::{Grid, MAX_GRID_DAYS};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::utils::colors::{GREY, RESET};
use crate::utils::date::parse_period;
use crate::utils::formatting::{hex_fg, hours_label};
use chrono::Local;
use std::collections::HashMap;

/// Width of a full bar in terminal columns.
const BAR_WIDTH: usize = 48;

pub fn handle(period: &Option<String>, days: &Option<u32>, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let boundary = cfg.day_ends_at_hour;

    let (first, last) = match period {
        Some(p) => parse_period(p)?,
        None => {
            let n = days.unwrap_or(cfg.grid_days);
            if n == 0 {
                return Err(AppError::InvalidInput("--days must be at least 1".into()));
            }
            if n > MAX_GRID_DAYS {
                return Err(AppError::InvalidInput(format!(
                    "--days must be at most {MAX_GRID_DAYS}"
                )));
            }
            let today = logical_today(&Local::now(), boundary);
            let mut first = today;
            for _ in 1..n {
                first = first.pred();
            }
            (first, today)
        }
    };

    if days_between(first, last) > i64::from(MAX_GRID_DAYS) {
        return Err(AppError::InvalidPeriod(format!(
            "{first}:{last} spans more than {MAX_GRID_DAYS} days"
        )));
    }

    let keys = day_range(first, last);
    let entries = EntryLogic::in_range(&pool.conn, first, last, &Local, boundary)?;
    let chapters = ChapterLogic::list(&pool.conn)?;
    let cats = CategoryLogic::list(&pool.conn)?;

    let grid = Grid::build(&keys, &entries, &chapters, &Local, boundary, cfg.hours_per_day);
    print!("{}", render(&grid, &cats, &cfg.separator_char));
    Ok(())
}

fn cells_for(minutes: i64, max_hours: u32) -> usize {
    if max_hours == 0 {
        return 0;
    }
    let cells = minutes as f64 / (f64::from(max_hours) * 60.0) * BAR_WIDTH as f64;
    (cells.round() as usize).min(BAR_WIDTH)
}

fn row_label(day: LogicalDayKey) -> String {
    day.date().format("%a %Y-%m-%d").to_string()
}

/// Text histogram: one row per logical day, bars stacked by entry in start
/// order and colored by category, the daily target marked with `┆`.
pub fn render(grid: &Grid, categories: &[Category], separator: &str) -> String {
    let colors: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.color.as_str()))
        .collect();
    let target_col = cells_for(i64::from(grid.hours_per_day) * 60, grid.max_hours_display);

    let sep_char = separator.chars().next().unwrap_or('-');
    let label_width = 14;
    let mut out = String::new();

    out.push_str(&format!(
        "{:<label_width$} 0h{:>width$}\n",
        "",
        format!("{}h", grid.max_hours_display),
        width = BAR_WIDTH - 1,
    ));
    out.push_str(&sep_char.to_string().repeat(label_width + 2 + BAR_WIDTH + 8));
    out.push('\n');

    for (col, column) in grid.columns.iter().enumerate() {
        let mut bar = String::new();
        let mut drawn = 0usize;
        let mut cumulative = 0i64;

        for e in &column.entries {
            cumulative += e.duration_minutes;
            let upto = cells_for(cumulative, grid.max_hours_display);
            if upto > drawn {
                let color = colors.get(e.category_id.as_str()).copied().unwrap_or("");
                bar.push_str(&hex_fg(color));
                bar.push_str(&"█".repeat(upto - drawn));
                bar.push_str(RESET);
                drawn = upto;
            }
        }

        for i in drawn..BAR_WIDTH {
            if i == target_col {
                bar.push('┆');
            } else {
                bar.push(' ');
            }
        }

        let total = if column.total_minutes > 0 {
            hours_label(column.total_minutes)
        } else {
            format!("{}·{}", GREY, RESET)
        };

        let chapters: Vec<String> = grid
            .chapters_at(col)
            .map(|ch| format!("{}▍{}{}", hex_fg(&ch.color), RESET, ch.name))
            .collect();

        out.push_str(&format!(
            "{:<label_width$} │{}│ {:>5}",
            row_label(column.day),
            bar,
            total
        ));
        if !chapters.is_empty() {
            out.push_str("  ");
            out.push_str(&chapters.join(" "));
        }
        out.push('\n');
    }

    let legend: Vec<String> = categories
        .iter()
        .map(|c| format!("{}█{} {}", hex_fg(&c.color), RESET, c.abbreviation))
        .collect();
    out.push('\n');
    out.push_str(&legend.join("  "));
    out.push('\n');

    out
}
