use crate::cli::commands::entry::print_entries;
use crate::config::Config;
use crate::core::category::CategoryLogic;
use crate::core::chapter::ChapterLogic;
use crate::core::entry::EntryLogic;
use crate::core::grid::{DayBreakdown, day_breakdown};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::RESET;
use crate::utils::date::resolve_day;
use crate::utils::formatting::{hex_fg, mins2readable};
use crate::utils::table::pad_display;
use chrono::Local;

/// Width of the 100% share bar.
const SHARE_WIDTH: usize = 30;

pub fn handle(day: &str, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let boundary = cfg.day_ends_at_hour;
    let day = resolve_day(day, &Local::now(), boundary)?;

    let entries = EntryLogic::for_day(&pool.conn, day, &Local, boundary)?;
    let cats = CategoryLogic::list(&pool.conn)?;

    header(day.long_label());

    for ch in ChapterLogic::list(&pool.conn)?.iter().filter(|c| c.contains(day)) {
        println!("{}▍{} {}", hex_fg(&ch.color), RESET, ch.name);
    }

    if entries.is_empty() {
        info("Nothing logged on this day.");
        return Ok(());
    }

    let breakdown = day_breakdown(day, &entries, &cats);
    print!("{}", render_breakdown(&breakdown));
    println!();
    print_entries(&breakdown.entries, &cats, boundary);
    Ok(())
}

/// Per-category share of the day, largest first.
pub fn render_breakdown(b: &DayBreakdown) -> String {
    let name_width = b
        .slices
        .iter()
        .map(|s| unicode_width::UnicodeWidthStr::width(s.category.name.as_str()))
        .max()
        .unwrap_or(0);

    let mut out = format!("Total: {}\n\n", mins2readable(b.total_minutes, false));
    for s in &b.slices {
        let cells = ((s.percent / 100.0) * SHARE_WIDTH as f64).round() as usize;
        out.push_str(&format!(
            "{}{}{} {}  {}  {:>5.1}%  {}{}{}\n",
            hex_fg(&s.category.color),
            s.category.abbreviation,
            RESET,
            pad_display(&s.category.name, name_width),
            mins2readable(s.minutes, true),
            s.percent,
            hex_fg(&s.category.color),
            "█".repeat(cells.min(SHARE_WIDTH)),
            RESET
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::day_boundary::LogicalDayKey;
    use crate::models::category::Category;
    use crate::models::entry::TimeEntry;
    use chrono::{DateTime, Duration, Utc};

    fn entry(cat: &str, start: &str, minutes: i64) -> TimeEntry {
        let start: DateTime<Utc> = start.parse().unwrap();
        TimeEntry {
            id: format!("e-{start}"),
            category_id: cat.into(),
            todo_id: None,
            title: None,
            description: None,
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            duration_minutes: minutes,
        }
    }

    #[test]
    fn breakdown_lists_largest_category_first() {
        let day: LogicalDayKey = "2024-03-01".parse().unwrap();
        let reading = Category {
            id: "cat-read".into(),
            name: "Reading".into(),
            abbreviation: "RD".into(),
            color: "#22c55e".into(),
            is_default: false,
        };
        let cats = vec![Category::wasted_time(), reading];
        let entries = vec![
            entry("cat-wasted", "2024-03-01T09:00:00Z", 30),
            entry("cat-read", "2024-03-01T10:00:00Z", 90),
        ];

        let out = render_breakdown(&day_breakdown(day, &entries, &cats));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Total: 02h 00m");
        assert!(lines[2].contains("Reading"));
        assert!(lines[2].contains("01:30"));
        assert!(lines[2].contains("75.0%"));
        assert!(lines[3].contains("Wasted Time"));
        assert!(lines[3].contains("25.0%"));
    }
}
