//! Histogram model: entries bucketed by logical day, per-day category
//! breakdowns and the chapter lines drawn under the columns.

use crate::core::day_boundary::LogicalDayKey;
use crate::models::category::Category;
use crate::models::chapter::Chapter;
use crate::models::entry::TimeEntry;
use chrono::TimeZone;
use std::collections::{BTreeMap, HashMap};

/// Most logical days a grid shows at once.
pub const MAX_GRID_DAYS: u32 = 366;

/// Entries grouped by the logical day of their start time in `tz`.
/// Each bucket is sorted by start time.
pub fn bucket_by_day<Tz: TimeZone>(
    entries: &[TimeEntry],
    tz: &Tz,
    boundary_hour: u32,
) -> BTreeMap<LogicalDayKey, Vec<TimeEntry>> {
    let mut map: BTreeMap<LogicalDayKey, Vec<TimeEntry>> = BTreeMap::new();
    for e in entries {
        map.entry(e.logical_day_in(tz, boundary_hour))
            .or_default()
            .push(e.clone());
    }
    for bucket in map.values_mut() {
        bucket.sort_by_key(|e| e.start_time);
    }
    map
}

pub fn total_minutes(entries: &[TimeEntry]) -> i64 {
    entries.iter().map(|e| e.duration_minutes).sum()
}

/// Height of the y axis: the configured day length, or more if some day
/// went past it.
pub fn max_hours_display(hours_per_day: u32, buckets: &BTreeMap<LogicalDayKey, Vec<TimeEntry>>) -> u32 {
    let max_minutes = buckets.values().map(|b| total_minutes(b)).max().unwrap_or(0);
    let max_hours = (max_minutes as f64 / 60.0).ceil() as u32;
    hours_per_day.max(max_hours)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySlice {
    pub category: Category,
    pub minutes: i64,
    pub percent: f64,
    pub entries: Vec<TimeEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayBreakdown {
    pub day: LogicalDayKey,
    pub total_minutes: i64,
    /// Largest category first.
    pub slices: Vec<CategorySlice>,
    /// All entries of the day by start time.
    pub entries: Vec<TimeEntry>,
}

/// Per-category totals for one day. Entries whose category no longer
/// exists still count toward the day total but get no slice.
pub fn day_breakdown(day: LogicalDayKey, entries: &[TimeEntry], categories: &[Category]) -> DayBreakdown {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|e| e.start_time);

    let total = total_minutes(&sorted);

    let mut per_cat: Vec<(String, i64, Vec<TimeEntry>)> = Vec::new();
    for e in &sorted {
        match per_cat.iter_mut().find(|(id, _, _)| *id == e.category_id) {
            Some((_, mins, list)) => {
                *mins += e.duration_minutes;
                list.push(e.clone());
            }
            None => per_cat.push((e.category_id.clone(), e.duration_minutes, vec![e.clone()])),
        }
    }

    let by_id: HashMap<&str, &Category> = categories.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut slices: Vec<CategorySlice> = per_cat
        .into_iter()
        .filter_map(|(id, minutes, entries)| {
            let category = (*by_id.get(id.as_str())?).clone();
            let percent = if total > 0 {
                minutes as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            Some(CategorySlice {
                category,
                minutes,
                percent,
                entries,
            })
        })
        .collect();

    // stable: ties keep first-seen order
    slices.sort_by(|a, b| b.minutes.cmp(&a.minutes));

    DayBreakdown {
        day,
        total_minutes: total,
        slices,
        entries: sorted,
    }
}

/// A chapter's horizontal extent over the displayed columns, inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterLine {
    pub chapter: Chapter,
    pub start_col: usize,
    pub end_col: usize,
}

pub fn chapter_lines(columns: &[LogicalDayKey], chapters: &[Chapter]) -> Vec<ChapterLine> {
    let n = columns.len();
    chapters
        .iter()
        .filter_map(|ch| {
            let start_col = columns.iter().position(|d| *d >= ch.start_date).unwrap_or(n);
            let end_col = match columns.iter().position(|d| *d > ch.end_date) {
                Some(0) => return None,
                Some(i) => i - 1,
                None => n.checked_sub(1)?,
            };
            (start_col <= end_col && start_col < n).then(|| ChapterLine {
                chapter: ch.clone(),
                start_col,
                end_col,
            })
        })
        .collect()
}

/// One histogram column.
#[derive(Debug, Clone, PartialEq)]
pub struct GridColumn {
    pub day: LogicalDayKey,
    pub total_minutes: i64,
    /// Entries by start time, bottom of the stack first.
    pub entries: Vec<TimeEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub columns: Vec<GridColumn>,
    pub max_hours_display: u32,
    pub hours_per_day: u32,
    pub chapter_lines: Vec<ChapterLine>,
}

impl Grid {
    pub fn build<Tz: TimeZone>(
        days: &[LogicalDayKey],
        entries: &[TimeEntry],
        chapters: &[Chapter],
        tz: &Tz,
        boundary_hour: u32,
        hours_per_day: u32,
    ) -> Self {
        let buckets = bucket_by_day(entries, tz, boundary_hour);
        let max_hours_display = max_hours_display(hours_per_day, &buckets);

        let columns = days
            .iter()
            .map(|day| {
                let entries = buckets.get(day).cloned().unwrap_or_default();
                GridColumn {
                    day: *day,
                    total_minutes: total_minutes(&entries),
                    entries,
                }
            })
            .collect();

        Self {
            columns,
            max_hours_display,
            hours_per_day,
            chapter_lines: chapter_lines(days, chapters),
        }
    }

    /// Chapters covering the given column.
    pub fn chapters_at(&self, col: usize) -> impl Iterator<Item = &Chapter> {
        self.chapter_lines
            .iter()
            .filter(move |l| l.start_col <= col && col <= l.end_col)
            .map(|l| &l.chapter)
    }
}
