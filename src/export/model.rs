// src/export/model.rs

use crate::models::category::Category;
use crate::models::entry::TimeEntry;
use chrono::{SecondsFormat, TimeZone};
use serde::Serialize;

/// Flat row for entry exports.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EntryExport {
    pub id: String,
    pub day: String,
    pub category_id: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub duration_minutes: i64,
}

impl EntryExport {
    /// Times are rendered in `tz`; the day is the entry's logical day.
    pub fn from_entry<Tz: TimeZone>(
        e: &TimeEntry,
        categories: &[Category],
        tz: &Tz,
        boundary_hour: u32,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let category = categories
            .iter()
            .find(|c| c.id == e.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();

        Self {
            id: e.id.clone(),
            day: e.logical_day_in(tz, boundary_hour).to_string(),
            category_id: e.category_id.clone(),
            category,
            title: e.title.clone().unwrap_or_default(),
            description: e.description.clone().unwrap_or_default(),
            start: e.start_time.with_timezone(tz).to_rfc3339_opts(SecondsFormat::Secs, true),
            end: e.end_time.with_timezone(tz).to_rfc3339_opts(SecondsFormat::Secs, true),
            duration_minutes: e.duration_minutes,
        }
    }
}
