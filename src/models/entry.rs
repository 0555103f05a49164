use crate::core::day_boundary::{LogicalDayKey, logical_day_key};
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A logged block of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: String,
    pub category_id: String,
    pub todo_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl TimeEntry {
    pub fn start_local(&self) -> DateTime<Local> {
        self.start_time.with_timezone(&Local)
    }

    pub fn end_local(&self) -> DateTime<Local> {
        self.end_time.with_timezone(&Local)
    }

    /// Logical day of the entry's local start time.
    pub fn logical_day(&self, boundary_hour: u32) -> LogicalDayKey {
        self.logical_day_in(&Local, boundary_hour)
    }

    pub fn logical_day_in<Tz: TimeZone>(&self, tz: &Tz, boundary_hour: u32) -> LogicalDayKey {
        logical_day_key(&self.start_time.with_timezone(tz), boundary_hour)
    }
}
