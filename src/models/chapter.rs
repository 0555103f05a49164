use crate::core::day_boundary::LogicalDayKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CHAPTER_COLORS: [&str; 10] = [
    "#3b82f6", "#8b5cf6", "#ec4899", "#ef4444", "#f97316", "#eab308", "#22c55e", "#06b6d4",
    "#14b8a6", "#f43f5e",
];

/// A named period of tracked days, drawn as a line under the histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub name: String,
    pub start_date: LogicalDayKey,
    pub end_date: LogicalDayKey,
    pub color: String,
    pub description: Option<String>,
    pub tasks: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Chapter {
    /// Palette color for the chapter created after `existing` others.
    pub fn next_color(existing: usize) -> &'static str {
        CHAPTER_COLORS[existing % CHAPTER_COLORS.len()]
    }

    pub fn contains(&self, day: LogicalDayKey) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles() {
        assert_eq!(Chapter::next_color(0), "#3b82f6");
        assert_eq!(Chapter::next_color(9), "#f43f5e");
        assert_eq!(Chapter::next_color(10), "#3b82f6");
    }
}
