use crate::core::day_boundary::{
    LogicalDayKey, build_absolute_time, clock_span_minutes, hours_to_minutes, span_minutes,
};
use crate::core::ids::new_id;
use crate::core::timer::StopRecord;
use crate::db::log::audit;
use crate::db::{categories, entries, todos};
use crate::errors::{AppError, AppResult};
use crate::models::category::WASTED_TIME_ID;
use crate::models::entry::TimeEntry;
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use rusqlite::Connection;

/// How long a manually added entry lasts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryLength {
    /// Until this clock time; at or before the start means the next morning.
    Until(NaiveTime),
    Hours(f64),
}

/// A manual entry placed in a logical day.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub day: LogicalDayKey,
    pub start: NaiveTime,
    pub length: EntryLength,
    pub category_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Changes requested by `entry edit`; `None` keeps the current value.
#[derive(Debug, Default, Clone)]
pub struct EntryPatch {
    /// Logical day the times are read in; defaults to the entry's own day.
    pub day: Option<LogicalDayKey>,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
    pub category_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Longest manual entry, in hours.
pub const MAX_ENTRY_HOURS: f64 = 24.0;

pub struct EntryLogic;

fn trimmed(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

fn hhmm<Tz: TimeZone>(dt: &DateTime<Tz>) -> NaiveTime {
    use chrono::Timelike;
    NaiveTime::from_hms_opt(dt.hour(), dt.minute(), 0).unwrap_or(NaiveTime::MIN)
}

impl EntryLogic {
    pub fn require(conn: &Connection, id: &str) -> AppResult<TimeEntry> {
        entries::get_entry(conn, id)?.ok_or_else(|| AppError::EntryNotFound(id.to_string()))
    }

    /// Entries whose logical day lies in `[first, last]`, by start time.
    pub fn in_range<Tz: TimeZone>(
        conn: &Connection,
        first: LogicalDayKey,
        last: LogicalDayKey,
        tz: &Tz,
        boundary_hour: u32,
    ) -> AppResult<Vec<TimeEntry>> {
        // Generous UTC window, then exact filtering on the logical day.
        let from = first.date().and_time(NaiveTime::MIN).and_utc() - Duration::days(2);
        let to = last.date().and_time(NaiveTime::MIN).and_utc() + Duration::days(3);

        Ok(entries::load_entries_between(conn, &from, &to)?
            .into_iter()
            .filter(|e| {
                let day = e.logical_day_in(tz, boundary_hour);
                first <= day && day <= last
            })
            .collect())
    }

    pub fn for_day<Tz: TimeZone>(
        conn: &Connection,
        day: LogicalDayKey,
        tz: &Tz,
        boundary_hour: u32,
    ) -> AppResult<Vec<TimeEntry>> {
        Self::in_range(conn, day, day, tz, boundary_hour)
    }

    pub fn by_category(conn: &Connection, category_id: &str) -> AppResult<Vec<TimeEntry>> {
        entries::load_entries_by_category(conn, category_id)
    }

    pub fn all(conn: &Connection) -> AppResult<Vec<TimeEntry>> {
        entries::load_all_entries(conn)
    }

    /// Add an entry at a wall-clock time of a logical day. Without a title
    /// the category name is used.
    pub fn add<Tz: TimeZone>(
        conn: &Connection,
        new: NewEntry,
        tz: &Tz,
        boundary_hour: u32,
    ) -> AppResult<TimeEntry> {
        let cat = categories::get_category(conn, &new.category_id)?
            .ok_or_else(|| AppError::CategoryNotFound(new.category_id.clone()))?;

        let duration_minutes = match new.length {
            EntryLength::Until(end) => clock_span_minutes(new.start, end),
            EntryLength::Hours(h) if h.is_finite() && h > 0.0 && h <= MAX_ENTRY_HOURS => {
                hours_to_minutes(h)
            }
            EntryLength::Hours(h) => {
                return Err(AppError::InvalidInput(format!(
                    "hours must be above 0 and at most {MAX_ENTRY_HOURS}, got {h}"
                )));
            }
        };

        let start = build_absolute_time(tz, new.day, new.start, boundary_hour).with_timezone(&Utc);
        let end = start + Duration::minutes(duration_minutes);

        let entry = TimeEntry {
            id: new_id("entry"),
            category_id: cat.id,
            todo_id: None,
            title: trimmed(new.title.as_deref()).or(Some(cat.name)),
            description: trimmed(new.description.as_deref()),
            start_time: start,
            end_time: end,
            duration_minutes,
        };

        entries::insert_entry(conn, &entry)?;
        audit(
            conn,
            "add",
            &entry.id,
            &format!("Entry on {} ({} min)", new.day, entry.duration_minutes),
        );
        Ok(entry)
    }

    /// Turn a finished timer session into an entry. A category deleted
    /// meanwhile falls back to the default one; a deleted todo is dropped.
    pub fn log_stop(
        conn: &Connection,
        record: &StopRecord,
        title: Option<&str>,
        description: Option<&str>,
    ) -> AppResult<TimeEntry> {
        let category_id = match categories::get_category(conn, &record.category_id)? {
            Some(cat) => cat.id,
            None => WASTED_TIME_ID.to_string(),
        };
        let todo_id = match &record.todo_id {
            Some(id) => todos::get_todo(conn, id)?.map(|t| t.id),
            None => None,
        };

        let entry = TimeEntry {
            id: new_id("entry"),
            category_id,
            todo_id,
            title: trimmed(title),
            description: trimmed(description),
            start_time: record.start_time,
            end_time: record.end_time,
            duration_minutes: record.duration_minutes,
        };

        entries::insert_entry(conn, &entry)?;
        audit(
            conn,
            "add",
            &entry.id,
            &format!("Timer logged {} min to {}", entry.duration_minutes, entry.category_id),
        );
        Ok(entry)
    }

    /// Edit an entry. When any of day/start/end is given, both ends are
    /// rebuilt inside the logical day and the duration recomputed; missing
    /// clock times keep the entry's current ones.
    pub fn edit<Tz: TimeZone>(
        conn: &Connection,
        id: &str,
        patch: EntryPatch,
        tz: &Tz,
        boundary_hour: u32,
    ) -> AppResult<TimeEntry> {
        let mut entry = Self::require(conn, id)?;

        if patch.day.is_some() || patch.start.is_some() || patch.end.is_some() {
            let local_start = entry.start_time.with_timezone(tz);
            let local_end = entry.end_time.with_timezone(tz);

            let day = patch
                .day
                .unwrap_or_else(|| entry.logical_day_in(tz, boundary_hour));
            let start_hm = patch.start.unwrap_or_else(|| hhmm(&local_start));
            let end_hm = patch.end.unwrap_or_else(|| hhmm(&local_end));

            let start = build_absolute_time(tz, day, start_hm, boundary_hour);
            let mut end = build_absolute_time(tz, day, end_hm, boundary_hour);
            let duration_minutes = span_minutes(&start, &end);
            if end <= start {
                end = end + Duration::hours(24);
            }

            entry.start_time = start.with_timezone(&Utc);
            entry.end_time = end.with_timezone(&Utc);
            entry.duration_minutes = duration_minutes;
        }

        if let Some(cat) = patch.category_id {
            if categories::get_category(conn, &cat)?.is_none() {
                return Err(AppError::CategoryNotFound(cat));
            }
            entry.category_id = cat;
        }
        if let Some(t) = patch.title {
            entry.title = trimmed(Some(&t));
        }
        if let Some(d) = patch.description {
            entry.description = trimmed(Some(&d));
        }

        entries::update_entry(conn, &entry)?;
        audit(
            conn,
            "edit",
            &entry.id,
            &format!("Entry updated ({} min)", entry.duration_minutes),
        );
        Ok(entry)
    }

    pub fn delete(conn: &Connection, id: &str) -> AppResult<TimeEntry> {
        let entry = Self::require(conn, id)?;
        entries::delete_entry(conn, &entry.id)?;
        audit(
            conn,
            "del",
            &entry.id,
            &format!("Entry deleted ({} min)", entry.duration_minutes),
        );
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::todo::TodoLogic;
    use crate::db::pool::DbPool;
    use crate::models::todo::Priority;

    fn key(s: &str) -> LogicalDayKey {
        s.parse().unwrap()
    }

    fn hm(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn new_entry(day: &str, start: &str, length: EntryLength) -> NewEntry {
        NewEntry {
            day: key(day),
            start: hm(start),
            length,
            category_id: WASTED_TIME_ID.into(),
            title: None,
            description: None,
        }
    }

    #[test]
    fn add_with_end_time_crossing_midnight() {
        let pool = DbPool::in_memory().unwrap();
        let e = EntryLogic::add(
            &pool.conn,
            new_entry("2024-03-10", "23:30", EntryLength::Until(hm("01:00"))),
            &Utc,
            4,
        )
        .unwrap();

        assert_eq!(e.start_time, at("2024-03-10T23:30:00Z"));
        assert_eq!(e.end_time, at("2024-03-11T01:00:00Z"));
        assert_eq!(e.duration_minutes, 90);
        assert_eq!(e.title.as_deref(), Some("Wasted Time"));
        assert_eq!(e.logical_day_in(&Utc, 4), key("2024-03-10"));
    }

    #[test]
    fn add_before_boundary_lands_on_next_calendar_date() {
        let pool = DbPool::in_memory().unwrap();
        let e = EntryLogic::add(
            &pool.conn,
            new_entry("2024-03-10", "02:00", EntryLength::Hours(1.5)),
            &Utc,
            4,
        )
        .unwrap();

        assert_eq!(e.start_time, at("2024-03-11T02:00:00Z"));
        assert_eq!(e.duration_minutes, 90);

        let day = EntryLogic::for_day(&pool.conn, key("2024-03-10"), &Utc, 4).unwrap();
        assert_eq!(day.len(), 1);
        assert!(EntryLogic::for_day(&pool.conn, key("2024-03-11"), &Utc, 4).unwrap().is_empty());
    }

    #[test]
    fn add_rejects_bad_input() {
        let pool = DbPool::in_memory().unwrap();
        let bad_hours = EntryLogic::add(
            &pool.conn,
            new_entry("2024-03-10", "09:00", EntryLength::Hours(-1.0)),
            &Utc,
            0,
        );
        assert!(matches!(bad_hours, Err(AppError::InvalidInput(_))));

        for hours in [1e30, 24.5, f64::INFINITY, f64::NAN] {
            let res = EntryLogic::add(
                &pool.conn,
                new_entry("2024-03-10", "09:00", EntryLength::Hours(hours)),
                &Utc,
                0,
            );
            assert!(matches!(res, Err(AppError::InvalidInput(_))), "{hours}");
        }
        let full_day = EntryLogic::add(
            &pool.conn,
            new_entry("2024-03-10", "09:00", EntryLength::Hours(MAX_ENTRY_HOURS)),
            &Utc,
            0,
        )
        .unwrap();
        assert_eq!(full_day.duration_minutes, 24 * 60);

        let mut unknown = new_entry("2024-03-10", "09:00", EntryLength::Hours(1.0));
        unknown.category_id = "cat-nope".into();
        assert!(matches!(
            EntryLogic::add(&pool.conn, unknown, &Utc, 0),
            Err(AppError::CategoryNotFound(_))
        ));
    }

    #[test]
    fn edit_end_before_start_wraps_overnight() {
        let pool = DbPool::in_memory().unwrap();
        let e = EntryLogic::add(
            &pool.conn,
            new_entry("2024-03-10", "22:00", EntryLength::Hours(1.0)),
            &Utc,
            0,
        )
        .unwrap();

        let patch = EntryPatch {
            end: Some(hm("01:30")),
            ..Default::default()
        };
        let edited = EntryLogic::edit(&pool.conn, &e.id, patch, &Utc, 0).unwrap();
        assert_eq!(edited.start_time, at("2024-03-10T22:00:00Z"));
        assert_eq!(edited.end_time, at("2024-03-11T01:30:00Z"));
        assert_eq!(edited.duration_minutes, 210);
    }

    #[test]
    fn edit_equal_times_is_a_full_day() {
        let pool = DbPool::in_memory().unwrap();
        let e = EntryLogic::add(
            &pool.conn,
            new_entry("2024-03-10", "09:00", EntryLength::Hours(1.0)),
            &Utc,
            0,
        )
        .unwrap();

        let patch = EntryPatch {
            end: Some(hm("09:00")),
            ..Default::default()
        };
        let edited = EntryLogic::edit(&pool.conn, &e.id, patch, &Utc, 0).unwrap();
        assert_eq!(edited.duration_minutes, 1440);
    }

    #[test]
    fn edit_without_times_keeps_them() {
        let pool = DbPool::in_memory().unwrap();
        let e = EntryLogic::add(
            &pool.conn,
            new_entry("2024-03-10", "09:00", EntryLength::Hours(2.0)),
            &Utc,
            0,
        )
        .unwrap();

        let patch = EntryPatch {
            title: Some("Deep work".into()),
            ..Default::default()
        };
        let edited = EntryLogic::edit(&pool.conn, &e.id, patch, &Utc, 0).unwrap();
        assert_eq!(edited.start_time, e.start_time);
        assert_eq!(edited.duration_minutes, 120);
        assert_eq!(edited.title.as_deref(), Some("Deep work"));
    }

    #[test]
    fn range_uses_logical_days() {
        let pool = DbPool::in_memory().unwrap();
        for (day, start) in [("2024-03-09", "10:00"), ("2024-03-10", "03:00"), ("2024-03-11", "10:00")] {
            EntryLogic::add(&pool.conn, new_entry(day, start, EntryLength::Hours(1.0)), &Utc, 4).unwrap();
        }

        let got = EntryLogic::in_range(&pool.conn, key("2024-03-10"), key("2024-03-11"), &Utc, 4).unwrap();
        assert_eq!(got.len(), 2);
        assert!(got[0].start_time < got[1].start_time);
    }

    fn record(category_id: &str, todo_id: Option<&str>) -> StopRecord {
        StopRecord {
            category_id: category_id.into(),
            todo_id: todo_id.map(String::from),
            duration_minutes: 7,
            elapsed_ms: 7 * 60_000,
            start_time: at("2024-03-10T09:00:00Z"),
            end_time: at("2024-03-10T09:12:00Z"),
        }
    }

    #[test]
    fn stop_record_drops_vanished_references() {
        let pool = DbPool::in_memory().unwrap();
        let todo = TodoLogic::add(&pool.conn, "Read", WASTED_TIME_ID, Priority::Low, None).unwrap();
        TodoLogic::delete(&pool.conn, &todo.id).unwrap();

        let e = EntryLogic::log_stop(&pool.conn, &record("cat-gone", Some(&todo.id)), None, None)
            .unwrap();
        assert_eq!(e.category_id, WASTED_TIME_ID);
        assert_eq!(e.todo_id, None);
        assert_eq!(EntryLogic::require(&pool.conn, &e.id).unwrap().todo_id, None);
    }

    #[test]
    fn stop_record_becomes_an_entry() {
        let pool = DbPool::in_memory().unwrap();
        let todo = TodoLogic::add(&pool.conn, "Read", WASTED_TIME_ID, Priority::Low, None).unwrap();
        let record = StopRecord {
            category_id: WASTED_TIME_ID.into(),
            todo_id: Some(todo.id.clone()),
            duration_minutes: 7,
            elapsed_ms: 7 * 60_000,
            start_time: at("2024-03-10T09:00:00Z"),
            end_time: at("2024-03-10T09:12:00Z"),
        };

        let e = EntryLogic::log_stop(&pool.conn, &record, Some(" Reading "), None).unwrap();
        let stored = EntryLogic::require(&pool.conn, &e.id).unwrap();
        assert_eq!(stored.duration_minutes, 7);
        assert_eq!(stored.todo_id.as_deref(), Some(todo.id.as_str()));
        assert_eq!(stored.title.as_deref(), Some("Reading"));
        assert!(EntryLogic::by_category(&pool.conn, WASTED_TIME_ID).unwrap().len() == 1);

        EntryLogic::delete(&pool.conn, &e.id).unwrap();
        assert!(EntryLogic::all(&pool.conn).unwrap().is_empty());
    }
}
