//! Logical day calculation.
//!
//! A logical day is a 24 hour bucket that rolls over at a configurable
//! "day ends at" hour instead of midnight. With a boundary of 4, activity at
//! 01:30 still belongs to the previous calendar date.
//!
//! All arithmetic is done on the wall clock of the time zone the timestamp
//! is expressed in, so `build_absolute_time` and `logical_day_key` are
//! inverses on DST transition days too. A wall-clock time skipped by a DST
//! gap resolves to an instant of the same logical day; only a zone that
//! skips a whole calendar day has no instant to return for it.

use crate::core::{MIN_LOGGED_MINUTES, round_minutes};
use crate::errors::AppError;
use chrono::{
    DateTime, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar date identifying a logical day. Renders as `YYYY-MM-DD`, so the
/// string order and the date order agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalDayKey(NaiveDate);

impl LogicalDayKey {
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn succ(&self) -> Self {
        Self(self.0.checked_add_days(Days::new(1)).unwrap_or(self.0))
    }

    pub fn pred(&self) -> Self {
        Self(self.0.checked_sub_days(Days::new(1)).unwrap_or(self.0))
    }

    /// "Feb 1, 2026"
    pub fn long_label(&self) -> String {
        self.0.format("%b %-d, %Y").to_string()
    }
}

impl fmt::Display for LogicalDayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for LogicalDayKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| AppError::InvalidDate(s.to_string()))
    }
}

impl From<NaiveDate> for LogicalDayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Map an instant to the logical day it belongs to.
///
/// The timestamp is shifted back by `boundary_hour` hours on its own wall
/// clock and the calendar date of the result is taken. Callers pass local
/// time (`DateTime<Local>`); any zone works.
pub fn logical_day_key<Tz: TimeZone>(timestamp: &DateTime<Tz>, boundary_hour: u32) -> LogicalDayKey {
    let local = timestamp.naive_local();
    let shifted = local
        .checked_sub_signed(Duration::hours(i64::from(boundary_hour)))
        .unwrap_or(local);
    LogicalDayKey(shifted.date())
}

/// Logical day of "now".
pub fn logical_today<Tz: TimeZone>(now: &DateTime<Tz>, boundary_hour: u32) -> LogicalDayKey {
    logical_day_key(now, boundary_hour)
}

/// Reconstruct the instant for a wall-clock time inside a logical day.
///
/// Times earlier than the boundary hour fall on the next calendar date (01:00
/// with a boundary of 4 is the night after `day`). Seconds are zeroed.
pub fn build_absolute_time<Tz: TimeZone>(
    tz: &Tz,
    day: LogicalDayKey,
    time_of_day: NaiveTime,
    boundary_hour: u32,
) -> DateTime<Tz> {
    let date = if time_of_day.hour() < boundary_hour {
        day.succ().date()
    } else {
        day.date()
    };

    let hm = NaiveTime::from_hms_opt(time_of_day.hour(), time_of_day.minute(), 0)
        .unwrap_or(NaiveTime::MIN);

    resolve_local(tz, date.and_time(hm), day, boundary_hour)
}

/// Longest DST gap searched backwards, in minutes.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Resolve a wall-clock time of logical day `day` in `tz`.
///
/// A repeated hour (DST fold) resolves to its earliest instant. A skipped
/// hour (DST gap) is pushed forward an hour, unless that crosses into the
/// next logical day; then it takes the last minute before the gap.
fn resolve_local<Tz: TimeZone>(
    tz: &Tz,
    naive: NaiveDateTime,
    day: LogicalDayKey,
    boundary_hour: u32,
) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let forward = tz.from_local_datetime(&(naive + Duration::hours(1))).earliest();
            if let Some(dt) = &forward
                && logical_day_key(dt, boundary_hour) == day
            {
                return dt.clone();
            }
            last_before_gap(tz, naive)
                .or(forward)
                .unwrap_or_else(|| tz.from_utc_datetime(&naive))
        }
    }
}

fn last_before_gap<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    (1..=MAX_GAP_MINUTES)
        .map(|m| naive - Duration::minutes(m))
        .find_map(|t| tz.from_local_datetime(&t).latest())
}

/// Duration in minutes between two instants of an edited entry.
///
/// An end at or before the start means the span crosses midnight, so a day is
/// added to the end. Never shorter than the minimum loggable duration.
pub fn span_minutes<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> i64 {
    let mut end = end.clone();
    if end <= *start {
        end = end + Duration::hours(24);
    }

    let ms = end.signed_duration_since(start).num_milliseconds();
    round_minutes(ms).max(MIN_LOGGED_MINUTES)
}

/// Same as [`span_minutes`] but on bare clock times ("22:30" → "01:00" is 150).
pub fn clock_span_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    let start_m = i64::from(start.hour() * 60 + start.minute());
    let end_m = i64::from(end.hour() * 60 + end.minute());

    let mut diff = end_m - start_m;
    if diff <= 0 {
        diff += 24 * 60;
    }
    diff.max(MIN_LOGGED_MINUTES)
}

/// Fractional hours as whole minutes (at least one).
pub fn hours_to_minutes(hours: f64) -> i64 {
    ((hours * 60.0).round() as i64).max(MIN_LOGGED_MINUTES)
}

/// Every key from `start` to `end`, both included. Empty when `end < start`.
pub fn day_range(start: LogicalDayKey, end: LogicalDayKey) -> Vec<LogicalDayKey> {
    let mut out = Vec::new();
    let mut d = start;

    while d <= end {
        out.push(d);
        let next = d.succ();
        if next == d {
            break;
        }
        d = next;
    }

    out
}

/// Number of days from `start` to `end`, both included.
pub fn days_between(start: LogicalDayKey, end: LogicalDayKey) -> i64 {
    (end.date() - start.date()).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn key(s: &str) -> LogicalDayKey {
        s.parse().unwrap()
    }

    fn hm(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn at(tz: &FixedOffset, s: &str) -> DateTime<FixedOffset> {
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap();
        tz.from_local_datetime(&naive).unwrap()
    }

    #[test]
    fn early_morning_belongs_to_previous_day() {
        let tz = FixedOffset::east_opt(0).unwrap();
        assert_eq!(logical_day_key(&at(&tz, "2024-01-02T01:30"), 4), key("2024-01-01"));
        assert_eq!(logical_day_key(&at(&tz, "2024-01-02T03:59"), 4), key("2024-01-01"));
    }

    #[test]
    fn boundary_hour_starts_new_day() {
        let tz = FixedOffset::east_opt(0).unwrap();
        assert_eq!(logical_day_key(&at(&tz, "2024-01-02T04:00"), 4), key("2024-01-02"));
    }

    #[test]
    fn zero_boundary_is_calendar_date() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        for s in ["2024-03-01T00:00", "2024-03-01T00:01", "2024-03-01T23:59", "2024-12-31T12:00"] {
            let ts = at(&tz, s);
            assert_eq!(logical_day_key(&ts, 0).date(), ts.date_naive());
        }
    }

    #[test]
    fn key_uses_the_timestamp_zone() {
        // 2024-01-02T01:30+02:00 is still 2024-01-01 in UTC.
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let ts = at(&plus_two, "2024-01-02T01:30");
        assert_eq!(logical_day_key(&ts, 0), key("2024-01-02"));
        assert_eq!(logical_day_key(&ts.with_timezone(&Utc), 0), key("2024-01-01"));
    }

    #[test]
    fn build_moves_small_hours_to_next_calendar_date() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let ts = build_absolute_time(&tz, key("2024-01-01"), hm("01:00"), 4);
        assert_eq!(ts, at(&tz, "2024-01-02T01:00"));

        let ts = build_absolute_time(&tz, key("2024-01-01"), hm("09:15"), 4);
        assert_eq!(ts, at(&tz, "2024-01-01T09:15"));
    }

    #[test]
    fn build_zeroes_seconds() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let t = NaiveTime::from_hms_opt(10, 20, 45).unwrap();
        let ts = build_absolute_time(&tz, key("2024-05-05"), t, 0);
        assert_eq!(ts, at(&tz, "2024-05-05T10:20"));
    }

    #[test]
    fn round_trip_holds_for_every_quarter_hour() {
        for offset_h in [-8, 0, 5] {
            let tz = FixedOffset::east_opt(offset_h * 3600).unwrap();
            for day in day_range(key("2024-01-01"), key("2024-12-31")) {
                for boundary in 0..=8 {
                    for minutes in (0..24 * 60).step_by(15) {
                        let t = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap();
                        let ts = build_absolute_time(&tz, day, t, boundary);
                        assert_eq!(
                            logical_day_key(&ts, boundary),
                            day,
                            "day={day} time={t} boundary={boundary}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn round_trip_holds_across_dst_transitions() {
        use chrono_tz::{America::New_York, Europe::Berlin};

        let days = [
            key("2024-03-30"),
            key("2024-03-31"),
            key("2024-10-26"),
            key("2024-10-27"),
            key("2024-03-09"),
            key("2024-03-10"),
            key("2024-11-02"),
            key("2024-11-03"),
        ];

        for day in days {
            for boundary in 0..=8 {
                for minutes in (0..24 * 60).step_by(15) {
                    let t = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap();
                    let berlin = build_absolute_time(&Berlin, day, t, boundary);
                    let new_york = build_absolute_time(&New_York, day, t, boundary);
                    assert_eq!(logical_day_key(&berlin, boundary), day, "Berlin {day} {t} H={boundary}");
                    assert_eq!(logical_day_key(&new_york, boundary), day, "New York {day} {t} H={boundary}");
                }
            }
        }
    }

    #[test]
    fn skipped_hour_stays_in_its_logical_day() {
        use chrono_tz::Europe::Berlin;

        // 2024-03-31 02:00..03:00 does not exist in Berlin.
        let ts = build_absolute_time(&Berlin, key("2024-03-30"), hm("02:30"), 3);
        assert_eq!(logical_day_key(&ts, 3), key("2024-03-30"));
        assert_eq!(ts.naive_local(), at_naive("2024-03-31T01:59"));

        // Pushing forward is fine when it stays in the day.
        let ts = build_absolute_time(&Berlin, key("2024-03-31"), hm("02:30"), 0);
        assert_eq!(ts.naive_local(), at_naive("2024-03-31T03:30"));

        // A repeated hour resolves to its first occurrence.
        let ts = build_absolute_time(&Berlin, key("2024-10-26"), hm("02:30"), 3);
        assert_eq!(ts.with_timezone(&Utc), Utc.with_ymd_and_hms(2024, 10, 27, 0, 30, 0).unwrap());
    }

    fn at_naive(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
    }

    #[test]
    fn keys_are_monotonic() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let mut ts = at(&tz, "2024-02-27T00:00");
        let mut prev = logical_day_key(&ts, 5);
        for _ in 0..(4 * 24 * 4) {
            ts = ts + Duration::minutes(15);
            let k = logical_day_key(&ts, 5);
            assert!(k >= prev);
            assert!(k.to_string() >= prev.to_string());
            prev = k;
        }
    }

    #[test]
    fn large_boundary_is_handled() {
        let tz = FixedOffset::east_opt(0).unwrap();
        assert_eq!(logical_day_key(&at(&tz, "2024-01-03T12:00"), 36), key("2024-01-02"));
    }

    #[test]
    fn overnight_span_adds_a_day() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let start = at(&tz, "2024-01-01T23:00");
        let end = at(&tz, "2024-01-01T01:30");
        assert_eq!(span_minutes(&start, &end), 150);
    }

    #[test]
    fn equal_start_and_end_is_a_full_day() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let t = at(&tz, "2024-01-01T10:00");
        assert_eq!(span_minutes(&t, &t), 24 * 60);
    }

    #[test]
    fn span_is_at_least_one_minute() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let start = at(&tz, "2024-01-01T10:00");
        let end = start.clone() + Duration::seconds(10);
        assert_eq!(span_minutes(&start, &end), 1);
    }

    #[test]
    fn clock_span_wraps_midnight() {
        assert_eq!(clock_span_minutes(hm("22:30"), hm("01:00")), 150);
        assert_eq!(clock_span_minutes(hm("09:00"), hm("10:00")), 60);
        assert_eq!(clock_span_minutes(hm("09:00"), hm("09:00")), 1440);
    }

    #[test]
    fn hours_round_to_minutes() {
        assert_eq!(hours_to_minutes(1.5), 90);
        assert_eq!(hours_to_minutes(0.0), 1);
        assert_eq!(hours_to_minutes(0.26), 16);
    }

    #[test]
    fn range_and_count_are_inclusive() {
        let r = day_range(key("2024-02-27"), key("2024-03-01"));
        let labels: Vec<String> = r.iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, ["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01"]);
        assert_eq!(days_between(key("2024-02-27"), key("2024-03-01")), 4);
        assert!(day_range(key("2024-03-02"), key("2024-03-01")).is_empty());
    }

    #[test]
    fn labels() {
        assert_eq!(key("2026-02-01").long_label(), "Feb 1, 2026");
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!("2024-13-01".parse::<LogicalDayKey>().is_err());
        assert!("yesterday".parse::<LogicalDayKey>().is_err());
    }
}
