//! Period expressions used by `--period`: `YYYY`, `YYYY-MM`, `YYYY-MM-DD`
//! and `START:END` ranges of the same shape.

use crate::core::day_boundary::{LogicalDayKey, logical_today};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

fn first_and_last_of_period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let bad = || AppError::InvalidPeriod(p.to_string());

    match p.len() {
        // YYYY-MM-DD
        10 => {
            let d = NaiveDate::parse_from_str(p, "%Y-%m-%d").map_err(|_| bad())?;
            Ok((d, d))
        }
        // YYYY-MM
        7 => {
            let first = NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d").map_err(|_| bad())?;
            Ok((first, last_day_of_month(first).ok_or_else(bad)?))
        }
        // YYYY
        4 => {
            let year: i32 = p.parse().map_err(|_| bad())?;
            let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(bad)?;
            let last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(bad)?;
            Ok((first, last))
        }
        _ => Err(bad()),
    }
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let (y, m) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)?.pred_opt()
}

/// Resolve a period expression to an inclusive range of logical days.
pub fn parse_period(p: &str) -> AppResult<(LogicalDayKey, LogicalDayKey)> {
    let p = p.trim();

    let (first, last) = if let Some((start_raw, end_raw)) = p.split_once(':') {
        let start = start_raw.trim();
        let end = end_raw.trim();

        if start.len() != end.len() {
            return Err(AppError::InvalidPeriod(format!(
                "{p} (start and end must have the same format)"
            )));
        }

        let (first, _) = first_and_last_of_period(start)?;
        let (_, last) = first_and_last_of_period(end)?;
        (first, last)
    } else {
        first_and_last_of_period(p)?
    };

    if last < first {
        return Err(AppError::InvalidPeriod(format!("{p} (end before start)")));
    }

    Ok((LogicalDayKey::from(first), LogicalDayKey::from(last)))
}

/// A day argument: `today`, `yesterday` or `YYYY-MM-DD`. The words are
/// resolved against the logical day of `now`.
pub fn resolve_day<Tz: TimeZone>(
    raw: &str,
    now: &DateTime<Tz>,
    boundary_hour: u32,
) -> AppResult<LogicalDayKey> {
    match raw.trim().to_lowercase().as_str() {
        "today" => Ok(logical_today(now, boundary_hour)),
        "yesterday" => Ok(logical_today(now, boundary_hour).pred()),
        other => other.parse(),
    }
}
