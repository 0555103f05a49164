//! Core logic: the logical-day calculator, the timer state machine and the
//! pure helpers the commands compose around them.

pub mod category;
pub mod chapter;
pub mod clock;
pub mod config;
pub mod day_boundary;
pub mod entry;
pub mod grid;
pub mod ids;
pub mod log;
pub mod queue;
pub mod timer;
pub mod todo;

/// Shortest duration, in minutes, that is ever logged as an entry.
pub const MIN_LOGGED_MINUTES: i64 = 1;

/// Milliseconds rounded to the nearest whole minute (halves round up).
pub fn round_minutes(ms: i64) -> i64 {
    (ms as f64 / 60_000.0).round() as i64
}
