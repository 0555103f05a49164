/// ANSI color helper utilities for terminal output.
use crate::core::timer::TimerStatus;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// running → green, paused → yellow, idle → grey
pub fn color_for_status(status: TimerStatus) -> &'static str {
    match status {
        TimerStatus::Running => GREEN,
        TimerStatus::Paused => YELLOW,
        TimerStatus::Idle => GREY,
    }
}

/// Grey placeholder for a missing value, the value itself otherwise.
pub fn or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.to_string(),
        None => format!("{GREY}--{RESET}"),
    }
}
