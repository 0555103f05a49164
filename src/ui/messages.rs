//! User-facing status lines. Everything a command reports goes through
//! here so the icons and colors stay consistent.

use std::fmt;
use unicode_width::UnicodeWidthStr;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const CYAN: &str = "\x1b[36m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

impl Tone {
    fn color(self) -> &'static str {
        match self {
            Tone::Info => "\x1b[34m",
            Tone::Success => "\x1b[32m",
            Tone::Warning => "\x1b[33m",
            Tone::Error => "\x1b[31m",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Tone::Info => "ℹ️",
            Tone::Success => "✅",
            Tone::Warning => "⚠️",
            Tone::Error => "❌",
        }
    }
}

fn line<T: fmt::Display>(tone: Tone, msg: T) -> String {
    format!("{}{}{} {}{}", tone.color(), BOLD, tone.icon(), RESET, msg)
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", line(Tone::Info, msg));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", line(Tone::Success, msg));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}", line(Tone::Warning, msg));
}

/// Errors go to stderr.
pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}", line(Tone::Error, msg));
}

/// Section title underlined to its own width.
pub fn header<T: fmt::Display>(msg: T) {
    let title = msg.to_string();
    let rule = "═".repeat(UnicodeWidthStr::width(title.as_str()).max(3));
    println!("{}{}{}\n{}{}\n", Tone::Info.color(), BOLD, title, rule, RESET);
}

/// `• Label: value` line used by the status and info screens.
pub fn detail<T: fmt::Display>(label: &str, value: T) {
    println!("{}• {}:{} {}", CYAN, label, RESET, value);
}
