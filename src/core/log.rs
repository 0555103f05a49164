//! Rendering of the internal audit log (`log --print`).

use crate::db::log::{LogRow, load_log};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use chrono::{DateTime, Local};
use regex::Regex;

const MAX_OP_WIDTH: usize = 40;

fn strip_ansi(re: &Regex, s: &str) -> String {
    re.replace_all(s, "").into_owned()
}

fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" => Colour::Green,
        "del" => Colour::Red,
        "edit" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "export" => Colour::Blue,
        "timer" => Colour::Cyan,
        "queue" => Colour::RGB(128, 128, 255),
        "init" | "vacuum" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// `operation (target)`, the operation word colored, cut to `MAX_OP_WIDTH`
/// visible characters.
fn op_label(row: &LogRow) -> String {
    let plain = if row.target.is_empty() {
        row.operation.clone()
    } else {
        format!("{} ({})", row.operation, row.target)
    };

    let visible: String = if plain.chars().count() > MAX_OP_WIDTH {
        let mut s: String = plain.chars().take(MAX_OP_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        plain
    };

    let color = color_for_operation(&row.operation);
    match visible.split_once(' ') {
        Some((word, rest)) => format!("{} {}", color.paint(word), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

fn local_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub struct LogLogic;

impl LogLogic {
    /// One aligned line per row. Alignment is computed on the text with
    /// the color codes stripped.
    pub fn render(rows: &[LogRow]) -> AppResult<Vec<String>> {
        let re = Regex::new(r"\x1B\[[0-9;]*[mK]").map_err(|e| AppError::Other(e.to_string()))?;

        let labels: Vec<String> = rows.iter().map(op_label).collect();
        let op_w = labels
            .iter()
            .map(|l| strip_ansi(&re, l).chars().count())
            .max()
            .unwrap_or(0);
        let id_w = rows
            .iter()
            .map(|r| r.id.to_string().len())
            .max()
            .unwrap_or(1);

        Ok(rows
            .iter()
            .zip(labels)
            .map(|(row, label)| {
                let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&re, &label).chars().count()));
                format!(
                    "{:>id_w$}: {} | {}{} => {}",
                    row.id,
                    local_date(&row.date),
                    label,
                    padding,
                    row.message,
                )
            })
            .collect())
    }

    pub fn print_log(pool: &DbPool, tail: Option<usize>) -> AppResult<()> {
        let rows = load_log(&pool.conn, tail)?;
        if rows.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        println!("📜 Internal log:\n");
        for line in Self::render(&rows)? {
            println!("{}", line);
        }
        Ok(())
    }
}
