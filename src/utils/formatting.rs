//! Formatting utilities used for CLI outputs.

/// Minutes as `02h 25m` (long) or `02:25` (short).
pub fn mins2readable(mins: i64, short: bool) -> String {
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;
    let sign = if mins < 0 { "-" } else { "" };

    if short {
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// Minutes as compact hours, e.g. `1.5h`, `2h`.
pub fn hours_label(mins: i64) -> String {
    let h = mins as f64 / 60.0;
    if (h - h.round()).abs() < f64::EPSILON {
        format!("{}h", h.round() as i64)
    } else {
        format!("{:.1}h", h)
    }
}

/// Truecolor foreground escape for a `#rrggbb` color; empty if malformed.
pub fn hex_fg(color: &str) -> String {
    match parse_hex(color) {
        Some((r, g, b)) => format!("\x1b[38;2;{};{};{}m", r, g, b),
        None => String::new(),
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
