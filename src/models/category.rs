use serde::{Deserialize, Serialize};

/// Fallback category used when the timer starts without one.
pub const WASTED_TIME_ID: &str = "cat-wasted";

pub const PRESET_COLORS: [&str; 10] = [
    "#ef4444", "#f97316", "#eab308", "#22c55e", "#06b6d4", "#3b82f6", "#8b5cf6", "#ec4899",
    "#f43f5e", "#14b8a6",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,       // ⇔ categories.id
    pub name: String,     // e.g. "Reading", "Writing"
    pub abbreviation: String, // 1-3 uppercase letters, e.g. "RD"
    pub color: String,    // #rrggbb, used to shade the histogram
    pub is_default: bool, // seeded categories cannot be deleted
}

impl Category {
    pub fn wasted_time() -> Self {
        Self {
            id: WASTED_TIME_ID.to_string(),
            name: "Wasted Time".to_string(),
            abbreviation: "WT".to_string(),
            color: "#6b7280".to_string(),
            is_default: true,
        }
    }

    /// Trim, uppercase and keep at most three characters.
    pub fn normalize_abbreviation(raw: &str) -> String {
        raw.trim().to_uppercase().chars().take(3).collect()
    }

    pub fn is_valid_color(color: &str) -> bool {
        color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit())
    }
}
