use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys every configuration file is expected to carry.
pub const EXPECTED_KEYS: [&str; 5] = [
    "database",
    "day_ends_at_hour",
    "hours_per_day",
    "grid_days",
    "separator_char",
];

fn parse_mapping(content: &str) -> AppResult<Mapping> {
    let yaml: Value = serde_yaml::from_str(content)?;
    match yaml {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config("configuration is not a YAML mapping".into())),
    }
}

/// Expected keys absent from the YAML document.
pub fn missing_keys(content: &str) -> AppResult<Vec<&'static str>> {
    let map = parse_mapping(content)?;
    Ok(EXPECTED_KEYS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(Value::String((*k).to_string())))
        .collect())
}

/// Add the missing keys with their default values, keeping everything the
/// user already set (unknown keys included). Returns the keys added; the
/// file is only rewritten when something was added.
pub fn fill_missing_keys(path: &Path) -> AppResult<Vec<&'static str>> {
    let content = super::read_file(path)?;
    let mut map = parse_mapping(&content)?;

    let defaults = serde_yaml::to_value(super::Config::default())?;

    let mut added = Vec::new();
    for key in EXPECTED_KEYS {
        let k = Value::String(key.to_string());
        if map.contains_key(&k) {
            continue;
        }
        if let Some(v) = defaults.get(key) {
            map.insert(k, v.clone());
            added.push(key);
        }
    }

    if !added.is_empty() {
        fs::write(path, serde_yaml::to_string(&Value::Mapping(map))?)?;
    }

    Ok(added)
}
