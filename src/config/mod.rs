use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate; // missing-key check and rewrite of the YAML file

use crate::core::grid::MAX_GRID_DAYS;

pub const MAX_DAY_END_HOUR: u32 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// Hour at which the logical day rolls over, 0..=8.
    #[serde(default)]
    pub day_ends_at_hour: u32,
    /// Daily target drawn on the histogram, 1..=24.
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: u32,
    /// Columns shown by `grid` without `--period`.
    #[serde(default = "default_grid_days")]
    pub grid_days: u32,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_hours_per_day() -> u32 {
    16
}
fn default_grid_days() -> u32 {
    14
}
fn default_separator_char() -> String {
    "-".to_string()
}

/// Read a configuration file, keeping its path in the error.
pub fn read_file(path: &Path) -> AppResult<String> {
    fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            day_ends_at_hour: 0,
            hours_per_day: default_hours_per_day(),
            grid_days: default_grid_days(),
            separator_char: default_separator_char(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("daybook")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".daybook")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("daybook.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("daybook.sqlite")
    }

    /// Keep the numeric settings inside their valid ranges.
    pub fn clamped(mut self) -> Self {
        self.day_ends_at_hour = self.day_ends_at_hour.min(MAX_DAY_END_HOUR);
        self.hours_per_day = self.hours_per_day.clamp(1, 24);
        self.grid_days = self.grid_days.clamp(1, MAX_GRID_DAYS);
        self
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config = serde_yaml::from_str(content)?;
        Ok(cfg.clamped())
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if path.exists() {
            Self::from_yaml(&read_file(path)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Initialize configuration and database files.
    /// Returns the database path.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            dir.join("daybook.sqlite")
        };

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            config.save_to(&Self::config_file())?;
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }
}
