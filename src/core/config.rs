//! Inspection and maintenance of the YAML configuration file.

use crate::config::Config;
use crate::config::migrate::{fill_missing_keys, missing_keys};
use crate::config::read_file;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(path: &Path) -> AppResult<()> {
        print!("{}", read_file(path)?);
        Ok(())
    }

    /// Report keys missing from the file. Returns true when complete.
    pub fn check(path: &Path) -> AppResult<bool> {
        let missing = missing_keys(&read_file(path)?)?;

        if missing.is_empty() {
            success("Configuration is complete.");
            return Ok(true);
        }

        for key in &missing {
            warning(format!("Missing key: {key}"));
        }
        info("Run `daybook config --migrate` to add them with default values.");
        Ok(false)
    }

    pub fn migrate(path: &Path) -> AppResult<()> {
        let added = fill_missing_keys(path)?;
        if added.is_empty() {
            info("Configuration already up to date.");
        } else {
            success(format!("Added keys: {}", added.join(", ")));
        }
        Ok(())
    }

    /// Open the file in an editor, then make sure it still parses.
    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        let editor = resolve_editor(editor, env::var("EDITOR").ok());

        let status = Command::new(&editor)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(format!("cannot launch '{editor}': {e}")))?;

        if !status.success() {
            warning(format!("'{editor}' exited with {status}"));
        }

        match Config::from_yaml(&fs::read_to_string(path)?) {
            Ok(_) => success("Configuration saved."),
            Err(e) => warning(format!(
                "The edited file no longer parses ({e}); defaults apply until it is fixed."
            )),
        }
        Ok(())
    }
}

fn resolve_editor(flag: Option<&str>, env_editor: Option<String>) -> String {
    flag.map(str::to_string)
        .or(env_editor.filter(|e| !e.trim().is_empty()))
        .unwrap_or_else(|| {
            if cfg!(target_os = "windows") {
                "notepad".into()
            } else {
                "nano".into()
            }
        })
}
