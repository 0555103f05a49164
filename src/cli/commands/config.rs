use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::{header, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = cmd
    else {
        return Ok(());
    };

    let path = Config::config_file();
    let exists = path.exists();

    if *print_config {
        if exists {
            header(format!("Configuration ({})", path.display()));
            ConfigLogic::print(&path)?;
        } else {
            header(format!("Defaults (no file at {})", path.display()));
            print!("{}", serde_yaml::to_string(cfg)?);
        }
    }

    if !(*check || *migrate || *edit_config) {
        return Ok(());
    }

    if !exists {
        warning(format!(
            "No configuration file at {}. Run `daybook init` first.",
            path.display()
        ));
        return Ok(());
    }

    if *check {
        ConfigLogic::check(&path)?;
    }
    if *migrate {
        ConfigLogic::migrate(&path)?;
    }
    if *edit_config {
        ConfigLogic::edit(&path, editor.as_deref())?;
    }
    Ok(())
}
