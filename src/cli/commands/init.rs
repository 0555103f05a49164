use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{detail, header, info, success};
use crate::utils::path::expand_tilde;

/// Create the config file (unless `--test`) and the database, then apply
/// every migration.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let custom = cli
        .db
        .as_deref()
        .map(|d| expand_tilde(d).to_string_lossy().into_owned());
    let db_path = Config::init_all(custom, cli.test)?;
    let shown = db_path.display().to_string();

    header("Initializing daybook");
    if !cli.test {
        detail("Config file", Config::config_file().display());
    }
    detail("Database", &shown);

    let pool = DbPool::open(&db_path)?;
    let applied = pool.migrate()?;
    if applied.is_empty() {
        info("Schema already up to date.");
    }
    for version in &applied {
        info(format!("Migration applied: {version}"));
    }

    audit(&pool.conn, "init", &shown, "Database initialized");
    success(format!("Database initialized at {shown}"));
    Ok(())
}
