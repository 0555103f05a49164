use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Log { print: true, tail } => {
            let pool = DbPool::new(&cfg.database)?;
            LogLogic::print_log(&pool, *tail)
        }
        _ => {
            info("Use `daybook log --print [--tail N]` to show the internal log.");
            Ok(())
        }
    }
}
