use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success};

/// Handle `db`. Without flags it shows the info screen.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    if *migrate {
        let applied = DbPool::open(&cfg.database)?.migrate()?;
        if applied.is_empty() {
            info("Nothing to migrate.");
        }
        for v in &applied {
            success(format!("Migration applied: {}", v));
        }
    }

    let pool = DbPool::new(&cfg.database)?;

    if *show_info || !(*migrate || *check || *vacuum) {
        stats::print_db_info(&pool, &cfg.database)?;
    }

    if *check {
        let result: String = pool
            .conn
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

        if result == "ok" {
            success("Integrity check passed.");
        } else {
            error(format!("Integrity check failed: {}", result));
        }
    }

    if *vacuum {
        pool.conn.execute_batch("VACUUM;")?;
        audit(&pool.conn, "vacuum", "db", "Database compacted");
        success("Database optimized (VACUUM).");
    }

    Ok(())
}
