use crate::cli::parser::ChapterAction;
use crate::config::Config;
use crate::core::chapter::{ChapterLogic, ChapterPatch};
use crate::core::day_boundary::{LogicalDayKey, days_between};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET};
use crate::utils::formatting::hex_fg;

fn day(raw: &str) -> AppResult<LogicalDayKey> {
    raw.parse()
}

pub fn handle(action: &ChapterAction, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let conn = &pool.conn;

    match action {
        ChapterAction::Add {
            name,
            start,
            end,
            color,
            description,
            tasks,
        } => {
            let ch = ChapterLogic::add(
                conn,
                name,
                day(start)?,
                day(end)?,
                color.as_deref(),
                description.as_deref(),
                tasks.clone(),
            )?;
            success(format!(
                "Chapter added: {}, {} to {} ({})",
                ch.name, ch.start_date, ch.end_date, ch.id
            ));
        }

        ChapterAction::Edit {
            id,
            name,
            start,
            end,
            color,
            description,
            tasks,
        } => {
            let patch = ChapterPatch {
                name: name.clone(),
                start_date: start.as_deref().map(day).transpose()?,
                end_date: end.as_deref().map(day).transpose()?,
                color: color.clone(),
                description: description.clone(),
                tasks: (!tasks.is_empty()).then(|| tasks.clone()),
            };
            let ch = ChapterLogic::edit(conn, id, patch)?;
            success(format!("Chapter updated: {}", ch.name));
        }

        ChapterAction::Del { id } => {
            let ch = ChapterLogic::delete(conn, id)?;
            success(format!("Chapter deleted: {}", ch.name));
        }

        ChapterAction::List => {
            let chapters = ChapterLogic::list(conn)?;
            if chapters.is_empty() {
                info("No chapters.");
                return Ok(());
            }

            for ch in &chapters {
                let days = days_between(ch.start_date, ch.end_date);
                println!(
                    "{}━━{} {} {}({} → {}, {} day{}){}  {}",
                    hex_fg(&ch.color),
                    RESET,
                    ch.name,
                    GREY,
                    ch.start_date,
                    ch.end_date,
                    days,
                    if days == 1 { "" } else { "s" },
                    RESET,
                    ch.id
                );
                if let Some(d) = &ch.description {
                    println!("     {}", d);
                }
                for t in &ch.tasks {
                    println!("     • {}", t);
                }
            }
        }
    }

    Ok(())
}
