use crate::cli::parser::TimerAction;
use crate::config::Config;
use crate::core::category::CategoryLogic;
use crate::core::clock::SystemClock;
use crate::core::entry::EntryLogic;
use crate::core::timer::{Outcome, PersistStatus, Timer, TimerStatus, TimerStore};
use crate::core::todo::TodoLogic;
use crate::db::kv::{SqliteTimerStore, load_queue, save_queue};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::category::WASTED_TIME_ID;
use crate::ui::messages::{detail, info, success, warning};
use crate::utils::colors::{RESET, color_for_status, or_placeholder};
use crate::utils::time::format_elapsed;
use chrono::Local;
use rusqlite::Connection;

fn report_persist<S: TimerStore>(timer: &Timer<SystemClock, S>) {
    if timer.persist_status() == PersistStatus::Error {
        warning(format!(
            "Timer state could not be saved: {}",
            timer.persist_error().unwrap_or("unknown error")
        ));
    }
}

fn ignored(outcome: Outcome, msg: &str) -> bool {
    if outcome == Outcome::Ignored {
        warning(msg);
        true
    } else {
        false
    }
}

/// Category and todo for `timer start`: explicit options first, then the
/// next open todo in the queue, then Wasted Time.
fn resolve_start(
    conn: &Connection,
    category: &Option<String>,
    todo: &Option<String>,
) -> AppResult<(String, Option<String>)> {
    if let Some(todo_id) = todo {
        let t = TodoLogic::require(conn, todo_id)?;
        let cat = match category {
            Some(c) => CategoryLogic::require(conn, c)?.id,
            None => t.category_id.clone(),
        };
        return Ok((cat, Some(t.id)));
    }

    if let Some(c) = category {
        return Ok((CategoryLogic::require(conn, c)?.id, None));
    }

    let queue = load_queue(conn)?;
    if let Some(next) = TodoLogic::next_in_queue(conn, &queue)? {
        info(format!("Picking the next task from the queue: {}", next.title));
        return Ok((next.category_id, Some(next.id)));
    }

    Ok((WASTED_TIME_ID.to_string(), None))
}

fn category_name(conn: &Connection, id: &str) -> String {
    CategoryLogic::require(conn, id)
        .map(|c| c.name)
        .unwrap_or_else(|_| id.to_string())
}

pub fn handle(action: &TimerAction, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let conn = &pool.conn;
    let mut timer = Timer::restore(SystemClock, SqliteTimerStore::new(conn));

    match action {
        TimerAction::Start { category, todo } => {
            if !timer.session().is_idle() {
                warning(format!(
                    "Timer is already {}. Stop or reset it first.",
                    timer.status()
                ));
                return Ok(());
            }

            let (cat_id, todo_id) = resolve_start(conn, category, todo)?;
            let outcome = timer.start(cat_id.clone(), todo_id.clone());
            if !ignored(outcome, "Timer is already active.") {
                let label = match &todo_id {
                    Some(t) => format!("{} ({})", category_name(conn, &cat_id), t),
                    None => category_name(conn, &cat_id),
                };
                success(format!("Timer started: {}", label));
                audit(conn, "timer", "start", &label);
            }
        }

        TimerAction::Pause => {
            let outcome = timer.pause();
            if !ignored(outcome, "Timer is not running.") {
                success(format!("Timer paused at {}", format_elapsed(timer.elapsed_ms())));
                audit(conn, "timer", "pause", &format!("{} ms", timer.elapsed_ms()));
            }
        }

        TimerAction::Resume => {
            let outcome = timer.resume();
            if !ignored(outcome, "Timer is not paused.") {
                success(format!("Timer resumed at {}", format_elapsed(timer.elapsed_ms())));
                audit(conn, "timer", "resume", &format!("{} ms", timer.elapsed_ms()));
            }
        }

        TimerAction::Stop {
            title,
            description,
            not_done,
        } => {
            let Some(record) = timer.stop() else {
                warning("Timer is idle, nothing to log.");
                return Ok(());
            };
            report_persist(&timer);

            let todo = match &record.todo_id {
                Some(id) => crate::db::todos::get_todo(conn, id)?,
                None => None,
            };

            let title = title.clone().or_else(|| todo.as_ref().map(|t| t.title.clone()));
            let entry = EntryLogic::log_stop(conn, &record, title.as_deref(), description.as_deref())?;

            success(format!(
                "Logged {} min to {}",
                entry.duration_minutes,
                category_name(conn, &entry.category_id)
            ));
            audit(
                conn,
                "timer",
                "stop",
                &format!("{} ({} ms)", entry.id, record.elapsed_ms),
            );

            if let Some(t) = &todo {
                if !*not_done && !t.completed {
                    TodoLogic::toggle_complete(conn, &t.id)?;
                    success(format!("Todo completed: {}", t.title));
                }

                let mut queue = load_queue(conn)?;
                if queue.remove(&t.id) {
                    save_queue(conn, &queue)?;
                }
            }

            let queue = load_queue(conn)?;
            if let Some(next) = TodoLogic::next_in_queue(conn, &queue)? {
                info(format!("Up next: {} ({})", next.title, next.id));
            }
            return Ok(());
        }

        TimerAction::Reset => {
            let was = timer.status();
            timer.reset();
            success("Timer reset.");
            if was != TimerStatus::Idle {
                audit(conn, "timer", "reset", &format!("discarded {} session", was));
            }
        }

        TimerAction::Status => {
            print_status(conn, &timer);
            return Ok(());
        }

        TimerAction::Category { id } => {
            let cat = CategoryLogic::require(conn, id)?;
            let outcome = timer.update_category(cat.id.clone());
            if !ignored(outcome, "Timer is idle, no session to update.") {
                success(format!("Timer category set to {}", cat.name));
                audit(conn, "timer", "category", &cat.id);
            }
        }

        TimerAction::Add { minutes } => {
            let outcome = timer.adjust(minutes.saturating_mul(60_000));
            if !ignored(outcome, "Timer is idle, nothing to adjust.") {
                success(format!(
                    "Added {} min, elapsed now {}",
                    minutes,
                    format_elapsed(timer.elapsed_ms())
                ));
                audit(conn, "timer", "adjust", &format!("+{} min", minutes));
            }
        }
    }

    report_persist(&timer);
    Ok(())
}

fn print_status<S: TimerStore>(conn: &Connection, timer: &Timer<SystemClock, S>) {
    let session = timer.session();
    let status = timer.status();
    detail("Status", format!("{}{}{}", color_for_status(status), status, RESET));

    if session.is_idle() {
        return;
    }

    if let Some(cat) = session.category_id() {
        detail("Category", category_name(conn, cat));
    }
    let todo = session.todo_id().map(|id| {
        crate::db::todos::get_todo(conn, id)
            .ok()
            .flatten()
            .map(|t| t.title)
            .unwrap_or_else(|| id.to_string())
    });
    detail("Todo", or_placeholder(todo.as_deref()));
    if let Some(started) = session.started_at() {
        detail(
            "Started",
            started.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
        );
    }
    detail("Elapsed", format_elapsed(timer.elapsed_ms()));
}
