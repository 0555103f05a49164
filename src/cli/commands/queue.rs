use crate::cli::parser::QueueAction;
use crate::config::Config;
use crate::core::todo::TodoLogic;
use crate::db::kv::{load_queue, save_queue};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::table::Table;

/// 1-based position from the command line to a queue index.
fn index(pos: usize) -> AppResult<usize> {
    pos.checked_sub(1)
        .ok_or_else(|| AppError::InvalidInput("positions start at 1".into()))
}

pub fn handle(action: &QueueAction, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let conn = &pool.conn;
    let mut queue = load_queue(conn)?;

    match action {
        QueueAction::Add { id } => {
            let todo = TodoLogic::require(conn, id)?;
            if todo.completed {
                return Err(AppError::InvalidInput(format!(
                    "todo '{}' is already completed",
                    todo.title
                )));
            }
            if !queue.add(todo.id.clone()) {
                warning(format!("Already queued: {}", todo.title));
                return Ok(());
            }
            save_queue(conn, &queue)?;
            audit(conn, "queue", &todo.id, &format!("Queued '{}'", todo.title));
            success(format!("Queued at #{}: {}", queue.len(), todo.title));
        }

        QueueAction::Remove { id } => {
            if !queue.remove(id) {
                warning(format!("Not in the queue: {}", id));
                return Ok(());
            }
            save_queue(conn, &queue)?;
            audit(conn, "queue", id, "Removed from queue");
            success(format!("Removed from the queue: {}", id));
        }

        QueueAction::Move { from, to } => {
            let (from, to) = (index(*from)?, index(*to)?);
            if !queue.reorder(from, to) {
                return Err(AppError::InvalidInput(format!(
                    "no queue item at position {} (queue has {})",
                    from + 1,
                    queue.len()
                )));
            }
            save_queue(conn, &queue)?;
            audit(conn, "queue", "reorder", &format!("{} -> {}", from + 1, to + 1));
            success("Queue reordered.");
            print_queue(conn, &queue)?;
        }

        QueueAction::Insert { id, index: pos } => {
            let todo = TodoLogic::require(conn, id)?;
            queue.insert_at(todo.id.clone(), index(*pos)?);
            save_queue(conn, &queue)?;
            let at = queue.position(&todo.id).map(|p| p + 1).unwrap_or(*pos);
            audit(conn, "queue", &todo.id, &format!("Inserted at #{}", at));
            success(format!("Queued at #{}: {}", at, todo.title));
        }

        QueueAction::Next => match TodoLogic::next_in_queue(conn, &queue)? {
            Some(t) => println!("{} ({})", t.title, t.id),
            None => info("The queue is empty."),
        },

        QueueAction::Pop => match queue.pop() {
            Some(id) => {
                save_queue(conn, &queue)?;
                audit(conn, "queue", &id, "Popped from queue");
                match TodoLogic::require(conn, &id) {
                    Ok(t) => println!("{} ({})", t.title, t.id),
                    Err(_) => println!("{}", id),
                }
            }
            None => info("The queue is empty."),
        },

        QueueAction::List => print_queue(conn, &queue)?,

        QueueAction::Clear => {
            let n = queue.len();
            queue.clear();
            save_queue(conn, &queue)?;
            audit(conn, "queue", "clear", &format!("{} item(s) removed", n));
            success(format!("Queue cleared ({} item(s)).", n));
        }
    }

    Ok(())
}

fn print_queue(conn: &rusqlite::Connection, queue: &crate::core::queue::Queue) -> AppResult<()> {
    if queue.is_empty() {
        info("The queue is empty.");
        return Ok(());
    }

    let mut table = Table::new(["#", "ID", "P", "DONE", "TITLE"]);
    for (i, id) in queue.ids().iter().enumerate() {
        let row = match TodoLogic::require(conn, id) {
            Ok(t) => vec![
                (i + 1).to_string(),
                t.id,
                t.priority.label(),
                if t.completed { "x".into() } else { String::new() },
                t.title,
            ],
            Err(AppError::TodoNotFound(_)) => vec![
                (i + 1).to_string(),
                id.clone(),
                String::new(),
                String::new(),
                "(missing)".into(),
            ],
            Err(e) => return Err(e),
        };
        table.add_row(row);
    }
    print!("{}", table.render());
    Ok(())
}
