use crate::cli::parser::TodoAction;
use crate::config::Config;
use crate::core::category::CategoryLogic;
use crate::core::todo::{TodoLogic, TodoPatch, parse_priority};
use crate::db::kv::load_queue;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::category::Category;
use crate::ui::messages::{info, success};
use crate::utils::table::Table;

pub fn handle(action: &TodoAction, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let conn = &pool.conn;

    match action {
        TodoAction::Add {
            title,
            category,
            priority,
            description,
        } => {
            let priority = parse_priority(*priority)?;
            let todo = TodoLogic::add(conn, title, category, priority, description.as_deref())?;
            success(format!("Todo added: {} ({})", todo.title, todo.id));
        }

        TodoAction::Edit {
            id,
            title,
            category,
            priority,
            description,
        } => {
            let patch = TodoPatch {
                title: title.clone(),
                description: description.clone(),
                category_id: category.clone(),
                priority: priority.map(parse_priority).transpose()?,
            };
            let todo = TodoLogic::edit(conn, id, patch)?;
            success(format!("Todo updated: {}", todo.title));
        }

        TodoAction::Del { id } => {
            let todo = TodoLogic::delete(conn, id)?;
            success(format!("Todo deleted: {}", todo.title));
        }

        TodoAction::Done { id } => {
            let todo = TodoLogic::toggle_complete(conn, id)?;
            if todo.completed {
                success(format!("Todo completed: {}", todo.title));
            } else {
                success(format!("Todo reopened: {}", todo.title));
            }
        }

        TodoAction::List { all, category } => {
            let todos = match category {
                Some(c) => {
                    CategoryLogic::require(conn, c)?;
                    TodoLogic::list_by_category(conn, c)?
                }
                None => TodoLogic::list(conn)?,
            };
            let todos: Vec<_> = todos.into_iter().filter(|t| *all || !t.completed).collect();

            if todos.is_empty() {
                info("No todos.");
                return Ok(());
            }

            let cats = CategoryLogic::list(conn)?;
            let queue = load_queue(conn)?;

            let mut table = Table::new(["ID", "P", "CAT", "Q", "DONE", "TITLE"]);
            for t in &todos {
                let abbr = cats
                    .iter()
                    .find(|c| c.id == t.category_id)
                    .map(|c: &Category| c.abbreviation.clone())
                    .unwrap_or_else(|| "?".to_string());
                let pos = queue
                    .position(&t.id)
                    .map(|p| (p + 1).to_string())
                    .unwrap_or_default();
                let done = if t.completed { "x" } else { "" };
                table.add_row(vec![
                    t.id.clone(),
                    t.priority.label(),
                    abbr,
                    pos,
                    done.to_string(),
                    t.title.clone(),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
