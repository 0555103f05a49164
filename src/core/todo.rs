use crate::core::ids::new_id;
use crate::core::queue::Queue;
use crate::db::kv::{load_queue, save_queue};
use crate::db::log::audit;
use crate::db::{categories, todos};
use crate::errors::{AppError, AppResult};
use crate::models::todo::{Priority, TodoItem};
use chrono::Utc;
use rusqlite::Connection;

#[derive(Debug, Default, Clone)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub priority: Option<Priority>,
}

pub struct TodoLogic;

fn checked_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("todo title cannot be empty".into()));
    }
    Ok(title.to_string())
}

fn require_category(conn: &Connection, id: &str) -> AppResult<()> {
    match categories::get_category(conn, id)? {
        Some(_) => Ok(()),
        None => Err(AppError::CategoryNotFound(id.to_string())),
    }
}

pub fn parse_priority(raw: u8) -> AppResult<Priority> {
    Priority::from_u8(raw).ok_or(AppError::InvalidPriority(raw))
}

impl TodoLogic {
    pub fn require(conn: &Connection, id: &str) -> AppResult<TodoItem> {
        todos::get_todo(conn, id)?.ok_or_else(|| AppError::TodoNotFound(id.to_string()))
    }

    /// All todos, highest priority first.
    pub fn list(conn: &Connection) -> AppResult<Vec<TodoItem>> {
        todos::load_todos(conn)
    }

    pub fn list_active(conn: &Connection) -> AppResult<Vec<TodoItem>> {
        Ok(Self::list(conn)?.into_iter().filter(|t| !t.completed).collect())
    }

    pub fn list_by_category(conn: &Connection, category_id: &str) -> AppResult<Vec<TodoItem>> {
        Ok(Self::list(conn)?
            .into_iter()
            .filter(|t| t.category_id == category_id)
            .collect())
    }

    pub fn add(
        conn: &Connection,
        title: &str,
        category_id: &str,
        priority: Priority,
        description: Option<&str>,
    ) -> AppResult<TodoItem> {
        require_category(conn, category_id)?;

        let todo = TodoItem {
            id: new_id("todo"),
            title: checked_title(title)?,
            description: description.map(str::trim).filter(|d| !d.is_empty()).map(String::from),
            category_id: category_id.to_string(),
            priority,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        };

        todos::insert_todo(conn, &todo)?;
        audit(conn, "add", &todo.id, &format!("Todo '{}' ({})", todo.title, todo.priority.label()));
        Ok(todo)
    }

    pub fn edit(conn: &Connection, id: &str, patch: TodoPatch) -> AppResult<TodoItem> {
        let mut todo = Self::require(conn, id)?;

        if let Some(title) = patch.title {
            todo.title = checked_title(&title)?;
        }
        if let Some(desc) = patch.description {
            let desc = desc.trim();
            todo.description = (!desc.is_empty()).then(|| desc.to_string());
        }
        if let Some(cat) = patch.category_id {
            require_category(conn, &cat)?;
            todo.category_id = cat;
        }
        if let Some(p) = patch.priority {
            todo.priority = p;
        }

        todos::update_todo(conn, &todo)?;
        audit(conn, "edit", &todo.id, &format!("Todo '{}' updated", todo.title));
        Ok(todo)
    }

    /// Flip completion. A todo that becomes completed leaves the queue.
    pub fn toggle_complete(conn: &Connection, id: &str) -> AppResult<TodoItem> {
        let mut todo = Self::require(conn, id)?;
        todo.toggle(Utc::now());
        todos::update_todo(conn, &todo)?;

        if todo.completed {
            let mut q = load_queue(conn)?;
            if q.remove(&todo.id) {
                save_queue(conn, &q)?;
            }
        }

        let state = if todo.completed { "completed" } else { "reopened" };
        audit(conn, "edit", &todo.id, &format!("Todo '{}' {}", todo.title, state));
        Ok(todo)
    }

    /// Delete a todo and drop it from the queue.
    pub fn delete(conn: &Connection, id: &str) -> AppResult<TodoItem> {
        let todo = Self::require(conn, id)?;
        todos::delete_todo(conn, &todo.id)?;

        let mut q = load_queue(conn)?;
        if q.remove(&todo.id) {
            save_queue(conn, &q)?;
        }

        audit(conn, "del", &todo.id, &format!("Todo '{}' deleted", todo.title));
        Ok(todo)
    }

    /// Queue entries resolved to todos. Ids whose todo is gone are skipped.
    pub fn resolve_queue(conn: &Connection, q: &Queue) -> AppResult<Vec<TodoItem>> {
        let mut out = Vec::new();
        for id in q.ids() {
            if let Some(t) = todos::get_todo(conn, id)? {
                out.push(t);
            }
        }
        Ok(out)
    }

    /// First queued todo that is not completed.
    pub fn next_in_queue(conn: &Connection, q: &Queue) -> AppResult<Option<TodoItem>> {
        Ok(Self::resolve_queue(conn, q)?.into_iter().find(|t| !t.completed))
    }
}
