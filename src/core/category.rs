use crate::core::clock::SystemClock;
use crate::core::ids::new_id;
use crate::core::timer::{Timer, TimerStore};
use crate::db::kv::SqliteTimerStore;
use crate::db::log::audit;
use crate::db::{categories, entries, todos};
use crate::errors::{AppError, AppResult};
use crate::models::category::{Category, PRESET_COLORS, WASTED_TIME_ID};
use rusqlite::Connection;

/// Changes requested by `category edit`; `None` keeps the current value.
#[derive(Debug, Default, Clone)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub color: Option<String>,
}

pub struct CategoryLogic;

fn checked_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("category name cannot be empty".into()));
    }
    Ok(name.to_string())
}

fn checked_abbreviation(raw: &str) -> AppResult<String> {
    let abbr = Category::normalize_abbreviation(raw);
    if abbr.is_empty() {
        return Err(AppError::InvalidInput("abbreviation cannot be empty".into()));
    }
    Ok(abbr)
}

fn checked_color(color: &str) -> AppResult<String> {
    let color = color.trim().to_lowercase();
    if !Category::is_valid_color(&color) {
        return Err(AppError::InvalidColor(color));
    }
    Ok(color)
}

/// Point a stored timer session on `from` at the default category.
fn retarget_timer(conn: &Connection, from: &str) -> AppResult<()> {
    let stored = SqliteTimerStore::new(conn).load()?;
    if stored.and_then(|r| r.category_id).as_deref() != Some(from) {
        return Ok(());
    }

    let mut timer = Timer::restore(SystemClock, SqliteTimerStore::new(conn));
    timer.update_category(WASTED_TIME_ID);
    match timer.persist_error() {
        Some(e) => Err(AppError::Other(format!("cannot update the timer: {e}"))),
        None => Ok(()),
    }
}

impl CategoryLogic {
    pub fn require(conn: &Connection, id: &str) -> AppResult<Category> {
        categories::get_category(conn, id)?.ok_or_else(|| AppError::CategoryNotFound(id.to_string()))
    }

    pub fn list(conn: &Connection) -> AppResult<Vec<Category>> {
        categories::load_categories(conn)
    }

    pub fn add(
        conn: &Connection,
        name: &str,
        abbreviation: &str,
        color: Option<&str>,
        id: Option<&str>,
    ) -> AppResult<Category> {
        let id = match id {
            Some(id) => {
                let id = id.trim().to_string();
                if id.is_empty() {
                    return Err(AppError::InvalidInput("category id cannot be empty".into()));
                }
                if categories::get_category(conn, &id)?.is_some() {
                    return Err(AppError::InvalidInput(format!("category '{}' already exists", id)));
                }
                id
            }
            None => new_id("cat"),
        };

        let color = match color {
            Some(c) => checked_color(c)?,
            None => {
                let n = categories::count_categories(conn)?;
                PRESET_COLORS[n % PRESET_COLORS.len()].to_string()
            }
        };

        let cat = Category {
            id,
            name: checked_name(name)?,
            abbreviation: checked_abbreviation(abbreviation)?,
            color,
            is_default: false,
        };

        categories::insert_category(conn, &cat)?;
        audit(conn, "add", &cat.id, &format!("Category '{}' ({})", cat.name, cat.abbreviation));
        Ok(cat)
    }

    pub fn edit(conn: &Connection, id: &str, patch: CategoryPatch) -> AppResult<Category> {
        let mut cat = Self::require(conn, id)?;

        if let Some(name) = patch.name {
            cat.name = checked_name(&name)?;
        }
        if let Some(abbr) = patch.abbreviation {
            cat.abbreviation = checked_abbreviation(&abbr)?;
        }
        if let Some(color) = patch.color {
            cat.color = checked_color(&color)?;
        }

        categories::update_category(conn, &cat)?;
        audit(conn, "edit", &cat.id, &format!("Category '{}' updated", cat.name));
        Ok(cat)
    }

    /// Delete a category. Its todos, its entries and a timer session
    /// running on it move to the default category. Returns the deleted
    /// category and the moved row counts.
    pub fn delete(conn: &Connection, id: &str) -> AppResult<(Category, usize, usize)> {
        let cat = Self::require(conn, id)?;
        if cat.is_default {
            return Err(AppError::DefaultCategory(cat.name));
        }

        let tx = conn.unchecked_transaction()?;
        let moved_todos = todos::reassign_category(&tx, &cat.id, WASTED_TIME_ID)?;
        let moved_entries = entries::reassign_category(&tx, &cat.id, WASTED_TIME_ID)?;
        retarget_timer(&tx, &cat.id)?;
        categories::delete_category(&tx, &cat.id)?;
        tx.commit()?;

        audit(
            conn,
            "del",
            &cat.id,
            &format!(
                "Category '{}' deleted ({} todos, {} entries moved to {})",
                cat.name, moved_todos, moved_entries, WASTED_TIME_ID
            ),
        );
        Ok((cat, moved_todos, moved_entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;

    #[test]
    fn add_normalizes_and_picks_a_palette_color() {
        let pool = DbPool::in_memory().unwrap();
        let cat = CategoryLogic::add(&pool.conn, " Reading ", "rdx9", None, None).unwrap();

        assert!(cat.id.starts_with("cat-"));
        assert_eq!(cat.name, "Reading");
        assert_eq!(cat.abbreviation, "RDX");
        // one category (the default) already exists
        assert_eq!(cat.color, PRESET_COLORS[1]);
        assert!(!cat.is_default);

        let all = CategoryLogic::list(&pool.conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, WASTED_TIME_ID);
    }

    #[test]
    fn explicit_ids_must_be_unique() {
        let pool = DbPool::in_memory().unwrap();
        CategoryLogic::add(&pool.conn, "Work", "WK", Some("#112233"), Some("cat-work")).unwrap();
        let dup = CategoryLogic::add(&pool.conn, "Work 2", "W2", None, Some("cat-work"));
        assert!(matches!(dup, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn bad_colors_are_rejected() {
        let pool = DbPool::in_memory().unwrap();
        let res = CategoryLogic::add(&pool.conn, "Work", "WK", Some("red"), None);
        assert!(matches!(res, Err(AppError::InvalidColor(_))));
    }

    #[test]
    fn edit_applies_only_given_fields() {
        let pool = DbPool::in_memory().unwrap();
        let cat = CategoryLogic::add(&pool.conn, "Work", "WK", Some("#112233"), None).unwrap();

        let patch = CategoryPatch {
            abbreviation: Some("job".into()),
            ..Default::default()
        };
        let edited = CategoryLogic::edit(&pool.conn, &cat.id, patch).unwrap();
        assert_eq!(edited.name, "Work");
        assert_eq!(edited.abbreviation, "JOB");
        assert_eq!(edited.color, "#112233");
        assert_eq!(CategoryLogic::require(&pool.conn, &cat.id).unwrap(), edited);
    }

    #[test]
    fn default_category_cannot_be_deleted() {
        let pool = DbPool::in_memory().unwrap();
        let res = CategoryLogic::delete(&pool.conn, WASTED_TIME_ID);
        assert!(matches!(res, Err(AppError::DefaultCategory(_))));
    }

    #[test]
    fn delete_moves_todos_to_the_default_category() {
        let pool = DbPool::in_memory().unwrap();
        let cat = CategoryLogic::add(&pool.conn, "Work", "WK", None, None).unwrap();
        let todo = crate::core::todo::TodoLogic::add(
            &pool.conn,
            "Write report",
            &cat.id,
            crate::models::todo::Priority::Medium,
            None,
        )
        .unwrap();

        let (_, moved_todos, moved_entries) = CategoryLogic::delete(&pool.conn, &cat.id).unwrap();
        assert_eq!((moved_todos, moved_entries), (1, 0));
        assert!(categories::get_category(&pool.conn, &cat.id).unwrap().is_none());

        let todo = todos::get_todo(&pool.conn, &todo.id).unwrap().unwrap();
        assert_eq!(todo.category_id, WASTED_TIME_ID);
    }

    #[test]
    fn delete_moves_the_running_timer_to_the_default_category() {
        let pool = DbPool::in_memory().unwrap();
        let cat = CategoryLogic::add(&pool.conn, "Work", "WK", None, Some("cat-work")).unwrap();

        let mut timer = Timer::restore(SystemClock, SqliteTimerStore::new(&pool.conn));
        timer.start(cat.id.clone(), None);
        drop(timer);

        CategoryLogic::delete(&pool.conn, &cat.id).unwrap();

        let mut timer = Timer::restore(SystemClock, SqliteTimerStore::new(&pool.conn));
        assert_eq!(timer.session().category_id(), Some(WASTED_TIME_ID));
        let record = timer.stop().unwrap();
        let entry = crate::core::entry::EntryLogic::log_stop(&pool.conn, &record, None, None).unwrap();
        assert_eq!(entry.category_id, WASTED_TIME_ID);
    }

    #[test]
    fn delete_leaves_a_timer_on_another_category_alone() {
        let pool = DbPool::in_memory().unwrap();
        let work = CategoryLogic::add(&pool.conn, "Work", "WK", None, None).unwrap();
        let play = CategoryLogic::add(&pool.conn, "Play", "PL", None, None).unwrap();

        let mut timer = Timer::restore(SystemClock, SqliteTimerStore::new(&pool.conn));
        timer.start(play.id.clone(), None);
        drop(timer);

        CategoryLogic::delete(&pool.conn, &work.id).unwrap();
        let timer = Timer::restore(SystemClock, SqliteTimerStore::new(&pool.conn));
        assert_eq!(timer.session().category_id(), Some(play.id.as_str()));
    }
}
