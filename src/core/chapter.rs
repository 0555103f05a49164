use crate::core::day_boundary::LogicalDayKey;
use crate::core::ids::new_id;
use crate::db::chapters;
use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::chapter::Chapter;
use chrono::Utc;
use rusqlite::Connection;

#[derive(Debug, Default, Clone)]
pub struct ChapterPatch {
    pub name: Option<String>,
    pub start_date: Option<LogicalDayKey>,
    pub end_date: Option<LogicalDayKey>,
    pub color: Option<String>,
    pub description: Option<String>,
    /// Replaces the task list when given.
    pub tasks: Option<Vec<String>>,
}

pub struct ChapterLogic;

fn validate(ch: &Chapter) -> AppResult<()> {
    if ch.name.trim().is_empty() {
        return Err(AppError::InvalidInput("chapter name cannot be empty".into()));
    }
    if ch.end_date < ch.start_date {
        return Err(AppError::InvalidPeriod(format!(
            "{}:{} (end before start)",
            ch.start_date, ch.end_date
        )));
    }
    if !Category::is_valid_color(&ch.color) {
        return Err(AppError::InvalidColor(ch.color.clone()));
    }
    Ok(())
}

impl ChapterLogic {
    pub fn require(conn: &Connection, id: &str) -> AppResult<Chapter> {
        chapters::get_chapter(conn, id)?.ok_or_else(|| AppError::ChapterNotFound(id.to_string()))
    }

    pub fn list(conn: &Connection) -> AppResult<Vec<Chapter>> {
        chapters::load_chapters(conn)
    }

    pub fn add(
        conn: &Connection,
        name: &str,
        start_date: LogicalDayKey,
        end_date: LogicalDayKey,
        color: Option<&str>,
        description: Option<&str>,
        tasks: Vec<String>,
    ) -> AppResult<Chapter> {
        let color = match color {
            Some(c) => c.trim().to_lowercase(),
            None => Chapter::next_color(chapters::count_chapters(conn)?).to_string(),
        };

        let ch = Chapter {
            id: new_id("chap"),
            name: name.trim().to_string(),
            start_date,
            end_date,
            color,
            description: description.map(str::trim).filter(|d| !d.is_empty()).map(String::from),
            tasks,
            created_at: Utc::now(),
        };
        validate(&ch)?;

        chapters::insert_chapter(conn, &ch)?;
        audit(
            conn,
            "add",
            &ch.id,
            &format!("Chapter '{}' {}..{}", ch.name, ch.start_date, ch.end_date),
        );
        Ok(ch)
    }

    pub fn edit(conn: &Connection, id: &str, patch: ChapterPatch) -> AppResult<Chapter> {
        let mut ch = Self::require(conn, id)?;

        if let Some(name) = patch.name {
            ch.name = name.trim().to_string();
        }
        if let Some(d) = patch.start_date {
            ch.start_date = d;
        }
        if let Some(d) = patch.end_date {
            ch.end_date = d;
        }
        if let Some(c) = patch.color {
            ch.color = c.trim().to_lowercase();
        }
        if let Some(desc) = patch.description {
            let desc = desc.trim();
            ch.description = (!desc.is_empty()).then(|| desc.to_string());
        }
        if let Some(tasks) = patch.tasks {
            ch.tasks = tasks;
        }
        validate(&ch)?;

        chapters::update_chapter(conn, &ch)?;
        audit(conn, "edit", &ch.id, &format!("Chapter '{}' updated", ch.name));
        Ok(ch)
    }

    pub fn delete(conn: &Connection, id: &str) -> AppResult<Chapter> {
        let ch = Self::require(conn, id)?;
        chapters::delete_chapter(conn, &ch.id)?;
        audit(conn, "del", &ch.id, &format!("Chapter '{}' deleted", ch.name));
        Ok(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;
    use crate::models::chapter::CHAPTER_COLORS;

    fn key(s: &str) -> LogicalDayKey {
        s.parse().unwrap()
    }

    #[test]
    fn colors_follow_the_palette() {
        let pool = DbPool::in_memory().unwrap();
        let a = ChapterLogic::add(&pool.conn, "A", key("2024-01-01"), key("2024-01-31"), None, None, vec![]).unwrap();
        let b = ChapterLogic::add(&pool.conn, "B", key("2024-02-01"), key("2024-02-29"), None, None, vec![]).unwrap();
        let c = ChapterLogic::add(
            &pool.conn,
            "C",
            key("2024-03-01"),
            key("2024-03-31"),
            Some("#ABCDEF"),
            None,
            vec![],
        )
        .unwrap();

        assert_eq!(a.color, CHAPTER_COLORS[0]);
        assert_eq!(b.color, CHAPTER_COLORS[1]);
        assert_eq!(c.color, "#abcdef");
    }

    #[test]
    fn tasks_and_dates_survive_storage() {
        let pool = DbPool::in_memory().unwrap();
        let ch = ChapterLogic::add(
            &pool.conn,
            "Thesis",
            key("2024-05-01"),
            key("2024-06-30"),
            None,
            Some("final push"),
            vec!["outline".into(), "draft".into()],
        )
        .unwrap();

        let stored = ChapterLogic::require(&pool.conn, &ch.id).unwrap();
        assert_eq!(stored.tasks, ["outline", "draft"]);
        assert_eq!(stored.start_date, key("2024-05-01"));
        assert_eq!(stored.description.as_deref(), Some("final push"));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let pool = DbPool::in_memory().unwrap();
        let res = ChapterLogic::add(&pool.conn, "X", key("2024-05-02"), key("2024-05-01"), None, None, vec![]);
        assert!(matches!(res, Err(AppError::InvalidPeriod(_))));

        let ch = ChapterLogic::add(&pool.conn, "X", key("2024-05-01"), key("2024-05-02"), None, None, vec![]).unwrap();
        let patch = ChapterPatch {
            end_date: Some(key("2024-04-01")),
            ..Default::default()
        };
        assert!(ChapterLogic::edit(&pool.conn, &ch.id, patch).is_err());
    }

    #[test]
    fn delete_removes_the_row() {
        let pool = DbPool::in_memory().unwrap();
        let ch = ChapterLogic::add(&pool.conn, "X", key("2024-05-01"), key("2024-05-02"), None, None, vec![]).unwrap();
        ChapterLogic::delete(&pool.conn, &ch.id).unwrap();
        assert!(matches!(
            ChapterLogic::require(&pool.conn, &ch.id),
            Err(AppError::ChapterNotFound(_))
        ));
    }
}
