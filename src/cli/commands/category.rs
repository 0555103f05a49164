use crate::cli::parser::CategoryAction;
use crate::config::Config;
use crate::core::category::{CategoryLogic, CategoryPatch};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::colors::RESET;
use crate::utils::formatting::hex_fg;
use crate::utils::table::Table;

pub fn handle(action: &CategoryAction, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let conn = &pool.conn;

    match action {
        CategoryAction::Add {
            name,
            abbreviation,
            color,
            id,
        } => {
            let cat = CategoryLogic::add(conn, name, abbreviation, color.as_deref(), id.as_deref())?;
            success(format!("Category added: {} [{}] ({})", cat.name, cat.abbreviation, cat.id));
        }

        CategoryAction::Edit {
            id,
            name,
            abbreviation,
            color,
        } => {
            let patch = CategoryPatch {
                name: name.clone(),
                abbreviation: abbreviation.clone(),
                color: color.clone(),
            };
            let cat = CategoryLogic::edit(conn, id, patch)?;
            success(format!("Category updated: {} [{}]", cat.name, cat.abbreviation));
        }

        CategoryAction::Del { id } => {
            let (cat, todos, entries) = CategoryLogic::delete(conn, id)?;
            success(format!("Category deleted: {}", cat.name));
            if todos + entries > 0 {
                info(format!(
                    "Moved {} todo(s) and {} entr{} to Wasted Time",
                    todos,
                    entries,
                    if entries == 1 { "y" } else { "ies" }
                ));
            }
        }

        CategoryAction::List => {
            let cats = CategoryLogic::list(conn)?;
            let mut table = Table::new(["ID", "NAME", "ABBR", "COLOR"]);
            for c in &cats {
                let name = if c.is_default {
                    format!("{} (default)", c.name)
                } else {
                    c.name.clone()
                };
                table.add_row(vec![c.id.clone(), name, c.abbreviation.clone(), c.color.clone()]);
            }
            print!("{}", table.render());

            // swatches on their own line, escapes would break column widths
            let swatches: Vec<String> = cats
                .iter()
                .map(|c| format!("{}■{} {}", hex_fg(&c.color), RESET, c.abbreviation))
                .collect();
            println!("\n{}", swatches.join("  "));
        }
    }

    Ok(())
}
