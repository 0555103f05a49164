//! daybook: a terminal day planner built on a logical-day calculator and a
//! persistent work timer.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Route a parsed command to its handler.
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Timer { action } => commands::timer::handle(action, cfg),
        Commands::Category { action } => commands::category::handle(action, cfg),
        Commands::Todo { action } => commands::todo::handle(action, cfg),
        Commands::Queue { action } => commands::queue::handle(action, cfg),
        Commands::Entry { action } => commands::entry::handle(action, cfg),
        Commands::Chapter { action } => commands::chapter::handle(action, cfg),
        Commands::Grid { period, days } => commands::grid::handle(period, days, cfg),
        Commands::Day { day } => commands::day::handle(day, cfg),
    }
}

/// Parse the command line, load the configuration and run the command.
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;
    if let Some(db) = &cli.db {
        cfg.database = utils::path::expand_tilde(db).to_string_lossy().into_owned();
    }

    dispatch(&cli, &cfg)
}
