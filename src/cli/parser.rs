use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for daybook
/// Personal productivity tracker: timer, todos, queue and a logical-day histogram
#[derive(Parser)]
#[command(
    name = "daybook",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track time against categories, keep an up-next queue and view logged hours per logical day",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long, requires = "print", help = "Only the last N rows")]
        tail: Option<usize>,
    },

    /// Start, pause, resume and stop the timer
    Timer {
        #[command(subcommand)]
        action: TimerAction,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Manage todos
    Todo {
        #[command(subcommand)]
        action: TodoAction,
    },

    /// Manage the up-next queue
    Queue {
        #[command(subcommand)]
        action: QueueAction,
    },

    /// Manage logged time entries
    Entry {
        #[command(subcommand)]
        action: EntryAction,
    },

    /// Manage chapters (named date ranges under the histogram)
    Chapter {
        #[command(subcommand)]
        action: ChapterAction,
    },

    /// Show the histogram of logged hours per logical day
    Grid {
        #[arg(long, short, help = "Year/month/day or a START:END range")]
        period: Option<String>,

        #[arg(
            long,
            conflicts_with = "period",
            help = "Number of days ending today (default from config)"
        )]
        days: Option<u32>,
    },

    /// Show the breakdown of one logical day
    Day {
        /// Logical day (YYYY-MM-DD), or "today"
        day: String,
    },
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a session (without options: next queued todo, else Wasted Time)
    Start {
        #[arg(long, help = "Category id")]
        category: Option<String>,

        #[arg(long, help = "Todo id to work on")]
        todo: Option<String>,
    },

    /// Pause the running session
    Pause,

    /// Resume the paused session
    Resume,

    /// Stop the session and log it as an entry
    Stop {
        #[arg(long, help = "Entry title (defaults to the todo title)")]
        title: Option<String>,

        #[arg(long, help = "Entry description")]
        description: Option<String>,

        #[arg(long = "not-done", help = "Keep the linked todo open")]
        not_done: bool,
    },

    /// Discard the session without logging anything
    Reset,

    /// Show the current session
    Status,

    /// Change the category of the active session
    Category {
        /// Category id
        id: String,
    },

    /// Add time to the active session
    Add {
        #[arg(long, default_value_t = 60, help = "Minutes to add")]
        minutes: u64,
    },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Add a category
    Add {
        name: String,

        /// 1-3 letters shown in the histogram
        abbreviation: String,

        #[arg(long, help = "Color as #rrggbb (default: next preset)")]
        color: Option<String>,

        #[arg(long, help = "Explicit id, e.g. cat-work")]
        id: Option<String>,
    },

    /// Edit a category
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "abbr")]
        abbreviation: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a category (its todos and entries move to Wasted Time)
    Del { id: String },

    /// List categories
    List,
}

#[derive(Subcommand)]
pub enum TodoAction {
    /// Add a todo
    Add {
        title: String,

        #[arg(long, help = "Category id")]
        category: String,

        #[arg(long, default_value_t = 2, help = "1 = highest, 3 = lowest")]
        priority: u8,

        #[arg(long)]
        description: Option<String>,
    },

    /// Edit a todo
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        priority: Option<u8>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a todo
    Del { id: String },

    /// Toggle completion
    Done { id: String },

    /// List todos (open only unless --all)
    List {
        #[arg(long, help = "Include completed todos")]
        all: bool,

        #[arg(long, help = "Only todos of this category")]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum QueueAction {
    /// Append a todo to the queue
    Add { id: String },

    /// Remove a todo from the queue
    Remove { id: String },

    /// Move the item at position FROM to position TO (1-based)
    Move { from: usize, to: usize },

    /// Put a todo at a position (1-based), moving it if already queued
    Insert { id: String, index: usize },

    /// Show the next task
    Next,

    /// Remove and show the next task
    Pop,

    /// List the queue
    List,

    /// Empty the queue
    Clear,
}

#[derive(Subcommand)]
pub enum EntryAction {
    /// Add an entry to a logical day
    Add {
        #[arg(long, help = "Logical day (YYYY-MM-DD)")]
        day: String,

        #[arg(long, help = "Start time (HH:MM)")]
        start: String,

        #[arg(long, conflicts_with = "hours", help = "End time (HH:MM)")]
        end: Option<String>,

        #[arg(long, help = "Duration in hours (default 1)")]
        hours: Option<f64>,

        #[arg(long, help = "Category id")]
        category: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Edit an entry
    Edit {
        id: String,

        #[arg(long, help = "Logical day the times refer to (default: the entry's)")]
        day: Option<String>,

        #[arg(long, help = "Start time (HH:MM)")]
        start: Option<String>,

        #[arg(long, help = "End time (HH:MM)")]
        end: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete an entry
    Del { id: String },

    /// List entries
    List {
        #[arg(long, conflicts_with = "period", help = "Logical day (YYYY-MM-DD)")]
        day: Option<String>,

        #[arg(long, short, help = "Year/month/day or a START:END range")]
        period: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },

    /// Export entries to CSV or JSON
    Export {
        #[arg(long, value_enum, help = "Output format (default: from the file extension)")]
        format: Option<ExportFormat>,

        #[arg(long, help = "Absolute output path")]
        file: String,

        #[arg(long, short, help = "Year/month/day or a START:END range")]
        period: Option<String>,

        #[arg(long, help = "Overwrite without asking")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ChapterAction {
    /// Add a chapter
    Add {
        name: String,

        /// First day (YYYY-MM-DD)
        start: String,

        /// Last day (YYYY-MM-DD)
        end: String,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long = "task", help = "Task line (repeatable)")]
        tasks: Vec<String>,
    },

    /// Edit a chapter
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long = "task", help = "Replace the task list (repeatable)")]
        tasks: Vec<String>,
    },

    /// Delete a chapter
    Del { id: String },

    /// List chapters
    List,
}
