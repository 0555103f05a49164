pub mod category;
pub mod chapter;
pub mod config;
pub mod day;
pub mod db;
pub mod entry;
pub mod grid;
pub mod init;
pub mod log;
pub mod queue;
pub mod timer;
pub mod todo;
