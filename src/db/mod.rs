pub mod categories;
pub mod chapters;
pub mod entries;
pub mod kv;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod rows;
pub mod stats;
pub mod todos;
