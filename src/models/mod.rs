//! Domain records shared by the stores, the core and the commands.

pub mod category;
pub mod chapter;
pub mod entry;
pub mod todo;
