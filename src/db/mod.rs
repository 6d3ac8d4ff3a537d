//! Database module - SQLite with sqlx

mod checklist;
mod models;
mod plants;
mod pool;
mod visits;

pub use checklist::*;
pub use models::*;
pub use plants::*;
pub use pool::*;
pub use visits::*;
