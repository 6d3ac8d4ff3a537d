//! Domain models for the maintenance rotation engine

mod checklist;
mod error;
mod plant;
mod visit;

pub use checklist::*;
pub use error::*;
pub use plant::*;
pub use visit::*;
