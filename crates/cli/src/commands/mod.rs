//! Inspection commands

pub mod console;
pub mod phases;
pub mod shifts;
pub mod summary;
pub mod waterfall;
