//! Unit grouping and tactical control

pub mod controller;
pub mod groups;

pub use controller::TacticalController;
pub use groups::{GroupTable, TacticalGroup};
