//! Construction: what to build and where to put it

pub mod locator;
pub mod orchestrator;
pub mod strategy;

pub use locator::find_build_site;
pub use orchestrator::{BaseBuilder, BuildState};
pub use strategy::{has_adequate_power, SelectionStrategy};
