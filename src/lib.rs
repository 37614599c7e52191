//! Iron Marshal - skirmish-bot decision core for a real-time strategy
//! simulation
//!
//! The bot observes shared game state once per tick through the
//! [`world::WorldView`] seam and emits [`world::Command`]s for the
//! simulation to validate and apply. It owns no authoritative state:
//! pathfinding, combat resolution, queue rules and game data all live in
//! the host.

pub mod bot;
pub mod build;
pub mod core;
pub mod support;
pub mod tactics;
pub mod threat;
pub mod world;
