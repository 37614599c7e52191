//! The per-participant bot controller

pub mod controller;

pub use controller::{BotController, DamageEvent};
