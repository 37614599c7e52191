//! Read-only views of simulation state
//!
//! The bot never holds authoritative game state. Everything it knows about
//! the world arrives as snapshot values queried through [`WorldView`]
//! each time a subsystem fires.
//!
//! [`WorldView`]: crate::world::WorldView

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, ActorTypeId, CellPos, PlayerId};

/// Diplomatic stance between two participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    Ally,
    Neutral,
    Enemy,
}

/// Capability flags for a live actor
///
/// These mirror the simulation's trait attachments; the bot only reads
/// the handful it dispatches on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorTraits {
    /// Placed structure (part of a base)
    pub building: bool,
    /// Resource-gathering unit
    pub harvester: bool,
    /// Can be issued movement orders
    pub mobile: bool,
    /// Physically occupies map cells (targetable by area abilities)
    pub occupies_space: bool,
    /// Can take over enemy structures
    pub can_capture: bool,
    /// Carries demolition charges
    pub can_demolish: bool,
    /// Can transform into a structure (construction vehicle)
    pub can_deploy: bool,
}

/// Point-in-time view of one live actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    pub id: ActorId,
    pub owner: PlayerId,
    pub type_id: ActorTypeId,
    pub cell: CellPos,
    pub idle: bool,
    /// Build cost; zero when the rules record none
    pub cost: u32,
    pub max_hp: u32,
    pub traits: ActorTraits,
}

/// Static per-type data from the game rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Power delta when built: positive provides, negative drains
    pub power: i32,
    pub cost: u32,
    /// Weapon-bearing defensive structure (turret and kin)
    pub is_defense: bool,
}

/// A participant's power balance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerStatus {
    pub provided: i32,
    pub drained: i32,
}

impl PowerStatus {
    pub fn new(provided: i32, drained: i32) -> Self {
        Self { provided, drained }
    }

    pub fn excess(&self) -> i32 {
        self.provided - self.drained
    }
}

/// The item a production queue is currently working on
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionState {
    pub item: ActorTypeId,
    pub paused: bool,
    pub done: bool,
}

/// One support ability as the simulation reports it
#[derive(Debug, Clone, PartialEq)]
pub struct SupportPowerSnapshot {
    /// Ability identifier from the game rules (e.g. "airstrike")
    pub id: String,
    pub ready: bool,
    pub disabled: bool,
}
