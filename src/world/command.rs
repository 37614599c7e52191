//! Intent commands emitted by the decision core
//!
//! The bot issues the same category of orders a human player would; the
//! simulation validates and applies them. Nothing here mutates game state
//! directly.

use crate::core::types::{ActorId, ActorTypeId, CellPos, QueueId};

/// One command for the simulation's order channel
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Plain movement order
    Move { unit: ActorId, cell: CellPos },
    /// Move but engage targets of opportunity along the way
    AttackMove { unit: ActorId, cell: CellPos },
    /// Transform in place (construction vehicle -> headquarters)
    Deploy { unit: ActorId },
    /// Send a harvester to look for resources
    Harvest { unit: ActorId },
    StartProduction {
        queue: QueueId,
        item: ActorTypeId,
        count: u32,
    },
    UnpauseProduction { queue: QueueId, item: ActorTypeId },
    CancelProduction { queue: QueueId, item: ActorTypeId },
    /// Place a finished building from its queue onto the map
    PlaceBuilding { cell: CellPos, item: ActorTypeId },
    Capture { unit: ActorId, target: ActorId },
    Demolish { unit: ActorId, target: ActorId },
    /// Fire a support ability at a target cell
    UseSupportPower { power: String, cell: CellPos },
}

/// Receiver for bot commands; implemented by the simulation's order channel
pub trait OrderSink {
    fn issue(&mut self, command: Command);
}

/// Simple buffering sink, used by tests and the demo harness
#[derive(Debug, Default)]
pub struct CommandBuffer {
    pub commands: Vec<Command>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}

impl OrderSink for CommandBuffer {
    fn issue(&mut self, command: Command) {
        self.commands.push(command);
    }
}
