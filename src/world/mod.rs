//! External collaborator interfaces
//!
//! The simulation, the production queues and the order channel are black
//! boxes behind these traits; the decision core only reads snapshots and
//! emits [`Command`]s.

pub mod command;
pub mod snapshot;
pub mod view;

pub use command::{Command, CommandBuffer, OrderSink};
pub use snapshot::{
    ActorSnapshot, ActorTraits, PowerStatus, ProductionState, Stance, SupportPowerSnapshot,
    TypeInfo,
};
pub use view::{BotContext, WorldView};
