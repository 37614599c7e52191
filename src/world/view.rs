//! The seam between the decision core and the simulation
//!
//! Architecture: trait at the boundary, explicit per-call context.
//! - `WorldView` is everything the bot may ask the simulation
//! - `BotContext` carries the world handle, the order channel and the
//!   current tick into every subsystem call, so no subsystem reaches for
//!   ambient global state

use crate::core::types::{ActorId, ActorTypeId, CellPos, MapBounds, PlayerId, QueueId, Tick};
use crate::world::command::OrderSink;
use crate::world::snapshot::{
    ActorSnapshot, PowerStatus, ProductionState, Stance, SupportPowerSnapshot, TypeInfo,
};

/// Read access to simulation state, as consumed by the bot
///
/// Every method is a query; lookups that can fail return `Option` or an
/// empty collection and the bot treats that as "skip this opportunity".
pub trait WorldView {
    /// Playable map bounds
    fn map_bounds(&self) -> MapBounds;

    /// Snapshot every live actor
    fn actors(&self) -> Vec<ActorSnapshot>;

    /// Snapshot one actor; `None` once it is destroyed
    fn actor(&self, id: ActorId) -> Option<ActorSnapshot>;

    /// Diplomatic stance of `of` toward `toward`
    fn stance(&self, of: PlayerId, toward: PlayerId) -> Stance;

    /// Static rules data for a type; `None` for unknown names
    fn type_info(&self, type_id: &ActorTypeId) -> Option<TypeInfo>;

    /// Placement-legality check for a building type at a cell
    fn can_place_building(&self, type_id: &ActorTypeId, cell: CellPos) -> bool;

    /// The building's footprint at `cell`, expanded to every cell it
    /// would render unpathable
    fn building_footprint(&self, type_id: &ActorTypeId, cell: CellPos) -> Vec<CellPos>;

    /// Base-proximity rule for new placements
    fn is_close_to_base(&self, owner: PlayerId, type_id: &ActorTypeId, cell: CellPos) -> bool;

    /// The building occupying a cell, if any
    fn building_at(&self, cell: CellPos) -> Option<ActorId>;

    /// Whether `unit` could move into `cell`
    fn can_enter_cell(&self, unit: ActorId, cell: CellPos) -> bool;

    /// Whether `unit` could deploy at its current location
    fn can_deploy(&self, unit: ActorId) -> bool;

    /// A participant's current power balance
    fn power_status(&self, owner: PlayerId) -> PowerStatus;

    /// A participant's support abilities
    fn support_powers(&self, owner: PlayerId) -> Vec<SupportPowerSnapshot>;

    /// A participant's production queues for one category
    fn production_queues(&self, owner: PlayerId, category: &str) -> Vec<QueueId>;

    /// What the queue could start right now
    fn buildable_items(&self, queue: QueueId) -> Vec<ActorTypeId>;

    /// The queue's in-progress item; `None` while idle or still reacting
    /// to a start order
    fn current_production(&self, queue: QueueId) -> Option<ProductionState>;
}

/// Per-tick context passed into every subsystem call
pub struct BotContext<'a> {
    pub world: &'a dyn WorldView,
    pub orders: &'a mut dyn OrderSink,
    pub tick: Tick,
}

impl<'a> BotContext<'a> {
    pub fn new(world: &'a dyn WorldView, orders: &'a mut dyn OrderSink, tick: Tick) -> Self {
        Self {
            world,
            orders,
            tick,
        }
    }

    /// All live actors owned by `player`
    pub fn owned_actors(&self, player: PlayerId) -> Vec<ActorSnapshot> {
        self.world
            .actors()
            .into_iter()
            .filter(|a| a.owner == player)
            .collect()
    }

    /// All space-occupying actors hostile to `player`
    pub fn hostile_actors(&self, player: PlayerId) -> Vec<ActorSnapshot> {
        self.world
            .actors()
            .into_iter()
            .filter(|a| {
                a.traits.occupies_space && self.world.stance(player, a.owner) == Stance::Enemy
            })
            .collect()
    }
}
