//! Scripted mock simulation shared by the integration tests
//!
//! Implements the collaborator traits over plain collections so tests can
//! stage a world, run bot subsystems, and inspect the commands that come
//! out.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use iron_marshal::core::types::{ActorId, ActorTypeId, CellPos, MapBounds, PlayerId, QueueId};
use iron_marshal::world::{
    ActorSnapshot, ActorTraits, PowerStatus, ProductionState, Stance, SupportPowerSnapshot,
    TypeInfo, WorldView,
};

#[derive(Debug, Clone)]
pub struct MockQueue {
    pub owner: PlayerId,
    pub category: String,
    pub buildable: Vec<ActorTypeId>,
    pub current: Option<ProductionState>,
}

/// In-memory world the tests script directly
pub struct MockWorld {
    pub bounds: MapBounds,
    pub actors: Vec<ActorSnapshot>,
    pub type_infos: HashMap<String, TypeInfo>,
    pub queues: HashMap<QueueId, MockQueue>,
    pub power: HashMap<PlayerId, PowerStatus>,
    pub support: HashMap<PlayerId, Vec<SupportPowerSnapshot>>,
    /// Cells where placement is illegal
    pub unbuildable: HashSet<CellPos>,
    /// Cells units cannot enter
    pub impassable: HashSet<CellPos>,
    /// Units currently allowed to deploy in place
    pub deployable: HashSet<ActorId>,
    /// When false, the base-proximity rule rejects everything
    pub close_to_base: bool,
    next_actor: u32,
}

impl MockWorld {
    pub fn new(bounds: MapBounds) -> Self {
        Self {
            bounds,
            actors: Vec::new(),
            type_infos: HashMap::new(),
            queues: HashMap::new(),
            power: HashMap::new(),
            support: HashMap::new(),
            unbuildable: HashSet::new(),
            impassable: HashSet::new(),
            deployable: HashSet::new(),
            close_to_base: true,
            next_actor: 1,
        }
    }

    pub fn add_actor(
        &mut self,
        owner: PlayerId,
        type_name: &str,
        cell: CellPos,
        traits: ActorTraits,
    ) -> ActorId {
        let id = ActorId(self.next_actor);
        self.next_actor += 1;
        self.actors.push(ActorSnapshot {
            id,
            owner,
            type_id: ActorTypeId::new(type_name),
            cell,
            idle: true,
            cost: self
                .type_infos
                .get(type_name)
                .map(|info| info.cost)
                .unwrap_or(0),
            max_hp: 100,
            traits,
        });
        id
    }

    pub fn actor_mut(&mut self, id: ActorId) -> &mut ActorSnapshot {
        self.actors.iter_mut().find(|a| a.id == id).unwrap()
    }

    pub fn remove_actor(&mut self, id: ActorId) {
        self.actors.retain(|a| a.id != id);
    }

    pub fn register_type(&mut self, name: &str, info: TypeInfo) {
        self.type_infos.insert(name.to_string(), info);
    }

    pub fn add_queue(&mut self, id: u32, owner: PlayerId, category: &str, buildable: &[&str]) {
        self.queues.insert(
            QueueId(id),
            MockQueue {
                owner,
                category: category.to_string(),
                buildable: buildable.iter().map(|n| ActorTypeId::new(n)).collect(),
                current: None,
            },
        );
    }

    pub fn set_current(&mut self, queue: u32, item: &str, paused: bool, done: bool) {
        self.queues.get_mut(&QueueId(queue)).unwrap().current = Some(ProductionState {
            item: ActorTypeId::new(item),
            paused,
            done,
        });
    }

    pub fn clear_current(&mut self, queue: u32) {
        self.queues.get_mut(&QueueId(queue)).unwrap().current = None;
    }
}

pub fn building() -> ActorTraits {
    ActorTraits {
        building: true,
        occupies_space: true,
        ..Default::default()
    }
}

pub fn vehicle() -> ActorTraits {
    ActorTraits {
        mobile: true,
        occupies_space: true,
        ..Default::default()
    }
}

pub fn harvester() -> ActorTraits {
    ActorTraits {
        mobile: true,
        harvester: true,
        occupies_space: true,
        ..Default::default()
    }
}

pub fn mcv() -> ActorTraits {
    ActorTraits {
        mobile: true,
        can_deploy: true,
        occupies_space: true,
        ..Default::default()
    }
}

impl WorldView for MockWorld {
    fn map_bounds(&self) -> MapBounds {
        self.bounds
    }

    fn actors(&self) -> Vec<ActorSnapshot> {
        self.actors.clone()
    }

    fn actor(&self, id: ActorId) -> Option<ActorSnapshot> {
        self.actors.iter().find(|a| a.id == id).cloned()
    }

    fn stance(&self, of: PlayerId, toward: PlayerId) -> Stance {
        if of == toward {
            Stance::Ally
        } else {
            Stance::Enemy
        }
    }

    fn type_info(&self, type_id: &ActorTypeId) -> Option<TypeInfo> {
        self.type_infos.get(type_id.as_str()).copied()
    }

    fn can_place_building(&self, _type_id: &ActorTypeId, cell: CellPos) -> bool {
        self.bounds.contains(cell) && !self.unbuildable.contains(&cell)
    }

    fn building_footprint(&self, _type_id: &ActorTypeId, cell: CellPos) -> Vec<CellPos> {
        vec![cell]
    }

    fn is_close_to_base(&self, _owner: PlayerId, _type_id: &ActorTypeId, _cell: CellPos) -> bool {
        self.close_to_base
    }

    fn building_at(&self, cell: CellPos) -> Option<ActorId> {
        self.actors
            .iter()
            .find(|a| a.traits.building && a.cell == cell)
            .map(|a| a.id)
    }

    fn can_enter_cell(&self, _unit: ActorId, cell: CellPos) -> bool {
        self.bounds.contains(cell) && !self.impassable.contains(&cell)
    }

    fn can_deploy(&self, unit: ActorId) -> bool {
        self.deployable.contains(&unit)
    }

    fn power_status(&self, owner: PlayerId) -> PowerStatus {
        self.power.get(&owner).copied().unwrap_or_default()
    }

    fn support_powers(&self, owner: PlayerId) -> Vec<SupportPowerSnapshot> {
        self.support.get(&owner).cloned().unwrap_or_default()
    }

    fn production_queues(&self, owner: PlayerId, category: &str) -> Vec<QueueId> {
        let mut ids: Vec<QueueId> = self
            .queues
            .iter()
            .filter(|(_, q)| q.owner == owner && q.category == category)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_by_key(|id| id.0);
        ids
    }

    fn buildable_items(&self, queue: QueueId) -> Vec<ActorTypeId> {
        self.queues
            .get(&queue)
            .map(|q| q.buildable.clone())
            .unwrap_or_default()
    }

    fn current_production(&self, queue: QueueId) -> Option<ProductionState> {
        self.queues.get(&queue).and_then(|q| q.current.clone())
    }
}
