//! Tactical group bookkeeping
//!
//! Invariant: a unit belongs to at most one group at any time.
//! `GroupTable::assign` removes the unit from every other group before
//! adding it, so the invariant holds for any sequence of assignments.

use ahash::AHashMap;

use crate::core::types::{ActorId, CellPos, Tick};

/// Behavioural bucket for owned mobile units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TacticalGroup {
    /// Unassigned units, and those responsible for defending the base
    Defense,
    /// Units committed to a direct attack
    Assault,
    /// Harvesters and their escorts
    Harvester,
    /// Construction vehicles awaiting deployment
    Mcv,
}

/// Membership, target location and re-evaluation gate per group
#[derive(Debug, Default)]
pub struct GroupTable {
    members: AHashMap<TacticalGroup, Vec<ActorId>>,
    location: AHashMap<TacticalGroup, CellPos>,
    next_think: AHashMap<TacticalGroup, Tick>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `unit` in `group`, removing it from every other group first
    pub fn assign(&mut self, unit: ActorId, group: TacticalGroup) {
        for list in self.members.values_mut() {
            list.retain(|u| *u != unit);
        }
        self.members.entry(group).or_default().push(unit);
    }

    pub fn members(&self, group: TacticalGroup) -> &[ActorId] {
        self.members.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, group: TacticalGroup) -> usize {
        self.members(group).len()
    }

    pub fn is_empty(&self, group: TacticalGroup) -> bool {
        self.members(group).is_empty()
    }

    /// The group `unit` currently belongs to, if any
    pub fn group_of(&self, unit: ActorId) -> Option<TacticalGroup> {
        self.members
            .iter()
            .find(|(_, list)| list.contains(&unit))
            .map(|(group, _)| *group)
    }

    /// Drop every unit failing `alive` from every group
    pub fn prune(&mut self, mut alive: impl FnMut(ActorId) -> bool) {
        for list in self.members.values_mut() {
            list.retain(|u| alive(*u));
        }
    }

    pub fn location(&self, group: TacticalGroup) -> Option<CellPos> {
        self.location.get(&group).copied()
    }

    pub fn set_location(&mut self, group: TacticalGroup, cell: CellPos) {
        self.location.insert(group, cell);
    }

    /// Earliest tick at which the group should be re-evaluated
    pub fn next_think(&self, group: TacticalGroup) -> Tick {
        self.next_think.get(&group).copied().unwrap_or(0)
    }

    pub fn set_next_think(&mut self, group: TacticalGroup, tick: Tick) {
        self.next_think.insert(group, tick);
    }
}
