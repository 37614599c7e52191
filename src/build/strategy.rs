//! Selection strategies for the construction orchestrator
//!
//! A strategy is a value handed to each [`BaseBuilder`] at construction,
//! not a trait hierarchy: the orchestrator calls [`SelectionStrategy::choose`]
//! against the queue's buildable set and gets back at most one item.
//!
//! [`BaseBuilder`]: crate::build::BaseBuilder

use rand::seq::SliceRandom;
use rand::Rng;

use crate::build::locator::find_build_site;
use crate::core::config::BotConfig;
use crate::core::types::{ActorTypeId, CellPos, PlayerId, QueueId};
use crate::threat::ThreatField;
use crate::world::{PowerStatus, WorldView};

/// Power is adequate above a fixed floor when either the ratio rule or
/// the absolute-headroom rule holds. The headroom fallback keeps a large
/// surplus from being blocked by the ratio rule at low drain.
pub fn has_adequate_power(power: PowerStatus, config: &BotConfig) -> bool {
    power.provided > config.power_floor
        && (power.provided as f32 >= power.drained as f32 * config.power_ratio
            || power.provided >= power.drained + config.power_headroom)
}

/// What a category's builder should start next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Economy and production structures, power first
    Structures,
    /// Weapon turrets, only while a structure is under threat
    Defenses,
}

impl SelectionStrategy {
    /// Pick an item from `queue`'s buildable set, or `None` to pass this
    /// cycle
    #[allow(clippy::too_many_arguments)]
    pub fn choose<R: Rng>(
        &self,
        world: &dyn WorldView,
        rng: &mut R,
        owner: PlayerId,
        origin: CellPos,
        threat: &ThreatField,
        config: &BotConfig,
        queue: QueueId,
    ) -> Option<ActorTypeId> {
        match self {
            SelectionStrategy::Structures => {
                choose_structure(world, rng, owner, origin, config, queue)
            }
            SelectionStrategy::Defenses => {
                choose_defense(world, rng, owner, origin, threat, config, queue)
            }
        }
    }
}

/// Type names of every structure `owner` currently has placed
fn owned_structure_types(world: &dyn WorldView, owner: PlayerId) -> Vec<ActorTypeId> {
    world
        .actors()
        .into_iter()
        .filter(|a| a.owner == owner && a.traits.building)
        .map(|a| a.type_id)
        .collect()
}

/// Would building `item` leave the power balance non-negative?
fn power_margin_allows(world: &dyn WorldView, power: PowerStatus, item: &ActorTypeId) -> bool {
    match world.type_info(item) {
        Some(info) => power.excess() + info.power >= 0,
        None => false,
    }
}

fn choose_structure<R: Rng>(
    world: &dyn WorldView,
    rng: &mut R,
    owner: PlayerId,
    origin: CellPos,
    config: &BotConfig,
    queue: QueueId,
) -> Option<ActorTypeId> {
    let buildable = world.buildable_items(queue);
    if buildable.is_empty() {
        return None;
    }

    let power = world.power_status(owner);
    if !has_adequate_power(power, config) {
        // Power comes first: the best generator we can start, or nothing
        let generator = buildable
            .iter()
            .filter_map(|ty| world.type_info(ty).map(|info| (ty, info.power)))
            .filter(|(_, provided)| *provided > 0)
            .max_by_key(|(_, provided)| *provided)
            .map(|(ty, _)| ty.clone());
        if let Some(ref ty) = generator {
            tracing::debug!(item = ty.as_str(), "power inadequate, building generator");
        }
        return generator;
    }

    let owned = owned_structure_types(world, owner);

    // Economy bias: each owned anchor structure implies one refinery
    let refinery = ActorTypeId::new(&config.refinery_type);
    let owned_refineries = owned.iter().filter(|ty| **ty == refinery).count();
    let desired_refineries = config
        .economy_anchors
        .iter()
        .filter(|anchor| owned.iter().any(|ty| ty.as_str() == anchor.as_str()))
        .count();
    if owned_refineries < desired_refineries && buildable.contains(&refinery) {
        return Some(refinery);
    }

    // Otherwise sample one candidate; pass unless it is a type we lack,
    // affordable on power, and actually placeable. Passing here is cheap,
    // the builder re-evaluates after its feedback delay.
    let pick = buildable.choose(rng)?.clone();
    if owned.contains(&pick) {
        return None;
    }
    if !power_margin_allows(world, power, &pick) {
        return None;
    }
    find_build_site(world, rng, owner, &pick, origin, config.max_base_distance)?;
    Some(pick)
}

fn choose_defense<R: Rng>(
    world: &dyn WorldView,
    rng: &mut R,
    owner: PlayerId,
    origin: CellPos,
    threat: &ThreatField,
    config: &BotConfig,
    queue: QueueId,
) -> Option<ActorTypeId> {
    let power = world.power_status(owner);
    if !has_adequate_power(power, config) {
        return None;
    }

    // Inert until some owned structure actually registers threat
    let under_threat = world
        .actors()
        .iter()
        .any(|a| a.owner == owner && a.traits.building && threat.get(a.cell) > 0.0);
    if !under_threat {
        return None;
    }

    let turrets: Vec<ActorTypeId> = world
        .buildable_items(queue)
        .into_iter()
        .filter(|ty| world.type_info(ty).map_or(false, |info| info.is_defense))
        .collect();
    let pick = turrets.choose(rng)?.clone();

    if !power_margin_allows(world, power, &pick) {
        return None;
    }
    find_build_site(world, rng, owner, &pick, origin, config.max_base_distance)?;
    tracing::debug!(item = pick.as_str(), "base under threat, building defense");
    Some(pick)
}
