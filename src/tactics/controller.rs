//! Unit grouping and tactical responses
//!
//! Runs on the unit-check cadence: keeps the roster of known mobile
//! units, sorts newcomers into groups, drives the defense and assault
//! groups toward their objectives, keeps harvesters busy, and keeps the
//! unit production queues fed.

use ahash::AHashSet;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::config::BotConfig;
use crate::core::types::{ActorId, CellPos, PlayerId, Tick};
use crate::tactics::groups::{GroupTable, TacticalGroup};
use crate::threat::ThreatField;
use crate::world::{ActorSnapshot, BotContext, Command, Stance, WorldView};

/// Tactical state for one bot instance
pub struct TacticalController {
    player: PlayerId,
    /// Every owned mobile unit we have seen and not yet lost
    roster: AHashSet<ActorId>,
    groups: GroupTable,
    /// Set by the damage handler when a structure or harvester is hit
    base_attacked: bool,
    attack_location: Option<CellPos>,
    defense_position: Option<CellPos>,
    defense_idle_tick: Tick,
    defense_attack_tick: Tick,
}

impl TacticalController {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            roster: AHashSet::new(),
            groups: GroupTable::new(),
            base_attacked: false,
            attack_location: None,
            defense_position: None,
            defense_idle_tick: 0,
            defense_attack_tick: 0,
        }
    }

    /// Damage-handler feedback: the base (or a harvester) was hit
    pub fn note_base_attack(&mut self, location: CellPos) {
        self.base_attacked = true;
        self.attack_location = Some(location);
    }

    pub fn base_attacked(&self) -> bool {
        self.base_attacked
    }

    pub fn groups(&self) -> &GroupTable {
        &self.groups
    }

    /// One unit-check cycle
    pub fn tick<R: Rng>(
        &mut self,
        ctx: &mut BotContext<'_>,
        rng: &mut R,
        threat: &mut ThreatField,
        config: &BotConfig,
    ) {
        self.prune_dead(ctx.world);
        self.enroll_new_units(ctx);
        self.run_defense_group(ctx, rng, threat, config);
        self.run_assault_group(ctx, rng, threat, config);
        self.order_idle_harvesters(ctx);
        self.produce_units(ctx, rng, config);
    }

    fn prune_dead(&mut self, world: &dyn WorldView) {
        self.roster.retain(|unit| world.actor(*unit).is_some());
        self.groups.prune(|unit| world.actor(unit).is_some());
    }

    /// Detect newly produced mobile units and give them a default group
    fn enroll_new_units(&mut self, ctx: &mut BotContext<'_>) {
        let newcomers: Vec<ActorSnapshot> = ctx
            .owned_actors(self.player)
            .into_iter()
            .filter(|a| a.traits.mobile && !self.roster.contains(&a.id))
            .collect();

        for unit in newcomers {
            self.roster.insert(unit.id);
            let group = if unit.traits.harvester {
                TacticalGroup::Harvester
            } else if unit.traits.can_deploy {
                // Construction vehicles must not be dragged around by
                // defense orders; base establishment handles them
                TacticalGroup::Mcv
            } else {
                TacticalGroup::Defense
            };
            self.groups.assign(unit.id, group);
            tracing::debug!(unit = unit.id.0, ?group, "enrolled new unit");
        }
    }

    /// Defense group: rally at the latest attack site while threatened,
    /// otherwise loiter at a random owned structure
    fn run_defense_group<R: Rng>(
        &mut self,
        ctx: &mut BotContext<'_>,
        rng: &mut R,
        threat: &mut ThreatField,
        config: &BotConfig,
    ) {
        let position = if self.base_attacked {
            if ctx.tick - self.defense_attack_tick < config.defense_attack_interval {
                return;
            }
            self.defense_attack_tick = ctx.tick;

            let Some(location) = self.attack_location else {
                return;
            };
            self.defense_position = Some(location);
            self.groups.set_location(TacticalGroup::Defense, location);

            // Once the threat there has decayed, stand down
            if threat.get(location) < config.defense_release_threshold {
                self.base_attacked = false;
            }
            location
        } else {
            if ctx.tick - self.defense_idle_tick < config.defense_idle_interval {
                return;
            }
            self.defense_idle_tick = ctx.tick;

            let structures: Vec<ActorSnapshot> = ctx
                .owned_actors(self.player)
                .into_iter()
                .filter(|a| a.traits.building)
                .collect();
            let Some(pick) = structures.choose(rng) else {
                return;
            };
            self.defense_position = Some(pick.cell);
            self.groups.set_location(TacticalGroup::Defense, pick.cell);
            pick.cell
        };

        for unit in self.groups.members(TacticalGroup::Defense).to_vec() {
            relocate_unit(ctx, rng, unit, position, true, config);

            // Responders that have closed on the attack bleed threat off
            // the cell, so a handled attack stops escalating
            if self.base_attacked {
                if let Some(snapshot) = ctx.world.actor(unit) {
                    if snapshot.cell.chebyshev_distance(position) < config.defense_response_radius {
                        threat.reduce(position, config.defense_response_relief);
                    }
                }
            }
        }
    }

    /// Assault group: muster from the defense group once it is valuable
    /// enough, then push at the hottest cell on the map
    fn run_assault_group<R: Rng>(
        &mut self,
        ctx: &mut BotContext<'_>,
        rng: &mut R,
        threat: &ThreatField,
        config: &BotConfig,
    ) {
        if ctx.tick < self.groups.next_think(TacticalGroup::Assault) {
            return;
        }

        if self.groups.is_empty(TacticalGroup::Assault) {
            self.muster_assault_group(ctx, rng, config);
        } else {
            self.push_assault_group(ctx, rng, threat, config);
        }
    }

    fn muster_assault_group<R: Rng>(
        &mut self,
        ctx: &mut BotContext<'_>,
        rng: &mut R,
        config: &BotConfig,
    ) {
        self.groups.set_next_think(
            TacticalGroup::Assault,
            ctx.tick + rng.gen_range(config.assault_muster_min..=config.assault_muster_max),
        );

        let defense_value: u32 = self
            .groups
            .members(TacticalGroup::Defense)
            .iter()
            .filter_map(|unit| ctx.world.actor(*unit))
            .map(|a| a.cost)
            .sum();
        if defense_value < config.assault_value_quota {
            return;
        }

        if let Some(location) = self.groups.location(TacticalGroup::Defense) {
            self.groups.set_location(TacticalGroup::Assault, location);
        }

        // Move a random subset over until roughly half the value has gone
        let mut transferred = 0u32;
        while transferred < defense_value / 2 && !self.groups.is_empty(TacticalGroup::Defense) {
            let Some(unit) = self
                .groups
                .members(TacticalGroup::Defense)
                .choose(rng)
                .copied()
            else {
                break;
            };
            if let Some(snapshot) = ctx.world.actor(unit) {
                transferred += snapshot.cost;
            }
            self.groups.assign(unit, TacticalGroup::Assault);
        }
        tracing::debug!(
            value = transferred,
            size = self.groups.len(TacticalGroup::Assault),
            "mustered assault group"
        );

        // Act on the fresh group next cycle, not after the muster window
        self.groups.set_next_think(TacticalGroup::Assault, ctx.tick);
    }

    fn push_assault_group<R: Rng>(
        &mut self,
        ctx: &mut BotContext<'_>,
        rng: &mut R,
        threat: &ThreatField,
        config: &BotConfig,
    ) {
        self.groups.set_next_think(
            TacticalGroup::Assault,
            ctx.tick + config.assault_retarget_interval,
        );

        let objective = match threat.max_cell() {
            Some((cell, value)) if value > 0.0 => cell,
            _ => match self.defense_position {
                Some(position) => position,
                None => ctx.world.map_bounds().center(),
            },
        };
        self.groups.set_location(TacticalGroup::Assault, objective);

        for unit in self.groups.members(TacticalGroup::Assault).to_vec() {
            let Some(snapshot) = ctx.world.actor(unit) else {
                continue;
            };

            // Capture and demolition units act on nearby enemy structures
            // directly instead of walking to the objective
            if snapshot.traits.can_capture {
                if let Some(target) =
                    self.nearest_enemy_structure(ctx.world, snapshot.cell, config.opportunist_radius)
                {
                    ctx.orders.issue(Command::Capture { unit, target });
                    continue;
                }
            } else if snapshot.traits.can_demolish {
                if let Some(target) =
                    self.nearest_enemy_structure(ctx.world, snapshot.cell, config.opportunist_radius)
                {
                    ctx.orders.issue(Command::Demolish { unit, target });
                    continue;
                }
            }

            relocate_unit(ctx, rng, unit, objective, true, config);
        }
    }

    fn nearest_enemy_structure(
        &self,
        world: &dyn WorldView,
        from: CellPos,
        radius: i32,
    ) -> Option<ActorId> {
        world
            .actors()
            .into_iter()
            .filter(|a| {
                a.traits.building
                    && world.stance(self.player, a.owner) == Stance::Enemy
                    && a.cell.chebyshev_distance(from) < radius
            })
            .min_by_key(|a| a.cell.chebyshev_distance(from))
            .map(|a| a.id)
    }

    fn order_idle_harvesters(&mut self, ctx: &mut BotContext<'_>) {
        for unit in self.groups.members(TacticalGroup::Harvester).to_vec() {
            if let Some(snapshot) = ctx.world.actor(unit) {
                if snapshot.idle {
                    ctx.orders.issue(Command::Harvest { unit });
                }
            }
        }
    }

    /// Keep each mobile-unit category's queue busy with a random pick.
    /// Deliberately non-prioritized.
    fn produce_units<R: Rng>(&self, ctx: &mut BotContext<'_>, rng: &mut R, config: &BotConfig) {
        for category in &config.unit_categories {
            let free_queue = ctx
                .world
                .production_queues(self.player, category)
                .into_iter()
                .find(|q| ctx.world.current_production(*q).is_none());
            let Some(queue) = free_queue else {
                continue;
            };

            let items = ctx.world.buildable_items(queue);
            if let Some(item) = items.choose(rng) {
                ctx.orders.issue(Command::StartProduction {
                    queue,
                    item: item.clone(),
                    count: 1,
                });
            }
        }
    }
}

/// Pick an enterable cell near `target`, widening the jitter window on
/// each failed attempt
fn choose_destination_near<R: Rng>(
    world: &dyn WorldView,
    rng: &mut R,
    unit: ActorId,
    target: CellPos,
) -> Option<CellPos> {
    let own_cell = world.actor(unit)?.cell;
    let mut range = 2i32;
    for attempt in 1..=10 {
        let cell = CellPos::new(
            target.x + rng.gen_range(-range..range),
            target.y + rng.gen_range(-range..range),
        );
        if world.can_enter_cell(unit, cell) || cell == own_cell {
            return Some(cell);
        }
        range = range.max(attempt / 2);
    }
    None
}

/// Order `unit` toward `target` unless it is already close enough
pub fn relocate_unit<R: Rng>(
    ctx: &mut BotContext<'_>,
    rng: &mut R,
    unit: ActorId,
    target: CellPos,
    attack_move: bool,
    config: &BotConfig,
) -> bool {
    let Some(snapshot) = ctx.world.actor(unit) else {
        return false;
    };
    if snapshot.cell.chebyshev_distance(target) < config.relocate_slack {
        return false;
    }
    let Some(cell) = choose_destination_near(ctx.world, rng, unit, target) else {
        return false;
    };
    if attack_move {
        ctx.orders.issue(Command::AttackMove { unit, cell });
    } else {
        ctx.orders.issue(Command::Move { unit, cell });
    }
    true
}
