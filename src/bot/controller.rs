//! Bot controller: scheduler, lifecycle and damage feedback
//!
//! One `BotController` per AI participant. The host session activates it
//! once map bounds are known, calls `tick` every simulation tick, and
//! forwards damage notifications as they happen. Subsystems run on
//! independent, jittered countdown timers so several bot instances in a
//! match do not all work on the same tick.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::build::{find_build_site, BaseBuilder, SelectionStrategy};
use crate::core::config::BotConfig;
use crate::core::types::{ActorId, ActorTypeId, CellPos, MapBounds, PlayerId, Tick};
use crate::tactics::TacticalController;
use crate::threat::ThreatField;
use crate::world::{BotContext, Command, OrderSink, WorldView};

/// Damage notification from the simulation
///
/// Arrives whenever damage resolves, independent of the bot's tick
/// cadence.
#[derive(Debug, Clone, Copy)]
pub struct DamageEvent {
    pub victim: ActorId,
    pub attacker: Option<ActorId>,
    pub damage: u32,
}

/// Decision core for one AI-controlled participant
pub struct BotController {
    player: PlayerId,
    config: BotConfig,
    enabled: bool,
    ticks: Tick,
    /// Bot-private generator, deliberately separate from any
    /// replay-synchronized source the simulation uses
    rng: ChaCha8Rng,

    base_center: Option<CellPos>,
    base_ready: bool,

    threat: ThreatField,
    builders: Vec<BaseBuilder>,
    tactics: TacticalController,

    timer_base: Tick,
    timer_construction: Tick,
    timer_units: Tick,
    timer_support: Tick,
    timer_field: Tick,
}

impl BotController {
    pub fn new(player: PlayerId, config: BotConfig, seed: u64) -> Self {
        Self {
            player,
            config,
            enabled: false,
            ticks: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            base_center: None,
            base_ready: false,
            threat: ThreatField::new(MapBounds::new(0, 0, 0, 0)),
            builders: vec![
                BaseBuilder::new("building", SelectionStrategy::Structures),
                BaseBuilder::new("defense", SelectionStrategy::Defenses),
            ],
            tactics: TacticalController::new(player),
            timer_base: 0,
            timer_construction: 0,
            timer_units: 0,
            timer_support: 0,
            timer_field: 0,
        }
    }

    /// Bind to the match: size the threat field to the playable bounds
    /// and arm every subsystem timer at its offset plus jitter
    pub fn activate(&mut self, world: &dyn WorldView) {
        self.threat = ThreatField::new(world.map_bounds());

        self.timer_base = self.config.base_offset + self.jitter();
        self.timer_construction = self.config.construction_offset + self.jitter();
        self.timer_units = self.config.units_offset + self.jitter();
        self.timer_support = self.config.support_offset + self.jitter();
        self.timer_field = self.config.field_offset + self.jitter();

        self.enabled = true;
        tracing::info!(player = self.player.0, "bot activated");
    }

    fn jitter(&mut self) -> Tick {
        if self.config.timer_jitter == 0 {
            0
        } else {
            self.rng.gen_range(0..self.config.timer_jitter)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn current_tick(&self) -> Tick {
        self.ticks
    }

    pub fn base_center(&self) -> Option<CellPos> {
        self.base_center
    }

    pub fn base_ready(&self) -> bool {
        self.base_ready
    }

    pub fn threat(&self) -> &ThreatField {
        &self.threat
    }

    pub fn tactics(&self) -> &TacticalController {
        &self.tactics
    }

    pub fn builders(&self) -> &[BaseBuilder] {
        &self.builders
    }

    /// One simulation tick. No-op until activated.
    ///
    /// Timers re-arm by adding their interval to the previous deadline,
    /// so a subsystem that fires late does not permanently drift.
    /// Subsystem order within a tick is fixed: construction, then units,
    /// then support powers, then field maintenance; later subsystems read
    /// state the earlier ones produced.
    pub fn tick(&mut self, world: &dyn WorldView, orders: &mut dyn OrderSink) {
        if !self.enabled {
            return;
        }
        self.ticks += 1;
        let tick = self.ticks;

        if tick >= self.timer_base {
            let mut ctx = BotContext::new(world, orders, tick);
            let has_deployer = self.establish_base(&mut ctx);
            self.timer_base += if has_deployer {
                self.config.base_interval
            } else {
                self.config.base_backoff
            };
        }

        if tick >= self.timer_construction {
            self.timer_construction += self.config.construction_interval;
            let origin = self.build_origin(world);
            let mut ctx = BotContext::new(world, orders, tick);
            for builder in &mut self.builders {
                builder.tick(
                    &mut ctx,
                    &mut self.rng,
                    self.player,
                    origin,
                    &self.threat,
                    &self.config,
                );
            }
        }

        if tick >= self.timer_units {
            self.timer_units += self.config.units_interval;
            let mut ctx = BotContext::new(world, orders, tick);
            self.tactics
                .tick(&mut ctx, &mut self.rng, &mut self.threat, &self.config);
        }

        if tick >= self.timer_support {
            self.timer_support += self.config.support_interval;
            let mut ctx = BotContext::new(world, orders, tick);
            crate::support::dispatch_support_powers(&mut ctx, &mut self.rng, self.player);
        }

        if tick >= self.timer_field {
            self.timer_field += self.config.field_interval;
            self.maintain_threat_field(world);
        }
    }

    /// Damage notification entry point; safe to call between ticks
    pub fn on_damage(&mut self, world: &dyn WorldView, event: DamageEvent) {
        if !self.enabled {
            return;
        }
        let Some(victim) = world.actor(event.victim) else {
            return;
        };
        if victim.owner != self.player {
            return;
        }
        if !(victim.traits.building || victim.traits.harvester) {
            return;
        }

        let attack_cell = event
            .attacker
            .and_then(|id| world.actor(id))
            .map(|a| a.cell)
            .unwrap_or(victim.cell);
        self.tactics.note_base_attack(attack_cell);

        // Threat scales with both unit value and relative severity, so
        // big hits on expensive assets dominate the field
        let fraction = if victim.max_hp > 0 {
            event.damage as f32 / victim.max_hp as f32
        } else {
            0.0
        };
        self.threat.add(victim.cell, victim.cost as f32 * fraction);
    }

    /// Where build-site searches start: the remembered base center,
    /// falling back to any owned structure, then the map center
    fn build_origin(&self, world: &dyn WorldView) -> CellPos {
        if let Some(center) = self.base_center {
            return center;
        }
        world
            .actors()
            .into_iter()
            .find(|a| a.owner == self.player && a.traits.building)
            .map(|a| a.cell)
            .unwrap_or_else(|| world.map_bounds().center())
    }

    /// Found (or re-found) the base by deploying the construction
    /// vehicle. Returns whether a deployable unit exists at all.
    fn establish_base(&mut self, ctx: &mut BotContext<'_>) -> bool {
        let deployer = ctx
            .owned_actors(self.player)
            .into_iter()
            .find(|a| a.traits.can_deploy);
        let Some(deployer) = deployer else {
            return false;
        };
        if !deployer.idle {
            return true;
        }

        if !ctx.world.can_deploy(deployer.id) && self.base_ready {
            match self.base_center {
                Some(center) if center != deployer.cell => {
                    // Walk back to where the base belongs
                    ctx.orders.issue(Command::Move {
                        unit: deployer.id,
                        cell: center,
                    });
                    return true;
                }
                _ => {
                    // Stuck at the remembered center; look for fresh ground
                    self.base_ready = false;
                    let headquarters = ActorTypeId::new(&self.config.headquarters_type);
                    if let Some(cell) = find_build_site(
                        ctx.world,
                        &mut self.rng,
                        self.player,
                        &headquarters,
                        deployer.cell,
                        self.config.max_base_distance,
                    ) {
                        ctx.orders.issue(Command::Move {
                            unit: deployer.id,
                            cell,
                        });
                    }
                    return true;
                }
            }
        }

        self.base_center = Some(deployer.cell);
        self.base_ready = true;
        tracing::debug!(player = self.player.0, cell = ?deployer.cell, "deploying base");
        ctx.orders.issue(Command::Deploy { unit: deployer.id });
        true
    }

    /// Field maintenance: seed threat under every visible enemy that
    /// occupies space, then run one smoothing pass. Damage-driven adds
    /// happen immediately in `on_damage`, independent of this cadence.
    fn maintain_threat_field(&mut self, world: &dyn WorldView) {
        for actor in world.actors() {
            if actor.traits.occupies_space
                && world.stance(self.player, actor.owner) == crate::world::Stance::Enemy
            {
                self.threat.add(actor.cell, actor.cost as f32);
            }
        }
        self.threat.smooth();
    }
}
