//! Iron Marshal - demo skirmish harness
//!
//! Runs one bot against a tiny in-process toy world for a fixed number of
//! ticks and logs every command it issues. The toy world applies just
//! enough of each command (deploy, place, start production, movement) for
//! the bot's feedback loops to engage. Useful for eyeballing behaviour;
//! the real host is the surrounding match session.

use std::collections::{HashMap, HashSet};

use clap::Parser;
use serde::Deserialize;

use iron_marshal::bot::{BotController, DamageEvent};
use iron_marshal::core::config::BotConfig;
use iron_marshal::core::error::Result;
use iron_marshal::core::types::{ActorId, ActorTypeId, CellPos, MapBounds, PlayerId, QueueId};
use iron_marshal::world::{
    ActorSnapshot, ActorTraits, Command, CommandBuffer, PowerStatus, ProductionState, Stance,
    SupportPowerSnapshot, TypeInfo, WorldView,
};

#[derive(Parser, Debug)]
#[command(name = "iron-marshal", about = "Skirmish-bot demo run")]
struct Args {
    /// Ticks to simulate
    #[arg(long, default_value_t = 2000)]
    ticks: u64,

    /// Seed for the bot's private generator
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Optional bot config TOML
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Optional scenario JSON (starting actors, types, queues)
    #[arg(long)]
    scenario: Option<std::path::PathBuf>,
}

/// Starting setup loaded from JSON
#[derive(Debug, Deserialize)]
struct Scenario {
    bounds: MapBounds,
    #[serde(default)]
    types: HashMap<String, TypeInfo>,
    #[serde(default)]
    actors: Vec<ScenarioActor>,
    #[serde(default)]
    queues: Vec<ScenarioQueue>,
    #[serde(default)]
    power: PowerStatus,
    #[serde(default)]
    support_powers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ScenarioActor {
    owner: u32,
    #[serde(rename = "type")]
    type_name: String,
    x: i32,
    y: i32,
    #[serde(default)]
    traits: ActorTraits,
}

#[derive(Debug, Deserialize)]
struct ScenarioQueue {
    category: String,
    buildable: Vec<String>,
}

impl Default for Scenario {
    fn default() -> Self {
        // A small built-in skirmish: our construction vehicle against an
        // enemy patrol, with the usual early build options
        let mut types = HashMap::new();
        for (name, power, cost, is_defense) in [
            ("headquarters", 30, 2000, false),
            ("power_plant", 100, 300, false),
            ("refinery", -30, 1400, false),
            ("barracks", -20, 400, false),
            ("factory", -30, 2000, false),
            ("turret", -20, 600, true),
            ("tank", 0, 700, false),
            ("rifleman", 0, 100, false),
        ] {
            types.insert(
                name.to_string(),
                TypeInfo {
                    power,
                    cost,
                    is_defense,
                },
            );
        }
        Self {
            bounds: MapBounds::new(0, 0, 64, 64),
            types,
            actors: vec![
                ScenarioActor {
                    owner: 1,
                    type_name: "construction_vehicle".into(),
                    x: 16,
                    y: 16,
                    traits: ActorTraits {
                        mobile: true,
                        can_deploy: true,
                        occupies_space: true,
                        ..Default::default()
                    },
                },
                ScenarioActor {
                    owner: 2,
                    type_name: "tank".into(),
                    x: 48,
                    y: 48,
                    traits: ActorTraits {
                        mobile: true,
                        occupies_space: true,
                        ..Default::default()
                    },
                },
            ],
            queues: vec![
                ScenarioQueue {
                    category: "building".into(),
                    buildable: vec![
                        "power_plant".into(),
                        "refinery".into(),
                        "barracks".into(),
                        "factory".into(),
                    ],
                },
                ScenarioQueue {
                    category: "defense".into(),
                    buildable: vec!["turret".into()],
                },
                ScenarioQueue {
                    category: "vehicle".into(),
                    buildable: vec!["tank".into()],
                },
                ScenarioQueue {
                    category: "infantry".into(),
                    buildable: vec!["rifleman".into()],
                },
            ],
            power: PowerStatus::new(0, 0),
            support_powers: vec!["airstrike".into()],
        }
    }
}

struct DemoQueue {
    category: String,
    buildable: Vec<ActorTypeId>,
    current: Option<ProductionState>,
}

/// Minimal world model: enough state to answer the bot's queries and
/// apply the commands it issues
struct DemoWorld {
    bounds: MapBounds,
    actors: Vec<ActorSnapshot>,
    types: HashMap<String, TypeInfo>,
    queues: HashMap<QueueId, DemoQueue>,
    power: PowerStatus,
    support: Vec<SupportPowerSnapshot>,
    occupied: HashSet<CellPos>,
    next_actor: u32,
}

const BOT: PlayerId = PlayerId(1);

impl DemoWorld {
    fn from_scenario(scenario: Scenario) -> Self {
        let mut world = Self {
            bounds: scenario.bounds,
            actors: Vec::new(),
            types: scenario.types,
            queues: HashMap::new(),
            power: scenario.power,
            support: scenario
                .support_powers
                .into_iter()
                .map(|id| SupportPowerSnapshot {
                    id,
                    ready: true,
                    disabled: false,
                })
                .collect(),
            occupied: HashSet::new(),
            next_actor: 1,
        };
        for actor in scenario.actors {
            world.spawn(
                PlayerId(actor.owner),
                &actor.type_name,
                CellPos::new(actor.x, actor.y),
                actor.traits,
            );
        }
        for (i, queue) in scenario.queues.into_iter().enumerate() {
            world.queues.insert(
                QueueId(i as u32 + 1),
                DemoQueue {
                    category: queue.category,
                    buildable: queue.buildable.iter().map(|n| ActorTypeId::new(n)).collect(),
                    current: None,
                },
            );
        }
        world
    }

    fn spawn(
        &mut self,
        owner: PlayerId,
        type_name: &str,
        cell: CellPos,
        traits: ActorTraits,
    ) -> ActorId {
        let id = ActorId(self.next_actor);
        self.next_actor += 1;
        let info = self.types.get(type_name).copied().unwrap_or_default();
        if traits.building {
            self.occupied.insert(cell);
            self.power.provided += info.power.max(0);
            self.power.drained += (-info.power).max(0);
        }
        self.actors.push(ActorSnapshot {
            id,
            owner,
            type_id: ActorTypeId::new(type_name),
            cell,
            idle: true,
            cost: info.cost,
            max_hp: 100,
            traits,
        });
        id
    }

    /// Apply one bot command; unhandled commands are only logged
    fn apply(&mut self, command: &Command) {
        match command {
            Command::Deploy { unit } => {
                if let Some(actor) = self.actors.iter().find(|a| a.id == *unit).cloned() {
                    self.actors.retain(|a| a.id != *unit);
                    self.spawn(
                        actor.owner,
                        "headquarters",
                        actor.cell,
                        ActorTraits {
                            building: true,
                            occupies_space: true,
                            ..Default::default()
                        },
                    );
                }
            }
            Command::Move { unit, cell } | Command::AttackMove { unit, cell } => {
                if let Some(actor) = self.actors.iter_mut().find(|a| a.id == *unit) {
                    actor.cell = *cell;
                }
            }
            Command::StartProduction { queue, item, .. } => {
                if let Some(q) = self.queues.get_mut(queue) {
                    q.current = Some(ProductionState {
                        item: item.clone(),
                        paused: false,
                        done: true,
                    });
                }
            }
            Command::CancelProduction { queue, .. } => {
                if let Some(q) = self.queues.get_mut(queue) {
                    q.current = None;
                }
            }
            Command::PlaceBuilding { cell, item } => {
                self.spawn(
                    BOT,
                    item.as_str(),
                    *cell,
                    ActorTraits {
                        building: true,
                        occupies_space: true,
                        ..Default::default()
                    },
                );
                for q in self.queues.values_mut() {
                    if q.current.as_ref().map(|c| &c.item) == Some(item) {
                        q.current = None;
                    }
                }
            }
            _ => {}
        }
    }
}

impl WorldView for DemoWorld {
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
        self.types.get(type_id.as_str()).copied()
    }

    fn can_place_building(&self, _type_id: &ActorTypeId, cell: CellPos) -> bool {
        self.bounds.contains(cell) && !self.occupied.contains(&cell)
    }

    fn building_footprint(&self, _type_id: &ActorTypeId, cell: CellPos) -> Vec<CellPos> {
        vec![cell]
    }

    fn is_close_to_base(&self, owner: PlayerId, _type_id: &ActorTypeId, cell: CellPos) -> bool {
        self.actors
            .iter()
            .any(|a| a.owner == owner && a.traits.building && a.cell.chebyshev_distance(cell) <= 12)
            || !self.actors.iter().any(|a| a.owner == owner && a.traits.building)
    }

    fn building_at(&self, cell: CellPos) -> Option<ActorId> {
        self.actors
            .iter()
            .find(|a| a.traits.building && a.cell == cell)
            .map(|a| a.id)
    }

    fn can_enter_cell(&self, _unit: ActorId, cell: CellPos) -> bool {
        self.bounds.contains(cell) && !self.occupied.contains(&cell)
    }

    fn can_deploy(&self, unit: ActorId) -> bool {
        self.actor(unit)
            .map(|a| a.traits.can_deploy && !self.occupied.contains(&a.cell))
            .unwrap_or(false)
    }

    fn power_status(&self, _owner: PlayerId) -> PowerStatus {
        self.power
    }

    fn support_powers(&self, owner: PlayerId) -> Vec<SupportPowerSnapshot> {
        if owner == BOT {
            self.support.clone()
        } else {
            Vec::new()
        }
    }

    fn production_queues(&self, owner: PlayerId, category: &str) -> Vec<QueueId> {
        if owner != BOT {
            return Vec::new();
        }
        let mut ids: Vec<QueueId> = self
            .queues
            .iter()
            .filter(|(_, q)| q.category == category)
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

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iron_marshal=debug".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BotConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => BotConfig::default(),
    };

    let scenario = match &args.scenario {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => Scenario::default(),
    };

    let mut world = DemoWorld::from_scenario(scenario);
    let mut bot = BotController::new(BOT, config, args.seed);
    bot.activate(&world);

    let mut buffer = CommandBuffer::new();
    let mut issued = 0usize;

    for tick in 1..=args.ticks {
        bot.tick(&world, &mut buffer);
        for command in buffer.drain() {
            tracing::info!(tick, ?command, "command");
            world.apply(&command);
            issued += 1;
        }

        // Scripted raid partway through: the enemy hits our first
        // structure so the damage-feedback path gets exercised
        if tick == args.ticks / 2 {
            let victim = world
                .actors
                .iter()
                .find(|a| a.owner == BOT && a.traits.building)
                .map(|a| a.id);
            let raider = world.actors.iter().find(|a| a.owner != BOT).map(|a| a.id);
            if let Some(victim) = victim {
                tracing::info!(tick, "scripted raid on the base");
                bot.on_damage(
                    &world,
                    DamageEvent {
                        victim,
                        attacker: raider,
                        damage: 35,
                    },
                );
            }
        }
    }

    let structures = world
        .actors
        .iter()
        .filter(|a| a.owner == BOT && a.traits.building)
        .count();
    tracing::info!(
        ticks = args.ticks,
        commands = issued,
        structures,
        "demo run complete"
    );
    Ok(())
}
