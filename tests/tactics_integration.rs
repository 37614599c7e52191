//! Unit grouping, defense/assault behaviour and damage feedback

mod common;

use common::{building, harvester, mcv, vehicle, MockWorld};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use iron_marshal::bot::{BotController, DamageEvent};
use iron_marshal::core::config::BotConfig;
use iron_marshal::core::types::{CellPos, MapBounds, PlayerId};
use iron_marshal::tactics::{TacticalController, TacticalGroup};
use iron_marshal::threat::ThreatField;
use iron_marshal::world::{ActorTraits, BotContext, Command, CommandBuffer, TypeInfo, WorldView};

const P1: PlayerId = PlayerId(1);
const P2: PlayerId = PlayerId(2);

fn bounds() -> MapBounds {
    MapBounds::new(0, 0, 40, 40)
}

fn run_tactics(
    tactics: &mut TacticalController,
    world: &MockWorld,
    buffer: &mut CommandBuffer,
    rng: &mut ChaCha8Rng,
    threat: &mut ThreatField,
    config: &BotConfig,
    tick: u64,
) {
    let mut ctx = BotContext::new(world, buffer, tick);
    tactics.tick(&mut ctx, rng, threat, config);
}

#[test]
fn new_units_are_enrolled_into_default_groups() {
    let mut world = MockWorld::new(bounds());
    let tank = world.add_actor(P1, "tank", CellPos::new(10, 10), vehicle());
    let digger = world.add_actor(P1, "digger", CellPos::new(11, 10), harvester());
    let truck = world.add_actor(P1, "truck", CellPos::new(12, 10), mcv());

    let mut tactics = TacticalController::new(P1);
    let mut threat = ThreatField::new(bounds());
    let mut buffer = CommandBuffer::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let config = BotConfig::default();

    run_tactics(
        &mut tactics,
        &world,
        &mut buffer,
        &mut rng,
        &mut threat,
        &config,
        1,
    );

    assert_eq!(tactics.groups().group_of(tank), Some(TacticalGroup::Defense));
    assert_eq!(
        tactics.groups().group_of(digger),
        Some(TacticalGroup::Harvester)
    );
    assert_eq!(tactics.groups().group_of(truck), Some(TacticalGroup::Mcv));

    // Idle harvesters get put to work immediately
    assert!(buffer
        .commands
        .iter()
        .any(|c| matches!(c, Command::Harvest { unit } if *unit == digger)));
}

#[test]
fn destroyed_units_are_pruned_from_roster_and_groups() {
    let mut world = MockWorld::new(bounds());
    let tank = world.add_actor(P1, "tank", CellPos::new(10, 10), vehicle());

    let mut tactics = TacticalController::new(P1);
    let mut threat = ThreatField::new(bounds());
    let mut buffer = CommandBuffer::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let config = BotConfig::default();

    run_tactics(
        &mut tactics,
        &world,
        &mut buffer,
        &mut rng,
        &mut threat,
        &config,
        1,
    );
    assert_eq!(tactics.groups().len(TacticalGroup::Defense), 1);

    world.remove_actor(tank);
    run_tactics(
        &mut tactics,
        &world,
        &mut buffer,
        &mut rng,
        &mut threat,
        &config,
        2,
    );
    assert_eq!(tactics.groups().len(TacticalGroup::Defense), 0);
    assert_eq!(tactics.groups().group_of(tank), None);
}

#[test]
fn assault_transfer_moves_half_the_defense_value() {
    let mut world = MockWorld::new(bounds());
    world.register_type(
        "tank",
        TypeInfo {
            power: 0,
            cost: 500,
            is_defense: false,
        },
    );
    // Six tanks at 500 = 3000 total, over the 2500 quota
    let units: Vec<_> = (0..6)
        .map(|i| world.add_actor(P1, "tank", CellPos::new(10 + i, 10), vehicle()))
        .collect();

    let mut tactics = TacticalController::new(P1);
    let mut threat = ThreatField::new(bounds());
    let mut buffer = CommandBuffer::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let config = BotConfig::default();

    run_tactics(
        &mut tactics,
        &world,
        &mut buffer,
        &mut rng,
        &mut threat,
        &config,
        1,
    );

    let assault_value: u32 = tactics
        .groups()
        .members(TacticalGroup::Assault)
        .iter()
        .map(|u| world.actor(*u).unwrap().cost)
        .sum();
    assert!(
        assault_value >= 1500,
        "transferred {} of 3000",
        assault_value
    );

    // Every unit still belongs to exactly one group
    for unit in &units {
        assert!(tactics.groups().group_of(*unit).is_some());
    }
    assert_eq!(
        tactics.groups().len(TacticalGroup::Defense) + tactics.groups().len(TacticalGroup::Assault),
        6
    );
}

#[test]
fn assault_below_quota_stays_home() {
    let mut world = MockWorld::new(bounds());
    world.register_type(
        "tank",
        TypeInfo {
            power: 0,
            cost: 500,
            is_defense: false,
        },
    );
    for i in 0..4 {
        world.add_actor(P1, "tank", CellPos::new(10 + i, 10), vehicle());
    }

    let mut tactics = TacticalController::new(P1);
    let mut threat = ThreatField::new(bounds());
    let mut buffer = CommandBuffer::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let config = BotConfig::default();

    // 2000 < 2500: nothing moves
    run_tactics(
        &mut tactics,
        &world,
        &mut buffer,
        &mut rng,
        &mut threat,
        &config,
        1,
    );
    assert_eq!(tactics.groups().len(TacticalGroup::Assault), 0);
    assert_eq!(tactics.groups().len(TacticalGroup::Defense), 4);
}

#[test]
fn attacked_base_rallies_defenders_to_the_attack_site() {
    let mut world = MockWorld::new(bounds());
    for i in 0..3 {
        world.add_actor(P1, "tank", CellPos::new(5 + i, 5), vehicle());
    }

    let mut tactics = TacticalController::new(P1);
    let mut threat = ThreatField::new(bounds());
    let attack = CellPos::new(30, 30);
    threat.add(attack, 40.0);
    tactics.note_base_attack(attack);

    let mut buffer = CommandBuffer::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let config = BotConfig::default();

    run_tactics(
        &mut tactics,
        &world,
        &mut buffer,
        &mut rng,
        &mut threat,
        &config,
        100,
    );

    // Everyone attack-moves to within jitter range of the attack site
    let moves: Vec<CellPos> = buffer
        .commands
        .iter()
        .filter_map(|c| match c {
            Command::AttackMove { cell, .. } => Some(*cell),
            _ => None,
        })
        .collect();
    assert_eq!(moves.len(), 3);
    assert!(moves.iter().all(|c| c.chebyshev_distance(attack) <= 2));

    // Threat still high: the alarm stays up
    assert!(tactics.base_attacked());
}

#[test]
fn defense_stands_down_once_threat_decays() {
    let mut world = MockWorld::new(bounds());
    world.add_actor(P1, "tank", CellPos::new(5, 5), vehicle());

    let mut tactics = TacticalController::new(P1);
    let mut threat = ThreatField::new(bounds());
    let attack = CellPos::new(30, 30);
    // Below the release threshold of 1.0
    threat.add(attack, 0.2);
    tactics.note_base_attack(attack);

    let mut buffer = CommandBuffer::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let config = BotConfig::default();

    run_tactics(
        &mut tactics,
        &world,
        &mut buffer,
        &mut rng,
        &mut threat,
        &config,
        100,
    );
    assert!(!tactics.base_attacked());
}

#[test]
fn responders_at_the_attack_site_bleed_threat_off() {
    let mut world = MockWorld::new(bounds());
    let attack = CellPos::new(10, 10);
    // Defender already adjacent to the attack site
    world.add_actor(P1, "tank", CellPos::new(11, 10), vehicle());

    let mut tactics = TacticalController::new(P1);
    let mut threat = ThreatField::new(bounds());
    threat.add(attack, 40.0);
    tactics.note_base_attack(attack);

    let mut buffer = CommandBuffer::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let config = BotConfig::default();

    run_tactics(
        &mut tactics,
        &world,
        &mut buffer,
        &mut rng,
        &mut threat,
        &config,
        100,
    );
    assert!(threat.get(attack) < 40.0);
}

#[test]
fn capture_unit_storms_a_nearby_enemy_structure() {
    let mut world = MockWorld::new(bounds());
    world.register_type(
        "engineer",
        TypeInfo {
            power: 0,
            cost: 2600,
            is_defense: false,
        },
    );
    let engineer = world.add_actor(
        P1,
        "engineer",
        CellPos::new(10, 10),
        ActorTraits {
            mobile: true,
            occupies_space: true,
            can_capture: true,
            ..Default::default()
        },
    );
    // Enemy structure well inside the opportunist radius
    let target = world.add_actor(P2, "radar_dome", CellPos::new(14, 10), building());

    let mut tactics = TacticalController::new(P1);
    let mut threat = ThreatField::new(bounds());
    let mut buffer = CommandBuffer::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let config = BotConfig::default();

    // First cycle musters (2600 over the quota), second pushes
    for tick in [1, 2] {
        run_tactics(
            &mut tactics,
            &world,
            &mut buffer,
            &mut rng,
            &mut threat,
            &config,
            tick,
        );
    }

    assert_eq!(
        tactics.groups().group_of(engineer),
        Some(TacticalGroup::Assault)
    );
    assert!(buffer
        .commands
        .iter()
        .any(|c| matches!(c, Command::Capture { unit, target: t }
            if *unit == engineer && *t == target)));
    // It acts in place instead of walking to the objective
    assert!(!buffer
        .commands
        .iter()
        .any(|c| matches!(c, Command::AttackMove { unit, .. } if *unit == engineer)));
}

#[test]
fn demolition_unit_targets_a_nearby_enemy_structure() {
    let mut world = MockWorld::new(bounds());
    world.register_type(
        "saboteur",
        TypeInfo {
            power: 0,
            cost: 2600,
            is_defense: false,
        },
    );
    let saboteur = world.add_actor(
        P1,
        "saboteur",
        CellPos::new(10, 10),
        ActorTraits {
            mobile: true,
            occupies_space: true,
            can_demolish: true,
            ..Default::default()
        },
    );
    let near = world.add_actor(P2, "silo", CellPos::new(13, 10), building());
    // A second structure farther out must lose to the closer one
    world.add_actor(P2, "refinery", CellPos::new(20, 10), building());

    let mut tactics = TacticalController::new(P1);
    let mut threat = ThreatField::new(bounds());
    let mut buffer = CommandBuffer::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let config = BotConfig::default();

    for tick in [1, 2] {
        run_tactics(
            &mut tactics,
            &world,
            &mut buffer,
            &mut rng,
            &mut threat,
            &config,
            tick,
        );
    }

    assert!(buffer
        .commands
        .iter()
        .any(|c| matches!(c, Command::Demolish { unit, target }
            if *unit == saboteur && *target == near)));
}

#[test]
fn idle_defense_loiters_at_an_owned_structure() {
    let mut world = MockWorld::new(bounds());
    let home = CellPos::new(8, 8);
    world.add_actor(P1, "barracks", home, building());
    let tank = world.add_actor(P1, "tank", CellPos::new(30, 30), vehicle());

    let mut tactics = TacticalController::new(P1);
    let mut threat = ThreatField::new(bounds());
    let mut buffer = CommandBuffer::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let config = BotConfig::default();

    // No attack recorded; past the idle cadence the group gathers at a
    // random owned structure (here the only one)
    run_tactics(
        &mut tactics,
        &world,
        &mut buffer,
        &mut rng,
        &mut threat,
        &config,
        700,
    );

    assert!(!tactics.base_attacked());
    assert!(buffer
        .commands
        .iter()
        .any(|c| matches!(c, Command::AttackMove { unit, cell }
            if *unit == tank && cell.chebyshev_distance(home) <= 2)));
}

#[test]
fn unit_production_starts_one_random_item_per_category() {
    let mut world = MockWorld::new(bounds());
    world.add_queue(1, P1, "vehicle", &["tank", "jeep"]);
    world.add_queue(2, P1, "infantry", &["rifleman"]);

    let mut tactics = TacticalController::new(P1);
    let mut threat = ThreatField::new(bounds());
    let mut buffer = CommandBuffer::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let config = BotConfig::default();

    run_tactics(
        &mut tactics,
        &world,
        &mut buffer,
        &mut rng,
        &mut threat,
        &config,
        1,
    );

    let starts: Vec<_> = buffer
        .commands
        .iter()
        .filter_map(|c| match c {
            Command::StartProduction { queue, item, count } => Some((*queue, item.clone(), *count)),
            _ => None,
        })
        .collect();
    assert_eq!(starts.len(), 2);
    assert!(starts.iter().all(|(_, _, count)| *count == 1));

    // A busy queue is left alone next cycle
    world.set_current(1, "tank", false, false);
    world.set_current(2, "rifleman", false, false);
    buffer.drain();
    run_tactics(
        &mut tactics,
        &world,
        &mut buffer,
        &mut rng,
        &mut threat,
        &config,
        31,
    );
    assert!(!buffer
        .commands
        .iter()
        .any(|c| matches!(c, Command::StartProduction { .. })));
}

#[test]
fn damage_event_adds_cost_scaled_threat() {
    let mut world = MockWorld::new(bounds());
    world.register_type(
        "refinery",
        TypeInfo {
            power: -30,
            cost: 1000,
            is_defense: false,
        },
    );
    let victim_cell = CellPos::new(12, 12);
    let victim = world.add_actor(P1, "refinery", victim_cell, building());
    world.actor_mut(victim).max_hp = 500;
    let raider = world.add_actor(P2, "tank", CellPos::new(14, 12), vehicle());

    let mut bot = BotController::new(P1, BotConfig::default(), 42);
    bot.activate(&world);

    bot.on_damage(
        &world,
        DamageEvent {
            victim,
            attacker: Some(raider),
            damage: 50,
        },
    );

    // 1000 * (50 / 500) = 100
    assert!((bot.threat().get(victim_cell) - 100.0).abs() < 1e-4);
    assert!(bot.tactics().base_attacked());
}

#[test]
fn damage_to_plain_units_is_ignored() {
    let mut world = MockWorld::new(bounds());
    world.register_type(
        "tank",
        TypeInfo {
            power: 0,
            cost: 500,
            is_defense: false,
        },
    );
    let cell = CellPos::new(12, 12);
    let victim = world.add_actor(P1, "tank", cell, vehicle());

    let mut bot = BotController::new(P1, BotConfig::default(), 42);
    bot.activate(&world);
    bot.on_damage(
        &world,
        DamageEvent {
            victim,
            attacker: None,
            damage: 50,
        },
    );

    assert_eq!(bot.threat().get(cell), 0.0);
    assert!(!bot.tactics().base_attacked());
}

#[test]
fn damage_to_enemy_assets_is_ignored() {
    let mut world = MockWorld::new(bounds());
    let cell = CellPos::new(12, 12);
    let victim = world.add_actor(P2, "refinery", cell, building());

    let mut bot = BotController::new(P1, BotConfig::default(), 42);
    bot.activate(&world);
    bot.on_damage(
        &world,
        DamageEvent {
            victim,
            attacker: None,
            damage: 50,
        },
    );

    assert_eq!(bot.threat().get(cell), 0.0);
    assert!(!bot.tactics().base_attacked());
}
