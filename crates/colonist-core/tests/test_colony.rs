//! End-to-end colony ticks through the in-process host.
//!
//! Exercises: MemoryStore → Colony::run_tick → BaseController (repopulate,
//! move_creeps) → RoleBehavior → CommandBuffer → SimulationEngine::apply.

use colonist_core::commands::Command;
use colonist_core::components::*;
use colonist_core::config::ColonyConfig;
use colonist_core::context::{Base, Tick};
use colonist_core::diagnostics::Severity;
use colonist_core::engine::SimulationEngine;
use colonist_core::error::RoleError;
use colonist_core::memory::{CreepMemory, ExplorerPhase};
use colonist_core::roles::{BodyTemplate, RoleBehavior, SpawnOutcome};
use colonist_core::world::CreepView;
use colonist_logic::roles::{RoleDefinition, RoleKind};

use BodyPart::*;

// ── Helpers ────────────────────────────────────────────────────────────

fn room() -> RoomName {
    RoomName::new(0, 0)
}

fn at(x: u8, y: u8) -> Position {
    Position::new(room(), x, y)
}

/// An engine with base "Home" in `room()` and every headcount at zero.
fn quiet_base() -> SimulationEngine {
    let mut engine = SimulationEngine::new();
    let base = engine.memory.create_base("Home", room());
    for kind in RoleKind::ALL.iter() {
        base.set_required(kind.name(), 0);
    }
    engine
}

fn require(engine: &mut SimulationEngine, role: &str, n: u32) {
    if let Some(base) = engine.memory.base_mut("Home") {
        base.set_required(role, n);
    }
}

fn set_energy(engine: &mut SimulationEngine, id: ObjectId, energy: u32) {
    let entity = engine.entity(id).unwrap();
    engine.world.get::<&mut Store>(entity).unwrap().energy = energy;
}

fn commands_of(commands: &[Command], creep: ObjectId) -> Vec<Command> {
    commands
        .iter()
        .filter(|c| c.creep() == Some(creep))
        .cloned()
        .collect()
}

fn spawn_commands(commands: &[Command]) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, Command::Spawn { .. }))
        .count()
}

fn current_number(engine: &SimulationEngine, role: &str) -> u32 {
    engine.memory.base("Home").unwrap().role_info[role].current_number
}

/// Always busy, always failing.
struct Saboteur {
    definition: RoleDefinition,
}

impl RoleBehavior for Saboteur {
    fn definition(&self) -> &RoleDefinition {
        &self.definition
    }

    fn is_necessary(&self, _tick: &Tick, _base: &Base) -> bool {
        true
    }

    fn work(&self, _tick: &mut Tick, _base: &Base, creep: &CreepView) -> Result<(), RoleError> {
        Err(RoleError::Fault {
            creep: creep.name.clone(),
            reason: "sabotage".to_string(),
        })
    }
}

/// Always busy, indexes past the end of an empty list.
struct Gremlin {
    definition: RoleDefinition,
}

impl RoleBehavior for Gremlin {
    fn definition(&self) -> &RoleDefinition {
        &self.definition
    }

    fn is_necessary(&self, _tick: &Tick, _base: &Base) -> bool {
        true
    }

    fn work(&self, _tick: &mut Tick, _base: &Base, creep: &CreepView) -> Result<(), RoleError> {
        let targets: Vec<ObjectId> = Vec::new();
        let _ = targets[creep.body.len()];
        Ok(())
    }
}

/// A one-part role cheap enough for any budget.
struct Scout {
    definition: RoleDefinition,
}

impl RoleBehavior for Scout {
    fn definition(&self) -> &RoleDefinition {
        &self.definition
    }

    fn body(&self) -> BodyTemplate {
        BodyTemplate {
            single: Vec::new(),
            repeating: vec![Move],
            max_multiplier: Some(1),
        }
    }
}

// ── Spawning ───────────────────────────────────────────────────────────

#[test]
fn first_tick_spawns_one_affordable_harvester() {
    let mut engine = quiet_base();
    require(&mut engine, "Harvester", 2);
    let spawn = engine.add_spawn("Spawn1", at(25, 25), 300);

    let (report, commands) = engine.decide();
    assert_eq!(spawn_commands(&commands), 1);
    let cost = match commands.iter().find(|c| matches!(c, Command::Spawn { .. })) {
        Some(Command::Spawn {
            name, cost, memory, ..
        }) => {
            assert_eq!(memory.role, "Harvester");
            assert_eq!(memory.home, "Home");
            assert!(*cost <= 300);
            assert_eq!(
                report.base("Home").unwrap().spawn,
                Some(SpawnOutcome::Spawned(name.clone()))
            );
            *cost
        }
        _ => unreachable!(),
    };
    engine.commit(commands);
    assert_eq!(engine.get::<Store>(spawn).unwrap().energy, 300 - cost);

    // Still one short, but the only spawn is busy.
    let (report, commands) = engine.decide();
    assert_eq!(spawn_commands(&commands), 0);
    assert_eq!(
        report.base("Home").unwrap().spawn,
        Some(SpawnOutcome::NoFreeSpawn)
    );
}

#[test]
fn configured_body_size_caps_new_workers() {
    let mut engine = SimulationEngine::with_config(ColonyConfig {
        max_body_size: 3,
        ..ColonyConfig::default()
    });
    let base = engine.memory.create_base("Home", room());
    for kind in RoleKind::ALL.iter() {
        base.set_required(kind.name(), 0);
    }
    require(&mut engine, "Miner", 1);
    engine.add_spawn("Spawn1", at(25, 25), 300);
    engine.add_source(at(10, 10));

    let (_, commands) = engine.decide();
    let body = commands.iter().find_map(|c| match c {
        Command::Spawn { body, .. } => Some(body.clone()),
        _ => None,
    });
    // 300 energy buys two WORK parts; the size limit leaves room for one.
    assert_eq!(body, Some(vec![Carry, Move, Work]));
}

#[test]
fn at_most_one_spawn_per_base_per_tick() {
    let mut engine = quiet_base();
    require(&mut engine, "Harvester", 4);
    require(&mut engine, "Upgrader", 2);
    engine
        .memory
        .base_mut("Home")
        .unwrap()
        .role_config
        .parts_max_multiplier = 1;
    engine.add_spawn("Spawn1", at(25, 25), 300);
    engine.add_spawn("Spawn2", at(30, 25), 300);
    engine.add_controller(at(10, 10), Controller::owned(1));

    let mut spawned = 0;
    for _ in 0..5 {
        let (_, commands) = engine.decide();
        let count = spawn_commands(&commands);
        assert!(count <= 1, "{} spawn commands in one tick", count);
        spawned += count;
        engine.commit(commands);
    }
    // One per spawn; both are busy growing their creeps after that.
    assert_eq!(spawned, 2);
}

#[test]
fn short_energy_waits_instead_of_spawning_lower_priority() {
    let mut engine = quiet_base();
    engine.colony.registry_mut().register(Box::new(Scout {
        definition: RoleDefinition::new("Scout", "👁", 0),
    }));
    require(&mut engine, "Harvester", 1);
    require(&mut engine, "Scout", 1);
    engine.add_spawn("Spawn1", at(25, 25), 150);

    let (report, commands) = engine.decide();
    assert_eq!(spawn_commands(&commands), 0);
    assert_eq!(
        report.base("Home").unwrap().spawn,
        Some(SpawnOutcome::WaitingForEnergy)
    );
}

#[test]
fn dependent_base_borrows_outsourced_spawn() {
    let mut engine = quiet_base();
    engine.memory.base_mut("Home").unwrap().outsource_spawn = true;
    let outpost_room = RoomName::new(1, 0);
    let outpost = engine.memory.create_base("Outpost", outpost_room);
    for kind in RoleKind::ALL.iter() {
        outpost.set_required(kind.name(), 0);
    }
    outpost.set_required("Harvester", 1);
    let spawn = engine.add_spawn("Spawn1", at(25, 25), 300);
    engine.add_source(Position::new(outpost_room, 10, 10));

    let (_, commands) = engine.decide();
    let orders: Vec<&Command> = commands
        .iter()
        .filter(|c| matches!(c, Command::Spawn { .. }))
        .collect();
    assert_eq!(orders.len(), 1);
    match orders[0] {
        Command::Spawn {
            spawn: used, memory, ..
        } => {
            assert_eq!(*used, spawn);
            assert_eq!(memory.home, "Outpost");
        }
        _ => unreachable!(),
    }
    assert_eq!(engine.memory.spawn_home("Spawn1"), Some("Home"));
}

#[test]
fn remote_spawn_joins_nearest_base() {
    let mut engine = quiet_base();
    engine.add_spawn("Spawn1", at(25, 25), 300);
    engine.add_spawn("Remote", Position::new(RoomName::new(3, 3), 25, 25), 300);

    engine.run(3);
    assert_eq!(engine.memory.spawn_home("Remote"), Some("Home"));
    assert_eq!(engine.memory.spawn_home("Spawn1"), Some("Home"));
    assert!(engine.colony.log.contains("remote spawn Remote"));
}

#[test]
fn remote_spawn_prefers_closer_base_then_name() {
    let mut engine = quiet_base();
    for (name, room) in [("Zeta", RoomName::new(4, 4)), ("Annex", RoomName::new(2, 4))] {
        let base = engine.memory.create_base(name, room);
        for kind in RoleKind::ALL.iter() {
            base.set_required(kind.name(), 0);
        }
    }
    engine.add_spawn("Remote", Position::new(RoomName::new(3, 3), 25, 25), 300);

    engine.update();
    // Annex and Zeta are one room away, Home three.
    assert_eq!(engine.memory.spawn_home("Remote"), Some("Annex"));
}

// ── Role resolution ────────────────────────────────────────────────────

#[test]
fn idle_worker_runs_necessary_role_for_one_tick() {
    let mut engine = quiet_base();
    require(&mut engine, "Builder", 1);
    require(&mut engine, "Upgrader", 1);
    engine.add_spawn("Spawn1", at(25, 25), 300);
    let controller = engine.add_controller(at(10, 10), Controller::owned(1));
    let worker = engine.add_creep(
        "Builder1",
        vec![Work, Carry, Move],
        at(11, 11),
        Some(CreepMemory::new("Builder", "Home")),
    );
    set_energy(&mut engine, worker, 50);

    let (report, commands) = engine.decide();
    assert!(commands.contains(&Command::Upgrade {
        creep: worker,
        controller
    }));
    assert_eq!(report.base("Home").unwrap().reassigned, 1);
    assert_eq!(current_number(&engine, "Upgrader"), 1);
    assert_eq!(current_number(&engine, "Builder"), 0);
    assert_eq!(engine.memory.creep("Builder1").unwrap().role, "Builder");

    engine.commit(commands);
    assert_eq!(engine.get::<Controller>(controller).unwrap().progress, 1);
}

#[test]
fn idle_worker_is_never_lent_to_miner() {
    let mut engine = quiet_base();
    require(&mut engine, "Harvester", 1);
    require(&mut engine, "Miner", 1);
    engine.add_spawn("Spawn1", at(25, 25), 300);
    let source = engine.add_source(at(20, 26));
    let worker = engine.add_creep(
        "Harvester1",
        vec![Work, Carry, Move],
        at(20, 25),
        Some(CreepMemory::new("Harvester", "Home")),
    );

    let (report, commands) = engine.decide();
    let home = report.base("Home").unwrap();
    assert_eq!(home.reassigned, 0);
    assert_eq!(home.faults, 0);
    assert!(commands.contains(&Command::Harvest {
        creep: worker,
        source
    }));
    assert_eq!(current_number(&engine, "Harvester"), 1);
    assert_eq!(current_number(&engine, "Miner"), 0);
    assert!(!engine.colony.log.contains("no home source"));
}

#[test]
fn unknown_role_falls_back_to_default() {
    let mut engine = quiet_base();
    engine.add_spawn("Spawn1", at(25, 25), 0);
    let ghost = engine.add_creep(
        "Ghost",
        vec![Work, Carry, Move],
        at(20, 20),
        Some(CreepMemory::new("Wizard", "Home")),
    );

    let (report, commands) = engine.decide();
    assert!(commands.contains(&Command::Say {
        creep: ghost,
        message: "❗".to_string()
    }));
    assert_eq!(report.faults(), 0);
    assert_eq!(current_number(&engine, "Harvester"), 1);
    assert_eq!(engine.memory.creep("Ghost").unwrap().role, "Wizard");
    assert!(engine.colony.log.contains("unknown role"));
}

#[test]
fn sticky_repair_target_is_finished_before_switching() {
    let mut engine = quiet_base();
    require(&mut engine, "Handyman", 1);
    engine.add_spawn("Spawn1", at(25, 25), 300);
    let far = engine.add_structure(StructureKind::Road, at(13, 10), 0);
    let near = engine.add_structure(StructureKind::Road, at(11, 10), 0);
    for (id, hits) in [(far, 4_400), (near, 4_000)] {
        let entity = engine.entity(id).unwrap();
        engine.world.get::<&mut Hits>(entity).unwrap().hits = hits;
    }
    let mut memory = CreepMemory::new("Handyman", "Home");
    memory.working = true;
    memory.target = Some(far);
    let worker = engine.add_creep("Handyman1", vec![Work, Carry, Move], at(10, 10), Some(memory));
    set_energy(&mut engine, worker, 50);

    let mut repaired = Vec::new();
    for _ in 0..7 {
        let (_, commands) = engine.decide();
        for command in commands_of(&commands, worker) {
            if let Command::Repair { target, .. } = command {
                repaired.push(target);
            }
        }
        engine.commit(commands);
    }

    // 600 damage at 100 per tick, then the closer job.
    assert_eq!(repaired, vec![far, far, far, far, far, far, near]);
    assert!(engine.get::<Hits>(far).unwrap().is_full());
    assert_eq!(engine.memory.creep("Handyman1").unwrap().target, Some(near));
}

// ── Remembered targets ─────────────────────────────────────────────────

fn logged_at(engine: &SimulationEngine, severity: Severity, needle: &str) -> bool {
    engine
        .colony
        .log
        .entries()
        .any(|e| e.severity == severity && e.message.contains(needle))
}

#[test]
fn storekeeper_waits_when_remembered_source_is_gone() {
    let mut engine = quiet_base();
    engine.add_spawn("Spawn1", at(25, 25), 100);
    let gone = engine.add_structure(StructureKind::Container, at(11, 10), 500);
    engine.add_structure(StructureKind::Container, at(9, 10), 500);
    let entity = engine.entity(gone).unwrap();
    engine.world.despawn(entity).unwrap();
    let mut memory = CreepMemory::new("Storekeeper", "Home");
    memory.source = Some(gone);
    let worker = engine.add_creep("Storekeeper1", vec![Work, Carry, Move], at(10, 10), Some(memory));

    let (report, commands) = engine.decide();
    assert!(commands_of(&commands, worker).is_empty());
    assert_eq!(report.faults(), 0);
    assert_eq!(engine.memory.creep("Storekeeper1").unwrap().source, None);
    assert!(logged_at(&engine, Severity::Debug, "is gone, waiting"));
}

#[test]
fn remembered_target_is_used_after_leaving_candidates() {
    let mut engine = quiet_base();
    engine.add_spawn("Spawn1", at(25, 25), 100);
    let storage = engine.add_structure(StructureKind::Storage, at(11, 10), 0);
    engine.add_structure(StructureKind::Extension, at(9, 10), 0);
    let mut memory = CreepMemory::new("Storekeeper", "Home");
    memory.working = true;
    memory.target = Some(storage);
    let worker = engine.add_creep("Storekeeper1", vec![Work, Carry, Move], at(10, 10), Some(memory));
    set_energy(&mut engine, worker, 50);

    let (_, commands) = engine.decide();
    assert_eq!(
        commands_of(&commands, worker),
        vec![Command::Transfer {
            creep: worker,
            target: storage,
            amount: 50
        }]
    );
    assert_eq!(
        engine.memory.creep("Storekeeper1").unwrap().target,
        Some(storage)
    );
}

#[test]
fn upgrader_flags_controller_that_does_not_resolve() {
    let mut engine = quiet_base();
    engine.add_spawn("Spawn1", at(25, 25), 300);
    let controller = engine.add_controller(at(10, 10), Controller::owned(1));
    let entity = engine.entity(controller).unwrap();
    engine.world.despawn(entity).unwrap();
    let mut memory = CreepMemory::new("Upgrader", "Home");
    memory.working = true;
    memory.target = Some(controller);
    let worker = engine.add_creep("Upgrader1", vec![Work, Carry, Move], at(11, 11), Some(memory));
    set_energy(&mut engine, worker, 50);

    let (report, commands) = engine.decide();
    assert_eq!(
        commands_of(&commands, worker),
        vec![Command::Say {
            creep: worker,
            message: "⚠".to_string()
        }]
    );
    assert_eq!(report.faults(), 0);
    assert_eq!(engine.memory.creep("Upgrader1").unwrap().target, None);
    assert!(logged_at(&engine, Severity::Warn, "does not resolve"));
}

// ── Worker lifecycle ───────────────────────────────────────────────────

#[test]
fn self_destructing_worker_walks_home_and_recycles() {
    let mut engine = quiet_base();
    engine.add_spawn("Spawn1", at(25, 25), 300);
    engine.add_source(at(20, 26));
    let mut memory = CreepMemory::new("Harvester", "Home");
    memory.selfdestruct = true;
    let worker = engine.add_creep(
        "Harvester1",
        vec![Work, Carry, Move, Move],
        at(20, 25),
        Some(memory),
    );

    let mut recycled_at = None;
    for step in 0..10 {
        let (_, commands) = engine.decide();
        let own = commands_of(&commands, worker);
        assert_eq!(own.len(), 1, "step {}: {:?}", step, own);
        match own[0] {
            Command::Recycle { .. } => {
                recycled_at = Some(step);
                engine.commit(commands);
                break;
            }
            Command::Move { .. } => engine.commit(commands),
            ref other => panic!("unexpected {:?}", other),
        }
    }

    assert_eq!(recycled_at, Some(4));
    assert!(engine.creep_id("Harvester1").is_none());
    let (report, _) = engine.decide();
    assert_eq!(report.forgotten, 1);
    assert!(engine.memory.creep("Harvester1").is_none());
}

#[test]
fn failing_worker_does_not_stop_the_next() {
    let mut engine = quiet_base();
    require(&mut engine, "Upgrader", 1);
    engine.colony.registry_mut().register(Box::new(Saboteur {
        definition: RoleDefinition::new("Saboteur", "💣", 0),
    }));
    engine.colony.registry_mut().register(Box::new(Gremlin {
        definition: RoleDefinition::new("Gremlin", "👹", 0),
    }));
    engine.add_spawn("Spawn1", at(25, 25), 300);
    let controller = engine.add_controller(at(10, 10), Controller::owned(1));
    engine.add_creep(
        "Alpha",
        vec![Work, Carry, Move],
        at(30, 30),
        Some(CreepMemory::new("Saboteur", "Home")),
    );
    engine.add_creep(
        "Charlie",
        vec![Work, Carry, Move],
        at(32, 30),
        Some(CreepMemory::new("Gremlin", "Home")),
    );
    let bravo = engine.add_creep(
        "Bravo",
        vec![Work, Carry, Move],
        at(11, 10),
        Some(CreepMemory::new("Upgrader", "Home")),
    );
    set_energy(&mut engine, bravo, 50);

    let (report, commands) = engine.decide();
    let home = report.base("Home").unwrap();
    assert_eq!(home.faults, 2);
    assert_eq!(home.workers_run, 3);
    assert!(commands.contains(&Command::Upgrade {
        creep: bravo,
        controller
    }));
    assert!(engine.colony.log.contains("sabotage"));
    assert!(engine.colony.log.contains("Charlie panicked"));
    assert!(engine.colony.log.contains("index out of bounds"));
}

#[test]
fn expiring_miner_queues_its_replacement() {
    let mut engine = quiet_base();
    require(&mut engine, "Miner", 1);
    engine.add_spawn("Spawn1", at(25, 25), 300);
    let source = engine.add_source(at(10, 10));
    let mut memory = CreepMemory::new("Miner", "Home");
    memory.home_source = Some(source);
    memory.ticks_to_source = Some(5);
    let veteran = engine.add_creep(
        "Veteran",
        vec![Carry, Move, Work, Work],
        at(11, 10),
        Some(memory),
    );
    // 5 ticks of travel plus 4 parts at 3 ticks each.
    let entity = engine.entity(veteran).unwrap();
    engine.world.get::<&mut Creep>(entity).unwrap().ticks_to_live = 17;

    let (_, commands) = engine.decide();
    assert!(commands.contains(&Command::Harvest {
        creep: veteran,
        source
    }));
    assert_eq!(spawn_commands(&commands), 0);
    let queue = &engine.memory.base("Home").unwrap().spawn_queue;
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].role, "Miner");
    assert_eq!(queue[0].source, Some(source));
    assert!(engine.memory.creep("Veteran").unwrap().trained_replacement);
    engine.commit(commands);

    let (report, commands) = engine.decide();
    assert_eq!(
        report.base("Home").unwrap().spawn,
        Some(SpawnOutcome::Spawned("Miner1".to_string()))
    );
    let replacement = commands.iter().find_map(|c| match c {
        Command::Spawn { memory, .. } => Some(memory.clone()),
        _ => None,
    });
    assert_eq!(replacement.and_then(|m| m.home_source), Some(source));
    assert!(engine.memory.base("Home").unwrap().spawn_queue.is_empty());
}

#[test]
fn explorer_claims_flag_room_then_builds() {
    let mut engine = quiet_base();
    engine.add_spawn("Spawn1", at(25, 25), 300);
    let frontier = RoomName::new(1, 0);
    engine.add_flag("Claim1", Position::new(frontier, 20, 20));
    let controller = engine.add_controller(Position::new(frontier, 22, 22), Controller::unowned());
    let mut memory = CreepMemory::new("Explorer", "Home");
    memory.flag = Some("Claim1".to_string());
    memory.phase = Some(ExplorerPhase::ClaimFlagRoom);
    let explorer = engine.add_creep(
        "Explorer1",
        vec![Claim, Move],
        Position::new(frontier, 21, 21),
        Some(memory),
    );

    let (_, commands) = engine.decide();
    assert!(commands.contains(&Command::Claim {
        creep: explorer,
        controller
    }));
    let memory = engine.memory.creep("Explorer1").unwrap();
    assert_eq!(memory.role, "Builder");
    assert_eq!(memory.flag, None);
    assert_eq!(memory.phase, None);

    engine.commit(commands);
    assert!(engine.get::<Controller>(controller).unwrap().is_mine());
}

#[test]
fn explorer_releases_flag_of_foreign_room() {
    let mut engine = quiet_base();
    engine.add_spawn("Spawn1", at(25, 25), 300);
    let frontier = RoomName::new(1, 0);
    engine.add_flag("Claim1", Position::new(frontier, 20, 20));
    engine.add_controller(
        Position::new(frontier, 22, 22),
        Controller {
            level: 3,
            progress: 0,
            owner: ControllerOwner::Foreign,
        },
    );
    let mut memory = CreepMemory::new("Explorer", "Home");
    memory.flag = Some("Claim1".to_string());
    memory.phase = Some(ExplorerPhase::ClaimFlagRoom);
    let explorer = engine.add_creep(
        "Explorer1",
        vec![Claim, Move],
        Position::new(frontier, 21, 21),
        Some(memory),
    );

    let (report, commands) = engine.decide();
    assert!(commands_of(&commands, explorer).is_empty());
    assert_eq!(report.faults(), 0);
    let memory = engine.memory.creep("Explorer1").unwrap();
    assert_eq!(memory.role, "Builder");
    assert_eq!(memory.flag, None);
    assert!(engine.colony.log.contains("owned by someone else"));

    // Nobody is sent after the same flag again.
    require(&mut engine, "Explorer", 1);
    let (report, commands) = engine.decide();
    assert_eq!(spawn_commands(&commands), 0);
    assert_eq!(report.base("Home").unwrap().spawn, None);
}

#[test]
fn explorer_walks_to_flag_room_first() {
    let mut engine = quiet_base();
    engine.add_spawn("Spawn1", at(25, 25), 300);
    let frontier = RoomName::new(1, 0);
    engine.add_flag("Claim1", Position::new(frontier, 20, 20));
    engine.add_controller(Position::new(frontier, 22, 22), Controller::unowned());
    let mut memory = CreepMemory::new("Explorer", "Home");
    memory.flag = Some("Claim1".to_string());
    memory.phase = Some(ExplorerPhase::GotoFlagRoom);
    let explorer = engine.add_creep("Explorer1", vec![Claim, Move], at(48, 20), Some(memory));

    let (_, commands) = engine.decide();
    let own = commands_of(&commands, explorer);
    assert!(matches!(own.as_slice(), [Command::Move { .. }]));
    assert_eq!(
        engine.memory.creep("Explorer1").unwrap().phase,
        Some(ExplorerPhase::GotoFlagRoom)
    );
}
