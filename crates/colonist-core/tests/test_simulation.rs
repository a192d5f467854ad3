//! Longer runs through the in-process host, plus the role registry.

use colonist_core::config::ColonyConfig;
use colonist_core::engine::SimulationEngine;
use colonist_core::generation::{generate_room, RoomConfig};
use colonist_core::components::RoomName;
use colonist_core::memory::MemoryStore;
use colonist_core::roles::{RoleBehavior, RoleRegistry};
use colonist_logic::roles::RoleDefinition;
use rand::rngs::StdRng;
use rand::SeedableRng;

struct Plain(RoleDefinition);

impl RoleBehavior for Plain {
    fn definition(&self) -> &RoleDefinition {
        &self.0
    }
}

fn plain(name: &str, priority: i32) -> Box<dyn RoleBehavior> {
    Box::new(Plain(RoleDefinition::new(name, name, priority)))
}

#[test]
fn priority_ties_keep_declaration_order() {
    let registry = RoleRegistry::new(
        vec![plain("C", 50), plain("D", -1), plain("A", 100), plain("B", 50)],
        "A",
    );
    let names: Vec<&str> = registry.in_priority_order().map(|r| r.name()).collect();
    assert_eq!(names, vec!["A", "C", "B", "D"]);
}

#[test]
fn default_registry_covers_every_catalogue_role() {
    let config = ColonyConfig::default();
    let registry = RoleRegistry::from_config(&config);
    assert_eq!(registry.len(), config.roles.len());
    assert_eq!(registry.default_role().map(|r| r.name()), Some("Harvester"));
    let first = registry.in_priority_order().next().map(|r| r.name());
    assert_eq!(first, Some("Harvester"));
}

#[test]
fn generated_room_grows_without_faults() {
    let mut engine = SimulationEngine::new();
    let room = RoomName::new(1, 1);
    let mut rng = StdRng::seed_from_u64(42);
    generate_room(&mut engine, room, &RoomConfig::default(), &mut rng);

    let mut faults = 0;
    for _ in 0..300 {
        faults += engine.update().faults();
    }

    assert_eq!(faults, 0);
    assert_eq!(engine.tick(), 300);
    let base = engine.memory.base(&room.to_string()).expect("base founded");
    assert_eq!(base.room, room);
    assert!(engine
        .memory
        .creeps
        .values()
        .any(|m| m.role == "Harvester"));
}

#[test]
fn memory_survives_a_json_round_trip_mid_run() {
    let mut engine = SimulationEngine::new();
    let mut rng = StdRng::seed_from_u64(5);
    generate_room(&mut engine, RoomName::new(2, 2), &RoomConfig::default(), &mut rng);
    for _ in 0..30 {
        engine.update();
    }

    let raw = engine.memory.to_json().unwrap();
    let restored = MemoryStore::from_json(&raw).unwrap();
    assert_eq!(restored.to_json().unwrap(), raw);
}
