//! Colonist Headless Colony Harness
//!
//! Runs scripted colony scenarios against the in-process host and checks
//! the invariants the decision core promises. No game host, no network.
//!
//! Usage:
//!   cargo run -p colonist-simtest
//!   cargo run -p colonist-simtest -- --verbose
//!   RUST_LOG=colonist=debug cargo run -p colonist-simtest

use std::collections::BTreeMap;

use colonist_core::commands::Command;
use colonist_core::components::*;
use colonist_core::config::ColonyConfig;
use colonist_core::engine::SimulationEngine;
use colonist_core::generation::{generate_room, RoomConfig};
use colonist_core::memory::{LinkType, MemoryStore};
use colonist_core::roles::RoleRegistry;
use colonist_logic::body::{PartCosts, MAX_BODY_SIZE};
use colonist_logic::spawn_budget::calculate_max_parts;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Colony configuration (the file an operator edits) ──────────────────
const CONFIG_JSON: &str = include_str!("../../../data/colony_config.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    println!("=== Colonist Colony Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration file
    let config = validate_config(&mut results);

    // 2. Spawn budget sweep
    results.extend(validate_spawn_budget(verbose));

    // 3. Memory migration
    results.extend(validate_memory_migration());

    // 4. Bootstrap a generated room
    results.extend(validate_bootstrap(&config, verbose));

    // 5. Tower and link controllers
    results.extend(validate_structures());

    // 6. Save / load determinism
    results.extend(validate_persistence(&config));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_config(results: &mut Vec<TestResult>) -> ColonyConfig {
    println!("--- Colony Configuration ---");

    let config: ColonyConfig = match serde_json::from_str(CONFIG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(check("config_parse", false, format!("JSON parse error: {}", e)));
            return ColonyConfig::default();
        }
    };
    results.push(check(
        "config_parse",
        true,
        format!("{} roles", config.roles.len()),
    ));

    let valid = config.validate();
    results.push(check("config_valid", valid.is_ok(), format!("{:?}", valid)));

    let registry = RoleRegistry::from_config(&config);
    results.push(check(
        "config_roles_have_behavior",
        registry.len() == config.roles.len(),
        format!("{} of {} roles built", registry.len(), config.roles.len()),
    ));

    let order: Vec<&str> = registry.in_priority_order().map(|r| r.name()).collect();
    let descending = registry
        .in_priority_order()
        .map(|r| r.definition().priority)
        .collect::<Vec<_>>()
        .windows(2)
        .all(|w| w[0] >= w[1]);
    results.push(check(
        "config_priority_order",
        descending,
        order.join(" > "),
    ));

    config
}

// ── 2. Spawn budget ─────────────────────────────────────────────────────

fn validate_spawn_budget(verbose: bool) -> Vec<TestResult> {
    println!("--- Spawn Budget ---");
    let mut results = Vec::new();
    let costs = PartCosts::default();
    let templates: Vec<(&str, Vec<BodyPart>, Vec<BodyPart>)> = vec![
        ("worker", vec![BodyPart::Work, BodyPart::Carry, BodyPart::Move], vec![]),
        ("miner", vec![BodyPart::Work], vec![BodyPart::Carry, BodyPart::Move]),
        ("explorer", vec![BodyPart::Move], vec![BodyPart::Claim, BodyPart::Move]),
    ];

    for (name, repeating, single) in &templates {
        let mut overspent = 0;
        let mut first_affordable = None;
        for energy in (0..=1_500).step_by(10) {
            if let Some(body) = calculate_max_parts(energy, repeating, single, 0, 20, MAX_BODY_SIZE, &costs) {
                if costs.body_cost(&body) > energy {
                    overspent += 1;
                }
                if !body.starts_with(single) {
                    overspent += 1;
                }
                first_affordable.get_or_insert(energy);
            }
        }
        if verbose {
            println!("  {}: first body at {:?} energy", name, first_affordable);
        }
        let cheapest = costs.body_cost(single) + costs.body_cost(repeating);
        results.push(check(
            &format!("budget_{}", name),
            overspent == 0 && first_affordable == Some(cheapest),
            format!(
                "{} violations, first body at {:?} (expected {})",
                overspent, first_affordable, cheapest
            ),
        ));
    }

    let forced = calculate_max_parts(250, &[BodyPart::Work], &[], 3, 5, MAX_BODY_SIZE, &costs);
    results.push(check(
        "budget_min_multiplier_unaffordable",
        forced.is_none(),
        format!("{:?}", forced),
    ));

    results
}

// ── 3. Memory migration ─────────────────────────────────────────────────

fn validate_memory_migration() -> Vec<TestResult> {
    println!("--- Memory Migration ---");
    let mut results = Vec::new();

    let v0 = r#"{
        "bases": {
            "E1S1": {
                "room": "E1S1",
                "roleConfig": { "Harvester": 3, "Upgrader": 1, "partsMaxMultiplier": 8 }
            }
        },
        "creeps": { "Harvester7": { "role": "Harvester", "home": "E1S1" } }
    }"#;

    match MemoryStore::from_json(v0) {
        Ok(store) => {
            let harvesters = store
                .base("E1S1")
                .and_then(|b| b.role_config.roles.get("Harvester"))
                .map(|r| r.required_number);
            results.push(check(
                "migrate_v0_counts",
                harvesters == Some(3),
                format!("Harvester requiredNumber = {:?}", harvesters),
            ));
            let max = store.base("E1S1").map(|b| b.role_config.parts_max_multiplier);
            results.push(check(
                "migrate_v0_keeps_multiplier",
                max == Some(8),
                format!("partsMaxMultiplier = {:?}", max),
            ));
            let reloaded = store
                .to_json()
                .ok()
                .and_then(|raw| MemoryStore::from_json(&raw).ok());
            results.push(check(
                "migrate_v0_stable",
                reloaded.as_ref() == Some(&store),
                "re-encoded blob loads identically".into(),
            ));
        }
        Err(e) => results.push(check("migrate_v0_counts", false, e.to_string())),
    }

    let future = MemoryStore::from_json(r#"{"version": 1000}"#);
    results.push(check(
        "migrate_rejects_future",
        future.is_err(),
        format!("{:?}", future.err()),
    ));

    results
}

// ── 4. Bootstrap ────────────────────────────────────────────────────────

fn validate_bootstrap(config: &ColonyConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Bootstrap ---");
    let mut results = Vec::new();

    let mut engine = SimulationEngine::with_config(config.clone());
    let room = RoomName::new(1, 1);
    let mut rng = StdRng::seed_from_u64(2024);
    let layout = generate_room(&mut engine, room, &RoomConfig::default(), &mut rng);

    let ticks = 1_000;
    let mut faults = 0;
    let mut most_spawns = 0;
    for _ in 0..ticks {
        let (report, commands) = engine.decide();
        faults += report.faults();
        let spawns = commands
            .iter()
            .filter(|c| matches!(c, Command::Spawn { .. }))
            .count();
        most_spawns = most_spawns.max(spawns);
        engine.commit(commands);
    }

    let mut roles: BTreeMap<String, u32> = BTreeMap::new();
    for memory in engine.memory.creeps.values() {
        *roles.entry(memory.role.clone()).or_default() += 1;
    }
    log::info!("bootstrap: {} ticks, workers by role {:?}", ticks, roles);

    let base = room.to_string();
    results.push(check(
        "bootstrap_base_founded",
        engine.memory.base(&base).is_some(),
        format!("base {}", base),
    ));
    results.push(check(
        "bootstrap_no_faults",
        faults == 0,
        format!("{} worker faults in {} ticks", faults, ticks),
    ));
    results.push(check(
        "bootstrap_one_spawn_per_tick",
        most_spawns <= 1,
        format!("at most {} spawn orders in a tick", most_spawns),
    ));
    results.push(check(
        "bootstrap_has_harvesters",
        roles.get("Harvester").copied().unwrap_or(0) > 0,
        format!("{:?}", roles),
    ));

    let built = layout
        .sites
        .iter()
        .filter(|id| engine.get::<Structure>(**id).is_some())
        .count();
    if verbose {
        println!("  {} of {} sites finished", built, layout.sites.len());
    }

    let capacity = engine.colony.config().diagnostics_capacity;
    results.push(check(
        "bootstrap_diagnostics_bounded",
        engine.colony.log.len() <= capacity,
        format!("{} entries (capacity {})", engine.colony.log.len(), capacity),
    ));

    results
}

// ── 5. Structure controllers ────────────────────────────────────────────

fn validate_structures() -> Vec<TestResult> {
    println!("--- Towers & Links ---");
    let mut results = Vec::new();
    let room = RoomName::new(0, 0);
    let at = |x, y| Position::new(room, x, y);

    let mut engine = SimulationEngine::new();
    let base = engine.memory.create_base("Home", room);
    for role in ["Harvester", "Upgrader", "Builder"] {
        base.set_required(role, 0);
    }
    engine.add_spawn("Spawn1", at(25, 25), 300);
    engine.add_structure(StructureKind::Tower, at(20, 20), 1_000);
    let hostile = engine.add_hostile(at(30, 30), 1_000);
    let sender = engine.add_structure(StructureKind::Link, at(10, 10), 400);
    let receiver = engine.add_structure(StructureKind::Link, at(40, 40), 0);
    engine.memory.set_link_type(sender, LinkType::Source);
    engine.memory.set_link_type(receiver, LinkType::Target);

    engine.run(3);

    results.push(check(
        "tower_destroys_hostile",
        engine.entity(hostile).is_none(),
        "1000 hits at 600 per shot".into(),
    ));
    let delivered = engine.get::<Store>(receiver).map(|s| s.energy);
    results.push(check(
        "link_delivers_with_loss",
        delivered == Some(388),
        format!("receiver holds {:?}", delivered),
    ));

    results
}

// ── 6. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(config: &ColonyConfig) -> Vec<TestResult> {
    println!("--- Save / Load ---");
    let mut results = Vec::new();

    let mut engine = SimulationEngine::with_config(config.clone());
    let mut rng = StdRng::seed_from_u64(7);
    generate_room(&mut engine, RoomName::new(3, 3), &RoomConfig::default(), &mut rng);
    engine.run(150);

    let mut buffer = Vec::new();
    if let Err(e) = engine.save(&mut buffer) {
        results.push(check("save", false, e.to_string()));
        return results;
    }
    let mut loaded = SimulationEngine::with_config(config.clone());
    if let Err(e) = loaded.load(&buffer[..]) {
        results.push(check("load", false, e.to_string()));
        return results;
    }
    results.push(check(
        "save_load_roundtrip",
        loaded.tick() == engine.tick() && loaded.world.len() == engine.world.len(),
        format!("{} bytes, tick {}", buffer.len(), loaded.tick()),
    ));

    engine.run(100);
    loaded.run(100);
    let same = engine.memory.to_json().ok() == loaded.memory.to_json().ok();
    results.push(check(
        "save_load_deterministic",
        same,
        "both runs agree 100 ticks after the save".into(),
    ));

    results
}
