//! Base controller: the per-base, per-tick decision pass.
//!
//! Strictly ordered for each base:
//! 1. [`init_role_info`] rebuilds the per-role counters from configuration.
//! 2. [`repopulate_creeps`] orders at most one new worker.
//! 3. [`show_spawning`] notes workers still in production.
//! 4. [`move_creeps`] runs every worker the base drives, re-routing idle
//!    workers to a necessary role for this tick only.
//!
//! A failing or panicking worker is logged and skipped; nothing here aborts
//! the loop.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::panic::{self, AssertUnwindSafe};

use colonist_logic::roles::RoleDefinition;

use crate::components::Spawn;
use crate::context::{Base, Tick};
use crate::memory::{CreepMemory, MemoryStore, RoleInfo, SpawnRequest};
use crate::roles::{RoleBehavior, RoleRegistry, SpawnOutcome, WorkerState};
use crate::world::{CreepView, SpawnView};

/// Glyph shown by a worker whose role name is unknown.
pub const UNKNOWN_ROLE_GLYPH: &str = "❗";

/// What one base did this tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseReport {
    pub base: String,
    pub spawn: Option<SpawnOutcome>,
    pub workers_run: u32,
    pub faults: u32,
    /// Workers run under a role other than their own.
    pub reassigned: u32,
}

/// Rebuild `roleInfo` of `base`: every counter zeroed, required numbers
/// taken from the base's role configuration.
pub fn init_role_info(memory: &mut MemoryStore, registry: &RoleRegistry, base: &str) {
    let definitions: Vec<RoleDefinition> =
        registry.definitions().into_iter().cloned().collect();
    memory.ensure_role_config(base, &definitions);

    let info: BTreeMap<String, RoleInfo> = definitions
        .iter()
        .map(|def| {
            (
                def.name.clone(),
                RoleInfo {
                    symbol: def.symbol.clone(),
                    current_number: 0,
                    required_number: memory.required_number(base, def),
                },
            )
        })
        .collect();
    if let Some(base) = memory.base_mut(base) {
        base.role_info = info;
    }
}

/// Live workers (spawning included) with this role and home.
pub fn live_count(tick: &Tick, role: &str, base: &str) -> u32 {
    tick.world
        .creeps()
        .iter()
        .filter_map(|c| tick.memory.creep(&c.name))
        .filter(|m| m.role == role && m.home == base)
        .count() as u32
}

/// Order at most one new worker for `base`.
///
/// Queued requests (miner replacements) come first. Then roles are tried in
/// priority order; the first role that is short-handed and reaches an
/// elected spawn ends the pass, whether it spawned or is waiting for
/// energy. A role that declines lets the next role try.
pub fn repopulate_creeps(
    tick: &mut Tick,
    registry: &RoleRegistry,
    base: &Base,
) -> Option<SpawnOutcome> {
    let queued = tick
        .memory
        .base(&base.name)
        .and_then(|b| b.spawn_queue.first().cloned());
    if let Some(request) = queued {
        match registry.get(&request.role) {
            None => {
                tick.warn(format!(
                    "{}: dropping queued request for unknown role {}",
                    base.name, request.role
                ));
                pop_request(tick, base);
            }
            Some(role) => {
                let outcome = spawn_creep_for_role(tick, role, base, Some(&request));
                match outcome {
                    SpawnOutcome::Spawned(_) => {
                        pop_request(tick, base);
                        return Some(outcome);
                    }
                    SpawnOutcome::Skipped => pop_request(tick, base),
                    SpawnOutcome::WaitingForEnergy | SpawnOutcome::NoFreeSpawn => {
                        return Some(outcome);
                    }
                }
            }
        }
    }

    for role in registry.in_priority_order() {
        let required = tick.memory.required_number(&base.name, role.definition());
        let live = live_count(tick, role.name(), &base.name);
        if live >= required {
            continue;
        }
        match spawn_creep_for_role(tick, role, base, None) {
            SpawnOutcome::Skipped => continue,
            outcome => return Some(outcome),
        }
    }
    None
}

fn pop_request(tick: &mut Tick, base: &Base) {
    if let Some(memory) = tick.memory.base_mut(&base.name) {
        if !memory.spawn_queue.is_empty() {
            memory.spawn_queue.remove(0);
        }
    }
}

/// Elect a spawn for `base` and let the role compose and order the worker.
pub fn spawn_creep_for_role(
    tick: &mut Tick,
    role: &dyn RoleBehavior,
    base: &Base,
    request: Option<&SpawnRequest>,
) -> SpawnOutcome {
    match elect_spawn(tick, base) {
        Some(spawn) => role.spawn(tick, base, &spawn, request),
        None => {
            tick.debug(format!("{}: no free spawn for {}", base.name, role.name()));
            SpawnOutcome::NoFreeSpawn
        }
    }
}

/// Pick a free spawn for `base`.
///
/// Preference: the base's own spawns by name, then a homeless spawn (which
/// the base adopts), then a spawn lent by a base with `outsourceSpawn` set,
/// ordered by lender name then spawn name. A spawn already ordered this
/// tick is not free, so a lender serves the first dependent base processed.
pub fn elect_spawn(tick: &mut Tick, base: &Base) -> Option<SpawnView> {
    let free: Vec<SpawnView> = tick
        .world
        .spawns()
        .into_iter()
        .filter(|s| !s.spawning && !tick.commands.has_spawn_command(s.id))
        .collect();

    if let Some(own) = free
        .iter()
        .find(|s| tick.memory.spawn_home(&s.name) == Some(base.name.as_str()))
    {
        return Some(own.clone());
    }

    if let Some(homeless) = free.iter().find(|s| tick.memory.spawn_home(&s.name).is_none()) {
        let spawn = homeless.clone();
        tick.memory.set_spawn_home(&spawn.name, &base.name);
        tick.info(format!("{}: adopted homeless spawn {}", base.name, spawn.name));
        return Some(spawn);
    }

    let mut lent: Vec<(&str, &SpawnView)> = free
        .iter()
        .filter_map(|s| {
            let home = tick.memory.spawn_home(&s.name)?;
            let lends = home != base.name
                && tick.memory.base(home).map_or(false, |b| b.outsource_spawn);
            lends.then_some((home, s))
        })
        .collect();
    lent.sort_by(|a, b| (a.0, &a.1.name).cmp(&(b.0, &b.1.name)));
    let (lender, spawn) = lent.first().map(|(h, s)| (h.to_string(), (*s).clone()))?;
    tick.debug(format!("{}: borrowing {} from {}", base.name, spawn.name, lender));
    Some(spawn)
}

/// Run every worker `base` drives this tick.
pub fn move_creeps(
    tick: &mut Tick,
    registry: &RoleRegistry,
    base: &Base,
    workers: &[CreepView],
) -> BaseReport {
    let mut report = BaseReport {
        base: base.name.clone(),
        ..Default::default()
    };
    let mut necessity: HashMap<String, bool> = HashMap::new();

    for creep in workers.iter().filter(|c| !c.spawning) {
        if tick.memory.creep(&creep.name).is_none() {
            let default_role = registry.default_role().map(|r| r.name().to_string());
            let role = default_role.unwrap_or_default();
            tick.warn(format!(
                "{}: {} has no memory, assuming {}",
                base.name, creep.name, role
            ));
            tick.memory
                .creeps
                .insert(creep.name.clone(), CreepMemory::new(&role, &base.name));
        }
        let Some(memory) = tick.memory.creep(&creep.name).cloned() else {
            continue;
        };

        let own = match registry.get(&memory.role) {
            Some(role) => role,
            None => {
                tick.warn(format!(
                    "{}: {} has unknown role '{}'",
                    base.name, creep.name, memory.role
                ));
                tick.say(creep, UNKNOWN_ROLE_GLYPH);
                match registry.default_role() {
                    Some(role) => role,
                    None => continue,
                }
            }
        };

        let chosen = resolve_role(tick, registry, base, own, &mut necessity);
        if chosen.name() != own.name() {
            report.reassigned += 1;
        }

        let state = WorkerState::resolve(chosen, &memory);
        match panic::catch_unwind(AssertUnwindSafe(|| state.run(tick, base, creep))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tick.error(format!("{}: {} failed: {}", base.name, creep.name, e));
                report.faults += 1;
            }
            Err(payload) => {
                tick.error(format!(
                    "{}: {} panicked: {}",
                    base.name,
                    creep.name,
                    panic_message(payload.as_ref())
                ));
                report.faults += 1;
            }
        }
        report.workers_run += 1;

        if let Some(info) = tick
            .memory
            .base_mut(&base.name)
            .and_then(|b| b.role_info.get_mut(chosen.name()))
        {
            info.current_number += 1;
        }
    }
    report
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// The worker's own role while it is necessary; otherwise the first
/// reassignable, necessary role in priority order with a non-zero
/// headcount; otherwise its own role.
pub fn resolve_role<'r>(
    tick: &Tick,
    registry: &'r RoleRegistry,
    base: &Base,
    own: &'r dyn RoleBehavior,
    cache: &mut HashMap<String, bool>,
) -> &'r dyn RoleBehavior {
    if is_necessary(tick, base, own, cache) {
        return own;
    }
    registry
        .in_priority_order()
        .filter(|r| r.name() != own.name() && r.reassignable())
        .filter(|r| tick.memory.required_number(&base.name, r.definition()) > 0)
        .find(|r| is_necessary(tick, base, *r, cache))
        .unwrap_or(own)
}

fn is_necessary(
    tick: &Tick,
    base: &Base,
    role: &dyn RoleBehavior,
    cache: &mut HashMap<String, bool>,
) -> bool {
    if let Some(&known) = cache.get(role.name()) {
        return known;
    }
    let necessary = role.is_necessary(tick, base);
    cache.insert(role.name().to_string(), necessary);
    necessary
}

/// Log every spawn of the base room that is still producing a worker, at
/// info level for spawns carrying the operator `debug` flag.
pub fn show_spawning(tick: &mut Tick, base: &Base) {
    let lines: Vec<(bool, String)> = tick
        .world
        .spawns()
        .into_iter()
        .filter(|s| s.pos.room == base.room)
        .filter_map(|s| {
            let spawning = tick.world.get::<Spawn>(s.id)?.spawning?;
            let line = format!(
                "{}: {} 🛠 {} ({} ticks)",
                base.name, s.name, spawning.creep, spawning.remaining
            );
            Some((tick.memory.spawn_debug(&s.name), line))
        })
        .collect();
    for (flagged, line) in lines {
        if flagged {
            tick.info(line);
        } else {
            tick.debug(line);
        }
    }
}

/// One full controller pass over `base`.
pub fn run_base(
    tick: &mut Tick,
    registry: &RoleRegistry,
    base: &Base,
    workers: &[CreepView],
) -> BaseReport {
    init_role_info(tick.memory, registry, &base.name);
    let spawn = repopulate_creeps(tick, registry, base);
    show_spawning(tick, base);
    let mut report = move_creeps(tick, registry, base, workers);
    report.spawn = spawn;
    report
}
