//! Role behaviors.
//!
//! Every role implements [`RoleBehavior`]. The trait's default methods carry
//! the shared behavior (target necessity, spawn budgeting, the gather and
//! deliver primitives); each role overrides only what makes it distinct.
//! Workers are driven through [`WorkerState`], which pre-empts role logic
//! while a worker is self-destructing.

mod builder;
mod commute;
mod courier;
mod explorer;
mod handyman;
mod harvester;
mod miner;
mod storekeeper;
mod upgrader;

pub use builder::Builder;
pub use commute::{commute, follow_up, resolve_slot, Slot};
pub use courier::Courier;
pub use explorer::Explorer;
pub use handyman::Handyman;
pub use harvester::{energy_sources, Harvester};
pub use miner::{pinned_sources, Miner};
pub use storekeeper::Storekeeper;
pub use upgrader::Upgrader;

use std::str::FromStr;

use colonist_logic::body::BodyPart;
use colonist_logic::ids::ObjectId;
use colonist_logic::roles::{priority_order, RoleDefinition, RoleKind};
use colonist_logic::spawn_budget::calculate_max_parts;
use colonist_logic::targeting::{Candidate, SortStrategy};

use crate::commands::{ActionResult, MoveStatus};
use crate::config::ColonyConfig;
use crate::context::{Base, Tick, ADJACENT};
use crate::error::RoleError;
use crate::memory::{CreepMemory, SpawnRequest};
use crate::world::{CreepView, SpawnView};

/// Glyph shown by a worker whose role has no behavior.
pub const UNIMPLEMENTED_GLYPH: &str = "🚧";

/// Result of asking a role to spawn on an elected structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned(String),
    /// Not affordable this tick; retried next tick.
    WaitingForEnergy,
    /// The role declined (nothing for a new worker to do).
    Skipped,
    NoFreeSpawn,
}

/// Body layout handed to the spawn budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyTemplate {
    pub single: Vec<BodyPart>,
    pub repeating: Vec<BodyPart>,
    /// Role-specific cap on top of the base's `partsMaxMultiplier`.
    pub max_multiplier: Option<u32>,
}

impl Default for BodyTemplate {
    fn default() -> Self {
        Self {
            single: Vec::new(),
            repeating: vec![BodyPart::Work, BodyPart::Carry, BodyPart::Move],
            max_multiplier: None,
        }
    }
}

pub trait RoleBehavior {
    fn definition(&self) -> &RoleDefinition;

    fn name(&self) -> &str {
        &self.definition().name
    }

    /// What the role works on.
    fn find_targets(&self, _tick: &Tick, _base: &Base) -> Vec<Candidate> {
        Vec::new()
    }

    /// Where the role gets its energy.
    fn find_sources(&self, _tick: &Tick, _base: &Base) -> Vec<Candidate> {
        Vec::new()
    }

    /// Targets offered to one worker.
    fn targets_for(&self, tick: &Tick, base: &Base, _creep: &CreepView) -> Vec<Candidate> {
        self.find_targets(tick, base)
    }

    fn sort_strategy(&self, _memory: &CreepMemory, _slot: Slot) -> SortStrategy {
        SortStrategy::Distance
    }

    fn is_necessary(&self, tick: &Tick, base: &Base) -> bool {
        !self.find_targets(tick, base).is_empty()
    }

    /// Whether an idle worker of another role may stand in for this one.
    /// Roles that depend on memory set at spawn time opt out.
    fn reassignable(&self) -> bool {
        true
    }

    fn body(&self) -> BodyTemplate {
        BodyTemplate::default()
    }

    /// Memory for a new worker; `None` declines the spawn.
    fn initial_memory(
        &self,
        _tick: &Tick,
        base: &Base,
        _request: Option<&SpawnRequest>,
    ) -> Option<CreepMemory> {
        Some(CreepMemory::new(self.name(), &base.name))
    }

    fn spawn(
        &self,
        tick: &mut Tick,
        base: &Base,
        spawn: &SpawnView,
        request: Option<&SpawnRequest>,
    ) -> SpawnOutcome {
        spawn_with_budget(self, tick, base, spawn, request)
    }

    fn gather(&self, tick: &mut Tick, creep: &CreepView, source: ObjectId) -> ActionResult {
        if tick.world.is_source(source) {
            tick.harvest(creep, source)
        } else {
            tick.withdraw(creep, source)
        }
    }

    fn deliver(&self, tick: &mut Tick, creep: &CreepView, target: ObjectId) -> ActionResult {
        tick.transfer(creep, target)
    }

    fn deliver_range(&self) -> u32 {
        ADJACENT
    }

    /// One tick of role behavior.
    fn work(&self, tick: &mut Tick, base: &Base, creep: &CreepView) -> Result<(), RoleError> {
        tick.warn(format!(
            "{}: role {} has no behavior for {}",
            base.name,
            self.name(),
            creep.name
        ));
        tick.say(creep, UNIMPLEMENTED_GLYPH);
        Ok(())
    }
}

/// Compose the largest affordable body for `role` and order it on `spawn`.
pub fn spawn_with_budget<R: RoleBehavior + ?Sized>(
    role: &R,
    tick: &mut Tick,
    base: &Base,
    spawn: &SpawnView,
    request: Option<&SpawnRequest>,
) -> SpawnOutcome {
    let Some(memory) = role.initial_memory(tick, base, request) else {
        tick.debug(format!("{}: {} declined to spawn", base.name, role.name()));
        return SpawnOutcome::Skipped;
    };

    let template = role.body();
    let role_config = tick
        .memory
        .base(&base.name)
        .map(|b| b.role_config.clone())
        .unwrap_or_default();
    let mut max = role_config.parts_max_multiplier;
    if let Some(cap) = template.max_multiplier {
        max = max.min(cap);
    }

    let energy = tick.available_energy(spawn.pos.room);
    let Some(body) = calculate_max_parts(
        energy,
        &template.repeating,
        &template.single,
        role_config.parts_min_multiplier,
        max,
        tick.config.max_body_size,
        &tick.config.part_costs,
    ) else {
        tick.debug(format!(
            "{}: {} energy is not enough for a {}",
            base.name,
            energy,
            role.name()
        ));
        return SpawnOutcome::WaitingForEnergy;
    };

    let name = tick.memory.next_creep_name(role.name());
    match tick.spawn_creep(spawn, &name, body, memory) {
        ActionResult::Ok => {
            tick.info(format!("{}: {} spawning {}", base.name, spawn.name, name));
            SpawnOutcome::Spawned(name)
        }
        ActionResult::NotEnoughResources => SpawnOutcome::WaitingForEnergy,
        other => {
            tick.warn(format!(
                "{}: {} refused {}: {:?}",
                base.name, spawn.name, name, other
            ));
            SpawnOutcome::Skipped
        }
    }
}

// ── Worker driving ─────────────────────────────────────────────────────

/// What drives a worker this tick.
pub enum WorkerState<'r> {
    Active(&'r dyn RoleBehavior),
    SelfDestructing,
}

impl<'r> WorkerState<'r> {
    pub fn resolve(role: &'r dyn RoleBehavior, memory: &CreepMemory) -> Self {
        if memory.selfdestruct {
            WorkerState::SelfDestructing
        } else {
            WorkerState::Active(role)
        }
    }

    pub fn run(&self, tick: &mut Tick, base: &Base, creep: &CreepView) -> Result<(), RoleError> {
        match self {
            WorkerState::Active(role) => role.work(tick, base, creep),
            WorkerState::SelfDestructing => self_destruct(tick, creep),
        }
    }
}

/// Walk to the nearest owned spawn and recycle there.
pub fn self_destruct(tick: &mut Tick, creep: &CreepView) -> Result<(), RoleError> {
    let nearest = tick
        .world
        .spawns()
        .into_iter()
        .min_by_key(|s| creep.pos.range_to(&s.pos));
    let Some(spawn) = nearest else {
        tick.warn(format!("{} cannot self-destruct: no spawn", creep.name));
        return Ok(());
    };

    if creep.pos.in_range_to(&spawn.pos, ADJACENT) {
        let result = tick.recycle(&spawn, creep);
        if result.is_ok() {
            tick.info(format!("{} recycled at {}", creep.name, spawn.name));
        }
    } else if tick.move_to(creep, spawn.pos, ADJACENT) == MoveStatus::Failed {
        tick.warn(format!("{} cannot reach {} to recycle", creep.name, spawn.name));
    }
    Ok(())
}

// ── Registry ───────────────────────────────────────────────────────────

/// The role set, fixed at startup, with its stable priority order.
pub struct RoleRegistry {
    roles: Vec<Box<dyn RoleBehavior>>,
    order: Vec<usize>,
    default_role: String,
}

impl RoleRegistry {
    pub fn new(roles: Vec<Box<dyn RoleBehavior>>, default_role: &str) -> Self {
        let mut registry = Self {
            roles,
            order: Vec::new(),
            default_role: default_role.to_string(),
        };
        registry.reorder();
        registry
    }

    /// Built-in behaviors for every catalogue entry.
    pub fn from_config(config: &ColonyConfig) -> Self {
        let mut roles: Vec<Box<dyn RoleBehavior>> = Vec::new();
        for definition in &config.roles {
            match RoleKind::from_str(&definition.name) {
                Ok(kind) => roles.push(builtin(kind, definition.clone())),
                Err(e) => log::warn!("skipping role catalogue entry: {}", e),
            }
        }
        Self::new(roles, &config.default_role)
    }

    /// Add a role, replacing any role of the same name.
    pub fn register(&mut self, role: Box<dyn RoleBehavior>) {
        match self.roles.iter().position(|r| r.name() == role.name()) {
            Some(i) => self.roles[i] = role,
            None => self.roles.push(role),
        }
        self.reorder();
    }

    fn reorder(&mut self) {
        let definitions: Vec<RoleDefinition> =
            self.roles.iter().map(|r| r.definition().clone()).collect();
        self.order = priority_order(&definitions);
    }

    pub fn get(&self, name: &str) -> Option<&dyn RoleBehavior> {
        self.roles
            .iter()
            .find(|r| r.name() == name)
            .map(|r| r.as_ref())
    }

    /// Fallback behavior for unknown role names.
    pub fn default_role(&self) -> Option<&dyn RoleBehavior> {
        self.get(&self.default_role)
            .or_else(|| self.roles.first().map(|r| r.as_ref()))
    }

    /// Roles by descending priority, ties in declaration order.
    pub fn in_priority_order(&self) -> impl Iterator<Item = &dyn RoleBehavior> {
        self.order.iter().map(move |&i| self.roles[i].as_ref())
    }

    pub fn definitions(&self) -> Vec<&RoleDefinition> {
        self.roles.iter().map(|r| r.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

fn builtin(kind: RoleKind, definition: RoleDefinition) -> Box<dyn RoleBehavior> {
    match kind {
        RoleKind::Harvester => Box::new(Harvester::new(definition)),
        RoleKind::Miner => Box::new(Miner::new(definition)),
        RoleKind::Storekeeper => Box::new(Storekeeper::new(definition)),
        RoleKind::Upgrader => Box::new(Upgrader::new(definition)),
        RoleKind::Builder => Box::new(Builder::new(definition)),
        RoleKind::Handyman => Box::new(Handyman::new(definition)),
        RoleKind::Courier => Box::new(Courier::new(definition)),
        RoleKind::Explorer => Box::new(Explorer::new(definition)),
    }
}
