//! Per-tick execution context and the validated action primitives.
//!
//! A [`Tick`] bundles the read-only world snapshot with the mutable pieces
//! the decision core may touch: persistent memory, the command buffer and
//! the diagnostic log. Action methods check range and resources against the
//! snapshot and queue a command on success.

use colonist_logic::body::BodyPart;
use colonist_logic::geometry::{Position, RoomName};
use colonist_logic::ids::ObjectId;

use crate::commands::{ActionResult, Command, CommandBuffer, MoveStatus};
use crate::components::{Controller, ControllerOwner, Source, StructureKind};
use crate::config::ColonyConfig;
use crate::diagnostics::{Diagnostics, Severity};
use crate::memory::{CreepMemory, MemoryStore};
use crate::world::{CreepView, SpawnView, WorldView};

/// Range of harvest, transfer, withdraw, claim and recycle.
pub const ADJACENT: u32 = 1;
/// Range of build, repair and upgrade.
pub const WORK_RANGE: u32 = 3;
/// Energy a tower spends per action.
pub const TOWER_ENERGY_COST: u32 = 10;

/// A base as seen by one tick of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base {
    pub name: String,
    pub room: RoomName,
}

impl Base {
    pub fn new(name: &str, room: RoomName) -> Self {
        Self {
            name: name.to_string(),
            room,
        }
    }
}

pub struct Tick<'a> {
    pub world: &'a WorldView<'a>,
    pub memory: &'a mut MemoryStore,
    pub commands: &'a mut CommandBuffer,
    pub log: &'a mut Diagnostics,
    pub config: &'a ColonyConfig,
}

impl<'a> Tick<'a> {
    pub fn new(
        world: &'a WorldView<'a>,
        memory: &'a mut MemoryStore,
        commands: &'a mut CommandBuffer,
        log: &'a mut Diagnostics,
        config: &'a ColonyConfig,
    ) -> Self {
        Self {
            world,
            memory,
            commands,
            log,
            config,
        }
    }

    pub fn now(&self) -> u64 {
        self.world.tick()
    }

    // ── Diagnostics ────────────────────────────────────────────────────

    pub fn debug(&mut self, message: impl Into<String>) {
        let now = self.now();
        self.log.record(now, Severity::Debug, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let now = self.now();
        self.log.record(now, Severity::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let now = self.now();
        self.log.record(now, Severity::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let now = self.now();
        self.log.record(now, Severity::Error, message);
    }

    /// Show a glyph above the creep.
    pub fn say(&mut self, creep: &CreepView, message: &str) {
        self.commands.push(Command::Say {
            creep: creep.id,
            message: message.to_string(),
        });
    }

    /// Spawning energy of `room` not yet promised to a creation command.
    pub fn available_energy(&self, room: RoomName) -> u32 {
        self.world
            .room_energy(room)
            .saturating_sub(self.commands.committed_energy(room))
    }

    // ── Movement ───────────────────────────────────────────────────────

    /// Step toward `target` until within `range`.
    pub fn move_to(&mut self, creep: &CreepView, target: Position, range: u32) -> MoveStatus {
        if creep.pos.in_range_to(&target, range) {
            return MoveStatus::InRange;
        }
        if creep.spawning || creep.parts(BodyPart::Move) == 0 {
            return MoveStatus::Failed;
        }
        if creep.fatigue > 0 {
            return MoveStatus::Queued;
        }
        self.commands.push(Command::Move {
            creep: creep.id,
            to: creep.pos.step_toward(&target),
        });
        MoveStatus::Moving
    }

    // ── Creep actions ──────────────────────────────────────────────────

    pub fn harvest(&mut self, creep: &CreepView, source: ObjectId) -> ActionResult {
        let Some(node) = self.world.get::<Source>(source) else {
            return ActionResult::InvalidTarget;
        };
        if let Some(result) = self.precheck(creep, source, ADJACENT) {
            return result;
        }
        if creep.parts(BodyPart::Work) == 0 {
            return ActionResult::Other;
        }
        if node.energy == 0 {
            return ActionResult::NotEnoughResources;
        }
        if creep.store.is_full() {
            return ActionResult::Full;
        }
        self.commands.push(Command::Harvest {
            creep: creep.id,
            source,
        });
        ActionResult::Ok
    }

    pub fn transfer(&mut self, creep: &CreepView, target: ObjectId) -> ActionResult {
        let Some(store) = self.world.store(target) else {
            return ActionResult::InvalidTarget;
        };
        if let Some(result) = self.precheck(creep, target, ADJACENT) {
            return result;
        }
        if creep.store.is_empty() {
            return ActionResult::NotEnoughResources;
        }
        if store.is_full() {
            return ActionResult::Full;
        }
        self.commands.push(Command::Transfer {
            creep: creep.id,
            target,
            amount: creep.store.energy.min(store.free_capacity()),
        });
        ActionResult::Ok
    }

    pub fn withdraw(&mut self, creep: &CreepView, target: ObjectId) -> ActionResult {
        let Some(store) = self.world.store(target) else {
            return ActionResult::InvalidTarget;
        };
        if let Some(result) = self.precheck(creep, target, ADJACENT) {
            return result;
        }
        if store.is_empty() {
            return ActionResult::NotEnoughResources;
        }
        if creep.store.is_full() {
            return ActionResult::Full;
        }
        self.commands.push(Command::Withdraw {
            creep: creep.id,
            target,
            amount: store.energy.min(creep.store.free_capacity()),
        });
        ActionResult::Ok
    }

    pub fn build(&mut self, creep: &CreepView, site: ObjectId) -> ActionResult {
        if self.world.get::<crate::components::ConstructionSite>(site).is_none() {
            return ActionResult::InvalidTarget;
        }
        if let Some(result) = self.precheck(creep, site, WORK_RANGE) {
            return result;
        }
        if creep.parts(BodyPart::Work) == 0 {
            return ActionResult::Other;
        }
        if creep.store.is_empty() {
            return ActionResult::NotEnoughResources;
        }
        self.commands.push(Command::Build {
            creep: creep.id,
            site,
        });
        ActionResult::Ok
    }

    pub fn repair(&mut self, creep: &CreepView, target: ObjectId) -> ActionResult {
        let Some(hits) = self.world.hits(target) else {
            return ActionResult::InvalidTarget;
        };
        if let Some(result) = self.precheck(creep, target, WORK_RANGE) {
            return result;
        }
        if creep.parts(BodyPart::Work) == 0 {
            return ActionResult::Other;
        }
        if creep.store.is_empty() {
            return ActionResult::NotEnoughResources;
        }
        if hits.is_full() {
            return ActionResult::Full;
        }
        self.commands.push(Command::Repair {
            creep: creep.id,
            target,
        });
        ActionResult::Ok
    }

    pub fn upgrade(&mut self, creep: &CreepView, controller: ObjectId) -> ActionResult {
        match self.world.get::<Controller>(controller) {
            Some(c) if c.is_mine() => {}
            _ => return ActionResult::InvalidTarget,
        }
        if let Some(result) = self.precheck(creep, controller, WORK_RANGE) {
            return result;
        }
        if creep.parts(BodyPart::Work) == 0 {
            return ActionResult::Other;
        }
        if creep.store.is_empty() {
            return ActionResult::NotEnoughResources;
        }
        self.commands.push(Command::Upgrade {
            creep: creep.id,
            controller,
        });
        ActionResult::Ok
    }

    pub fn claim(&mut self, creep: &CreepView, controller: ObjectId) -> ActionResult {
        match self.world.get::<Controller>(controller) {
            Some(c) if c.owner == ControllerOwner::Unowned => {}
            _ => return ActionResult::InvalidTarget,
        }
        if let Some(result) = self.precheck(creep, controller, ADJACENT) {
            return result;
        }
        if creep.parts(BodyPart::Claim) == 0 {
            return ActionResult::Other;
        }
        self.commands.push(Command::Claim {
            creep: creep.id,
            controller,
        });
        ActionResult::Ok
    }

    pub fn recycle(&mut self, spawn: &SpawnView, creep: &CreepView) -> ActionResult {
        if !creep.pos.in_range_to(&spawn.pos, ADJACENT) {
            return ActionResult::NotInRange;
        }
        self.commands.push(Command::Recycle {
            spawn: spawn.id,
            creep: creep.id,
        });
        ActionResult::Ok
    }

    /// Shared checks: target position known, creep ready, within `range`.
    fn precheck(&self, creep: &CreepView, target: ObjectId, range: u32) -> Option<ActionResult> {
        let Some(pos) = self.world.position(target) else {
            return Some(ActionResult::InvalidTarget);
        };
        if creep.spawning {
            return Some(ActionResult::Other);
        }
        if !creep.pos.in_range_to(&pos, range) {
            return Some(ActionResult::NotInRange);
        }
        None
    }

    // ── Structure actions ──────────────────────────────────────────────

    /// Order a new creep. At most one creation command per spawn per tick;
    /// the body must fit the room's uncommitted energy.
    pub fn spawn_creep(
        &mut self,
        spawn: &SpawnView,
        name: &str,
        body: Vec<BodyPart>,
        memory: CreepMemory,
    ) -> ActionResult {
        if spawn.spawning || self.commands.has_spawn_command(spawn.id) {
            return ActionResult::Other;
        }
        if body.is_empty() || body.len() > self.config.max_body_size {
            return ActionResult::Other;
        }
        if self.memory.creep(name).is_some() || self.world.creep_by_name(name).is_some() {
            return ActionResult::InvalidTarget;
        }
        let cost = self.config.part_costs.body_cost(&body);
        if cost > self.available_energy(spawn.pos.room) {
            return ActionResult::NotEnoughResources;
        }
        self.commands.push(Command::Spawn {
            spawn: spawn.id,
            room: spawn.pos.room,
            name: name.to_string(),
            body,
            cost,
            memory,
        });
        ActionResult::Ok
    }

    pub fn tower_attack(&mut self, tower: ObjectId, target: ObjectId) -> ActionResult {
        if let Some(result) = self.tower_precheck(tower, target) {
            return result;
        }
        self.commands.push(Command::TowerAttack { tower, target });
        ActionResult::Ok
    }

    pub fn tower_repair(&mut self, tower: ObjectId, target: ObjectId) -> ActionResult {
        if let Some(result) = self.tower_precheck(tower, target) {
            return result;
        }
        match self.world.hits(target) {
            Some(hits) if !hits.is_full() => {}
            Some(_) => return ActionResult::Full,
            None => return ActionResult::InvalidTarget,
        }
        self.commands.push(Command::TowerRepair { tower, target });
        ActionResult::Ok
    }

    /// Towers act anywhere in their own room.
    fn tower_precheck(&self, tower: ObjectId, target: ObjectId) -> Option<ActionResult> {
        if self.world.structure_kind(tower) != Some(StructureKind::Tower) {
            return Some(ActionResult::InvalidTarget);
        }
        let (Some(from), Some(to)) = (self.world.position(tower), self.world.position(target))
        else {
            return Some(ActionResult::InvalidTarget);
        };
        if from.room != to.room {
            return Some(ActionResult::NotInRange);
        }
        match self.world.store(tower) {
            Some(store) if store.energy >= TOWER_ENERGY_COST => None,
            _ => Some(ActionResult::NotEnoughResources),
        }
    }

    pub fn link_transfer(&mut self, from: ObjectId, to: ObjectId) -> ActionResult {
        if self.world.structure_kind(from) != Some(StructureKind::Link)
            || self.world.structure_kind(to) != Some(StructureKind::Link)
            || from == to
        {
            return ActionResult::InvalidTarget;
        }
        let (Some(source), Some(target)) = (self.world.store(from), self.world.store(to)) else {
            return ActionResult::InvalidTarget;
        };
        if source.is_empty() {
            return ActionResult::NotEnoughResources;
        }
        if target.is_full() {
            return ActionResult::Full;
        }
        self.commands.push(Command::LinkTransfer {
            from,
            to,
            amount: source.energy.min(target.free_capacity()),
        });
        ActionResult::Ok
    }
}
