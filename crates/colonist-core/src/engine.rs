//! Simulation engine - an in-process host for the colony.
//!
//! Each [`SimulationEngine::update`] runs one colony tick against a snapshot
//! of the world, applies the commands it produced, then advances timers:
//! spawning, creep lifetimes, source regeneration and fatigue.

use std::collections::HashMap;

use hecs::{Entity, World};

use crate::colony::{Colony, TickReport};
use crate::commands::{Command, CommandBuffer};
use crate::components::*;
use crate::config::ColonyConfig;
use crate::memory::{CreepMemory, MemoryStore};
use crate::world::WorldView;
use colonist_logic::body::SPAWN_TIME_PER_PART;

/// Energy harvested per WORK part per tick.
pub const HARVEST_POWER: u32 = 2;
/// Construction progress per WORK part per tick.
pub const BUILD_POWER: u32 = 5;
/// Hits restored per WORK part per tick.
pub const REPAIR_POWER: u32 = 100;
/// Controller progress per WORK part per tick.
pub const UPGRADE_POWER: u32 = 1;
pub const TOWER_ATTACK_POWER: u32 = 600;
pub const TOWER_REPAIR_POWER: u32 = 800;
/// Percentage of energy lost in a link transfer.
pub const LINK_LOSS_PERCENT: u32 = 3;
/// Fatigue per non-MOVE part per step, and recovery per MOVE part per tick.
pub const FATIGUE_PER_PART: u32 = 2;

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world containing all objects
    pub world: World,
    /// Persistent colony memory
    pub memory: MemoryStore,
    pub colony: Colony,
    tick: u64,
    next_id: u64,
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationEngine {
    pub fn new() -> Self {
        Self::with_config(ColonyConfig::default())
    }

    pub fn with_config(config: ColonyConfig) -> Self {
        Self::with_colony(Colony::new(config))
    }

    pub fn with_colony(colony: Colony) -> Self {
        Self {
            world: World::new(),
            memory: MemoryStore::new(),
            colony,
            tick: 0,
            next_id: 1,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) fn restore(&mut self, world: World, memory: MemoryStore, tick: u64, next_id: u64) {
        self.world = world;
        self.memory = memory;
        self.tick = tick;
        self.next_id = next_id;
    }

    pub(crate) fn next_id_value(&self) -> u64 {
        self.next_id
    }

    pub fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Run one colony tick and apply its commands.
    pub fn update(&mut self) -> TickReport {
        let (report, commands) = self.decide();
        self.commit(commands);
        report
    }

    /// Run the colony against the current world without applying anything.
    pub fn decide(&mut self) -> (TickReport, Vec<Command>) {
        let mut commands = CommandBuffer::new();
        let report = {
            let view = WorldView::new(&self.world, self.tick);
            self.colony.run_tick(&view, &mut self.memory, &mut commands)
        };
        (report, commands.drain())
    }

    /// Apply a tick's commands, advance timers and move to the next tick.
    pub fn commit(&mut self, commands: Vec<Command>) {
        self.apply(commands);
        self.advance();
        self.tick += 1;
    }

    /// Run `ticks` updates.
    pub fn run(&mut self, ticks: u64) -> Vec<TickReport> {
        (0..ticks).map(|_| self.update()).collect()
    }

    // ── Object helpers ─────────────────────────────────────────────────

    pub fn entity(&self, id: ObjectId) -> Option<Entity> {
        self.world
            .query::<&ObjectId>()
            .iter()
            .find(|(_, oid)| **oid == id)
            .map(|(e, _)| e)
    }

    pub fn get<T: hecs::Component + Clone>(&self, id: ObjectId) -> Option<T> {
        let entity = self.entity(id)?;
        self.world.get::<&T>(entity).ok().map(|c| (*c).clone())
    }

    pub fn creep_id(&self, name: &str) -> Option<ObjectId> {
        self.world
            .query::<(&ObjectId, &Creep)>()
            .iter()
            .find(|(_, (_, c))| c.name == name)
            .map(|(_, (id, _))| *id)
    }

    pub fn add_spawn(&mut self, name: &str, pos: Position, energy: u32) -> ObjectId {
        let id = self.allocate_id();
        let kind = StructureKind::Spawn;
        self.world.spawn((
            id,
            Spawn::new(name),
            Structure { kind },
            pos,
            Store::new(kind.store_capacity().unwrap_or(0)).with_energy(energy),
            Hits::full(kind.hits_max()),
            Mine,
        ));
        id
    }

    /// A finished structure. Roads, walls and containers are unowned.
    pub fn add_structure(&mut self, kind: StructureKind, pos: Position, energy: u32) -> ObjectId {
        let id = self.allocate_id();
        let entity = self
            .world
            .spawn((id, Structure { kind }, pos, Hits::full(kind.hits_max())));
        if let Some(capacity) = kind.store_capacity() {
            let _ = self
                .world
                .insert_one(entity, Store::new(capacity).with_energy(energy));
        }
        if kind.is_ownable() {
            let _ = self.world.insert_one(entity, Mine);
        }
        id
    }

    pub fn add_source(&mut self, pos: Position) -> ObjectId {
        let id = self.allocate_id();
        self.world.spawn((id, Source::default(), pos));
        id
    }

    pub fn add_site(&mut self, kind: StructureKind, pos: Position, progress_total: u32) -> ObjectId {
        let id = self.allocate_id();
        self.world.spawn((
            id,
            ConstructionSite {
                kind,
                progress: 0,
                progress_total,
            },
            pos,
        ));
        id
    }

    pub fn add_controller(&mut self, pos: Position, controller: Controller) -> ObjectId {
        let id = self.allocate_id();
        self.world.spawn((id, controller, pos));
        id
    }

    pub fn add_flag(&mut self, name: &str, pos: Position) -> ObjectId {
        let id = self.allocate_id();
        self.world.spawn((
            id,
            Flag {
                name: name.to_string(),
            },
            pos,
        ));
        id
    }

    pub fn add_hostile(&mut self, pos: Position, hits: u32) -> ObjectId {
        let id = self.allocate_id();
        self.world.spawn((id, Hostile, pos, Hits::full(hits)));
        id
    }

    /// A grown creep, with `memory` stored under its name when given.
    pub fn add_creep(
        &mut self,
        name: &str,
        body: Vec<BodyPart>,
        pos: Position,
        memory: Option<CreepMemory>,
    ) -> ObjectId {
        let id = self.allocate_id();
        let creep = Creep::new(name, body);
        let store = Store::new(creep.carry_capacity());
        self.world.spawn((id, creep, pos, store, Mine));
        if let Some(memory) = memory {
            self.memory.creeps.insert(name.to_string(), memory);
        }
        id
    }

    // ── Command application ────────────────────────────────────────────

    fn index(&self) -> HashMap<ObjectId, Entity> {
        self.world
            .query::<&ObjectId>()
            .iter()
            .map(|(e, id)| (*id, e))
            .collect()
    }

    /// Apply commands in issue order. Each is re-checked against the live
    /// world; one that no longer applies is dropped with a debug log.
    pub fn apply(&mut self, commands: Vec<Command>) {
        let mut index = self.index();
        for command in commands {
            if !self.apply_one(&mut index, &command) {
                log::debug!("tick {}: dropped {:?}", self.tick, command);
            }
        }
    }

    fn apply_one(&mut self, index: &mut HashMap<ObjectId, Entity>, command: &Command) -> bool {
        let world = &mut self.world;
        let lookup = |id: &ObjectId| index.get(id).copied();
        match command {
            Command::Move { creep, to } => {
                let Some(e) = lookup(creep) else { return false };
                let Ok((c, pos, store)) = world.query_one_mut::<(&mut Creep, &mut Position, &Store)>(e)
                else {
                    return false;
                };
                if c.fatigue > 0 {
                    return false;
                }
                *pos = *to;
                let heavy = c
                    .body
                    .iter()
                    .filter(|p| match p {
                        BodyPart::Move => false,
                        BodyPart::Carry => !store.is_empty(),
                        _ => true,
                    })
                    .count() as u32;
                c.fatigue += heavy * FATIGUE_PER_PART;
                true
            }
            Command::Harvest { creep, source } => {
                let (Some(ce), Some(se)) = (lookup(creep), lookup(source)) else {
                    return false;
                };
                let work = world.get::<&Creep>(ce).map(|c| c.parts(BodyPart::Work)).unwrap_or(0);
                let free = world.get::<&Store>(ce).map(|s| s.free_capacity()).unwrap_or(0);
                let Ok(mut node) = world.get::<&mut Source>(se) else {
                    return false;
                };
                let amount = (work * HARVEST_POWER).min(node.energy).min(free);
                node.energy -= amount;
                drop(node);
                if let Ok(mut store) = world.get::<&mut Store>(ce) {
                    store.deposit(amount);
                }
                amount > 0
            }
            Command::Transfer {
                creep,
                target,
                amount,
            } => {
                let (Some(ce), Some(te)) = (lookup(creep), lookup(target)) else {
                    return false;
                };
                move_energy(world, ce, te, *amount) > 0
            }
            Command::Withdraw {
                creep,
                target,
                amount,
            } => {
                let (Some(ce), Some(te)) = (lookup(creep), lookup(target)) else {
                    return false;
                };
                move_energy(world, te, ce, *amount) > 0
            }
            Command::Build { creep, site } => {
                let (Some(ce), Some(se)) = (lookup(creep), lookup(site)) else {
                    return false;
                };
                let work = world.get::<&Creep>(ce).map(|c| c.parts(BodyPart::Work)).unwrap_or(0);
                let energy = world.get::<&Store>(ce).map(|s| s.energy).unwrap_or(0);
                let Ok(mut s) = world.get::<&mut ConstructionSite>(se) else {
                    return false;
                };
                let used = (work * BUILD_POWER).min(energy).min(s.remaining());
                s.progress += used;
                let finished = s.remaining() == 0;
                let kind = s.kind;
                drop(s);
                if let Ok(mut store) = world.get::<&mut Store>(ce) {
                    store.take(used);
                }
                if finished {
                    finish_site(world, se, kind, *site);
                    index.remove(site);
                    if let Some(e) = world
                        .query::<&ObjectId>()
                        .iter()
                        .find(|(_, id)| *id == site)
                        .map(|(e, _)| e)
                    {
                        index.insert(*site, e);
                    }
                }
                used > 0
            }
            Command::Repair { creep, target } => {
                let (Some(ce), Some(te)) = (lookup(creep), lookup(target)) else {
                    return false;
                };
                let work = world.get::<&Creep>(ce).map(|c| c.parts(BodyPart::Work)).unwrap_or(0);
                let energy = world.get::<&Store>(ce).map(|s| s.energy).unwrap_or(0);
                let Ok(mut hits) = world.get::<&mut Hits>(te) else {
                    return false;
                };
                let used = work.min(energy);
                let repaired = (used * REPAIR_POWER).min(hits.damage());
                hits.hits += repaired;
                drop(hits);
                if let Ok(mut store) = world.get::<&mut Store>(ce) {
                    store.take(used);
                }
                repaired > 0
            }
            Command::Upgrade { creep, controller } => {
                let (Some(ce), Some(te)) = (lookup(creep), lookup(controller)) else {
                    return false;
                };
                let work = world.get::<&Creep>(ce).map(|c| c.parts(BodyPart::Work)).unwrap_or(0);
                let energy = world.get::<&Store>(ce).map(|s| s.energy).unwrap_or(0);
                let Ok(mut c) = world.get::<&mut Controller>(te) else {
                    return false;
                };
                let used = work.min(energy);
                c.progress += used * UPGRADE_POWER;
                drop(c);
                if let Ok(mut store) = world.get::<&mut Store>(ce) {
                    store.take(used);
                }
                used > 0
            }
            Command::Claim { controller, .. } => {
                let Some(te) = lookup(controller) else { return false };
                let Ok(mut c) = world.get::<&mut Controller>(te) else {
                    return false;
                };
                if c.owner != ControllerOwner::Unowned {
                    return false;
                }
                *c = Controller::owned(1);
                true
            }
            Command::Recycle { creep, .. } => {
                let Some(ce) = lookup(creep) else { return false };
                index.remove(creep);
                world.despawn(ce).is_ok()
            }
            Command::Spawn {
                spawn,
                room,
                name,
                body,
                cost,
                memory,
            } => {
                let Some(se) = lookup(spawn) else { return false };
                let (busy, pos) = match world.query_one_mut::<(&Spawn, &Position)>(se) {
                    Ok((s, p)) => (s.spawning.is_some(), *p),
                    Err(_) => return false,
                };
                if busy || !draw_room_energy(world, *room, *cost) {
                    return false;
                }
                let id = ObjectId(self.next_id);
                self.next_id += 1;
                let mut creep = Creep::new(name, body.clone());
                creep.spawning = true;
                let store = Store::new(creep.carry_capacity());
                let entity = self.world.spawn((id, creep, pos, store, Mine));
                index.insert(id, entity);
                if let Ok(mut s) = self.world.get::<&mut Spawn>(se) {
                    s.spawning = Some(Spawning {
                        creep: name.clone(),
                        remaining: body.len() as u32 * SPAWN_TIME_PER_PART,
                    });
                }
                self.memory.creeps.insert(name.clone(), memory.clone());
                true
            }
            Command::Say { creep, message } => {
                let Some(ce) = lookup(creep) else { return false };
                match world.get::<&mut Creep>(ce) {
                    Ok(mut c) => {
                        c.saying = Some(message.clone());
                        true
                    }
                    Err(_) => false,
                }
            }
            Command::TowerAttack { tower, target } => {
                let (Some(te), Some(he)) = (lookup(tower), lookup(target)) else {
                    return false;
                };
                if !spend_tower_energy(world, te) {
                    return false;
                }
                let dead = match world.get::<&mut Hits>(he) {
                    Ok(mut hits) => {
                        hits.hits = hits.hits.saturating_sub(TOWER_ATTACK_POWER);
                        hits.hits == 0
                    }
                    Err(_) => return false,
                };
                if dead {
                    index.remove(target);
                    let _ = world.despawn(he);
                }
                true
            }
            Command::TowerRepair { tower, target } => {
                let (Some(te), Some(he)) = (lookup(tower), lookup(target)) else {
                    return false;
                };
                if !spend_tower_energy(world, te) {
                    return false;
                }
                match world.get::<&mut Hits>(he) {
                    Ok(mut hits) => {
                        let repaired = TOWER_REPAIR_POWER.min(hits.damage());
                        hits.hits += repaired;
                        true
                    }
                    Err(_) => false,
                }
            }
            Command::LinkTransfer { from, to, amount } => {
                let (Some(fe), Some(te)) = (lookup(from), lookup(to)) else {
                    return false;
                };
                let taken = match world.get::<&mut Store>(fe) {
                    Ok(mut s) => s.take(*amount),
                    Err(_) => return false,
                };
                let delivered = taken - taken * LINK_LOSS_PERCENT / 100;
                if let Ok(mut s) = world.get::<&mut Store>(te) {
                    s.deposit(delivered);
                }
                taken > 0
            }
        }
    }

    // ── Timers ─────────────────────────────────────────────────────────

    /// Advance spawning, lifetimes, fatigue and source regeneration by one
    /// tick.
    pub fn advance(&mut self) {
        let mut finished: Vec<String> = Vec::new();
        for (_, spawn) in self.world.query_mut::<&mut Spawn>() {
            let Some(spawning) = spawn.spawning.as_mut() else {
                continue;
            };
            spawning.remaining = spawning.remaining.saturating_sub(1);
            if spawning.remaining == 0 {
                finished.push(spawning.creep.clone());
                spawn.spawning = None;
            }
        }

        let mut expired: Vec<Entity> = Vec::new();
        for (entity, creep) in self.world.query_mut::<&mut Creep>() {
            if creep.spawning {
                if finished.contains(&creep.name) {
                    creep.spawning = false;
                }
                continue;
            }
            creep.ticks_to_live = creep.ticks_to_live.saturating_sub(1);
            if creep.ticks_to_live == 0 {
                expired.push(entity);
                continue;
            }
            let recovery = creep.parts(BodyPart::Move) * FATIGUE_PER_PART;
            creep.fatigue = creep.fatigue.saturating_sub(recovery);
        }
        for entity in expired {
            let _ = self.world.despawn(entity);
        }

        for (_, source) in self.world.query_mut::<&mut Source>() {
            source.ticks_to_regeneration = source.ticks_to_regeneration.saturating_sub(1);
            if source.ticks_to_regeneration == 0 {
                source.energy = source.energy_capacity;
                source.ticks_to_regeneration = SOURCE_REGEN_TIME;
            }
        }
    }

    // ── Persistence ────────────────────────────────────────────────────

    /// Save the world and memory to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), crate::persistence::SaveError> {
        crate::persistence::save_simulation(writer, self)
    }

    /// Replace the world and memory with a saved state; the colony
    /// configuration is kept.
    pub fn load<R: std::io::Read>(&mut self, reader: R) -> Result<(), crate::persistence::SaveError> {
        let loaded = crate::persistence::load_simulation(reader)?;
        self.restore(loaded.world, loaded.memory, loaded.tick, loaded.next_id);
        Ok(())
    }
}

/// Move up to `amount` energy between two stores; returns what moved.
fn move_energy(world: &mut World, from: Entity, to: Entity, amount: u32) -> u32 {
    let free = match world.get::<&Store>(to) {
        Ok(s) => s.free_capacity(),
        Err(_) => return 0,
    };
    let taken = match world.get::<&mut Store>(from) {
        Ok(mut s) => s.take(amount.min(free)),
        Err(_) => return 0,
    };
    if let Ok(mut s) = world.get::<&mut Store>(to) {
        s.deposit(taken);
    }
    taken
}

/// Deduct `cost` from the room's spawns, then its extensions, all or
/// nothing.
fn draw_room_energy(world: &mut World, room: RoomName, cost: u32) -> bool {
    let mut holders: Vec<(bool, ObjectId, Entity)> = world
        .query::<(&ObjectId, &Structure, &Position, &Store, &Mine)>()
        .iter()
        .filter(|(_, (_, s, p, _, _))| {
            p.room == room && matches!(s.kind, StructureKind::Spawn | StructureKind::Extension)
        })
        .map(|(e, (id, s, _, _, _))| (s.kind != StructureKind::Spawn, *id, e))
        .collect();
    holders.sort_by_key(|(extension, id, _)| (*extension, *id));

    let available: u32 = holders
        .iter()
        .filter_map(|(_, _, e)| world.get::<&Store>(*e).ok().map(|s| s.energy))
        .sum();
    if available < cost {
        return false;
    }

    let mut due = cost;
    for (_, _, entity) in holders {
        if due == 0 {
            break;
        }
        if let Ok(mut store) = world.get::<&mut Store>(entity) {
            due -= store.take(due);
        }
    }
    true
}

fn spend_tower_energy(world: &mut World, tower: Entity) -> bool {
    match world.get::<&mut Store>(tower) {
        Ok(mut s) if s.energy >= crate::context::TOWER_ENERGY_COST => {
            s.take(crate::context::TOWER_ENERGY_COST);
            true
        }
        _ => false,
    }
}

/// Replace a finished construction site with its structure, keeping the id.
fn finish_site(world: &mut World, site: Entity, kind: StructureKind, id: ObjectId) {
    let Ok(pos) = world.get::<&Position>(site).map(|p| *p) else {
        return;
    };
    let _ = world.despawn(site);
    let entity = world.spawn((id, Structure { kind }, pos, Hits::full(kind.hits_max())));
    if let Some(capacity) = kind.store_capacity() {
        let _ = world.insert_one(entity, Store::new(capacity));
    }
    if kind == StructureKind::Spawn {
        let _ = world.insert_one(entity, Spawn::new(&format!("Spawn{}", id.0)));
    }
    if kind.is_ownable() {
        let _ = world.insert_one(entity, Mine);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> RoomName {
        RoomName::new(0, 0)
    }

    #[test]
    fn test_spawn_command_creates_spawning_creep() {
        let mut engine = SimulationEngine::new();
        let spawn = engine.add_spawn("Spawn1", Position::new(room(), 25, 25), 300);
        engine.apply(vec![Command::Spawn {
            spawn,
            room: room(),
            name: "Harvester1".into(),
            body: vec![BodyPart::Work, BodyPart::Carry, BodyPart::Move],
            cost: 200,
            memory: CreepMemory::new("Harvester", "Home"),
        }]);

        let id = engine.creep_id("Harvester1").unwrap();
        assert!(engine.get::<Creep>(id).unwrap().spawning);
        assert_eq!(engine.get::<Store>(spawn).unwrap().energy, 100);
        assert!(engine.memory.creep("Harvester1").is_some());

        for _ in 0..9 {
            engine.advance();
        }
        assert!(!engine.get::<Creep>(id).unwrap().spawning);
        assert!(engine.get::<Spawn>(spawn).unwrap().spawning.is_none());
    }

    #[test]
    fn test_spawn_draws_extensions_after_spawn() {
        let mut engine = SimulationEngine::new();
        let spawn = engine.add_spawn("Spawn1", Position::new(room(), 25, 25), 100);
        let ext = engine.add_structure(StructureKind::Extension, Position::new(room(), 26, 25), 50);
        engine.apply(vec![Command::Spawn {
            spawn,
            room: room(),
            name: "Miner1".into(),
            body: vec![BodyPart::Carry, BodyPart::Move, BodyPart::Move],
            cost: 150,
            memory: CreepMemory::new("Miner", "Home"),
        }]);
        assert_eq!(engine.get::<Store>(spawn).unwrap().energy, 0);
        assert_eq!(engine.get::<Store>(ext).unwrap().energy, 0);
    }

    #[test]
    fn test_harvest_and_transfer() {
        let mut engine = SimulationEngine::new();
        let source = engine.add_source(Position::new(room(), 10, 10));
        let ext = engine.add_structure(StructureKind::Extension, Position::new(room(), 12, 11), 0);
        let creep = engine.add_creep(
            "W",
            vec![BodyPart::Work, BodyPart::Carry, BodyPart::Move],
            Position::new(room(), 11, 11),
            None,
        );
        engine.apply(vec![Command::Harvest { creep, source }]);
        assert_eq!(engine.get::<Store>(creep).unwrap().energy, 2);
        assert_eq!(engine.get::<Source>(source).unwrap().energy, 2_998);

        engine.apply(vec![Command::Transfer {
            creep,
            target: ext,
            amount: 2,
        }]);
        assert_eq!(engine.get::<Store>(ext).unwrap().energy, 2);
        assert_eq!(engine.get::<Store>(creep).unwrap().energy, 0);
    }

    #[test]
    fn test_finished_site_becomes_structure() {
        let mut engine = SimulationEngine::new();
        let site = engine.add_site(StructureKind::Road, Position::new(room(), 5, 5), 5);
        let creep = engine.add_creep(
            "B",
            vec![BodyPart::Work, BodyPart::Carry, BodyPart::Move],
            Position::new(room(), 6, 6),
            None,
        );
        if let Some(e) = engine.entity(creep) {
            engine.world.get::<&mut Store>(e).unwrap().deposit(50);
        }
        engine.apply(vec![Command::Build { creep, site }]);
        assert!(engine.get::<ConstructionSite>(site).is_none());
        assert_eq!(
            engine.get::<Structure>(site).map(|s| s.kind),
            Some(StructureKind::Road)
        );
        assert_eq!(engine.get::<Store>(creep).unwrap().energy, 45);
    }

    #[test]
    fn test_creep_expires() {
        let mut engine = SimulationEngine::new();
        let creep = engine.add_creep("Old", vec![BodyPart::Move], Position::new(room(), 1, 1), None);
        if let Some(e) = engine.entity(creep) {
            engine.world.get::<&mut Creep>(e).unwrap().ticks_to_live = 1;
        }
        engine.advance();
        assert!(engine.entity(creep).is_none());
    }

    #[test]
    fn test_source_regenerates() {
        let mut engine = SimulationEngine::new();
        let source = engine.add_source(Position::new(room(), 10, 10));
        if let Some(e) = engine.entity(source) {
            let mut s = engine.world.get::<&mut Source>(e).unwrap();
            s.energy = 0;
            s.ticks_to_regeneration = 2;
        }
        engine.advance();
        assert_eq!(engine.get::<Source>(source).unwrap().energy, 0);
        engine.advance();
        assert_eq!(engine.get::<Source>(source).unwrap().energy, 3_000);
    }
}
