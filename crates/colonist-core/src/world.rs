//! Read-only per-tick view of the world.
//!
//! The decision core never holds `hecs::Entity` handles across ticks; it
//! looks objects up by [`ObjectId`] through this index and reads plain-data
//! views. All lists are returned in a deterministic order (by name or id).

use std::collections::HashMap;

use hecs::{Component, Entity, World};

use crate::components::*;

#[derive(Debug, Clone)]
pub struct CreepView {
    pub id: ObjectId,
    pub name: String,
    pub pos: Position,
    pub body: Vec<BodyPart>,
    pub store: Store,
    pub ticks_to_live: u32,
    pub fatigue: u32,
    pub spawning: bool,
}

impl CreepView {
    pub fn parts(&self, kind: BodyPart) -> u32 {
        colonist_logic::body::count_parts(&self.body, kind)
    }
}

#[derive(Debug, Clone)]
pub struct SpawnView {
    pub id: ObjectId,
    pub name: String,
    pub pos: Position,
    pub spawning: bool,
}

#[derive(Debug, Clone)]
pub struct StructureView {
    pub id: ObjectId,
    pub kind: StructureKind,
    pub pos: Position,
    pub store: Option<Store>,
    pub hits: Option<Hits>,
    pub mine: bool,
}

#[derive(Debug, Clone)]
pub struct SourceView {
    pub id: ObjectId,
    pub pos: Position,
    pub energy: u32,
}

#[derive(Debug, Clone)]
pub struct SiteView {
    pub id: ObjectId,
    pub pos: Position,
    pub site: ConstructionSite,
}

#[derive(Debug, Clone)]
pub struct ControllerView {
    pub id: ObjectId,
    pub pos: Position,
    pub controller: Controller,
}

#[derive(Debug, Clone)]
pub struct FlagView {
    pub id: ObjectId,
    pub name: String,
    pub pos: Position,
}

/// Snapshot index over a `hecs::World` for one tick.
pub struct WorldView<'w> {
    world: &'w World,
    index: HashMap<ObjectId, Entity>,
    tick: u64,
}

impl<'w> WorldView<'w> {
    pub fn new(world: &'w World, tick: u64) -> Self {
        let index = world
            .query::<&ObjectId>()
            .iter()
            .map(|(entity, id)| (*id, entity))
            .collect();
        Self { world, index, tick }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn exists(&self, id: ObjectId) -> bool {
        self.index.contains_key(&id)
    }

    /// Clone a component of the object with `id`.
    pub fn get<T: Component + Clone>(&self, id: ObjectId) -> Option<T> {
        let entity = *self.index.get(&id)?;
        self.world.get::<&T>(entity).ok().map(|c| (*c).clone())
    }

    pub fn position(&self, id: ObjectId) -> Option<Position> {
        self.get::<Position>(id)
    }

    pub fn store(&self, id: ObjectId) -> Option<Store> {
        self.get::<Store>(id)
    }

    pub fn hits(&self, id: ObjectId) -> Option<Hits> {
        self.get::<Hits>(id)
    }

    pub fn structure_kind(&self, id: ObjectId) -> Option<StructureKind> {
        self.get::<Structure>(id).map(|s| s.kind)
    }

    pub fn is_source(&self, id: ObjectId) -> bool {
        self.get::<Source>(id).is_some()
    }

    pub fn is_visible(&self, room: RoomName) -> bool {
        self.world
            .query::<&Position>()
            .iter()
            .any(|(_, pos)| pos.room == room)
    }

    /// All of our creeps, by name.
    pub fn creeps(&self) -> Vec<CreepView> {
        let mut creeps: Vec<CreepView> = self
            .world
            .query::<(&ObjectId, &Creep, &Position, Option<&Store>, &Mine)>()
            .iter()
            .map(|(_, (id, creep, pos, store, _))| CreepView {
                id: *id,
                name: creep.name.clone(),
                pos: *pos,
                body: creep.body.clone(),
                store: store.copied().unwrap_or_default(),
                ticks_to_live: creep.ticks_to_live,
                fatigue: creep.fatigue,
                spawning: creep.spawning,
            })
            .collect();
        creeps.sort_by(|a, b| a.name.cmp(&b.name));
        creeps
    }

    pub fn creep_by_name(&self, name: &str) -> Option<CreepView> {
        self.creeps().into_iter().find(|c| c.name == name)
    }

    /// All of our spawns, by name.
    pub fn spawns(&self) -> Vec<SpawnView> {
        let mut spawns: Vec<SpawnView> = self
            .world
            .query::<(&ObjectId, &Spawn, &Position, &Mine)>()
            .iter()
            .map(|(_, (id, spawn, pos, _))| SpawnView {
                id: *id,
                name: spawn.name.clone(),
                pos: *pos,
                spawning: spawn.spawning.is_some(),
            })
            .collect();
        spawns.sort_by(|a, b| a.name.cmp(&b.name));
        spawns
    }

    /// Structures standing in `room`, ours and neutral, by id.
    pub fn structures_in(&self, room: RoomName) -> Vec<StructureView> {
        let mut structures: Vec<StructureView> = self
            .world
            .query::<(
                &ObjectId,
                &Structure,
                &Position,
                Option<&Store>,
                Option<&Hits>,
                Option<&Mine>,
            )>()
            .iter()
            .filter(|(_, (_, _, pos, _, _, _))| pos.room == room)
            .map(|(_, (id, structure, pos, store, hits, mine))| StructureView {
                id: *id,
                kind: structure.kind,
                pos: *pos,
                store: store.copied(),
                hits: hits.copied(),
                mine: mine.is_some(),
            })
            .collect();
        structures.sort_by_key(|s| s.id);
        structures
    }

    pub fn sources_in(&self, room: RoomName) -> Vec<SourceView> {
        let mut sources: Vec<SourceView> = self
            .world
            .query::<(&ObjectId, &Source, &Position)>()
            .iter()
            .filter(|(_, (_, _, pos))| pos.room == room)
            .map(|(_, (id, source, pos))| SourceView {
                id: *id,
                pos: *pos,
                energy: source.energy,
            })
            .collect();
        sources.sort_by_key(|s| s.id);
        sources
    }

    pub fn sites_in(&self, room: RoomName) -> Vec<SiteView> {
        let mut sites: Vec<SiteView> = self
            .world
            .query::<(&ObjectId, &ConstructionSite, &Position)>()
            .iter()
            .filter(|(_, (_, _, pos))| pos.room == room)
            .map(|(_, (id, site, pos))| SiteView {
                id: *id,
                pos: *pos,
                site: *site,
            })
            .collect();
        sites.sort_by_key(|s| s.id);
        sites
    }

    pub fn controller_in(&self, room: RoomName) -> Option<ControllerView> {
        self.world
            .query::<(&ObjectId, &Controller, &Position)>()
            .iter()
            .find(|(_, (_, _, pos))| pos.room == room)
            .map(|(_, (id, controller, pos))| ControllerView {
                id: *id,
                pos: *pos,
                controller: *controller,
            })
    }

    /// All flags, by name.
    pub fn flags(&self) -> Vec<FlagView> {
        let mut flags: Vec<FlagView> = self
            .world
            .query::<(&ObjectId, &Flag, &Position)>()
            .iter()
            .map(|(_, (id, flag, pos))| FlagView {
                id: *id,
                name: flag.name.clone(),
                pos: *pos,
            })
            .collect();
        flags.sort_by(|a, b| a.name.cmp(&b.name));
        flags
    }

    pub fn flag_by_name(&self, name: &str) -> Option<FlagView> {
        self.flags().into_iter().find(|f| f.name == name)
    }

    pub fn hostiles_in(&self, room: RoomName) -> Vec<(ObjectId, Position)> {
        let mut hostiles: Vec<(ObjectId, Position)> = self
            .world
            .query::<(&ObjectId, &Hostile, &Position)>()
            .iter()
            .filter(|(_, (_, _, pos))| pos.room == room)
            .map(|(_, (id, _, pos))| (*id, *pos))
            .collect();
        hostiles.sort_by_key(|(id, _)| *id);
        hostiles
    }

    /// Energy available for spawning in `room` (our spawns and extensions).
    pub fn room_energy(&self, room: RoomName) -> u32 {
        self.structures_in(room)
            .iter()
            .filter(|s| s.mine && matches!(s.kind, StructureKind::Spawn | StructureKind::Extension))
            .filter_map(|s| s.store)
            .map(|store| store.energy)
            .sum()
    }
}
