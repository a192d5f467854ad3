//! Save/Load for the in-process host.
//!
//! The world is written with bincode, one optional slot per component.
//! Colony memory travels as its JSON text so the saved form matches what a
//! live host would persist between ticks.

use hecs::World;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error;

use crate::components::*;
use crate::engine::SimulationEngine;
use crate::memory::{MemoryError, MemoryStore};

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the simulation state
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub tick: u64,
    /// Next object id to hand out
    pub next_id: u64,
    /// Colony memory as JSON
    pub memory: String,
    /// All entities with their components
    pub entities: Vec<SerializableEntity>,
}

/// All possible components for an entity, serialized as optionals
#[derive(Serialize, Deserialize, Default)]
pub struct SerializableEntity {
    pub id: Option<ObjectId>,
    pub position: Option<Position>,
    pub store: Option<Store>,
    pub hits: Option<Hits>,

    pub creep: Option<Creep>,
    pub spawn: Option<Spawn>,
    pub structure: Option<Structure>,
    pub source: Option<Source>,
    pub site: Option<ConstructionSite>,
    pub controller: Option<Controller>,
    pub flag: Option<Flag>,

    // Markers
    pub mine: bool,
    pub hostile: bool,
}

/// Extract all entities from a world into serializable form
fn serialize_entities(world: &World) -> Vec<SerializableEntity> {
    world
        .iter()
        .map(|entity| SerializableEntity {
            id: entity.get::<&ObjectId>().map(|c| *c),
            position: entity.get::<&Position>().map(|c| *c),
            store: entity.get::<&Store>().map(|c| *c),
            hits: entity.get::<&Hits>().map(|c| *c),
            creep: entity.get::<&Creep>().map(|c| (*c).clone()),
            spawn: entity.get::<&Spawn>().map(|c| (*c).clone()),
            structure: entity.get::<&Structure>().map(|c| *c),
            source: entity.get::<&Source>().map(|c| *c),
            site: entity.get::<&ConstructionSite>().map(|c| *c),
            controller: entity.get::<&Controller>().map(|c| *c),
            flag: entity.get::<&Flag>().map(|c| (*c).clone()),
            mine: entity.has::<Mine>(),
            hostile: entity.has::<Hostile>(),
        })
        .collect()
}

/// Spawn an entity with all its components
fn spawn_entity(world: &mut World, se: SerializableEntity) {
    let entity = world.spawn(());

    if let Some(c) = se.id {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.position {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.store {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.hits {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.creep {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.spawn {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.structure {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.source {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.site {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.controller {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.flag {
        let _ = world.insert_one(entity, c);
    }
    if se.mine {
        let _ = world.insert_one(entity, Mine);
    }
    if se.hostile {
        let _ = world.insert_one(entity, Hostile);
    }
}

/// Save the complete simulation to a writer
pub fn save_simulation<W: Write>(writer: W, engine: &SimulationEngine) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        tick: engine.tick(),
        next_id: engine.next_id_value(),
        memory: engine.memory.to_json()?,
        entities: serialize_entities(&engine.world),
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a simulation from a reader
pub fn load_simulation<R: Read>(reader: R) -> Result<LoadedSimulation, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let memory = MemoryStore::from_json(&save_data.memory)?;
    let mut world = World::new();
    for se in save_data.entities {
        spawn_entity(&mut world, se);
    }

    Ok(LoadedSimulation {
        world,
        memory,
        tick: save_data.tick,
        next_id: save_data.next_id,
    })
}

/// Result of loading a simulation
pub struct LoadedSimulation {
    pub world: World,
    pub memory: MemoryStore,
    pub tick: u64,
    pub next_id: u64,
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{generate_room, RoomConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_save_load_roundtrip() {
        let mut engine = SimulationEngine::new();
        let room = RoomName::new(1, 1);
        let mut rng = StdRng::seed_from_u64(7);
        generate_room(&mut engine, room, &RoomConfig::default(), &mut rng);

        for _ in 0..20 {
            engine.update();
        }

        let original_tick = engine.tick();
        let original_creeps = engine.memory.creeps.len();
        let original_entities = engine.world.len();

        let mut save_buffer = Vec::new();
        engine.save(&mut save_buffer).expect("Save failed");

        let mut loaded = SimulationEngine::new();
        loaded.load(&save_buffer[..]).expect("Load failed");

        assert_eq!(loaded.tick(), original_tick);
        assert_eq!(loaded.memory.creeps.len(), original_creeps);
        assert_eq!(loaded.world.len(), original_entities);
        assert_eq!(loaded.memory.base(&room.to_string()).map(|b| b.room), Some(room));

        // Ids keep counting from where the saved run stopped.
        assert_eq!(loaded.allocate_id(), engine.allocate_id());
    }

    #[test]
    fn test_version_mismatch() {
        let data = SaveData {
            version: SAVE_VERSION + 1,
            tick: 0,
            next_id: 1,
            memory: String::new(),
            entities: Vec::new(),
        };
        let bytes = bincode::serialize(&data).unwrap();
        match load_simulation(&bytes[..]) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, SAVE_VERSION + 1);
            }
            _ => panic!("expected a version mismatch"),
        }
    }
}
