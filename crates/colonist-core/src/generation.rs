//! Room generation - lays out a playable starting room for the host.

use std::collections::HashSet;

use rand::Rng;

use crate::components::{Controller, ObjectId, Position, RoomName, StructureKind};
use crate::engine::SimulationEngine;

/// Configuration for room generation
#[derive(Debug, Clone)]
pub struct RoomConfig {
    pub spawn_name: String,
    pub sources: u32,
    pub extensions: u32,
    /// Energy in the spawn at start
    pub spawn_energy: u32,
    /// Road construction sites scattered around the room
    pub sites: u32,
    pub controller_level: u8,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            spawn_name: "Spawn1".to_string(),
            sources: 2,
            extensions: 5,
            spawn_energy: 300,
            sites: 2,
            controller_level: 1,
        }
    }
}

/// Ids of what [`generate_room`] placed.
#[derive(Debug, Clone, Default)]
pub struct RoomLayout {
    pub spawn: Option<ObjectId>,
    pub sources: Vec<ObjectId>,
    pub extensions: Vec<ObjectId>,
    pub sites: Vec<ObjectId>,
    pub controller: Option<ObjectId>,
}

/// Keep generated objects away from the room edge.
const EDGE_MARGIN: u8 = 5;

fn random_tile<R: Rng>(room: RoomName, taken: &mut HashSet<(u8, u8)>, rng: &mut R) -> Position {
    loop {
        let x = rng.gen_range(EDGE_MARGIN..50 - EDGE_MARGIN);
        let y = rng.gen_range(EDGE_MARGIN..50 - EDGE_MARGIN);
        if taken.insert((x, y)) {
            return Position::new(room, x, y);
        }
    }
}

/// Place a spawn at the room centre, extensions beside it, then sources, a
/// controller and construction sites on random free tiles.
pub fn generate_room<R: Rng>(
    engine: &mut SimulationEngine,
    room: RoomName,
    config: &RoomConfig,
    rng: &mut R,
) -> RoomLayout {
    let mut layout = RoomLayout::default();
    let mut taken = HashSet::new();

    taken.insert((25, 25));
    layout.spawn = Some(engine.add_spawn(
        &config.spawn_name,
        Position::new(room, 25, 25),
        config.spawn_energy,
    ));

    // Two rows of extensions above the spawn
    for i in 0..config.extensions.min(20) {
        let x = 20 + (i % 10) as u8;
        let y = 22 - (i / 10) as u8;
        taken.insert((x, y));
        layout
            .extensions
            .push(engine.add_structure(StructureKind::Extension, Position::new(room, x, y), 0));
    }

    for _ in 0..config.sources {
        let pos = random_tile(room, &mut taken, rng);
        layout.sources.push(engine.add_source(pos));
    }

    let pos = random_tile(room, &mut taken, rng);
    layout.controller = Some(engine.add_controller(pos, Controller::owned(config.controller_level)));

    for _ in 0..config.sites {
        let pos = random_tile(room, &mut taken, rng);
        let total = StructureKind::Road.hits_max() / 20;
        layout
            .sites
            .push(engine.add_site(StructureKind::Road, pos, total));
    }

    log::info!(
        "generated room {}: {} sources, {} extensions, {} sites",
        room,
        layout.sources.len(),
        layout.extensions.len(),
        layout.sites.len()
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Position as Pos, Source};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_room_places_everything() {
        let mut engine = SimulationEngine::new();
        let room = RoomName::new(3, 4);
        let mut rng = StdRng::seed_from_u64(1);
        let layout = generate_room(&mut engine, room, &RoomConfig::default(), &mut rng);

        assert!(layout.spawn.is_some());
        assert!(layout.controller.is_some());
        assert_eq!(layout.sources.len(), 2);
        assert_eq!(layout.extensions.len(), 5);
        assert_eq!(layout.sites.len(), 2);
        for id in &layout.sources {
            assert!(engine.get::<Source>(*id).is_some());
        }
    }

    #[test]
    fn test_no_two_objects_share_a_tile() {
        let mut engine = SimulationEngine::new();
        let room = RoomName::new(0, 0);
        let config = RoomConfig {
            sources: 4,
            extensions: 20,
            sites: 10,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(99);
        generate_room(&mut engine, room, &config, &mut rng);

        let mut seen = HashSet::new();
        for (_, pos) in engine.world.query::<&Pos>().iter() {
            assert!(seen.insert((pos.x, pos.y)), "duplicate tile {:?}", pos);
        }
    }
}
