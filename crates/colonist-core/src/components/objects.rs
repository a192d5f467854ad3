//! World object components: creeps, structures, sources, sites, flags.

use colonist_logic::body::{count_parts, BodyPart};
use serde::{Deserialize, Serialize};

/// Lifetime of a freshly spawned creep in ticks.
pub const CREEP_LIFE_TIME: u32 = 1500;

/// Energy each CARRY part can hold.
pub const CARRY_CAPACITY: u32 = 50;

/// A mobile worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creep {
    pub name: String,
    pub body: Vec<BodyPart>,
    pub ticks_to_live: u32,
    pub fatigue: u32,
    /// Still being produced by a spawn.
    pub spawning: bool,
    /// Last glyph shown above the creep.
    pub saying: Option<String>,
}

impl Creep {
    pub fn new(name: &str, body: Vec<BodyPart>) -> Self {
        Self {
            name: name.to_string(),
            body,
            ticks_to_live: CREEP_LIFE_TIME,
            fatigue: 0,
            spawning: false,
            saying: None,
        }
    }

    pub fn parts(&self, kind: BodyPart) -> u32 {
        count_parts(&self.body, kind)
    }

    pub fn carry_capacity(&self) -> u32 {
        self.parts(BodyPart::Carry) * CARRY_CAPACITY
    }
}

/// A production structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawn {
    pub name: String,
    pub spawning: Option<Spawning>,
}

impl Spawn {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            spawning: None,
        }
    }
}

/// A creep under construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawning {
    pub creep: String,
    pub remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Spawn,
    Extension,
    Tower,
    Link,
    Storage,
    Container,
    Road,
    Wall,
    Rampart,
}

impl StructureKind {
    pub fn hits_max(&self) -> u32 {
        match self {
            StructureKind::Spawn => 5_000,
            StructureKind::Extension => 1_000,
            StructureKind::Tower => 3_000,
            StructureKind::Link => 1_000,
            StructureKind::Storage => 10_000,
            StructureKind::Container => 250_000,
            StructureKind::Road => 5_000,
            StructureKind::Wall => 300_000_000,
            StructureKind::Rampart => 300_000,
        }
    }

    /// Energy capacity, `None` for structures without a store.
    pub fn store_capacity(&self) -> Option<u32> {
        match self {
            StructureKind::Spawn => Some(300),
            StructureKind::Extension => Some(50),
            StructureKind::Tower => Some(1_000),
            StructureKind::Link => Some(800),
            StructureKind::Storage => Some(1_000_000),
            StructureKind::Container => Some(2_000),
            StructureKind::Road | StructureKind::Wall | StructureKind::Rampart => None,
        }
    }

    /// Structures that hold energy for later use rather than consume it.
    pub fn is_storage(&self) -> bool {
        matches!(self, StructureKind::Storage | StructureKind::Container)
    }

    /// Kinds that belong to a player. Roads, walls and containers are
    /// neutral.
    pub fn is_ownable(&self) -> bool {
        !matches!(
            self,
            StructureKind::Road | StructureKind::Wall | StructureKind::Container
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Structure {
    pub kind: StructureKind,
}

/// A harvestable energy node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Source {
    pub energy: u32,
    pub energy_capacity: u32,
    pub ticks_to_regeneration: u32,
}

/// Ticks between source refills.
pub const SOURCE_REGEN_TIME: u32 = 300;

impl Default for Source {
    fn default() -> Self {
        Self {
            energy: 3_000,
            energy_capacity: 3_000,
            ticks_to_regeneration: SOURCE_REGEN_TIME,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConstructionSite {
    pub kind: StructureKind,
    pub progress: u32,
    pub progress_total: u32,
}

impl ConstructionSite {
    pub fn remaining(&self) -> u32 {
        self.progress_total.saturating_sub(self.progress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerOwner {
    Unowned,
    Mine,
    Foreign,
}

/// Territory controller of a room.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Controller {
    pub level: u8,
    pub progress: u32,
    pub owner: ControllerOwner,
}

impl Controller {
    pub fn owned(level: u8) -> Self {
        Self {
            level,
            progress: 0,
            owner: ControllerOwner::Mine,
        }
    }

    pub fn unowned() -> Self {
        Self {
            level: 0,
            progress: 0,
            owner: ControllerOwner::Unowned,
        }
    }

    pub fn is_mine(&self) -> bool {
        self.owner == ControllerOwner::Mine
    }
}

/// Operator-placed territory marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flag {
    pub name: String,
}
