use colonist_logic::roles::RoleDefinition;
use colonist_logic::targeting::Candidate;

use crate::components::StructureKind;
use crate::context::{Base, Tick};
use crate::error::RoleError;
use crate::memory::LinkType;
use crate::world::CreepView;

use super::{commute, pinned_sources, RoleBehavior};

/// Fills spawns, extensions, towers and source links.
pub struct Harvester {
    definition: RoleDefinition,
}

impl Harvester {
    pub fn new(definition: RoleDefinition) -> Self {
        Self { definition }
    }
}

impl RoleBehavior for Harvester {
    fn definition(&self) -> &RoleDefinition {
        &self.definition
    }

    fn find_targets(&self, tick: &Tick, base: &Base) -> Vec<Candidate> {
        tick.world
            .structures_in(base.room)
            .into_iter()
            .filter(|s| s.mine)
            .filter(|s| match s.kind {
                StructureKind::Spawn | StructureKind::Extension | StructureKind::Tower => true,
                StructureKind::Link => tick.memory.link_type(s.id) == Some(LinkType::Source),
                _ => false,
            })
            .filter(|s| s.store.map_or(false, |store| !store.is_full()))
            .map(|s| Candidate::new(s.id, s.pos))
            .collect()
    }

    fn find_sources(&self, tick: &Tick, base: &Base) -> Vec<Candidate> {
        energy_sources(tick, base)
    }

    fn work(&self, tick: &mut Tick, base: &Base, creep: &CreepView) -> Result<(), RoleError> {
        commute(self, tick, base, creep)
    }
}

/// Energy a general worker of `base` may gather from, per the base's
/// harvester settings: active nodes not pinned by a miner, and/or storage
/// and containers holding energy.
pub fn energy_sources(tick: &Tick, base: &Base) -> Vec<Candidate> {
    let settings = tick
        .memory
        .base(&base.name)
        .map(|b| b.harvester.clone())
        .unwrap_or_default();

    let mut candidates = Vec::new();
    if settings.use_source_as_source {
        let pinned = pinned_sources(tick);
        candidates.extend(
            tick.world
                .sources_in(base.room)
                .into_iter()
                .filter(|s| s.energy > 0 && !pinned.contains(&s.id))
                .map(|s| Candidate::new(s.id, s.pos)),
        );
    }
    if settings.use_storage_as_source {
        candidates.extend(
            tick.world
                .structures_in(base.room)
                .into_iter()
                .filter(|s| s.kind.is_storage())
                .filter(|s| s.store.map_or(false, |store| !store.is_empty()))
                .map(|s| Candidate::new(s.id, s.pos)),
        );
    }
    candidates
}
