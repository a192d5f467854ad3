use colonist_logic::ids::ObjectId;
use colonist_logic::roles::RoleDefinition;
use colonist_logic::targeting::{Candidate, SortStrategy};

use crate::commands::ActionResult;
use crate::context::{Base, Tick, WORK_RANGE};
use crate::error::RoleError;
use crate::memory::CreepMemory;
use crate::world::CreepView;

use super::{commute, energy_sources, RoleBehavior, Slot};

/// Tiles per distance bucket when ordering construction sites.
pub const BUILD_BUCKET: u32 = 5;

/// Works on unfinished construction sites.
pub struct Builder {
    definition: RoleDefinition,
}

impl Builder {
    pub fn new(definition: RoleDefinition) -> Self {
        Self { definition }
    }
}

impl RoleBehavior for Builder {
    fn definition(&self) -> &RoleDefinition {
        &self.definition
    }

    fn find_targets(&self, tick: &Tick, base: &Base) -> Vec<Candidate> {
        tick.world
            .sites_in(base.room)
            .into_iter()
            .map(|s| Candidate::new(s.id, s.pos).with_remaining(s.site.remaining()))
            .collect()
    }

    fn find_sources(&self, tick: &Tick, base: &Base) -> Vec<Candidate> {
        energy_sources(tick, base)
    }

    fn sort_strategy(&self, _memory: &CreepMemory, slot: Slot) -> SortStrategy {
        match slot {
            Slot::Target => SortStrategy::Bucketed {
                bucket_size: BUILD_BUCKET,
            },
            Slot::Source => SortStrategy::Distance,
        }
    }

    fn deliver(&self, tick: &mut Tick, creep: &CreepView, target: ObjectId) -> ActionResult {
        tick.build(creep, target)
    }

    fn deliver_range(&self) -> u32 {
        WORK_RANGE
    }

    fn work(&self, tick: &mut Tick, base: &Base, creep: &CreepView) -> Result<(), RoleError> {
        commute(self, tick, base, creep)
    }
}
