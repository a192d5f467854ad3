use colonist_logic::ids::ObjectId;
use colonist_logic::roles::RoleDefinition;
use colonist_logic::targeting::Candidate;

use crate::commands::ActionResult;
use crate::context::{Base, Tick, WORK_RANGE};
use crate::error::RoleError;
use crate::world::CreepView;

use super::{commute, energy_sources, RoleBehavior};

/// Feeds the base's own controller.
pub struct Upgrader {
    definition: RoleDefinition,
}

impl Upgrader {
    pub fn new(definition: RoleDefinition) -> Self {
        Self { definition }
    }
}

impl RoleBehavior for Upgrader {
    fn definition(&self) -> &RoleDefinition {
        &self.definition
    }

    fn find_targets(&self, tick: &Tick, base: &Base) -> Vec<Candidate> {
        tick.world
            .controller_in(base.room)
            .filter(|c| c.controller.is_mine())
            .map(|c| Candidate::new(c.id, c.pos))
            .into_iter()
            .collect()
    }

    fn find_sources(&self, tick: &Tick, base: &Base) -> Vec<Candidate> {
        energy_sources(tick, base)
    }

    fn deliver(&self, tick: &mut Tick, creep: &CreepView, target: ObjectId) -> ActionResult {
        tick.upgrade(creep, target)
    }

    fn deliver_range(&self) -> u32 {
        WORK_RANGE
    }

    fn work(&self, tick: &mut Tick, base: &Base, creep: &CreepView) -> Result<(), RoleError> {
        commute(self, tick, base, creep)
    }
}
