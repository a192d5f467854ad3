use colonist_logic::ids::ObjectId;
use colonist_logic::roles::RoleDefinition;
use colonist_logic::targeting::Candidate;

use crate::commands::ActionResult;
use crate::components::StructureKind;
use crate::context::{Base, Tick};
use crate::error::RoleError;
use crate::world::CreepView;

use super::{commute, RoleBehavior};

/// Moves stored energy from storage and containers to consumers.
pub struct Storekeeper {
    definition: RoleDefinition,
}

impl Storekeeper {
    pub fn new(definition: RoleDefinition) -> Self {
        Self { definition }
    }
}

impl RoleBehavior for Storekeeper {
    fn definition(&self) -> &RoleDefinition {
        &self.definition
    }

    fn find_targets(&self, tick: &Tick, base: &Base) -> Vec<Candidate> {
        tick.world
            .structures_in(base.room)
            .into_iter()
            .filter(|s| s.mine)
            .filter(|s| {
                matches!(
                    s.kind,
                    StructureKind::Spawn | StructureKind::Extension | StructureKind::Tower
                )
            })
            .filter(|s| s.store.map_or(false, |store| !store.is_full()))
            .map(|s| Candidate::new(s.id, s.pos))
            .collect()
    }

    fn find_sources(&self, tick: &Tick, base: &Base) -> Vec<Candidate> {
        tick.world
            .structures_in(base.room)
            .into_iter()
            .filter(|s| s.kind.is_storage())
            .filter(|s| s.store.map_or(false, |store| !store.is_empty()))
            .map(|s| Candidate::new(s.id, s.pos))
            .collect()
    }

    fn is_necessary(&self, _tick: &Tick, _base: &Base) -> bool {
        true
    }

    fn gather(&self, tick: &mut Tick, creep: &CreepView, source: ObjectId) -> ActionResult {
        tick.withdraw(creep, source)
    }

    fn work(&self, tick: &mut Tick, base: &Base, creep: &CreepView) -> Result<(), RoleError> {
        commute(self, tick, base, creep)
    }
}
