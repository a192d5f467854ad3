use colonist_logic::ids::ObjectId;
use colonist_logic::roles::RoleDefinition;
use colonist_logic::targeting::Candidate;

use crate::commands::ActionResult;
use crate::context::{Base, Tick};
use crate::error::RoleError;
use crate::memory::CourierSettings;
use crate::world::CreepView;

use super::{commute, RoleBehavior};

/// Hauls between two operator-configured objects.
pub struct Courier {
    definition: RoleDefinition,
}

impl Courier {
    pub fn new(definition: RoleDefinition) -> Self {
        Self { definition }
    }

    fn settings(tick: &Tick, base: &Base) -> CourierSettings {
        tick.memory
            .base(&base.name)
            .map(|b| b.courier.clone())
            .unwrap_or_default()
    }

    fn endpoint(tick: &Tick, id: Option<ObjectId>) -> Vec<Candidate> {
        id.and_then(|id| tick.world.position(id).map(|pos| Candidate::new(id, pos)))
            .into_iter()
            .collect()
    }
}

impl RoleBehavior for Courier {
    fn definition(&self) -> &RoleDefinition {
        &self.definition
    }

    fn find_targets(&self, tick: &Tick, base: &Base) -> Vec<Candidate> {
        Self::endpoint(tick, Self::settings(tick, base).target)
    }

    fn find_sources(&self, tick: &Tick, base: &Base) -> Vec<Candidate> {
        Self::endpoint(tick, Self::settings(tick, base).source)
    }

    /// Both endpoints configured and alive.
    fn is_necessary(&self, tick: &Tick, base: &Base) -> bool {
        let settings = Self::settings(tick, base);
        match (settings.source, settings.target) {
            (Some(source), Some(target)) => tick.world.exists(source) && tick.world.exists(target),
            _ => false,
        }
    }

    fn gather(&self, tick: &mut Tick, creep: &CreepView, source: ObjectId) -> ActionResult {
        tick.withdraw(creep, source)
    }

    fn work(&self, tick: &mut Tick, base: &Base, creep: &CreepView) -> Result<(), RoleError> {
        commute(self, tick, base, creep)
    }
}
