use colonist_logic::ids::ObjectId;
use colonist_logic::roles::RoleDefinition;
use colonist_logic::targeting::{Candidate, SortStrategy};

use crate::commands::ActionResult;
use crate::context::{Base, Tick, WORK_RANGE};
use crate::error::RoleError;
use crate::memory::CreepMemory;
use crate::world::CreepView;

use super::{commute, energy_sources, RoleBehavior, Slot};

/// Structures below this share of their maximum health need repair.
pub const REPAIR_THRESHOLD: f32 = 0.9;

/// Repairs damaged structures, finishing one job before starting the next.
pub struct Handyman {
    definition: RoleDefinition,
}

impl Handyman {
    pub fn new(definition: RoleDefinition) -> Self {
        Self { definition }
    }
}

impl RoleBehavior for Handyman {
    fn definition(&self) -> &RoleDefinition {
        &self.definition
    }

    fn find_targets(&self, tick: &Tick, base: &Base) -> Vec<Candidate> {
        tick.world
            .structures_in(base.room)
            .into_iter()
            .filter(|s| s.mine || !s.kind.is_ownable())
            .filter_map(|s| {
                let hits = s.hits?;
                (hits.ratio() < REPAIR_THRESHOLD)
                    .then(|| Candidate::new(s.id, s.pos).with_remaining(hits.damage()))
            })
            .collect()
    }

    /// The remembered job stays on offer until it is fully repaired, even
    /// once it climbs back above the repair threshold.
    fn targets_for(&self, tick: &Tick, base: &Base, creep: &CreepView) -> Vec<Candidate> {
        let mut candidates = self.find_targets(tick, base);
        let remembered = tick.memory.creep(&creep.name).and_then(|m| m.target);
        if let Some(id) = remembered {
            if !candidates.iter().any(|c| c.id == id) {
                if let (Some(pos), Some(hits)) = (tick.world.position(id), tick.world.hits(id)) {
                    candidates.push(
                        Candidate::new(id, pos)
                            .with_remaining(hits.damage())
                            .completed(hits.is_full()),
                    );
                }
            }
        }
        candidates
    }

    fn find_sources(&self, tick: &Tick, base: &Base) -> Vec<Candidate> {
        energy_sources(tick, base)
    }

    fn sort_strategy(&self, memory: &CreepMemory, slot: Slot) -> SortStrategy {
        match slot {
            Slot::Target => SortStrategy::Sticky {
                remembered: memory.target,
            },
            Slot::Source => SortStrategy::Distance,
        }
    }

    fn deliver(&self, tick: &mut Tick, creep: &CreepView, target: ObjectId) -> ActionResult {
        tick.repair(creep, target)
    }

    fn deliver_range(&self) -> u32 {
        WORK_RANGE
    }

    fn work(&self, tick: &mut Tick, base: &Base, creep: &CreepView) -> Result<(), RoleError> {
        commute(self, tick, base, creep)
    }
}
