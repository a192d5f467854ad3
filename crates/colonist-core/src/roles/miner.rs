//! Miner: a static harvester pinned to one source for life.
//!
//! The miner walks to its source once, records how long that took, and from
//! then on harvests in place, dropping energy into storage within
//! [`MINER_DROP_RANGE`] of the source. Before it dies it queues its own
//! replacement on the home base so the source is never left idle for long.

use std::collections::HashSet;

use colonist_logic::body::BodyPart;
use colonist_logic::geometry::Position;
use colonist_logic::ids::ObjectId;
use colonist_logic::roles::{RoleDefinition, RoleKind};
use colonist_logic::targeting::{closest, Candidate, SortStrategy};

use crate::commands::ActionResult;
use crate::components::StructureKind;
use crate::context::{Base, Tick, ADJACENT};
use crate::error::RoleError;
use crate::memory::{CreepMemory, SpawnRequest};
use crate::world::CreepView;

use super::{follow_up, BodyTemplate, RoleBehavior, Slot};

/// How far from its source a miner looks for somewhere to drop energy.
pub const MINER_DROP_RANGE: u32 = 7;

/// Most WORK parts worth putting on a miner.
pub const MINER_MAX_WORK: u32 = 5;

pub struct Miner {
    definition: RoleDefinition,
}

impl Miner {
    pub fn new(definition: RoleDefinition) -> Self {
        Self { definition }
    }

    /// A source of the base room nobody mines and nobody is queued for.
    fn free_source(tick: &Tick, base: &Base) -> Option<ObjectId> {
        let mut taken = pinned_sources(tick);
        if let Some(memory) = tick.memory.base(&base.name) {
            taken.extend(memory.spawn_queue.iter().filter_map(|r| r.source));
        }
        tick.world
            .sources_in(base.room)
            .into_iter()
            .map(|s| s.id)
            .find(|id| !taken.contains(id))
    }

    fn drop_targets(tick: &Tick, source_pos: &Position) -> Vec<Candidate> {
        tick.world
            .structures_in(source_pos.room)
            .into_iter()
            .filter(|s| {
                s.kind.is_storage() || (s.mine && s.kind == StructureKind::Link)
            })
            .filter(|s| s.pos.in_range_to(source_pos, MINER_DROP_RANGE))
            .filter(|s| s.store.map_or(false, |store| !store.is_full()))
            .map(|s| Candidate::new(s.id, s.pos))
            .collect()
    }

    /// Queue a successor once the remaining lifetime no longer covers the
    /// trip to the source plus the successor's spawn time.
    fn schedule_replacement(
        &self,
        tick: &mut Tick,
        creep: &CreepView,
        source: ObjectId,
    ) -> Result<(), RoleError> {
        let per_part = tick.config.replacement_ticks_per_part;
        let memory = tick
            .memory
            .creep_mut(&creep.name)
            .ok_or_else(|| RoleError::MissingMemory(creep.name.clone()))?;
        if memory.trained_replacement {
            return Ok(());
        }
        let travel = memory.ticks_to_source.unwrap_or(0);
        let lead = travel + creep.body.len() as u32 * per_part;
        if creep.ticks_to_live > lead {
            return Ok(());
        }
        memory.trained_replacement = true;
        let home = memory.home.clone();

        let base = tick
            .memory
            .base_mut(&home)
            .ok_or_else(|| RoleError::UnknownBase(home.clone()))?;
        base.spawn_queue.push(SpawnRequest {
            role: self.name().to_string(),
            source: Some(source),
        });
        tick.info(format!(
            "{}: {} has {} ticks left, queued a replacement",
            home, creep.name, creep.ticks_to_live
        ));
        Ok(())
    }
}

impl RoleBehavior for Miner {
    fn definition(&self) -> &RoleDefinition {
        &self.definition
    }

    fn is_necessary(&self, _tick: &Tick, _base: &Base) -> bool {
        true
    }

    /// A stand-in has no home source to mine.
    fn reassignable(&self) -> bool {
        false
    }

    fn body(&self) -> BodyTemplate {
        BodyTemplate {
            single: vec![BodyPart::Carry, BodyPart::Move],
            repeating: vec![BodyPart::Work],
            max_multiplier: Some(MINER_MAX_WORK),
        }
    }

    fn initial_memory(
        &self,
        tick: &Tick,
        base: &Base,
        request: Option<&SpawnRequest>,
    ) -> Option<CreepMemory> {
        let source = request
            .and_then(|r| r.source)
            .or_else(|| Self::free_source(tick, base))?;
        let mut memory = CreepMemory::new(self.name(), &base.name);
        memory.home_source = Some(source);
        Some(memory)
    }

    fn work(&self, tick: &mut Tick, _base: &Base, creep: &CreepView) -> Result<(), RoleError> {
        let memory = tick
            .memory
            .creep_mut(&creep.name)
            .ok_or_else(|| RoleError::MissingMemory(creep.name.clone()))?;
        let source = memory.home_source.ok_or_else(|| RoleError::Misconfigured {
            role: RoleKind::Miner.name().to_string(),
            reason: format!("{} has no home source", creep.name),
        })?;
        if memory.initial_ticks_to_live.is_none() {
            memory.initial_ticks_to_live = Some(creep.ticks_to_live);
        }
        let initial = memory.initial_ticks_to_live.unwrap_or(creep.ticks_to_live);

        let source_pos = tick.world.position(source).ok_or(RoleError::Vanished(source))?;
        if !creep.pos.in_range_to(&source_pos, ADJACENT) {
            tick.move_to(creep, source_pos, ADJACENT);
            return Ok(());
        }

        if let Some(memory) = tick.memory.creep_mut(&creep.name) {
            if memory.ticks_to_source.is_none() {
                memory.ticks_to_source = Some(initial.saturating_sub(creep.ticks_to_live));
            }
        }
        self.schedule_replacement(tick, creep, source)?;

        if creep.store.is_full() {
            let drop = closest(
                Self::drop_targets(tick, &source_pos),
                &creep.pos,
                &SortStrategy::Distance,
            );
            if let Some(target) = drop {
                let result = tick.transfer(creep, target.id);
                return follow_up(tick, creep, target.id, Slot::Target, result, ADJACENT);
            }
        }

        match tick.harvest(creep, source) {
            ActionResult::Ok | ActionResult::Full => {}
            ActionResult::NotEnoughResources => {
                tick.debug(format!("{}: source {} is empty", creep.name, source));
            }
            other => {
                tick.warn(format!("{}: harvest {} -> {:?}", creep.name, source, other));
            }
        }
        Ok(())
    }
}

/// Sources pinned by a live miner.
pub fn pinned_sources(tick: &Tick) -> HashSet<ObjectId> {
    let miner = RoleKind::Miner.name();
    tick.world
        .creeps()
        .iter()
        .filter_map(|c| tick.memory.creep(&c.name))
        .filter(|m| m.role == miner)
        .filter_map(|m| m.home_source)
        .collect()
}
