//! The commute state machine shared by most roles, and target resolution.
//!
//! A commuting worker alternates between gathering energy from a source and
//! spending it on a target. The `working` flag flips with hysteresis: off
//! when the worker runs dry, on when it is full.

use std::fmt;

use colonist_logic::ids::ObjectId;
use colonist_logic::roles::ResolutionMode;
use colonist_logic::targeting::closest;

use crate::commands::{ActionResult, MoveStatus};
use crate::context::{Base, Tick, ADJACENT};
use crate::error::RoleError;
use crate::memory::CreepMemory;
use crate::world::CreepView;

use super::RoleBehavior;

/// Glyph shown when a remembered target cannot be resolved.
pub const INTEGRITY_GLYPH: &str = "⚠";

/// Which remembered id a lookup concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Target,
    Source,
}

impl Slot {
    pub fn get(self, memory: &CreepMemory) -> Option<ObjectId> {
        match self {
            Slot::Target => memory.target,
            Slot::Source => memory.source,
        }
    }

    pub fn set(self, memory: &mut CreepMemory, id: Option<ObjectId>) {
        match self {
            Slot::Target => memory.target = id,
            Slot::Source => memory.source = id,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Target => f.write_str("target"),
            Slot::Source => f.write_str("source"),
        }
    }
}

fn set_slot(tick: &mut Tick, creep: &CreepView, slot: Slot, id: Option<ObjectId>) {
    if let Some(memory) = tick.memory.creep_mut(&creep.name) {
        slot.set(memory, id);
    }
}

/// Pick the worker's target or source for this tick.
///
/// With a resolution mode, a remembered id that still resolves is used even
/// if it dropped off the candidate list; one that no longer resolves is
/// cleared and the worker idles this tick. Without a mode the slot is
/// re-selected every tick with the role's sort strategy.
pub fn resolve_slot<R: RoleBehavior + ?Sized>(
    role: &R,
    tick: &mut Tick,
    base: &Base,
    creep: &CreepView,
    slot: Slot,
) -> Result<Option<ObjectId>, RoleError> {
    let memory = tick
        .memory
        .creep(&creep.name)
        .ok_or_else(|| RoleError::MissingMemory(creep.name.clone()))?;
    let remembered = slot.get(memory);
    let strategy = role.sort_strategy(memory, slot);
    let mode = role.definition().mode;

    if let (Some(mode), Some(id)) = (mode, remembered) {
        if tick.world.exists(id) {
            return Ok(Some(id));
        }
        set_slot(tick, creep, slot, None);
        match mode {
            ResolutionMode::UseOrWait => {
                tick.debug(format!(
                    "{}: remembered {} {} is gone, waiting",
                    creep.name, slot, id
                ));
            }
            ResolutionMode::UseOrError => {
                tick.warn(format!(
                    "{}: remembered {} {} of {} does not resolve",
                    creep.name,
                    slot,
                    id,
                    role.name()
                ));
                tick.say(creep, INTEGRITY_GLYPH);
            }
        }
        return Ok(None);
    }

    let candidates = match slot {
        Slot::Target => role.targets_for(tick, base, creep),
        Slot::Source => role.find_sources(tick, base),
    };
    let chosen = closest(candidates, &creep.pos, &strategy).map(|c| c.id);
    set_slot(tick, creep, slot, chosen);
    if chosen.is_none() {
        tick.debug(format!("{}: no {} for {}", creep.name, slot, role.name()));
    }
    Ok(chosen)
}

/// React to an action result: move when out of range, forget the slot when
/// the object is exhausted or invalid.
pub fn follow_up(
    tick: &mut Tick,
    creep: &CreepView,
    id: ObjectId,
    slot: Slot,
    result: ActionResult,
    range: u32,
) -> Result<(), RoleError> {
    match result {
        ActionResult::Ok => {}
        ActionResult::NotInRange => {
            let pos = tick.world.position(id).ok_or(RoleError::Vanished(id))?;
            if tick.move_to(creep, pos, range) == MoveStatus::Failed {
                tick.warn(format!("{}: cannot move toward {}", creep.name, id));
            }
        }
        ActionResult::Full | ActionResult::NotEnoughResources | ActionResult::InvalidTarget => {
            tick.debug(format!("{}: {} {} -> {:?}", creep.name, slot, id, result));
            set_slot(tick, creep, slot, None);
        }
        ActionResult::Other => {
            tick.warn(format!("{}: action on {} failed", creep.name, id));
            set_slot(tick, creep, slot, None);
        }
    }
    Ok(())
}

/// One tick of the gather/deliver loop.
pub fn commute<R: RoleBehavior + ?Sized>(
    role: &R,
    tick: &mut Tick,
    base: &Base,
    creep: &CreepView,
) -> Result<(), RoleError> {
    let memory = tick
        .memory
        .creep_mut(&creep.name)
        .ok_or_else(|| RoleError::MissingMemory(creep.name.clone()))?;

    if memory.working && creep.store.is_empty() {
        memory.working = false;
        memory.target = None;
        memory.source = None;
    } else if !memory.working && creep.store.is_full() {
        memory.working = true;
        memory.target = None;
        memory.source = None;
    }
    let working = memory.working;

    let slot = if working { Slot::Target } else { Slot::Source };
    let Some(id) = resolve_slot(role, tick, base, creep, slot)? else {
        return Ok(());
    };

    let (result, range) = if working {
        (role.deliver(tick, creep, id), role.deliver_range())
    } else {
        (role.gather(tick, creep, id), ADJACENT)
    };
    follow_up(tick, creep, id, slot, result, range)
}
