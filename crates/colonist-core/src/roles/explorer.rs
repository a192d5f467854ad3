//! Explorer: claims the room marked by a flag, then becomes a builder.

use std::collections::HashSet;

use colonist_logic::body::BodyPart;
use colonist_logic::roles::{RoleDefinition, RoleKind};
use colonist_logic::targeting::Candidate;

use crate::commands::{ActionResult, MoveStatus};
use crate::components::ControllerOwner;
use crate::context::{Base, Tick, ADJACENT};
use crate::error::RoleError;
use crate::memory::{CreepMemory, ExplorerPhase, SpawnRequest};
use crate::world::{CreepView, FlagView};

use super::{BodyTemplate, RoleBehavior};

pub const EXPLORER_MAX_MOVE: u32 = 5;

pub struct Explorer {
    definition: RoleDefinition,
}

impl Explorer {
    pub fn new(definition: RoleDefinition) -> Self {
        Self { definition }
    }

    /// Flags held by some live worker.
    fn claimed_flags(tick: &Tick) -> HashSet<String> {
        tick.world
            .creeps()
            .iter()
            .filter_map(|c| tick.memory.creep(&c.name))
            .filter_map(|m| m.flag.clone())
            .collect()
    }

    /// Flags, by name, whose room is neither ours nor someone else's.
    fn pending_flags(tick: &Tick) -> Vec<FlagView> {
        tick.world
            .flags()
            .into_iter()
            .filter(|f| {
                tick.world
                    .controller_in(f.pos.room)
                    .map_or(true, |c| c.controller.owner == ControllerOwner::Unowned)
            })
            .collect()
    }

    /// Pending flags no worker holds yet.
    fn open_flags(tick: &Tick) -> Vec<FlagView> {
        let claimed = Self::claimed_flags(tick);
        Self::pending_flags(tick)
            .into_iter()
            .filter(|f| !claimed.contains(&f.name))
            .collect()
    }

    /// Release the flag and hand the worker over to the builder role for good.
    fn retire(tick: &mut Tick, creep: &CreepView, why: &str) {
        if let Some(memory) = tick.memory.creep_mut(&creep.name) {
            memory.role = RoleKind::Builder.name().to_string();
            memory.phase = None;
            memory.flag = None;
        }
        tick.info(format!("{} {} and becomes a builder", creep.name, why));
    }
}

impl RoleBehavior for Explorer {
    fn definition(&self) -> &RoleDefinition {
        &self.definition
    }

    fn find_targets(&self, tick: &Tick, _base: &Base) -> Vec<Candidate> {
        Self::pending_flags(tick)
            .into_iter()
            .map(|f| Candidate::new(f.id, f.pos))
            .collect()
    }

    /// Claiming takes a CLAIM part and ends by rewriting the worker's role.
    fn reassignable(&self) -> bool {
        false
    }

    fn body(&self) -> BodyTemplate {
        BodyTemplate {
            single: vec![BodyPart::Claim, BodyPart::Move],
            repeating: vec![BodyPart::Move],
            max_multiplier: Some(EXPLORER_MAX_MOVE),
        }
    }

    fn initial_memory(
        &self,
        tick: &Tick,
        base: &Base,
        _request: Option<&SpawnRequest>,
    ) -> Option<CreepMemory> {
        let flag = Self::open_flags(tick).into_iter().next()?;
        let mut memory = CreepMemory::new(self.name(), &base.name);
        memory.flag = Some(flag.name);
        memory.phase = Some(ExplorerPhase::GotoFlagRoom);
        Some(memory)
    }

    fn work(&self, tick: &mut Tick, _base: &Base, creep: &CreepView) -> Result<(), RoleError> {
        let memory = tick
            .memory
            .creep(&creep.name)
            .ok_or_else(|| RoleError::MissingMemory(creep.name.clone()))?;
        let held = memory.flag.clone();
        let phase = memory.phase.unwrap_or(ExplorerPhase::GotoFlagRoom);

        let flag_name = match held {
            Some(name) => name,
            None => {
                let Some(flag) = Self::open_flags(tick).into_iter().next() else {
                    tick.debug(format!("{}: no flag to claim", creep.name));
                    return Ok(());
                };
                if let Some(memory) = tick.memory.creep_mut(&creep.name) {
                    memory.flag = Some(flag.name.clone());
                    memory.phase = Some(ExplorerPhase::GotoFlagRoom);
                }
                flag.name
            }
        };

        let Some(flag) = tick.world.flag_by_name(&flag_name) else {
            tick.debug(format!("{}: flag {} is gone", creep.name, flag_name));
            if let Some(memory) = tick.memory.creep_mut(&creep.name) {
                memory.flag = None;
                memory.phase = None;
            }
            return Ok(());
        };

        if phase == ExplorerPhase::GotoFlagRoom {
            if creep.pos.room != flag.pos.room {
                if tick.move_to(creep, flag.pos, ADJACENT) == MoveStatus::Failed {
                    tick.warn(format!("{}: cannot travel to {}", creep.name, flag.pos.room));
                }
                return Ok(());
            }
            if let Some(memory) = tick.memory.creep_mut(&creep.name) {
                memory.phase = Some(ExplorerPhase::ClaimFlagRoom);
            }
        }

        let Some(controller) = tick.world.controller_in(flag.pos.room) else {
            tick.warn(format!("{}: room {} has no controller", creep.name, flag.pos.room));
            return Ok(());
        };

        if controller.controller.is_mine() {
            Self::retire(tick, creep, "claimed its room");
            return Ok(());
        }

        match tick.claim(creep, controller.id) {
            ActionResult::Ok => Self::retire(tick, creep, "claimed its room"),
            ActionResult::NotInRange => {
                tick.move_to(creep, controller.pos, ADJACENT);
            }
            ActionResult::InvalidTarget => {
                tick.warn(format!(
                    "{}: room {} is owned by someone else, releasing {}",
                    creep.name, flag.pos.room, flag.name
                ));
                Self::retire(tick, creep, "gave up its flag");
            }
            other => {
                tick.warn(format!("{}: claim {} -> {:?}", creep.name, controller.id, other));
            }
        }
        Ok(())
    }
}
