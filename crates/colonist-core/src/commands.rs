//! Fire-and-forget commands produced by the decision core.
//!
//! Roles never mutate the world directly. Every action primitive validates
//! against the tick's snapshot and, on success, appends a [`Command`] that
//! the host applies after the whole colony has run.

use colonist_logic::body::BodyPart;
use colonist_logic::geometry::{Position, RoomName};
use colonist_logic::ids::ObjectId;
use serde::{Deserialize, Serialize};

use crate::memory::CreepMemory;

/// Status of an action primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionResult {
    Ok,
    NotInRange,
    NotEnoughResources,
    Full,
    InvalidTarget,
    Other,
}

impl ActionResult {
    pub fn is_ok(&self) -> bool {
        *self == ActionResult::Ok
    }
}

/// Status of the movement primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveStatus {
    /// Cannot move this tick (fatigue); retry later.
    Queued,
    /// A step was issued.
    Moving,
    /// Already within the requested range.
    InRange,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Move {
        creep: ObjectId,
        to: Position,
    },
    Harvest {
        creep: ObjectId,
        source: ObjectId,
    },
    Transfer {
        creep: ObjectId,
        target: ObjectId,
        amount: u32,
    },
    Withdraw {
        creep: ObjectId,
        target: ObjectId,
        amount: u32,
    },
    Build {
        creep: ObjectId,
        site: ObjectId,
    },
    Repair {
        creep: ObjectId,
        target: ObjectId,
    },
    Upgrade {
        creep: ObjectId,
        controller: ObjectId,
    },
    Claim {
        creep: ObjectId,
        controller: ObjectId,
    },
    Recycle {
        spawn: ObjectId,
        creep: ObjectId,
    },
    Spawn {
        spawn: ObjectId,
        room: RoomName,
        name: String,
        body: Vec<BodyPart>,
        cost: u32,
        memory: CreepMemory,
    },
    Say {
        creep: ObjectId,
        message: String,
    },
    TowerAttack {
        tower: ObjectId,
        target: ObjectId,
    },
    TowerRepair {
        tower: ObjectId,
        target: ObjectId,
    },
    LinkTransfer {
        from: ObjectId,
        to: ObjectId,
        amount: u32,
    },
}

/// Commands issued during one tick, in issue order.
#[derive(Debug, Default, Clone)]
pub struct CommandBuffer {
    commands: Vec<Command>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Whether `spawn` already received a creation command this tick.
    pub fn has_spawn_command(&self, spawn: ObjectId) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, Command::Spawn { spawn: s, .. } if *s == spawn))
    }

    /// Energy already promised to creation commands in `room` this tick.
    pub fn committed_energy(&self, room: RoomName) -> u32 {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Spawn { room: r, cost, .. } if *r == room => Some(*cost),
                _ => None,
            })
            .sum()
    }

    /// Names of creeps ordered this tick, in issue order.
    pub fn spawned_names(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Spawn { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Commands addressed to `creep`.
    pub fn for_creep(&self, creep: ObjectId) -> Vec<&Command> {
        self.commands
            .iter()
            .filter(|c| c.creep() == Some(creep))
            .collect()
    }
}

impl Command {
    /// The creep performing the command, if any.
    pub fn creep(&self) -> Option<ObjectId> {
        match self {
            Command::Move { creep, .. }
            | Command::Harvest { creep, .. }
            | Command::Transfer { creep, .. }
            | Command::Withdraw { creep, .. }
            | Command::Build { creep, .. }
            | Command::Repair { creep, .. }
            | Command::Upgrade { creep, .. }
            | Command::Claim { creep, .. }
            | Command::Recycle { creep, .. }
            | Command::Say { creep, .. } => Some(*creep),
            Command::Spawn { .. }
            | Command::TowerAttack { .. }
            | Command::TowerRepair { .. }
            | Command::LinkTransfer { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_command(spawn: u64, room: RoomName, cost: u32) -> Command {
        Command::Spawn {
            spawn: ObjectId(spawn),
            room,
            name: format!("Harvester{}", spawn),
            body: vec![BodyPart::Work, BodyPart::Carry, BodyPart::Move],
            cost,
            memory: CreepMemory::new("Harvester", "Home"),
        }
    }

    #[test]
    fn test_committed_energy_per_room() {
        let a = RoomName::new(0, 0);
        let b = RoomName::new(1, 0);
        let mut buffer = CommandBuffer::new();
        buffer.push(spawn_command(1, a, 200));
        buffer.push(spawn_command(2, b, 300));
        buffer.push(spawn_command(3, a, 50));
        assert_eq!(buffer.committed_energy(a), 250);
        assert_eq!(buffer.committed_energy(b), 300);
        assert!(buffer.has_spawn_command(ObjectId(2)));
        assert!(!buffer.has_spawn_command(ObjectId(4)));
    }

    #[test]
    fn test_for_creep_filters_by_actor() {
        let mut buffer = CommandBuffer::new();
        buffer.push(Command::Say {
            creep: ObjectId(7),
            message: "hi".into(),
        });
        buffer.push(Command::Harvest {
            creep: ObjectId(8),
            source: ObjectId(1),
        });
        assert_eq!(buffer.for_creep(ObjectId(7)).len(), 1);
        assert_eq!(buffer.drain().len(), 2);
        assert!(buffer.is_empty());
    }
}
