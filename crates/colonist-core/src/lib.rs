//! Colonist Core - colony decision engine
//!
//! Each tick the colony reads a snapshot of the world, decides what every
//! worker and spawn should do, and records those decisions as commands for
//! the host to carry out. Persistent state lives in a JSON-backed
//! [`memory::MemoryStore`].
//!
//! # Architecture
//!
//! The world is an ECS via `hecs`:
//! - **Entities**: creeps, spawns, structures, sources, sites, flags
//! - **Components**: pure data (Position, Store, Hits, Creep, ...)
//! - **Roles**: per-worker behavior behind the [`roles::RoleBehavior`] trait
//! - **Systems**: the base controller and the tower/link controllers
//!
//! [`engine::SimulationEngine`] is an in-process host that applies commands
//! and advances timers, used by tests, benches and the headless harness.
//!
//! # Example
//!
//! ```rust,no_run
//! use colonist_core::prelude::*;
//! use colonist_core::generation::{generate_room, RoomConfig};
//!
//! let mut engine = SimulationEngine::new();
//! let mut rng = rand::thread_rng();
//! generate_room(&mut engine, RoomName::new(1, 1), &RoomConfig::default(), &mut rng);
//!
//! loop {
//!     engine.update();
//! }
//! ```

pub mod colony;
pub mod commands;
pub mod components;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod generation;
pub mod memory;
pub mod persistence;
pub mod roles;
pub mod systems;
pub mod world;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::colony::{Colony, TickReport};
    pub use crate::commands::{ActionResult, Command, CommandBuffer, MoveStatus};
    pub use crate::components::*;
    pub use crate::config::ColonyConfig;
    pub use crate::context::{Base, Tick};
    pub use crate::engine::SimulationEngine;
    pub use crate::error::RoleError;
    pub use crate::memory::{CreepMemory, MemoryStore};
    pub use crate::roles::{RoleBehavior, RoleRegistry};
    pub use crate::world::WorldView;
}
