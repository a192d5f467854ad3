//! Component definitions for the world snapshot.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in roles and systems.

mod common;
mod objects;

pub use common::*;
pub use objects::*;

pub use colonist_logic::body::BodyPart;
pub use colonist_logic::geometry::{Position, RoomName};
pub use colonist_logic::ids::ObjectId;
