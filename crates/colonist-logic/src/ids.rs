//! Stable object identifiers.
//!
//! Live world references are not stable between ticks (objects die and are
//! re-created), so everything persisted refers to objects by id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a world object, unique for the object's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(raw: u64) -> Self {
        ObjectId(raw)
    }
}
