//! Systems - per-tick passes over the colony

mod base;
mod structures;

pub use base::*;
pub use structures::*;
