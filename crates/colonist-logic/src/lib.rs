//! Pure colony decision logic for Colonist.
//!
//! This crate contains the parts of the colony bot that are independent of
//! any world representation or host. Functions take plain data and return
//! results, making them unit-testable and reusable by the engine crate, the
//! headless harness and any future host binding.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`body`] | Body part kinds and the configurable part cost table |
//! | [`geometry`] | Room names, positions, ranges and single-tile steps |
//! | [`ids`] | Stable object identifiers persisted across ticks |
//! | [`roles`] | Role definitions, resolution modes, stable priority order |
//! | [`spawn_budget`] | Largest affordable body for a part template |
//! | [`targeting`] | Candidate sorting strategies (`resolve_closest`) |

pub mod body;
pub mod geometry;
pub mod ids;
pub mod roles;
pub mod spawn_budget;
pub mod targeting;
