//! Spawn budgeting: the largest body a base can afford right now.
//!
//! A body is described by a fixed prefix of single parts and a repeating
//! block. The budget picks the largest multiplier `m` inside the configured
//! `[min, max]` range such that
//! `cost(single) + m * cost(repeating) <= energy`
//! and the whole body stays within `max_body_size` parts.
//! A `None` result means "not this tick"; callers retry on a later tick.

use crate::body::{BodyPart, PartCosts};

/// Largest affordable multiplier of `repeating`, or `None` when no
/// multiplier `m >= 1` inside `[min_multiplier, max_multiplier]` fits the
/// energy budget and `max_body_size`.
pub fn max_multiplier(
    energy_available: u32,
    repeating: &[BodyPart],
    single: &[BodyPart],
    min_multiplier: u32,
    max_multiplier: u32,
    max_body_size: usize,
    costs: &PartCosts,
) -> Option<u32> {
    if min_multiplier > max_multiplier || single.len() > max_body_size {
        return None;
    }

    let single_cost = costs.body_cost(single);
    if single_cost > energy_available {
        return None;
    }
    let remaining = energy_available - single_cost;

    let repeat_cost = costs.body_cost(repeating);
    let affordable = if repeat_cost == 0 {
        max_multiplier
    } else {
        remaining / repeat_cost
    };

    let size_cap = if repeating.is_empty() {
        max_multiplier
    } else {
        ((max_body_size - single.len()) / repeating.len()) as u32
    };

    let m = affordable.min(max_multiplier).min(size_cap);
    if m < min_multiplier || m < 1 {
        return None;
    }
    Some(m)
}

/// Build the largest affordable body: `single` in its original order
/// followed by `repeating` replicated `m` times.
pub fn calculate_max_parts(
    energy_available: u32,
    repeating: &[BodyPart],
    single: &[BodyPart],
    min_multiplier: u32,
    max_multiplier_limit: u32,
    max_body_size: usize,
    costs: &PartCosts,
) -> Option<Vec<BodyPart>> {
    let m = max_multiplier(
        energy_available,
        repeating,
        single,
        min_multiplier,
        max_multiplier_limit,
        max_body_size,
        costs,
    )?;

    let mut parts = Vec::with_capacity(single.len() + repeating.len() * m as usize);
    parts.extend_from_slice(single);
    for _ in 0..m {
        parts.extend_from_slice(repeating);
    }
    Some(parts)
}
