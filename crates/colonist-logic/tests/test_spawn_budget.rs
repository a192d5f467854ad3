//! Property sweeps for the spawn budget.
//!
//! Exercises: max_multiplier → calculate_max_parts over a range of energy
//! levels and templates. All pure logic.

use colonist_logic::body::{BodyPart, PartCosts, MAX_BODY_SIZE};
use colonist_logic::spawn_budget::{calculate_max_parts, max_multiplier};

use BodyPart::*;

// ── Helpers ────────────────────────────────────────────────────────────

fn templates() -> Vec<(Vec<BodyPart>, Vec<BodyPart>)> {
    vec![
        (vec![Work, Carry, Move], vec![]),
        (vec![Work], vec![Carry, Move]),
        (vec![Carry, Carry, Move], vec![]),
        (vec![Move], vec![Claim, Move]),
    ]
}

// ── Bounds ─────────────────────────────────────────────────────────────

#[test]
fn multiplier_stays_within_range_and_budget() {
    let costs = PartCosts::default();
    for (repeating, single) in templates() {
        for (min, max) in [(0, 20), (2, 5), (1, 1)] {
            for energy in (0..=3000).step_by(25) {
                if let Some(m) = max_multiplier(energy, &repeating, &single, min, max, MAX_BODY_SIZE, &costs) {
                    assert!(m >= min && m <= max, "m={} outside [{}, {}]", m, min, max);
                    assert!(m >= 1);
                    let spent = costs.body_cost(&single) + m * costs.body_cost(&repeating);
                    assert!(spent <= energy, "spent {} of {}", spent, energy);
                }
            }
        }
    }
}

#[test]
fn multiplier_is_monotonic_in_energy() {
    let costs = PartCosts::default();
    for (repeating, single) in templates() {
        let mut last = 0;
        for energy in (0..=5000).step_by(10) {
            let m = max_multiplier(energy, &repeating, &single, 0, 20, MAX_BODY_SIZE, &costs).unwrap_or(0);
            assert!(m >= last, "energy {} dropped multiplier {} -> {}", energy, last, m);
            last = m;
        }
    }
}

#[test]
fn parts_layout_is_single_then_repeats() {
    let costs = PartCosts::default();
    let parts = calculate_max_parts(1000, &[Move], &[Claim, Move], 0, 20, MAX_BODY_SIZE, &costs).unwrap();
    assert_eq!(&parts[..2], &[Claim, Move]);
    assert!(parts[2..].iter().all(|p| *p == Move));
    assert_eq!(costs.body_cost(&parts), 1000);
}

#[test]
fn bodies_respect_size_limit() {
    let costs = PartCosts::default();
    for limit in [3, 10, 25, MAX_BODY_SIZE] {
        for (repeating, single) in templates() {
            let body = calculate_max_parts(1_000_000, &repeating, &single, 0, 1000, limit, &costs);
            if let Some(parts) = body {
                assert!(parts.len() <= limit, "{} parts over limit {}", parts.len(), limit);
            }
        }
    }
}

#[test]
fn calculation_is_pure() {
    let costs = PartCosts::default();
    let a = calculate_max_parts(777, &[Work, Carry, Move], &[Tough], 1, 9, MAX_BODY_SIZE, &costs);
    let b = calculate_max_parts(777, &[Work, Carry, Move], &[Tough], 1, 9, MAX_BODY_SIZE, &costs);
    assert_eq!(a, b);
}
