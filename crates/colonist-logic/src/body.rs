//! Body part kinds and their energy cost.
//!
//! Costs belong to the game ruleset, so they are carried as configuration
//! (`PartCosts`) rather than hardcoded into the spawning policy.

use serde::{Deserialize, Serialize};

/// Largest body a production structure can assemble.
pub const MAX_BODY_SIZE: usize = 50;

/// Ticks a production structure needs per body part.
pub const SPAWN_TIME_PER_PART: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Move,
    Work,
    Carry,
    Attack,
    RangedAttack,
    Heal,
    Claim,
    Tough,
}

impl BodyPart {
    pub const ALL: [BodyPart; 8] = [
        BodyPart::Move,
        BodyPart::Work,
        BodyPart::Carry,
        BodyPart::Attack,
        BodyPart::RangedAttack,
        BodyPart::Heal,
        BodyPart::Claim,
        BodyPart::Tough,
    ];
}

/// Energy cost of each part kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartCosts {
    pub r#move: u32,
    pub work: u32,
    pub carry: u32,
    pub attack: u32,
    pub ranged_attack: u32,
    pub heal: u32,
    pub claim: u32,
    pub tough: u32,
}

impl Default for PartCosts {
    fn default() -> Self {
        Self {
            r#move: 50,
            work: 100,
            carry: 50,
            attack: 80,
            ranged_attack: 150,
            heal: 250,
            claim: 600,
            tough: 10,
        }
    }
}

impl PartCosts {
    pub fn cost(&self, part: BodyPart) -> u32 {
        match part {
            BodyPart::Move => self.r#move,
            BodyPart::Work => self.work,
            BodyPart::Carry => self.carry,
            BodyPart::Attack => self.attack,
            BodyPart::RangedAttack => self.ranged_attack,
            BodyPart::Heal => self.heal,
            BodyPart::Claim => self.claim,
            BodyPart::Tough => self.tough,
        }
    }

    /// Total cost of a part list.
    pub fn body_cost(&self, parts: &[BodyPart]) -> u32 {
        parts.iter().map(|p| self.cost(*p)).sum()
    }
}

/// Number of parts of `kind` in `body`.
pub fn count_parts(body: &[BodyPart], kind: BodyPart) -> u32 {
    body.iter().filter(|p| **p == kind).count() as u32
}
