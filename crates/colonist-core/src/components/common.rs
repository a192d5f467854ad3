//! Common components used across multiple object kinds.

use serde::{Deserialize, Serialize};

/// Energy held by an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub energy: u32,
    pub capacity: u32,
}

impl Store {
    pub fn new(capacity: u32) -> Self {
        Self {
            energy: 0,
            capacity,
        }
    }

    pub fn with_energy(mut self, energy: u32) -> Self {
        self.energy = energy.min(self.capacity);
        self
    }

    pub fn free_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.energy)
    }

    pub fn is_empty(&self) -> bool {
        self.energy == 0
    }

    pub fn is_full(&self) -> bool {
        self.free_capacity() == 0
    }

    /// Add up to `amount`, returning what was accepted.
    pub fn deposit(&mut self, amount: u32) -> u32 {
        let accepted = amount.min(self.free_capacity());
        self.energy += accepted;
        accepted
    }

    /// Remove up to `amount`, returning what was taken.
    pub fn take(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.energy);
        self.energy -= taken;
        taken
    }
}

/// Structural health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hits {
    pub hits: u32,
    pub hits_max: u32,
}

impl Hits {
    pub fn full(hits_max: u32) -> Self {
        Self {
            hits: hits_max,
            hits_max,
        }
    }

    pub fn damage(&self) -> u32 {
        self.hits_max.saturating_sub(self.hits)
    }

    pub fn is_full(&self) -> bool {
        self.hits >= self.hits_max
    }

    /// Fraction of maximum health, 0.0 to 1.0.
    pub fn ratio(&self) -> f32 {
        if self.hits_max == 0 {
            1.0
        } else {
            self.hits as f32 / self.hits_max as f32
        }
    }
}

/// Marker: the object belongs to us.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Mine;

/// Marker: an enemy unit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Hostile;
