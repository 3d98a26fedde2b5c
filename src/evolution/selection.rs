//! Fitness-proportionate selection through a weighted mating pool

use rand::Rng;

use crate::error::SelectionError;

/// Extra slots per unit of normalized fitness
pub const POOL_SCALE: f32 = 100.0;

/// Divide every fitness by the largest finite one
pub fn normalize(fitness: &[f32]) -> Vec<f32> {
    let max = fitness
        .iter()
        .copied()
        .filter(|f| f.is_finite())
        .fold(0.0f32, f32::max);
    normalize_by(fitness, max)
}

/// Divide every fitness by `max`
///
/// A non-positive or non-finite `max` leaves nothing to scale by, so every
/// finite entry becomes 0. NaN stays NaN and is skipped by the mating pool.
pub fn normalize_by(fitness: &[f32], max: f32) -> Vec<f32> {
    let usable = max.is_finite() && max > 0.0;
    fitness
        .iter()
        .map(|&f| {
            if f.is_nan() {
                f32::NAN
            } else if usable && f.is_finite() {
                (f / max).max(0.0)
            } else {
                0.0
            }
        })
        .collect()
}

/// Multiset of population indices, one slot per `round(norm * 100) + 1`
#[derive(Debug, Clone, Default)]
pub struct MatingPool {
    slots: Vec<usize>,
}

impl MatingPool {
    /// Build the pool from normalized fitness values
    pub fn build(normalized: &[f32]) -> Self {
        let mut slots = Vec::new();
        for (index, &fitness) in normalized.iter().enumerate() {
            if fitness.is_nan() {
                continue;
            }
            let copies = (fitness * POOL_SCALE).round() as usize + 1;
            slots.extend(std::iter::repeat(index).take(copies));
        }
        Self { slots }
    }

    /// Normalize `fitness` by its own max and build the pool in one go
    pub fn from_fitness(fitness: &[f32]) -> Self {
        Self::build(&normalize(fitness))
    }

    /// Normalize `fitness` by a max tracked elsewhere, e.g. over a whole generation
    pub fn from_fitness_with_max(fitness: &[f32], max: f32) -> Self {
        Self::build(&normalize_by(fitness, max))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots held by population index `index`
    pub fn count(&self, index: usize) -> usize {
        self.slots.iter().filter(|&&i| i == index).count()
    }

    /// Draw two parent indices uniformly, with replacement
    pub fn select_parents<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(usize, usize), SelectionError> {
        if self.slots.is_empty() {
            return Err(SelectionError::EmptyMatingPool { population: 0 });
        }
        let a = self.slots[rng.random_range(0..self.slots.len())];
        let b = self.slots[rng.random_range(0..self.slots.len())];
        Ok((a, b))
    }
}
