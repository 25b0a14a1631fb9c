//! Weighted sampling from a discrete distribution
//!
//! This module contains the generic weighted sampler used for destination
//! floor selection. A sampler is built from ordered `(probability, value)`
//! pairs; a draw that falls through every entry means the registered
//! probabilities do not sum to one, which is a data error in the traffic
//! profile and is surfaced instead of being silently absorbed.

use crate::simulation::{SimulationError, SimulationResult};
use rand::Rng;

/// Tolerance applied to the cumulative probability mass before a fallen
/// through draw is treated as a distribution error rather than floating
/// point rounding.
const MASS_TOLERANCE: f64 = 1e-9;

/// Sampler over a discrete distribution of `(probability, value)` pairs
#[derive(Debug, Clone)]
pub struct WeightedSampler<T> {
    entries: Vec<(f64, T)>,
}

impl<T> WeightedSampler<T> {
    /// Create an empty sampler
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Create a sampler from an ordered list of `(probability, value)` pairs
    pub fn with_entries(entries: Vec<(f64, T)>) -> Self {
        Self { entries }
    }

    /// Register one more `(probability, value)` pair
    ///
    /// Entries with zero probability are kept; they simply never win a draw.
    pub fn register(&mut self, probability: f64, value: T) {
        self.entries.push((probability, value));
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries have been registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all registered probabilities
    pub fn total_mass(&self) -> f64 {
        self.entries.iter().map(|(p, _)| p).sum()
    }

    /// Remove all entries, keeping the allocation
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Draw one value according to the registered probabilities
    ///
    /// Fails with [`SimulationError::DistributionError`] when the draw falls
    /// through every entry and the total mass is short of 1, which indicates
    /// a mis-specified distribution rather than bad luck.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SimulationResult<&T> {
        if self.entries.is_empty() {
            return Err(SimulationError::DistributionError(
                "cannot sample from an empty distribution".into(),
            ));
        }

        let draw: f64 = rng.gen();
        let mut cumulative = 0.0;
        for (probability, value) in &self.entries {
            cumulative += probability;
            if draw < cumulative {
                return Ok(value);
            }
        }

        // A normalized table can still lose a few ulps to summation order.
        if cumulative >= 1.0 - MASS_TOLERANCE {
            let (_, value) = self.entries.last().expect("entries checked non-empty");
            return Ok(value);
        }

        Err(SimulationError::DistributionError(format!(
            "draw {draw:.6} fell through distribution with total mass {cumulative:.6}"
        )))
    }
}

impl<T> Default for WeightedSampler<T> {
    fn default() -> Self {
        Self::new()
    }
}
