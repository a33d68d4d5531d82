use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngExt, SeedableRng};
use std::f64::consts::TAU;

/// Deterministic random stream threaded through every schedule and game call.
///
/// The same seed and the same sequence of calls always produce the same values,
/// so the caller owns reproducibility by owning the call order.
#[derive(Debug)]
pub struct SimRng {
    inner: StdRng,
}

impl SimRng {
    pub fn seed_from(seed: u64) -> Self {
        SimRng {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform value in [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    /// Uniform integer in [low, high], both ends inclusive
    pub fn range_i32(&mut self, low: i32, high: i32) -> i32 {
        if low >= high {
            return low;
        }
        self.inner.random_range(low..=high)
    }

    /// Uniform index in [0, len)
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.inner.random_range(0..len)
    }

    pub fn range_f64(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Box-Muller transform, one normal draw per call
    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();

        let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();

        mean + z * std_dev
    }

    /// Picks an index with probability proportional to its weight.
    /// Non-positive weights are never picked; `None` when nothing is pickable.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut roll = self.next_f64() * total;
        let mut last_positive = None;

        for (idx, weight) in weights.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            if roll < *weight {
                return Some(idx);
            }
            roll -= weight;
            last_positive = Some(idx);
        }

        last_positive
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
