//! Deterministic random number generation for the demo dataset.
//!
//! RULE: demo data never touches a platform RNG. Every table gets its own
//! stream derived from (seed XOR table_index), so adding a table never
//! shifts the values generated for the others.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct DemoRng {
    inner: Pcg64Mcg,
}

impl DemoRng {
    /// `stream` must stay fixed once assigned to a table.
    pub fn new(seed: u64, stream: u64) -> Self {
        let derived = seed ^ stream.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform float in [lo, hi).
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Bernoulli trial: true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Simplified Pareto sample; heavy tail for skewed state volumes.
    pub fn pareto(&mut self, x_min: f64, alpha: f64) -> f64 {
        let u = self.next_f64().max(1e-10);
        x_min * u.powf(-1.0 / alpha)
    }
}
