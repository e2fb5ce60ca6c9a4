//! Deterministic simulation RNG.
//!
//! All randomness in the engine (departure draws, exit selection) goes
//! through one `SimRng` seeded from `SimConfig::seed`.  The engine is stepped
//! single-threaded, so the draw order and therefore every run is reproducible
//! for a given seed.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG.
///
/// Used only from the thread that owns the engine.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniformly chosen element, `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }
}
