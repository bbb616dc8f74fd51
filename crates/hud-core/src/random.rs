//! Injectable uniform random source.
//!
//! The spike term, band noise, particle speeds and the glitch timer all draw
//! from a `RandomSource` so tests can pin or script every draw.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }
}

/// Production source. Quality does not matter here, only speed.
pub struct UniformRandom {
    rng: SmallRng,
}

impl UniformRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for UniformRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Always returns the same value. `FixedRandom(0.5)` never spikes and never
/// glitches; `FixedRandom(0.0)` always does.
#[derive(Clone, Copy, Debug)]
pub struct FixedRandom(pub f32);

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f32 {
        self.0.clamp(0.0, 0.999_999)
    }
}

/// Replays a list of draws, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    draws: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(draws: Vec<f32>) -> Self {
        Self { draws, cursor: 0 }
    }

    /// Number of values consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        if self.draws.is_empty() {
            return 0.5;
        }
        let v = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        v.clamp(0.0, 0.999_999)
    }
}
