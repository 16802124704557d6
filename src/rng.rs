// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dotcom Bubble Simulation ("Bubble Sim") - Random Sources
//
// Every stochastic step of the engine draws through `RandomSource`, so a run is
// fully determined by its seed and tests can pin individual draws.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform value in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_unit() * (hi - lo)
    }

    /// Bernoulli trial that succeeds with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }

    /// Uniform integer in the inclusive range `[lo, hi]`.
    fn pick(&mut self, lo: u32, hi: u32) -> u32 {
        let span = (hi - lo + 1) as f64;
        let offset = (self.next_unit() * span).floor() as u32;
        lo + offset.min(hi - lo)
    }
}

// ─── Seeded source ──────────────────────────────────────────────────────────

/// ChaCha8-backed source. Same seed, same run.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

// ─── Scripted source (tests, replays) ───────────────────────────────────────

/// Replays a fixed list of draws, cycling when exhausted.
///
/// `ScriptedRandom::constant(0.5)` turns every `uniform(lo, hi)` into the
/// midpoint of its interval.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.5] } else { values };
        Self { values, cursor: 0 }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws served so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
