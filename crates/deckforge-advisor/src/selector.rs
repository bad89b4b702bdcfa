//! Strategies for picking one candidate among several.
//!
//! Production uses [`RandomSelector`]; tests inject [`FixedSelector`] or
//! [`SeededSelector`] so recommendation output is reproducible.

use std::sync::Mutex;

use rand::{Rng as _, SeedableRng as _, rngs::StdRng};

pub trait CandidateSelector: Send + Sync {
  /// Choose an index in `0..len`. Never called with `len == 0`.
  fn choose(&self, len: usize) -> usize;
}

/// Pick one element of `candidates` with `selector`.
pub fn pick<'a, T>(selector: &dyn CandidateSelector, candidates: &'a [T]) -> Option<&'a T> {
  if candidates.is_empty() {
    return None;
  }
  // Out-of-range answers wrap instead of panicking.
  candidates.get(selector.choose(candidates.len()) % candidates.len())
}

/// Uniformly random choice from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl CandidateSelector for RandomSelector {
  fn choose(&self, len: usize) -> usize { rand::thread_rng().gen_range(0..len) }
}

/// Always the `n`-th candidate, wrapping around.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSelector(pub usize);

impl CandidateSelector for FixedSelector {
  fn choose(&self, len: usize) -> usize { self.0 % len }
}

/// Random but reproducible: the same seed yields the same sequence of picks.
#[derive(Debug)]
pub struct SeededSelector {
  rng: Mutex<StdRng>,
}

impl SeededSelector {
  pub fn new(seed: u64) -> Self {
    Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
  }
}

impl CandidateSelector for SeededSelector {
  fn choose(&self, len: usize) -> usize {
    // A poisoned lock still holds a usable RNG.
    let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
    rng.gen_range(0..len)
  }
}
