//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests, a seeded or scripted
//! implementation is injected so that sampling is repeatable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Generate a random `f64` in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;
}

/// `DeterministicRng` backed by `StdRng`.
#[derive(Debug)]
pub struct SeededRng(StdRng);

impl SeededRng {
    /// A reproducible generator.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// A generator seeded from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl DeterministicRng for SeededRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.0.random_range(min..=max)
    }

    fn next_f64(&mut self) -> f64 {
        self.0.random()
    }
}

/// Picks `amount` distinct indices out of `0..len` with a partial
/// Fisher-Yates shuffle. Returns fewer than `amount` only when `len` is
/// smaller.
pub fn choose_indices(rng: &mut dyn DeterministicRng, len: usize, amount: usize) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..len).collect();
    let take = amount.min(len);
    for i in 0..take {
        let last = u32::try_from(len - 1).unwrap_or(u32::MAX);
        let lower = u32::try_from(i).unwrap_or(u32::MAX);
        let j = rng.next_u32_range(lower, last) as usize;
        pool.swap(i, j.clamp(i, len - 1));
    }
    pool.truncate(take);
    pool
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_choose_indices_returns_distinct_indices() {
        let mut rng = SeededRng::from_seed(7);

        let picked = choose_indices(&mut rng, 20, 8);

        assert_eq!(picked.len(), 8);
        let unique: HashSet<usize> = picked.iter().copied().collect();
        assert_eq!(unique.len(), 8);
        assert!(picked.iter().all(|&i| i < 20));
    }

    #[test]
    fn test_choose_indices_caps_at_pool_size() {
        let mut rng = SeededRng::from_seed(7);

        let picked = choose_indices(&mut rng, 3, 10);

        let mut sorted = picked.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }

    #[test]
    fn test_choose_indices_on_empty_pool_is_empty() {
        let mut rng = SeededRng::from_seed(7);
        assert!(choose_indices(&mut rng, 0, 4).is_empty());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = SeededRng::from_seed(42);
        let mut b = SeededRng::from_seed(42);

        let left: Vec<u32> = (0..5).map(|_| a.next_u32_range(0, 100)).collect();
        let right: Vec<u32> = (0..5).map(|_| b.next_u32_range(0, 100)).collect();

        assert_eq!(left, right);
    }
}
