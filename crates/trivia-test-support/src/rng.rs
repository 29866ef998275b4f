//! Test RNGs.

use trivia_core::rng::DeterministicRng;

/// Always answers the lower bound, so index sampling keeps the natural
/// order of its input.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// Replays a fixed sequence, clamped into the requested range.
///
/// # Panics
///
/// `next_u32_range` panics once the sequence is exhausted.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// Creates an RNG replaying `values`.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        let value = self.values[self.index];
        self.index += 1;
        value.clamp(min, max)
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}
