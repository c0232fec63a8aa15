//! RNG module - upcoming pair generation
//!
//! Pairs are drawn uniformly from the first `colors` entries of
//! [`PuyoType::ALL`]. The queue always holds [`NEXT_COUNT`] pairs; the head is
//! the pair the next spawn takes, and the whole queue is the preview.
//!
//! Also provides a simple LCG for deterministic testing.

use arrayvec::ArrayVec;

use crate::collab::PieceQueue;
use crate::types::{PuyoPair, PuyoType, NEXT_COUNT};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 16) % max.max(1)
    }
}

/// Queue of the next [`NEXT_COUNT`] pairs.
#[derive(Debug, Clone)]
pub struct NextQueue {
    pairs: ArrayVec<PuyoPair, NEXT_COUNT>,
    colors: u8,
    seed: u32,
    rng: SimpleRng,
}

impl NextQueue {
    /// Create an empty queue; call [`PieceQueue::initialize`] before drawing.
    ///
    /// `colors` is clamped to `1..=5`.
    pub fn new(seed: u32, colors: u8) -> Self {
        Self {
            pairs: ArrayVec::new(),
            colors: colors.clamp(1, PuyoType::ALL.len() as u8),
            seed,
            rng: SimpleRng::new(seed),
        }
    }

    pub fn colors(&self) -> u8 {
        self.colors
    }

    /// The seed this queue was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Upcoming pairs without consuming, head first
    pub fn peek(&self) -> &[PuyoPair] {
        &self.pairs
    }

    fn random_type(&mut self) -> PuyoType {
        let i = self.rng.next_range(self.colors as u32) as usize;
        PuyoType::ALL[i]
    }

    fn random_pair(&mut self) -> PuyoPair {
        let axis = self.random_type();
        let child = self.random_type();
        PuyoPair::new(axis, child)
    }

    fn fill(&mut self) {
        while !self.pairs.is_full() {
            let pair = self.random_pair();
            self.pairs.push(pair);
        }
    }
}

impl Default for NextQueue {
    fn default() -> Self {
        Self::new(1, 4)
    }
}

impl PieceQueue for NextQueue {
    fn initialize(&mut self) {
        self.rng = SimpleRng::new(self.seed);
        self.pairs.clear();
        self.fill();
    }

    fn next_pair(&mut self) -> PuyoPair {
        self.fill();
        let head = self.pairs.remove(0);
        self.fill();
        head
    }

    fn for_each(&self, visitor: &mut dyn FnMut(usize, PuyoPair)) {
        for (i, pair) in self.peek().iter().enumerate() {
            visitor(i, *pair);
        }
    }
}
