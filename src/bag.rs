//! 7-bag randomizer for piece generation
//!
//! All 7 pieces are shuffled, then dealt out one by one; the bag is
//! reshuffled the moment the last one is dealt. Each draw is a brand new
//! `Piece` with its own shape matrix.

use crate::piece::Piece;
use crate::tetromino::TetrominoType;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The 7-bag piece randomizer
#[derive(Debug, Clone)]
pub struct Bag {
    order: [TetrominoType; 7],
    /// Index of the next kind to deal
    cursor: usize,
    rng: ChaCha8Rng,
}

impl Bag {
    /// Deterministic bag for replays and tests
    pub fn with_seed(seed: u64) -> Self {
        let mut bag = Self {
            order: TetrominoType::all(),
            cursor: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        bag.refill();
        bag
    }

    /// Deal the next piece
    pub fn next(&mut self) -> Piece {
        let kind = self.order[self.cursor];
        self.cursor += 1;
        if self.cursor == self.order.len() {
            self.refill();
        }
        Piece::new(kind)
    }

    /// Kinds left in the current bag, in dealing order
    pub fn preview(&self) -> &[TetrominoType] {
        &self.order[self.cursor..]
    }

    /// Reshuffle (Fisher-Yates) and rewind
    fn refill(&mut self) {
        self.order.shuffle(&mut self.rng);
        self.cursor = 0;
    }
}
