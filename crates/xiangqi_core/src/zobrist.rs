//! Zobrist hashing for Xiangqi positions.
//!
//! The hash is the XOR of one random key per occupied (square, piece) pair,
//! so make/unmake update it in O(1). The side to move is not part of the
//! running hash; [`ZobristKeys::side_key`] is folded in when a position is
//! used as a transposition key.
//!
//! Keys come from a seeded `StdRng`, so every run of the engine agrees on
//! the hash of a position.

use std::sync::LazyLock;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::types::{NUM_SQUARES, Piece, Side, Square};

const SEED: u64 = 0x5851_F42D_4C95_7F2D;

pub struct ZobristKeys {
    /// Indexed by [side][piece_kind][square].
    pieces: [[[u64; NUM_SQUARES]; 7]; 2],
    /// XORed in when Black is to move.
    black_to_move: u64,
}

impl ZobristKeys {
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pieces = [[[0u64; NUM_SQUARES]; 7]; 2];
        for side in pieces.iter_mut() {
            for kind in side.iter_mut() {
                for key in kind.iter_mut() {
                    *key = rng.next_u64();
                }
            }
        }
        let black_to_move = rng.next_u64();
        Self {
            pieces,
            black_to_move,
        }
    }

    #[inline(always)]
    pub fn piece_key(&self, piece: Piece, sq: Square) -> u64 {
        self.pieces[piece.side.idx()][piece.kind.idx()][sq.index()]
    }

    #[inline(always)]
    pub fn side_key(&self, side: Side) -> u64 {
        match side {
            Side::Red => 0,
            Side::Black => self.black_to_move,
        }
    }

    #[cfg(test)]
    pub(crate) fn all_keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.pieces
            .iter()
            .flat_map(|side| side.iter())
            .flat_map(|kind| kind.iter().copied())
            .chain(std::iter::once(self.black_to_move))
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::with_seed(SEED)
    }
}

/// Process-wide keys, built on first use.
pub static ZOBRIST: LazyLock<ZobristKeys> = LazyLock::new(ZobristKeys::default);

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
