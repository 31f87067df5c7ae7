//! Zobrist hashing for Arimaa positions.
//!
//! The hash is updated incrementally as steps are applied, which keeps the
//! duplicate detection in full-turn move generation cheap.
//!
//! The hash is computed by XOR-ing together random values for:
//! - Each piece on each square (12 pieces × 64 squares = 768 values)
//! - Side to move (1 value)
//! - Steps left in the current turn (5 values, indexed 0..=4)

use crate::types::Piece;

/// Pre-computed random values for Zobrist hashing.
pub struct ZobristKeys {
    /// Indexed by [color][piece_kind][square]
    pub pieces: [[[u64; 64]; 6]; 2],
    /// XOR-ed in when silver is to move
    pub side_to_move: u64,
    pub steps_left: [u64; 5],
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl ZobristKeys {
    /// Generate keys with xorshift64 from a fixed seed.
    pub const fn new() -> Self {
        const fn xorshift64(mut state: u64) -> u64 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        }

        let mut state = 0x0A21_AA5E_ED5E_7A11u64;

        let mut pieces = [[[0u64; 64]; 6]; 2];
        let mut color = 0;
        while color < 2 {
            let mut piece = 0;
            while piece < 6 {
                let mut sq = 0;
                while sq < 64 {
                    state = xorshift64(state);
                    pieces[color][piece][sq] = state;
                    sq += 1;
                }
                piece += 1;
            }
            color += 1;
        }

        state = xorshift64(state);
        let side_to_move = state;

        let mut steps_left = [0u64; 5];
        let mut i = 0;
        while i < 5 {
            state = xorshift64(state);
            steps_left[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            side_to_move,
            steps_left,
        }
    }

    #[inline(always)]
    pub fn piece_key(&self, piece: Piece, sq: u8) -> u64 {
        self.pieces[piece.color.idx()][piece.kind.idx()][sq as usize]
    }

    #[inline(always)]
    pub fn steps_key(&self, steps_left: u8) -> u64 {
        self.steps_left[(steps_left as usize).min(4)]
    }
}

/// Global static Zobrist keys, computed at compile time.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
