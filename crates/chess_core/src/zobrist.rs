//! Zobrist keys for position fingerprinting.
//!
//! A position's hash is the XOR of:
//! - one key per occupied (color, piece kind, square)
//! - one key for the current castling-rights combination (16 possible)
//! - one key for the en-passant file, when an en-passant square is set
//! - one key when Black is to move
//!
//! Every term is its own inverse under XOR, so make/undo can maintain the
//! hash incrementally. [`crate::Position::compute_hash`] is the from-scratch
//! reference the incremental value must always equal.

use crate::types::{CastlingRights, Color, Piece};

pub struct ZobristKeys {
    /// Indexed by [color][piece_kind][square]
    pub pieces: [[[u64; 64]; 6]; 2],
    pub side_to_move: u64,
    /// One key per castling-rights combination, indexed by the 4-bit mask.
    pub castling: [u64; 16],
    pub en_passant: [u64; 8],
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile-time xorshift64 stream with a fixed seed.
#[derive(Clone, Copy)]
struct KeyStream(u64);

impl KeyStream {
    const fn next(mut self) -> (Self, u64) {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        let key = self.0;
        (self, key)
    }
}

impl ZobristKeys {
    pub const fn new() -> Self {
        let mut stream = KeyStream(0x9E37_79B9_7F4A_7C15);
        let mut key;

        let mut pieces = [[[0u64; 64]; 6]; 2];
        let mut color = 0;
        while color < 2 {
            let mut kind = 0;
            while kind < 6 {
                let mut sq = 0;
                while sq < 64 {
                    (stream, key) = stream.next();
                    pieces[color][kind][sq] = key;
                    sq += 1;
                }
                kind += 1;
            }
            color += 1;
        }

        (stream, key) = stream.next();
        let side_to_move = key;

        // Combination 0 (no rights) still gets a key; it is XORed in like
        // any other so the hash of "no castling" is not special-cased.
        let mut castling = [0u64; 16];
        let mut i = 0;
        while i < 16 {
            (stream, key) = stream.next();
            castling[i] = key;
            i += 1;
        }

        let mut en_passant = [0u64; 8];
        let mut i = 0;
        while i < 8 {
            (stream, key) = stream.next();
            en_passant[i] = key;
            i += 1;
        }

        ZobristKeys {
            pieces,
            side_to_move,
            castling,
            en_passant,
        }
    }

    #[inline(always)]
    pub fn piece_key(&self, piece: Piece, sq: u8) -> u64 {
        self.pieces[piece.color.idx()][piece.kind.idx()][sq as usize]
    }

    #[inline(always)]
    pub fn castling_key(&self, rights: CastlingRights) -> u64 {
        self.castling[rights.index()]
    }

    /// Key for an en-passant target square; only its file matters.
    #[inline(always)]
    pub fn ep_key(&self, ep_square: u8) -> u64 {
        self.en_passant[(ep_square % 8) as usize]
    }

    #[inline(always)]
    pub fn side_key(&self, side: Color) -> u64 {
        match side {
            Color::White => 0,
            Color::Black => self.side_to_move,
        }
    }
}

/// Global static Zobrist keys, computed at compile time.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
