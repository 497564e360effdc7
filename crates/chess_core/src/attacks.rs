//! Pre-computed attack tables for fast move generation and attack detection.
//!
//! This module contains:
//! - Knight and king attack tables (constant)
//! - Pawn capture tables (constant, per color)
//! - Sliding piece attacks backed by magic bitboards (see [`crate::magic`])
//! - Slow ray-walking slider attacks, used to fill and verify the magic tables

use crate::bitboard::Bitboard;
use crate::magic::SLIDERS;
use crate::types::Color;

/// Builds a per-square leaper table from (shift, exclusion mask) pairs.
/// Positive shifts move towards h8, negative towards a1.
const fn leaper_table(steps: &[(i8, u64)]) -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let bb = 1u64 << sq;
        let mut result = 0u64;
        let mut i = 0;
        while i < steps.len() {
            let (shift, keep) = steps[i];
            let moved = if shift >= 0 {
                bb << (shift as u32)
            } else {
                bb >> ((-shift) as u32)
            };
            result |= moved & keep;
            i += 1;
        }
        attacks[sq] = Bitboard(result);
        sq += 1;
    }
    attacks
}

const ANY: u64 = !0;

/// Pre-computed knight attacks for each square.
pub static KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&[
    (17, Bitboard::NOT_FILE_A.0),  // up 2, right 1
    (15, Bitboard::NOT_FILE_H.0),  // up 2, left 1
    (10, Bitboard::NOT_FILE_AB.0), // up 1, right 2
    (6, Bitboard::NOT_FILE_GH.0),  // up 1, left 2
    (-6, Bitboard::NOT_FILE_AB.0), // down 1, right 2
    (-10, Bitboard::NOT_FILE_GH.0), // down 1, left 2
    (-15, Bitboard::NOT_FILE_A.0), // down 2, right 1
    (-17, Bitboard::NOT_FILE_H.0), // down 2, left 1
]);

/// Pre-computed king attacks for each square.
pub static KING_ATTACKS: [Bitboard; 64] = leaper_table(&[
    (8, ANY),
    (-8, ANY),
    (1, Bitboard::NOT_FILE_A.0),
    (-1, Bitboard::NOT_FILE_H.0),
    (9, Bitboard::NOT_FILE_A.0),
    (7, Bitboard::NOT_FILE_H.0),
    (-7, Bitboard::NOT_FILE_A.0),
    (-9, Bitboard::NOT_FILE_H.0),
]);

/// Squares a pawn on each square captures on, indexed `[color][square]`.
pub static PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table(&[(9, Bitboard::NOT_FILE_A.0), (7, Bitboard::NOT_FILE_H.0)]),
    leaper_table(&[(-7, Bitboard::NOT_FILE_A.0), (-9, Bitboard::NOT_FILE_H.0)]),
];

/// Get pawn capture targets for a pawn of `color` standing on `sq`.
#[inline(always)]
pub fn pawn_attacks(sq: u8, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.idx()][sq as usize]
}

/// Get knight attacks for a given square.
#[inline(always)]
pub fn knight_attacks(sq: u8) -> Bitboard {
    KNIGHT_ATTACKS[sq as usize]
}

/// Get king attacks for a given square.
#[inline(always)]
pub fn king_attacks(sq: u8) -> Bitboard {
    KING_ATTACKS[sq as usize]
}

/// Bishop attacks from `sq` given the board occupancy. O(1) magic lookup.
#[inline(always)]
pub fn bishop_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    SLIDERS.bishop(sq, occupied)
}

/// Rook attacks from `sq` given the board occupancy. O(1) magic lookup.
#[inline(always)]
pub fn rook_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    SLIDERS.rook(sq, occupied)
}

/// Queen attacks (union of bishop and rook attacks).
#[inline(always)]
pub fn queen_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

// =============================================================================
// Slow slider attacks (table construction and verification only)
// =============================================================================

pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Walk each ray from `sq` until it leaves the board or hits an occupied
/// square (the blocker itself is included).
fn sliding_attacks_slow(sq: u8, occupied: Bitboard, directions: &[(i8, i8)]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    let file = (sq % 8) as i8;
    let rank = (sq / 8) as i8;
    for &(df, dr) in directions {
        let (mut f, mut r) = (file + df, rank + dr);
        while (0..8).contains(&f) && (0..8).contains(&r) {
            let target = (r * 8 + f) as u8;
            attacks.set(target);
            if occupied.contains(target) {
                break;
            }
            f += df;
            r += dr;
        }
    }
    attacks
}

pub fn bishop_attacks_slow(sq: u8, occupied: Bitboard) -> Bitboard {
    sliding_attacks_slow(sq, occupied, &BISHOP_DIRECTIONS)
}

pub fn rook_attacks_slow(sq: u8, occupied: Bitboard) -> Bitboard {
    sliding_attacks_slow(sq, occupied, &ROOK_DIRECTIONS)
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
