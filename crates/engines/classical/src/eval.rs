//! Static evaluation: material, piece-square tables, pawn structure, slider
//! mobility and king safety.
//!
//! Scores are centipawns from White's point of view. The search converts
//! them to the side to move with [`evaluate_relative`].

use chess_core::{
    Bitboard, Color, PieceKind, Position, bishop_attacks, king_attacks, queen_attacks,
    rook_attacks,
};

/// Material values, indexed by `PieceKind::idx()`.
pub const PIECE_VALUES: [i32; 6] = [100, 300, 350, 500, 1000, 10000];

pub const DOUBLED_PAWN_PENALTY: i32 = -20;
pub const ISOLATED_PAWN_PENALTY: i32 = -20;
pub const SEMI_OPEN_FILE_SCORE: i32 = 10;
pub const OPEN_FILE_SCORE: i32 = 20;
pub const KING_SHIELD_BONUS: i32 = 5;
pub const MOBILITY_BONUS: i32 = 1;

/// Indexed by how many ranks the pawn has advanced from its own back rank.
pub const PASSED_PAWN_BONUS: [i32; 8] = [0, 10, 30, 50, 75, 100, 150, 200];

// Piece-square tables are laid out as seen from White's side of the board,
// eighth rank first. A white piece on `sq` reads `table[sq ^ 56]`, a black
// piece reads `table[sq]`.

#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     90,  90,  90,  90,  90,  90,  90,  90,
     30,  30,  30,  40,  40,  30,  30,  30,
     20,  20,  20,  30,  30,  30,  20,  20,
     10,  10,  10,  20,  20,  10,  10,  10,
      5,   5,  10,  20,  20,   5,   5,   5,
      0,   0,   0,   5,   5,   0,   0,   0,
      0,   0,   0, -10, -10,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,  10,  10,   0,   0,  -5,
     -5,   5,  20,  20,  20,  20,   5,  -5,
     -5,  10,  20,  30,  30,  20,  10,  -5,
     -5,  10,  20,  30,  30,  20,  10,  -5,
     -5,   5,  20,  10,  10,  20,   5,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5, -10,   0,   0,   0,   0, -10,  -5,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,  10,  10,   0,   0,   0,
      0,   0,  10,  20,  20,  10,   0,   0,
      0,   0,  10,  20,  20,  10,   0,   0,
      0,  10,   0,   0,   0,   0,  10,   0,
      0,  30,   0,   0,   0,   0,  30,   0,
      0,   0, -10,   0,   0, -10,   0,   0,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     50,  50,  50,  50,  50,  50,  50,  50,
     50,  50,  50,  50,  50,  50,  50,  50,
      0,   0,  10,  20,  20,  10,   0,   0,
      0,   0,  10,  20,  20,  10,   0,   0,
      0,   0,  10,  20,  20,  10,   0,   0,
      0,   0,  10,  20,  20,  10,   0,   0,
      0,   0,  10,  20,  20,  10,   0,   0,
      0,   0,   0,  20,  20,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
     -5,   0,   5,   5,   5,   5,   0,  -5,
      0,   0,   5,   5,   5,   5,   0,  -5,
    -10,   5,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   5,   5,   5,   5,   0,   0,
      0,   5,   5,  10,  10,   5,   5,   0,
      0,   5,  10,  20,  20,  10,   5,   0,
      0,   5,  10,  20,  20,  10,   5,   0,
      0,   0,   5,  10,  10,   5,   0,   0,
      0,   5,   5,  -5,  -5,   0,   5,   0,
      0,   0,   5,   0, -15,   0,  10,   0,
];

const PIECE_TABLES: [&[i32; 64]; 6] = [
    &PAWN_TABLE,
    &KNIGHT_TABLE,
    &BISHOP_TABLE,
    &ROOK_TABLE,
    &QUEEN_TABLE,
    &KING_TABLE,
];

/// Piece-square bonus for a piece of `color` and `kind` standing on `sq`.
#[inline]
pub fn square_bonus(color: Color, kind: PieceKind, sq: u8) -> i32 {
    let idx = match color {
        Color::White => sq ^ 56,
        Color::Black => sq,
    };
    PIECE_TABLES[kind.idx()][idx as usize]
}

/// Files to either side of each file.
const ADJACENT_FILES: [Bitboard; 8] = {
    let mut masks = [Bitboard::EMPTY; 8];
    let mut file = 0;
    while file < 8 {
        let mut m = 0u64;
        if file > 0 {
            m |= Bitboard::FILE_A.0 << (file - 1);
        }
        if file < 7 {
            m |= Bitboard::FILE_A.0 << (file + 1);
        }
        masks[file] = Bitboard(m);
        file += 1;
    }
    masks
};

/// Squares that must be free of enemy pawns for a pawn on `[color][sq]` to
/// be passed: its own and both adjacent files, strictly ahead of it.
static PASSED_MASKS: [[Bitboard; 64]; 2] = {
    let mut masks = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0;
    while sq < 64 {
        let file = sq % 8;
        let rank = sq / 8;
        let span = Bitboard::FILE_A.0 << file | ADJACENT_FILES[file].0;
        let mut ahead_white = 0u64;
        let mut ahead_black = 0u64;
        let mut r = 0;
        while r < 8 {
            let rank_bits = 0xFFu64 << (r * 8);
            if r > rank {
                ahead_white |= rank_bits;
            }
            if r < rank {
                ahead_black |= rank_bits;
            }
            r += 1;
        }
        masks[0][sq] = Bitboard(span & ahead_white);
        masks[1][sq] = Bitboard(span & ahead_black);
        sq += 1;
    }
    masks
};

/// Evaluate `pos` from White's point of view.
pub fn evaluate(pos: &Position) -> i32 {
    let mut score = 0;
    for color in Color::ALL {
        let side = material_and_tables(pos, color)
            + pawn_structure(pos, color)
            + rook_files(pos, color)
            + mobility(pos, color)
            + king_safety(pos, color);
        score += color.sign() * side;
    }
    score
}

/// Evaluate `pos` from the side to move's point of view.
#[inline]
pub fn evaluate_relative(pos: &Position) -> i32 {
    pos.side_to_move().sign() * evaluate(pos)
}

fn material_and_tables(pos: &Position, color: Color) -> i32 {
    let mut score = 0;
    for kind in PieceKind::ALL {
        for sq in pos.pieces(color, kind) {
            score += PIECE_VALUES[kind.idx()] + square_bonus(color, kind, sq);
        }
    }
    score
}

fn pawn_structure(pos: &Position, color: Color) -> i32 {
    let own = pos.pieces(color, PieceKind::Pawn);
    let enemy = pos.pieces(color.other(), PieceKind::Pawn);
    let mut score = 0;

    for file in 0..8u8 {
        let on_file = (own & Bitboard::file(file)).popcount() as i32;
        if on_file > 1 {
            score += DOUBLED_PAWN_PENALTY * (on_file - 1);
        }
    }

    for sq in own {
        let file = (sq % 8) as usize;
        if (own & ADJACENT_FILES[file]).is_empty() {
            score += ISOLATED_PAWN_PENALTY;
        }
        if (enemy & PASSED_MASKS[color.idx()][sq as usize]).is_empty() {
            let advanced = match color {
                Color::White => sq / 8,
                Color::Black => 7 - sq / 8,
            };
            score += PASSED_PAWN_BONUS[advanced as usize];
        }
    }
    score
}

fn rook_files(pos: &Position, color: Color) -> i32 {
    let own_pawns = pos.pieces(color, PieceKind::Pawn);
    let all_pawns = own_pawns | pos.pieces(color.other(), PieceKind::Pawn);
    let mut score = 0;
    for sq in pos.pieces(color, PieceKind::Rook) {
        let file = Bitboard::file(sq % 8);
        if (all_pawns & file).is_empty() {
            score += OPEN_FILE_SCORE;
        } else if (own_pawns & file).is_empty() {
            score += SEMI_OPEN_FILE_SCORE;
        }
    }
    score
}

/// One point per square a bishop, rook or queen attacks that is not blocked
/// by a friendly piece.
fn mobility(pos: &Position, color: Color) -> i32 {
    let occupied = pos.occupied();
    let free = !pos.occupancy(color);
    let mut squares = 0;
    for sq in pos.pieces(color, PieceKind::Bishop) {
        squares += (bishop_attacks(sq, occupied) & free).popcount();
    }
    for sq in pos.pieces(color, PieceKind::Rook) {
        squares += (rook_attacks(sq, occupied) & free).popcount();
    }
    for sq in pos.pieces(color, PieceKind::Queen) {
        squares += (queen_attacks(sq, occupied) & free).popcount();
    }
    squares as i32 * MOBILITY_BONUS
}

/// Penalise open and semi-open files on and beside the king; reward pawns
/// standing next to it.
fn king_safety(pos: &Position, color: Color) -> i32 {
    let king = pos.find_king(color);
    let own_pawns = pos.pieces(color, PieceKind::Pawn);
    let all_pawns = own_pawns | pos.pieces(color.other(), PieceKind::Pawn);
    let king_file = (king % 8) as usize;

    let mut score = 0;
    let files = Bitboard::file(king_file as u8) | ADJACENT_FILES[king_file];
    for file in 0..8u8 {
        let mask = Bitboard::file(file);
        if (files & mask).is_empty() {
            continue;
        }
        if (all_pawns & mask).is_empty() {
            score -= OPEN_FILE_SCORE;
        } else if (own_pawns & mask).is_empty() {
            score -= SEMI_OPEN_FILE_SCORE;
        }
    }

    let shield = (king_attacks(king) & own_pawns).popcount() as i32;
    score + shield * KING_SHIELD_BONUS
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
