//! Pseudo-legal move generation from the attack tables, plus the
//! make/test/undo legality filter.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::Position;
use crate::types::*;

/// Which moves to generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenType {
    All,
    /// Captures only: ordinary captures, en passant and capturing promotions.
    Captures,
}

struct CastleSpec {
    right: u8,
    king_from: u8,
    king_to: u8,
    rook_from: u8,
    rook_to: u8,
    /// Squares that must be empty.
    between: Bitboard,
    /// Start, transit and destination of the king; none may be attacked.
    king_path: [u8; 3],
}

const CASTLES: [[CastleSpec; 2]; 2] = [
    [
        CastleSpec {
            right: CastlingRights::WHITE_KING,
            king_from: 4,
            king_to: 6,
            rook_from: 7,
            rook_to: 5,
            between: Bitboard((1 << 5) | (1 << 6)),
            king_path: [4, 5, 6],
        },
        CastleSpec {
            right: CastlingRights::WHITE_QUEEN,
            king_from: 4,
            king_to: 2,
            rook_from: 0,
            rook_to: 3,
            between: Bitboard((1 << 1) | (1 << 2) | (1 << 3)),
            king_path: [4, 3, 2],
        },
    ],
    [
        CastleSpec {
            right: CastlingRights::BLACK_KING,
            king_from: 60,
            king_to: 62,
            rook_from: 63,
            rook_to: 61,
            between: Bitboard((1 << 61) | (1 << 62)),
            king_path: [60, 61, 62],
        },
        CastleSpec {
            right: CastlingRights::BLACK_QUEEN,
            king_from: 60,
            king_to: 58,
            rook_from: 56,
            rook_to: 59,
            between: Bitboard((1 << 57) | (1 << 58) | (1 << 59)),
            king_path: [60, 59, 58],
        },
    ],
];

/// Generate all legal moves, returning a freshly allocated vector.
/// Internally delegates to `legal_moves_into`, cloning the position only once.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
pub fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    generate_legal(pos, GenType::All, out);
}

/// Legal captures only, for quiescence search.
pub fn legal_captures_into(pos: &mut Position, out: &mut Vec<Move>) {
    generate_legal(pos, GenType::Captures, out);
}

fn generate_legal(pos: &mut Position, gen_type: GenType, out: &mut Vec<Move>) {
    out.clear();
    pseudo_legal_moves(pos, gen_type, out);
    // Filter illegal moves in-place by playing them on the mutable position.
    out.retain(|&mv| is_legal(pos, mv));
}

/// Does the side to move have any legal move? Stops at the first one.
pub fn has_legal_move(pos: &mut Position) -> bool {
    let mut moves = Vec::with_capacity(64);
    pseudo_legal_moves(pos, GenType::All, &mut moves);
    moves.into_iter().any(|mv| is_legal(pos, mv))
}

/// Play `mv` and report whether the mover's king is safe afterwards.
/// `mv` must be pseudo-legal.
pub fn is_legal(pos: &mut Position, mv: Move) -> bool {
    let mover = pos.side_to_move();
    pos.make_move(mv);
    let legal = !pos.in_check(mover);
    pos.undo_move();
    legal
}

/// Append pseudo-legal moves for the side to move. Moves may leave the
/// mover's own king in check; castling is already fully checked.
pub fn pseudo_legal_moves(pos: &Position, gen_type: GenType, out: &mut Vec<Move>) {
    let us = pos.side_to_move();
    let occupied = pos.occupied();
    let targets = match gen_type {
        GenType::All => !pos.occupancy(us),
        GenType::Captures => pos.occupancy(us.other()),
    };

    gen_pawns(pos, us, gen_type, out);
    for from in pos.pieces(us, PieceKind::Knight) {
        push_all(from, knight_attacks(from) & targets, out);
    }
    for from in pos.pieces(us, PieceKind::Bishop) {
        push_all(from, bishop_attacks(from, occupied) & targets, out);
    }
    for from in pos.pieces(us, PieceKind::Rook) {
        push_all(from, rook_attacks(from, occupied) & targets, out);
    }
    for from in pos.pieces(us, PieceKind::Queen) {
        push_all(from, queen_attacks(from, occupied) & targets, out);
    }
    for from in pos.pieces(us, PieceKind::King) {
        push_all(from, king_attacks(from) & targets, out);
    }
    if gen_type == GenType::All {
        gen_castles(pos, us, out);
    }
}

#[inline(always)]
fn push_all(from: u8, targets: Bitboard, out: &mut Vec<Move>) {
    out.extend(targets.map(|to| Move::new(from, to)));
}

#[inline(always)]
fn push_promotions(from: u8, to: u8, out: &mut Vec<Move>) {
    for kind in PieceKind::PROMOTIONS {
        out.push(Move::with_kind(from, to, MoveKind::Promotion(kind)));
    }
}

fn gen_pawns(pos: &Position, us: Color, gen_type: GenType, out: &mut Vec<Move>) {
    let pawns = pos.pieces(us, PieceKind::Pawn);
    let enemies = pos.occupancy(us.other());
    let (promo_rank, double_rank, forward) = match us {
        Color::White => (Bitboard::RANK_8, Bitboard::RANK_4, 8i8),
        Color::Black => (Bitboard::RANK_1, Bitboard::RANK_5, -8i8),
    };
    let origin = |to: u8, steps: i8| (to as i8 - forward * steps) as u8;

    if gen_type == GenType::All {
        let empty = !pos.occupied();
        let advance = |bb: Bitboard| match us {
            Color::White => bb.north(),
            Color::Black => bb.south(),
        };
        let single = advance(pawns) & empty;
        let double = advance(single) & empty & double_rank;

        for to in single & !promo_rank {
            out.push(Move::new(origin(to, 1), to));
        }
        for to in single & promo_rank {
            push_promotions(origin(to, 1), to, out);
        }
        for to in double {
            out.push(Move::new(origin(to, 2), to));
        }
    }

    for from in pawns {
        let attacks = pawn_attacks(from, us);
        for to in attacks & enemies {
            if promo_rank.contains(to) {
                push_promotions(from, to, out);
            } else {
                out.push(Move::new(from, to));
            }
        }
        if let Some(ep) = pos.en_passant()
            && attacks.contains(ep)
        {
            out.push(Move::with_kind(from, ep, MoveKind::EnPassant));
        }
    }
}

fn gen_castles(pos: &Position, us: Color, out: &mut Vec<Move>) {
    let them = us.other();
    let occupied = pos.occupied();
    for spec in &CASTLES[us.idx()] {
        if !pos.castling().has(spec.right)
            || pos.piece_at(spec.king_from) != Some(Piece::new(us, PieceKind::King))
            || pos.piece_at(spec.rook_from) != Some(Piece::new(us, PieceKind::Rook))
            || !(occupied & spec.between).is_empty()
        {
            continue;
        }
        // Out of, through and into check are all forbidden.
        if spec
            .king_path
            .iter()
            .any(|&sq| pos.is_square_attacked(sq, them))
        {
            continue;
        }
        out.push(Move::with_kind(
            spec.king_from,
            spec.king_to,
            MoveKind::Castle {
                rook_from: spec.rook_from,
                rook_to: spec.rook_to,
            },
        ));
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
