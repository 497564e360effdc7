//! Terminal-state detection: checkmate, stalemate and threefold repetition.
//!
//! Repetition is a hash lookup; mate and stalemate need to find out whether
//! any legal move exists, so they stop at the first one found.

use crate::board::Position;
use crate::movegen::has_legal_move;

/// Occurrences of one position that make the game drawn.
pub const REPETITION_LIMIT: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    DrawByRepetition,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

/// Classify the position for the side to move. Mate and stalemate take
/// precedence over repetition.
pub fn game_status(pos: &mut Position) -> GameStatus {
    if !has_legal_move(pos) {
        if pos.in_check(pos.side_to_move()) {
            return GameStatus::Checkmate;
        }
        return GameStatus::Stalemate;
    }
    if is_draw_by_repetition(pos) {
        return GameStatus::DrawByRepetition;
    }
    GameStatus::Ongoing
}

pub fn is_checkmate(pos: &mut Position) -> bool {
    pos.in_check(pos.side_to_move()) && !has_legal_move(pos)
}

pub fn is_stalemate(pos: &mut Position) -> bool {
    !pos.in_check(pos.side_to_move()) && !has_legal_move(pos)
}

#[inline]
pub fn is_draw_by_repetition(pos: &Position) -> bool {
    pos.repetition_count() >= REPETITION_LIMIT
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
