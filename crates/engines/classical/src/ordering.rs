//! Move ordering: PV move, hash move, MVV-LVA captures, killer moves and
//! the history heuristic.

use std::cmp::Reverse;

use chess_core::{Move, Piece, PieceKind, Position};

use crate::MAX_PLY;
use crate::eval::square_bonus;
use crate::params::SearchParameters;

pub const KILLER_SLOTS: usize = 2;

const PV_MOVE_SCORE: i32 = 10_000_000;
const TT_MOVE_SCORE: i32 = 9_000_000;
const CAPTURE_SCORE: i32 = 1_000_000;
const KILLER_SCORE: i32 = 900_000;
/// History scores are halved once any of them passes this.
const HISTORY_LIMIT: i32 = 100_000;
/// Quiet moves never reach the lowest killer slot.
const QUIET_CAP: i32 = KILLER_SCORE - KILLER_SLOTS as i32 * 1000;

/// Most valuable victim first, then least valuable attacker.
#[inline]
pub fn mvv_lva(attacker: PieceKind, victim: PieceKind) -> i32 {
    100 * (victim.idx() as i32 + 1) + (5 - attacker.idx() as i32)
}

/// Moves worth trying first at a node, besides what the orderer remembers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hints {
    /// This ply's move on the previous iteration's principal variation.
    pub pv_move: Option<Move>,
    /// Best move stored in the transposition table.
    pub tt_move: Option<Move>,
}

/// Occupancy of the killer and history tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrdererStats {
    /// History entries above zero.
    pub history_entries: usize,
    pub max_history: i32,
    /// Filled killer slots over all plies.
    pub killer_entries: usize,
}

/// Killer and history tables, kept across iterations and searches of one
/// game.
#[derive(Debug, Clone)]
pub struct MoveOrderer {
    killers: Vec<[Option<Move>; KILLER_SLOTS]>,
    /// Indexed by `[Piece::idx()][to]`.
    history: [[i32; 64]; 12],
}

impl Default for MoveOrderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveOrderer {
    pub fn new() -> Self {
        Self {
            killers: vec![[None; KILLER_SLOTS]; MAX_PLY],
            history: [[0; 64]; 12],
        }
    }

    pub fn clear(&mut self) {
        self.killers.fill([None; KILLER_SLOTS]);
        self.history = [[0; 64]; 12];
    }

    pub fn killers(&self, ply: usize) -> [Option<Move>; KILLER_SLOTS] {
        self.killers.get(ply).copied().unwrap_or([None; KILLER_SLOTS])
    }

    pub fn history_score(&self, piece: Piece, to: u8) -> i32 {
        self.history[piece.idx()][to as usize]
    }

    /// Is `mv` one of the killers stored for `ply`?
    pub fn is_killer(&self, mv: Move, ply: usize) -> bool {
        self.killers(ply).contains(&Some(mv))
    }

    pub fn stats(&self) -> OrdererStats {
        let history = self.history.iter().flatten().filter(|&&v| v > 0);
        OrdererStats {
            history_entries: history.clone().count(),
            max_history: history.copied().max().unwrap_or(0),
            killer_entries: self.killers.iter().flatten().filter(|k| k.is_some()).count(),
        }
    }

    /// Sort key for `mv`; higher is searched first.
    pub fn score(
        &self,
        pos: &Position,
        mv: Move,
        ply: usize,
        hints: Hints,
        params: &SearchParameters,
    ) -> i32 {
        if hints.pv_move == Some(mv) {
            return PV_MOVE_SCORE;
        }
        if hints.tt_move == Some(mv) {
            return TT_MOVE_SCORE;
        }
        let Some(piece) = pos.piece_at(mv.from) else {
            return 0;
        };
        if let Some(victim) = pos.captured_kind(mv) {
            return CAPTURE_SCORE + mvv_lva(piece.kind, victim);
        }
        if params.use_killer_moves
            && let Some(slot) = self.killers(ply).iter().position(|k| *k == Some(mv))
        {
            return KILLER_SCORE - slot as i32 * 1000;
        }
        let mut score = square_bonus(piece.color, piece.kind, mv.to) / 10;
        if params.use_history_heuristic {
            score += self.history_score(piece, mv.to);
        }
        score.min(QUIET_CAP)
    }

    /// Sort `moves` best first.
    pub fn order(
        &self,
        pos: &Position,
        moves: &mut [Move],
        ply: usize,
        hints: Hints,
        params: &SearchParameters,
    ) {
        moves.sort_by_cached_key(|&mv| Reverse(self.score(pos, mv, ply, hints, params)));
    }

    /// Sort captures by MVV-LVA alone.
    pub fn order_captures(pos: &Position, moves: &mut [Move]) {
        moves.sort_by_cached_key(|&mv| {
            let attacker = pos.piece_at(mv.from).map_or(PieceKind::King, |p| p.kind);
            let victim = pos.captured_kind(mv).unwrap_or(PieceKind::Pawn);
            Reverse(mvv_lva(attacker, victim))
        });
    }

    /// Remember a quiet move that caused a beta cutoff. Captures are ignored.
    /// `pos` is the position the move was played from.
    pub fn record_cutoff(
        &mut self,
        pos: &Position,
        mv: Move,
        ply: usize,
        depth: u8,
        params: &SearchParameters,
    ) {
        if pos.is_capture(mv) {
            return;
        }
        if params.use_killer_moves {
            self.update_killers(mv, ply);
        }
        if params.use_history_heuristic
            && let Some(piece) = pos.piece_at(mv.from)
        {
            self.update_history(piece, mv.to, depth);
        }
    }

    fn update_killers(&mut self, mv: Move, ply: usize) {
        let Some(slots) = self.killers.get_mut(ply) else {
            return;
        };
        if let Some(i) = slots.iter().position(|k| *k == Some(mv)) {
            // Known killer: move it to the front
            slots.swap(0, i);
            return;
        }
        slots.rotate_right(1);
        slots[0] = Some(mv);
    }

    fn update_history(&mut self, piece: Piece, to: u8, depth: u8) {
        let bonus = depth as i32 * depth as i32;
        let entry = &mut self.history[piece.idx()][to as usize];
        *entry += bonus;
        if *entry > HISTORY_LIMIT {
            for row in self.history.iter_mut() {
                for v in row.iter_mut() {
                    *v /= 2;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod ordering_tests;
