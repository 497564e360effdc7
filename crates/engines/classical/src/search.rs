//! Negamax alpha-beta search with quiescence, null-move pruning and late
//! move reductions, driven by iterative deepening.
//!
//! Every recursive call returns `None` once cancellation is seen. Moves
//! already played on the way down are still undone on the way back up, so
//! the position is intact whichever way the search ends.

use std::mem;

use chess_core::{
    Move, Position, TimeControl, has_legal_move, is_draw_by_repetition, legal_captures_into,
    legal_moves_into,
};
use tracing::debug;

use crate::eval::evaluate_relative;
use crate::ordering::{Hints, MoveOrderer};
use crate::params::SearchParameters;
use crate::pv::PvTable;
use crate::tt::{NodeType, TranspositionTable};
use crate::{DRAW_SCORE, INFINITY, MATE_SCORE, MAX_PLY, SearchObserver, SearchReport, SearchStats};

/// Null move searches `depth - 1 - NULL_MOVE_REDUCTION` plies.
pub const NULL_MOVE_REDUCTION: i32 = 2;
pub const NULL_MOVE_MIN_DEPTH: i32 = 3;

/// Moves searched at full depth before reductions start.
pub const LMR_FULL_DEPTH_MOVES: usize = 4;
pub const LMR_MIN_DEPTH: i32 = 3;
pub const LMR_REDUCTION: i32 = 1;

/// Score for the side to move being checkmated `ply` plies from the root.
#[inline]
pub fn mated_in(ply: usize) -> i32 {
    -(MATE_SCORE - ply as i32)
}

/// Everything one search needs, borrowed from the engine that owns it.
pub(crate) struct Searcher<'a> {
    pub tt: &'a mut TranspositionTable,
    pub qtt: &'a mut TranspositionTable,
    pub orderer: &'a mut MoveOrderer,
    pub pv: &'a mut PvTable,
    pub params: &'a SearchParameters,
    pub clock: &'a TimeControl,
    pub nodes: u64,
    pub stats: SearchStats,
    /// Principal variation of the last completed iteration.
    prev_pv: Vec<Move>,
    /// One move list per ply, reused across the whole search.
    buffers: Vec<Vec<Move>>,
}

impl<'a> Searcher<'a> {
    pub fn new(
        tt: &'a mut TranspositionTable,
        qtt: &'a mut TranspositionTable,
        orderer: &'a mut MoveOrderer,
        pv: &'a mut PvTable,
        params: &'a SearchParameters,
        clock: &'a TimeControl,
    ) -> Self {
        Self {
            tt,
            qtt,
            orderer,
            pv,
            params,
            clock,
            nodes: 0,
            stats: SearchStats::default(),
            prev_pv: Vec::new(),
            buffers: (0..=MAX_PLY).map(|_| Vec::with_capacity(64)).collect(),
        }
    }

    /// Count a node and check for cancellation.
    #[inline]
    fn poll(&mut self, quiescence: bool) -> bool {
        self.nodes += 1;
        if quiescence {
            self.stats.quiescence_nodes += 1;
        } else {
            self.stats.main_nodes += 1;
        }
        self.clock.should_stop(self.nodes)
    }

    fn report(&self, depth: u8, score: i32, pv: Vec<Move>, stopped: bool) -> SearchReport {
        SearchReport {
            depth,
            score,
            best_move: pv.first().copied(),
            pv,
            nodes: self.nodes,
            elapsed: self.clock.elapsed(),
            stopped,
            stats: self.stats,
        }
    }

    /// Search depth 1, 2, ... up to the target depth, reporting each
    /// completed iteration. Returns the last completed one.
    pub fn iterative_deepening(
        &mut self,
        pos: &mut Position,
        observer: &mut dyn SearchObserver,
    ) -> SearchReport {
        let mut root_moves = Vec::with_capacity(64);
        legal_moves_into(pos, &mut root_moves);
        if root_moves.is_empty() {
            let score = if pos.in_check(pos.side_to_move()) {
                -MATE_SCORE
            } else {
                DRAW_SCORE
            };
            return self.report(0, score, Vec::new(), false);
        }

        // Something to play even if the first iteration never finishes
        let tt_move = self.tt.get(pos.hash()).and_then(|e| e.best_move);
        let hints = Hints {
            pv_move: None,
            tt_move,
        };
        self.orderer
            .order(pos, &mut root_moves, 0, hints, self.params);
        let mut best = self.report(0, 0, vec![root_moves[0]], false);

        for depth in 1..=self.params.target_depth() {
            let Some(score) = self.negamax(pos, depth as i32, -INFINITY, INFINITY, 0, true) else {
                best.stopped = true;
                break;
            };
            let pv = self.pv.root_line().to_vec();
            debug_assert!(!pv.is_empty(), "root search finished without a move");
            self.prev_pv.clone_from(&pv);
            best = self.report(depth, score, pv, false);

            debug!(
                depth,
                score,
                nodes = self.nodes,
                quiescence_nodes = self.stats.quiescence_nodes,
                beta_cutoffs = self.stats.beta_cutoffs,
                elapsed_ms = best.elapsed.as_millis() as u64,
                pv = %format_line(&best.pv),
                "iteration complete"
            );
            observer.on_iteration(&best);

            if score.abs() >= MATE_SCORE - depth as i32 {
                break;
            }
        }
        best.nodes = self.nodes;
        best.stats = self.stats;
        best.elapsed = self.clock.elapsed();
        best
    }

    /// Static evaluation or quiescence at the horizon.
    fn horizon(&mut self, pos: &mut Position, alpha: i32, beta: i32, ply: usize) -> Option<i32> {
        if self.params.use_quiescence {
            return self.quiescence(pos, alpha, beta, ply);
        }
        if self.poll(false) {
            return None;
        }
        self.pv.clear_ply(ply);
        if is_draw_by_repetition(pos) {
            return Some(DRAW_SCORE);
        }
        if !has_legal_move(pos) {
            return Some(terminal_score(pos, ply));
        }
        Some(evaluate_relative(pos))
    }

    fn negamax(
        &mut self,
        pos: &mut Position,
        depth: i32,
        alpha: i32,
        beta: i32,
        ply: usize,
        allow_null: bool,
    ) -> Option<i32> {
        if depth <= 0 {
            return self.horizon(pos, alpha, beta, ply);
        }
        if self.poll(false) {
            return None;
        }
        self.pv.clear_ply(ply);

        if ply > 0 && is_draw_by_repetition(pos) {
            return Some(DRAW_SCORE);
        }
        if ply >= MAX_PLY - 1 {
            return Some(evaluate_relative(pos));
        }

        let mut moves = mem::take(&mut self.buffers[ply]);
        legal_moves_into(pos, &mut moves);
        let result = self.search_node(pos, &mut moves, depth, alpha, beta, ply, allow_null);
        self.buffers[ply] = moves;
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn search_node(
        &mut self,
        pos: &mut Position,
        moves: &mut [Move],
        depth: i32,
        mut alpha: i32,
        beta: i32,
        ply: usize,
        allow_null: bool,
    ) -> Option<i32> {
        let us = pos.side_to_move();
        let in_check = pos.in_check(us);
        if moves.is_empty() {
            return Some(if in_check { mated_in(ply) } else { DRAW_SCORE });
        }

        let hash = pos.hash();
        let mut tt_move = None;
        if self.params.use_transposition_table {
            let probe = self.tt.probe(hash, depth as u8, alpha, beta, ply);
            tt_move = probe.best_move;
            if ply > 0
                && let Some(score) = probe.score
            {
                self.stats.tt_cutoffs += 1;
                return Some(score);
            }
        }

        if self.params.use_null_move
            && allow_null
            && ply > 0
            && depth >= NULL_MOVE_MIN_DEPTH
            && !in_check
            && pos.has_non_pawn_material(us)
        {
            self.stats.null_move_tries += 1;
            if pos.last_move().is_some_and(|m| m.is_null()) {
                self.stats.consecutive_null_moves += 1;
            }
            pos.make_move(Move::NULL);
            let score = self
                .negamax(pos, depth - 1 - NULL_MOVE_REDUCTION, -beta, -beta + 1, ply + 1, false)
                .map(|s| -s);
            pos.undo_move();
            if score? >= beta {
                self.stats.null_move_cutoffs += 1;
                return Some(beta);
            }
        }

        let hints = Hints {
            pv_move: self.prev_pv.get(ply).copied(),
            tt_move,
        };
        self.orderer.order(pos, moves, ply, hints, self.params);

        let mut best_move = None;
        let mut node_type = NodeType::UpperBound;
        for (i, &mv) in moves.iter().enumerate() {
            let quiet = !pos.is_capture(mv) && mv.promotion().is_none();
            pos.make_move(mv);
            let gives_check = pos.in_check(pos.side_to_move());
            let reduce = self.params.use_late_move_reduction
                && i >= LMR_FULL_DEPTH_MOVES
                && depth >= LMR_MIN_DEPTH
                && quiet
                && !in_check
                && !gives_check;

            let score = if reduce {
                self.stats.lmr_reductions += 1;
                let reduced = depth - 1 - LMR_REDUCTION;
                match self.negamax(pos, reduced, -alpha - 1, -alpha, ply + 1, true) {
                    Some(s) if -s > alpha => {
                        self.stats.lmr_researches += 1;
                        self.negamax(pos, depth - 1, -beta, -alpha, ply + 1, true)
                            .map(|s| -s)
                    }
                    other => other.map(|s| -s),
                }
            } else {
                self.negamax(pos, depth - 1, -beta, -alpha, ply + 1, true)
                    .map(|s| -s)
            };
            pos.undo_move();
            let score = score?;

            if score > alpha {
                alpha = score;
                best_move = Some(mv);
                node_type = NodeType::Exact;
                self.pv.update(ply, mv);
                self.stats.alpha_improvements += 1;
            }
            if alpha >= beta {
                node_type = NodeType::LowerBound;
                self.stats.beta_cutoffs += 1;
                if tt_move == Some(mv) {
                    self.stats.hash_move_cutoffs += 1;
                }
                if pos.is_capture(mv) {
                    self.stats.capture_cutoffs += 1;
                } else if self.orderer.is_killer(mv, ply) {
                    self.stats.killer_cutoffs += 1;
                }
                self.orderer
                    .record_cutoff(pos, mv, ply, depth as u8, self.params);
                break;
            }
        }

        if self.params.use_transposition_table {
            self.tt
                .store(hash, alpha, depth as u8, best_move, node_type, ply);
        }
        Some(alpha)
    }

    /// Captures-only search below the horizon.
    fn quiescence(&mut self, pos: &mut Position, alpha: i32, beta: i32, ply: usize) -> Option<i32> {
        if self.poll(true) {
            return None;
        }
        self.pv.clear_ply(ply);

        if ply > 0 && is_draw_by_repetition(pos) {
            return Some(DRAW_SCORE);
        }
        if ply >= MAX_PLY - 1 {
            return Some(evaluate_relative(pos));
        }

        let hash = pos.hash();
        if self.params.use_transposition_table
            && let Some(score) = self.qtt.probe(hash, 0, alpha, beta, ply).score
        {
            self.stats.tt_cutoffs += 1;
            return Some(score);
        }

        let mut moves = mem::take(&mut self.buffers[ply]);
        legal_captures_into(pos, &mut moves);
        let result = self.quiescence_node(pos, &mut moves, alpha, beta, ply);
        self.buffers[ply] = moves;
        result
    }

    fn quiescence_node(
        &mut self,
        pos: &mut Position,
        moves: &mut [Move],
        mut alpha: i32,
        beta: i32,
        ply: usize,
    ) -> Option<i32> {
        if moves.is_empty() && !has_legal_move(pos) {
            return Some(terminal_score(pos, ply));
        }

        let stand_pat = evaluate_relative(pos);
        if stand_pat >= beta {
            return Some(beta);
        }
        let alpha_in = alpha;
        alpha = alpha.max(stand_pat);

        MoveOrderer::order_captures(pos, moves);
        let mut best_move = None;
        for &mv in moves.iter() {
            pos.make_move(mv);
            let score = self.quiescence(pos, -beta, -alpha, ply + 1).map(|s| -s);
            pos.undo_move();
            let score = score?;

            if score > alpha {
                alpha = score;
                best_move = Some(mv);
            }
            if alpha >= beta {
                break;
            }
        }

        if self.params.use_transposition_table {
            let node_type = if alpha >= beta {
                NodeType::LowerBound
            } else if alpha > alpha_in {
                NodeType::Exact
            } else {
                NodeType::UpperBound
            };
            self.qtt.store(pos.hash(), alpha, 0, best_move, node_type, ply);
        }
        Some(alpha)
    }
}

/// Score of a position with no legal moves.
fn terminal_score(pos: &Position, ply: usize) -> i32 {
    if pos.in_check(pos.side_to_move()) {
        mated_in(ply)
    } else {
        DRAW_SCORE
    }
}

/// Space-separated coordinate moves.
pub fn format_line(moves: &[Move]) -> String {
    let mut out = String::new();
    for (i, mv) in moves.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&mv.to_string());
    }
    out
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
