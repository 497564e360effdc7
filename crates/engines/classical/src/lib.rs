//! Classical Chess Engine
//!
//! Iterative-deepening negamax with alpha-beta pruning over a hand-written
//! evaluation:
//! - Material, piece-square tables, pawn structure, mobility, king safety
//! - Quiescence search over captures at the horizon
//! - Null-move pruning and late move reductions
//! - Transposition table, killer moves and history heuristic
//!
//! [`ClassicalEngine`] owns all state that persists between searches, so
//! independent engines never share tables.

pub mod eval;
pub mod ordering;
pub mod params;
pub mod pv;
pub mod search;
pub mod tt;

use std::time::Duration;

use chess_core::{Move, Position, StopHandle, TimeControl};
use tracing::{debug, info};

pub use eval::{evaluate, evaluate_relative};
pub use ordering::OrdererStats;
pub use params::{ConfigError, EngineConfig, SearchParameters};
pub use search::format_line;

use ordering::MoveOrderer;
use pv::PvTable;
use search::Searcher;
use tt::TranspositionTable;

/// Score of delivering mate on the next ply. Mate `n` plies from the root
/// scores `MATE_SCORE - n`.
pub const MATE_SCORE: i32 = 100_000;
/// Wider than any reachable score.
pub const INFINITY: i32 = 1_000_000;
pub const DRAW_SCORE: i32 = 0;
/// Hard limit on search ply, quiescence included.
pub const MAX_PLY: usize = 128;

/// Does `score` announce a forced mate for either side?
#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_SCORE - MAX_PLY as i32
}

/// Full moves to mate: positive when the side to move mates, negative when
/// it gets mated. `None` for ordinary scores.
pub fn mate_in_moves(score: i32) -> Option<i32> {
    if !is_mate_score(score) {
        return None;
    }
    let plies = MATE_SCORE - score.abs();
    Some(if score > 0 {
        (plies + 1) / 2
    } else {
        -(plies / 2)
    })
}

/// Result of one completed iteration, or of the whole search.
///
/// `score` is in centipawns from the side to move's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    /// Depth of the last completed iteration; 0 if none completed.
    pub depth: u8,
    pub score: i32,
    /// `None` only when the root position has no legal move.
    pub best_move: Option<Move>,
    pub pv: Vec<Move>,
    pub nodes: u64,
    pub elapsed: Duration,
    /// True if the search was cut short by time or a stop request.
    pub stopped: bool,
    pub stats: SearchStats,
}

/// Counters gathered over a whole search, for tuning and debugging.
///
/// `main_nodes + quiescence_nodes` equals [`SearchReport::nodes`]. Cutoff
/// kinds overlap: a hash move can also be a capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub main_nodes: u64,
    pub quiescence_nodes: u64,
    /// Beta cutoffs in the main search.
    pub beta_cutoffs: u64,
    pub alpha_improvements: u64,
    /// Cutoffs by the transposition table's best move.
    pub hash_move_cutoffs: u64,
    pub killer_cutoffs: u64,
    pub capture_cutoffs: u64,
    /// Nodes answered straight from the transposition tables.
    pub tt_cutoffs: u64,
    pub null_move_tries: u64,
    pub null_move_cutoffs: u64,
    /// Null moves made directly after another null move. Always zero.
    pub consecutive_null_moves: u64,
    pub lmr_reductions: u64,
    /// Reduced searches that beat alpha and were searched again at full
    /// depth.
    pub lmr_researches: u64,
}

impl SearchStats {
    pub fn total_nodes(&self) -> u64 {
        self.main_nodes + self.quiescence_nodes
    }
}

/// Receives progress while a search runs.
pub trait SearchObserver {
    /// Called after every completed iteration.
    fn on_iteration(&mut self, report: &SearchReport);

    fn on_search_finished(&mut self, _report: &SearchReport) {}
}

impl<F: FnMut(&SearchReport)> SearchObserver for F {
    fn on_iteration(&mut self, report: &SearchReport) {
        self(report)
    }
}

/// Search session: transposition tables, move-ordering memory and the stop
/// flag, reused across the searches of one game.
#[derive(Debug, Clone)]
pub struct ClassicalEngine {
    config: EngineConfig,
    tt: TranspositionTable,
    qtt: TranspositionTable,
    orderer: MoveOrderer,
    pv: PvTable,
    stop: StopHandle,
}

impl Default for ClassicalEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ClassicalEngine {
    pub fn new(config: EngineConfig) -> Self {
        chess_core::magic::init();
        Self {
            tt: TranspositionTable::main(config.hash_buckets_log2),
            qtt: TranspositionTable::quiescence(),
            orderer: MoveOrderer::new(),
            pv: PvTable::new(),
            stop: StopHandle::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        "Classical v2.0"
    }

    pub fn author(&self) -> &str {
        "ML-chess"
    }

    /// Resize the main table. Its contents are lost.
    pub fn set_hash_buckets_log2(&mut self, buckets_log2: u32) {
        let buckets_log2 = buckets_log2.clamp(
            EngineConfig::MIN_HASH_BUCKETS_LOG2,
            EngineConfig::MAX_HASH_BUCKETS_LOG2,
        );
        self.config.hash_buckets_log2 = buckets_log2;
        self.tt = TranspositionTable::main(buckets_log2);
    }

    /// Forget everything learned in the previous game.
    pub fn new_game(&mut self) {
        self.tt.clear();
        self.qtt.clear();
        self.orderer.clear();
    }

    /// Handle another thread can use to stop the running search.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Killer and history table occupancy.
    pub fn orderer_stats(&self) -> OrdererStats {
        self.orderer.stats()
    }

    /// Main table fill, per thousand.
    pub fn hashfull(&self) -> u32 {
        self.tt.hashfull()
    }

    /// Search with the parameters from the engine config.
    pub fn search_default(&mut self, pos: &mut Position) -> SearchReport {
        let params = self.config.search.clone();
        self.search(pos, &params, &mut |_: &SearchReport| {})
    }

    /// Search `pos` by iterative deepening. `pos` is left as it was given.
    ///
    /// With no legal move the report has no best move, depth 0 and the
    /// terminal score: `-MATE_SCORE` for checkmate, 0 for stalemate. If
    /// the first iteration does not complete, the best-ordered root move is
    /// returned with score 0 and depth 0.
    pub fn search(
        &mut self,
        pos: &mut Position,
        params: &SearchParameters,
        observer: &mut dyn SearchObserver,
    ) -> SearchReport {
        let clock = TimeControl::start(self.stop.clone(), params.time_budget());
        self.tt.increment_age();
        self.qtt.increment_age();

        let mut searcher = Searcher::new(
            &mut self.tt,
            &mut self.qtt,
            &mut self.orderer,
            &mut self.pv,
            params,
            &clock,
        );
        let report = searcher.iterative_deepening(pos, observer);

        info!(
            depth = report.depth,
            score = report.score,
            nodes = report.nodes,
            elapsed_ms = report.elapsed.as_millis() as u64,
            best_move = %report.best_move.map_or_else(|| "none".to_string(), |m| m.to_string()),
            stopped = report.stopped,
            "search finished"
        );
        let orderer = self.orderer.stats();
        debug!(
            main_nodes = report.stats.main_nodes,
            quiescence_nodes = report.stats.quiescence_nodes,
            beta_cutoffs = report.stats.beta_cutoffs,
            alpha_improvements = report.stats.alpha_improvements,
            hash_move_cutoffs = report.stats.hash_move_cutoffs,
            killer_cutoffs = report.stats.killer_cutoffs,
            capture_cutoffs = report.stats.capture_cutoffs,
            tt_cutoffs = report.stats.tt_cutoffs,
            null_move_cutoffs = report.stats.null_move_cutoffs,
            lmr_researches = report.stats.lmr_researches,
            history_entries = orderer.history_entries,
            max_history = orderer.max_history,
            killer_entries = orderer.killer_entries,
            "search diagnostics"
        );
        observer.on_search_finished(&report);
        report
    }
}
