//! End-to-end tactic regressions: play the opponent's moves from the
//! fixture and check the engine answers each one with the expected move.

use chess_core::{Position, parse_uci_move};
use classical_engine::{
    ClassicalEngine, EngineConfig, MATE_SCORE, SearchParameters, SearchReport, is_mate_score,
};

/// FEN, then alternating opponent / expected engine moves.
const MATE_IN_THREE: &str =
    "8/5pk1/4p1p1/3nP1Kp/7P/5PP1/5r2/Q4N2 w - - 3 59,f3f4 d5f4 g3f4 f2g2 f1g3 g2g3";

fn solve(line: &str, params: &SearchParameters) -> Vec<SearchReport> {
    let (fen, moves) = line.split_once(',').expect("fixture has a move list");
    let mut pos = Position::from_fen(fen).unwrap();
    let mut engine = ClassicalEngine::new(EngineConfig {
        hash_buckets_log2: 16,
        ..EngineConfig::default()
    });

    let moves: Vec<&str> = moves.split_whitespace().collect();
    let mut reports = Vec::new();
    for pair in moves.chunks(2) {
        let [played, expected] = pair else {
            panic!("odd number of moves in fixture");
        };
        let mv = parse_uci_move(&pos, played).unwrap();
        pos.make_move(mv);

        let report = engine.search(&mut pos, params, &mut |_: &SearchReport| {});
        let best = report.best_move.expect("engine to move has a legal move");
        assert_eq!(
            best.to_string(),
            *expected,
            "after {played} in {}",
            pos.to_fen()
        );
        pos.make_move(best);
        reports.push(report);
    }
    reports
}

#[test]
fn mate_in_three_puzzle() {
    let reports = solve(MATE_IN_THREE, &SearchParameters::with_depth(7));
    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| r.score > 0 && is_mate_score(r.score)));
    assert_eq!(reports[2].score, MATE_SCORE - 1);
}

#[test]
fn mate_in_three_without_pruning() {
    let params = SearchParameters {
        use_null_move: false,
        use_late_move_reduction: false,
        ..SearchParameters::with_depth(5)
    };
    let reports = solve(MATE_IN_THREE, &params);
    assert_eq!(reports[0].score, MATE_SCORE - 5);
}

#[test]
fn mate_in_three_with_and_without_reductions() {
    let reduced = solve(MATE_IN_THREE, &SearchParameters::with_depth(7));
    let full = solve(MATE_IN_THREE, &SearchParameters {
        use_late_move_reduction: false,
        ..SearchParameters::with_depth(7)
    });
    // Same answers, checked by `solve`, and the full-width scores are exact
    let scores: Vec<i32> = full.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![MATE_SCORE - 5, MATE_SCORE - 3, MATE_SCORE - 1]);
    for (r, f) in reduced.iter().zip(&full) {
        assert!(r.score > 0 && is_mate_score(r.score));
        assert!(r.score <= f.score);
        assert!(r.stats.lmr_reductions > 0 || r.depth < 3);
        assert_eq!(f.stats.lmr_reductions, 0);
    }
}
