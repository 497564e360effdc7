use super::*;
use chess_core::{Color, legal_moves, parse_uci_move};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

fn m(pos: &Position, text: &str) -> Move {
    parse_uci_move(pos, text).unwrap()
}

#[test]
fn test_mvv_lva_table() {
    // Pawn takes queen beats queen takes queen beats queen takes pawn
    assert!(mvv_lva(PieceKind::Pawn, PieceKind::Queen) > mvv_lva(PieceKind::Queen, PieceKind::Queen));
    assert!(mvv_lva(PieceKind::Queen, PieceKind::Queen) > mvv_lva(PieceKind::Pawn, PieceKind::Rook));
    assert_eq!(mvv_lva(PieceKind::Pawn, PieceKind::Pawn), 105);
    assert_eq!(mvv_lva(PieceKind::King, PieceKind::Queen), 500);
}

#[test]
fn test_priority_order() {
    let p = pos(KIWIPETE);
    let params = SearchParameters::default();
    let mut orderer = MoveOrderer::new();

    let pv = m(&p, "a2a3");
    let tt = m(&p, "b2b3");
    let killer = m(&p, "g2g3");
    orderer.record_cutoff(&p, killer, 0, 3, &params);

    let mut moves = legal_moves(&p);
    let hints = Hints {
        pv_move: Some(pv),
        tt_move: Some(tt),
    };
    orderer.order(&p, &mut moves, 0, hints, &params);

    assert_eq!(moves[0], pv);
    assert_eq!(moves[1], tt);
    // All eight captures next, best victim first
    let captures = moves[2..10].iter().all(|&mv| p.is_capture(mv));
    assert!(captures, "{:?}", &moves[2..10]);
    assert!(!p.is_capture(moves[10]));
    assert_eq!(moves[10], killer);
    // e5xf7 and friends trail pawn captures of pieces
    let first_capture = moves[2];
    assert!(
        p.captured_kind(first_capture) != Some(PieceKind::Pawn),
        "{first_capture}"
    );
}

#[test]
fn test_killers_are_most_recent_first() {
    let p = Position::startpos();
    let params = SearchParameters::default();
    let mut orderer = MoveOrderer::new();
    let (a, b, c) = (m(&p, "a2a3"), m(&p, "b2b3"), m(&p, "c2c3"));

    orderer.record_cutoff(&p, a, 4, 2, &params);
    orderer.record_cutoff(&p, b, 4, 2, &params);
    assert_eq!(orderer.killers(4), [Some(b), Some(a)]);

    orderer.record_cutoff(&p, c, 4, 2, &params);
    assert_eq!(orderer.killers(4), [Some(c), Some(b)]);

    // Repeating a known killer promotes it without evicting anything
    orderer.record_cutoff(&p, b, 4, 2, &params);
    assert_eq!(orderer.killers(4), [Some(b), Some(c)]);
    assert_eq!(orderer.killers(5), [None, None]);
    assert_eq!(orderer.killers(MAX_PLY + 10), [None, None]);
}

#[test]
fn test_captures_do_not_update_heuristics() {
    let p = pos(KIWIPETE);
    let params = SearchParameters::default();
    let mut orderer = MoveOrderer::new();
    let capture = m(&p, "e5f7");
    orderer.record_cutoff(&p, capture, 1, 5, &params);
    assert_eq!(orderer.killers(1), [None, None]);
    let knight = Piece::new(Color::White, PieceKind::Knight);
    assert_eq!(orderer.history_score(knight, capture.to), 0);
}

#[test]
fn test_history_accumulates_depth_squared_and_decays() {
    let p = Position::startpos();
    let params = SearchParameters::default();
    let mut orderer = MoveOrderer::new();
    let mv = m(&p, "g1f3");
    let knight = Piece::new(Color::White, PieceKind::Knight);

    orderer.record_cutoff(&p, mv, 0, 3, &params);
    orderer.record_cutoff(&p, mv, 0, 4, &params);
    assert_eq!(orderer.history_score(knight, mv.to), 25);

    for _ in 0..20_000 {
        orderer.record_cutoff(&p, mv, 0, 10, &params);
    }
    assert!(orderer.history_score(knight, mv.to) <= HISTORY_LIMIT);
    assert!(orderer.history_score(knight, mv.to) > HISTORY_LIMIT / 4);
}

#[test]
fn test_saturated_history_stays_below_killers() {
    let p = pos(KIWIPETE);
    let params = SearchParameters::default();
    let mut orderer = MoveOrderer::new();
    let quiet = m(&p, "a2a3");
    let killer = m(&p, "g2g3");

    for _ in 0..1056 {
        orderer.record_cutoff(&p, quiet, 5, 30, &params);
    }
    orderer.record_cutoff(&p, killer, 0, 1, &params);

    let quiet_score = orderer.score(&p, quiet, 0, Hints::default(), &params);
    let killer_score = orderer.score(&p, killer, 0, Hints::default(), &params);
    assert!(quiet_score < KILLER_SCORE - 1000, "{quiet_score}");
    assert_eq!(killer_score, KILLER_SCORE);

    let mut moves = legal_moves(&p);
    orderer.order(&p, &mut moves, 0, Hints::default(), &params);
    let at = |mv| moves.iter().position(|&x| x == mv).unwrap();
    assert!(at(killer) < at(quiet));
    // Captures still come first
    assert!(moves[..at(killer)].iter().all(|&mv| p.is_capture(mv)));
}

#[test]
fn test_stats_count_killers_and_history() {
    let p = Position::startpos();
    let params = SearchParameters::default();
    let mut orderer = MoveOrderer::new();
    assert_eq!(orderer.stats(), OrdererStats::default());

    let (a, b) = (m(&p, "a2a3"), m(&p, "g1f3"));
    orderer.record_cutoff(&p, a, 2, 3, &params);
    orderer.record_cutoff(&p, b, 2, 4, &params);
    orderer.record_cutoff(&p, b, 7, 4, &params);
    assert!(orderer.is_killer(a, 2));
    assert!(orderer.is_killer(b, 7));
    assert!(!orderer.is_killer(a, 7));

    let stats = orderer.stats();
    assert_eq!(stats.killer_entries, 3);
    assert_eq!(stats.history_entries, 2);
    assert_eq!(stats.max_history, orderer.history_score(p.piece_at(b.from).unwrap(), b.to));

    orderer.clear();
    assert_eq!(orderer.stats(), OrdererStats::default());
}

#[test]
fn test_disabled_heuristics_are_ignored() {
    let p = Position::startpos();
    let params = SearchParameters::plain(3);
    let mut orderer = MoveOrderer::new();
    let mv = m(&p, "h2h3");
    orderer.record_cutoff(&p, mv, 0, 6, &params);
    assert_eq!(orderer.killers(0), [None, None]);
    assert_eq!(
        orderer.score(&p, mv, 0, Hints::default(), &params),
        square_bonus(Color::White, PieceKind::Pawn, mv.to) / 10
    );

    orderer.record_cutoff(&p, mv, 0, 6, &SearchParameters::default());
    orderer.clear();
    assert_eq!(orderer.killers(0), [None, None]);
}

#[test]
fn test_order_captures() {
    let p = pos("4k3/8/8/3q4/4P3/2N5/8/4K3 w - - 0 1");
    let mut captures = vec![m(&p, "c3d5"), m(&p, "e4d5")];
    MoveOrderer::order_captures(&p, &mut captures);
    assert_eq!(captures[0], m(&p, "e4d5"));
}
