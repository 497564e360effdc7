use super::*;
use chess_core::legal_moves;

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

const SAMPLES: &[&str] = &[
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    "8/5pk1/4p1p1/3nP1Kp/7P/5PP1/5r2/Q4N2 w - - 3 59",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
];

#[test]
fn test_startpos_is_balanced() {
    assert_eq!(evaluate(&Position::startpos()), 0);
}

#[test]
fn test_mirror_negates_score() {
    for fen in SAMPLES {
        let p = pos(fen);
        assert_eq!(evaluate(&p), -evaluate(&p.mirrored()), "{fen}");
        // Side-to-move view is unchanged, both sides see the same game
        assert_eq!(evaluate_relative(&p), evaluate_relative(&p.mirrored()), "{fen}");
    }
}

#[test]
fn test_mirror_symmetry_holds_along_game_lines() {
    let mut p = pos(SAMPLES[0]);
    for _ in 0..6 {
        let moves = legal_moves(&p);
        let mv = moves[moves.len() / 2];
        p.make_move(mv);
        assert_eq!(evaluate(&p), -evaluate(&p.mirrored()));
    }
}

#[test]
fn test_extra_queen_dominates() {
    let p = pos("4k3/8/8/8/8/8/8/3QK3 w - - 0 1");
    assert!(evaluate(&p) > 900);
    let p = pos("4k3/8/8/8/8/8/8/3QK3 b - - 0 1");
    assert!(evaluate_relative(&p) < -900);
}

#[test]
fn test_square_bonus_reads_from_own_side() {
    // e2 pawn for White and e7 pawn for Black sit on the same table entry
    assert_eq!(square_bonus(Color::White, PieceKind::Pawn, 12), -10);
    assert_eq!(square_bonus(Color::Black, PieceKind::Pawn, 52), -10);
    assert_eq!(square_bonus(Color::White, PieceKind::Pawn, 52), 40);
    assert_eq!(square_bonus(Color::Black, PieceKind::Pawn, 12), 40);
    assert_eq!(square_bonus(Color::White, PieceKind::King, 4), -15);
    assert_eq!(square_bonus(Color::Black, PieceKind::King, 60), -15);
}

#[test]
fn test_pawn_structure_terms() {
    let kings = |pawns: &str| pos(&format!("4k3/8/8/8/8/{pawns}/4K3 w - - 0 1"));
    // Two connected pawns vs the same pawns doubled on one file
    let connected = kings("8/3PP3");
    let doubled = pos("4k3/8/8/8/8/3P4/3P4/4K3 w - - 0 1");
    assert!(pawn_structure(&connected, Color::White) > pawn_structure(&doubled, Color::White));

    // A lone pawn is isolated and passed on its starting rank
    let lone = kings("8/3P4");
    assert_eq!(
        pawn_structure(&lone, Color::White),
        ISOLATED_PAWN_PENALTY + PASSED_PAWN_BONUS[1]
    );

    // An enemy pawn ahead on an adjacent file stops it being passed
    let blocked = pos("4k3/8/4p3/8/8/8/3P4/4K3 w - - 0 1");
    assert_eq!(pawn_structure(&blocked, Color::White), ISOLATED_PAWN_PENALTY);
}

#[test]
fn test_passed_pawn_bonus_grows_with_advance() {
    let far = pos("4k3/8/8/8/8/8/P7/4K3 w - - 0 1");
    let near = pos("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
    assert!(pawn_structure(&near, Color::White) > pawn_structure(&far, Color::White));
    let black_near = pos("4k3/8/8/8/8/8/p7/4K3 w - - 0 1");
    assert_eq!(
        pawn_structure(&black_near, Color::Black),
        pawn_structure(&near, Color::White)
    );
}

#[test]
fn test_rook_file_bonus() {
    let open = pos("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
    assert_eq!(rook_files(&open, Color::White), OPEN_FILE_SCORE);
    let semi = pos("4k3/p7/8/8/8/8/8/R3K3 w - - 0 1");
    assert_eq!(rook_files(&semi, Color::White), SEMI_OPEN_FILE_SCORE);
    let closed = pos("4k3/8/8/8/8/8/P7/R3K3 w - - 0 1");
    assert_eq!(rook_files(&closed, Color::White), 0);
}

#[test]
fn test_mobility_ignores_own_blockers() {
    // Rook in the corner hemmed in by its own pieces
    let boxed = pos("4k3/8/8/8/8/8/P7/RN2K3 w - - 0 1");
    assert_eq!(mobility(&boxed, Color::White), 0);
    // Free rook on an empty board sees fourteen squares
    let free = pos("4k3/8/8/8/3R4/8/8/4K3 w - - 0 1");
    assert_eq!(mobility(&free, Color::White), 14);
}

#[test]
fn test_king_shield_and_open_files() {
    let sheltered = pos("4k3/8/8/8/8/8/5PPP/6K1 w - - 0 1");
    let exposed = pos("4k3/8/8/8/8/8/8/6K1 w - - 0 1");
    assert_eq!(
        king_safety(&sheltered, Color::White),
        3 * KING_SHIELD_BONUS
    );
    assert_eq!(king_safety(&exposed, Color::White), -3 * OPEN_FILE_SCORE);
    // Corner king only has two files to worry about
    let corner = pos("4k3/8/8/8/8/8/8/7K w - - 0 1");
    assert_eq!(king_safety(&corner, Color::White), -2 * OPEN_FILE_SCORE);
}
