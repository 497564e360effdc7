use super::*;
use crate::movegen::legal_moves;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const PROMOTION_RICH: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";

fn sq_of(coord: &str) -> u8 {
    coord_to_sq(coord).unwrap()
}

/// Board, side state and hash, but not history.
fn snapshot(pos: &Position) -> (Position, u64, u32, u32) {
    (
        pos.clone(),
        pos.hash(),
        pos.halfmove_clock(),
        pos.fullmove_number(),
    )
}

fn assert_consistent(pos: &Position) {
    assert_eq!(pos.hash(), pos.compute_hash(), "incremental hash drifted");
    for color in Color::ALL {
        let mut union = Bitboard::EMPTY;
        for kind in PieceKind::ALL {
            let bb = pos.pieces(color, kind);
            assert!((union & bb).is_empty(), "piece bitboards overlap");
            union |= bb;
            for sq in bb {
                assert_eq!(pos.piece_at(sq), Some(Piece::new(color, kind)));
            }
        }
        assert_eq!(union, pos.occupancy(color));
        assert_eq!(pos.pieces(color, PieceKind::King).popcount(), 1);
    }
}

/// Walk every line to `depth`, checking hash and bitboards at each node and
/// that undo restores the exact prior state.
fn walk(pos: &mut Position, depth: u8) {
    assert_consistent(pos);
    if depth == 0 {
        return;
    }
    for mv in legal_moves(pos) {
        let before = snapshot(pos);
        pos.make_move(mv);
        walk(pos, depth - 1);
        pos.undo_move();
        assert_eq!(snapshot(pos), before, "undo of {mv} did not restore state");
    }
}

#[test]
fn test_startpos_layout() {
    let pos = Position::startpos();
    assert_eq!(pos.occupied().popcount(), 32);
    assert_eq!(pos.find_king(Color::White), 4);
    assert_eq!(pos.find_king(Color::Black), 60);
    assert_eq!(pos.castling(), CastlingRights::ALL);
    assert_eq!(pos.ply(), 0);
    assert_consistent(&pos);
}

#[test]
fn test_make_undo_round_trip_tree() {
    for fen in [KIWIPETE, PROMOTION_RICH, "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"] {
        let mut pos = Position::from_fen(fen).unwrap();
        walk(&mut pos, 3);
        assert_eq!(pos.ply(), 0);
    }
}

#[test]
fn test_double_push_sets_en_passant() {
    let mut pos = Position::startpos();
    pos.make_move(Move::new(sq_of("e2"), sq_of("e4")));
    assert_eq!(pos.en_passant(), Some(sq_of("e3")));
    assert_eq!(pos.halfmove_clock(), 0);
    pos.make_move(Move::new(sq_of("g8"), sq_of("f6")));
    assert_eq!(pos.en_passant(), None);
    assert_eq!(pos.halfmove_clock(), 1);
    assert_eq!(pos.fullmove_number(), 2);
    assert_consistent(&pos);
}

#[test]
fn test_en_passant_removes_passed_pawn() {
    let mut pos =
        Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
    let before = snapshot(&pos);
    pos.make_move(Move::with_kind(sq_of("e5"), sq_of("f6"), MoveKind::EnPassant));
    assert_eq!(pos.piece_at(sq_of("f5")), None);
    assert_eq!(
        pos.piece_at(sq_of("f6")),
        Some(Piece::new(Color::White, PieceKind::Pawn))
    );
    assert_consistent(&pos);

    pos.undo_move();
    assert_eq!(snapshot(&pos), before);
}

#[test]
fn test_castling_moves_rook_and_clears_rights() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    pos.make_move(Move::with_kind(
        4,
        6,
        MoveKind::Castle {
            rook_from: 7,
            rook_to: 5,
        },
    ));
    assert_eq!(pos.piece_at(5), Some(Piece::new(Color::White, PieceKind::Rook)));
    assert_eq!(pos.piece_at(7), None);
    assert!(!pos.castling().has(CastlingRights::WHITE_KING));
    assert!(!pos.castling().has(CastlingRights::WHITE_QUEEN));
    assert!(pos.castling().has(CastlingRights::BLACK_KING));
    assert_consistent(&pos);
}

#[test]
fn test_rook_capture_clears_opponent_right() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    pos.make_move(Move::new(sq_of("h1"), sq_of("h8")));
    assert!(!pos.castling().has(CastlingRights::WHITE_KING));
    assert!(!pos.castling().has(CastlingRights::BLACK_KING));
    assert!(pos.castling().has(CastlingRights::BLACK_QUEEN));
    assert_consistent(&pos);
}

#[test]
fn test_capture_promotion_undo() {
    let mut pos = Position::from_fen(PROMOTION_RICH).unwrap();
    pos.make_move(Move::new(sq_of("c4"), sq_of("c5")));
    let before = snapshot(&pos);
    let mv = Move::with_kind(sq_of("b2"), sq_of("a1"), MoveKind::Promotion(PieceKind::Knight));
    pos.make_move(mv);
    assert_eq!(
        pos.piece_at(sq_of("a1")),
        Some(Piece::new(Color::Black, PieceKind::Knight))
    );
    assert!(!pos.pieces(Color::Black, PieceKind::Pawn).contains(sq_of("b2")));
    assert!(!pos.castling().has(CastlingRights::WHITE_QUEEN));
    assert_consistent(&pos);

    pos.undo_move();
    assert_eq!(snapshot(&pos), before);
    assert_eq!(pos.piece_at(sq_of("a1")), Some(Piece::new(Color::White, PieceKind::Rook)));
}

#[test]
fn test_null_move_flips_side_and_clears_en_passant() {
    let mut pos = Position::startpos();
    pos.make_move(Move::new(sq_of("d2"), sq_of("d4")));
    let before = snapshot(&pos);

    pos.make_move(Move::NULL);
    assert_eq!(pos.side_to_move(), Color::White);
    assert_eq!(pos.en_passant(), None);
    assert_eq!(pos.occupied(), before.0.occupied());
    assert_consistent(&pos);

    pos.undo_move();
    assert_eq!(snapshot(&pos), before);
}

#[test]
fn test_is_square_attacked() {
    let pos = Position::from_fen(KIWIPETE).unwrap();
    // Black pawn on h3 attacks g2
    assert!(pos.is_square_attacked(sq_of("g2"), Color::Black));
    // White queen on f3 attacks f6 knight
    assert!(pos.is_square_attacked(sq_of("f6"), Color::White));
    // Bishop a6 reaches d3 through b5 and c4
    assert!(pos.is_square_attacked(sq_of("d3"), Color::Black));
    assert!(!pos.is_square_attacked(sq_of("d4"), Color::Black));
    assert!(!pos.in_check(Color::White));
    assert!(!pos.in_check(Color::Black));
}

#[test]
fn test_captured_kind() {
    let pos = Position::from_fen(KIWIPETE).unwrap();
    assert_eq!(
        pos.captured_kind(Move::new(sq_of("e5"), sq_of("f7"))),
        Some(PieceKind::Pawn)
    );
    assert_eq!(pos.captured_kind(Move::new(sq_of("a2"), sq_of("a3"))), None);
    assert!(!pos.is_capture(Move::with_kind(
        4,
        6,
        MoveKind::Castle {
            rook_from: 7,
            rook_to: 5
        }
    )));
}

#[test]
fn test_non_pawn_material() {
    let pos = Position::from_fen("4k3/pppp4/8/8/8/8/4P3/4KN2 w - - 0 1").unwrap();
    assert!(pos.has_non_pawn_material(Color::White));
    assert!(!pos.has_non_pawn_material(Color::Black));
}

#[test]
fn test_mirrored_position() {
    let pos = Position::from_fen(KIWIPETE).unwrap();
    let mirror = pos.mirrored();
    assert_eq!(mirror.side_to_move(), Color::Black);
    assert_eq!(mirror.find_king(Color::White), mirror_sq(pos.find_king(Color::Black)));
    assert_eq!(mirror.castling(), CastlingRights::ALL);
    assert_eq!(legal_moves(&mirror).len(), legal_moves(&pos).len());
    assert_eq!(mirror.mirrored(), pos);
    assert_consistent(&mirror);
}

#[test]
#[should_panic(expected = "empty move history")]
fn test_undo_without_history_panics() {
    Position::startpos().undo_move();
}
