use super::*;
use crate::types::PieceKind;

#[test]
fn test_zobrist_keys_unique() {
    let mut seen = std::collections::HashSet::new();

    for color in 0..2 {
        for kind in 0..6 {
            for sq in 0..64 {
                assert!(
                    seen.insert(ZOBRIST.pieces[color][kind][sq]),
                    "Duplicate piece key"
                );
            }
        }
    }
    assert!(seen.insert(ZOBRIST.side_to_move), "Side to move key collision");
    for key in ZOBRIST.castling {
        assert!(seen.insert(key), "Castling key collision");
    }
    for key in ZOBRIST.en_passant {
        assert!(seen.insert(key), "En passant key collision");
    }
    assert!(!seen.contains(&0));
}

#[test]
fn test_piece_keys_differ_by_square_and_color() {
    let white_pawn = Piece::new(Color::White, PieceKind::Pawn);
    let black_pawn = Piece::new(Color::Black, PieceKind::Pawn);
    assert_ne!(ZOBRIST.piece_key(white_pawn, 8), ZOBRIST.piece_key(white_pawn, 9));
    assert_ne!(ZOBRIST.piece_key(white_pawn, 8), ZOBRIST.piece_key(black_pawn, 8));
}

#[test]
fn test_ep_key_depends_only_on_file() {
    // e3 and e6 share the e-file
    assert_eq!(ZOBRIST.ep_key(20), ZOBRIST.ep_key(44));
    assert_ne!(ZOBRIST.ep_key(20), ZOBRIST.ep_key(21));
}

#[test]
fn test_side_key() {
    assert_eq!(ZOBRIST.side_key(Color::White), 0);
    assert_eq!(ZOBRIST.side_key(Color::Black), ZOBRIST.side_to_move);
}

#[test]
fn test_castling_key_per_combination() {
    let full = ZOBRIST.castling_key(CastlingRights::ALL);
    let mut rights = CastlingRights::ALL;
    rights.remove(CastlingRights::WHITE_KING);
    assert_ne!(full, ZOBRIST.castling_key(rights));
    assert_eq!(ZOBRIST.castling_key(CastlingRights::NONE), ZOBRIST.castling[0]);
}
