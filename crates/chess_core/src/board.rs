//! Bitboard position with in-place make/undo.
//!
//! Twelve piece bitboards plus per-color occupancy are the source of truth
//! for move generation; a square-indexed mailbox answers "what is on this
//! square" in O(1). All three are only ever changed through the private
//! `put_piece` / `remove_piece` / `move_piece` primitives, which also keep the
//! Zobrist hash up to date.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::repetition::RepetitionTable;
use crate::types::*;
use crate::zobrist::ZOBRIST;

/// Everything `undo_move` needs that the move itself does not record.
#[derive(Clone, Copy, Debug)]
struct Undo {
    mv: Move,
    captured: Option<Piece>,
    castling: CastlingRights,
    en_passant: Option<u8>,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
}

#[derive(Clone, Debug)]
pub struct Position {
    pieces: [[Bitboard; 6]; 2],
    occupancy: [Bitboard; 2],
    board: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<u8>, // square behind a pawn that just advanced 2
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
    history: Vec<Undo>,
    repetitions: RepetitionTable,
}

/// Castling rights lost when a piece moves from or to each square.
const fn castling_loss(sq: u8) -> u8 {
    match sq {
        0 => CastlingRights::WHITE_QUEEN,
        4 => CastlingRights::WHITE_KING | CastlingRights::WHITE_QUEEN,
        7 => CastlingRights::WHITE_KING,
        56 => CastlingRights::BLACK_QUEEN,
        60 => CastlingRights::BLACK_KING | CastlingRights::BLACK_QUEEN,
        63 => CastlingRights::BLACK_KING,
        _ => 0,
    }
}

/// Square of the pawn removed by an en-passant capture from `from` to `to`.
#[inline(always)]
pub fn en_passant_victim(from: u8, to: u8) -> u8 {
    (from & !7) | (to & 7)
}

impl Position {
    /// Board with no pieces, White to move, no rights. Callers must add both
    /// kings and then call [`Position::finish_setup`].
    pub(crate) fn empty() -> Self {
        Position {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupancy: [Bitboard::EMPTY; 2],
            board: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            history: Vec::new(),
            repetitions: RepetitionTable::new(),
        }
    }

    pub fn startpos() -> Self {
        let mut p = Position::empty();
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            let f = f as u8;
            p.put_piece(f, Piece::new(Color::White, kind));
            p.put_piece(8 + f, Piece::new(Color::White, PieceKind::Pawn));
            p.put_piece(48 + f, Piece::new(Color::Black, PieceKind::Pawn));
            p.put_piece(56 + f, Piece::new(Color::Black, kind));
        }
        p.castling = CastlingRights::ALL;
        p.finish_setup();
        p
    }

    /// Recompute the hash from scratch and start a fresh history whose
    /// repetition count includes the set-up position itself.
    pub(crate) fn finish_setup(&mut self) {
        self.hash = self.compute_hash();
        self.history.clear();
        self.repetitions.clear();
        self.repetitions.push(self.hash);
    }

    pub(crate) fn set_side_state(
        &mut self,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<u8>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) {
        self.side_to_move = side_to_move;
        self.castling = castling;
        self.en_passant = en_passant;
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline(always)]
    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]
    }

    #[inline(always)]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.idx()][kind.idx()]
    }

    #[inline(always)]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancy[color.idx()]
    }

    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.occupancy[0] | self.occupancy[1]
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    pub fn en_passant(&self) -> Option<u8> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Incrementally maintained Zobrist hash.
    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Number of moves applied since the position was set up.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|u| u.mv)
    }

    /// How often the current position has occurred on this line, itself
    /// included.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.count(self.hash)
    }

    /// Square of `color`'s king.
    ///
    /// # Panics
    /// If that king is missing, which no legal sequence of moves can cause.
    pub fn find_king(&self, color: Color) -> u8 {
        self.pieces(color, PieceKind::King)
            .lsb()
            .unwrap_or_else(|| panic!("{color:?} king missing from position"))
    }

    /// True if `color` has anything besides king and pawns.
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let c = &self.pieces[color.idx()];
        !(c[PieceKind::Knight.idx()]
            | c[PieceKind::Bishop.idx()]
            | c[PieceKind::Rook.idx()]
            | c[PieceKind::Queen.idx()])
        .is_empty()
    }

    /// Kind of the piece `mv` would capture, if any.
    pub fn captured_kind(&self, mv: Move) -> Option<PieceKind> {
        match mv.kind {
            MoveKind::EnPassant => Some(PieceKind::Pawn),
            MoveKind::Normal | MoveKind::Promotion(_) => self.piece_at(mv.to).map(|p| p.kind),
            MoveKind::Castle { .. } | MoveKind::Null => None,
        }
    }

    #[inline]
    pub fn is_capture(&self, mv: Move) -> bool {
        self.captured_kind(mv).is_some()
    }

    // =========================================================================
    // Attacks
    // =========================================================================

    /// Is `target` attacked by any piece of color `by`?
    ///
    /// Looks outward from the target: a pawn of `by` attacks `target` exactly
    /// when a pawn of the other color on `target` would attack it back.
    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        let them = &self.pieces[by.idx()];
        let occupied = self.occupied();

        if !(pawn_attacks(target, by.other()) & them[PieceKind::Pawn.idx()]).is_empty() {
            return true;
        }
        if !(knight_attacks(target) & them[PieceKind::Knight.idx()]).is_empty() {
            return true;
        }
        if !(king_attacks(target) & them[PieceKind::King.idx()]).is_empty() {
            return true;
        }
        let queens = them[PieceKind::Queen.idx()];
        if !(bishop_attacks(target, occupied) & (them[PieceKind::Bishop.idx()] | queens)).is_empty()
        {
            return true;
        }
        !(rook_attacks(target, occupied) & (them[PieceKind::Rook.idx()] | queens)).is_empty()
    }

    pub fn in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.find_king(color), color.other())
    }

    // =========================================================================
    // Mutation primitives
    // =========================================================================

    #[inline(always)]
    fn put_piece(&mut self, sq: u8, piece: Piece) {
        debug_assert!(self.board[sq as usize].is_none(), "square {sq} occupied");
        self.pieces[piece.color.idx()][piece.kind.idx()].set(sq);
        self.occupancy[piece.color.idx()].set(sq);
        self.board[sq as usize] = Some(piece);
        self.hash ^= ZOBRIST.piece_key(piece, sq);
    }

    #[inline(always)]
    fn remove_piece(&mut self, sq: u8) -> Piece {
        let piece = self.board[sq as usize]
            .take()
            .unwrap_or_else(|| panic!("no piece to remove on {}", sq_to_coord(sq)));
        self.pieces[piece.color.idx()][piece.kind.idx()].clear(sq);
        self.occupancy[piece.color.idx()].clear(sq);
        self.hash ^= ZOBRIST.piece_key(piece, sq);
        piece
    }

    #[inline(always)]
    fn move_piece(&mut self, from: u8, to: u8) {
        let piece = self.remove_piece(from);
        self.put_piece(to, piece);
    }

    /// Clear whatever stands on `sq` before a piece lands there.
    #[inline(always)]
    fn capture_on(&mut self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]?;
        let victim = self.remove_piece(sq);
        assert!(
            victim.kind != PieceKind::King,
            "move captures the king on {}",
            sq_to_coord(sq)
        );
        Some(victim)
    }

    /// Place a piece during setup (FEN parsing). Hash is fixed up by
    /// `finish_setup`.
    pub(crate) fn set_up_piece(&mut self, sq: u8, piece: Piece) {
        self.put_piece(sq, piece);
    }

    // =========================================================================
    // Make / undo
    // =========================================================================

    /// Apply `mv`, which must be pseudo-legal in this position (or
    /// [`Move::NULL`]). Pushes an undo record and a repetition entry.
    pub fn make_move(&mut self, mv: Move) {
        let us = self.side_to_move;
        let mut undo = Undo {
            mv,
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
        };

        if let Some(ep) = self.en_passant.take() {
            self.hash ^= ZOBRIST.ep_key(ep);
        }
        self.hash ^= ZOBRIST.castling_key(self.castling);

        let mut resets_clock = false;
        match mv.kind {
            MoveKind::Null => {}
            MoveKind::Normal => {
                undo.captured = self.capture_on(mv.to);
                self.move_piece(mv.from, mv.to);
                if let Some(Piece { kind: PieceKind::Pawn, .. }) = self.board[mv.to as usize] {
                    resets_clock = true;
                    if mv.from.abs_diff(mv.to) == 16 {
                        let ep = (mv.from + mv.to) / 2;
                        self.en_passant = Some(ep);
                        self.hash ^= ZOBRIST.ep_key(ep);
                    }
                }
            }
            MoveKind::Castle { rook_from, rook_to } => {
                self.move_piece(mv.from, mv.to);
                self.move_piece(rook_from, rook_to);
            }
            MoveKind::EnPassant => {
                undo.captured = Some(self.remove_piece(en_passant_victim(mv.from, mv.to)));
                self.move_piece(mv.from, mv.to);
                resets_clock = true;
            }
            MoveKind::Promotion(kind) => {
                undo.captured = self.capture_on(mv.to);
                self.remove_piece(mv.from);
                self.put_piece(mv.to, Piece::new(us, kind));
                resets_clock = true;
            }
        }
        resets_clock |= undo.captured.is_some();

        if !mv.is_null() {
            self.castling
                .remove(castling_loss(mv.from) | castling_loss(mv.to));
        }
        self.hash ^= ZOBRIST.castling_key(self.castling);

        self.halfmove_clock = if resets_clock {
            0
        } else {
            self.halfmove_clock + 1
        };
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = us.other();
        self.hash ^= ZOBRIST.side_to_move;

        self.history.push(undo);
        self.repetitions.push(self.hash);
    }

    /// Revert the most recent `make_move`.
    ///
    /// # Panics
    /// If no move has been made since setup.
    pub fn undo_move(&mut self) {
        let undo = self
            .history
            .pop()
            .expect("undo_move called with an empty move history");
        self.repetitions.pop();

        let mv = undo.mv;
        let mover = self.side_to_move.other();
        match mv.kind {
            MoveKind::Null => {}
            MoveKind::Normal => {
                self.move_piece(mv.to, mv.from);
                if let Some(captured) = undo.captured {
                    self.put_piece(mv.to, captured);
                }
            }
            MoveKind::Castle { rook_from, rook_to } => {
                self.move_piece(rook_to, rook_from);
                self.move_piece(mv.to, mv.from);
            }
            MoveKind::EnPassant => {
                self.move_piece(mv.to, mv.from);
                if let Some(captured) = undo.captured {
                    self.put_piece(en_passant_victim(mv.from, mv.to), captured);
                }
            }
            MoveKind::Promotion(_) => {
                self.remove_piece(mv.to);
                self.put_piece(mv.from, Piece::new(mover, PieceKind::Pawn));
                if let Some(captured) = undo.captured {
                    self.put_piece(mv.to, captured);
                }
            }
        }

        self.side_to_move = mover;
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.hash = undo.hash;
    }

    // =========================================================================
    // Hashing and transforms
    // =========================================================================

    /// Zobrist hash recomputed from the board and side state alone.
    pub fn compute_hash(&self) -> u64 {
        let mut hash = 0;
        for sq in self.occupied() {
            if let Some(piece) = self.piece_at(sq) {
                hash ^= ZOBRIST.piece_key(piece, sq);
            }
        }
        hash ^= ZOBRIST.castling_key(self.castling);
        if let Some(ep) = self.en_passant {
            hash ^= ZOBRIST.ep_key(ep);
        }
        hash ^ ZOBRIST.side_key(self.side_to_move)
    }

    /// The same position with colors swapped and ranks flipped. Evaluation
    /// of the result must be the exact negation of this one.
    pub fn mirrored(&self) -> Position {
        let mut p = Position::empty();
        for sq in self.occupied() {
            if let Some(piece) = self.piece_at(sq) {
                p.put_piece(mirror_sq(sq), Piece::new(piece.color.other(), piece.kind));
            }
        }
        let c = self.castling.0;
        p.set_side_state(
            self.side_to_move.other(),
            CastlingRights(((c & 3) << 2) | ((c >> 2) & 3)),
            self.en_passant.map(mirror_sq),
            self.halfmove_clock,
            self.fullmove_number,
        );
        p.finish_setup();
        p
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

/// Positions are equal when board and side state match; move history and
/// clocks are not compared.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
    }
}

impl Eq for Position {}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
