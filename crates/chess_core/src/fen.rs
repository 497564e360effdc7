//! FEN import/export. Malformed input is rejected here so the rest of the
//! crate can assume a well-formed position.

use thiserror::Error;

use crate::bitboard::Bitboard;
use crate::board::Position;
use crate::types::*;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected at least 4 space-separated fields, found {0}")]
    MissingFields(usize),

    #[error("board must have 8 ranks separated by '/', found {0}")]
    RankCount(usize),

    #[error("rank {rank} does not describe exactly 8 squares")]
    RankWidth { rank: u8 },

    #[error("invalid piece letter '{0}'")]
    PieceLetter(char),

    #[error("invalid side to move '{0}'")]
    SideToMove(String),

    #[error("invalid castling field '{0}'")]
    Castling(String),

    #[error("invalid en-passant square '{0}'")]
    EnPassant(String),

    #[error("invalid {field} '{value}'")]
    Clock { field: &'static str, value: String },

    #[error("expected exactly one {color:?} king, found {count}")]
    KingCount { color: Color, count: u32 },

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(String),

    #[error("side not to move is in check")]
    OpponentInCheck,
}

impl Position {
    /// Parse a FEN string. The half-move clock and full-move number are
    /// optional and default to 0 and 1.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::MissingFields(parts.len()));
        }

        let mut pos = Position::empty();
        parse_board(&mut pos, parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };
        let castling = parse_castling(parts[2])?;
        let en_passant = parse_en_passant(parts[3], side_to_move)?;
        let halfmove_clock = parse_clock(parts.get(4).copied(), "half-move clock", 0)?;
        let fullmove_number = parse_clock(parts.get(5).copied(), "full-move number", 1)?.max(1);

        for color in Color::ALL {
            let count = pos.pieces(color, PieceKind::King).popcount();
            if count != 1 {
                return Err(FenError::KingCount { color, count });
            }
        }
        let back_ranks = Bitboard::RANK_1 | Bitboard::RANK_8;
        let pawns =
            pos.pieces(Color::White, PieceKind::Pawn) | pos.pieces(Color::Black, PieceKind::Pawn);
        if let Some(sq) = (pawns & back_ranks).lsb() {
            return Err(FenError::PawnOnBackRank(sq_to_coord(sq)));
        }

        pos.set_side_state(
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        );
        if pos.in_check(side_to_move.other()) {
            return Err(FenError::OpponentInCheck);
        }
        pos.finish_setup();
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(rank * 8 + file) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move() {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        let rights = self.castling();
        if rights == CastlingRights::NONE {
            fen.push('-');
        } else {
            for (flag, c) in [
                (CastlingRights::WHITE_KING, 'K'),
                (CastlingRights::WHITE_QUEEN, 'Q'),
                (CastlingRights::BLACK_KING, 'k'),
                (CastlingRights::BLACK_QUEEN, 'q'),
            ] {
                if rights.has(flag) {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        match self.en_passant() {
            Some(ep) => fen.push_str(&sq_to_coord(ep)),
            None => fen.push('-'),
        }
        fen.push_str(&format!(
            " {} {}",
            self.halfmove_clock(),
            self.fullmove_number()
        ));
        fen
    }
}

fn parse_board(pos: &mut Position, board: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = board.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }

    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_idx as u8; // FEN lists rank 8 .. 1
        let mut file = 0u8;
        for ch in rank_str.chars() {
            if let Some(d) = ch.to_digit(10) {
                if d == 0 || d > 8 {
                    return Err(FenError::RankWidth { rank: rank + 1 });
                }
                file += d as u8;
            } else {
                let kind = PieceKind::from_char(ch).ok_or(FenError::PieceLetter(ch))?;
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                if file >= 8 {
                    return Err(FenError::RankWidth { rank: rank + 1 });
                }
                pos.set_up_piece(rank * 8 + file, Piece::new(color, kind));
                file += 1;
            }
            if file > 8 {
                return Err(FenError::RankWidth { rank: rank + 1 });
            }
        }
        if file != 8 {
            return Err(FenError::RankWidth { rank: rank + 1 });
        }
    }
    Ok(())
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::NONE;
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        let flag = match c {
            'K' => CastlingRights::WHITE_KING,
            'Q' => CastlingRights::WHITE_QUEEN,
            'k' => CastlingRights::BLACK_KING,
            'q' => CastlingRights::BLACK_QUEEN,
            _ => return Err(FenError::Castling(field.to_string())),
        };
        rights.insert(flag);
    }
    Ok(rights)
}

/// The target square must sit behind a pawn that the side not to move
/// just pushed two squares.
fn parse_en_passant(field: &str, side_to_move: Color) -> Result<Option<u8>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let sq = coord_to_sq(field).ok_or_else(|| FenError::EnPassant(field.to_string()))?;
    let expected_rank = match side_to_move {
        Color::White => 5,
        Color::Black => 2,
    };
    if rank_of(sq) != expected_rank {
        return Err(FenError::EnPassant(field.to_string()));
    }
    Ok(Some(sq))
}

fn parse_clock(field: Option<&str>, name: &'static str, default: u32) -> Result<u32, FenError> {
    match field {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| FenError::Clock {
            field: name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "fen_tests.rs"]
mod fen_tests;
