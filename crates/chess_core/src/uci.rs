//! Coordinate move notation ("e2e4", "e7e8q") and UCI `position` setup.

use thiserror::Error;

use crate::board::Position;
use crate::fen::FenError;
use crate::movegen::legal_moves;
use crate::types::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("move '{0}' must be 4 or 5 characters")]
    Length(String),

    #[error("invalid square in move '{0}'")]
    Square(String),

    #[error("invalid promotion piece in move '{0}'")]
    Promotion(String),

    #[error("move '{0}' is not legal in this position")]
    Illegal(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionCommandError {
    #[error("expected 'startpos' or 'fen <fen>'")]
    MissingSetup,

    #[error(transparent)]
    Fen(#[from] FenError),

    #[error(transparent)]
    Move(#[from] MoveParseError),
}

pub fn move_to_uci(mv: Move) -> String {
    mv.to_string()
}

/// Resolve coordinate text against the legal moves of `pos`, so the result
/// carries the right castle / en-passant payload.
pub fn parse_uci_move(pos: &Position, txt: &str) -> Result<Move, MoveParseError> {
    if !(4..=5).contains(&txt.len()) || !txt.is_ascii() {
        return Err(MoveParseError::Length(txt.to_string()));
    }
    let square = |s: &str| coord_to_sq(s).ok_or_else(|| MoveParseError::Square(txt.to_string()));
    let from = square(&txt[0..2])?;
    let to = square(&txt[2..4])?;
    let promo = match txt[4..].chars().next() {
        None => None,
        Some(c) => match PieceKind::from_char(c) {
            Some(kind) if PieceKind::PROMOTIONS.contains(&kind) => Some(kind),
            _ => return Err(MoveParseError::Promotion(txt.to_string())),
        },
    };

    legal_moves(pos)
        .into_iter()
        .find(|m| m.from == from && m.to == to && m.promotion() == promo)
        .ok_or_else(|| MoveParseError::Illegal(txt.to_string()))
}

/// Apply the arguments of a UCI `position` command:
/// `startpos [moves ...]` or `fen <fields> [moves ...]`.
pub fn set_position_from_uci(args: &[&str]) -> Result<Position, PositionCommandError> {
    let moves_at = args.iter().position(|&a| a == "moves").unwrap_or(args.len());
    let (setup, moves) = args.split_at(moves_at);

    let mut pos = match setup.split_first() {
        Some((&"startpos", _)) => Position::startpos(),
        Some((&"fen", fields)) => Position::from_fen(&fields.join(" "))?,
        _ => return Err(PositionCommandError::MissingSetup),
    };

    for txt in moves.iter().skip(1) {
        let mv = parse_uci_move(&pos, txt)?;
        pos.make_move(mv);
    }
    Ok(pos)
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
