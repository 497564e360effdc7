//! Chess rules core: bitboards, magic attack tables, a make/undo position
//! with incremental Zobrist hashing, legal move generation and the FEN /
//! coordinate-move adapters used at the boundary.

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod fen;
pub mod magic;
pub mod movegen;
pub mod perft;
pub mod repetition;
pub mod rules;
pub mod time_control;
pub mod types;
pub mod uci;
pub mod zobrist;

pub use attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks};
pub use bitboard::*;
pub use board::*;
pub use fen::{FenError, STARTPOS_FEN};
pub use movegen::*;
pub use perft::{perft, perft_divide};
pub use repetition::RepetitionTable;
pub use rules::*;
pub use time_control::*;
pub use types::*;
pub use uci::*;
pub use zobrist::ZOBRIST;
