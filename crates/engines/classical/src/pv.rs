//! Triangular principal-variation table.
//!
//! Row `ply` holds the best line found from that ply down. When a move
//! raises alpha at `ply`, the row becomes that move followed by row
//! `ply + 1`.

use chess_core::Move;

use crate::MAX_PLY;

#[derive(Debug, Clone)]
pub struct PvTable {
    moves: Vec<[Move; MAX_PLY]>,
    len: [usize; MAX_PLY + 1],
}

impl Default for PvTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PvTable {
    pub fn new() -> Self {
        Self {
            moves: vec![[Move::NULL; MAX_PLY]; MAX_PLY],
            len: [0; MAX_PLY + 1],
        }
    }

    /// Forget the line at `ply`, on entering a node there.
    #[inline]
    pub fn clear_ply(&mut self, ply: usize) {
        if ply <= MAX_PLY {
            self.len[ply] = 0;
        }
    }

    /// `mv` is the new best move at `ply`.
    pub fn update(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        let child_len = if ply + 1 < MAX_PLY { self.len[ply + 1] } else { 0 };
        let (head, tail) = self.moves.split_at_mut(ply + 1);
        let row = &mut head[ply];
        row[ply] = mv;
        if child_len > 0 {
            let child = &tail[0];
            row[ply + 1..ply + 1 + child_len].copy_from_slice(&child[ply + 1..ply + 1 + child_len]);
        }
        self.len[ply] = child_len + 1;
    }

    /// Best line from `ply`.
    pub fn line(&self, ply: usize) -> &[Move] {
        if ply >= MAX_PLY {
            return &[];
        }
        &self.moves[ply][ply..ply + self.len[ply]]
    }

    /// Best line from the root.
    pub fn root_line(&self) -> &[Move] {
        self.line(0)
    }
}

#[cfg(test)]
#[path = "pv_tests.rs"]
mod pv_tests;
