//! 64-bit square sets. Bit `n` is square `n`: a1 = 0, h1 = 7, a8 = 56,
//! h8 = 63.
//!
//! Iterating a `Bitboard` pops squares from the low end, so
//! `for sq in pawns { .. }` visits a1 first and consumes the copy.

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const ALL: Bitboard = Bitboard(u64::MAX);

    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_H: Bitboard = Bitboard(Self::FILE_A.0 << 7);
    pub const RANK_1: Bitboard = Bitboard(0xFF);
    pub const RANK_4: Bitboard = Bitboard(Self::RANK_1.0 << 24);
    pub const RANK_5: Bitboard = Bitboard(Self::RANK_1.0 << 32);
    pub const RANK_8: Bitboard = Bitboard(Self::RANK_1.0 << 56);

    /// Leaper masks: targets that would wrap around the board edge.
    pub const NOT_FILE_A: Bitboard = Bitboard(!Self::FILE_A.0);
    pub const NOT_FILE_H: Bitboard = Bitboard(!Self::FILE_H.0);
    pub const NOT_FILE_AB: Bitboard = Bitboard(!(Self::FILE_A.0 | Self::FILE_A.0 << 1));
    pub const NOT_FILE_GH: Bitboard = Bitboard(!(Self::FILE_H.0 | Self::FILE_H.0 >> 1));

    #[inline(always)]
    pub const fn from_square(sq: u8) -> Self {
        debug_assert!(sq < 64, "square out of range");
        Bitboard(1 << sq)
    }

    /// File `0..8`, a to h.
    #[inline(always)]
    pub const fn file(file: u8) -> Self {
        debug_assert!(file < 8);
        Bitboard(Self::FILE_A.0 << file)
    }

    /// Rank `0..8`, first to eighth.
    #[inline(always)]
    pub const fn rank(rank: u8) -> Self {
        debug_assert!(rank < 8);
        Bitboard(Self::RANK_1.0 << (8 * rank))
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn contains(self, sq: u8) -> bool {
        self.0 & Self::from_square(sq).0 != 0
    }

    #[inline(always)]
    pub fn set(&mut self, sq: u8) {
        self.0 |= Self::from_square(sq).0;
    }

    #[inline(always)]
    pub fn clear(&mut self, sq: u8) {
        self.0 &= !Self::from_square(sq).0;
    }

    #[inline(always)]
    pub const fn popcount(self) -> u32 {
        self.0.count_ones()
    }

    /// Lowest set square.
    #[inline(always)]
    pub const fn lsb(self) -> Option<u8> {
        match self.0 {
            0 => None,
            bits => Some(bits.trailing_zeros() as u8),
        }
    }

    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<u8> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    // One-square shifts. East and west drop whatever would wrap to the
    // opposite edge.

    #[inline(always)]
    pub const fn north(self) -> Bitboard {
        Bitboard(self.0 << 8)
    }

    #[inline(always)]
    pub const fn south(self) -> Bitboard {
        Bitboard(self.0 >> 8)
    }

    #[inline(always)]
    pub const fn east(self) -> Bitboard {
        Bitboard(self.0 << 1 & Self::NOT_FILE_A.0)
    }

    #[inline(always)]
    pub const fn west(self) -> Bitboard {
        Bitboard(self.0 >> 1 & Self::NOT_FILE_H.0)
    }
}

macro_rules! bit_ops {
    ($($op:ident $method:ident $assign:ident $assign_method:ident: $sym:tt;)*) => {$(
        impl $op for Bitboard {
            type Output = Bitboard;
            #[inline(always)]
            fn $method(self, rhs: Bitboard) -> Bitboard {
                Bitboard(self.0 $sym rhs.0)
            }
        }

        impl $assign for Bitboard {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Bitboard) {
                *self = *self $sym rhs;
            }
        }
    )*};
}

bit_ops! {
    BitAnd bitand BitAndAssign bitand_assign: &;
    BitOr bitor BitOrAssign bitor_assign: |;
    BitXor bitxor BitXorAssign bitxor_assign: ^;
}

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline(always)]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl Iterator for Bitboard {
    type Item = u8;

    #[inline(always)]
    fn next(&mut self) -> Option<u8> {
        self.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.popcount() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Bitboard {}

#[cfg(test)]
#[path = "bitboard_tests.rs"]
mod bitboard_tests;
