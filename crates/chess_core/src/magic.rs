//! Magic-bitboard tables for bishop and rook attacks.
//!
//! Magics are searched at first use from a fixed seed, so the tables are the
//! same on every run. Each candidate is checked against the slow ray walker
//! for every blocker subset before it is accepted; a destructive collision
//! (two subsets with different attack sets sharing an index) rejects it.

use std::sync::LazyLock;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::attacks::{bishop_attacks_slow, rook_attacks_slow};
use crate::bitboard::Bitboard;

const MAGIC_SEED: u64 = 0x0C0F_FEE0_5EED_1234;

/// Candidates whose top byte of `mask * magic` has fewer bits than this are
/// skipped without verification; they almost never index well.
const MIN_HIGH_BITS: u32 = 6;

pub(crate) static SLIDERS: LazyLock<SliderTables> = LazyLock::new(SliderTables::build);

/// Force table construction. Useful before timing-sensitive work.
pub fn init() {
    LazyLock::force(&SLIDERS);
}

#[derive(Clone, Copy, Debug)]
struct MagicEntry {
    mask: Bitboard,
    magic: u64,
    shift: u32,
    offset: usize,
}

impl MagicEntry {
    #[inline(always)]
    fn index(&self, occupied: Bitboard) -> usize {
        let relevant = (occupied & self.mask).0;
        self.offset + (relevant.wrapping_mul(self.magic) >> self.shift) as usize
    }
}

#[derive(Clone, Copy, Debug)]
enum Slider {
    Bishop,
    Rook,
}

impl Slider {
    /// Squares whose occupancy can change the attack set. Board edges are
    /// left out since a ray always stops there anyway.
    fn relevant_mask(self, sq: u8) -> Bitboard {
        match self {
            Slider::Bishop => {
                let edges = Bitboard::FILE_A | Bitboard::FILE_H | Bitboard::RANK_1 | Bitboard::RANK_8;
                bishop_attacks_slow(sq, Bitboard::EMPTY) & !edges
            }
            Slider::Rook => {
                let file = Bitboard::file(sq % 8) & !(Bitboard::RANK_1 | Bitboard::RANK_8);
                let rank = Bitboard::rank(sq / 8) & !(Bitboard::FILE_A | Bitboard::FILE_H);
                (file | rank) & !Bitboard::from_square(sq)
            }
        }
    }

    fn slow_attacks(self, sq: u8, occupied: Bitboard) -> Bitboard {
        match self {
            Slider::Bishop => bishop_attacks_slow(sq, occupied),
            Slider::Rook => rook_attacks_slow(sq, occupied),
        }
    }
}

pub(crate) struct SliderTables {
    bishop: Vec<MagicEntry>,
    rook: Vec<MagicEntry>,
    attacks: Vec<Bitboard>,
}

impl SliderTables {
    #[inline(always)]
    pub(crate) fn bishop(&self, sq: u8, occupied: Bitboard) -> Bitboard {
        self.attacks[self.bishop[sq as usize].index(occupied)]
    }

    #[inline(always)]
    pub(crate) fn rook(&self, sq: u8, occupied: Bitboard) -> Bitboard {
        self.attacks[self.rook[sq as usize].index(occupied)]
    }

    fn build() -> Self {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(MAGIC_SEED);
        let mut attacks = Vec::new();
        let bishop = build_entries(Slider::Bishop, &mut rng, &mut attacks);
        let rook = build_entries(Slider::Rook, &mut rng, &mut attacks);
        debug!(
            entries = attacks.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built magic slider tables"
        );
        Self {
            bishop,
            rook,
            attacks,
        }
    }
}

/// The `index`-th subset of `mask`: bit `i` of `index` decides whether the
/// `i`-th lowest square of the mask is occupied.
fn occupancy_subset(index: usize, mask: Bitboard) -> Bitboard {
    let mut subset = Bitboard::EMPTY;
    for (i, sq) in mask.enumerate() {
        if index & (1 << i) != 0 {
            subset.set(sq);
        }
    }
    subset
}

fn build_entries(slider: Slider, rng: &mut StdRng, table: &mut Vec<Bitboard>) -> Vec<MagicEntry> {
    (0..64u8)
        .map(|sq| {
            let mask = slider.relevant_mask(sq);
            let bits = mask.popcount();
            let occupancies: Vec<Bitboard> = (0..1usize << bits)
                .map(|i| occupancy_subset(i, mask))
                .collect();
            let reference: Vec<Bitboard> = occupancies
                .iter()
                .map(|&occ| slider.slow_attacks(sq, occ))
                .collect();

            let magic = find_magic(mask, bits, &occupancies, &reference, rng);
            let entry = MagicEntry {
                mask,
                magic,
                shift: 64 - bits,
                offset: table.len(),
            };
            table.resize(table.len() + occupancies.len(), Bitboard::EMPTY);
            for (&occ, &attack) in occupancies.iter().zip(&reference) {
                table[entry.index(occ)] = attack;
            }
            entry
        })
        .collect()
}

fn find_magic(
    mask: Bitboard,
    bits: u32,
    occupancies: &[Bitboard],
    reference: &[Bitboard],
    rng: &mut StdRng,
) -> u64 {
    let shift = 64 - bits;
    let mut used = vec![Bitboard::EMPTY; occupancies.len()];
    // Slot is live for the current attempt only when its epoch matches.
    let mut epoch = vec![0u32; occupancies.len()];
    let mut attempt = 0u32;

    loop {
        let candidate = rng.r#gen::<u64>() & rng.r#gen::<u64>() & rng.r#gen::<u64>();
        if (mask.0.wrapping_mul(candidate) >> 56).count_ones() < MIN_HIGH_BITS {
            continue;
        }
        attempt += 1;

        let collision_free = occupancies.iter().zip(reference).all(|(occ, &attack)| {
            let idx = (occ.0.wrapping_mul(candidate) >> shift) as usize;
            if epoch[idx] != attempt {
                epoch[idx] = attempt;
                used[idx] = attack;
                true
            } else {
                used[idx] == attack
            }
        });
        if collision_free {
            return candidate;
        }
    }
}

#[cfg(test)]
#[path = "magic_tests.rs"]
mod magic_tests;
