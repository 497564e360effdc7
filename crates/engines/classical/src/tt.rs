//! Bucketed transposition table.
//!
//! `2^n` buckets of a fixed number of slots each. A store overwrites the slot
//! already holding the same hash, else an empty slot, else the slot that is
//! cheapest to lose: old entries and entries shallower than the new one go
//! first. The age counter only drives replacement, never probe results.
//!
//! Mate scores are stored relative to the node rather than the root, so an
//! entry can be reused at a different distance from the root.

use std::mem::size_of;

use chess_core::Move;

use crate::{MATE_SCORE, MAX_PLY};

/// Slots per bucket in the main table.
pub const MAIN_BUCKET_SLOTS: usize = 4;
/// Quiescence results go to their own small table so they never evict
/// main-search entries.
pub const QUIESCENCE_BUCKETS_LOG2: u32 = 16;
pub const QUIESCENCE_BUCKET_SLOTS: usize = 2;

/// Memory taken by one bucket of the main table.
pub const BUCKET_BYTES: usize = size_of::<[Option<Entry>; MAIN_BUCKET_SLOTS]>();

const MAX_AGE_DIFF: u8 = 10;

/// How the stored score relates to the true value of the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    /// Exact score, every move searched inside the window.
    Exact,
    /// Fail-high: the true score is at least this.
    LowerBound,
    /// Fail-low: the true score is at most this.
    UpperBound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub hash: u64,
    /// Node-relative; see [`score_to_tt`].
    pub score: i32,
    pub depth: u8,
    pub node_type: NodeType,
    pub best_move: Option<Move>,
    pub age: u8,
}

/// What a probe learned about a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Probe {
    /// Set when the entry is deep enough and its bound settles the window.
    pub score: Option<i32>,
    /// Best move of any matching entry, usable for ordering even when the
    /// score is not.
    pub best_move: Option<Move>,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    slots: Vec<Option<Entry>>,
    bucket_mask: u64,
    bucket_slots: usize,
    age: u8,
}

impl TranspositionTable {
    /// Table with `2^buckets_log2` buckets of `bucket_slots` entries.
    ///
    /// # Panics
    /// If `bucket_slots` is not in `1..=8`.
    pub fn new(buckets_log2: u32, bucket_slots: usize) -> Self {
        assert!(
            (1..=8).contains(&bucket_slots),
            "bucket size must be between 1 and 8, got {bucket_slots}"
        );
        let buckets = 1usize << buckets_log2;
        Self {
            slots: vec![None; buckets * bucket_slots],
            bucket_mask: (buckets - 1) as u64,
            bucket_slots,
            age: 0,
        }
    }

    pub fn main(buckets_log2: u32) -> Self {
        Self::new(buckets_log2, MAIN_BUCKET_SLOTS)
    }

    pub fn quiescence() -> Self {
        Self::new(QUIESCENCE_BUCKETS_LOG2, QUIESCENCE_BUCKET_SLOTS)
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    /// Called once per top-level search.
    pub fn increment_age(&mut self) {
        self.age = self.age.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.age = 0;
    }

    #[inline]
    fn bucket(&self, hash: u64) -> std::ops::Range<usize> {
        let start = (hash & self.bucket_mask) as usize * self.bucket_slots;
        start..start + self.bucket_slots
    }

    /// The entry stored for `hash`, if any. Its score is node-relative.
    pub fn get(&self, hash: u64) -> Option<&Entry> {
        self.slots[self.bucket(hash)]
            .iter()
            .flatten()
            .find(|e| e.hash == hash)
    }

    /// Look up `hash` for a node at `ply` searched to `depth` with window
    /// `(alpha, beta)`.
    pub fn probe(&self, hash: u64, depth: u8, alpha: i32, beta: i32, ply: usize) -> Probe {
        let Some(entry) = self.get(hash) else {
            return Probe::default();
        };
        let mut probe = Probe {
            score: None,
            best_move: entry.best_move,
        };
        if entry.depth < depth {
            return probe;
        }
        let score = score_from_tt(entry.score, ply);
        let usable = match entry.node_type {
            NodeType::Exact => true,
            NodeType::LowerBound => score >= beta,
            NodeType::UpperBound => score <= alpha,
        };
        if usable {
            probe.score = Some(score);
        }
        probe
    }

    /// Record a search result. `score` is root-relative as the search sees
    /// it at `ply`.
    pub fn store(
        &mut self,
        hash: u64,
        score: i32,
        depth: u8,
        best_move: Option<Move>,
        node_type: NodeType,
        ply: usize,
    ) {
        let entry = Entry {
            hash,
            score: score_to_tt(score, ply),
            depth,
            node_type,
            best_move,
            age: self.age,
        };
        let range = self.bucket(hash);
        let start = range.start;
        let bucket = &self.slots[range];

        let slot = bucket
            .iter()
            .position(|s| matches!(s, Some(e) if e.hash == hash))
            .or_else(|| bucket.iter().position(Option::is_none))
            .unwrap_or_else(|| self.replacement_slot(bucket, depth));
        self.slots[start + slot] = Some(entry);
    }

    /// Index in `bucket` of the entry most worth losing. Ties keep the
    /// earlier slot.
    fn replacement_slot(&self, bucket: &[Option<Entry>], new_depth: u8) -> usize {
        let mut worst = 0;
        let mut worst_score = -1;
        for (i, entry) in bucket.iter().enumerate() {
            let Some(entry) = entry else {
                return i;
            };
            let score = self.replacement_score(entry, new_depth);
            if score > worst_score {
                worst_score = score;
                worst = i;
            }
        }
        worst
    }

    fn replacement_score(&self, entry: &Entry, new_depth: u8) -> i32 {
        let age_diff = self.age.wrapping_sub(entry.age).min(MAX_AGE_DIFF);
        let depth_deficit = new_depth.saturating_sub(entry.depth);
        age_diff as i32 * 2 + depth_deficit as i32 * 3
    }

    /// Occupied slots per thousand, sampled from the first thousand slots.
    pub fn hashfull(&self) -> u32 {
        let sample = self.slots.len().min(1000);
        let used = self.slots[..sample].iter().filter(|s| s.is_some()).count();
        (used * 1000 / sample.max(1)) as u32
    }
}

const MATE_BOUND: i32 = MATE_SCORE - MAX_PLY as i32;

/// Convert a root-relative mate score at `ply` into a node-relative one.
#[inline]
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score + ply as i32
    } else if score <= -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`].
#[inline]
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score - ply as i32
    } else if score <= -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

#[cfg(test)]
#[path = "tt_tests.rs"]
mod tt_tests;
