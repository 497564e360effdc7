//! Occurrence counting for threefold-repetition detection.

use std::collections::HashMap;

use nohash_hasher::BuildNoHashHasher;

/// Zobrist hash -> number of times it occurs on the current line, plus the
/// stack of hashes in the order they were pushed so `pop` can reverse
/// exactly the last `push`.
///
/// Zobrist keys are already uniformly random, so the map skips rehashing.
#[derive(Clone, Debug, Default)]
pub struct RepetitionTable {
    counts: HashMap<u64, u32, BuildNoHashHasher<u64>>,
    stack: Vec<u64>,
}

impl RepetitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hash: u64) {
        *self.counts.entry(hash).or_insert(0) += 1;
        self.stack.push(hash);
    }

    /// Undo the most recent `push`.
    ///
    /// # Panics
    /// If the table is empty; pushes and pops must pair up with make/undo.
    pub fn pop(&mut self) {
        let hash = self
            .stack
            .pop()
            .expect("repetition table popped more often than pushed");
        match self.counts.get_mut(&hash) {
            Some(count) if *count > 1 => *count -= 1,
            _ => {
                self.counts.remove(&hash);
            }
        }
    }

    pub fn count(&self, hash: u64) -> u32 {
        self.counts.get(&hash).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.stack.clear();
    }
}

#[cfg(test)]
#[path = "repetition_tests.rs"]
mod repetition_tests;
