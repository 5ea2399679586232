//! Transposition table for the search driver.
//!
//! Fixed-size, power-of-two bucketing, replace-always. The board core only
//! ever sees the table through the hash move handed to the staged move
//! generator.

use crate::board::{Move, Score};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Clone, Copy)]
struct TtEntry {
    key: u64,
    mv: Move,
    score: i16,
    depth: i8,
    bound: Bound,
}

const EMPTY_ENTRY: TtEntry = TtEntry {
    key: 0,
    mv: Move::NULL,
    score: 0,
    depth: -1,
    bound: Bound::Upper,
};

#[derive(Clone, Copy, Debug)]
pub struct TtProbe {
    pub mv: Move,
    pub score: Score,
    pub depth: i32,
    pub bound: Bound,
}

pub struct TranspositionTable {
    entries: Vec<TtEntry>,
    mask: usize,
}

impl TranspositionTable {
    const ENTRY_SIZE: usize = std::mem::size_of::<TtEntry>();

    /// Create a table of roughly `mib` mebibytes (rounded down to a power
    /// of two entry count)
    #[must_use]
    pub fn new(mib: usize) -> Self {
        let entries = ((mib.max(1) * 1024 * 1024) / Self::ENTRY_SIZE)
            .next_power_of_two()
            / 2;
        let entries = entries.max(1024);

        TranspositionTable {
            entries: vec![EMPTY_ENTRY; entries],
            mask: entries - 1,
        }
    }

    pub fn resize(&mut self, mib: usize) {
        *self = TranspositionTable::new(mib);
    }

    pub fn clear(&mut self) {
        self.entries.fill(EMPTY_ENTRY);
    }

    #[must_use]
    pub fn probe(&self, key: u64) -> Option<TtProbe> {
        let entry = &self.entries[(key as usize) & self.mask];
        if entry.key == key && entry.depth >= 0 {
            Some(TtProbe {
                mv: entry.mv,
                score: Score::from(entry.score),
                depth: i32::from(entry.depth),
                bound: entry.bound,
            })
        } else {
            None
        }
    }

    pub fn store(&mut self, key: u64, mv: Move, score: Score, depth: i32, bound: Bound) {
        let idx = (key as usize) & self.mask;
        let entry = &mut self.entries[idx];

        // Keep an existing move if the new store has none
        let mv = if mv.is_null() && entry.key == key {
            entry.mv
        } else {
            mv
        };

        *entry = TtEntry {
            key,
            mv,
            score: score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16,
            depth: depth.clamp(0, 127) as i8,
            bound,
        };
    }
}
