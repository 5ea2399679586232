//! Pawn-structure cache.
//!
//! A direct-mapped table keyed by the pawn Zobrist key. Because the pawn
//! key covers only pawns and the side to move (no castling or en-passant
//! terms), an entry stays valid across every position that shares a pawn
//! skeleton, which is most of a search tree.
//!
//! Each searcher thread owns its own cache, so probes hand out plain
//! mutable references and writes are unconditional overwrites.

use crate::board::{Bitboard, TaperedScore};

#[derive(Clone, Copy, Debug, Default)]
pub struct PawnCacheEntry {
    pub key: u64,
    /// White-minus-black pawn structure score
    pub eval: TaperedScore,
    /// Passed pawns of both colors
    pub passers: Bitboard,
}

pub struct PawnCache {
    entries: Vec<PawnCacheEntry>,
    mask: usize,
}

impl PawnCache {
    /// Default size: 64k entries (1.5 MiB)
    pub const DEFAULT_ENTRIES: usize = 1 << 16;

    /// Create a cache with at least `entries` slots, rounded up to a power
    /// of two so probing is a mask
    #[must_use]
    pub fn new(entries: usize) -> Self {
        let entries = entries.next_power_of_two().max(1024);
        PawnCache {
            entries: vec![PawnCacheEntry::default(); entries],
            mask: entries - 1,
        }
    }

    /// The slot for `key`. The caller checks `entry.key == key` for a hit
    /// and overwrites the slot wholesale on a miss.
    #[inline]
    pub fn probe(&mut self, key: u64) -> &mut PawnCacheEntry {
        &mut self.entries[(key as usize) & self.mask]
    }

    pub fn clear(&mut self) {
        self.entries.fill(PawnCacheEntry::default());
    }
}

impl Default for PawnCache {
    fn default() -> Self {
        PawnCache::new(Self::DEFAULT_ENTRIES)
    }
}
