//! Magic bitboard tables for sliding piece attacks.
//!
//! At startup this module computes, for every square, the relevant-occupancy
//! mask, a collision-free magic multiplier, and a flat attack table. A
//! lookup is then `table[offset + ((occ & mask) * magic >> shift)]`.
//!
//! The magic search uses a deterministically seeded RNG, so the discovered
//! multipliers (and thus the table layout) are identical on every run.

use once_cell::sync::Lazy;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::board::types::Bitboard;

const ROOK_DELTAS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DELTAS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Total rook attack entries: sum over squares of 2^(relevant occupancy bits)
const ROOK_TABLE_SIZE: usize = 102_400;
/// Total bishop attack entries
const BISHOP_TABLE_SIZE: usize = 5_248;

struct MagicEntry {
    mask: Bitboard,
    magic: u64,
    shift: u32,
    offset: usize,
}

pub(crate) struct SliderTables {
    rook_magics: Vec<MagicEntry>,
    bishop_magics: Vec<MagicEntry>,
    rook_attacks: Vec<Bitboard>,
    bishop_attacks: Vec<Bitboard>,
}

pub(crate) static SLIDER_TABLES: Lazy<SliderTables> = Lazy::new(SliderTables::generate);

impl SliderTables {
    #[inline]
    pub(crate) fn rook_attacks(&self, sq: usize, occ: Bitboard) -> Bitboard {
        let entry = &self.rook_magics[sq];
        let idx = ((occ.0 & entry.mask.0).wrapping_mul(entry.magic) >> entry.shift) as usize;
        self.rook_attacks[entry.offset + idx]
    }

    #[inline]
    pub(crate) fn bishop_attacks(&self, sq: usize, occ: Bitboard) -> Bitboard {
        let entry = &self.bishop_magics[sq];
        let idx = ((occ.0 & entry.mask.0).wrapping_mul(entry.magic) >> entry.shift) as usize;
        self.bishop_attacks[entry.offset + idx]
    }

    fn generate() -> Self {
        let mut rng = SmallRng::seed_from_u64(0xB105_F00D_5EED);

        let (rook_magics, rook_attacks) =
            build_piece_tables(&mut rng, &ROOK_DELTAS, true, ROOK_TABLE_SIZE);
        let (bishop_magics, bishop_attacks) =
            build_piece_tables(&mut rng, &BISHOP_DELTAS, false, BISHOP_TABLE_SIZE);

        SliderTables {
            rook_magics,
            bishop_magics,
            rook_attacks,
            bishop_attacks,
        }
    }
}

/// Relevant occupancy mask: the attack rays with board-edge squares trimmed,
/// since a blocker on the edge cannot change the attack set.
fn relevant_mask(sq: usize, deltas: &[(isize, isize)], rook: bool) -> Bitboard {
    let mut mask = 0u64;
    let r = (sq / 8) as isize;
    let f = (sq % 8) as isize;

    for &(dr, df) in deltas {
        let mut nr = r + dr;
        let mut nf = f + df;
        while (0..8).contains(&nr) && (0..8).contains(&nf) {
            // For rooks the edge square of the shared rank/file is
            // irrelevant; for bishops every edge square is
            let on_edge = if rook {
                (dr != 0 && !(1..7).contains(&nr)) || (df != 0 && !(1..7).contains(&nf))
            } else {
                !(1..7).contains(&nr) || !(1..7).contains(&nf)
            };
            if on_edge {
                break;
            }
            mask |= 1u64 << ((nr as usize) * 8 + (nf as usize));
            nr += dr;
            nf += df;
        }
    }

    Bitboard(mask)
}

/// Slow ray walk used only while building the tables
fn slider_attacks_slow(sq: usize, occ: Bitboard, deltas: &[(isize, isize)]) -> Bitboard {
    let mut attacks = 0u64;
    let r = (sq / 8) as isize;
    let f = (sq % 8) as isize;

    for &(dr, df) in deltas {
        let mut nr = r + dr;
        let mut nf = f + df;
        while (0..8).contains(&nr) && (0..8).contains(&nf) {
            let bit = 1u64 << ((nr as usize) * 8 + (nf as usize));
            attacks |= bit;
            if occ.0 & bit != 0 {
                break;
            }
            nr += dr;
            nf += df;
        }
    }

    Bitboard(attacks)
}

/// Enumerate every subset of `mask` (the carry-rippler trick)
fn occupancy_subsets(mask: Bitboard) -> Vec<Bitboard> {
    let mut subsets = Vec::with_capacity(1 << mask.popcount());
    let mut subset = 0u64;
    loop {
        subsets.push(Bitboard(subset));
        subset = subset.wrapping_sub(mask.0) & mask.0;
        if subset == 0 {
            break;
        }
    }
    subsets
}

/// Sparse random numbers make better magic candidates
fn sparse_random(rng: &mut SmallRng) -> u64 {
    rng.next_u64() & rng.next_u64() & rng.next_u64()
}

fn build_piece_tables(
    rng: &mut SmallRng,
    deltas: &[(isize, isize)],
    rook: bool,
    table_size: usize,
) -> (Vec<MagicEntry>, Vec<Bitboard>) {
    let mut magics = Vec::with_capacity(64);
    let mut table = vec![Bitboard::EMPTY; table_size];
    let mut offset = 0usize;

    for sq in 0..64 {
        let mask = relevant_mask(sq, deltas, rook);
        let bits = mask.popcount();
        let size = 1usize << bits;
        let shift = 64 - bits;

        let subsets = occupancy_subsets(mask);
        let attacks: Vec<Bitboard> = subsets
            .iter()
            .map(|&occ| slider_attacks_slow(sq, occ, deltas))
            .collect();

        let magic = loop {
            let candidate = sparse_random(rng);

            // Reject candidates whose products have too few high bits set;
            // they collide almost always (trick borrowed from Stockfish)
            if (mask.0.wrapping_mul(candidate) & 0xFF00_0000_0000_0000).count_ones() < 6 {
                continue;
            }

            let slots = &mut table[offset..offset + size];
            let mut seen = vec![false; size];
            let mut ok = true;

            for (occ, attack) in subsets.iter().zip(&attacks) {
                let idx = (occ.0.wrapping_mul(candidate) >> shift) as usize;
                if seen[idx] && slots[idx] != *attack {
                    ok = false;
                    break;
                }
                seen[idx] = true;
                slots[idx] = *attack;
            }

            if ok {
                break candidate;
            }
            // Collision: wipe this square's slots and try another candidate
            slots.fill(Bitboard::EMPTY);
        };

        magics.push(MagicEntry {
            mask,
            magic,
            shift,
            offset,
        });
        offset += size;
    }

    debug_assert_eq!(offset, table_size);
    (magics, table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevant_mask_bit_counts() {
        // Corner rook: 12 relevant bits, central rook: 10
        assert_eq!(relevant_mask(0, &ROOK_DELTAS, true).popcount(), 12);
        assert_eq!(relevant_mask(27, &ROOK_DELTAS, true).popcount(), 10);
        // Central bishop: 9, corner bishop: 6
        assert_eq!(relevant_mask(27, &BISHOP_DELTAS, false).popcount(), 9);
        assert_eq!(relevant_mask(0, &BISHOP_DELTAS, false).popcount(), 6);
    }

    #[test]
    fn test_table_sizes() {
        let rook_total: usize = (0..64)
            .map(|sq| 1usize << relevant_mask(sq, &ROOK_DELTAS, true).popcount())
            .sum();
        let bishop_total: usize = (0..64)
            .map(|sq| 1usize << relevant_mask(sq, &BISHOP_DELTAS, false).popcount())
            .sum();
        assert_eq!(rook_total, ROOK_TABLE_SIZE);
        assert_eq!(bishop_total, BISHOP_TABLE_SIZE);
    }

    #[test]
    fn test_magic_lookup_matches_slow_walk() {
        // Spot-check the magic-indexed tables against the ray walk on
        // hand-chosen occupancies
        let occs = [
            Bitboard::EMPTY,
            Bitboard(0x0000_0010_0800_4200),
            Bitboard(0x00FF_0000_0000_FF00),
            Bitboard(0x8142_2418_1824_4281),
        ];
        for sq in [0, 7, 27, 36, 56, 63] {
            for &occ in &occs {
                assert_eq!(
                    SLIDER_TABLES.rook_attacks(sq, occ),
                    slider_attacks_slow(sq, occ, &ROOK_DELTAS),
                    "rook mismatch on sq {sq}"
                );
                assert_eq!(
                    SLIDER_TABLES.bishop_attacks(sq, occ),
                    slider_attacks_slow(sq, occ, &BISHOP_DELTAS),
                    "bishop mismatch on sq {sq}"
                );
            }
        }
    }

    #[test]
    fn test_rook_attacks_with_blockers() {
        // Rook on d4, blockers on d6 and f4
        let occ = Bitboard((1u64 << 43) | (1u64 << 29));
        let attacks = SLIDER_TABLES.rook_attacks(27, occ);
        // Reaches d5, d6 but not d7
        assert!(attacks.contains(crate::board::types::Square::new(4, 3)));
        assert!(attacks.contains(crate::board::types::Square::new(5, 3)));
        assert!(!attacks.contains(crate::board::types::Square::new(6, 3)));
        // Reaches e4, f4 but not g4
        assert!(attacks.contains(crate::board::types::Square::new(3, 5)));
        assert!(!attacks.contains(crate::board::types::Square::new(3, 6)));
    }
}
