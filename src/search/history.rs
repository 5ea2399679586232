//! History tables for quiet-move ordering.
//!
//! The tables live in the search driver, not the board core; the staged
//! move generator only reads them through [`HistoryTable`]. Butterfly
//! history is keyed by (moving piece, destination); continuation history
//! additionally keys on the previous (and the one before it) move;
//! countermoves store one refutation per previous move.

use crate::board::{Color, Move, Piece, Position, Square};

const HISTORY_MAX: i32 = 16384;
const PIECE_IDS: usize = 12;

/// A (piece, destination) pair identifying a move for history purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryMove {
    piece_id: usize,
    dst: Square,
}

impl HistoryMove {
    /// Build from a move that has not been applied to `pos` yet
    #[must_use]
    pub fn from_move(pos: &Position, m: Move) -> Option<Self> {
        let (color, piece) = pos.boards().piece_at(m.src())?;
        Some(HistoryMove {
            piece_id: piece_id(color, piece),
            dst: m.dst(),
        })
    }
}

#[inline]
fn piece_id(color: Color, piece: Piece) -> usize {
    color.index() * 6 + piece.index()
}

/// History-gravity update: large existing scores resist further growth, so
/// the tables decay naturally as refutations change.
#[inline]
fn gravity(entry: &mut i32, bonus: i32) {
    *entry += bonus - *entry * bonus.abs() / HISTORY_MAX;
}

pub struct HistoryTable {
    butterfly: Box<[[i32; 64]; PIECE_IDS]>,
    countermoves: Box<[[Move; 64]; PIECE_IDS]>,
    continuations: Box<[[[[i32; 64]; PIECE_IDS]; 64]; PIECE_IDS]>,
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        // The continuation table is a couple of MiB; build it on the heap
        let continuations: Vec<[[[i32; 64]; PIECE_IDS]; 64]> =
            vec![[[[0; 64]; PIECE_IDS]; 64]; PIECE_IDS];
        let continuations: Box<[[[[i32; 64]; PIECE_IDS]; 64]; PIECE_IDS]> = continuations
            .into_boxed_slice()
            .try_into()
            .unwrap_or_else(|_| unreachable!("continuation table has a fixed length"));

        HistoryTable {
            butterfly: Box::new([[0; 64]; PIECE_IDS]),
            countermoves: Box::new([[Move::NULL; 64]; PIECE_IDS]),
            continuations,
        }
    }

    pub fn clear(&mut self) {
        self.butterfly.iter_mut().for_each(|t| t.fill(0));
        self.countermoves.iter_mut().for_each(|t| t.fill(Move::NULL));
        for prev_piece in self.continuations.iter_mut() {
            for prev_dst in prev_piece.iter_mut() {
                for piece in prev_dst.iter_mut() {
                    piece.fill(0);
                }
            }
        }
    }

    /// Butterfly score for a quiet move
    #[inline]
    #[must_use]
    pub fn score(&self, hm: HistoryMove) -> i32 {
        self.butterfly[hm.piece_id][hm.dst.index()]
    }

    /// Continuation score for a quiet move following `prev`
    #[inline]
    #[must_use]
    pub fn cont_score(&self, prev: HistoryMove, hm: HistoryMove) -> i32 {
        self.continuations[prev.piece_id][prev.dst.index()][hm.piece_id][hm.dst.index()]
    }

    /// The stored refutation of `prev`, or null
    #[inline]
    #[must_use]
    pub fn countermove(&self, prev: HistoryMove) -> Move {
        self.countermoves[prev.piece_id][prev.dst.index()]
    }

    /// Reward a quiet move that caused a beta cutoff (or punish the quiets
    /// searched before it, with a negative bonus)
    pub fn update_quiet(
        &mut self,
        hm: HistoryMove,
        prev: Option<HistoryMove>,
        prev_prev: Option<HistoryMove>,
        bonus: i32,
    ) {
        gravity(&mut self.butterfly[hm.piece_id][hm.dst.index()], bonus);

        if let Some(prev) = prev {
            gravity(
                &mut self.continuations[prev.piece_id][prev.dst.index()][hm.piece_id]
                    [hm.dst.index()],
                bonus,
            );
        }
        if let Some(prev_prev) = prev_prev {
            gravity(
                &mut self.continuations[prev_prev.piece_id][prev_prev.dst.index()][hm.piece_id]
                    [hm.dst.index()],
                bonus,
            );
        }
    }

    pub fn set_countermove(&mut self, prev: HistoryMove, m: Move) {
        self.countermoves[prev.piece_id][prev.dst.index()] = m;
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        HistoryTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(pos: &Position, uci: &str) -> (HistoryMove, Move) {
        let mut pos = pos.clone();
        let m = pos.move_from_uci(uci).unwrap();
        (HistoryMove::from_move(&pos, m).unwrap(), m)
    }

    #[test]
    fn test_update_and_score() {
        let pos = Position::starting();
        let mut table = HistoryTable::new();
        let (e4, _) = hm(&pos, "e2e4");

        assert_eq!(table.score(e4), 0);
        table.update_quiet(e4, None, None, 300);
        assert!(table.score(e4) > 0);
        table.update_quiet(e4, None, None, -300);
        assert!(table.score(e4) < 300);
    }

    #[test]
    fn test_gravity_saturates() {
        let pos = Position::starting();
        let mut table = HistoryTable::new();
        let (e4, _) = hm(&pos, "e2e4");

        for _ in 0..1000 {
            table.update_quiet(e4, None, None, 2000);
        }
        assert!(table.score(e4) <= HISTORY_MAX);
    }

    #[test]
    fn test_countermove_roundtrip() {
        let pos = Position::starting();
        let mut table = HistoryTable::new();
        let (prev, _) = hm(&pos, "e2e4");
        let (_, reply) = hm(&pos, "b1c3");

        assert!(table.countermove(prev).is_null());
        table.set_countermove(prev, reply);
        assert_eq!(table.countermove(prev), reply);
    }

    #[test]
    fn test_continuation_keyed_separately() {
        let pos = Position::starting();
        let mut table = HistoryTable::new();
        let (prev, _) = hm(&pos, "e2e4");
        let (hm_move, _) = hm(&pos, "g1f3");

        table.update_quiet(hm_move, Some(prev), None, 500);
        assert!(table.cont_score(prev, hm_move) > 0);
        // The butterfly entry moved too, but a different prev sees no
        // continuation score
        let (other_prev, _) = hm(&pos, "d2d4");
        assert_eq!(table.cont_score(other_prev, hm_move), 0);
    }
}
