//! Lazily staged move ordering.
//!
//! [`OrderedMoves`] yields pseudo-legal moves best-first without generating
//! or scoring more than the consumer asks for:
//!
//! hash move -> good noisy -> killer -> countermove -> quiets -> bad noisy
//!
//! Noisy moves are generated and stable-sorted once; the "good" prefix is
//! everything above the losing-capture threshold. Quiets are scored from the
//! search's history tables and emitted by in-place selection, which leaves
//! the bad-noisy tail (scored far below any history value) to surface last.
//! In quiescence mode the iterator stops after the good noisy moves.
//!
//! A move equal to the hash, killer or countermove is never yielded twice.
//!
//! The position and history table are passed into every [`OrderedMoves::next`]
//! call rather than borrowed across the whole loop, so the caller is free to
//! apply and undo moves between pulls.

use crate::search::history::{HistoryMove, HistoryTable};

use super::eval::params::piece_value;
use super::movegen::{generate_noisy, generate_quiet};
use super::see::see;
use super::state::Position;
use super::types::{Move, MoveKind, MoveList, Piece};
use super::Options;

/// Promotion ordering bias: queen first, then knight, rook and bishop last
const PROMO_SCORES: [i32; 4] = [1, -2, -1, 2];

const LOSING_CAPTURE: i32 = -8 * 2000 * 2000;
const GOOD_NOISY_THRESHOLD: i32 = -4 * 2000 * 2000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Start,
    Hash,
    GoodNoisy,
    Killer,
    Countermove,
    Quiet,
    BadNoisy,
    End,
}

impl Stage {
    fn next(self) -> Stage {
        match self {
            Stage::Start => Stage::Hash,
            Stage::Hash => Stage::GoodNoisy,
            Stage::GoodNoisy => Stage::Killer,
            Stage::Killer => Stage::Countermove,
            Stage::Countermove => Stage::Quiet,
            Stage::Quiet => Stage::BadNoisy,
            Stage::BadNoisy | Stage::End => Stage::End,
        }
    }
}

pub struct OrderedMoves {
    opts: Options,

    prev: Option<HistoryMove>,
    prev_prev: Option<HistoryMove>,

    hash_move: Move,
    killer: Move,
    countermove: Move,

    quiescence: bool,

    stage: Stage,
    moves: MoveList,
    idx: usize,
    noisy_end: usize,
    good_noisy_end: usize,
}

impl OrderedMoves {
    /// Staged generator for the main search
    #[must_use]
    pub fn new(
        opts: Options,
        hash_move: Move,
        killer: Move,
        prev: Option<HistoryMove>,
        prev_prev: Option<HistoryMove>,
    ) -> Self {
        OrderedMoves {
            opts,
            prev,
            prev_prev,
            hash_move,
            killer,
            countermove: Move::NULL,
            quiescence: false,
            stage: Stage::Start,
            moves: MoveList::new(),
            idx: 0,
            noisy_end: 0,
            good_noisy_end: 0,
        }
    }

    /// Quiescence generator: good noisy moves only
    #[must_use]
    pub fn quiescence(opts: Options) -> Self {
        let mut gen = Self::new(opts, Move::NULL, Move::NULL, None, None);
        gen.quiescence = true;
        gen
    }

    fn score_noisy(&mut self, pos: &Position) {
        let boards = pos.boards();

        for sm in self.moves.as_mut_slice() {
            let m = sm.mv;

            let src_value = boards
                .piece_at(m.src())
                .map_or(0, |(_, piece)| piece_value(piece).mg);
            // Zero for a non-capture promotion
            let dst_value = if m.kind() == MoveKind::EnPassant {
                piece_value(Piece::Pawn).mg
            } else {
                boards
                    .piece_at(m.dst())
                    .map_or(0, |(_, piece)| piece_value(piece).mg)
            };

            sm.score = (dst_value - src_value) * 2000 + dst_value;

            if m.kind() == MoveKind::Promotion {
                sm.score += PROMO_SCORES[m.promo_index()] * 2000 * 2000;
            }

            if dst_value > 0 && !see(pos, m, 0) {
                sm.score += LOSING_CAPTURE;
            }
        }
    }

    fn score_quiet(&mut self, pos: &Position, history: Option<&HistoryTable>) {
        let prev = self.prev;
        let prev_prev = self.prev_prev;

        for sm in &mut self.moves.as_mut_slice()[self.noisy_end..] {
            let m = sm.mv;

            if let Some(history) = history {
                if let Some(hm) = HistoryMove::from_move(pos, m) {
                    sm.score = history.score(hm);

                    if let Some(prev) = prev {
                        sm.score += history.cont_score(prev, hm);
                    }
                    if let Some(prev_prev) = prev_prev {
                        sm.score += history.cont_score(prev_prev, hm);
                    }
                }
            }

            // Knight promos before the rook and bishop ones
            if m.kind() == MoveKind::Promotion {
                sm.score += PROMO_SCORES[m.promo_index()] * 2000;
            }
        }
    }

    fn gen_noisy(&mut self, pos: &Position) {
        generate_noisy(&mut self.moves, pos);
        self.score_noisy(pos);

        self.moves.sort_desc_from(self.idx);
        self.noisy_end = self.moves.len();

        self.good_noisy_end = self
            .moves
            .as_slice()
            .iter()
            .position(|sm| sm.score < GOOD_NOISY_THRESHOLD)
            .unwrap_or(self.moves.len());
    }

    fn gen_quiet(&mut self, pos: &Position, history: Option<&HistoryTable>) {
        generate_quiet(&mut self.moves, pos, &self.opts);
        self.score_quiet(pos, history);

        // The remaining emission runs to the end of the list; bad noisy
        // moves sink below every history score
        self.good_noisy_end = usize::MAX;
    }

    fn find_next(&mut self) -> Move {
        let m = if self.stage == Stage::GoodNoisy {
            // Already stable-sorted
            self.moves[self.idx].mv
        } else {
            self.moves.pick_best(self.idx)
        };
        self.idx += 1;
        m
    }

    /// The next move, or `None` when the stages are exhausted. `pos` must be
    /// the same position the generator was constructed for.
    pub fn next(&mut self, pos: &Position, history: Option<&HistoryTable>) -> Option<Move> {
        loop {
            // The emission cursor is parked at a stage boundary; advance
            // stages until one yields directly or refills the list
            while self.idx == self.moves.len() || self.idx == self.good_noisy_end {
                self.stage = self.stage.next();

                match self.stage {
                    Stage::Hash => {
                        if !self.hash_move.is_null() && pos.is_pseudolegal(self.hash_move) {
                            return Some(self.hash_move);
                        }
                    }

                    Stage::GoodNoisy => {
                        self.gen_noisy(pos);
                        if self.quiescence {
                            // Emit the good prefix, then the next boundary
                            // ends the iteration: no quiets, no killer or
                            // countermove, no bad noisy
                            self.stage = Stage::End;
                        }
                    }

                    Stage::Killer => {
                        if !self.killer.is_null()
                            && self.killer != self.hash_move
                            && pos.is_pseudolegal(self.killer)
                        {
                            return Some(self.killer);
                        }
                    }

                    Stage::Countermove => {
                        if let (Some(history), Some(prev)) = (history, self.prev) {
                            self.countermove = history.countermove(prev);
                            if !self.countermove.is_null()
                                && self.countermove != self.hash_move
                                && self.countermove != self.killer
                                && pos.is_pseudolegal(self.countermove)
                            {
                                return Some(self.countermove);
                            }
                            self.countermove = Move::NULL;
                        }
                    }

                    Stage::Quiet => self.gen_quiet(pos, history),

                    Stage::BadNoisy => {}

                    Stage::Start | Stage::End => return None,
                }
            }

            let m = self.find_next();

            if m != self.hash_move && m != self.killer && m != self.countermove {
                return Some(m);
            }
        }
    }
}
