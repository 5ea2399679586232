//! Iterative-deepening alpha-beta search.
//!
//! The driver owns the transposition table, killers, countermoves and the
//! history tables, and hands them to the staged move generator each node.
//! Leaf positions are scored by quiescence over the good noisy moves.

pub mod history;
mod tt;

pub use tt::{Bound, TranspositionTable};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::board::{eval, move_to_uci, Move, Options, OrderedMoves, Position, Score};
use crate::pawn_cache::PawnCache;
use crate::uci::wdl;

use history::{HistoryMove, HistoryTable};

pub const MAX_PLY: usize = 128;

pub const SCORE_INF: Score = 32000;
pub const SCORE_MATE: Score = 31000;
const SCORE_WIN: Score = 30000;

/// Limits for one `go` invocation. Unset fields do not constrain.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchLimits {
    pub depth: Option<i32>,
    pub nodes: Option<u64>,
    pub move_time: Option<Duration>,
}

#[derive(Clone, Copy, Debug)]
pub struct SearchReport {
    pub best_move: Move,
    pub score: Score,
    pub depth: i32,
    pub nodes: u64,
    pub elapsed: Duration,
}

pub struct Searcher {
    tt: TranspositionTable,
    history: HistoryTable,
    pawn_cache: PawnCache,
    killers: [Move; MAX_PLY],
    prev_moves: [Option<HistoryMove>; MAX_PLY],

    opts: Options,
    stop: Arc<AtomicBool>,
    report: bool,

    nodes: u64,
    node_limit: u64,
    deadline: Option<Instant>,
}

impl Searcher {
    #[must_use]
    pub fn new(hash_mib: usize, stop: Arc<AtomicBool>) -> Self {
        Searcher {
            tt: TranspositionTable::new(hash_mib),
            history: HistoryTable::new(),
            pawn_cache: PawnCache::default(),
            killers: [Move::NULL; MAX_PLY],
            prev_moves: [None; MAX_PLY],
            opts: Options::default(),
            stop,
            report: true,
            nodes: 0,
            node_limit: u64::MAX,
            deadline: None,
        }
    }

    pub fn set_options(&mut self, opts: Options) {
        self.opts = opts;
    }

    pub fn set_report(&mut self, report: bool) {
        self.report = report;
    }

    pub fn resize_hash(&mut self, mib: usize) {
        self.tt.resize(mib);
    }

    /// Reset all learned state (the `ucinewgame` command)
    pub fn new_game(&mut self) {
        self.tt.clear();
        self.history.clear();
        self.pawn_cache.clear();
        self.killers = [Move::NULL; MAX_PLY];
    }

    #[inline]
    fn out_of_budget(&self) -> bool {
        if self.nodes >= self.node_limit {
            return true;
        }
        // The clock and the stop flag are polled coarsely
        if self.nodes % 1024 == 0 {
            if self.stop.load(Ordering::Relaxed) {
                return true;
            }
            if let Some(deadline) = self.deadline {
                return Instant::now() >= deadline;
            }
        }
        false
    }

    /// Search `pos` within `limits` and return the final report. Prints UCI
    /// `info` lines per iteration unless reporting is disabled.
    pub fn search(&mut self, pos: &mut Position, limits: SearchLimits) -> SearchReport {
        let start = Instant::now();

        self.nodes = 0;
        self.node_limit = limits.nodes.unwrap_or(u64::MAX);
        self.deadline = limits.move_time.map(|t| start + t);
        self.stop.store(false, Ordering::Relaxed);
        self.killers = [Move::NULL; MAX_PLY];
        self.prev_moves = [None; MAX_PLY];

        let max_depth = limits.depth.unwrap_or(MAX_PLY as i32 - 1).clamp(1, MAX_PLY as i32 - 1);

        let mut best_move = Move::NULL;
        let mut best_score = -SCORE_INF;
        let mut completed_depth = 0;

        for depth in 1..=max_depth {
            let score = self.alpha_beta(pos, depth, 0, -SCORE_INF, SCORE_INF);

            if depth > 1 && self.aborted() {
                break;
            }

            best_score = score;
            completed_depth = depth;
            if let Some(probe) = self.tt.probe(pos.key()) {
                if !probe.mv.is_null() {
                    best_move = probe.mv;
                }
            }

            if self.report {
                self.print_info(pos, depth, score, start.elapsed());
            }

            // A forced mate needs no deeper confirmation
            if score.abs() >= SCORE_WIN {
                break;
            }
        }

        SearchReport {
            best_move,
            score: best_score,
            depth: completed_depth,
            nodes: self.nodes,
            elapsed: start.elapsed(),
        }
    }

    fn aborted(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
            || self.nodes >= self.node_limit
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn print_info(&self, pos: &mut Position, depth: i32, score: Score, elapsed: Duration) {
        let nps = (self.nodes as f64 / elapsed.as_secs_f64().max(1e-6)) as u64;

        let score_str = if score.abs() >= SCORE_WIN {
            let plies = SCORE_MATE - score.abs();
            let mate_in = (plies + 1) / 2 * score.signum();
            format!("mate {mate_in}")
        } else {
            format!("cp {}", wdl::normalized_cp(score))
        };

        let pv = self.pv_from_tt(pos, depth);
        let pv_str = pv
            .iter()
            .map(|&m| move_to_uci(m, self.opts.chess960))
            .collect::<Vec<_>>()
            .join(" ");

        println!(
            "info depth {depth} score {score_str} nodes {} nps {nps} time {} pv {pv_str}",
            self.nodes,
            elapsed.as_millis()
        );
    }

    /// Recover the principal variation by walking hash moves
    fn pv_from_tt(&self, pos: &mut Position, depth: i32) -> Vec<Move> {
        let mut pv = Vec::new();

        for _ in 0..depth {
            let Some(probe) = self.tt.probe(pos.key()) else {
                break;
            };
            if probe.mv.is_null() || !pos.is_pseudolegal(probe.mv) {
                break;
            }
            pos.apply_move(probe.mv);
            if !pos.was_legal() {
                pos.pop_move();
                break;
            }
            pv.push(probe.mv);
        }

        for _ in 0..pv.len() {
            pos.pop_move();
        }

        pv
    }

    #[allow(clippy::too_many_lines)]
    fn alpha_beta(
        &mut self,
        pos: &mut Position,
        depth: i32,
        ply: usize,
        mut alpha: Score,
        beta: Score,
    ) -> Score {
        if depth <= 0 || ply >= MAX_PLY - 1 {
            return self.quiescence(pos, ply, alpha, beta);
        }

        let root = ply == 0;

        if !root && pos.is_drawn(false) {
            return 0;
        }

        self.nodes += 1;
        if self.out_of_budget() {
            return 0;
        }

        let mut hash_move = Move::NULL;
        if let Some(probe) = self.tt.probe(pos.key()) {
            hash_move = probe.mv;

            if !root && probe.depth >= depth {
                let score = score_from_tt(probe.score, ply);
                let cutoff = match probe.bound {
                    Bound::Exact => true,
                    Bound::Lower => score >= beta,
                    Bound::Upper => score <= alpha,
                };
                if cutoff {
                    return score;
                }
            }
        }

        let prev = if ply > 0 { self.prev_moves[ply - 1] } else { None };
        let prev_prev = if ply > 1 { self.prev_moves[ply - 2] } else { None };

        let alpha_orig = alpha;

        let mut gen = OrderedMoves::new(self.opts, hash_move, self.killers[ply], prev, prev_prev);

        let mut best_score = -SCORE_INF;
        let mut best_move = Move::NULL;
        let mut legal_moves = 0;
        let mut quiets_tried: Vec<(Move, Option<HistoryMove>)> = Vec::new();

        while let Some(m) = gen.next(pos, Some(&self.history)) {
            let is_noisy = pos.is_noisy(m);
            let hm = HistoryMove::from_move(pos, m);

            pos.apply_move(m);
            if !pos.was_legal() {
                pos.pop_move();
                continue;
            }

            legal_moves += 1;
            self.prev_moves[ply] = hm;

            let score = -self.alpha_beta(pos, depth - 1, ply + 1, -beta, -alpha);

            pos.pop_move();

            if self.aborted() && !root {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = m;
            }

            if score > alpha {
                alpha = score;

                if alpha >= beta {
                    if !is_noisy {
                        self.record_quiet_cutoff(m, hm, prev, &quiets_tried, depth, ply);
                    }
                    break;
                }
            }

            if !is_noisy {
                quiets_tried.push((m, hm));
            }
        }

        if legal_moves == 0 {
            return if pos.is_check() {
                -SCORE_MATE + ply as Score
            } else {
                0
            };
        }

        let bound = if best_score >= beta {
            Bound::Lower
        } else if best_score > alpha_orig {
            Bound::Exact
        } else {
            Bound::Upper
        };

        self.tt.store(
            pos.key(),
            best_move,
            score_to_tt(best_score, ply),
            depth,
            bound,
        );

        best_score
    }

    fn record_quiet_cutoff(
        &mut self,
        m: Move,
        hm: Option<HistoryMove>,
        prev: Option<HistoryMove>,
        quiets_tried: &[(Move, Option<HistoryMove>)],
        depth: i32,
        ply: usize,
    ) {
        self.killers[ply] = m;

        if let Some(prev) = prev {
            self.history.set_countermove(prev, m);
        }

        let bonus = (depth * depth).min(400);
        let prev_prev = if ply > 1 { self.prev_moves[ply - 2] } else { None };

        if let Some(hm) = hm {
            self.history.update_quiet(hm, prev, prev_prev, bonus);
        }

        // The quiets searched before the cutoff move failed to refute;
        // push their scores the other way
        for &(_, tried_hm) in quiets_tried {
            if let Some(tried_hm) = tried_hm {
                self.history.update_quiet(tried_hm, prev, prev_prev, -bonus);
            }
        }
    }

    fn quiescence(&mut self, pos: &mut Position, ply: usize, mut alpha: Score, beta: Score) -> Score {
        self.nodes += 1;
        if self.out_of_budget() || ply >= MAX_PLY - 1 {
            return eval::static_eval(pos, Some(&mut self.pawn_cache));
        }

        let stand_pat = eval::static_eval(pos, Some(&mut self.pawn_cache));

        if stand_pat >= beta {
            return stand_pat;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut gen = OrderedMoves::quiescence(self.opts);

        let mut best_score = stand_pat;

        while let Some(m) = gen.next(pos, None) {
            pos.apply_move(m);
            if !pos.was_legal() {
                pos.pop_move();
                continue;
            }

            let score = -self.quiescence(pos, ply + 1, -beta, -alpha);

            pos.pop_move();

            if score > best_score {
                best_score = score;
            }
            if score > alpha {
                alpha = score;
                if alpha >= beta {
                    break;
                }
            }
        }

        best_score
    }
}

/// Mate scores are stored relative to the probing node, not the root
fn score_to_tt(score: Score, ply: usize) -> Score {
    if score >= SCORE_WIN {
        score + ply as Score
    } else if score <= -SCORE_WIN {
        score - ply as Score
    } else {
        score
    }
}

fn score_from_tt(score: Score, ply: usize) -> Score {
    if score >= SCORE_WIN {
        score - ply as Score
    } else if score <= -SCORE_WIN {
        score + ply as Score
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_fen(fen: &str, depth: i32) -> SearchReport {
        let mut pos: Position = fen.parse().unwrap();
        let mut searcher = Searcher::new(16, Arc::new(AtomicBool::new(false)));
        searcher.set_report(false);
        searcher.search(
            &mut pos,
            SearchLimits {
                depth: Some(depth),
                ..SearchLimits::default()
            },
        )
    }

    #[test]
    fn test_finds_mate_in_one() {
        // Back-rank mate: Ra8#
        let report = search_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1", 4);
        assert_eq!(report.best_move.to_string(), "a1a8");
        assert!(report.score >= SCORE_WIN);
    }

    #[test]
    fn test_takes_hanging_queen() {
        let report = search_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", 3);
        assert_eq!(report.best_move.to_string(), "e4d5");
    }

    #[test]
    fn test_respects_node_limit() {
        let mut pos = Position::starting();
        let mut searcher = Searcher::new(16, Arc::new(AtomicBool::new(false)));
        searcher.set_report(false);
        let report = searcher.search(
            &mut pos,
            SearchLimits {
                nodes: Some(5_000),
                ..SearchLimits::default()
            },
        );
        assert!(report.nodes <= 6_000, "node limit ignored: {}", report.nodes);
        assert!(!report.best_move.is_null());
    }
}
