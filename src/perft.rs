//! Perft: exhaustive legal-move tree counting.
//!
//! The primary end-to-end test of move generation, move application and
//! undo. Counts must be bit-exact against the published reference values.

use std::time::Instant;

use crate::board::{generate_all, move_to_uci, MoveList, Options, Position};

/// Count leaf nodes of the legal move tree to `depth`
#[must_use]
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let opts = Options::default();
    let mut nodes = 0;

    let mut moves = MoveList::new();
    generate_all(&mut moves, pos, &opts);

    for i in 0..moves.len() {
        let m = moves[i].mv;

        pos.apply_move(m);
        if pos.was_legal() {
            nodes += if depth == 1 {
                1
            } else {
                perft(pos, depth - 1)
            };
        }
        pos.pop_move();
    }

    nodes
}

/// Run perft and print the node count and throughput
pub fn run_perft(pos: &mut Position, depth: u32) {
    let start = Instant::now();
    let nodes = perft(pos, depth);
    let elapsed = start.elapsed();

    let nps = (nodes as f64 / elapsed.as_secs_f64()) as u64;
    println!("perft({depth}) = {nodes}  ({elapsed:.2?}, {nps} nps)");
}

/// Per-root-move breakdown, for bisecting a movegen divergence
pub fn run_split_perft(pos: &mut Position, depth: u32, chess960: bool) {
    let opts = Options {
        chess960,
        ..Options::default()
    };

    let start = Instant::now();
    let mut total = 0u64;

    let mut moves = MoveList::new();
    generate_all(&mut moves, pos, &opts);

    for i in 0..moves.len() {
        let m = moves[i].mv;

        pos.apply_move(m);
        if pos.was_legal() {
            let nodes = if depth <= 1 { 1 } else { perft(pos, depth - 1) };
            total += nodes;
            println!("{} {nodes}", move_to_uci(m, chess960));
        }
        pos.pop_move();
    }

    println!("\ntotal {total}  ({:.2?})", start.elapsed());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perft_depth_zero_and_one() {
        let mut pos = Position::starting();
        assert_eq!(perft(&mut pos, 0), 1);
        assert_eq!(perft(&mut pos, 1), 20);
    }
}
