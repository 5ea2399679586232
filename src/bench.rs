//! Fixed-position benchmark (the `bench` command).
//!
//! Searches a small set of positions to a fixed depth and reports total
//! nodes and speed. The node count doubles as a signature: any functional
//! change to movegen, ordering, eval or search shifts it.

use std::time::Instant;

use crate::board::Position;
use crate::search::{SearchLimits, Searcher};

pub const DEFAULT_DEPTH: i32 = 7;

const BENCH_FENS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2pP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
    "8/8/1p6/8/P1k5/2p5/2K5/8 b - - 0 1",
    "r1bq1rk1/pp2bppp/2n2n2/2pp4/3P4/2NBPN2/PP3PPP/R1BQ1RK1 w - - 0 9",
    "2kr3r/ppp1qppp/2n1bn2/2b1p3/4P3/2NP1N2/PPP1BPPP/R1BQR1K1 b - - 5 9",
];

/// Run the benchmark and print per-position and total results
pub fn run(searcher: &mut Searcher, depth: Option<i32>) {
    let depth = depth.unwrap_or(DEFAULT_DEPTH).max(1);
    let limits = SearchLimits {
        depth: Some(depth),
        ..SearchLimits::default()
    };

    searcher.set_report(false);

    let start = Instant::now();
    let mut total_nodes = 0u64;

    for (i, fen) in BENCH_FENS.iter().enumerate() {
        let mut pos: Position = fen.parse().expect("bench FEN is valid");

        searcher.new_game();
        let report = searcher.search(&mut pos, limits);
        total_nodes += report.nodes;

        println!(
            "position {:>2}/{}: {} nodes, best {}",
            i + 1,
            BENCH_FENS.len(),
            report.nodes,
            report.best_move
        );
    }

    let elapsed = start.elapsed();
    let nps = (total_nodes as f64 / elapsed.as_secs_f64()) as u64;

    searcher.set_report(true);

    println!("\n{total_nodes} nodes {nps} nps");
}
