use lodestar::{bench, uci};

fn main() {
    // `lodestar bench [depth]` for fixed-depth benchmarking, otherwise UCI
    let args: Vec<String> = std::env::args().collect();

    if args.get(1).is_some_and(|a| a == "bench") {
        let depth = args.get(2).and_then(|d| d.parse().ok());
        let stop = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let mut searcher = lodestar::search::Searcher::new(64, stop);
        bench::run(&mut searcher, depth);
        return;
    }

    uci::run();
}
