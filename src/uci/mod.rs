//! The UCI front end.
//!
//! Parses the text protocol, owns the engine options and the search
//! session, and forwards positions and limits into the core. Malformed
//! input is reported on stderr and never changes engine state; commands
//! that are illegal mid-search are rejected the same way.

pub mod options;
pub mod wdl;

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::Mutex;

use crate::bench;
use crate::board::{eval, move_to_uci, Color, Position};
use crate::perft::{run_perft, run_split_perft};
use crate::search::{SearchLimits, Searcher};

const NAME: &str = concat!("Lodestar ", env!("CARGO_PKG_VERSION"));
const AUTHOR: &str = "the Lodestar developers";

pub struct UciHandler {
    pos: Position,
    opts: options::EngineOptions,
    searcher: Arc<Mutex<Searcher>>,
    stop: Arc<AtomicBool>,
    searching: Arc<AtomicBool>,
    search_thread: Option<JoinHandle<()>>,
}

impl UciHandler {
    #[must_use]
    pub fn new() -> Self {
        let opts = options::EngineOptions::default();
        let stop = Arc::new(AtomicBool::new(false));

        UciHandler {
            pos: Position::starting(),
            searcher: Arc::new(Mutex::new(Searcher::new(opts.hash_mib, stop.clone()))),
            opts,
            stop,
            searching: Arc::new(AtomicBool::new(false)),
            search_thread: None,
        }
    }

    /// Run the command loop until `quit` or EOF
    pub fn run(&mut self) {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if !self.handle_line(&line) {
                break;
            }
        }
        self.finish_search();
    }

    /// Returns false when the loop should exit
    fn handle_line(&mut self, line: &str) -> bool {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = tokens.first() else {
            return true;
        };

        match command {
            "uci" => {
                println!("id name {NAME}");
                println!("id author {AUTHOR}");
                options::print_options(&self.opts);
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => {
                if self.reject_while_searching("ucinewgame") {
                    return true;
                }
                self.searcher.lock().new_game();
                self.pos = Position::starting();
            }
            "setoption" => self.handle_setoption(&tokens),
            "position" => self.handle_position(&tokens),
            "go" => self.handle_go(&tokens),
            "stop" => {
                if self.searching.load(Ordering::SeqCst) {
                    self.stop.store(true, Ordering::SeqCst);
                    self.finish_search();
                } else {
                    eprintln!("not searching");
                }
            }
            "quit" => {
                self.stop.store(true, Ordering::SeqCst);
                return false;
            }

            // Debug commands
            "d" => self.print_board(),
            "eval" => eval::print_eval(&self.pos),
            "checkers" => {
                let squares: Vec<String> =
                    self.pos.checkers().iter().map(|sq| sq.to_string()).collect();
                println!("checkers: {}", squares.join(" "));
            }
            "moves" => {
                let legal = self.pos.legal_moves(&self.opts.core());
                let moves: Vec<String> = legal
                    .iter()
                    .map(|m| move_to_uci(m, self.opts.chess960))
                    .collect();
                println!("{}", moves.join(" "));
            }
            "perft" => {
                let depth = tokens.get(1).and_then(|t| t.parse().ok()).unwrap_or(6);
                run_perft(&mut self.pos, depth);
            }
            "splitperft" => {
                let depth = tokens.get(1).and_then(|t| t.parse().ok()).unwrap_or(6);
                run_split_perft(&mut self.pos, depth, self.opts.chess960);
            }
            "bench" => {
                if self.reject_while_searching("bench") {
                    return true;
                }
                let depth = tokens.get(1).and_then(|t| t.parse().ok());
                bench::run(&mut self.searcher.lock(), depth);
            }

            _ => eprintln!("unknown command: {command}"),
        }

        true
    }

    fn handle_setoption(&mut self, tokens: &[&str]) {
        // setoption name <name...> value <value>
        let Some(name_idx) = tokens.iter().position(|&t| t == "name") else {
            eprintln!("setoption: missing name");
            return;
        };
        let value_idx = tokens.iter().position(|&t| t == "value");

        let name = tokens[name_idx + 1..value_idx.unwrap_or(tokens.len())]
            .join(" ")
            .to_ascii_lowercase();
        let value = value_idx.map(|i| tokens[i + 1..].join(" ")).unwrap_or_default();

        match name.as_str() {
            "hash" => {
                if self.reject_while_searching("setoption Hash") {
                    return;
                }
                match value.parse() {
                    Ok(mib) => {
                        self.opts.set_hash(mib);
                        self.searcher.lock().resize_hash(self.opts.hash_mib);
                        println!("info string set hash size to {}", self.opts.hash_mib);
                    }
                    Err(_) => eprintln!("invalid hash size '{value}'"),
                }
            }
            "threads" => match value.parse() {
                Ok(threads) => self.opts.set_threads(threads),
                Err(_) => eprintln!("invalid thread count '{value}'"),
            },
            "moveoverhead" => match value.parse() {
                Ok(ms) => self.opts.set_move_overhead(ms),
                Err(_) => eprintln!("invalid move overhead '{value}'"),
            },
            "uci_chess960" => match options::parse_bool(&value) {
                Some(v) => self.opts.chess960 = v,
                None => eprintln!("invalid UCI_Chess960 value '{value}'"),
            },
            "underpromotions" => match options::parse_bool(&value) {
                Some(v) => self.opts.underpromotions = v,
                None => eprintln!("invalid Underpromotions value '{value}'"),
            },
            _ => eprintln!("unknown option '{name}'"),
        }
    }

    fn handle_position(&mut self, tokens: &[&str]) {
        if self.reject_while_searching("position") {
            return;
        }

        let moves_idx = tokens.iter().position(|&t| t == "moves");

        let mut new_pos = match tokens.get(1) {
            Some(&"startpos") => Position::starting(),
            Some(&"fen") => {
                let fen_end = moves_idx.unwrap_or(tokens.len());
                let fen = tokens[2..fen_end].join(" ");
                match Position::from_fen(&fen) {
                    Ok(pos) => pos,
                    Err(err) => {
                        eprintln!("invalid fen '{fen}': {err}");
                        return;
                    }
                }
            }
            _ => {
                eprintln!("position: expected 'startpos' or 'fen'");
                return;
            }
        };

        if let Some(moves_idx) = moves_idx {
            for token in &tokens[moves_idx + 1..] {
                match new_pos.move_from_uci(token) {
                    Ok(m) => new_pos.apply_move(m),
                    Err(err) => {
                        eprintln!("invalid move '{token}': {err}");
                        return;
                    }
                }
            }
        }

        self.pos = new_pos;
    }

    fn handle_go(&mut self, tokens: &[&str]) {
        if self.reject_while_searching("go") {
            return;
        }

        let mut limits = SearchLimits::default();
        let mut wtime: Option<u64> = None;
        let mut btime: Option<u64> = None;
        let mut winc: Option<u64> = None;
        let mut binc: Option<u64> = None;
        let mut movestogo: Option<u64> = None;

        let mut iter = tokens.iter().skip(1);
        while let Some(&token) = iter.next() {
            let mut value = |name: &str| -> Option<u64> {
                let parsed = iter.next().and_then(|v| v.parse().ok());
                if parsed.is_none() {
                    eprintln!("go: bad or missing value for {name}");
                }
                parsed
            };

            match token {
                "depth" => limits.depth = value("depth").map(|d| d as i32),
                "nodes" => limits.nodes = value("nodes"),
                "movetime" => limits.move_time = value("movetime").map(Duration::from_millis),
                "wtime" => wtime = value("wtime"),
                "btime" => btime = value("btime"),
                "winc" => winc = value("winc"),
                "binc" => binc = value("binc"),
                "movestogo" => movestogo = value("movestogo"),
                "infinite" => {}
                _ => eprintln!("go: unknown token {token}"),
            }
        }

        // Clock-based budget: a slice of the remaining time plus most of the
        // increment, minus the configured overhead
        if limits.move_time.is_none() {
            let (time, inc) = match self.pos.to_move() {
                Color::White => (wtime, winc),
                Color::Black => (btime, binc),
            };
            if let Some(time) = time {
                let divisor = movestogo.unwrap_or(25).clamp(2, 50);
                let budget = (time / divisor + inc.unwrap_or(0) / 2)
                    .saturating_sub(self.opts.move_overhead_ms)
                    .max(1);
                limits.move_time = Some(Duration::from_millis(budget));
            }
        }

        let searcher = self.searcher.clone();
        let searching = self.searching.clone();
        let mut pos = self.pos.clone();
        let core_opts = self.opts.core();
        let chess960 = self.opts.chess960;

        searching.store(true, Ordering::SeqCst);

        self.search_thread = Some(std::thread::spawn(move || {
            let mut searcher = searcher.lock();
            searcher.set_options(core_opts);
            let report = searcher.search(&mut pos, limits);
            println!("bestmove {}", move_to_uci(report.best_move, chess960));
            searching.store(false, Ordering::SeqCst);
        }));
    }

    fn reject_while_searching(&self, what: &str) -> bool {
        if self.searching.load(Ordering::SeqCst) {
            eprintln!("cannot {what} while searching");
            true
        } else {
            false
        }
    }

    fn finish_search(&mut self) {
        if let Some(handle) = self.search_thread.take() {
            let _ = handle.join();
        }
    }

    fn print_board(&self) {
        let boards = self.pos.boards();
        for rank in (0..8).rev() {
            print!(" {} ", rank + 1);
            for file in 0..8 {
                let c = boards
                    .piece_at(crate::board::Square::new(rank, file))
                    .map_or('.', |(color, piece)| piece.to_fen_char(color));
                print!(" {c}");
            }
            println!();
        }
        println!("\n    a b c d e f g h\n");
        println!("Fen: {}", self.pos.to_fen());
        println!("Key: {:016x}", self.pos.key());
        println!("Pawn key: {:016x}", self.pos.pawn_key());
    }
}

impl Default for UciHandler {
    fn default() -> Self {
        UciHandler::new()
    }
}

/// Engine entry point
pub fn run() {
    UciHandler::new().run();
}
