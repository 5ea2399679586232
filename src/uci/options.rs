//! UCI option storage.
//!
//! Numeric options clamp to their advertised range instead of being
//! rejected; boolean parsing accepts `true`/`false` only.

use crate::board::Options;

pub const HASH_RANGE: (usize, usize) = (1, 8192);
pub const THREADS_RANGE: (usize, usize) = (1, 1);
pub const MOVE_OVERHEAD_RANGE: (u64, u64) = (0, 5000);

pub const DEFAULT_HASH_MIB: usize = 64;
pub const DEFAULT_MOVE_OVERHEAD_MS: u64 = 10;

#[derive(Clone, Copy, Debug)]
pub struct EngineOptions {
    pub chess960: bool,
    pub underpromotions: bool,
    pub hash_mib: usize,
    pub threads: usize,
    pub move_overhead_ms: u64,
}

impl EngineOptions {
    /// The options snapshot the board core reads
    #[must_use]
    pub fn core(&self) -> Options {
        Options {
            chess960: self.chess960,
            underpromotions: self.underpromotions,
        }
    }

    pub fn set_hash(&mut self, mib: usize) {
        self.hash_mib = mib.clamp(HASH_RANGE.0, HASH_RANGE.1);
    }

    pub fn set_threads(&mut self, threads: usize) {
        self.threads = threads.clamp(THREADS_RANGE.0, THREADS_RANGE.1);
    }

    pub fn set_move_overhead(&mut self, ms: u64) {
        self.move_overhead_ms = ms.clamp(MOVE_OVERHEAD_RANGE.0, MOVE_OVERHEAD_RANGE.1);
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            chess960: false,
            underpromotions: true,
            hash_mib: DEFAULT_HASH_MIB,
            threads: 1,
            move_overhead_ms: DEFAULT_MOVE_OVERHEAD_MS,
        }
    }
}

/// Print the `option` lines for the `uci` command
pub fn print_options(opts: &EngineOptions) {
    println!(
        "option name Hash type spin default {} min {} max {}",
        DEFAULT_HASH_MIB, HASH_RANGE.0, HASH_RANGE.1
    );
    println!(
        "option name Threads type spin default 1 min {} max {}",
        THREADS_RANGE.0, THREADS_RANGE.1
    );
    println!(
        "option name MoveOverhead type spin default {} min {} max {}",
        DEFAULT_MOVE_OVERHEAD_MS, MOVE_OVERHEAD_RANGE.0, MOVE_OVERHEAD_RANGE.1
    );
    println!("option name UCI_Chess960 type check default {}", opts.chess960);
    println!(
        "option name Underpromotions type check default {}",
        opts.underpromotions
    );
}

/// Lenient boolean parse for `setoption` values
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
