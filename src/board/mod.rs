//! The engine core: board representation, move generation, SEE, staged
//! ordering and evaluation.

pub mod attack_tables;
mod apply;
pub mod error;
pub mod eval;
mod fen;
pub mod masks;
mod movegen;
mod ordering;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use fen::{move_to_uci, STARTPOS_FEN};
pub use movegen::{generate_all, generate_noisy, generate_quiet};
pub use ordering::OrderedMoves;
pub use see::see;
pub use state::{BoardState, Position, PositionBoards};
pub use types::{
    Bitboard, BitboardIter, CastlingRooks, Color, Move, MoveKind, MoveList, Piece, Score,
    ScoredMove, Square, TaperedScore,
};

/// Runtime options that reach the core. Owned by the UCI layer and passed in
/// explicitly so the hot paths never read mutable global state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// Chess960 castling generation and king-takes-rook move output
    pub chess960: bool,
    /// Generate rook and bishop promotions. On by default so perft counts
    /// are exact; search configurations may turn it off to shrink the tree.
    pub underpromotions: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            chess960: false,
            underpromotions: true,
        }
    }
}
