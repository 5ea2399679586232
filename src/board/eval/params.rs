//! Evaluation parameters.
//!
//! Every term is a tapered (midgame, endgame) pair, interpolated by game
//! phase at the end of evaluation.

use crate::board::types::{Piece, TaperedScore};

macro_rules! s {
    ($mg:expr, $eg:expr) => {
        TaperedScore::new($mg, $eg)
    };
}

pub(crate) const PIECE_VALUES: [TaperedScore; 6] = [
    s!(100, 146),  // pawn
    s!(422, 404),  // knight
    s!(436, 429),  // bishop
    s!(586, 714),  // rook
    s!(1270, 1320), // queen
    s!(0, 0),      // king
];

#[inline]
#[must_use]
pub(crate) const fn piece_value(piece: Piece) -> TaperedScore {
    PIECE_VALUES[piece.index()]
}

/// Small bonus for having the move
pub(crate) const TEMPO: i32 = 20;

// Pawn structure
pub(crate) const DOUBLED_PAWN: TaperedScore = s!(-18, -25);
pub(crate) const DOUBLED_GAPPED_PAWN: TaperedScore = s!(-4, -18);
pub(crate) const PAWN_DEFENDER: TaperedScore = s!(17, 14);
pub(crate) const OPEN_PAWN: TaperedScore = s!(-11, -7);

pub(crate) const PAWN_PHALANX: [TaperedScore; 7] = [
    s!(0, 0),
    s!(3, 5),
    s!(22, 10),
    s!(25, 25),
    s!(44, 61),
    s!(118, 136),
    s!(23, 259),
];

pub(crate) const PASSER: [TaperedScore; 7] = [
    s!(0, 0),
    s!(0, 7),
    s!(-4, 14),
    s!(-13, 45),
    s!(12, 66),
    s!(8, 138),
    s!(48, 152),
];

pub(crate) const DEFENDED_PASSER: [TaperedScore; 7] = [
    s!(0, 0),
    s!(0, 0),
    s!(4, -9),
    s!(5, -11),
    s!(8, 0),
    s!(33, 15),
    s!(154, -12),
];

pub(crate) const BLOCKED_PASSER: [TaperedScore; 7] = [
    s!(0, 0),
    s!(-9, -3),
    s!(-9, 3),
    s!(-5, -8),
    s!(-13, -24),
    s!(5, -87),
    s!(29, -138),
];

pub(crate) const CANDIDATE_PASSER: [TaperedScore; 7] = [
    s!(0, 0),
    s!(7, -3),
    s!(1, 0),
    s!(3, 12),
    s!(20, 16),
    s!(46, 60),
    s!(0, 0),
];

pub(crate) const DOUBLED_PASSER: TaperedScore = s!(17, -26);
pub(crate) const PASSER_HELPER: TaperedScore = s!(-8, 13);

// Pawn attacks and the square rule
pub(crate) const PAWN_ATTACKING_MINOR: TaperedScore = s!(52, 17);
pub(crate) const PAWN_ATTACKING_ROOK: TaperedScore = s!(98, -31);
pub(crate) const PAWN_ATTACKING_QUEEN: TaperedScore = s!(57, -16);

pub(crate) const PASSER_SQUARE_RULE: TaperedScore = s!(12, 102);

// Minors
pub(crate) const MINOR_BEHIND_PAWN: TaperedScore = s!(5, 18);
pub(crate) const MINOR_ATTACKING_ROOK: TaperedScore = s!(40, 0);
pub(crate) const MINOR_ATTACKING_QUEEN: TaperedScore = s!(27, 3);

// Knights
pub(crate) const KNIGHT_OUTPOST: TaperedScore = s!(25, 16);

// Bishops
pub(crate) const BISHOP_PAIR: TaperedScore = s!(26, 59);

// Rooks
pub(crate) const ROOK_ON_OPEN_FILE: TaperedScore = s!(41, 2);
pub(crate) const ROOK_ON_SEMI_OPEN_FILE: TaperedScore = s!(15, 9);
pub(crate) const ROOK_SUPPORTING_PASSER: TaperedScore = s!(17, 14);
pub(crate) const ROOK_ATTACKING_QUEEN: TaperedScore = s!(55, -23);

// Kings
pub(crate) const KING_ON_OPEN_FILE: TaperedScore = s!(-71, 2);
pub(crate) const KING_ON_SEMI_OPEN_FILE: TaperedScore = s!(-30, 18);

// Mobility, indexed by the number of available attack squares
pub(crate) const KNIGHT_MOBILITY: [TaperedScore; 9] = [
    s!(-42, -12),
    s!(-23, -8),
    s!(-12, -5),
    s!(-8, 0),
    s!(3, 3),
    s!(8, 11),
    s!(16, 10),
    s!(20, 9),
    s!(36, -8),
];

pub(crate) const BISHOP_MOBILITY: [TaperedScore; 14] = [
    s!(-53, 5),
    s!(-38, -13),
    s!(-26, -23),
    s!(-18, -16),
    s!(-9, -8),
    s!(-5, 0),
    s!(0, 7),
    s!(3, 9),
    s!(2, 13),
    s!(11, 9),
    s!(21, 3),
    s!(46, 0),
    s!(7, 24),
    s!(58, -10),
];

pub(crate) const ROOK_MOBILITY: [TaperedScore; 15] = [
    s!(-42, -38),
    s!(-29, -15),
    s!(-23, -15),
    s!(-18, -11),
    s!(-17, -7),
    s!(-11, -4),
    s!(-9, 2),
    s!(-4, 4),
    s!(5, 7),
    s!(11, 9),
    s!(14, 12),
    s!(23, 14),
    s!(25, 18),
    s!(42, 11),
    s!(34, 11),
];

pub(crate) const QUEEN_MOBILITY: [TaperedScore; 28] = [
    s!(-31, 63),
    s!(-31, 222),
    s!(-32, 89),
    s!(-33, 53),
    s!(-31, 49),
    s!(-24, -23),
    s!(-20, -58),
    s!(-17, -68),
    s!(-14, -66),
    s!(-8, -73),
    s!(-7, -59),
    s!(-3, -49),
    s!(-4, -45),
    s!(4, -40),
    s!(5, -29),
    s!(0, -14),
    s!(0, -4),
    s!(16, -18),
    s!(12, -5),
    s!(27, -9),
    s!(33, -5),
    s!(64, -19),
    s!(44, -3),
    s!(83, -12),
    s!(35, 4),
    s!(41, 0),
    s!(-42, 62),
    s!(-66, 57),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_value_ordering() {
        assert!(piece_value(Piece::Pawn).mg < piece_value(Piece::Knight).mg);
        assert!(piece_value(Piece::Knight).mg < piece_value(Piece::Bishop).mg);
        assert!(piece_value(Piece::Bishop).mg < piece_value(Piece::Rook).mg);
        assert!(piece_value(Piece::Rook).mg < piece_value(Piece::Queen).mg);
        assert_eq!(piece_value(Piece::King), TaperedScore::ZERO);
    }

    #[test]
    fn test_mobility_table_sizes() {
        // A knight attacks at most 8 squares, a bishop 13, a rook 14 and a
        // queen 27; each table needs one extra slot for zero mobility
        assert_eq!(KNIGHT_MOBILITY.len(), 9);
        assert_eq!(BISHOP_MOBILITY.len(), 14);
        assert_eq!(ROOK_MOBILITY.len(), 15);
        assert_eq!(QUEEN_MOBILITY.len(), 28);
    }
}
