//! Piece and color types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Chess piece types.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    /// All piece types in index order
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Piece::Pawn => 0,
            Piece::Knight => 1,
            Piece::Bishop => 2,
            Piece::Rook => 3,
            Piece::Queen => 4,
            Piece::King => 5,
        }
    }

    /// Parse a piece from a character in either case (p, n, b, r, q, k)
    #[must_use]
    pub fn from_char(c: char) -> Option<Piece> {
        match c.to_ascii_lowercase() {
            'p' => Some(Piece::Pawn),
            'n' => Some(Piece::Knight),
            'b' => Some(Piece::Bishop),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            'k' => Some(Piece::King),
            _ => None,
        }
    }

    /// Convert piece to lowercase character
    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }

    /// Convert piece to character with case based on color (uppercase for White)
    #[inline]
    #[must_use]
    pub fn to_fen_char(self, color: Color) -> char {
        let c = self.to_char();
        if color == Color::White {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    /// Game phase contribution: minors 1, rooks 2, queens 4
    #[inline]
    #[must_use]
    pub const fn phase_weight(self) -> i32 {
        match self {
            Piece::Knight | Piece::Bishop => 1,
            Piece::Rook => 2,
            Piece::Queen => 4,
            Piece::Pawn | Piece::King => 0,
        }
    }
}

/// Chess colors.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Both colors in index order (White=0, Black=1)
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Returns the opposite color
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Scoring sign for evaluation (+1 for White, -1 for Black)
    #[inline]
    #[must_use]
    pub(crate) const fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Back rank for this color (0 for White, 7 for Black)
    #[inline]
    #[must_use]
    pub(crate) const fn back_rank(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank as seen from this color's side of the board
    #[inline]
    #[must_use]
    pub(crate) const fn relative_rank(self, rank: usize) -> usize {
        match self {
            Color::White => rank,
            Color::Black => 7 - rank,
        }
    }

    /// Square-index offset of a single pawn push (+8 for White, -8 for Black)
    #[inline]
    #[must_use]
    pub(crate) const fn up_offset(self) -> i32 {
        match self {
            Color::White => 8,
            Color::Black => -8,
        }
    }

    /// Square-index offset of a pawn capture toward the a-file
    #[inline]
    #[must_use]
    pub(crate) const fn up_west_offset(self) -> i32 {
        match self {
            Color::White => 7,
            Color::Black => -9,
        }
    }

    /// Square-index offset of a pawn capture toward the h-file
    #[inline]
    #[must_use]
    pub(crate) const fn up_east_offset(self) -> i32 {
        match self {
            Color::White => 9,
            Color::Black => -7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_index() {
        for (i, piece) in Piece::ALL.iter().enumerate() {
            assert_eq!(piece.index(), i);
        }
    }

    #[test]
    fn test_piece_chars() {
        assert_eq!(Piece::from_char('n'), Some(Piece::Knight));
        assert_eq!(Piece::from_char('Q'), Some(Piece::Queen));
        assert_eq!(Piece::from_char('x'), None);
        assert_eq!(Piece::Knight.to_char(), 'n');
        assert_eq!(Piece::Rook.to_fen_char(Color::White), 'R');
        assert_eq!(Piece::Rook.to_fen_char(Color::Black), 'r');
    }

    #[test]
    fn test_phase_weights() {
        assert_eq!(Piece::Pawn.phase_weight(), 0);
        assert_eq!(Piece::Knight.phase_weight(), 1);
        assert_eq!(Piece::Bishop.phase_weight(), 1);
        assert_eq!(Piece::Rook.phase_weight(), 2);
        assert_eq!(Piece::Queen.phase_weight(), 4);
        assert_eq!(Piece::King.phase_weight(), 0);
    }

    #[test]
    fn test_color_basics() {
        assert_eq!(Color::White.index(), 0);
        assert_eq!(Color::Black.index(), 1);
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::White.sign(), 1);
        assert_eq!(Color::Black.sign(), -1);
        assert_eq!(Color::White.back_rank(), 0);
        assert_eq!(Color::Black.back_rank(), 7);
    }

    #[test]
    fn test_relative_rank() {
        assert_eq!(Color::White.relative_rank(6), 6);
        assert_eq!(Color::Black.relative_rank(6), 1);
        assert_eq!(Color::Black.relative_rank(0), 7);
    }

    #[test]
    fn test_pawn_offsets() {
        assert_eq!(Color::White.up_offset(), 8);
        assert_eq!(Color::Black.up_offset(), -8);
        // A white pawn on e4 (28) captures to d5 (35) and f5 (37)
        assert_eq!(28 + Color::White.up_west_offset(), 35);
        assert_eq!(28 + Color::White.up_east_offset(), 37);
        // A black pawn on e4 (28) captures to d3 (19) and f3 (21)
        assert_eq!(28 + Color::Black.up_west_offset(), 19);
        assert_eq!(28 + Color::Black.up_east_offset(), 21);
    }
}
