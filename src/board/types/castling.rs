//! Castling rights, stored as rook squares to support Chess960.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;
use super::square::Square;

/// Castling rights for both colors.
///
/// Each right is the square of the castling rook, or `None` once the right
/// is lost. Storing rook squares instead of a flag word is what makes
/// Chess960 castling work with the same code paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRooks {
    pub white_short: Option<Square>,
    pub white_long: Option<Square>,
    pub black_short: Option<Square>,
    pub black_long: Option<Square>,
}

impl CastlingRooks {
    /// No castling rights
    #[must_use]
    pub const fn none() -> Self {
        CastlingRooks {
            white_short: None,
            white_long: None,
            black_short: None,
            black_long: None,
        }
    }

    /// The standard-chess starting rights (rooks on a- and h-files)
    #[must_use]
    pub fn standard() -> Self {
        CastlingRooks {
            white_short: Some(Square::new(0, 7)),
            white_long: Some(Square::new(0, 0)),
            black_short: Some(Square::new(7, 7)),
            black_long: Some(Square::new(7, 0)),
        }
    }

    #[inline]
    #[must_use]
    pub fn short(self, color: Color) -> Option<Square> {
        match color {
            Color::White => self.white_short,
            Color::Black => self.black_short,
        }
    }

    #[inline]
    #[must_use]
    pub fn long(self, color: Color) -> Option<Square> {
        match color {
            Color::White => self.white_long,
            Color::Black => self.black_long,
        }
    }

    #[inline]
    pub fn set_short(&mut self, color: Color, rook: Option<Square>) {
        match color {
            Color::White => self.white_short = rook,
            Color::Black => self.black_short = rook,
        }
    }

    #[inline]
    pub fn set_long(&mut self, color: Color, rook: Option<Square>) {
        match color {
            Color::White => self.white_long = rook,
            Color::Black => self.black_long = rook,
        }
    }

    /// Clear both rights for a color (king moved or castled)
    #[inline]
    pub fn clear(&mut self, color: Color) {
        self.set_short(color, None);
        self.set_long(color, None);
    }

    /// Clear whichever right (of either color) is anchored on `rook`.
    /// Used when a rook moves off, or is captured on, its castling square.
    #[inline]
    pub fn clear_rook(&mut self, rook: Square) {
        for color in Color::BOTH {
            if self.short(color) == Some(rook) {
                self.set_short(color, None);
            }
            if self.long(color) == Some(rook) {
                self.set_long(color, None);
            }
        }
    }

    /// Four-bit rights word for Zobrist hashing:
    /// bit 0 = white short, 1 = white long, 2 = black short, 3 = black long
    #[inline]
    #[must_use]
    pub fn flags(self) -> usize {
        usize::from(self.white_short.is_some())
            | usize::from(self.white_long.is_some()) << 1
            | usize::from(self.black_short.is_some()) << 2
            | usize::from(self.black_long.is_some()) << 3
    }
}
