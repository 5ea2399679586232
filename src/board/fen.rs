//! FEN parsing and formatting, plus UCI move conversion.
//!
//! Castling rights are accepted in both standard (`KQkq`) and Shredder-FEN
//! (rook file letters) form, so Chess960 positions round-trip.

use std::fmt::Write as _;
use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::state::Position;
use super::types::{Color, Move, MoveKind, Piece, Square};
use super::Options;

/// The standard starting position
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// The standard starting position
    #[must_use]
    pub fn starting() -> Self {
        Self::from_fen(STARTPOS_FEN).expect("startpos FEN is valid")
    }

    /// Parse a position from FEN. The position is fully regenerated (keys,
    /// material, phase, checkers) after the boards are placed.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut pos = Position::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRankCount { found: ranks.len() });
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else {
                    let color = if c.is_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::TooManyFiles {
                            rank,
                            files: file + 1,
                        });
                    }
                    pos.state_mut()
                        .boards
                        .toggle(Square::new(rank, file), color, piece);
                    file += 1;
                }
            }
        }

        for (color, side_char) in [(Color::White, 'w'), (Color::Black, 'b')] {
            let kings = pos.boards().kings(color);
            if kings.popcount() != 1 {
                return Err(FenError::InvalidKingCount {
                    side: side_char,
                    found: kings.popcount(),
                });
            }
        }

        match parts[1] {
            "w" => pos.black_to_move = false,
            "b" => pos.black_to_move = true,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        }

        if parts[2] != "-" {
            for c in parts[2].chars() {
                pos.add_castling_right(c)?;
            }
        }

        pos.state_mut().en_passant = if parts[3] == "-" {
            None
        } else {
            Some(
                parts[3]
                    .parse::<Square>()
                    .map_err(|_| FenError::InvalidEnPassant {
                        found: parts[3].to_string(),
                    })?,
            )
        };

        if parts.len() >= 5 {
            pos.state_mut().halfmove = parts[4].parse().unwrap_or(0);
        }
        if parts.len() >= 6 {
            pos.fullmove = parts[5].parse().unwrap_or(1);
        }

        pos.regen();
        pos.keys = vec![pos.key()];

        Ok(pos)
    }

    /// Resolve a single castling-rights character. `KQkq` pick the outermost
    /// rook on the relevant side of the king; Shredder file letters name the
    /// rook file directly.
    fn add_castling_right(&mut self, c: char) -> Result<(), FenError> {
        let color = if c.is_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let rank = color.back_rank();
        let king_file = self.boards().kings(color).lowest_square().file();
        let rooks = self.boards().rooks(color);

        let rook = match c.to_ascii_lowercase() {
            'k' => ((king_file + 1)..8)
                .rev()
                .map(|f| Square::new(rank, f))
                .find(|&sq| rooks.contains(sq)),
            'q' => (0..king_file).map(|f| Square::new(rank, f)).find(|&sq| rooks.contains(sq)),
            file @ 'a'..='h' => {
                let sq = Square::new(rank, file as usize - 'a' as usize);
                rooks.contains(sq).then_some(sq)
            }
            _ => return Err(FenError::InvalidCastling { char: c }),
        };

        let rook = rook.ok_or(FenError::MissingCastlingRook { char: c })?;

        if rook.file() > king_file {
            self.state_mut().castling_rooks.set_short(color, Some(rook));
        } else {
            self.state_mut().castling_rooks.set_long(color, Some(rook));
        }

        Ok(())
    }

    /// Format the position as FEN. Castling rights use `KQkq` when the rooks
    /// sit on their classical files, Shredder file letters otherwise.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let boards = self.boards();
        let mut out = String::new();

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                if let Some((color, piece)) = boards.piece_at(Square::new(rank, file)) {
                    if empty > 0 {
                        let _ = write!(out, "{empty}");
                        empty = 0;
                    }
                    out.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                let _ = write!(out, "{empty}");
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(if self.black_to_move { 'b' } else { 'w' });
        out.push(' ');

        let rooks = self.castling_rooks();
        let mut castling = String::new();
        for (color, short_c, long_c) in [(Color::White, 'K', 'Q'), (Color::Black, 'k', 'q')] {
            if let Some(rook) = rooks.short(color) {
                if rook.file() == 7 {
                    castling.push(short_c);
                } else {
                    castling.push(file_char(rook.file(), color));
                }
            }
            if let Some(rook) = rooks.long(color) {
                if rook.file() == 0 {
                    castling.push(long_c);
                } else {
                    castling.push(file_char(rook.file(), color));
                }
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }
        out.push_str(&castling);

        let ep = self
            .en_passant()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        let _ = write!(out, " {ep} {} {}", self.halfmove(), self.fullmove());

        out
    }

    /// Parse a move in UCI long-algebraic notation and return the matching
    /// legal move. Standard castling is accepted in both `e1g1` and
    /// king-takes-rook (`e1h1`) form.
    pub fn move_from_uci(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        if uci.len() < 4 || uci.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }
        if !uci.is_ascii() {
            return Err(MoveParseError::InvalidSquare {
                notation: uci.to_string(),
            });
        }

        let src: Square = uci[0..2].parse().map_err(|_| MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        })?;
        let dst: Square = uci[2..4].parse().map_err(|_| MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        })?;

        let promo = match uci.chars().nth(4) {
            None => None,
            Some(c) => {
                let piece =
                    Piece::from_char(c).ok_or(MoveParseError::InvalidPromotion { char: c })?;
                if matches!(piece, Piece::Pawn | Piece::King) {
                    return Err(MoveParseError::InvalidPromotion { char: c });
                }
                Some(piece)
            }
        };

        // Match against full legality with every promotion enabled and the
        // general castling generator; the input notation decides intent, not
        // the engine's pruning options
        let permissive = Options {
            chess960: true,
            underpromotions: true,
        };

        let legal = self.legal_moves(&permissive);
        for m in legal.iter() {
            if m.src() != src {
                continue;
            }

            let dst_matches = match m.kind() {
                MoveKind::Castling => {
                    let king_dst =
                        Square::new(src.rank(), if m.dst().file() > src.file() { 6 } else { 2 });
                    m.dst() == dst || king_dst == dst
                }
                _ => m.dst() == dst,
            };

            let promo_matches = match m.kind() {
                MoveKind::Promotion => promo == Some(m.promo_target()),
                _ => promo.is_none(),
            };

            if dst_matches && promo_matches {
                return Ok(m);
            }
        }

        Err(MoveParseError::IllegalMove {
            notation: uci.to_string(),
        })
    }
}

fn file_char(file: usize, color: Color) -> char {
    let c = (b'a' + file as u8) as char;
    if color == Color::White {
        c.to_ascii_uppercase()
    } else {
        c
    }
}

/// Format a move for UCI output. Standard castling prints the king's
/// destination (`e1g1`); with chess960 on it prints king-takes-rook.
#[must_use]
pub fn move_to_uci(m: Move, chess960: bool) -> String {
    if m.is_null() {
        return "0000".to_string();
    }

    if m.kind() == MoveKind::Castling && !chess960 {
        let src = m.src();
        let dst_file = if m.dst().file() > src.file() { 6 } else { 2 };
        return format!("{}{}", src, Square::new(src.rank(), dst_file));
    }

    m.to_string()
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}
