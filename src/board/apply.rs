//! Move application and undo.
//!
//! `apply_move` copies the top undo frame and mutates the copy, keeping the
//! Zobrist keys, material, phase, castling rights and checkers incrementally
//! correct. `pop_move` is a plain stack pop.

use crate::zobrist::ZOBRIST;

use super::eval::params::piece_value;
use super::state::{BoardState, Position};
use super::types::{Color, Move, MoveKind, Piece, Square, TaperedScore};

fn signed(value: TaperedScore, color: Color) -> TaperedScore {
    if color == Color::White {
        value
    } else {
        -value
    }
}

fn add_piece(state: &mut BoardState, sq: Square, color: Color, piece: Piece) {
    state.boards.toggle(sq, color, piece);

    let key = ZOBRIST.piece_square(color, piece, sq);
    state.key ^= key;
    if piece == Piece::Pawn {
        state.pawn_key ^= key;
    }

    state.material += signed(piece_value(piece), color);
    state.phase += piece.phase_weight();
}

fn remove_piece(state: &mut BoardState, sq: Square, color: Color, piece: Piece) {
    state.boards.toggle(sq, color, piece);

    let key = ZOBRIST.piece_square(color, piece, sq);
    state.key ^= key;
    if piece == Piece::Pawn {
        state.pawn_key ^= key;
    }

    state.material -= signed(piece_value(piece), color);
    state.phase -= piece.phase_weight();
}

fn move_piece(state: &mut BoardState, src: Square, dst: Square, color: Color, piece: Piece) {
    state.boards.toggle_move(src, dst, color, piece);

    let keys = ZOBRIST.piece_square(color, piece, src) ^ ZOBRIST.piece_square(color, piece, dst);
    state.key ^= keys;
    if piece == Piece::Pawn {
        state.pawn_key ^= keys;
    }
}

impl Position {
    /// Apply a pseudo-legal move, pushing a new undo frame. The move may
    /// leave the mover in check; the caller verifies with
    /// [`Position::was_legal`] and pops if needed.
    pub fn apply_move(&mut self, m: Move) {
        debug_assert!(!m.is_null());

        let us = self.to_move();
        let them = us.opponent();

        let mut state = *self.state();
        state.last_move = m;
        state.captured = None;

        state.key ^= ZOBRIST.black_to_move();
        state.pawn_key ^= ZOBRIST.black_to_move();

        // The en-passant file is hashed whenever a double push sets the
        // square, whether or not a capture is possible
        if let Some(ep) = state.en_passant.take() {
            state.key ^= ZOBRIST.en_passant(ep);
        }

        let old_castling = state.castling_rooks;

        let src = m.src();
        let dst = m.dst();

        match m.kind() {
            MoveKind::Standard => {
                let (_, piece) = state
                    .boards
                    .piece_at(src)
                    .expect("apply_move: empty source square");

                let captured = state.boards.piece_at(dst);
                if let Some((cap_color, cap_piece)) = captured {
                    debug_assert!(cap_color == them);
                    remove_piece(&mut state, dst, cap_color, cap_piece);
                    state.captured = Some(cap_piece);
                    state.castling_rooks.clear_rook(dst);
                }

                move_piece(&mut state, src, dst, us, piece);

                state.halfmove = if piece == Piece::Pawn || captured.is_some() {
                    0
                } else {
                    state.halfmove + 1
                };

                match piece {
                    Piece::Pawn => {
                        if dst.index().abs_diff(src.index()) == 16 {
                            let ep = Square::from_index((src.index() + dst.index()) / 2);
                            state.en_passant = Some(ep);
                            state.key ^= ZOBRIST.en_passant(ep);
                        }
                    }
                    Piece::King => {
                        state.kings[us.index()] = dst;
                        state.castling_rooks.clear(us);
                    }
                    Piece::Rook => {
                        state.castling_rooks.clear_rook(src);
                    }
                    _ => {}
                }
            }

            MoveKind::Promotion => {
                let captured = state.boards.piece_at(dst);
                if let Some((cap_color, cap_piece)) = captured {
                    remove_piece(&mut state, dst, cap_color, cap_piece);
                    state.captured = Some(cap_piece);
                    state.castling_rooks.clear_rook(dst);
                }

                remove_piece(&mut state, src, us, Piece::Pawn);
                add_piece(&mut state, dst, us, m.promo_target());

                state.halfmove = 0;
            }

            MoveKind::Castling => {
                // dst is the rook's square; final squares are fixed by side
                let rook_src = dst;
                let short = rook_src.file() > src.file();
                let rank = us.back_rank();
                let king_dst = Square::new(rank, if short { 6 } else { 2 });
                let rook_dst = Square::new(rank, if short { 5 } else { 3 });

                // Remove both pieces before placing either; in Chess960 the
                // final squares can overlap the source squares
                remove_piece(&mut state, src, us, Piece::King);
                remove_piece(&mut state, rook_src, us, Piece::Rook);
                add_piece(&mut state, king_dst, us, Piece::King);
                add_piece(&mut state, rook_dst, us, Piece::Rook);

                state.kings[us.index()] = king_dst;
                state.castling_rooks.clear(us);
                state.halfmove += 1;
            }

            MoveKind::EnPassant => {
                let cap_sq = dst.offset(-us.up_offset());
                remove_piece(&mut state, cap_sq, them, Piece::Pawn);
                state.captured = Some(Piece::Pawn);

                move_piece(&mut state, src, dst, us, Piece::Pawn);
                state.halfmove = 0;
            }
        }

        state.key ^= ZOBRIST.castling(old_castling) ^ ZOBRIST.castling(state.castling_rooks);

        if us == Color::Black {
            self.fullmove += 1;
        }
        self.black_to_move = !self.black_to_move;

        self.keys.push(state.key);
        self.states.push(state);

        self.state_mut().checkers = self.calc_checkers();
    }

    /// Pop the most recent move (or null move), restoring the previous frame
    pub fn pop_move(&mut self) {
        debug_assert!(self.states.len() > 1, "pop_move without a matching apply");

        self.states.pop();
        self.keys.pop();
        self.black_to_move = !self.black_to_move;

        if self.black_to_move {
            self.fullmove -= 1;
        }
    }

    /// Pass the move to the opponent. Used by null-move pruning; never
    /// applied while in check.
    pub fn apply_null_move(&mut self) {
        debug_assert!(!self.is_check());

        let mut state = *self.state();
        state.last_move = Move::NULL;
        state.captured = None;
        state.halfmove += 1;

        state.key ^= ZOBRIST.black_to_move();
        state.pawn_key ^= ZOBRIST.black_to_move();

        if let Some(ep) = state.en_passant.take() {
            state.key ^= ZOBRIST.en_passant(ep);
        }

        if self.to_move() == Color::Black {
            self.fullmove += 1;
        }
        self.black_to_move = !self.black_to_move;

        self.keys.push(state.key);
        self.states.push(state);

        self.state_mut().checkers = self.calc_checkers();
    }

    /// Recompute every derived field (keys, material, phase, kings,
    /// checkers) from the piece bitboards. Used after FEN loading.
    pub(crate) fn regen(&mut self) {
        let kings = [
            self.boards().kings(Color::White).lowest_square(),
            self.boards().kings(Color::Black).lowest_square(),
        ];

        let key = self.calc_key_from_scratch();
        let pawn_key = self.calc_pawn_key_from_scratch();
        let material = self.calc_material_from_scratch();
        let phase = self.calc_phase_from_scratch();

        let state = self.state_mut();
        state.kings = kings;
        state.key = key;
        state.pawn_key = pawn_key;
        state.material = material;
        state.phase = phase;

        self.state_mut().checkers = self.calc_checkers();
    }

    pub(crate) fn calc_key_from_scratch(&self) -> u64 {
        let boards = self.boards();
        let state = self.state();

        let mut key = 0u64;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in boards.piece_of(piece, color).iter() {
                    key ^= ZOBRIST.piece_square(color, piece, sq);
                }
            }
        }

        if self.black_to_move {
            key ^= ZOBRIST.black_to_move();
        }
        key ^= ZOBRIST.castling(state.castling_rooks);
        if let Some(ep) = state.en_passant {
            key ^= ZOBRIST.en_passant(ep);
        }

        key
    }

    pub(crate) fn calc_pawn_key_from_scratch(&self) -> u64 {
        let boards = self.boards();

        let mut key = 0u64;
        for color in Color::BOTH {
            for sq in boards.pawns(color).iter() {
                key ^= ZOBRIST.piece_square(color, Piece::Pawn, sq);
            }
        }

        if self.black_to_move {
            key ^= ZOBRIST.black_to_move();
        }

        key
    }

    pub(crate) fn calc_material_from_scratch(&self) -> TaperedScore {
        let boards = self.boards();

        let mut material = TaperedScore::ZERO;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                let count = boards.piece_of(piece, color).popcount() as i32;
                material += signed(piece_value(piece) * count, color);
            }
        }

        material
    }

    pub(crate) fn calc_phase_from_scratch(&self) -> i32 {
        let boards = self.boards();

        Piece::ALL
            .iter()
            .map(|&piece| boards.piece(piece).popcount() as i32 * piece.phase_weight())
            .sum()
    }
}
