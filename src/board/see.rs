//! Static Exchange Evaluation (SEE).
//!
//! Answers "does the capture sequence on this move's destination square,
//! with both sides playing the least valuable attacker first, beat the
//! threshold for the mover?" without touching the board.

use super::attack_tables::{bishop_attacks, rook_attacks};
use super::state::Position;
use super::types::{Bitboard, Color, Move, MoveKind, Piece, Score};

/// Exchange values. The king is worth nothing here: it can never actually
/// be captured, so a king "capture" just ends the sequence.
const SEE_VALUES: [Score; 6] = [
    100,  // pawn
    450,  // knight
    450,  // bishop
    650,  // rook
    1250, // queen
    0,    // king
];

#[inline]
#[must_use]
pub(crate) const fn see_value(piece: Piece) -> Score {
    SEE_VALUES[piece.index()]
}

/// Material gained by the move itself, before any recapture
fn gain(pos: &Position, m: Move) -> Score {
    match m.kind() {
        MoveKind::Castling => 0,
        MoveKind::EnPassant => see_value(Piece::Pawn),
        MoveKind::Promotion => {
            let captured = pos
                .boards()
                .piece_at(m.dst())
                .map_or(0, |(_, piece)| see_value(piece));
            captured + see_value(m.promo_target()) - see_value(Piece::Pawn)
        }
        MoveKind::Standard => pos
            .boards()
            .piece_at(m.dst())
            .map_or(0, |(_, piece)| see_value(piece)),
    }
}

/// Remove the least valuable attacker of `color` from `occ` and return its
/// piece type.
fn pop_least_valuable(
    pos: &Position,
    occ: &mut Bitboard,
    attackers: Bitboard,
    color: Color,
) -> Option<Piece> {
    let boards = pos.boards();

    for piece in Piece::ALL {
        let board = attackers & boards.piece_of(piece, color);
        if !board.is_empty() {
            *occ ^= board.lowest_bit();
            return Some(piece);
        }
    }

    None
}

/// Returns true if the exchange sequence started by `m` nets at least
/// `threshold` for the side to move, assuming optimal captures by both
/// sides on the destination square.
///
/// X-rays are handled by re-scanning slider attacks through the shrinking
/// occupancy after every removal.
#[must_use]
pub fn see(pos: &Position, m: Move, threshold: Score) -> bool {
    let boards = pos.boards();
    let color = pos.to_move();

    let mut score = gain(pos, m) - threshold;

    // Even winning the full exchange loses to the threshold
    if score < 0 {
        return false;
    }

    let next = if m.kind() == MoveKind::Promotion {
        m.promo_target()
    } else {
        boards
            .piece_at(m.src())
            .map_or(Piece::Pawn, |(_, piece)| piece)
    };

    // Best case for the opponent: our piece dies on the square
    score -= see_value(next);

    if score >= 0 {
        return true;
    }

    let square = m.dst();

    let mut occupancy =
        boards.occupancy() ^ Bitboard::from_square(m.src()) ^ Bitboard::from_square(square);

    let queens = boards.piece(Piece::Queen);
    let bishops = queens | boards.piece(Piece::Bishop);
    let rooks = queens | boards.piece(Piece::Rook);

    let mut attackers = pos.all_attackers_to(square, occupancy);

    let mut us = color.opponent();
    let mut next = next;

    loop {
        let our_attackers = attackers & boards.color(us);
        if our_attackers.is_empty() {
            break;
        }

        next = match pop_least_valuable(pos, &mut occupancy, our_attackers, us) {
            Some(piece) => piece,
            None => break,
        };

        // Removing a piece may reveal an x-raying slider behind it
        if matches!(next, Piece::Pawn | Piece::Bishop | Piece::Queen) {
            attackers |= bishop_attacks(square, occupancy) & bishops;
        }
        if matches!(next, Piece::Rook | Piece::Queen) {
            attackers |= rook_attacks(square, occupancy) & rooks;
        }

        attackers &= occupancy;

        score = -score - 1 - see_value(next);
        us = us.opponent();

        if score >= 0 {
            // Our king just "captured", but the square is still defended:
            // the capture was illegal, so the exchange goes the other way
            if next == Piece::King && !(attackers & boards.color(us)).is_empty() {
                us = us.opponent();
            }
            break;
        }
    }

    // Whoever is *not* on turn when the loop stops won the exchange
    color != us
}
