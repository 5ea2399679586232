//! Tapered hand-crafted evaluation.
//!
//! Every term is computed for black and white independently and subtracted;
//! the white-minus-black total is interpolated by game phase, scaled by the
//! halfmove clock and the likely-drawn detector, and finally flipped to the
//! side to move with a tempo bonus.
//!
//! Pawn-structure terms are cached by the pawn key; see
//! [`crate::pawn_cache`].

pub(crate) mod params;

use crate::pawn_cache::PawnCache;

use super::attack_tables::{bishop_attacks, knight_attacks, queen_attacks, rook_attacks};
use super::masks::{FILES, PASSER_BLOCKERS, PASSER_HELPERS};
use super::state::Position;
use super::types::{Bitboard, Color, Score, Square, TaperedScore};

use params::{
    BISHOP_MOBILITY, BISHOP_PAIR, BLOCKED_PASSER, CANDIDATE_PASSER, DEFENDED_PASSER, DOUBLED_PAWN,
    DOUBLED_GAPPED_PAWN, DOUBLED_PASSER, KING_ON_OPEN_FILE, KING_ON_SEMI_OPEN_FILE,
    KNIGHT_MOBILITY, KNIGHT_OUTPOST, MINOR_ATTACKING_QUEEN, MINOR_ATTACKING_ROOK,
    MINOR_BEHIND_PAWN, OPEN_PAWN, PASSER, PASSER_HELPER, PASSER_SQUARE_RULE, PAWN_ATTACKING_MINOR,
    PAWN_ATTACKING_QUEEN, PAWN_ATTACKING_ROOK, PAWN_DEFENDER, PAWN_PHALANX, QUEEN_MOBILITY,
    ROOK_ATTACKING_QUEEN, ROOK_MOBILITY, ROOK_ON_OPEN_FILE, ROOK_ON_SEMI_OPEN_FILE,
    ROOK_SUPPORTING_PASSER, TEMPO,
};

/// Per-side inputs fixed before any term is evaluated
#[derive(Clone, Copy, Default)]
struct SideInputs {
    pawn_attacks: Bitboard,
    semi_open: Bitboard,
    available: Bitboard,
}

/// Per-side term accumulators
#[derive(Clone, Copy, Default)]
struct SideScores {
    passers: Bitboard,
    pawn_structure: TaperedScore,
    pawns: TaperedScore,
    knights: TaperedScore,
    bishops: TaperedScore,
    rooks: TaperedScore,
    queens: TaperedScore,
    kings: TaperedScore,
    mobility: TaperedScore,
}

impl SideScores {
    fn total(&self) -> TaperedScore {
        self.pawn_structure
            + self.pawns
            + self.knights
            + self.bishops
            + self.rooks
            + self.queens
            + self.kings
            + self.mobility
    }
}

struct Evaluator<'a> {
    pos: &'a Position,
    inputs: [SideInputs; 2],
    scores: [SideScores; 2],
    open_files: Bitboard,
    cached_pawn_structure: bool,
    total: TaperedScore,
    final_score: Score,
}

impl<'a> Evaluator<'a> {
    fn new(pos: &'a Position, mut pawn_cache: Option<&mut PawnCache>) -> Self {
        let boards = pos.boards();

        let mut inputs = [SideInputs::default(); 2];
        for color in Color::BOTH {
            let pawns = boards.pawns(color);
            inputs[color.index()].pawn_attacks =
                pawns.shift_up_west(color) | pawns.shift_up_east(color);
            inputs[color.index()].semi_open = !pawns.fill_file();
        }
        for color in Color::BOTH {
            inputs[color.index()].available =
                !(boards.color(color) | inputs[color.opponent().index()].pawn_attacks);
        }

        let open_files =
            inputs[Color::White.index()].semi_open & inputs[Color::Black.index()].semi_open;

        let mut eval = Evaluator {
            pos,
            inputs,
            scores: [SideScores::default(); 2],
            open_files,
            cached_pawn_structure: false,
            total: pos.material(),
            final_score: 0,
        };

        // Pawn structure, through the cache when one is supplied
        let mut cache_hit = false;
        if let Some(cache) = pawn_cache.as_deref_mut() {
            let entry = cache.probe(pos.pawn_key());
            if entry.key == pos.pawn_key() {
                // The cached score is already white minus black
                eval.scores[Color::White.index()].pawn_structure = entry.eval;
                eval.scores[Color::White.index()].passers =
                    entry.passers & boards.color(Color::White);
                eval.scores[Color::Black.index()].passers =
                    entry.passers & boards.color(Color::Black);
                eval.cached_pawn_structure = true;
                cache_hit = true;
            }
        }

        if !cache_hit {
            eval.pawn_structure(Color::White);
            eval.pawn_structure(Color::Black);

            if let Some(cache) = pawn_cache.as_deref_mut() {
                let white = &eval.scores[Color::White.index()];
                let black = &eval.scores[Color::Black.index()];
                let entry = cache.probe(pos.pawn_key());
                entry.key = pos.pawn_key();
                entry.eval = white.pawn_structure - black.pawn_structure;
                entry.passers = white.passers | black.passers;
            }
        }

        for color in Color::BOTH {
            eval.pawns(color);
            eval.knights(color);
            eval.bishops(color);
            eval.rooks(color);
            eval.queens(color);
            eval.king(color);
        }

        eval.total += eval.scores[Color::White.index()].total()
            - eval.scores[Color::Black.index()].total();

        let mut score = pos.interp_score(eval.total);

        // Drift toward a draw as the 50-move counter grows
        score = score * (200 - i32::from(pos.halfmove())) / 200;

        if pos.is_likely_drawn() {
            score /= 8;
        }

        eval.final_score = score;
        eval
    }

    fn pawn_structure(&mut self, us: Color) {
        let them = us.opponent();
        let boards = self.pos.boards();

        let our_pawns = boards.pawns(us);
        let their_pawns = boards.pawns(them);

        let our_attacks = self.inputs[us.index()].pawn_attacks;
        let their_semi_open = self.inputs[them.index()].semi_open;

        let mut score = TaperedScore::ZERO;
        let mut passers = Bitboard::EMPTY;

        let up = our_pawns.shift_up(us);
        let doubled = up & our_pawns;

        score += DOUBLED_PAWN * doubled.popcount() as i32;
        score += DOUBLED_GAPPED_PAWN * (up.shift_up(us) & our_pawns).popcount() as i32;
        score += PAWN_DEFENDER * (our_attacks & our_pawns).popcount() as i32;
        score += OPEN_PAWN
            * (our_pawns & !their_pawns.fill_down(us) & !our_attacks).popcount() as i32;

        // Each side-by-side pair counts once, from its eastern pawn
        let mut phalanx = our_pawns & our_pawns.shift_east();
        while !phalanx.is_empty() {
            let sq = phalanx.pop_lowest_square();
            score += PAWN_PHALANX[us.relative_rank(sq.rank())];
        }

        let mut pawns = our_pawns;
        while !pawns.is_empty() {
            let sq = pawns.pop_lowest_square();
            let pawn = Bitboard::from_square(sq);

            let rank = us.relative_rank(sq.rank());

            let anti_passers = their_pawns & PASSER_BLOCKERS[us.index()][sq.index()];

            if anti_passers.is_empty() {
                score += PASSER[rank];

                if !(pawn & our_attacks).is_empty() {
                    score += DEFENDED_PASSER[rank];
                }
                if !(pawn & doubled).is_empty() {
                    score += DOUBLED_PASSER;
                }

                let helpers = our_pawns & PASSER_HELPERS[us.index()][sq.index()];
                score += PASSER_HELPER * helpers.popcount() as i32;

                passers |= pawn;
            } else if !(pawn & their_semi_open).is_empty() {
                // Candidate passer: every blocker is a lever the defender
                // cannot keep up, judged by levers on the pawn and its stop
                // square against the helpers beside it
                let stop = pawn.shift_up(us);

                let levers = anti_passers & (pawn.shift_up_west(us) | pawn.shift_up_east(us));

                if anti_passers == levers {
                    score += CANDIDATE_PASSER[rank];
                } else {
                    let telelevers =
                        anti_passers & (stop.shift_up_west(us) | stop.shift_up_east(us));
                    let helpers = our_pawns & (pawn.shift_west() | pawn.shift_east());

                    if anti_passers == telelevers
                        || telelevers.popcount() <= helpers.popcount()
                    {
                        score += CANDIDATE_PASSER[rank];
                    }
                }
            }
        }

        self.scores[us.index()].pawn_structure = score;
        self.scores[us.index()].passers = passers;
    }

    fn pawns(&mut self, us: Color) {
        let them = us.opponent();
        let boards = self.pos.boards();

        let our_attacks = self.inputs[us.index()].pawn_attacks;

        let mut score = TaperedScore::ZERO;

        score += PAWN_ATTACKING_MINOR * (our_attacks & boards.minors_of(them)).popcount() as i32;
        score += PAWN_ATTACKING_ROOK * (our_attacks & boards.rooks(them)).popcount() as i32;
        score += PAWN_ATTACKING_QUEEN * (our_attacks & boards.queens(them)).popcount() as i32;

        let mut passers = self.scores[us.index()].passers;
        while !passers.is_empty() {
            let sq = passers.pop_lowest_square();
            let passer = Bitboard::from_square(sq);

            let rank = us.relative_rank(sq.rank());

            let promotion = Square::new(
                match us {
                    Color::White => 7,
                    Color::Black => 0,
                },
                sq.file(),
            );

            // Square of the pawn: in a pure pawn ending, a passer the enemy
            // king cannot catch is close to a new queen
            if boards.non_pk_of(them).is_empty()
                && (sq.chebyshev(promotion).min(5) as i32
                    + i32::from(us == self.pos.to_move()))
                    < self.pos.king(them).chebyshev(promotion) as i32
            {
                score += PASSER_SQUARE_RULE;
            }

            if !(passer.shift_up(us) & boards.occupancy()).is_empty() {
                score += BLOCKED_PASSER[rank];
            }
        }

        self.scores[us.index()].pawns = score;
    }

    fn knights(&mut self, us: Color) {
        let them = us.opponent();
        let boards = self.pos.boards();

        let mut knights = boards.knights(us);
        if knights.is_empty() {
            return;
        }

        let our_attacks = self.inputs[us.index()].pawn_attacks;
        let available = self.inputs[us.index()].available;
        let their_pawns = boards.pawns(them);

        let mut score = TaperedScore::ZERO;
        let mut mobility = TaperedScore::ZERO;

        score += MINOR_BEHIND_PAWN * (knights.shift_up(us) & boards.pawns(us)).popcount() as i32;

        while !knights.is_empty() {
            let sq = knights.pop_lowest_square();
            let knight = Bitboard::from_square(sq);

            // Outpost: no enemy pawn can ever attack the square, and a
            // friendly pawn defends it
            let never_attackable = (PASSER_BLOCKERS[us.index()][sq.index()]
                & !FILES[sq.file()]
                & their_pawns)
                .is_empty();
            if never_attackable && !(knight & our_attacks).is_empty() {
                score += KNIGHT_OUTPOST;
            }

            let attacks = knight_attacks(sq);

            score += MINOR_ATTACKING_ROOK * (attacks & boards.rooks(them)).popcount() as i32;
            score += MINOR_ATTACKING_QUEEN * (attacks & boards.queens(them)).popcount() as i32;

            mobility += KNIGHT_MOBILITY[(attacks & available).popcount() as usize];
        }

        self.scores[us.index()].knights = score;
        self.scores[us.index()].mobility += mobility;
    }

    fn bishops(&mut self, us: Color) {
        let them = us.opponent();
        let boards = self.pos.boards();

        let mut bishops = boards.bishops(us);
        if bishops.is_empty() {
            return;
        }

        let available = self.inputs[us.index()].available;

        let mut score = TaperedScore::ZERO;
        let mut mobility = TaperedScore::ZERO;

        score += MINOR_BEHIND_PAWN * (bishops.shift_up(us) & boards.pawns(us)).popcount() as i32;

        if !(bishops & Bitboard::DARK_SQUARES).is_empty()
            && !(bishops & Bitboard::LIGHT_SQUARES).is_empty()
        {
            score += BISHOP_PAIR;
        }

        let occ = boards.occupancy();
        // A battery still counts its full line: drop our own diagonal
        // sliders from the blockers for mobility
        let xray_occ = occ ^ boards.bishops(us) ^ boards.queens(us);

        while !bishops.is_empty() {
            let sq = bishops.pop_lowest_square();

            let attacks = bishop_attacks(sq, occ);

            score += MINOR_ATTACKING_ROOK * (attacks & boards.rooks(them)).popcount() as i32;
            score += MINOR_ATTACKING_QUEEN * (attacks & boards.queens(them)).popcount() as i32;

            let mobility_attacks = bishop_attacks(sq, xray_occ);
            mobility += BISHOP_MOBILITY[(mobility_attacks & available).popcount() as usize];
        }

        self.scores[us.index()].bishops = score;
        self.scores[us.index()].mobility += mobility;
    }

    fn rooks(&mut self, us: Color) {
        let them = us.opponent();
        let boards = self.pos.boards();

        let mut rooks = boards.rooks(us);
        if rooks.is_empty() {
            return;
        }

        let our_semi_open = self.inputs[us.index()].semi_open;
        let available = self.inputs[us.index()].available;
        let passers = self.scores[us.index()].passers;

        let mut score = TaperedScore::ZERO;
        let mut mobility = TaperedScore::ZERO;

        let occ = boards.occupancy();
        let xray_occ = occ ^ boards.rooks(us) ^ boards.queens(us);

        while !rooks.is_empty() {
            let sq = rooks.lowest_square();
            let rook = rooks.lowest_bit();
            rooks ^= rook;

            if !(rook & self.open_files).is_empty() {
                score += ROOK_ON_OPEN_FILE;
            } else if !(rook & our_semi_open).is_empty() {
                score += ROOK_ON_SEMI_OPEN_FILE;
            }

            if !(rook.fill_up(us) & passers).is_empty() {
                score += ROOK_SUPPORTING_PASSER;
            }

            let attacks = rook_attacks(sq, occ);

            score += ROOK_ATTACKING_QUEEN * (attacks & boards.queens(them)).popcount() as i32;

            let mobility_attacks = rook_attacks(sq, xray_occ);
            mobility += ROOK_MOBILITY[(mobility_attacks & available).popcount() as usize];
        }

        self.scores[us.index()].rooks = score;
        self.scores[us.index()].mobility += mobility;
    }

    fn queens(&mut self, us: Color) {
        let boards = self.pos.boards();

        let mut queens = boards.queens(us);
        if queens.is_empty() {
            return;
        }

        let available = self.inputs[us.index()].available;

        let mut mobility = TaperedScore::ZERO;

        let occ = boards.occupancy();
        let xray_occ = occ ^ boards.bishops(us) ^ boards.rooks(us) ^ boards.queens(us);

        while !queens.is_empty() {
            let sq = queens.pop_lowest_square();

            let mobility_attacks = queen_attacks(sq, xray_occ);
            mobility += QUEEN_MOBILITY[(mobility_attacks & available).popcount() as usize];
        }

        self.scores[us.index()].mobility += mobility;
    }

    fn king(&mut self, us: Color) {
        let boards = self.pos.boards();
        let king = boards.kings(us);

        let mut score = TaperedScore::ZERO;

        if !(king & self.open_files).is_empty() {
            score += KING_ON_OPEN_FILE;
        } else if !(king & self.inputs[us.index()].semi_open).is_empty() {
            score += KING_ON_SEMI_OPEN_FILE;
        }

        self.scores[us.index()].kings = score;
    }
}

/// Evaluation from white's point of view, without the tempo bonus
#[must_use]
pub fn static_eval_abs(pos: &Position, pawn_cache: Option<&mut PawnCache>) -> Score {
    Evaluator::new(pos, pawn_cache).final_score
}

/// Evaluation from the side to move's point of view, with tempo
#[must_use]
pub fn static_eval(pos: &Position, pawn_cache: Option<&mut PawnCache>) -> Score {
    static_eval_abs(pos, pawn_cache) * pos.to_move().sign() + TEMPO
}

/// Print the per-term evaluation breakdown (the `eval` debug command)
pub fn print_eval(pos: &Position) {
    let eval = Evaluator::new(pos, None);

    let term = |name: &str, white: TaperedScore, black: TaperedScore| {
        println!(
            "{name:>15}: ({:>4}, {:>4}) - ({:>4}, {:>4})",
            white.mg, white.eg, black.mg, black.eg
        );
    };

    let white = &eval.scores[Color::White.index()];
    let black = &eval.scores[Color::Black.index()];

    println!(
        "{:>15}: ({:>4}, {:>4})",
        "material",
        pos.material().mg,
        pos.material().eg
    );
    term("pawn structure", white.pawn_structure, black.pawn_structure);
    term("pawns", white.pawns, black.pawns);
    term("knights", white.knights, black.knights);
    term("bishops", white.bishops, black.bishops);
    term("rooks", white.rooks, black.rooks);
    term("queens", white.queens, black.queens);
    term("kings", white.kings, black.kings);
    term("mobility", white.mobility, black.mobility);
    println!(
        "{:>15}: ({:>4}, {:>4})",
        "total", eval.total.mg, eval.total.eg
    );
    println!("\nEval: {}", eval.final_score);
    println!(
        "  with tempo, for {}: {}",
        pos.to_move(),
        eval.final_score * pos.to_move().sign() + TEMPO
    );
}
