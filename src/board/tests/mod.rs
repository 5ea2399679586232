//! Board-level test suites.

mod ordering;
mod perft;

use rand::rngs::StdRng;
use rand::Rng;

use super::{Options, Position};

/// Play `count` uniformly random legal moves, stopping early at a terminal
/// position. Returns the number of moves actually applied.
pub(crate) fn random_walk(pos: &mut Position, rng: &mut StdRng, count: usize) -> usize {
    let opts = Options::default();

    for i in 0..count {
        let legal = pos.legal_moves(&opts);
        if legal.is_empty() {
            return i;
        }
        let m = legal[rng.gen_range(0..legal.len())].mv;
        pos.apply_move(m);
    }

    count
}

/// Mirror a FEN: swap colors, flip ranks, swap side to move. Used to check
/// evaluation symmetry.
pub(crate) fn mirror_fen(fen: &str) -> String {
    let parts: Vec<&str> = fen.split_whitespace().collect();

    let placement = parts[0]
        .split('/')
        .rev()
        .map(|rank| {
            rank.chars()
                .map(|c| {
                    if c.is_ascii_alphabetic() {
                        if c.is_uppercase() {
                            c.to_ascii_lowercase()
                        } else {
                            c.to_ascii_uppercase()
                        }
                    } else {
                        c
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("/");

    let side = if parts[1] == "w" { "b" } else { "w" };

    let castling: String = if parts[2] == "-" {
        "-".to_string()
    } else {
        let mut flipped: Vec<char> = parts[2]
            .chars()
            .map(|c| {
                if c.is_uppercase() {
                    c.to_ascii_lowercase()
                } else {
                    c.to_ascii_uppercase()
                }
            })
            .collect();
        // Keep the conventional KQkq ordering
        flipped.sort_by_key(|c| match c {
            'K' => 0,
            'Q' => 1,
            'k' => 2,
            'q' => 3,
            other => 4 + *other as usize,
        });
        flipped.into_iter().collect()
    };

    let ep = if parts[3] == "-" {
        "-".to_string()
    } else {
        let mut chars = parts[3].chars();
        let file = chars.next().unwrap();
        let rank = chars.next().unwrap();
        let mirrored_rank = (b'9' - rank as u8 + b'0') as char;
        format!("{file}{mirrored_rank}")
    };

    format!(
        "{placement} {side} {castling} {ep} {} {}",
        parts.get(4).unwrap_or(&"0"),
        parts.get(5).unwrap_or(&"1")
    )
}

mod helper_tests {
    use super::*;

    #[test]
    fn test_mirror_fen_startpos() {
        // The starting position is its own mirror (up to the side to move)
        let mirrored = mirror_fen(crate::board::STARTPOS_FEN);
        assert_eq!(
            mirrored,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1"
        );
    }

    #[test]
    fn test_mirror_fen_ep() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let mirrored = mirror_fen(fen);
        assert!(mirrored.contains(" e6 "));
        assert!(mirrored.contains(" w "));
    }

    #[test]
    fn test_mirror_is_involution() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ];
        for fen in fens {
            assert_eq!(mirror_fen(&mirror_fen(fen)), fen);
        }
    }
}
