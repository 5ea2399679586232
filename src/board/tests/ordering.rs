//! Staged move ordering tests.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Move, MoveKind, Options, OrderedMoves, Position};
use crate::search::history::{HistoryMove, HistoryTable};

use super::random_walk;

fn fen(fen: &str) -> Position {
    fen.parse().expect("valid fen")
}

fn drain(gen: &mut OrderedMoves, pos: &Position, history: Option<&HistoryTable>) -> Vec<Move> {
    let mut moves = Vec::new();
    while let Some(m) = gen.next(pos, history) {
        moves.push(m);
    }
    moves
}

#[test]
fn test_yields_every_move_exactly_once() {
    let mut rng = StdRng::seed_from_u64(0x5EED_0030);
    let opts = Options::default();

    for _ in 0..50 {
        let mut pos = Position::starting();
        let steps = rng.gen_range(0..50);
        random_walk(&mut pos, &mut rng, steps);

        let all = pos.legal_moves(&Options {
            chess960: false,
            underpromotions: true,
        });

        let mut gen = OrderedMoves::new(opts, Move::NULL, Move::NULL, None, None);
        let yielded = drain(&mut gen, &pos, None);

        let mut seen = HashSet::new();
        for m in &yielded {
            assert!(!m.is_null(), "null move yielded at {}", pos.to_fen());
            assert!(seen.insert(*m), "{m} yielded twice at {}", pos.to_fen());
        }

        // Every legal move appears among the yielded pseudo-legal ones
        for m in all.iter() {
            assert!(
                seen.contains(&m),
                "legal move {m} never yielded at {}",
                pos.to_fen()
            );
        }
    }
}

#[test]
fn test_hash_killer_counter_not_repeated() {
    let mut rng = StdRng::seed_from_u64(0x5EED_0031);
    let opts = Options::default();

    for _ in 0..30 {
        let mut pos = Position::starting();
        let steps = rng.gen_range(2..40);
        random_walk(&mut pos, &mut rng, steps);

        let legal = pos.legal_moves(&opts);
        if legal.len() < 3 {
            continue;
        }

        // Pick arbitrary distinct legal moves for the special slots
        let hash_move = legal[0].mv;
        let killer = legal[1].mv;
        let counter = legal[2].mv;

        // Plant the countermove behind the previous move
        let prev_move = pos.last_move();
        let mut history = HistoryTable::new();
        let prev = if prev_move.is_null() {
            None
        } else {
            // The previous move is already applied, so rebuild its history
            // key from the destination piece
            pos.pop_move();
            let hm = HistoryMove::from_move(&pos, prev_move);
            pos.apply_move(prev_move);
            hm
        };
        if let Some(prev) = prev {
            history.set_countermove(prev, counter);
        }

        let mut gen = OrderedMoves::new(opts, hash_move, killer, prev, None);
        let yielded = drain(&mut gen, &pos, Some(&history));

        let mut seen = HashSet::new();
        for m in &yielded {
            assert!(seen.insert(*m), "{m} yielded twice at {}", pos.to_fen());
        }
        assert_eq!(yielded[0], hash_move, "hash move not first");
        assert!(seen.contains(&killer));
        if prev.is_some() {
            assert!(seen.contains(&counter));
        }
    }
}

#[test]
fn test_quiescence_stops_after_good_noisy() {
    // A quiet middlegame position with a few captures available
    let pos = fen("r1bqkbnr/pppp1ppp/2n5/4p3/3PP3/5N2/PPP2PPP/RNBQKB1R b KQkq - 0 3");

    let mut gen = OrderedMoves::quiescence(Options::default());
    let yielded = drain(&mut gen, &pos, None);

    for m in &yielded {
        assert!(
            pos.is_noisy(*m),
            "quiescence yielded quiet move {m}"
        );
    }

    // exd4 is the only capture here
    assert!(yielded.iter().any(|m| m.to_string() == "e5d4"));
}

#[test]
fn test_quiescence_skips_losing_captures() {
    // Queen takes a defended pawn: losing by SEE, so quiescence never
    // reaches it
    let pos = fen("4k3/2p5/3p4/8/3Q4/8/8/4K3 w - - 0 1");

    let mut gen = OrderedMoves::quiescence(Options::default());
    let yielded = drain(&mut gen, &pos, None);

    assert!(
        !yielded.iter().any(|m| m.to_string() == "d4d6"),
        "losing capture emitted in quiescence"
    );
}

#[test]
fn test_queen_capture_ordered_first() {
    // Queens face off: QxQ must be the first move out of the generator
    // when no hash move is supplied
    let pos = fen("3qk3/8/8/8/8/8/8/3QK3 w - - 0 1");

    let mut gen = OrderedMoves::new(Options::default(), Move::NULL, Move::NULL, None, None);
    let first = gen.next(&pos, None).unwrap();
    assert_eq!(first.to_string(), "d1d8", "queen capture not first");
}

#[test]
fn test_queen_capture_follows_hash_move() {
    let mut pos = fen("3qk3/8/8/8/8/8/8/3QK3 w - - 0 1");
    let hash_move = pos.move_from_uci("e1e2").unwrap();

    let mut gen = OrderedMoves::new(Options::default(), hash_move, Move::NULL, None, None);
    assert_eq!(gen.next(&pos, None), Some(hash_move));
    let second = gen.next(&pos, None).unwrap();
    assert_eq!(second.to_string(), "d1d8");
}

#[test]
fn test_losing_captures_come_last() {
    // QxP defended: the losing capture must come after every quiet move
    let pos = fen("4k3/2p5/3p4/8/3Q4/8/8/4K3 w - - 0 1");

    let mut gen = OrderedMoves::new(Options::default(), Move::NULL, Move::NULL, None, None);
    let yielded = drain(&mut gen, &pos, None);

    let losing_idx = yielded
        .iter()
        .position(|m| m.to_string() == "d4d6")
        .expect("losing capture eventually yielded");
    assert_eq!(
        losing_idx,
        yielded.len() - 1,
        "losing capture not ordered last"
    );
}

#[test]
fn test_promotion_ordering() {
    let pos = fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");

    let mut gen = OrderedMoves::new(Options::default(), Move::NULL, Move::NULL, None, None);
    let yielded = drain(&mut gen, &pos, None);

    let promos: Vec<Move> = yielded
        .iter()
        .copied()
        .filter(|m| m.kind() == MoveKind::Promotion)
        .collect();
    assert_eq!(promos.len(), 4);

    // Queen promo is noisy and leads; among the quiet underpromotions the
    // knight comes first, rook and bishop trail
    assert_eq!(promos[0].to_string(), "a7a8q");
    assert_eq!(promos[1].to_string(), "a7a8n");
    assert_eq!(promos[2].to_string(), "a7a8r");
    assert_eq!(promos[3].to_string(), "a7a8b");
}

#[test]
fn test_history_reorders_quiets() {
    let pos = Position::starting();
    let mut history = HistoryTable::new();

    // Teach the table to love g2g3
    let mut probe = pos.clone();
    let g3 = probe.move_from_uci("g2g3").unwrap();
    let hm = HistoryMove::from_move(&probe, g3).unwrap();
    for _ in 0..10 {
        history.update_quiet(hm, None, None, 1000);
    }

    let mut gen = OrderedMoves::new(Options::default(), Move::NULL, Move::NULL, None, None);
    let yielded = drain(&mut gen, &pos, Some(&history));

    assert_eq!(yielded[0], g3, "history-boosted quiet not first");
}
