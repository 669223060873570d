//! Property checks for the position model:
//! - make/unmake is an exact inverse along random games
//! - static evaluation is zero-sum
//! - hashing is deterministic and sensitive to every move

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use xiangqi_core::{Position, Side, legal_moves, parse_fen, parse_move};

fn random_walk(seed: u64, plies: usize) -> (Position, Side) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos = Position::startpos();
    let mut side = Side::Red;
    for _ in 0..plies {
        let moves = legal_moves(&pos, side);
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        pos.make_move(mv);
        side = side.other();
    }
    (pos, side)
}

#[test]
fn test_make_unmake_inverse_along_random_games() {
    for seed in 0..20 {
        let (mut pos, side) = random_walk(seed, 40);
        let snapshot = pos.clone();
        for mv in legal_moves(&pos, side) {
            pos.make_move(mv);
            assert!(pos.is_consistent(), "seed {seed}: inconsistent after {mv}");
            pos.unmake_move();
            assert_eq!(pos, snapshot, "seed {seed}: {mv} not undone");
        }

        // Unwind the whole game back to the opening.
        while pos.history_len() > 0 {
            pos.unmake_move();
            assert!(pos.is_consistent());
        }
        assert_eq!(pos, Position::startpos());
    }
}

#[test]
fn test_static_value_is_zero_sum() {
    for seed in 100..130 {
        let (pos, _) = random_walk(seed, 60);
        assert_eq!(pos.static_value(Side::Red), -pos.static_value(Side::Black));
    }
}

#[test]
fn test_hash_is_deterministic() {
    let (a, side_a) = random_walk(7, 30);
    let (b, side_b) = random_walk(7, 30);
    assert_eq!(side_a, side_b);
    assert_eq!(a.current_hash_for(side_a), b.current_hash_for(side_b));

    // Rebuilding from FEN gives the same hash.
    let (c, side_c) = parse_fen(&a.to_fen(side_a)).unwrap();
    assert_eq!(c.current_hash_for(side_c), a.current_hash_for(side_a));
}

#[test]
fn test_every_legal_move_changes_hash() {
    for seed in 200..210 {
        let (mut pos, side) = random_walk(seed, 25);
        let hash = pos.current_hash();
        for mv in legal_moves(&pos, side) {
            pos.make_move(mv);
            assert_ne!(pos.current_hash(), hash);
            pos.unmake_move();
        }
    }
}

#[test]
fn test_checkmate_has_no_legal_moves() {
    // Two chariots cover the back rank and the rank below it.
    let (pos, side) = parse_fen("R2k5/1R7/9/9/9/9/9/9/9/4K4 b").unwrap();
    assert!(pos.is_checked(side));
    assert!(legal_moves(&pos, side).is_empty());
}

#[test]
fn test_illegal_text_moves_are_not_generated() {
    let pos = Position::startpos();
    let legal = legal_moves(&pos, Side::Red);
    assert!(legal.contains(&parse_move("h2e2").unwrap()));
    assert!(!legal.contains(&parse_move("e0e2").unwrap()));
    assert!(!legal.contains(&parse_move("a0a3").unwrap()));
}
