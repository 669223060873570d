use super::*;
use crate::notation::{parse_move, parse_square};

fn sq(txt: &str) -> Square {
    parse_square(txt).unwrap()
}

fn mv(txt: &str) -> Move {
    parse_move(txt).unwrap()
}

/// Builds a position from (square, FEN letter) pairs.
fn setup(pieces: &[(&str, char)]) -> Position {
    let mut pos = Position::empty();
    for &(s, ch) in pieces {
        pos.put(sq(s), Piece::from_letter(ch).unwrap()).unwrap();
    }
    pos
}

fn targets_from(moves: &[Move], from: &str) -> Vec<String> {
    let mut out: Vec<String> = moves
        .iter()
        .filter(|m| m.from == sq(from))
        .map(|m| m.to.to_string())
        .collect();
    out.sort();
    out
}

#[test]
fn test_startpos_move_count() {
    let pos = Position::startpos();
    let moves = pos.generate_moves(Side::Red);
    assert_eq!(moves.len(), 44);
    for m in &moves {
        let own = pos.piece_at(m.to).is_some_and(|p| p.side == Side::Red);
        assert!(!own, "{m} lands on a red piece");
    }
    assert_eq!(legal_moves(&pos, Side::Red).len(), 44);
    assert_eq!(legal_moves(&pos, Side::Black).len(), 44);
}

#[test]
fn test_startpos_attacks() {
    // Only the cannons can capture: each takes the horse behind the far screen.
    let pos = Position::startpos();
    let mut attacks: Vec<String> = pos
        .generate_attacks(Side::Red)
        .iter()
        .map(|m| m.to_string())
        .collect();
    attacks.sort();
    assert_eq!(attacks, vec!["b2b9", "h2h9"]);
}

#[test]
fn test_flying_general() {
    let pos = setup(&[("e0", 'K'), ("e9", 'k')]);
    assert!(pos.generate_attacks(Side::Red).contains(&mv("e0e9")));
    assert!(pos.is_checked(Side::Red));
    assert!(pos.is_checked(Side::Black));

    // e0e1 keeps the file open and is illegal.
    let mut legal: Vec<String> = legal_moves(&pos, Side::Red)
        .iter()
        .map(|m| m.to_string())
        .collect();
    legal.sort();
    assert_eq!(legal, vec!["e0d0", "e0e9", "e0f0"]);
}

#[test]
fn test_flying_general_blocked_and_offset() {
    let blocked = setup(&[("e0", 'K'), ("e4", 'P'), ("e9", 'k')]);
    assert!(!blocked.is_checked(Side::Black));
    assert!(!blocked.generate_attacks(Side::Red).contains(&mv("e0e9")));

    let offset = setup(&[("d0", 'K'), ("e9", 'k')]);
    assert!(!offset.is_checked(Side::Red));
    assert!(!offset.is_checked(Side::Black));
}

#[test]
fn test_missing_general_counts_as_checked() {
    let pos = setup(&[("e0", 'K')]);
    assert!(pos.is_checked(Side::Black));
    assert!(!pos.is_checked(Side::Red));
}

#[test]
fn test_cannon_needs_exactly_one_screen() {
    let pos = setup(&[("d0", 'K'), ("e1", 'C'), ("e5", 'p'), ("e9", 'k')]);
    let moves = pos.generate_moves(Side::Red);
    let targets = targets_from(&moves, "e1");
    // Quiet moves stop before the screen; the only capture jumps it.
    assert!(targets.contains(&"e4".to_string()));
    assert!(!targets.contains(&"e5".to_string()));
    assert!(!targets.contains(&"e6".to_string()));
    assert!(targets.contains(&"e9".to_string()));

    assert_eq!(pos.generate_attacks(Side::Red), vec![mv("e1e9")]);
    assert!(pos.is_checked(Side::Black));
}

#[test]
fn test_cannon_two_screens_no_capture() {
    // e5 screens e7; the General on e9 sits behind two screens.
    let pos = setup(&[("d0", 'K'), ("e1", 'C'), ("e5", 'p'), ("e7", 'p'), ("e9", 'k')]);
    let attacks = pos.generate_attacks(Side::Red);
    assert!(attacks.contains(&mv("e1e7")));
    assert!(!attacks.contains(&mv("e1e9")));
    assert_eq!(targets_from(&attacks, "e1"), vec!["e7"]);
    assert!(!pos.generate_moves(Side::Red).contains(&mv("e1e9")));
    assert!(!pos.is_checked(Side::Black));
}

#[test]
fn test_horse_leg() {
    let free = setup(&[("e0", 'K'), ("e4", 'N'), ("e9", 'k')]);
    assert_eq!(targets_from(&free.generate_moves(Side::Red), "e4").len(), 8);

    // A piece on e5 blocks both forward jumps.
    let blocked = setup(&[("e0", 'K'), ("e4", 'N'), ("e5", 'p'), ("e9", 'k')]);
    let targets = targets_from(&blocked.generate_moves(Side::Red), "e4");
    assert_eq!(targets.len(), 6);
    assert!(!targets.contains(&"d6".to_string()));
    assert!(!targets.contains(&"f6".to_string()));
}

#[test]
fn test_elephant_eye_and_river() {
    let pos = setup(&[("e0", 'K'), ("c4", 'B'), ("d3", 'P'), ("e9", 'k')]);
    // a6/e6 cross the river, e2 is blocked by the eye on d3.
    assert_eq!(targets_from(&pos.generate_moves(Side::Red), "c4"), vec!["a2"]);
}

#[test]
fn test_advisor_and_general_stay_in_palace() {
    let pos = setup(&[("d0", 'A'), ("f2", 'K'), ("e9", 'k')]);
    assert_eq!(targets_from(&pos.generate_moves(Side::Red), "d0"), vec!["e1"]);
    assert_eq!(
        targets_from(&pos.generate_moves(Side::Red), "f2"),
        vec!["e2", "f1"]
    );
}

#[test]
fn test_soldier_moves_sideways_after_river() {
    let pos = setup(&[("e0", 'K'), ("a3", 'P'), ("c5", 'P'), ("e9", 'k'), ("g6", 'p')]);
    let moves = pos.generate_moves(Side::Red);
    assert_eq!(targets_from(&moves, "a3"), vec!["a4"]);
    assert_eq!(targets_from(&moves, "c5"), vec!["b5", "c6", "d5"]);

    // Black soldier on its own half only walks toward row 0.
    let black = pos.generate_moves(Side::Black);
    assert_eq!(targets_from(&black, "g6"), vec!["g5"]);
}

#[test]
fn test_chariot_stops_at_blockers() {
    let pos = setup(&[("d0", 'K'), ("a0", 'R'), ("a3", 'P'), ("c0", 'n'), ("e9", 'k')]);
    let targets = targets_from(&pos.generate_moves(Side::Red), "a0");
    assert_eq!(targets, vec!["a1", "a2", "b0", "c0"]);
}

#[test]
fn test_self_check_moves_are_not_legal() {
    // The e1 chariot is pinned against the e9 chariot.
    let pos = setup(&[("e0", 'K'), ("e1", 'R'), ("e8", 'r'), ("d9", 'k')]);
    let legal = legal_moves(&pos, Side::Red);
    assert!(legal.iter().filter(|m| m.from == sq("e1")).all(|m| m.to.col == 4));
    assert!(legal.contains(&mv("e1e8")));
}
