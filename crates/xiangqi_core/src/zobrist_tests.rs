use super::*;
use crate::types::PieceKind;

#[test]
fn test_zobrist_keys_unique() {
    let mut seen = std::collections::HashSet::new();
    for key in ZOBRIST.all_keys() {
        assert!(seen.insert(key), "Duplicate Zobrist key found");
    }
    assert_eq!(seen.len(), 2 * 7 * NUM_SQUARES + 1);
}

#[test]
fn test_zobrist_seed_is_reproducible() {
    let a = ZobristKeys::with_seed(7);
    let b = ZobristKeys::with_seed(7);
    let sq = Square::new(3, 4);
    let piece = Piece::new(Side::Black, PieceKind::Cannon);
    assert_eq!(a.piece_key(piece, sq), b.piece_key(piece, sq));
    assert_eq!(a.side_key(Side::Black), b.side_key(Side::Black));
}

#[test]
fn test_zobrist_piece_key() {
    let red = ZOBRIST.piece_key(Piece::new(Side::Red, PieceKind::Soldier), Square::new(3, 0));
    let black = ZOBRIST.piece_key(Piece::new(Side::Black, PieceKind::Soldier), Square::new(3, 0));
    assert_ne!(red, black);
    let red_next = ZOBRIST.piece_key(Piece::new(Side::Red, PieceKind::Soldier), Square::new(4, 0));
    assert_ne!(red, red_next);
    assert_eq!(ZOBRIST.side_key(Side::Red), 0);
    assert_ne!(ZOBRIST.side_key(Side::Black), 0);
}
