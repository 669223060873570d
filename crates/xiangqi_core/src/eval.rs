use crate::{board::Position, types::*};

/// Material value of a piece standing on `sq`. Soldiers double once they
/// have crossed the river.
pub fn piece_value(piece: Piece, sq: Square) -> i32 {
    match piece.kind {
        PieceKind::General => 0,
        PieceKind::Advisor => 150,
        PieceKind::Elephant => 150,
        PieceKind::Horse => 400,
        PieceKind::Cannon => 400,
        PieceKind::Chariot => 900,
        PieceKind::Soldier => {
            if sq.on_own_half(piece.side) {
                100
            } else {
                200
            }
        }
    }
}

/// `piece_value` signed from Red's point of view.
#[inline]
pub fn signed_value(piece: Piece, sq: Square) -> i32 {
    match piece.side {
        Side::Red => piece_value(piece, sq),
        Side::Black => -piece_value(piece, sq),
    }
}

impl Position {
    /// Material balance from `side`'s perspective.
    /// `static_value(s) == -static_value(s.other())` always holds.
    #[inline]
    pub fn static_value(&self, side: Side) -> i32 {
        match side {
            Side::Red => self.material,
            Side::Black => -self.material,
        }
    }
}
