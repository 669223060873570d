use std::fmt;

use crate::error::PositionError;
use crate::eval::signed_value;
use crate::types::*;
use crate::zobrist::ZOBRIST;

/// Slots per side in the piece-location table.
pub const SLOTS_PER_SIDE: usize = 16;
pub const NUM_SLOTS: usize = 2 * SLOTS_PER_SIDE;

/// First slot of each kind within a side's 16 slots, indexed by `PieceKind::idx()`.
const SLOT_BASE: [usize; 7] = [0, 1, 3, 5, 7, 9, 11];

/// A piece standing on the board together with its stable slot in the
/// piece-location table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Occupant {
    pub piece: Piece,
    pub slot: u8,
}

/// One entry of the undo stack. `mv == None` records a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Undo {
    pub mv: Option<Move>,
    pub captured: Option<Occupant>,
    /// Placement hash before the move.
    pub hash: u64,
}

/// How a position that already occurred earlier in the game is scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repetition {
    /// Neither side, or both sides, checked on every move of the cycle.
    Draw,
    /// This side gave check with every one of its moves in the cycle and loses.
    PerpetualCheck(Side),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    grid: [Option<Occupant>; NUM_SQUARES],
    locations: [Option<Square>; NUM_SLOTS],
    hash: u64,
    /// Material from Red's point of view, maintained incrementally.
    pub(crate) material: i32,
    history: Vec<Undo>,
}

impl Default for Position {
    fn default() -> Self {
        Self::empty()
    }
}

impl Position {
    pub fn empty() -> Self {
        Position {
            grid: [None; NUM_SQUARES],
            locations: [None; NUM_SLOTS],
            hash: 0,
            material: 0,
            history: Vec::with_capacity(256),
        }
    }

    pub fn startpos() -> Self {
        let mut p = Position::empty();
        let back = [
            PieceKind::Chariot,
            PieceKind::Horse,
            PieceKind::Elephant,
            PieceKind::Advisor,
            PieceKind::General,
            PieceKind::Advisor,
            PieceKind::Elephant,
            PieceKind::Horse,
            PieceKind::Chariot,
        ];
        for side in Side::ALL {
            let (home, cannon_row, soldier_row) = match side {
                Side::Red => (0, 2, 3),
                Side::Black => (9, 7, 6),
            };
            for (col, &kind) in back.iter().enumerate() {
                p.place(Square::new(home, col as u8), Piece::new(side, kind));
            }
            for col in [1, 7] {
                p.place(
                    Square::new(cannon_row, col),
                    Piece::new(side, PieceKind::Cannon),
                );
            }
            for col in [0, 2, 4, 6, 8] {
                p.place(
                    Square::new(soldier_row, col),
                    Piece::new(side, PieceKind::Soldier),
                );
            }
        }
        p
    }

    // Only called with the fixed opening array, which always fits.
    fn place(&mut self, sq: Square, piece: Piece) {
        if let Err(err) = self.put(sq, piece) {
            unreachable!("start position rejected: {err}");
        }
    }

    /// Puts a piece on an empty square, assigning it the next free slot of
    /// its kind. Used while setting up positions, never during search.
    pub fn put(&mut self, sq: Square, piece: Piece) -> Result<(), PositionError> {
        if self.grid[sq.index()].is_some() {
            return Err(PositionError::SquareOccupied(sq));
        }
        let base = piece.side.idx() * SLOTS_PER_SIDE + SLOT_BASE[piece.kind.idx()];
        let slot = (base..base + piece.kind.max_count())
            .find(|&s| self.locations[s].is_none())
            .ok_or(PositionError::TooManyPieces(piece))?;

        self.grid[sq.index()] = Some(Occupant {
            piece,
            slot: slot as u8,
        });
        self.locations[slot] = Some(sq);
        self.hash ^= ZOBRIST.piece_key(piece, sq);
        self.material += signed_value(piece, sq);
        Ok(())
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.index()].map(|o| o.piece)
    }

    #[inline]
    pub fn occupant_at(&self, sq: Square) -> Option<Occupant> {
        self.grid[sq.index()]
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.grid[sq.index()].is_none()
    }

    /// Square of `side`'s General, read straight from the location table.
    #[inline]
    pub fn general_square(&self, side: Side) -> Option<Square> {
        self.locations[side.idx() * SLOTS_PER_SIDE]
    }

    /// All pieces of one side in slot order.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        let base = side.idx() * SLOTS_PER_SIDE;
        self.locations[base..base + SLOTS_PER_SIDE]
            .iter()
            .filter_map(move |loc| {
                let sq = (*loc)?;
                Some((sq, self.grid[sq.index()]?.piece))
            })
    }

    /// Hash of the piece placement alone.
    #[inline]
    pub fn current_hash(&self) -> u64 {
        self.hash
    }

    /// Hash of the placement folded with the side to move; the transposition key.
    #[inline]
    pub fn current_hash_for(&self, side: Side) -> u64 {
        self.hash ^ ZOBRIST.side_key(side)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The move on top of the undo stack; `None` if it is a pass or the
    /// history is empty.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().and_then(|u| u.mv)
    }

    pub fn last_undo(&self) -> Option<&Undo> {
        self.history.last()
    }

    /// Applies a move and pushes its undo record. Returns true iff the move
    /// captured the enemy General.
    ///
    /// # Panics
    /// Panics if the source square is empty.
    pub fn make_move(&mut self, mv: Move) -> bool {
        let mover = self.grid[mv.from.index()].expect("make_move: no piece on source square");
        let captured = self.grid[mv.to.index()];
        let prior_hash = self.hash;

        if let Some(victim) = captured {
            self.locations[victim.slot as usize] = None;
            self.hash ^= ZOBRIST.piece_key(victim.piece, mv.to);
            self.material -= signed_value(victim.piece, mv.to);
        }

        self.grid[mv.from.index()] = None;
        self.grid[mv.to.index()] = Some(mover);
        self.locations[mover.slot as usize] = Some(mv.to);
        self.hash ^= ZOBRIST.piece_key(mover.piece, mv.from) ^ ZOBRIST.piece_key(mover.piece, mv.to);
        self.material +=
            signed_value(mover.piece, mv.to) - signed_value(mover.piece, mv.from);

        self.history.push(Undo {
            mv: Some(mv),
            captured,
            hash: prior_hash,
        });
        captured.is_some_and(|c| c.piece.kind == PieceKind::General)
    }

    /// Records a pass. The board and hash are untouched; callers fold the
    /// side to move into the key themselves.
    pub fn make_null_move(&mut self) {
        self.history.push(Undo {
            mv: None,
            captured: None,
            hash: self.hash,
        });
    }

    /// Reverts the most recent `make_move` or `make_null_move` exactly.
    ///
    /// # Panics
    /// Panics if the history is empty; callers must pair every make with
    /// one unmake.
    pub fn unmake_move(&mut self) {
        let undo = self
            .history
            .pop()
            .expect("unmake_move called with empty history");
        let Some(mv) = undo.mv else {
            return;
        };

        let mover = self.grid[mv.to.index()].expect("unmake_move: destination square is empty");
        self.grid[mv.to.index()] = undo.captured;
        self.grid[mv.from.index()] = Some(mover);
        self.locations[mover.slot as usize] = Some(mv.from);
        self.hash ^= ZOBRIST.piece_key(mover.piece, mv.to) ^ ZOBRIST.piece_key(mover.piece, mv.from);
        self.material +=
            signed_value(mover.piece, mv.from) - signed_value(mover.piece, mv.to);

        if let Some(victim) = undo.captured {
            self.locations[victim.slot as usize] = Some(mv.to);
            self.hash ^= ZOBRIST.piece_key(victim.piece, mv.to);
            self.material += signed_value(victim.piece, mv.to);
        }
    }

    /// Checks whether the current position, with the same side to move,
    /// already occurred since the last capture or pass. On a hit the cycle
    /// is replayed to see who gave check on every move; the position is
    /// left exactly as it was.
    pub fn repetition(&mut self) -> Option<Repetition> {
        let len = self.history.len();
        let mut start = None;
        for j in (0..len).rev() {
            let undo = &self.history[j];
            if undo.mv.is_none() || undo.captured.is_some() {
                break;
            }
            if (len - j) % 2 == 0 && undo.hash == self.hash {
                start = Some(j);
                break;
            }
        }
        let start = start?;

        let cycle: Vec<Move> = self.history[start..].iter().filter_map(|u| u.mv).collect();
        for _ in &cycle {
            self.unmake_move();
        }
        // Index 0 is Red's record, 1 Black's.
        let mut always_checked = [true; 2];
        for &mv in &cycle {
            let mover = self.grid[mv.from.index()].map(|o| o.piece.side);
            self.make_move(mv);
            if let Some(mover) = mover
                && !self.is_checked(mover.other())
            {
                always_checked[mover.idx()] = false;
            }
        }

        Some(match always_checked {
            [true, false] => Repetition::PerpetualCheck(Side::Red),
            [false, true] => Repetition::PerpetualCheck(Side::Black),
            _ => Repetition::Draw,
        })
    }

    /// True iff `side`'s General can be captured by the opponent, including
    /// across an open file by the other General. A side without a General
    /// counts as checked.
    pub fn is_checked(&self, side: Side) -> bool {
        let Some(general) = self.general_square(side) else {
            return true;
        };
        self.generate_attacks(side.other())
            .iter()
            .any(|mv| mv.to == general)
    }

    /// Recomputes hash, material and the grid/location agreement from
    /// scratch and compares them with the incremental state.
    pub fn is_consistent(&self) -> bool {
        let mut hash = 0u64;
        let mut material = 0i32;
        for idx in 0..NUM_SQUARES {
            if let Some(occ) = self.grid[idx] {
                let sq = Square::from_index(idx);
                if self.locations[occ.slot as usize] != Some(sq) {
                    return false;
                }
                hash ^= ZOBRIST.piece_key(occ.piece, sq);
                material += signed_value(occ.piece, sq);
            }
        }
        let located = self.locations.iter().enumerate().all(|(slot, loc)| match loc {
            Some(sq) => self.grid[sq.index()].is_some_and(|o| o.slot as usize == slot),
            None => true,
        });
        located && hash == self.hash && material == self.material
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS as u8).rev() {
            write!(f, "{row} ")?;
            for col in 0..COLS as u8 {
                let ch = self
                    .piece_at(Square::new(row, col))
                    .map_or('.', Piece::letter);
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
            if row == 5 {
                writeln!(f, "   -----------------")?;
            }
        }
        write!(f, "   a b c d e f g h i")
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
