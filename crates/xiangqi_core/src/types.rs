use std::fmt;

pub const ROWS: usize = 10;
pub const COLS: usize = 9;
pub const NUM_SQUARES: usize = ROWS * COLS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Red,
    Black,
}
impl Side {
    pub const ALL: [Side; 2] = [Side::Red, Side::Black];

    pub fn other(self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }
    pub fn idx(self) -> usize {
        match self {
            Side::Red => 0,
            Side::Black => 1,
        }
    }
    pub fn from_idx(idx: usize) -> Option<Side> {
        match idx {
            0 => Some(Side::Red),
            1 => Some(Side::Black),
            _ => None,
        }
    }
    /// Row direction of a soldier advancing.
    pub fn forward(self) -> i8 {
        match self {
            Side::Red => 1,
            Side::Black => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => f.write_str("red"),
            Side::Black => f.write_str("black"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    General,
    Advisor,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::General,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Horse,
        PieceKind::Chariot,
        PieceKind::Cannon,
        PieceKind::Soldier,
    ];

    pub fn idx(self) -> usize {
        self as usize
    }

    /// How many pieces of this kind one side starts with (and may ever own).
    pub fn max_count(self) -> usize {
        match self {
            PieceKind::General => 1,
            PieceKind::Soldier => 5,
            _ => 2,
        }
    }

    /// Lowercase FEN letter.
    pub fn letter(self) -> char {
        match self {
            PieceKind::General => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Horse => 'n',
            PieceKind::Chariot => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        }
    }

    /// Accepts both the `b`/`n` and the `e`/`h` spellings.
    pub fn from_letter(ch: char) -> Option<PieceKind> {
        match ch.to_ascii_lowercase() {
            'k' => Some(PieceKind::General),
            'a' => Some(PieceKind::Advisor),
            'b' | 'e' => Some(PieceKind::Elephant),
            'n' | 'h' => Some(PieceKind::Horse),
            'r' => Some(PieceKind::Chariot),
            'c' => Some(PieceKind::Cannon),
            'p' => Some(PieceKind::Soldier),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }

    /// Uppercase for Red, lowercase for Black.
    pub fn letter(self) -> char {
        let ch = self.kind.letter();
        match self.side {
            Side::Red => ch.to_ascii_uppercase(),
            Side::Black => ch,
        }
    }

    pub fn from_letter(ch: char) -> Option<Piece> {
        let kind = PieceKind::from_letter(ch)?;
        let side = if ch.is_ascii_uppercase() {
            Side::Red
        } else {
            Side::Black
        };
        Some(Piece { side, kind })
    }
}

/// A board square. Row 0 is Red's back rank, row 9 is Black's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!((row as usize) < ROWS && (col as usize) < COLS);
        Self { row, col }
    }

    pub fn try_new(row: i8, col: i8) -> Option<Square> {
        if (0..ROWS as i8).contains(&row) && (0..COLS as i8).contains(&col) {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    pub fn from_index(idx: usize) -> Square {
        Square::new((idx / COLS) as u8, (idx % COLS) as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.row as usize * COLS + self.col as usize
    }

    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Square> {
        Square::try_new(self.row as i8 + dr, self.col as i8 + dc)
    }

    pub fn in_palace(self, side: Side) -> bool {
        let rows = match side {
            Side::Red => 0..=2,
            Side::Black => 7..=9,
        };
        rows.contains(&self.row) && (3..=5).contains(&self.col)
    }

    /// True while the square is on `side`'s half of the river.
    pub fn on_own_half(self, side: Side) -> bool {
        match side {
            Side::Red => self.row <= 4,
            Side::Black => self.row >= 5,
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row)
    }
}

/// A board move. The pass used by null-move pruning is not a `Move`; it
/// only exists as the packed value `0` and as a history entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const NULL_PACKED: u16 = 0;

    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Packs as four 4-bit fields: src row, src col, dst row, dst col.
    pub fn pack(self) -> u16 {
        (self.from.row as u16) << 12
            | (self.from.col as u16) << 8
            | (self.to.row as u16) << 4
            | self.to.col as u16
    }

    /// Inverse of [`Move::pack`]; `None` for the null move or a field out of range.
    pub fn unpack(packed: u16) -> Option<Move> {
        if packed == Self::NULL_PACKED {
            return None;
        }
        let field = |shift: u16| ((packed >> shift) & 0xf) as i8;
        let from = Square::try_new(field(12), field(8))?;
        let to = Square::try_new(field(4), field(0))?;
        Some(Move { from, to })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
