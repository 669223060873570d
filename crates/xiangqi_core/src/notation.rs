//! Coordinate move text (`b2e2`) and Xiangqi FEN.
//!
//! FEN ranks run from row 9 (Black's back rank) down to row 0. Both the
//! `b`/`n` and the `e`/`h` letters are accepted for elephants and horses;
//! output always uses `b`/`n`.

use crate::{
    board::Position,
    error::{NotationError, PositionError},
    types::*,
};

pub const START_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w";

pub fn parse_square(txt: &str) -> Result<Square, NotationError> {
    let bytes = txt.as_bytes();
    if bytes.len() != 2 {
        return Err(NotationError::InvalidSquare(txt.to_string()));
    }
    let col = bytes[0].wrapping_sub(b'a') as i8;
    let row = bytes[1].wrapping_sub(b'0') as i8;
    Square::try_new(row, col).ok_or_else(|| NotationError::InvalidSquare(txt.to_string()))
}

/// Parses `b2e2`. Legality is left to the caller.
pub fn parse_move(txt: &str) -> Result<Move, NotationError> {
    let txt = txt.trim();
    if txt.len() != 4 || !txt.is_ascii() {
        return Err(NotationError::InvalidMove(txt.to_string()));
    }
    let from = parse_square(&txt[0..2]).map_err(|_| NotationError::InvalidMove(txt.to_string()))?;
    let to = parse_square(&txt[2..4]).map_err(|_| NotationError::InvalidMove(txt.to_string()))?;
    if from == to {
        return Err(NotationError::InvalidMove(txt.to_string()));
    }
    Ok(Move::new(from, to))
}

/// Parses a FEN string into a position and the side to move (Red when the
/// side field is absent).
pub fn parse_fen(fen: &str) -> Result<(Position, Side), PositionError> {
    let mut fields = fen.split_whitespace();
    let placement = fields.next().ok_or(PositionError::Empty)?;

    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != ROWS {
        return Err(PositionError::RankCount(ranks.len()));
    }

    let mut pos = Position::empty();
    for (i, rank) in ranks.iter().enumerate() {
        let row = (ROWS - 1 - i) as u8;
        let mut col = 0usize;
        for ch in rank.chars() {
            if let Some(skip) = ch.to_digit(10) {
                col += skip as usize;
                continue;
            }
            let piece = Piece::from_letter(ch).ok_or(PositionError::InvalidPiece(ch))?;
            if col >= COLS {
                return Err(PositionError::RankWidth {
                    rank: row as usize,
                    width: col + 1,
                });
            }
            pos.put(Square::new(row, col as u8), piece)?;
            col += 1;
        }
        if col != COLS {
            return Err(PositionError::RankWidth {
                rank: row as usize,
                width: col,
            });
        }
    }

    for side in Side::ALL {
        let general = pos
            .general_square(side)
            .ok_or(PositionError::MissingGeneral(side))?;
        if !general.in_palace(side) {
            return Err(PositionError::GeneralOutsidePalace(side));
        }
    }

    let side = match fields.next() {
        None | Some("w") | Some("r") => Side::Red,
        Some("b") => Side::Black,
        Some(other) => return Err(PositionError::InvalidSide(other.to_string())),
    };
    Ok((pos, side))
}

impl Position {
    /// Placement only; the side field of `fen` is validated and dropped.
    pub fn from_fen(fen: &str) -> Result<Position, PositionError> {
        parse_fen(fen).map(|(pos, _)| pos)
    }

    pub fn to_fen(&self, side: Side) -> String {
        let mut fen = String::with_capacity(96);
        for row in (0..ROWS as u8).rev() {
            let mut empty = 0;
            for col in 0..COLS as u8 {
                match self.piece_at(Square::new(row, col)) {
                    Some(p) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(p.letter());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if row > 0 {
                fen.push('/');
            }
        }
        fen.push_str(match side {
            Side::Red => " w",
            Side::Black => " b",
        });
        fen
    }
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;
