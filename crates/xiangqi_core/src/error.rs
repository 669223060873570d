//! Error types for position setup and move notation.

use crate::types::{Piece, Side, Square};

/// Reasons a FEN string or a piece placement is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("empty FEN string")]
    Empty,

    #[error("invalid piece letter '{0}'")]
    InvalidPiece(char),

    #[error("expected 10 ranks, found {0}")]
    RankCount(usize),

    #[error("rank {rank} has {width} files, expected 9")]
    RankWidth { rank: usize, width: usize },

    #[error("{0} has no general")]
    MissingGeneral(Side),

    #[error("{0} general is outside its palace")]
    GeneralOutsidePalace(Side),

    #[error("too many pieces of kind {0:?}")]
    TooManyPieces(Piece),

    #[error("square {0} is already occupied")]
    SquareOccupied(Square),

    #[error("invalid side to move '{0}'")]
    InvalidSide(String),
}

/// Reasons a square or move in coordinate notation is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid square '{0}'")]
    InvalidSquare(String),

    #[error("invalid move '{0}'")]
    InvalidMove(String),
}
