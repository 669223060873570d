pub mod board;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod notation;
pub mod perft;
pub mod time_control;
pub mod types;
pub mod zobrist;

// Re-export core game logic (not engine-specific)
pub use board::*;
pub use error::{NotationError, PositionError};
pub use eval::{piece_value, signed_value};
pub use movegen::*;
pub use notation::*;
pub use perft::{divide, perft};
pub use time_control::*;
pub use types::*;
pub use zobrist::ZOBRIST;

/// Score of a won position at ply 0; a General captured at ply `p` scores
/// `MATE - p` for the capturing side.
pub const MATE: i32 = 10_000;
/// Larger than any reachable score; the open search window is `[-INF, INF]`.
pub const INF: i32 = 30_000;
/// Deepest ply the search may reach, quiescence included.
pub const MAX_PLY: usize = 64;

/// True for scores that encode a forced General capture.
#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE - MAX_PLY as i32
}

// =============================================================================
// Engine trait: implemented by every search engine
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move of the deepest completed iteration
    pub best_move: Option<Move>,
    /// Score from the searching side's perspective
    pub score: i32,
    /// Deepest completed iteration (0 if none completed)
    pub depth: u8,
    /// Number of nodes searched
    pub nodes: u64,
    /// Whether an iteration was abandoned because of the time limit or a stop request
    pub stopped: bool,
}

/// What the caller should do with a [`SearchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Move(Move),
    /// Checkmate or stalemate: the side to move has lost.
    NoLegalMoves,
    /// Stopped before the first iteration finished.
    Aborted,
}

impl SearchResult {
    pub fn verdict(&self) -> Verdict {
        match (self.best_move, self.depth) {
            (Some(mv), _) => Verdict::Move(mv),
            (None, 0) => Verdict::Aborted,
            (None, _) => Verdict::NoLegalMoves,
        }
    }
}

/// Trait that all engines must implement.
pub trait Engine: Send {
    /// Search `pos` for `side` within `limits`.
    ///
    /// The position is explored by make/unmake and is handed back unchanged.
    fn search(&mut self, pos: &mut Position, side: Side, limits: SearchLimits) -> SearchResult;

    /// Quiescence score of `pos` for `side`, without deepening.
    fn evaluate(&mut self, pos: &mut Position, side: Side) -> i32;

    fn name(&self) -> &str;

    fn author(&self) -> &str {
        "xiangqi"
    }

    /// Reset internal state for a new game (clear hash tables, history, etc.)
    fn new_game(&mut self) {}

    /// Set a named option. Returns true if the option was recognized.
    fn set_option(&mut self, _name: &str, _value: &str) -> bool {
        false
    }
}
