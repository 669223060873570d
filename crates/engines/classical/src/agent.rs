//! A game in progress: position, side to move and an engine to search it.

use std::time::Duration;

use xiangqi_core::{
    Engine, Move, Position, PositionError, Repetition, SearchLimits, SearchResult, Side,
    legal_moves, parse_fen,
};

use crate::ClassicalEngine;

#[derive(Debug)]
pub struct Agent {
    pos: Position,
    side: Side,
    engine: ClassicalEngine,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(ClassicalEngine::default())
    }
}

impl Agent {
    /// Starts from the opening position with Red to move.
    pub fn new(engine: ClassicalEngine) -> Self {
        Self {
            pos: Position::startpos(),
            side: Side::Red,
            engine,
        }
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    pub fn side_to_move(&self) -> Side {
        self.side
    }

    pub fn engine(&self) -> &ClassicalEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ClassicalEngine {
        &mut self.engine
    }

    pub fn fen(&self) -> String {
        self.pos.to_fen(self.side)
    }

    /// Replaces the game with `fen`. The engine keeps its table.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), PositionError> {
        let (pos, side) = parse_fen(fen)?;
        self.pos = pos;
        self.side = side;
        Ok(())
    }

    /// Back to the opening position with a fresh engine state.
    pub fn new_game(&mut self) {
        self.pos = Position::startpos();
        self.side = Side::Red;
        self.engine.new_game();
    }

    /// Plays `mv` for the side to move. Returns false, leaving the game
    /// untouched, if the move is not legal.
    pub fn play(&mut self, mv: Move) -> bool {
        if !legal_moves(&self.pos, self.side).contains(&mv) {
            return false;
        }
        self.pos.make_move(mv);
        self.side = self.side.other();
        true
    }

    /// Takes back the last move. Returns false when there is nothing to undo.
    pub fn unmove(&mut self) -> bool {
        if self.pos.history_len() == 0 {
            return false;
        }
        self.pos.unmake_move();
        self.side = self.side.other();
        true
    }

    /// Whether the last move repeated an earlier position of this game.
    pub fn repetition(&mut self) -> Option<Repetition> {
        self.pos.repetition()
    }

    /// Searches for the side to move without playing the result.
    pub fn search(&mut self, min_depth: u8, max_depth: u8, time_budget_secs: f64) -> SearchResult {
        let budget = Duration::try_from_secs_f64(time_budget_secs).unwrap_or(Duration::ZERO);
        self.search_with(SearchLimits::depth_and_time(min_depth, max_depth, budget))
    }

    /// Searches with the engine's configured depths and time budget.
    pub fn search_default(&mut self) -> SearchResult {
        let limits = self.engine.config().limits();
        self.search_with(limits)
    }

    pub fn search_with(&mut self, limits: SearchLimits) -> SearchResult {
        self.engine.search(&mut self.pos, self.side, limits)
    }

    /// Quiescence score for the side to move.
    pub fn evaluate(&mut self) -> i32 {
        self.engine.evaluate(&mut self.pos, self.side)
    }

    /// Legal moves for the side to move.
    pub fn moves(&self) -> Vec<Move> {
        self.moves_for(self.side)
    }

    pub fn moves_for(&self, side: Side) -> Vec<Move> {
        legal_moves(&self.pos, side)
    }

    /// Pseudo-legal captures for the side to move.
    pub fn attacks(&self) -> Vec<Move> {
        self.attacks_for(self.side)
    }

    pub fn attacks_for(&self, side: Side) -> Vec<Move> {
        self.pos.generate_attacks(side)
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod agent_tests;
