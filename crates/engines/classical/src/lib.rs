//! Classical Xiangqi Engine
//!
//! Iterative-deepening negamax with alpha-beta pruning, a transposition
//! table of score windows, quiescence search, null-move pruning and PVS.
//! Moves are ordered by killers and the history heuristic; positions are
//! scored by material.
//! Repeated positions score as draws, or as a loss for a side that checks
//! on every move of the cycle.

pub mod agent;
pub mod config;
pub mod ordering;
pub mod search;
pub mod tt;

use log::{debug, info, trace, warn};
use xiangqi_core::{Engine, Position, SearchLimits, SearchResult, Side, is_mate_score};

pub use agent::Agent;
pub use config::{ConfigError, EngineConfig, TableKind};
pub use search::{SearchOptions, SearchStats};
pub use tt::{BucketTable, MapTable, NoTable, TranspositionTable, TtEntry};

use ordering::{HistoryTable, KillerTable};
use search::Searcher;

/// Classical engine: all search state lives here and persists between
/// searches until `new_game`.
#[derive(Debug)]
pub struct ClassicalEngine {
    config: EngineConfig,
    options: SearchOptions,
    tt: Box<dyn TranspositionTable>,
    history: HistoryTable,
    killers: KillerTable,
    stats: SearchStats,
}

impl Default for ClassicalEngine {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl ClassicalEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            options: config.search_options(),
            tt: config.build_table(),
            history: HistoryTable::default(),
            killers: KillerTable::default(),
            stats: SearchStats::default(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn table(&self) -> &dyn TranspositionTable {
        self.tt.as_ref()
    }

    /// Statistics of the most recent search.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn searcher<'a>(
        &'a mut self,
        pos: &'a mut Position,
        limits: &'a SearchLimits,
        abortable: bool,
    ) -> Searcher<'a> {
        Searcher {
            pos,
            tt: self.tt.as_mut(),
            history: &mut self.history,
            killers: &mut self.killers,
            stats: &mut self.stats,
            tc: &limits.time_control,
            options: self.options,
            abortable,
        }
    }
}

impl Engine for ClassicalEngine {
    fn search(&mut self, pos: &mut Position, side: Side, mut limits: SearchLimits) -> SearchResult {
        limits.start();
        self.history.age();
        self.killers.clear();
        self.stats = SearchStats::default();

        let mut result = SearchResult {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
            stopped: false,
        };

        for depth in 1..=limits.max_depth {
            let abortable = depth > limits.min_depth;
            self.tt.checkpoint();
            let outcome = self
                .searcher(pos, &limits, abortable)
                .node(depth as i32, side, -xiangqi_core::INF, xiangqi_core::INF, 0, false);

            let Some(node) = outcome else {
                self.tt.rollback();
                result.stopped = true;
                trace!("depth {depth} aborted after {} nodes, table rolled back", self.stats.nodes);
                break;
            };
            self.tt.commit();

            result.best_move = node.best_move;
            result.score = node.score;
            result.depth = depth;
            debug!(
                "depth {depth} score {} move {} nodes {} tt_hits {} cutoffs {} null_cutoffs {}",
                node.score,
                node.best_move.map_or_else(|| "none".to_string(), |m| m.to_string()),
                self.stats.nodes,
                self.stats.tt_hits,
                self.stats.beta_cutoffs,
                self.stats.null_cutoffs,
            );

            if node.best_move.is_none() || is_mate_score(node.score) {
                break;
            }
        }

        result.nodes = self.stats.nodes;
        info!(
            "{side} searched to depth {} in {:.3?}: score {} nodes {} table {} best ranks {:?}",
            result.depth,
            limits.time_control.elapsed(),
            result.score,
            result.nodes,
            self.tt.len(),
            self.stats.best_rank,
        );
        result
    }

    fn evaluate(&mut self, pos: &mut Position, side: Side) -> i32 {
        let limits = SearchLimits::default();
        self.searcher(pos, &limits, false).evaluate(side)
    }

    fn name(&self) -> &str {
        "Classical Xiangqi v1.0"
    }

    fn new_game(&mut self) {
        self.tt.clear();
        self.history.clear();
        self.killers.clear();
        self.stats = SearchStats::default();
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        if let Err(err) = self.config.set(name, value) {
            warn!("option {name}={value} rejected: {err}");
            return false;
        }
        self.options = self.config.search_options();
        if matches!(name, "table" | "table_bits" | "map_limit") {
            self.tt = self.config.build_table();
        }
        true
    }
}
