//! Negamax search with alpha-beta pruning, quiescence, null-move pruning and
//! principal variation search.
//!
//! A node returns `None` when the search was cancelled. Cancellation unwinds
//! the whole stack; each node on the way out puts its own table slot back
//! the way it found it and never stores a partial result.
//!
//! Scores that depend on the game history (a repeated position somewhere
//! below) are never stored in the table, since the same position reached
//! along another path may not repeat.

use xiangqi_core::{
    INF, MATE, MAX_PLY, Move, Position, Repetition, Side, TimeControl, is_mate_score,
};

use crate::ordering::{HistoryTable, KillerTable, order_captures, order_moves};

/// Score of a drawn repetition.
pub const DRAW: i32 = 0;
use crate::tt::{TranspositionTable, TtEntry};

/// Heuristic switches for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub null_move: bool,
    /// Extra depth reduction `R` for the null-move search (`depth - 1 - R`).
    pub null_move_reduction: u8,
    pub pvs: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            null_move: true,
            null_move_reduction: 2,
            pvs: true,
        }
    }
}

/// Counters for one call to `Engine::search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub tt_hits: u64,
    pub beta_cutoffs: u64,
    pub null_cutoffs: u64,
    /// Nodes not stored because a repetition decided their score.
    pub history_dependent: u64,
    /// How often the best move was the n-th legal move tried (last bucket: n >= 9).
    pub best_rank: [u64; 10],
}

/// Result of searching one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub score: i32,
    pub best_move: Option<Move>,
    /// The score is exact whatever the window (General capture, no legal
    /// moves, quiet quiescence leaf).
    exact: bool,
    /// A repetition somewhere below decided the score.
    from_history: bool,
}

impl Node {
    fn bound(score: i32, best_move: Option<Move>) -> Self {
        Self {
            score,
            best_move,
            exact: false,
            from_history: false,
        }
    }

    fn exact(score: i32, best_move: Option<Move>) -> Self {
        Self {
            score,
            best_move,
            exact: true,
            from_history: false,
        }
    }

    fn with_history(mut self, from_history: bool) -> Self {
        self.from_history = from_history;
        self
    }
}

/// Outcome of walking a node's move list.
struct Walk {
    score: i32,
    best_move: Option<Move>,
    best_rank: Option<usize>,
    legal: usize,
    cutoff: bool,
    general_captured: bool,
    from_history: bool,
}

/// Score for `side`, whose move just repeated a position.
fn repetition_score(rep: Repetition, side: Side, ply: usize) -> i32 {
    match rep {
        Repetition::Draw => DRAW,
        Repetition::PerpetualCheck(checker) if checker == side => -MATE + ply as i32 + 1,
        Repetition::PerpetualCheck(_) => MATE - ply as i32 - 1,
    }
}

/// Mate scores are stored relative to the node, not the root.
pub(crate) fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score.abs() >= INF || !is_mate_score(score) {
        score
    } else if score > 0 {
        score + ply as i32
    } else {
        score - ply as i32
    }
}

pub(crate) fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score.abs() >= INF || !is_mate_score(score) {
        score
    } else if score > 0 {
        score - ply as i32
    } else {
        score + ply as i32
    }
}

/// Borrowed state for one search pass.
pub struct Searcher<'a> {
    pub pos: &'a mut Position,
    pub tt: &'a mut dyn TranspositionTable,
    pub history: &'a mut HistoryTable,
    pub killers: &'a mut KillerTable,
    pub stats: &'a mut SearchStats,
    pub tc: &'a TimeControl,
    pub options: SearchOptions,
    /// Only abortable passes look at the clock or the stop flag.
    pub abortable: bool,
}

impl Searcher<'_> {
    #[inline]
    fn should_abort(&self) -> bool {
        self.abortable
            && (self.tc.is_stopped()
                || (self.tc.should_check_time(self.stats.nodes) && self.tc.check_time()))
    }

    /// Quiescence value of the current position for `side`.
    pub fn evaluate(&mut self, side: Side) -> i32 {
        match self.node(0, side, -INF, INF, 0, false) {
            Some(node) => node.score,
            None => self.pos.static_value(side),
        }
    }

    /// Negamax over `[alpha, beta]`. `depth <= 0` drops into quiescence.
    pub fn node(
        &mut self,
        depth: i32,
        side: Side,
        mut alpha: i32,
        mut beta: i32,
        ply: usize,
        allow_null: bool,
    ) -> Option<Node> {
        self.stats.nodes += 1;
        if self.should_abort() {
            return None;
        }

        let hash = self.pos.current_hash_for(side);
        let prior = self.tt.lookup(hash);
        let hint = prior.and_then(|e| e.best_move);

        // Never cut at the root: the caller needs a move.
        if let Some(entry) = prior
            && ply > 0
            && entry.depth as i32 >= depth.max(0)
        {
            let lower = score_from_tt(entry.lower, ply);
            let upper = score_from_tt(entry.upper, ply);
            let cut = if lower == upper || lower >= beta {
                Some(lower)
            } else if upper <= alpha {
                Some(upper)
            } else {
                None
            };
            if let Some(score) = cut {
                self.stats.tt_hits += 1;
                return Some(Node::bound(score, entry.best_move));
            }
            alpha = alpha.max(lower);
            beta = beta.min(upper);
        }

        let searched = if depth <= 0 {
            self.quiesce(side, alpha, beta, ply, hint)
        } else {
            self.full_width(depth, side, alpha, beta, ply, allow_null, hint)
        };
        let Some(node) = searched else {
            self.tt.restore(hash, prior);
            return None;
        };

        if node.from_history {
            self.stats.history_dependent += 1;
            return Some(node);
        }

        let s = node.score;
        let (lower, upper) = if node.exact {
            (s, s)
        } else if s <= alpha {
            (-INF, s)
        } else if s >= beta {
            (s, INF)
        } else {
            (s, s)
        };
        self.tt.store(
            hash,
            TtEntry {
                depth: depth.clamp(0, u8::MAX as i32) as u8,
                best_move: node.best_move.or(hint),
                lower: score_to_tt(lower, ply),
                upper: score_to_tt(upper, ply),
            },
        );
        Some(node)
    }

    fn quiesce(
        &mut self,
        side: Side,
        alpha: i32,
        beta: i32,
        ply: usize,
        hint: Option<Move>,
    ) -> Option<Node> {
        if ply >= MAX_PLY {
            return Some(Node::bound(self.pos.static_value(side), None));
        }

        let in_check = self.pos.is_checked(side);
        let mut moves = Vec::with_capacity(32);
        let floor = if in_check {
            // Evasions: every move, no standing pat.
            self.pos.generate_moves_into(side, &mut moves);
            order_moves(&mut moves, hint, self.killers.get(ply), self.history);
            -MATE + ply as i32
        } else {
            let stand_pat = self.pos.static_value(side);
            self.pos.generate_attacks_into(side, &mut moves);
            if moves.is_empty() {
                return Some(Node::exact(stand_pat, None));
            }
            if stand_pat >= beta {
                return Some(Node::bound(stand_pat, None));
            }
            order_captures(self.pos, &mut moves, hint);
            stand_pat
        };

        let walk = self.walk(&moves, 0, side, alpha, beta, ply, floor, false)?;
        if walk.general_captured || (in_check && walk.legal == 0) {
            return Some(Node::exact(walk.score, walk.best_move));
        }
        Some(Node::bound(walk.score, walk.best_move))
    }

    #[allow(clippy::too_many_arguments)]
    fn full_width(
        &mut self,
        depth: i32,
        side: Side,
        alpha: i32,
        beta: i32,
        ply: usize,
        allow_null: bool,
        hint: Option<Move>,
    ) -> Option<Node> {
        let in_check = self.pos.is_checked(side);

        if allow_null
            && self.options.null_move
            && !in_check
            && depth >= 2
            && ply > 0
            && !is_mate_score(beta)
        {
            let reduced = depth - 1 - self.options.null_move_reduction as i32;
            self.pos.make_null_move();
            let passed = self.node(reduced, side.other(), -beta, -beta + 1, ply + 1, false);
            self.pos.unmake_move();
            let passed = passed?;
            let score = -passed.score;
            if score >= beta {
                self.stats.null_cutoffs += 1;
                let score = if is_mate_score(score) { beta } else { score };
                return Some(Node::bound(score, hint).with_history(passed.from_history));
            }
        }

        let mut moves = Vec::with_capacity(64);
        self.pos.generate_moves_into(side, &mut moves);
        order_moves(&mut moves, hint, self.killers.get(ply), self.history);

        let walk = self.walk(&moves, depth, side, alpha, beta, ply, -INF, self.options.pvs)?;
        if walk.general_captured {
            return Some(Node::exact(walk.score, walk.best_move));
        }
        if walk.legal == 0 {
            // Checkmate and stalemate both lose.
            return Some(Node::exact(-MATE + ply as i32, None));
        }

        if let Some(rank) = walk.best_rank {
            self.stats.best_rank[rank.min(9)] += 1;
        }
        if walk.cutoff {
            self.stats.beta_cutoffs += 1;
            if let Some(mv) = walk.best_move {
                self.history.reward(mv, depth);
                self.killers.record(ply, mv);
            }
        }
        Some(Node::bound(walk.score, walk.best_move).with_history(walk.from_history))
    }

    /// Tries `moves` in order, starting from the score `floor`.
    ///
    /// At the root, equal scores go to the move with the smaller packed
    /// form, so the choice does not depend on the order moves were tried.
    /// Later root moves are searched with alpha one below the best score so
    /// that a tie comes back exact.
    #[allow(clippy::too_many_arguments)]
    fn walk(
        &mut self,
        moves: &[Move],
        depth: i32,
        side: Side,
        alpha: i32,
        beta: i32,
        ply: usize,
        floor: i32,
        pvs: bool,
    ) -> Option<Walk> {
        let mut walk = Walk {
            score: floor,
            best_move: None,
            best_rank: None,
            legal: 0,
            cutoff: false,
            general_captured: false,
            from_history: false,
        };
        let other = side.other();

        for &mv in moves {
            if self.pos.make_move(mv) {
                self.pos.unmake_move();
                let mv = if ply == 0 {
                    moves
                        .iter()
                        .copied()
                        .filter(|m| m.to == mv.to)
                        .min_by_key(|m| m.pack())
                        .unwrap_or(mv)
                } else {
                    mv
                };
                walk.score = MATE - ply as i32;
                walk.best_move = Some(mv);
                walk.best_rank = Some(walk.legal);
                walk.legal += 1;
                walk.general_captured = true;
                return Some(walk);
            }
            if self.pos.is_checked(side) {
                self.pos.unmake_move();
                continue;
            }
            walk.legal += 1;

            let (score, from_history) = if depth > 0
                && let Some(rep) = self.pos.repetition()
            {
                self.pos.unmake_move();
                (repetition_score(rep, side, ply), true)
            } else {
                let a = if ply == 0 && walk.best_move.is_some() {
                    alpha.max(walk.score - 1)
                } else {
                    alpha.max(walk.score)
                };
                let searched = if pvs && walk.legal > 1 {
                    match self.node(depth - 1, other, -a - 1, -a, ply + 1, true) {
                        Some(scout) if -scout.score > a && -scout.score < beta => {
                            self.node(depth - 1, other, -beta, -a, ply + 1, true)
                        }
                        scout => scout,
                    }
                } else {
                    self.node(depth - 1, other, -beta, -a, ply + 1, true)
                };
                self.pos.unmake_move();
                let child = searched?;
                (-child.score, child.from_history)
            };
            walk.from_history |= from_history;

            let tie_at_root = ply == 0
                && score == walk.score
                && walk.best_move.is_some_and(|best| mv.pack() < best.pack());
            if score > walk.score || tie_at_root {
                walk.score = score;
                walk.best_move = Some(mv);
                walk.best_rank = Some(walk.legal - 1);
            }
            if walk.score >= beta {
                walk.cutoff = true;
                walk.from_history = from_history;
                break;
            }
        }
        Some(walk)
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
