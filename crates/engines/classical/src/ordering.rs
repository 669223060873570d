//! Move ordering: transposition hint first, then the two killer moves of
//! the ply, then the history heuristic for full-width nodes. Captures in
//! quiescence go by MVV/LVA.

use xiangqi_core::{MAX_PLY, Move, NUM_SQUARES, PieceKind, Position};

/// Cutoff counts per (from, to) pair.
#[derive(Clone)]
pub struct HistoryTable {
    scores: Vec<u32>,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self {
            scores: vec![0; NUM_SQUARES * NUM_SQUARES],
        }
    }
}

impl std::fmt::Debug for HistoryTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let nonzero = self.scores.iter().filter(|&&s| s > 0).count();
        f.debug_struct("HistoryTable")
            .field("nonzero", &nonzero)
            .finish()
    }
}

impl HistoryTable {
    #[inline]
    fn index(mv: Move) -> usize {
        mv.from.index() * NUM_SQUARES + mv.to.index()
    }

    pub fn score(&self, mv: Move) -> u32 {
        self.scores[Self::index(mv)]
    }

    /// Credits a move that caused a beta cutoff at `depth`.
    pub fn reward(&mut self, mv: Move, depth: i32) {
        let bonus = (depth.max(1) * depth.max(1)) as u32;
        let slot = &mut self.scores[Self::index(mv)];
        *slot = slot.saturating_add(bonus);
    }

    /// Halves every score so older searches fade.
    pub fn age(&mut self) {
        for s in &mut self.scores {
            *s >>= 1;
        }
    }

    pub fn clear(&mut self) {
        self.scores.fill(0);
    }
}

/// The last two distinct moves that caused a cutoff at each ply, newest first.
#[derive(Debug, Clone)]
pub struct KillerTable {
    slots: Vec<[Option<Move>; 2]>,
}

impl Default for KillerTable {
    fn default() -> Self {
        Self {
            slots: vec![[None; 2]; MAX_PLY],
        }
    }
}

impl KillerTable {
    pub fn get(&self, ply: usize) -> [Option<Move>; 2] {
        self.slots.get(ply).copied().unwrap_or([None; 2])
    }

    pub fn record(&mut self, ply: usize, mv: Move) {
        if let Some(slot) = self.slots.get_mut(ply)
            && slot[0] != Some(mv)
        {
            slot[1] = slot[0];
            slot[0] = Some(mv);
        }
    }

    pub fn clear(&mut self) {
        self.slots.fill([None; 2]);
    }
}

/// Transposition move first, then the killers, then by descending history
/// score. The sort is stable, so ties keep generation order.
pub fn order_moves(
    moves: &mut [Move],
    hint: Option<Move>,
    killers: [Option<Move>; 2],
    history: &HistoryTable,
) {
    moves.sort_by_key(|&mv| {
        if Some(mv) == hint {
            (0, 0)
        } else if Some(mv) == killers[0] {
            (1, 0)
        } else if Some(mv) == killers[1] {
            (1, 1)
        } else {
            (2, u32::MAX - history.score(mv))
        }
    });
}

/// Ordering weight of a piece kind. The General outranks everything so a
/// capture that ends the game is always tried first.
fn order_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::General => 10_000,
        PieceKind::Chariot => 900,
        PieceKind::Horse | PieceKind::Cannon => 400,
        PieceKind::Advisor | PieceKind::Elephant => 150,
        PieceKind::Soldier => 100,
    }
}

fn mvv_lva(pos: &Position, mv: Move) -> i32 {
    let victim = pos.piece_at(mv.to).map_or(0, |p| order_value(p.kind));
    let attacker = pos.piece_at(mv.from).map_or(0, |p| order_value(p.kind));
    victim * 16 - attacker / 100
}

/// Most valuable victim first, cheapest attacker breaking ties; the
/// transposition move, if among them, goes first.
pub fn order_captures(pos: &Position, moves: &mut [Move], hint: Option<Move>) {
    moves.sort_by_key(|&mv| {
        if Some(mv) == hint {
            i32::MIN
        } else {
            -mvv_lva(pos, mv)
        }
    });
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod ordering_tests;
