use crate::{board::Position, types::*};

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Collects destinations for one side, optionally keeping captures only.
struct MoveSink<'a> {
    out: &'a mut Vec<Move>,
    side: Side,
    captures_only: bool,
}

impl MoveSink<'_> {
    /// Pushes `from -> to` unless `to` holds a friendly piece (or is empty in
    /// capture-only mode). Returns true if `to` was empty.
    #[inline]
    fn push(&mut self, pos: &Position, from: Square, to: Square) -> bool {
        match pos.piece_at(to) {
            None => {
                if !self.captures_only {
                    self.out.push(Move::new(from, to));
                }
                true
            }
            Some(p) => {
                if p.side != self.side {
                    self.out.push(Move::new(from, to));
                }
                false
            }
        }
    }
}

type Generator = fn(&Position, Square, &mut MoveSink);

/// Movement rules, indexed by `PieceKind::idx()`.
const GENERATORS: [Generator; 7] = [
    gen_general,
    gen_advisor,
    gen_elephant,
    gen_horse,
    gen_chariot,
    gen_cannon,
    gen_soldier,
];

fn gen_general(pos: &Position, from: Square, sink: &mut MoveSink) {
    let side = sink.side;
    for (dr, dc) in ORTHOGONAL {
        if let Some(to) = from.offset(dr, dc)
            && to.in_palace(side)
        {
            sink.push(pos, from, to);
        }
    }

    // Flying general: the first piece up the file is the enemy General.
    let mut cur = from;
    while let Some(next) = cur.offset(side.forward(), 0) {
        if let Some(p) = pos.piece_at(next) {
            if p.kind == PieceKind::General && p.side != side {
                sink.out.push(Move::new(from, next));
            }
            break;
        }
        cur = next;
    }
}

fn gen_advisor(pos: &Position, from: Square, sink: &mut MoveSink) {
    for (dr, dc) in DIAGONAL {
        if let Some(to) = from.offset(dr, dc)
            && to.in_palace(sink.side)
        {
            sink.push(pos, from, to);
        }
    }
}

fn gen_elephant(pos: &Position, from: Square, sink: &mut MoveSink) {
    for (dr, dc) in DIAGONAL {
        let (Some(eye), Some(to)) = (from.offset(dr, dc), from.offset(2 * dr, 2 * dc)) else {
            continue;
        };
        if pos.is_empty(eye) && to.on_own_half(sink.side) {
            sink.push(pos, from, to);
        }
    }
}

fn gen_horse(pos: &Position, from: Square, sink: &mut MoveSink) {
    for (dr, dc) in ORTHOGONAL {
        let Some(leg) = from.offset(dr, dc) else {
            continue;
        };
        if !pos.is_empty(leg) {
            continue;
        }
        // Two jumps per leg, splayed either side of the leg direction.
        for spread in [-1, 1] {
            let (tr, tc) = if dr != 0 {
                (2 * dr, spread)
            } else {
                (spread, 2 * dc)
            };
            if let Some(to) = from.offset(tr, tc) {
                sink.push(pos, from, to);
            }
        }
    }
}

fn gen_chariot(pos: &Position, from: Square, sink: &mut MoveSink) {
    for (dr, dc) in ORTHOGONAL {
        let mut cur = from;
        while let Some(to) = cur.offset(dr, dc) {
            if !sink.push(pos, from, to) {
                break;
            }
            cur = to;
        }
    }
}

fn gen_cannon(pos: &Position, from: Square, sink: &mut MoveSink) {
    for (dr, dc) in ORTHOGONAL {
        let mut cur = from;
        let mut screened = false;
        while let Some(to) = cur.offset(dr, dc) {
            cur = to;
            match pos.piece_at(to) {
                None if !screened => {
                    if !sink.captures_only {
                        sink.out.push(Move::new(from, to));
                    }
                }
                None => {}
                Some(_) if !screened => screened = true,
                Some(p) => {
                    if p.side != sink.side {
                        sink.out.push(Move::new(from, to));
                    }
                    break;
                }
            }
        }
    }
}

fn gen_soldier(pos: &Position, from: Square, sink: &mut MoveSink) {
    if let Some(to) = from.offset(sink.side.forward(), 0) {
        sink.push(pos, from, to);
    }
    if !from.on_own_half(sink.side) {
        for dc in [-1, 1] {
            if let Some(to) = from.offset(0, dc) {
                sink.push(pos, from, to);
            }
        }
    }
}

impl Position {
    fn generate(&self, side: Side, captures_only: bool, out: &mut Vec<Move>) {
        let mut sink = MoveSink {
            out,
            side,
            captures_only,
        };
        for (sq, piece) in self.pieces(side) {
            GENERATORS[piece.kind.idx()](self, sq, &mut sink);
        }
    }

    /// Pseudo-legal moves for `side`: a move may leave its own General en prise.
    pub fn generate_moves(&self, side: Side) -> Vec<Move> {
        let mut out = Vec::with_capacity(64);
        self.generate(side, false, &mut out);
        out
    }

    /// Appends pseudo-legal moves to `out` without clearing it.
    pub fn generate_moves_into(&self, side: Side, out: &mut Vec<Move>) {
        self.generate(side, false, out);
    }

    /// Pseudo-legal captures for `side`, including the flying-general capture.
    pub fn generate_attacks(&self, side: Side) -> Vec<Move> {
        let mut out = Vec::with_capacity(16);
        self.generate(side, true, &mut out);
        out
    }

    pub fn generate_attacks_into(&self, side: Side, out: &mut Vec<Move>) {
        self.generate(side, true, out);
    }
}

/// Generate all legal moves, returning a freshly allocated vector.
/// Internally delegates to `legal_moves_into`, cloning the position only once.
pub fn legal_moves(pos: &Position, side: Side) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, side, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
pub fn legal_moves_into(pos: &mut Position, side: Side, out: &mut Vec<Move>) {
    out.clear();
    pos.generate_moves_into(side, out);

    // Filter illegal moves in-place by playing them on the mutable position.
    out.retain(|&mv| {
        pos.make_move(mv);
        let illegal = pos.is_checked(side);
        pos.unmake_move();
        !illegal
    });
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
