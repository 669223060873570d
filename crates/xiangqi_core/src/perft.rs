use crate::{board::Position, movegen::legal_moves_into, types::*};

/// Pure perft node count.
/// Counts all legal move sequences of length `depth` from the current
/// position, alternating sides starting with `side`.
pub fn perft(pos: &mut Position, side: Side, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    fn inner(pos: &mut Position, side: Side, depth: u8, layers: &mut [Vec<Move>]) -> u64 {
        if depth == 0 {
            return 1;
        }

        let (buf, rest) = layers
            .split_first_mut()
            .expect("perft requires one buffer per remaining ply");

        legal_moves_into(pos, side, buf);
        if depth == 1 {
            return buf.len() as u64;
        }

        let mut nodes = 0u64;
        for mv in buf.iter().copied() {
            pos.make_move(mv);
            nodes += inner(pos, side.other(), depth - 1, rest);
            pos.unmake_move();
        }
        nodes
    }

    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    inner(pos, side, depth, &mut layers[..])
}

/// Per-root-move breakdown, sorted by move text.
pub fn divide(pos: &mut Position, side: Side, depth: u8) -> Vec<(Move, u64)> {
    let mut roots = Vec::with_capacity(64);
    legal_moves_into(pos, side, &mut roots);
    let mut out: Vec<(Move, u64)> = roots
        .into_iter()
        .map(|mv| {
            pos.make_move(mv);
            let n = perft(pos, side.other(), depth.saturating_sub(1));
            pos.unmake_move();
            (mv, n)
        })
        .collect();
    out.sort_by_key(|(mv, _)| mv.to_string());
    out
}
