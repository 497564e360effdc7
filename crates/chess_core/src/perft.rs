use crate::{board::Position, movegen::legal_moves_into, types::Move};

/// Pure perft node count.
/// Counts all legal positions from the current one down to `depth`.
pub fn perft(pos: &mut Position, depth: u8) -> u64 {
    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    inner(pos, depth, &mut layers[..])
}

/// Perft split by root move, in generation order. Handy for locating a
/// move-generation bug by diffing against a reference engine.
pub fn perft_divide(pos: &mut Position, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let mut root = Vec::with_capacity(64);
    legal_moves_into(pos, &mut root);

    let mut layers = vec![Vec::with_capacity(64); depth as usize - 1];
    root.into_iter()
        .map(|mv| {
            pos.make_move(mv);
            let nodes = inner(pos, depth - 1, &mut layers[..]);
            pos.undo_move();
            (mv, nodes)
        })
        .collect()
}

fn inner(pos: &mut Position, depth: u8, layers: &mut [Vec<Move>]) -> u64 {
    if depth == 0 {
        return 1;
    }

    let (buf, rest) = layers
        .split_first_mut()
        .expect("perft requires one buffer per remaining ply");

    legal_moves_into(pos, buf);
    if depth == 1 {
        return buf.len() as u64;
    }

    let mut nodes = 0u64;
    for mv in buf.iter().copied() {
        pos.make_move(mv);
        nodes += inner(pos, depth - 1, rest);
        pos.undo_move();
    }
    nodes
}
