//! Leaf-node counting for move generator verification.

use super::position::Position;
use tracing::instrument;

/// Number of leaf nodes reachable from `position` in exactly `depth` plies.
///
/// Game-over rules other than checkmate and stalemate are ignored, matching
/// published perft tables.
#[instrument(skip(position), fields(fen = %position.fen()))]
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    count(position, depth)
}

fn count(position: &Position, depth: u32) -> u64 {
    let moves = position.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|mv| count(&position.after(mv), depth - 1))
        .sum()
}
