//! Exhaustive minimax opponent.
//!
//! The 3x3 tree is at most nine plies deep, so the search visits every
//! reachable position without pruning or a transposition table. Terminal
//! positions score +1 when the AI has a line, -1 when its opponent does
//! and 0 for a full board. Among equally scored moves the first one in
//! cell order wins.

use super::phases::Outcome;
use super::position::Position;
use super::rules;
use super::types::{Board, Player, Square};
use tracing::{debug, instrument};

/// The search was asked to move in a position that has no move to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SearchError {
    /// The board is already decided.
    #[display("Search called on a finished board ({})", _0)]
    GameOver(Outcome),
}

impl std::error::Error for SearchError {}

/// Picks a perfect-play move for `ai`, assumed to be the side to move.
///
/// # Errors
///
/// Returns [`SearchError::GameOver`] if the board already has a line or is full.
#[instrument(skip(board), fields(ai = %ai))]
pub fn best_move(board: &Board, ai: Player) -> Result<Position, SearchError> {
    let scored = scored_moves(board, ai)?;

    let mut best: Option<(Position, i8)> = None;
    for (pos, score) in scored {
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((pos, score));
        }
    }

    // scored_moves only returns Ok for boards with an empty square
    let (pos, score) = best.ok_or(SearchError::GameOver(Outcome::Draw))?;
    debug!(position = %pos, score, "Selected move");
    Ok(pos)
}

/// Minimax value of every empty cell for `ai` to move, in cell order.
///
/// # Errors
///
/// Returns [`SearchError::GameOver`] if the board is already decided.
pub fn scored_moves(board: &Board, ai: Player) -> Result<Vec<(Position, i8)>, SearchError> {
    if let Some(outcome) = terminal(board) {
        return Err(SearchError::GameOver(outcome));
    }

    let mut scratch = board.clone();
    let scored = Position::valid_moves(board)
        .into_iter()
        .map(|pos| {
            scratch.set(pos, Square::Occupied(ai));
            let score = minimax(&mut scratch, ai.opponent(), ai);
            scratch.set(pos, Square::Empty);
            (pos, score)
        })
        .collect();

    Ok(scored)
}

fn terminal(board: &Board) -> Option<Outcome> {
    if let Some(winner) = rules::check_winner(board) {
        Some(Outcome::Winner(winner))
    } else if rules::is_full(board) {
        Some(Outcome::Draw)
    } else {
        None
    }
}

fn minimax(board: &mut Board, to_move: Player, ai: Player) -> i8 {
    match terminal(board) {
        Some(Outcome::Winner(winner)) if winner == ai => return 1,
        Some(Outcome::Winner(_)) => return -1,
        Some(Outcome::Draw) => return 0,
        None => {}
    }

    let maximizing = to_move == ai;
    let mut best = if maximizing { i8::MIN } else { i8::MAX };

    for pos in Position::ALL {
        if !board.is_empty(pos) {
            continue;
        }
        board.set(pos, Square::Occupied(to_move));
        let score = minimax(board, to_move.opponent(), ai);
        board.set(pos, Square::Empty);

        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }

    best
}
