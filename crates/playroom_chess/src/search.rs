//! One-ply capture heuristic opponent.
//!
//! `Easy` plays any legal move. `Medium` looks only at the immediate
//! capture: it takes the most valuable piece on offer and picks at random
//! among equally good moves, which includes every move when nothing can be
//! captured.

use super::game::{ChessGame, GameStatus};
use super::moves::ChessMove;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Opponent strength.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Uniformly random legal move.
    #[default]
    Easy,
    /// Highest immediate capture value, random among ties.
    Medium,
}

/// The opponent was asked to move with nothing to play.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SearchError {
    /// The game has already ended.
    #[display("No move to choose: {}", _0)]
    GameOver(GameStatus),
}

impl std::error::Error for SearchError {}

/// Material value gained by a move, zero for quiet moves.
pub fn capture_score(mv: &ChessMove) -> u32 {
    mv.captured.map_or(0, |kind| kind.value())
}

/// Picks a move for the side to move.
#[instrument(skip(game, rng), fields(fen = %game.fen()))]
pub fn choose_move<R: Rng + ?Sized>(
    game: &ChessGame,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<ChessMove, SearchError> {
    let moves = game.legal_moves();

    let candidates: Vec<ChessMove> = match difficulty {
        Difficulty::Easy => moves,
        Difficulty::Medium => {
            let best = moves.iter().map(capture_score).max().unwrap_or(0);
            moves
                .into_iter()
                .filter(|mv| capture_score(mv) == best)
                .collect()
        }
    };

    let chosen = candidates
        .choose(rng)
        .copied()
        .ok_or_else(|| SearchError::GameOver(game.status()))?;
    debug!(mv = %chosen, candidates = candidates.len(), "Opponent chose move");
    Ok(chosen)
}
