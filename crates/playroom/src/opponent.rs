//! Computer opponents.

use crate::game::TurnBasedGame;
use derive_new::new;
use playroom_chess::{ChessGame, Difficulty, MoveRequest, choose_move};
use playroom_tictactoe::{AnyGame, Position, best_move};
use rand::rngs::StdRng;
use tracing::instrument;

/// The opponent was asked for a move it cannot make.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Opponent cannot move: {}", _0)]
pub struct OpponentError(pub String);

impl std::error::Error for OpponentError {}

/// Chooses moves for the computer-controlled side.
pub trait Opponent<G: TurnBasedGame> {
    /// Picks a move for the side to move in `game`.
    ///
    /// Only called while the game is in progress.
    fn choose(&self, game: &G, rng: &mut StdRng) -> Result<G::Move, OpponentError>;
}

/// Perfect-play tic-tac-toe opponent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinimaxOpponent;

impl Opponent<AnyGame> for MinimaxOpponent {
    #[instrument(skip_all)]
    fn choose(&self, game: &AnyGame, _rng: &mut StdRng) -> Result<Position, OpponentError> {
        let ai = game
            .to_move()
            .ok_or_else(|| OpponentError("game is over".to_string()))?;
        best_move(game.board(), ai).map_err(|e| OpponentError(e.to_string()))
    }
}

/// Capture heuristic chess opponent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, new)]
pub struct ChessOpponent {
    difficulty: Difficulty,
}

impl ChessOpponent {
    /// Configured strength.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

impl Opponent<ChessGame> for ChessOpponent {
    #[instrument(skip_all, fields(difficulty = %self.difficulty))]
    fn choose(&self, game: &ChessGame, rng: &mut StdRng) -> Result<MoveRequest, OpponentError> {
        choose_move(game, self.difficulty, rng)
            .map(|mv| mv.request())
            .map_err(|e| OpponentError(e.to_string()))
    }
}
