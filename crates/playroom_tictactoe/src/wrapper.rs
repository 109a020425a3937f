//! Mutable wrapper over the typestate phases.
//!
//! Typestate phases are consumed by every transition. Hosts that keep a
//! game alive between requests hold an [`AnyGame`] instead, which only
//! changes when a move is accepted.

use super::action::{Move, MoveError};
use super::contracts::{Contract, MoveContract};
use super::phases::Outcome;
use super::position::Position;
use super::types::{Board, Player};
use super::typestate::{GameFinished, GameInProgress, GameResult, GameSetup};
use tracing::{debug, instrument, warn};

/// A tic-tac-toe game in any phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyGame {
    /// Game in progress.
    InProgress(GameInProgress),
    /// Game finished with an outcome.
    Finished(GameFinished),
}

impl From<GameInProgress> for AnyGame {
    fn from(game: GameInProgress) -> Self {
        AnyGame::InProgress(game)
    }
}

impl From<GameFinished> for AnyGame {
    fn from(game: GameFinished) -> Self {
        AnyGame::Finished(game)
    }
}

impl From<GameResult> for AnyGame {
    fn from(result: GameResult) -> Self {
        match result {
            GameResult::InProgress(g) => g.into(),
            GameResult::Finished(g) => g.into(),
        }
    }
}

impl AnyGame {
    /// Creates a fresh game with X to move.
    pub fn new() -> Self {
        GameSetup::new().start(Player::X).into()
    }

    /// Returns the board for any game phase.
    pub fn board(&self) -> &Board {
        match self {
            AnyGame::InProgress(g) => g.board(),
            AnyGame::Finished(g) => g.board(),
        }
    }

    /// Returns the move history for any game phase.
    pub fn history(&self) -> &[Move] {
        match self {
            AnyGame::InProgress(g) => g.history(),
            AnyGame::Finished(g) => g.history(),
        }
    }

    /// Returns the player to move, if the game is in progress.
    pub fn to_move(&self) -> Option<Player> {
        match self {
            AnyGame::InProgress(g) => Some(g.to_move()),
            AnyGame::Finished(_) => None,
        }
    }

    /// Returns the outcome, if the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            AnyGame::InProgress(_) => None,
            AnyGame::Finished(g) => Some(*g.outcome()),
        }
    }

    /// Returns true if the game is over.
    pub fn is_over(&self) -> bool {
        matches!(self, AnyGame::Finished(_))
    }

    /// Empty positions while the game is in progress; none once it is over.
    pub fn valid_moves(&self) -> Vec<Position> {
        match self {
            AnyGame::InProgress(g) => g.valid_moves(),
            AnyGame::Finished(_) => Vec::new(),
        }
    }

    /// Returns a status string for display.
    pub fn status_string(&self) -> String {
        match self {
            AnyGame::InProgress(g) => format!("In progress. Player {} to move.", g.to_move()),
            AnyGame::Finished(g) => match g.outcome() {
                Outcome::Winner(player) => format!("Game over. Player {} wins!", player),
                Outcome::Draw => "Game over. Draw!".to_string(),
            },
        }
    }

    /// Places the current player's mark.
    ///
    /// A rejected move leaves the game untouched.
    #[instrument(skip(self), fields(position = %pos))]
    pub fn place(&mut self, pos: Position) -> Result<(), MoveError> {
        let game = match self {
            AnyGame::InProgress(g) => g,
            AnyGame::Finished(_) => {
                debug!("Move on finished game");
                return Err(MoveError::GameOver);
            }
        };

        let action = Move::new(game.to_move(), pos);
        MoveContract::pre(game, &action).inspect_err(|e| {
            warn!(error = %e, "Move rejected");
        })?;

        let next = game.clone().make_move(action)?;
        *self = next.into();
        Ok(())
    }

    /// Places the current player's mark by cell index (0-8).
    pub fn place_index(&mut self, index: usize) -> Result<(), MoveError> {
        let pos = Position::from_index(index).ok_or(MoveError::OutOfBounds(index))?;
        self.place(pos)
    }
}

impl Default for AnyGame {
    fn default() -> Self {
        Self::new()
    }
}
