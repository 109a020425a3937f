//! Capability interface shared by every turn-based game the controller drives.

use playroom_chess::{ChessGame, ChessMoveError, Color, GameStatus, MoveRequest};
use playroom_tictactoe::{AnyGame, MoveError, Outcome, Player, Position};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// Result of a game as seen by the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "winner", rename_all = "snake_case")]
pub enum GameOutcome<S> {
    /// Moves are still possible.
    InProgress,
    /// One side won.
    Win(S),
    /// Nobody won.
    Draw,
}

impl<S> GameOutcome<S> {
    /// True once the game has ended.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    /// Winning side, if any.
    pub fn winner(&self) -> Option<&S> {
        match self {
            GameOutcome::Win(side) => Some(side),
            _ => None,
        }
    }

    /// Converts the side type, keeping the shape.
    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> GameOutcome<T> {
        match self {
            GameOutcome::InProgress => GameOutcome::InProgress,
            GameOutcome::Win(side) => GameOutcome::Win(f(side)),
            GameOutcome::Draw => GameOutcome::Draw,
        }
    }
}

/// What the controller needs from a game: whose turn it is, which moves
/// exist, how to play one, and whether it is over.
///
/// `apply_move` must leave the game untouched when it returns an error.
pub trait TurnBasedGame: Clone + Debug {
    /// A player or color.
    type Side: Copy + Eq + Debug + Display;
    /// A move as callers name it.
    type Move: Copy + Debug + Display;
    /// Why a move was refused.
    type Error: std::error::Error;

    /// Side whose turn it is. Once the game is over, the side that would move next.
    fn side_to_move(&self) -> Self::Side;

    /// Every legal move, empty once the game is over.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Plays a move for the side to move.
    fn apply_move(&mut self, mv: Self::Move) -> Result<(), Self::Error>;

    /// Current result.
    fn outcome(&self) -> GameOutcome<Self::Side>;
}

impl TurnBasedGame for AnyGame {
    type Side = Player;
    type Move = Position;
    type Error = MoveError;

    fn side_to_move(&self) -> Player {
        self.to_move().unwrap_or(if self.history().len() % 2 == 0 {
            Player::X
        } else {
            Player::O
        })
    }

    fn legal_moves(&self) -> Vec<Position> {
        self.valid_moves()
    }

    fn apply_move(&mut self, mv: Position) -> Result<(), MoveError> {
        self.place(mv)
    }

    fn outcome(&self) -> GameOutcome<Player> {
        match AnyGame::outcome(self) {
            None => GameOutcome::InProgress,
            Some(Outcome::Winner(player)) => GameOutcome::Win(player),
            Some(Outcome::Draw) => GameOutcome::Draw,
        }
    }
}

impl TurnBasedGame for ChessGame {
    type Side = Color;
    type Move = MoveRequest;
    type Error = ChessMoveError;

    fn side_to_move(&self) -> Color {
        ChessGame::side_to_move(self)
    }

    fn legal_moves(&self) -> Vec<MoveRequest> {
        ChessGame::legal_moves(self)
            .iter()
            .map(|mv| mv.request())
            .collect()
    }

    fn apply_move(&mut self, mv: MoveRequest) -> Result<(), ChessMoveError> {
        self.make_move(mv).map(|_| ())
    }

    fn outcome(&self) -> GameOutcome<Color> {
        match self.status() {
            GameStatus::Ongoing => GameOutcome::InProgress,
            GameStatus::Checkmate { winner } => GameOutcome::Win(winner),
            GameStatus::Stalemate | GameStatus::Draw { .. } => GameOutcome::Draw,
        }
    }
}
