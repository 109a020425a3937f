//! Mark placements and the reasons one can be refused.
//!
//! A [`Move`] only records who wants to mark which cell. Whether that is
//! allowed is decided against a board by the contracts, so a move can be
//! built, logged or replayed without touching any game.

use super::{Player, Position};
use serde::{Deserialize, Serialize};

/// One mark placed by one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Whose mark.
    pub player: Player,
    /// Target cell.
    pub position: Position,
}

impl Move {
    /// Pairs a player with a cell.
    pub fn new(player: Player, position: Position) -> Self {
        Self { player, position }
    }

    /// Whose mark.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Target cell.
    pub fn position(&self) -> Position {
        self.position
    }
}

/// Renders as `X@Center`.
impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.player, self.position.label())
    }
}

/// Why a placement was refused.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The cell is taken.
    #[display("{} already holds a mark", _0)]
    SquareOccupied(Position),

    /// The game has a result already.
    #[display("No moves remain, the game has ended")]
    GameOver,

    /// The mover is not the side whose turn it is.
    #[display("{} moved out of turn", _0)]
    WrongPlayer(Player),

    /// Cell indices run 0 through 8.
    #[display("No cell with index {}", _0)]
    OutOfBounds(usize),

    /// A post-move check failed; the move was not kept.
    #[display("Board check failed: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}
