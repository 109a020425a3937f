//! Tic-tac-toe rules and a perfect-play opponent.
//!
//! # Architecture
//!
//! - **Board**: 3x3 grid of [`Square`]s addressed by [`Position`]
//! - **Rules**: pure win/draw detection over a board
//! - **Phases**: typestate lifecycle (`GameSetup` -> `GameInProgress` -> `GameFinished`)
//! - **AnyGame**: a single mutable value for hosts that keep a game across requests
//! - **Search**: exhaustive minimax over the remaining game tree
//!
//! # Example
//!
//! ```
//! use playroom_tictactoe::{AnyGame, Player, Position, best_move};
//!
//! let mut game = AnyGame::new();
//! game.place(Position::Center).unwrap();
//! let reply = best_move(game.board(), Player::O).unwrap();
//! assert!(game.board().is_empty(reply));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod contracts;
mod invariants;
mod phases;
mod position;
mod rules;
mod search;
mod types;
mod typestate;
mod wrapper;

pub use action::{Move, MoveError};
pub use contracts::{Contract, LegalMove, MoveContract};
pub use invariants::{
    AlternatingTurnInvariant, HistoryConsistentInvariant, Invariant, InvariantSet,
    InvariantViolation, MonotonicBoardInvariant, TicTacToeInvariants,
};
pub use phases::Outcome;
pub use position::Position;
pub use rules::{LINES, check_winner, is_draw, is_full, winning_line};
pub use search::{SearchError, best_move, scored_moves};
pub use types::{Board, Player, Square};
pub use typestate::{GameFinished, GameInProgress, GameResult, GameSetup};
pub use wrapper::AnyGame;
