//! Playroom - turn-based game sessions
//!
//! Drives tic-tac-toe and chess games for human players, optionally
//! against a computer opponent, and serves them over a small REST API.
//!
//! # Architecture
//!
//! - **Game**: [`TurnBasedGame`], the capability interface each rules crate implements
//! - **Opponent**: minimax for tic-tac-toe, a capture heuristic for chess
//! - **Session**: [`GameSession`], the per-game state machine
//! - **Store**: [`SessionStore`], id-keyed sessions with idle eviction
//! - **API**: axum router over the store
//!
//! # Example
//!
//! ```
//! use playroom::{Mode, MoveInput, NewGame, SessionStore, Variant};
//!
//! let store = SessionStore::default();
//! let game = store.create(&NewGame::new(Variant::TicTacToe, Mode::VsAi)).unwrap();
//! let (accepted, after) = store.apply_move(*game.id(), &MoveInput::Cell { cell: 4 }).unwrap();
//! assert!(accepted);
//! assert_eq!(after.game().side_to_move, "X");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod config;
mod game;
mod opponent;
mod server;
mod session;
mod store;
mod variant;

pub use api::{ApiError, AppState, router};
pub use config::{ConfigError, ServerConfig};
pub use game::{GameOutcome, TurnBasedGame};
pub use opponent::{ChessOpponent, MinimaxOpponent, Opponent, OpponentError};
pub use server::{serve, spawn_sweeper};
pub use session::{GameSession, Mode, MoveReport, SessionError, SessionState};
pub use store::{SessionSnapshot, SessionStore, SessionSummary, StoreError, StoreSettings};
pub use variant::{AnySession, BoardView, GameView, MoveInput, NewGame, Variant};
