//! Chess rules for the playroom chess board.
//!
//! The crate provides everything a host needs to run a game of chess
//! without an external rules engine: FEN interchange, legal move
//! generation (castling, en passant, queen promotion), check and
//! game-over detection, a perft counter for verifying the generator, and
//! a one-ply capture heuristic opponent.
//!
//! # Example
//!
//! ```
//! use playroom_chess::{ChessGame, GameStatus, MoveRequest};
//!
//! let mut game = ChessGame::new();
//! for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     game.make_move(uci.parse::<MoveRequest>().unwrap()).unwrap();
//! }
//! assert!(matches!(game.status(), GameStatus::Checkmate { .. }));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod game;
mod movegen;
mod moves;
mod perft;
mod position;
mod search;
mod types;

pub use board::Board;
pub use game::{ChessGame, ChessMoveError, DrawReason, GameStatus};
pub use moves::{ChessMove, MoveKind, MoveRequest, MoveRequestError};
pub use perft::perft;
pub use position::{CastlingRights, FenError, Position, STARTING_FEN};
pub use search::{Difficulty, SearchError, capture_score, choose_move};
pub use types::{Color, Piece, PieceKind, Square, SquareParseError};
