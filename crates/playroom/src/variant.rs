//! Variant-erased sessions and their serializable views.

use crate::game::{GameOutcome, TurnBasedGame};
use crate::opponent::{ChessOpponent, MinimaxOpponent};
use crate::session::{GameSession, Mode, MoveReport, SessionError};
use playroom_chess::{ChessGame, Color, Difficulty, GameStatus, MoveRequest, PieceKind, Square};
use playroom_tictactoe::{AnyGame, Player, Position, winning_line};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Which game a session plays.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum Variant {
    /// Three in a row on a 3x3 grid.
    #[serde(alias = "tic-tac-toe", alias = "tic_tac_toe")]
    #[strum(to_string = "tictactoe", serialize = "tic-tac-toe", serialize = "tic_tac_toe")]
    TicTacToe,
    /// Chess with queen-only promotion.
    Chess,
}

/// Request to start a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGame {
    /// Game to play.
    pub variant: Variant,
    /// Who plays the second side.
    #[serde(default)]
    pub mode: Mode,
    /// Chess opponent strength. Ignored for tic-tac-toe.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Chess starting position. Defaults to the standard setup.
    #[serde(default)]
    pub fen: Option<String>,
}

impl NewGame {
    /// A request with default mode and no options.
    pub fn new(variant: Variant, mode: Mode) -> Self {
        Self {
            variant,
            mode,
            difficulty: None,
            fen: None,
        }
    }
}

/// A move as it arrives from a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveInput {
    /// Tic-tac-toe cell, 0-8 row-major.
    Cell {
        /// Cell index.
        #[serde(alias = "index")]
        cell: usize,
    },
    /// Chess move by squares, e.g. `{"from": "e7", "to": "e8", "promotion": "q"}`.
    Squares {
        /// Origin square.
        from: String,
        /// Destination square.
        to: String,
        /// Promotion piece as a letter or name.
        #[serde(default)]
        promotion: Option<String>,
    },
    /// Chess move in UCI notation.
    Uci {
        /// e.g. `e2e4`.
        uci: String,
    },
}

impl MoveInput {
    fn cell(&self) -> Result<Position, SessionError> {
        match self {
            MoveInput::Cell { cell } => Position::from_index(*cell)
                .ok_or_else(|| SessionError::IllegalMove(format!("Cell {cell} is off the board"))),
            _ => Err(SessionError::InvalidInput(
                "tic-tac-toe moves are given as {\"cell\": 0-8}".to_string(),
            )),
        }
    }

    fn chess(&self) -> Result<MoveRequest, SessionError> {
        match self {
            MoveInput::Squares {
                from,
                to,
                promotion,
            } => {
                let square = |text: &str| {
                    text.parse::<Square>()
                        .map_err(|e| SessionError::InvalidInput(e.to_string()))
                };
                let request = MoveRequest::new(square(from)?, square(to)?);
                match promotion.as_deref() {
                    Some(text) => Ok(request.with_promotion(parse_promotion(text)?)),
                    None => Ok(request),
                }
            }
            MoveInput::Uci { uci } => uci
                .parse::<MoveRequest>()
                .map_err(|e| SessionError::InvalidInput(e.to_string())),
            MoveInput::Cell { .. } => Err(SessionError::InvalidInput(
                "chess moves are given as {\"from\", \"to\"} or {\"uci\"}".to_string(),
            )),
        }
    }
}

fn parse_promotion(text: &str) -> Result<PieceKind, SessionError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "q" | "queen" => Ok(PieceKind::Queen),
        "r" | "rook" => Ok(PieceKind::Rook),
        "b" | "bishop" => Ok(PieceKind::Bishop),
        "n" | "knight" => Ok(PieceKind::Knight),
        _ => Err(SessionError::InvalidInput(format!(
            "Unknown promotion piece {text:?}"
        ))),
    }
}

/// A session of either game.
#[derive(Debug, Clone)]
pub enum AnySession {
    /// Tic-tac-toe, computer plays O.
    TicTacToe(GameSession<AnyGame, MinimaxOpponent>),
    /// Chess, computer plays Black.
    Chess(GameSession<ChessGame, ChessOpponent>),
}

impl AnySession {
    /// Starts a session. The human always takes the first side.
    #[instrument(skip(rng))]
    pub fn create(request: &NewGame, rng: StdRng) -> Result<Self, SessionError> {
        match request.variant {
            Variant::TicTacToe => Ok(AnySession::TicTacToe(GameSession::new(
                AnyGame::new(),
                request.mode,
                Player::O,
                MinimaxOpponent,
                rng,
            )?)),
            Variant::Chess => {
                let game = match request.fen.as_deref() {
                    Some(fen) => ChessGame::from_fen(fen)
                        .map_err(|e| SessionError::InvalidInput(e.to_string()))?,
                    None => ChessGame::new(),
                };
                let opponent = ChessOpponent::new(request.difficulty.unwrap_or_default());
                Ok(AnySession::Chess(GameSession::new(
                    game,
                    request.mode,
                    Color::Black,
                    opponent,
                    rng,
                )?))
            }
        }
    }

    /// Which game this is.
    pub fn variant(&self) -> Variant {
        match self {
            AnySession::TicTacToe(_) => Variant::TicTacToe,
            AnySession::Chess(_) => Variant::Chess,
        }
    }

    /// Who plays the second side.
    pub fn mode(&self) -> Mode {
        match self {
            AnySession::TicTacToe(s) => s.mode(),
            AnySession::Chess(s) => s.mode(),
        }
    }

    /// True once the game has ended.
    pub fn is_over(&self) -> bool {
        match self {
            AnySession::TicTacToe(s) => s.outcome().is_terminal(),
            AnySession::Chess(s) => s.outcome().is_terminal(),
        }
    }

    /// Applies a client move. `Ok(false)` means the game was already over
    /// and nothing changed.
    pub fn apply_move(&mut self, input: &MoveInput) -> Result<bool, SessionError> {
        let report_applied = match self {
            AnySession::TicTacToe(s) => matches!(s.apply_move(input.cell()?)?, MoveReport::Applied { .. }),
            AnySession::Chess(s) => matches!(s.apply_move(input.chess()?)?, MoveReport::Applied { .. }),
        };
        Ok(report_applied)
    }

    /// Restores the starting position.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        match self {
            AnySession::TicTacToe(s) => s.reset(),
            AnySession::Chess(s) => s.reset(),
        }
    }

    /// Serializable snapshot.
    pub fn view(&self) -> GameView {
        match self {
            AnySession::TicTacToe(s) => tictactoe_view(s),
            AnySession::Chess(s) => chess_view(s),
        }
    }
}

/// Snapshot of a session for clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    /// Which game.
    pub variant: Variant,
    /// Who plays the second side.
    pub mode: Mode,
    /// Chess opponent strength in vs-AI mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Side to move, `X`/`O` or `white`/`black`.
    pub side_to_move: String,
    /// Current result.
    pub outcome: GameOutcome<String>,
    /// Board and move lists.
    #[serde(flatten)]
    pub board: BoardView,
}

/// Variant-specific part of a [`GameView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BoardView {
    /// Tic-tac-toe board.
    TicTacToe {
        /// Nine cells, row-major.
        cells: Vec<Option<Player>>,
        /// Cells of the winning line, if any.
        winning_line: Option<[usize; 3]>,
        /// Cells played, in order.
        history: Vec<usize>,
        /// Empty cells while the game is on.
        legal_moves: Vec<usize>,
        /// Cell of the computer's last reply.
        last_ai_move: Option<usize>,
    },
    /// Chess board.
    Chess {
        /// Current position.
        fen: String,
        /// Ranks 8 to 1, files a to h, pieces as `wP`-style codes.
        grid: Vec<Vec<Option<String>>>,
        /// Side to move is in check.
        in_check: bool,
        /// Detailed result.
        status: GameStatus,
        /// Moves played, in UCI.
        history: Vec<String>,
        /// Legal moves, in UCI.
        legal_moves: Vec<String>,
        /// Computer's last reply, in UCI.
        last_ai_move: Option<String>,
    },
}

fn tictactoe_view(session: &GameSession<AnyGame, MinimaxOpponent>) -> GameView {
    let game = session.game();
    let board = game.board();
    GameView {
        variant: Variant::TicTacToe,
        mode: session.mode(),
        difficulty: None,
        side_to_move: game.side_to_move().to_string(),
        outcome: session.outcome().map(|p| p.to_string()),
        board: BoardView::TicTacToe {
            cells: board.squares().iter().map(|sq| sq.player()).collect(),
            winning_line: winning_line(board).map(|(_, line)| line.map(Position::to_index)),
            history: game.history().iter().map(|m| m.position().to_index()).collect(),
            legal_moves: game.valid_moves().into_iter().map(Position::to_index).collect(),
            last_ai_move: session.last_ai_move().map(Position::to_index),
        },
    }
}

fn chess_view(session: &GameSession<ChessGame, ChessOpponent>) -> GameView {
    let game = session.game();
    let color = |c: Color| c.to_string().to_lowercase();
    GameView {
        variant: Variant::Chess,
        mode: session.mode(),
        difficulty: (session.mode() == Mode::VsAi).then(|| session.opponent().difficulty()),
        side_to_move: color(game.side_to_move()),
        outcome: session.outcome().map(color),
        board: BoardView::Chess {
            fen: game.fen(),
            grid: game.position().board().grid(),
            in_check: game.is_check(),
            status: game.status(),
            history: game.history().iter().map(|m| m.uci()).collect(),
            legal_moves: game.legal_moves().iter().map(|m| m.uci()).collect(),
            last_ai_move: session.last_ai_move().map(|m| m.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn test_move_input_shapes() {
        let cell: MoveInput = serde_json::from_str(r#"{"index": 4}"#).unwrap();
        assert_eq!(cell, MoveInput::Cell { cell: 4 });
        let uci: MoveInput = serde_json::from_str(r#"{"uci": "e2e4"}"#).unwrap();
        assert_eq!(uci.chess().unwrap().to_string(), "e2e4");
        let squares: MoveInput =
            serde_json::from_str(r#"{"from": "a7", "to": "a8", "promotion": "queen"}"#).unwrap();
        assert_eq!(squares.chess().unwrap().to_string(), "a7a8q");
    }

    #[test]
    fn test_wrong_input_for_variant() {
        let mut session = AnySession::create(&NewGame::new(Variant::Chess, Mode::Pvp), rng()).unwrap();
        let err = session.apply_move(&MoveInput::Cell { cell: 4 }).unwrap_err();
        assert!(matches!(err, SessionError::InvalidInput(_)));
    }

    #[test]
    fn test_tictactoe_view() {
        let mut session =
            AnySession::create(&NewGame::new(Variant::TicTacToe, Mode::Pvp), rng()).unwrap();
        for cell in [0, 3, 1, 4, 2] {
            assert!(session.apply_move(&MoveInput::Cell { cell }).unwrap());
        }
        let view = session.view();
        assert_eq!(view.outcome, GameOutcome::Win("X".to_string()));
        let BoardView::TicTacToe {
            winning_line,
            legal_moves,
            ..
        } = &view.board
        else {
            panic!("expected a tic-tac-toe board");
        };
        assert_eq!(*winning_line, Some([0, 1, 2]));
        assert!(legal_moves.is_empty());
    }

    #[test]
    fn test_chess_view_json() {
        let request = NewGame {
            variant: Variant::Chess,
            mode: Mode::VsAi,
            difficulty: Some(Difficulty::Medium),
            fen: None,
        };
        let mut session = AnySession::create(&request, rng()).unwrap();
        session
            .apply_move(&MoveInput::Uci {
                uci: "e2e4".to_string(),
            })
            .unwrap();
        let json = serde_json::to_value(session.view()).unwrap();
        assert_eq!(json["variant"], "chess");
        assert_eq!(json["mode"], "vs-ai");
        assert_eq!(json["difficulty"], "medium");
        assert_eq!(json["side_to_move"], "white");
        assert_eq!(json["outcome"]["state"], "in_progress");
        assert_eq!(json["history"].as_array().unwrap().len(), 2);
        assert!(json["last_ai_move"].is_string());
        assert_eq!(json["grid"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_variant_names() {
        assert_eq!("tic-tac-toe".parse::<Variant>().unwrap(), Variant::TicTacToe);
        assert_eq!(Variant::TicTacToe.to_string(), "tictactoe");
        let variant: Variant = serde_json::from_str("\"chess\"").unwrap();
        assert_eq!(variant, Variant::Chess);
    }
}
