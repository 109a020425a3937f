//! A chess game: current position, move history and game-over detection.

use super::moves::{ChessMove, MoveRequest};
use super::position::{FenError, Position};
use super::types::{Color, PieceKind, Square};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Why a game ended in a draw without stalemate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    /// Neither side can deliver mate with the remaining pieces.
    #[display("insufficient material")]
    InsufficientMaterial,
    /// A hundred plies without a capture or pawn move.
    #[display("fifty-move rule")]
    FiftyMoveRule,
    /// The same position occurred three times.
    #[display("threefold repetition")]
    ThreefoldRepetition,
}

/// State of a chess game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameStatus {
    /// The side to move has at least one legal move.
    #[display("ongoing")]
    Ongoing,
    /// The side to move is in check with no legal move.
    #[display("checkmate, {} wins", winner)]
    Checkmate {
        /// The side that delivered mate.
        winner: Color,
    },
    /// The side to move is not in check and has no legal move.
    #[display("stalemate")]
    Stalemate,
    /// Drawn by rule.
    #[display("draw by {}", reason)]
    Draw {
        /// Which rule ended the game.
        reason: DrawReason,
    },
}

impl GameStatus {
    /// True for every status except [`GameStatus::Ongoing`].
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    /// Winner, if the game ended in checkmate.
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameStatus::Checkmate { winner } => Some(*winner),
            _ => None,
        }
    }
}

/// Why a move request was refused.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ChessMoveError {
    /// The game has already ended.
    #[display("Game is over: {}", _0)]
    GameOver(GameStatus),
    /// The origin square is empty.
    #[display("No piece on {}", _0)]
    NoPiece(Square),
    /// The origin square holds a piece of the side not to move.
    #[display("Piece on {} belongs to the other side", _0)]
    NotYourPiece(Square),
    /// Only queen promotion is supported.
    #[display("Promotion to {} is not supported", _0)]
    UnsupportedPromotion(PieceKind),
    /// The move is not legal in the current position.
    #[display("Illegal move {}", _0)]
    Illegal(MoveRequest),
}

impl std::error::Error for ChessMoveError {}

/// A game of chess from some starting position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessGame {
    position: Position,
    history: Vec<ChessMove>,
    repetitions: HashMap<String, u32>,
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessGame {
    /// A game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::starting())
    }

    /// A game from a FEN position.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// A game starting from `position`.
    pub fn from_position(position: Position) -> Self {
        let mut repetitions = HashMap::new();
        repetitions.insert(position.repetition_key(), 1);
        Self {
            position,
            history: Vec::new(),
            repetitions,
        }
    }

    /// Current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// FEN of the current position.
    pub fn fen(&self) -> String {
        self.position.fen()
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    /// Moves played so far.
    pub fn history(&self) -> &[ChessMove] {
        &self.history
    }

    /// Legal moves in the current position.
    ///
    /// Empty once the game is over, including draws by rule.
    pub fn legal_moves(&self) -> Vec<ChessMove> {
        if self.status().is_over() {
            Vec::new()
        } else {
            self.position.legal_moves()
        }
    }

    /// True if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.position.in_check(self.position.side_to_move())
    }

    /// Current state. Checkmate and stalemate take precedence over draws by rule.
    pub fn status(&self) -> GameStatus {
        let side = self.position.side_to_move();
        if self.position.legal_moves().is_empty() {
            return if self.position.in_check(side) {
                GameStatus::Checkmate {
                    winner: side.opposite(),
                }
            } else {
                GameStatus::Stalemate
            };
        }

        let reason = if insufficient_material(&self.position) {
            Some(DrawReason::InsufficientMaterial)
        } else if self.position.halfmove_clock() >= 100 {
            Some(DrawReason::FiftyMoveRule)
        } else if self.repetition_count() >= 3 {
            Some(DrawReason::ThreefoldRepetition)
        } else {
            None
        };

        reason.map_or(GameStatus::Ongoing, |reason| GameStatus::Draw { reason })
    }

    /// How often the current position has occurred.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions
            .get(&self.position.repetition_key())
            .copied()
            .unwrap_or(0)
    }

    /// Resolves a request to the legal move it names.
    ///
    /// A request without a promotion piece selects the queen promotion.
    pub fn resolve(&self, request: MoveRequest) -> Result<ChessMove, ChessMoveError> {
        let status = self.status();
        if status.is_over() {
            return Err(ChessMoveError::GameOver(status));
        }

        if let Some(kind) = request.promotion {
            if kind != PieceKind::Queen {
                return Err(ChessMoveError::UnsupportedPromotion(kind));
            }
        }

        match self.position.board().get(request.from) {
            None => return Err(ChessMoveError::NoPiece(request.from)),
            Some(piece) if piece.color != self.position.side_to_move() => {
                return Err(ChessMoveError::NotYourPiece(request.from));
            }
            Some(_) => {}
        }

        self.position
            .legal_moves()
            .into_iter()
            .find(|mv| {
                mv.from == request.from
                    && mv.to == request.to
                    && (request.promotion.is_none() || request.promotion == mv.promotion)
            })
            .ok_or(ChessMoveError::Illegal(request))
    }

    /// Plays a requested move. On error the game is unchanged.
    #[instrument(skip(self, request), fields(request = %request))]
    pub fn make_move(&mut self, request: MoveRequest) -> Result<ChessMove, ChessMoveError> {
        let mv = self.resolve(request)?;
        self.play(mv);
        Ok(mv)
    }

    /// Plays a move already known to be legal here.
    pub(crate) fn play(&mut self, mv: ChessMove) {
        self.position = self.position.after(&mv);
        self.history.push(mv);
        *self
            .repetitions
            .entry(self.position.repetition_key())
            .or_insert(0) += 1;
        debug!(mv = %mv, fen = %self.position.fen(), "Move played");
    }
}

/// Bare kings, a single minor piece, or bishops all on one square color.
fn insufficient_material(position: &Position) -> bool {
    let others: Vec<(Square, PieceKind)> = position
        .board()
        .pieces()
        .filter(|(_, p)| p.kind != PieceKind::King)
        .map(|(sq, p)| (sq, p.kind))
        .collect();

    match others.as_slice() {
        [] => true,
        [(_, kind)] => matches!(kind, PieceKind::Knight | PieceKind::Bishop),
        [(first, _), ..] => others
            .iter()
            .all(|(sq, kind)| *kind == PieceKind::Bishop && sq.is_dark() == first.is_dark()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &mut ChessGame, moves: &[&str]) {
        for uci in moves {
            game.make_move(uci.parse().unwrap()).unwrap();
        }
    }

    #[test]
    fn test_fools_mate() {
        let mut game = ChessGame::new();
        play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert_eq!(
            game.status(),
            GameStatus::Checkmate {
                winner: Color::Black
            }
        );
        assert!(game.is_check());
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn test_moves_after_mate_rejected() {
        let mut game = ChessGame::new();
        play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        let err = game.make_move("a2a3".parse().unwrap()).unwrap_err();
        assert!(matches!(err, ChessMoveError::GameOver(_)));
    }

    #[test]
    fn test_stalemate() {
        let game = ChessGame::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(game.status(), GameStatus::Stalemate);
    }

    #[test]
    fn test_insufficient_material() {
        for fen in [
            "8/8/8/4k3/8/8/8/4K3 w - - 0 1",
            "8/8/8/4k3/8/8/8/3NK3 w - - 0 1",
            "8/8/8/4k3/8/8/8/2B1K3 w - - 0 1",
            "8/8/8/2b1k3/8/8/8/2B1K3 w - - 0 1",
        ] {
            let game = ChessGame::from_fen(fen).unwrap();
            assert_eq!(
                game.status(),
                GameStatus::Draw {
                    reason: DrawReason::InsufficientMaterial
                },
                "{fen}"
            );
        }
    }

    #[test]
    fn test_sufficient_material() {
        for fen in [
            "8/8/8/4k3/8/8/8/3RK3 w - - 0 1",
            "8/8/8/4k3/8/8/8/2NNK3 w - - 0 1",
            "8/8/8/3bk3/8/8/8/2B1K3 w - - 0 1",
            "8/8/8/4k3/8/8/4P3/4K3 w - - 0 1",
        ] {
            let game = ChessGame::from_fen(fen).unwrap();
            assert_eq!(game.status(), GameStatus::Ongoing, "{fen}");
        }
    }

    #[test]
    fn test_fifty_move_rule() {
        let game = ChessGame::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 80").unwrap();
        assert_eq!(
            game.status(),
            GameStatus::Draw {
                reason: DrawReason::FiftyMoveRule
            }
        );
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn test_threefold_repetition() {
        let mut game = ChessGame::new();
        play(
            &mut game,
            &["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1"],
        );
        assert_eq!(game.status(), GameStatus::Ongoing);
        play(&mut game, &["f6g8"]);
        assert_eq!(game.repetition_count(), 3);
        assert_eq!(
            game.status(),
            GameStatus::Draw {
                reason: DrawReason::ThreefoldRepetition
            }
        );
    }

    #[test]
    fn test_illegal_move_leaves_game_unchanged() {
        let mut game = ChessGame::new();
        let before = game.clone();

        let err = game.make_move("e2e5".parse().unwrap()).unwrap_err();
        assert!(matches!(err, ChessMoveError::Illegal(_)));
        let err = game.make_move("e7e5".parse().unwrap()).unwrap_err();
        assert!(matches!(err, ChessMoveError::NotYourPiece(_)));
        let err = game.make_move("e3e4".parse().unwrap()).unwrap_err();
        assert!(matches!(err, ChessMoveError::NoPiece(_)));

        assert_eq!(game, before);
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        let mut game = ChessGame::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let mv = game.make_move("a7a8".parse().unwrap()).unwrap();
        assert_eq!(mv.promotion, Some(PieceKind::Queen));
        assert!(game.fen().starts_with("Q6k/"));
    }

    #[test]
    fn test_underpromotion_rejected() {
        let mut game = ChessGame::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let err = game.make_move("a7a8n".parse().unwrap()).unwrap_err();
        assert_eq!(err, ChessMoveError::UnsupportedPromotion(PieceKind::Knight));
    }

    #[test]
    fn test_status_serializes_tagged() {
        let json = serde_json::to_value(GameStatus::Checkmate {
            winner: Color::White,
        })
        .unwrap();
        assert_eq!(json["state"], "checkmate");
        assert_eq!(json["winner"], "white");
    }
}
