//! Move types and UCI coordinate notation.

use super::types::{PieceKind, Square};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a move changes the board beyond moving one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Plain move or capture.
    Normal,
    /// Pawn advances two squares and sets an en passant target.
    DoublePawnPush,
    /// Pawn captures a pawn that just passed it.
    EnPassant,
    /// King moves two squares and the rook jumps over it.
    Castle,
}

/// A fully described legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChessMove {
    /// Origin square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// Kind of the moving piece.
    pub piece: PieceKind,
    /// Kind of the captured piece, if any.
    pub captured: Option<PieceKind>,
    /// Promotion piece, always a queen when present.
    pub promotion: Option<PieceKind>,
    /// Special handling.
    pub kind: MoveKind,
}

impl ChessMove {
    /// The request that selects this move.
    pub fn request(&self) -> MoveRequest {
        MoveRequest {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }

    /// UCI coordinate notation, e.g. `e7e8q`.
    pub fn uci(&self) -> String {
        self.request().to_string()
    }

    /// True if the move removes an enemy piece.
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl std::fmt::Display for ChessMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.request())
    }
}

/// A move as a caller names it: two squares and an optional promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Origin square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// Requested promotion piece.
    #[serde(default)]
    pub promotion: Option<PieceKind>,
}

impl MoveRequest {
    /// Creates a request without a promotion piece.
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// Same request with a promotion piece.
    pub fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }
}

impl std::fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

/// Text that is not UCI coordinate notation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invalid move notation: {:?}", _0)]
pub struct MoveRequestError(pub String);

impl std::error::Error for MoveRequestError {}

impl FromStr for MoveRequest {
    type Err = MoveRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || MoveRequestError(s.to_string());
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(err());
        }

        let from = s[0..2].parse::<Square>().map_err(|_| err())?;
        let to = s[2..4].parse::<Square>().map_err(|_| err())?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceKind::from_letter(c) {
                Some(PieceKind::Pawn | PieceKind::King) | None => return Err(err()),
                kind => kind,
            },
        };

        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}
