//! Full position state and FEN interchange.

use super::board::Board;
use super::types::{Color, Piece, PieceKind, Square};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Which castling moves are still available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CastlingRights {
    /// White may castle on the king side.
    pub white_kingside: bool,
    /// White may castle on the queen side.
    pub white_queenside: bool,
    /// Black may castle on the king side.
    pub black_kingside: bool,
    /// Black may castle on the queen side.
    pub black_queenside: bool,
}

impl CastlingRights {
    /// All four rights.
    pub const ALL: Self = Self {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    /// King-side right for a color.
    pub fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    /// Queen-side right for a color.
    pub fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    pub(crate) fn clear(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Color::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }

    /// Drops the right tied to a rook's home square, if `sq` is one.
    pub(crate) fn clear_rook_square(&mut self, sq: Square) {
        match sq.index() {
            0 => self.white_queenside = false,
            7 => self.white_kingside = false,
            56 => self.black_queenside = false,
            63 => self.black_kingside = false,
            _ => {}
        }
    }

    fn fen(&self) -> String {
        let mut s = String::new();
        for (flag, c) in [
            (self.white_kingside, 'K'),
            (self.white_queenside, 'Q'),
            (self.black_kingside, 'k'),
            (self.black_queenside, 'q'),
        ] {
            if flag {
                s.push(c);
            }
        }
        if s.is_empty() {
            s.push('-');
        }
        s
    }
}

/// A position: placement plus side to move, castling rights, en passant
/// target and move clocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

/// Malformed FEN text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum FenError {
    /// Fewer than four space-separated fields.
    #[display("FEN needs at least 4 fields, found {}", _0)]
    MissingFields(usize),
    /// Placement field is not eight ranks of eight files.
    #[display("Invalid piece placement: {}", _0)]
    Placement(String),
    /// Side to move is not `w` or `b`.
    #[display("Invalid side to move: {}", _0)]
    SideToMove(String),
    /// Castling field has an unknown letter.
    #[display("Invalid castling rights: {}", _0)]
    Castling(String),
    /// En passant field is not `-` or a square.
    #[display("Invalid en passant square: {}", _0)]
    EnPassant(String),
    /// A move counter is not a number.
    #[display("Invalid move counter: {}", _0)]
    Counter(String),
    /// A side has no king or more than one.
    #[display("Each side needs exactly one king")]
    Kings,
    /// En passant square that no double pawn push could have produced.
    #[display("No pawn could have just passed over {}", _0)]
    EnPassantTarget(Square),
    /// The side that just moved left its own king attacked.
    #[display("The side not to move is in check")]
    OpponentInCheck,
    /// A pawn stands on the first or eighth rank.
    #[display("Pawn on back rank at {}", _0)]
    PawnOnBackRank(Square),
}

impl std::error::Error for FenError {}

impl Position {
    /// The standard starting position.
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Parses FEN. The two move counters may be omitted.
    #[instrument]
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(FenError::MissingFields(fields.len()));
        }

        let board = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        let mut castling = CastlingRights::default();
        if fields[2] != "-" {
            for c in fields[2].chars() {
                match c {
                    'K' => castling.white_kingside = true,
                    'Q' => castling.white_queenside = true,
                    'k' => castling.black_kingside = true,
                    'q' => castling.black_queenside = true,
                    _ => return Err(FenError::Castling(fields[2].to_string())),
                }
            }
        }

        let en_passant = match fields[3] {
            "-" => None,
            sq => Some(
                sq.parse::<Square>()
                    .map_err(|_| FenError::EnPassant(sq.to_string()))?,
            ),
        };

        let counter = |idx: usize, default: u32| -> Result<u32, FenError> {
            fields.get(idx).map_or(Ok(default), |s| {
                s.parse().map_err(|_| FenError::Counter(s.to_string()))
            })
        };
        let halfmove_clock = counter(4, 0)?;
        let fullmove_number = counter(5, 1)?.max(1);

        for color in [Color::White, Color::Black] {
            let kings = board
                .pieces()
                .filter(|(_, p)| *p == Piece::new(color, PieceKind::King))
                .count();
            if kings != 1 {
                return Err(FenError::Kings);
            }
        }

        let mut position = Self {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        };
        position.sanitize_castling();
        position.check_reachable()?;
        Ok(position)
    }

    /// Serializes to FEN.
    pub fn fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.placement(),
            self.side_to_move.fen_char(),
            self.castling.fen(),
            self.en_passant
                .map_or_else(|| "-".to_string(), |sq| sq.to_string()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Key identifying a position for repetition counting.
    ///
    /// The en passant square only counts when a pawn could actually take there.
    pub(crate) fn repetition_key(&self) -> String {
        let ep = self
            .en_passant
            .filter(|sq| self.en_passant_capturable(*sq))
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{} {} {} {}",
            self.placement(),
            self.side_to_move.fen_char(),
            self.castling.fen(),
            ep
        )
    }

    /// Rejects placements that play can never reach.
    fn check_reachable(&self) -> Result<(), FenError> {
        if let Some((sq, _)) = self
            .board
            .pieces()
            .find(|(sq, p)| p.kind == PieceKind::Pawn && (sq.rank() == 0 || sq.rank() == 7))
        {
            return Err(FenError::PawnOnBackRank(sq));
        }
        if let Some(target) = self.en_passant {
            if !self.en_passant_plausible(target) {
                return Err(FenError::EnPassantTarget(target));
            }
        }
        if self.in_check(self.side_to_move.opposite()) {
            return Err(FenError::OpponentInCheck);
        }
        Ok(())
    }

    /// The target must sit behind an enemy pawn that just advanced two ranks.
    fn en_passant_plausible(&self, target: Square) -> bool {
        let side = self.side_to_move;
        let expected_rank = match side {
            Color::White => 5,
            Color::Black => 2,
        };
        let empty = |sq: Option<Square>| sq.is_some_and(|sq| self.board.get(sq).is_none());
        let pushed = target.offset(0, -side.forward());
        target.rank() == expected_rank
            && empty(Some(target))
            && empty(target.offset(0, side.forward()))
            && pushed.is_some_and(|sq| {
                self.board.get(sq) == Some(Piece::new(side.opposite(), PieceKind::Pawn))
            })
    }

    fn en_passant_capturable(&self, target: Square) -> bool {
        let side = self.side_to_move;
        let pawn = Some(Piece::new(side, PieceKind::Pawn));
        [-1i8, 1]
            .iter()
            .filter_map(|df| target.offset(*df, -side.forward()))
            .any(|sq| self.board.get(sq) == pawn)
    }

    fn placement(&self) -> String {
        let mut out = String::new();
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let piece = Square::from_coords(file, rank).and_then(|sq| self.board.get(sq));
                match piece {
                    Some(p) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(p.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }

    /// Drops castling rights whose king or rook is not on its home square.
    fn sanitize_castling(&mut self) {
        for color in [Color::White, Color::Black] {
            let back = color.back_rank();
            let at = |file: u8| Square::from_coords(file, back).and_then(|sq| self.board.get(sq));
            let king_home = at(4) == Some(Piece::new(color, PieceKind::King));
            let rook = Some(Piece::new(color, PieceKind::Rook));
            let kingside = king_home && at(7) == rook;
            let queenside = king_home && at(0) == rook;
            match color {
                Color::White => {
                    self.castling.white_kingside &= kingside;
                    self.castling.white_queenside &= queenside;
                }
                Color::Black => {
                    self.castling.black_kingside &= kingside;
                    self.castling.black_queenside &= queenside;
                }
            }
        }
    }

    /// Piece placement.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Castling rights.
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// En passant target square, if the last move was a double pawn push.
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Plies since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Full move number, starting at 1 and incremented after Black moves.
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

fn parse_placement(field: &str) -> Result<Board, FenError> {
    let err = || FenError::Placement(field.to_string());
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(err());
    }

    let mut board = Board::empty();
    for (row, text) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file: u8 = 0;
        for c in text.chars() {
            if let Some(skip) = c.to_digit(10) {
                if skip == 0 || skip > 8 {
                    return Err(err());
                }
                file += skip as u8;
            } else {
                let piece = Piece::from_fen_char(c).ok_or_else(err)?;
                let sq = Square::from_coords(file, rank).ok_or_else(err)?;
                board.set(sq, Some(piece));
                file += 1;
            }
            if file > 8 {
                return Err(err());
            }
        }
        if file != 8 {
            return Err(err());
        }
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_fen_round_trip() {
        let position = Position::from_fen(STARTING_FEN).unwrap();
        assert_eq!(position, Position::starting());
        assert_eq!(position.fen(), STARTING_FEN);
    }

    #[test]
    fn test_counters_optional() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(position.side_to_move(), Color::Black);
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_number(), 1);
        assert_eq!(position.fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn test_rejects_malformed_fen() {
        assert_eq!(
            Position::from_fen("8/8/8 w - -"),
            Err(FenError::Placement("8/8/8".to_string()))
        );
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 x - -"),
            Err(FenError::SideToMove(_))
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w X -"),
            Err(FenError::Castling(_))
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - z9"),
            Err(FenError::EnPassant(_))
        ));
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/4K3 w - -"),
            Err(FenError::Kings)
        );
        assert_eq!(Position::from_fen("8/8"), Err(FenError::MissingFields(1)));
    }

    #[test]
    fn test_rejects_en_passant_on_wrong_rank() {
        // e4 is a rank-4 square with White to move; d3xe4 would remove the king.
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/3PK3/8/8 w - e4 0 1"),
            Err(FenError::EnPassantTarget("e4".parse().unwrap()))
        );
        // Right rank for the wrong side.
        assert!(matches!(
            Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 b - d6 0 1"),
            Err(FenError::EnPassantTarget(_))
        ));
    }

    #[test]
    fn test_rejects_en_passant_without_pushed_pawn() {
        // Nothing on d5.
        assert!(matches!(
            Position::from_fen("4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1"),
            Err(FenError::EnPassantTarget(_))
        ));
        // Own pawn on d5.
        assert!(matches!(
            Position::from_fen("4k3/8/8/3PP3/8/8/8/4K3 w - d6 0 1"),
            Err(FenError::EnPassantTarget(_))
        ));
        // Target square occupied.
        assert!(matches!(
            Position::from_fen("4k3/8/3n4/3pP3/8/8/8/4K3 w - d6 0 1"),
            Err(FenError::EnPassantTarget(_))
        ));
        // Origin square occupied.
        assert!(matches!(
            Position::from_fen("4k3/3n4/8/3pP3/8/8/8/4K3 w - d6 0 1"),
            Err(FenError::EnPassantTarget(_))
        ));
    }

    #[test]
    fn test_accepts_real_en_passant() {
        let position = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(position.en_passant(), Some("d6".parse().unwrap()));
        let position = Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        )
        .unwrap();
        assert_eq!(position.en_passant(), Some("e3".parse().unwrap()));
    }

    #[test]
    fn test_rejects_opponent_in_check() {
        // Black to move while the white king on e1 is attacked by the a1 rook.
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/r3K3 b - - 0 1"),
            Err(FenError::OpponentInCheck)
        );
        // Being in check on your own move is fine.
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").is_ok());
    }

    #[test]
    fn test_rejects_pawn_on_back_rank() {
        assert_eq!(
            Position::from_fen("P3k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::PawnOnBackRank("a8".parse().unwrap()))
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K2p w - - 0 1"),
            Err(FenError::PawnOnBackRank("h1".parse().unwrap()))
        );
    }

    #[test]
    fn test_castling_rights_follow_pieces() {
        // White rook missing from h1.
        let position =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K3 w KQkq - 0 1").unwrap();
        assert!(!position.castling().white_kingside);
        assert!(position.castling().white_queenside);
        assert!(position.castling().black_kingside);
    }

    #[test]
    fn test_repetition_key_ignores_dead_en_passant() {
        let position = Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        )
        .unwrap();
        assert!(position.repetition_key().ends_with(" -"));

        let live = Position::from_fen(
            "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3",
        )
        .unwrap();
        assert!(live.repetition_key().ends_with(" e3"));
    }
}
