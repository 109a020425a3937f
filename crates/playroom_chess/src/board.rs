//! Piece placement.

use super::types::{Color, Piece, PieceKind, Square};

/// 64 squares of optional pieces, indexed by [`Square::index`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Self {
            squares: [None; 64],
        }
    }

    /// The standard starting layout.
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for (file, kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            for (color, back, pawns) in [(Color::White, 0, 1), (Color::Black, 7, 6)] {
                if let Some(sq) = Square::from_coords(file, back) {
                    board.set(sq, Some(Piece::new(color, *kind)));
                }
                if let Some(sq) = Square::from_coords(file, pawns) {
                    board.set(sq, Some(Piece::new(color, PieceKind::Pawn)));
                }
            }
        }
        board
    }

    /// Piece on a square.
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    /// Puts (or clears) a piece on a square.
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.index()] = piece;
    }

    /// Removes and returns the piece on a square.
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()].take()
    }

    /// Every occupied square with its piece, in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.get(sq).map(|p| (sq, p)))
    }

    /// Square of the given side's king.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| *p == Piece::new(color, PieceKind::King))
            .map(|(sq, _)| sq)
    }

    /// Rows from rank 8 down to rank 1, files a to h, as `wP`/`bK` codes.
    pub fn grid(&self) -> Vec<Vec<Option<String>>> {
        (0..8u8)
            .rev()
            .map(|rank| {
                (0..8u8)
                    .map(|file| {
                        Square::from_coords(file, rank)
                            .and_then(|sq| self.get(sq))
                            .map(Piece::code)
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}
