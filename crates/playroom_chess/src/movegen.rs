//! Move generation and attack detection.
//!
//! Moves are generated pseudo-legally per piece and then filtered by
//! playing each one and rejecting those that leave the mover's king
//! attacked.

use super::board::Board;
use super::moves::{ChessMove, MoveKind};
use super::position::Position;
use super::types::{Color, Piece, PieceKind, Square};

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

impl Board {
    /// True if any piece of color `by` attacks `target`.
    pub fn is_attacked(&self, target: Square, by: Color) -> bool {
        let holds = |sq: Option<Square>, kind: PieceKind| {
            sq.and_then(|sq| self.get(sq)) == Some(Piece::new(by, kind))
        };

        // A pawn of `by` attacks diagonally forward, so it sits one rank behind the target.
        if [-1, 1]
            .iter()
            .any(|df| holds(target.offset(*df, -by.forward()), PieceKind::Pawn))
        {
            return true;
        }

        if KNIGHT_STEPS
            .iter()
            .any(|(df, dr)| holds(target.offset(*df, *dr), PieceKind::Knight))
        {
            return true;
        }

        if KING_STEPS
            .iter()
            .any(|(df, dr)| holds(target.offset(*df, *dr), PieceKind::King))
        {
            return true;
        }

        self.slider_attacks(target, by, &ORTHOGONALS, PieceKind::Rook)
            || self.slider_attacks(target, by, &DIAGONALS, PieceKind::Bishop)
    }

    /// Walks each ray from `target` to the first piece and checks whether it
    /// is an enemy `kind` or queen.
    fn slider_attacks(&self, target: Square, by: Color, dirs: &[(i8, i8)], kind: PieceKind) -> bool {
        dirs.iter().any(|(df, dr)| {
            let mut cursor = target.offset(*df, *dr);
            while let Some(sq) = cursor {
                if let Some(piece) = self.get(sq) {
                    return piece.color == by
                        && (piece.kind == kind || piece.kind == PieceKind::Queen);
                }
                cursor = sq.offset(*df, *dr);
            }
            false
        })
    }
}

impl Position {
    /// True if `color`'s king is attacked.
    pub fn in_check(&self, color: Color) -> bool {
        self.board
            .king_square(color)
            .is_some_and(|king| self.board.is_attacked(king, color.opposite()))
    }

    /// All legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<ChessMove> {
        let side = self.side_to_move;
        self.pseudo_legal_moves()
            .into_iter()
            .filter(|mv| !self.after(mv).in_check(side))
            .collect()
    }

    /// Position after playing a move taken from [`Position::legal_moves`].
    pub fn after(&self, mv: &ChessMove) -> Position {
        let color = self.side_to_move;
        let mut next = self.clone();

        let moving = next.board.take(mv.from);
        match mv.kind {
            MoveKind::EnPassant => {
                next.board.set(Square::at(mv.to.file(), mv.from.rank()), None);
            }
            MoveKind::Castle => {
                let back = mv.from.rank();
                let (rook_from, rook_to) = if mv.to.file() == 6 { (7, 5) } else { (0, 3) };
                let rook = next.board.take(Square::at(rook_from, back));
                next.board.set(Square::at(rook_to, back), rook);
            }
            MoveKind::Normal | MoveKind::DoublePawnPush => {}
        }

        let placed = match mv.promotion {
            Some(kind) => Some(Piece::new(color, kind)),
            None => moving,
        };
        next.board.set(mv.to, placed);

        if mv.piece == PieceKind::King {
            next.castling.clear(color);
        }
        next.castling.clear_rook_square(mv.from);
        next.castling.clear_rook_square(mv.to);

        next.en_passant = match mv.kind {
            MoveKind::DoublePawnPush => mv.from.offset(0, color.forward()),
            _ => None,
        };

        next.halfmove_clock = if mv.piece == PieceKind::Pawn || mv.is_capture() {
            0
        } else {
            self.halfmove_clock + 1
        };
        if color == Color::Black {
            next.fullmove_number += 1;
        }
        next.side_to_move = color.opposite();

        next
    }

    fn pseudo_legal_moves(&self) -> Vec<ChessMove> {
        let side = self.side_to_move;
        let mut moves = Vec::with_capacity(48);

        for (from, piece) in self.board.pieces() {
            if piece.color != side {
                continue;
            }
            match piece.kind {
                PieceKind::Pawn => self.pawn_moves(from, &mut moves),
                PieceKind::Knight => self.step_moves(from, piece.kind, &KNIGHT_STEPS, &mut moves),
                PieceKind::King => self.step_moves(from, piece.kind, &KING_STEPS, &mut moves),
                PieceKind::Bishop => self.slide_moves(from, piece.kind, &DIAGONALS, &mut moves),
                PieceKind::Rook => self.slide_moves(from, piece.kind, &ORTHOGONALS, &mut moves),
                PieceKind::Queen => {
                    self.slide_moves(from, piece.kind, &DIAGONALS, &mut moves);
                    self.slide_moves(from, piece.kind, &ORTHOGONALS, &mut moves);
                }
            }
        }

        self.castling_moves(&mut moves);
        moves
    }

    fn pawn_moves(&self, from: Square, moves: &mut Vec<ChessMove>) {
        let side = self.side_to_move;
        let forward = side.forward();
        let start_rank = if side == Color::White { 1 } else { 6 };

        if let Some(one) = from.offset(0, forward) {
            if self.board.get(one).is_none() {
                push_pawn(from, one, None, side, moves);

                if from.rank() == start_rank {
                    if let Some(two) = from.offset(0, 2 * forward) {
                        if self.board.get(two).is_none() {
                            moves.push(ChessMove {
                                from,
                                to: two,
                                piece: PieceKind::Pawn,
                                captured: None,
                                promotion: None,
                                kind: MoveKind::DoublePawnPush,
                            });
                        }
                    }
                }
            }
        }

        for df in [-1, 1] {
            let Some(to) = from.offset(df, forward) else {
                continue;
            };
            match self.board.get(to) {
                Some(target) if target.color != side => {
                    push_pawn(from, to, Some(target.kind), side, moves);
                }
                None if self.en_passant == Some(to) => moves.push(ChessMove {
                    from,
                    to,
                    piece: PieceKind::Pawn,
                    captured: Some(PieceKind::Pawn),
                    promotion: None,
                    kind: MoveKind::EnPassant,
                }),
                _ => {}
            }
        }
    }

    fn step_moves(&self, from: Square, piece: PieceKind, steps: &[(i8, i8)], moves: &mut Vec<ChessMove>) {
        for (df, dr) in steps {
            let Some(to) = from.offset(*df, *dr) else {
                continue;
            };
            match self.board.get(to) {
                None => moves.push(normal(from, to, piece, None)),
                Some(target) if target.color != self.side_to_move => {
                    moves.push(normal(from, to, piece, Some(target.kind)))
                }
                Some(_) => {}
            }
        }
    }

    fn slide_moves(&self, from: Square, piece: PieceKind, dirs: &[(i8, i8)], moves: &mut Vec<ChessMove>) {
        for (df, dr) in dirs {
            let mut cursor = from.offset(*df, *dr);
            while let Some(to) = cursor {
                match self.board.get(to) {
                    None => moves.push(normal(from, to, piece, None)),
                    Some(target) => {
                        if target.color != self.side_to_move {
                            moves.push(normal(from, to, piece, Some(target.kind)));
                        }
                        break;
                    }
                }
                cursor = to.offset(*df, *dr);
            }
        }
    }

    fn castling_moves(&self, moves: &mut Vec<ChessMove>) {
        let side = self.side_to_move;
        let enemy = side.opposite();
        let back = side.back_rank();
        let king_from = Square::at(4, back);

        if self.board.get(king_from) != Some(Piece::new(side, PieceKind::King))
            || self.board.is_attacked(king_from, enemy)
        {
            return;
        }

        let rook = Some(Piece::new(side, PieceKind::Rook));
        let empty = |files: &[u8]| files.iter().all(|f| self.board.get(Square::at(*f, back)).is_none());
        let safe = |files: &[u8]| files.iter().all(|f| !self.board.is_attacked(Square::at(*f, back), enemy));

        if self.castling.kingside(side)
            && self.board.get(Square::at(7, back)) == rook
            && empty(&[5, 6])
            && safe(&[5, 6])
        {
            moves.push(castle(king_from, Square::at(6, back)));
        }

        if self.castling.queenside(side)
            && self.board.get(Square::at(0, back)) == rook
            && empty(&[1, 2, 3])
            && safe(&[2, 3])
        {
            moves.push(castle(king_from, Square::at(2, back)));
        }
    }
}

fn normal(from: Square, to: Square, piece: PieceKind, captured: Option<PieceKind>) -> ChessMove {
    ChessMove {
        from,
        to,
        piece,
        captured,
        promotion: None,
        kind: MoveKind::Normal,
    }
}

fn castle(from: Square, to: Square) -> ChessMove {
    ChessMove {
        from,
        to,
        piece: PieceKind::King,
        captured: None,
        promotion: None,
        kind: MoveKind::Castle,
    }
}

/// Pawn move, promoting to a queen on the last rank.
fn push_pawn(from: Square, to: Square, captured: Option<PieceKind>, side: Color, moves: &mut Vec<ChessMove>) {
    let promotion = (to.rank() == side.opposite().back_rank()).then_some(PieceKind::Queen);
    moves.push(ChessMove {
        from,
        to,
        piece: PieceKind::Pawn,
        captured,
        promotion,
        kind: MoveKind::Normal,
    });
}
