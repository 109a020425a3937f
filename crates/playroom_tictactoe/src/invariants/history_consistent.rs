//! History consistency invariant: history length matches occupied squares.

use super::Invariant;
use crate::{GameInProgress, Square};

/// Invariant: every occupied square has exactly one move in the history.
pub struct HistoryConsistentInvariant;

impl Invariant<GameInProgress> for HistoryConsistentInvariant {
    fn holds(game: &GameInProgress) -> bool {
        let occupied = game
            .board()
            .squares()
            .iter()
            .filter(|s| **s != Square::Empty)
            .count();

        game.history().len() == occupied
    }

    fn description() -> &'static str {
        "History length matches number of occupied squares"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameSetup, Player, Position};

    #[test]
    fn test_empty_game_holds() {
        let game = GameSetup::new().start(Player::X);
        assert!(HistoryConsistentInvariant::holds(&game));
    }

    #[test]
    fn test_unrecorded_mark_violates() {
        let mut game = GameSetup::new().start(Player::X);
        game.board.set(Position::BottomLeft, Square::Occupied(Player::X));
        assert!(!HistoryConsistentInvariant::holds(&game));
    }
}
