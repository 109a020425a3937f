//! Alternating turn invariant: players alternate X, O, X, O, ...

use super::Invariant;
use crate::{GameInProgress, Player};

/// Invariant: Players alternate turns, X first.
pub struct AlternatingTurnInvariant;

impl Invariant<GameInProgress> for AlternatingTurnInvariant {
    fn holds(game: &GameInProgress) -> bool {
        let history = game.history();

        let alternates = history
            .iter()
            .enumerate()
            .all(|(ply, mov)| mov.player == expected_for_ply(ply));

        alternates && game.to_move() == expected_for_ply(history.len())
    }

    fn description() -> &'static str {
        "Players alternate turns (X, O, X, O, ...)"
    }
}

fn expected_for_ply(ply: usize) -> Player {
    if ply % 2 == 0 { Player::X } else { Player::O }
}
