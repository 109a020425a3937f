//! Logical properties that hold throughout a tic-tac-toe game.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together.
///
/// Implemented for tuples of [`Invariant`]s.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect<S>(
    checks: &[(fn(&S) -> bool, &'static str)],
    state: &S,
) -> Result<(), Vec<InvariantViolation>> {
    let violations: Vec<_> = checks
        .iter()
        .filter(|(holds, _)| !holds(state))
        .map(|(_, description)| InvariantViolation::new(*description))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let checks: [(fn(&S) -> bool, &'static str); 3] = [
            (I1::holds, I1::description()),
            (I2::holds, I2::description()),
            (I3::holds, I3::description()),
        ];
        collect(&checks, state)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let checks: [(fn(&S) -> bool, &'static str); 2] = [
            (I1::holds, I1::description()),
            (I2::holds, I2::description()),
        ];
        collect(&checks, state)
    }
}

pub mod alternating_turn;
pub mod history_consistent;
pub mod monotonic_board;

pub use alternating_turn::AlternatingTurnInvariant;
pub use history_consistent::HistoryConsistentInvariant;
pub use monotonic_board::MonotonicBoardInvariant;

/// All tic-tac-toe invariants as a composable set.
pub type TicTacToeInvariants = (
    MonotonicBoardInvariant,
    AlternatingTurnInvariant,
    HistoryConsistentInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameInProgress, GameResult, GameSetup, Move, Player, Position, Square};

    #[test]
    fn test_invariant_set_holds_for_empty_game() {
        let game = GameSetup::new().start(Player::X);
        assert!(TicTacToeInvariants::check_all(&game).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let moves = vec![
            Move::new(Player::X, Position::TopLeft),
            Move::new(Player::O, Position::Center),
            Move::new(Player::X, Position::TopRight),
        ];

        match GameInProgress::replay(&moves) {
            Ok(GameResult::InProgress(game)) => {
                assert!(TicTacToeInvariants::check_all(&game).is_ok())
            }
            other => panic!("Expected in-progress game, got {:?}", other),
        }
    }

    #[test]
    fn test_invariant_set_reports_each_violation() {
        let game = GameSetup::new().start(Player::X);
        let Ok(GameResult::InProgress(mut game)) =
            game.make_move(Move::new(Player::X, Position::Center))
        else {
            panic!("Expected in-progress game");
        };

        // An extra mark breaks both the replayed board and the history count.
        game.board.set(Position::TopLeft, Square::Occupied(Player::O));

        let violations = TicTacToeInvariants::check_all(&game).unwrap_err();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_two_invariants_as_set() {
        let game = GameSetup::new().start(Player::X);
        type TwoInvariants = (MonotonicBoardInvariant, AlternatingTurnInvariant);
        assert!(TwoInvariants::check_all(&game).is_ok());
    }
}
