//! Perfect-play properties of the minimax opponent.

use playroom_tictactoe::{AnyGame, Outcome, Player, Position, best_move, scored_moves};

/// Plays every possible X line against the AI and returns the worst result for O.
fn explore(game: &AnyGame, games: &mut usize) -> Result<(), String> {
    if let Some(outcome) = game.outcome() {
        *games += 1;
        return match outcome {
            Outcome::Winner(Player::X) => Err(format!("AI lost: {:?}", game.history())),
            _ => Ok(()),
        };
    }

    for pos in game.valid_moves() {
        let mut next = game.clone();
        next.place(pos).unwrap();

        if !next.is_over() {
            let reply = best_move(next.board(), Player::O).unwrap();
            next.place(reply).unwrap();
        }

        explore(&next, games)?;
    }

    Ok(())
}

#[test]
fn test_ai_never_loses_as_second_player() {
    let mut games = 0;
    explore(&AnyGame::new(), &mut games).unwrap();
    assert!(games > 0);
}

#[test]
fn test_center_then_opposite_corners() {
    let mut game = AnyGame::new();

    game.place(Position::Center).unwrap();
    let reply = best_move(game.board(), Player::O).unwrap();
    game.place(reply).unwrap();

    // X takes the corner opposite to O's reply if it was a corner,
    // otherwise any free corner.
    let corner = match reply {
        Position::TopLeft => Position::BottomRight,
        Position::TopRight => Position::BottomLeft,
        Position::BottomLeft => Position::TopRight,
        Position::BottomRight => Position::TopLeft,
        _ => Position::TopLeft,
    };

    let mut script = vec![corner];
    while !game.is_over() {
        let pos = script
            .pop()
            .or_else(|| game.valid_moves().first().copied())
            .unwrap();
        if game.board().is_empty(pos) {
            game.place(pos).unwrap();
        } else {
            continue;
        }
        if !game.is_over() {
            let reply = best_move(game.board(), Player::O).unwrap();
            game.place(reply).unwrap();
        }
    }

    assert_ne!(game.outcome(), Some(Outcome::Winner(Player::X)));
}

#[test]
fn test_ai_punishes_mistake() {
    let mut game = AnyGame::new();
    // X plays an edge, O answers, X ignores the threat.
    game.place(Position::TopCenter).unwrap();
    let reply = best_move(game.board(), Player::O).unwrap();
    game.place(reply).unwrap();

    while !game.is_over() {
        let pos = game.valid_moves()[0];
        game.place(pos).unwrap();
        if !game.is_over() {
            let reply = best_move(game.board(), Player::O).unwrap();
            game.place(reply).unwrap();
        }
    }

    assert_ne!(game.outcome(), Some(Outcome::Winner(Player::X)));
}

#[test]
fn test_opening_move_is_maximal() {
    let board = AnyGame::new().board().clone();
    let scored = scored_moves(&board, Player::X).unwrap();
    let top = scored.iter().map(|(_, s)| *s).max().unwrap();
    let chosen = best_move(&board, Player::X).unwrap();
    let maximal: Vec<_> = scored
        .iter()
        .filter(|(_, s)| *s == top)
        .map(|(p, _)| *p)
        .collect();
    assert!(maximal.contains(&chosen));
}
