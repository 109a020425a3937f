//! Session controller behaviour for both games.

use playroom::{
    ChessOpponent, GameOutcome, GameSession, MinimaxOpponent, Mode, MoveReport, SessionError,
    SessionState, TurnBasedGame,
};
use playroom_chess::{ChessGame, Color, Difficulty, MoveRequest};
use playroom_tictactoe::{AnyGame, Player, Position};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn tictactoe(mode: Mode) -> GameSession<AnyGame, MinimaxOpponent> {
    GameSession::new(
        AnyGame::new(),
        mode,
        Player::O,
        MinimaxOpponent,
        StdRng::seed_from_u64(1),
    )
    .unwrap()
}

fn cell(index: usize) -> Position {
    Position::from_index(index).unwrap()
}

/// Plays every possible human line against the computer.
fn explore(session: &GameSession<AnyGame, MinimaxOpponent>, games: &mut usize) {
    match session.state() {
        SessionState::Terminal(outcome) => {
            assert_ne!(outcome, GameOutcome::Win(Player::X), "{:?}", session.game());
            *games += 1;
        }
        SessionState::AwaitingMove(side) => {
            assert_eq!(side, Player::X);
            for mv in session.game().legal_moves() {
                let mut next = session.clone();
                next.apply_move(mv).unwrap();
                explore(&next, games);
            }
        }
    }
}

#[test]
fn test_computer_never_loses() {
    let mut games = 0;
    explore(&tictactoe(Mode::VsAi), &mut games);
    assert!(games > 0);
}

#[test]
fn test_center_then_opposite_corners() {
    let mut session = tictactoe(Mode::VsAi);
    session.apply_move(Position::Center).unwrap();

    // Take the corner opposite whichever corner the computer chose, if any.
    let reply = session.last_ai_move().unwrap();
    let corner = match reply {
        Position::TopLeft => Position::BottomRight,
        Position::TopRight => Position::BottomLeft,
        Position::BottomLeft => Position::TopRight,
        Position::BottomRight => Position::TopLeft,
        _ => Position::TopLeft,
    };
    if session.game().board().is_empty(corner) {
        session.apply_move(corner).unwrap();
    }

    while let SessionState::AwaitingMove(_) = session.state() {
        let mv = session.game().legal_moves()[0];
        session.apply_move(mv).unwrap();
    }
    assert!(matches!(
        session.outcome(),
        GameOutcome::Draw | GameOutcome::Win(Player::O)
    ));
}

#[test]
fn test_finished_game_ignores_moves() {
    let mut session = tictactoe(Mode::Pvp);
    for index in [0, 3, 1, 4, 2] {
        session.apply_move(cell(index)).unwrap();
    }
    assert_eq!(session.outcome(), GameOutcome::Win(Player::X));
    let board = session.game().board().clone();

    for index in [5, 8, 0] {
        let report = session.apply_move(cell(index)).unwrap();
        assert_eq!(report, MoveReport::AlreadyOver(GameOutcome::Win(Player::X)));
    }
    assert_eq!(session.game().board(), &board);
    assert_eq!(session.outcome(), GameOutcome::Win(Player::X));
}

#[test]
fn test_occupied_cell_is_illegal() {
    let mut session = tictactoe(Mode::VsAi);
    session.apply_move(Position::Center).unwrap();
    let before = session.game().clone();

    let err = session.apply_move(Position::Center).unwrap_err();
    assert!(matches!(err, SessionError::IllegalMove(_)));
    assert_eq!(session.game(), &before);
}

#[test]
fn test_turns_alternate_in_pvp() {
    let mut session = tictactoe(Mode::Pvp);
    for (i, index) in [4, 0, 8, 2, 1, 7, 3].into_iter().enumerate() {
        let expected = if i % 2 == 0 { Player::X } else { Player::O };
        assert_eq!(session.state(), SessionState::AwaitingMove(expected));
        let report = session.apply_move(cell(index)).unwrap();
        assert_eq!(report, MoveReport::Applied { ai_reply: None });
    }
}

#[test]
fn test_reset_after_finish() {
    let mut session = tictactoe(Mode::Pvp);
    for index in [0, 3, 1, 4, 2] {
        session.apply_move(cell(index)).unwrap();
    }
    session.reset().unwrap();
    assert_eq!(session.state(), SessionState::AwaitingMove(Player::X));
    assert!(matches!(
        session.apply_move(Position::Center).unwrap(),
        MoveReport::Applied { .. }
    ));
}

#[test]
fn test_chess_vs_computer() {
    let mut session = GameSession::new(
        ChessGame::new(),
        Mode::VsAi,
        Color::Black,
        ChessOpponent::new(Difficulty::Easy),
        StdRng::seed_from_u64(9),
    )
    .unwrap();

    let report = session.apply_move("e2e4".parse::<MoveRequest>().unwrap()).unwrap();
    let MoveReport::Applied { ai_reply: Some(_) } = report else {
        panic!("expected a computer reply, got {report:?}");
    };
    assert_eq!(session.game().history().len(), 2);
    assert_eq!(session.state(), SessionState::AwaitingMove(Color::White));
}

#[test]
fn test_chess_illegal_move_unchanged() {
    let mut session = GameSession::new(
        ChessGame::new(),
        Mode::Pvp,
        Color::Black,
        ChessOpponent::default(),
        StdRng::seed_from_u64(9),
    )
    .unwrap();
    let before = session.game().fen();

    let err = session
        .apply_move("e1e2".parse::<MoveRequest>().unwrap())
        .unwrap_err();
    assert!(matches!(err, SessionError::IllegalMove(_)));
    assert_eq!(session.game().fen(), before);
}

#[test]
fn test_chess_checkmate_is_terminal() {
    let mut session = GameSession::new(
        ChessGame::new(),
        Mode::Pvp,
        Color::Black,
        ChessOpponent::default(),
        StdRng::seed_from_u64(9),
    )
    .unwrap();
    for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        session.apply_move(uci.parse().unwrap()).unwrap();
    }
    assert_eq!(
        session.state(),
        SessionState::Terminal(GameOutcome::Win(Color::Black))
    );
    assert_eq!(
        session.apply_move("a2a3".parse().unwrap()).unwrap(),
        MoveReport::AlreadyOver(GameOutcome::Win(Color::Black))
    );
}
