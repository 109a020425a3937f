//! Capture heuristic opponent behaviour.

use playroom_chess::{ChessGame, Difficulty, GameStatus, PieceKind, SearchError, choose_move};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_medium_takes_the_queen() {
    // The d4 pawn can take a knight on c5 or the queen on e5.
    let game = ChessGame::from_fen("4k3/8/8/2n1q3/3P4/8/8/K7 w - - 0 1").unwrap();
    for seed in 0..32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mv = choose_move(&game, Difficulty::Medium, &mut rng).unwrap();
        assert_eq!(mv.uci(), "d4e5");
        assert_eq!(mv.captured, Some(PieceKind::Queen));
    }
}

#[test]
fn test_medium_without_captures_plays_any_legal_move() {
    let game = ChessGame::new();
    let legal = game.legal_moves();
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mv = choose_move(&game, Difficulty::Medium, &mut rng).unwrap();
        assert!(legal.contains(&mv));
    }
}

#[test]
fn test_easy_plays_legal_moves() {
    let mut game = ChessGame::new();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..40 {
        if game.status().is_over() {
            break;
        }
        let mv = choose_move(&game, Difficulty::Easy, &mut rng).unwrap();
        assert!(game.legal_moves().contains(&mv));
        game.make_move(mv.request()).unwrap();
    }
}

#[test]
fn test_same_seed_same_choice() {
    let game = ChessGame::new();
    let pick = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        choose_move(&game, Difficulty::Easy, &mut rng).unwrap()
    };
    assert_eq!(pick(42), pick(42));
}

#[test]
fn test_no_move_after_game_over() {
    let game = ChessGame::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(
        choose_move(&game, Difficulty::Medium, &mut rng),
        Err(SearchError::GameOver(GameStatus::Stalemate))
    );
}

#[test]
fn test_difficulty_parses_case_insensitive() {
    assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
    assert_eq!(Difficulty::Easy.to_string(), "easy");
}
