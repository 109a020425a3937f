//! Move generator verification against published perft counts.

use playroom_chess::{Position, perft};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

#[test]
fn test_perft_starting_position() {
    let position = Position::starting();
    assert_eq!(perft(&position, 0), 1);
    assert_eq!(perft(&position, 1), 20);
    assert_eq!(perft(&position, 2), 400);
    assert_eq!(perft(&position, 3), 8902);
}

#[test]
fn test_perft_kiwipete() {
    let position = Position::from_fen(KIWIPETE).unwrap();
    assert_eq!(perft(&position, 1), 48);
    assert_eq!(perft(&position, 2), 2039);
}

#[test]
fn test_perft_rook_endgame() {
    let position = Position::from_fen(ENDGAME).unwrap();
    assert_eq!(perft(&position, 1), 14);
    assert_eq!(perft(&position, 2), 191);
    assert_eq!(perft(&position, 3), 2812);
}
