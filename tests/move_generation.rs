use itertools::Itertools;
use pretty_assertions::assert_eq;
use regicide::chess::core::Move;
use regicide::chess::game::Game;
use regicide::chess::perft::perft;
use regicide::chess::position::Position;
use shakmaty::{CastlingMode, Chess, Position as ShakmatyPosition};

fn setup(input: &str) -> Position {
    Position::try_from(input).expect("parsing legal position: {input}")
}

fn get_moves(position: &mut Position) -> Vec<String> {
    position
        .generate_moves()
        .iter()
        .map(Move::to_string)
        .sorted()
        .collect::<Vec<_>>()
}

fn sorted_moves(moves: &[&str]) -> Vec<String> {
    moves
        .iter()
        .map(|m| (*m).to_string())
        .sorted()
        .collect::<Vec<_>>()
}

fn shakmaty_position(input: &str) -> Chess {
    let setup: shakmaty::fen::Fen = input.parse().expect("shakmaty should parse {input}");
    setup
        .into_position(CastlingMode::Standard)
        .expect("shakmaty should accept {input}")
}

fn shakmaty_moves(input: &str) -> Vec<String> {
    shakmaty_position(input)
        .legal_moves()
        .iter()
        .map(|m| m.to_uci(CastlingMode::Standard).to_string())
        .sorted()
        .collect::<Vec<_>>()
}

// Positions without castling rights: there the rules are exactly the standard
// ones and shakmaty serves as the reference.
const CASTLING_FREE_POSITIONS: [&str; 12] = [
    "2n4k/1PP5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 w - e6 0 1",
    "3kn3/R2p4/8/6B1/8/6K1/3R4/8 b - - 0 1",
    "2R5/8/6k1/8/8/8/PPn5/KR6 w - - 0 1",
    "6qk/8/8/3Pp3/8/8/K7/8 w - e6 0 1",
    "k7/1p6/8/8/8/8/8/4K2B b - - 0 1",
    "2r3r1/3p3k/1p3pp1/1B5P/5P2/2P1pqP1/PP4KP/3R4 w - - 0 34",
    "2r3r1/P3k3/pp3p2/1B5p/5P2/2P3pP/PP4KP/3R4 w - - 0 1",
    "2r3r1/p3k3/pp3p2/1B5p/5P2/2pqp1P1/PPK4P/3R4 w - - 0 34",
    "r3k3/r7/8/5pP1/5QKN/8/8/6RR w - f6 0 1",
    "4k1r1/8/8/4PpP1/6K1/8/8/8 w - f6 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
];

#[test]
fn starting_moves() {
    assert_eq!(
        get_moves(&mut Position::starting()),
        sorted_moves(&[
            "a2a3", "a2a4", "b1a3", "b1c3", "b2b3", "b2b4", "c2c3", "c2c4", "d2d3", "d2d4", "e2e3",
            "e2e4", "f2f3", "f2f4", "g1f3", "g1h3", "g2g3", "g2g4", "h2h3", "h2h4"
        ])
    );
}

#[test]
fn same_moves_as_shakmaty() {
    for input in CASTLING_FREE_POSITIONS {
        assert_eq!(get_moves(&mut setup(input)), shakmaty_moves(input), "{input}");
    }
}

#[test]
fn double_check_evasions() {
    assert_eq!(
        get_moves(&mut setup("3kn3/R2p1N2/8/8/7B/6K1/3R4/8 b - - 0 1")),
        sorted_moves(&["d8c8"])
    );
    assert_eq!(
        get_moves(&mut setup("8/5Nk1/7p/4Bp2/3q4/8/8/5KR1 b - - 0 1")),
        sorted_moves(&["g7f8", "g7f7", "g7h7"])
    );
}

#[test]
fn pins() {
    // The pawn is pinned but can capture en passant.
    assert_eq!(
        get_moves(&mut setup("6qk/8/8/3Pp3/8/8/K7/8 w - e6 0 1")),
        sorted_moves(&["a2a1", "a2a3", "a2b1", "a2b2", "a2b3", "d5e6"])
    );
    // The pawn is pinned but there is no en passant: it can't move.
    assert_eq!(
        get_moves(&mut setup("6qk/8/8/3Pp3/8/8/K7/8 w - - 0 1")),
        sorted_moves(&["a2a1", "a2a3", "a2b1", "a2b2", "a2b3"])
    );
    // The pawn is pinned and can't move.
    assert_eq!(
        get_moves(&mut setup("k7/1p6/8/8/8/8/8/4K2B b - - 0 1")),
        sorted_moves(&["a8a7", "a8b8"])
    );
}

#[test]
fn en_passant_discovered_check() {
    // Taking en passant would expose the king along the rank.
    assert_eq!(
        get_moves(&mut setup("8/8/8/KPp4r/8/8/8/7k w - c6 0 1")),
        sorted_moves(&["a5a4", "a5a6", "a5b6", "b5b6"])
    );
}

#[test]
fn castle() {
    // Can castle both sides.
    assert_eq!(
        get_moves(&mut setup("r3k2r/8/8/8/8/8/6N1/4K3 b kq - 0 1")),
        sorted_moves(&[
            "a8a7", "a8a6", "a8a5", "a8a4", "a8a3", "a8a2", "a8a1", "a8b8", "a8c8", "a8d8", "h8f8",
            "h8g8", "h8h7", "h8h6", "h8h5", "h8h4", "h8h3", "h8h2", "h8h1", "e8e7", "e8d8", "e8d7",
            "e8f8", "e8f7", "e8c8", "e8g8"
        ])
    );
    // Castling short is not allowed: the king would land in check.
    assert_eq!(
        get_moves(&mut setup("r3k2r/8/8/8/8/8/6R1/4K3 b kq - 0 1")),
        sorted_moves(&[
            "a8a7", "a8a6", "a8a5", "a8a4", "a8a3", "a8a2", "a8a1", "a8b8", "a8c8", "a8d8", "h8f8",
            "h8g8", "h8h7", "h8h6", "h8h5", "h8h4", "h8h3", "h8h2", "h8h1", "e8e7", "e8d8", "e8d7",
            "e8f8", "e8f7", "e8c8"
        ])
    );
    // Castling long is not available.
    assert_eq!(
        get_moves(&mut setup("r3k2r/8/8/8/8/8/6R1/4K3 b k - 0 1")),
        sorted_moves(&[
            "a8a7", "a8a6", "a8a5", "a8a4", "a8a3", "a8a2", "a8a1", "a8b8", "a8c8", "a8d8", "h8f8",
            "h8g8", "h8h7", "h8h6", "h8h5", "h8h4", "h8h3", "h8h2", "h8h1", "e8e7", "e8d8", "e8d7",
            "e8f8", "e8f7"
        ])
    );
    // The attacked square is not the one king will walk through.
    assert_eq!(
        get_moves(&mut setup("r3k2r/8/8/8/8/8/1R6/4K3 b q - 0 1")),
        sorted_moves(&[
            "a8a7", "a8a6", "a8a5", "a8a4", "a8a3", "a8a2", "a8a1", "a8b8", "a8c8", "a8d8", "h8f8",
            "h8g8", "h8h7", "h8h6", "h8h5", "h8h4", "h8h3", "h8h2", "h8h1", "e8e7", "e8d8", "e8d7",
            "e8f8", "e8f7", "e8c8"
        ])
    );
    // Only the destination square of the king is checked: crossing the
    // attacked d8 is allowed.
    let input = "r3k2r/8/8/8/8/8/3R4/4K3 b kq - 0 1";
    let mut expected = shakmaty_moves(input);
    expected.push("e8c8".to_string());
    expected.sort();
    assert_eq!(get_moves(&mut setup(input)), expected);
}

#[test]
fn chess_programming_wiki_perft_positions() {
    // Positions from https://www.chessprogramming.org/Perft_Results with
    // depth=1.
    // "kiwipete"
    assert_eq!(
        get_moves(&mut setup(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
        ))
        .len(),
        48
    );
    // Position 3.
    assert_eq!(
        get_moves(&mut setup("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1")).len(),
        14,
    );
    // Position 4.
    assert_eq!(
        get_moves(&mut setup(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1"
        ))
        .len(),
        6
    );
    // Mirrored.
    assert_eq!(
        get_moves(&mut setup(
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1"
        ))
        .len(),
        6
    );
    // Position 5.
    assert_eq!(
        get_moves(&mut setup(
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8"
        ))
        .len(),
        44
    );
    // Position 6.
    assert_eq!(
        get_moves(&mut setup(
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10"
        ))
        .len(),
        46
    );
}

#[test]
fn perft_starting_position() {
    let mut game = Game::new(Position::starting());
    assert_eq!(perft(&mut game, 1), 20);
    assert_eq!(perft(&mut game, 2), 400);
    assert_eq!(perft(&mut game, 3), 8902);
}

#[test]
fn perft_endgame() {
    // Position 3 from https://www.chessprogramming.org/Perft_Results
    let mut game = Game::new(setup("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"));
    assert_eq!(perft(&mut game, 1), 14);
    assert_eq!(perft(&mut game, 2), 191);
    assert_eq!(perft(&mut game, 3), 2812);
}

#[test]
fn perft_matches_shakmaty() {
    for input in [
        "6qk/8/8/3Pp3/8/8/K7/8 w - e6 0 1",
        "2n4k/1PP5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 w - e6 0 1",
        "r3k3/r7/8/5pP1/5QKN/8/8/6RR w - f6 0 1",
    ] {
        let mut game = Game::new(setup(input));
        assert_eq!(
            perft(&mut game, 2),
            shakmaty::perft(&shakmaty_position(input), 2),
            "{input}"
        );
    }
}
