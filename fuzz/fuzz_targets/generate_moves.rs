#![no_main]
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use regicide::chess::game::Game;
use regicide::chess::position;
use shakmaty::{CastlingMode, Chess, Position};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut position) = position::Position::from_fen(input) else {
        return;
    };
    // Playing every legal move and taking it back leaves the board intact.
    let mut game = Game::new(position.clone());
    for next in game.generate_moves() {
        let _ = game.play(&next).expect("generated moves should be legal");
        let _ = game.take_back();
        assert_eq!(game.position().to_string(), position.to_string());
    }
    // Castling rules differ in the transit square, the rest has to match.
    if input.split_whitespace().nth(2).map_or(true, |rights| rights != "-") {
        return;
    }
    let Ok(shakmaty_setup) = input.parse::<shakmaty::fen::Fen>() else {
        return;
    };
    let Ok(shakmaty_position) = shakmaty_setup.into_position::<Chess>(CastlingMode::Standard)
    else {
        return;
    };
    assert_eq!(
        position
            .generate_moves()
            .iter()
            .map(ToString::to_string)
            .sorted()
            .collect::<Vec<_>>(),
        shakmaty_position
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .sorted()
            .collect::<Vec<_>>()
    );
});
