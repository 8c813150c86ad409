//! [Perft] (*per*formance *t*esting) is a technique for checking correctness of
//! move generation (tested functions are generate move, make move and unmake
//! move).
//!
//! [Perft]: https://www.chessprogramming.org/Perft

use crate::chess::core::Move;
use crate::chess::game::Game;

/// Counts the leaf nodes of the legal move tree of the given depth.
pub fn perft(game: &mut Game, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = game.generate_moves();
    // Bulk counting: leaves do not have to be played.
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for next in moves {
        if game.play(&next).is_ok() {
            nodes += perft(game, depth - 1);
            let _ = game.take_back();
        }
    }
    nodes
}

/// Splits the [`perft`] count by the first move, a-la Stockfish "go perft".
pub fn divide(game: &mut Game, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let mut result = Vec::new();
    for next in game.generate_moves() {
        if let Ok(played) = game.play(&next) {
            result.push((played, perft(game, depth - 1)));
            let _ = game.take_back();
        }
    }
    result
}
