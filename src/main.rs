//! Line-driven driver around the rules core: reads commands from stdin and
//! prints the results. Useful for debugging and for checking move generation
//! against other engines.
//!
//! Commands:
//!
//! - `position startpos` or `position <fen>`: sets up a new game;
//! - `d`: dumps the board;
//! - `moves`: lists the legal moves;
//! - `move <uci>`: plays a move;
//! - `undo`: takes the last move back;
//! - `result`: prints the game result in PGN notation;
//! - `perft <depth>`: counts the leaf nodes, split by the first move;
//! - `quit`.

use std::io::{self, BufRead};

use anyhow::{bail, Context};
use itertools::Itertools;
use regicide::chess::game::Game;
use regicide::chess::perft;
use regicide::chess::position::Position;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    regicide::print_engine_info();
    let mut game = Game::new(Position::starting());
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read the command")?;
        let command = line.trim();
        if command == "quit" {
            break;
        }
        if let Err(e) = execute(&mut game, command) {
            println!("Error: {e:#}");
        }
    }
    Ok(())
}

fn execute(game: &mut Game, command: &str) -> anyhow::Result<()> {
    let (name, arguments) = command.split_once(' ').unwrap_or((command, ""));
    let arguments = arguments.trim();
    match name {
        "position" => {
            let position = match arguments {
                "startpos" => Position::starting(),
                fen => Position::try_from(fen).context("incorrect position")?,
            };
            *game = Game::new(position);
        },
        "d" => print!("{:?}", game.position()),
        "moves" => println!("{}", game.generate_moves().iter().join(" ")),
        "move" => {
            let next = game.position().parse_move(arguments)?;
            let played = game.play(&next)?;
            println!("played {played}");
        },
        "undo" => match game.take_back() {
            Some(taken_back) => println!("took back {taken_back}"),
            None => bail!("no moves to take back"),
        },
        "result" => println!("{}", game.classify()),
        "perft" => {
            let depth: u8 = arguments
                .parse()
                .with_context(|| format!("perft depth should be a number, got \"{arguments}\""))?;
            if depth == 0 {
                bail!("perft depth should be positive");
            }
            let split = perft::divide(game, depth);
            for (first, nodes) in &split {
                println!("{first}: {nodes}");
            }
            println!();
            println!(
                "Nodes searched: {}",
                split.iter().map(|(_, nodes)| nodes).sum::<u64>()
            );
        },
        "" => (),
        _ => bail!("unknown command: {command}"),
    }
    Ok(())
}
