//! Implementation of chess rules and the state they operate on.

pub mod attacks;
pub mod castling;
pub mod core;
pub mod error;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod perft;
pub mod piece;
pub mod position;
