//! Game outcome and the move history needed to take moves back exactly.

use std::fmt;

use crate::chess::core::{Move, Player};
use crate::chess::error::MoveError;
use crate::chess::piece::{PieceFlags, PieceId};
use crate::chess::position::Position;

/// Classification of a position from the point of view of the rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// The side to move has at least one legal move.
    Ongoing,
    /// Stalemate: no legal moves and no check.
    Draw,
    /// Checkmate.
    Decisive {
        #[allow(missing_docs)]
        winner: Player,
    },
}

impl fmt::Display for GameResult {
    /// Prints the result in PGN notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ongoing => "*",
            Self::Draw => "1/2-1/2",
            Self::Decisive {
                winner: Player::White,
            } => "1-0",
            Self::Decisive {
                winner: Player::Black,
            } => "0-1",
        })
    }
}

impl Position {
    /// Decides whether the game is over for the side to move.
    #[must_use]
    pub fn classify(&mut self) -> GameResult {
        if !self.generate_moves().is_empty() {
            GameResult::Ongoing
        } else if self.in_check() {
            GameResult::Decisive {
                winner: self.side_to_move.opponent(),
            }
        } else {
            GameResult::Draw
        }
    }
}

#[derive(Clone, Debug)]
struct HistoryEntry {
    played: Move,
    captured: Option<PieceId>,
    // Flags of every piece the move changed, as they were before it.
    flag_deltas: Vec<(PieceId, PieceFlags)>,
    last_move: Option<Move>,
}

/// A [`Position`] together with the moves played on it. Taking a move back
/// restores the special move flags, the turn and the last move as well,
/// which [`Position::undo_move`] alone does not do. The captured piece is
/// remembered by its [`PieceId`], so the exact slot comes back even when
/// several pieces of the same kind were taken on one square.
#[derive(Clone)]
pub struct Game {
    position: Position,
    history: Vec<HistoryEntry>,
}

impl Game {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            history: Vec::new(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// Number of moves that can be taken back.
    #[must_use]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// Moves played so far, oldest first.
    pub fn moves(&self) -> impl Iterator<Item = &Move> {
        self.history.iter().map(|entry| &entry.played)
    }

    /// Legal moves of the side to move.
    #[must_use]
    pub fn generate_moves(&mut self) -> Vec<Move> {
        self.position.generate_moves()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn classify(&mut self) -> GameResult {
        self.position.classify()
    }

    /// Plays the move through [`Position::make_move`] and remembers how to
    /// take it back.
    ///
    /// # Errors
    ///
    /// Rejections are passed through from [`Position::make_move`], nothing is
    /// recorded then.
    pub fn play(&mut self, proposed: &Move) -> Result<Move, MoveError> {
        let before: Vec<(PieceFlags, bool)> = self
            .position
            .pieces()
            .map(|(_, piece)| (piece.flags(), piece.is_captured()))
            .collect();
        let last_move = self.position.last_move();
        let played = self.position.make_move(proposed)?;
        let captured = self
            .position
            .pieces()
            .zip(&before)
            .find(|((_, piece), (_, was_captured))| piece.is_captured() && !was_captured)
            .map(|((id, _), _)| id);
        let flag_deltas = self
            .position
            .pieces()
            .zip(before)
            .filter(|((_, piece), (flags, _))| piece.flags() != *flags)
            .map(|((id, _), (flags, _))| (id, flags))
            .collect();
        self.history.push(HistoryEntry {
            played,
            captured,
            flag_deltas,
            last_move,
        });
        Ok(played)
    }

    /// Reverts the last played move completely. Returns [`None`] at the start
    /// of the game.
    pub fn take_back(&mut self) -> Option<Move> {
        let entry = self.history.pop()?;
        self.position.undo_move_exact(&entry.played, entry.captured);
        for (id, flags) in entry.flag_deltas {
            self.position.piece_mut(id).set_flags(flags);
        }
        self.position.side_to_move = self.position.side_to_move.opponent();
        self.position.last_move = entry.last_move;
        Some(entry.played)
    }
}

impl From<Position> for Game {
    fn from(position: Position) -> Self {
        Self::new(position)
    }
}
