//! Per-piece [legal move generation]: candidate moves are produced from the
//! movement templates and then filtered by simulating each of them on the
//! live position and checking whether the mover's king is left in check.
//!
//! The order of the generated moves is deterministic:
//!
//! - template pieces walk their vectors in order, emitting the quiet moves of
//!   each ray and then at most one capture;
//! - pawns advance by one, capture toward the lower file, toward the higher
//!   file and finally advance by two, promotions fan out in place;
//! - the king of the side to move appends castles with the rook on file 1 and
//!   then the one on file 8.
//!
//! [legal move generation]: https://www.chessprogramming.org/Move_Generation

use std::ops::Deref;

use arrayvec::ArrayVec;

use crate::chess::attacks;
use crate::chess::castling;
use crate::chess::core::{Move, PieceKind, Promotion, BOARD_WIDTH};
use crate::chess::piece::{Piece, PieceId};
use crate::chess::position::Position;

/// Moves of a single piece. A queen in the middle of an empty board has the
/// most: 27.
pub type MoveList = ArrayVec<Move, 32>;

/// Generates the moves of the piece `id` in the deterministic order described
/// in the module docs. Captured pieces have no moves.
///
/// With `filter_self_check`, moves that leave the owner's king in check are
/// dropped, and a piece whose owner has no king on the board has none. The position is only mutated transiently while filtering and is
/// left as it was.
pub fn legal_moves(position: &mut Position, id: PieceId, filter_self_check: bool) -> MoveList {
    let piece = position.piece(id);
    if piece.is_captured() {
        return MoveList::new();
    }
    let (kind, owner) = (piece.kind(), piece.owner());
    if filter_self_check && position.king(owner).is_none() {
        return MoveList::new();
    }
    let mut moves = MoveList::new();
    match kind {
        PieceKind::Pawn => pawn_moves(position, piece, &mut moves),
        _ => template_moves(position, piece, &mut moves),
    }
    if kind == PieceKind::King && owner == position.side_to_move() {
        for rook_file in [1, BOARD_WIDTH] {
            if let Ok(castle) = castling::check_castle(position, owner, rook_file) {
                moves.push(castle.king_move);
            }
        }
    }
    if filter_self_check {
        moves.retain(|candidate| {
            let simulation = Simulation::new(position, candidate);
            !attacks::is_checked(&simulation, owner)
        });
    }
    moves
}

fn template_moves(position: &Position, piece: &Piece, moves: &mut MoveList) {
    let template = piece.template();
    let from = piece.square();
    for &step in template.steps {
        let mut current = from;
        while let Some(to) = current.shift(step) {
            if let Some(occupant) = position.at(to) {
                let occupant = position.piece(occupant);
                if occupant.owner() != piece.owner() {
                    moves.push(piece.move_to(to.file(), to.rank()).with_capture(occupant.kind()));
                }
                break;
            }
            moves.push(piece.move_to(to.file(), to.rank()));
            if !template.unbounded {
                break;
            }
            current = to;
        }
    }
}

fn pawn_moves(position: &Position, pawn: &Piece, moves: &mut MoveList) {
    let from = pawn.square();
    let forward = pawn.owner().push_direction();
    let mut candidates = ArrayVec::<Move, 4>::new();
    let ahead = from.shift((0, forward)).filter(|&ahead| position.at(ahead).is_none());
    if let Some(ahead) = ahead {
        candidates.push(pawn.move_to(ahead.file(), ahead.rank()));
    }
    for &step in pawn.template().steps {
        let Some(to) = from.shift(step) else {
            continue;
        };
        match position.at(to) {
            Some(occupant) => {
                let occupant = position.piece(occupant);
                if occupant.owner() != pawn.owner() {
                    candidates.push(pawn.move_to(to.file(), to.rank()).with_capture(occupant.kind()));
                }
            },
            None => {
                let beside = from.shift((step.0, 0));
                let victim = beside.and_then(|beside| position.at(beside)).map(|id| position.piece(id));
                if victim.is_some_and(|victim| {
                    victim.owner() != pawn.owner()
                        && victim.kind() == PieceKind::Pawn
                        && victim.can_be_captured_en_passant()
                }) {
                    let mut en_passant = pawn
                        .move_to(to.file(), to.rank())
                        .with_capture(PieceKind::Pawn);
                    en_passant.en_passant = true;
                    candidates.push(en_passant);
                }
            },
        }
    }
    if pawn.can_double_advance() && ahead.is_some() {
        if let Some(two_ahead) = from.shift((0, 2 * forward)) {
            if position.at(two_ahead).is_none() {
                candidates.push(pawn.move_to(two_ahead.file(), two_ahead.rank()));
            }
        }
    }
    for candidate in candidates {
        if candidate.to.rank() == pawn.owner().promotion_rank() {
            for promotion in Promotion::ALL {
                moves.push(candidate.with_promotion(promotion));
            }
        } else {
            moves.push(candidate);
        }
    }
}

/// Applies a candidate move for as long as the guard lives. The guard holds
/// the only reference to the position, so nothing can observe it in the
/// transient state, and undoes the move on drop, bringing back exactly the
/// piece it took.
struct Simulation<'a> {
    position: &'a mut Position,
    candidate: Move,
    captured: Option<PieceId>,
}

impl<'a> Simulation<'a> {
    fn new(position: &'a mut Position, candidate: &Move) -> Self {
        let captured = position.force_move_tracked(candidate);
        Self {
            position,
            candidate: *candidate,
            captured,
        }
    }
}

impl Deref for Simulation<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.position
    }
}

impl Drop for Simulation<'_> {
    fn drop(&mut self) {
        self.position.undo_move_exact(&self.candidate, self.captured);
    }
}

impl Position {
    /// Calculates the list of legal moves of the side to move: moves of every
    /// piece in the storage order.
    #[must_use]
    pub fn generate_moves(&mut self) -> Vec<Move> {
        let player = self.side_to_move;
        let mut moves = Vec::with_capacity(64);
        for index in 0..self.pieces.len() {
            let piece = &self.pieces[index];
            if piece.owner() == player && !piece.is_captured() {
                moves.extend(legal_moves(self, PieceId(index), true));
            }
        }
        moves
    }
}
