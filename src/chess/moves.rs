//! Making and unmaking moves.
//!
//! [`Position::make_move`] validates the move and updates the whole state.
//! [`Position::force_move`] only relocates pieces and is paired with
//! [`Position::undo_move`] for simulations. Undo restores placement but
//! leaves the special move flags and the turn alone: see
//! [`crate::chess::game::Game`] for full take-backs.
//!
//! Undo brings back the first captured slot that matches. When two pieces of
//! the same kind were taken on the same square, that can be the wrong slot:
//! callers that know the captured [`PieceId`] pair `force_move_tracked`
//! with `undo_move_exact`.

use log::{debug, trace, warn};

use crate::chess::castling::{self, Castle};
use crate::chess::core::{Move, PieceKind, Square, BOARD_WIDTH};
use crate::chess::error::MoveError;
use crate::chess::movegen;
use crate::chess::piece::{PieceFlags, PieceId};
use crate::chess::position::Position;

impl Position {
    /// Validates and applies the move of the side to move, then passes the
    /// turn. A king move by two files is a castle.
    ///
    /// Returns the move as the generator produces it (with the captured piece
    /// and the en passant marker filled in, the score taken from `proposed`).
    /// This is the value [`Position::undo_move`] expects.
    ///
    /// # Errors
    ///
    /// [`MoveError`] describes why the move was rejected. The position is left
    /// untouched in that case.
    pub fn make_move(&mut self, proposed: &Move) -> Result<Move, MoveError> {
        let result = if proposed.is_castle() {
            self.make_castle(proposed)
        } else {
            self.make_regular_move(proposed)
        };
        match &result {
            Ok(played) => trace!("{:?} played {played}", self.side_to_move.opponent()),
            Err(e) => debug!("rejected {proposed}: {e}"),
        }
        result
    }

    fn make_regular_move(&mut self, proposed: &Move) -> Result<Move, MoveError> {
        let mover = self
            .find(proposed.from, proposed.piece, self.side_to_move)
            .ok_or(MoveError::NoSuchPiece)?;
        let played = movegen::legal_moves(self, mover, true)
            .into_iter()
            .find(|candidate| candidate == proposed)
            .ok_or(MoveError::IllegalMove)?;
        let played = Move {
            score: proposed.score,
            ..played
        };
        let _ = self.displace(mover, &played);
        let piece = self.piece_mut(mover);
        piece.set_flag(PieceFlags::CAN_DOUBLE_ADVANCE, false);
        if matches!(played.piece, PieceKind::King | PieceKind::Rook) {
            piece.set_flag(PieceFlags::CAN_CASTLE, false);
        }
        self.clear_en_passant();
        if played.piece == PieceKind::Pawn && (played.to.rank() - played.from.rank()).abs() == 2 {
            self.piece_mut(mover)
                .set_flag(PieceFlags::EN_PASSANT_TARGET, true);
        }
        self.finish(played);
        Ok(played)
    }

    fn make_castle(&mut self, proposed: &Move) -> Result<Move, MoveError> {
        let player = self.side_to_move;
        if self
            .find(proposed.from, PieceKind::King, player)
            .is_none()
        {
            return Err(MoveError::NoSuchPiece);
        }
        if proposed.to.rank() != proposed.from.rank() {
            return Err(MoveError::IllegalMove);
        }
        let rook_file = if proposed.to.file() > proposed.from.file() {
            BOARD_WIDTH
        } else {
            1
        };
        let Castle {
            king,
            rook,
            king_move,
            rook_to,
        } = castling::check_castle(self, player, rook_file)?;
        if king_move != *proposed {
            return Err(MoveError::IllegalMove);
        }
        let played = Move {
            score: proposed.score,
            ..king_move
        };
        self.piece_mut(king).relocate(played.to);
        self.piece_mut(rook).relocate(rook_to);
        self.piece_mut(king).set_flag(PieceFlags::CAN_CASTLE, false);
        self.piece_mut(rook).set_flag(PieceFlags::CAN_CASTLE, false);
        self.clear_en_passant();
        self.finish(played);
        Ok(played)
    }

    /// Applies the move without any validation: relocates the mover, takes
    /// the captured piece off the board, promotes and moves the castling rook.
    /// The turn, the special move flags and the last move are left unchanged.
    pub fn force_move(&mut self, next: &Move) {
        let _ = self.force_move_tracked(next);
    }

    /// [`Position::force_move`] reporting the piece it took off the board.
    pub(super) fn force_move_tracked(&mut self, next: &Move) -> Option<PieceId> {
        let Some(mover) = self
            .pieces()
            .find(|(_, piece)| {
                !piece.is_captured() && piece.square() == next.from && piece.kind() == next.piece
            })
            .map(|(id, _)| id)
        else {
            warn!("nothing to move for {next}");
            return None;
        };
        self.displace(mover, next)
    }

    /// Reverts [`Position::force_move`] (and the placement part of
    /// [`Position::make_move`]) of `played`: the mover goes back and loses the
    /// promotion, the captured piece returns to where it was taken and the
    /// castling rook goes home.
    ///
    /// The captured piece is the first one in the storage order that matches
    /// the captured kind, belongs to the opponent and was taken on the capture
    /// square. The turn and the special move flags are not restored.
    pub fn undo_move(&mut self, played: &Move) {
        let Some(mover) = self.pieces.iter().position(|piece| {
            !piece.is_captured() && piece.square() == played.to && piece.kind() == played.landing_kind()
        }) else {
            warn!("nothing to undo for {played}");
            return;
        };
        let piece = &mut self.pieces[mover];
        let owner = piece.owner();
        piece.relocate(played.from);
        if played.promotion.is_some() {
            piece.transform(PieceKind::Pawn);
        }
        if let Some(kind) = played.capture {
            let square = played.capture_square();
            match self.pieces.iter_mut().find(|piece| {
                piece.kind() == kind && piece.owner() != owner && piece.was_captured_on(square)
            }) {
                Some(captured) => captured.restore(square),
                None => warn!("no captured {kind} to restore on {square}"),
            }
        }
        if played.is_castle() {
            let (rook_from, rook_to) = castling::rook_route(played);
            if let Some(rook) = self.find(rook_to, PieceKind::Rook, owner) {
                self.piece_mut(rook).relocate(rook_from);
            }
        }
    }

    /// [`Position::undo_move`] that brings back exactly the `captured` slot
    /// instead of the first matching one.
    pub(super) fn undo_move_exact(&mut self, played: &Move, captured: Option<PieceId>) {
        self.undo_move(played);
        let Some(captured) = captured else {
            return;
        };
        if !self.piece(captured).is_captured() {
            return;
        }
        match self.at(played.capture_square()) {
            Some(restored) if restored != captured => self.swap_placement(captured, restored),
            _ => warn!("captured slot {} was not restored", captured.index()),
        }
    }

    fn swap_placement(&mut self, first: PieceId, second: PieceId) {
        let (low, high) = if first.0 < second.0 {
            (first.0, second.0)
        } else {
            (second.0, first.0)
        };
        let (head, tail) = self.pieces.split_at_mut(high);
        head[low].swap_placement(&mut tail[0]);
    }

    /// Shared placement part of making and forcing a move. Returns the
    /// captured piece.
    fn displace(&mut self, mover: PieceId, next: &Move) -> Option<PieceId> {
        let owner = self.piece(mover).owner();
        let captured = self.capture_target(next, mover);
        if let Some(captured) = captured {
            self.piece_mut(captured).mark_captured();
        }
        if next.is_castle() {
            let (rook_from, rook_to) = castling::rook_route(next);
            if let Some(rook) = self.find(rook_from, PieceKind::Rook, owner) {
                self.piece_mut(rook).relocate(rook_to);
            }
        }
        let piece = self.piece_mut(mover);
        piece.relocate(next.to);
        if let Some(promotion) = next.promotion {
            piece.transform(promotion.into());
        }
        captured
    }

    /// Enemy piece on the destination, or the pawn beside the origin for a
    /// diagonal pawn move onto an empty square.
    fn capture_target(&self, next: &Move, mover: PieceId) -> Option<PieceId> {
        let owner = self.piece(mover).owner();
        let enemy_on = |square: Square| {
            self.at(square)
                .filter(|&id| self.piece(id).owner() != owner)
        };
        if let Some(captured) = enemy_on(next.to) {
            return Some(captured);
        }
        let diagonal = next.from.file() != next.to.file();
        if next.piece == PieceKind::Pawn && diagonal {
            return enemy_on(Square::new(next.to.file(), next.from.rank()));
        }
        None
    }

    fn clear_en_passant(&mut self) {
        for piece in &mut self.pieces {
            piece.set_flag(PieceFlags::EN_PASSANT_TARGET, false);
        }
    }

    fn finish(&mut self, played: Move) {
        self.side_to_move = self.side_to_move.opponent();
        self.last_move = Some(played);
    }
}
