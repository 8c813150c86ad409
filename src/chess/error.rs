//! Reasons a proposed move is rejected. All of them are recoverable: the
//! position is left exactly as it was and the caller is expected to ask for
//! another move.

use thiserror::Error;

/// Rejection of a move by [`crate::chess::position::Position::make_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// No piece of the given identity owned by the side to move stands on the
    /// origin square.
    #[error("no such piece on the origin square")]
    NoSuchPiece,
    /// The move is not among the legal moves of the piece.
    #[error("illegal move")]
    IllegalMove,
    /// Castling out of check.
    #[error("king is in check")]
    CastleKingChecked,
    /// King or rook has already moved, or the rook is missing.
    #[error("king or rook has lost castling rights")]
    CastleRightsLost,
    /// A piece stands between the king and the rook.
    #[error("castle path is blocked")]
    CastleBlocked,
    /// The king would land in check.
    #[error("castle places king in check")]
    CastleUnsafe,
}
