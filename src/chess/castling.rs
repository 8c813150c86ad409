//! [Castling] preconditions and the rook half of the castle move.
//!
//! A castle is encoded as a king move by two files toward the rook. The rook
//! starting on file 8 lands on file 6, the one starting on file 1 lands on
//! file 4.
//!
//! [Castling]: https://www.chessprogramming.org/Castling

use crate::chess::attacks;
use crate::chess::core::{Move, PieceKind, Player, Square, BOARD_WIDTH};
use crate::chess::error::MoveError;
use crate::chess::piece::PieceId;
use crate::chess::position::Position;

/// A validated castle: both participants and where they go.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Castle {
    #[allow(missing_docs)]
    pub king: PieceId,
    #[allow(missing_docs)]
    pub rook: PieceId,
    /// The king move that encodes the castle.
    pub king_move: Move,
    #[allow(missing_docs)]
    pub rook_to: Square,
}

/// Whether the side to move can castle with the rook on `rook_file` of its
/// backrank.
pub fn can_castle(position: &mut Position, rook_file: i8) -> bool {
    let player = position.side_to_move();
    check_castle(position, player, rook_file).is_ok()
}

/// Validates castling of `player` with the rook on `rook_file` and reports the
/// first failed precondition.
///
/// The transit square is not checked separately: only the current and the
/// destination squares of the king have to be safe. The position is left
/// unchanged.
///
/// # Errors
///
/// In the order of checking:
///
/// - [`MoveError::CastleKingChecked`] if the king is in check;
/// - [`MoveError::NoSuchPiece`] if there is no king;
/// - [`MoveError::CastleRightsLost`] if the king or the rook has moved or the
///   rook is not there;
/// - [`MoveError::CastleBlocked`] if any square between them is occupied;
/// - [`MoveError::CastleUnsafe`] if the king would land in check.
pub fn check_castle(
    position: &mut Position,
    player: Player,
    rook_file: i8,
) -> Result<Castle, MoveError> {
    if attacks::is_checked(position, player) {
        return Err(MoveError::CastleKingChecked);
    }
    let king = position.king(player).ok_or(MoveError::NoSuchPiece)?;
    let king_square = position.piece(king).square();
    let backrank = player.backrank();
    if !position.piece(king).can_castle() || king_square.rank() != backrank {
        return Err(MoveError::CastleRightsLost);
    }
    let rook = position
        .find(Square::new(rook_file, backrank), PieceKind::Rook, player)
        .ok_or(MoveError::CastleRightsLost)?;
    if !position.piece(rook).can_castle() {
        return Err(MoveError::CastleRightsLost);
    }
    let (low, high) = if rook_file < king_square.file() {
        (rook_file, king_square.file())
    } else {
        (king_square.file(), rook_file)
    };
    if (low + 1..high).any(|file| position.at(Square::new(file, backrank)).is_some()) {
        return Err(MoveError::CastleBlocked);
    }
    let direction = (rook_file - king_square.file()).signum();
    let destination = king_square
        .shift((2 * direction, 0))
        .ok_or(MoveError::CastleRightsLost)?;
    position.piece_mut(king).relocate(destination);
    let unsafe_destination = attacks::is_checked(position, player);
    position.piece_mut(king).relocate(king_square);
    if unsafe_destination {
        return Err(MoveError::CastleUnsafe);
    }
    let king_move = Move::new(PieceKind::King, king_square, destination);
    let (_, rook_to) = rook_route(&king_move);
    Ok(Castle {
        king,
        rook,
        king_move,
        rook_to,
    })
}

/// Origin and destination of the rook that accompanies a castling king move.
#[must_use]
pub const fn rook_route(king_move: &Move) -> (Square, Square) {
    let rank = king_move.from.rank();
    if king_move.to.file() > king_move.from.file() {
        (Square::new(BOARD_WIDTH, rank), Square::new(6, rank))
    } else {
        (Square::new(1, rank), Square::new(4, rank))
    }
}
