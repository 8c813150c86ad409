//! Threat detection: which squares a piece attacks and whether a king is in
//! check. Both only read the position.

use crate::chess::core::{Player, Square};
use crate::chess::piece::Piece;
use crate::chess::position::Position;

/// Whether `piece` threatens `target`, regardless of what stands there. The
/// side to move is irrelevant and captured pieces attack nothing.
///
/// Step templates (king, knight and pawn captures) attack exactly one square
/// per vector. Sliding pieces attack every empty square along a ray and the
/// first occupied one, friendly or not, but nothing behind it. Pawn advances
/// are not attacks.
#[must_use]
pub fn attacks(piece: &Piece, target: Square, position: &Position) -> bool {
    if piece.is_captured() {
        return false;
    }
    let origin = piece.square();
    let template = piece.template();
    if !template.unbounded {
        let delta = (target.file() - origin.file(), target.rank() - origin.rank());
        return template.steps.contains(&delta);
    }
    template.steps.iter().any(|&step| {
        let mut current = origin;
        while let Some(next) = current.shift(step) {
            if next == target {
                return true;
            }
            if position.at(next).is_some() {
                return false;
            }
            current = next;
        }
        false
    })
}

/// Whether the king of `player` is attacked by any enemy piece. A side without
/// a king is never in check.
#[must_use]
pub fn is_checked(position: &Position, player: Player) -> bool {
    let Some(king) = position.king(player) else {
        return false;
    };
    let king_square = position.piece(king).square();
    position.pieces().any(|(_, piece)| {
        piece.owner() != player && attacks(piece, king_square, position)
    })
}
