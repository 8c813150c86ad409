//! Pieces and the handles used to address them inside a
//! [`crate::chess::position::Position`].

use std::fmt;

use crate::chess::core::{Move, PieceKind, Player, Square, Template};

/// Stable handle of a piece: the index of its slot in the position. Slots are
/// never removed or reordered, so a handle stays valid for the whole game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(super) usize);

impl PieceId {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

bitflags::bitflags! {
    /// Eligibility of a piece for the special moves.
    ///
    /// - [`PieceFlags::CAN_CASTLE`]: the king or rook has never moved. Both
    ///   the king and the rook have to hold it for the castle to be allowed.
    /// - [`PieceFlags::CAN_DOUBLE_ADVANCE`]: the pawn has not moved yet.
    /// - [`PieceFlags::EN_PASSANT_TARGET`]: the pawn has just advanced by two
    ///   squares and can be captured [en passant] on the very next move only.
    ///
    /// [en passant]: https://en.wikipedia.org/wiki/En_passant
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PieceFlags: u8 {
        #[allow(missing_docs)]
        const CAN_CASTLE = 0b0001;
        #[allow(missing_docs)]
        const CAN_DOUBLE_ADVANCE = 0b0010;
        #[allow(missing_docs)]
        const EN_PASSANT_TARGET = 0b0100;
    }
}

/// A piece on the board (or a captured one, which keeps its slot).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    owner: Player,
    square: Square,
    template: Template,
    captured: bool,
    // Where the piece was taken. Undo uses it to pick the right slot back.
    captured_on: Option<Square>,
    flags: PieceFlags,
}

impl Piece {
    /// Pawns standing on their starting rank are allowed to double advance,
    /// castling rights have to be granted explicitly.
    pub(super) fn new(kind: PieceKind, owner: Player, square: Square) -> Self {
        let mut flags = PieceFlags::empty();
        if kind == PieceKind::Pawn && square.rank() == owner.pawns_starting() {
            flags |= PieceFlags::CAN_DOUBLE_ADVANCE;
        }
        Self {
            kind,
            owner,
            square,
            template: kind.template(owner),
            captured: false,
            captured_on: None,
            flags,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn owner(&self) -> Player {
        self.owner
    }

    /// Current location, [`Square::CAPTURED`] once the piece is taken.
    #[must_use]
    pub const fn square(&self) -> Square {
        self.square
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn template(&self) -> Template {
        self.template
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_captured(&self) -> bool {
        self.captured
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn flags(&self) -> PieceFlags {
        self.flags
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn can_castle(&self) -> bool {
        self.flags.contains(PieceFlags::CAN_CASTLE)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn can_double_advance(&self) -> bool {
        self.flags.contains(PieceFlags::CAN_DOUBLE_ADVANCE)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn can_be_captured_en_passant(&self) -> bool {
        self.flags.contains(PieceFlags::EN_PASSANT_TARGET)
    }

    /// Grants or revokes special move eligibility.
    pub fn set_flag(&mut self, flag: PieceFlags, value: bool) {
        self.flags.set(flag, value);
    }

    pub(super) fn set_flags(&mut self, flags: PieceFlags) {
        self.flags = flags;
    }

    /// A move of this piece from its current square to `(file, rank)`. Only
    /// the identity and the squares are filled in.
    #[must_use]
    pub const fn move_to(&self, file: i8, rank: i8) -> Move {
        Move::new(self.kind, self.square, Square::new(file, rank))
    }

    /// Puts the piece on the given square without any checks. Intended for
    /// setting up positions.
    pub fn relocate(&mut self, square: Square) {
        self.square = square;
    }

    /// Takes the piece off the board, remembering where it stood.
    pub fn mark_captured(&mut self) {
        self.captured_on = self.square.is_on_board().then_some(self.square);
        self.captured = true;
        self.square = Square::CAPTURED;
    }

    /// Brings a captured piece back to `square`.
    pub(super) fn restore(&mut self, square: Square) {
        self.captured = false;
        self.captured_on = None;
        self.square = square;
    }

    /// Whether the piece was captured on `square`. Pieces taken off the board
    /// by other means do not remember their square and match any.
    pub(super) fn was_captured_on(&self, square: Square) -> bool {
        self.captured
            && self.square == Square::CAPTURED
            && self.captured_on.map_or(true, |captured_on| captured_on == square)
    }

    /// Trades the location and the capture state with another piece. Kind,
    /// owner and flags stay with their slots.
    pub(super) fn swap_placement(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.square, &mut other.square);
        std::mem::swap(&mut self.captured, &mut other.captured);
        std::mem::swap(&mut self.captured_on, &mut other.captured_on);
    }

    /// Changes the identity, and the template along with it.
    pub(super) fn transform(&mut self, kind: PieceKind) {
        self.kind = kind;
        self.template = kind.template(self.owner);
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.symbol(self.owner))
    }
}
