//! Provides the [`Position`]: the single mutable aggregate every rule operates
//! on. It stores all pieces of the game (captured ones included), the side to
//! move and the last applied move.
//!
//! Move generation, making and unmaking moves are implemented in
//! [`crate::chess::movegen`] and [`crate::chess::moves`] as extensions of
//! [`Position`].

use std::fmt::{self, Write};

use anyhow::{bail, Context};

use crate::chess::attacks;
use crate::chess::core::{Move, PieceKind, Player, Promotion, Square, BOARD_WIDTH};
use crate::chess::piece::{Piece, PieceFlags, PieceId};

/// State of the game: pieces, whose turn it is and what happened last.
///
/// Pieces are stored in an append-only arena: a piece is never removed, a
/// capture only marks it as such and moves it to [`Square::CAPTURED`]. This
/// keeps every [`PieceId`] valid for the lifetime of the position and allows
/// undoing captures without snapshots.
///
/// [`Position::try_from()`] parses the text export produced by [`Display`]
/// (`"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"`) as well as a full
/// [Forsyth-Edwards Notation] line.
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
/// [`Display`]: fmt::Display
#[derive(Clone, PartialEq)]
pub struct Position {
    pub(super) pieces: Vec<Piece>,
    pub(super) side_to_move: Player,
    pub(super) last_move: Option<Move>,
}

impl Position {
    /// Creates the starting position of the standard chess variant. The white
    /// king is stored first.
    ///
    /// ```
    /// use regicide::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut result = Self::empty();
        for player in [Player::White, Player::Black] {
            let king = result.place(PieceKind::King, player, Square::new(5, player.backrank()));
            result.piece_mut(king).set_flag(PieceFlags::CAN_CASTLE, true);
            for (file, kind) in (1..=BOARD_WIDTH).zip(BACKRANK) {
                if kind == PieceKind::King {
                    continue;
                }
                let id = result.place(kind, player, Square::new(file, player.backrank()));
                if kind == PieceKind::Rook {
                    result.piece_mut(id).set_flag(PieceFlags::CAN_CASTLE, true);
                }
            }
            for file in 1..=BOARD_WIDTH {
                let _ = result.place(
                    PieceKind::Pawn,
                    player,
                    Square::new(file, player.pawns_starting()),
                );
            }
        }
        result
    }

    /// Creates a board without pieces, White to move.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            pieces: Vec::with_capacity(32),
            side_to_move: Player::White,
            last_move: None,
        }
    }

    /// Appends a piece to the position. Pawns on their starting rank may
    /// double advance, castling rights are left for the caller to grant.
    pub fn place(&mut self, kind: PieceKind, owner: Player, square: Square) -> PieceId {
        self.pieces.push(Piece::new(kind, owner, square));
        PieceId(self.pieces.len() - 1)
    }

    /// # Panics
    ///
    /// If `id` was not issued by this position.
    #[must_use]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    /// Direct access for setting up positions.
    ///
    /// # Panics
    ///
    /// If `id` was not issued by this position.
    pub fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id.0]
    }

    /// All pieces in the stable storage order, captured ones included.
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces
            .iter()
            .enumerate()
            .map(|(index, piece)| (PieceId(index), piece))
    }

    /// The piece standing on `square`, if any.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<PieceId> {
        self.pieces
            .iter()
            .position(|piece| !piece.is_captured() && piece.square() == square)
            .map(PieceId)
    }

    /// First non-captured piece matching all of the criteria.
    pub(super) fn find(&self, square: Square, kind: PieceKind, owner: Player) -> Option<PieceId> {
        self.pieces
            .iter()
            .position(|piece| {
                !piece.is_captured()
                    && piece.square() == square
                    && piece.kind() == kind
                    && piece.owner() == owner
            })
            .map(PieceId)
    }

    /// The non-captured king of `player`.
    #[must_use]
    pub fn king(&self, player: Player) -> Option<PieceId> {
        self.pieces
            .iter()
            .position(|piece| {
                !piece.is_captured() && piece.kind() == PieceKind::King && piece.owner() == player
            })
            .map(PieceId)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    /// Overrides the turn. Intended for setting up positions.
    pub fn set_side_to_move(&mut self, player: Player) {
        self.side_to_move = player;
    }

    /// The most recently applied move, for display only.
    #[must_use]
    pub const fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Whether the side to move is in check.
    #[must_use]
    pub fn in_check(&self) -> bool {
        attacks::is_checked(self, self.side_to_move)
    }

    /// Resolves a move in [UCI format] (`"e2e4"`, `"e7e8q"`): the identity of
    /// the mover is taken from the piece standing on the origin square. The
    /// result is not checked for legality.
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    pub fn parse_move(&self, uci: &str) -> anyhow::Result<Move> {
        let uci = uci.trim();
        if !uci.is_ascii() || !(4..=5).contains(&uci.len()) {
            bail!("move should be 4 or 5 ASCII chars, got \"{uci}\"");
        }
        let from = Square::try_from(&uci[0..2]).context("incorrect move origin")?;
        let to = Square::try_from(&uci[2..4]).context("incorrect move destination")?;
        let Some(mover) = self.at(from) else {
            bail!("no piece on {from}");
        };
        let next = Move::new(self.piece(mover).kind(), from, to);
        match uci.chars().nth(4) {
            Some(symbol) => Ok(next.with_promotion(Promotion::try_from(symbol)?)),
            None => Ok(next),
        }
    }

    /// Parses the piece placement followed by the side to move. Optional
    /// trailing fields follow [Forsyth-Edwards Notation]: castling rights, en
    /// passant target square and the move counters (which are validated but
    /// not tracked).
    ///
    /// When castling rights are omitted, they are inferred from the placement:
    /// a king on its initial square may castle with the rooks standing on the
    /// corners of its backrank.
    ///
    /// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split_ascii_whitespace();
        let mut result = Self::empty();
        let Some(placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement");
        };
        let mut rank = BOARD_WIDTH + 1;
        for rank_fen in placement.split('/') {
            rank -= 1;
            if rank == 0 {
                bail!("incorrect FEN: expected {BOARD_WIDTH} ranks, got {placement}");
            }
            let mut file: i8 = 0;
            for symbol in rank_fen.chars() {
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='8' => file += i8::try_from(symbol as u8 - b'0')?,
                    _ => {
                        file += 1;
                        let kind = PieceKind::try_from(symbol)?;
                        let owner = if symbol.is_ascii_uppercase() {
                            Player::White
                        } else {
                            Player::Black
                        };
                        let _ = result.place(kind, owner, Square::new(file, rank));
                    },
                }
                if file > BOARD_WIDTH {
                    bail!("incorrect FEN: rank {rank_fen} exceeds {BOARD_WIDTH} files");
                }
            }
            if file != BOARD_WIDTH {
                bail!(
                    "incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {file}"
                );
            }
        }
        if rank != 1 {
            bail!("incorrect FEN: there should be {BOARD_WIDTH} ranks, got {placement}");
        }
        result.side_to_move = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        match parts.next() {
            Some(castling) => result.grant_castling(castling)?,
            // Bare export: nothing else follows.
            None => {
                result.infer_castling();
                return Ok(result);
            },
        }
        match parts.next() {
            Some("-") | None => (),
            Some(value) => {
                let target = Square::try_from(value).context("incorrect en passant square")?;
                result.mark_en_passant(target)?;
            },
        }
        for counter in ["halfmove clock", "fullmove counter"] {
            if let Some(value) = parts.next() {
                let _ = value.parse::<u16>().with_context(|| {
                    format!("incorrect FEN: {counter} can not be parsed {value}")
                })?;
            }
        }
        match parts.next() {
            None => Ok(result),
            Some(_) => bail!("trailing symbols are not allowed in FEN"),
        }
    }

    fn infer_castling(&mut self) {
        for player in [Player::White, Player::Black] {
            let backrank = player.backrank();
            let Some(king) = self.find(Square::new(5, backrank), PieceKind::King, player) else {
                continue;
            };
            let mut has_rook = false;
            for rook_file in [1, BOARD_WIDTH] {
                let rook_square = Square::new(rook_file, backrank);
                if let Some(rook) = self.find(rook_square, PieceKind::Rook, player) {
                    self.piece_mut(rook).set_flag(PieceFlags::CAN_CASTLE, true);
                    has_rook = true;
                }
            }
            self.piece_mut(king).set_flag(PieceFlags::CAN_CASTLE, has_rook);
        }
    }

    fn grant_castling(&mut self, castling: &str) -> anyhow::Result<()> {
        if castling == "-" {
            return Ok(());
        }
        for symbol in castling.chars() {
            let (player, rook_file) = match symbol {
                'K' => (Player::White, BOARD_WIDTH),
                'Q' => (Player::White, 1),
                'k' => (Player::Black, BOARD_WIDTH),
                'q' => (Player::Black, 1),
                _ => bail!("unknown castle rights: {symbol}"),
            };
            let backrank = player.backrank();
            let Some(king) = self.find(Square::new(5, backrank), PieceKind::King, player) else {
                bail!("castle rights {symbol} require the {player} king on its initial square");
            };
            let Some(rook) = self.find(Square::new(rook_file, backrank), PieceKind::Rook, player)
            else {
                bail!("castle rights {symbol} require a rook in the corner");
            };
            self.piece_mut(king).set_flag(PieceFlags::CAN_CASTLE, true);
            self.piece_mut(rook).set_flag(PieceFlags::CAN_CASTLE, true);
        }
        Ok(())
    }

    // The target is the square the pawn skipped over: the pawn itself stands
    // one rank further in the direction it moved.
    fn mark_en_passant(&mut self, target: Square) -> anyhow::Result<()> {
        let mover = self.side_to_move.opponent();
        let expected_rank = mover.pawns_starting() + mover.push_direction();
        if target.rank() != expected_rank {
            bail!(
                "expected en passant square to be on rank {expected_rank}, got {}",
                target.rank()
            );
        }
        let pawn_square = Square::new(target.file(), target.rank() + mover.push_direction());
        let Some(pawn) = self.find(pawn_square, PieceKind::Pawn, mover) else {
            bail!("en passant square {target} is not behind a pawn");
        };
        self.piece_mut(pawn)
            .set_flag(PieceFlags::EN_PASSANT_TARGET, true);
        Ok(())
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Trims the input and accepts an optional "fen " prefix before handing it
    /// to [`Position::from_fen`].
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        Self::from_fen(input.strip_prefix("fen ").unwrap_or(input))
    }
}

impl fmt::Display for Position {
    /// Prints the piece placement (highest rank first, White uppercase) and
    /// the side to move.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (1..=BOARD_WIDTH).rev() {
            let mut empty_squares = 0;
            for file in 1..=BOARD_WIDTH {
                match self.at(Square::new(file, rank)) {
                    Some(id) => {
                        if empty_squares != 0 {
                            write!(f, "{empty_squares}")?;
                            empty_squares = 0;
                        }
                        write!(f, "{}", self.piece(id))?;
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != 1 {
                const RANK_SEPARATOR: char = '/';
                f.write_char(RANK_SEPARATOR)?;
            }
        }
        write!(f, " {}", self.side_to_move)
    }
}

impl fmt::Debug for Position {
    /// Dumps the board in a simple format ('.' for empty square, symbol for
    /// piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (1..=BOARD_WIDTH).rev() {
            for file in 1..=BOARD_WIDTH {
                match self.at(Square::new(file, rank)) {
                    Some(id) => write!(f, "{}", self.piece(id)),
                    None => f.write_char('.'),
                }?;
                if file != BOARD_WIDTH {
                    f.write_char(' ')?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        if let Some(last_move) = self.last_move {
            writeln!(f, "Last move: {last_move}")?;
        }
        writeln!(f, "Position: {self}")
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn setup(input: &str) -> Position {
        let position = Position::try_from(input);
        assert!(position.is_ok(), "input: {input}");
        position.unwrap()
    }

    #[test]
    fn starting_position() {
        let position = Position::starting();
        assert_eq!(position.pieces().count(), 32);
        let (id, king) = position.pieces().next().unwrap();
        assert_eq!(id, PieceId(0));
        assert_eq!(king.kind(), PieceKind::King);
        assert_eq!(king.owner(), Player::White);
        assert!(king.can_castle());
        assert_eq!(
            position
                .pieces()
                .filter(|(_, piece)| piece.can_castle())
                .count(),
            6
        );
        assert_eq!(
            position
                .pieces()
                .filter(|(_, piece)| piece.can_double_advance())
                .count(),
            16
        );
        assert_eq!(position.side_to_move(), Player::White);
        assert_eq!(position.last_move(), None);
        assert!(!position.in_check());
    }

    #[test]
    fn export() {
        let mut position = Position::empty();
        assert_eq!(position.to_string(), "8/8/8/8/8/8/8/8 w");
        let _ = position.place(PieceKind::King, Player::Black, Square::new(1, 1));
        let _ = position.place(PieceKind::Queen, Player::White, Square::new(2, 2));
        position.set_side_to_move(Player::Black);
        assert_eq!(position.to_string(), "8/8/8/8/8/8/1Q6/k7 b");
    }

    #[test]
    fn round_trip_export() {
        for input in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w",
            "2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b",
        ] {
            assert_eq!(setup(input).to_string(), input);
        }
        assert_eq!(
            setup("fen r3k3/5p2/2p5/p7/P3r3/2N2n2/1PP2P2/2K2B2 w q - 0 24\n").to_string(),
            "r3k3/5p2/2p5/p7/P3r3/2N2n2/1PP2P2/2K2B2 w"
        );
    }

    #[test]
    fn inferred_castling() {
        let position = setup("r3k2r/8/8/8/8/8/8/R3K1R1 w");
        let castling = |square: &str| {
            let id = position.at(Square::try_from(square).unwrap()).unwrap();
            position.piece(id).can_castle()
        };
        assert!(castling("e1"));
        assert!(castling("a1"));
        assert!(!castling("g1"));
        assert!(castling("e8"));
        assert!(castling("a8"));
        assert!(castling("h8"));
    }

    #[test]
    fn explicit_castling_and_en_passant() {
        let position = setup("rnbqkbnr/pppp1ppp/8/8/3Pp3/8/PPP1PPPP/RNBQKBNR b Kq d3 0 2");
        let flags = |square: &str| {
            let id = position.at(Square::try_from(square).unwrap()).unwrap();
            position.piece(id).flags()
        };
        assert_eq!(flags("e1"), PieceFlags::CAN_CASTLE);
        assert_eq!(flags("h1"), PieceFlags::CAN_CASTLE);
        assert_eq!(flags("a1"), PieceFlags::empty());
        assert_eq!(flags("a8"), PieceFlags::CAN_CASTLE);
        assert_eq!(flags("d4"), PieceFlags::EN_PASSANT_TARGET);
        assert_eq!(flags("e4"), PieceFlags::empty());
        assert_eq!(flags("a7"), PieceFlags::CAN_DOUBLE_ADVANCE);
    }

    #[test]
    fn incorrect_input() {
        for input in [
            "",
            "8/8/8/8/8/8/8 w",
            "8/8/8/8/8/8/8/8/8 w",
            "9/8/8/8/8/8/8/8 w",
            "8/8/8/8/8/8/8/7 w",
            "8/8/8/8/8/8/8/x7 w",
            "8/8/8/8/8/8/8/8",
            "8/8/8/8/8/8/8/8 x",
            "8/8/8/8/8/8/8/K7 w K",
            "4k3/8/8/8/8/8/8/4K3 w - e3",
            "4k3/8/8/8/8/8/8/4K3 w - e6",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra",
            "4k3/8/8/8/8/8/8/4K3 w - - zero 1",
        ] {
            assert!(Position::try_from(input).is_err(), "input: {input}");
        }
    }

    #[test]
    fn parse_move() {
        let position = setup("8/P7/8/8/8/8/8/K6k w");
        assert_eq!(
            position.parse_move("a7a8q").unwrap(),
            Move::new(PieceKind::Pawn, Square::new(1, 7), Square::new(1, 8))
                .with_promotion(Promotion::Queen)
        );
        assert_eq!(
            position.parse_move("a1b2").unwrap(),
            Move::new(PieceKind::King, Square::new(1, 1), Square::new(2, 2))
        );
        assert!(position.parse_move("c3c4").is_err());
        assert!(position.parse_move("a7a8x").is_err());
        assert!(position.parse_move("a7").is_err());
        assert!(position.parse_move("a7a8qq").is_err());
    }

    #[test]
    fn debug_dump() {
        let position = Position::starting();
        let dump = format!("{position:?}");
        assert!(dump.starts_with("r n b q k b n r\np p p p p p p p\n. . . . . . . .\n"));
        assert!(dump.contains("Player to move: White"));
        assert!(dump.ends_with("Position: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w\n"));
    }
}
