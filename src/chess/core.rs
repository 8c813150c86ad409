//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};

use anyhow::bail;
use itertools::Itertools;

/// Number of files (and ranks) on the board.
pub const BOARD_WIDTH: i8 = 8;

/// Location on the board given as a (file, rank) pair, both one-based: A1 is
/// `(1, 1)`, H8 is `(8, 8)`.
///
/// [`Square::CAPTURED`] (`(0, 0)`) is the reserved location of pieces that
/// were taken off the board.
///
/// ```
/// use regicide::chess::core::Square;
///
/// let e4 = Square::try_from("e4").unwrap();
/// assert_eq!((e4.file(), e4.rank()), (5, 4));
/// assert_eq!(e4.shift((1, 1)), Some(Square::new(6, 5)));
/// assert_eq!(Square::new(8, 8).shift((1, 0)), None);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    file: i8,
    rank: i8,
}

impl Square {
    /// Sentinel location for captured pieces.
    pub const CAPTURED: Self = Self { file: 0, rank: 0 };

    /// Connects file (column) and rank (row) to form a full square. The
    /// result is not checked to be on the board.
    #[must_use]
    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> i8 {
        self.file
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> i8 {
        self.rank
    }

    /// Whether both coordinates are within `1..=8`. False for
    /// [`Square::CAPTURED`].
    #[must_use]
    pub const fn is_on_board(self) -> bool {
        1 <= self.file && self.file <= BOARD_WIDTH && 1 <= self.rank && self.rank <= BOARD_WIDTH
    }

    /// Moves the square by `(file_delta, rank_delta)`, returns [`None`] if
    /// the result would leave the board.
    #[must_use]
    pub fn shift(self, (file_delta, rank_delta): (i8, i8)) -> Option<Self> {
        let candidate = Self::new(self.file + file_delta, self.rank + rank_delta);
        candidate.is_on_board().then_some(candidate)
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    /// Parses the two-character coordinate notation (e.g. "e4").
    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            );
        };
        let file = match file {
            'a'..='h' => file as u8 - b'a' + 1,
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        };
        let rank = match rank {
            '1'..='8' => rank as u8 - b'0',
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        };
        Ok(Self::new(i8::try_from(file)?, i8::try_from(rank)?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_on_board() {
            return f.write_str("--");
        }
        // Both coordinates are within 1..=8 here.
        f.write_char(char::from(b'a' + self.file.unsigned_abs() - 1))?;
        write!(f, "{}", self.rank)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
///
/// All side-dependent geometry (which way pawns go, where they start and
/// promote, which rank is home) is looked up here instead of relying on the
/// sign of the side.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Rank delta of a single pawn advance.
    #[must_use]
    pub const fn push_direction(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// Rank the king and the rooks start on.
    #[must_use]
    pub const fn backrank(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => BOARD_WIDTH,
        }
    }

    /// Rank the pawns start on.
    #[must_use]
    pub const fn pawns_starting(self) -> i8 {
        self.backrank() + self.push_direction()
    }

    /// The farthest rank for the pawns of this player.
    #[must_use]
    pub const fn promotion_rank(self) -> i8 {
        self.opponent().backrank()
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Movement template of the piece. Pawns only carry their capture
    /// diagonals which depend on the owner: forward advances are not attacks
    /// and are generated separately.
    #[must_use]
    pub const fn template(self, owner: Player) -> Template {
        match self {
            Self::Pawn => Template {
                steps: match owner {
                    Player::White => &WHITE_PAWN_CAPTURES,
                    Player::Black => &BLACK_PAWN_CAPTURES,
                },
                unbounded: false,
            },
            Self::Knight => Template {
                steps: &KNIGHT_JUMPS,
                unbounded: false,
            },
            Self::Bishop => Template {
                steps: &DIAGONAL,
                unbounded: true,
            },
            Self::Rook => Template {
                steps: &ORTHOGONAL,
                unbounded: true,
            },
            Self::Queen => Template {
                steps: &ALL_DIRECTIONS,
                unbounded: true,
            },
            Self::King => Template {
                steps: &ALL_DIRECTIONS,
                unbounded: false,
            },
        }
    }

    /// Symbol in the position notation: uppercase for White, lowercase for
    /// Black.
    #[must_use]
    pub const fn symbol(self, owner: Player) -> char {
        let symbol = match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        };
        match owner {
            Player::White => symbol.to_ascii_uppercase(),
            Player::Black => symbol,
        }
    }
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl TryFrom<char> for PieceKind {
    type Error = anyhow::Error;

    /// Accepts both cases: the owner is encoded by the case and is resolved
    /// by the caller.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol.to_ascii_lowercase() {
            'p' => Ok(Self::Pawn),
            'n' => Ok(Self::Knight),
            'b' => Ok(Self::Bishop),
            'r' => Ok(Self::Rook),
            'q' => Ok(Self::Queen),
            'k' => Ok(Self::King),
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol(Player::Black))
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// All promotion targets in the order the move generator emits them.
    pub const ALL: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];
}

impl TryFrom<char> for Promotion {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => bail!("promotion should be within \"qrbn\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PieceKind::from(*self))
    }
}

/// Step vectors `(file_delta, rank_delta)` a piece moves along. Unbounded
/// templates slide: each vector may be repeated until the piece is blocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Template {
    /// Ordered: the generator walks the vectors in this order.
    pub steps: &'static [(i8, i8)],
    #[allow(missing_docs)]
    pub unbounded: bool,
}

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (-1, 2),
    (1, -2),
    (-1, -2),
    (2, 1),
    (-2, 1),
    (2, -1),
    (-2, -1),
];
// Lower file first.
const WHITE_PAWN_CAPTURES: [(i8, i8); 2] = [(-1, 1), (1, 1)];
const BLACK_PAWN_CAPTURES: [(i8, i8); 2] = [(-1, -1), (1, -1)];

/// A proposed or completed move of a single piece. Castling is the king move
/// by two files, the rook follows implicitly.
///
/// `capture` and `en_passant` are filled in by the move generator and are
/// required to undo the move exactly; they do not take part in equality
/// together with the `score`, so a proposed move matches the generated one
/// as long as the piece, squares and promotion agree.
#[derive(Clone, Copy, Debug)]
pub struct Move {
    /// Identity of the moving piece before the move.
    pub piece: PieceKind,
    #[allow(missing_docs)]
    pub from: Square,
    #[allow(missing_docs)]
    pub to: Square,
    /// Set only when a pawn reaches the farthest rank.
    pub promotion: Option<Promotion>,
    /// Identity of the piece removed by this move.
    pub capture: Option<PieceKind>,
    /// The captured pawn stands beside the origin square rather than on
    /// `to`.
    pub en_passant: bool,
    /// Annotation owned by the search, never interpreted by the rules.
    pub score: f64,
}

impl Move {
    /// A quiet move without promotion, the annotations are left empty.
    #[must_use]
    pub const fn new(piece: PieceKind, from: Square, to: Square) -> Self {
        Self {
            piece,
            from,
            to,
            promotion: None,
            capture: None,
            en_passant: false,
            score: 0.0,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn with_promotion(self, promotion: Promotion) -> Self {
        Self {
            promotion: Some(promotion),
            ..self
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn with_capture(self, capture: PieceKind) -> Self {
        Self {
            capture: Some(capture),
            ..self
        }
    }

    /// Identity of the moving piece after the move.
    #[must_use]
    pub fn landing_kind(&self) -> PieceKind {
        self.promotion.map_or(self.piece, PieceKind::from)
    }

    /// King move spanning two files.
    #[must_use]
    pub fn is_castle(&self) -> bool {
        self.piece == PieceKind::King && (self.to.file() - self.from.file()).abs() == 2
    }

    /// Square the captured piece stood on.
    #[must_use]
    pub const fn capture_square(&self) -> Square {
        if self.en_passant {
            Square::new(self.to.file(), self.from.rank())
        } else {
            self.to
        }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.piece == other.piece
            && self.from == other.from
            && self.to == other.to
            && self.promotion == other.promotion
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format].
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}
