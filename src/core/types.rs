// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    convert::TryFrom,
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU32, Ordering},
};

use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SquareError {
    #[error("square out of range: ({row}, {col})")]
    OutOfRange { row: i32, col: i32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SquareParseError {
    #[error("invalid file char: {0}")]
    InvalidFile(char),
    #[error("invalid rank char: {0}")]
    InvalidRank(char),
    #[error("expected two characters, got {0:?}")]
    BadLength(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PieceParseError {
    #[error("invalid char: {0}")]
    InvalidChar(char),
}

/// A square on the chessboard, addressed by `(row, column)`. Row 0 is White's back rank and column 0 is the
/// a-file, so `(0, 4)` is `e1`.
///
/// A `Square` is always on the board; coordinates that fall off of it are rejected at construction time by
/// [`Square::at`] or reported as `None` by [`Square::offset`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(pub(crate) u8);

impl Square {
    /// Creates the square at the given row and column, failing if either coordinate is outside `[0, 7]`.
    pub fn at(row: i32, col: i32) -> Result<Square, SquareError> {
        if !Square::in_bounds(row, col) {
            return Err(SquareError::OutOfRange { row, col });
        }

        Ok(Square((row * 8 + col) as u8))
    }

    pub const fn in_bounds(row: i32, col: i32) -> bool {
        row >= 0 && row <= 7 && col >= 0 && col <= 7
    }

    pub const fn row(self) -> i32 {
        (self.0 >> 3) as i32
    }

    pub const fn col(self) -> i32 {
        (self.0 & 7) as i32
    }

    /// Returns the square `drow` rows and `dcol` columns away from this one, or `None` if that square is off of
    /// the board.
    pub fn offset(self, drow: i32, dcol: i32) -> Option<Square> {
        Square::at(self.row() + drow, self.col() + dcol).ok()
    }

    /// Returns the adjacent square in the given direction, if there is one.
    pub fn towards(self, dir: Direction) -> Option<Square> {
        let (drow, dcol) = dir.as_vector();
        self.offset(drow, dcol)
    }

    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Square {
    type Error = SquareError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value >= 64 {
            return Err(SquareError::OutOfRange {
                row: (value >> 3) as i32,
                col: (value & 7) as i32,
            });
        }

        Ok(Square(value))
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(SquareParseError::BadLength(s.to_owned())),
        };

        let col = match file {
            'a'..='h' => file as i32 - 'a' as i32,
            c => return Err(SquareParseError::InvalidFile(c)),
        };
        let row = match rank {
            '1'..='8' => rank as i32 - '1' as i32,
            c => return Err(SquareParseError::InvalidRank(c)),
        };

        Ok(Square((row * 8 + col) as u8))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col() as u8) as char;
        let rank = (b'1' + self.row() as u8) as char;
        write!(f, "{}{}", file, rank)
    }
}

impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One of the two players. White pawns advance toward row 7 and Black pawns toward row 0.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn toggle(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// The row delta of a single pawn push for this side.
    pub const fn forward(self) -> i32 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// The row that this side's pawns start on, and from which they may advance two squares.
    pub const fn pawn_start_row(self) -> i32 {
        match self {
            Side::White => 1,
            Side::Black => 6,
        }
    }

    /// The row a pawn of this side must stand on to capture en passant. It is the row an enemy pawn lands on
    /// after advancing two squares.
    pub const fn en_passant_row(self) -> i32 {
        match self {
            Side::White => 4,
            Side::Black => 3,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        write!(f, "{}", c)
    }
}

static NEXT_PIECE_ID: AtomicU32 = AtomicU32::new(0);

/// Identity of a single piece. Two pieces of the same kind and side are still distinct pieces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PieceId(u32);

impl PieceId {
    fn next() -> PieceId {
        PieceId(NEXT_PIECE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A chess piece. Pieces do not know where they are; ask the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    /// Creates a new piece with a fresh identity.
    pub fn new(kind: PieceKind, side: Side) -> Piece {
        Piece {
            id: PieceId::next(),
            kind,
            side,
        }
    }

    pub fn is_enemy_of(&self, other: &Piece) -> bool {
        self.side != other.side
    }
}

impl TryFrom<char> for Piece {
    type Error = PieceParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let side = if value.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };

        let kind = match value.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(PieceParseError::InvalidChar(value)),
        };

        Ok(Piece::new(kind, side))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.kind.to_string();
        match self.side {
            Side::White => write!(f, "{}", c.to_ascii_uppercase()),
            Side::Black => write!(f, "{}", c),
        }
    }
}

/// A compass direction on the board, expressed as a `(row, column)` step.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// North is toward row 7 and East is toward column 7.
    pub const fn as_vector(self) -> (i32, i32) {
        match self {
            Direction::North => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (-1, 1),
            Direction::South => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (1, -1),
        }
    }
}

/// Iterator over every square on the board, in index order (`a1`, `b1`, ..., `h8`).
pub struct AllSquares(u8, u8);

impl Iterator for AllSquares {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 >= self.1 {
            None
        } else {
            let next = self.0;
            self.0 += 1;
            Some(Square(next))
        }
    }
}

impl DoubleEndedIterator for AllSquares {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.1 <= self.0 {
            None
        } else {
            self.1 -= 1;
            Some(Square(self.1))
        }
    }
}

impl Default for AllSquares {
    fn default() -> Self {
        AllSquares(0, 64)
    }
}

pub fn squares() -> AllSquares {
    AllSquares::default()
}

pub fn sides() -> ::std::vec::IntoIter<Side> {
    vec![Side::White, Side::Black].into_iter()
}
