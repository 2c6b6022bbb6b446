// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Board geometry: where a piece could travel from a square on an empty board.
//!
//! Nothing in this module looks at occupancy. Knights and kings move by a fixed set of offsets, and bishops,
//! rooks and queens move along rays that run from the origin to the edge of the board. Both are precomputed
//! for every square the first time they are needed.

use std::sync::LazyLock;

use crate::core::*;

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// The longest possible ray, from one corner to the opposite edge.
const MAX_RAY_LEN: usize = 7;

/// The squares along one direction from an origin, ordered from nearest to farthest. The origin itself is
/// never part of the ray and the ray stops at the edge of the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ray {
    squares: [Square; MAX_RAY_LEN],
    len: u8,
}

impl Ray {
    fn empty() -> Ray {
        Ray {
            squares: [Square(0); MAX_RAY_LEN],
            len: 0,
        }
    }

    fn push(&mut self, sq: Square) {
        debug_assert!((self.len as usize) < MAX_RAY_LEN, "ray overflowed the board");
        self.squares[self.len as usize] = sq;
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[Square] {
        &self.squares[..self.len as usize]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Square> {
        self.as_slice().iter()
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<'a> IntoIterator for &'a Ray {
    type Item = &'a Square;
    type IntoIter = std::slice::Iter<'a, Square>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct StepTable {
    table: [SquareSet; 64],
}

impl StepTable {
    pub fn new(offsets: &[(i32, i32)]) -> StepTable {
        let mut st = StepTable {
            table: [SquareSet::empty(); 64],
        };

        for sq in squares() {
            // Offsets that land off of the board are dropped here, once, so that no caller ever sees them.
            st.table[sq.as_u8() as usize] = offsets
                .iter()
                .filter_map(|&(drow, dcol)| sq.offset(drow, dcol))
                .collect();
        }

        st
    }

    pub fn targets(&self, sq: Square) -> SquareSet {
        self.table[sq.as_u8() as usize]
    }
}

struct RayTable {
    table: [[Ray; 8]; 64],
}

impl RayTable {
    pub fn new() -> RayTable {
        let mut rt = RayTable {
            table: [[Ray::empty(); 8]; 64],
        };

        for sq in squares() {
            for dir in Direction::ALL {
                // Starting at the given square, step in the given direction until the next step would leave
                // the board.
                let mut entry = Ray::empty();
                let mut cursor = sq;
                while let Some(next) = cursor.towards(dir) {
                    entry.push(next);
                    cursor = next;
                }

                rt.table[sq.as_u8() as usize][dir as usize] = entry;
            }
        }

        rt
    }

    pub fn ray(&self, sq: Square, dir: Direction) -> Ray {
        self.table[sq.as_u8() as usize][dir as usize]
    }
}

static KNIGHT_TABLE: LazyLock<StepTable> = LazyLock::new(|| StepTable::new(&KNIGHT_OFFSETS));
static KING_TABLE: LazyLock<StepTable> = LazyLock::new(|| StepTable::new(&KING_OFFSETS));
static RAY_TABLE: LazyLock<RayTable> = LazyLock::new(RayTable::new);

/// The fixed `(row, column)` offsets a knight or king moves by. Every other kind has none.
///
/// Applying an offset to a square near the edge can produce an off-board square; use [`step_targets`] for the
/// offsets already filtered to the board.
pub fn step_offsets(kind: PieceKind) -> &'static [(i32, i32)] {
    match kind {
        PieceKind::Knight => &KNIGHT_OFFSETS,
        PieceKind::King => &KING_OFFSETS,
        _ => &[],
    }
}

/// The on-board squares a knight or king standing on `origin` could step to, ignoring occupancy.
pub fn step_targets(kind: PieceKind, origin: Square) -> SquareSet {
    match kind {
        PieceKind::Knight => KNIGHT_TABLE.targets(origin),
        PieceKind::King => KING_TABLE.targets(origin),
        _ => SquareSet::empty(),
    }
}

/// The directions a sliding piece travels in. Non-sliding kinds have none.
pub fn rays_for(kind: PieceKind) -> &'static [Direction] {
    match kind {
        PieceKind::Bishop => &Direction::DIAGONAL,
        PieceKind::Rook => &Direction::ORTHOGONAL,
        PieceKind::Queen => &Direction::ALL,
        _ => &[],
    }
}

/// The ray from `origin` in direction `dir`, nearest square first.
pub fn ray(origin: Square, dir: Direction) -> Ray {
    RAY_TABLE.ray(origin, dir)
}
