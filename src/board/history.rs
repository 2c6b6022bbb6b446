// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::core::{Piece, PieceKind, Square};

/// Number of plies remembered by a [`PlyHistory`]. Move generation only ever looks at the most recent one.
pub const HISTORY_CAPACITY: usize = 8;

/// A single ply: one piece moving from one square to another.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ply {
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Piece>,
}

impl Ply {
    /// Whether this ply was a pawn advancing two squares at once.
    pub fn is_double_pawn_push(&self) -> bool {
        self.piece.kind == PieceKind::Pawn
            && self.from.col() == self.to.col()
            && (self.from.row() - self.to.row()).abs() == 2
    }
}

/// A fixed-capacity ring buffer of the most recent plies played on a board. Older plies are overwritten.
#[derive(Clone, Debug)]
pub struct PlyHistory {
    plies: [Option<Ply>; HISTORY_CAPACITY],
    /// Index of the slot the next ply will be written to.
    head: usize,
    len: usize,
}

impl PlyHistory {
    pub fn new() -> PlyHistory {
        PlyHistory {
            plies: [None; HISTORY_CAPACITY],
            head: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, ply: Ply) {
        self.plies[self.head] = Some(ply);
        self.head = (self.head + 1) % HISTORY_CAPACITY;
        self.len = (self.len + 1).min(HISTORY_CAPACITY);
    }

    /// The ply played immediately before now, if any.
    pub fn last(&self) -> Option<Ply> {
        if self.len == 0 {
            return None;
        }

        self.plies[(self.head + HISTORY_CAPACITY - 1) % HISTORY_CAPACITY]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for PlyHistory {
    fn default() -> Self {
        PlyHistory::new()
    }
}
