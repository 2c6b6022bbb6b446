// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::core::Square;
use serde::{ser::SerializeSeq, Serialize, Serializer};
use std::fmt;
use std::iter::FromIterator;
use std::ops;

/// A set of squares on the chessboard. The implementation of SquareSet is designed to mirror
/// [`std::collections::HashSet`], but stores squares as a single 64-bit word. A square can only be present once,
/// so sets of destinations never contain duplicates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct SquareSet(u64);

impl SquareSet {
    /// Creates a new, empty SquareSet.
    pub const fn empty() -> SquareSet {
        SquareSet(0)
    }

    /// Tests whether or not the given square is contained within this SquareSet.
    pub const fn contains(&self, square: Square) -> bool {
        self.0 & (1u64 << square.0) != 0
    }

    pub fn insert(&mut self, square: Square) {
        self.0 |= 1u64 << square.0;
    }

    pub fn remove(&mut self, square: Square) {
        self.0 &= !(1u64 << square.0);
    }

    pub const fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn or(self, other: SquareSet) -> SquareSet {
        SquareSet(self.0 | other.0)
    }

    pub fn iter(&self) -> SquareSetIterator {
        SquareSetIterator(self.0)
    }
}

impl ops::BitOr for SquareSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl ops::BitOrAssign for SquareSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = SquareSetIterator;

    fn into_iter(self) -> Self::IntoIter {
        SquareSetIterator(self.0)
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut set = SquareSet::empty();
        for sq in iter {
            set.insert(sq);
        }
        set
    }
}

impl Serialize for SquareSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len() as usize))?;
        for sq in self.iter() {
            seq.serialize_element(&sq)?;
        }
        seq.end()
    }
}

impl fmt::Display for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8).rev() {
            for col in 0..8 {
                let sq = Square((row * 8 + col) as u8);
                if self.contains(sq) {
                    write!(f, " 1 ")?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", row + 1)?;
        }

        for _ in 0..8 {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in 'a'..='h' {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

/// An iterator over squares stored in a [`SquareSet`], in index order.
pub struct SquareSetIterator(u64);

impl Iterator for SquareSetIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            let next = self.0.trailing_zeros() as u8;
            self.0 &= self.0 - 1;
            Some(Square(next))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SquareSet;
    use crate::core::*;

    fn sq(row: i32, col: i32) -> Square {
        Square::at(row, col).unwrap()
    }

    #[test]
    fn test_set_clear() {
        let mut set = SquareSet::empty();
        assert!(!set.contains(sq(0, 0)));
        set.insert(sq(0, 0));
        assert!(set.contains(sq(0, 0)));
        set.remove(sq(0, 0));
        assert!(!set.contains(sq(0, 0)));
    }

    #[test]
    fn insert_is_idempotent() {
        let mut set = SquareSet::empty();
        set.insert(sq(2, 0));
        set.insert(sq(2, 0));
        set.insert(sq(3, 0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn iter() {
        let set: SquareSet = vec![sq(4, 0), sq(2, 0), sq(3, 0)].into_iter().collect();
        let squares: Vec<_> = set.into_iter().collect();
        assert_eq!(squares, vec![sq(2, 0), sq(3, 0), sq(4, 0)]);
    }

    #[test]
    fn union() {
        let mut set: SquareSet = vec![sq(0, 0)].into_iter().collect();
        set |= vec![sq(7, 7)].into_iter().collect::<SquareSet>();
        let both = set | vec![sq(0, 0), sq(3, 3)].into_iter().collect::<SquareSet>();
        assert_eq!(3, both.len());
    }

    #[test]
    fn serializes_as_square_names() {
        let set: SquareSet = vec![sq(2, 4), sq(3, 4)].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(r#"["e3","e4"]"#, json);
    }
}
