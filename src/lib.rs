// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `chessington` answers one question about a chess position: where can this piece go?
//!
//! [`available_moves`] takes a piece and anything implementing [`BoardView`] and returns the set of squares the
//! piece can move or capture to, honoring obstruction, captures, double pawn pushes and en passant. It does not
//! know about check, castling or promotion.

pub mod board;
pub mod core;
pub mod geometry;
pub mod movegen;

pub use board::{Board, BoardView};
pub use movegen::{available_moves, moves_for_side, MoveGenError};
