// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Destination generation. Given a piece and a board, work out every square the piece can move or capture to.
//!
//! Candidates come from [`geometry`](crate::geometry) and are filtered here against occupancy. Check is not
//! considered: a move that leaves the mover's own king attacked is still reported.

use thiserror::Error;
use tracing::trace;

use crate::board::BoardView;
use crate::core::*;
use crate::geometry;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveGenError {
    #[error("piece {0} is not on the board")]
    PieceNotFound(PieceId),
    #[error("square out of range: ({row}, {col})")]
    InvalidSquare { row: i32, col: i32 },
}

impl From<SquareError> for MoveGenError {
    fn from(err: SquareError) -> Self {
        match err {
            SquareError::OutOfRange { row, col } => MoveGenError::InvalidSquare { row, col },
        }
    }
}

/// Whether a piece of side `us` may land on a square holding `occupant`. Empty squares and enemy pieces are
/// fine; friendly pieces are not, and neither is the enemy king, which is never offered as a capture.
fn can_capture(us: Side, occupant: Piece) -> bool {
    occupant.side != us && occupant.kind != PieceKind::King
}

fn generate_sliding_moves<B: BoardView + ?Sized>(
    piece: Piece,
    origin: Square,
    board: &B,
    moves: &mut SquareSet,
) {
    for &dir in geometry::rays_for(piece.kind) {
        for &target in &geometry::ray(origin, dir) {
            match board.occupant_at(target) {
                None => moves.insert(target),
                Some(occupant) => {
                    // The first occupied square ends the ray, whoever is on it.
                    if can_capture(piece.side, occupant) {
                        moves.insert(target);
                    }
                    break;
                }
            }
        }
    }
}

fn generate_step_moves<B: BoardView + ?Sized>(
    piece: Piece,
    origin: Square,
    board: &B,
    moves: &mut SquareSet,
) {
    for target in geometry::step_targets(piece.kind, origin) {
        match board.occupant_at(target) {
            None => moves.insert(target),
            Some(occupant) if can_capture(piece.side, occupant) => moves.insert(target),
            Some(_) => {}
        }
    }
}

fn generate_pawn_moves<B: BoardView + ?Sized>(
    piece: Piece,
    origin: Square,
    board: &B,
    moves: &mut SquareSet,
) -> Result<(), MoveGenError> {
    let us = piece.side;
    let up = us.forward();

    // Single and double pushes. Both need every square they cross to be empty.
    if let Some(single) = origin.offset(up, 0) {
        if board.occupant_at(single).is_none() {
            moves.insert(single);
            if origin.row() == us.pawn_start_row() {
                if let Some(double) = single.offset(up, 0) {
                    if board.occupant_at(double).is_none() {
                        moves.insert(double);
                    }
                }
            }
        }
    }

    let en_passant_possible = origin.row() == us.en_passant_row();
    for side_step in [-1, 1] {
        let target = match origin.offset(up, side_step) {
            Some(target) => target,
            None => continue,
        };

        match board.occupant_at(target) {
            Some(occupant) => {
                if can_capture(us, occupant) {
                    moves.insert(target);
                }
            }
            None if en_passant_possible => {
                // The pawn being captured stands beside us, on the square the target was passed over from.
                let beside = Square::at(origin.row(), target.col())?;
                if let Some(victim) = board.occupant_at(beside) {
                    if victim.kind == PieceKind::Pawn
                        && victim.side != us
                        && board.moved_two_squares_last_ply(victim)
                    {
                        moves.insert(target);
                    }
                }
            }
            None => {}
        }
    }

    Ok(())
}

/// Computes every square `piece` can move or capture to on `board`.
///
/// Fails with [`MoveGenError::PieceNotFound`] if `piece` is not currently on the board, or if the board holds a
/// piece with the same id but a different kind or side.
pub fn available_moves<B: BoardView + ?Sized>(
    piece: Piece,
    board: &B,
) -> Result<SquareSet, MoveGenError> {
    let origin = board
        .locate(piece)
        .filter(|&sq| board.occupant_at(sq) == Some(piece))
        .ok_or(MoveGenError::PieceNotFound(piece.id))?;

    let mut moves = SquareSet::empty();
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(piece, origin, board, &mut moves)?,
        PieceKind::Knight | PieceKind::King => {
            generate_step_moves(piece, origin, board, &mut moves)
        }
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            generate_sliding_moves(piece, origin, board, &mut moves)
        }
    }

    debug_assert!(
        moves
            .iter()
            .all(|sq| board.occupant_at(sq).map_or(true, |p| p.side != piece.side)),
        "generated a destination occupied by a friendly piece"
    );
    trace!(piece = %piece, id = %piece.id, %origin, count = moves.len(), "available moves");
    Ok(moves)
}

/// Computes the destinations of every piece belonging to `side`, along with the square each piece stands on.
pub fn moves_for_side<B: BoardView + ?Sized>(
    side: Side,
    board: &B,
) -> Result<Vec<(Piece, Square, SquareSet)>, MoveGenError> {
    let mut result = Vec::new();
    for sq in squares() {
        match board.occupant_at(sq) {
            Some(piece) if piece.side == side => {
                let moves = available_moves(piece, board)?;
                result.push((piece, sq, moves));
            }
            _ => {}
        }
    }

    Ok(result)
}
