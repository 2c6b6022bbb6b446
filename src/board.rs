// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    convert::TryFrom,
    fmt::{self, Write},
};

use thiserror::Error;
use tracing::debug;

use crate::core::*;

mod history;

pub use history::{Ply, PlyHistory, HISTORY_CAPACITY};

/// The read-only view of a board that move generation needs. [`Board`] implements it, but callers that keep
/// their own board representation can implement it too.
pub trait BoardView {
    /// The piece standing on `square`, if any.
    fn occupant_at(&self, square: Square) -> Option<Piece>;

    /// The square `piece` currently stands on, or `None` if it is not on this board.
    fn locate(&self, piece: Piece) -> Option<Square>;

    /// True iff `piece` is a pawn whose most recent move was a two-square advance, and that move was the ply
    /// played immediately before now.
    fn moved_two_squares_last_ply(&self, piece: Piece) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("no piece on square {0}")]
    EmptySquare(Square),
    #[error("piece {0} is not on the board")]
    PieceNotFound(PieceId),
    #[error("piece on {0} cannot move to the square it stands on")]
    NullMove(Square),
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// A board: which piece stands on each square, whose turn it is, and the last few plies that were played.
#[derive(Clone, Debug)]
pub struct Board {
    squares: [Option<Piece>; 64],
    current_player: Side,
    history: PlyHistory,
}

impl Board {
    pub fn empty() -> Board {
        Board {
            squares: [None; 64],
            current_player: Side::White,
            history: PlyHistory::new(),
        }
    }

    pub fn starting_position() -> Board {
        let mut board = Board::empty();
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            let col = col as i32;
            board.place(0, col, Piece::new(kind, Side::White));
            board.place(1, col, Piece::new(PieceKind::Pawn, Side::White));
            board.place(6, col, Piece::new(PieceKind::Pawn, Side::Black));
            board.place(7, col, Piece::new(kind, Side::Black));
        }

        board
    }

    fn place(&mut self, row: i32, col: i32, piece: Piece) {
        self.squares[(row * 8 + col) as usize] = Some(piece);
    }

    pub fn current_player(&self) -> Side {
        self.current_player
    }

    pub fn history(&self) -> &PlyHistory {
        &self.history
    }

    pub fn get_piece(&self, square: Square) -> Option<Piece> {
        self.squares[square.as_u8() as usize]
    }

    /// Puts `piece` on `square`, returning whatever stood there before. If `piece` was already elsewhere on the
    /// board it is lifted from its old square first. Placing a piece is not a move and is not recorded in the
    /// board's history.
    pub fn set_piece(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        if let Some(old_square) = self.find_piece(piece) {
            self.squares[old_square.as_u8() as usize] = None;
        }

        self.squares[square.as_u8() as usize].replace(piece)
    }

    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.as_u8() as usize].take()
    }

    pub fn find_piece(&self, piece: Piece) -> Option<Square> {
        squares().find(|&sq| self.get_piece(sq).map(|p| p.id) == Some(piece.id))
    }

    /// Iterates over every piece of the given side along with the square it stands on.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        squares().filter_map(move |sq| match self.get_piece(sq) {
            Some(piece) if piece.side == side => Some((sq, piece)),
            _ => None,
        })
    }

    /// Plays a ply: moves the piece on `from` to `to`, capturing whatever stands on `to`, and passes the turn to
    /// the other player. A pawn moving diagonally onto an empty square behind a pawn that just advanced two
    /// squares captures that pawn en passant.
    ///
    /// Returns the captured piece, if there was one. No rule checking is done here; ask
    /// [`available_moves`](crate::movegen::available_moves) first.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<Option<Piece>, BoardError> {
        let piece = self.get_piece(from).ok_or(BoardError::EmptySquare(from))?;
        if from == to {
            return Err(BoardError::NullMove(from));
        }

        let mut captured = self.remove_piece(to);
        if captured.is_none() && piece.kind == PieceKind::Pawn && from.col() != to.col() {
            // En-passant is the only capture where the captured piece does not stand on the destination square.
            if let Ok(passed) = Square::at(from.row(), to.col()) {
                if let Some(victim) = self.get_piece(passed) {
                    if victim.is_enemy_of(&piece) && self.moved_two_squares_last_ply(victim) {
                        captured = self.remove_piece(passed);
                    }
                }
            }
        }

        self.squares[from.as_u8() as usize] = None;
        self.squares[to.as_u8() as usize] = Some(piece);
        self.history.push(Ply {
            piece,
            from,
            to,
            captured,
        });
        self.current_player = piece.side.toggle();
        debug!(
            piece = %piece,
            id = %piece.id,
            %from,
            %to,
            captured = ?captured.map(|p| p.to_string()),
            "ply"
        );
        Ok(captured)
    }

    /// Moves `piece` from wherever it currently stands to `to`.
    pub fn move_to(&mut self, piece: Piece, to: Square) -> Result<Option<Piece>, BoardError> {
        let from = self
            .find_piece(piece)
            .ok_or(BoardError::PieceNotFound(piece.id))?;
        self.move_piece(from, to)
    }
}

impl BoardView for Board {
    fn occupant_at(&self, square: Square) -> Option<Piece> {
        self.get_piece(square)
    }

    fn locate(&self, piece: Piece) -> Option<Square> {
        self.find_piece(piece)
    }

    fn moved_two_squares_last_ply(&self, piece: Piece) -> bool {
        match self.history.last() {
            Some(ply) => {
                ply.piece.id == piece.id
                    && ply.is_double_pawn_push()
                    && self.get_piece(ply.to).map(|p| p.id) == Some(piece.id)
            }
            None => false,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

//
// FEN parsing and generation.
//
// Only the piece placement, side to move and en-passant fields of FEN mean anything to a `Board`. Castling
// rights and move clocks are accepted and dropped.
//

/// Possible errors that can arise when parsing a FEN string into a `Board`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum FenParseError {
    #[error("unexpected char: {0}")]
    UnexpectedChar(char),
    #[error("unexpected EOF while reading")]
    UnexpectedEnd,
    #[error("invalid digit")]
    InvalidDigit,
    #[error("file does not sum to 8")]
    FileDoesNotSumToEight,
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
    #[error("invalid side to move")]
    InvalidSideToMove,
    #[error("invalid castle")]
    InvalidCastle,
    #[error("invalid en-passant")]
    InvalidEnPassant,
    #[error("invalid move clock: {0}")]
    InvalidClock(String),
}

impl Board {
    /// Constructs a new board from a FEN representation of a position. A FEN en-passant target is recorded as
    /// the double pawn push that produced it, so en-passant captures are available on the loaded board.
    pub fn from_fen(fen: impl AsRef<str>) -> Result<Board, FenParseError> {
        use std::{iter::Peekable, str::Chars};

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat<'a>(iter: &mut Stream<'a>, expected: char) -> Result<(), FenParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn peek<'a>(iter: &mut Stream<'a>) -> Result<char, FenParseError> {
            iter.peek().copied().ok_or(FenParseError::UnexpectedEnd)
        }

        fn eat_side_to_move(field: Option<&str>) -> Result<Side, FenParseError> {
            match field {
                Some("w") => Ok(Side::White),
                Some("b") => Ok(Side::Black),
                Some(_) => Err(FenParseError::InvalidSideToMove),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn eat_castle_status(field: Option<&str>) -> Result<(), FenParseError> {
            match field {
                None | Some("-") => Ok(()),
                Some(s) if s.chars().all(|c| "KQkq".contains(c)) => Ok(()),
                Some(_) => Err(FenParseError::InvalidCastle),
            }
        }

        fn eat_en_passant(field: Option<&str>) -> Result<Option<Square>, FenParseError> {
            match field {
                None | Some("-") => Ok(None),
                Some(s) => s
                    .parse::<Square>()
                    .map(Some)
                    .map_err(|_| FenParseError::InvalidEnPassant),
            }
        }

        fn eat_clock(field: Option<&str>) -> Result<(), FenParseError> {
            match field {
                None => Ok(()),
                Some(s) => s
                    .parse::<u16>()
                    .map(|_| ())
                    .map_err(|_| FenParseError::InvalidClock(s.to_owned())),
            }
        }

        let mut board = Board::empty();
        let str_ref = fen.as_ref();
        let iter = &mut str_ref.chars().peekable();
        for row in (0..8).rev() {
            let mut col = 0;
            while col <= 7 {
                let c = peek(iter)?;
                // digits 1 through 8 indicate empty squares.
                if c.is_ascii_digit() {
                    if !('1'..='8').contains(&c) {
                        return Err(FenParseError::InvalidDigit);
                    }

                    col += c as i32 - '0' as i32;
                    if col > 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    iter.next();
                    continue;
                }

                // if it's not a digit, it represents a piece.
                let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
                board.place(row, col, piece);
                iter.next();
                col += 1;
            }

            if row != 0 {
                eat(iter, '/')?;
            }
        }

        let rest: String = iter.collect();
        let mut fields = rest.split_whitespace();
        board.current_player = eat_side_to_move(fields.next())?;
        eat_castle_status(fields.next())?;
        let en_passant = eat_en_passant(fields.next())?;
        eat_clock(fields.next())?;
        eat_clock(fields.next())?;

        if let Some(target) = en_passant {
            // The pawn that passed over `target` belongs to the side that just moved.
            let mover = board.current_player.toggle();
            if target.row() != mover.pawn_start_row() + mover.forward() {
                return Err(FenParseError::InvalidEnPassant);
            }

            let landed = target
                .offset(mover.forward(), 0)
                .ok_or(FenParseError::InvalidEnPassant)?;
            let started = target
                .offset(-mover.forward(), 0)
                .ok_or(FenParseError::InvalidEnPassant)?;
            if board.get_piece(target).is_some() || board.get_piece(started).is_some() {
                return Err(FenParseError::InvalidEnPassant);
            }

            match board.get_piece(landed) {
                Some(pawn) if pawn.kind == PieceKind::Pawn && pawn.side == mover => {
                    board.history.push(Ply {
                        piece: pawn,
                        from: started,
                        to: landed,
                        captured: None,
                    });
                }
                _ => return Err(FenParseError::InvalidEnPassant),
            }
        }

        Ok(board)
    }

    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for row in (0..8).rev() {
            let mut empty_squares = 0;
            for col in 0..8 {
                let square = Square((row * 8 + col) as u8);
                if let Some(piece) = self.get_piece(square) {
                    if empty_squares != 0 {
                        let _ = write!(&mut buf, "{}", empty_squares);
                    }
                    let _ = write!(&mut buf, "{}", piece);
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                let _ = write!(&mut buf, "{}", empty_squares);
            }

            if row != 0 {
                buf.push('/');
            }
        }

        buf.push(' ');
        match self.current_player {
            Side::White => buf.push('w'),
            Side::Black => buf.push('b'),
        }
        buf.push_str(" - ");
        let passed = self
            .history
            .last()
            .filter(|ply| self.moved_two_squares_last_ply(ply.piece))
            .and_then(|ply| Square::at((ply.from.row() + ply.to.row()) / 2, ply.to.col()).ok());
        match passed {
            Some(sq) => {
                let _ = write!(&mut buf, "{}", sq);
            }
            None => buf.push('-'),
        }
        buf.push_str(" 0 1");
        buf
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in (0..8).rev() {
            for col in 0..8 {
                let sq = Square((row * 8 + col) as u8);
                if let Some(piece) = self.get_piece(sq) {
                    write!(f, " {} ", piece)?;
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: i32, col: i32) -> Square {
        Square::at(row, col).unwrap()
    }

    mod placement {
        use super::*;

        #[test]
        fn set_and_find() {
            let mut board = Board::empty();
            let pawn = Piece::new(PieceKind::Pawn, Side::White);
            assert_eq!(None, board.set_piece(sq(1, 4), pawn));
            assert_eq!(Some(sq(1, 4)), board.find_piece(pawn));
            assert_eq!(Some(pawn), board.get_piece(sq(1, 4)));
        }

        #[test]
        fn set_piece_moves_existing_piece() {
            let mut board = Board::empty();
            let rook = Piece::new(PieceKind::Rook, Side::Black);
            board.set_piece(sq(7, 0), rook);
            board.set_piece(sq(4, 0), rook);
            assert_eq!(None, board.get_piece(sq(7, 0)));
            assert_eq!(Some(sq(4, 0)), board.find_piece(rook));
            assert!(board.history().is_empty());
        }

        #[test]
        fn same_kind_pieces_are_distinct() {
            let mut board = Board::empty();
            let a = Piece::new(PieceKind::Knight, Side::White);
            let b = Piece::new(PieceKind::Knight, Side::White);
            board.set_piece(sq(0, 1), a);
            board.set_piece(sq(0, 6), b);
            assert_eq!(Some(sq(0, 1)), board.find_piece(a));
            assert_eq!(Some(sq(0, 6)), board.find_piece(b));
        }

        #[test]
        fn starting_position_layout() {
            let board = Board::starting_position();
            assert_eq!(16, board.pieces(Side::White).count());
            assert_eq!(16, board.pieces(Side::Black).count());
            let king = board.get_piece(sq(0, 4)).unwrap();
            assert_eq!(PieceKind::King, king.kind);
            assert_eq!(Side::White, king.side);
            assert_eq!(
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
                board.as_fen()
            );
        }
    }

    mod make {
        use super::*;

        #[test]
        fn move_piece_records_ply_and_toggles_turn() {
            let mut board = Board::empty();
            let pawn = Piece::new(PieceKind::Pawn, Side::White);
            board.set_piece(sq(1, 4), pawn);
            assert_eq!(Ok(None), board.move_piece(sq(1, 4), sq(3, 4)));
            assert_eq!(Side::Black, board.current_player());
            assert_eq!(Some(sq(3, 4)), board.find_piece(pawn));
            assert!(board.moved_two_squares_last_ply(pawn));
        }

        #[test]
        fn move_from_empty_square() {
            let mut board = Board::empty();
            assert_eq!(
                Err(BoardError::EmptySquare(sq(2, 2))),
                board.move_piece(sq(2, 2), sq(3, 3))
            );
        }

        #[test]
        fn move_to_same_square_is_rejected() {
            let mut board = Board::empty();
            let rook = Piece::new(PieceKind::Rook, Side::White);
            board.set_piece(sq(0, 0), rook);
            assert_eq!(
                Err(BoardError::NullMove(sq(0, 0))),
                board.move_piece(sq(0, 0), sq(0, 0))
            );
            assert_eq!(Some(rook), board.get_piece(sq(0, 0)));
            assert!(board.history().is_empty());
            assert_eq!(Side::White, board.current_player());
        }

        #[test]
        fn move_to_missing_piece() {
            let mut board = Board::empty();
            let queen = Piece::new(PieceKind::Queen, Side::White);
            assert_eq!(
                Err(BoardError::PieceNotFound(queen.id)),
                board.move_to(queen, sq(3, 3))
            );
        }

        #[test]
        fn basic_capture() {
            let mut board = Board::empty();
            let rook = Piece::new(PieceKind::Rook, Side::White);
            let knight = Piece::new(PieceKind::Knight, Side::Black);
            board.set_piece(sq(0, 0), rook);
            board.set_piece(sq(5, 0), knight);
            assert_eq!(Ok(Some(knight)), board.move_to(rook, sq(5, 0)));
            assert_eq!(None, board.find_piece(knight));
        }

        #[test]
        fn double_push_lapses_after_next_ply() {
            let mut board = Board::empty();
            let pawn = Piece::new(PieceKind::Pawn, Side::Black);
            let king = Piece::new(PieceKind::King, Side::White);
            board.set_piece(sq(6, 3), pawn);
            board.set_piece(sq(0, 4), king);
            board.move_piece(sq(6, 3), sq(4, 3)).unwrap();
            assert!(board.moved_two_squares_last_ply(pawn));
            board.move_piece(sq(0, 4), sq(0, 5)).unwrap();
            assert!(!board.moved_two_squares_last_ply(pawn));
        }

        #[test]
        fn en_passant_capture_removes_passed_pawn() {
            let mut board = Board::empty();
            let white = Piece::new(PieceKind::Pawn, Side::White);
            let black = Piece::new(PieceKind::Pawn, Side::Black);
            board.set_piece(sq(4, 5), white);
            board.set_piece(sq(6, 4), black);
            board.move_piece(sq(6, 4), sq(4, 4)).unwrap();
            assert_eq!(Ok(Some(black)), board.move_piece(sq(4, 5), sq(5, 4)));
            assert_eq!(None, board.get_piece(sq(4, 4)));
            assert_eq!(Some(white), board.get_piece(sq(5, 4)));
        }
    }

    mod fen {
        use super::*;

        #[test]
        fn fen_smoke() {
            let board = Board::from_fen("8/8/8/8/8/8/8/8 w - - 0 0").unwrap();
            assert_eq!(Side::White, board.current_player());
            assert_eq!(0, board.pieces(Side::White).count());
            assert!(board.history().is_empty());
        }

        #[test]
        fn placement() {
            let board = Board::from_fen("8/8/8/8/3B4/8/8/4k3 b - - 0 1").unwrap();
            assert_eq!(Side::Black, board.current_player());
            let bishop = board.get_piece(sq(3, 3)).unwrap();
            assert_eq!(PieceKind::Bishop, bishop.kind);
            assert_eq!(Side::White, bishop.side);
            let king = board.get_piece(sq(0, 4)).unwrap();
            assert_eq!(Side::Black, king.side);
        }

        #[test]
        fn trailing_fields_are_optional() {
            let board = Board::from_fen("8/8/8/8/8/8/8/8 b").unwrap();
            assert_eq!(Side::Black, board.current_player());
        }

        #[test]
        fn en_passant_target_becomes_history() {
            let board = Board::from_fen("8/8/8/3pP3/8/8/8/8 w - d6 0 1").unwrap();
            let pawn = board.get_piece(sq(4, 3)).unwrap();
            assert!(board.moved_two_squares_last_ply(pawn));
            assert_eq!("8/8/8/3pP3/8/8/8/8 w - d6 0 1", board.as_fen());
        }

        #[test]
        fn empty() {
            let err = Board::from_fen("").unwrap_err();
            assert_eq!(FenParseError::UnexpectedEnd, err);
        }

        #[test]
        fn unknown_piece() {
            let err = Board::from_fen("z7/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::UnknownPiece('z'), err);
        }

        #[test]
        fn invalid_digit() {
            let err = Board::from_fen("9/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidDigit, err);
        }

        #[test]
        fn not_sum_to_8() {
            let err = Board::from_fen("pppp5/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::FileDoesNotSumToEight, err);
        }

        #[test]
        fn bad_side_to_move() {
            let err = Board::from_fen("8/8/8/8/8/8/8/8 c - - 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidSideToMove, err);
        }

        #[test]
        fn bad_castle_status() {
            let err = Board::from_fen("8/8/8/8/8/8/8/8 w a - 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidCastle, err);
        }

        #[test]
        fn en_passant_without_pawn() {
            let err = Board::from_fen("8/8/8/8/8/8/8/8 w - e6 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidEnPassant, err);
        }

        #[test]
        fn en_passant_on_wrong_rank() {
            // White to move, so the target must sit behind a black pawn on row 5.
            let err = Board::from_fen("8/8/8/8/4P3/4p3/8/8 w - e4 0 1").unwrap_err();
            assert_eq!(FenParseError::InvalidEnPassant, err);

            let err = Board::from_fen("8/8/8/8/3pP3/8/8/8 b - e6 0 1").unwrap_err();
            assert_eq!(FenParseError::InvalidEnPassant, err);
        }

        #[test]
        fn en_passant_start_square_occupied() {
            let err = Board::from_fen("8/3n4/8/3pP3/8/8/8/8 w - d6 0 1").unwrap_err();
            assert_eq!(FenParseError::InvalidEnPassant, err);
        }

        #[test]
        fn black_en_passant_target() {
            let board = Board::from_fen("8/8/8/8/3pP3/8/8/8 b - e3 0 1").unwrap();
            let pawn = board.get_piece(sq(3, 4)).unwrap();
            assert!(board.moved_two_squares_last_ply(pawn));
        }

        #[test]
        fn bad_clock() {
            let err = Board::from_fen("8/8/8/8/8/8/8/8 w - - x 0").unwrap_err();
            assert_eq!(FenParseError::InvalidClock("x".to_owned()), err);
        }

        #[test]
        fn roundtrip() {
            let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b - - 0 1";
            let board = Board::from_fen(fen).unwrap();
            assert_eq!(fen, board.as_fen());
        }
    }
}
