// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::anyhow;
use serde::Serialize;
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

use chessington::core::{Piece, Square, SquareSet};
use chessington::{movegen, Board};

/// Prints every square the piece on SQUARE can move to.
#[derive(Debug, StructOpt)]
struct Options {
    /// Emit JSON instead of one square per line.
    #[structopt(long)]
    json: bool,

    /// FEN representation of the position to analyze.
    #[structopt(name = "FEN")]
    fen: String,

    /// Square of the piece to move, e.g. "e2".
    #[structopt(name = "SQUARE")]
    square: Square,
}

#[derive(Serialize)]
struct Output {
    piece: String,
    from: Square,
    moves: SquareSet,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::WARN)
        .with_env_filter(EnvFilter::from_env("CHESSINGTON_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let ops = Options::from_args();
    let board = Board::from_fen(&ops.fen)?;
    let piece: Piece = board
        .get_piece(ops.square)
        .ok_or_else(|| anyhow!("no piece on {}", ops.square))?;
    let moves = movegen::available_moves(piece, &board)?;
    if ops.json {
        let output = Output {
            piece: piece.to_string(),
            from: ops.square,
            moves,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        for target in moves {
            println!("{}{}", ops.square, target);
        }
    }

    Ok(())
}
