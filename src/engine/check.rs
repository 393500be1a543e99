//! Check, checkmate and game status detection.

use crate::engine::board::{Board, Position};
use crate::engine::movegen;
use crate::engine::types::{ChessError, Color, GameStatus, Square};

/// Square of `color`'s king on `board`.
pub fn king_square(board: &Board, color: Color) -> Option<Square> {
    board.king_square(color)
}

/// Does any opponent pseudo-legal move land on `color`'s king?
///
/// A board without that king counts as not attacked, which keeps the
/// legality filter usable on fragmentary positions.
pub(crate) fn king_attacked(board: &Board, pos: &Position, color: Color) -> bool {
    let Some(king) = board.king_square(color) else {
        return false;
    };
    movegen::all_moves_for_color(board, pos, !color, false)
        .iter()
        .any(|mv| mv.to == king)
}

/// Is `color`'s king attacked on `board`?
pub fn is_king_in_check(board: &Board, pos: &Position, color: Color) -> Result<bool, ChessError> {
    if board.king_square(color).is_none() {
        return Err(ChessError::MissingKing(color));
    }
    Ok(king_attacked(board, pos, color))
}

/// In check with no legal move.
pub fn is_checkmate(board: &Board, pos: &Position, color: Color) -> Result<bool, ChessError> {
    if !is_king_in_check(board, pos, color)? {
        return Ok(false);
    }
    Ok(movegen::all_moves_for_color(board, pos, color, true).is_empty())
}

/// Status for the side to move.
pub fn status(pos: &Position) -> Result<GameStatus, ChessError> {
    let us = pos.side_to_move();
    let in_check = is_king_in_check(pos.board(), pos, us)?;
    let has_moves = !movegen::legal_moves_for_side(pos).is_empty();

    Ok(match (in_check, has_moves) {
        (true, false) => GameStatus::Checkmate,
        (false, false) => GameStatus::NoLegalMoves,
        (true, true) => GameStatus::Check,
        (false, true) => GameStatus::Active,
    })
}
