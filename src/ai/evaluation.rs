//! Static position evaluation.
//!
//! Returns a score from the perspective of a given color.
//! Positive = that color is ahead.
//!
//! Components:
//!   1. Material balance (King 200, Queen 9, Rook 5, Bishop 3, Knight 3, Pawn 1)
//!   2. Mobility: 0.1 per legal move more than the opponent
//!
//! Pawn structure (doubled, blocked, isolated) is not scored.

use crate::engine::board::{Board, Position};
use crate::engine::movegen;
use crate::engine::types::{Color, PieceType};

/// Larger than any reachable evaluation; returned for a mated side.
pub const MATE_SCORE: f64 = 100_000.0;

/// Weight of one legal move of mobility advantage.
pub const MOBILITY_WEIGHT: f64 = 0.1;

/// Is this score a forced-mate score?
#[inline]
pub fn is_mate_score(score: f64) -> bool {
    score.abs() >= MATE_SCORE
}

// =========================================================================
// Components
// =========================================================================

/// Material of `color` minus material of its opponent.
pub fn material_balance(board: &Board, color: Color) -> f64 {
    PieceType::ALL
        .iter()
        .map(|&kind| {
            let own = board.count(color, kind) as i32;
            let enemy = board.count(!color, kind) as i32;
            (kind.value() * (own - enemy)) as f64
        })
        .sum()
}

/// Legal-move count of `color` minus that of its opponent, on `board`.
pub fn mobility_balance(board: &Board, pos: &Position, color: Color) -> f64 {
    let own = movegen::all_moves_for_color(board, pos, color, true).len() as f64;
    let enemy = movegen::all_moves_for_color(board, pos, !color, true).len() as f64;
    own - enemy
}

// =========================================================================
// Evaluation
// =========================================================================

/// Evaluate `pos` for `color`.
pub fn evaluate(pos: &Position, color: Color) -> f64 {
    let board = pos.board();
    material_balance(board, color) + MOBILITY_WEIGHT * mobility_balance(board, pos, color)
}

/// Evaluate `pos` for its side to move (negamax convention).
#[inline]
pub fn evaluate_relative(pos: &Position) -> f64 {
    evaluate(pos, pos.side_to_move())
}

// =========================================================================
// Tests
// =========================================================================
