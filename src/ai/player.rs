//! Move-selection strategies.
//!
//! The three strategies form a closed set behind one entry point,
//! [`Player::choose_move`]:
//!   - `Random` plays a uniformly random legal move.
//!   - `Greedy` captures the most valuable piece it can, breaking ties at random.
//!   - `Search` runs the alpha-beta [`Searcher`].

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::engine::board::Position;
use crate::engine::movegen;
use crate::engine::types::{ChessError, Color, Move};

use super::search::{SearchLimits, Searcher};

/// An automated player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Player {
    Random,
    Greedy,
    Search(SearchLimits),
}

impl Player {
    /// Pick a move for `color` in `pos` using the thread-local RNG.
    ///
    /// Fails with `NoLegalMoves` instead of searching when `color` cannot
    /// move.
    pub fn choose_move(&self, pos: &Position, color: Color) -> Result<Move, ChessError> {
        self.choose_move_with(pos, color, &mut rand::thread_rng())
    }

    /// Like [`Player::choose_move`] with a caller-supplied RNG.
    pub fn choose_move_with<R: Rng + ?Sized>(
        &self,
        pos: &Position,
        color: Color,
        rng: &mut R,
    ) -> Result<Move, ChessError> {
        let moves = movegen::all_moves_for_color(pos.board(), pos, color, true);
        if moves.is_empty() {
            return Err(ChessError::NoLegalMoves(color));
        }

        match self {
            Player::Random => moves.choose(rng).copied().ok_or(ChessError::NoLegalMoves(color)),
            Player::Greedy => Ok(greedy_pick(&moves, rng)),
            Player::Search(limits) => Searcher::new(*limits)
                .choose_move(pos, color)
                .ok_or(ChessError::NoLegalMoves(color)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Player::Random => "random",
            Player::Greedy => "greedy",
            Player::Search(_) => "search",
        }
    }

    /// Parse a strategy name; `search` uses the given limits.
    pub fn parse_with_limits(name: &str, limits: SearchLimits) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "random" => Some(Player::Random),
            "greedy" => Some(Player::Greedy),
            "search" => Some(Player::Search(limits)),
            _ => None,
        }
    }
}

impl FromStr for Player {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_limits(s, SearchLimits::default())
            .ok_or_else(|| format!("unknown player strategy: {s}"))
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Search(limits) => write!(f, "search(depth {})", limits.depth),
            other => f.write_str(other.name()),
        }
    }
}

/// Highest captured value wins; quiet moves count as zero. Ties are broken
/// uniformly.
fn greedy_pick<R: Rng + ?Sized>(moves: &[Move], rng: &mut R) -> Move {
    let gain = |m: &Move| m.captured.kind().map_or(0, |k| k.value());
    let best = moves.iter().map(gain).max().unwrap_or(0);
    let candidates: Vec<Move> = moves.iter().copied().filter(|m| gain(m) == best).collect();
    candidates.choose(rng).copied().unwrap_or(moves[0])
}
