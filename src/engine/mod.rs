pub mod board;
pub mod check;
pub mod game;
pub mod geometry;
pub mod movegen;
pub mod notation;
pub mod types;

pub use board::{Board, Position, START_FEN};
pub use game::{Game, MoveRecord};
pub use movegen::{apply_move, is_move_legal, legal_moves, legal_moves_from};
pub use types::*;
