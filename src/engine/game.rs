//! Stateful game controller wrapping Position.
//!
//! `Game` owns the live position, the history of played moves and the
//! current status. It is what the self-play loop drives.

use crate::engine::board::Position;
use crate::engine::check;
use crate::engine::movegen;
use crate::engine::types::{ChessError, Color, GameStatus, Move, Square};

// =========================================================================
// MoveRecord
// =========================================================================

/// A recorded move in the game history.
#[derive(Clone, Debug)]
pub struct MoveRecord {
    /// The move as generated, including any en-passant victim.
    pub mv: Move,
    /// Long algebraic notation, computed at move time.
    pub notation: String,
    /// Position after the move.
    pub fen_after: String,
}

// =========================================================================
// Game
// =========================================================================

/// A game with history and status tracking.
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    history: Vec<MoveRecord>,
    status: GameStatus,
    starting_fen: String,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        let position = Position::starting();
        let starting_fen = position.to_fen();
        Self {
            position,
            history: Vec::new(),
            status: GameStatus::Active,
            starting_fen,
        }
    }

    /// Create a game from a FEN string. Both kings must be present.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        Self::from_position(Position::from_fen(fen)?)
    }

    /// Like [`Game::from_fen`] but falls back to the starting position when
    /// the text does not parse.
    pub fn from_fen_or_default(fen: &str) -> Result<Self, ChessError> {
        Self::from_position(Position::from_fen_or_default(fen))
    }

    /// Wrap an existing position.
    pub fn from_position(position: Position) -> Result<Self, ChessError> {
        check::is_king_in_check(position.board(), &position, !position.side_to_move())?;
        let status = check::status(&position)?;
        let starting_fen = position.to_fen();
        Ok(Self {
            position,
            history: Vec::new(),
            status,
            starting_fen,
        })
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// All legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        movegen::legal_moves_for_side(&self.position)
    }

    /// Legal moves from a specific square.
    pub fn legal_moves_from(&self, sq: Square) -> Vec<Move> {
        movegen::legal_moves_from(sq, &self.position)
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    pub fn starting_fen(&self) -> &str {
        &self.starting_fen
    }

    /// The color that delivered mate, if the game ended that way.
    pub fn winner(&self) -> Option<Color> {
        match self.status {
            GameStatus::Checkmate => Some(!self.position.side_to_move()),
            _ => None,
        }
    }

    // -----------------------------------------------------------------
    // Play
    // -----------------------------------------------------------------

    /// Play a move, returning the status that results.
    ///
    /// The move is matched against the legal list on origin, destination
    /// and moving piece. Position, history and status change together or
    /// not at all. A move that captures a king ends the game as checkmate.
    pub fn play(&mut self, mv: Move) -> Result<GameStatus, ChessError> {
        if self.status.is_game_over() {
            return Err(ChessError::GameOver(self.status.to_string()));
        }

        let legal = movegen::legal_moves_from(mv.from, &self.position)
            .into_iter()
            .find(|m| m.to == mv.to && m.piece == mv.piece)
            .ok_or_else(|| ChessError::IllegalMove {
                from: mv.from.to_algebraic(),
                to: mv.to.to_algebraic(),
            })?;

        let mut next = self.position.clone();
        next.play(&legal);
        let status = match check::status(&next) {
            Ok(status) => status,
            // Only reachable through the en-passant discovered-check gap.
            Err(ChessError::MissingKing(color)) if color == next.side_to_move() => {
                tracing::warn!(%color, mv = %legal, "king captured, ending the game");
                GameStatus::Checkmate
            }
            Err(err) => return Err(err),
        };

        self.history.push(MoveRecord {
            mv: legal,
            notation: legal.notation(),
            fen_after: next.to_fen(),
        });
        self.position = next;
        self.status = status;

        tracing::debug!(
            ply = self.history.len(),
            mv = %legal,
            status = %self.status,
            "move played"
        );
        Ok(self.status)
    }

    /// Play the legal move from `from` to `to`.
    pub fn play_squares(&mut self, from: Square, to: Square) -> Result<GameStatus, ChessError> {
        let mv = movegen::find_legal_move(from, to, &self.position).ok_or_else(|| {
            ChessError::IllegalMove {
                from: from.to_algebraic(),
                to: to.to_algebraic(),
            }
        })?;
        self.play(mv)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
