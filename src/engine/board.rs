//! Mailbox chess position representation.
//!
//! `Board` is the 64-entry array of packed `Piece` values (a1 = 0 .. h8 = 63).
//! `Position` owns a board plus side to move, castling rights, en-passant
//! target and move counters, and converts to and from FEN.

use std::ops::{Index, IndexMut};

use crate::engine::types::{CastlingRights, ChessError, Color, Move, Piece, PieceType, Square, Wing};

/// Standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The 64 squares and what stands on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board([Piece; Square::NUM]);

impl Default for Board {
    fn default() -> Self {
        Board([Piece::NONE; Square::NUM])
    }
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Piece {
        self.0[sq.index()]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, piece: Piece) {
        self.0[sq.index()] = piece;
    }

    /// Move whatever stands on `from` onto `to`, leaving `from` empty.
    ///
    /// This is the bare origin/destination swap: no en-passant removal, rook
    /// relocation or promotion.
    #[inline]
    pub fn swap_move(&mut self, from: Square, to: Square) {
        self.0[to.index()] = self.0[from.index()];
        self.0[from.index()] = Piece::NONE;
    }

    /// Iterate `(square, piece)` over occupied squares, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_some())
            .map(|(i, &p)| (Square(i as u8), p))
    }

    /// Number of pieces of a given color and kind.
    pub fn count(&self, color: Color, kind: PieceType) -> usize {
        let target = Piece::new(color, kind);
        self.0.iter().filter(|&&p| p == target).count()
    }

    /// Linear scan for `color`'s king.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceType::King);
        self.0
            .iter()
            .position(|&p| p == king)
            .map(|i| Square(i as u8))
    }
}

impl Index<Square> for Board {
    type Output = Piece;
    fn index(&self, sq: Square) -> &Piece {
        &self.0[sq.index()]
    }
}

impl IndexMut<Square> for Board {
    fn index_mut(&mut self, sq: Square) -> &mut Piece {
        &mut self.0[sq.index()]
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A complete chess position.
///
/// Cloning is a deep copy: search and legality checks mutate clones so the
/// live game is never touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: Board,

    /// Whose turn it is.
    side_to_move: Color,

    /// Castling availability (K/Q/k/q). Revocation only.
    castling_rights: CastlingRights,

    /// En-passant target square (the square *behind* the double-pushed pawn).
    en_passant: Option<Square>,

    /// Half-move clock for the 50-move rule (reset on pawn move or capture).
    halfmove_clock: u32,

    /// Full-move number (starts at 1, incremented after Black moves).
    fullmove_number: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl Position {
    /// Create an empty board with no pieces, White to move.
    pub fn empty() -> Self {
        Position {
            board: Board::empty(),
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Standard starting position.
    pub fn starting() -> Self {
        Self::from_fen(START_FEN).expect("starting FEN is always valid")
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.board.get(sq)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    // -----------------------------------------------------------------------
    // Mutators
    // -----------------------------------------------------------------------

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    pub fn set_en_passant(&mut self, target: Option<Square>) {
        self.en_passant = target;
    }

    pub fn clear_castling(&mut self, color: Color, wing: Wing) {
        self.castling_rights.revoke(color, wing);
    }

    /// Set a castling flag. Only clearing is supported; asking to grant a
    /// right always fails.
    pub fn set_castling(&mut self, color: Color, wing: Wing, allowed: bool) -> Result<(), ChessError> {
        if allowed {
            return Err(ChessError::CastlingGrantUnsupported { color, wing });
        }
        self.clear_castling(color, wing);
        Ok(())
    }

    pub fn increment_halfmove(&mut self) {
        self.halfmove_clock = self.halfmove_clock.saturating_add(1);
    }

    pub fn reset_halfmove(&mut self) {
        self.halfmove_clock = 0;
    }

    pub fn increment_fullmove(&mut self) {
        self.fullmove_number = self.fullmove_number.saturating_add(1);
    }

    /// Revoke every castling right tied to `sq` (a king or rook home square).
    pub fn revoke_castling_touching(&mut self, sq: Square) {
        match sq.0 {
            4 => {
                self.clear_castling(Color::White, Wing::Kingside);
                self.clear_castling(Color::White, Wing::Queenside);
            }
            60 => {
                self.clear_castling(Color::Black, Wing::Kingside);
                self.clear_castling(Color::Black, Wing::Queenside);
            }
            0 => self.clear_castling(Color::White, Wing::Queenside),
            7 => self.clear_castling(Color::White, Wing::Kingside),
            56 => self.clear_castling(Color::Black, Wing::Queenside),
            63 => self.clear_castling(Color::Black, Wing::Kingside),
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Playing moves
    // -----------------------------------------------------------------------

    /// Apply a move with its full side effects. The caller is responsible for
    /// legality; see `movegen::apply_move` for the checked entry point.
    ///
    /// Handles en-passant capture and target bookkeeping, rook relocation on
    /// castling, promotion (always to a queen), castling-right revocation and
    /// both move counters.
    pub fn play(&mut self, mv: &Move) {
        let moving = self.board.get(mv.from);
        let us = moving.color().unwrap_or(self.side_to_move);
        let kind = moving.kind();
        let mut captured = self.board.get(mv.to).is_some();

        // ---- En passant: the victim sits beside the origin ----
        if kind == Some(PieceType::Pawn)
            && Some(mv.to) == self.en_passant
            && mv.from.file() != mv.to.file()
            && self.board.get(mv.to).is_none()
        {
            let victim = Square::from_file_rank(mv.to.file(), mv.from.rank());
            if self.board.get(victim) == Piece::new(!us, PieceType::Pawn) {
                self.board.set(victim, Piece::NONE);
                captured = true;
            }
        }

        self.board.swap_move(mv.from, mv.to);

        // ---- Castling: move the rook ----
        if kind == Some(PieceType::King) && mv.from.file().abs_diff(mv.to.file()) == 2 {
            let (rook_from, rook_to) = if mv.to.file() > mv.from.file() {
                (Square(mv.from.0 + 3), Square(mv.from.0 + 1))
            } else {
                (Square(mv.from.0 - 4), Square(mv.from.0 - 1))
            };
            self.board.swap_move(rook_from, rook_to);
        }

        // ---- Promotion ----
        if kind == Some(PieceType::Pawn) && (mv.to.rank() == 7 || mv.to.rank() == 0) {
            self.board.set(mv.to, Piece::new(us, PieceType::Queen));
        }

        // ---- Castling rights ----
        self.revoke_castling_touching(mv.from);
        self.revoke_castling_touching(mv.to);

        // ---- En-passant target: only a double push opens a new one ----
        self.en_passant = None;
        if kind == Some(PieceType::Pawn) && mv.from.rank().abs_diff(mv.to.rank()) == 2 {
            let skipped = Square::from_file_rank(mv.from.file(), (mv.from.rank() + mv.to.rank()) / 2);
            self.en_passant = Some(skipped);
        }

        // ---- Counters ----
        if kind == Some(PieceType::Pawn) || captured {
            self.reset_halfmove();
        } else {
            self.increment_halfmove();
        }
        if us == Color::Black {
            self.increment_fullmove();
        }

        self.side_to_move = !us;
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (rank 8 at top), useful for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for rank in (0..8).rev() {
            s.push((b'1' + rank) as char);
            s.push(' ');
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                s.push(self.board.get(sq).to_fen_char().unwrap_or('.'));
                if file < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

// ---------------------------------------------------------------------------
// FEN parsing & generation
// ---------------------------------------------------------------------------

impl Position {
    /// Parse a FEN string into a `Position`.
    ///
    /// Validates all 6 fields (piece placement, side to move, castling,
    /// en passant, halfmove clock, fullmove number). King count is not
    /// checked; the engine assumes callers start from sensible positions.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ChessError::InvalidFen(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        }

        let mut pos = Position::empty();

        // ----- Field 1: Piece placement -----
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8; // FEN starts from rank 8
            let mut file: u8 = 0;
            for ch in rank_str.chars() {
                if file > 7 {
                    return Err(ChessError::InvalidFen(format!(
                        "too many squares in rank {}",
                        rank + 1
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidFen(format!(
                            "invalid empty count '{ch}' in rank {}",
                            rank + 1
                        )));
                    }
                    file += digit as u8;
                } else if let Some(piece) = Piece::from_fen_char(ch) {
                    pos.board.set(Square::from_file_rank(file, rank), piece);
                    file += 1;
                } else {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid character '{ch}' in piece placement"
                    )));
                }
            }
            if file != 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {} has {} squares instead of 8",
                    rank + 1,
                    file
                )));
            }
        }

        // ----- Field 2: Side to move -----
        pos.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid side to move: '{other}'"
                )));
            }
        };

        // ----- Field 3: Castling availability -----
        pos.castling_rights = CastlingRights::from_fen(fields[2]).ok_or_else(|| {
            ChessError::InvalidFen(format!("invalid castling string: '{}'", fields[2]))
        })?;

        // ----- Field 4: En passant target square -----
        if fields[3] != "-" {
            let ep_sq = Square::from_algebraic(fields[3]).ok_or_else(|| {
                ChessError::InvalidFen(format!("invalid en passant square: '{}'", fields[3]))
            })?;
            // En passant target must be on rank 3 (for Black) or rank 6 (for White).
            let rank = ep_sq.rank();
            if rank != 2 && rank != 5 {
                return Err(ChessError::InvalidFen(format!(
                    "en passant square {} is not on rank 3 or 6",
                    fields[3]
                )));
            }
            pos.en_passant = Some(ep_sq);
        }

        // ----- Field 5: Halfmove clock -----
        pos.halfmove_clock = fields[4].parse::<u32>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid halfmove clock: '{}'", fields[4]))
        })?;

        // ----- Field 6: Fullmove number -----
        pos.fullmove_number = fields[5].parse::<u32>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid fullmove number: '{}'", fields[5]))
        })?;
        if pos.fullmove_number == 0 {
            return Err(ChessError::InvalidFen(
                "fullmove number must be >= 1".to_string(),
            ));
        }

        Ok(pos)
    }

    /// Parse `fen`, falling back to the starting position if it is malformed.
    pub fn from_fen_or_default(fen: &str) -> Self {
        match Self::from_fen(fen) {
            Ok(pos) => pos,
            Err(err) => {
                tracing::warn!(%err, fen, "falling back to the starting position");
                Self::starting()
            }
        }
    }

    /// Export the position as a FEN string. The en-passant field is written
    /// as an algebraic square name.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(80);

        // ----- Field 1: Piece placement -----
        for rank in (0..8).rev() {
            let mut empty_count = 0u8;
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                match self.board.get(sq).to_fen_char() {
                    Some(ch) => {
                        if empty_count > 0 {
                            fen.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        fen.push(ch);
                    }
                    None => {
                        empty_count += 1;
                    }
                }
            }
            if empty_count > 0 {
                fen.push((b'0' + empty_count) as char);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        // ----- Field 2: Side to move -----
        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        // ----- Field 3: Castling -----
        fen.push(' ');
        fen.push_str(&self.castling_rights.to_fen());

        // ----- Field 4: En passant -----
        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        // ----- Field 5: Halfmove clock -----
        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());

        // ----- Field 6: Fullmove number -----
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn white(kind: PieceType) -> Piece {
        Piece::new(Color::White, kind)
    }

    fn black(kind: PieceType) -> Piece {
        Piece::new(Color::Black, kind)
    }

    // ===================================================================
    // Starting position
    // ===================================================================

    #[test]
    fn starting_position_fields() {
        let p = Position::starting();
        assert_eq!(p.to_fen(), START_FEN);
        assert_eq!(p.side_to_move(), Color::White);
        assert_eq!(p.castling_rights(), CastlingRights::ALL);
        assert_eq!(p.en_passant(), None);
        assert_eq!(p.halfmove_clock(), 0);
        assert_eq!(p.fullmove_number(), 1);
    }

    #[test]
    fn starting_position_pieces() {
        let p = Position::starting();
        assert_eq!(p.piece_at(sq("e1")), white(PieceType::King));
        assert_eq!(p.piece_at(sq("d8")), black(PieceType::Queen));
        assert_eq!(p.piece_at(sq("a1")), white(PieceType::Rook));
        assert_eq!(p.piece_at(sq("g8")), black(PieceType::Knight));
        for file in 0..8 {
            assert_eq!(p.piece_at(Square::from_file_rank(file, 1)), white(PieceType::Pawn));
            assert_eq!(p.piece_at(Square::from_file_rank(file, 6)), black(PieceType::Pawn));
            for rank in 2..6 {
                assert!(p.piece_at(Square::from_file_rank(file, rank)).is_none());
            }
        }
        assert_eq!(p.board().pieces().count(), 32);
        assert_eq!(p.board().count(Color::White, PieceType::Pawn), 8);
    }

    #[test]
    fn king_square_scan() {
        let p = Position::starting();
        assert_eq!(p.board().king_square(Color::White), Some(sq("e1")));
        assert_eq!(p.board().king_square(Color::Black), Some(sq("e8")));
        assert_eq!(Board::empty().king_square(Color::White), None);
    }

    // ===================================================================
    // FEN round trip
    // ===================================================================

    #[test]
    fn fen_round_trip_corpus() {
        let corpus = [
            START_FEN,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            "4k3/8/8/8/8/8/8/4K3 b - - 57 103",
            "N7/8/8/8/8/8/8/8 w - - 0 1",
        ];
        for fen in corpus {
            let first = pos(fen);
            let second = pos(&first.to_fen());
            assert_eq!(first, second, "field mismatch for {fen}");
            assert_eq!(first.to_fen(), fen, "text mismatch for {fen}");
        }
    }

    #[test]
    fn en_passant_field_is_algebraic() {
        let p = pos("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        assert_eq!(p.en_passant(), Some(Square(20)));
        assert!(p.to_fen().contains(" e3 "));
    }

    #[test]
    fn fen_tolerates_extra_whitespace() {
        let p = pos("  rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR   w KQkq -  0 1 ");
        assert_eq!(p.to_fen(), START_FEN);
    }

    // ===================================================================
    // FEN validation errors
    // ===================================================================

    #[test]
    fn fen_error_wrong_field_count() {
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").is_err());
        assert!(Position::from_fen(&format!("{START_FEN} extra")).is_err());
        assert!(Position::from_fen("").is_err());
    }

    #[test]
    fn fen_error_wrong_rank_count() {
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_err());
    }

    #[test]
    fn fen_error_rank_does_not_sum_to_eight() {
        assert!(Position::from_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_err());
        assert!(Position::from_fen("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_err());
        assert!(Position::from_fen("rnbqkbnr/pppppppp/63/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_err());
    }

    #[test]
    fn fen_error_invalid_piece_char() {
        assert!(Position::from_fen("xnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_err());
    }

    #[test]
    fn fen_error_invalid_side_castling_and_ep() {
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1").is_err());
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w XYZ - 0 1").is_err());
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1").is_err());
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e4 0 1").is_err());
    }

    #[test]
    fn fen_error_invalid_counters() {
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - abc 1").is_err());
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - -1 1").is_err());
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0").is_err());
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 x").is_err());
    }

    #[test]
    fn fen_error_is_reported_as_invalid_fen() {
        let err = Position::from_fen("garbage").unwrap_err();
        assert!(matches!(err, ChessError::InvalidFen(_)));
        assert!(err.to_string().starts_with("invalid FEN string"));
    }

    #[test]
    fn malformed_fen_falls_back_to_start() {
        let p = Position::from_fen_or_default("not a fen at all");
        assert_eq!(p.to_fen(), START_FEN);
        let q = Position::from_fen_or_default("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(q.to_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    // ===================================================================
    // Mutators keep the text form in sync
    // ===================================================================

    #[test]
    fn mutators_are_reflected_in_fen_immediately() {
        let mut p = Position::starting();

        p.set_side_to_move(Color::Black);
        assert_eq!(p.to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1");

        p.set_en_passant(Some(sq("e3")));
        assert_eq!(p.to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq e3 0 1");
        p.set_en_passant(None);

        p.clear_castling(Color::White, Wing::Kingside);
        assert_eq!(p.to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b Qkq - 0 1");

        p.increment_halfmove();
        p.increment_halfmove();
        assert_eq!(p.to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b Qkq - 2 1");
        p.reset_halfmove();
        p.increment_fullmove();
        assert_eq!(p.to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b Qkq - 0 2");
    }

    #[test]
    fn castling_can_be_cleared_but_never_granted() {
        let mut p = Position::starting();
        p.set_castling(Color::Black, Wing::Queenside, false).unwrap();
        assert_eq!(p.castling_rights().to_fen(), "KQk");

        let err = p.set_castling(Color::Black, Wing::Queenside, true).unwrap_err();
        assert!(matches!(
            err,
            ChessError::CastlingGrantUnsupported {
                color: Color::Black,
                wing: Wing::Queenside
            }
        ));
        assert!(p.set_castling(Color::White, Wing::Kingside, true).is_err());
        assert_eq!(p.castling_rights().to_fen(), "KQk");
    }

    // ===================================================================
    // play()
    // ===================================================================

    fn mv(p: &Position, from: &str, to: &str) -> Move {
        Move::new(sq(from), sq(to), p.piece_at(sq(from)), p.piece_at(sq(to)))
    }

    #[test]
    fn double_push_sets_then_next_move_clears_en_passant() {
        let mut p = Position::starting();
        let e4 = mv(&p, "e2", "e4");
        p.play(&e4);
        assert_eq!(p.en_passant(), Some(sq("e3")));
        assert_eq!(p.side_to_move(), Color::Black);

        let nf6 = mv(&p, "g8", "f6");
        p.play(&nf6);
        assert_eq!(p.en_passant(), None);
        assert_eq!(p.fullmove_number(), 2);
        assert_eq!(p.halfmove_clock(), 1);
    }

    #[test]
    fn en_passant_capture_removes_passed_pawn() {
        let mut p = pos("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        let exf6 = mv(&p, "e5", "f6");
        p.play(&exf6);
        assert_eq!(p.piece_at(sq("f6")), white(PieceType::Pawn));
        assert!(p.piece_at(sq("f5")).is_none());
        assert!(p.piece_at(sq("e5")).is_none());
        assert_eq!(p.halfmove_clock(), 0);
    }

    #[test]
    fn en_passant_never_removes_own_piece() {
        // e3 is behind a white double push, so it is not White's to take.
        let mut p = pos("4k3/8/8/8/8/8/3PB3/4K3 w - e3 0 1");
        let dxe3 = mv(&p, "d2", "e3");
        p.play(&dxe3);
        assert_eq!(p.piece_at(sq("e2")), white(PieceType::Bishop));
        assert_eq!(p.piece_at(sq("e3")), white(PieceType::Pawn));
        assert_eq!(p.halfmove_clock(), 0);
    }

    #[test]
    fn counters_saturate_at_their_maximum() {
        let mut p = pos("4k3/8/8/8/8/8/8/4K3 b - 4294967295 4294967295");
        let kd8 = mv(&p, "e8", "d8");
        p.play(&kd8);
        assert_eq!(p.halfmove_clock(), u32::MAX);
        assert_eq!(p.fullmove_number(), u32::MAX);
        assert_eq!(p.to_fen(), "3k4/8/8/8/8/8/8/4K3 w - - 4294967295 4294967295");
    }

    #[test]
    fn castling_relocates_rook_and_revokes_rights() {
        let mut p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10");
        let oo = mv(&p, "e1", "g1");
        p.play(&oo);
        assert_eq!(p.piece_at(sq("g1")), white(PieceType::King));
        assert_eq!(p.piece_at(sq("f1")), white(PieceType::Rook));
        assert!(p.piece_at(sq("h1")).is_none());
        assert_eq!(p.castling_rights().to_fen(), "kq");
        assert_eq!(p.halfmove_clock(), 4);

        let ooo = mv(&p, "e8", "c8");
        p.play(&ooo);
        assert_eq!(p.piece_at(sq("c8")), black(PieceType::King));
        assert_eq!(p.piece_at(sq("d8")), black(PieceType::Rook));
        assert!(p.piece_at(sq("a8")).is_none());
        assert_eq!(p.castling_rights(), CastlingRights::NONE);
        assert_eq!(p.fullmove_number(), 11);
    }

    #[test]
    fn capturing_a_home_rook_revokes_its_right() {
        let mut p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let rxa8 = mv(&p, "a1", "a8");
        p.play(&rxa8);
        assert_eq!(p.castling_rights().to_fen(), "Kk");
        assert_eq!(p.halfmove_clock(), 0);
    }

    #[test]
    fn pawn_promotes_to_queen() {
        let mut p = pos("7k/4P3/8/8/8/8/8/4K3 w - - 0 1");
        let e8 = mv(&p, "e7", "e8");
        p.play(&e8);
        assert_eq!(p.piece_at(sq("e8")), white(PieceType::Queen));
    }

    #[test]
    fn board_string_shows_grid() {
        let s = Position::starting().board_string();
        assert!(s.starts_with("8 r n b q k b n r"));
        assert!(s.ends_with("  a b c d e f g h"));
    }
}
