//! Long algebraic notation for move records.
//!
//! Examples: `e2e4`, `Ng1f3`, `Bc4xf7`, `Ke1g1`. Piece letters are
//! uppercase for both colors; pawns carry no letter. Promotion suffixes are
//! not written since promotion always yields a queen.

use crate::engine::types::{Move, Piece, PieceType, Square};

/// Notation letter for a piece kind, `None` for pawns.
pub fn piece_letter(kind: PieceType) -> Option<char> {
    match kind {
        PieceType::Pawn => None,
        other => Some(other.letter()),
    }
}

/// FEN-style letter: uppercase for White, lowercase for Black, `P`/`p` for pawns.
pub fn piece_letter_for_color(piece: Piece) -> Option<char> {
    piece.to_fen_char()
}

/// Algebraic name of a square, e.g. `e4`.
pub fn square_name(sq: Square) -> String {
    sq.to_algebraic()
}

/// `{PieceLetter}{from}{x if capture}{to}`.
pub fn move_notation(mv: &Move) -> String {
    let mut s = String::with_capacity(6);
    if let Some(letter) = mv.piece.kind().and_then(piece_letter) {
        s.push(letter);
    }
    s.push_str(&square_name(mv.from));
    if mv.is_capture() {
        s.push('x');
    }
    s.push_str(&square_name(mv.to));
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::Color;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn pawn_push_has_no_letter() {
        let mv = Move::new(sq("e2"), sq("e4"), Piece::new(Color::White, PieceType::Pawn), Piece::NONE);
        assert_eq!(move_notation(&mv), "e2e4");
    }

    #[test]
    fn black_pieces_use_uppercase_letters() {
        let mv = Move::new(sq("g8"), sq("f6"), Piece::new(Color::Black, PieceType::Knight), Piece::NONE);
        assert_eq!(mv.notation(), "Ng8f6");
        assert_eq!(mv.to_string(), "Ng8f6");
    }

    #[test]
    fn capture_inserts_x() {
        let mv = Move::new(
            sq("c4"),
            sq("f7"),
            Piece::new(Color::White, PieceType::Bishop),
            Piece::new(Color::Black, PieceType::Pawn),
        );
        assert_eq!(move_notation(&mv), "Bc4xf7");

        let pawn_takes = Move::new(
            sq("e4"),
            sq("d5"),
            Piece::new(Color::White, PieceType::Pawn),
            Piece::new(Color::Black, PieceType::Pawn),
        );
        assert_eq!(move_notation(&pawn_takes), "e4xd5");
    }

    #[test]
    fn color_cased_letters_are_available_separately() {
        assert_eq!(piece_letter_for_color(Piece::new(Color::Black, PieceType::Queen)), Some('q'));
        assert_eq!(piece_letter_for_color(Piece::new(Color::White, PieceType::Queen)), Some('Q'));
        assert_eq!(piece_letter_for_color(Piece::NONE), None);
        assert_eq!(piece_letter(PieceType::Pawn), None);
        assert_eq!(piece_letter(PieceType::King), Some('K'));
    }
}
