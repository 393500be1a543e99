//! Legal move generation.
//!
//! Pipeline:
//!   1. Generate pseudo-legal moves per piece (geometry and occupancy only).
//!   2. Filter: swap the piece on a scratch board, reject the move if the
//!      mover's king is then attacked.
//!
//! Every generator takes the board and position it works on explicitly, so
//! generation is reentrant and can run on any snapshot. The scratch check
//! replays only the origin/destination swap: en-passant victims and castling
//! rooks stay where they were while legality is judged.

use crate::engine::board::{Board, Position};
use crate::engine::check;
use crate::engine::geometry::{self, Direction};
use crate::engine::types::{CastlingRights, Color, Move, Piece, PieceType, Square, Wing};

// =========================================================================
// Public API
// =========================================================================

/// Pseudo-legal moves for `piece` standing on `from`.
///
/// Castling and en-passant availability are read from `pos`; occupancy is
/// read from `board`, which may be a scratch copy.
pub fn pseudo_legal_moves(piece: Piece, from: Square, board: &Board, pos: &Position) -> Vec<Move> {
    let (Some(color), Some(kind)) = (piece.color(), piece.kind()) else {
        return Vec::new();
    };

    let mut moves = Vec::with_capacity(28);
    match kind {
        PieceType::Pawn => generate_pawn_moves(piece, color, from, board, pos, &mut moves),
        PieceType::Knight => generate_knight_moves(piece, color, from, board, &mut moves),
        _ => generate_sliding_moves(piece, color, kind, from, board, pos, &mut moves),
    }
    moves
}

/// Pseudo-legal moves for `piece` that do not leave its own king attacked.
pub fn legal_moves(piece: Piece, from: Square, board: &Board, pos: &Position) -> Vec<Move> {
    filter_for_check(pseudo_legal_moves(piece, from, board, pos), board, pos)
}

/// Drop every move after which the mover's king would be attacked.
///
/// Filtering an already legal list returns it unchanged.
pub fn filter_for_check(moves: Vec<Move>, board: &Board, pos: &Position) -> Vec<Move> {
    moves
        .into_iter()
        .filter(|mv| {
            let Some(color) = mv.piece.color() else {
                return false;
            };
            let mut scratch = *board;
            scratch.swap_move(mv.from, mv.to);
            !check::king_attacked(&scratch, pos, color)
        })
        .collect()
}

/// All moves for every piece of `color`, scanning a1..h8.
pub fn all_moves_for_color(
    board: &Board,
    pos: &Position,
    color: Color,
    filter_for_check: bool,
) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for (from, piece) in board.pieces().filter(|(_, p)| p.is_color(color)) {
        if filter_for_check {
            moves.extend(legal_moves(piece, from, board, pos));
        } else {
            moves.extend(pseudo_legal_moves(piece, from, board, pos));
        }
    }
    moves
}

/// Legal moves for the side to move in `pos`.
pub fn legal_moves_for_side(pos: &Position) -> Vec<Move> {
    all_moves_for_color(pos.board(), pos, pos.side_to_move(), true)
}

/// Legal moves of the piece on `from`. Empty when the square is empty or
/// holds a piece of the side not to move.
pub fn legal_moves_from(from: Square, pos: &Position) -> Vec<Move> {
    let piece = pos.piece_at(from);
    if !piece.is_color(pos.side_to_move()) {
        return Vec::new();
    }
    legal_moves(piece, from, pos.board(), pos)
}

/// Find the legal move from `from` to `to`, if there is one.
pub fn find_legal_move(from: Square, to: Square, pos: &Position) -> Option<Move> {
    legal_moves_from(from, pos).into_iter().find(|m| m.to == to)
}

/// Can the side to move play `from` → `to`?
pub fn is_move_legal(from: Square, to: Square, pos: &Position) -> bool {
    find_legal_move(from, to, pos).is_some()
}

/// Play `mv` on `pos` if it is legal, returning whether it was.
///
/// The move is matched on origin, destination and moving piece; the
/// generator's own record is what gets played, so a caller does not need to
/// know about en-passant victims. Illegal moves leave `pos` untouched.
pub fn apply_move(pos: &mut Position, mv: &Move) -> bool {
    let found = legal_moves_from(mv.from, pos)
        .into_iter()
        .find(|m| m.to == mv.to && m.piece == mv.piece);
    match found {
        Some(legal) => {
            pos.play(&legal);
            true
        }
        None => false,
    }
}

// =========================================================================
// Pawn moves
// =========================================================================

fn generate_pawn_moves(
    piece: Piece,
    us: Color,
    from: Square,
    board: &Board,
    pos: &Position,
    moves: &mut Vec<Move>,
) {
    let (dir, start_rank, ep_rank): (i8, u8, u8) = match us {
        Color::White => (1, 1, 5),
        Color::Black => (-1, 6, 2),
    };

    // --- Single and double push ---
    if let Some(one) = from.offset(0, dir)
        && board[one].is_none()
    {
        moves.push(Move::new(from, one, piece, Piece::NONE));

        if from.rank() == start_rank
            && let Some(two) = from.offset(0, 2 * dir)
            && board[two].is_none()
        {
            moves.push(Move::new(from, two, piece, Piece::NONE));
        }
    }

    // --- Captures and en passant ---
    for file_delta in [-1, 1] {
        let Some(to) = from.offset(file_delta, dir) else {
            continue;
        };
        let target = board[to];
        if target.is_enemy_of(us) {
            moves.push(Move::new(from, to, piece, target));
        } else if target.is_none() && to.rank() == ep_rank && pos.en_passant() == Some(to) {
            moves.push(Move::new(from, to, piece, Piece::new(!us, PieceType::Pawn)));
        }
    }
}

// =========================================================================
// Knight moves
// =========================================================================

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

fn generate_knight_moves(piece: Piece, us: Color, from: Square, board: &Board, moves: &mut Vec<Move>) {
    for (df, dr) in KNIGHT_JUMPS {
        let Some(to) = from.offset(df, dr) else {
            continue;
        };
        let target = board[to];
        if !target.is_color(us) {
            moves.push(Move::new(from, to, piece, target));
        }
    }
}

// =========================================================================
// Sliding moves (bishop, rook, queen, king) and castling
// =========================================================================

fn generate_sliding_moves(
    piece: Piece,
    us: Color,
    kind: PieceType,
    from: Square,
    board: &Board,
    pos: &Position,
    moves: &mut Vec<Move>,
) {
    let t = geometry::tables();
    let directions: &[Direction] = match kind {
        PieceType::Bishop => &Direction::DIAGONAL,
        PieceType::Rook => &Direction::ORTHOGONAL,
        _ => &Direction::ALL,
    };

    for &dir in directions {
        for to in t.ray(from, dir) {
            let target = board[to];
            if target.is_color(us) {
                break;
            }
            moves.push(Move::new(from, to, piece, target));
            if target.is_some() || kind == PieceType::King {
                break;
            }
        }
    }

    if kind == PieceType::King {
        generate_castling_moves(piece, us, from, board, pos.castling_rights(), moves);
    }
}

/// Castling needs the right and empty squares between king and rook. Whether
/// the king is in check or crosses an attacked square is not examined.
fn generate_castling_moves(
    piece: Piece,
    us: Color,
    from: Square,
    board: &Board,
    rights: CastlingRights,
    moves: &mut Vec<Move>,
) {
    let home = match us {
        Color::White => Square(4),
        Color::Black => Square(60),
    };
    if from != home {
        return;
    }
    let empty = |offset: i8| board[Square((from.0 as i8 + offset) as u8)].is_none();

    if rights.can_castle(us, Wing::Kingside) && empty(1) && empty(2) {
        moves.push(Move::new(from, Square(from.0 + 2), piece, Piece::NONE));
    }
    if rights.can_castle(us, Wing::Queenside) && empty(-1) && empty(-2) && empty(-3) {
        moves.push(Move::new(from, Square(from.0 - 2), piece, Piece::NONE));
    }
}

// =========================================================================
// Tests
// =========================================================================
