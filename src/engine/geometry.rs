//! Pre-computed board geometry for sliding-piece generation.
//!
//! The table is initialised once (via `OnceLock`) and lives for the lifetime
//! of the process. For every square it records how many steps a slider can
//! take in each of the eight compass directions before leaving the board.

use crate::engine::types::Square;
use std::sync::OnceLock;

// =========================================================================
// Directions
// =========================================================================

/// The eight ray directions, in table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    SouthWest,
    NorthWest,
    SouthEast,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::NorthWest,
        Direction::SouthEast,
    ];

    /// Rook rays.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Bishop rays.
    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::NorthWest,
        Direction::SouthEast,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Square-index delta for one step in this direction.
    #[inline]
    pub const fn offset(self) -> i8 {
        DIRECTION_OFFSETS[self as usize]
    }
}

/// Index deltas matching `Direction::ALL`.
pub const DIRECTION_OFFSETS: [i8; 8] = [8, -8, 1, -1, 9, -9, 7, -7];

// =========================================================================
// Public API
// =========================================================================

/// Get a reference to the global geometry tables.
pub fn tables() -> &'static Geometry {
    static TABLES: OnceLock<Geometry> = OnceLock::new();
    TABLES.get_or_init(Geometry::init)
}

/// `edge_distance[square][direction]`: steps to the board edge.
pub struct Geometry {
    edge_distance: [[u8; 8]; 64],
}

impl Geometry {
    #[inline]
    pub fn edge_distance(&self, sq: Square, dir: Direction) -> u8 {
        self.edge_distance[sq.index()][dir.index()]
    }

    /// Squares visited walking from `sq` along `dir` up to the edge,
    /// nearest first. Does not include `sq` itself.
    pub fn ray(&self, sq: Square, dir: Direction) -> impl Iterator<Item = Square> {
        let steps = self.edge_distance(sq, dir) as i16;
        let start = sq.0 as i16;
        let delta = dir.offset() as i16;
        (1..=steps).map(move |i| Square((start + delta * i) as u8))
    }

    fn init() -> Self {
        let mut edge_distance = [[0u8; 8]; 64];
        for rank in 0..8u8 {
            for file in 0..8u8 {
                let north = 7 - rank;
                let south = rank;
                let east = 7 - file;
                let west = file;
                edge_distance[(rank * 8 + file) as usize] = [
                    north,
                    south,
                    east,
                    west,
                    north.min(east),
                    south.min(west),
                    north.min(west),
                    south.min(east),
                ];
            }
        }
        Geometry { edge_distance }
    }
}

// =========================================================================
// Tests
// =========================================================================
