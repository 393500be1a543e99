//! Negamax search with alpha-beta pruning over an explicit game tree.
//!
//! Each call copies the caller's position into the root of a fresh
//! [`GameTree`], expands children to a fixed depth and returns the root's
//! best move. Nothing survives between calls.

use std::cmp::Reverse;
use std::time::{Duration, Instant};

use crate::engine::board::Position;
use crate::engine::check;
use crate::engine::movegen;
use crate::engine::types::{Color, Move, PieceType};

use super::evaluation::{MATE_SCORE, evaluate_relative};
use super::tree::{GameTree, NodeId};

/// Default search depth in plies.
pub const DEFAULT_DEPTH: u32 = 2;

// =========================================================================
// Move ordering
// =========================================================================

/// Score a move for ordering. Higher = searched first.
///
/// Captures score `10 * victim - mover`; a pawn reaching the last rank adds
/// the value of the queen it becomes, times ten.
pub fn move_order_score(mv: &Move) -> i32 {
    let mut score = 0;

    if let (Some(victim), Some(mover)) = (mv.captured.kind(), mv.piece.kind()) {
        score += 10 * victim.value() - mover.value();
    }

    if mv.piece.kind() == Some(PieceType::Pawn) && (mv.to.rank() == 7 || mv.to.rank() == 0) {
        score += 10 * PieceType::Queen.value();
    }

    score
}

/// Sort moves best-first. The sort is stable, so equal scores keep
/// generation order.
pub fn order_moves(moves: &mut [Move]) {
    for mv in moves.iter_mut() {
        mv.score = move_order_score(mv);
    }
    moves.sort_by_key(|m| Reverse(m.score));
}

// =========================================================================
// Limits and statistics
// =========================================================================

/// Bounds for a single search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchLimits {
    /// Plies below the root.
    pub depth: u32,
    /// Maximum number of nodes expanded. Past the budget, nodes are
    /// scored statically. The root is always expanded.
    pub max_nodes: Option<u64>,
}

impl SearchLimits {
    pub fn depth(depth: u32) -> Self {
        Self {
            depth,
            max_nodes: None,
        }
    }

    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(DEFAULT_DEPTH)
    }
}

/// Search statistics.
#[derive(Clone, Debug, Default)]
pub struct SearchStats {
    /// Nodes visited, root included.
    pub nodes: u64,
    /// Nodes whose children were generated.
    pub expanded: u64,
    /// Beta cutoffs.
    pub cutoffs: u64,
    /// Deepest ply reached.
    pub max_ply: u32,
    pub elapsed: Duration,
}

/// Everything a search produced.
#[derive(Debug)]
pub struct SearchReport {
    pub best_move: Option<Move>,
    /// Root score from the searching side's perspective.
    pub score: f64,
    pub stats: SearchStats,
    pub tree: GameTree,
}

// =========================================================================
// Searcher
// =========================================================================

/// Fixed-depth alpha-beta searcher.
#[derive(Clone, Copy, Debug, Default)]
pub struct Searcher {
    limits: SearchLimits,
}

impl Searcher {
    pub fn new(limits: SearchLimits) -> Self {
        Self { limits }
    }

    pub fn with_depth(depth: u32) -> Self {
        Self::new(SearchLimits::depth(depth))
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Best move for `color` in `pos`, or `None` when it has no legal move.
    pub fn choose_move(&self, pos: &Position, color: Color) -> Option<Move> {
        self.search_with_report(pos, color).best_move
    }

    /// Run the search and return the move together with score, statistics
    /// and the explored tree.
    pub fn search_with_report(&self, pos: &Position, color: Color) -> SearchReport {
        let start = Instant::now();

        let mut root = pos.clone();
        root.set_side_to_move(color);

        let mut ctx = SearchContext {
            tree: GameTree::new(root),
            limits: self.limits,
            stats: SearchStats::default(),
        };
        let score = negamax(
            &mut ctx,
            GameTree::ROOT,
            self.limits.depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
        );
        ctx.stats.elapsed = start.elapsed();

        let best_move = ctx.tree.root().best_move;
        tracing::debug!(
            %color,
            depth = self.limits.depth,
            nodes = ctx.stats.nodes,
            expanded = ctx.stats.expanded,
            cutoffs = ctx.stats.cutoffs,
            max_ply = ctx.stats.max_ply,
            elapsed_ms = ctx.stats.elapsed.as_millis() as u64,
            score,
            best = ?best_move.map(|m| m.notation()),
            "search finished"
        );

        SearchReport {
            best_move,
            score,
            stats: ctx.stats,
            tree: ctx.tree,
        }
    }
}

// =========================================================================
// Negamax
// =========================================================================

struct SearchContext {
    tree: GameTree,
    limits: SearchLimits,
    stats: SearchStats,
}

impl SearchContext {
    #[inline]
    fn budget_exhausted(&self) -> bool {
        self.limits
            .max_nodes
            .is_some_and(|max| self.stats.expanded >= max)
    }
}

/// Fail-hard negamax. Returns the score of `id` from the perspective of its
/// side to move, clamped to `[alpha, beta]` below the root.
fn negamax(ctx: &mut SearchContext, id: NodeId, depth: u32, mut alpha: f64, beta: f64) -> f64 {
    ctx.stats.nodes += 1;
    let ply = ctx.tree.node(id).ply;
    ctx.stats.max_ply = ctx.stats.max_ply.max(ply);

    if depth == 0 || (id != GameTree::ROOT && ctx.budget_exhausted()) {
        let eval = evaluate_relative(&ctx.tree.node(id).position);
        ctx.tree.node_mut(id).best_eval = Some(eval);
        return eval;
    }

    ctx.stats.expanded += 1;
    let mut moves = movegen::legal_moves_for_side(&ctx.tree.node(id).position);

    if moves.is_empty() {
        let pos = &ctx.tree.node(id).position;
        let eval = match check::is_king_in_check(pos.board(), pos, pos.side_to_move()) {
            Ok(true) => -MATE_SCORE,
            Ok(false) => 0.0,
            Err(err) => {
                tracing::warn!(%err, fen = %pos.to_fen(), "scoring node as lost");
                -MATE_SCORE
            }
        };
        ctx.tree.node_mut(id).best_eval = Some(eval);
        return eval;
    }

    order_moves(&mut moves);

    for mv in moves {
        let child = ctx.tree.add_child(id, mv);
        let eval = -negamax(ctx, child, depth - 1, -beta, -alpha);

        if eval >= beta {
            ctx.stats.cutoffs += 1;
            ctx.tree.node_mut(id).best_eval = Some(beta);
            return beta;
        }
        if eval > alpha {
            alpha = eval;
            ctx.tree.node_mut(id).best_move = Some(mv);
        }
    }

    ctx.tree.node_mut(id).best_eval = Some(alpha);
    alpha
}

// =========================================================================
// Tests
// =========================================================================
