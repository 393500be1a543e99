//! Search tree arena.
//!
//! Nodes are stored in a flat `Vec` and refer to each other by `NodeId`.
//! A tree lives for one search call and is dropped afterwards.

use serde::Serialize;

use crate::engine::board::Position;
use crate::engine::types::Move;

/// Index of a node inside a [`GameTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// One simulated position.
#[derive(Clone, Debug)]
pub struct TreeNode {
    pub position: Position,
    /// Move that produced this node; `None` for the root.
    pub origin: Option<Move>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub best_move: Option<Move>,
    pub best_eval: Option<f64>,
    /// Plies from the root.
    pub ply: u32,
}

/// Arena of search nodes. The root is always `NodeId(0)`.
#[derive(Clone, Debug)]
pub struct GameTree {
    nodes: Vec<TreeNode>,
}

impl GameTree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new(root: Position) -> Self {
        Self {
            nodes: vec![TreeNode {
                position: root,
                origin: None,
                parent: None,
                children: Vec::new(),
                best_move: None,
                best_eval: None,
                ply: 0,
            }],
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    pub fn root(&self) -> &TreeNode {
        self.node(Self::ROOT)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Materialize the child reached by `mv` and link it under `parent`.
    ///
    /// The move is applied as a bare origin→destination swap: no rook
    /// relocation, no en-passant victim removal, no promotion. Castling
    /// rights touched by either square are revoked, the en-passant target
    /// is cleared and the side to move flips.
    pub fn add_child(&mut self, parent: NodeId, mv: Move) -> NodeId {
        let parent_node = self.node(parent);
        let mut position = parent_node.position.clone();
        let ply = parent_node.ply + 1;

        position.board_mut().swap_move(mv.from, mv.to);
        position.revoke_castling_touching(mv.from);
        position.revoke_castling_touching(mv.to);
        position.set_en_passant(None);
        let next = !position.side_to_move();
        position.set_side_to_move(next);

        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            position,
            origin: Some(mv),
            parent: Some(parent),
            children: Vec::new(),
            best_move: None,
            best_eval: None,
            ply,
        });
        self.node_mut(parent).children.push(id);
        id
    }

    /// Deepest ply present in the tree.
    pub fn max_ply(&self) -> u32 {
        self.nodes.iter().map(|n| n.ply).max().unwrap_or(0)
    }

    /// Moves leading from the root to `id`, root side first.
    pub fn line_to(&self, id: NodeId) -> Vec<Move> {
        let mut line = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current);
            if let Some(mv) = node.origin {
                line.push(mv);
            }
            cursor = node.parent;
        }
        line.reverse();
        line
    }

    /// Follow best moves from the root.
    pub fn principal_variation(&self) -> Vec<Move> {
        let mut line = Vec::new();
        let mut current = Self::ROOT;
        while let Some(best) = self.node(current).best_move {
            line.push(best);
            let next = self
                .node(current)
                .children
                .iter()
                .copied()
                .find(|&c| self.node(c).origin == Some(best));
            match next {
                Some(child) => current = child,
                None => break,
            }
        }
        line
    }

    /// Serializable view of the first `max_depth` plies.
    pub fn summary(&self, max_depth: u32) -> NodeSummary {
        self.summarize(Self::ROOT, max_depth)
    }

    fn summarize(&self, id: NodeId, remaining: u32) -> NodeSummary {
        let node = self.node(id);
        let children = if remaining == 0 {
            Vec::new()
        } else {
            node.children
                .iter()
                .map(|&c| self.summarize(c, remaining - 1))
                .collect()
        };
        NodeSummary {
            mv: node.origin.map(|m| m.notation()),
            fen: node.position.to_fen(),
            best_move: node.best_move.map(|m| m.notation()),
            eval: node.best_eval,
            children,
        }
    }
}

/// Debug dump of a (partial) search tree.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mv: Option<String>,
    pub fen: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_move: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSummary>,
}

impl NodeSummary {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
