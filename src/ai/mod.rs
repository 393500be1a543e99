pub mod evaluation;
pub mod player;
pub mod search;
pub mod tree;

pub use evaluation::{MATE_SCORE, evaluate, evaluate_relative};
pub use player::Player;
pub use search::{SearchLimits, SearchReport, SearchStats, Searcher};
pub use tree::{GameTree, NodeId, NodeSummary};
