use crate::ai::player::Player;
use crate::ai::search::{DEFAULT_DEPTH, SearchLimits};
use crate::engine::board::START_FEN;

/// Self-play configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Initial position.
    pub start_fen: String,
    pub white_player: String,
    pub black_player: String,
    /// Search depth in plies.
    pub search_depth: u32,
    /// Node budget per search.
    pub max_nodes: Option<u64>,
    /// Game length cap in plies.
    pub max_plies: usize,
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparsable values fall back to
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        EngineConfig {
            start_fen: lookup("CHESS_START_FEN")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.start_fen),
            white_player: lookup("CHESS_WHITE_PLAYER").unwrap_or(defaults.white_player),
            black_player: lookup("CHESS_BLACK_PLAYER").unwrap_or(defaults.black_player),
            search_depth: lookup("CHESS_SEARCH_DEPTH")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.search_depth),
            max_nodes: lookup("CHESS_MAX_NODES")
                .and_then(|v| v.parse().ok())
                .or(defaults.max_nodes),
            max_plies: lookup("CHESS_MAX_PLIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_plies),
        }
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            depth: self.search_depth,
            max_nodes: self.max_nodes,
        }
    }

    /// Strategy for `name`, falling back to `fallback` when unknown.
    fn player(&self, name: &str, fallback: Player) -> Player {
        Player::parse_with_limits(name, self.search_limits()).unwrap_or_else(|| {
            tracing::warn!(strategy = name, %fallback, "unknown player strategy, using fallback");
            fallback
        })
    }

    pub fn white(&self) -> Player {
        self.player(&self.white_player, Player::Search(self.search_limits()))
    }

    pub fn black(&self) -> Player {
        self.player(&self.black_player, Player::Greedy)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            start_fen: START_FEN.to_string(),
            white_player: "search".to_string(),
            black_player: "greedy".to_string(),
            search_depth: DEFAULT_DEPTH,
            max_nodes: None,
            max_plies: 200,
        }
    }
}
