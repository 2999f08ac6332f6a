//! Minimax engine for the level-chess variant.
//!
//! Alpha-beta search over snapshot states with a hand-tuned evaluator.
//! The public contract is "always a move or `None`, never a panic": `None`
//! means the side to move has no legal moves (checkmate or stalemate), and
//! any internal hiccup degrades to the first legal move instead.

pub mod eval;
pub mod search;

use variant_core::{Color, Engine, GameState, Move, Rules, SearchLimits, SearchResult, legal_moves};

pub use eval::{AUTO_MATE_SCORE, MATE_SCORE, Weights, evaluate, terminal_score};
pub use search::{PositionCache, pick_best_move, position_key};

/// Minimax engine with alpha-beta pruning, move ordering, and a per-request
/// position cache. Deterministic: random post-move effects derive from the
/// state and the move, so repeated searches of a position agree.
pub struct MinimaxEngine {
    rules: Rules,
    weights: Weights,
    cache: PositionCache,
    nodes: u64,
}

impl MinimaxEngine {
    pub fn new() -> Self {
        MinimaxEngine {
            rules: Rules::default(),
            weights: Weights::default(),
            cache: PositionCache::new(),
            nodes: 0,
        }
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Pick a move for `color` under default limits. `None` only when no
    /// legal move exists.
    pub fn choose_move(&mut self, state: &GameState, color: Color) -> Option<Move> {
        self.best_move(state, color, SearchLimits::default()).best_move
    }
}

impl Default for MinimaxEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for MinimaxEngine {
    fn best_move(&mut self, state: &GameState, color: Color, limits: SearchLimits) -> SearchResult {
        self.nodes = 0;
        limits.start();

        let mut ctx = search::SearchContext {
            rules: &self.rules,
            weights: &self.weights,
            limits: &limits,
            cache: &mut self.cache,
            nodes: 0,
        };
        let outcome = search::pick_best_move(state, color, &mut ctx);
        self.nodes = ctx.nodes;

        // Degraded path: the search found nothing usable but legal moves
        // exist. Fall back to the first one rather than reporting failure.
        let best_move = match outcome.best_move {
            Some((mv, _)) => Some(mv),
            None => legal_moves(state, color, &self.rules).first().copied(),
        };

        SearchResult {
            best_move,
            score: outcome.best_move.map(|(_, s)| s).unwrap_or(0),
            depth: limits.depth,
            nodes: self.nodes,
            stopped: outcome.stopped,
        }
    }

    fn name(&self) -> &str {
        "Minimax v1.0"
    }

    fn new_game(&mut self) {
        self.cache.clear();
        self.nodes = 0;
    }
}
