pub mod attacks;
pub mod board;
pub mod movegen;
pub mod rules;
pub mod time_control;
pub mod transition;
pub mod types;

// Re-export core game logic (not engine-specific)
pub use attacks::*;
pub use board::*;
pub use movegen::*;
pub use rules::*;
pub use time_control::*;
pub use transition::apply_move;
pub use types::*;

// =============================================================================
// Engine trait — implemented by all variant engines
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The best move found (None if no legal moves)
    pub best_move: Option<Move>,
    /// Evaluation score in centipawns from the searching color's perspective
    pub score: i32,
    /// Search depth requested
    pub depth: u8,
    /// Number of nodes searched
    pub nodes: u64,
    /// Whether the time budget expired during the search
    pub stopped: bool,
}

/// Trait implemented by move-selecting engines for the variant.
///
/// The contract mirrors the error-handling design of the rules core: an
/// engine never panics and never surfaces an internal error; it returns a
/// move whenever one exists and `None` only for checkmate/stalemate.
pub trait Engine: Send {
    /// Pick a move for `color` in `state` under the given limits.
    fn best_move(&mut self, state: &GameState, color: Color, limits: SearchLimits) -> SearchResult;

    /// Engine name for identification.
    fn name(&self) -> &str;

    /// Reset internal state for a new game (caches, counters).
    fn new_game(&mut self) {}
}
