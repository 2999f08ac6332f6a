//! Depth-limited minimax with alpha-beta pruning and a memoized position
//! cache.
//!
//! The searching color is fixed for a whole request; a node maximizes when
//! its state's side to move equals that color, which lets extra turns appear
//! as two maximizing plies in a row. The wall clock is checked at node
//! entry; once the budget is spent, nodes are scored statically instead of
//! expanded (a soft exit, never an abort).

use std::collections::HashMap;
use std::fmt::Write as _;

use variant_core::{
    Color, GameState, Item, Move, MoveKind, PieceKind, Rules, SearchLimits, apply_move,
    file_of, legal_moves, no_move_outcome, rank_of,
};

use crate::eval::{Weights, evaluate, terminal_score};

/// Upper bound on memoized positions for one request.
const MAX_CACHE_ENTRIES: usize = 200_000;

#[derive(Debug, Clone, Copy)]
pub struct CacheEntry {
    pub score: i32,
    pub depth: u8,
}

pub type PositionCache = HashMap<String, CacheEntry>;

/// Result from `pick_best_move`.
pub struct SearchOutcome {
    pub best_move: Option<(Move, i32)>,
    pub stopped: bool,
}

pub struct SearchContext<'a> {
    pub rules: &'a Rules,
    pub weights: &'a Weights,
    pub limits: &'a SearchLimits,
    pub cache: &'a mut PositionCache,
    pub nodes: u64,
}

/// Canonical serialization of the full state, used as the cache key. Covers
/// everything a transposition must agree on: board contents with levels,
/// flags and items, side to move, perspective, streaks, move counter, first
/// blood, and the en-passant target.
pub fn position_key(state: &GameState, perspective: Color) -> String {
    let mut key = String::with_capacity(96);
    for i in 0..64u8 {
        match state.piece_at(i) {
            Some(pc) => {
                let c = match pc.kind {
                    PieceKind::Pawn => 'p',
                    PieceKind::Knight => 'n',
                    PieceKind::Bishop => 'b',
                    PieceKind::Rook => 'r',
                    PieceKind::Queen => 'q',
                    PieceKind::King => 'k',
                    PieceKind::Commander => 'c',
                    PieceKind::Hero => 'h',
                    PieceKind::Infiltrator => 'i',
                };
                let c = if pc.color == Color::White {
                    c.to_ascii_uppercase()
                } else {
                    c
                };
                key.push(c);
                let _ = write!(key, "{}", pc.level);
                if pc.has_moved {
                    key.push('m');
                }
                if pc.invulnerable_turns > 0 {
                    let _ = write!(key, "v{}", pc.invulnerable_turns);
                }
            }
            None => key.push('.'),
        }
        if matches!(state.item_at(i), Some(Item::Anvil)) {
            key.push('a');
        }
    }
    let _ = write!(
        key,
        "|{}{}|{}-{}|{}|{}|{}",
        if state.current_player == Color::White { 'w' } else { 'b' },
        if perspective == Color::White { 'W' } else { 'B' },
        state.kill_streaks[0],
        state.kill_streaks[1],
        state.move_counter,
        match state.first_blood {
            None => '-',
            Some(Color::White) => 'w',
            Some(Color::Black) => 'b',
        },
        state.en_passant.map(|s| s as i32).unwrap_or(-1),
    );
    if state.extra_turn {
        key.push('x');
    }
    key
}

/// Cheap static ordering score: captures by victim value, promotions,
/// castling, self-destruct payoff, then center proximity.
fn order_score(state: &GameState, mv: &Move, rules: &Rules) -> i32 {
    let mut score = 0i32;
    match mv.kind {
        MoveKind::Capture => {
            if let Some(victim) = state.piece_at(mv.to) {
                score += rules.base_value(victim.kind, victim.level);
            }
        }
        MoveKind::Promotion { to } => {
            score += rules.base_value(to, 1);
            if let Some(victim) = state.piece_at(mv.to) {
                score += rules.base_value(victim.kind, victim.level);
            }
        }
        MoveKind::EnPassant => {
            score += rules.base_value(PieceKind::Pawn, 1)
                + rules.base_value(PieceKind::Infiltrator, 1);
        }
        MoveKind::Castle => score += 60,
        MoveKind::SelfDestruct => {
            // Payoff estimate: adjacent victims minus the actor itself.
            let f = file_of(mv.from);
            let r = rank_of(mv.from);
            if let Some(actor) = state.piece_at(mv.from) {
                for (df, dr) in variant_core::KING_DELTAS {
                    if let Some(s) = variant_core::sq(f + df, r + dr) {
                        if let Some(pc) = state.piece_at(s) {
                            if pc.color != actor.color && pc.kind != PieceKind::King {
                                score += rules.base_value(pc.kind, pc.level);
                            }
                        }
                    }
                }
                score -= rules.base_value(actor.kind, actor.level);
            }
        }
        MoveKind::Move | MoveKind::Swap => {}
    }
    // Center proximity tiebreak.
    let df = (2 * file_of(mv.to) - 7).abs();
    let dr = (2 * rank_of(mv.to) - 7).abs();
    score += (7 - (df + dr) / 2) as i32;
    score
}

fn order_moves(moves: &mut [Move], state: &GameState, rules: &Rules) {
    moves.sort_by_key(|mv| -order_score(state, mv, rules));
}

/// Search the position and return the best move for `color` with its score.
/// The cache is cleared up front: entries never survive across requests.
pub fn pick_best_move(
    state: &GameState,
    color: Color,
    ctx: &mut SearchContext<'_>,
) -> SearchOutcome {
    ctx.cache.clear();

    let mut moves = legal_moves(state, color, ctx.rules);
    if moves.is_empty() {
        return SearchOutcome {
            best_move: None,
            stopped: false,
        };
    }
    order_moves(&mut moves, state, ctx.rules);

    let depth = ctx.limits.depth;
    let mut best = moves[0];
    let mut best_score = i32::MIN + 1;
    let mut alpha = i32::MIN / 2;
    let mut stopped = false;

    for mv in moves {
        if ctx.limits.time_control.check_time() {
            stopped = true;
            break;
        }
        let child = apply_move(state, mv, color, ctx.rules);
        let score = minimax(&child, depth.saturating_sub(1), alpha, i32::MAX / 2, color, ctx);
        if score > best_score {
            best_score = score;
            best = mv;
        }
        // Tighten the root window with the running best.
        alpha = alpha.max(best_score);
    }

    SearchOutcome {
        best_move: Some((best, best_score)),
        stopped,
    }
}

fn minimax(
    state: &GameState,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
    perspective: Color,
    ctx: &mut SearchContext<'_>,
) -> i32 {
    ctx.nodes += 1;

    if state.game_over {
        return evaluate(state, perspective, ctx.rules, ctx.weights);
    }
    // Soft time exit: score the frontier statically instead of expanding.
    if depth == 0 || ctx.limits.time_control.check_time() {
        return evaluate(state, perspective, ctx.rules, ctx.weights);
    }

    let key = position_key(state, perspective);
    if let Some(entry) = ctx.cache.get(&key) {
        // Only trust entries searched at least this deep.
        if entry.depth >= depth {
            return entry.score;
        }
    }

    let to_act = state.current_player;
    let mut moves = legal_moves(state, to_act, ctx.rules);
    if moves.is_empty() {
        let outcome = no_move_outcome(state, to_act);
        return terminal_score(outcome, false, perspective);
    }
    order_moves(&mut moves, state, ctx.rules);

    let maximizing = to_act == perspective;
    let mut best = if maximizing { i32::MIN + 1 } else { i32::MAX - 1 };

    for mv in moves {
        let child = apply_move(state, mv, to_act, ctx.rules);
        let score = minimax(&child, depth - 1, alpha, beta, perspective, ctx);
        if maximizing {
            best = best.max(score);
            alpha = alpha.max(best);
        } else {
            best = best.min(score);
            beta = beta.min(best);
        }
        if alpha >= beta {
            break;
        }
    }

    if ctx.cache.len() < MAX_CACHE_ENTRIES || ctx.cache.contains_key(&key) {
        ctx.cache.insert(key, CacheEntry { score: best, depth });
    }
    best
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
