use super::*;
use crate::MinimaxEngine;
use std::time::Duration;
use variant_core::{Engine, Piece, PieceId, coord_to_sq};

fn put(state: &mut GameState, coord: &str, kind: PieceKind, color: Color, level: u8) -> u8 {
    let s = coord_to_sq(coord).unwrap();
    let mut pc = Piece::new(PieceId::new(s as u32), kind, color);
    pc.level = level;
    state.set_piece(s, Some(pc));
    s
}

#[test]
fn exhausted_budget_still_returns_a_move() {
    let state = GameState::startpos();
    let mut engine = MinimaxEngine::new();
    let result = engine.best_move(&state, Color::White, SearchLimits::depth_and_time(3, Duration::ZERO));
    assert!(result.best_move.is_some());
    assert!(result.stopped);
}

#[test]
fn repeated_searches_agree() {
    let state = GameState::startpos();
    let mut a = MinimaxEngine::new();
    let mut b = MinimaxEngine::new();
    let ma = a.best_move(&state, Color::White, SearchLimits::depth(2));
    let mb = b.best_move(&state, Color::White, SearchLimits::depth(2));
    assert_eq!(ma.best_move, mb.best_move);
    assert_eq!(ma.score, mb.score);
    assert!(ma.nodes > 0);
}

#[test]
fn finds_a_back_rank_mate() {
    let mut state = GameState::empty();
    put(&mut state, "a1", PieceKind::King, Color::White, 1);
    put(&mut state, "b1", PieceKind::Rook, Color::White, 1);
    put(&mut state, "a7", PieceKind::Rook, Color::White, 1);
    put(&mut state, "h8", PieceKind::King, Color::Black, 1);

    let mut engine = MinimaxEngine::new();
    let result = engine.best_move(&state, Color::White, SearchLimits::depth(2));
    let mv = result.best_move.unwrap();
    assert_eq!(mv.from, coord_to_sq("b1").unwrap());
    assert_eq!(mv.to, coord_to_sq("b8").unwrap());
    assert!(result.score >= crate::MATE_SCORE);
}

#[test]
fn mated_side_gets_no_move() {
    let mut state = GameState::empty();
    put(&mut state, "a8", PieceKind::King, Color::Black, 1);
    put(&mut state, "b6", PieceKind::Queen, Color::White, 1);
    put(&mut state, "a1", PieceKind::Rook, Color::White, 1);
    put(&mut state, "e1", PieceKind::King, Color::White, 1);
    state.current_player = Color::Black;

    let mut engine = MinimaxEngine::new();
    assert!(engine.choose_move(&state, Color::Black).is_none());
    assert_eq!(engine.name(), "Minimax v1.0");
}

#[test]
fn position_key_separates_states() {
    let state = GameState::startpos();
    let base = position_key(&state, Color::White);

    let mut stm = state.clone();
    stm.current_player = Color::Black;
    assert_ne!(position_key(&stm, Color::White), base);

    assert_ne!(position_key(&state, Color::Black), base);

    let mut extra = state.clone();
    extra.extra_turn = true;
    assert_ne!(position_key(&extra, Color::White), base);

    let mut moved = state.clone();
    let e2 = coord_to_sq("e2").unwrap();
    let e4 = coord_to_sq("e4").unwrap();
    let pawn = moved.piece_at(e2).unwrap();
    moved.set_piece(e2, None);
    moved.set_piece(e4, Some(pawn));
    assert_ne!(position_key(&moved, Color::White), base);
}

#[test]
fn captures_are_searched_first() {
    let mut state = GameState::empty();
    put(&mut state, "e1", PieceKind::King, Color::White, 1);
    put(&mut state, "e8", PieceKind::King, Color::Black, 1);
    let from = put(&mut state, "a1", PieceKind::Rook, Color::White, 1);
    let victim = put(&mut state, "a5", PieceKind::Pawn, Color::Black, 1);

    let mut moves = vec![
        Move::new(from, coord_to_sq("b1").unwrap(), MoveKind::Move),
        Move::new(from, victim, MoveKind::Capture),
    ];
    order_moves(&mut moves, &state, &Rules::default());
    assert_eq!(moves[0].kind, MoveKind::Capture);
}

#[test]
fn cache_entries_are_depth_gated() {
    let state = GameState::startpos();
    let rules = Rules::default();
    let weights = Weights::default();
    let limits = SearchLimits::depth(5);
    let key = position_key(&state, Color::White);

    // An entry searched deeper than requested is trusted verbatim.
    let mut cache = PositionCache::new();
    cache.insert(key.clone(), CacheEntry { score: 123_456, depth: 9 });
    let mut ctx = SearchContext {
        rules: &rules,
        weights: &weights,
        limits: &limits,
        cache: &mut cache,
        nodes: 0,
    };
    let got = minimax(&state, 2, i32::MIN / 2, i32::MAX / 2, Color::White, &mut ctx);
    assert_eq!(got, 123_456);

    // A shallower entry is ignored, recomputed, and overwritten.
    let mut cache = PositionCache::new();
    cache.insert(key.clone(), CacheEntry { score: 123_456, depth: 1 });
    let mut ctx = SearchContext {
        rules: &rules,
        weights: &weights,
        limits: &limits,
        cache: &mut cache,
        nodes: 0,
    };
    let got = minimax(&state, 2, i32::MIN / 2, i32::MAX / 2, Color::White, &mut ctx);
    assert_ne!(got, 123_456);
    assert_eq!(cache.get(&key).map(|e| e.depth), Some(2));
}

#[test]
fn new_game_resets_the_engine() {
    let state = GameState::startpos();
    let mut engine = MinimaxEngine::new();
    let _ = engine.best_move(&state, Color::White, SearchLimits::depth(1));
    assert!(engine.nodes() > 0);
    engine.new_game();
    assert_eq!(engine.nodes(), 0);
}
