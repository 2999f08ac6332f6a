use super::*;
use variant_core::{Item, Piece, PieceId, coord_to_sq};

fn put(state: &mut GameState, coord: &str, kind: PieceKind, color: Color, level: u8) -> u8 {
    let s = coord_to_sq(coord).unwrap();
    let mut pc = Piece::new(PieceId::new(s as u32), kind, color);
    pc.level = level;
    state.set_piece(s, Some(pc));
    s
}

fn kings(state: &mut GameState) {
    put(state, "e1", PieceKind::King, Color::White, 1);
    put(state, "e8", PieceKind::King, Color::Black, 1);
}

#[test]
fn terminal_scores_are_ordered() {
    let auto = terminal_score(Winner::White, true, Color::White);
    let mate = terminal_score(Winner::White, false, Color::White);
    assert!(auto > mate);
    assert_eq!(auto, AUTO_MATE_SCORE);
    assert_eq!(mate, MATE_SCORE);
    assert_eq!(terminal_score(Winner::White, false, Color::Black), -MATE_SCORE);
    assert_eq!(terminal_score(Winner::Draw, true, Color::White), 0);
}

#[test]
fn heuristic_scores_stay_inside_the_mate_band() {
    let mut state = GameState::empty();
    kings(&mut state);
    // A grotesquely lopsided position still scores below any mate.
    for coord in ["a4", "b4", "c4", "d4", "a5", "b5", "c5", "d5"] {
        put(&mut state, coord, PieceKind::Queen, Color::White, 7);
    }
    let score = evaluate(&state, Color::White, &Rules::default(), &Weights::default());
    assert!(score < MATE_SCORE);
    assert!(score >= -MATE_SCORE);
}

#[test]
fn finished_games_use_the_fixed_constants() {
    let mut state = GameState::startpos();
    state.game_over = true;
    state.winner = Some(Winner::Black);
    state.auto_checkmate = true;
    let rules = Rules::default();
    let w = Weights::default();
    assert_eq!(evaluate(&state, Color::Black, &rules, &w), AUTO_MATE_SCORE);
    assert_eq!(evaluate(&state, Color::White, &rules, &w), -AUTO_MATE_SCORE);
}

#[test]
fn startpos_is_balanced_and_antisymmetric() {
    let state = GameState::startpos();
    let rules = Rules::default();
    let w = Weights::default();
    let white = evaluate(&state, Color::White, &rules, &w);
    let black = evaluate(&state, Color::Black, &rules, &w);
    assert_eq!(white, 0);
    assert_eq!(white, -black);
}

#[test]
fn material_edge_shows_with_the_right_sign() {
    let mut state = GameState::startpos();
    let b8 = coord_to_sq("b8").unwrap();
    state.set_piece(b8, None);
    let rules = Rules::default();
    let w = Weights::default();
    assert!(evaluate(&state, Color::White, &rules, &w) > 0);
    assert!(evaluate(&state, Color::Black, &rules, &w) < 0);
}

#[test]
fn levels_add_value_beyond_the_base_table() {
    let mut low = GameState::empty();
    kings(&mut low);
    put(&mut low, "d4", PieceKind::Knight, Color::White, 1);
    let mut high = low.clone();
    put(&mut high, "d4", PieceKind::Knight, Color::White, 4);
    let rules = Rules::default();
    let w = Weights::default();
    assert!(
        evaluate(&high, Color::White, &rules, &w) > evaluate(&low, Color::White, &rules, &w)
    );
}

#[test]
fn streak_tiers_stack() {
    let rules = Rules::default();
    let w = Weights::default();
    let score_at = |streak: u8| {
        let mut state = GameState::startpos();
        state.kill_streaks[Color::White.idx()] = streak;
        evaluate(&state, Color::White, &rules, &w)
    };
    assert!(score_at(2) > score_at(0));
    assert!(score_at(3) > score_at(2));
    assert!(score_at(6) > score_at(5));
    assert!(score_at(5) > score_at(3));
}

#[test]
fn pending_extra_turn_is_a_tempo_bonus() {
    let mut state = GameState::startpos();
    let rules = Rules::default();
    let w = Weights::default();
    let before = evaluate(&state, Color::White, &rules, &w);
    state.extra_turn = true;
    let after = evaluate(&state, Color::White, &rules, &w);
    assert_eq!(after - before, w.tempo);
    // The bonus belongs to the side on the move only.
    assert_eq!(evaluate(&state, Color::Black, &rules, &w), -before);
}

#[test]
fn deep_infiltrators_are_worth_more_the_closer_they_get() {
    let rules = Rules::default();
    let w = Weights::default();
    let at = |coord: &str| {
        let mut state = GameState::empty();
        kings(&mut state);
        put(&mut state, coord, PieceKind::Infiltrator, Color::White, 1);
        evaluate(&state, Color::White, &rules, &w)
    };
    assert!(at("d6") > at("d5"));
    assert!(at("d5") > at("d4"));
}

#[test]
fn anvils_near_the_king_hurt() {
    let mut state = GameState::startpos();
    state.set_item(coord_to_sq("e3").unwrap(), Some(Item::Anvil));
    let rules = Rules::default();
    let w = Weights::default();
    assert!(evaluate(&state, Color::White, &rules, &w) < 0);
    assert!(evaluate(&state, Color::Black, &rules, &w) > 0);
}

#[test]
fn weights_round_trip_through_json() {
    let w = Weights::default();
    let path = std::env::temp_dir().join("variant_weights_round_trip.json");
    w.save(&path).unwrap();
    let loaded = Weights::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded.center, w.center);
    assert_eq!(loaded.streak_extra_turn, w.streak_extra_turn);
    assert_eq!(loaded.tempo, w.tempo);

    let err = Weights::load(Path::new("/definitely/not/here.json"));
    assert!(err.is_err());
}
