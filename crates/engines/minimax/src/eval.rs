//! Heuristic position evaluation.
//!
//! Scores a state from one color's perspective as a signed sum of material,
//! positional, king-safety, streak, ability, hazard, and tempo terms. The
//! weights are a fixed, hand-tuned linear combination; they are serializable
//! so tuning runs can snapshot them, but nothing here learns.

use serde::{Deserialize, Serialize};
use std::path::Path;

use variant_core::{
    BISHOP_PAWN_IMMUNITY_LEVEL, Color, GameState, PieceKind, QUEEN_LEVEL_CAP, Rules, Winner,
    file_of, is_in_check, king_distance, rank_of,
};

/// Score for an ordinary decisive terminal state.
pub const MATE_SCORE: i32 = 100_000;
/// Score for an auto-checkmate (mate delivered on an extra turn).
pub const AUTO_MATE_SCORE: i32 = 120_000;
/// Non-terminal scores are clamped well inside the mate band.
const HEURISTIC_CLAMP: i32 = 50_000;

const CENTER: [u8; 4] = [27, 28, 35, 36];

/// Evaluation weights in centipawns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weights {
    pub center: i32,
    pub near_center: i32,
    pub undeveloped_minor: i32,
    pub pawn_advance: i32,
    pub isolated_pawn: i32,
    pub doubled_pawn: i32,
    pub check: i32,
    pub pawn_shield: i32,
    pub king_threat: i32,
    pub streak_building: i32,
    pub streak_resurrection: i32,
    pub streak_momentum: i32,
    pub streak_extra_turn: i32,
    pub per_level: i32,
    pub queen_at_cap: i32,
    pub bishop_immunity: i32,
    pub advanced_pawn: i32,
    pub commander: i32,
    pub hero: i32,
    pub infiltrator_deep: i32,
    pub hazard_near_king: i32,
    pub tempo: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            center: 25,
            near_center: 10,
            undeveloped_minor: 12,
            pawn_advance: 8,
            isolated_pawn: 15,
            doubled_pawn: 12,
            check: 60,
            pawn_shield: 14,
            king_threat: 18,
            streak_building: 20,
            streak_resurrection: 45,
            streak_momentum: 60,
            streak_extra_turn: 90,
            per_level: 12,
            queen_at_cap: 120,
            bishop_immunity: 40,
            advanced_pawn: 18,
            commander: 35,
            hero: 30,
            infiltrator_deep: 150,
            hazard_near_king: 22,
            tempo: 50,
        }
    }
}

impl Weights {
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize weights: {}", e))?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write {:?}: {}", path, e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse weights: {}", e))
    }
}

/// Fixed score for a finished game, seen from `perspective`.
pub fn terminal_score(winner: Winner, auto_checkmate: bool, perspective: Color) -> i32 {
    match winner.color() {
        None => 0,
        Some(c) => {
            let magnitude = if auto_checkmate {
                AUTO_MATE_SCORE
            } else {
                MATE_SCORE
            };
            if c == perspective { magnitude } else { -magnitude }
        }
    }
}

/// Evaluate `state` from `perspective`. Terminal states use the fixed
/// constants; everything else is the weighted feature sum.
pub fn evaluate(state: &GameState, perspective: Color, rules: &Rules, w: &Weights) -> i32 {
    if state.game_over {
        return match state.winner {
            Some(winner) => terminal_score(winner, state.auto_checkmate, perspective),
            None => 0,
        };
    }

    let mut score = 0i32;
    score += material_and_abilities(state, perspective, rules, w);
    score += positional(state, perspective, w);
    score += king_safety(state, perspective, w);
    score += streaks(state, perspective, w);
    score += hazards(state, perspective, w);
    if state.extra_turn && state.current_player == perspective {
        score += w.tempo;
    }
    score.clamp(-HEURISTIC_CLAMP, HEURISTIC_CLAMP)
}

fn signed(perspective: Color, color: Color, v: i32) -> i32 {
    if color == perspective { v } else { -v }
}

fn material_and_abilities(state: &GameState, perspective: Color, rules: &Rules, w: &Weights) -> i32 {
    let mut score = 0i32;
    for i in 0..64u8 {
        let pc = match state.piece_at(i) {
            Some(p) => p,
            None => continue,
        };
        let mut v = rules.base_value(pc.kind, pc.level);
        v += (pc.level as i32 - 1) * w.per_level;
        match pc.kind {
            PieceKind::Queen if pc.level >= QUEEN_LEVEL_CAP => v += w.queen_at_cap,
            PieceKind::Bishop if pc.level >= BISHOP_PAWN_IMMUNITY_LEVEL => v += w.bishop_immunity,
            PieceKind::Commander => v += w.commander,
            PieceKind::Hero => v += w.hero,
            PieceKind::Infiltrator => {
                // Scales smoothly with proximity to the winning rank.
                let to_go = (rank_of(i) - pc.color.far_rank()).abs();
                v += w.infiltrator_deep / (1 + to_go as i32);
            }
            _ => {}
        }
        if pc.kind.is_pawn_class() {
            let adv = (rank_of(i) - pc.color.back_rank()).abs() as i32;
            if adv >= 4 {
                v += w.advanced_pawn * (adv - 3);
            }
        }
        score += signed(perspective, pc.color, v);
    }
    score
}

fn positional(state: &GameState, perspective: Color, w: &Weights) -> i32 {
    let mut score = 0i32;
    // Pawn counts per file per color, for isolated/doubled detection.
    let mut pawn_files = [[0i32; 8]; 2];

    for i in 0..64u8 {
        let pc = match state.piece_at(i) {
            Some(p) => p,
            None => continue,
        };
        let f = file_of(i);
        let r = rank_of(i);

        if CENTER.contains(&i) {
            score += signed(perspective, pc.color, w.center);
        } else if (2..=5).contains(&f) && (2..=5).contains(&r) {
            score += signed(perspective, pc.color, w.near_center);
        }

        match pc.kind {
            PieceKind::Knight | PieceKind::Bishop => {
                // Sitting on the back rank past the opening is a liability.
                if r == pc.color.back_rank() && state.move_counter > 12 {
                    score -= signed(perspective, pc.color, w.undeveloped_minor);
                }
            }
            PieceKind::Pawn | PieceKind::Commander => {
                let adv = (r - pc.color.back_rank()).abs() as i32;
                score += signed(perspective, pc.color, w.pawn_advance * adv);
                pawn_files[pc.color.idx()][f as usize] += 1;
            }
            _ => {}
        }
    }

    for color in [Color::White, Color::Black] {
        let files = &pawn_files[color.idx()];
        for f in 0..8usize {
            if files[f] == 0 {
                continue;
            }
            if files[f] > 1 {
                score -= signed(perspective, color, w.doubled_pawn * (files[f] - 1));
            }
            let left = if f > 0 { files[f - 1] } else { 0 };
            let right = if f < 7 { files[f + 1] } else { 0 };
            if left == 0 && right == 0 {
                score -= signed(perspective, color, w.isolated_pawn * files[f]);
            }
        }
    }
    score
}

fn king_safety(state: &GameState, perspective: Color, w: &Weights) -> i32 {
    let mut score = 0i32;
    for color in [Color::White, Color::Black] {
        if is_in_check(state, color) {
            score -= signed(perspective, color, w.check);
        }
        let ksq = match state.king_sq(color) {
            Some(s) => s,
            None => continue,
        };

        // Pawn shield: own pawn-class pieces on the three squares ahead.
        let mut shield = 0i32;
        let kf = file_of(ksq);
        let kr = rank_of(ksq);
        for df in [-1, 0, 1] {
            if let Some(s) = variant_core::sq(kf + df, kr + color.forward()) {
                if let Some(pc) = state.piece_at(s) {
                    if pc.color == color && pc.kind.is_pawn_class() {
                        shield += 1;
                    }
                }
            }
        }
        score -= signed(perspective, color, w.pawn_shield * (3 - shield));

        // Geometric threat count: enemy pieces inside a 2-ring of the king.
        // Deliberately not legality-aware; this is a cheap proxy.
        let mut threats = 0i32;
        for i in 0..64u8 {
            if let Some(pc) = state.piece_at(i) {
                if pc.color != color && pc.kind != PieceKind::King && king_distance(i, ksq) <= 2 {
                    threats += 1;
                }
            }
        }
        score -= signed(perspective, color, w.king_threat * threats);
    }
    score
}

fn streaks(state: &GameState, perspective: Color, w: &Weights) -> i32 {
    let mut score = 0i32;
    for color in [Color::White, Color::Black] {
        let s = state.kill_streaks[color.idx()];
        let mut v = 0i32;
        if s >= 2 {
            v += w.streak_building;
        }
        if s == 3 {
            v += w.streak_resurrection;
        }
        if s >= 5 {
            v += w.streak_momentum;
        }
        if s >= 6 {
            v += w.streak_extra_turn;
        }
        score += signed(perspective, color, v);
    }
    score
}

fn hazards(state: &GameState, perspective: Color, w: &Weights) -> i32 {
    let mut score = 0i32;
    for color in [Color::White, Color::Black] {
        let ksq = match state.king_sq(color) {
            Some(s) => s,
            None => continue,
        };
        for i in 0..64u8 {
            if state.item_at(i).is_some() && king_distance(i, ksq) <= 2 {
                score -= signed(perspective, color, w.hazard_near_king);
            }
        }
    }
    score
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
