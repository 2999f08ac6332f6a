//! Static rule tables for the level-chess variant.
//!
//! Pure lookup data: per-kind value curves indexed by level, capture level-up
//! bonuses, movement geometry, and the level thresholds that gate the variant
//! abilities. `Rules` carries no behavior; every component takes it as an
//! explicit argument.

use crate::types::PieceKind;

pub const QUEEN_LEVEL_CAP: u8 = 7;

/// Per-level bonus applied when extrapolating past the end of a value table.
pub const LEVEL_EXTRAPOLATION: i32 = 40;

/// A hazard spawns on every Nth half-move.
pub const HAZARD_SPAWN_INTERVAL: u32 = 9;

/// Kill streak that triggers a resurrection.
pub const RESURRECTION_STREAK: u8 = 3;

/// Kill streak that grants an extra turn.
pub const EXTRA_TURN_STREAK: u8 = 6;

/// A pawn promoting at this level or above grants an extra turn.
pub const PROMOTION_EXTRA_TURN_LEVEL: u8 = 4;

/// Invulnerability countdown granted to a freshly resurrected piece.
pub const RESURRECTION_INVULN_TURNS: u8 = 2;

// Level thresholds for unlocked abilities.
pub const PAWN_BACKWARD_LEVEL: u8 = 2;
pub const PAWN_SIDEWAYS_LEVEL: u8 = 3;
pub const PAWN_PUSH_BACK_LEVEL: u8 = 4;
pub const KNIGHT_CARDINAL_LEVEL: u8 = 2;
pub const KNIGHT_JUMP_LEVEL: u8 = 3;
pub const KNIGHT_SWAP_LEVEL: u8 = 4;
pub const SELF_DESTRUCT_LEVEL: u8 = 5;
pub const BISHOP_PHASE_LEVEL: u8 = 2;
pub const BISHOP_PAWN_IMMUNITY_LEVEL: u8 = 3;
pub const BISHOP_SWAP_LEVEL: u8 = 4;
pub const CONVERSION_LEVEL: u8 = 5;
pub const ROOK_RESURRECTION_LEVEL: u8 = 5;
pub const KING_EXTENDED_LEVEL: u8 = 2;
pub const KING_KNIGHT_MOVES_LEVEL: u8 = 5;

pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

pub const KING_DELTAS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

pub const CARDINAL_DELTAS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const QUEEN_DIRS: [(i8, i8); 8] = [
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
];

/// Immutable rule configuration. Pass by reference; never mutated.
#[derive(Debug, Clone)]
pub struct Rules {
    /// Base values in centipawns, indexed by `level - 1`.
    pub base_values: [&'static [i32]; 9],
    /// Levels gained by a capturer taking each kind.
    pub capture_bonus: [u8; 9],
}

const PAWN_VALUES: &[i32] = &[100, 130, 170, 220, 280];
const KNIGHT_VALUES: &[i32] = &[320, 360, 410, 470, 540];
const BISHOP_VALUES: &[i32] = &[330, 370, 420, 480, 550];
const ROOK_VALUES: &[i32] = &[500, 550, 610, 680, 760];
const QUEEN_VALUES: &[i32] = &[900, 950, 1010, 1080, 1160, 1250, 1350];
const KING_VALUES: &[i32] = &[0];
const COMMANDER_VALUES: &[i32] = &[150, 185, 225, 270, 320];
const HERO_VALUES: &[i32] = &[340, 385, 435, 490, 550];
const INFILTRATOR_VALUES: &[i32] = &[200, 240, 285, 335, 390];

impl Default for Rules {
    fn default() -> Self {
        Rules {
            base_values: [
                PAWN_VALUES,
                KNIGHT_VALUES,
                BISHOP_VALUES,
                ROOK_VALUES,
                QUEEN_VALUES,
                KING_VALUES,
                COMMANDER_VALUES,
                HERO_VALUES,
                INFILTRATOR_VALUES,
            ],
            capture_bonus: [1, 2, 2, 3, 4, 0, 2, 3, 2],
        }
    }
}

impl Rules {
    /// Base material value of a piece kind at a level.
    ///
    /// Levels past the table's end extrapolate linearly for every kind except
    /// the queen (hard-capped table) and king (flat).
    pub fn base_value(&self, kind: PieceKind, level: u8) -> i32 {
        let table = self.base_values[kind.idx()];
        let level = level.max(1) as usize;
        if level <= table.len() {
            return table[level - 1];
        }
        let last = table[table.len() - 1];
        match kind {
            PieceKind::Queen | PieceKind::King => last,
            _ => last + LEVEL_EXTRAPOLATION * (level - table.len()) as i32,
        }
    }

    /// Levels gained when capturing a piece of `kind`.
    pub fn capture_bonus(&self, kind: PieceKind) -> u8 {
        self.capture_bonus[kind.idx()]
    }

    /// Apply a level gain to a piece kind, clamping queens at the cap.
    pub fn leveled_up(&self, kind: PieceKind, level: u8, gain: u8) -> u8 {
        let raw = level.saturating_add(gain);
        if kind == PieceKind::Queen {
            raw.min(QUEEN_LEVEL_CAP)
        } else {
            raw
        }
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
