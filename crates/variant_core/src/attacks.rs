//! Attack and legality oracle.
//!
//! Answers "can this piece attack that square", "is this square attacked",
//! and "is this color in check" under the level-gated variant movement rules.
//! King reach is level-dependent, and the extended king move itself needs an
//! attack query for its transit square; `is_square_attacked` therefore uses a
//! simplified one-square king reach to break the mutual recursion.

use crate::board::GameState;
use crate::rules::*;
use crate::types::*;

/// Invulnerability rule, consulted by both the oracle and the move generator.
/// An attack against an invulnerable target is illegal, not just unprofitable.
pub fn is_invulnerable_to(target: &Piece, attacker: &Piece) -> bool {
    if target.invulnerable_turns > 0 {
        return true;
    }
    if target.kind == PieceKind::Queen
        && target.level >= QUEEN_LEVEL_CAP
        && attacker.level < target.level
    {
        return true;
    }
    if target.kind == PieceKind::Bishop
        && target.level >= BISHOP_PAWN_IMMUNITY_LEVEL
        && attacker.kind.is_pawn_class()
    {
        return true;
    }
    false
}

/// Full attack test for a piece standing on `from` against `to`.
pub fn can_attack(state: &GameState, from: u8, to: u8, attacker: Piece) -> bool {
    can_attack_inner(state, from, to, attacker, false)
}

/// True if any piece of `by` attacks `target`. Uses the simplified king
/// reach; intended for castling-path and king-transit safety checks.
pub fn is_square_attacked(state: &GameState, target: u8, by: Color) -> bool {
    for (sq, pc) in state.pieces_of(by) {
        if can_attack_inner(state, sq, target, pc, true) {
            return true;
        }
    }
    false
}

/// True if `color`'s king is attacked. A missing king is treated as check:
/// the position is degenerate and about to be scored as terminal anyway.
pub fn is_in_check(state: &GameState, color: Color) -> bool {
    let ksq = match state.king_sq(color) {
        Some(s) => s,
        None => return true,
    };
    for (sq, pc) in state.pieces_of(color.other()) {
        if can_attack_inner(state, sq, ksq, pc, false) {
            return true;
        }
    }
    false
}

fn can_attack_inner(state: &GameState, from: u8, to: u8, attacker: Piece, simple: bool) -> bool {
    if from == to {
        return false;
    }
    // Items block occupation and ordinary attacks outright.
    if state.item_at(to).is_some() {
        return false;
    }
    if let Some(target) = state.piece_at(to) {
        if target.color == attacker.color {
            return false;
        }
        if is_invulnerable_to(&target, &attacker) {
            return false;
        }
    }

    let df = file_of(to) - file_of(from);
    let dr = rank_of(to) - rank_of(from);

    match attacker.kind {
        PieceKind::Pawn | PieceKind::Commander => {
            dr == attacker.color.forward() && df.abs() == 1
        }
        PieceKind::Infiltrator => dr == attacker.color.forward() && df.abs() <= 1,
        PieceKind::Knight | PieceKind::Hero => {
            knight_reaches(state, from, df, dr, attacker.level)
        }
        PieceKind::Bishop => {
            df.abs() == dr.abs()
                && path_clear(
                    state,
                    from,
                    to,
                    if attacker.level >= BISHOP_PHASE_LEVEL {
                        Some(attacker.color)
                    } else {
                        None
                    },
                )
        }
        PieceKind::Rook => (df == 0 || dr == 0) && path_clear(state, from, to, None),
        PieceKind::Queen => {
            (df == 0 || dr == 0 || df.abs() == dr.abs()) && path_clear(state, from, to, None)
        }
        PieceKind::King => king_reaches(state, from, df, dr, attacker, simple),
    }
}

fn knight_reaches(state: &GameState, from: u8, df: i8, dr: i8, level: u8) -> bool {
    if KNIGHT_DELTAS.contains(&(df, dr)) {
        return true;
    }
    if level >= KNIGHT_CARDINAL_LEVEL && CARDINAL_DELTAS.contains(&(df, dr)) {
        return true;
    }
    if level >= KNIGHT_JUMP_LEVEL && (df == 0 || dr == 0) && df.abs() + dr.abs() == 3 {
        // The 3-square jump is path-checked: both intermediates must be free.
        let sf = df.signum();
        let sr = dr.signum();
        let f0 = file_of(from);
        let r0 = rank_of(from);
        for step in 1..3 {
            match sq(f0 + sf * step, r0 + sr * step) {
                Some(s) if state.is_free(s) => {}
                _ => return false,
            }
        }
        return true;
    }
    false
}

fn king_reaches(
    state: &GameState,
    from: u8,
    df: i8,
    dr: i8,
    attacker: Piece,
    simple: bool,
) -> bool {
    if df.abs() <= 1 && dr.abs() <= 1 {
        return true;
    }
    if simple {
        // Simplified reach: one square only, no extended abilities.
        return false;
    }
    if attacker.level >= KING_EXTENDED_LEVEL
        && df.abs() <= 2
        && dr.abs() <= 2
        && (df == 0 || dr == 0 || df.abs() == dr.abs())
        && df.abs().max(dr.abs()) == 2
    {
        let mid = match sq(file_of(from) + df.signum(), rank_of(from) + dr.signum()) {
            Some(s) => s,
            None => return false,
        };
        if state.is_free(mid) && !is_square_attacked(state, mid, attacker.color.other()) {
            return true;
        }
    }
    if attacker.level >= KING_KNIGHT_MOVES_LEVEL && KNIGHT_DELTAS.contains(&(df, dr)) {
        return true;
    }
    false
}

/// Walks from `from` toward `to` (exclusive); blocked by pieces and items.
/// `phase` lets a leveled bishop slide through its own pieces.
fn path_clear(state: &GameState, from: u8, to: u8, phase: Option<Color>) -> bool {
    let df = (file_of(to) - file_of(from)).signum();
    let dr = (rank_of(to) - rank_of(from)).signum();
    let mut f = file_of(from) + df;
    let mut r = rank_of(from) + dr;
    while let Some(s) = sq(f, r) {
        if s == to {
            return true;
        }
        if state.item_at(s).is_some() {
            return false;
        }
        if let Some(pc) = state.piece_at(s)
            && Some(pc.color) != phase
        {
            return false;
        }
        f += df;
        r += dr;
    }
    false
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
