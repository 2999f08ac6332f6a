//! Pseudo-legal move generation plus the single legality gate.
//!
//! Geometry and level-unlocked extensions produce pseudo-legal candidates;
//! each candidate is then simulated through the transition function and kept
//! only if the mover's own king is safe afterwards. There is no second,
//! special-cased legality pass anywhere else.

use crate::attacks::{is_in_check, is_invulnerable_to, is_square_attacked};
use crate::board::{GameState, Winner};
use crate::rules::*;
use crate::transition::try_apply;
use crate::types::*;

/// All legal moves for `color`. Random post-move effects derive from the
/// state and the move, so the probe here resolves them exactly as the real
/// application will.
pub fn legal_moves(state: &GameState, color: Color, rules: &Rules) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    pseudo_moves(state, color, &mut out);
    out.retain(|&mv| {
        match try_apply(state, mv, color, rules, true) {
            Some(next) => !is_in_check(&next, color),
            // A no-op transition means a violated precondition: not legal.
            None => false,
        }
    });
    out
}

/// Outcome of a position where the side to move has no legal moves:
/// checkmate if in check, otherwise stalemate.
pub fn no_move_outcome(state: &GameState, color: Color) -> Winner {
    if is_in_check(state, color) {
        Winner::from_color(color.other())
    } else {
        Winner::Draw
    }
}

fn pseudo_moves(state: &GameState, color: Color, out: &mut Vec<Move>) {
    for sq in 0..64u8 {
        let pc = match state.piece_at(sq) {
            Some(p) => p,
            None => continue,
        };
        if pc.color != color {
            continue;
        }
        match pc.kind {
            PieceKind::Pawn | PieceKind::Commander => gen_pawn_like(state, sq, pc, out),
            PieceKind::Knight => gen_knight(state, sq, pc, out),
            PieceKind::Bishop => gen_bishop(state, sq, pc, out),
            PieceKind::Rook => gen_slider(state, sq, pc, out, &ROOK_DIRS),
            PieceKind::Queen => gen_slider(state, sq, pc, out, &QUEEN_DIRS),
            PieceKind::King => {
                gen_king(state, sq, pc, out);
                gen_castle(state, sq, pc, out);
            }
            PieceKind::Hero => gen_hero(state, sq, pc, out),
            PieceKind::Infiltrator => gen_infiltrator(state, sq, pc, out),
        }
    }
}

/// Push a plain step or capture to `to`, respecting items and invulnerability.
fn push_step(state: &GameState, from: u8, to: u8, pc: Piece, out: &mut Vec<Move>) {
    if state.item_at(to).is_some() {
        return;
    }
    match state.piece_at(to) {
        None => out.push(Move::new(from, to, MoveKind::Move)),
        Some(target) if target.color != pc.color && !is_invulnerable_to(&target, &pc) => {
            out.push(Move::new(from, to, MoveKind::Capture));
        }
        _ => {}
    }
}

fn push_promotions(from: u8, to: u8, pc: Piece, out: &mut Vec<Move>) {
    if pc.kind == PieceKind::Commander {
        // Commanders always promote to hero.
        out.push(Move::new(from, to, MoveKind::Promotion { to: PieceKind::Hero }));
        return;
    }
    for kind in [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ] {
        out.push(Move::new(from, to, MoveKind::Promotion { to: kind }));
    }
}

fn gen_pawn_like(state: &GameState, from: u8, pc: Piece, out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);
    let dir = pc.color.forward();
    let start_rank = pc.color.back_rank() + dir;
    let promo_rank = pc.color.far_rank();

    // Forward one, with promotion on the far rank.
    if let Some(to) = sq(f, r + dir)
        && state.is_free(to)
    {
        if rank_of(to) == promo_rank {
            push_promotions(from, to, pc, out);
        } else {
            out.push(Move::new(from, to, MoveKind::Move));

            // Double step from the start rank.
            if r == start_rank
                && let Some(to2) = sq(f, r + 2 * dir)
                && state.is_free(to2)
            {
                out.push(Move::new(from, to2, MoveKind::Move));
            }
        }
    }

    // Diagonal captures and the en-passant infiltration.
    for df in [-1, 1] {
        if let Some(to) = sq(f + df, r + dir) {
            if state.item_at(to).is_some() {
                continue;
            }
            if let Some(target) = state.piece_at(to) {
                if target.color != pc.color && !is_invulnerable_to(&target, &pc) {
                    if rank_of(to) == promo_rank {
                        push_promotions(from, to, pc, out);
                    } else {
                        out.push(Move::new(from, to, MoveKind::Capture));
                    }
                }
            } else if pc.kind == PieceKind::Pawn && state.en_passant == Some(to) {
                out.push(Move::new(from, to, MoveKind::EnPassant));
            }
        }
    }

    // Level-unlocked steps. Backward never promotes; sideways never captures.
    if pc.level >= PAWN_BACKWARD_LEVEL
        && let Some(to) = sq(f, r - dir)
        && state.is_free(to)
    {
        out.push(Move::new(from, to, MoveKind::Move));
    }
    if pc.level >= PAWN_SIDEWAYS_LEVEL {
        for df in [-1, 1] {
            if let Some(to) = sq(f + df, r)
                && state.is_free(to)
            {
                out.push(Move::new(from, to, MoveKind::Move));
            }
        }
    }
}

fn gen_knight_geometry(state: &GameState, from: u8, pc: Piece, out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);
    for (df, dr) in KNIGHT_DELTAS {
        if let Some(to) = sq(f + df, r + dr) {
            push_step(state, from, to, pc, out);
        }
    }
    if pc.level >= KNIGHT_CARDINAL_LEVEL {
        for (df, dr) in CARDINAL_DELTAS {
            if let Some(to) = sq(f + df, r + dr) {
                push_step(state, from, to, pc, out);
            }
        }
    }
    if pc.level >= KNIGHT_JUMP_LEVEL {
        for (df, dr) in CARDINAL_DELTAS {
            // 3-square cardinal jump; both intermediates must be free.
            let blocked = (1..3).any(|step| {
                match sq(f + df * step, r + dr * step) {
                    Some(s) => !state.is_free(s),
                    None => true,
                }
            });
            if !blocked
                && let Some(to) = sq(f + df * 3, r + dr * 3)
            {
                push_step(state, from, to, pc, out);
            }
        }
    }
}

fn gen_swaps(state: &GameState, from: u8, pc: Piece, partner: PieceKind, out: &mut Vec<Move>) {
    for to in 0..64u8 {
        if let Some(other) = state.piece_at(to)
            && other.color == pc.color
            && other.kind == partner
            && to != from
        {
            out.push(Move::new(from, to, MoveKind::Swap));
        }
    }
}

fn gen_knight(state: &GameState, from: u8, pc: Piece, out: &mut Vec<Move>) {
    gen_knight_geometry(state, from, pc, out);
    if pc.level >= KNIGHT_SWAP_LEVEL {
        gen_swaps(state, from, pc, PieceKind::Bishop, out);
    }
    if pc.level >= SELF_DESTRUCT_LEVEL {
        out.push(Move::new(from, from, MoveKind::SelfDestruct));
    }
}

fn gen_hero(state: &GameState, from: u8, pc: Piece, out: &mut Vec<Move>) {
    gen_knight_geometry(state, from, pc, out);
    if pc.level >= KNIGHT_SWAP_LEVEL {
        gen_swaps(state, from, pc, PieceKind::Bishop, out);
    }
    if pc.level >= SELF_DESTRUCT_LEVEL {
        out.push(Move::new(from, from, MoveKind::SelfDestruct));
    }
}

fn gen_bishop(state: &GameState, from: u8, pc: Piece, out: &mut Vec<Move>) {
    let f0 = file_of(from);
    let r0 = rank_of(from);
    let phase = pc.level >= BISHOP_PHASE_LEVEL;
    for (df, dr) in BISHOP_DIRS {
        let mut f = f0 + df;
        let mut r = r0 + dr;
        while let Some(to) = sq(f, r) {
            if state.item_at(to).is_some() {
                break;
            }
            match state.piece_at(to) {
                None => out.push(Move::new(from, to, MoveKind::Move)),
                Some(target) if target.color != pc.color => {
                    if !is_invulnerable_to(&target, &pc) {
                        out.push(Move::new(from, to, MoveKind::Capture));
                    }
                    break;
                }
                // Own piece: a leveled bishop phases through but cannot land.
                Some(_) if phase => {}
                Some(_) => break,
            }
            f += df;
            r += dr;
        }
    }
    if pc.level >= BISHOP_SWAP_LEVEL {
        gen_swaps(state, from, pc, PieceKind::Knight, out);
    }
}

fn gen_slider(state: &GameState, from: u8, pc: Piece, out: &mut Vec<Move>, dirs: &[(i8, i8)]) {
    let f0 = file_of(from);
    let r0 = rank_of(from);
    for &(df, dr) in dirs {
        let mut f = f0 + df;
        let mut r = r0 + dr;
        while let Some(to) = sq(f, r) {
            if state.item_at(to).is_some() {
                break;
            }
            match state.piece_at(to) {
                None => out.push(Move::new(from, to, MoveKind::Move)),
                Some(target) if target.color != pc.color => {
                    if !is_invulnerable_to(&target, &pc) {
                        out.push(Move::new(from, to, MoveKind::Capture));
                    }
                    break;
                }
                _ => break,
            }
            f += df;
            r += dr;
        }
    }
}

fn gen_king(state: &GameState, from: u8, pc: Piece, out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);
    for (df, dr) in KING_DELTAS {
        if let Some(to) = sq(f + df, r + dr) {
            push_step(state, from, to, pc, out);
        }
    }
    if pc.level >= KING_EXTENDED_LEVEL {
        // Two squares along any ray; the transit square must be free and
        // safe. Safety uses the simplified attack check to stay finite.
        for (df, dr) in KING_DELTAS {
            let mid = match sq(f + df, r + dr) {
                Some(s) => s,
                None => continue,
            };
            if !state.is_free(mid) || is_square_attacked(state, mid, pc.color.other()) {
                continue;
            }
            if let Some(to) = sq(f + 2 * df, r + 2 * dr) {
                push_step(state, from, to, pc, out);
            }
        }
    }
    if pc.level >= KING_KNIGHT_MOVES_LEVEL {
        for (df, dr) in KNIGHT_DELTAS {
            if let Some(to) = sq(f + df, r + dr) {
                push_step(state, from, to, pc, out);
            }
        }
    }
}

fn gen_castle(state: &GameState, from: u8, pc: Piece, out: &mut Vec<Move>) {
    let home = match sq(4, pc.color.back_rank()) {
        Some(s) => s,
        None => return,
    };
    if from != home || pc.has_moved {
        return;
    }
    if crate::attacks::is_in_check(state, pc.color) {
        return;
    }
    let enemy = pc.color.other();
    let rank = pc.color.back_rank();

    // King side: two free, unattacked transit squares and an unmoved rook.
    let rook_ks = sq(7, rank);
    let path_ks: Vec<u8> = [sq(5, rank), sq(6, rank)].into_iter().flatten().collect();
    if let Some(rsq) = rook_ks
        && let Some(rook) = state.piece_at(rsq)
        && rook.kind == PieceKind::Rook
        && rook.color == pc.color
        && !rook.has_moved
        && path_ks.iter().all(|&s| state.is_free(s))
        && path_ks.iter().all(|&s| !is_square_attacked(state, s, enemy))
        && let Some(to) = sq(6, rank)
    {
        out.push(Move::new(from, to, MoveKind::Castle));
    }

    // Queen side: b-file must also be free, but only c and d need to be safe.
    let rook_qs = sq(0, rank);
    let free_qs: Vec<u8> = [sq(1, rank), sq(2, rank), sq(3, rank)]
        .into_iter()
        .flatten()
        .collect();
    let safe_qs: Vec<u8> = [sq(2, rank), sq(3, rank)].into_iter().flatten().collect();
    if let Some(rsq) = rook_qs
        && let Some(rook) = state.piece_at(rsq)
        && rook.kind == PieceKind::Rook
        && rook.color == pc.color
        && !rook.has_moved
        && free_qs.iter().all(|&s| state.is_free(s))
        && safe_qs.iter().all(|&s| !is_square_attacked(state, s, enemy))
        && let Some(to) = sq(2, rank)
    {
        out.push(Move::new(from, to, MoveKind::Castle));
    }
}

fn gen_infiltrator(state: &GameState, from: u8, pc: Piece, out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);
    let dir = pc.color.forward();
    for df in [-1, 0, 1] {
        if let Some(to) = sq(f + df, r + dir) {
            push_step(state, from, to, pc, out);
        }
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
