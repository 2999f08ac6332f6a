//! State transition: applies one move plus every derived effect.
//!
//! `apply_move` is a pure function from (state, move, mover) to a fresh
//! snapshot. A violated precondition returns the input state unchanged;
//! callers treat a no-op transition as an illegal move, and the legality
//! filter in `movegen` excludes such candidates upstream.
//!
//! After the primary effect, the post-move triggers run in a fixed order:
//! push-back, conversion, resurrection, queen sacrifice, king's dominion,
//! commander rallying, infiltrator victory. The ordering is part of the
//! rules; do not reorder.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::attacks::{is_in_check, is_invulnerable_to};
use crate::board::{GameState, Winner};
use crate::movegen::legal_moves;
use crate::rules::*;
use crate::types::*;

/// Randomness for one transition, derived from the state's salt, the move
/// counter, and the move itself. A pure function of (state, move): probing a
/// candidate and applying it for real roll the same effects.
fn effect_rng(state: &GameState, mv: Move) -> StdRng {
    let mut h = DefaultHasher::new();
    state.rng_salt.hash(&mut h);
    state.move_counter.hash(&mut h);
    mv.hash(&mut h);
    StdRng::seed_from_u64(h.finish())
}

/// Apply `mv` for `mover`, returning the successor state. Illegal or
/// malformed input returns the state unchanged.
pub fn apply_move(state: &GameState, mv: Move, mover: Color, rules: &Rules) -> GameState {
    try_apply(state, mv, mover, rules, false).unwrap_or_else(|| state.clone())
}

/// Transition that reports failure instead of echoing the state. `probe`
/// skips the recursive auto-checkmate probe; the legality filter runs in
/// probe mode, which bounds the mutual recursion with `legal_moves`.
pub(crate) fn try_apply(
    state: &GameState,
    mv: Move,
    mover: Color,
    rules: &Rules,
    probe: bool,
) -> Option<GameState> {
    if state.game_over {
        return None;
    }
    let piece = state.piece_at(mv.from)?;
    if piece.color != mover {
        return None;
    }

    let mut rng = effect_rng(state, mv);
    let mut next = state.clone();
    next.rng_salt = rng.next_u64();
    let prev_ep = next.en_passant.take();
    let pre_level = piece.level;
    let moved_id = piece.id;

    // Captures made by the primary effect (not push-back crushes).
    let mut captured: Vec<Piece> = Vec::new();
    let mut promo_extra_turn = false;
    // Square the acting piece ends on, None once it left the board.
    let mut landing: Option<u8> = Some(mv.to);

    match mv.kind {
        MoveKind::Move => {
            if !next.is_free(mv.to) {
                return None;
            }
            let mut moved = piece;
            moved.has_moved = true;
            next.set_piece(mv.from, None);
            next.set_piece(mv.to, Some(moved));

            // A pawn double step exposes the skipped square. Commanders
            // double-step too but cannot be taken en passant, so no target.
            if piece.kind == PieceKind::Pawn
                && file_of(mv.from) == file_of(mv.to)
                && (rank_of(mv.to) - rank_of(mv.from)).abs() == 2
            {
                next.en_passant = sq(
                    file_of(mv.from),
                    (rank_of(mv.from) + rank_of(mv.to)) / 2,
                );
            }
        }
        MoveKind::Capture => {
            let target = next.piece_at(mv.to)?;
            if target.color == mover || is_invulnerable_to(&target, &piece) {
                return None;
            }
            let mut moved = piece;
            moved.has_moved = true;
            moved.level = rules.leveled_up(moved.kind, moved.level, rules.capture_bonus(target.kind));
            // Taking a commander conscripts the capturing pawn.
            if moved.kind == PieceKind::Pawn && target.kind == PieceKind::Commander {
                moved.kind = PieceKind::Commander;
                moved.id = moved.id.morphed();
            }
            captured.push(target);
            next.set_piece(mv.from, None);
            next.set_piece(mv.to, Some(moved));
        }
        MoveKind::Promotion { to: promo } => {
            if !piece.kind.is_pawn_class() || rank_of(mv.to) != mover.far_rank() {
                return None;
            }
            let target = next.piece_at(mv.to);
            let mut level = 1u8;
            if let Some(t) = target {
                if t.color == mover || is_invulnerable_to(&t, &piece) {
                    return None;
                }
                captured.push(t);
                level = 1 + rules.capture_bonus(t.kind);
            } else if next.item_at(mv.to).is_some() {
                return None;
            }
            let kind = if piece.kind == PieceKind::Commander {
                PieceKind::Hero
            } else {
                match promo {
                    PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight => {
                        promo
                    }
                    _ => return None,
                }
            };
            if kind == PieceKind::Queen {
                level = level.min(QUEEN_LEVEL_CAP);
            }
            if piece.kind == PieceKind::Pawn && pre_level >= PROMOTION_EXTRA_TURN_LEVEL {
                promo_extra_turn = true;
            }
            let promoted = Piece {
                id: piece.id.morphed(),
                kind,
                color: mover,
                level,
                has_moved: true,
                invulnerable_turns: piece.invulnerable_turns,
            };
            next.set_piece(mv.from, None);
            next.set_piece(mv.to, Some(promoted));
        }
        MoveKind::Castle => {
            if piece.kind != PieceKind::King || piece.has_moved {
                return None;
            }
            let rank = mover.back_rank();
            let (rook_from, rook_to) = match (file_of(mv.to), rank_of(mv.to) == rank) {
                (6, true) => (sq(7, rank)?, sq(5, rank)?),
                (2, true) => (sq(0, rank)?, sq(3, rank)?),
                _ => return None,
            };
            let mut rook = next.piece_at(rook_from)?;
            if rook.kind != PieceKind::Rook || rook.color != mover || rook.has_moved {
                return None;
            }
            if !next.is_free(mv.to) || !next.is_free(rook_to) {
                return None;
            }
            let mut king = piece;
            king.has_moved = true;
            rook.has_moved = true;
            next.set_piece(mv.from, None);
            next.set_piece(mv.to, Some(king));
            next.set_piece(rook_from, None);
            next.set_piece(rook_to, Some(rook));
        }
        MoveKind::SelfDestruct => {
            if mv.from != mv.to
                || !matches!(piece.kind, PieceKind::Knight | PieceKind::Hero)
                || piece.level < SELF_DESTRUCT_LEVEL
            {
                return None;
            }
            let f = file_of(mv.from);
            let r = rank_of(mv.from);
            for (df, dr) in KING_DELTAS {
                let Some(s) = sq(f + df, r + dr) else { continue };
                if let Some(target) = next.piece_at(s)
                    && target.color != mover
                    && target.kind != PieceKind::King
                {
                    // Queens are the forced exception: they die even while
                    // otherwise invulnerable.
                    if target.kind == PieceKind::Queen || !is_invulnerable_to(&target, &piece) {
                        captured.push(target);
                        next.set_piece(s, None);
                    }
                }
                if next.item_at(s).is_some() {
                    next.set_item(s, None);
                }
            }
            next.set_piece(mv.from, None);
            landing = None;
        }
        MoveKind::Swap => {
            let partner_kind = match piece.kind {
                PieceKind::Knight if piece.level >= KNIGHT_SWAP_LEVEL => PieceKind::Bishop,
                PieceKind::Bishop if piece.level >= BISHOP_SWAP_LEVEL => PieceKind::Knight,
                PieceKind::Hero if piece.level >= KNIGHT_SWAP_LEVEL => PieceKind::Bishop,
                _ => return None,
            };
            let mut partner = next.piece_at(mv.to)?;
            if partner.color != mover || partner.kind != partner_kind {
                return None;
            }
            let mut moved = piece;
            moved.has_moved = true;
            partner.has_moved = true;
            next.set_piece(mv.from, Some(partner));
            next.set_piece(mv.to, Some(moved));
        }
        MoveKind::EnPassant => {
            if piece.kind != PieceKind::Pawn || prev_ep != Some(mv.to) || !next.is_free(mv.to) {
                return None;
            }
            let victim_sq = sq(file_of(mv.to), rank_of(mv.to) - mover.forward())?;
            let victim = next.piece_at(victim_sq)?;
            if victim.color == mover || victim.kind != PieceKind::Pawn {
                return None;
            }
            let mut moved = piece;
            moved.has_moved = true;
            moved.level = rules.leveled_up(moved.kind, moved.level, rules.capture_bonus(victim.kind));
            // The sneak capture turns the pawn into an infiltrator.
            moved.kind = PieceKind::Infiltrator;
            moved.id = moved.id.morphed();
            captured.push(victim);
            next.set_piece(victim_sq, None);
            next.set_piece(mv.from, None);
            next.set_piece(mv.to, Some(moved));
        }
    }

    // Invulnerability countdowns burn on the owner's own moves, so a grant
    // made later this move keeps its full duration.
    for i in 0..64u8 {
        if let Some(mut pc) = next.piece_at(i)
            && pc.color == mover
            && pc.invulnerable_turns > 0
        {
            pc.invulnerable_turns -= 1;
            next.set_piece(i, Some(pc));
        }
    }

    next.captured[mover.idx()].extend(captured.iter().copied());
    if !captured.is_empty() && next.first_blood.is_none() {
        next.first_blood = Some(mover);
    }

    // Post-move triggers, in rule order, against the piece now standing on
    // the destination -- and only if it is still the piece that moved.
    let mut crushes = 0u32;
    let actor = landing
        .and_then(|s| next.piece_at(s).map(|p| (s, p)))
        .filter(|(_, p)| p.id.same_origin(moved_id));

    if let Some((at, actor)) = actor {
        // 1. Push-back aura.
        if actor.kind.is_pawn_class() && actor.level >= PAWN_PUSH_BACK_LEVEL {
            crushes = push_back(&mut next, at, mover);
            if crushes > 0 && next.first_blood.is_none() {
                next.first_blood = Some(mover);
            }
        }

        // 2. Conversion aura.
        if matches!(actor.kind, PieceKind::Bishop | PieceKind::Hero)
            && actor.level >= CONVERSION_LEVEL
        {
            convert_neighbors(&mut next, at, mover, &mut rng);
        }

        // Refetch: conversions never touch the actor, but stay careful.
        if let Some(actor) = next.piece_at(at) {
            // 3. Resurrection on a rook crossing its threshold upward.
            if actor.kind == PieceKind::Rook
                && pre_level < ROOK_RESURRECTION_LEVEL
                && actor.level >= ROOK_RESURRECTION_LEVEL
            {
                resurrect(&mut next, mover, rules, &mut rng);
            }

            // 4. Queen sacrifice on reaching the cap by capture.
            if actor.kind == PieceKind::Queen
                && actor.level == QUEEN_LEVEL_CAP
                && pre_level < QUEEN_LEVEL_CAP
                && !captured.is_empty()
            {
                queen_sacrifice(&mut next, mover, &mut rng);
            }

            // 5. King's Dominion: enemy queens pay for the king's growth.
            if actor.kind == PieceKind::King && actor.level > pre_level {
                let gained = actor.level - pre_level;
                for i in 0..64u8 {
                    if let Some(mut pc) = next.piece_at(i)
                        && pc.color != mover
                        && pc.kind == PieceKind::Queen
                    {
                        pc.level = pc.level.saturating_sub(gained).max(1);
                        next.set_piece(i, Some(pc));
                    }
                }
            }

            // 6. Commander rallying and nomination.
            if next.first_blood.is_some() {
                if actor.kind == PieceKind::Commander {
                    for i in 0..64u8 {
                        if let Some(mut pc) = next.piece_at(i)
                            && pc.color == mover
                            && pc.kind == PieceKind::Pawn
                            && pc.id != actor.id
                        {
                            pc.level = pc.level.saturating_add(1);
                            next.set_piece(i, Some(pc));
                        }
                    }
                }
                let has_commander = next
                    .pieces_of(mover)
                    .any(|(_, p)| p.kind == PieceKind::Commander);
                if !has_commander {
                    nominate_commander(&mut next, mover);
                }
            }
        }
    }
    // 7. Infiltrator victory is detected with the other terminal conditions
    // in the epilogue below.

    // Bookkeeping epilogue.
    let total_captures = captured.len() as u32 + crushes;
    let mut extra = promo_extra_turn;
    if total_captures > 0 {
        next.kill_streaks[mover.idx()] = next.kill_streaks[mover.idx()].saturating_add(1);
        next.kill_streaks[mover.other().idx()] = 0;
        if next.kill_streaks[mover.idx()] == RESURRECTION_STREAK {
            resurrect(&mut next, mover, rules, &mut rng);
        }
        if next.kill_streaks[mover.idx()] == EXTRA_TURN_STREAK {
            extra = true;
        }
    } else {
        next.kill_streaks[mover.idx()] = 0;
    }

    next.move_counter += 1;
    if next.move_counter % HAZARD_SPAWN_INTERVAL == 0 {
        spawn_hazard(&mut next, &mut rng);
    }

    next.detect_terminal();
    next.extra_turn = extra;
    if !next.game_over {
        next.current_player = if extra { mover } else { mover.other() };
        if extra && !probe {
            probe_auto_checkmate(&mut next, mover, rules);
        }
    }

    Some(next)
}

/// An extra turn that leaves the opponent in check with no legal reply ends
/// the game at once, scored apart from an ordinary checkmate.
fn probe_auto_checkmate(next: &mut GameState, mover: Color, rules: &Rules) {
    let opp = mover.other();
    if !is_in_check(next, opp) {
        return;
    }
    let mut hypothetical = next.clone();
    hypothetical.current_player = opp;
    hypothetical.extra_turn = false;
    if legal_moves(&hypothetical, opp, rules).is_empty() {
        next.game_over = true;
        next.winner = Some(Winner::from_color(mover));
        next.auto_checkmate = true;
    }
}

/// Displace every adjacent enemy piece or anvil one square further out.
/// Returns the number of pieces crushed by travelling anvils.
fn push_back(next: &mut GameState, at: u8, mover: Color) -> u32 {
    let f = file_of(at);
    let r = rank_of(at);
    let mut crushes = 0;
    for (df, dr) in KING_DELTAS {
        let Some(n) = sq(f + df, r + dr) else { continue };
        let dest = sq(f + 2 * df, r + 2 * dr);

        if let Some(pc) = next.piece_at(n)
            && pc.color != mover
        {
            // Pushed pieces only move into a fully free square.
            if let Some(d) = dest
                && next.is_free(d)
            {
                next.set_piece(n, None);
                next.set_piece(d, Some(pc));
            }
            continue;
        }

        if next.item_at(n).is_some() {
            match dest {
                // Off the edge: the anvil is gone.
                None => next.set_item(n, None),
                Some(d) => {
                    match next.piece_at(d) {
                        // Kings stop anvils; everything else is crushed
                        // outright, with no captured-list entry.
                        Some(p) if p.kind == PieceKind::King => {}
                        Some(_) => {
                            next.set_piece(d, None);
                            next.set_item(n, None);
                            next.set_item(d, Some(Item::Anvil));
                            crushes += 1;
                        }
                        None if next.item_at(d).is_none() => {
                            next.set_item(n, None);
                            next.set_item(d, Some(Item::Anvil));
                        }
                        None => {}
                    }
                }
            }
        }
    }
    crushes
}

/// Each adjacent enemy non-king piece defects with probability one half.
fn convert_neighbors(next: &mut GameState, at: u8, mover: Color, rng: &mut StdRng) {
    let f = file_of(at);
    let r = rank_of(at);
    for (df, dr) in KING_DELTAS {
        let Some(n) = sq(f + df, r + dr) else { continue };
        if let Some(mut pc) = next.piece_at(n)
            && pc.color != mover
            && pc.kind != PieceKind::King
            && rng.gen_bool(0.5)
        {
            pc.color = mover;
            pc.id = pc.id.morphed();
            next.set_piece(n, Some(pc));
        }
    }
}

/// Return the most valuable piece from the mover's resurrection pool to the
/// board at level 1, preferring an empty own-half square.
fn resurrect(next: &mut GameState, mover: Color, rules: &Rules, rng: &mut StdRng) {
    let pool_idx = mover.other().idx();
    let best = next.captured[pool_idx]
        .iter()
        .enumerate()
        .max_by_key(|(_, p)| rules.base_value(p.kind, 1));
    let Some((idx, _)) = best else { return };

    let own_half: Vec<u8> = (0..64u8)
        .filter(|&s| {
            next.is_free(s)
                && match mover {
                    Color::White => rank_of(s) <= 3,
                    Color::Black => rank_of(s) >= 4,
                }
        })
        .collect();
    let anywhere: Vec<u8>;
    let candidates = if own_half.is_empty() {
        anywhere = (0..64u8).filter(|&s| next.is_free(s)).collect();
        &anywhere
    } else {
        &own_half
    };
    if candidates.is_empty() {
        return;
    }
    let spot = candidates[rng.gen_range(0..candidates.len())];

    let mut revived = next.captured[pool_idx].remove(idx);
    revived.color = mover;
    revived.level = 1;
    revived.has_moved = true;
    revived.invulnerable_turns = RESURRECTION_INVULN_TURNS;
    revived.id = revived.id.morphed();
    // Auto-promote a pawn-class revival landing on the far rank.
    if revived.kind.is_pawn_class() && rank_of(spot) == mover.far_rank() {
        revived.kind = if revived.kind == PieceKind::Commander {
            PieceKind::Hero
        } else {
            PieceKind::Queen
        };
        revived.id = revived.id.morphed();
    }
    next.set_piece(spot, Some(revived));
}

/// The balancing cost for a queen hitting its cap: one of the mover's own
/// pawns or commanders is forfeited to the opponent's captured-list.
fn queen_sacrifice(next: &mut GameState, mover: Color, rng: &mut StdRng) {
    let mut least: Vec<u8> = Vec::new();
    let mut least_adv = i8::MAX;
    for (s, pc) in next.pieces_of(mover) {
        if !pc.kind.is_pawn_class() {
            continue;
        }
        let adv = (rank_of(s) - mover.back_rank()).abs();
        if adv < least_adv {
            least_adv = adv;
            least.clear();
            least.push(s);
        } else if adv == least_adv {
            least.push(s);
        }
    }
    if least.is_empty() {
        return;
    }
    let s = least[rng.gen_range(0..least.len())];
    if let Some(pc) = next.piece_at(s) {
        next.set_piece(s, None);
        next.captured[mover.other().idx()].push(pc);
    }
}

/// Promote the best-placed level-1 pawn to commander, scored by advancement
/// and file centrality.
fn nominate_commander(next: &mut GameState, mover: Color) {
    let mut best: Option<(i32, u8)> = None;
    for (s, pc) in next.pieces_of(mover) {
        if pc.kind != PieceKind::Pawn || pc.level != 1 {
            continue;
        }
        let adv = (rank_of(s) - mover.back_rank()).abs() as i32;
        let file = file_of(s);
        let centrality = 3 - (file - 3).abs().min((file - 4).abs()) as i32;
        let score = 2 * adv + centrality;
        if best.map(|(b, _)| score > b).unwrap_or(true) {
            best = Some((score, s));
        }
    }
    if let Some((_, s)) = best
        && let Some(mut pc) = next.piece_at(s)
    {
        pc.kind = PieceKind::Commander;
        pc.id = pc.id.morphed();
        next.set_piece(s, Some(pc));
    }
}

fn spawn_hazard(next: &mut GameState, rng: &mut StdRng) {
    let free: Vec<u8> = (0..64u8).filter(|&s| next.is_free(s)).collect();
    if free.is_empty() {
        return;
    }
    let s = free[rng.gen_range(0..free.len())];
    next.set_item(s, Some(Item::Anvil));
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod transition_tests;
