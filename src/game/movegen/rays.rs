//! The ray walker: moves of one moving unit from one square.
//!
//! A "unit" is whatever relocates as a whole: a single piece, a full stack
//! behind its carrier's profile, or one deployed member of a stack.

use crate::game::air_defense::fresh_layers;
use crate::game::stack::combine;
use crate::game::state::Game;
use crate::game::terrain::{can_stand, heavy_crossing_blocked, navy_ok};
use crate::game::types::{Move, MoveKind, MoveList, Piece, PieceKind, Square, FILE_COUNT, RANK_COUNT};

use super::profile::{profile, MoveProfile, SLIDE};

pub(crate) const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub(crate) const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Longest possible ray on the board.
pub(crate) const MAX_RAY: u8 = (RANK_COUNT - 1) as u8;

const _: () = assert!(RANK_COUNT > FILE_COUNT);

/// Generate the pseudo-legal moves of `unit` standing on `from`.
pub(crate) fn unit_moves(game: &Game, from: Square, unit: &Piece, deploy: bool, out: &mut MoveList) {
    let prof = profile(unit.kind, unit.heroic);
    if prof.move_range == 0 && prof.capture_range == 0 {
        return;
    }
    // a navy stranded off the water cannot leave, though its cargo may
    if unit.kind == PieceKind::Navy && !navy_ok(from) {
        return;
    }
    for &dir in &ORTHOGONAL {
        walk_ray(game, from, unit, &prof, dir, false, deploy, out);
    }
    if prof.diagonal {
        for &dir in &DIAGONAL {
            walk_ray(game, from, unit, &prof, dir, true, deploy, out);
        }
    }
    if unit.kind == PieceKind::Commander {
        commander_facing_capture(game, from, unit, deploy, out);
    }
}

/// The commander captures an enemy commander it faces along an otherwise
/// empty file or rank, at any distance.
fn commander_facing_capture(
    game: &Game,
    from: Square,
    unit: &Piece,
    deploy: bool,
    out: &mut MoveList,
) {
    let them = unit.color.opponent();
    for &(d_rank, d_file) in &ORTHOGONAL {
        for dist in 1..=i32::from(MAX_RAY) {
            let Some(to) = from.offset(d_rank * dist, d_file * dist) else {
                break;
            };
            let Some(target) = game.get(to) else {
                continue;
            };
            if target.color == them && target.kind == PieceKind::Commander {
                let mut mv = Move::new(from, to, unit.kind, MoveKind::Capture);
                mv.captured = Some(PieceKind::Commander);
                mv.deploy = deploy;
                out.push(mv);
            }
            break;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn walk_ray(
    game: &Game,
    from: Square,
    unit: &Piece,
    prof: &MoveProfile,
    (d_rank, d_file): (i32, i32),
    diagonal: bool,
    deploy: bool,
    out: &mut MoveList,
) {
    let us = unit.color;
    let them = us.opponent();

    let mut move_range = prof.move_range;
    let mut capture_range = prof.capture_range;
    // missiles lose one step on diagonals
    if diagonal && unit.kind == PieceKind::Missile {
        move_range = move_range.saturating_sub(1);
        capture_range = capture_range.saturating_sub(1);
    }
    let limit = if move_range == SLIDE {
        MAX_RAY
    } else {
        move_range.max(capture_range)
    };

    let mut move_blocked = false;
    let mut capture_path_blocked = false;

    for dist in 1..=limit {
        let Some(to) = from.offset(d_rank * i32::from(dist), d_file * i32::from(dist)) else {
            break;
        };

        // air-force traversal: fresh enemy defense layers at each step
        if unit.kind == PieceKind::AirForce {
            let fresh = fresh_layers(&game.air_defense, them, from, to);
            if fresh >= 2 {
                break;
            }
            if fresh == 1 {
                if let Some(target) = game.get(to) {
                    if target.color == them && dist <= capture_range {
                        let mut mv =
                            Move::new(from, to, unit.kind, MoveKind::SuicideCapture);
                        mv.captured = Some(target.kind);
                        mv.deploy = deploy;
                        out.push(mv);
                    }
                }
                break;
            }
        }

        let standable = can_stand(unit.kind, to);
        let heavy_ok = !(unit.kind.is_heavy() && heavy_crossing_blocked(from, to));
        let within_moves = move_range == SLIDE || dist <= move_range;

        match game.get(to) {
            None => {
                if within_moves && !move_blocked && standable && heavy_ok {
                    let mut mv = Move::new(from, to, unit.kind, MoveKind::Normal);
                    mv.deploy = deploy;
                    out.push(mv);
                }
                // a commander may not slide beyond a square the enemy
                // commander bears on
                if unit.kind == PieceKind::Commander && faced_by_enemy_commander(game, to, us, from)
                {
                    break;
                }
            }
            Some(target) if target.color == them => {
                let effective_range = if unit.kind == PieceKind::Navy
                    && target.kind != PieceKind::Navy
                {
                    capture_range.saturating_sub(1)
                } else {
                    capture_range
                };
                // orthogonal commander-vs-commander capture is handled by
                // the facing pre-pass
                let facing_case = unit.kind == PieceKind::Commander
                    && !diagonal
                    && target.kind == PieceKind::Commander;
                let within = dist <= effective_range && !facing_case;
                let path_clear = prof.capture_ignores_blockers || !capture_path_blocked;
                if within && path_clear {
                    push_capture(
                        from, to, unit, target, standable, heavy_ok, deploy, out,
                    );
                }
            }
            Some(target) => {
                if within_moves && !move_blocked && heavy_ok {
                    if let Some(merged) = combine(&[unit.clone(), target.clone()]) {
                        if can_stand(merged.kind, to) {
                            let mut mv = Move::new(from, to, unit.kind, MoveKind::Combination);
                            mv.deploy = deploy;
                            out.push(mv);
                        }
                    }
                }
            }
        }

        // blocker bookkeeping for the squares beyond this one
        if let Some(piece) = game.get(to) {
            if !prof.move_ignores_blockers {
                // friendly ships and cargo do not obstruct naval movement
                let transparent =
                    unit.kind == PieceKind::Navy && piece.color == us && navy_ok(to);
                if !transparent {
                    move_blocked = true;
                }
            }
            if !prof.capture_ignores_blockers {
                // tanks fire over friendly pieces
                let transparent = unit.kind == PieceKind::Tank && piece.color == us;
                if !transparent {
                    capture_path_blocked = true;
                }
            }
        }
        // impassable terrain ends the movement ray
        if !prof.move_ignores_blockers && !standable {
            move_blocked = true;
        }
        if move_blocked && !prof.capture_ignores_blockers && capture_path_blocked {
            break;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn push_capture(
    from: Square,
    to: Square,
    unit: &Piece,
    target: &Piece,
    standable: bool,
    heavy_ok: bool,
    deploy: bool,
    out: &mut MoveList,
) {
    let relocatable = standable && heavy_ok;
    if unit.kind == PieceKind::AirForce {
        // an air force may take the square or strike and return
        if relocatable {
            let mut mv = Move::new(from, to, unit.kind, MoveKind::Capture);
            mv.captured = Some(target.kind);
            mv.deploy = deploy;
            out.push(mv);
        }
        let mut stay = Move::new(from, to, unit.kind, MoveKind::StayCapture);
        stay.captured = Some(target.kind);
        stay.deploy = deploy;
        out.push(stay);
        return;
    }
    let kind = if relocatable {
        MoveKind::Capture
    } else {
        MoveKind::StayCapture
    };
    let mut mv = Move::new(from, to, unit.kind, kind);
    mv.captured = Some(target.kind);
    mv.deploy = deploy;
    out.push(mv);
}

/// Whether an uncarried enemy commander bears on `sq` along a clear
/// orthogonal line. `vacated` is treated as empty (the square the moving
/// commander is about to leave).
pub(crate) fn faced_by_enemy_commander(
    game: &Game,
    sq: Square,
    us: crate::game::types::Color,
    vacated: Square,
) -> bool {
    let Some(enemy_sq) = game.commander(us.opponent()) else {
        return false;
    };
    // a carried commander is shielded by its carrier
    if game
        .get(enemy_sq)
        .map_or(true, |p| p.kind != PieceKind::Commander)
    {
        return false;
    }
    if enemy_sq == sq {
        return false;
    }
    for &(d_rank, d_file) in &ORTHOGONAL {
        for dist in 1..=i32::from(MAX_RAY) {
            let Some(probe) = sq.offset(d_rank * dist, d_file * dist) else {
                break;
            };
            if probe == enemy_sq {
                return true;
            }
            if probe != vacated && game.get(probe).is_some() {
                break;
            }
        }
    }
    false
}
