//! Per-kind movement parameters.

use crate::game::types::PieceKind;

/// Marker range for pieces that slide the whole board.
pub(crate) const SLIDE: u8 = u8::MAX;

/// Movement parameters of one piece kind, after heroic adjustment.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MoveProfile {
    pub move_range: u8,
    pub capture_range: u8,
    pub diagonal: bool,
    pub capture_ignores_blockers: bool,
    pub move_ignores_blockers: bool,
}

const fn base(
    move_range: u8,
    capture_range: u8,
    diagonal: bool,
    capture_ignores_blockers: bool,
    move_ignores_blockers: bool,
) -> MoveProfile {
    MoveProfile {
        move_range,
        capture_range,
        diagonal,
        capture_ignores_blockers,
        move_ignores_blockers,
    }
}

/// The movement profile of a kind. Heroic pieces gain one step of movement
/// and capture range and unlock diagonals; the headquarter wakes up to a
/// 1/1 profile.
pub(crate) fn profile(kind: PieceKind, heroic: bool) -> MoveProfile {
    let mut p = match kind {
        PieceKind::Commander => base(SLIDE, 1, false, false, false),
        PieceKind::Infantry | PieceKind::Engineer | PieceKind::AntiAir => {
            base(1, 1, false, false, false)
        }
        PieceKind::Militia => base(1, 1, true, false, false),
        PieceKind::Tank => base(2, 2, false, false, false),
        PieceKind::Artillery => base(3, 3, true, true, false),
        PieceKind::Missile => base(2, 2, true, true, false),
        PieceKind::AirForce => base(4, 4, true, true, true),
        PieceKind::Navy => base(4, 4, true, true, false),
        PieceKind::Headquarter => base(0, 0, false, false, false),
    };
    if heroic {
        if kind == PieceKind::Headquarter {
            p.move_range = 1;
            p.capture_range = 1;
        } else {
            if p.move_range != SLIDE {
                p.move_range += 1;
            }
            p.capture_range += 1;
        }
        p.diagonal = true;
    }
    p
}
