//! Static terrain tables and the heavy-piece river-crossing predicate.
//!
//! Files a-b are open water, file c is coast (mixed), files d-k are land.
//! The river cuts the land half in two between rank indices 5 and 6, with
//! mixed river squares at files d-e and bridges on files f and h.

use once_cell::sync::Lazy;

use super::types::{PieceKind, Square, BOARD_SIZE, FILE_COUNT, RANK_COUNT};

/// Files reachable by naval movement: a, b, and the coast file c.
const COAST_FILE: usize = 2;
/// Rank indices adjacent to the river (between printed ranks 7 and 6).
const RIVER_RANKS: [usize; 2] = [5, 6];
/// Files of the mixed river squares.
const RIVER_FILES: [usize; 2] = [3, 4];
/// Files carrying a bridge over the river.
pub(crate) const BRIDGE_FILES: [usize; 2] = [5, 7];

struct Terrain {
    navy_ok: [bool; BOARD_SIZE],
    land_ok: [bool; BOARD_SIZE],
}

static TERRAIN: Lazy<Terrain> = Lazy::new(|| {
    let mut navy_ok = [false; BOARD_SIZE];
    let mut land_ok = [false; BOARD_SIZE];
    for rank in 0..RANK_COUNT {
        for file in 0..FILE_COUNT {
            let idx = Square::new(rank, file).as_index();
            let river = RIVER_RANKS.contains(&rank) && RIVER_FILES.contains(&file);
            navy_ok[idx] = file <= COAST_FILE || river;
            land_ok[idx] = file >= COAST_FILE;
        }
    }
    Terrain { navy_ok, land_ok }
});

/// Whether naval pieces can occupy the square.
#[inline]
#[must_use]
pub fn navy_ok(sq: Square) -> bool {
    TERRAIN.navy_ok[sq.as_index()]
}

/// Whether land pieces can occupy the square.
#[inline]
#[must_use]
pub fn land_ok(sq: Square) -> bool {
    TERRAIN.land_ok[sq.as_index()]
}

/// Whether a piece of the given kind can stand on the square.
#[inline]
#[must_use]
pub fn can_stand(kind: PieceKind, sq: Square) -> bool {
    if kind == PieceKind::Navy {
        navy_ok(sq)
    } else {
        land_ok(sq)
    }
}

/// Heavy pieces (artillery, anti-air, missile) may only cross the river
/// along a bridge file. Both endpoints on the water files are exempt.
#[must_use]
pub fn heavy_crossing_blocked(from: Square, to: Square) -> bool {
    let crosses = (from.rank() <= RIVER_RANKS[0]) != (to.rank() <= RIVER_RANKS[0]);
    if !crosses || from.file() < COAST_FILE || to.file() < COAST_FILE {
        return false;
    }
    !(from.file() == to.file() && BRIDGE_FILES.contains(&from.file()))
}
