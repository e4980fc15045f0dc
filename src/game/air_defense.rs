//! Per-color air-defense coverage index.
//!
//! Missiles, navies, and anti-air guns project a defense zone over nearby
//! squares. The index maps each covered square to the squares of the
//! contributors covering it and is recomputed for a color whenever one of
//! its contributors appears, disappears, or changes heroic status.

use std::collections::HashMap;

use super::stack::flatten;
use super::types::{Color, Piece, Square, BOARD_SIZE};

const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Effective defense level of a single piece, 0 when it contributes none.
fn level(piece: &Piece) -> u8 {
    let base = piece.kind.air_defense_level();
    if base == 0 {
        0
    } else {
        base + u8::from(piece.heroic)
    }
}

#[derive(Clone, Debug, Default)]
pub struct AirDefenseIndex {
    cover: [HashMap<Square, Vec<Square>>; 2],
}

impl AirDefenseIndex {
    #[must_use]
    pub(crate) fn new() -> Self {
        AirDefenseIndex::default()
    }

    /// The contributor squares covering `sq` for `color`.
    #[must_use]
    pub fn covering(&self, color: Color, sq: Square) -> &[Square] {
        self.cover[color.index()]
            .get(&sq)
            .map_or(&[], Vec::as_slice)
    }

    /// The full covered-square map for one color.
    #[must_use]
    pub fn influence(&self, color: Color) -> &HashMap<Square, Vec<Square>> {
        &self.cover[color.index()]
    }

    /// Rebuild the coverage map of one color from the board.
    pub(crate) fn recompute(&mut self, color: Color, board: &[Option<Piece>; BOARD_SIZE]) {
        let map = &mut self.cover[color.index()];
        map.clear();
        for sq in Square::all() {
            let Some(piece) = &board[sq.as_index()] else {
                continue;
            };
            if piece.color != color {
                continue;
            }
            for single in flatten(piece) {
                let lvl = level(&single);
                if lvl > 0 {
                    add_coverage(map, sq, lvl);
                }
            }
        }
        for sources in map.values_mut() {
            sources.sort();
            sources.dedup();
        }
    }
}

fn add_coverage(map: &mut HashMap<Square, Vec<Square>>, source: Square, lvl: u8) {
    map.entry(source).or_default().push(source);
    for (d_rank, d_file) in ORTHOGONAL {
        for dist in 1..=i32::from(lvl) {
            match source.offset(d_rank * dist, d_file * dist) {
                Some(sq) => map.entry(sq).or_default().push(source),
                None => break,
            }
        }
    }
    for (d_rank, d_file) in DIAGONAL {
        for dist in 1..=i32::from(lvl) - 1 {
            match source.offset(d_rank * dist, d_file * dist) {
                Some(sq) => map.entry(sq).or_default().push(source),
                None => break,
            }
        }
    }
}

/// Number of contributors covering `to` that were not already covering
/// `from`: the "fresh" defense layers an air force runs into on a step.
#[must_use]
pub(crate) fn fresh_layers(index: &AirDefenseIndex, color: Color, from: Square, to: Square) -> usize {
    let origin = index.covering(color, from);
    index
        .covering(color, to)
        .iter()
        .filter(|src| !origin.contains(src))
        .count()
}
