//! Stack algebra: pure functions over carrier/carried compositions.
//!
//! A carrier offers slots, each accepting one piece out of a fixed group.
//! Navy hosts an air wing, an armor slot, and one foot slot; Air Force and
//! Tank each host one foot slot. The foot group is infantry, militia,
//! engineer, and the commander.

use super::types::{Piece, PieceKind};

const FOOT_GROUP: [PieceKind; 4] = [
    PieceKind::Infantry,
    PieceKind::Militia,
    PieceKind::Engineer,
    PieceKind::Commander,
];

const NAVY_SLOTS: [&[PieceKind]; 3] = [
    &[PieceKind::AirForce],
    &[PieceKind::Tank],
    &FOOT_GROUP,
];
const AIR_FORCE_SLOTS: [&[PieceKind]; 1] = [&FOOT_GROUP];
const TANK_SLOTS: [&[PieceKind]; 1] = [&FOOT_GROUP];

/// Carrier preference when several pieces of a list could serve as carrier.
const CARRIER_ORDER: [PieceKind; 3] = [PieceKind::Navy, PieceKind::AirForce, PieceKind::Tank];

fn slots(kind: PieceKind) -> &'static [&'static [PieceKind]] {
    match kind {
        PieceKind::Navy => &NAVY_SLOTS,
        PieceKind::AirForce => &AIR_FORCE_SLOTS,
        PieceKind::Tank => &TANK_SLOTS,
        _ => &[],
    }
}

/// Whether `carrier` can host every kind in `cargo`, one slot each.
fn slots_accept(carrier: PieceKind, cargo: &[PieceKind]) -> bool {
    let available = slots(carrier);
    let mut used = [false; 3];
    'cargo: for &kind in cargo {
        for (i, slot) in available.iter().enumerate() {
            if !used[i] && slot.contains(&kind) {
                used[i] = true;
                continue 'cargo;
            }
        }
        return false;
    }
    true
}

/// Split a stack into its single pieces: the carrier first, then each
/// carried piece.
#[must_use]
pub fn flatten(piece: &Piece) -> Vec<Piece> {
    let mut out = Vec::with_capacity(1 + piece.carried.len());
    out.push(piece.without_carried());
    out.extend(piece.carried.iter().cloned());
    out
}

/// Combine single pieces into one legal stack.
///
/// Returns `None` when the pieces differ in color or no piece of the list
/// can carry all the others. A one-element list is returned unchanged.
/// Inputs that are themselves stacks are flattened first.
#[must_use]
pub fn combine(pieces: &[Piece]) -> Option<Piece> {
    if pieces.is_empty() {
        return None;
    }
    let mut singles: Vec<Piece> = Vec::with_capacity(pieces.len());
    for p in pieces {
        singles.extend(flatten(p));
    }
    let color = singles[0].color;
    if singles.iter().any(|p| p.color != color) {
        return None;
    }
    if singles.len() == 1 {
        return Some(singles.remove(0));
    }

    let carrier_idx = CARRIER_ORDER.iter().find_map(|&order| {
        let idx = singles.iter().position(|p| p.kind == order)?;
        let cargo: Vec<PieceKind> = singles
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, p)| p.kind)
            .collect();
        slots_accept(order, &cargo).then_some(idx)
    })?;

    let mut carrier = singles.remove(carrier_idx);
    carrier.carried = singles;
    Some(carrier)
}

/// Whether the piece is a single piece or a stack accepted by `combine`.
#[must_use]
pub fn is_valid_stack(piece: &Piece) -> bool {
    if piece.carried.is_empty() {
        return true;
    }
    if piece.carried.iter().any(|p| !p.carried.is_empty()) {
        return false;
    }
    if piece.carried.iter().any(|p| p.color != piece.color) {
        return false;
    }
    let cargo: Vec<PieceKind> = piece.carried.iter().map(|p| p.kind).collect();
    slots_accept(piece.kind, &cargo)
}

/// Remove the piece of `kind` from a stack.
///
/// Returns the removed single piece and what remains on the square, or
/// `None` when the stack holds no such piece or the removal would leave an
/// uncombinable remainder.
#[must_use]
pub fn remove_from(stack: &Piece, kind: PieceKind) -> Option<(Piece, Option<Piece>)> {
    if stack.kind == kind {
        let removed = stack.without_carried();
        if stack.carried.is_empty() {
            return Some((removed, None));
        }
        let remainder = combine(&stack.carried)?;
        return Some((removed, Some(remainder)));
    }
    let idx = stack.carried.iter().position(|p| p.kind == kind)?;
    let mut remainder = stack.clone();
    let removed = remainder.carried.remove(idx);
    Some((removed, Some(remainder)))
}

/// Every partition of a stack into disjoint sub-stacks, each internally
/// combinable. The trivial partition (the stack itself) is included.
#[must_use]
pub fn all_splits(stack: &Piece) -> Vec<Vec<Piece>> {
    let singles = flatten(stack);
    let mut partitions: Vec<Vec<Vec<Piece>>> = Vec::new();
    partition_rec(&singles, 0, &mut Vec::new(), &mut partitions);

    let mut out = Vec::new();
    'partition: for blocks in partitions {
        let mut combined = Vec::with_capacity(blocks.len());
        for block in &blocks {
            match combine(block) {
                Some(piece) => combined.push(piece),
                None => continue 'partition,
            }
        }
        out.push(combined);
    }
    out
}

fn partition_rec(
    singles: &[Piece],
    idx: usize,
    blocks: &mut Vec<Vec<Piece>>,
    out: &mut Vec<Vec<Vec<Piece>>>,
) {
    if idx == singles.len() {
        out.push(blocks.clone());
        return;
    }
    for i in 0..blocks.len() {
        blocks[i].push(singles[idx].clone());
        partition_rec(singles, idx + 1, blocks, out);
        blocks[i].pop();
    }
    blocks.push(vec![singles[idx].clone()]);
    partition_rec(singles, idx + 1, blocks, out);
    blocks.pop();
}
