//! Deploy-step generation: single members of a stack moving out on their
//! own parameters.

use crate::game::stack::{flatten, remove_from};
use crate::game::state::Game;
use crate::game::types::{MoveList, Piece, PieceKind, Square};

use super::rays::unit_moves;

/// Generate deploy steps for every piece of the stack on `from` that can
/// be detached and has not acted yet this turn. Recombination with
/// friendly pieces (deployed earlier or not) falls out of the ordinary
/// combination targeting inside the ray walker.
pub(crate) fn deploy_moves(
    game: &Game,
    from: Square,
    stack: &Piece,
    already_acted: &[PieceKind],
    out: &mut MoveList,
) {
    for single in flatten(stack) {
        if already_acted.contains(&single.kind) {
            continue;
        }
        // detaching must leave a combinable remainder behind
        if remove_from(stack, single.kind).is_none() {
            continue;
        }
        unit_moves(game, from, &single, true, out);
    }
}
