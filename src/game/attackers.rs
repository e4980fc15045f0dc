//! Attacker queries: which pieces of a color bear on a square.
//!
//! Used for check detection, the commander-exposure test, and heroic
//! promotion. Every single piece inside a stack counts with its own
//! parameters.

use super::air_defense::fresh_layers;
use super::movegen::{profile, DIAGONAL, MAX_RAY, ORTHOGONAL};
use super::stack::flatten;
use super::state::Game;
use super::types::{Color, PieceKind, Square};

impl Game {
    /// Pieces of `by` that can capture on `target`, as (square, kind)
    /// pairs. Stay-captures and kamikaze strikes count; standability of the
    /// target square does not matter to the attacker.
    #[must_use]
    pub fn attackers(&self, target: Square, by: Color) -> Vec<(Square, PieceKind)> {
        let mut out = Vec::new();
        let target_piece = self.get(target);
        let target_is_land = target_piece.is_some_and(|p| p.kind != PieceKind::Navy);
        let target_is_enemy_commander =
            target_piece.is_some_and(|p| p.kind == PieceKind::Commander && p.color != by);

        for (diagonal, dirs) in [(false, &ORTHOGONAL), (true, &DIAGONAL)] {
            for &(d_rank, d_file) in dirs {
                let mut any_blocker = false;
                let mut any_unfriendly_blocker = false;
                for dist in 1..=MAX_RAY {
                    let Some(sq) = target.offset(d_rank * i32::from(dist), d_file * i32::from(dist))
                    else {
                        break;
                    };
                    let Some(piece) = self.get(sq) else {
                        continue;
                    };
                    if piece.color == by {
                        for single in flatten(piece) {
                            let prof = profile(single.kind, single.heroic);
                            if diagonal && !prof.diagonal {
                                continue;
                            }
                            let mut range = prof.capture_range;
                            if diagonal && single.kind == PieceKind::Missile {
                                range = range.saturating_sub(1);
                            }
                            if single.kind == PieceKind::Navy && target_is_land {
                                range = range.saturating_sub(1);
                            }
                            // a commander riding inside a stack neither
                            // projects nor receives the facing attack
                            let facing = single.kind == PieceKind::Commander
                                && piece.kind == PieceKind::Commander
                                && !diagonal
                                && target_is_enemy_commander
                                && !any_blocker;
                            let attacks = if facing {
                                true
                            } else if dist > range {
                                false
                            } else {
                                let path_clear = prof.capture_ignores_blockers
                                    || !any_blocker
                                    || (single.kind == PieceKind::Tank && !any_unfriendly_blocker);
                                path_clear
                                    && (single.kind != PieceKind::AirForce
                                        || self.air_force_can_strike(sq, target, by))
                            };
                            if attacks {
                                out.push((sq, single.kind));
                            }
                        }
                    }
                    any_blocker = true;
                    if piece.color != by {
                        any_unfriendly_blocker = true;
                    }
                }
            }
        }
        out
    }

    /// Whether an air force at `from` can deliver a strike on `target`
    /// under the enemy air-defense rule: no fresh defense layer on any
    /// intermediate step, and at most one on the target itself (a kamikaze
    /// strike still removes the target).
    fn air_force_can_strike(&self, from: Square, target: Square, by: Color) -> bool {
        let defenders = by.opponent();
        let d_rank = (target.rank() as i32 - from.rank() as i32).signum();
        let d_file = (target.file() as i32 - from.file() as i32).signum();
        let steps = from.distance(target) as i32;
        for step in 1..=steps {
            let Some(sq) = from.offset(d_rank * step, d_file * step) else {
                return false;
            };
            let fresh = fresh_layers(&self.air_defense, defenders, from, sq);
            if fresh >= 2 {
                return false;
            }
            if fresh == 1 && sq != target {
                return false;
            }
        }
        true
    }

    /// Whether the color's commander is under attack.
    #[must_use]
    pub(crate) fn is_commander_attacked(&self, color: Color) -> bool {
        match self.commander(color) {
            Some(sq) => !self.attackers(sq, color.opponent()).is_empty(),
            None => false,
        }
    }

    /// The flying-commander exposure test: both commanders uncarried on the
    /// same file or rank with nothing between them.
    #[must_use]
    pub(crate) fn is_commander_exposed(&self, color: Color) -> bool {
        let (Some(ours), Some(theirs)) = (
            self.commander(color),
            self.commander(color.opponent()),
        ) else {
            return false;
        };
        // a commander riding inside a stack is shielded by its carrier
        if self.get(ours).map_or(true, |p| p.kind != PieceKind::Commander)
            || self
                .get(theirs)
                .map_or(true, |p| p.kind != PieceKind::Commander)
        {
            return false;
        }
        let (d_rank, d_file) = if ours.rank() == theirs.rank() {
            (0, (theirs.file() as i32 - ours.file() as i32).signum())
        } else if ours.file() == theirs.file() {
            ((theirs.rank() as i32 - ours.rank() as i32).signum(), 0)
        } else {
            return false;
        };
        let mut step = 1;
        loop {
            let Some(sq) = ours.offset(d_rank * step, d_file * step) else {
                return false;
            };
            if sq == theirs {
                return true;
            }
            if self.get(sq).is_some() {
                return false;
            }
            step += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::builder::GameBuilder;
    use crate::game::types::Piece;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_tank_attacks_adjacent() {
        let game = GameBuilder::new()
            .piece(sq("d4"), Piece::new(PieceKind::Tank, Color::Red))
            .piece(sq("d5"), Piece::new(PieceKind::Militia, Color::Blue))
            .build();
        let hits = game.attackers(sq("d5"), Color::Red);
        assert_eq!(hits, vec![(sq("d4"), PieceKind::Tank)]);
        assert!(game.attackers(sq("d5"), Color::Blue).is_empty());
    }

    #[test]
    fn test_tank_shoots_over_friendly() {
        let game = GameBuilder::new()
            .piece(sq("d4"), Piece::new(PieceKind::Tank, Color::Red))
            .piece(sq("d5"), Piece::new(PieceKind::Infantry, Color::Red))
            .piece(sq("d6"), Piece::new(PieceKind::Militia, Color::Blue))
            .build();
        let hits = game.attackers(sq("d6"), Color::Red);
        assert!(hits.contains(&(sq("d4"), PieceKind::Tank)));
    }

    #[test]
    fn test_tank_blocked_by_enemy() {
        let game = GameBuilder::new()
            .piece(sq("d4"), Piece::new(PieceKind::Tank, Color::Red))
            .piece(sq("d5"), Piece::new(PieceKind::Infantry, Color::Blue))
            .piece(sq("d6"), Piece::new(PieceKind::Militia, Color::Blue))
            .build();
        let hits = game.attackers(sq("d6"), Color::Red);
        assert!(!hits.iter().any(|&(s, _)| s == sq("d4")));
    }

    #[test]
    fn test_artillery_ignores_blockers() {
        let game = GameBuilder::new()
            .piece(sq("d4"), Piece::new(PieceKind::Artillery, Color::Red))
            .piece(sq("d5"), Piece::new(PieceKind::Infantry, Color::Blue))
            .piece(sq("d7"), Piece::new(PieceKind::Militia, Color::Blue))
            .build();
        let hits = game.attackers(sq("d7"), Color::Red);
        assert!(hits.contains(&(sq("d4"), PieceKind::Artillery)));
    }

    #[test]
    fn test_navy_range_shrinks_against_land() {
        let game = GameBuilder::new()
            .piece(sq("b4"), Piece::new(PieceKind::Navy, Color::Red))
            .piece(sq("f4"), Piece::new(PieceKind::Tank, Color::Blue))
            .piece(sq("e4"), Piece::new(PieceKind::Militia, Color::Blue))
            .build();
        // distance 4 is torpedo range, but the naval gun reaches only 3
        assert!(!game
            .attackers(sq("f4"), Color::Red)
            .contains(&(sq("b4"), PieceKind::Navy)));
        assert!(game
            .attackers(sq("e4"), Color::Red)
            .contains(&(sq("b4"), PieceKind::Navy)));
    }

    #[test]
    fn test_carried_piece_attacks() {
        let stack = crate::game::stack::combine(&[
            Piece::new(PieceKind::Tank, Color::Red),
            Piece::new(PieceKind::Infantry, Color::Red),
        ])
        .unwrap();
        let game = GameBuilder::new()
            .piece(sq("d4"), stack)
            .piece(sq("d5"), Piece::new(PieceKind::Militia, Color::Blue))
            .build();
        let hits = game.attackers(sq("d5"), Color::Red);
        assert!(hits.contains(&(sq("d4"), PieceKind::Tank)));
        assert!(hits.contains(&(sq("d4"), PieceKind::Infantry)));
    }

    #[test]
    fn test_carried_commander_does_not_face() {
        let stack = crate::game::stack::combine(&[
            Piece::new(PieceKind::Tank, Color::Red),
            Piece::new(PieceKind::Commander, Color::Red),
        ])
        .unwrap();
        let game = GameBuilder::new()
            .piece(sq("e1"), stack)
            .piece(sq("e12"), Piece::new(PieceKind::Commander, Color::Blue))
            .build();
        // the commander inside the tank bears on nothing at distance; the
        // blue commander is neither attacked nor exposed
        assert!(game.attackers(sq("e12"), Color::Red).is_empty());
        assert!(!game.is_commander_attacked(Color::Blue));
        assert!(!game.is_commander_exposed(Color::Blue));
    }

    #[test]
    fn test_commander_facing_attack() {
        let game = GameBuilder::new()
            .piece(sq("e1"), Piece::new(PieceKind::Commander, Color::Red))
            .piece(sq("e12"), Piece::new(PieceKind::Commander, Color::Blue))
            .build();
        assert!(game
            .attackers(sq("e12"), Color::Red)
            .contains(&(sq("e1"), PieceKind::Commander)));
        assert!(game.is_commander_exposed(Color::Red));
        assert!(game.is_commander_exposed(Color::Blue));
    }

    #[test]
    fn test_exposure_needs_clear_line() {
        let game = GameBuilder::new()
            .piece(sq("e1"), Piece::new(PieceKind::Commander, Color::Red))
            .piece(sq("e6"), Piece::new(PieceKind::Infantry, Color::Red))
            .piece(sq("e12"), Piece::new(PieceKind::Commander, Color::Blue))
            .build();
        assert!(!game.is_commander_exposed(Color::Red));
        assert!(game.attackers(sq("e12"), Color::Red).is_empty());
    }

    #[test]
    fn test_air_force_strike_blocked_by_defense() {
        let game = GameBuilder::new()
            .piece(sq("e4"), Piece::new(PieceKind::AirForce, Color::Red))
            .piece(sq("e8"), Piece::new(PieceKind::Missile, Color::Blue))
            .build();
        // the missile covers e6-e7 in front of itself; the strike path
        // meets a fresh layer before the target
        assert!(!game
            .attackers(sq("e8"), Color::Red)
            .contains(&(sq("e4"), PieceKind::AirForce)));
    }

    #[test]
    fn test_air_force_kamikaze_counts_as_attack() {
        // approach diagonally: the anti-air zone has no diagonal reach, so
        // the first fresh layer is met exactly on the target square
        let game = GameBuilder::new()
            .piece(sq("c4"), Piece::new(PieceKind::AirForce, Color::Red))
            .piece(sq("e6"), Piece::new(PieceKind::AntiAir, Color::Blue))
            .build();
        assert!(game
            .attackers(sq("e6"), Color::Red)
            .contains(&(sq("c4"), PieceKind::AirForce)));
    }
}
