//! Move generation: pseudo-legal generation plus the legality filter.

mod deploy;
mod profile;
mod rays;

pub(crate) use profile::profile;
pub(crate) use rays::{unit_moves, DIAGONAL, MAX_RAY, ORTHOGONAL};

use super::cache::CacheKey;
use super::state::Game;
use super::types::{Move, MoveList, MoveQuery, Square};

impl Game {
    /// Pseudo-legal moves matching the query. During an active deploy
    /// session only the session's stack square acts: its single members may
    /// deploy, and the remaining stack may leave as a whole (which commits
    /// the session).
    pub(crate) fn pseudo_legal_moves(&self, query: &MoveQuery) -> MoveList {
        let mut all = MoveList::new();
        if let Some(session) = self.active_deploy.as_ref() {
            let session_sq = session.stack_square();
            if let Some(piece) = self.get(session_sq) {
                unit_moves(self, session_sq, piece, false, &mut all);
                // pieces that already acted this turn may not act again
                let consumed: Vec<_> = session
                    .commands()
                    .iter()
                    .flat_map(|c| c.moves.iter())
                    .map(|m| m.piece)
                    .collect();
                deploy::deploy_moves(self, session_sq, piece, &consumed, &mut all);
            }
        } else {
            for sq in Square::all() {
                if query.square.is_some_and(|q| q != sq) {
                    continue;
                }
                let Some(piece) = self.get(sq) else {
                    continue;
                };
                if piece.color != self.turn {
                    continue;
                }
                unit_moves(self, sq, piece, false, &mut all);
                if piece.is_stack() {
                    deploy::deploy_moves(self, sq, piece, &[], &mut all);
                }
            }
        }
        all.iter().copied().filter(|m| query.matches(m)).collect()
    }

    /// Legal moves matching the query.
    ///
    /// Results are served from a small per-position cache that is cleared
    /// by every successful apply, undo, or board edit.
    #[must_use]
    pub fn moves(&mut self, query: &MoveQuery) -> MoveList {
        let key = self.cache_key(query);
        if let Some(cached) = self.move_cache.get(&key) {
            return cached;
        }
        let pseudo = self.pseudo_legal_moves(query);
        // legality probing must leave the session untouched
        let session_snapshot = self.active_deploy.clone();
        let mut legal = MoveList::new();
        for &mv in &pseudo {
            if self.move_is_safe(mv) {
                legal.push(mv);
            }
        }
        self.active_deploy = session_snapshot;
        self.move_cache.insert(key, legal.clone());
        legal
    }

    /// All legal moves of the side to move.
    #[must_use]
    pub fn legal_moves(&mut self) -> MoveList {
        self.moves(&MoveQuery::default())
    }

    /// Canonical notation of the legal moves matching the query.
    #[must_use]
    pub fn san_moves(&mut self, query: &MoveQuery) -> Vec<String> {
        let list = self.moves(query);
        list.iter().map(|&mv| self.move_to_san(mv)).collect()
    }

    /// Apply the candidate, test the mover's commander for attack and
    /// orthogonal exposure, undo. A candidate that fails to execute is
    /// simply not legal.
    fn move_is_safe(&mut self, mv: Move) -> bool {
        let us = self.turn;
        match self.execute_step(mv) {
            Ok(cmd) => {
                let bad = self.is_commander_attacked(us) || self.is_commander_exposed(us);
                self.undo_command(cmd);
                !bad
            }
            Err(_) => false,
        }
    }

    fn cache_key(&self, query: &MoveQuery) -> CacheKey {
        CacheKey {
            position: self.position_key(),
            session: self
                .active_deploy
                .as_ref()
                .map(|s| (s.stack_square(), s.turn(), s.commands().len())),
            square: query.square,
            kind: query.kind,
        }
    }

    /// Count leaf positions reachable in `depth` plies, deploy steps
    /// included as plies. Exercises generation and application together;
    /// recursion clones the game rather than undoing compound commits.
    #[must_use]
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for &mv in &moves {
            let mut child = self.clone();
            if child.make_move(mv) {
                nodes += child.perft(depth - 1);
            }
        }
        nodes
    }
}
