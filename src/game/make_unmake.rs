//! Move application: every move compiles to an ordered list of atomic,
//! reversible actions. Undo replays the list backwards from snapshots.

use super::error::StateError;
use super::stack::{combine, remove_from};
use super::state::Game;
use super::types::{Color, Move, Piece, PieceKind, Square};

/// One atomic, reversible board mutation.
#[derive(Clone, Debug)]
pub(crate) enum Action {
    RemovePiece {
        sq: Square,
        piece: Piece,
    },
    PlacePiece {
        sq: Square,
        piece: Piece,
        replaced: Option<Piece>,
    },
    RemoveFromStack {
        sq: Square,
        removed: Piece,
        original: Piece,
    },
    PromoteAttackers {
        promoted: Vec<(Square, PieceKind)>,
    },
    StateUpdate {
        flip_turn: bool,
        prev_half_moves: u32,
        prev_move_number: u32,
        key: String,
        prev_count: u32,
    },
}

/// A committed unit of play: one move, or a whole deploy turn collapsed
/// into a single compound command.
#[derive(Clone, Debug)]
pub struct Command {
    /// Canonical notation, a comma-joined sequence for deploy turns.
    pub san: String,
    /// The moves this command applied, in order.
    pub moves: Vec<Move>,
    pub(crate) actions: Vec<Action>,
}

impl Game {
    // =========================================================================
    // Action primitives. Each executes against the board and returns the
    // populated, undoable action.
    // =========================================================================

    fn act_remove_piece(&mut self, sq: Square, actions: &mut Vec<Action>) -> Result<Piece, StateError> {
        let piece = self.board_remove(sq).ok_or_else(|| StateError::MissingPiece {
            square: sq.to_string(),
        })?;
        actions.push(Action::RemovePiece {
            sq,
            piece: piece.clone(),
        });
        Ok(piece)
    }

    fn act_place_piece(&mut self, sq: Square, piece: Piece, actions: &mut Vec<Action>) {
        let replaced = self.board_place(sq, piece.clone());
        actions.push(Action::PlacePiece {
            sq,
            piece,
            replaced,
        });
    }

    /// Detach the moving unit from `sq`: the whole occupant for ordinary
    /// moves, a single member of the stack for deploy steps.
    fn act_detach(
        &mut self,
        sq: Square,
        kind: PieceKind,
        whole: bool,
        actions: &mut Vec<Action>,
    ) -> Result<Piece, StateError> {
        let original = self.board_remove(sq).ok_or_else(|| StateError::MissingPiece {
            square: sq.to_string(),
        })?;
        let (removed, remainder) = if whole {
            (original.clone(), None)
        } else {
            match remove_from(&original, kind) {
                Some(pair) => pair,
                None => {
                    // roll the take back before erroring out
                    self.board_place(sq, original);
                    return Err(StateError::BadStack {
                        square: sq.to_string(),
                        detail: format!("cannot detach {kind}"),
                    });
                }
            }
        };
        if let Some(rest) = remainder {
            self.board_place(sq, rest);
        }
        actions.push(Action::RemoveFromStack {
            sq,
            removed: removed.clone(),
            original,
        });
        Ok(removed)
    }

    /// Grant heroic status to every piece of the mover now attacking the
    /// enemy commander. All qualifying attackers promote on the same move.
    fn act_promote_attackers(&mut self, mover: Color, actions: &mut Vec<Action>) {
        let mut promoted = Vec::new();
        if let Some(target) = self.commander(mover.opponent()) {
            for (sq, kind) in self.attackers(target, mover) {
                let already = self
                    .get_kind(sq, kind)
                    .is_some_and(|p| p.heroic);
                if !already && self.board_set_heroic(sq, kind, true).is_some() {
                    promoted.push((sq, kind));
                }
            }
        }
        actions.push(Action::PromoteAttackers { promoted });
    }

    /// Advance the clocks, flip the turn, and bump the repetition count.
    pub(crate) fn act_state_update(
        &mut self,
        flip_turn: bool,
        capture: bool,
        actions: &mut Vec<Action>,
    ) {
        let prev_half_moves = self.half_moves;
        let prev_move_number = self.move_number;
        self.half_moves = if capture { 0 } else { self.half_moves + 1 };
        if flip_turn {
            if self.turn == Color::Blue {
                self.move_number += 1;
            }
            self.turn = self.turn.opponent();
        }
        let key = self.position_key();
        let prev_count = self.position_counts.get(&key);
        self.position_counts.increment(&key);
        actions.push(Action::StateUpdate {
            flip_turn,
            prev_half_moves,
            prev_move_number,
            key,
            prev_count,
        });
    }

    // =========================================================================
    // Command assembly
    // =========================================================================

    /// Execute the board effects of one move plus heroic promotion, without
    /// touching turn or clocks. If any action fails the executed prefix is
    /// rolled back; a rollback that does not restore the position exactly
    /// is a corruption and surfaces as such.
    pub(crate) fn execute_step(&mut self, mv: Move) -> Result<Command, StateError> {
        let before = self.position_key();
        let mut actions = Vec::new();
        match self.execute_step_actions(mv, &mut actions) {
            Ok(()) => Ok(Command {
                san: String::new(),
                moves: vec![mv],
                actions,
            }),
            Err(err) => {
                for action in actions.into_iter().rev() {
                    self.undo_action(action);
                }
                if self.position_key() != before {
                    return Err(StateError::UndoMismatch {
                        detail: format!("rollback of {mv} left a different position"),
                    });
                }
                Err(err)
            }
        }
    }

    fn execute_step_actions(
        &mut self,
        mv: Move,
        actions: &mut Vec<Action>,
    ) -> Result<(), StateError> {
        use super::types::MoveKind::*;
        let whole = !mv.deploy;
        match mv.kind {
            Normal => {
                let moving = self.act_detach(mv.from, mv.piece, whole, actions)?;
                self.act_place_piece(mv.to, moving, actions);
            }
            Capture => {
                let moving = self.act_detach(mv.from, mv.piece, whole, actions)?;
                self.act_remove_piece(mv.to, actions)?;
                self.act_place_piece(mv.to, moving, actions);
            }
            StayCapture => {
                self.act_remove_piece(mv.to, actions)?;
            }
            SuicideCapture => {
                self.act_detach(mv.from, mv.piece, whole, actions)?;
                self.act_remove_piece(mv.to, actions)?;
            }
            Combination => {
                let moving = self.act_detach(mv.from, mv.piece, whole, actions)?;
                let target = self.get(mv.to).cloned().ok_or_else(|| StateError::MissingPiece {
                    square: mv.to.to_string(),
                })?;
                let merged = combine(&[moving, target]).ok_or_else(|| StateError::BadStack {
                    square: mv.to.to_string(),
                    detail: "combination does not form a stack".to_string(),
                })?;
                self.act_place_piece(mv.to, merged, actions);
            }
        }
        self.act_promote_attackers(self.turn, actions);
        Ok(())
    }

    /// Execute a complete non-deploy turn: board effects, promotion, then
    /// the state update that flips the turn.
    pub(crate) fn execute_turn(&mut self, mv: Move) -> Result<Command, StateError> {
        let mut cmd = self.execute_step(mv)?;
        self.act_state_update(true, mv.is_capture(), &mut cmd.actions);
        Ok(cmd)
    }

    /// Undo one command by replaying its actions in reverse.
    pub(crate) fn undo_command(&mut self, cmd: Command) {
        for action in cmd.actions.into_iter().rev() {
            self.undo_action(action);
        }
    }

    fn undo_action(&mut self, action: Action) {
        match action {
            Action::RemovePiece { sq, piece } => {
                self.board_place(sq, piece);
            }
            Action::PlacePiece { sq, replaced, .. } => {
                self.board_remove(sq);
                if let Some(prior) = replaced {
                    self.board_place(sq, prior);
                }
            }
            Action::RemoveFromStack { sq, original, .. } => {
                self.board_remove(sq);
                self.board_place(sq, original);
            }
            Action::PromoteAttackers { promoted } => {
                for (sq, kind) in promoted {
                    self.board_set_heroic(sq, kind, false);
                }
            }
            Action::StateUpdate {
                flip_turn,
                prev_half_moves,
                prev_move_number,
                key,
                prev_count,
            } => {
                self.position_counts.set(&key, prev_count);
                if flip_turn {
                    self.turn = self.turn.opponent();
                }
                self.half_moves = prev_half_moves;
                self.move_number = prev_move_number;
            }
        }
    }

    // =========================================================================
    // Public application and undo
    // =========================================================================

    /// Apply a move that must exactly match one returned by `moves`.
    /// Returns false and leaves the state untouched otherwise.
    pub fn make_move(&mut self, mv: Move) -> bool {
        let legal = self.moves(&super::types::MoveQuery {
            square: Some(mv.from),
            kind: Some(mv.piece),
        });
        if !legal.contains(&mv) {
            return false;
        }
        self.apply_legal_move(mv).is_ok()
    }

    /// Resolve a structured request against the legal moves and apply the
    /// unique match.
    pub fn make_move_request(
        &mut self,
        req: &super::types::MoveRequest,
    ) -> Result<Move, super::error::MoveParseError> {
        use super::error::MoveParseError;
        let legal = self.legal_moves();
        let matches: Vec<Move> = legal.iter().copied().filter(|m| req.matches(m)).collect();
        match matches.len() {
            0 => Err(MoveParseError::IllegalMove {
                notation: format!("{req:?}"),
            }),
            1 => {
                let mv = matches[0];
                self.apply_legal_move(mv)
                    .expect("resolved legal move must apply");
                Ok(mv)
            }
            _ => Err(MoveParseError::AmbiguousMove {
                notation: format!("{req:?}"),
                candidates: matches.iter().map(|&m| self.move_to_san(m)).collect(),
            }),
        }
    }

    /// Route an already-validated move: deploy steps feed the session,
    /// a stack-square departure commits it, everything else is an ordinary
    /// turn.
    pub(crate) fn apply_legal_move(&mut self, mv: Move) -> Result<(), StateError> {
        let san = self.move_to_san(mv);
        if mv.deploy {
            return self.apply_deploy_step(mv, san);
        }
        if self
            .active_deploy
            .as_ref()
            .is_some_and(|s| s.stack_square() == mv.from)
        {
            // the carrier leaves last: one more session command, then commit
            let mut cmd = self.execute_step(mv)?;
            cmd.san = san;
            self.active_deploy
                .as_mut()
                .expect("session checked above")
                .push(cmd);
            self.move_cache.clear();
            self.commit_deploy(true);
            return Ok(());
        }
        let mut cmd = self.execute_turn(mv)?;
        cmd.san = san;
        #[cfg(feature = "logging")]
        log::debug!("applied {}", cmd.san);
        self.history.push(cmd);
        self.move_cache.clear();
        Ok(())
    }

    /// Undo the last deploy step of an active session, or the last
    /// committed command otherwise. Returns false with nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.active_deploy.is_some() {
            let popped = self
                .active_deploy
                .as_mut()
                .expect("session checked above")
                .pop();
            return match popped {
                Some(cmd) => {
                    self.undo_command(cmd);
                    if self
                        .active_deploy
                        .as_ref()
                        .is_some_and(|s| s.commands().is_empty())
                    {
                        self.active_deploy = None;
                    }
                    self.move_cache.clear();
                    true
                }
                None => {
                    self.active_deploy = None;
                    false
                }
            };
        }
        match self.history.pop() {
            Some(cmd) => {
                self.undo_command(cmd);
                self.move_cache.clear();
                true
            }
            None => false,
        }
    }
}
