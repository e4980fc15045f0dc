//! Deploy sessions: a multi-piece deployment from one stack within a
//! single turn, built up step by step and committed as one command.

use super::error::MoveParseError;
use super::make_unmake::Command;
use super::stack::flatten;
use super::state::Game;
use super::types::{Color, Move, MoveKind, MoveQuery, Piece, PieceKind, Square};

/// An in-progress deployment. Holds a deep snapshot of the stack as it
/// stood when the session opened, plus every executed step.
#[derive(Clone, Debug)]
pub struct DeploySession {
    stack_square: Square,
    turn: Color,
    original_piece: Piece,
    start_fen: String,
    commands: Vec<Command>,
}

impl DeploySession {
    /// The square the deployment originates from.
    #[must_use]
    pub fn stack_square(&self) -> Square {
        self.stack_square
    }

    /// The side running the deployment.
    #[must_use]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The stack as it stood before the first step.
    #[must_use]
    pub fn original_piece(&self) -> &Piece {
        &self.original_piece
    }

    /// The position (six FEN tokens) the session started from.
    #[must_use]
    pub fn start_fen(&self) -> &str {
        &self.start_fen
    }

    /// The executed steps.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Kinds of the original stack not yet consumed by an executed step.
    #[must_use]
    pub fn remaining(&self) -> Vec<PieceKind> {
        let mut kinds: Vec<PieceKind> =
            flatten(&self.original_piece).iter().map(|p| p.kind).collect();
        for cmd in &self.commands {
            for mv in &cmd.moves {
                if let Some(pos) = kinds.iter().position(|&k| k == mv.piece) {
                    kinds.remove(pos);
                }
            }
        }
        kinds
    }

    pub(crate) fn push(&mut self, cmd: Command) {
        self.commands.push(cmd);
    }

    pub(crate) fn pop(&mut self) -> Option<Command> {
        self.commands.pop()
    }
}

/// One step of a structured deploy request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeployStep {
    pub piece: PieceKind,
    pub to: Square,
}

/// A whole deploy turn requested at once: each listed piece moves from
/// `from`, anything in `stay` (and anything unlisted) remains behind.
#[derive(Clone, Debug, Default)]
pub struct DeployRequest {
    pub from: Option<Square>,
    pub moves: Vec<DeployStep>,
    pub stay: Vec<PieceKind>,
}

impl Game {
    /// The active deploy session, if any.
    #[must_use]
    pub fn active_deploy(&self) -> Option<&DeploySession> {
        self.active_deploy.as_ref()
    }

    /// Apply one deploy step, opening a session on the first step of the
    /// turn. Commits automatically when nothing remains on the stack
    /// square.
    pub(crate) fn apply_deploy_step(
        &mut self,
        mv: Move,
        san: String,
    ) -> Result<(), super::error::StateError> {
        if self.active_deploy.is_none() {
            let original = self.get(mv.from).cloned().ok_or_else(|| {
                super::error::StateError::MissingPiece {
                    square: mv.from.to_string(),
                }
            })?;
            let start_fen = self.fen();
            self.active_deploy = Some(DeploySession {
                stack_square: mv.from,
                turn: self.turn,
                original_piece: original,
                start_fen,
                commands: Vec::new(),
            });
        }
        let mut cmd = self.execute_step(mv)?;
        cmd.san = san;
        self.active_deploy
            .as_mut()
            .expect("session opened above")
            .push(cmd);
        self.move_cache.clear();
        let stack_square = self
            .active_deploy
            .as_ref()
            .expect("session opened above")
            .stack_square;
        if self.get(stack_square).is_none() {
            self.commit_deploy(true);
        }
        Ok(())
    }

    /// Close the active session: its steps collapse into one compound
    /// history command and, unless told otherwise, the turn passes.
    /// Returns false without an active session.
    pub fn commit_deploy(&mut self, switch_turn: bool) -> bool {
        let Some(session) = self.active_deploy.take() else {
            return false;
        };
        let capture = session
            .commands
            .iter()
            .flat_map(|c| c.moves.iter())
            .any(|m| m.is_capture());
        let san = self.deploy_sequence_san(&session);
        let mut moves = Vec::new();
        let mut actions = Vec::new();
        for cmd in session.commands {
            moves.extend(cmd.moves);
            actions.extend(cmd.actions);
        }
        self.act_state_update(switch_turn, capture, &mut actions);
        #[cfg(feature = "logging")]
        log::debug!("deploy committed: {san}");
        self.history.push(Command { san, moves, actions });
        self.move_cache.clear();
        true
    }

    /// Abort the active session, undoing every executed step. Returns
    /// false without an active session.
    pub fn cancel_deploy(&mut self) -> bool {
        let Some(mut session) = self.active_deploy.take() else {
            return false;
        };
        while let Some(cmd) = session.commands.pop() {
            self.undo_command(cmd);
        }
        #[cfg(feature = "logging")]
        log::debug!("deploy cancelled at {}", session.stack_square);
        self.move_cache.clear();
        true
    }

    /// Canonical notation of a whole deploy turn: optional stay prefix,
    /// then the step notations comma-joined.
    fn deploy_sequence_san(&self, session: &DeploySession) -> String {
        let steps: Vec<&str> = session.commands.iter().map(|c| c.san.as_str()).collect();
        let stay: String = self
            .get(session.stack_square)
            .map(|p| {
                flatten(p)
                    .iter()
                    .map(|s| s.kind.to_san_char())
                    .collect()
            })
            .unwrap_or_default();
        if stay.is_empty() {
            steps.join(",")
        } else {
            format!("{}<{}", stay, steps.join(","))
        }
    }

    /// Run a whole deploy turn from a structured request, committing at
    /// the end. Any step that fails cancels the session and leaves the
    /// position as it was.
    pub fn deploy_move(&mut self, req: &DeployRequest) -> Result<Vec<Move>, MoveParseError> {
        let from = match (req.from, self.active_deploy.as_ref()) {
            (Some(sq), Some(session)) if session.stack_square != sq => {
                return Err(MoveParseError::IllegalMove {
                    notation: format!("deploy from {sq}"),
                })
            }
            (Some(sq), _) => sq,
            (None, Some(session)) => session.stack_square,
            (None, None) => return Err(MoveParseError::NoDeploySession),
        };
        let mut applied = Vec::new();
        for step in &req.moves {
            let query = MoveQuery {
                square: Some(from),
                kind: Some(step.piece),
            };
            let candidates: Vec<Move> = self
                .moves(&query)
                .iter()
                .filter(|m| m.deploy && m.to == step.to)
                .copied()
                .collect();
            let chosen = pick_deploy_candidate(&candidates);
            let Some(mv) = chosen else {
                self.cancel_deploy();
                return Err(MoveParseError::IllegalMove {
                    notation: format!("{}>{}", step.piece.to_san_char(), step.to),
                });
            };
            if self.apply_legal_move(mv).is_err() {
                self.cancel_deploy();
                return Err(MoveParseError::IllegalMove {
                    notation: format!("{}>{}", step.piece.to_san_char(), step.to),
                });
            }
            applied.push(mv);
        }
        if self.active_deploy.is_some() {
            self.commit_deploy(true);
        }
        Ok(applied)
    }
}

/// Among the legal deploy candidates to one square, prefer a relocating
/// move over a stay-capture; the request format cannot say "stay".
fn pick_deploy_candidate(candidates: &[Move]) -> Option<Move> {
    candidates
        .iter()
        .find(|m| m.kind != MoveKind::StayCapture)
        .or_else(|| candidates.first())
        .copied()
}
