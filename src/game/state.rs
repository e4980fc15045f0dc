//! Game state: board array, commander tracking, clocks, and repetition.

use std::collections::HashMap;

use super::air_defense::AirDefenseIndex;
use super::cache::MoveCache;
use super::deploy::DeploySession;
use super::make_unmake::Command;
use super::stack::{combine, is_valid_stack};
use super::terrain::can_stand;
use super::types::{Color, Piece, PieceKind, Square, BOARD_SIZE, FILE_COUNT, RANK_COUNT};

#[derive(Clone, Debug, Default)]
pub(crate) struct RepetitionTable {
    counts: HashMap<String, u32>,
}

impl RepetitionTable {
    pub(crate) fn new() -> Self {
        RepetitionTable {
            counts: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, key: &str, count: u32) {
        if count == 0 {
            self.counts.remove(key);
        } else {
            self.counts.insert(key.to_string(), count);
        }
    }

    pub(crate) fn increment(&mut self, key: &str) -> u32 {
        let next = self.get(key).saturating_add(1);
        self.set(key, next);
        next
    }

    pub(crate) fn clear(&mut self) {
        self.counts.clear();
    }
}

/// A full game position with its move history.
///
/// The state owns everything: board, clocks, repetition counts, the
/// air-defense index, and an optional in-progress deploy session. Cloning a
/// `Game` clones all of it, which is the supported way to explore lines
/// without disturbing the original.
#[derive(Clone, Debug)]
pub struct Game {
    pub(crate) board: [Option<Piece>; BOARD_SIZE],
    pub(crate) commanders: [Option<Square>; 2],
    pub(crate) turn: Color,
    pub(crate) half_moves: u32,
    pub(crate) move_number: u32,
    pub(crate) history: Vec<Command>,
    pub(crate) position_counts: RepetitionTable,
    pub(crate) air_defense: AirDefenseIndex,
    pub(crate) active_deploy: Option<DeploySession>,
    pub(crate) move_cache: MoveCache,
}

impl Game {
    /// A game set up at the default starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut game = Game::empty();
        game.load(super::fen::DEFAULT_POSITION)
            .expect("default position must parse");
        game
    }

    /// A game with an empty board, Red to move.
    #[must_use]
    pub fn empty() -> Self {
        Game {
            board: std::array::from_fn(|_| None),
            commanders: [None, None],
            turn: Color::Red,
            half_moves: 0,
            move_number: 1,
            history: Vec::new(),
            position_counts: RepetitionTable::new(),
            air_defense: AirDefenseIndex::new(),
            active_deploy: None,
            move_cache: MoveCache::new(),
        }
    }

    /// Reset to an empty board, discarding history and session state.
    pub fn clear(&mut self) {
        *self = Game::empty();
    }

    /// The side to move.
    #[inline]
    #[must_use]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The full-move number, starting at 1 and incremented after each Blue
    /// turn.
    #[inline]
    #[must_use]
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    /// Half-moves since the last capture.
    #[inline]
    #[must_use]
    pub fn half_moves(&self) -> u32 {
        self.half_moves
    }

    /// The square of a color's commander, `None` once captured.
    #[inline]
    #[must_use]
    pub fn commander(&self, color: Color) -> Option<Square> {
        self.commanders[color.index()]
    }

    /// The piece on a square.
    #[must_use]
    pub fn get(&self, sq: Square) -> Option<&Piece> {
        self.board[sq.as_index()].as_ref()
    }

    /// The piece of `kind` on a square: the carrier itself, or the carried
    /// piece of that kind inside the stack.
    #[must_use]
    pub fn get_kind(&self, sq: Square, kind: PieceKind) -> Option<&Piece> {
        self.get(sq).and_then(|p| p.find_kind(kind))
    }

    /// Place a piece, optionally merging with an existing same-color stack.
    ///
    /// Returns false when the piece cannot stand on the terrain, its stack
    /// is not a recognized composition, a second same-color commander would
    /// appear, or the requested merge fails.
    pub fn put(&mut self, piece: Piece, sq: Square, allow_combine: bool) -> bool {
        if !can_stand(piece.kind, sq) || !is_valid_stack(&piece) {
            return false;
        }
        let placed = match self.get(sq) {
            Some(existing) if allow_combine && existing.color == piece.color => {
                let mut parts = vec![existing.clone()];
                parts.push(piece);
                match combine(&parts) {
                    Some(merged) => merged,
                    None => return false,
                }
            }
            _ => piece,
        };
        if placed.contains_kind(PieceKind::Commander) {
            if let Some(existing) = self.commanders[placed.color.index()] {
                if existing != sq {
                    return false;
                }
            }
        }
        self.board_remove(sq);
        self.board_place(sq, placed);
        self.reseed_position_counts();
        self.move_cache.clear();
        true
    }

    /// Remove and return the piece on a square.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let removed = self.board_remove(sq);
        if removed.is_some() {
            self.reseed_position_counts();
            self.move_cache.clear();
        }
        removed
    }

    /// Set or clear the heroic flag of the piece of `kind` at `sq` (the
    /// carrier when `kind` is `None`). Returns false when no such piece
    /// exists.
    pub fn set_heroic(&mut self, sq: Square, kind: Option<PieceKind>, heroic: bool) -> bool {
        let Some(target) = kind.or_else(|| self.get(sq).map(|p| p.kind)) else {
            return false;
        };
        let changed = self.board_set_heroic(sq, target, heroic).is_some();
        if changed {
            self.move_cache.clear();
        }
        changed
    }

    /// The board as a 12x11 matrix of cells, top rank first.
    #[must_use]
    pub fn board(&self) -> Vec<Vec<Option<Piece>>> {
        (0..RANK_COUNT)
            .map(|rank| {
                (0..FILE_COUNT)
                    .map(|file| self.board[Square::new(rank, file).as_index()].clone())
                    .collect()
            })
            .collect()
    }

    /// The air-defense influence map of one color: covered square to the
    /// contributor squares covering it.
    #[must_use]
    pub fn air_defense_influence(&self, color: Color) -> &HashMap<Square, Vec<Square>> {
        self.air_defense.influence(color)
    }

    /// Whether the side to move is in check.
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.is_commander_attacked(self.turn)
    }

    /// Draw by the fifty-move rule or threefold repetition.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        if self.half_moves >= 100 {
            return true;
        }
        self.position_counts.get(&self.position_key()) >= 3
    }

    /// Whether the side to move is checkmated.
    #[must_use]
    pub fn is_checkmate(&mut self) -> bool {
        if !self.in_check() {
            return false;
        }
        self.legal_moves().is_empty()
    }

    /// Whether the game has ended: a commander has been captured, the side
    /// to move is checkmated, or the position is drawn.
    #[must_use]
    pub fn is_game_over(&mut self) -> bool {
        self.commanders.iter().any(Option::is_none) || self.is_draw() || self.is_checkmate()
    }

    /// The committed move history.
    #[must_use]
    pub fn history(&self) -> &[Command] {
        &self.history
    }

    /// Canonical notation of every committed move, in order.
    #[must_use]
    pub fn history_san(&self) -> Vec<String> {
        self.history.iter().map(|c| c.san.clone()).collect()
    }

    /// The repetition key: the position and side to move, without clocks or
    /// any deploy suffix.
    #[must_use]
    pub(crate) fn position_key(&self) -> String {
        format!("{} {}", self.position_rows(), self.turn.to_char())
    }

    pub(crate) fn reseed_position_counts(&mut self) {
        self.position_counts.clear();
        let key = self.position_key();
        self.position_counts.set(&key, 1);
    }

    // =========================================================================
    // Low-level board mutation. These keep the commander index and the
    // air-defense index in sync; everything above the move applier goes
    // through them.
    // =========================================================================

    pub(crate) fn board_place(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        let color = piece.color;
        let has_commander = piece.contains_kind(PieceKind::Commander);
        let has_ad = piece.has_air_defense();
        let replaced = self.board[sq.as_index()].replace(piece);
        if let Some(old) = &replaced {
            self.on_removed(old);
        }
        if has_commander {
            self.commanders[color.index()] = Some(sq);
        }
        if has_ad {
            self.air_defense.recompute(color, &self.board);
        }
        replaced
    }

    pub(crate) fn board_remove(&mut self, sq: Square) -> Option<Piece> {
        let removed = self.board[sq.as_index()].take();
        if let Some(piece) = &removed {
            self.on_removed(piece);
        }
        removed
    }

    fn on_removed(&mut self, piece: &Piece) {
        if piece.contains_kind(PieceKind::Commander) {
            self.commanders[piece.color.index()] = None;
        }
        if piece.has_air_defense() {
            self.air_defense.recompute(piece.color, &self.board);
        }
    }

    /// Flip the heroic flag of the piece of `kind` at `sq`. Returns the
    /// previous value, or `None` when no such piece is there.
    pub(crate) fn board_set_heroic(
        &mut self,
        sq: Square,
        kind: PieceKind,
        heroic: bool,
    ) -> Option<bool> {
        let piece = self.board[sq.as_index()].as_mut()?;
        let color = piece.color;
        let target = if piece.kind == kind {
            piece
        } else {
            piece.carried.iter_mut().find(|p| p.kind == kind)?
        };
        let was = target.heroic;
        target.heroic = heroic;
        if was != heroic && kind.air_defense_level() > 0 {
            self.air_defense.recompute(color, &self.board);
        }
        Some(was)
    }

    /// Rebuild the commander index and both air-defense maps from the board.
    pub(crate) fn refresh_indices(&mut self) {
        self.commanders = [None, None];
        for sq in Square::all() {
            if let Some(piece) = &self.board[sq.as_index()] {
                if piece.contains_kind(PieceKind::Commander) {
                    self.commanders[piece.color.index()] = Some(sq);
                }
            }
        }
        self.air_defense.recompute(Color::Red, &self.board);
        self.air_defense.recompute(Color::Blue, &self.board);
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
