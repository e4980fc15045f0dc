//! Fluent builder for constructing positions piece by piece.
//!
//! # Example
//! ```
//! use cotulenh_engine::game::{Color, GameBuilder, Piece, PieceKind};
//!
//! let game = GameBuilder::new()
//!     .piece("e1".parse().unwrap(), Piece::new(PieceKind::Commander, Color::Red))
//!     .piece("e12".parse().unwrap(), Piece::new(PieceKind::Commander, Color::Blue))
//!     .turn(Color::Red)
//!     .build();
//! assert!(game.commander(Color::Red).is_some());
//! ```

use super::state::Game;
use super::types::{Color, Piece, Square};

/// A fluent builder for `Game` positions.
#[derive(Clone, Debug)]
pub struct GameBuilder {
    pieces: Vec<(Square, Piece)>,
    turn: Color,
    half_moves: u32,
    move_number: u32,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBuilder {
    /// Create a new empty builder, Red to move.
    #[must_use]
    pub fn new() -> Self {
        GameBuilder {
            pieces: Vec::new(),
            turn: Color::Red,
            half_moves: 0,
            move_number: 1,
        }
    }

    /// Place a piece, replacing anything previously put on the square.
    #[must_use]
    pub fn piece(mut self, square: Square, piece: Piece) -> Self {
        self.pieces.retain(|(sq, _)| *sq != square);
        self.pieces.push((square, piece));
        self
    }

    /// Remove a piece from a square.
    #[must_use]
    pub fn clear(mut self, square: Square) -> Self {
        self.pieces.retain(|(sq, _)| *sq != square);
        self
    }

    /// Set the side to move.
    #[must_use]
    pub const fn turn(mut self, color: Color) -> Self {
        self.turn = color;
        self
    }

    /// Set the half-move clock.
    #[must_use]
    pub const fn half_moves(mut self, clock: u32) -> Self {
        self.half_moves = clock;
        self
    }

    /// Set the full-move number.
    #[must_use]
    pub const fn move_number(mut self, number: u32) -> Self {
        self.move_number = number;
        self
    }

    /// Build the game.
    ///
    /// # Panics
    /// Panics when a piece cannot be placed (bad terrain, invalid stack,
    /// or duplicate commander); the builder is a test and setup tool and
    /// such a position is a setup mistake.
    #[must_use]
    pub fn build(self) -> Game {
        let mut game = Game::empty();
        for (square, piece) in self.pieces {
            let description = format!("{piece} at {square}");
            assert!(
                game.put(piece, square, false),
                "cannot place {description}"
            );
        }
        game.turn = self.turn;
        game.half_moves = self.half_moves;
        game.move_number = self.move_number;
        game.reseed_position_counts();
        game
    }
}
