//! The CoTuLenh rules engine.
//!
//! Covers the board and piece-stack model, move generation with the
//! legality filter, deploy sessions with incremental undo, air-defense
//! bookkeeping, check/checkmate/draw detection, and FEN/SAN notation.
//!
//! # Example
//! ```
//! use cotulenh_engine::game::Game;
//!
//! let mut game = Game::new();
//! let moves = game.legal_moves();
//! assert!(!moves.is_empty());
//! ```

mod air_defense;
mod attackers;
mod builder;
mod cache;
mod deploy;
mod error;
mod fen;
mod make_unmake;
mod movegen;
pub mod prelude;
mod san;
mod stack;
mod state;
mod terrain;
mod types;

#[cfg(test)]
mod tests;

// Public API - types users need
pub use builder::GameBuilder;
pub use deploy::{DeployRequest, DeploySession, DeployStep};
pub use error::{FenError, MoveParseError, SanError, SquareError, StateError};
pub use fen::DEFAULT_POSITION;
pub use make_unmake::Command;
pub use state::Game;
pub use types::{
    Color, Move, MoveKind, MoveList, MoveQuery, MoveRequest, Piece, PieceKind, Square,
    BOARD_SIZE, FILE_COUNT, PIECE_KINDS, RANK_COUNT,
};

// Public API - domain helpers
pub use air_defense::AirDefenseIndex;
pub use stack::{all_splits, combine, flatten, is_valid_stack, remove_from};
pub use terrain::{can_stand, heavy_crossing_blocked, land_ok, navy_ok};
