//! Prelude module for convenient imports.
//!
//! # Example
//! ```
//! use cotulenh_engine::game::prelude::*;
//! ```

pub use super::{
    Color, Command, DeployRequest, DeployStep, FenError, Game, GameBuilder, Move, MoveKind,
    MoveList, MoveParseError, MoveQuery, MoveRequest, Piece, PieceKind, SanError, Square,
    SquareError, StateError, DEFAULT_POSITION,
};
