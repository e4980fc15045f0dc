//! Game module tests.
//!
//! Tests are organized into separate files by category:
//! - `fen.rs` - FEN serialization round-trips
//! - `san.rs` - Move notation building and parsing
//! - `movegen.rs` - Move generation rules
//! - `deploy.rs` - Deploy sessions
//! - `make_unmake.rs` - Apply/undo correctness
//! - `draw.rs` - Draw and game-end detection
//! - `scenarios.rs` - Literal rule scenarios
//! - `proptest.rs` - Property-based tests

mod deploy;
mod fen;

use crate::game::types::Square;

pub(crate) fn sq(s: &str) -> Square {
    s.parse().unwrap()
}
