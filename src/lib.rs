// Crate root - export modules
pub mod game;
