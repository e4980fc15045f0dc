//! Error types for engine operations.

use std::fmt;

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few tokens (needs at least the position and turn)
    TooFewTokens { found: usize },
    /// Wrong number of rank rows (must be 12)
    BadRankCount { found: usize },
    /// Invalid piece character in position string
    InvalidPiece { char: char },
    /// Invalid side to move (must be 'r' or 'b')
    InvalidSideToMove { found: String },
    /// A rank row covers the wrong number of files
    BadRankWidth { rank: String, files: usize },
    /// A parenthesized stack is malformed or not a recognized composition
    InvalidStack { text: String },
    /// More than one commander of a color
    DuplicateCommander { color: String },
    /// A piece stands on terrain it cannot occupy
    BadTerrain { square: String },
    /// Invalid half-move clock or move number token
    InvalidClock { found: String },
    /// Malformed deploy-session suffix
    InvalidDeploySuffix { found: String },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewTokens { found } => {
                write!(f, "FEN must have at least 2 tokens, found {found}")
            }
            FenError::BadRankCount { found } => {
                write!(f, "FEN must have 12 rank rows, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'r' or 'b'")
            }
            FenError::BadRankWidth { rank, files } => {
                write!(f, "Rank row '{rank}' covers {files} files, expected 11")
            }
            FenError::InvalidStack { text } => {
                write!(f, "Invalid stack '{text}' in FEN")
            }
            FenError::DuplicateCommander { color } => {
                write!(f, "More than one {color} commander in FEN")
            }
            FenError::BadTerrain { square } => {
                write!(f, "Piece on incompatible terrain at {square}")
            }
            FenError::InvalidClock { found } => {
                write!(f, "Invalid clock token '{found}' in FEN")
            }
            FenError::InvalidDeploySuffix { found } => {
                write!(f, "Invalid deploy suffix '{found}' in FEN")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for structured move-request failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Invalid square notation in move
    InvalidSquare { notation: String },
    /// Move is not legal in the current position
    IllegalMove { notation: String },
    /// Several legal moves satisfy the request's constraints
    AmbiguousMove { notation: String, candidates: Vec<String> },
    /// No deploy session applies to the request
    NoDeploySession,
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "Invalid square notation in '{notation}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "Illegal move '{notation}'")
            }
            MoveParseError::AmbiguousMove { notation, candidates } => {
                write!(
                    f,
                    "Ambiguous move '{notation}' (candidates: {})",
                    candidates.join(", ")
                )
            }
            MoveParseError::NoDeploySession => {
                write!(f, "No active deploy session")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Rank out of bounds (must be 1-12)
    RankOutOfBounds { rank: usize },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "Rank {rank} out of bounds (must be 1-12)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// Error type for move-notation parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanError {
    /// Empty notation string
    Empty,
    /// Invalid piece character
    InvalidPiece { char: char },
    /// Invalid square in notation
    InvalidSquare { notation: String },
    /// Several legal moves match; candidates listed in canonical notation
    AmbiguousMove { san: String, candidates: Vec<String> },
    /// No matching legal move found
    NoMatchingMove { san: String },
}

impl fmt::Display for SanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanError::Empty => write!(f, "Empty move notation"),
            SanError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in notation")
            }
            SanError::InvalidSquare { notation } => {
                write!(f, "Invalid square in notation '{notation}'")
            }
            SanError::AmbiguousMove { san, candidates } => {
                write!(f, "Ambiguous move '{san}' (candidates: {})", candidates.join(", "))
            }
            SanError::NoMatchingMove { san } => {
                write!(f, "No legal move matches '{san}'")
            }
        }
    }
}

impl std::error::Error for SanError {}

/// Internal-invariant violations. Surfacing one of these means the engine
/// state was corrupted by a bug, not by bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A square expected to hold a piece is empty
    MissingPiece { square: String },
    /// A stack operation produced an impossible composition
    BadStack { square: String, detail: String },
    /// An undo could not restore a prior snapshot
    UndoMismatch { detail: String },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::MissingPiece { square } => {
                write!(f, "Expected a piece at {square}")
            }
            StateError::BadStack { square, detail } => {
                write!(f, "Bad stack at {square}: {detail}")
            }
            StateError::UndoMismatch { detail } => {
                write!(f, "Undo mismatch: {detail}")
            }
        }
    }
}

impl std::error::Error for StateError {}
