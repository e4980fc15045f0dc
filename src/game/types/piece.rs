//! Piece and color types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The two armies. Red moves first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    Red,
    Blue,
}

impl Color {
    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
        }
    }

    /// Returns the opposite color.
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }

    /// Parse a color from its FEN letter (`r` or `b`).
    #[must_use]
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'r' => Some(Color::Red),
            'b' => Some(Color::Blue),
            _ => None,
        }
    }

    /// The FEN letter for this color.
    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Color::Red => 'r',
            Color::Blue => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Blue => write!(f, "Blue"),
        }
    }
}

/// The eleven piece kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    Commander,
    Infantry,
    Tank,
    Militia,
    Engineer,
    Artillery,
    AntiAir,
    Missile,
    AirForce,
    Navy,
    Headquarter,
}

/// All piece kinds, in FEN-letter documentation order.
pub const PIECE_KINDS: [PieceKind; 11] = [
    PieceKind::Commander,
    PieceKind::Infantry,
    PieceKind::Tank,
    PieceKind::Militia,
    PieceKind::Engineer,
    PieceKind::Artillery,
    PieceKind::AntiAir,
    PieceKind::Missile,
    PieceKind::AirForce,
    PieceKind::Navy,
    PieceKind::Headquarter,
];

impl PieceKind {
    /// Parse a piece kind from its letter (case-insensitive).
    #[must_use]
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'c' => Some(PieceKind::Commander),
            'i' => Some(PieceKind::Infantry),
            't' => Some(PieceKind::Tank),
            'm' => Some(PieceKind::Militia),
            'e' => Some(PieceKind::Engineer),
            'a' => Some(PieceKind::Artillery),
            'g' => Some(PieceKind::AntiAir),
            's' => Some(PieceKind::Missile),
            'f' => Some(PieceKind::AirForce),
            'n' => Some(PieceKind::Navy),
            'h' => Some(PieceKind::Headquarter),
            _ => None,
        }
    }

    /// Convert the kind to its lowercase letter.
    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Commander => 'c',
            PieceKind::Infantry => 'i',
            PieceKind::Tank => 't',
            PieceKind::Militia => 'm',
            PieceKind::Engineer => 'e',
            PieceKind::Artillery => 'a',
            PieceKind::AntiAir => 'g',
            PieceKind::Missile => 's',
            PieceKind::AirForce => 'f',
            PieceKind::Navy => 'n',
            PieceKind::Headquarter => 'h',
        }
    }

    /// Convert the kind to a letter with case based on color (uppercase for Red).
    #[inline]
    #[must_use]
    pub fn to_fen_char(self, color: Color) -> char {
        let c = self.to_char();
        if color == Color::Red {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    /// The uppercase letter used for this kind in move notation.
    #[inline]
    #[must_use]
    pub fn to_san_char(self) -> char {
        self.to_char().to_ascii_uppercase()
    }

    /// Heavy pieces need a bridge to cross the river.
    #[inline]
    #[must_use]
    pub const fn is_heavy(self) -> bool {
        matches!(
            self,
            PieceKind::Artillery | PieceKind::AntiAir | PieceKind::Missile
        )
    }

    /// Base air-defense level contributed by this kind, or 0 when it does
    /// not contribute.
    #[inline]
    #[must_use]
    pub const fn air_defense_level(self) -> u8 {
        match self {
            PieceKind::Missile => 2,
            PieceKind::Navy | PieceKind::AntiAir => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Commander => "Commander",
            PieceKind::Infantry => "Infantry",
            PieceKind::Tank => "Tank",
            PieceKind::Militia => "Militia",
            PieceKind::Engineer => "Engineer",
            PieceKind::Artillery => "Artillery",
            PieceKind::AntiAir => "AntiAir",
            PieceKind::Missile => "Missile",
            PieceKind::AirForce => "AirForce",
            PieceKind::Navy => "Navy",
            PieceKind::Headquarter => "Headquarter",
        };
        write!(f, "{name}")
    }
}

/// A piece on the board: a single unit, or a carrier with carried pieces.
///
/// Carried pieces always have an empty `carried` list themselves; stacks are
/// one level deep. All pieces of a stack share one color.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub heroic: bool,
    pub carried: Vec<Piece>,
}

impl Piece {
    /// Create a plain, non-heroic single piece.
    #[must_use]
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            heroic: false,
            carried: Vec::new(),
        }
    }

    /// Create a heroic single piece.
    #[must_use]
    pub fn heroic(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            heroic: true,
            carried: Vec::new(),
        }
    }

    /// Whether this piece carries others.
    #[inline]
    #[must_use]
    pub fn is_stack(&self) -> bool {
        !self.carried.is_empty()
    }

    /// This piece stripped of everything it carries.
    #[must_use]
    pub fn without_carried(&self) -> Piece {
        Piece {
            kind: self.kind,
            color: self.color,
            heroic: self.heroic,
            carried: Vec::new(),
        }
    }

    /// Whether the carrier or any carried piece is of the given kind.
    #[must_use]
    pub fn contains_kind(&self, kind: PieceKind) -> bool {
        self.kind == kind || self.carried.iter().any(|p| p.kind == kind)
    }

    /// The carrier if it is of `kind`, else the carried piece of `kind`.
    #[must_use]
    pub fn find_kind(&self, kind: PieceKind) -> Option<&Piece> {
        if self.kind == kind {
            Some(self)
        } else {
            self.carried.iter().find(|p| p.kind == kind)
        }
    }

    /// Whether the stack contributes to its color's air defense.
    #[must_use]
    pub(crate) fn has_air_defense(&self) -> bool {
        self.kind.air_defense_level() > 0
            || self.carried.iter().any(|p| p.kind.air_defense_level() > 0)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.heroic {
            write!(f, "+")?;
        }
        write!(f, "{}", self.kind.to_fen_char(self.color))?;
        for p in &self.carried {
            if p.heroic {
                write!(f, "+")?;
            }
            write!(f, "{}", p.kind.to_fen_char(p.color))?;
        }
        Ok(())
    }
}
