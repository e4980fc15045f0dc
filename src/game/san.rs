//! Move notation: canonical SAN building and two-phase parsing.
//!
//! A step reads `<Piece>[<disambig>]<sep><dest>[(stack)][^|#]` where the
//! separator is empty for plain moves, `x` capture, `_` stay-capture,
//! `@` suicide-capture, `&` combination, with a leading `>` on deploy
//! steps. LAN replaces the disambiguation with a `<from>:` prefix.

use super::error::SanError;
use super::stack::{combine, flatten};
use super::state::Game;
use super::types::{Move, MoveKind, MoveList, PieceKind, Square};

impl Game {
    /// Format a move in canonical notation, with `^`/`#` check suffixes.
    #[must_use]
    pub fn move_to_san(&mut self, mv: Move) -> String {
        let mut san = String::new();
        san.push(mv.piece.to_san_char());
        san.push_str(&self.disambiguation(mv));
        san.push_str(mv.separator());
        san.push_str(&mv.to.to_string());
        if mv.kind == MoveKind::Combination {
            san.push_str(&self.combination_suffix(mv));
        }
        san.push_str(self.check_suffix(mv));
        san
    }

    /// Long notation: the from-square in place of disambiguation.
    #[must_use]
    pub fn move_to_lan(&mut self, mv: Move) -> String {
        let mut lan = format!("{}:", mv.from);
        lan.push(mv.piece.to_san_char());
        lan.push_str(mv.separator());
        lan.push_str(&mv.to.to_string());
        if mv.kind == MoveKind::Combination {
            lan.push_str(&self.combination_suffix(mv));
        }
        lan
    }

    /// File and/or rank of the origin, when other legal moves of the same
    /// kind reach the same destination.
    fn disambiguation(&mut self, mv: Move) -> String {
        let legal = self.legal_moves();
        let rivals: Vec<Move> = legal
            .iter()
            .filter(|m| {
                m.piece == mv.piece
                    && m.to == mv.to
                    && m.kind == mv.kind
                    && m.deploy == mv.deploy
                    && m.from != mv.from
            })
            .copied()
            .collect();
        if rivals.is_empty() {
            return String::new();
        }
        let same_file = rivals.iter().any(|m| m.from.file() == mv.from.file());
        let same_rank = rivals
            .iter()
            .any(|m| m.from.display_rank() == mv.from.display_rank());
        let mut out = String::new();
        match (same_file, same_rank) {
            (false, _) => out.push((b'a' + mv.from.file() as u8) as char),
            (true, false) => out.push_str(&mv.from.display_rank().to_string()),
            (true, true) => {
                out.push((b'a' + mv.from.file() as u8) as char);
                out.push_str(&mv.from.display_rank().to_string());
            }
        }
        out
    }

    /// The resulting stack composition, written as uppercase kind letters
    /// with the carrier first.
    fn combination_suffix(&self, mv: Move) -> String {
        let Some(target) = self.get(mv.to) else {
            return String::new();
        };
        let Some(origin) = self.get(mv.from) else {
            return String::new();
        };
        let moving = if mv.deploy {
            match origin.find_kind(mv.piece) {
                Some(found) => found.without_carried(),
                None => return String::new(),
            }
        } else {
            origin.clone()
        };
        let Some(merged) = combine(&[moving, target.clone()]) else {
            return String::new();
        };
        let letters: String = flatten(&merged).iter().map(|p| p.kind.to_san_char()).collect();
        format!("({letters})")
    }

    /// `^` when the move checks the enemy commander, `#` when it mates.
    /// Mid-session deploy steps never claim mate (the opponent is not to
    /// move yet).
    fn check_suffix(&self, mv: Move) -> &'static str {
        let mut probe = self.clone();
        let them = probe.turn.opponent();
        let applied = if mv.deploy {
            probe.execute_step(mv).map(|_| ())
        } else {
            probe.execute_turn(mv).map(|_| ())
        };
        if applied.is_err() || !probe.is_commander_attacked(them) {
            return "";
        }
        if mv.deploy {
            return "^";
        }
        probe.active_deploy = None;
        if probe.is_checkmate() {
            "#"
        } else {
            "^"
        }
    }

    /// Parse a move: strict match against canonical SAN/LAN of the legal
    /// moves first, then a permissive pass over the components.
    pub fn parse_san(&mut self, input: &str) -> Result<Move, SanError> {
        let san = input.trim();
        if san.is_empty() {
            return Err(SanError::Empty);
        }
        let bare = san.trim_end_matches(['^', '#']);
        let legal = self.legal_moves();
        for &mv in &legal {
            let canonical = self.move_to_san(mv);
            if canonical == san || canonical.trim_end_matches(['^', '#']) == bare {
                return Ok(mv);
            }
            let lan = self.move_to_lan(mv);
            if lan == san || lan == bare {
                return Ok(mv);
            }
        }
        self.parse_permissive(bare, &legal, san)
    }

    /// Parse a move and apply it in one call.
    pub fn make_move_san(&mut self, input: &str) -> Result<Move, SanError> {
        let mv = self.parse_san(input)?;
        self.apply_legal_move(mv)
            .expect("parsed legal move must apply");
        Ok(mv)
    }

    fn parse_permissive(
        &mut self,
        bare: &str,
        legal: &MoveList,
        original: &str,
    ) -> Result<Move, SanError> {
        let invalid_square = || SanError::InvalidSquare {
            notation: original.to_string(),
        };
        // drop any trailing stack suffix
        let core = match bare.find('(') {
            Some(i) => &bare[..i],
            None => bare,
        };
        let chars: Vec<char> = core.chars().collect();

        // destination: trailing file letter plus 1-2 rank digits
        let mut i = chars.len();
        let mut digits = 0;
        while i > 0 && chars[i - 1].is_ascii_digit() {
            i -= 1;
            digits += 1;
        }
        if digits == 0 || digits > 2 || i == 0 {
            return Err(invalid_square());
        }
        let file_char = chars[i - 1];
        if !('a'..='k').contains(&file_char) {
            return Err(invalid_square());
        }
        let dest: String = chars[i - 1..].iter().collect();
        let to: Square = dest.parse().map_err(|_| invalid_square())?;
        let prefix = &chars[..i - 1];

        let mut piece: Option<PieceKind> = None;
        let mut from_file: Option<usize> = None;
        let mut from_rank: Option<usize> = None;
        let mut deploy: Option<bool> = None;
        let mut move_kind: Option<MoveKind> = None;
        for &c in prefix {
            match c {
                '>' => deploy = Some(true),
                'x' => move_kind = Some(MoveKind::Capture),
                '_' => move_kind = Some(MoveKind::StayCapture),
                '@' => move_kind = Some(MoveKind::SuicideCapture),
                '&' => move_kind = Some(MoveKind::Combination),
                ':' | '-' => {}
                c if c.is_ascii_uppercase() && piece.is_none() => {
                    piece = Some(
                        PieceKind::from_char(c).ok_or(SanError::InvalidPiece { char: c })?,
                    );
                }
                c if ('a'..='k').contains(&c) => {
                    from_file = Some(c as usize - 'a' as usize);
                    from_rank = None;
                }
                c if c.is_ascii_digit() => {
                    let digit = c as usize - '0' as usize;
                    from_rank = Some(from_rank.unwrap_or(0) * 10 + digit);
                }
                _ => return Err(invalid_square()),
            }
        }

        let matches: Vec<Move> = legal
            .iter()
            .filter(|m| {
                m.to == to
                    && piece.map_or(true, |p| m.piece == p)
                    && deploy.map_or(true, |d| m.deploy == d)
                    && move_kind.map_or(true, |k| m.kind == k)
                    && from_file.map_or(true, |f| m.from.file() == f)
                    && from_rank.map_or(true, |r| m.from.display_rank() == r)
            })
            .copied()
            .collect();

        match matches.len() {
            0 => Err(SanError::NoMatchingMove {
                san: original.to_string(),
            }),
            1 => Ok(matches[0]),
            _ => {
                let candidates = matches.iter().map(|&m| self.move_to_san(m)).collect();
                Err(SanError::AmbiguousMove {
                    san: original.to_string(),
                    candidates,
                })
            }
        }
    }
}
