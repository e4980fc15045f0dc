//! Position serialization: the six-token FEN dialect with stacks, heroic
//! markers, and the deploy-session suffix.

use std::str::FromStr;

use super::error::FenError;
use super::stack::is_valid_stack;
use super::state::Game;
use super::terrain::can_stand;
use super::types::{Color, Piece, PieceKind, Square, FILE_COUNT, RANK_COUNT};

/// The standard starting position.
pub const DEFAULT_POSITION: &str = "6c4/1n2fh1hf2/3a2s2a1/2n1gt1tg2/2ie2m3i/11/11/2IE2M3I/2N1GT1TG2/3A2S2A1/1N2fh1hf2/6C4 r - - 0 1";

fn piece_fragment(piece: &Piece) -> String {
    fn single(out: &mut String, p: &Piece) {
        if p.heroic {
            out.push('+');
        }
        out.push(p.kind.to_fen_char(p.color));
    }
    let mut out = String::new();
    if piece.carried.is_empty() {
        single(&mut out, piece);
    } else {
        out.push('(');
        single(&mut out, &piece.without_carried());
        for carried in &piece.carried {
            single(&mut out, carried);
        }
        out.push(')');
    }
    out
}

fn parse_single(letter: char, heroic: bool) -> Result<Piece, FenError> {
    let kind = PieceKind::from_char(letter).ok_or(FenError::InvalidPiece { char: letter })?;
    let color = if letter.is_ascii_uppercase() {
        Color::Red
    } else {
        Color::Blue
    };
    let mut piece = Piece::new(kind, color);
    piece.heroic = heroic;
    Ok(piece)
}

fn parse_stack(text: &str) -> Result<Piece, FenError> {
    let mut singles = Vec::new();
    let mut heroic = false;
    for c in text.chars() {
        if c == '+' {
            heroic = true;
            continue;
        }
        singles.push(parse_single(c, heroic)?);
        heroic = false;
    }
    let mut iter = singles.into_iter();
    let mut carrier = iter.next().ok_or_else(|| FenError::InvalidStack {
        text: text.to_string(),
    })?;
    carrier.carried = iter.collect();
    if !is_valid_stack(&carrier) {
        return Err(FenError::InvalidStack {
            text: text.to_string(),
        });
    }
    Ok(carrier)
}

impl Game {
    /// The piece-placement token: 12 rank rows, top rank first.
    pub(crate) fn position_rows(&self) -> String {
        let mut rows = Vec::with_capacity(RANK_COUNT);
        for rank in 0..RANK_COUNT {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..FILE_COUNT {
                match self.get(Square::new(rank, file)) {
                    Some(piece) => {
                        if empty > 0 {
                            row.push_str(&empty.to_string());
                            empty = 0;
                        }
                        row.push_str(&piece_fragment(piece));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }
        rows.join("/")
    }

    fn base_fen(&self) -> String {
        format!(
            "{} {} - - {} {}",
            self.position_rows(),
            self.turn.to_char(),
            self.half_moves,
            self.move_number
        )
    }

    /// The position as a FEN string. While a deploy session is active the
    /// six base tokens describe the session's start position and a
    /// `DEPLOY` suffix replays the executed steps.
    #[must_use]
    pub fn fen(&self) -> String {
        match &self.active_deploy {
            Some(session) => {
                let steps: Vec<&str> =
                    session.commands().iter().map(|c| c.san.as_str()).collect();
                format!(
                    "{} DEPLOY {}:{}...",
                    session.start_fen(),
                    session.stack_square(),
                    steps.join(",")
                )
            }
            None => self.base_fen(),
        }
    }

    /// Load a position, replacing the whole game state. On error the state
    /// is left unchanged.
    pub fn load(&mut self, fen: &str) -> Result<(), FenError> {
        let fen = fen.trim();
        let (base, deploy_suffix) = match fen.split_once(" DEPLOY ") {
            Some((base, suffix)) => (base, Some(suffix)),
            None => (fen, None),
        };
        let tokens: Vec<&str> = base.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(FenError::TooFewTokens {
                found: tokens.len(),
            });
        }
        let rows: Vec<&str> = tokens[0].split('/').collect();
        if rows.len() != RANK_COUNT {
            return Err(FenError::BadRankCount { found: rows.len() });
        }

        let mut fresh = Game::empty();
        for (rank, row) in rows.iter().enumerate() {
            let mut file = 0usize;
            let mut chars = row.chars().peekable();
            while let Some(c) = chars.next() {
                if let Some(digit) = c.to_digit(10) {
                    let mut run = digit as usize;
                    while let Some(next) = chars.peek().and_then(|c| c.to_digit(10)) {
                        run = run * 10 + next as usize;
                        chars.next();
                    }
                    file += run;
                    continue;
                }
                let piece = if c == '(' {
                    let mut text = String::new();
                    loop {
                        match chars.next() {
                            Some(')') => break,
                            Some(inner) => text.push(inner),
                            None => {
                                return Err(FenError::InvalidStack {
                                    text: (*row).to_string(),
                                })
                            }
                        }
                    }
                    parse_stack(&text)?
                } else if c == '+' {
                    let letter = chars.next().ok_or(FenError::InvalidPiece { char: '+' })?;
                    parse_single(letter, true)?
                } else {
                    parse_single(c, false)?
                };
                if file >= FILE_COUNT {
                    return Err(FenError::BadRankWidth {
                        rank: (*row).to_string(),
                        files: file + 1,
                    });
                }
                let sq = Square::new(rank, file);
                if !can_stand(piece.kind, sq) {
                    return Err(FenError::BadTerrain {
                        square: sq.to_string(),
                    });
                }
                if piece.contains_kind(PieceKind::Commander) {
                    let slot = &mut fresh.commanders[piece.color.index()];
                    if slot.is_some() {
                        return Err(FenError::DuplicateCommander {
                            color: piece.color.to_string(),
                        });
                    }
                    *slot = Some(sq);
                }
                fresh.board[sq.as_index()] = Some(piece);
                file += 1;
            }
            if file != FILE_COUNT {
                return Err(FenError::BadRankWidth {
                    rank: (*row).to_string(),
                    files: file,
                });
            }
        }

        fresh.turn = match tokens[1] {
            "r" => Color::Red,
            "b" => Color::Blue,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };
        if let Some(token) = tokens.get(4) {
            fresh.half_moves = token.parse().map_err(|_| FenError::InvalidClock {
                found: (*token).to_string(),
            })?;
        }
        if let Some(token) = tokens.get(5) {
            fresh.move_number = token.parse().map_err(|_| FenError::InvalidClock {
                found: (*token).to_string(),
            })?;
        }

        fresh.refresh_indices();
        fresh.reseed_position_counts();
        *self = fresh;
        #[cfg(feature = "logging")]
        log::debug!("loaded position, {} to move", self.turn);

        if let Some(suffix) = deploy_suffix {
            self.replay_deploy_suffix(suffix)?;
        }
        Ok(())
    }

    /// Re-run the executed steps of a serialized deploy session against
    /// the freshly loaded start position.
    fn replay_deploy_suffix(&mut self, suffix: &str) -> Result<(), FenError> {
        let invalid = || FenError::InvalidDeploySuffix {
            found: suffix.to_string(),
        };
        let text = suffix.trim().trim_end_matches("...");
        let (square, steps) = text.split_once(':').ok_or_else(invalid)?;
        let stack_square: Square = square.parse().map_err(|_| invalid())?;
        for san in steps.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            self.make_move_san(san).map_err(|_| invalid())?;
        }
        match self.active_deploy.as_ref() {
            Some(session) if session.stack_square() == stack_square => Ok(()),
            _ => Err(invalid()),
        }
    }

    /// Build a game directly from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut game = Game::empty();
        game.load(fen)?;
        Ok(game)
    }
}

impl FromStr for Game {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Game::from_fen(s)
    }
}
