#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod board;
pub mod node;
pub mod pgn;
mod san;
mod square;
mod strategy;

use std::fmt::Display;

pub use board::{Board, BoardError, CastlingRights, Move};
pub use node::{Annotations, Game, NagGlyph, Node};
pub use pgn::{parse, PgnError};
pub use square::{InvalidSquare, Square};
pub use strategy::candidate_sources;

/// Of which kind a piece is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum PieceKind {
    /// a pawn (♙)
    #[default]
    Pawn,
    /// a knight (♘)
    Knight,
    /// a bishop (♗)
    Bishop,
    /// a rook (♖)
    Rook,
    /// a queen (♕)
    Queen,
    /// a king (♔)
    King,
}

impl PieceKind {
    /// The upper case letter naming this kind in position text. SAN leaves the `P` of pawns out.
    ///
    /// ```
    /// # use pgn_tree::PieceKind;
    /// assert_eq!(PieceKind::Knight.letter(), 'N');
    /// ```
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Inverse of [`PieceKind::letter`]. Case insensitive.
    ///
    /// ```
    /// # use pgn_tree::PieceKind;
    /// assert_eq!(PieceKind::from_letter('q'), Some(PieceKind::Queen));
    /// assert_eq!(PieceKind::from_letter('x'), None);
    /// ```
    pub fn from_letter(letter: char) -> Option<Self> {
        let kind = match letter.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'R' => PieceKind::Rook,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => return None,
        };
        Some(kind)
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter().to_ascii_lowercase())
    }
}

/// Represents the side of a piece, or the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Player {
    /// The player playing the light colored pieces (the ones that start)
    #[default]
    White,
    /// The player playing the dark colored pieces
    Black,
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            Player::White => 'w',
            Player::Black => 'b',
        };
        write!(f, "{c}")
    }
}

impl Player {
    /// changes the inner value to the player that wasn't playing
    #[inline]
    pub fn flip(&mut self) {
        *self = self.other();
    }

    /// returns the opponent
    #[inline]
    pub const fn other(&self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Rank index delta of a pawn step towards the opponent. Rank index 0 is the eighth rank, so
    /// white pawns walk towards smaller indices.
    #[inline]
    pub const fn forward(&self) -> i8 {
        match self {
            Player::White => -1,
            Player::Black => 1,
        }
    }

    /// rank index of the row on which the king and rooks of this player start out
    #[inline]
    pub const fn home_rank(&self) -> u8 {
        match self {
            Player::White => 7,
            Player::Black => 0,
        }
    }

    /// rank index a pawn of this player lands on after a double push (the fourth rank for white,
    /// the fifth for black)
    #[inline]
    pub const fn double_push_rank(&self) -> u8 {
        match self {
            Player::White => 4,
            Player::Black => 3,
        }
    }
}

/// A piece with a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Piece {
    kind: PieceKind,
    color: Player,
}

impl Piece {
    /// Constructs a piece of `kind` belonging to `color`
    pub const fn new(kind: PieceKind, color: Player) -> Self {
        Self { kind, color }
    }

    /// Constructs a new light colored piece
    pub const fn new_white(kind: PieceKind) -> Self {
        Self::new(kind, Player::White)
    }

    /// Constructs a new dark colored piece
    pub const fn new_black(kind: PieceKind) -> Self {
        Self::new(kind, Player::Black)
    }

    /// Reads a piece from its position text letter: upper case is white, lower case is black.
    ///
    /// ```
    /// # use pgn_tree::*;
    /// assert_eq!(Piece::from_fen_char('n'), Some(Piece::new_black(PieceKind::Knight)));
    /// assert_eq!(Piece::from_fen_char('K'), Some(Piece::new_white(PieceKind::King)));
    /// assert_eq!(Piece::from_fen_char('3'), None);
    /// ```
    pub fn from_fen_char(c: char) -> Option<Self> {
        let kind = PieceKind::from_letter(c)?;
        let color = if c.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        Some(Self::new(kind, color))
    }

    /// returns to which player the piece belongs
    #[inline]
    pub fn player(&self) -> Player {
        self.color
    }

    /// returns the [`PieceKind`] of the piece, i.e. 'erases' the color
    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns `true` if the piece is a pawn.
    #[must_use]
    #[inline]
    pub fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self.color {
            Player::White => self.kind.letter(),
            Player::Black => self.kind.letter().to_ascii_lowercase(),
        };
        write!(f, "{letter}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_piece_kind() {
        assert_eq!(PieceKind::Pawn.to_string(), "p");
        assert_eq!(PieceKind::Rook.to_string(), "r");
        assert_eq!(PieceKind::Knight.to_string(), "n");
        assert_eq!(PieceKind::Bishop.to_string(), "b");
        assert_eq!(PieceKind::Queen.to_string(), "q");
        assert_eq!(PieceKind::King.to_string(), "k");
    }

    #[test]
    fn fen_letters_round_trip() {
        for c in "pnbrqkPNBRQK".chars() {
            let piece = Piece::from_fen_char(c).unwrap();
            assert_eq!(piece.to_string(), c.to_string());
        }
    }

    #[test]
    fn players() {
        let mut player = Player::default();
        assert_eq!(player, Player::White);
        player.flip();
        assert_eq!(player, Player::Black);
        assert_eq!(player.to_string(), "b");
        assert_eq!(player.other().to_string(), "w");
    }
}
