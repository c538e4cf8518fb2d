use std::{fmt::Display, ops::Add, str::FromStr};

/// A square on the chess board. Enforces that the square is actually on the board.
///
/// Ranks are indexed top down in the order position text lists them: rank index 0 holds the
/// eighth rank, rank index 7 holds the first.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Creates a new square.
    ///
    /// ## Panics
    ///
    /// Panics if `file >= 8` or if `rank >= 8`. To fail recoverably, use [`Square::try_new`]
    /// instead
    pub fn new(file: u8, rank: u8) -> Square {
        assert!(file < 8);
        assert!(rank < 8);
        Square { file, rank }
    }

    /// Creates a new square. Returns `None` if it would lie off the board
    pub fn try_new(file: u8, rank: u8) -> Option<Square> {
        if file < 8 && rank < 8 {
            Some(Square { file, rank })
        } else {
            None
        }
    }

    /// returns the file index, 0 being the a-file
    ///
    /// ```
    /// # use pgn_tree::*;
    /// assert_eq!("e4".parse::<Square>().unwrap().file(), 4);
    /// ```
    pub fn file(&self) -> u8 {
        self.file
    }

    /// returns the rank index, 0 being the eighth rank
    ///
    /// ```
    /// # use pgn_tree::*;
    /// assert_eq!("e4".parse::<Square>().unwrap().rank(), 4);
    /// assert_eq!("a8".parse::<Square>().unwrap().rank(), 0);
    /// ```
    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// the file letter, `'a'..='h'`
    pub fn file_char(&self) -> char {
        (b'a' + self.file) as char
    }

    /// the rank digit, `'1'..='8'`
    pub fn rank_char(&self) -> char {
        (b'8' - self.rank) as char
    }

    /// returns the move distance between two squares, i.e. the minimum number of moves a king
    /// needs to walk from one to the other on an otherwise empty board
    ///
    /// ```
    /// # use pgn_tree::*;
    /// let a1: Square = "a1".parse().unwrap();
    /// let h8: Square = "h8".parse().unwrap();
    /// assert_eq!(a1.distance(h8), 7);
    /// ```
    pub fn distance(self, other: Self) -> u8 {
        let df = self.file.abs_diff(other.file);
        let dr = self.rank.abs_diff(other.rank);
        std::cmp::max(df, dr)
    }

    /// Checks a SAN disambiguation clue (`""`, `"b"`, `"8"` or `"b8"`) against this square. Each
    /// character has to be either this square's file letter or its rank digit.
    ///
    /// ```
    /// # use pgn_tree::*;
    /// let b8: Square = "b8".parse().unwrap();
    /// assert!(b8.matches_clue(""));
    /// assert!(b8.matches_clue("b"));
    /// assert!(!b8.matches_clue("f6"));
    /// ```
    pub fn matches_clue(&self, clue: &str) -> bool {
        clue.chars()
            .all(|c| c == self.file_char() || c == self.rank_char())
    }
}

impl Add<(i8, i8)> for Square {
    type Output = Option<Square>;

    fn add(self, (df, dr): (i8, i8)) -> Self::Output {
        let file = self.file.checked_add_signed(df)?;
        let rank = self.rank.checked_add_signed(dr)?;
        Square::try_new(file, rank)
    }
}

/// Returned when a square name is not one of `a1` to `h8`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid square name {0:?}")]
pub struct InvalidSquare(pub String);

impl FromStr for Square {
    type Err = InvalidSquare;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidSquare(s.to_owned());
        let mut chars = s.chars();
        let file = match chars.next().ok_or_else(invalid)? {
            x @ 'a'..='h' => x as u8 - b'a',
            _ => return Err(invalid()),
        };
        let rank = match chars.next().ok_or_else(invalid)? {
            y @ '1'..='8' => b'8' - y as u8,
            _ => return Err(invalid()),
        };
        if chars.next().is_some() {
            return Err(invalid());
        }
        Ok(Square { file, rank })
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn parses_any_square() {
        let files = b"abcdefgh ,.14nr8";
        let ranks = b"87654321 0abcz'.";

        for (i, &f) in files.iter().enumerate() {
            for (j, &r) in ranks.iter().enumerate() {
                let arr = [f, r];
                let s = std::str::from_utf8(&arr).unwrap();
                let square = s.parse::<Square>();
                if i < 8 && j < 8 {
                    assert_eq!(square, Ok(Square::new(i as u8, j as u8)));
                    assert_eq!(square.unwrap().to_string(), s);
                } else {
                    assert_eq!(square, Err(InvalidSquare(s.to_owned())))
                }
            }
        }

        assert!("".parse::<Square>().is_err());
        assert!("e".parse::<Square>().is_err());
        assert!("e41".parse::<Square>().is_err());
        assert!("e8 ".parse::<Square>().is_err());
    }

    #[test]
    fn distances() {
        assert_eq!(sq("a1").distance(sq("h8")), 7);
        assert_eq!(sq("g1").distance(sq("f3")), 2);
        assert_eq!(sq("c1").distance(sq("d2")), 1);
        assert_eq!(sq("e4").distance(sq("e4")), 0);
    }

    #[test]
    fn distance_is_symmetric() {
        for a in 0..64u8 {
            for b in 0..64u8 {
                let a = Square::new(a % 8, a / 8);
                let b = Square::new(b % 8, b / 8);
                let chebyshev = std::cmp::max(
                    (a.file() as i8 - b.file() as i8).abs(),
                    (a.rank() as i8 - b.rank() as i8).abs(),
                ) as u8;
                assert_eq!(a.distance(b), b.distance(a));
                assert_eq!(a.distance(b), chebyshev);
            }
        }
    }

    #[test]
    fn clues() {
        let b8 = sq("b8");
        assert!(b8.matches_clue(""));
        assert!(b8.matches_clue("b"));
        assert!(b8.matches_clue("8"));
        assert!(b8.matches_clue("b8"));
        assert!(!b8.matches_clue("b6"));
        assert!(!b8.matches_clue("f"));
        assert!(!b8.matches_clue("f6"));
    }

    #[test]
    fn offsets() {
        assert_eq!(sq("e4") + (1, -1), Some(sq("f5")));
        assert_eq!(sq("a1") + (-1, 0), None);
        assert_eq!(sq("h8") + (0, -1), None);
        assert_eq!(sq("h8") + (0, 7), Some(sq("h1")));
    }
}
