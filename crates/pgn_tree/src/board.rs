//! A chess position that SAN moves can be played on.

use std::{fmt::Display, ops::Index, str::FromStr};

use either::Either;
use itertools::Itertools;
use nom::{
    branch::alt,
    character::complete::{char as nchar, digit1, one_of},
    combinator::{all_consuming, map_res, opt, verify},
    multi::{many_m_n, separated_list1},
    sequence::tuple,
    IResult, Parser,
};
use tinyvec::array_vec;
use tracing::trace;

use crate::{
    candidate_sources,
    san::{self, Castle, RawMove, San},
    Piece, PieceKind, Player, Square,
};

/// Position text of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Castling rights of one player.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CastlingRights {
    king_side: bool,
    queen_side: bool,
}

impl CastlingRights {
    /// neither side may castle anymore
    pub const fn none() -> Self {
        Self {
            king_side: false,
            queen_side: false,
        }
    }

    /// both sides are still available
    pub const fn all() -> Self {
        Self {
            king_side: true,
            queen_side: true,
        }
    }

    /// whether castling with the h-file rook is still allowed
    pub fn king_side(&self) -> bool {
        self.king_side
    }

    /// whether castling with the a-file rook is still allowed
    pub fn queen_side(&self) -> bool {
        self.queen_side
    }

    /// drops the right belonging to the rook that starts on `file`, if any
    fn revoke_file(&mut self, file: u8) {
        match file {
            0 => self.queen_side = false,
            7 => self.king_side = false,
            _ => {}
        }
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}

/// Errors raised while building or playing on a [`Board`]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    /// the position text does not follow the six field grammar
    #[error("malformed position {0:?}")]
    MalformedPosition(String),
    /// the move does not fit the tracked position
    #[error("cannot play {san}: {reason}")]
    IllegalPosition {
        /// the move as written
        san: String,
        /// what was missing on the board
        reason: String,
    },
}

/// A SAN move resolved against a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// kind of the moving piece. The king for castling.
    pub piece: PieceKind,
    /// where the piece starts
    pub source: Square,
    /// whether the SAN marks a capture
    pub capture: bool,
    /// where the piece lands
    pub target: Square,
    /// the piece a pawn turns into on arrival
    pub promotion: Option<Piece>,
    /// the square passed over by a double push, set when an enemy pawn could take en passant
    pub en_passant_target: Option<Square>,
    /// the square of a pawn captured en passant by this move
    pub en_passant_capture: Option<Square>,
    /// the rook move accompanying a castling king move
    pub castling: Option<Box<Move>>,
}

impl Move {
    /// Coordinate notation: source, target and the lower case promotion letter.
    ///
    /// ```
    /// # use pgn_tree::Board;
    /// let board = Board::default();
    /// let m = board.parse_san("Nf3", board.to_move()).unwrap().unwrap();
    /// assert_eq!(m.uci(), "g1f3");
    /// ```
    pub fn uci(&self) -> String {
        match self.promotion {
            Some(promotion) => format!("{}{}{}", self.source, self.target, promotion.kind()),
            None => format!("{}{}", self.source, self.target),
        }
    }

    fn plain(piece: PieceKind, source: Square, target: Square) -> Self {
        Move {
            piece,
            source,
            capture: false,
            target,
            promotion: None,
            en_passant_target: None,
            en_passant_capture: None,
            castling: None,
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uci())
    }
}

/// A chess position plus the bookkeeping of position text: side to move, castling rights,
/// en passant target and both move counters. Indexable via [`Square`].
///
/// The board trusts its moves to be legal. It resolves only as much geometry as it takes to find
/// the moving piece.
///
/// ```
/// # use pgn_tree::Board;
/// let mut board = Board::default();
/// board.apply("e4").unwrap();
/// assert_eq!(
///     board.to_string(),
///     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
/// );
/// assert_eq!(board.last_uci(), Some("e2e4"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// indexed `[rank][file]`, rank 0 being the eighth rank
    squares: [[Option<Piece>; 8]; 8],
    to_move: Player,
    castling_white: CastlingRights,
    castling_black: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    last_uci: Option<String>,
}

impl Default for Board {
    fn default() -> Self {
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut squares = [[None; 8]; 8];
        for (file, kind) in back_rank.into_iter().enumerate() {
            squares[0][file] = Some(Piece::new_black(kind));
            squares[1][file] = Some(Piece::new_black(PieceKind::Pawn));
            squares[6][file] = Some(Piece::new_white(PieceKind::Pawn));
            squares[7][file] = Some(Piece::new_white(kind));
        }
        Board {
            squares,
            to_move: Player::White,
            castling_white: CastlingRights::all(),
            castling_black: CastlingRights::all(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            last_uci: None,
        }
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, square: Square) -> &Self::Output {
        &self.squares[square.rank() as usize][square.file() as usize]
    }
}

impl Board {
    /// Parses a [FEN](https://en.wikipedia.org/wiki/Forsyth%E2%80%93Edwards_Notation) string.
    ///
    /// ### Examples
    /// ```
    /// # use pgn_tree::{Board, board::START_FEN};
    /// let board = Board::from_fen(START_FEN).unwrap();
    /// assert_eq!(board, Board::default());
    /// assert!(Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1").is_err());
    /// ```
    pub fn from_fen(s: &str) -> Result<Self, BoardError> {
        let malformed = || BoardError::MalformedPosition(s.to_owned());
        let (
            _,
            (
                squares,
                _,
                to_move,
                _,
                (castling_white, castling_black),
                _,
                en_passant,
                _,
                halfmove_clock,
                _,
                fullmove_number,
            ),
        ) = all_consuming(tuple((
            piece_placement,
            nchar(' '),
            side_to_move,
            nchar(' '),
            castling_ability,
            nchar(' '),
            en_passant_sq,
            nchar(' '),
            counter,
            nchar(' '),
            counter,
        )))(s.trim())
        .map_err(|_| malformed())?;

        Ok(Board {
            squares: squares.ok_or_else(malformed)?,
            to_move,
            castling_white,
            castling_black,
            en_passant,
            halfmove_clock,
            fullmove_number,
            last_uci: None,
        })
    }

    /// returns whose turn it is
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// returns the castling rights of `player`
    pub fn castling_rights(&self, player: Player) -> &CastlingRights {
        match player {
            Player::White => &self.castling_white,
            Player::Black => &self.castling_black,
        }
    }

    fn castling_rights_mut(&mut self, player: Player) -> &mut CastlingRights {
        match player {
            Player::White => &mut self.castling_white,
            Player::Black => &mut self.castling_black,
        }
    }

    /// the square a pawn may capture en passant on, if the last move was a double push next to an
    /// enemy pawn
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// plies since the last pawn move or capture
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// number of the current full move, starting at 1 and incremented after black moved
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// coordinate notation of the last move played through [`Board::apply`]
    pub fn last_uci(&self) -> Option<&str> {
        self.last_uci.as_deref()
    }

    /// returns the piece on `square`
    pub fn piece(&self, square: Square) -> Option<Piece> {
        self[square]
    }

    /// Looks a piece up by square name. Names that are not a square yield `None`.
    ///
    /// ```
    /// # use pgn_tree::*;
    /// let board = Board::default();
    /// assert_eq!(board.piece_at("e1"), Some(Piece::new_white(PieceKind::King)));
    /// assert_eq!(board.piece_at("e4"), None);
    /// assert_eq!(board.piece_at(""), None);
    /// ```
    pub fn piece_at(&self, name: &str) -> Option<Piece> {
        let square = name.parse::<Square>().ok()?;
        self[square]
    }

    /// puts `piece` on `square`, or clears it with `None`
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.rank() as usize][square.file() as usize] = piece;
    }

    /// Resolves `san` as a move of `player`.
    ///
    /// Yields `Ok(None)` when `san` is not a move at all, so termination markers and other stray
    /// tokens do not need special treatment by callers.
    pub fn parse_san(&self, san: &str, player: Player) -> Result<Option<Move>, BoardError> {
        let parsed = match san::san(san) {
            Ok((_, parsed)) => parsed,
            Err(_) => return Ok(None),
        };

        let the_move = match parsed {
            San::Castle(side) => castle_move(side, player),
            San::Move(raw) => self.resolve(san, raw, player)?,
        };
        Ok(Some(the_move))
    }

    fn resolve(&self, san: &str, raw: RawMove, player: Player) -> Result<Move, BoardError> {
        let RawMove {
            piece,
            clue,
            capture,
            target,
            promotion,
        } = raw;
        let wanted = Some(Piece::new(piece, player));

        let source = candidate_sources(piece, target, player)
            .filter(|&square| self[square] == wanted)
            // only the capture flag tells a pawn push from a diagonal capture
            .filter(|square| piece != PieceKind::Pawn || (square.file() != target.file()) == capture)
            .filter(|square| square.matches_clue(clue))
            .min_by_key(|square| square.distance(target))
            .ok_or_else(|| BoardError::IllegalPosition {
                san: san.to_owned(),
                reason: format!("no {piece:?} of {player:?} reaches {target}"),
            })?;

        let mut the_move = Move::plain(piece, source, target);
        the_move.capture = capture;
        the_move.promotion = promotion.map(|kind| Piece::new(kind, player));
        if piece == PieceKind::Pawn {
            the_move.en_passant_target = self.en_passant_target(source, target, player);
            if capture && self[target].is_none() && Some(target) == self.en_passant {
                the_move.en_passant_capture = Square::try_new(target.file(), source.rank());
            }
        }
        Ok(the_move)
    }

    /// the pass-through square of a double push, if an enemy pawn stands next to the arrival
    fn en_passant_target(&self, source: Square, target: Square, player: Player) -> Option<Square> {
        if source.file() != target.file() || source.distance(target) != 2 {
            return None;
        }
        [-1, 1]
            .into_iter()
            .filter_map(|df| target + (df, 0))
            .filter_map(|square| self[square])
            .any(|piece| piece.is_pawn() && piece.player() != player)
            .then(|| target + (0, -player.forward()))
            .flatten()
    }

    /// Plays `san` for the side to move and returns the resolved move.
    ///
    /// Nothing is changed when the move cannot be played. `Ok(None)` means `san` was not a move
    /// (see [`Board::parse_san`]).
    pub fn apply(&mut self, san: &str) -> Result<Option<Move>, BoardError> {
        let player = self.to_move;
        let Some(the_move) = self.parse_san(san, player)? else {
            return Ok(None);
        };

        let illegal = |reason: String| BoardError::IllegalPosition {
            san: san.to_owned(),
            reason,
        };
        let Some(piece) = self[the_move.source] else {
            return Err(illegal(format!("no piece on {}", the_move.source)));
        };
        if let Some(rook_move) = &the_move.castling {
            if self[rook_move.source].is_none() {
                return Err(illegal(format!("no rook on {}", rook_move.source)));
            }
        }

        self.update_castling_rights(&the_move, player);
        let captured = the_move.capture || self[the_move.target].is_some();
        if the_move.piece == PieceKind::Pawn || captured {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        let relocations = match &the_move.castling {
            Some(rook_move) => array_vec!([(Square, Square); 2] =>
                (the_move.source, the_move.target),
                (rook_move.source, rook_move.target)),
            None => array_vec!([(Square, Square); 2] => (the_move.source, the_move.target)),
        };
        for (from, to) in relocations {
            let moving = self[from];
            self.set_piece(from, None);
            self.set_piece(to, moving);
        }
        if let Some(promotion) = the_move.promotion {
            self.set_piece(the_move.target, Some(promotion));
        }
        if let Some(captured_pawn) = the_move.en_passant_capture {
            self.set_piece(captured_pawn, None);
        }

        self.en_passant = the_move.en_passant_target;
        self.last_uci = Some(the_move.uci());
        if player == Player::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.to_move.flip();

        trace!(san, uci = %the_move, %piece, "applied move");
        Ok(Some(the_move))
    }

    fn update_castling_rights(&mut self, the_move: &Move, player: Player) {
        let home = player.home_rank();
        match the_move.piece {
            PieceKind::King => *self.castling_rights_mut(player) = CastlingRights::none(),
            PieceKind::Rook if the_move.source.rank() == home => {
                self.castling_rights_mut(player)
                    .revoke_file(the_move.source.file());
            }
            _ => {}
        }

        // taking a rook in its corner removes the opponent's right as well
        let opponent = player.other();
        if the_move.target.rank() == opponent.home_rank()
            && self[the_move.target] == Some(Piece::new(PieceKind::Rook, opponent))
        {
            self.castling_rights_mut(opponent)
                .revoke_file(the_move.target.file());
        }
    }

    fn fen_castling(&self) -> String {
        let rights = [
            (self.castling_white.king_side, 'K'),
            (self.castling_white.queen_side, 'Q'),
            (self.castling_black.king_side, 'k'),
            (self.castling_black.queen_side, 'q'),
        ];
        let field: String = rights
            .into_iter()
            .filter(|(allowed, _)| *allowed)
            .map(|(_, c)| c)
            .collect();
        if field.is_empty() {
            "-".to_owned()
        } else {
            field
        }
    }
}

/// The king move of a castling, carrying the rook move along.
fn castle_move(side: Castle, player: Player) -> Move {
    let rank = player.home_rank();
    let (king_to, rook_from, rook_to) = match side {
        Castle::KingSide => (6, 7, 5),
        Castle::QueenSide => (2, 0, 3),
    };
    let rook = Move::plain(
        PieceKind::Rook,
        Square::new(rook_from, rank),
        Square::new(rook_to, rank),
    );
    let mut king = Move::plain(
        PieceKind::King,
        Square::new(4, rank),
        Square::new(king_to, rank),
    );
    king.castling = Some(Box::new(rook));
    king
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let placement = self
            .squares
            .iter()
            .map(|rank| {
                let mut row = String::with_capacity(8);
                let mut empty = 0;
                for square in rank {
                    match square {
                        Some(piece) => {
                            if empty > 0 {
                                row.push_str(&empty.to_string());
                                empty = 0;
                            }
                            row.push_str(&piece.to_string());
                        }
                        None => empty += 1,
                    }
                }
                if empty > 0 {
                    row.push_str(&empty.to_string());
                }
                row
            })
            .join("/");

        let en_passant = self
            .en_passant
            .map(|square| square.to_string())
            .unwrap_or_else(|| "-".to_owned());

        write!(
            f,
            "{placement} {} {} {en_passant} {} {}",
            self.to_move,
            self.fen_castling(),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Field {
    /// a piece
    Piece(Piece),
    /// `self.0` empty squares
    Empty(u8),
}

impl Field {
    fn width(&self) -> usize {
        match self {
            Field::Piece(_) => 1,
            Field::Empty(n) => *n as usize,
        }
    }
}

fn field(s: &str) -> IResult<&str, Field> {
    let (s, x) = one_of("pnbrqkPNBRQK12345678")(s)?;
    let field = match Piece::from_fen_char(x) {
        Some(piece) => Field::Piece(piece),
        None => Field::Empty(x as u8 - b'0'),
    };
    Ok((s, field))
}

fn side_to_move(s: &str) -> IResult<&str, Player> {
    let (s, player) = one_of("wb")(s)?;
    let player = if player == 'w' {
        Player::White
    } else {
        Player::Black
    };
    Ok((s, player))
}

fn rank(s: &str) -> IResult<&str, Vec<Field>> {
    many_m_n(1, 8, field)(s)
}

/// `None` when a rank does not describe exactly eight squares
fn piece_placement(s: &str) -> IResult<&str, Option<[[Option<Piece>; 8]; 8]>> {
    let (s, ranks) = separated_list1(nchar('/'), rank)(s)?;
    if ranks.len() != 8 {
        return Ok((s, None));
    }

    let mut squares = [[None; 8]; 8];
    for (row, fields) in ranks.iter().enumerate() {
        if fields.iter().map(Field::width).sum::<usize>() != 8 {
            return Ok((s, None));
        }
        let mut file = 0;
        for field in fields {
            if let Field::Piece(piece) = field {
                squares[row][file] = Some(*piece);
            }
            file += field.width();
        }
    }

    Ok((s, Some(squares)))
}

fn castling_ability(s: &str) -> IResult<&str, (CastlingRights, CastlingRights)> {
    let (s, castling) = alt((
        nchar('-').map(Either::Left),
        verify(
            tuple((
                opt(nchar('K')),
                opt(nchar('Q')),
                opt(nchar('k')),
                opt(nchar('q')),
            )),
            |(wk, wq, bk, bq): &(Option<char>, Option<char>, Option<char>, Option<char>)| {
                [wk, wq, bk, bq].iter().any(|right| right.is_some())
            },
        )
        .map(Either::Right),
    ))(s)?;

    let rights = match castling {
        Either::Left(_) => (CastlingRights::none(), CastlingRights::none()),
        Either::Right((wk, wq, bk, bq)) => (
            CastlingRights {
                king_side: wk.is_some(),
                queen_side: wq.is_some(),
            },
            CastlingRights {
                king_side: bk.is_some(),
                queen_side: bq.is_some(),
            },
        ),
    };

    Ok((s, rights))
}

fn en_passant_sq(s: &str) -> IResult<&str, Option<Square>> {
    let (s, sq) = alt((
        nchar('-').map(Either::Left),
        tuple((one_of("abcdefgh"), one_of("36"))).map(Either::Right),
    ))(s)?;

    let sq = sq
        .right()
        .map(|(file, rank)| Square::new(file as u8 - b'a', b'8' - rank as u8));

    Ok((s, sq))
}

fn counter(s: &str) -> IResult<&str, u32> {
    map_res(digit1, |num: &str| num.parse::<u32>())(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn starting_position() {
        let board: Board = START_FEN.parse().unwrap();
        assert_eq!(board, Board::default());
        assert_eq!(board.to_string(), START_FEN);
    }

    #[test]
    fn position_text_round_trips() {
        for fen in [
            START_FEN,
            "2k5/2p2pb1/3p2pp/3P4/p1PP1B2/N4P2/1r3KPP/8 w - - 2 30",
            "rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPPPPPP/RNBQKBNR w KQkq d6 0 3",
            "r3k2r/8/8/8/8/8/8/R3K2R b Kq - 12 40",
            "8/8/8/8/8/8/8/8 w - - 0 1",
        ] {
            let board: Board = fen.parse().unwrap();
            assert_eq!(board.to_string(), fen);
        }
    }

    #[test]
    fn malformed_positions() {
        for fen in [
            "",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/7/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w  - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 99999999999",
        ] {
            assert_eq!(
                fen.parse::<Board>(),
                Err(BoardError::MalformedPosition(fen.to_owned())),
                "{fen:?}"
            );
        }
    }

    #[test]
    fn get_and_set_piece() {
        let mut board = Board::default();
        let queen = Some(Piece::new_black(PieceKind::Queen));
        assert_eq!(board.piece(sq("d8")), queen);
        board.set_piece(sq("d8"), None);
        board.set_piece(sq("d4"), queen);
        assert_eq!(board.piece(sq("d8")), None);
        assert_eq!(board.piece_at("d4"), queen);
        assert_eq!(board.piece_at("z9"), None);
        assert_eq!(
            board.to_string(),
            "rnb1kbnr/pppppppp/8/8/3q4/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    macro_rules! make_move {
        ($name:ident, $san:literal :: $before:literal -> $after:literal, $uci:literal) => {
            #[test]
            fn $name() {
                let mut board: Board = $before.parse().expect("should be a valid fen string");
                let played = board
                    .apply($san)
                    .expect("was a valid move")
                    .expect("should be a move");
                assert_eq!(board.to_string(), $after);
                assert_eq!(played.uci(), $uci);
                assert_eq!(board.last_uci(), Some($uci));
            }
        };
    }

    make_move!(e4, "e4" :: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
                        -> "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1", "e2e4");
    make_move!(black_double_push, "d5" :: "rnbqkbnr/pp1ppppp/2p5/8/3PP3/8/PPP2PPP/RNBQKBNR b KQkq - 0 2"
                        -> "rnbqkbnr/pp2pppp/2p5/3p4/3PP3/8/PPP2PPP/RNBQKBNR w KQkq - 0 3", "d7d5");
    make_move!(pawn_takes, "exd5" :: "rnbqkbnr/pp2pppp/2p5/3p4/3PP3/8/PPP2PPP/RNBQKBNR w KQkq - 0 3"
                        -> "rnbqkbnr/pp2pppp/2p5/3P4/3P4/8/PPP2PPP/RNBQKBNR b KQkq - 0 3", "e4d5");
    make_move!(no_en_passant_without_neighbour, "h5" :: "rn1qkbnr/pp3ppp/4p1b1/2ppP3/3P2PP/2N5/PPP1NP2/R1BQKB1R b KQkq - 0 7"
                        -> "rn1qkbnr/pp3pp1/4p1b1/2ppP2p/3P2PP/2N5/PPP1NP2/R1BQKB1R w KQkq - 0 8", "h7h5");
    make_move!(en_passant_target, "d5" :: "rnbqkbnr/1ppppppp/p7/4P3/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2"
                        -> "rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3", "d7d5");
    make_move!(en_passant_target_two_neighbours, "d5" :: "rnbqkbnr/1ppppppp/8/2P1P3/p7/8/PP1P1PPP/RNBQKBNR b KQkq - 0 4"
                        -> "rnbqkbnr/1pp1pppp/8/2PpP3/p7/8/PP1P1PPP/RNBQKBNR w KQkq d6 0 5", "d7d5");
    make_move!(en_passant_capture, "exd6" :: "rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3"
                        -> "rnbqkbnr/1pp1pppp/p2P4/8/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 3", "e5d6");
    make_move!(en_passant_capture_other_side, "cxd6" :: "rnbqkbnr/1pp1pppp/8/2PpP3/p7/8/PP1P1PPP/RNBQKBNR w KQkq d6 0 5"
                        -> "rnbqkbnr/1pp1pppp/3P4/4P3/p7/8/PP1P1PPP/RNBQKBNR b KQkq - 0 5", "c5d6");
    make_move!(white_en_passant_target, "e4" :: "rnbqkbnr/ppp1pppp/8/8/3p4/8/PPPPPPPP/RNBQKBNR w KQkq - 0 3"
                        -> "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3", "e2e4");
    make_move!(capture_promotion, "fxg1=N+" :: "rnbqk1nr/ppp2ppp/8/4P3/1BP5/8/PP2KpPP/RN1Q1BNR b kq - 1 7"
                        -> "rnbqk1nr/ppp2ppp/8/4P3/1BP5/8/PP2K1PP/RN1Q1BnR w kq - 0 8", "f2g1n");
    make_move!(closest_queen, "Qxd4" :: "6k1/Q7/1Q6/8/3r4/8/6K1/8 w - - 0 40"
                        -> "6k1/Q7/8/8/3Q4/8/6K1/8 b - - 0 40", "b6d4");
    make_move!(square_clue, "Qh4xe1" :: "8/8/1k6/8/4Q2Q/8/K7/4r2Q w - - 0 1"
                        -> "8/8/1k6/8/4Q3/8/K7/4Q2Q b - - 0 1", "h4e1");
    make_move!(short_castle, "O-O" :: "r1bqr1k1/pp1nbppp/2p2n2/3p2B1/3P4/2NBPN2/PPQ2PPP/R3K2R w KQ - 6 10"
                        -> "r1bqr1k1/pp1nbppp/2p2n2/3p2B1/3P4/2NBPN2/PPQ2PPP/R4RK1 b - - 7 10", "e1g1");
    make_move!(long_castle, "O-O-O" :: "r3kbnr/pppq1ppp/2n1b3/4P3/2Pp4/5NP1/PP2PPBP/RNBQ1RK1 b kq - 4 7"
                        -> "2kr1bnr/pppq1ppp/2n1b3/4P3/2Pp4/5NP1/PP2PPBP/RNBQ1RK1 w - - 5 8", "e8c8");
    make_move!(rook_leaves_corner, "Rb1" :: "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"
                        -> "r3k2r/8/8/8/8/8/8/1R2K2R b Kkq - 1 1", "a1b1");
    make_move!(rook_taken_in_corner, "Rxh8+" :: "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"
                        -> "r3k2R/8/8/8/8/8/8/R3K3 b Qq - 0 1", "h1h8");
    make_move!(knight_clue, "Nbd7" :: "rnbqkb1r/ppp1pppp/5n2/3p4/3P4/5N2/PPP1PPPP/RNBQKB1R b KQkq - 1 3"
                        -> "r1bqkb1r/pppnpppp/5n2/3p4/3P4/5N2/PPP1PPPP/RNBQKB1R w KQkq - 2 4", "b8d7");

    #[test]
    fn black_castling_leaves_white_rights() {
        let mut board: Board = "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1".parse().unwrap();
        board.apply("O-O").unwrap();
        assert_eq!(board.castling_rights(Player::White), &CastlingRights::all());
        assert_eq!(board.castling_rights(Player::Black), &CastlingRights::none());
        assert_eq!(board.to_string(), "r4rk1/8/8/8/8/8/8/R3K2R w KQ - 1 2");
    }

    #[test]
    fn corner_rooks_drop_one_side() {
        let mut board: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        board.apply("Rb1").unwrap();
        let white = board.castling_rights(Player::White);
        assert!(white.king_side());
        assert!(!white.queen_side());

        board.apply("Rxh1").unwrap();
        let white = board.castling_rights(Player::White);
        assert!(!white.king_side());
        assert!(!white.queen_side());
        let black = board.castling_rights(Player::Black);
        assert!(!black.king_side());
        assert!(black.queen_side());
    }

    #[test]
    fn counters_stop_at_their_maximum() {
        let mut board: Board = "4k3/8/8/8/8/8/8/4K1N1 w - - 4294967295 4294967295"
            .parse()
            .unwrap();
        board.apply("Nf3").unwrap();
        board.apply("Ke7").unwrap();
        assert_eq!(board.halfmove_clock(), u32::MAX);
        assert_eq!(board.fullmove_number(), u32::MAX);
        assert_eq!(
            board.to_string(),
            "8/4k3/8/8/8/5N2/8/4K3 w - - 4294967295 4294967295"
        );
    }

    #[test]
    fn unrecognized_moves_are_not_errors() {
        let mut board = Board::default();
        assert_eq!(board.apply("*"), Ok(None));
        assert_eq!(board.apply("1-0"), Ok(None));
        assert_eq!(board, Board::default());
    }

    #[test]
    fn missing_pieces_are_errors() {
        let mut board = Board::default();
        assert!(matches!(
            board.apply("Nd4"),
            Err(BoardError::IllegalPosition { .. })
        ));
        assert!(matches!(
            board.apply("exd5"),
            Err(BoardError::IllegalPosition { .. })
        ));

        let mut board: Board = "4k3/8/8/8/8/8/8/4K3 w KQ - 0 1".parse().unwrap();
        assert_eq!(
            board.apply("O-O"),
            Err(BoardError::IllegalPosition {
                san: "O-O".to_owned(),
                reason: "no rook on h1".to_owned()
            })
        );
        assert_eq!(board.to_string(), "4k3/8/8/8/8/8/8/4K3 w KQ - 0 1");
    }

    #[test]
    fn parse_san_does_not_touch_the_board() {
        let board: Board = "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1".parse().unwrap();
        let castle = board.parse_san("O-O-O", Player::Black).unwrap().unwrap();
        assert_eq!(castle.uci(), "e8c8");
        let rook = castle.castling.unwrap();
        assert_eq!((rook.source, rook.target), (sq("a8"), sq("d8")));
        assert_eq!(board.to_string(), "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
    }
}
