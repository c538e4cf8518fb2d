//! SAN grammar, shared by [`Board::parse_san`](crate::Board::parse_san) and the move text
//! tokenizer.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char as nchar, one_of},
    combinator::{opt, recognize},
    sequence::tuple,
    IResult, Parser,
};

use crate::{PieceKind, Square};

type IRes<'a, T> = IResult<&'a str, T>;

/// Which rook the king castles with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Castle {
    KingSide,
    QueenSide,
}

/// A SAN move split into its parts, before its source square is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawMove<'a> {
    pub piece: PieceKind,
    /// zero to two characters narrowing down the source square
    pub clue: &'a str,
    pub capture: bool,
    pub target: Square,
    pub promotion: Option<PieceKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum San<'a> {
    Castle(Castle),
    Move(RawMove<'a>),
}

fn get_file(s: &str) -> IRes<u8> {
    let (s, x) = one_of("abcdefgh")(s)?;
    Ok((s, x as u8 - b'a'))
}

fn get_rank(s: &str) -> IRes<u8> {
    let (s, y) = one_of("12345678")(s)?;
    Ok((s, b'8' - y as u8))
}

fn square(s: &str) -> IRes<Square> {
    let (s, (file, rank)) = tuple((get_file, get_rank))(s)?;
    Ok((s, Square::new(file, rank)))
}

fn piece(s: &str) -> IRes<PieceKind> {
    let (s, p) = one_of("NBRQK")(s)?;
    let kind = PieceKind::from_letter(p).unwrap_or_default();
    Ok((s, kind))
}

/// `=Q`, also accepting the bare letter some exports write
fn promotion(s: &str) -> IRes<PieceKind> {
    let (s, _) = opt(nchar('='))(s)?;
    let (s, p) = one_of("QRBN")(s)?;
    let kind = PieceKind::from_letter(p).unwrap_or_default();
    Ok((s, kind))
}

fn captures(s: &str) -> IRes<bool> {
    let (s, capt) = opt(nchar('x'))(s)?;
    Ok((s, capt.is_some()))
}

fn castle(s: &str) -> IRes<Castle> {
    alt((
        alt((tag("O-O-O"), tag("0-0-0"))).map(|_| Castle::QueenSide),
        alt((tag("O-O"), tag("0-0"))).map(|_| Castle::KingSide),
    ))(s)
}

/// The part of a move that follows the clue.
fn tail(s: &str) -> IRes<(bool, Square, Option<PieceKind>)> {
    tuple((captures, square, opt(promotion)))(s)
}

fn raw_move(s: &str) -> IRes<RawMove> {
    let (s, piece) = opt(piece)(s)?;
    let piece = piece.unwrap_or(PieceKind::Pawn);

    // the longest clue that still leaves a valid tail wins
    let (s, (clue, (capture, target, promotion))) = alt((
        tuple((recognize(tuple((get_file, get_rank))), tail)),
        tuple((recognize(one_of("abcdefgh12345678")), tail)),
        tail.map(|rest| ("", rest)),
    ))(s)?;

    Ok((
        s,
        RawMove {
            piece,
            clue,
            capture,
            target,
            promotion,
        },
    ))
}

/// Parses a SAN move without its check or mate suffix.
pub(crate) fn san(s: &str) -> IRes<San> {
    alt((castle.map(San::Castle), raw_move.map(San::Move)))(s)
}

/// Recognizes a SAN move including a trailing `+` or `#`, as written in move text.
pub(crate) fn san_token(s: &str) -> IRes<&str> {
    recognize(tuple((san, opt(one_of("+#")))))(s)
}
