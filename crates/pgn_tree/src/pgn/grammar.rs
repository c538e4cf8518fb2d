//! nom grammar of PGN tag pairs, move tokens, comments and annotation commands.

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, tag, take_till, take_until, take_while1},
    character::complete::{char as nchar, digit1, line_ending, multispace0, none_of, not_line_ending},
    combinator::{all_consuming, map_res, opt, recognize, value},
    multi::{many0, many1},
    sequence::{terminated, tuple},
    IResult,
};

use crate::{node::Annotations, san::san_token, NagGlyph};

type IRes<'a, T> = IResult<&'a str, T>;

/// `[Key "value"]`, with `\"` and `\\` decoded in the value
pub(crate) fn tag_pair(s: &str) -> IRes<(&str, String)> {
    let (s, _) = nchar('[')(s)?;
    let (s, _) = multispace0(s)?;
    let (s, key) = take_while1(|c: char| c.is_alphanumeric() || c == '_')(s)?;
    let (s, _) = multispace0(s)?;
    let (s, _) = nchar('"')(s)?;
    let (s, value) = opt(escaped_transform(
        none_of(r#""\"#),
        '\\',
        alt((value("\\", tag("\\")), value("\"", tag("\"")))),
    ))(s)?;
    let (s, _) = nchar('"')(s)?;
    let (s, _) = multispace0(s)?;
    let (s, _) = nchar(']')(s)?;

    Ok((s, (key, value.unwrap_or_default())))
}

/// the leading run of tag pairs, as written
pub(crate) fn tag_block(s: &str) -> IRes<&str> {
    let (s, _) = multispace0(s)?;
    recognize(many1(terminated(tag_pair, multispace0)))(s)
}

pub(crate) fn tag_pairs(s: &str) -> IRes<Vec<(&str, String)>> {
    let (s, _) = multispace0(s)?;
    many0(terminated(tag_pair, multispace0))(s)
}

fn line_comment(s: &str) -> IRes<&str> {
    let (s, _) = nchar(';')(s)?;
    let (s, comment) = not_line_ending(s)?;
    let (s, _) = opt(line_ending)(s)?;

    Ok((s, comment))
}

fn block_comment(s: &str) -> IRes<&str> {
    let (s, _) = nchar('{')(s)?;
    let (s, comment) = take_until("}")(s)?;
    let (s, _) = nchar('}')(s)?;

    Ok((s, comment))
}

/// the inside of a `{...}` or `; ...` comment
pub(crate) fn comment(s: &str) -> IRes<&str> {
    alt((block_comment, line_comment))(s)
}

/// any number of comments, with the whitespace around them
pub(crate) fn comments(s: &str) -> IRes<Vec<&str>> {
    let (s, _) = multispace0(s)?;
    many0(terminated(comment, multispace0))(s)
}

/// `12.` or `12...`
fn move_number(s: &str) -> IRes<&str> {
    recognize(tuple((digit1, many1(nchar('.')))))(s)
}

fn suffix_glyph(s: &str) -> IRes<NagGlyph> {
    let (s, glyph) = alt((
        tag("!!"),
        tag("??"),
        tag("!?"),
        tag("?!"),
        tag("!"),
        tag("?"),
    ))(s)?;
    Ok((s, NagGlyph::from_glyph(glyph).unwrap_or(NagGlyph::GoodMove)))
}

/// `$n`. Unknown numbers parse to `None`.
fn numeric_nag(s: &str) -> IRes<Option<NagGlyph>> {
    let (s, _) = nchar('$')(s)?;
    let (s, n) = map_res(digit1, |n: &str| n.parse::<u8>())(s)?;
    Ok((s, NagGlyph::from_numeric(n)))
}

/// One move of the move text with what is attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MoveToken<'a> {
    pub san: &'a str,
    pub nag: Option<NagGlyph>,
    pub comments: Vec<&'a str>,
}

/// Comments in front of the move number, the move number, the move itself, its glyphs and the
/// comments following it.
pub(crate) fn move_token(s: &str) -> IRes<MoveToken> {
    let (s, mut attached) = comments(s)?;
    let (s, _) = opt(terminated(move_number, multispace0))(s)?;
    let (s, san) = san_token(s)?;
    let (s, suffix) = opt(suffix_glyph)(s)?;
    let (s, _) = multispace0(s)?;
    let (s, numeric) = many0(terminated(numeric_nag, multispace0))(s)?;
    let (s, trailing) = comments(s)?;
    attached.extend(trailing);

    let nag = suffix.or_else(|| numeric.into_iter().flatten().next());
    Ok((
        s,
        MoveToken {
            san,
            nag,
            comments: attached,
        },
    ))
}

/// `[%cal Gd4c5,Rd4d5]`
fn annotation(s: &str) -> IRes<(&str, Vec<&str>)> {
    let (s, _) = tag("[%")(s)?;
    let (s, key) = take_while1(|c: char| c.is_alphanumeric() || c == '_')(s)?;
    let (s, _) = multispace0(s)?;
    let (s, values) = take_till(|c| c == ']')(s)?;
    let (s, _) = nchar(']')(s)?;

    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect();
    Ok((s, (key, values)))
}

/// a block of annotation commands that ends the comment
fn annotation_block(s: &str) -> IRes<Vec<(&str, Vec<&str>)>> {
    all_consuming(many1(terminated(annotation, multispace0)))(s)
}

/// Splits the inside of a comment into its plain text and the annotation block that ends it.
pub(crate) fn split_comment(inner: &str) -> (Option<&str>, Annotations) {
    let inner = inner.trim();
    let split = inner
        .match_indices("[%")
        .find_map(|(at, _)| annotation_block(&inner[at..]).ok().map(|(_, block)| (at, block)));

    let (text, block) = match split {
        Some((at, block)) => (&inner[..at], block),
        None => (inner, vec![]),
    };

    let mut annotations = Annotations::new();
    for (key, values) in block {
        annotations
            .entry(key.to_owned())
            .or_default()
            .extend(values.into_iter().map(str::to_owned));
    }

    let text = text.trim();
    ((!text.is_empty()).then_some(text), annotations)
}
