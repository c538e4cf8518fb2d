//! Import study exports in PGN format. See
//! [PGN on Wikipedia](https://en.wikipedia.org/wiki/Portable_Game_Notation)
//!
//! Every game of an export becomes a [`Game`] whose moves form a tree: the first variation of a
//! [`Node`] continues the line, the others are alternatives written in parentheses.

mod grammar;

use std::collections::BTreeMap;

use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::{
    node::{Annotations, Game, Node},
    Board, BoardError,
};

const GAME_START: &str = "[Event \"";
const TERMINATION_MARKERS: [&str; 4] = ["*", "1-0", "0-1", "1/2-1/2"];

/// Error that arises from [`parse`]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PgnError {
    /// one game of the export could not be played through
    #[error("game {index} of the export is invalid")]
    Game {
        /// position of the game in the export, starting at 0
        index: usize,
        /// what went wrong
        source: BoardError,
    },
}

/// Parses every game of an export. Games are parsed in parallel and returned in input order.
///
/// ```
/// # use pgn_tree::pgn::parse;
/// let games = parse(r#"[Event "Study: Chapter 1"]
/// [Site "https://lichess.org/study/abc/def"]
///
/// 1. d4 d5 (1... e5 2. dxe5) 2. c4 *
/// "#).unwrap();
///
/// let d4 = &games[0].nodes[0];
/// assert_eq!(d4.variations[0].san, "d5");
/// assert_eq!(d4.variations[0].variations[0].san, "c4");
/// assert_eq!(d4.variations[1].uci, "e7e5");
/// ```
pub fn parse(text: &str) -> Result<Vec<Game>, PgnError> {
    let text = text.replace("\r\n", "\n");
    let blocks = split_games(&text);
    debug!(games = blocks.len(), "parsing export");

    blocks
        .par_iter()
        .enumerate()
        .map(|(index, block)| {
            let (tags, moves) = split_tags_and_moves(block);
            let tags = tags.map(extract_tags).unwrap_or_default();
            build_game(tags, moves).map_err(|source| PgnError::Game { index, source })
        })
        .collect()
}

/// Splits an export into one block per game. A game starts at its `Event` tag; text in front of
/// the first one is dropped. Text without any `Event` tag is a single game.
///
/// ```
/// # use pgn_tree::pgn::split_games;
/// let blocks = split_games("[Event \"a\"]\n1. e4 *\n\n[Event \"b\"]\n1. d4 *\n");
/// assert_eq!(blocks, ["[Event \"a\"]\n1. e4 *", "[Event \"b\"]\n1. d4 *"]);
/// ```
pub fn split_games(text: &str) -> Vec<&str> {
    let starts = text.match_indices(GAME_START).map(|(at, _)| at).collect_vec();
    if starts.is_empty() {
        let text = text.trim();
        return if text.is_empty() { vec![] } else { vec![text] };
    }

    starts
        .iter()
        .copied()
        .zip(starts.iter().skip(1).copied().chain([text.len()]))
        .map(|(start, end)| text[start..end].trim())
        .collect()
}

/// Separates the leading tag pairs of a game from its move text.
///
/// ```
/// # use pgn_tree::pgn::split_tags_and_moves;
/// let (tags, moves) = split_tags_and_moves("[Event \"a\"]\n\n1. e4 *");
/// assert_eq!(tags, Some("[Event \"a\"]\n\n"));
/// assert_eq!(moves, "1. e4 *");
///
/// assert_eq!(split_tags_and_moves(" 1. e4 *"), (None, "1. e4 *"));
/// ```
pub fn split_tags_and_moves(block: &str) -> (Option<&str>, &str) {
    match grammar::tag_block(block) {
        Ok((moves, tags)) => (Some(tags), moves.trim()),
        Err(_) => (None, block.trim()),
    }
}

/// Reads every tag pair of a tag block. The last one wins when a key repeats.
pub fn extract_tags(tag_block: &str) -> BTreeMap<String, String> {
    let pairs = match grammar::tag_pairs(tag_block) {
        Ok((_, pairs)) => pairs,
        Err(_) => return BTreeMap::new(),
    };
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

/// Builds a game from its tags and move text.
///
/// Comments in front of the first move belong to the game. Every root line is played from a
/// fresh board: the position of the `FEN` tag if there is one, the standard position otherwise.
pub fn build_game(tags: BTreeMap<String, String>, moves: &str) -> Result<Game, BoardError> {
    let (moves, leading) = match grammar::comments(moves) {
        Ok((rest, leading)) => (rest, leading),
        Err(_) => (moves, vec![]),
    };
    let (comment, annotations) = merge_comments(&leading);

    let fresh_board = || match tags.get("FEN") {
        Some(fen) => fen.parse::<Board>(),
        None => Ok(Board::default()),
    };

    let mut nodes = Vec::new();
    for line in split_root_variations(moves) {
        nodes.extend(parse_move_tree(line, fresh_board()?)?);
    }

    Ok(Game {
        tags,
        comment,
        annotations,
        nodes,
    })
}

/// The line itself, then every alternative to its first move, each expanded the same way.
///
/// Alternatives are written after the move they replace, so the parser cannot attach the ones
/// for the very first move to a parent node.
///
/// ```
/// # use pgn_tree::pgn::split_root_variations;
/// assert_eq!(
///     split_root_variations("1. e4 (1. d4 d5) (1. c4) e5 *"),
///     ["1. e4 (1. d4 d5) (1. c4) e5 *", "1. d4 d5", "1. c4"]
/// );
/// ```
pub fn split_root_variations(text: &str) -> Vec<&str> {
    let Ok((rest, _)) = grammar::move_token(text) else {
        return vec![];
    };
    let (_, alternatives) = split_variations(rest);

    std::iter::once(text.trim())
        .chain(
            alternatives
                .into_iter()
                .flat_map(split_root_variations),
        )
        .collect()
}

/// One move of a line, before its node is built.
struct Ply<'a> {
    token: grammar::MoveToken<'a>,
    uci: String,
    position_after: String,
    /// alternatives to this move, which hang off the previous node
    alternatives: Vec<&'a str>,
}

/// Builds the tree of the line starting at `text`, playing its moves on `board`.
///
/// Alternatives written right after the first move are skipped: they belong to whoever holds the
/// previous move. Returns `None` once no move is left.
///
/// The line itself is walked in a loop, only alternatives recurse.
pub fn parse_move_tree(text: &str, mut board: Board) -> Result<Option<Node>, BoardError> {
    let mut plies = Vec::new();
    let mut rest = text;
    loop {
        let Ok((after, token)) = grammar::move_token(rest) else {
            note_leftover(rest);
            break;
        };
        let Some(played) = board.apply(token.san)? else {
            note_leftover(rest);
            break;
        };
        let (after, alternatives) = split_variations(after);
        plies.push(Ply {
            token,
            uci: played.uci(),
            position_after: board.to_string(),
            alternatives,
        });
        rest = after;
    }

    let mut next: Option<Node> = None;
    let mut next_alternatives = Vec::new();
    while let Some(ply) = plies.pop() {
        let mut variations = Vec::new();
        variations.extend(next.take());
        for line in next_alternatives.into_iter().flat_map(split_root_variations) {
            variations.extend(parse_move_tree(line, ply.position_after.parse()?)?);
        }

        let (comment, annotations) = merge_comments(&ply.token.comments);
        next_alternatives = ply.alternatives;
        next = Some(Node {
            san: ply.token.san.to_owned(),
            uci: ply.uci,
            position_after: ply.position_after,
            nag: ply.token.nag,
            comment,
            annotations,
            variations,
        });
    }

    Ok(next)
}

/// Strips the parenthesized variations at the start of `text`.
///
/// ```
/// # use pgn_tree::pgn::split_variations;
/// assert_eq!(
///     split_variations("(var1) (var2) something"),
///     ("something", vec!["var1", "var2"])
/// );
/// ```
pub fn split_variations(text: &str) -> (&str, Vec<&str>) {
    let mut rest = text.trim_start();
    let mut variations = Vec::new();

    while let Some(variation) = next_variation(rest) {
        variations.push(variation);
        rest = rest[variation.len() + 2..].trim_start();
    }

    (rest, variations)
}

/// Returns the inside of the parenthesized group `text` starts with. Parentheses within
/// `{...}` comments are ignored. `None` when `text` does not start with `(` or the group is never
/// closed.
///
/// ```
/// # use pgn_tree::pgn::next_variation;
/// assert_eq!(next_variation("(123 { 45 (67) } 8. 9) 10"), Some("123 { 45 (67) } 8. 9"));
/// assert_eq!(next_variation("(1. e4"), None);
/// ```
pub fn next_variation(text: &str) -> Option<&str> {
    if !text.starts_with('(') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_comment = false;
    for (at, c) in text.char_indices() {
        match c {
            '{' => in_comment = true,
            '}' => in_comment = false,
            '(' if !in_comment => depth += 1,
            ')' if !in_comment => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[1..at]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Reads the annotation commands of a comment, with or without its braces.
///
/// ```
/// # use pgn_tree::pgn::build_annotations;
/// let annotations = build_annotations("{ [%csl Rd4][%cal Gd4c5] }");
/// assert_eq!(annotations["csl"], ["Rd4"]);
/// assert_eq!(annotations["cal"], ["Gd4c5"]);
/// assert!(build_annotations("{ just text }").is_empty());
/// ```
pub fn build_annotations(comment: &str) -> Annotations {
    let comment = comment.trim();
    let inner = comment.strip_prefix('{').unwrap_or(comment);
    let inner = inner.strip_suffix('}').unwrap_or(inner);
    grammar::split_comment(inner).1
}

/// Joins the text of several comments and collects all their annotations.
fn merge_comments(comments: &[&str]) -> (Option<String>, Annotations) {
    let mut texts = Vec::new();
    let mut annotations = Annotations::new();
    for comment in comments {
        let (text, found) = grammar::split_comment(comment);
        texts.extend(text);
        for (key, values) in found {
            annotations.entry(key).or_default().extend(values);
        }
    }

    let text = (!texts.is_empty()).then(|| texts.join(" "));
    (text, annotations)
}

fn note_leftover(text: &str) {
    let text = text.trim();
    if text.is_empty() || TERMINATION_MARKERS.contains(&text) {
        trace!(marker = text, "end of line");
    } else {
        warn!(dropped = text, "move text is not a move, dropping the rest of the line");
    }
}
