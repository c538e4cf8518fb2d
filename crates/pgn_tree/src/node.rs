//! The parsed move tree.

use std::{collections::BTreeMap, fmt::Display};

use serde::Serialize;

/// Annotation commands of a comment, e.g. `[%cal Gd4c5,Rd4d5]` becomes `cal => [Gd4c5, Rd4d5]`
pub type Annotations = BTreeMap<String, Vec<String>>;

/// A move quality glyph, written as a suffix like `!?` or as a numeric `$5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NagGlyph {
    /// `!`, `$1`
    GoodMove,
    /// `?`, `$2`
    Mistake,
    /// `!!`, `$3`
    BrilliantMove,
    /// `??`, `$4`
    Blunder,
    /// `!?`, `$5`
    SpeculativeMove,
    /// `?!`, `$6`
    DubiousMove,
}

impl NagGlyph {
    /// every glyph, in numeric order
    pub const ALL: [NagGlyph; 6] = [
        NagGlyph::GoodMove,
        NagGlyph::Mistake,
        NagGlyph::BrilliantMove,
        NagGlyph::Blunder,
        NagGlyph::SpeculativeMove,
        NagGlyph::DubiousMove,
    ];

    /// the suffix written after a move
    pub const fn glyph(self) -> &'static str {
        match self {
            NagGlyph::GoodMove => "!",
            NagGlyph::Mistake => "?",
            NagGlyph::BrilliantMove => "!!",
            NagGlyph::Blunder => "??",
            NagGlyph::SpeculativeMove => "!?",
            NagGlyph::DubiousMove => "?!",
        }
    }

    /// the name used in serialized trees
    pub const fn name(self) -> &'static str {
        match self {
            NagGlyph::GoodMove => "GOOD_MOVE",
            NagGlyph::Mistake => "MISTAKE",
            NagGlyph::BrilliantMove => "BRILLIANT_MOVE",
            NagGlyph::Blunder => "BLUNDER",
            NagGlyph::SpeculativeMove => "SPECULATIVE_MOVE",
            NagGlyph::DubiousMove => "DUBIOUS_MOVE",
        }
    }

    /// the number of the `$n` notation
    pub const fn numeric(self) -> u8 {
        match self {
            NagGlyph::GoodMove => 1,
            NagGlyph::Mistake => 2,
            NagGlyph::BrilliantMove => 3,
            NagGlyph::Blunder => 4,
            NagGlyph::SpeculativeMove => 5,
            NagGlyph::DubiousMove => 6,
        }
    }

    /// ```
    /// # use pgn_tree::NagGlyph;
    /// assert_eq!(NagGlyph::from_glyph("?!"), Some(NagGlyph::DubiousMove));
    /// assert_eq!(NagGlyph::from_glyph("!!!"), None);
    /// ```
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|nag| nag.glyph() == glyph)
    }

    /// looks a glyph up by its [`name`](NagGlyph::name)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|nag| nag.name() == name)
    }

    /// `$1` to `$6`. Other numeric annotations have no glyph.
    pub fn from_numeric(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|nag| nag.numeric() == n)
    }
}

impl Display for NagGlyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// One move of the tree together with everything that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// the move as written, including check marks
    pub san: String,
    /// coordinate notation of the move
    pub uci: String,
    /// position text after the move
    pub position_after: String,
    /// move quality glyph
    pub nag: Option<NagGlyph>,
    /// plain text of the comments after the move
    pub comment: Option<String>,
    /// annotation commands of the comments after the move
    pub annotations: Annotations,
    /// the moves that can follow. The first one is the main continuation, the others are
    /// alternatives to it.
    pub variations: Vec<Node>,
}

impl Node {
    /// The node followed by its main continuation, then that one's main continuation and so on.
    pub fn mainline(&self) -> Mainline<'_> {
        Mainline { next: Some(self) }
    }

    /// the alternatives to the main continuation
    pub fn alternatives(&self) -> &[Node] {
        self.variations.get(1..).unwrap_or_default()
    }

    /// number of nodes in this subtree, including this one
    pub fn size(&self) -> usize {
        1 + self.variations.iter().map(Node::size).sum::<usize>()
    }
}

/// Iterator over the main line, obtained by [`Node::mainline`] or [`Game::mainline`]
#[derive(Debug, Clone)]
pub struct Mainline<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Mainline<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.variations.first();
        Some(node)
    }
}

/// A parsed game: one chapter of a study.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// tag pairs of the header
    pub tags: BTreeMap<String, String>,
    /// comment written before the first move
    pub comment: Option<String>,
    /// annotations written before the first move
    pub annotations: Annotations,
    /// the first move of every root line. There is more than one only when the first move has
    /// alternatives.
    pub nodes: Vec<Node>,
}

impl Game {
    /// returns the value of a tag pair
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// the main line of the first root line
    pub fn mainline(&self) -> Mainline<'_> {
        Mainline {
            next: self.nodes.first(),
        }
    }
}
