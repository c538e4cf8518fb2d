//! Plain text outline of a game: one row per line of play, alternatives indented below the line
//! they branch off.

use itertools::Itertools;
use pgn_tree::{Annotations, Game, Node};

const INDENT: &str = "  ";

/// Renders the title, the game comment and every line of the game.
pub fn outline(game: &Game) -> String {
    let mut rows = vec![game.tag("Event").unwrap_or("?").to_owned()];
    rows.extend(note(game.comment.as_deref(), &game.annotations));
    for node in &game.nodes {
        line(node, 0, &mut rows);
    }
    rows.iter().map(|row| format!("{row}\n")).collect()
}

/// `(move number, white to move)` of the move that led to `node`
fn move_number(node: &Node) -> (u32, bool) {
    let mut fields = node.position_after.split_whitespace().skip(1);
    let black_to_move = fields.next() == Some("b");
    let fullmove = fields.nth(3).and_then(|n| n.parse().ok()).unwrap_or(1u32);
    if black_to_move {
        (fullmove, true)
    } else {
        (fullmove.saturating_sub(1), false)
    }
}

fn note(comment: Option<&str>, annotations: &Annotations) -> Option<String> {
    let commands = annotations
        .iter()
        .map(|(key, values)| format!("[%{key} {}]", values.join(",")))
        .join("");
    let parts = comment.into_iter().chain((!commands.is_empty()).then_some(commands.as_str()));
    let note = parts.collect_vec();
    (!note.is_empty()).then(|| format!("{{ {} }}", note.join(" ")))
}

fn line(first: &Node, depth: usize, rows: &mut Vec<String>) {
    let mut tokens = Vec::new();
    let mut alternatives = Vec::new();

    for (i, node) in first.mainline().enumerate() {
        let (number, white) = move_number(node);
        let nag = node.nag.map(|nag| nag.glyph()).unwrap_or_default();
        tokens.push(match (white, i) {
            (true, _) => format!("{number}. {}{nag}", node.san),
            (false, 0) => format!("{number}... {}{nag}", node.san),
            (false, _) => format!("{}{nag}", node.san),
        });
        tokens.extend(note(node.comment.as_deref(), &node.annotations));
        alternatives.extend(node.alternatives());
    }

    rows.push(format!("{}{}", INDENT.repeat(depth), tokens.join(" ")));
    for alternative in alternatives {
        line(alternative, depth + 1, rows);
    }
}
