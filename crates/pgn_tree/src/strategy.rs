//! Geometric candidate source squares per piece kind.
//!
//! Occupancy and blocking pieces are ignored here; [`Board`](crate::Board) filters the
//! candidates by what actually stands on them.

use either::Either;
use tinyvec::{ArrayVec, ArrayVecIterator};

use crate::{PieceKind, Player, Square};

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-1, -2),
    (1, -2),
    (-2, -1),
    (2, -1),
    (-2, 1),
    (2, 1),
    (-1, 2),
    (1, 2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const ROOK_RAYS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const BISHOP_RAYS: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
const QUEEN_RAYS: [(i8, i8); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Every square from which a piece of `kind` and color `player` could reach `target` in one move
/// on an empty board.
///
/// ```
/// # use pgn_tree::*;
/// let target: Square = "e4".parse().unwrap();
/// let sources = candidate_sources(PieceKind::Pawn, target, Player::White)
///     .map(|square| square.to_string())
///     .collect::<Vec<_>>();
/// assert_eq!(sources, ["e3", "d3", "f3", "e2"]);
/// ```
pub fn candidate_sources(
    kind: PieceKind,
    target: Square,
    player: Player,
) -> impl Iterator<Item = Square> {
    match kind {
        PieceKind::Pawn => Either::Left(Either::Left(pawn_sources(target, player))),
        PieceKind::Knight => Either::Left(Either::Right(Jumps::new(target, &KNIGHT_JUMPS))),
        PieceKind::King => Either::Left(Either::Right(Jumps::new(target, &KING_STEPS))),
        PieceKind::Bishop => Either::Right(Rays::new(target, &BISHOP_RAYS)),
        PieceKind::Rook => Either::Right(Rays::new(target, &ROOK_RAYS)),
        PieceKind::Queen => Either::Right(Rays::new(target, &QUEEN_RAYS)),
    }
}

/// single push, both captures and, on the double push rank, the double push
fn pawn_sources(target: Square, player: Player) -> ArrayVecIterator<[Square; 4]> {
    let back = -player.forward();
    let mut sources: ArrayVec<[Square; 4]> = ArrayVec::default();
    sources.extend(
        [(0, back), (-1, back), (1, back)]
            .into_iter()
            .filter_map(|offset| target + offset),
    );
    if target.rank() == player.double_push_rank() {
        sources.extend(target + (0, 2 * back));
    }
    sources.into_iter()
}

/// fixed offsets around the target
#[derive(Debug, Clone)]
struct Jumps {
    target: Square,
    offsets: std::slice::Iter<'static, (i8, i8)>,
}

impl Jumps {
    fn new(target: Square, offsets: &'static [(i8, i8)]) -> Self {
        Self {
            target,
            offsets: offsets.iter(),
        }
    }
}

impl Iterator for Jumps {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        let target = self.target;
        self.offsets.by_ref().find_map(|&offset| target + offset)
    }
}

/// walks outwards from the target along each direction until leaving the board
#[derive(Debug, Clone)]
struct Rays {
    target: Square,
    directions: &'static [(i8, i8)],
    step: i8,
}

impl Rays {
    fn new(target: Square, directions: &'static [(i8, i8)]) -> Self {
        Self {
            target,
            directions,
            step: 0,
        }
    }
}

impl Iterator for Rays {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&(df, dr)) = self.directions.first() {
            self.step += 1;
            match self.target + (df * self.step, dr * self.step) {
                Some(square) => return Some(square),
                None => {
                    self.directions = &self.directions[1..];
                    self.step = 0;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    fn sources(kind: PieceKind, target: &str, player: Player) -> Vec<String> {
        candidate_sources(kind, target.parse().unwrap(), player)
            .map(|square| square.to_string())
            .sorted()
            .collect()
    }

    macro_rules! candidates {
        ($name:ident, $kind:ident $player:ident on $target:literal => [$($square:literal),*]) => {
            #[test]
            fn $name() {
                let mut expected: Vec<String> = vec![$($square.to_string()),*];
                expected.sort();
                assert_eq!(sources(PieceKind::$kind, $target, Player::$player), expected);
            }
        };
    }

    candidates!(white_pawn_double_push_rank, Pawn White on "e4" => ["e2", "e3", "d3", "f3"]);
    candidates!(white_pawn_on_edge, Pawn White on "h5" => ["g4", "h4"]);
    candidates!(white_pawn_promotion, Pawn White on "g8" => ["f7", "g7", "h7"]);
    candidates!(black_pawn_double_push_rank, Pawn Black on "d5" => ["d7", "d6", "c6", "e6"]);
    candidates!(black_pawn_capture, Pawn Black on "e4" => ["d5", "e5", "f5"]);
    candidates!(black_pawn_promotion, Pawn Black on "a1" => ["a2", "b2"]);
    candidates!(knight_center, Knight White on "f3" => ["d4", "e5", "g5", "h4", "d2", "e1", "g1", "h2"]);
    candidates!(knight_corner, Knight Black on "a8" => ["b6", "c7"]);
    candidates!(king_corner, King Black on "h8" => ["g8", "g7", "h7"]);
    candidates!(rook_corner, Rook White on "a1" => [
        "a2", "a3", "a4", "a5", "a6", "a7", "a8",
        "b1", "c1", "d1", "e1", "f1", "g1", "h1"
    ]);
    candidates!(bishop_center, Bishop White on "d4" => [
        "a1", "b2", "c3", "e5", "f6", "g7", "h8",
        "a7", "b6", "c5", "e3", "f2", "g1"
    ]);

    #[test]
    fn queen_is_rook_and_bishop() {
        for target in ["a1", "d4", "h5", "e8"] {
            let mut expected = sources(PieceKind::Rook, target, Player::White);
            expected.extend(sources(PieceKind::Bishop, target, Player::White));
            expected.sort();
            assert_eq!(sources(PieceKind::Queen, target, Player::Black), expected);
        }
    }

    #[test]
    fn never_yields_the_target() {
        let target: Square = "c6".parse().unwrap();
        for kind in [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ] {
            assert!(candidate_sources(kind, target, Player::White).all(|sq| sq != target));
        }
    }
}
