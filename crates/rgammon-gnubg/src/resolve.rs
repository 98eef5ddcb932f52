//! 省略表記の展開
//!
//! gnubg は `24/13` のように複数の出目をまとめた表記を使うので、残りの出目から
//! 区間ごとに最短の出目列を探して単一出目の手に展開する。

use log::debug;
use rgammon_core::{Color, GameEngine, Location, Move};
use smallvec::SmallVec;

use crate::notation::{BAR, NotationError, OFF, parse_notation};

type DiceSeq = SmallVec<[u8; 4]>;

/// 表記を展開した結果
///
/// `primary` は大きい目を先に使う展開。2つの目の順序が入れ替え可能な区間があれば、
/// 入れ替えた展開を `alternatives` に持つ。どれが実際に指せるかは盤面次第。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNotation {
    pub primary: Vec<Move>,
    pub alternatives: Vec<Vec<Move>>,
}

impl ResolvedNotation {
    /// primary から順に全候補
    pub fn candidates(&self) -> impl Iterator<Item = &[Move]> {
        std::iter::once(self.primary.as_slice())
            .chain(self.alternatives.iter().map(Vec::as_slice))
    }
}

/// 区間1つ分の展開
struct Edge {
    token: String,
    from: u8,
    dice: DiceSeq,
    swapped: Option<DiceSeq>,
}

/// `notation` を手番 `color` の残り出目 `dice` で展開する
pub fn resolve_notation(
    color: Color,
    notation: &str,
    dice: &[u8],
) -> Result<ResolvedNotation, NotationError> {
    let segments = parse_notation(notation)?;
    let mut pool: DiceSeq = dice.iter().copied().collect();
    let mut edges = Vec::new();

    for segment in &segments {
        for _ in 0..segment.repeat {
            for (from, to) in segment.edges() {
                let unresolvable = || NotationError::Unresolvable {
                    token: segment.token.clone(),
                    dice: pool.to_vec(),
                };
                let seq = shortest_sequence(from, to, &pool, Order::LargerFirst)
                    .or_else(|| overshooting_sequence(from, to, &pool))
                    .ok_or_else(unresolvable)?;
                let swapped = shortest_sequence(from, to, &pool, Order::SmallerFirst)
                    .filter(|alt| alt.len() == seq.len() && *alt != seq);
                for die in &seq {
                    if let Some(i) = pool.iter().position(|d| d == die) {
                        pool.remove(i);
                    }
                }
                edges.push(Edge {
                    token: segment.token.clone(),
                    from,
                    dice: seq,
                    swapped,
                });
            }
        }
    }

    let primary = expand(color, &edges, None)?;
    let alternatives = (0..edges.len())
        .filter(|&i| edges[i].swapped.is_some())
        .map(|i| expand(color, &edges, Some(i)))
        .collect::<Result<_, _>>()?;
    let resolved = ResolvedNotation {
        primary,
        alternatives,
    };
    debug!(
        "resolved '{notation}' for {color} with {dice:?}: {} moves, {} alternatives",
        resolved.primary.len(),
        resolved.alternatives.len()
    );
    Ok(resolved)
}

/// 区間列を単一出目の手に展開する。`swap` の区間だけ入れ替えた出目列を使う。
fn expand(
    color: Color,
    edges: &[Edge],
    swap: Option<usize>,
) -> Result<Vec<Move>, NotationError> {
    let mut moves = Vec::new();
    for (i, edge) in edges.iter().enumerate() {
        let dice = match (&edge.swapped, swap) {
            (Some(alt), Some(s)) if s == i => alt,
            _ => &edge.dice,
        };
        let mut cur = edge.from as i16;
        for &die in dice {
            let next = cur - die as i16;
            let from = Location::from_relative(color, cur);
            let to = Location::from_relative(color, next);
            let mv = Move::single(from, to, die).ok_or_else(|| NotationError::Unresolvable {
                token: edge.token.clone(),
                dice: dice.to_vec(),
            })?;
            moves.push(mv);
            cur = next;
        }
    }
    Ok(moves)
}

#[derive(Clone, Copy)]
enum Order {
    LargerFirst,
    SmallerFirst,
}

fn ordered_distinct(pool: &[u8], order: Order) -> DiceSeq {
    let mut values: DiceSeq = rgammon_core::types::distinct_dice(pool);
    match order {
        Order::LargerFirst => values.sort_unstable_by(|a, b| b.cmp(a)),
        Order::SmallerFirst => values.sort_unstable(),
    }
    values
}

fn without(pool: &[u8], die: u8) -> DiceSeq {
    rgammon_core::types::dice_without(pool, die)
}

/// `from` から `to` にちょうど到達する最短の出目列
///
/// 途中の着地点は盤上（1以上）でなければならない。
fn shortest_sequence(from: u8, to: u8, pool: &[u8], order: Order) -> Option<DiceSeq> {
    (1..=pool.len()).find_map(|len| {
        let mut seq = DiceSeq::new();
        exact_search(from as i16, to as i16, pool, len, order, &mut seq).then_some(seq)
    })
}

fn exact_search(
    cur: i16,
    target: i16,
    pool: &[u8],
    left: usize,
    order: Order,
    seq: &mut DiceSeq,
) -> bool {
    for die in ordered_distinct(pool, order) {
        let next = cur - die as i16;
        if left == 1 {
            if next == target {
                seq.push(die);
                return true;
            }
            continue;
        }
        if next <= target || next < 1 {
            continue;
        }
        seq.push(die);
        if exact_search(next, target, &without(pool, die), left - 1, order, seq) {
            return true;
        }
        seq.pop();
    }
    false
}

/// ベアオフ専用: ちょうどの区間を重ねたあと、最後の目だけ超過を許す
fn overshooting_sequence(from: u8, to: u8, pool: &[u8]) -> Option<DiceSeq> {
    if to != OFF || from == BAR {
        return None;
    }
    (1..=pool.len()).find_map(|len| {
        let mut seq = DiceSeq::new();
        overshoot_search(from as i16, pool, len, &mut seq).then_some(seq)
    })
}

fn overshoot_search(cur: i16, pool: &[u8], left: usize, seq: &mut DiceSeq) -> bool {
    for die in ordered_distinct(pool, Order::SmallerFirst) {
        let next = cur - die as i16;
        if left == 1 {
            if next < 0 {
                seq.push(die);
                return true;
            }
            continue;
        }
        if next < 1 {
            continue;
        }
        seq.push(die);
        if overshoot_search(next, &without(pool, die), left - 1, seq) {
            return true;
        }
        seq.pop();
    }
    false
}

/// 展開候補のうち、エンジンが実際に受け付ける最初のもの
pub fn pick_playable<'a>(
    engine: &GameEngine,
    resolved: &'a ResolvedNotation,
) -> Option<&'a [Move]> {
    resolved.candidates().find(|moves| {
        let mut scratch = engine.clone();
        moves.iter().all(|mv| scratch.execute_move(mv))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgammon_core::Position;

    #[test]
    fn test_single_die() {
        let r = resolve_notation(Color::White, "8/5 6/5", &[3, 1]).unwrap();
        assert_eq!(
            r.primary,
            vec![
                Move::Normal { from: 8, to: 5, die: 3 },
                Move::Normal { from: 6, to: 5, die: 1 },
            ]
        );
        assert!(r.alternatives.is_empty());
    }

    #[test]
    fn test_two_dice_larger_first_with_alternative() {
        let r = resolve_notation(Color::White, "24/13", &[6, 5]).unwrap();
        assert_eq!(
            r.primary,
            vec![
                Move::Normal { from: 24, to: 18, die: 6 },
                Move::Normal { from: 18, to: 13, die: 5 },
            ]
        );
        assert_eq!(
            r.alternatives,
            vec![vec![
                Move::Normal { from: 24, to: 19, die: 5 },
                Move::Normal { from: 19, to: 13, die: 6 },
            ]]
        );
    }

    #[test]
    fn test_doubles_and_repeat() {
        let r = resolve_notation(Color::White, "13/5(2)", &[4, 4, 4, 4]).unwrap();
        assert_eq!(r.primary.len(), 4);
        assert!(r.primary.iter().all(|mv| mv.die() == Some(4)));
        assert_eq!(r.primary[1], Move::Normal { from: 9, to: 5, die: 4 });
        assert!(r.alternatives.is_empty());
    }

    #[test]
    fn test_bear_off_with_oversized_die() {
        let r = resolve_notation(Color::White, "4/off", &[6, 2]).unwrap();
        // ちょうどの組み合わせが無いので、小さい方から超過する目を選ぶ
        assert_eq!(r.primary, vec![Move::BearOff { from: 4, die: 6 }]);

        let r = resolve_notation(Color::White, "5/off", &[2, 2, 2, 2]).unwrap();
        assert_eq!(
            r.primary,
            vec![
                Move::Normal { from: 5, to: 3, die: 2 },
                Move::Normal { from: 3, to: 1, die: 2 },
                Move::BearOff { from: 1, die: 2 },
            ]
        );
    }

    #[test]
    fn test_unresolvable_reports_dice() {
        let err = resolve_notation(Color::White, "13/8 13/8", &[5, 2]).unwrap_err();
        assert_eq!(
            err,
            NotationError::Unresolvable {
                token: "13/8".to_string(),
                dice: vec![2],
            }
        );
        assert!(matches!(
            resolve_notation(Color::White, "13/x", &[5, 2]),
            Err(NotationError::Syntax { .. })
        ));
    }

    #[test]
    fn test_bar_to_off_is_error() {
        // 単一出目の手にならない区間は手を落とさずエラーにする
        for color in Color::ALL {
            assert!(matches!(
                resolve_notation(color, "bar/off", &[6, 6, 6, 6]),
                Err(NotationError::Unresolvable { .. })
            ));
        }
    }

    #[test]
    fn test_pick_playable_uses_board() {
        // 7 が Red に塞がれているので 13/7/2 では指せず、13/8/2 になる
        let mut pos = Position::standard();
        pos.board.set(17, Color::Red, 1);
        pos.board.set(7, Color::Red, 2);
        pos.dice = Some((6, 5));
        let engine = GameEngine::from_position(&pos).unwrap();

        let r = resolve_notation(Color::White, "13/2", &[6, 5]).unwrap();
        assert_eq!(r.primary[0], Move::Normal { from: 13, to: 7, die: 6 });
        let moves = pick_playable(&engine, &r).unwrap();
        assert_eq!(
            moves,
            &[
                Move::Normal { from: 13, to: 8, die: 5 },
                Move::Normal { from: 8, to: 2, die: 6 },
            ]
        );

        let blocked = resolve_notation(Color::White, "13/7", &[6, 5]).unwrap();
        assert!(pick_playable(&engine, &blocked).is_none());
    }
}
