//! 複数ダイスを連結した移動先の探索

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::position::Board;
use crate::types::{Color, DicePool, Hop, Hops, Location, Move, NUM_POINTS, dice_without, distinct_dice};

/// 2個以上の出目を連結して届く移動
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedMove {
    pub from: Location,
    /// 各区間の着地点と出目（最後が最終到達点）
    pub hops: Hops,
    /// 最終到達点で相手のブロットを打つか
    pub is_hit: bool,
}

impl CombinedMove {
    #[inline]
    pub fn to(&self) -> Location {
        self.hops.last().map_or(self.from, |h| h.to)
    }

    /// 経由地点（最終到達点を除く）
    pub fn intermediate_points(&self) -> SmallVec<[Location; 3]> {
        self.hops
            .iter()
            .take(self.hops.len().saturating_sub(1))
            .map(|h| h.to)
            .collect()
    }

    /// 使用する出目（使用順）
    pub fn dice_used(&self) -> DicePool {
        self.hops.iter().map(|h| h.die).collect()
    }

    /// エンジンで実行できる複合手に変換する
    pub fn to_move(&self) -> Move {
        Move::Compound {
            from: self.from,
            hops: self.hops.clone(),
        }
    }
}

/// 連結移動の探索器
///
/// 盤面は読むだけで変更しない。出目の集合は分岐ごとに消費済みの出目を除いた新しい列として渡す。
pub struct CombinedMoveCalculator<'a> {
    board: &'a Board,
    color: Color,
    /// 手番側のバー上の枚数
    on_bar: u8,
}

impl<'a> CombinedMoveCalculator<'a> {
    pub fn new(board: &'a Board, color: Color, on_bar: u8) -> Self {
        CombinedMoveCalculator {
            board,
            color,
            on_bar,
        }
    }

    /// `from` から2個以上の出目で届き、`single_targets`（1個の出目で届く地点）に含まれない移動先を探す
    ///
    /// 移動先ごとに最初に見つかった経路だけを返す。
    pub fn find(
        &self,
        from: Location,
        dice: &[u8],
        single_targets: &[Location],
    ) -> Vec<CombinedMove> {
        let mut results = Vec::new();
        match from {
            Location::Off => return results,
            Location::Bar if self.on_bar != 1 => return results,
            Location::Point(p) => {
                if self.on_bar > 0
                    || !Board::is_on_board(p as i16)
                    || !self.board.point(p).is_owned_by(self.color)
                {
                    return results;
                }
            }
            Location::Bar => {}
        }

        let pool: DicePool = dice.iter().copied().collect();
        let mut path = Hops::new();
        self.search(from, from, &pool, &mut path, single_targets, &mut results);
        results
    }

    fn search(
        &self,
        from: Location,
        current: Location,
        pool: &[u8],
        path: &mut Hops,
        single_targets: &[Location],
        results: &mut Vec<CombinedMove>,
    ) {
        for die in distinct_dice(pool) {
            let Some(next) = self.step(from, current, die) else {
                continue;
            };
            path.push(Hop { to: next, die });

            if path.len() >= 2
                && !single_targets.contains(&next)
                && !results.iter().any(|r: &CombinedMove| r.to() == next)
            {
                let is_hit = next
                    .point()
                    .is_some_and(|p| self.board.point(p).is_hittable_by(self.color));
                results.push(CombinedMove {
                    from,
                    hops: path.clone(),
                    is_hit,
                });
            }

            let rest = dice_without(pool, die);
            if next != Location::Off && !rest.is_empty() {
                self.search(from, next, &rest, path, single_targets, results);
            }
            path.pop();
        }
    }

    /// 1区間の移動。着地できなければ None。
    fn step(&self, from: Location, current: Location, die: u8) -> Option<Location> {
        let rel = current.relative_distance(self.color) as i16;
        let next_rel = rel - die as i16;
        if next_rel >= 1 {
            let to = self.color.relative(next_rel as u8);
            return self
                .board
                .point(to)
                .is_open_for(self.color)
                .then_some(Location::Point(to));
        }

        // ベアオフ: 動かしているチェッカーを現在地に数えた上で全員ホームか
        let highest = self.highest_other(from).max(rel as u8);
        if highest > 6 {
            return None;
        }
        (next_rel == 0 || highest == rel as u8).then_some(Location::Off)
    }

    /// 動かしているチェッカーを除いた、手番側の最も遠い占有地点（手番視点）
    fn highest_other(&self, from: Location) -> u8 {
        (1..=NUM_POINTS as u8)
            .rev()
            .find(|&rel| {
                let p = self.color.relative(rel);
                let mut count = self.board.count(p, self.color);
                if from == Location::Point(p) {
                    count = count.saturating_sub(1);
                }
                count > 0
            })
            .unwrap_or(0)
    }
}
