//! 盤面（24地点）

use serde::{Deserialize, Serialize};

use crate::types::{Color, NUM_POINTS, Point};

/// 24地点の盤面
///
/// バーとベアオフ済みの枚数は `Player` 側で持つ。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    points: [Point; NUM_POINTS],
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

/// 開始局面の配置（White 視点の地点, 枚数）。Red は鏡像。
const OPENING_LAYOUT: [(u8, u8); 4] = [(24, 2), (13, 5), (8, 3), (6, 5)];

impl Board {
    /// 空の盤面
    pub fn empty() -> Self {
        Board {
            points: std::array::from_fn(|i| Point::empty(i as u8 + 1)),
        }
    }

    /// 開始局面
    pub fn standard() -> Self {
        let mut board = Board::empty();
        for color in Color::ALL {
            for &(p, n) in &OPENING_LAYOUT {
                board.set(color.relative(p), color, n);
            }
        }
        board
    }

    /// 地点（1〜24）を参照する
    ///
    /// # Panics
    /// 範囲外の地点番号を渡した場合
    #[inline]
    pub fn point(&self, position: u8) -> &Point {
        &self.points[position as usize - 1]
    }

    /// 地点番号が盤上か
    #[inline]
    pub const fn is_on_board(position: i16) -> bool {
        position >= 1 && position <= NUM_POINTS as i16
    }

    #[inline]
    pub(crate) fn point_mut(&mut self, position: u8) -> &mut Point {
        &mut self.points[position as usize - 1]
    }

    /// 全地点（1 → 24 の順）
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// 指定地点にある指定色の枚数
    #[inline]
    pub fn count(&self, position: u8, color: Color) -> u8 {
        let point = self.point(position);
        if point.is_owned_by(color) { point.count() } else { 0 }
    }

    /// 地点の中身を置き換える（局面の組み立て用）
    pub fn set(&mut self, position: u8, color: Color, count: u8) {
        self.point_mut(position).set(color, count);
    }

    pub fn clear_point(&mut self, position: u8) {
        self.point_mut(position).clear();
    }

    pub fn clear(&mut self) {
        for point in &mut self.points {
            point.clear();
        }
    }

    /// 盤上にある指定色の枚数
    pub fn checkers_on_board(&self, color: Color) -> u32 {
        self.points
            .iter()
            .filter(|p| p.is_owned_by(color))
            .map(|p| p.count() as u32)
            .sum()
    }

    /// 指定色の最も遠い（手番視点で最大の）占有地点を、手番視点の番号で返す
    pub fn highest_relative(&self, color: Color) -> Option<u8> {
        (1..=NUM_POINTS as u8)
            .rev()
            .find(|&rel| self.point(color.relative(rel)).is_owned_by(color))
    }

    /// 盤上の指定色がすべてホームにあるか（バーは見ない）
    pub fn all_in_home(&self, color: Color) -> bool {
        self.highest_relative(color).is_none_or(|rel| rel <= 6)
    }

    /// ピップカウント（バーは含まない）
    pub fn pip_count(&self, color: Color) -> u32 {
        self.points
            .iter()
            .filter(|p| p.is_owned_by(color))
            .map(|p| color.relative(p.position()) as u32 * p.count() as u32)
            .sum()
    }
}
