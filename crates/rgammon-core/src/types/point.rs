//! 地点（Point）と指し手の端点（Location）

use serde::{Deserialize, Serialize};

use super::Color;

/// 盤上の地点数
pub const NUM_POINTS: usize = 24;

/// 1地点のチェッカー山
///
/// 空でない限り単一の色のチェッカーのみを持つ。色は空のとき `None`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    position: u8,
    count: u8,
    color: Option<Color>,
}

impl Point {
    /// 空の地点を生成（position は 1〜24）
    pub const fn empty(position: u8) -> Self {
        Point {
            position,
            count: 0,
            color: None,
        }
    }

    #[inline]
    pub const fn position(&self) -> u8 {
        self.position
    }

    #[inline]
    pub const fn count(&self) -> u8 {
        self.count
    }

    #[inline]
    pub const fn color(&self) -> Option<Color> {
        self.color
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// ブロット（1枚だけの地点）か
    #[inline]
    pub const fn is_blot(&self) -> bool {
        self.count == 1
    }

    /// 指定色のチェッカーが1枚以上あるか
    #[inline]
    pub fn is_owned_by(&self, color: Color) -> bool {
        self.count > 0 && self.color == Some(color)
    }

    /// 指定色が着地できるか（空・自駒・相手のブロット）
    #[inline]
    pub fn is_open_for(&self, color: Color) -> bool {
        match self.color {
            None => true,
            Some(c) if c == color => true,
            Some(_) => self.count <= 1,
        }
    }

    /// 相手のブロットを打てる地点か
    #[inline]
    pub fn is_hittable_by(&self, color: Color) -> bool {
        self.count == 1 && self.color == Some(color.opponent())
    }

    /// チェッカーを1枚積む。異なる色が積まれることはない。
    pub(crate) fn push(&mut self, color: Color) {
        debug_assert!(
            self.color.is_none() || self.color == Some(color),
            "mixed colors on point {}",
            self.position
        );
        self.color = Some(color);
        self.count += 1;
    }

    /// チェッカーを1枚取り除き、その色を返す
    pub(crate) fn pop(&mut self) -> Option<Color> {
        let color = self.color?;
        self.count -= 1;
        if self.count == 0 {
            self.color = None;
        }
        Some(color)
    }

    /// 地点の中身を直接設定する（局面の読み込み用）
    pub(crate) fn set(&mut self, color: Color, count: u8) {
        self.count = count;
        self.color = if count == 0 { None } else { Some(color) };
    }

    pub(crate) fn clear(&mut self) {
        self.count = 0;
        self.color = None;
    }
}

/// 指し手の端点
///
/// バー・盤上の地点・ベアオフ済みの3種類。番兵値（0/25）による分岐を避けるために使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Bar,
    Point(u8),
    Off,
}

impl Location {
    /// 地点番号（盤上のときのみ）
    #[inline]
    pub const fn point(self) -> Option<u8> {
        match self {
            Location::Point(p) => Some(p),
            _ => None,
        }
    }

    /// 手番視点の距離（バー = 25, ベアオフ = 0）
    #[inline]
    pub const fn relative_distance(self, color: Color) -> u8 {
        match self {
            Location::Bar => 25,
            Location::Point(p) => color.relative(p),
            Location::Off => 0,
        }
    }

    /// 手番視点の距離から端点に戻す
    pub const fn from_relative(color: Color, rel: i16) -> Location {
        if rel >= 25 {
            Location::Bar
        } else if rel <= 0 {
            Location::Off
        } else {
            Location::Point(color.relative(rel as u8))
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Bar => write!(f, "bar"),
            Location::Point(p) => write!(f, "{p}"),
            Location::Off => write!(f, "off"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_push_pop() {
        let mut p = Point::empty(6);
        assert!(p.is_empty());
        p.push(Color::White);
        assert!(p.is_blot());
        assert_eq!(p.color(), Some(Color::White));
        p.push(Color::White);
        assert_eq!(p.count(), 2);
        assert_eq!(p.pop(), Some(Color::White));
        assert_eq!(p.pop(), Some(Color::White));
        assert_eq!(p.color(), None);
        assert_eq!(p.pop(), None);
    }

    #[test]
    fn test_point_open_for() {
        let mut p = Point::empty(10);
        assert!(p.is_open_for(Color::Red));
        p.push(Color::White);
        assert!(p.is_open_for(Color::Red));
        assert!(p.is_hittable_by(Color::Red));
        assert!(!p.is_hittable_by(Color::White));
        p.push(Color::White);
        assert!(!p.is_open_for(Color::Red));
        assert!(p.is_open_for(Color::White));
    }

    #[test]
    fn test_location_relative() {
        assert_eq!(Location::Bar.relative_distance(Color::Red), 25);
        assert_eq!(Location::Off.relative_distance(Color::White), 0);
        assert_eq!(Location::Point(8).relative_distance(Color::Red), 17);
        assert_eq!(Location::from_relative(Color::Red, 17), Location::Point(8));
        assert_eq!(Location::from_relative(Color::White, -2), Location::Off);
        assert_eq!(Location::from_relative(Color::White, 25), Location::Bar);
    }
}
