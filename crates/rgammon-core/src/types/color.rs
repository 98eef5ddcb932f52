//! 手番（Color）

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// 手番（白/赤）
///
/// White は 24 → 1 方向、Red は 1 → 24 方向に進む。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Red = 1,
}

impl Color {
    /// 手番の数
    pub const NUM: usize = 2;

    /// 全ての手番
    pub const ALL: [Color; 2] = [Color::White, Color::Red];

    /// 相手番を返す
    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Red,
            Color::Red => Color::White,
        }
    }

    /// インデックスとして使用（配列アクセス用）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 進行方向（地点番号の増減）
    #[inline]
    pub const fn direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Red => 1,
        }
    }

    /// インナーボード（ホーム）の地点範囲
    #[inline]
    pub const fn home_range(self) -> RangeInclusive<u8> {
        match self {
            Color::White => 1..=6,
            Color::Red => 19..=24,
        }
    }

    /// 指定地点がこの手番のホームか
    #[inline]
    pub const fn is_home(self, point: u8) -> bool {
        let rel = self.relative(point);
        rel >= 1 && rel <= 6
    }

    /// 絶対地点番号をこの手番から見た地点番号（1 = ベアオフ直前）に変換する。
    ///
    /// 自己逆写像なので、手番視点 → 絶対番号の変換にも同じ関数を使う。
    #[inline]
    pub const fn relative(self, point: u8) -> u8 {
        match self {
            Color::White => point,
            Color::Red => 25 - point,
        }
    }

    /// バーから出目 `die` でエントリーする地点
    #[inline]
    pub const fn entry_point(self, die: u8) -> u8 {
        self.relative(25 - die)
    }

    /// SGF / gnubg で使う手番文字
    #[inline]
    pub const fn sgf_char(self) -> char {
        match self {
            Color::White => 'W',
            Color::Red => 'B',
        }
    }

    /// SGF の手番文字から変換
    pub fn from_sgf_char(c: char) -> Option<Color> {
        match c.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'B' => Some(Color::Red),
            _ => None,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.opponent()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Red => write!(f, "Red"),
        }
    }
}
