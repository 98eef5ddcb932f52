//! 局面表現モジュール
//!
//! - `Board`: 24地点の盤面（各地点は単色のチェッカー山）
//! - `Player`: 手番ごとのバー・ベアオフ済み枚数
//! - `Position`: コーデックとの受け渡しに使う読み取り専用のスナップショット
//!
//! 盤上・バー・ベアオフ済みの合計は各色とも常に `CHECKERS_PER_SIDE` 枚。

mod board;
mod player;

pub use board::Board;
pub use player::Player;

use serde::{Deserialize, Serialize};

use crate::types::{Color, DoublingCube};

/// 1色あたりのチェッカー数
pub const CHECKERS_PER_SIDE: u8 = 15;

/// 局面スナップショット
///
/// エンジン → コーデック → エンジンの受け渡しに使う。ダイスは振られていれば `Some`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub board: Board,
    /// バー上の枚数（`Color::index()` で引く）
    pub bar: [u8; Color::NUM],
    /// ベアオフ済みの枚数
    pub off: [u8; Color::NUM],
    pub side_to_move: Color,
    pub dice: Option<(u8, u8)>,
    pub cube: DoublingCube,
}

impl Default for Position {
    fn default() -> Self {
        Position::empty(Color::White)
    }
}

impl Position {
    /// チェッカーの無い局面
    pub fn empty(side_to_move: Color) -> Self {
        Position {
            board: Board::empty(),
            bar: [0; Color::NUM],
            off: [0; Color::NUM],
            side_to_move,
            dice: None,
            cube: DoublingCube::new(),
        }
    }

    /// 開始局面（White 手番、ダイス未ロール）
    pub fn standard() -> Self {
        Position {
            board: Board::standard(),
            ..Position::empty(Color::White)
        }
    }

    #[inline]
    pub fn bar(&self, color: Color) -> u8 {
        self.bar[color.index()]
    }

    #[inline]
    pub fn off(&self, color: Color) -> u8 {
        self.off[color.index()]
    }

    /// 盤上・バー・ベアオフ済みの合計
    pub fn checker_total(&self, color: Color) -> u32 {
        self.board.checkers_on_board(color) + self.bar(color) as u32 + self.off(color) as u32
    }

    /// 15枚に満たない色の不足分をベアオフ済みとして補う
    pub fn fill_missing_as_borne_off(&mut self) {
        for color in Color::ALL {
            let total = self.checker_total(color);
            if total < CHECKERS_PER_SIDE as u32 {
                self.off[color.index()] += (CHECKERS_PER_SIDE as u32 - total) as u8;
            }
        }
    }

    /// 15枚を超える色があれば (色, 枚数) を返す
    pub fn excess_checkers(&self) -> Option<(Color, u32)> {
        Color::ALL
            .into_iter()
            .map(|c| (c, self.checker_total(c)))
            .find(|&(_, total)| total > CHECKERS_PER_SIDE as u32)
    }

    /// 両色とも15枚ちょうどか
    pub fn is_complete(&self) -> bool {
        Color::ALL
            .iter()
            .all(|&c| self.checker_total(c) == CHECKERS_PER_SIDE as u32)
    }
}
