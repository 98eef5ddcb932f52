//! 対局の状態と勝敗

use serde::{Deserialize, Serialize};

use crate::position::Board;
use crate::types::Color;

/// 終局理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// 15枚すべてベアオフした
    BorneOff,
    /// 投了
    Resigned,
    /// ダブルを拒否した
    CubeDropped,
    /// 没収（切断・時間切れなど外部からの判定）
    Forfeit,
}

/// 対局の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    NotStarted,
    InProgress,
    Finished { winner: Color, reason: EndReason },
}

impl GameStatus {
    #[inline]
    pub fn is_in_progress(&self) -> bool {
        matches!(self, GameStatus::InProgress)
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, GameStatus::Finished { .. })
    }

    pub fn winner(&self) -> Option<Color> {
        match self {
            GameStatus::Finished { winner, .. } => Some(*winner),
            _ => None,
        }
    }
}

/// 勝ちの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinType {
    Normal,
    Gammon,
    Backgammon,
}

impl WinType {
    /// キューブ値に掛ける倍率
    #[inline]
    pub const fn multiplier(self) -> u32 {
        match self {
            WinType::Normal => 1,
            WinType::Gammon => 2,
            WinType::Backgammon => 3,
        }
    }

    /// 終局局面から勝ちの種類を判定する
    ///
    /// 敗者が1枚もベアオフしていなければギャモン、さらにバーか勝者のホームに
    /// 敗者のチェッカーが残っていればバックギャモン。
    pub fn classify(board: &Board, winner: Color, loser_bar: u8, loser_off: u8) -> WinType {
        let loser = winner.opponent();
        if loser_off > 0 {
            return WinType::Normal;
        }
        let in_winner_home = winner
            .home_range()
            .any(|p| board.point(p).is_owned_by(loser));
        if loser_bar > 0 || in_winner_home {
            WinType::Backgammon
        } else {
            WinType::Gammon
        }
    }
}

/// 終局結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Color,
    pub loser: Color,
    pub reason: EndReason,
    pub win_type: WinType,
    pub cube_value: u8,
    /// 獲得点（キューブ値 × 倍率）
    pub points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_normal_when_loser_bore_off() {
        let board = Board::empty();
        assert_eq!(WinType::classify(&board, Color::White, 0, 3), WinType::Normal);
    }

    #[test]
    fn test_classify_gammon() {
        let mut board = Board::empty();
        board.set(12, Color::Red, 15);
        assert_eq!(WinType::classify(&board, Color::White, 0, 0), WinType::Gammon);
    }

    #[test]
    fn test_classify_backgammon() {
        let mut board = Board::empty();
        board.set(14, Color::Red, 14);
        board.set(4, Color::Red, 1);
        assert_eq!(WinType::classify(&board, Color::White, 0, 0), WinType::Backgammon);

        let mut board = Board::empty();
        board.set(14, Color::Red, 14);
        assert_eq!(WinType::classify(&board, Color::White, 1, 0), WinType::Backgammon);
    }

    #[test]
    fn test_classify_red_winner_home() {
        let mut board = Board::empty();
        board.set(20, Color::White, 1);
        board.set(10, Color::White, 14);
        assert_eq!(WinType::classify(&board, Color::Red, 0, 0), WinType::Backgammon);
    }

    #[test]
    fn test_multiplier() {
        assert_eq!(WinType::Normal.multiplier(), 1);
        assert_eq!(WinType::Gammon.multiplier(), 2);
        assert_eq!(WinType::Backgammon.multiplier(), 3);
    }
}
