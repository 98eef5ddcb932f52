//! 対局進行のエラー
//!
//! 不正な手はエラーにしない（`is_valid_move` / `execute_move` が `false` を返す）。

use crate::types::Color;

/// 状態の前提条件違反
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// 対局が始まっていない
    #[error("Game has not started")]
    NotStarted,

    #[error("Game is already over")]
    GameOver,

    /// 1〜6 以外の出目
    #[error("Invalid die value: {0}")]
    InvalidDie(u8),

    /// キューブが相手持ち・上限、またはロール済み
    #[error("{0} cannot double now")]
    CannotDouble(Color),

    #[error("No double is pending")]
    NoPendingDouble,

    /// ダブルの応答待ちでロール・指し手はできない
    #[error("A double is pending")]
    DoublePending,

    /// 読み込んだ局面で15枚を超えた色がある
    #[error("{color} has {count} checkers")]
    TooManyCheckers { color: Color, count: u32 },
}
