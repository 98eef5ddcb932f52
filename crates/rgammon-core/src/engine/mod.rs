//! 対局進行モジュール
//!
//! - `GameEngine`: ダイス・手の検証・実行・巻き戻し・合法手列挙・キューブ操作・勝敗判定
//! - `PlayedMove`: 巻き戻し用の直前状態を含む実行記録
//! - `GameStatus` / `GameResult` / `WinType`: 終局判定
//!
//! 不正な手は `bool` で報告し、`GameError` は状態の前提条件違反（未開始・終局後・
//! ダブル応答待ちなど）に限る。

mod error;
mod game;
mod result;

pub use error::GameError;
pub use game::{GameEngine, PlayedMove};
pub use result::{EndReason, GameResult, GameStatus, WinType};
