//! 指し手探索
//!
//! 単一出目の合法手は `GameEngine::valid_moves` が列挙する。このモジュールは
//! 2個以上の出目を連結して初めて届く移動先をバックトラックで探す。

mod combined;

pub use combined::{CombinedMove, CombinedMoveCalculator};
