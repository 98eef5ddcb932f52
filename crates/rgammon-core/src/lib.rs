//! rgammon-core: バックギャモンのルールエンジン
//!
//! - `types`: 手番・地点・ダイス・ダブリングキューブ・指し手などの基本型
//! - `position`: 盤面（24地点）とプレイヤー状態、コーデック受け渡し用の局面スナップショット
//! - `engine`: 対局の進行（ダイス・合法手判定・実行・巻き戻し・勝敗判定）
//! - `movegen`: 複数ダイスを連結した移動先の探索
//! - `sgf`: SGF形式（GM[6]）の局面・棋譜の入出力と棋譜リプレイ

pub mod engine;
pub mod movegen;
pub mod position;
pub mod sgf;
pub mod types;

pub use engine::{EndReason, GameEngine, GameError, GameResult, GameStatus, PlayedMove, WinType};
pub use movegen::{CombinedMove, CombinedMoveCalculator};
pub use position::{Board, Player, Position, CHECKERS_PER_SIDE};
pub use types::{Color, DoublingCube, Dice, Hop, Location, Move, Point};
