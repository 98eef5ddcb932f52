//! GNU Backgammon（gnubg）とのブリッジ
//!
//! - `notation`: gnubg 形式の指し手表記（`bar/22 13/8*(2)` など）の解析と整形
//! - `resolve`: 省略表記を出目の組み合わせ探索で単一出目の手に展開する
//! - `encoding`: simple board（26整数）と Position ID（80ビット）の相互変換
//! - `command`: gnubg に渡すコマンド列の組み立て
//! - `output`: gnubg の出力（評価値・候補手・キューブ判断）の解析
//! - `bot`: 候補手リストから実際に指せる手を選ぶ

pub mod bot;
pub mod command;
pub mod encoding;
pub mod notation;
pub mod output;
pub mod resolve;

pub use bot::choose_move;
pub use command::{AnalysisKind, AnalysisSettings};
pub use encoding::{
    EncodingError, SimpleBoard, decode_position_id, encode_position_id, format_simple_board,
    parse_simple_board, to_simple_board,
};
pub use notation::{NotationError, NotationSegment, format_moves, format_played, parse_notation};
pub use output::{
    CubeDecision, CubeRecommendation, MoveAnalysis, PositionEvaluation, parse_cube_decision,
    parse_evaluation, parse_move_analysis,
};
pub use resolve::{ResolvedNotation, pick_playable, resolve_notation};
