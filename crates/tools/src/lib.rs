//! rgammon のコマンドラインツール群
//!
//! - `sgf_replay`: 棋譜をリプレイして各ターン直前の局面を JSONL に書き出す
//! - `gnubg_script`: 局面から gnubg に流すコマンドスクリプトを作る
//! - `gnubg_parse`: gnubg の出力を JSON にする（候補手は実際の手に展開する）

pub mod common;
pub mod record_log;
