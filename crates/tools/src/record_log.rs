//! 棋譜リプレイの JSONL 行
//!
//! 1行目に `meta`、各ターンに `turn`、最後に `result` を書く。

use rgammon_core::sgf::{CubeAction, GameRecord, SgfHeader, TurnSnapshot};
use rgammon_core::{Color, Position};
use rgammon_gnubg::command::native_commands;
use rgammon_gnubg::{
    AnalysisKind, AnalysisSettings, encode_position_id, format_moves, format_simple_board,
    to_simple_board,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct MetaLog<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub timestamp: String,
    pub source: String,
    pub header: &'a SgfHeader,
    pub turns: usize,
    pub start_position_id: String,
}

#[derive(Serialize)]
pub struct TurnLog {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub number: usize,
    pub color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dice: Option<(u8, u8)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cube_action: Option<CubeAction>,
    /// 手番視点の gnubg 表記
    pub moves: String,
    pub position_id: String,
    /// 手番視点の simple board
    pub simple_board: String,
    pub pip_white: u32,
    pub pip_red: u32,
    pub position_sgf: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gnubg_commands: Vec<String>,
}

#[derive(Serialize)]
pub struct ResultLog<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub result: Option<&'a str>,
    pub final_position_id: String,
    pub pip_white: u32,
    pub pip_red: u32,
    pub borne_off_white: u8,
    pub borne_off_red: u8,
}

pub fn meta_log<'a>(record: &'a GameRecord, source: &str, timestamp: String) -> MetaLog<'a> {
    MetaLog {
        kind: "meta",
        timestamp,
        source: source.to_string(),
        header: record.header(),
        turns: record.len(),
        start_position_id: encode_position_id(record.start()),
    }
}

/// ターンの行。`analysis` があれば、出目のあるターンに gnubg の候補手コマンドを付ける。
pub fn turn_log(turn: &TurnSnapshot, analysis: Option<&AnalysisSettings>) -> TurnLog {
    let position_id = encode_position_id(&turn.position);
    let gnubg_commands = match (analysis, turn.dice) {
        (Some(settings), Some(dice)) => {
            native_commands(&position_id, dice, AnalysisKind::Hint, settings)
        }
        _ => Vec::new(),
    };
    TurnLog {
        kind: "turn",
        number: turn.number,
        color: turn.color,
        dice: turn.dice,
        cube_action: turn.cube_action,
        moves: format_moves(turn.color, &turn.moves),
        simple_board: format_simple_board(&to_simple_board(&turn.position, turn.color)),
        pip_white: pip(&turn.position, Color::White),
        pip_red: pip(&turn.position, Color::Red),
        position_sgf: turn.position_sgf.clone(),
        position_id,
        gnubg_commands,
    }
}

pub fn result_log(record: &GameRecord) -> ResultLog<'_> {
    let last = record.final_position();
    ResultLog {
        kind: "result",
        result: record.header().result.as_deref(),
        final_position_id: encode_position_id(last),
        pip_white: pip(last, Color::White),
        pip_red: pip(last, Color::Red),
        borne_off_white: last.off(Color::White),
        borne_off_red: last.off(Color::Red),
    }
}

/// バー上のチェッカーは 25 点として数える
fn pip(position: &Position, color: Color) -> u32 {
    position.board.pip_count(color) + 25 * position.bar(color) as u32
}
