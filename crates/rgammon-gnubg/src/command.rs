//! gnubg に渡すコマンド列

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encoding::{SimpleBoard, format_simple_board};

/// 評価の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// 探索の深さ（チェッカープレイ・キューブ判断とも）
    pub plies: u8,
    /// true なら評価・候補手では cubeful を切って速くし、キューブ判断では明示的に有効にする
    pub cubeful: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            plies: 2,
            cubeful: true,
        }
    }
}

/// 解析の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// 局面評価（`eval`）
    Evaluate,
    /// 候補手（`hint`）
    Hint,
    /// キューブ判断（`hint cube`）
    Cube,
}

impl AnalysisKind {
    pub const fn command(self) -> &'static str {
        match self {
            AnalysisKind::Evaluate => "eval",
            AnalysisKind::Hint => "hint",
            AnalysisKind::Cube => "hint cube",
        }
    }
}

impl std::str::FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eval" | "evaluate" => Ok(AnalysisKind::Evaluate),
            "hint" => Ok(AnalysisKind::Hint),
            "cube" => Ok(AnalysisKind::Cube),
            other => Err(format!("unknown analysis kind: {other}")),
        }
    }
}

fn setup_commands(settings: &AnalysisSettings) -> Vec<String> {
    vec![
        "set automatic game off".to_string(),
        "set automatic roll off".to_string(),
        format!("set evaluation chequerplay evaluation plies {}", settings.plies),
        format!("set evaluation cubedecision evaluation plies {}", settings.plies),
    ]
}

fn cubeful_commands(kind: AnalysisKind, settings: &AnalysisSettings) -> Vec<String> {
    if !settings.cubeful {
        return Vec::new();
    }
    match kind {
        AnalysisKind::Evaluate | AnalysisKind::Hint => {
            vec!["set evaluation chequerplay evaluation cubeful off".to_string()]
        }
        AnalysisKind::Cube => vec![
            "set evaluation chequerplay evaluation cubeful on".to_string(),
            "set evaluation cubedecision evaluation cubeful on".to_string(),
        ],
    }
}

/// 読み込み済みの局面に対する解析コマンド
pub fn analysis_commands(kind: AnalysisKind, settings: &AnalysisSettings) -> Vec<String> {
    let mut commands = setup_commands(settings);
    commands.extend(cubeful_commands(kind, settings));
    commands.push(kind.command().to_string());
    commands
}

pub fn evaluation_commands(settings: &AnalysisSettings) -> Vec<String> {
    analysis_commands(AnalysisKind::Evaluate, settings)
}

pub fn hint_commands(settings: &AnalysisSettings) -> Vec<String> {
    analysis_commands(AnalysisKind::Hint, settings)
}

pub fn cube_commands(settings: &AnalysisSettings) -> Vec<String> {
    analysis_commands(AnalysisKind::Cube, settings)
}

/// SGF ファイルの局面を読み込むコマンド
pub fn load_position_command(path: &Path) -> String {
    format!("load position {}", path.display())
}

/// SGF ファイルを読み込んでから解析する
pub fn sgf_commands(path: &Path, kind: AnalysisKind, settings: &AnalysisSettings) -> Vec<String> {
    let mut commands = vec![load_position_command(path)];
    commands.extend(analysis_commands(kind, settings));
    commands
}

/// Position ID と出目で局面を作ってから解析する
pub fn native_commands(
    position_id: &str,
    dice: (u8, u8),
    kind: AnalysisKind,
    settings: &AnalysisSettings,
) -> Vec<String> {
    let mut commands = setup_commands(settings);
    if settings.cubeful {
        commands.push("set evaluation chequerplay evaluation cubeful off".to_string());
    }
    commands.push("new game".to_string());
    commands.push(format!("set board {position_id}"));
    commands.push(format!("set dice {} {}", dice.0, dice.1));
    commands.push(kind.command().to_string());
    commands
}

pub fn set_board_simple_command(board: &SimpleBoard) -> String {
    format!("set board simple {}", format_simple_board(board))
}

/// 標準入力に流すスクリプト。末尾に `quit` を付ける。
pub fn script(commands: &[String]) -> String {
    let mut out = commands.join("\n");
    out.push_str("\nquit\n");
    out
}
