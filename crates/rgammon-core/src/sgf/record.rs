//! 対局中に追記していく棋譜

use serde::{Deserialize, Serialize};

use super::location_to_letter;
use super::position::{SgfHeader, setup_properties};
use crate::engine::{EndReason, GameResult};
use crate::position::Position;
use crate::types::{Color, Move};

/// キューブ操作・投了のノード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CubeAction {
    Double,
    Take,
    Drop,
    Resign,
}

impl CubeAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            CubeAction::Double => "double",
            CubeAction::Take => "take",
            CubeAction::Drop => "drop",
            CubeAction::Resign => "resign",
        }
    }

    pub fn parse(text: &str) -> Option<CubeAction> {
        match text.trim().to_ascii_lowercase().as_str() {
            "double" => Some(CubeAction::Double),
            "take" => Some(CubeAction::Take),
            "drop" | "pass" => Some(CubeAction::Drop),
            "resign" => Some(CubeAction::Resign),
            _ => None,
        }
    }
}

/// 棋譜の書き出し
///
/// ターンごとに `;W[<d1><d2><from><to>...]` 形式のノードを追記する。
/// 座標は指した側の視点の文字。
#[derive(Debug, Clone, Default)]
pub struct GameLog {
    header: SgfHeader,
    setup: Option<String>,
    nodes: Vec<String>,
}

impl GameLog {
    pub fn new(header: SgfHeader) -> Self {
        GameLog {
            header,
            setup: None,
            nodes: Vec::new(),
        }
    }

    /// 開始局面以外から始める場合の局面設定ノード
    pub fn with_setup(mut self, position: &Position) -> Self {
        self.setup = Some(setup_properties(position));
        self
    }

    pub fn header(&self) -> &SgfHeader {
        &self.header
    }

    /// 追記済みのノード数
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 1ターン分の手を追記する。複合手は区間ごとに展開する。
    pub fn append_turn(&mut self, color: Color, dice: (u8, u8), moves: &[Move]) {
        let mut value = format!("{}{}", dice.0, dice.1);
        for mv in moves {
            for step in mv.steps() {
                value.push(location_to_letter(color, step.from()));
                value.push(location_to_letter(color, step.to()));
            }
        }
        self.nodes.push(format!(";{}[{value}]", color.sgf_char()));
    }

    pub fn append_cube_action(&mut self, color: Color, action: CubeAction) {
        self.nodes
            .push(format!(";{}[{}]", color.sgf_char(), action.as_str()));
    }

    /// 現時点の棋譜
    pub fn to_sgf(&self) -> String {
        let mut out = format!("(;{}", self.header.to_root_properties());
        if let Some(setup) = &self.setup {
            out.push(';');
            out.push_str(setup);
        }
        for node in &self.nodes {
            out.push_str(node);
        }
        out.push(')');
        out
    }

    /// 結果（RE）をヘッダに書き込み、棋譜を閉じる
    pub fn finalize(mut self, result: &GameResult) -> String {
        self.header.result = Some(result_string(result));
        self.to_sgf()
    }
}

/// RE プロパティの値（例: "W+2", "B+1R"）
pub fn result_string(result: &GameResult) -> String {
    let suffix = match result.reason {
        EndReason::Resigned => "R",
        EndReason::Forfeit => "F",
        EndReason::BorneOff | EndReason::CubeDropped => "",
    };
    format!("{}+{}{}", result.winner.sgf_char(), result.points, suffix)
}
