//! SGF（GM[6]）形式の入出力
//!
//! - `export_position` / `import_position`: 局面スナップショットとヘッダの相互変換
//! - `GameLog`: 対局中にターンごとのノードを追記していく棋譜
//! - `GameRecord`: 棋譜を1パスでリプレイし、各ターン直前の局面を保持する
//!
//! 地点は `a`〜`x` をその手番視点の 1〜24、`y` をバー、`z` をベアオフ済みとして表す。

mod parser;
mod position;
mod record;
mod replay;

pub use parser::{Node, Property, escape, parse_main_line};
pub use position::{SgfHeader, export_position, import_position};
pub use record::{CubeAction, GameLog, result_string};
pub use replay::{GameRecord, TurnSnapshot};

use crate::engine::GameError;
use crate::types::{Color, Location};

/// SGF の読み書きエラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SgfError {
    /// 括弧・角括弧の構文エラー
    #[error("SGF syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// プロパティ値の形式が不正
    #[error("Invalid value for {property}: '{value}'")]
    InvalidValue { property: String, value: String },

    /// 局面の組み立て後に15枚を超えた
    #[error("{color} has {count} checkers")]
    TooManyCheckers { color: Color, count: u32 },

    /// リプレイ中にエンジンが受け付けなかったターン
    #[error("Illegal turn {turn}: {message}")]
    IllegalTurn { turn: usize, message: String },

    #[error(transparent)]
    Game(#[from] GameError),
}

impl SgfError {
    pub(crate) fn invalid(property: &str, value: &str) -> Self {
        SgfError::InvalidValue {
            property: property.to_string(),
            value: value.to_string(),
        }
    }
}

/// 端点を手番視点の文字に変換する
pub fn location_to_letter(color: Color, location: Location) -> char {
    match location {
        Location::Bar => 'y',
        Location::Off => 'z',
        Location::Point(p) => (b'a' + color.relative(p) - 1) as char,
    }
}

/// 手番視点の文字を端点に変換する
pub fn letter_to_location(color: Color, letter: char) -> Option<Location> {
    match letter {
        'a'..='x' => {
            let rel = letter as u8 - b'a' + 1;
            Some(Location::Point(color.relative(rel)))
        }
        'y' => Some(Location::Bar),
        'z' => Some(Location::Off),
        _ => None,
    }
}
