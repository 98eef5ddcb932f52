//! 局面スナップショットと SGF ヘッダの入出力

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::parser::{Node, escape, parse_main_line};
use super::{SgfError, letter_to_location, location_to_letter};
use crate::position::{CHECKERS_PER_SIDE, Position};
use crate::types::{Color, Dice, DoublingCube, Location};

/// 出力時の AP プロパティ
const APPLICATION: &str = concat!("rgammon:", env!("CARGO_PKG_VERSION"));

/// SGF のルートノードに載るヘッダ情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SgfHeader {
    pub application: Option<String>,
    /// マッチ長（0 = マネーゲーム）
    pub match_length: u32,
    pub game_number: u32,
    pub score_white: u32,
    pub score_red: u32,
    pub player_white: Option<String>,
    pub player_red: Option<String>,
    /// ルール（例: "Crawford"）
    pub rules: Option<String>,
    pub date: Option<NaiveDate>,
    /// 結果（例: "W+2", "B+1R"）
    pub result: Option<String>,
}

impl Default for SgfHeader {
    fn default() -> Self {
        SgfHeader {
            application: None,
            match_length: 0,
            game_number: 0,
            score_white: 0,
            score_red: 0,
            player_white: None,
            player_red: None,
            rules: None,
            date: None,
            result: None,
        }
    }
}

impl SgfHeader {
    /// ルートノードのプロパティ列（先頭の `;` は含まない）
    pub fn to_root_properties(&self) -> String {
        let mut out = String::from("FF[4]GM[6]CA[UTF-8]");
        let app = self.application.as_deref().unwrap_or(APPLICATION);
        out.push_str(&format!("AP[{}]", escape(app)));
        out.push_str(&format!(
            "MI[length:{}][game:{}][ws:{}][bs:{}]",
            self.match_length, self.game_number, self.score_white, self.score_red
        ));
        if let Some(name) = &self.player_white {
            out.push_str(&format!("PW[{}]", escape(name)));
        }
        if let Some(name) = &self.player_red {
            out.push_str(&format!("PB[{}]", escape(name)));
        }
        if let Some(rules) = &self.rules {
            out.push_str(&format!("RU[{}]", escape(rules)));
        }
        if let Some(date) = self.date {
            out.push_str(&format!("DT[{}]", date.format("%Y-%m-%d")));
        }
        if let Some(result) = &self.result {
            out.push_str(&format!("RE[{}]", escape(result)));
        }
        out
    }

    /// ルートノードから読み取る。未知のプロパティは無視する。
    pub fn from_node(node: &Node) -> Result<Self, SgfError> {
        if let Some(gm) = node.value("GM") {
            if gm.trim() != "6" {
                return Err(SgfError::invalid("GM", gm));
            }
        }

        let mut header = SgfHeader {
            application: node.value("AP").map(str::to_string),
            player_white: node.value("PW").map(str::to_string),
            player_red: node.value("PB").map(str::to_string),
            rules: node.value("RU").map(str::to_string),
            result: node.value("RE").map(str::to_string),
            ..SgfHeader::default()
        };

        if let Some(mi) = node.get("MI") {
            for entry in &mi.values {
                let Some((key, value)) = entry.split_once(':') else {
                    return Err(SgfError::invalid("MI", entry));
                };
                let parsed: u32 = value
                    .trim()
                    .parse()
                    .map_err(|_| SgfError::invalid("MI", entry))?;
                match key.trim() {
                    "length" => header.match_length = parsed,
                    "game" => header.game_number = parsed,
                    "ws" => header.score_white = parsed,
                    "bs" => header.score_red = parsed,
                    _ => {}
                }
            }
        }

        if let Some(dt) = node.value("DT") {
            let date = NaiveDate::parse_from_str(dt.trim(), "%Y-%m-%d")
                .map_err(|_| SgfError::invalid("DT", dt))?;
            header.date = Some(date);
        }
        Ok(header)
    }
}

/// 局面をヘッダ付きの SGF 文字列にする
pub fn export_position(position: &Position, header: &SgfHeader) -> String {
    format!("(;{};{})", header.to_root_properties(), setup_properties(position))
}

/// 局面設定ノードのプロパティ列（先頭の `;` は含まない）
pub(crate) fn setup_properties(position: &Position) -> String {
    let mut out = String::from("AE[a:y]");
    for color in Color::ALL {
        let mut values = String::new();
        for p in 1..=24u8 {
            let letter = location_to_letter(color, Location::Point(p));
            for _ in 0..position.board.count(p, color) {
                values.push_str(&format!("[{letter}]"));
            }
        }
        for _ in 0..position.bar(color) {
            values.push_str("[y]");
        }
        for _ in 0..position.off(color) {
            values.push_str("[z]");
        }
        if !values.is_empty() {
            out.push_str(match color {
                Color::White => "AW",
                Color::Red => "AB",
            });
            out.push_str(&values);
        }
    }
    out.push_str(&format!("PL[{}]", position.side_to_move.sgf_char()));
    if let Some((d1, d2)) = position.dice {
        out.push_str(&format!("DI[{d1}{d2}]"));
    }
    out.push_str(&format!("CV[{}]", position.cube.value()));
    if let Some(owner) = position.cube.owner() {
        out.push_str(&format!("CP[{}]", owner.sgf_char()));
    }
    out
}

/// SGF 文字列から局面とヘッダを読み取る
///
/// 開始局面から、最初の手番ノードより前にある局面設定プロパティを順に適用する。
/// 15枚に満たない色の不足分はベアオフ済みとみなし、超えた場合はエラー。
pub fn import_position(text: &str) -> Result<(Position, SgfHeader), SgfError> {
    let nodes = parse_main_line(text)?;
    let header = SgfHeader::from_node(&nodes[0])?;
    let mut position = Position::standard();
    for node in nodes.iter().take_while(|n| !is_move_node(n)) {
        apply_setup(&mut position, node)?;
    }
    finish_setup(&mut position)?;
    Ok((position, header))
}

pub(crate) fn is_move_node(node: &Node) -> bool {
    node.has("W") || node.has("B")
}

pub(crate) fn finish_setup(position: &mut Position) -> Result<(), SgfError> {
    position.fill_missing_as_borne_off();
    if let Some((color, count)) = position.excess_checkers() {
        return Err(SgfError::TooManyCheckers { color, count });
    }
    Ok(())
}

/// 局面設定プロパティ（AE/AW/AB/PL/DI/CV/CP）を適用する
pub(crate) fn apply_setup(position: &mut Position, node: &Node) -> Result<(), SgfError> {
    if let Some(ae) = node.get("AE") {
        for value in &ae.values {
            for letter in expand_letters("AE", value)? {
                match letter_to_location(Color::White, letter) {
                    Some(Location::Point(p)) => position.board.clear_point(p),
                    Some(Location::Bar) => position.bar = [0; Color::NUM],
                    Some(Location::Off) => position.off = [0; Color::NUM],
                    None => return Err(SgfError::invalid("AE", value)),
                }
            }
        }
        position.off = [0; Color::NUM];
    }

    for (ident, color) in [("AW", Color::White), ("AB", Color::Red)] {
        let Some(prop) = node.get(ident) else {
            continue;
        };
        for value in &prop.values {
            for letter in expand_letters(ident, value)? {
                let total = position.checker_total(color);
                if total >= CHECKERS_PER_SIDE as u32 {
                    return Err(SgfError::TooManyCheckers {
                        color,
                        count: total + 1,
                    });
                }
                match letter_to_location(color, letter) {
                    Some(Location::Point(p)) => {
                        let point = position.board.point(p);
                        if point.is_owned_by(color.opponent()) {
                            return Err(SgfError::invalid(ident, value));
                        }
                        let count = point.count();
                        position.board.set(p, color, count + 1);
                    }
                    Some(Location::Bar) => position.bar[color.index()] += 1,
                    Some(Location::Off) => position.off[color.index()] += 1,
                    None => return Err(SgfError::invalid(ident, value)),
                }
            }
        }
    }

    if let Some(pl) = node.value("PL") {
        let mut chars = pl.trim().chars();
        position.side_to_move = match (chars.next().and_then(Color::from_sgf_char), chars.next()) {
            (Some(color), None) => color,
            _ => return Err(SgfError::invalid("PL", pl)),
        };
    }

    if let Some(di) = node.value("DI") {
        position.dice = Some(parse_dice(di).ok_or_else(|| SgfError::invalid("DI", di))?);
    }

    if node.has("CV") || node.has("CP") {
        let value = match node.value("CV") {
            Some(cv) => cv.trim().parse::<u8>().map_err(|_| SgfError::invalid("CV", cv))?,
            None => position.cube.value(),
        };
        let owner = match node.value("CP") {
            Some(cp) => match cp.trim() {
                "c" | "C" | "" => None,
                "w" | "W" => Some(Color::White),
                "b" | "B" => Some(Color::Red),
                _ => return Err(SgfError::invalid("CP", cp)),
            },
            None => position.cube.owner(),
        };
        position.cube = DoublingCube::with_state(value, owner)
            .ok_or_else(|| SgfError::invalid("CV", &value.to_string()))?;
    }
    Ok(())
}

/// "31" のような2桁の出目
pub(crate) fn parse_dice(text: &str) -> Option<(u8, u8)> {
    let bytes = text.trim().as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    (Dice::is_valid_face(d1) && Dice::is_valid_face(d2)).then_some((d1, d2))
}

/// 単一文字または `a:c` 形式の範囲を文字列に展開する
fn expand_letters(ident: &str, value: &str) -> Result<Vec<char>, SgfError> {
    let value = value.trim();
    let mut chars = value.chars();
    match (chars.next(), chars.next(), chars.next(), chars.next()) {
        (Some(c), None, _, _) => Ok(vec![c]),
        (Some(lo), Some(':'), Some(hi), None) if lo <= hi => Ok((lo..=hi).collect()),
        _ => Err(SgfError::invalid(ident, value)),
    }
}
