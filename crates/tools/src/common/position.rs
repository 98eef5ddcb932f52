//! コマンドラインから局面を組み立てる

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use rgammon_core::sgf::GameRecord;
use rgammon_core::{Color, Position};
use rgammon_gnubg::{decode_position_id, parse_simple_board};

use super::io::read_text;

/// 局面の指定方法（棋譜・Position ID・simple board のいずれか、省略時は開始局面）
#[derive(Args, Debug, Clone, Default)]
pub struct PositionArgs {
    /// 局面を取り出す棋譜（`-` で標準入力、`.gz` 可）
    #[arg(long, conflicts_with_all = ["position_id", "simple"])]
    pub sgf: Option<PathBuf>,

    /// 棋譜のターン番号（1始まり、そのターンの直前の局面）。省略時は最終局面
    #[arg(long, requires = "sgf")]
    pub turn: Option<usize>,

    /// gnubg の Position ID
    #[arg(long, conflicts_with = "simple")]
    pub position_id: Option<String>,

    /// 手番視点の simple board（26整数、空白またはカンマ区切り）
    #[arg(long, allow_hyphen_values = true)]
    pub simple: Option<String>,

    /// 手番（white / red）。Position ID・simple board・開始局面のとき使う
    #[arg(long, default_value = "white")]
    pub player: String,

    /// 出目（例: 31）。指定すると局面の出目を上書きする
    #[arg(long)]
    pub dice: Option<String>,
}

pub fn parse_player(text: &str) -> Result<Color> {
    match text.to_ascii_lowercase().as_str() {
        "white" | "w" | "o" => Ok(Color::White),
        "red" | "b" | "x" => Ok(Color::Red),
        other => bail!("unknown player '{other}' (expected white or red)"),
    }
}

/// `31` / `3 1` / `3,1` 形式の出目
pub fn parse_dice(text: &str) -> Result<(u8, u8)> {
    let digits: Vec<u8> = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect::<Option<_>>()
        .with_context(|| format!("invalid dice '{text}'"))?;
    match digits.as_slice() {
        [a, b] if (1..=6).contains(a) && (1..=6).contains(b) => Ok((*a, *b)),
        _ => bail!("dice must be two values 1-6: '{text}'"),
    }
}

impl PositionArgs {
    pub fn load(&self) -> Result<Position> {
        let mut position = self.load_board()?;
        if let Some(text) = &self.dice {
            position.dice = Some(parse_dice(text)?);
        }
        Ok(position)
    }

    fn load_board(&self) -> Result<Position> {
        let player = parse_player(&self.player)?;
        if let Some(path) = &self.sgf {
            let text =
                read_text(path).with_context(|| format!("failed to read {}", path.display()))?;
            let record = GameRecord::parse(&text)
                .with_context(|| format!("failed to replay {}", path.display()))?;
            return match self.turn {
                Some(n) => record
                    .get(n.wrapping_sub(1))
                    .map(|t| t.position.clone())
                    .with_context(|| format!("turn {n} not found ({} turns)", record.len())),
                None => Ok(record.final_position().clone()),
            };
        }
        if let Some(id) = &self.position_id {
            return Ok(decode_position_id(id, player)?);
        }
        if let Some(simple) = &self.simple {
            return Ok(parse_simple_board(simple, player)?);
        }
        Ok(Position {
            side_to_move: player,
            ..Position::standard()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dice_forms() {
        assert_eq!(parse_dice("31").unwrap(), (3, 1));
        assert_eq!(parse_dice("6, 6").unwrap(), (6, 6));
        assert!(parse_dice("7 1").is_err());
        assert!(parse_dice("315").is_err());
        assert!(parse_dice("a1").is_err());
    }

    #[test]
    fn test_load_from_record_turn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.sgf");
        std::fs::write(&path, "(;GM[6];W[31hefe];B[65xrrm])").unwrap();

        let args = PositionArgs {
            sgf: Some(path.clone()),
            turn: Some(2),
            player: "white".to_string(),
            ..PositionArgs::default()
        };
        let pos = args.load().unwrap();
        assert_eq!(pos.side_to_move, Color::Red);
        assert_eq!(pos.dice, Some((6, 5)));
        assert_eq!(pos.board.count(5, Color::White), 2);

        let missing = PositionArgs {
            turn: Some(9),
            ..args
        };
        assert!(missing.load().is_err());
    }

    #[test]
    fn test_load_position_id_with_dice() {
        let args = PositionArgs {
            position_id: Some("4HPwATDgc/ABMA".to_string()),
            player: "red".to_string(),
            dice: Some("42".to_string()),
            ..PositionArgs::default()
        };
        let pos = args.load().unwrap();
        assert_eq!(pos.side_to_move, Color::Red);
        assert_eq!(pos.dice, Some((4, 2)));
        assert_eq!(pos.board, Position::standard().board);
    }
}
