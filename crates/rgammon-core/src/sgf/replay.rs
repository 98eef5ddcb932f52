//! 棋譜のリプレイ

use log::{debug, warn};
use serde::Serialize;

use super::parser::{Node, parse_main_line};
use super::position::{
    SgfHeader, apply_setup, export_position, finish_setup, is_move_node, parse_dice,
};
use super::{CubeAction, SgfError, letter_to_location};
use crate::engine::{GameEngine, GameError};
use crate::position::Position;
use crate::types::{Color, Location, Move};

/// 1ターン（またはキューブ操作）の記録と、その直前の局面
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnSnapshot {
    /// 1始まりのノード番号
    pub number: usize,
    pub color: Color,
    pub dice: Option<(u8, u8)>,
    /// 実行した単一出目の手
    pub moves: Vec<Move>,
    pub cube_action: Option<CubeAction>,
    /// このターン直前の局面（出目を含む）
    pub position: Position,
    /// `position` の SGF 表現
    pub position_sgf: String,
}

/// リプレイ済みの棋譜
///
/// 1つのエンジンで全ターンを順に適用して作る。作成後は変更しない。
#[derive(Debug, Clone)]
pub struct GameRecord {
    header: SgfHeader,
    start: Position,
    turns: Vec<TurnSnapshot>,
    final_position: Position,
}

impl GameRecord {
    /// 棋譜を読み取り、全ターンをリプレイする
    pub fn parse(text: &str) -> Result<GameRecord, SgfError> {
        let nodes = parse_main_line(text)?;
        let header = SgfHeader::from_node(&nodes[0])?;
        let first_move = nodes
            .iter()
            .position(is_move_node)
            .unwrap_or(nodes.len());

        let mut start = Position::standard();
        for node in &nodes[..first_move] {
            apply_setup(&mut start, node)?;
        }
        finish_setup(&mut start)?;

        let mut engine = GameEngine::from_position(&Position {
            dice: None,
            ..start.clone()
        })?;
        let snapshot_header = SgfHeader {
            result: None,
            ..header.clone()
        };

        let mut turns = Vec::new();
        for (idx, node) in nodes[first_move..].iter().enumerate() {
            let number = idx + 1;
            let Some((color, value)) = move_property(node) else {
                continue;
            };
            let turn = replay_node(&mut engine, &snapshot_header, number, color, value)
                .inspect_err(|e| warn!("replay stopped: {e}"))?;
            turns.push(turn);
        }
        debug!("replayed {} turns", turns.len());

        Ok(GameRecord {
            header,
            start,
            turns,
            final_position: engine.position(),
        })
    }

    pub fn header(&self) -> &SgfHeader {
        &self.header
    }

    /// 最初の手番ノード直前の局面
    pub fn start(&self) -> &Position {
        &self.start
    }

    pub fn turns(&self) -> &[TurnSnapshot] {
        &self.turns
    }

    /// 0始まりでターンを引く
    pub fn get(&self, index: usize) -> Option<&TurnSnapshot> {
        self.turns.get(index)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// 全ターン適用後の局面
    pub fn final_position(&self) -> &Position {
        &self.final_position
    }
}

fn move_property(node: &Node) -> Option<(Color, &str)> {
    node.value("W")
        .map(|v| (Color::White, v))
        .or_else(|| node.value("B").map(|v| (Color::Red, v)))
}

fn illegal(turn: usize, message: impl Into<String>) -> SgfError {
    SgfError::IllegalTurn {
        turn,
        message: message.into(),
    }
}

fn replay_node(
    engine: &mut GameEngine,
    header: &SgfHeader,
    number: usize,
    color: Color,
    value: &str,
) -> Result<TurnSnapshot, SgfError> {
    let to_illegal = |e: GameError| illegal(number, e.to_string());

    if let Some(action) = CubeAction::parse(value) {
        let before = engine.position();
        match action {
            CubeAction::Double => {
                engine.set_current_player(color);
                engine.offer_double().map_err(to_illegal)?;
            }
            CubeAction::Take => engine.accept_double().map_err(to_illegal)?,
            CubeAction::Drop => engine.decline_double().map_err(to_illegal)?,
            CubeAction::Resign => engine.resign(color).map_err(to_illegal)?,
        }
        return Ok(TurnSnapshot {
            number,
            color,
            dice: None,
            moves: Vec::new(),
            cube_action: Some(action),
            position_sgf: export_position(&before, header),
            position: before,
        });
    }

    let property = color.sgf_char().to_string();
    let (dice, pairs) = parse_turn(color, value).ok_or_else(|| SgfError::invalid(&property, value))?;

    engine.set_current_player(color);
    engine.set_dice(dice.0, dice.1).map_err(to_illegal)?;
    let before = engine.position();

    let mut moves = Vec::with_capacity(pairs.len());
    for (from, to) in pairs {
        let mv = resolve_pair(engine.remaining_dice(), color, from, to).ok_or_else(|| {
            illegal(
                number,
                format!("{from}/{to} does not match dice {:?}", engine.remaining_dice()),
            )
        })?;
        if !engine.execute_move(&mv) {
            return Err(illegal(number, format!("{mv} is not legal for {color}")));
        }
        moves.push(mv);
    }
    if engine.status().is_in_progress() {
        engine.end_turn().map_err(to_illegal)?;
    }

    Ok(TurnSnapshot {
        number,
        color,
        dice: Some(dice),
        moves,
        cube_action: None,
        position_sgf: export_position(&before, header),
        position: before,
    })
}

/// `31hefe` → 出目と (from, to) の列
fn parse_turn(color: Color, value: &str) -> Option<((u8, u8), Vec<(Location, Location)>)> {
    let value = value.trim();
    let dice = parse_dice(value.get(..2)?)?;
    let letters: Vec<char> = value.get(2..)?.chars().collect();
    if letters.len() % 2 != 0 {
        return None;
    }
    let pairs = letters
        .chunks(2)
        .map(|pair| {
            Some((
                letter_to_location(color, pair[0])?,
                letter_to_location(color, pair[1])?,
            ))
        })
        .collect::<Option<Vec<_>>>()?;
    Some((dice, pairs))
}

/// 移動距離から使用した出目を決める。ちょうどの目が無ければ、ベアオフに限り最小の大きい目。
fn resolve_pair(remaining: &[u8], color: Color, from: Location, to: Location) -> Option<Move> {
    let distance = from.relative_distance(color) as i16 - to.relative_distance(color) as i16;
    if distance <= 0 {
        return None;
    }
    let die = if remaining.contains(&(distance as u8)) {
        distance as u8
    } else if to == Location::Off {
        remaining
            .iter()
            .copied()
            .filter(|&d| d as i16 > distance)
            .min()?
    } else {
        return None;
    };
    Move::single(from, to, die)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_turn() {
        let (dice, pairs) = parse_turn(Color::Red, "65xr").unwrap();
        assert_eq!(dice, (6, 5));
        assert_eq!(pairs, vec![(Location::Point(1), Location::Point(7))]);
        assert!(parse_turn(Color::White, "6").is_none());
        assert!(parse_turn(Color::White, "65x").is_none());
        assert!(parse_turn(Color::White, "05ab").is_none());
    }

    #[test]
    fn test_resolve_pair_bear_off_oversize() {
        assert_eq!(
            resolve_pair(&[6, 2], Color::White, Location::Point(4), Location::Off),
            Some(Move::BearOff { from: 4, die: 6 })
        );
        assert_eq!(
            resolve_pair(&[5, 6], Color::White, Location::Point(4), Location::Off),
            Some(Move::BearOff { from: 4, die: 5 })
        );
        assert_eq!(
            resolve_pair(&[3], Color::White, Location::Point(8), Location::Point(4)),
            None
        );
        assert_eq!(
            resolve_pair(&[4], Color::Red, Location::Bar, Location::Point(4)),
            Some(Move::Enter { to: 4, die: 4 })
        );
    }

    #[test]
    fn test_replay_opening_turns() {
        let text = "(;FF[4]GM[6]PW[w]PB[r];W[31hefe];B[65xrrm];W[double];B[take])";
        let record = GameRecord::parse(text).unwrap();
        assert_eq!(record.len(), 4);

        let first = record.get(0).unwrap();
        assert_eq!(first.color, Color::White);
        assert_eq!(first.dice, Some((3, 1)));
        assert_eq!(first.position.board, Position::standard().board);
        assert_eq!(first.position.dice, Some((3, 1)));
        assert!(first.position_sgf.contains("DI[31]"));

        let second = record.get(1).unwrap();
        assert_eq!(second.position.board.count(5, Color::White), 2);
        assert_eq!(
            second.moves,
            vec![
                Move::Normal { from: 1, to: 7, die: 6 },
                Move::Normal { from: 7, to: 12, die: 5 },
            ]
        );

        let take = record.get(3).unwrap();
        assert_eq!(take.cube_action, Some(CubeAction::Take));
        assert_eq!(record.final_position().cube.value(), 2);
        assert_eq!(record.final_position().cube.owner(), Some(Color::Red));
    }

    #[test]
    fn test_replay_rejects_illegal_turn() {
        // White 13 → 10 に 6-5 の出目は合わない
        let err = GameRecord::parse("(;GM[6];W[31hefe];B[65xrrm];W[65mj])").unwrap_err();
        assert!(matches!(err, SgfError::IllegalTurn { turn: 3, .. }));

        // 19 は Red が塞いでいる
        let err = GameRecord::parse("(;GM[6];W[52xs])").unwrap_err();
        assert!(matches!(err, SgfError::IllegalTurn { turn: 1, .. }));
    }
}
