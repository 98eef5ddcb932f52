//! gnubg の局面エンコーディング
//!
//! - simple board: 手番視点の26整数（`set board simple ...` 用）
//! - Position ID: 各色の地点ごとの枚数を unary で並べた80ビットを base64 にしたもの

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use rgammon_core::{CHECKERS_PER_SIDE, Color, Position};

/// simple board の要素数
pub const SIMPLE_BOARD_LEN: usize = 26;

/// 手番視点の26整数
///
/// 0〜23 が手番視点の 1〜24 点（自分は正、相手は負）、24 が相手のバー（負）、25 が自分のバー。
pub type SimpleBoard = [i32; SIMPLE_BOARD_LEN];

/// Position ID のバイト数
const POSITION_ID_BYTES: usize = 10;
/// 各色のスロット数（24地点 + バー）
const SLOTS: usize = 25;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Simple board needs {SIMPLE_BOARD_LEN} values, got {0}")]
    WrongLength(usize),

    #[error("Invalid simple board value '{0}'")]
    InvalidNumber(String),

    #[error("Invalid value {value} at index {index}")]
    InvalidValue { index: usize, value: i32 },

    #[error("Invalid Position ID '{0}'")]
    InvalidBase64(String),

    #[error("Position ID ended before all points were read")]
    Truncated,

    #[error("Both sides occupy point {point}")]
    Overlap { point: u8 },

    #[error("{color} has {count} checkers")]
    TooManyCheckers { color: Color, count: u32 },
}

/// 局面を `mover` 視点の simple board にする
pub fn to_simple_board(position: &Position, mover: Color) -> SimpleBoard {
    let opponent = mover.opponent();
    let mut board = [0; SIMPLE_BOARD_LEN];
    for (i, slot) in board.iter_mut().take(24).enumerate() {
        let point = mover.relative(i as u8 + 1);
        *slot = position.board.count(point, mover) as i32
            - position.board.count(point, opponent) as i32;
    }
    board[24] = -(position.bar(opponent) as i32);
    board[25] = position.bar(mover) as i32;
    board
}

/// 空白区切りの文字列にする
pub fn format_simple_board(board: &SimpleBoard) -> String {
    board
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// simple board を `mover` 手番の局面にする
///
/// 空白またはカンマ区切り。15枚に足りない分はベアオフ済みとして扱う。
pub fn parse_simple_board(text: &str, mover: Color) -> Result<Position, EncodingError> {
    let values = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| EncodingError::InvalidNumber(s.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() != SIMPLE_BOARD_LEN {
        return Err(EncodingError::WrongLength(values.len()));
    }

    let opponent = mover.opponent();
    let mut position = Position::empty(mover);
    for (i, &value) in values.iter().enumerate() {
        if value.unsigned_abs() > CHECKERS_PER_SIDE as u32 {
            return Err(EncodingError::InvalidValue { index: i, value });
        }
        let count = value.unsigned_abs() as u8;
        match i {
            0..24 => {
                let point = mover.relative(i as u8 + 1);
                let color = if value > 0 { mover } else { opponent };
                position.board.set(point, color, count);
            }
            24 if value <= 0 => position.bar[opponent.index()] = count,
            25 if value >= 0 => position.bar[mover.index()] = count,
            _ => return Err(EncodingError::InvalidValue { index: i, value }),
        }
    }
    finish(position)
}

fn finish(mut position: Position) -> Result<Position, EncodingError> {
    if let Some((color, count)) = position.excess_checkers() {
        return Err(EncodingError::TooManyCheckers { color, count });
    }
    position.fill_missing_as_borne_off();
    Ok(position)
}

/// 局面の Position ID（14文字）
///
/// Red の区画（Red 視点の 1〜24 点、バー）、White の区画の順に、各スロットの枚数ぶんの 1 と
/// 区切りの 0 を並べ、バイト内は下位ビットから詰める。
pub fn encode_position_id(position: &Position) -> String {
    let mut bytes = [0u8; POSITION_ID_BYTES];
    let mut bit = 0usize;
    for color in [Color::Red, Color::White] {
        for slot in 0..SLOTS {
            let count = slot_count(position, color, slot);
            for _ in 0..count {
                if bit < POSITION_ID_BYTES * 8 {
                    bytes[bit / 8] |= 1 << (bit % 8);
                }
                bit += 1;
            }
            bit += 1;
        }
    }
    STANDARD.encode(bytes).trim_end_matches('=').to_string()
}

fn slot_count(position: &Position, color: Color, slot: usize) -> u8 {
    if slot < 24 {
        position.board.count(color.relative(slot as u8 + 1), color)
    } else {
        position.bar(color)
    }
}

/// Position ID を局面に戻す。手番は ID に含まれないので `side_to_move` で与える。
pub fn decode_position_id(id: &str, side_to_move: Color) -> Result<Position, EncodingError> {
    let trimmed = id.trim().trim_end_matches('=');
    let bytes = STANDARD_NO_PAD
        .decode(trimmed)
        .map_err(|_| EncodingError::InvalidBase64(id.to_string()))?;
    if bytes.len() < POSITION_ID_BYTES {
        return Err(EncodingError::Truncated);
    }
    if bytes.len() > POSITION_ID_BYTES {
        return Err(EncodingError::InvalidBase64(id.to_string()));
    }

    let mut bits = (0..POSITION_ID_BYTES * 8).map(|i| (bytes[i / 8] >> (i % 8)) & 1 == 1);
    let mut position = Position::empty(side_to_move);
    for color in [Color::Red, Color::White] {
        for slot in 0..SLOTS {
            let mut count = 0u8;
            loop {
                match bits.next() {
                    Some(true) => count = count.saturating_add(1),
                    Some(false) => break,
                    None => return Err(EncodingError::Truncated),
                }
            }
            if count == 0 {
                continue;
            }
            if slot == SLOTS - 1 {
                position.bar[color.index()] = count;
                continue;
            }
            let point = color.relative(slot as u8 + 1);
            if position.board.point(point).is_owned_by(color.opponent()) {
                return Err(EncodingError::Overlap { point });
            }
            position.board.set(point, color, count);
        }
    }
    finish(position)
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_ID: &str = "4HPwATDgc/ABMA";

    #[test]
    fn test_start_position_id() {
        assert_eq!(encode_position_id(&Position::standard()), START_ID);
        let decoded = decode_position_id(START_ID, Color::White).unwrap();
        assert_eq!(decoded, Position::standard());
        // 末尾の '=' は付いていてもよい
        assert_eq!(decode_position_id("4HPwATDgc/ABMA==", Color::White).unwrap(), decoded);
    }

    #[test]
    fn test_position_id_with_bar_and_borne_off() {
        let mut pos = Position::empty(Color::Red);
        pos.board.set(3, Color::White, 4);
        pos.board.set(22, Color::Red, 6);
        pos.board.set(10, Color::Red, 1);
        pos.bar = [1, 2];
        pos.fill_missing_as_borne_off();
        let id = encode_position_id(&pos);
        assert_eq!(id.len(), 14);
        assert_eq!(decode_position_id(&id, Color::Red).unwrap(), pos);
    }

    #[test]
    fn test_position_id_errors() {
        assert!(matches!(
            decode_position_id("not base64!", Color::White),
            Err(EncodingError::InvalidBase64(_))
        ));
        assert_eq!(
            decode_position_id("4HPw", Color::White),
            Err(EncodingError::Truncated)
        );
        // 全ビット 1 は終端の 0 が無い
        assert_eq!(
            decode_position_id("/////////////w", Color::White),
            Err(EncodingError::Truncated)
        );
    }

    #[test]
    fn test_simple_board_start_white() {
        let board = to_simple_board(&Position::standard(), Color::White);
        assert_eq!(board[5], 5);
        assert_eq!(board[7], 3);
        assert_eq!(board[12], 5);
        assert_eq!(board[23], 2);
        assert_eq!(board[0], -2);
        assert_eq!(board[18], -5);
        assert_eq!(board.iter().filter(|&&v| v > 0).sum::<i32>(), 15);
        assert_eq!(board.iter().filter(|&&v| v < 0).sum::<i32>(), -15);
    }

    #[test]
    fn test_simple_board_red_perspective() {
        let mut pos = Position::empty(Color::Red);
        pos.board.set(1, Color::Red, 2);
        pos.board.set(20, Color::White, 3);
        pos.bar = [1, 2];
        pos.fill_missing_as_borne_off();

        let board = to_simple_board(&pos, Color::Red);
        // Red の 1 点は Red 視点の 24 点
        assert_eq!(board[23], 2);
        assert_eq!(board[4], -3);
        assert_eq!(board[24], -1);
        assert_eq!(board[25], 2);

        let text = format_simple_board(&board);
        assert_eq!(text.split(' ').count(), 26);
        assert_eq!(parse_simple_board(&text, Color::Red).unwrap(), pos);
    }

    #[test]
    fn test_parse_simple_board_errors() {
        assert_eq!(
            parse_simple_board("0 1 2", Color::White),
            Err(EncodingError::WrongLength(3))
        );
        let mut values = vec!["0"; 26];
        values[3] = "x";
        assert!(matches!(
            parse_simple_board(&values.join(" "), Color::White),
            Err(EncodingError::InvalidNumber(_))
        ));
        values[3] = "0";
        values[24] = "2";
        assert_eq!(
            parse_simple_board(&values.join(","), Color::White),
            Err(EncodingError::InvalidValue { index: 24, value: 2 })
        );
        values[24] = "0";
        values[0] = "9";
        values[1] = "9";
        assert_eq!(
            parse_simple_board(&values.join(" "), Color::White),
            Err(EncodingError::TooManyCheckers { color: Color::White, count: 18 })
        );
    }
}
