//! gnubg 形式の指し手表記
//!
//! `bar/22 13/8*(2) 24/18/13` のように空白区切りのトークンで1ターン分の手を表す。
//! 地点番号は手番視点（White はそのまま、Red は `25 - n`）。
//! 内部では手番視点の距離（バー = 25、ベアオフ = 0）として扱う。

use rgammon_core::{Color, Move, PlayedMove};
use smallvec::SmallVec;

/// バーを表す手番視点の距離
pub(crate) const BAR: u8 = 25;
/// ベアオフ済みを表す手番視点の距離
pub(crate) const OFF: u8 = 0;

/// 表記の解析・展開エラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    /// トークンの形式が不正
    #[error("Invalid notation '{token}': {message}")]
    Syntax { token: String, message: String },

    /// 残りの出目でトークンの移動を作れない
    #[error("Cannot resolve '{token}' with dice {dice:?}")]
    Unresolvable { token: String, dice: Vec<u8> },
}

fn syntax(token: &str, message: impl Into<String>) -> NotationError {
    NotationError::Syntax {
        token: token.to_string(),
        message: message.into(),
    }
}

/// 1トークン分の移動
///
/// `path` は手番視点の距離の列（厳密に減少）。`repeat` は `(k)` の回数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotationSegment {
    pub path: SmallVec<[u8; 5]>,
    pub repeat: u8,
    pub hit: bool,
    /// 元のトークン（エラー表示用）
    pub token: String,
}

impl NotationSegment {
    /// 隣り合う端点の組（区間）
    pub fn edges(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.path.windows(2).map(|w| (w[0], w[1]))
    }
}

impl std::fmt::Display for NotationSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", path_text(&self.path))?;
        if self.hit {
            write!(f, "*")?;
        }
        if self.repeat > 1 {
            write!(f, "({})", self.repeat)?;
        }
        Ok(())
    }
}

/// 1ターン分の表記を解析する
pub fn parse_notation(text: &str) -> Result<Vec<NotationSegment>, NotationError> {
    text.split_whitespace().map(parse_token).collect()
}

fn parse_token(token: &str) -> Result<NotationSegment, NotationError> {
    let hit = token.contains('*');
    let stripped: String = token.chars().filter(|&c| c != '*').collect();

    let (body, repeat) = match stripped.strip_suffix(')') {
        Some(rest) => {
            let open = rest
                .rfind('(')
                .ok_or_else(|| syntax(token, "unbalanced parenthesis"))?;
            let count: u8 = rest[open + 1..]
                .parse()
                .map_err(|_| syntax(token, "invalid repeat count"))?;
            if !(1..=4).contains(&count) {
                return Err(syntax(token, "repeat count must be 1-4"));
            }
            (&rest[..open], count)
        }
        None => (stripped.as_str(), 1),
    };

    let parts: Vec<&str> = body.split('/').collect();
    if parts.len() < 2 {
        return Err(syntax(token, "expected from/to"));
    }

    let mut path: SmallVec<[u8; 5]> = SmallVec::new();
    let last = parts.len() - 1;
    for (i, part) in parts.iter().enumerate() {
        let rel = match part.to_ascii_lowercase().as_str() {
            "bar" if i == 0 => BAR,
            "bar" => return Err(syntax(token, "bar must be the first point")),
            "off" if i == last => OFF,
            "off" => return Err(syntax(token, "off must be the last point")),
            num => match num.parse::<u8>() {
                Ok(n) if (1..=24).contains(&n) => n,
                _ => return Err(syntax(token, format!("invalid point '{part}'"))),
            },
        };
        if let Some(&prev) = path.last() {
            if rel >= prev {
                return Err(syntax(token, "points must decrease"));
            }
        }
        path.push(rel);
    }

    Ok(NotationSegment {
        path,
        repeat,
        hit,
        token: token.to_string(),
    })
}

fn rel_text(rel: u8) -> String {
    match rel {
        BAR => "bar".to_string(),
        OFF => "off".to_string(),
        n => n.to_string(),
    }
}

fn path_text(path: &[u8]) -> String {
    path.iter()
        .map(|&rel| rel_text(rel))
        .collect::<Vec<_>>()
        .join("/")
}

fn move_path(color: Color, mv: &Move) -> SmallVec<[u8; 5]> {
    let mut path: SmallVec<[u8; 5]> = SmallVec::new();
    path.push(mv.from().relative_distance(color));
    match mv {
        Move::Compound { hops, .. } => {
            path.extend(hops.iter().map(|h| h.to.relative_distance(color)));
        }
        _ => path.push(mv.to().relative_distance(color)),
    }
    path
}

/// 同じトークンを `(k)` にまとめる。順序は初出順。
fn merge_tokens(tokens: Vec<String>) -> String {
    let mut merged: Vec<(String, usize)> = Vec::new();
    for token in tokens {
        match merged.iter_mut().find(|(t, _)| *t == token) {
            Some((_, count)) => *count += 1,
            None => merged.push((token, 1)),
        }
    }
    merged
        .into_iter()
        .map(|(t, count)| if count > 1 { format!("{t}({count})") } else { t })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 手の列を手番視点の表記にする。複合手は `24/18/13` のように連結する。
pub fn format_moves(color: Color, moves: &[Move]) -> String {
    merge_tokens(
        moves
            .iter()
            .map(|mv| path_text(&move_path(color, mv)))
            .collect(),
    )
}

/// 実行済みの手を表記にする。ヒットした手には `*` を付ける。
pub fn format_played(color: Color, played: &[PlayedMove]) -> String {
    merge_tokens(
        played
            .iter()
            .map(|p| {
                let mut token = path_text(&move_path(color, &p.mv));
                if p.hit {
                    token.push('*');
                }
                token
            })
            .collect(),
    )
}
