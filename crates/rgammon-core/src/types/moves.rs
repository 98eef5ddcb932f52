//! 指し手（Move）

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{DicePool, Location};

/// 複合手の1区間
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hop {
    pub to: Location,
    pub die: u8,
}

/// 複合手の区間列
pub type Hops = SmallVec<[Hop; 4]>;

/// 指し手
///
/// 地点番号はすべて絶対番号（1〜24）。
/// `Compound` は複数の出目を連結した移動で、実行時には `steps()` で単一出目の手に分解される。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// バーからのエントリー
    Enter { to: u8, die: u8 },
    /// 盤上の移動
    Normal { from: u8, to: u8, die: u8 },
    /// ベアオフ
    BearOff { from: u8, die: u8 },
    /// 複数ダイスを連結した移動
    Compound { from: Location, hops: Hops },
}

impl Move {
    /// 端点と出目から単一出目の手を作る。組み合わせが不正なら None。
    pub fn single(from: Location, to: Location, die: u8) -> Option<Move> {
        match (from, to) {
            (Location::Bar, Location::Point(to)) => Some(Move::Enter { to, die }),
            (Location::Point(from), Location::Point(to)) => Some(Move::Normal { from, to, die }),
            (Location::Point(from), Location::Off) => Some(Move::BearOff { from, die }),
            _ => None,
        }
    }

    /// 区間列から手を作る。1区間なら単一出目の手になる。
    pub fn from_hops(from: Location, hops: Hops) -> Option<Move> {
        match hops.as_slice() {
            [] => None,
            [hop] => Move::single(from, hop.to, hop.die),
            _ => Some(Move::Compound { from, hops }),
        }
    }

    #[inline]
    pub fn from(&self) -> Location {
        match self {
            Move::Enter { .. } => Location::Bar,
            Move::Normal { from, .. } | Move::BearOff { from, .. } => Location::Point(*from),
            Move::Compound { from, .. } => *from,
        }
    }

    #[inline]
    pub fn to(&self) -> Location {
        match self {
            Move::Enter { to, .. } | Move::Normal { to, .. } => Location::Point(*to),
            Move::BearOff { .. } => Location::Off,
            Move::Compound { from, hops } => hops.last().map_or(*from, |h| h.to),
        }
    }

    /// 単一出目の手の出目（複合手は None）
    #[inline]
    pub fn die(&self) -> Option<u8> {
        match self {
            Move::Enter { die, .. } | Move::Normal { die, .. } | Move::BearOff { die, .. } => {
                Some(*die)
            }
            Move::Compound { .. } => None,
        }
    }

    /// 消費する出目（使用順）
    pub fn dice(&self) -> DicePool {
        match self {
            Move::Compound { hops, .. } => hops.iter().map(|h| h.die).collect(),
            _ => self.die().into_iter().collect(),
        }
    }

    #[inline]
    pub fn is_compound(&self) -> bool {
        matches!(self, Move::Compound { .. })
    }

    #[inline]
    pub fn is_enter(&self) -> bool {
        self.from() == Location::Bar
    }

    #[inline]
    pub fn is_bear_off(&self) -> bool {
        self.to() == Location::Off
    }

    /// 複合手の中間地点（単一出目の手は空）
    pub fn intermediate_points(&self) -> SmallVec<[u8; 3]> {
        match self {
            Move::Compound { hops, .. } => hops
                .iter()
                .take(hops.len().saturating_sub(1))
                .filter_map(|h| h.to.point())
                .collect(),
            _ => SmallVec::new(),
        }
    }

    /// 単一出目の手の列に分解する
    pub fn steps(&self) -> SmallVec<[Move; 4]> {
        match self {
            Move::Compound { from, hops } => {
                let mut out = SmallVec::new();
                let mut cur = *from;
                for hop in hops {
                    // 区間の端点が不正（盤外 → 盤外など）な手は空の列として扱う
                    match Move::single(cur, hop.to, hop.die) {
                        Some(mv) => out.push(mv),
                        None => return SmallVec::new(),
                    }
                    cur = hop.to;
                }
                out
            }
            single => smallvec::smallvec![single.clone()],
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.from())?;
        match self {
            Move::Compound { hops, .. } => {
                for hop in hops {
                    write!(f, "/{}", hop.to)?;
                }
                Ok(())
            }
            _ => write!(f, "/{}", self.to()),
        }
    }
}
