//! ダイス（Dice）

use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// 1ターンで使える出目の多重集合
pub type DicePool = SmallVec<[u8; 4]>;

/// 2個のダイスと未使用の出目
///
/// ゾロ目は同じ出目4回、それ以外は2回の移動に展開される。
/// `remaining` は指し手の実行で消費され、巻き戻しで戻される。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dice {
    /// 出目（0 = 未ロール）
    values: [u8; 2],
    remaining: DicePool,
}

impl Dice {
    /// 出目の最大値
    pub const MAX_FACE: u8 = 6;

    /// 未ロールのダイス
    pub fn new() -> Self {
        Dice::default()
    }

    /// 出目が有効範囲か
    #[inline]
    pub const fn is_valid_face(die: u8) -> bool {
        die >= 1 && die <= Self::MAX_FACE
    }

    /// 1個のダイスを振る
    pub fn roll_single<R: Rng>(rng: &mut R) -> u8 {
        rng.random_range(1..=Self::MAX_FACE)
    }

    /// 2個のダイスを振り、残り出目を作り直す
    pub fn roll<R: Rng>(&mut self, rng: &mut R) -> (u8, u8) {
        let d1 = Self::roll_single(rng);
        let d2 = Self::roll_single(rng);
        self.set(d1, d2);
        (d1, d2)
    }

    /// 出目を直接設定する。範囲外の値は呼び出し側で弾くこと。
    pub fn set(&mut self, d1: u8, d2: u8) {
        debug_assert!(Self::is_valid_face(d1) && Self::is_valid_face(d2));
        self.values = [d1, d2];
        self.remaining = Self::expand(d1, d2);
    }

    /// 出目の組を移動回数分に展開する
    pub fn expand(d1: u8, d2: u8) -> DicePool {
        if d1 == d2 {
            SmallVec::from_buf([d1; 4])
        } else {
            let mut pool = DicePool::new();
            pool.push(d1);
            pool.push(d2);
            pool
        }
    }

    /// 出目（未ロールなら None）
    #[inline]
    pub fn values(&self) -> Option<(u8, u8)> {
        if self.is_rolled() {
            Some((self.values[0], self.values[1]))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_rolled(&self) -> bool {
        self.values[0] != 0
    }

    #[inline]
    pub fn is_doubles(&self) -> bool {
        self.is_rolled() && self.values[0] == self.values[1]
    }

    /// 未使用の出目
    #[inline]
    pub fn remaining(&self) -> &[u8] {
        &self.remaining
    }

    #[inline]
    pub fn has(&self, die: u8) -> bool {
        self.remaining.contains(&die)
    }

    /// 未使用の出目の種類（出現順、重複なし）
    pub fn distinct_remaining(&self) -> DicePool {
        distinct(&self.remaining)
    }

    /// 出目を1つ消費する。持っていなければ false。
    pub fn consume(&mut self, die: u8) -> bool {
        match self.remaining.iter().position(|&d| d == die) {
            Some(idx) => {
                self.remaining.remove(idx);
                true
            }
            None => false,
        }
    }

    /// 消費した出目を戻す
    pub fn restore(&mut self, die: u8) {
        self.remaining.push(die);
    }

    /// 未ロール状態に戻す
    pub fn clear(&mut self) {
        self.values = [0, 0];
        self.remaining.clear();
    }
}

/// 出目列から重複を除く（出現順を保つ）
pub fn distinct(dice: &[u8]) -> DicePool {
    let mut out = DicePool::new();
    for &d in dice {
        if !out.contains(&d) {
            out.push(d);
        }
    }
    out
}

/// 出目列から1つ取り除いた新しい列を返す
pub fn without(dice: &[u8], die: u8) -> DicePool {
    let mut out: DicePool = dice.iter().copied().collect();
    if let Some(idx) = out.iter().position(|&d| d == die) {
        out.remove(idx);
    }
    out
}
