//! ダブリングキューブ（DoublingCube）

use serde::{Deserialize, Serialize};

use super::Color;

/// ダブリングキューブ
///
/// 値は 1, 2, 4, ..., 64。所有者なし（センター）ならどちらもダブルできる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoublingCube {
    value: u8,
    owner: Option<Color>,
}

impl Default for DoublingCube {
    fn default() -> Self {
        DoublingCube::new()
    }
}

impl DoublingCube {
    /// キューブの上限値
    pub const MAX_VALUE: u8 = 64;

    /// センターに置かれた値1のキューブ
    pub const fn new() -> Self {
        DoublingCube {
            value: 1,
            owner: None,
        }
    }

    /// 値と所有者を指定して生成する。値が2の冪（1〜64）でなければ None。
    pub fn with_state(value: u8, owner: Option<Color>) -> Option<Self> {
        Self::is_valid_value(value).then_some(DoublingCube { value, owner })
    }

    #[inline]
    pub const fn is_valid_value(value: u8) -> bool {
        value.is_power_of_two() && value <= Self::MAX_VALUE
    }

    #[inline]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// 所有者（センターなら None）
    #[inline]
    pub const fn owner(&self) -> Option<Color> {
        self.owner
    }

    #[inline]
    pub const fn is_centered(&self) -> bool {
        self.owner.is_none()
    }

    /// 指定手番がダブルを掛けられるか
    pub fn can_double(&self, color: Color) -> bool {
        self.value < Self::MAX_VALUE && self.owner != Some(color.opponent())
    }

    /// キューブを倍にし、受けた側（taker）を所有者にする
    pub fn double(&mut self, taker: Color) {
        debug_assert!(self.value < Self::MAX_VALUE);
        self.value = self.value.saturating_mul(2).min(Self::MAX_VALUE);
        self.owner = Some(taker);
    }

    pub fn reset(&mut self) {
        *self = DoublingCube::new();
    }
}
