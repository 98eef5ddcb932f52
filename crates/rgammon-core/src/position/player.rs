//! プレイヤー状態（バー・ベアオフ済み枚数）

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    color: Color,
    bar: u8,
    off: u8,
}

impl Player {
    pub const fn new(color: Color) -> Self {
        Player {
            color,
            bar: 0,
            off: 0,
        }
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// バー上の枚数
    #[inline]
    pub const fn bar(&self) -> u8 {
        self.bar
    }

    /// ベアオフ済みの枚数
    #[inline]
    pub const fn off(&self) -> u8 {
        self.off
    }

    #[inline]
    pub const fn direction(&self) -> i8 {
        self.color.direction()
    }

    #[inline]
    pub const fn home_range(&self) -> RangeInclusive<u8> {
        self.color.home_range()
    }

    pub(crate) fn set_bar(&mut self, bar: u8) {
        self.bar = bar;
    }

    pub(crate) fn set_off(&mut self, off: u8) {
        self.off = off;
    }

    pub(crate) fn reset(&mut self) {
        self.bar = 0;
        self.off = 0;
    }
}
