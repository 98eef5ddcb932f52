//! ツール共通モジュール

pub mod config;
pub mod io;
pub mod position;
