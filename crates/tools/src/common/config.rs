//! gnubg 解析設定の読み込み
//!
//! 設定ファイル（TOML、拡張子が `.json` なら JSON）の値に CLI の指定を上書きする。

use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use rgammon_gnubg::{AnalysisKind, AnalysisSettings};
use serde::Deserialize;

/// gnubg が受け付ける最大の深さ
pub const MAX_PLIES: u8 = 7;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfigFile {
    #[serde(default)]
    pub plies: Option<u8>,
    #[serde(default)]
    pub cubeful: Option<bool>,
    #[serde(default)]
    pub kind: Option<AnalysisKind>,
}

/// 設定とコマンドラインを合わせた最終的な解析設定
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub kind: AnalysisKind,
    pub settings: AnalysisSettings,
}

pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<AnalysisConfigFile> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.eq_ignore_ascii_case("json"));
    let file: AnalysisConfigFile = if is_json {
        serde_json::from_str(&data)
            .with_context(|| format!("invalid JSON config {}", path.display()))?
    } else {
        toml::from_str(&data).with_context(|| format!("invalid TOML config {}", path.display()))?
    };
    Ok(file)
}

/// CLI の指定 > 設定ファイル > 既定値の順で決める
pub fn merge_config(
    file: Option<AnalysisConfigFile>,
    cli_kind: Option<AnalysisKind>,
    cli_plies: Option<u8>,
    cli_cubeful: Option<bool>,
) -> AnalysisConfig {
    let mut out = AnalysisConfig {
        kind: AnalysisKind::Hint,
        settings: AnalysisSettings::default(),
    };
    if let Some(f) = file {
        if let Some(k) = f.kind {
            out.kind = k;
        }
        if let Some(p) = f.plies {
            out.settings.plies = p;
        }
        if let Some(c) = f.cubeful {
            out.settings.cubeful = c;
        }
    }
    if let Some(k) = cli_kind {
        out.kind = k;
    }
    if let Some(p) = cli_plies {
        out.settings.plies = p;
    }
    if let Some(c) = cli_cubeful {
        out.settings.cubeful = c;
    }
    if out.settings.plies > MAX_PLIES {
        warn!("plies={} is too deep; clamped to {MAX_PLIES}", out.settings.plies);
        out.settings.plies = MAX_PLIES;
    }
    out
}
