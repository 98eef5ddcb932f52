//! gnubg に標準入力で流すコマンドスクリプトを作る
//!
//! 使い方:
//!   # Position ID と出目から候補手を求める
//!   gnubg_script --position-id 4HPwATDgc/ABMA --dice 31 | gnubg -t
//!
//!   # 棋譜の 12 ターン目の直前の局面を SGF で読み込ませてキューブ判断
//!   gnubg_script --sgf game.sgf --turn 12 --position-file /tmp/pos.sgf --kind cube
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use rgammon_core::sgf::{SgfHeader, export_position};
use rgammon_gnubg::command::{native_commands, script, sgf_commands};
use rgammon_gnubg::{AnalysisKind, encode_position_id};
use tools::common::config::{load_config_file, merge_config};
use tools::common::io::open_writer;
use tools::common::position::PositionArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "gnubg のコマンドスクリプトを生成する")]
struct Cli {
    #[command(flatten)]
    position: PositionArgs,

    /// 局面を SGF で書き出して `load position` で読ませる（省略時は Position ID で渡す）
    #[arg(long)]
    position_file: Option<PathBuf>,

    /// 解析の種類（eval / hint / cube）
    #[arg(long)]
    kind: Option<AnalysisKind>,

    /// 探索の深さ
    #[arg(long)]
    plies: Option<u8>,

    /// cubeful 設定を付けるか
    #[arg(long)]
    cubeful: Option<bool>,

    /// gnubg 解析設定ファイル（TOML / JSON）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 出力先（`-` で標準出力）
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let file_config = cli.config.as_ref().map(load_config_file).transpose()?;
    let analysis = merge_config(file_config, cli.kind, cli.plies, cli.cubeful);

    let position = cli.position.load()?;

    let commands = match &cli.position_file {
        Some(path) => {
            let sgf = export_position(&position, &SgfHeader::default());
            std::fs::write(path, sgf)
                .with_context(|| format!("failed to write {}", path.display()))?;
            sgf_commands(path, analysis.kind, &analysis.settings)
        }
        None => {
            let Some(dice) = position.dice else {
                bail!("--dice is required when the position has no rolled dice");
            };
            let id = encode_position_id(&position);
            info!("position id {id}, {} to play {}{}", position.side_to_move, dice.0, dice.1);
            native_commands(&id, dice, analysis.kind, &analysis.settings)
        }
    };

    let mut writer = open_writer(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    writer.write_text(&script(&commands))?;
    writer.close()?;
    Ok(())
}
