//! 棋譜をリプレイして、各ターン直前の局面を JSONL に書き出す
//!
//! 使い方:
//!   sgf_replay game.sgf
//!   sgf_replay games/0001.sgf.gz --output turns.jsonl --with-commands --plies 3
//!   cat game.sgf | sgf_replay -
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::info;
use rgammon_core::sgf::GameRecord;
use tools::common::config::{load_config_file, merge_config};
use tools::common::io::{open_writer, read_text};
use tools::record_log::{meta_log, result_log, turn_log};

#[derive(Parser, Debug)]
#[command(author, version, about = "SGF 棋譜をリプレイして局面を JSONL に出力する")]
struct Cli {
    /// 入力棋譜（`-` で標準入力、`.gz` は展開して読む）
    input: PathBuf,

    /// 出力先（`-` で標準出力、`.gz` なら圧縮）
    #[arg(long, default_value = "-")]
    output: PathBuf,

    /// 出目のあるターンに gnubg の候補手コマンドを付ける
    #[arg(long, default_value_t = false)]
    with_commands: bool,

    /// gnubg 解析設定ファイル（TOML / JSON）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 探索の深さ（設定ファイルより優先）
    #[arg(long)]
    plies: Option<u8>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let text = read_text(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let record = GameRecord::parse(&text)
        .with_context(|| format!("failed to replay {}", cli.input.display()))?;

    let file_config = cli.config.as_ref().map(load_config_file).transpose()?;
    let analysis = merge_config(file_config, None, cli.plies, None);
    let commands = cli.with_commands.then_some(&analysis.settings);

    let mut writer = open_writer(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    let source = cli.input.display().to_string();
    writer.write_json_line(&meta_log(&record, &source, Local::now().to_rfc3339()))?;
    for turn in record.turns() {
        writer.write_json_line(&turn_log(turn, commands))?;
    }
    writer.write_json_line(&result_log(&record))?;
    let lines = writer.close()?;

    info!("{}: {} turns replayed ({} lines)", source, record.len(), lines);
    Ok(())
}
