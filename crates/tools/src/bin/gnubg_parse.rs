//! gnubg の出力を読み取り、評価値・候補手・キューブ判断を JSONL で書き出す
//!
//! 使い方:
//!   gnubg_script --position-id 4HPwATDgc/ABMA --dice 31 | gnubg -t | gnubg_parse - --kind hint
//!
//!   # 候補手を局面に照らして具体的な手順に展開する
//!   gnubg_parse hint.txt --kind hint --resolve --position-id 4HPwATDgc/ABMA --dice 31
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};
use rgammon_core::{GameEngine, Move};
use rgammon_gnubg::{
    AnalysisKind, CubeDecision, MoveAnalysis, PositionEvaluation, choose_move, format_moves,
    parse_cube_decision, parse_evaluation, parse_move_analysis, pick_playable, resolve_notation,
};
use serde::Serialize;
use tools::common::io::{open_writer, read_text};
use tools::common::position::PositionArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "gnubg の出力を解析して JSONL に変換する")]
struct Cli {
    /// gnubg の出力（`-` で標準入力、`.gz` 可）
    input: PathBuf,

    /// 出力の種類（eval / hint / cube）
    #[arg(long, default_value = "hint")]
    kind: AnalysisKind,

    /// 候補手を局面に照らして手順に展開する（hint のみ）
    #[arg(long, default_value_t = false)]
    resolve: bool,

    #[command(flatten)]
    position: PositionArgs,

    /// 出力先（`-` で標準出力、`.gz` なら圧縮）
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

#[derive(Serialize)]
struct EvaluationLog {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    evaluation: PositionEvaluation,
}

#[derive(Serialize)]
struct CandidateLog<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    analysis: &'a MoveAnalysis,
    /// 展開した手順（盤面で指せない場合は None）
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<Move>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    playable: Option<bool>,
}

#[derive(Serialize)]
struct ChoiceLog {
    #[serde(rename = "type")]
    kind: &'static str,
    /// 選んだ手順の gnubg 表記（指せる候補が無ければ None）
    notation: Option<String>,
    moves: Vec<Move>,
}

#[derive(Serialize)]
struct CubeLog {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    decision: CubeDecision,
}

/// 候補手ごとに展開結果を付ける
fn candidate_logs<'a>(
    engine: Option<&GameEngine>,
    analyses: &'a [MoveAnalysis],
) -> Result<Vec<CandidateLog<'a>>> {
    let mut logs = Vec::with_capacity(analyses.len());
    for analysis in analyses {
        let (moves, playable) = match engine {
            Some(engine) => {
                let resolved = resolve_notation(
                    engine.current_player(),
                    &analysis.notation,
                    engine.remaining_dice(),
                )
                .with_context(|| format!("rank {}", analysis.rank))?;
                match pick_playable(engine, &resolved) {
                    Some(moves) => (Some(moves.to_vec()), Some(true)),
                    None => {
                        warn!("rank {} '{}' is not playable", analysis.rank, analysis.notation);
                        (None, Some(false))
                    }
                }
            }
            None => (None, None),
        };
        logs.push(CandidateLog {
            kind: "candidate",
            analysis,
            moves,
            playable,
        });
    }
    Ok(logs)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let text = read_text(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let mut writer = open_writer(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;

    match cli.kind {
        AnalysisKind::Evaluate => {
            let evaluation = parse_evaluation(&text);
            info!(
                "equity {:+.3}, win {:.1}%",
                evaluation.equity,
                evaluation.win_prob * 100.0
            );
            writer.write_json_line(&EvaluationLog {
                kind: "evaluation",
                evaluation,
            })?;
        }
        AnalysisKind::Cube => {
            let decision = parse_cube_decision(&text);
            info!("cube action: {:?}", decision.recommendation);
            writer.write_json_line(&CubeLog {
                kind: "cube",
                decision,
            })?;
        }
        AnalysisKind::Hint => {
            let analyses = parse_move_analysis(&text);
            let engine = if cli.resolve {
                let position = cli.position.load()?;
                if position.dice.is_none() {
                    bail!("--dice is required to resolve candidates");
                }
                Some(GameEngine::from_position(&position).context("invalid position")?)
            } else {
                None
            };

            for log in candidate_logs(engine.as_ref(), &analyses)? {
                writer.write_json_line(&log)?;
            }
            if let Some(engine) = &engine {
                let moves = choose_move(engine, &analyses)?.unwrap_or_default();
                let notation = (!moves.is_empty())
                    .then(|| format_moves(engine.current_player(), &moves));
                match &notation {
                    Some(n) => info!("chosen: {n}"),
                    None => warn!("no playable candidate"),
                }
                writer.write_json_line(&ChoiceLog {
                    kind: "choice",
                    notation,
                    moves,
                })?;
            }
        }
    }
    writer.close()?;
    Ok(())
}
