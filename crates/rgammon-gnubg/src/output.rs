//! gnubg の出力の解析
//!
//! 出力の書式はバージョンや設定で揺れるので、見つからない項目は既定値のままにする。

use std::sync::LazyLock;

use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

static EQUITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Equity[:\s]+([-+]?\d+\.\d+)").expect("invalid EQUITY_RE pattern")
});
static WIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Win[:\s]+([\d.]+)%").expect("invalid WIN_RE pattern"));
static GAMMON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Win\s+G|Gammon)[:\s]+([\d.]+)%").expect("invalid GAMMON_RE pattern")
});
static BACKGAMMON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Win\s+BG|Backgammon)[:\s]+([\d.]+)%")
        .expect("invalid BACKGAMMON_RE pattern")
});
static MOVE_EQUITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([-+]?\d+\.?\d*)").expect("invalid MOVE_EQUITY_RE pattern"));
static NO_DOUBLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)No\s+double[:\s]+([-+]?\d+\.\d+)").expect("invalid NO_DOUBLE_RE pattern")
});
static DOUBLE_TAKE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Double,\s+take[:\s]+([-+]?\d+\.\d+)").expect("invalid DOUBLE_TAKE_RE pattern")
});
static DOUBLE_PASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Double,\s+pass[:\s]+([-+]?\d+\.\d+)").expect("invalid DOUBLE_PASS_RE pattern")
});

/// 局面評価（`eval`）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionEvaluation {
    pub equity: f64,
    /// 勝率（0〜1）
    pub win_prob: f64,
    pub gammon_prob: f64,
    pub bg_prob: f64,
}

/// 候補手1件（`hint`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveAnalysis {
    pub rank: u32,
    /// 手番視点の gnubg 表記（例: `8/5 6/5`）
    pub notation: String,
    pub equity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CubeRecommendation {
    #[default]
    NoDouble,
    Double,
    TooGood,
}

/// キューブ判断（`hint cube`）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CubeDecision {
    pub no_double_eq: f64,
    pub double_take_eq: f64,
    pub double_pass_eq: f64,
    pub recommendation: CubeRecommendation,
}

fn capture_f64(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

fn capture_percent(re: &Regex, text: &str) -> Option<f64> {
    capture_f64(re, text).map(|p| p / 100.0)
}

pub fn parse_evaluation(output: &str) -> PositionEvaluation {
    let mut evaluation = PositionEvaluation::default();
    if let Some(v) = capture_f64(&EQUITY_RE, output) {
        evaluation.equity = v;
    }
    if let Some(v) = capture_percent(&WIN_RE, output) {
        evaluation.win_prob = v;
    }
    if let Some(v) = capture_percent(&GAMMON_RE, output) {
        evaluation.gammon_prob = v;
    }
    if let Some(v) = capture_percent(&BACKGAMMON_RE, output) {
        evaluation.bg_prob = v;
    }
    evaluation
}

/// `hint` の出力から候補手を取り出す
///
/// ```text
///     1. Cubeful 2-ply    8/5 6/5                      Eq.: +0.200
///        0.571 0.000 0.000 - 0.429 0.000 0.000
///     2. Cubeful 2-ply    13/10 6/5                    Eq.: +0.177 (-0.023)
/// ```
///
/// 順位と `Eq.:` の間にある `/` を含む語を表記とする。表記や評価値が読めない行は飛ばす。
pub fn parse_move_analysis(output: &str) -> Vec<MoveAnalysis> {
    let mut analyses = Vec::new();
    for line in output.lines() {
        let trimmed = line.trim();
        if !trimmed.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        let Some(dot) = trimmed.find('.') else {
            continue;
        };
        let Ok(rank) = trimmed[..dot].parse::<u32>() else {
            debug!("skipping line (rank): {trimmed}");
            continue;
        };
        let Some(eq) = trimmed.to_ascii_lowercase().find("eq.:") else {
            debug!("skipping rank {rank}: no equity marker");
            continue;
        };

        let notation = trimmed[dot + 1..eq]
            .split_whitespace()
            .filter(|part| part.contains('/'))
            .collect::<Vec<_>>()
            .join(" ");
        if notation.is_empty() {
            warn!("skipping rank {rank}: no move notation in '{trimmed}'");
            continue;
        }

        let equity_text = trimmed[eq + 4..].trim();
        let Some(equity) = capture_f64(&MOVE_EQUITY_RE, equity_text) else {
            warn!("skipping rank {rank}: cannot read equity '{equity_text}'");
            continue;
        };

        debug!("rank {rank}: {notation} eq {equity:+.3}");
        analyses.push(MoveAnalysis {
            rank,
            notation,
            equity,
        });
    }
    info!("parsed {} candidate moves", analyses.len());
    analyses
}

/// `hint cube` の出力からキューブ判断を取り出す
///
/// 3つの評価値から推奨を決め、出力に明示的な推奨があればそちらを優先する。
pub fn parse_cube_decision(output: &str) -> CubeDecision {
    let mut decision = CubeDecision::default();
    if let Some(v) = capture_f64(&NO_DOUBLE_RE, output) {
        decision.no_double_eq = v;
    }
    if let Some(v) = capture_f64(&DOUBLE_TAKE_RE, output) {
        decision.double_take_eq = v;
    }
    if let Some(v) = capture_f64(&DOUBLE_PASS_RE, output) {
        decision.double_pass_eq = v;
    }

    let (nd, dt, dp) = (
        decision.no_double_eq,
        decision.double_take_eq,
        decision.double_pass_eq,
    );
    decision.recommendation = if dt > nd && dt > dp {
        CubeRecommendation::Double
    } else if dp > nd && dp > dt {
        CubeRecommendation::TooGood
    } else {
        CubeRecommendation::NoDouble
    };

    let lower = output.to_ascii_lowercase();
    if lower.contains("correct cube action: double") {
        decision.recommendation = CubeRecommendation::Double;
    } else if lower.contains("correct cube action: no double") {
        decision.recommendation = CubeRecommendation::NoDouble;
    } else if lower.contains("too good") {
        decision.recommendation = CubeRecommendation::TooGood;
    }
    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_evaluation() {
        let output = "Equity: +0.234\nWin: 56.2%\nWin G: 12.3%\nWin BG: 0.8%\n";
        let eval = parse_evaluation(output);
        assert!((eval.equity - 0.234).abs() < 1e-9);
        assert!((eval.win_prob - 0.562).abs() < 1e-9);
        assert!((eval.gammon_prob - 0.123).abs() < 1e-9);
        assert!((eval.bg_prob - 0.008).abs() < 1e-9);
    }

    #[test]
    fn test_parse_evaluation_missing_fields() {
        let eval = parse_evaluation("equity  -1.500\nnothing else");
        assert!((eval.equity + 1.5).abs() < 1e-9);
        assert_eq!(eval.win_prob, 0.0);
        assert_eq!(parse_evaluation(""), PositionEvaluation::default());
    }

    #[test]
    fn test_parse_move_analysis() {
        let output = "\
Position ID: 4HPwATDgc/ABMA
    1. Cubeful 2-ply    8/5 6/5                      Eq.: +0.200
       0.571 0.000 0.000 - 0.429 0.000 0.000
    2. Cubeful 2-ply    13/10 6/5                    Eq.: +0.177 (-0.023)
    3. Cubeful 2-ply    bar/22*                      eq.: -0.050 (-0.250)
    4. Cubeful 2-ply                                 Eq.: +0.100
    5. Cubeful 2-ply    24/21                        Eq.: n/a
";
        let moves = parse_move_analysis(output);
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[0].rank, 1);
        assert_eq!(moves[0].notation, "8/5 6/5");
        assert!((moves[0].equity - 0.2).abs() < 1e-9);
        assert_eq!(moves[1].notation, "13/10 6/5");
        assert!((moves[1].equity - 0.177).abs() < 1e-9);
        assert_eq!(moves[2].notation, "bar/22*");
        assert!((moves[2].equity + 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_cube_decision_from_equities() {
        let output = "No double: +0.412\nDouble, take: +0.530\nDouble, pass: +1.000\n";
        let decision = parse_cube_decision(output);
        assert!((decision.no_double_eq - 0.412).abs() < 1e-9);
        assert_eq!(decision.recommendation, CubeRecommendation::Double);

        let output = "No double: +0.912\nDouble, take: +0.950\nDouble, pass: +1.000\n";
        assert_eq!(
            parse_cube_decision(output).recommendation,
            CubeRecommendation::TooGood
        );
        assert_eq!(
            parse_cube_decision("").recommendation,
            CubeRecommendation::NoDouble
        );
    }

    #[test]
    fn test_cube_decision_explicit_action_wins() {
        let output = "\
No double: +0.412
Double, take: +0.530
Double, pass: +1.000
Proper cube action: No double, take (12.3%)
Correct cube action: No double
";
        assert_eq!(
            parse_cube_decision(output).recommendation,
            CubeRecommendation::NoDouble
        );
        let output = "No double: +1.200\nDouble, pass: +1.000\nToo good to double, pass\n";
        assert_eq!(
            parse_cube_decision(output).recommendation,
            CubeRecommendation::TooGood
        );
    }
}
