//! gnubg の候補手リストから指す手を選ぶ

use log::{debug, warn};
use rgammon_core::{GameEngine, Move};

use crate::notation::NotationError;
use crate::output::MoveAnalysis;
use crate::resolve::{pick_playable, resolve_notation};

/// 順位の高い候補から順に展開し、エンジンが受け付ける最初の手順を返す
///
/// 表記が展開できないのは gnubg との食い違いなのでエラーにする。
/// 展開できても盤面上で指せない候補は飛ばす。
pub fn choose_move(
    engine: &GameEngine,
    analyses: &[MoveAnalysis],
) -> Result<Option<Vec<Move>>, NotationError> {
    let color = engine.current_player();
    let mut ranked: Vec<&MoveAnalysis> = analyses.iter().collect();
    ranked.sort_by_key(|a| a.rank);

    for analysis in ranked {
        let resolved = resolve_notation(color, &analysis.notation, engine.remaining_dice())?;
        match pick_playable(engine, &resolved) {
            Some(moves) => {
                debug!("rank {} '{}' chosen", analysis.rank, analysis.notation);
                return Ok(Some(moves.to_vec()));
            }
            None => warn!("rank {} '{}' is not playable", analysis.rank, analysis.notation),
        }
    }
    Ok(None)
}
