//! 対局エンジン（GameEngine）

use log::debug;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use super::{EndReason, GameError, GameResult, GameStatus, WinType};
use crate::movegen::{CombinedMove, CombinedMoveCalculator};
use crate::position::{Board, CHECKERS_PER_SIDE, Player, Position};
use crate::types::{Color, Dice, DoublingCube, Location, Move};

/// 実行済みの単一出目の手と、巻き戻しに使う直前状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMove {
    pub mv: Move,
    pub color: Color,
    /// 相手のブロットを打ったか
    pub hit: bool,
    /// 実行前の相手のバー枚数
    pub opponent_bar_before: u8,
    /// 実行前の自分のベアオフ済み枚数
    pub borne_off_before: u8,
}

/// 対局エンジン
///
/// 盤面・プレイヤー・ダイス・キューブを排他的に所有し、手の検証・実行・巻き戻しを行う。
/// 不正な手は `false` で報告し、状態の前提条件違反のみ `GameError` を返す。
#[derive(Debug, Clone)]
pub struct GameEngine {
    board: Board,
    players: [Player; Color::NUM],
    current: Color,
    dice: Dice,
    cube: DoublingCube,
    /// 現在のターンで実行した手
    turn_log: Vec<PlayedMove>,
    status: GameStatus,
    /// ダブルを掛けて応答待ちの手番
    pending_double: Option<Color>,
    rng: Xoshiro256PlusPlus,
}

impl Default for GameEngine {
    fn default() -> Self {
        GameEngine::new()
    }
}

impl GameEngine {
    /// 乱数シードを OS 由来の乱数で初期化したエンジン
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// シード固定のエンジン（再現可能な対局用）
    pub fn with_seed(seed: u64) -> Self {
        GameEngine {
            board: Board::standard(),
            players: [Player::new(Color::White), Player::new(Color::Red)],
            current: Color::White,
            dice: Dice::new(),
            cube: DoublingCube::new(),
            turn_log: Vec::new(),
            status: GameStatus::NotStarted,
            pending_double: None,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// 局面スナップショットから対局中のエンジンを作る
    pub fn from_position(position: &Position) -> Result<Self, GameError> {
        let mut engine = GameEngine::with_seed(0);
        engine.load_position(position)?;
        Ok(engine)
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    #[inline]
    pub fn current_player(&self) -> Color {
        self.current
    }

    #[inline]
    pub fn dice(&self) -> &Dice {
        &self.dice
    }

    #[inline]
    pub fn remaining_dice(&self) -> &[u8] {
        self.dice.remaining()
    }

    #[inline]
    pub fn cube(&self) -> &DoublingCube {
        &self.cube
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn pending_double(&self) -> Option<Color> {
        self.pending_double
    }

    /// 現在のターンで実行した手
    #[inline]
    pub fn turn_log(&self) -> &[PlayedMove] {
        &self.turn_log
    }

    /// 盤上・バー・ベアオフ済みの合計
    pub fn checker_total(&self, color: Color) -> u32 {
        let player = self.player(color);
        self.board.checkers_on_board(color) + player.bar() as u32 + player.off() as u32
    }

    // ---------------------------------------------------------------------
    // Game lifecycle
    // ---------------------------------------------------------------------

    /// 開始局面に戻し、先手を決める
    ///
    /// 両者が1個ずつダイスを振り、異なる目が出るまで繰り返す。大きい目を出した側が
    /// その2つの目（大きい順）で最初のターンを指す。
    pub fn start_new_game(&mut self) -> Color {
        self.board = Board::standard();
        for player in &mut self.players {
            player.reset();
        }
        self.cube.reset();
        self.turn_log.clear();
        self.pending_double = None;
        self.status = GameStatus::InProgress;

        let (white, red) = loop {
            let white = Dice::roll_single(&mut self.rng);
            let red = Dice::roll_single(&mut self.rng);
            if white != red {
                break (white, red);
            }
        };
        self.current = if white > red { Color::White } else { Color::Red };
        self.dice.set(white.max(red), white.min(red));
        debug!("opening roll: White {white}, Red {red}; {} moves first", self.current);
        self.current
    }

    /// 局面スナップショットを読み込む
    ///
    /// 15枚に満たない色の不足分はベアオフ済みとみなす。どちらかが15枚ベアオフ済みなら終局扱い。
    pub fn load_position(&mut self, position: &Position) -> Result<(), GameError> {
        let mut position = position.clone();
        position.fill_missing_as_borne_off();
        if let Some((color, count)) = position.excess_checkers() {
            return Err(GameError::TooManyCheckers { color, count });
        }
        if let Some((d1, d2)) = position.dice {
            for die in [d1, d2] {
                if !Dice::is_valid_face(die) {
                    return Err(GameError::InvalidDie(die));
                }
            }
        }

        self.board = position.board;
        for color in Color::ALL {
            let player = &mut self.players[color.index()];
            player.set_bar(position.bar[color.index()]);
            player.set_off(position.off[color.index()]);
        }
        self.current = position.side_to_move;
        self.cube = position.cube;
        match position.dice {
            Some((d1, d2)) => self.dice.set(d1, d2),
            None => self.dice.clear(),
        }
        self.turn_log.clear();
        self.pending_double = None;
        self.status = match Color::ALL
            .into_iter()
            .find(|&c| self.player(c).off() == CHECKERS_PER_SIDE)
        {
            Some(winner) => GameStatus::Finished {
                winner,
                reason: EndReason::BorneOff,
            },
            None => GameStatus::InProgress,
        };
        Ok(())
    }

    /// 現在の局面のスナップショット
    pub fn position(&self) -> Position {
        Position {
            board: self.board.clone(),
            bar: [
                self.player(Color::White).bar(),
                self.player(Color::Red).bar(),
            ],
            off: [
                self.player(Color::White).off(),
                self.player(Color::Red).off(),
            ],
            side_to_move: self.current,
            dice: self.dice.values(),
            cube: self.cube,
        }
    }

    /// 手番を直接設定する（局面設定・リプレイ用）
    pub fn set_current_player(&mut self, color: Color) {
        self.current = color;
    }

    fn ensure_in_progress(&self) -> Result<(), GameError> {
        match self.status {
            GameStatus::NotStarted => Err(GameError::NotStarted),
            GameStatus::Finished { .. } => Err(GameError::GameOver),
            GameStatus::InProgress => Ok(()),
        }
    }

    fn ensure_can_roll(&self) -> Result<(), GameError> {
        self.ensure_in_progress()?;
        if self.pending_double.is_some() {
            return Err(GameError::DoublePending);
        }
        Ok(())
    }

    /// ダイスを振る
    pub fn roll_dice(&mut self) -> Result<(u8, u8), GameError> {
        self.ensure_can_roll()?;
        let rolled = self.dice.roll(&mut self.rng);
        self.turn_log.clear();
        debug!("{} rolled {}-{}", self.current, rolled.0, rolled.1);
        Ok(rolled)
    }

    /// 出目を指定して設定する（リプレイ・テスト用）
    pub fn set_dice(&mut self, d1: u8, d2: u8) -> Result<(), GameError> {
        self.ensure_can_roll()?;
        for die in [d1, d2] {
            if !Dice::is_valid_face(die) {
                return Err(GameError::InvalidDie(die));
            }
        }
        self.dice.set(d1, d2);
        self.turn_log.clear();
        Ok(())
    }

    /// ターンを終えて手番を交代する
    pub fn end_turn(&mut self) -> Result<(), GameError> {
        self.ensure_in_progress()?;
        self.dice.clear();
        self.turn_log.clear();
        self.current = self.current.opponent();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Move legality
    // ---------------------------------------------------------------------

    /// 手が現在の局面で合法か
    pub fn is_valid_move(&self, mv: &Move) -> bool {
        if !self.status.is_in_progress() || self.pending_double.is_some() {
            return false;
        }
        if let Move::Compound { .. } = mv {
            let steps = mv.steps();
            if steps.is_empty() {
                return false;
            }
            let mut scratch = self.clone();
            return steps.iter().all(|step| scratch.execute_single(step));
        }
        self.is_valid_single(mv)
    }

    fn is_valid_single(&self, mv: &Move) -> bool {
        let color = self.current;
        let Some(die) = mv.die() else {
            return false;
        };
        if !self.dice.has(die) {
            return false;
        }
        let on_bar = self.player(color).bar() > 0;

        match *mv {
            Move::Enter { to, die } => {
                on_bar
                    && to == color.entry_point(die)
                    && self.board.point(to).is_open_for(color)
            }
            Move::Normal { from, to, die } => {
                if on_bar
                    || !Board::is_on_board(from as i16)
                    || !Board::is_on_board(to as i16)
                {
                    return false;
                }
                let expected = from as i16 + color.direction() as i16 * die as i16;
                self.board.point(from).is_owned_by(color)
                    && to as i16 == expected
                    && self.board.point(to).is_open_for(color)
            }
            Move::BearOff { from, die } => !on_bar && self.can_bear_off(from, die),
            Move::Compound { .. } => false,
        }
    }

    /// 手番側が `from` から出目 `die` でベアオフできるか
    ///
    /// 全チェッカーがホームにあることが前提。出目ちょうどなら常に可、出目が大きい場合は
    /// `from` が最も遠い占有地点のときだけ可。
    pub fn can_bear_off(&self, from: u8, die: u8) -> bool {
        let color = self.current;
        if !Board::is_on_board(from as i16) || !Dice::is_valid_face(die) {
            return false;
        }
        if self.player(color).bar() > 0
            || !self.board.point(from).is_owned_by(color)
            || !self.board.all_in_home(color)
        {
            return false;
        }
        let rel = color.relative(from);
        if rel == die {
            return true;
        }
        die > rel && self.board.highest_relative(color) == Some(rel)
    }

    /// 合法手の列挙
    ///
    /// バーにチェッカーがあればエントリーのみ。それ以外はベアオフ候補を先に、続いて
    /// 24地点 × 出目の通常移動を並べる。出目は種類ごとに1回だけ試す。
    pub fn valid_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        if !self.status.is_in_progress() || self.pending_double.is_some() {
            return moves;
        }
        let color = self.current;
        let dice = self.dice.distinct_remaining();

        if self.player(color).bar() > 0 {
            for &die in &dice {
                let mv = Move::Enter {
                    to: color.entry_point(die),
                    die,
                };
                if self.is_valid_single(&mv) {
                    moves.push(mv);
                }
            }
            return moves;
        }

        for rel in 1..=6u8 {
            let from = color.relative(rel);
            for &die in &dice {
                let mv = Move::BearOff { from, die };
                if self.is_valid_single(&mv) {
                    moves.push(mv);
                }
            }
        }

        for from in 1..=24u8 {
            if !self.board.point(from).is_owned_by(color) {
                continue;
            }
            for &die in &dice {
                let to = from as i16 + color.direction() as i16 * die as i16;
                if !Board::is_on_board(to) {
                    continue;
                }
                let mv = Move::Normal {
                    from,
                    to: to as u8,
                    die,
                };
                if self.is_valid_single(&mv) {
                    moves.push(mv);
                }
            }
        }
        moves
    }

    /// 手番側に指せる手が残っているか
    pub fn has_valid_moves(&self) -> bool {
        !self.valid_moves().is_empty()
    }

    /// `from` から2個以上の出目を連結して初めて届く移動先
    pub fn combined_moves(&self, from: Location) -> Vec<CombinedMove> {
        if !self.status.is_in_progress() {
            return Vec::new();
        }
        let singles: Vec<Location> = self
            .valid_moves()
            .iter()
            .filter(|mv| mv.from() == from)
            .map(Move::to)
            .collect();
        CombinedMoveCalculator::new(&self.board, self.current, self.player(self.current).bar())
            .find(from, self.dice.remaining(), &singles)
    }

    // ---------------------------------------------------------------------
    // Execution
    // ---------------------------------------------------------------------

    /// 手を実行する。不正な手なら何もせず false。
    ///
    /// 複合手は1区間ずつ実行・記録し、途中で失敗したら実行済みの区間を巻き戻す。
    pub fn execute_move(&mut self, mv: &Move) -> bool {
        if !mv.is_compound() {
            return self.execute_single(mv);
        }
        let steps = mv.steps();
        if steps.is_empty() {
            return false;
        }
        for (done, step) in steps.iter().enumerate() {
            if !self.execute_single(step) {
                for _ in 0..done {
                    self.undo_last_move();
                }
                return false;
            }
        }
        true
    }

    fn execute_single(&mut self, mv: &Move) -> bool {
        if !self.is_valid_move(mv) {
            return false;
        }
        let color = self.current;
        let opponent = color.opponent();
        let Some(die) = mv.die() else {
            return false;
        };
        let opponent_bar_before = self.player(opponent).bar();
        let borne_off_before = self.player(color).off();

        let mut hit = false;
        match *mv {
            Move::Enter { to, .. } => {
                let player = &mut self.players[color.index()];
                player.set_bar(player.bar() - 1);
                hit = self.land(to, color);
            }
            Move::Normal { from, to, .. } => {
                self.board.point_mut(from).pop();
                hit = self.land(to, color);
            }
            Move::BearOff { from, .. } => {
                self.board.point_mut(from).pop();
                self.players[color.index()].set_off(borne_off_before + 1);
            }
            Move::Compound { .. } => return false,
        }

        self.dice.consume(die);
        self.turn_log.push(PlayedMove {
            mv: mv.clone(),
            color,
            hit,
            opponent_bar_before,
            borne_off_before,
        });
        debug!("{color} played {mv}{}", if hit { "*" } else { "" });

        if self.player(color).off() == CHECKERS_PER_SIDE {
            self.status = GameStatus::Finished {
                winner: color,
                reason: EndReason::BorneOff,
            };
            debug!("{color} bore off all checkers");
        }
        true
    }

    /// 着地処理。相手のブロットがあればバーへ送り true。
    fn land(&mut self, to: u8, color: Color) -> bool {
        let opponent = color.opponent();
        let hit = self.board.point(to).is_hittable_by(color);
        if hit {
            self.board.point_mut(to).pop();
            let player = &mut self.players[opponent.index()];
            player.set_bar(player.bar() + 1);
        }
        self.board.point_mut(to).push(color);
        hit
    }

    /// 直前の手を巻き戻し、その手を返す
    ///
    /// 記録された直前状態だけを使って戻す。その手で終局していた場合は対局中に戻す。
    pub fn undo_last_move(&mut self) -> Option<Move> {
        let played = self.turn_log.pop()?;
        let color = played.color;
        let opponent = color.opponent();

        match played.mv {
            Move::Enter { to, .. } => {
                self.board.point_mut(to).pop();
                let player = &mut self.players[color.index()];
                player.set_bar(player.bar() + 1);
            }
            Move::Normal { from, to, .. } => {
                self.board.point_mut(to).pop();
                self.board.point_mut(from).push(color);
            }
            Move::BearOff { from, .. } => {
                self.players[color.index()].set_off(played.borne_off_before);
                self.board.point_mut(from).push(color);
            }
            Move::Compound { .. } => {}
        }
        if played.hit {
            if let Location::Point(to) = played.mv.to() {
                self.board.point_mut(to).push(opponent);
            }
        }
        self.players[opponent.index()].set_bar(played.opponent_bar_before);

        if let Some(die) = played.mv.die() {
            self.dice.restore(die);
        }
        if self.status
            == (GameStatus::Finished {
                winner: color,
                reason: EndReason::BorneOff,
            })
        {
            self.status = GameStatus::InProgress;
        }
        self.current = color;
        debug!("{color} undid {}", played.mv);
        Some(played.mv)
    }

    // ---------------------------------------------------------------------
    // Cube / resignation
    // ---------------------------------------------------------------------

    /// 手番側がダブルを掛ける（ダイスを振る前のみ）
    pub fn offer_double(&mut self) -> Result<(), GameError> {
        self.ensure_in_progress()?;
        if self.pending_double.is_some() {
            return Err(GameError::DoublePending);
        }
        let color = self.current;
        if self.dice.is_rolled() || !self.cube.can_double(color) {
            return Err(GameError::CannotDouble(color));
        }
        self.pending_double = Some(color);
        debug!("{color} offers a double at {}", self.cube.value());
        Ok(())
    }

    /// ダブルを受ける。キューブは倍になり受けた側の所有になる。
    pub fn accept_double(&mut self) -> Result<(), GameError> {
        self.ensure_in_progress()?;
        let doubler = self.pending_double.take().ok_or(GameError::NoPendingDouble)?;
        self.cube.double(doubler.opponent());
        debug!("{} takes, cube is {}", doubler.opponent(), self.cube.value());
        Ok(())
    }

    /// ダブルを拒否する。ダブルを掛けた側の勝ちで終局。
    pub fn decline_double(&mut self) -> Result<(), GameError> {
        self.ensure_in_progress()?;
        let doubler = self.pending_double.take().ok_or(GameError::NoPendingDouble)?;
        self.status = GameStatus::Finished {
            winner: doubler,
            reason: EndReason::CubeDropped,
        };
        debug!("{} drops", doubler.opponent());
        Ok(())
    }

    /// 投了
    pub fn resign(&mut self, color: Color) -> Result<(), GameError> {
        self.finish_against(color, EndReason::Resigned)
    }

    /// 没収負け
    pub fn forfeit(&mut self, color: Color) -> Result<(), GameError> {
        self.finish_against(color, EndReason::Forfeit)
    }

    fn finish_against(&mut self, loser: Color, reason: EndReason) -> Result<(), GameError> {
        self.ensure_in_progress()?;
        self.pending_double = None;
        self.status = GameStatus::Finished {
            winner: loser.opponent(),
            reason,
        };
        debug!("{loser} loses by {reason:?}");
        Ok(())
    }

    /// 終局結果（対局中なら None）
    pub fn game_result(&self) -> Option<GameResult> {
        let GameStatus::Finished { winner, reason } = self.status else {
            return None;
        };
        let loser = winner.opponent();
        let win_type = match reason {
            EndReason::CubeDropped => WinType::Normal,
            _ => WinType::classify(
                &self.board,
                winner,
                self.player(loser).bar(),
                self.player(loser).off(),
            ),
        };
        let cube_value = self.cube.value();
        Some(GameResult {
            winner,
            loser,
            reason,
            win_type,
            cube_value,
            points: cube_value as u32 * win_type.multiplier(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(setup: impl FnOnce(&mut Position)) -> GameEngine {
        let mut pos = Position::empty(Color::White);
        setup(&mut pos);
        GameEngine::from_position(&pos).unwrap()
    }

    #[test]
    fn test_not_started_preconditions() {
        let mut engine = GameEngine::with_seed(1);
        assert_eq!(engine.roll_dice(), Err(GameError::NotStarted));
        assert_eq!(engine.end_turn(), Err(GameError::NotStarted));
        assert!(engine.valid_moves().is_empty());
    }

    #[test]
    fn test_start_new_game_opening_roll() {
        let mut engine = GameEngine::with_seed(42);
        let first = engine.start_new_game();
        assert_eq!(engine.current_player(), first);
        let (hi, lo) = engine.dice().values().unwrap();
        assert!(hi > lo);
        assert_eq!(engine.remaining_dice(), &[hi, lo]);
        assert_eq!(engine.position().board, Board::standard());
        assert!(engine.status().is_in_progress());
    }

    #[test]
    fn test_set_dice_rejects_invalid() {
        let mut engine = GameEngine::with_seed(3);
        engine.start_new_game();
        assert_eq!(engine.set_dice(0, 3), Err(GameError::InvalidDie(0)));
        assert_eq!(engine.set_dice(4, 7), Err(GameError::InvalidDie(7)));
        assert_eq!(engine.set_dice(4, 4), Ok(()));
        assert_eq!(engine.remaining_dice(), &[4, 4, 4, 4]);
    }

    #[test]
    fn test_normal_move_and_hit() {
        let mut engine = engine_with(|pos| {
            pos.board.set(13, Color::White, 2);
            pos.board.set(8, Color::Red, 1);
            pos.dice = Some((5, 2));
        });
        let mv = Move::Normal { from: 13, to: 8, die: 5 };
        assert!(engine.is_valid_move(&mv));
        assert!(engine.execute_move(&mv));
        assert_eq!(engine.board().count(8, Color::White), 1);
        assert_eq!(engine.player(Color::Red).bar(), 1);
        assert!(engine.turn_log()[0].hit);
        assert_eq!(engine.remaining_dice(), &[2]);
        // 同じ出目はもう使えない
        assert!(!engine.execute_move(&mv));
    }

    #[test]
    fn test_blocked_destination() {
        let engine = engine_with(|pos| {
            pos.board.set(13, Color::White, 2);
            pos.board.set(8, Color::Red, 2);
            pos.dice = Some((5, 2));
        });
        assert!(!engine.is_valid_move(&Move::Normal { from: 13, to: 8, die: 5 }));
        assert!(engine.is_valid_move(&Move::Normal { from: 13, to: 11, die: 2 }));
        // 出目と距離が合わない
        assert!(!engine.is_valid_move(&Move::Normal { from: 13, to: 10, die: 2 }));
    }

    #[test]
    fn test_bar_forces_entry() {
        let engine = engine_with(|pos| {
            pos.board.set(13, Color::Red, 2);
            pos.bar[Color::Red.index()] = 1;
            pos.board.set(3, Color::White, 2);
            pos.side_to_move = Color::Red;
            pos.dice = Some((3, 4));
        });
        let moves = engine.valid_moves();
        assert_eq!(moves, vec![Move::Enter { to: 4, die: 4 }]);
        assert!(!engine.is_valid_move(&Move::Normal { from: 13, to: 16, die: 3 }));
    }

    #[test]
    fn test_bear_off_boundary() {
        let mut engine = engine_with(|pos| {
            pos.board.set(3, Color::White, 1);
            pos.board.set(5, Color::White, 1);
            pos.dice = Some((6, 6));
        });
        assert!(engine.can_bear_off(5, 6));
        assert!(!engine.can_bear_off(3, 6));
        assert!(engine.execute_move(&Move::BearOff { from: 5, die: 6 }));
        assert!(engine.can_bear_off(3, 6));
    }

    #[test]
    fn test_bear_off_requires_all_home() {
        let engine = engine_with(|pos| {
            pos.board.set(3, Color::White, 1);
            pos.board.set(7, Color::White, 1);
            pos.dice = Some((3, 1));
        });
        assert!(!engine.can_bear_off(3, 3));
        assert!(
            !engine
                .valid_moves()
                .iter()
                .any(|mv| matches!(mv, Move::BearOff { .. }))
        );
    }

    #[test]
    fn test_red_bear_off_uses_mirrored_distance() {
        let engine = engine_with(|pos| {
            pos.board.set(22, Color::Red, 1);
            pos.side_to_move = Color::Red;
            pos.dice = Some((3, 5));
        });
        assert!(engine.can_bear_off(22, 3));
        assert!(engine.can_bear_off(22, 5));
        assert!(!engine.can_bear_off(22, 2));
    }

    #[test]
    fn test_valid_moves_bear_off_first() {
        let engine = engine_with(|pos| {
            pos.board.set(6, Color::White, 2);
            pos.board.set(2, Color::White, 1);
            pos.dice = Some((6, 1));
        });
        let moves = engine.valid_moves();
        assert_eq!(moves[0], Move::BearOff { from: 6, die: 6 });
        assert!(moves.contains(&Move::Normal { from: 6, to: 5, die: 1 }));
        assert!(moves.contains(&Move::Normal { from: 2, to: 1, die: 1 }));
    }

    #[test]
    fn test_undo_restores_hit() {
        let mut engine = engine_with(|pos| {
            pos.board.set(13, Color::White, 1);
            pos.board.set(8, Color::Red, 1);
            pos.dice = Some((5, 3));
        });
        let before = engine.position();
        assert!(engine.execute_move(&Move::Normal { from: 13, to: 8, die: 5 }));
        assert!(engine.execute_move(&Move::Normal { from: 8, to: 5, die: 3 }));
        assert_eq!(engine.undo_last_move(), Some(Move::Normal { from: 8, to: 5, die: 3 }));
        assert_eq!(engine.undo_last_move(), Some(Move::Normal { from: 13, to: 8, die: 5 }));
        assert_eq!(engine.undo_last_move(), None);
        assert_eq!(engine.position(), before);
        let mut remaining = engine.remaining_dice().to_vec();
        remaining.sort_unstable();
        assert_eq!(remaining, vec![3, 5]);
    }

    #[test]
    fn test_winning_bear_off_and_undo_reopens() {
        let mut engine = engine_with(|pos| {
            pos.board.set(2, Color::White, 1);
            pos.off[Color::White.index()] = 14;
            pos.board.set(20, Color::Red, 15);
            pos.dice = Some((4, 1));
        });
        assert!(engine.execute_move(&Move::BearOff { from: 2, die: 4 }));
        let result = engine.game_result().unwrap();
        assert_eq!(result.winner, Color::White);
        assert_eq!(result.win_type, WinType::Gammon);
        assert_eq!(result.points, 2);

        assert!(engine.undo_last_move().is_some());
        assert!(engine.status().is_in_progress());
        assert_eq!(engine.player(Color::White).off(), 14);
    }

    #[test]
    fn test_compound_move_rolls_back_on_failure() {
        let mut engine = engine_with(|pos| {
            pos.board.set(13, Color::White, 1);
            pos.board.set(5, Color::Red, 2);
            pos.dice = Some((5, 3));
        });
        let before = engine.position();
        let mv = Move::Compound {
            from: Location::Point(13),
            hops: smallvec::smallvec![
                crate::types::Hop { to: Location::Point(8), die: 5 },
                crate::types::Hop { to: Location::Point(5), die: 3 },
            ],
        };
        assert!(!engine.is_valid_move(&mv));
        assert!(!engine.execute_move(&mv));
        assert_eq!(engine.position(), before);
        assert!(engine.turn_log().is_empty());
    }

    #[test]
    fn test_compound_move_logged_per_step() {
        let mut engine = engine_with(|pos| {
            pos.board.set(13, Color::White, 1);
            pos.dice = Some((5, 3));
        });
        let mv = Move::Compound {
            from: Location::Point(13),
            hops: smallvec::smallvec![
                crate::types::Hop { to: Location::Point(8), die: 5 },
                crate::types::Hop { to: Location::Point(5), die: 3 },
            ],
        };
        assert!(engine.is_valid_move(&mv));
        assert!(engine.execute_move(&mv));
        assert_eq!(engine.turn_log().len(), 2);
        assert_eq!(engine.board().count(5, Color::White), 1);
    }

    #[test]
    fn test_end_turn_switches_player() {
        let mut engine = GameEngine::with_seed(5);
        let first = engine.start_new_game();
        engine.end_turn().unwrap();
        assert_eq!(engine.current_player(), !first);
        assert!(!engine.dice().is_rolled());
        assert!(engine.valid_moves().is_empty());
    }

    #[test]
    fn test_double_take_and_drop() {
        let mut engine = GameEngine::with_seed(9);
        engine.start_new_game();
        engine.end_turn().unwrap();
        let doubler = engine.current_player();
        engine.offer_double().unwrap();
        assert_eq!(engine.roll_dice(), Err(GameError::DoublePending));
        assert_eq!(engine.offer_double(), Err(GameError::DoublePending));
        engine.accept_double().unwrap();
        assert_eq!(engine.cube().value(), 2);
        assert_eq!(engine.cube().owner(), Some(!doubler));
        assert_eq!(engine.accept_double(), Err(GameError::NoPendingDouble));

        // 所有権は相手にあるのでダブルできない
        assert_eq!(engine.offer_double(), Err(GameError::CannotDouble(doubler)));

        engine.end_turn().unwrap();
        engine.offer_double().unwrap();
        engine.decline_double().unwrap();
        let result = engine.game_result().unwrap();
        assert_eq!(result.winner, !doubler);
        assert_eq!(result.reason, EndReason::CubeDropped);
        assert_eq!(result.win_type, WinType::Normal);
        assert_eq!(result.points, 2);
    }

    #[test]
    fn test_cannot_double_after_rolling() {
        let mut engine = GameEngine::with_seed(11);
        let first = engine.start_new_game();
        assert_eq!(engine.offer_double(), Err(GameError::CannotDouble(first)));
    }

    #[test]
    fn test_resign_and_forfeit() {
        let mut engine = GameEngine::with_seed(2);
        engine.start_new_game();
        engine.resign(Color::Red).unwrap();
        let result = engine.game_result().unwrap();
        assert_eq!(result.winner, Color::White);
        assert_eq!(result.reason, EndReason::Resigned);
        assert_eq!(engine.forfeit(Color::White), Err(GameError::GameOver));
        assert_eq!(engine.roll_dice(), Err(GameError::GameOver));
    }

    #[test]
    fn test_load_position_rejects_excess() {
        let mut pos = Position::standard();
        pos.off[Color::White.index()] = 1;
        assert_eq!(
            GameEngine::from_position(&pos).unwrap_err(),
            GameError::TooManyCheckers {
                color: Color::White,
                count: 16
            }
        );
    }

    #[test]
    fn test_checker_total_constant_over_turn() {
        let mut engine = GameEngine::with_seed(77);
        engine.start_new_game();
        while let Some(mv) = engine.valid_moves().first().cloned() {
            assert!(engine.execute_move(&mv));
            for color in Color::ALL {
                assert_eq!(engine.checker_total(color), 15);
            }
        }
    }
}
