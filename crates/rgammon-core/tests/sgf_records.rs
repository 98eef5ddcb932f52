use rand::RngCore;
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;
use rgammon_core::sgf::{
    CubeAction, GameLog, GameRecord, SgfError, SgfHeader, export_position, import_position,
};
use rgammon_core::{Color, DoublingCube, GameEngine, GameStatus, Position};

fn round_trip(position: &Position) -> Position {
    let text = export_position(position, &SgfHeader::default());
    import_position(&text).unwrap().0
}

#[test]
fn test_round_trip_opening_position() {
    let mut engine = GameEngine::with_seed(1);
    engine.start_new_game();
    let pos = engine.position();
    assert_eq!(round_trip(&pos), pos);
}

#[test]
fn test_round_trip_both_on_bar() {
    let mut pos = Position::empty(Color::Red);
    pos.board.set(6, Color::White, 5);
    pos.board.set(19, Color::Red, 4);
    pos.board.set(23, Color::White, 2);
    pos.bar = [2, 1];
    pos.off = [6, 10];
    pos.dice = Some((2, 2));
    pos.cube = DoublingCube::with_state(8, Some(Color::Red)).unwrap();
    let engine = GameEngine::from_position(&pos).unwrap();
    let snapshot = engine.position();
    assert_eq!(snapshot, pos);
    assert_eq!(round_trip(&snapshot), snapshot);
}

#[test]
fn test_round_trip_one_side_home() {
    let mut pos = Position::empty(Color::White);
    pos.board.set(1, Color::White, 3);
    pos.board.set(4, Color::White, 4);
    pos.board.set(6, Color::White, 1);
    pos.board.set(13, Color::Red, 15);
    pos.fill_missing_as_borne_off();
    let engine = GameEngine::from_position(&pos).unwrap();
    assert!(engine.board().all_in_home(Color::White));
    assert_eq!(round_trip(&engine.position()), engine.position());
}

#[test]
fn test_malformed_record_is_rejected() {
    assert!(matches!(
        import_position("(;GM[6];AW[a]"),
        Err(SgfError::Syntax { .. })
    ));
    assert!(matches!(
        GameRecord::parse("(;GM[6];W[31hefe]"),
        Err(SgfError::Syntax { .. })
    ));
}

#[test]
fn test_repeated_setup_letters_are_rejected() {
    // 同じ地点を大量に並べても u8 の枚数が溢れる前に打ち切る
    let text = format!("(;GM[6];AE[a:y]AW{})", "[a]".repeat(300));
    assert_eq!(
        import_position(&text),
        Err(SgfError::TooManyCheckers {
            color: Color::White,
            count: 16
        })
    );

    let text = format!("(;GM[6];AE[a:y]AB{})", "[y]".repeat(300));
    assert_eq!(
        import_position(&text),
        Err(SgfError::TooManyCheckers {
            color: Color::Red,
            count: 16
        })
    );

    let text = format!("(;GM[6];AE[a:y]AW{})", "[z]".repeat(16));
    assert!(matches!(
        import_position(&text),
        Err(SgfError::TooManyCheckers { count: 16, .. })
    ));
}

/// シード固定の自己対局を棋譜に書き出し、リプレイ結果と突き合わせる
#[test]
fn test_game_log_replays_to_same_positions() {
    let mut engine = GameEngine::with_seed(2024);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
    let header = SgfHeader {
        player_white: Some("white".to_string()),
        player_red: Some("red".to_string()),
        ..SgfHeader::default()
    };
    let mut log = GameLog::new(header);
    let mut before_positions = Vec::new();

    engine.start_new_game();
    for _ in 0..2000 {
        if engine.status() != GameStatus::InProgress {
            break;
        }
        if !engine.dice().is_rolled() {
            engine.roll_dice().unwrap();
        }
        before_positions.push(engine.position());
        let color = engine.current_player();
        let dice = engine.dice().values().unwrap();

        let mut played = Vec::new();
        loop {
            let moves = engine.valid_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[(rng.next_u32() as usize) % moves.len()].clone();
            assert!(engine.execute_move(&mv));
            played.push(mv);
        }
        log.append_turn(color, dice, &played);
        if engine.status().is_in_progress() {
            engine.end_turn().unwrap();
        }
    }

    let result = engine.game_result().expect("random game should finish");
    let text = log.finalize(&result);
    assert!(text.contains(&format!("RE[{}+", result.winner.sgf_char())));

    let record = GameRecord::parse(&text).unwrap();
    assert_eq!(record.len(), before_positions.len());
    for (turn, expected) in record.turns().iter().zip(&before_positions) {
        assert_eq!(&turn.position, expected, "turn {}", turn.number);
        let (reparsed, _) = import_position(&turn.position_sgf).unwrap();
        assert_eq!(&reparsed, expected);
    }
    assert_eq!(record.final_position(), &engine.position());
    assert_eq!(record.header().player_red.as_deref(), Some("red"));
}

#[test]
fn test_record_with_cube_and_resign() {
    let mut log = GameLog::new(SgfHeader::default());
    log.append_turn(
        Color::White,
        (3, 1),
        &[
            rgammon_core::Move::Normal { from: 8, to: 5, die: 3 },
            rgammon_core::Move::Normal { from: 6, to: 5, die: 1 },
        ],
    );
    log.append_cube_action(Color::Red, CubeAction::Double);
    log.append_cube_action(Color::White, CubeAction::Take);
    log.append_cube_action(Color::Red, CubeAction::Resign);
    let record = GameRecord::parse(&log.to_sgf()).unwrap();
    assert_eq!(record.len(), 4);
    assert_eq!(record.turns()[1].cube_action, Some(CubeAction::Double));
    assert_eq!(record.final_position().cube.value(), 2);
    assert_eq!(record.final_position().cube.owner(), Some(Color::White));
}

#[test]
fn test_record_from_setup_position() {
    let mut start = Position::empty(Color::Red);
    start.board.set(22, Color::Red, 2);
    start.board.set(3, Color::White, 1);
    start.fill_missing_as_borne_off();

    let mut log = GameLog::new(SgfHeader::default()).with_setup(&start);
    // Red 22（Red 視点 3）から 6-3: 2枚ともベアオフ
    log.append_turn(
        Color::Red,
        (6, 3),
        &[
            rgammon_core::Move::BearOff { from: 22, die: 6 },
            rgammon_core::Move::BearOff { from: 22, die: 3 },
        ],
    );
    let record = GameRecord::parse(&log.to_sgf()).unwrap();
    assert_eq!(record.start(), &start);
    assert_eq!(record.final_position().off(Color::Red), 15);
    // 1枚目は 3 の目（ちょうど）で解釈される
    assert_eq!(
        record.turns()[0].moves[0],
        rgammon_core::Move::BearOff { from: 22, die: 3 }
    );
}
