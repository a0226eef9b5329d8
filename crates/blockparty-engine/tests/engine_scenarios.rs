//! Black-box scenarios driven only through the public engine API.

use blockparty_engine::{
    BOARD_HEIGHT, BOARD_WIDTH, Block, Engine, EngineEvent, Intent, PieceKind, Row, ScriptedRandom,
    SeededRandom, gravity_interval,
};

fn garbage_row(hole: usize) -> Row {
    let mut row = [Some(Block::Garbage); BOARD_WIDTH];
    row[hole] = None;
    row
}

/// Checks the invariants every reachable state must satisfy.
fn assert_consistent<R: blockparty_engine::Randomizer>(engine: &Engine<R>) {
    let state = engine.state();
    assert_eq!(state.board().rows().len(), BOARD_HEIGHT);
    assert_eq!(state.level(), state.lines() / 10 + 1);

    match state.current_piece() {
        Some(piece) => {
            assert!(!state.is_game_over());
            assert!(state.board().can_place(piece.cells()), "piece overlaps");
        }
        None => assert!(state.is_game_over()),
    }
}

// =========================================================================
// Long random sessions
// =========================================================================

#[test]
fn test_seeded_random_play_keeps_invariants() {
    let intents = [
        Intent::MoveLeft,
        Intent::MoveRight,
        Intent::MoveDown,
        Intent::Rotate,
        Intent::HardDrop,
        Intent::HoldPiece,
    ];

    for seed in 0..8 {
        let mut engine = Engine::new(SeededRandom::new(seed));
        let mut chooser = SeededRandom::new(seed + 1000);
        engine.apply(Intent::Start);

        for _ in 0..2_000 {
            let pick = blockparty_engine::Randomizer::pick(&mut chooser, intents.len());
            engine.apply(intents[pick].clone());
            assert_consistent(&engine);
            if engine.state().is_game_over() {
                break;
            }
        }
    }
}

#[test]
fn test_score_never_decreases_while_playing() {
    let mut engine = Engine::new(SeededRandom::new(7));
    engine.apply(Intent::Start);
    let mut last_score = 0;

    while !engine.state().is_game_over() {
        engine.apply(Intent::HardDrop);
        assert!(engine.state().score() >= last_score);
        last_score = engine.state().score();
    }
}

// =========================================================================
// Stacking to the top
// =========================================================================

#[test]
fn test_hard_dropping_o_pieces_eventually_ends_the_game() {
    let mut engine = Engine::new(ScriptedRandom::always(PieceKind::O));
    engine.apply(Intent::Start);

    let mut drops = 0;
    let mut saw_game_over = false;
    while drops < BOARD_HEIGHT {
        let events = engine.apply(Intent::HardDrop);
        drops += 1;
        if events.contains(&EngineEvent::GameOver) {
            saw_game_over = true;
            break;
        }
    }

    // Ten stacked O pieces fill the spawn columns; the eleventh can't spawn.
    assert!(saw_game_over);
    assert_eq!(drops, BOARD_HEIGHT / 2);
    assert!(engine.state().current_piece().is_none());
    assert!(engine.apply(Intent::HardDrop).is_empty());

    // Start begins a brand new game.
    engine.apply(Intent::Start);
    assert!(!engine.state().is_game_over());
    assert_eq!(engine.state().board().filled_cells(), 0);
}

// =========================================================================
// Garbage
// =========================================================================

#[test]
fn test_garbage_then_clear_through_the_hole() {
    let mut engine = Engine::new(ScriptedRandom::always(PieceKind::I));
    engine.apply(Intent::Start);

    // Four rows each missing column 6.
    let rows = vec![garbage_row(6); 4];
    let events = engine.apply(Intent::Garbage(rows));
    assert_eq!(events, vec![EngineEvent::GarbageReceived { rows: 4 }]);
    assert_eq!(engine.state().score(), 0);

    // A vertical I at spawn covers column 6.
    engine.apply(Intent::Rotate);
    let events = engine.apply(Intent::HardDrop);

    assert_eq!(
        events[0],
        EngineEvent::PieceLocked {
            lines_cleared: 4,
            points: 800
        }
    );
    assert_eq!(engine.state().board().filled_cells(), 0);
}

#[test]
fn test_oversized_garbage_is_capped_at_board_height() {
    let mut engine = Engine::new(ScriptedRandom::always(PieceKind::T));
    engine.apply(Intent::Start);

    let rows = vec![garbage_row(0); BOARD_HEIGHT + 5];
    let events = engine.apply(Intent::Garbage(rows));

    assert_eq!(
        events,
        vec![EngineEvent::GarbageReceived { rows: BOARD_HEIGHT }]
    );
    assert_eq!(engine.state().board().rows().len(), BOARD_HEIGHT);
}

#[test]
fn test_empty_garbage_is_a_noop() {
    let mut engine = Engine::new(ScriptedRandom::always(PieceKind::T));
    engine.apply(Intent::Start);
    let before = engine.state().clone();
    assert!(engine.apply(Intent::Garbage(Vec::new())).is_empty());
    assert_eq!(engine.state(), &before);
}

// =========================================================================
// Gravity
// =========================================================================

#[test]
fn test_gravity_gets_faster_with_level() {
    let mut previous = gravity_interval(1);
    for level in 2..=10 {
        let interval = gravity_interval(level);
        assert!(interval < previous);
        previous = interval;
    }
}
