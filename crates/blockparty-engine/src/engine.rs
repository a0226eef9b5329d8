//! The single-player reducer.
//!
//! [`Engine`] owns one [`GameState`] and one [`Randomizer`]. Each
//! [`Intent`] resolves synchronously to the next state plus a list of
//! [`EngineEvent`]s. Every operation is total: an intent that does not
//! apply (no piece, paused, game over, blocked) leaves the state untouched
//! and returns no events.

use tracing::{debug, trace};

use crate::board::Board;
use crate::pieces::{Piece, kick_tests};
use crate::rng::{Randomizer, ThreadRandom};
use crate::scoring::{level_for, points_for};
use crate::types::Row;

// ---------------------------------------------------------------------------
// Intents and events
// ---------------------------------------------------------------------------

/// A discrete request from the input layer (or, for `Garbage`, from the
/// relay).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    /// Soft drop one row. Gravity ticks send this too.
    MoveDown,
    Rotate,
    HardDrop,
    HoldPiece,
    PauseToggle,
    Start,
    /// Rows pushed in from the bottom by an opponent's line clear. Callers
    /// validate the payload before it gets here.
    Garbage(Vec<Row>),
}

/// Something notable that happened while applying an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// The current piece locked. `lines_cleared` may be 0.
    PieceLocked { lines_cleared: u32, points: u32 },
    /// Garbage rows were pushed into the board.
    GarbageReceived { rows: usize },
    /// A new piece could not be placed.
    GameOver,
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Everything about one player's game.
///
/// Invariants kept by [`Engine`]:
/// - `current_piece` is `None` only before the first start or after game over.
/// - `level == lines / LEVEL_LINES + 1`.
/// - `can_hold` goes false on a hold and back to true on the next lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_piece: Option<Piece>,
    next_piece: Option<Piece>,
    held_piece: Option<Piece>,
    can_hold: bool,
    score: u32,
    level: u32,
    lines: u32,
    is_game_over: bool,
    is_paused: bool,
}

impl GameState {
    /// A fresh, not-yet-started game.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_piece: None,
            next_piece: None,
            held_piece: None,
            can_hold: true,
            score: 0,
            level: 1,
            lines: 0,
            is_game_over: false,
            is_paused: false,
        }
    }

    /// Locked cells only; the falling piece is not stamped in.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    pub fn next_piece(&self) -> Option<&Piece> {
        self.next_piece.as_ref()
    }

    pub fn held_piece(&self) -> Option<&Piece> {
        self.held_piece.as_ref()
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Cumulative cleared lines.
    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// The piece that player input may act on right now, if any.
    fn controllable_piece(&self) -> Option<Piece> {
        if self.is_game_over || self.is_paused {
            return None;
        }
        self.current_piece
    }

    fn fits(&self, piece: &Piece) -> bool {
        self.board.can_place(piece.cells())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Applies intents to a [`GameState`].
///
/// Randomness (which piece comes next) is the only non-determinism, and it
/// comes exclusively from `R`.
#[derive(Debug, Clone)]
pub struct Engine<R: Randomizer = ThreadRandom> {
    state: GameState,
    rng: R,
}

impl<R: Randomizer> Engine<R> {
    /// An engine with a fresh, unstarted game.
    pub fn new(rng: R) -> Self {
        Self::from_state(GameState::new(), rng)
    }

    /// Resumes from an existing state.
    pub fn from_state(state: GameState, rng: R) -> Self {
        Self { state, rng }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Applies one intent. After game over only `Start` does anything.
    pub fn apply(&mut self, intent: Intent) -> Vec<EngineEvent> {
        if self.state.is_game_over && intent != Intent::Start {
            return Vec::new();
        }

        match intent {
            Intent::Start => self.start(),
            Intent::MoveLeft => self.move_by(-1, 0),
            Intent::MoveRight => self.move_by(1, 0),
            Intent::MoveDown => self.move_by(0, 1),
            Intent::Rotate => self.rotate(),
            Intent::HardDrop => self.hard_drop(),
            Intent::HoldPiece => self.hold(),
            Intent::PauseToggle => self.toggle_pause(),
            Intent::Garbage(rows) => self.inject_garbage(&rows),
        }
    }

    /// Resets to an empty board and spawns the current and next pieces.
    pub fn start(&mut self) -> Vec<EngineEvent> {
        self.state = GameState::new();
        let current = Piece::spawn(self.rng.piece_kind());
        self.state.next_piece = Some(Piece::spawn(self.rng.piece_kind()));
        debug!(current = %current.kind, "game started");
        self.spawn(current)
    }

    /// Moves the current piece by `(dx, dy)`.
    ///
    /// A blocked downward move means the piece has landed: it locks, full
    /// rows clear, and the next piece spawns.
    pub fn move_by(&mut self, dx: i32, dy: i32) -> Vec<EngineEvent> {
        let Some(piece) = self.state.controllable_piece() else {
            return Vec::new();
        };

        let candidate = piece.shifted(dx, dy);
        if self.state.fits(&candidate) {
            self.state.current_piece = Some(candidate);
            return Vec::new();
        }

        if dy > 0 {
            return self.lock(piece);
        }
        Vec::new()
    }

    /// Rotates a quarter turn clockwise, trying kicks if the plain rotation
    /// collides. Rejected (no change) if nothing fits.
    pub fn rotate(&mut self) -> Vec<EngineEvent> {
        let Some(piece) = self.state.controllable_piece() else {
            return Vec::new();
        };

        let turned = piece.turned_cw();
        if self.state.fits(&turned) {
            self.state.current_piece = Some(turned);
            return Vec::new();
        }

        let delta = turned.rotation.delta_from(piece.rotation);
        let kicked = kick_tests(piece.kind, piece.rotation, delta)
            .iter()
            .map(|&(dx, dy)| turned.shifted(dx, dy))
            .find(|candidate| self.state.fits(candidate));

        if let Some(kicked) = kicked {
            self.state.current_piece = Some(kicked);
        }
        Vec::new()
    }

    /// Drops the current piece as far as it goes, then locks it.
    pub fn hard_drop(&mut self) -> Vec<EngineEvent> {
        let Some(mut piece) = self.state.controllable_piece() else {
            return Vec::new();
        };

        while self.state.fits(&piece.shifted(0, 1)) {
            piece = piece.shifted(0, 1);
        }
        self.state.current_piece = Some(piece);
        self.move_by(0, 1)
    }

    /// Swaps the current piece into the hold slot. Allowed once per piece.
    pub fn hold(&mut self) -> Vec<EngineEvent> {
        let Some(piece) = self.state.controllable_piece() else {
            return Vec::new();
        };
        if !self.state.can_hold {
            return Vec::new();
        }

        let incoming = match self.state.held_piece.take() {
            Some(held) => held.recentered(),
            None => self.take_next(),
        };
        self.state.held_piece = Some(piece.recentered());
        self.state.can_hold = false;
        trace!(held = %piece.kind, current = %incoming.kind, "piece held");
        self.spawn(incoming)
    }

    /// Flips the pause flag.
    pub fn toggle_pause(&mut self) -> Vec<EngineEvent> {
        if self.state.is_game_over {
            return Vec::new();
        }
        self.state.is_paused = !self.state.is_paused;
        Vec::new()
    }

    /// Pushes `rows` in from the bottom, dropping the same number of rows off
    /// the top. Scoring is untouched.
    ///
    /// If the falling piece now overlaps the raised stack it is lifted with
    /// it, by the smallest amount that frees it.
    pub fn inject_garbage(&mut self, rows: &[Row]) -> Vec<EngineEvent> {
        if self.state.is_paused || self.state.is_game_over {
            return Vec::new();
        }

        let pushed = self.state.board.push_rows_from_bottom(rows);
        if pushed == 0 {
            return Vec::new();
        }

        if let Some(piece) = self.state.current_piece {
            if !self.state.fits(&piece) {
                let lifted = (1..=pushed as i32)
                    .map(|k| piece.shifted(0, -k))
                    .find(|candidate| self.state.fits(candidate));
                if let Some(lifted) = lifted {
                    self.state.current_piece = Some(lifted);
                }
            }
        }

        debug!(rows = pushed, "garbage received");
        vec![EngineEvent::GarbageReceived { rows: pushed }]
    }

    /// Where the current piece would land if hard-dropped now.
    pub fn ghost(&self) -> Option<Piece> {
        let mut ghost = self.state.current_piece?;
        while self.state.fits(&ghost.shifted(0, 1)) {
            ghost = ghost.shifted(0, 1);
        }
        Some(ghost)
    }

    // -- internals --------------------------------------------------------

    fn lock(&mut self, piece: Piece) -> Vec<EngineEvent> {
        let state = &mut self.state;
        state.board.lock(piece.cells(), piece.kind.into());

        let lines_cleared = state.board.clear_full_rows();
        let points = points_for(lines_cleared);
        state.score += points;
        state.lines += lines_cleared;
        state.level = level_for(state.lines);
        state.can_hold = true;

        trace!(kind = %piece.kind, lines_cleared, points, "piece locked");

        let mut events = vec![EngineEvent::PieceLocked {
            lines_cleared,
            points,
        }];
        let next = self.take_next();
        events.extend(self.spawn(next));
        events
    }

    /// Promotes the preview piece and draws a new preview.
    fn take_next(&mut self) -> Piece {
        let next = self
            .state
            .next_piece
            .take()
            .unwrap_or_else(|| Piece::spawn(self.rng.piece_kind()));
        self.state.next_piece = Some(Piece::spawn(self.rng.piece_kind()));
        next
    }

    /// Makes `piece` current, or ends the game if it does not fit.
    fn spawn(&mut self, piece: Piece) -> Vec<EngineEvent> {
        if self.state.fits(&piece) {
            self.state.current_piece = Some(piece);
            return Vec::new();
        }

        self.state.current_piece = None;
        self.state.is_game_over = true;
        debug!(
            kind = %piece.kind,
            score = self.state.score,
            lines = self.state.lines,
            "spawn blocked, game over"
        );
        vec![EngineEvent::GameOver]
    }
}

impl Default for Engine<ThreadRandom> {
    fn default() -> Self {
        Self::new(ThreadRandom)
    }
}

// =========================================================================
// Tests
// =========================================================================
