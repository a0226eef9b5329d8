//! Falling-block game engine for Blockparty.
//!
//! A pure, synchronous reducer: an [`Engine`] takes an [`Intent`] and moves
//! its [`GameState`] forward. Nothing here does I/O or reads a clock.
//! Gravity is just a caller sending [`Intent::MoveDown`] every
//! [`gravity_interval`], and the only randomness comes through the
//! [`Randomizer`] the engine was built with.
//!
//! # Key types
//!
//! - [`Engine`] / [`GameState`]: the reducer and the state it owns
//! - [`Board`]: the fixed-size grid with the shared placement rule
//! - [`Piece`] / [`PieceKind`] / [`Rotation`]: tetrominoes and their poses
//! - [`Randomizer`]: the injectable source of piece kinds

mod board;
mod engine;
mod pieces;
mod rng;
mod scoring;
mod types;

pub use board::Board;
pub use engine::{Engine, EngineEvent, GameState, Intent};
pub use pieces::{Kick, MinoOffset, Piece, Shape, kick_tests, shape};
pub use rng::{Randomizer, ScriptedRandom, SeededRandom, ThreadRandom};
pub use scoring::{
    INITIAL_GRAVITY, LEVEL_LINES, POINTS_DOUBLE, POINTS_SINGLE, POINTS_TETRIS, POINTS_TRIPLE,
    gravity_interval, level_for, points_for,
};
pub use types::{
    BOARD_HEIGHT, BOARD_WIDTH, Block, Cell, EMPTY_ROW, PieceKind, Position, Row, Rotation,
    SPAWN_POSITION, SPAWN_X, SPAWN_Y,
};
