//! Shared board vocabulary: dimensions, piece kinds, cells, rotations.
//!
//! These are the types both sides of the wire agree on. The relay never
//! simulates anything, but it does carry boards made of these cells and
//! it builds garbage rows out of them.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// Number of columns on a board.
pub const BOARD_WIDTH: usize = 10;

/// Number of rows on a board.
pub const BOARD_HEIGHT: usize = 20;

/// Column where new pieces appear (left edge of their bounding box).
pub const SPAWN_X: i32 = (BOARD_WIDTH / 2) as i32 - 1;

/// Row where new pieces appear (top edge of their bounding box).
pub const SPAWN_Y: i32 = 0;

// ---------------------------------------------------------------------------
// PieceKind
// ---------------------------------------------------------------------------

/// One of the seven tetromino types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds, in the order the randomizer indexes them.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::I => 'I',
            Self::O => 'O',
            Self::T => 'T',
            Self::S => 'S',
            Self::Z => 'Z',
            Self::J => 'J',
            Self::L => 'L',
        };
        write!(f, "{c}")
    }
}

// ---------------------------------------------------------------------------
// Block / Cell / Row
// ---------------------------------------------------------------------------

/// What occupies a filled cell.
///
/// Locked pieces keep their kind so renderers can color them. `Garbage`
/// only ever arrives from an opponent's line clear.
///
/// On the wire a block is a bare string: `"I"` … `"L"`, or `"garbage"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Block {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
    #[serde(rename = "garbage")]
    Garbage,
}

impl From<PieceKind> for Block {
    fn from(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => Block::I,
            PieceKind::O => Block::O,
            PieceKind::T => Block::T,
            PieceKind::S => Block::S,
            PieceKind::Z => Block::Z,
            PieceKind::J => Block::J,
            PieceKind::L => Block::L,
        }
    }
}

/// A single board cell. `None` is empty and serializes as `null`.
pub type Cell = Option<Block>;

/// One board row. The array length is the width invariant.
pub type Row = [Cell; BOARD_WIDTH];

/// An all-empty row.
pub const EMPTY_ROW: Row = [None; BOARD_WIDTH];

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

/// Orientation of a piece, in clockwise quarter turns from spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Number of clockwise quarter turns (0..=3).
    pub fn quarter_turns(self) -> u8 {
        match self {
            Self::R0 => 0,
            Self::R90 => 1,
            Self::R180 => 2,
            Self::R270 => 3,
        }
    }

    /// Builds a rotation from any number of quarter turns (wraps mod 4).
    pub fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Self::R0,
            1 => Self::R90,
            2 => Self::R180,
            _ => Self::R270,
        }
    }

    /// The rotation in degrees: 0, 90, 180 or 270.
    pub fn degrees(self) -> u16 {
        u16::from(self.quarter_turns()) * 90
    }

    /// One clockwise quarter turn further.
    pub fn cw(self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + 1)
    }

    /// The rotation that takes `from` to `self`.
    pub fn delta_from(self, from: Rotation) -> Rotation {
        Self::from_quarter_turns(4 + self.quarter_turns() - from.quarter_turns())
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Grid position of a piece's bounding box (top-left corner).
///
/// `y` may be negative while a piece is partially above the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Where freshly spawned (or held-and-swapped) pieces are placed.
pub const SPAWN_POSITION: Position = Position::new(SPAWN_X, SPAWN_Y);
