//! Tetromino shapes, rotation, and kick tables.
//!
//! Each kind has one base shape laid out in a square bounding box. Other
//! orientations are derived by rotating that box clockwise a quarter turn
//! at a time, so a piece's cells are a pure function of
//! `(kind, rotation, position)`.
//!
//! Kick offsets follow SRS clockwise data, converted to this crate's
//! y-down grid (positive `dy` moves a piece down).

use crate::types::{PieceKind, Position, Rotation, SPAWN_POSITION};

/// Offset of one mino inside its bounding box.
pub type MinoOffset = (i32, i32);

/// The four minos of a piece in one orientation.
pub type Shape = [MinoOffset; 4];

/// A `(dx, dy)` translation tried after a colliding rotation.
pub type Kick = (i32, i32);

/// Base (spawn orientation) shape and bounding box size for a kind.
fn base_shape(kind: PieceKind) -> (Shape, i32) {
    match kind {
        PieceKind::I => ([(0, 1), (1, 1), (2, 1), (3, 1)], 4),
        PieceKind::O => ([(0, 0), (1, 0), (0, 1), (1, 1)], 2),
        PieceKind::T => ([(1, 0), (0, 1), (1, 1), (2, 1)], 3),
        PieceKind::S => ([(1, 0), (2, 0), (0, 1), (1, 1)], 3),
        PieceKind::Z => ([(0, 0), (1, 0), (1, 1), (2, 1)], 3),
        PieceKind::J => ([(0, 0), (0, 1), (1, 1), (2, 1)], 3),
        PieceKind::L => ([(2, 0), (0, 1), (1, 1), (2, 1)], 3),
    }
}

/// Returns the mino offsets for `kind` turned to `rotation`.
///
/// A clockwise quarter turn of an `n`x`n` box maps `(x, y)` to
/// `(n - 1 - y, x)`.
pub fn shape(kind: PieceKind, rotation: Rotation) -> Shape {
    let (mut cells, size) = base_shape(kind);
    for _ in 0..rotation.quarter_turns() {
        for cell in &mut cells {
            *cell = (size - 1 - cell.1, cell.0);
        }
    }
    cells
}

// ---------------------------------------------------------------------------
// Kick tables
// ---------------------------------------------------------------------------

/// J, L, S, T, Z (and O) clockwise kicks, indexed by the starting rotation.
const JLSTZ_CW_KICKS: [[Kick; 4]; 4] = [
    // 0 -> 90
    [(-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 90 -> 180
    [(1, 0), (1, 1), (0, -2), (1, -2)],
    // 180 -> 270
    [(1, 0), (1, -1), (0, 2), (1, 2)],
    // 270 -> 0
    [(-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

/// I clockwise kicks, indexed by the starting rotation.
const I_CW_KICKS: [[Kick; 4]; 4] = [
    // 0 -> 90
    [(-2, 0), (1, 0), (-2, 1), (1, -2)],
    // 90 -> 180
    [(-1, 0), (2, 0), (-1, -2), (2, 1)],
    // 180 -> 270
    [(2, 0), (-1, 0), (2, -1), (-1, 2)],
    // 270 -> 0
    [(1, 0), (-2, 0), (1, 2), (-2, -1)],
];

/// Kick tests for rotating `kind` out of `from` by `delta`.
///
/// Only clockwise quarter turns have tests; any other delta gets an empty
/// list, which means "no kicks".
pub fn kick_tests(kind: PieceKind, from: Rotation, delta: Rotation) -> &'static [Kick] {
    if delta != Rotation::R90 {
        return &[];
    }
    let table = match kind {
        PieceKind::I => &I_CW_KICKS,
        _ => &JLSTZ_CW_KICKS,
    };
    &table[usize::from(from.quarter_turns())]
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A falling tetromino: kind, bounding-box position, and orientation.
///
/// The kind is drawn once when the piece is created and never changes,
/// so repeated shape queries for the same piece always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub position: Position,
    pub rotation: Rotation,
}

impl Piece {
    /// A new piece of `kind` at the spawn position, unrotated.
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            position: SPAWN_POSITION,
            rotation: Rotation::R0,
        }
    }

    /// Absolute grid cells this piece covers.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let Position { x, y } = self.position;
        shape(self.kind, self.rotation)
            .into_iter()
            .map(move |(dx, dy)| (x + dx, y + dy))
    }

    /// The same piece moved by `(dx, dy)`.
    pub fn shifted(self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.offset(dx, dy),
            ..self
        }
    }

    /// The same piece turned one quarter clockwise in place.
    pub fn turned_cw(self) -> Self {
        Self {
            rotation: self.rotation.cw(),
            ..self
        }
    }

    /// The same piece moved back to the spawn position (rotation kept).
    pub fn recentered(self) -> Self {
        Self {
            position: SPAWN_POSITION,
            ..self
        }
    }
}
