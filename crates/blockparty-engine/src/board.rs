//! The playfield grid.
//!
//! A board is always exactly `BOARD_HEIGHT` rows of `BOARD_WIDTH` cells.
//! Both dimensions are array lengths, so the shape invariant holds by
//! construction, and a board decoded from JSON with the wrong shape is a
//! decode error rather than a malformed grid.
//!
//! Coordinates are `(x, y)` with `x` growing rightwards and `y` growing
//! downwards; row 0 is the top.

use serde::{Deserialize, Serialize};

use crate::types::{BOARD_HEIGHT, BOARD_WIDTH, Block, Cell, EMPTY_ROW, Row};

/// A `BOARD_HEIGHT` x `BOARD_WIDTH` grid of cells.
///
/// Serializes as a plain array of rows (`(string | null)[][]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            rows: [EMPTY_ROW; BOARD_HEIGHT],
        }
    }

    /// Wraps an existing grid.
    pub fn from_rows(rows: [Row; BOARD_HEIGHT]) -> Self {
        Self { rows }
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> &[Row; BOARD_HEIGHT] {
        &self.rows
    }

    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < BOARD_WIDTH && y < BOARD_HEIGHT).then_some((x, y))
    }

    /// Returns the cell at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        Self::index(x, y).map(|(x, y)| self.rows[y][x])
    }

    /// Writes a cell. Returns `false` (and writes nothing) when out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some((x, y)) => {
                self.rows[y][x] = cell;
                true
            }
            None => false,
        }
    }

    /// Validity rule shared by movement, rotation, drops and the ghost.
    ///
    /// Every cell must sit in a column inside `[0, BOARD_WIDTH)` and a row
    /// below `BOARD_HEIGHT`. Rows above the board (`y < 0`) are allowed and
    /// never collide; cells on the board must be empty.
    pub fn can_place<I>(&self, cells: I) -> bool
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        cells.into_iter().all(|(x, y)| {
            if x < 0 || x >= BOARD_WIDTH as i32 || y >= BOARD_HEIGHT as i32 {
                return false;
            }
            y < 0 || self.rows[y as usize][x as usize].is_none()
        })
    }

    /// Stamps `block` into every on-board cell. Cells above the board are
    /// dropped.
    pub fn lock<I>(&mut self, cells: I, block: Block)
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        for (x, y) in cells {
            self.set(x, y, Some(block));
        }
    }

    /// Returns `true` if every cell in row `y` is filled.
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(Option::is_some))
    }

    /// Removes every full row, shifts the rest down and pads the top with
    /// empty rows. Returns how many rows were removed.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut kept: Vec<Row> = Vec::with_capacity(BOARD_HEIGHT);
        let mut cleared = 0;
        for row in &self.rows {
            if row.iter().all(Option::is_some) {
                cleared += 1;
            } else {
                kept.push(*row);
            }
        }
        if cleared == 0 {
            return 0;
        }

        let pad = BOARD_HEIGHT - kept.len();
        for (y, row) in self.rows.iter_mut().enumerate() {
            *row = if y < pad { EMPTY_ROW } else { kept[y - pad] };
        }
        cleared
    }

    /// Drops `incoming.len()` rows off the top and appends `incoming` at the
    /// bottom, keeping the row count fixed. At most `BOARD_HEIGHT` rows are
    /// taken from `incoming` (the last ones win).
    ///
    /// Returns how many rows were pushed in.
    pub fn push_rows_from_bottom(&mut self, incoming: &[Row]) -> usize {
        let incoming = &incoming[incoming.len().saturating_sub(BOARD_HEIGHT)..];
        let n = incoming.len();
        if n == 0 {
            return 0;
        }
        self.rows.rotate_left(n);
        self.rows[BOARD_HEIGHT - n..].copy_from_slice(incoming);
        n
    }

    /// Number of filled cells. Handy for assertions.
    pub fn filled_cells(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.is_some())
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
