//! Playfield: locked cells, collision, merge and row sweep.

use crate::game::Position;
use crate::matrix::{Cell, Matrix, create_matrix};

pub const ARENA_WIDTH: usize = 12;
pub const ARENA_HEIGHT: usize = 20;

/// Points for the first row of a sweep; each further row in the same sweep doubles it.
const BASE_ROW_POINTS: u32 = 10;

/// Result of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sweep {
    pub rows_cleared: u32,
    pub points: u32,
}

/// Fixed-size grid of locked cells. Dimensions never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena {
    grid: Matrix,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT)
    }
}

impl Arena {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: create_matrix(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.grid.get(x, y)
    }

    pub fn set(&mut self, x: i32, y: i32, value: Cell) -> bool {
        self.grid.set(x, y, value)
    }

    pub fn grid(&self) -> &Matrix {
        &self.grid
    }

    /// Zero every cell (game-over restart).
    pub fn clear(&mut self) {
        self.grid.fill(0);
    }

    /// Remove complete rows bottom-up, refilling from the top.
    ///
    /// After a removal the same index is checked again since the rows above
    /// moved into it. Scores 10, 20, 40, ... for successive rows of this call.
    pub fn sweep(&mut self) -> Sweep {
        let mut sweep = Sweep::default();
        let mut multiplier = 1;
        let mut y = self.height();
        while y > 0 {
            if self.grid.row_is_full(y - 1) {
                self.grid.recycle_row_to_top(y - 1);
                sweep.rows_cleared += 1;
                sweep.points += BASE_ROW_POINTS * multiplier;
                multiplier *= 2;
            } else {
                y -= 1;
            }
        }
        sweep
    }
}

/// True if any occupied piece cell lands on an occupied or out-of-range arena cell.
pub fn collide(arena: &Arena, piece: &Matrix, pos: Position) -> bool {
    piece
        .cells()
        .any(|(x, y, _)| arena.get(pos.x + x, pos.y + y) != Some(0))
}

/// Write the piece's occupied cells into the arena.
///
/// Callers must have checked `collide` at `pos` first.
pub fn merge(arena: &mut Arena, piece: &Matrix, pos: Position) {
    for (x, y, value) in piece.cells() {
        let written = arena.set(pos.x + x, pos.y + y, value);
        debug_assert!(written, "merge out of range at ({}, {})", pos.x + x, pos.y + y);
    }
}
