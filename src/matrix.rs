//! Cell grids shared by the arena and the falling piece.

use std::collections::VecDeque;

/// Cell value: 0 is empty, 1..=7 is a piece colour id.
pub type Cell = u8;

/// Row-major grid of cells. y=0 is the top row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix {
    /// rows[y][x] = cell. Kept as a deque so a swept row can be recycled at the top.
    rows: VecDeque<Vec<Cell>>,
}

/// Grid of `width` x `height` empty cells.
pub fn create_matrix(width: usize, height: usize) -> Matrix {
    Matrix {
        rows: (0..height).map(|_| vec![0; width]).collect(),
    }
}

impl Matrix {
    /// Build from literal rows (piece tables, tests).
    pub fn from_rows<const W: usize>(rows: &[[Cell; W]]) -> Self {
        Self {
            rows: rows.iter().map(|r| r.to_vec()).collect(),
        }
    }

    /// Width of the first row; 0 for an empty grid.
    #[inline]
    pub fn width(&self) -> usize {
        self.rows.front().map_or(0, Vec::len)
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cell at (x, y), or None when either coordinate falls outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Write a cell; returns false (and writes nothing) when out of range.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: Cell) -> bool {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return false;
        };
        match self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Occupied cells as (x, y, value).
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &v)| v != 0)
                .map(move |(x, &v)| (x as i32, y as i32, v))
        })
    }

    pub fn fill(&mut self, value: Cell) {
        for row in &mut self.rows {
            row.fill(value);
        }
    }

    pub(crate) fn row_is_full(&self, y: usize) -> bool {
        self.rows.get(y).is_some_and(|row| row.iter().all(|&c| c != 0))
    }

    /// Remove row `y`, zero it and reinsert it at the top; rows above shift down by one.
    pub(crate) fn recycle_row_to_top(&mut self, y: usize) {
        if let Some(mut row) = self.rows.remove(y) {
            row.fill(0);
            self.rows.push_front(row);
        }
    }
}

/// Rotate a piece grid 90 degrees in place: transpose, then mirror.
///
/// `direction > 0` turns clockwise (each row reversed), otherwise
/// counter-clockwise (row order reversed). The transpose is only a true
/// rotation for square grids; on a non-square grid swaps whose mirror cell
/// does not exist are skipped.
pub fn rotate(matrix: &mut Matrix, direction: i32) {
    let rows = &mut matrix.rows;
    for y in 0..rows.len() {
        for x in 0..y {
            if y < rows[x].len() && x < rows[y].len() {
                let (a, b) = (rows[y][x], rows[x][y]);
                rows[y][x] = b;
                rows[x][y] = a;
            }
        }
    }
    if direction > 0 {
        for row in rows.iter_mut() {
            row.reverse();
        }
    } else {
        rows.make_contiguous().reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_matrix_is_zeroed() {
        let m = create_matrix(12, 20);
        assert_eq!(m.width(), 12);
        assert_eq!(m.height(), 20);
        assert_eq!(m.cells().count(), 0);
    }

    #[test]
    fn test_get_out_of_range_is_none() {
        let m = create_matrix(3, 2);
        assert_eq!(m.get(0, 0), Some(0));
        assert_eq!(m.get(2, 1), Some(0));
        assert_eq!(m.get(-1, 0), None);
        assert_eq!(m.get(0, -1), None);
        assert_eq!(m.get(3, 0), None);
        assert_eq!(m.get(0, 2), None);
    }

    #[test]
    fn test_set_out_of_range_writes_nothing() {
        let mut m = create_matrix(3, 2);
        assert!(m.set(1, 1, 4));
        assert_eq!(m.get(1, 1), Some(4));
        assert!(!m.set(3, 0, 4));
        assert!(!m.set(-1, 0, 4));
        assert_eq!(m.cells().count(), 1);
    }

    #[test]
    fn test_rotate_clockwise() {
        let mut m = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
        rotate(&mut m, 1);
        assert_eq!(m, Matrix::from_rows(&[[7, 4, 1], [8, 5, 2], [9, 6, 3]]));
    }

    #[test]
    fn test_rotate_counter_clockwise() {
        let mut m = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
        rotate(&mut m, -1);
        assert_eq!(m, Matrix::from_rows(&[[3, 6, 9], [2, 5, 8], [1, 4, 7]]));
    }

    #[test]
    fn test_rotate_four_times_is_identity() {
        let original = Matrix::from_rows(&[[0, 5, 0, 0], [0, 5, 0, 0], [0, 5, 0, 0], [0, 5, 0, 0]]);
        for dir in [1, -1] {
            let mut m = original.clone();
            for _ in 0..4 {
                rotate(&mut m, dir);
            }
            assert_eq!(m, original);
        }
    }

    #[test]
    fn test_rotate_then_inverse_is_identity() {
        let original = Matrix::from_rows(&[[0, 6, 6], [6, 6, 0], [0, 0, 0]]);
        let mut m = original.clone();
        rotate(&mut m, 1);
        assert_ne!(m, original);
        rotate(&mut m, -1);
        assert_eq!(m, original);
    }

    #[test]
    fn test_recycle_row_to_top() {
        let mut m = Matrix::from_rows(&[[1, 0], [2, 2], [3, 0]]);
        assert!(m.row_is_full(1));
        assert!(!m.row_is_full(0));
        m.recycle_row_to_top(1);
        assert_eq!(m, Matrix::from_rows(&[[0, 0], [1, 0], [3, 0]]));
    }
}
