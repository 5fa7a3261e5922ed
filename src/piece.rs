//! The seven tetrominoes and their spawn grids.

use crate::matrix::{Cell, Matrix};

/// Tetromino kinds, in spawn-pick order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    L,
    J,
    O,
    T,
    S,
    Z,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [Self::I, Self::L, Self::J, Self::O, Self::T, Self::S, Self::Z];

    /// Colour id written into the arena for this kind (1..=7).
    pub fn color_id(self) -> Cell {
        match self {
            Self::T => 1,
            Self::O => 2,
            Self::L => 3,
            Self::J => 4,
            Self::I => 5,
            Self::S => 6,
            Self::Z => 7,
        }
    }
}

/// Fresh spawn grid for `kind`. Each call allocates; rotation mutates the grid in place.
pub fn create_piece(kind: PieceKind) -> Matrix {
    match kind {
        PieceKind::T => Matrix::from_rows(&[[0, 0, 0], [1, 1, 1], [0, 1, 0]]),
        PieceKind::O => Matrix::from_rows(&[[2, 2], [2, 2]]),
        PieceKind::L => Matrix::from_rows(&[[0, 3, 0], [0, 3, 0], [0, 3, 3]]),
        PieceKind::J => Matrix::from_rows(&[[0, 4, 0], [0, 4, 0], [4, 4, 0]]),
        PieceKind::I => Matrix::from_rows(&[[0, 5, 0, 0], [0, 5, 0, 0], [0, 5, 0, 0], [0, 5, 0, 0]]),
        PieceKind::S => Matrix::from_rows(&[[0, 6, 6], [6, 6, 0], [0, 0, 0]]),
        PieceKind::Z => Matrix::from_rows(&[[7, 7, 0], [0, 7, 7], [0, 0, 0]]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::rotate;
    use std::collections::HashSet;

    fn occupied(m: &Matrix) -> Vec<(i32, i32)> {
        m.cells().map(|(x, y, _)| (x, y)).collect()
    }

    #[test]
    fn test_piece_cells_exact() {
        let expected: [(PieceKind, Vec<(i32, i32)>); 7] = [
            (PieceKind::T, vec![(0, 1), (1, 1), (2, 1), (1, 2)]),
            (PieceKind::O, vec![(0, 0), (1, 0), (0, 1), (1, 1)]),
            (PieceKind::L, vec![(1, 0), (1, 1), (1, 2), (2, 2)]),
            (PieceKind::J, vec![(1, 0), (1, 1), (0, 2), (1, 2)]),
            (PieceKind::I, vec![(1, 0), (1, 1), (1, 2), (1, 3)]),
            (PieceKind::S, vec![(1, 0), (2, 0), (0, 1), (1, 1)]),
            (PieceKind::Z, vec![(0, 0), (1, 0), (1, 1), (2, 1)]),
        ];
        for (kind, cells) in expected {
            let m = create_piece(kind);
            assert_eq!(occupied(&m), cells, "{:?}", kind);
            assert!(m.cells().all(|(_, _, v)| v == kind.color_id()), "{:?}", kind);
        }
    }

    #[test]
    fn test_piece_grids_are_square() {
        for kind in PieceKind::ALL {
            let m = create_piece(kind);
            assert_eq!(m.width(), m.height(), "{:?}", kind);
        }
    }

    #[test]
    fn test_color_ids_distinct() {
        let ids: HashSet<Cell> = PieceKind::ALL.iter().map(|k| k.color_id()).collect();
        assert_eq!(ids.len(), 7);
        assert!(ids.iter().all(|&id| (1..=7).contains(&id)));
    }

    #[test]
    fn test_spawns_are_independent() {
        let mut a = create_piece(PieceKind::T);
        let b = create_piece(PieceKind::T);
        rotate(&mut a, 1);
        assert_ne!(a, b);
        assert_eq!(b, create_piece(PieceKind::T));
    }

    #[test]
    fn test_every_piece_four_rotations_identity() {
        for kind in PieceKind::ALL {
            let original = create_piece(kind);
            let mut m = original.clone();
            for _ in 0..4 {
                rotate(&mut m, 1);
            }
            assert_eq!(m, original, "{:?}", kind);
        }
    }
}
