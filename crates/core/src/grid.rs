//! Grid module - dense storage of the candy cells
//!
//! The grid is `width x height` cells where each cell can be empty or hold a token.
//! Uses a flat vector for cache locality; dimensions are chosen at construction.
//! Coordinates: (x, y) where x ranges 0..width (left to right) and y ranges
//! 0..height (bottom to top).

use crate::error::EngineError;
use crate::types::{Cell, Pos, TokenType};

/// The candy grid, row-major flat storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Flat vector of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new, fully empty grid
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width * height],
        })
    }

    /// Build a grid from rows listed bottom row first
    ///
    /// Every row must have the same non-zero length.
    pub fn from_rows(rows: &[Vec<Cell>]) -> Result<Self, EngineError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || rows.iter().any(|row| row.len() != width) {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(pos.y as usize * self.width + pos.x as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if position lies on the grid
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Reject a position that is off the grid
    pub fn check_bounds(&self, pos: Pos) -> Result<(), EngineError> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(EngineError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Get cell at position
    /// Returns None if out of bounds
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Token at position, `None` when empty or out of bounds
    pub fn token(&self, pos: Pos) -> Option<TokenType> {
        self.get(pos).flatten()
    }

    /// Set cell at position
    /// Returns false if out of bounds
    pub fn set(&mut self, pos: Pos, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Exchange the contents of two cells
    /// Returns false (and changes nothing) if either is out of bounds
    pub fn swap(&mut self, a: Pos, b: Pos) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// Check whether every cell holds a token
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Number of empty cells
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// All positions in fill order: columns left to right, each bottom to top
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let height = self.height as i32;
        (0..self.width as i32).flat_map(move |x| (0..height).map(move |y| Pos::new(x, y)))
    }

    /// Get a reference to the internal cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Rows bottom first, for display and tests
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.width).map(<[Cell]>::to_vec).collect()
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenType::{Blue, Green, Red};

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(5, 10).unwrap();
        assert_eq!(grid.index(Pos::new(0, 0)), Some(0));
        assert_eq!(grid.index(Pos::new(4, 0)), Some(4));
        assert_eq!(grid.index(Pos::new(0, 1)), Some(5));
        assert_eq!(grid.index(Pos::new(4, 9)), Some(49));
        assert_eq!(grid.index(Pos::new(-1, 0)), None);
        assert_eq!(grid.index(Pos::new(5, 0)), None);
        assert_eq!(grid.index(Pos::new(0, 10)), None);
    }

    #[test]
    fn test_grid_rejects_zero_dimensions() {
        assert!(matches!(
            Grid::new(0, 3),
            Err(EngineError::InvalidDimensions { width: 0, height: 3 })
        ));
        assert!(Grid::new(3, 0).is_err());
        assert!(Grid::from_rows(&[]).is_err());
        assert!(Grid::from_rows(&[vec![Some(Red)], vec![]]).is_err());
    }

    #[test]
    fn test_grid_swap() {
        let mut grid = Grid::from_rows(&[vec![Some(Red), Some(Blue)]]).unwrap();
        assert!(grid.swap(Pos::new(0, 0), Pos::new(1, 0)));
        assert_eq!(grid.token(Pos::new(0, 0)), Some(Blue));
        assert_eq!(grid.token(Pos::new(1, 0)), Some(Red));

        let before = grid.clone();
        assert!(!grid.swap(Pos::new(0, 0), Pos::new(2, 0)));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_grid_from_rows_roundtrip() {
        let rows = vec![
            vec![Some(Red), None, Some(Green)],
            vec![None, Some(Blue), None],
        ];
        let grid = Grid::from_rows(&rows).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.token(Pos::new(1, 1)), Some(Blue));
        assert_eq!(grid.rows(), rows);
        assert_eq!(grid.empty_count(), 3);
        assert!(!grid.is_full());
    }

    #[test]
    fn test_positions_fill_order() {
        let grid = Grid::new(2, 3).unwrap();
        let order: Vec<Pos> = grid.positions().collect();
        assert_eq!(
            order,
            vec![
                Pos::new(0, 0),
                Pos::new(0, 1),
                Pos::new(0, 2),
                Pos::new(1, 0),
                Pos::new(1, 1),
                Pos::new(1, 2),
            ]
        );
    }
}
