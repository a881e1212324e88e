//! Grid module - fixed-size store of tile cells
//!
//! The grid is `cols` x `rows` cells stored as a flat row-major vector
//! (`y * cols + x`) for cache locality. Dimensions never change after
//! construction.
//! Coordinates: (x, y) where x ranges 0..cols (left to right), y ranges 0..rows
//! (top to bottom). Tiles fall toward increasing `y`.

use std::collections::HashSet;
use std::fmt;

use arrayvec::ArrayVec;

use crate::error::{BoardError, ConfigError, Result};
use crate::types::{CellState, ColorId, Pos};

/// The tile grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    /// Flat array of cells, row-major order (y * cols + x)
    cells: Vec<CellState>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(cols: usize, rows: usize) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(ConfigError::ZeroDimension { cols, rows }.into());
        }
        Ok(Self {
            cols,
            rows,
            cells: vec![CellState::Empty; cols * rows],
        })
    }

    /// Build a grid from rows of cells (top row first)
    pub fn from_rows(rows: Vec<Vec<CellState>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut grid = Self::new(width, height)?;
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(ConfigError::RaggedRows {
                    row: y,
                    expected: width,
                    found: row.len(),
                }
                .into());
            }
            for (x, cell) in row.into_iter().enumerate() {
                grid.cells[y * width + x] = cell;
            }
        }
        Ok(grid)
    }

    /// Parse a grid from text, one line per row
    ///
    /// `.` is an empty cell, `0-9` and `a-z` are colour ids 0..36.
    /// Surrounding whitespace on each line is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilepop_core::Grid;
    /// use tilepop_core::types::CellState;
    ///
    /// let grid = Grid::parse("01\n.1").unwrap();
    /// assert_eq!(grid.cols(), 2);
    /// assert_eq!(grid.get(0, 1).unwrap(), CellState::Empty);
    /// assert_eq!(grid.get(1, 1).unwrap(), CellState::Tile(1));
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars() {
                let cell = match ch {
                    '.' => CellState::Empty,
                    _ => match ch.to_digit(36) {
                        Some(d) => CellState::Tile(d as ColorId),
                        None => return Err(ConfigError::InvalidCell(ch).into()),
                    },
                };
                row.push(cell);
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    /// Number of columns (width)
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows (height)
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.cols && y < self.rows
    }

    fn check(&self, x: usize, y: usize) -> Result<usize> {
        if self.in_bounds(x, y) {
            Ok(y * self.cols + x)
        } else {
            Err(BoardError::OutOfBounds {
                x,
                y,
                cols: self.cols,
                rows: self.rows,
            })
        }
    }

    /// Get cell at position (x, y)
    pub fn get(&self, x: usize, y: usize) -> Result<CellState> {
        self.check(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    pub fn set(&mut self, x: usize, y: usize, cell: CellState) -> Result<()> {
        let idx = self.check(x, y)?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// Cell lookup for positions already known to be in bounds
    #[inline(always)]
    pub(crate) fn at(&self, pos: Pos) -> CellState {
        self.cells[pos.y * self.cols + pos.x]
    }

    #[inline(always)]
    pub(crate) fn put(&mut self, pos: Pos, cell: CellState) {
        self.cells[pos.y * self.cols + pos.x] = cell;
    }

    /// In-bounds 4-neighbours of `pos` (right, left, down, up)
    pub fn neighbors(&self, pos: Pos) -> ArrayVec<Pos, 4> {
        let mut out = ArrayVec::new();
        if pos.x + 1 < self.cols {
            out.push(Pos::new(pos.x + 1, pos.y));
        }
        if pos.x > 0 {
            out.push(Pos::new(pos.x - 1, pos.y));
        }
        if pos.y + 1 < self.rows {
            out.push(Pos::new(pos.x, pos.y + 1));
        }
        if pos.y > 0 {
            out.push(Pos::new(pos.x, pos.y - 1));
        }
        out
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let cols = self.cols;
        (0..self.cols * self.rows).map(move |i| Pos::new(i % cols, i / cols))
    }

    /// Number of non-empty cells
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_tile()).count()
    }

    /// Colours of one column, top to bottom
    pub fn column(&self, x: usize) -> Result<Vec<CellState>> {
        self.check(x, 0)?;
        Ok((0..self.rows).map(|y| self.cells[y * self.cols + x]).collect())
    }

    /// Get a reference to the internal cells
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.fill(CellState::Empty);
    }

    /// Rows of colour ids (top row first), `None` for empty cells
    pub fn to_rows(&self) -> Vec<Vec<Option<ColorId>>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(CellState::color).collect())
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            for cell in row {
                let ch = match cell {
                    CellState::Empty => '.',
                    CellState::Tile(c) => char::from_digit(u32::from(*c), 36).unwrap_or('?'),
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Cells that a search must treat as absent
///
/// Used for tiles already scheduled for destruction: they still occupy the
/// grid but may not join a new group.
pub trait Exclusion {
    fn excludes(&self, pos: Pos) -> bool;
}

/// Exclude nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExclusion;

impl Exclusion for NoExclusion {
    fn excludes(&self, _pos: Pos) -> bool {
        false
    }
}

impl Exclusion for HashSet<Pos> {
    fn excludes(&self, pos: Pos) -> bool {
        self.contains(&pos)
    }
}

impl<T: Exclusion + ?Sized> Exclusion for &T {
    fn excludes(&self, pos: Pos) -> bool {
        (**self).excludes(pos)
    }
}

/// A grid-shaped set of positions (visited / processed matrix)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMask {
    cols: usize,
    bits: Vec<bool>,
    count: usize,
}

impl CellMask {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            bits: vec![false; cols * rows],
            count: 0,
        }
    }

    /// Empty mask with the grid's dimensions
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.cols(), grid.rows())
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.cols && self.bits.get(pos.y * self.cols + pos.x).copied().unwrap_or(false)
    }

    /// Mark `pos`; returns false if it was already marked
    pub fn insert(&mut self, pos: Pos) -> bool {
        let idx = pos.y * self.cols + pos.x;
        match self.bits.get_mut(idx) {
            Some(bit) if !*bit && pos.x < self.cols => {
                *bit = true;
                self.count += 1;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, pos: Pos) -> bool {
        let idx = pos.y * self.cols + pos.x;
        match self.bits.get_mut(idx) {
            Some(bit) if *bit && pos.x < self.cols => {
                *bit = false;
                self.count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.bits.fill(false);
        self.count = 0;
    }
}

impl Exclusion for CellMask {
    fn excludes(&self, pos: Pos) -> bool {
        self.contains(pos)
    }
}
