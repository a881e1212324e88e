//! Gravity module - column compaction by single-cell drops
//!
//! Gravity is applied as repeated passes. Each pass walks every column from
//! the bottom up and drops any tile sitting directly above an empty cell by
//! one row. Passes repeat until one makes no move. Every single-cell drop is
//! recorded so observers can animate the settle step by step.
//!
//! The converged state equals a direct compaction: in every column the tiles
//! keep their relative order and occupy the bottom cells contiguously.

use crate::grid::Grid;
use crate::types::{CellState, ColorId, Pos};

/// One single-cell drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileMove {
    pub from: Pos,
    pub to: Pos,
    pub color: ColorId,
}

/// Run one pass over every column; returns true if anything moved
pub fn gravity_pass(grid: &mut Grid, moves: &mut Vec<TileMove>) -> bool {
    let mut moved = false;
    for x in 0..grid.cols() {
        for y in (1..grid.rows()).rev() {
            let below = Pos::new(x, y);
            let above = Pos::new(x, y - 1);
            if let (CellState::Empty, CellState::Tile(color)) = (grid.at(below), grid.at(above)) {
                grid.put(below, CellState::Tile(color));
                grid.put(above, CellState::Empty);
                moves.push(TileMove {
                    from: above,
                    to: below,
                    color,
                });
                moved = true;
            }
        }
    }
    moved
}

/// Apply gravity until convergence and return every drop in order
///
/// # Examples
///
/// ```
/// use tilepop_core::{apply_gravity, Grid};
///
/// let mut grid = Grid::parse("1\n.\n.").unwrap();
/// let moves = apply_gravity(&mut grid);
/// assert_eq!(moves.len(), 2);
/// assert_eq!(grid.to_string(), ".\n.\n1\n");
/// ```
pub fn apply_gravity(grid: &mut Grid) -> Vec<TileMove> {
    let mut moves = Vec::new();
    while gravity_pass(grid, &mut moves) {}
    moves
}

/// True if no column has a tile directly above an empty cell
pub fn is_settled(grid: &Grid) -> bool {
    (0..grid.cols()).all(|x| {
        (1..grid.rows()).all(|y| {
            !(grid.at(Pos::new(x, y)).is_empty() && grid.at(Pos::new(x, y - 1)).is_tile())
        })
    })
}
