//! Group module - connected same-colour components
//!
//! A group is the maximal set of tiles reachable from a start cell through
//! 4-directional steps (no diagonals) that all share the start cell's colour.
//! The search uses an explicit work stack plus a visited matrix, so board size
//! never affects call-stack depth.

use std::collections::HashSet;

use crate::error::{BoardError, Result};
use crate::grid::{CellMask, Exclusion, Grid};
use crate::types::{CellState, ColorId, Pos, Tier, MIN_GROUP_SIZE};

/// A connected set of same-coloured tiles
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
    color: Option<ColorId>,
    cells: Vec<Pos>,
}

impl Group {
    pub(crate) fn new(color: ColorId, cells: Vec<Pos>) -> Self {
        Self {
            color: Some(color),
            cells,
        }
    }

    /// Colour shared by every cell, `None` for an empty group
    pub fn color(&self) -> Option<ColorId> {
        self.color
    }

    /// Cells in discovery order
    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Pos> {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }

    /// True if a click on this group would clear it
    pub fn is_playable(&self) -> bool {
        self.cells.len() >= MIN_GROUP_SIZE
    }

    pub fn tier(&self) -> Tier {
        Tier::for_group_size(self.cells.len())
    }

    pub fn to_set(&self) -> HashSet<Pos> {
        self.cells.iter().copied().collect()
    }
}

/// Find the group containing `start`
///
/// Returns an empty group when the start cell is empty or excluded.
/// Fails only if `start` is outside the grid.
///
/// # Examples
///
/// ```
/// use tilepop_core::{find_group, Grid, NoExclusion};
/// use tilepop_core::types::Pos;
///
/// let grid = Grid::parse("001\n011").unwrap();
/// let group = find_group(&grid, Pos::new(0, 0), &NoExclusion).unwrap();
/// assert_eq!(group.len(), 3);
/// assert_eq!(group.color(), Some(0));
/// ```
pub fn find_group<E: Exclusion + ?Sized>(grid: &Grid, start: Pos, excluded: &E) -> Result<Group> {
    if !grid.in_bounds(start.x, start.y) {
        return Err(BoardError::OutOfBounds {
            x: start.x,
            y: start.y,
            cols: grid.cols(),
            rows: grid.rows(),
        });
    }
    let mut visited = CellMask::for_grid(grid);
    let mut cells = Vec::new();
    let color = flood(grid, start, excluded, &mut visited, &mut cells);
    Ok(Group { color, cells })
}

/// Flood fill from `start`, appending members to `out`
///
/// Cells already in `visited` are skipped and every member found is marked,
/// so one mask can be shared across many searches. Returns the group colour,
/// or `None` if `start` is empty, excluded or already visited.
pub(crate) fn flood<E: Exclusion + ?Sized>(
    grid: &Grid,
    start: Pos,
    excluded: &E,
    visited: &mut CellMask,
    out: &mut Vec<Pos>,
) -> Option<ColorId> {
    let CellState::Tile(color) = grid.at(start) else {
        return None;
    };
    if excluded.excludes(start) || !visited.insert(start) {
        return None;
    }

    let mut stack = vec![start];
    out.push(start);
    while let Some(pos) = stack.pop() {
        for next in grid.neighbors(pos) {
            if grid.at(next) != CellState::Tile(color) || excluded.excludes(next) {
                continue;
            }
            if visited.insert(next) {
                out.push(next);
                stack.push(next);
            }
        }
    }
    Some(color)
}

/// Partition every non-excluded tile into groups, in row-major order of
/// each group's first cell
pub fn all_groups<E: Exclusion + ?Sized>(grid: &Grid, excluded: &E) -> Vec<Group> {
    let mut visited = CellMask::for_grid(grid);
    let mut groups = Vec::new();
    for pos in grid.positions() {
        let mut cells = Vec::new();
        if let Some(color) = flood(grid, pos, excluded, &mut visited, &mut cells) {
            groups.push(Group::new(color, cells));
        }
    }
    groups
}
