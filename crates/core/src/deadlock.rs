//! Deadlock module - does any playable group remain?

use crate::group::{flood, Group};
use crate::grid::{CellMask, Exclusion, Grid};
use crate::types::MIN_GROUP_SIZE;

/// First playable group in row-major scan order, if any
///
/// One visited matrix is shared across all searches, so each cell is
/// examined at most once overall.
pub fn first_playable_group<E: Exclusion + ?Sized>(grid: &Grid, excluded: &E) -> Option<Group> {
    let mut visited = CellMask::for_grid(grid);
    let mut cells = Vec::new();
    for pos in grid.positions() {
        cells.clear();
        if let Some(color) = flood(grid, pos, excluded, &mut visited, &mut cells) {
            if cells.len() >= MIN_GROUP_SIZE {
                return Some(Group::new(color, cells));
            }
        }
    }
    None
}

/// True iff no non-excluded cell starts a group of size >= 2
///
/// # Examples
///
/// ```
/// use tilepop_core::{is_deadlocked, Grid, NoExclusion};
///
/// assert!(is_deadlocked(&Grid::parse("01\n10").unwrap(), &NoExclusion));
/// assert!(!is_deadlocked(&Grid::parse("00\n10").unwrap(), &NoExclusion));
/// ```
pub fn is_deadlocked<E: Exclusion + ?Sized>(grid: &Grid, excluded: &E) -> bool {
    first_playable_group(grid, excluded).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::NoExclusion;
    use crate::types::Pos;
    use std::collections::HashSet;

    #[test]
    fn test_checkerboard_is_deadlocked() {
        let grid = Grid::parse(
            "
            0101
            1010
            0101
            ",
        )
        .unwrap();
        assert!(is_deadlocked(&grid, &NoExclusion));
        assert!(first_playable_group(&grid, &NoExclusion).is_none());
    }

    #[test]
    fn test_single_pair_found() {
        let grid = Grid::parse(
            "
            0123
            1230
            2311
            ",
        )
        .unwrap();
        assert!(!is_deadlocked(&grid, &NoExclusion));
        let group = first_playable_group(&grid, &NoExclusion).unwrap();
        assert_eq!(group.color(), Some(1));
        assert_eq!(group.len(), 2);
        assert!(group.contains(Pos::new(2, 2)));
        assert!(group.contains(Pos::new(3, 2)));
    }

    #[test]
    fn test_excluded_pair_counts_as_deadlock() {
        let grid = Grid::parse("0012").unwrap();
        let excluded: HashSet<Pos> = [Pos::new(1, 0)].into_iter().collect();
        assert!(is_deadlocked(&grid, &excluded));
    }

    #[test]
    fn test_empty_cells_do_not_match() {
        let grid = Grid::parse("..\n01").unwrap();
        assert!(is_deadlocked(&grid, &NoExclusion));
    }

    #[test]
    fn test_empty_board_is_deadlocked() {
        let grid = Grid::new(3, 3).unwrap();
        assert!(is_deadlocked(&grid, &NoExclusion));
    }
}
