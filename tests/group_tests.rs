//! Group tests - flood fill against a brute-force reference

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tilepop::core::{all_groups, find_group, Grid, NoExclusion};
use tilepop::types::{CellState, Pos};

fn random_grid(rng: &mut StdRng, cols: usize, rows: usize, colors: u8, holes: bool) -> Grid {
    let mut grid = Grid::new(cols, rows).unwrap();
    for y in 0..rows {
        for x in 0..cols {
            let cell = if holes && rng.gen_bool(0.15) {
                CellState::Empty
            } else {
                CellState::Tile(rng.gen_range(0..colors))
            };
            grid.set(x, y, cell).unwrap();
        }
    }
    grid
}

/// Grow the set one sweep at a time until a sweep adds nothing
fn reference_component(grid: &Grid, start: Pos) -> HashSet<Pos> {
    let mut set = HashSet::new();
    let Ok(CellState::Tile(color)) = grid.get(start.x, start.y) else {
        return set;
    };
    set.insert(start);
    loop {
        let mut grew = false;
        for y in 0..grid.rows() {
            for x in 0..grid.cols() {
                let pos = Pos::new(x, y);
                if set.contains(&pos) || grid.get(x, y) != Ok(CellState::Tile(color)) {
                    continue;
                }
                let touches = (x > 0 && set.contains(&Pos::new(x - 1, y)))
                    || set.contains(&Pos::new(x + 1, y))
                    || (y > 0 && set.contains(&Pos::new(x, y - 1)))
                    || set.contains(&Pos::new(x, y + 1));
                if touches {
                    set.insert(pos);
                    grew = true;
                }
            }
        }
        if !grew {
            return set;
        }
    }
}

#[test]
fn test_find_group_matches_reference() {
    let mut rng = StdRng::seed_from_u64(0x7117);
    for round in 0..60 {
        let cols = rng.gen_range(1..9);
        let rows = rng.gen_range(1..9);
        let colors = rng.gen_range(1..5);
        let grid = random_grid(&mut rng, cols, rows, colors, round % 2 == 0);

        for start in grid.positions() {
            let group = find_group(&grid, start, &NoExclusion).unwrap();
            let expected = reference_component(&grid, start);
            assert_eq!(group.to_set(), expected, "round {} start {}\n{}", round, start, grid);
            assert_eq!(group.len(), expected.len(), "duplicates in group at {}", start);
        }
    }
}

#[test]
fn test_all_groups_partition_tiles() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let grid = random_grid(&mut rng, 7, 6, 3, true);
        let groups = all_groups(&grid, &NoExclusion);

        let mut seen = HashSet::new();
        for group in &groups {
            assert!(!group.is_empty());
            for &pos in group.cells() {
                assert!(seen.insert(pos), "{} appears in two groups", pos);
            }
        }
        assert_eq!(seen.len(), grid.tile_count());
    }
}

#[test]
fn test_group_on_single_colour_board_is_everything() {
    let grid = Grid::parse("000\n000\n000").unwrap();
    let group = find_group(&grid, Pos::new(1, 1), &NoExclusion).unwrap();
    assert_eq!(group.len(), 9);
    assert_eq!(group.color(), Some(0));
}

#[test]
fn test_group_excludes_given_cells() {
    let grid = Grid::parse("0000").unwrap();
    let excluded: HashSet<Pos> = [Pos::new(1, 0)].into_iter().collect();
    let group = find_group(&grid, Pos::new(0, 0), &excluded).unwrap();
    assert_eq!(group.len(), 1);
    assert!(!group.is_playable());

    let right = find_group(&grid, Pos::new(3, 0), &excluded).unwrap();
    assert_eq!(right.len(), 2);
}

#[test]
fn test_large_board_does_not_overflow_stack() {
    let text = vec!["0".repeat(300); 300].join("\n");
    let grid = Grid::parse(&text).unwrap();
    let group = find_group(&grid, Pos::new(150, 150), &NoExclusion).unwrap();
    assert_eq!(group.len(), 90_000);
}
