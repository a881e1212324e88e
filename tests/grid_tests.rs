//! Grid tests - storage, bounds and text parsing

use tilepop::core::{BoardError, ConfigError, Grid};
use tilepop::types::{CellState, Pos};

#[test]
fn test_grid_new_is_empty() {
    let grid = Grid::new(4, 3).unwrap();
    assert_eq!(grid.cols(), 4);
    assert_eq!(grid.rows(), 3);
    assert_eq!(grid.tile_count(), 0);
    for pos in grid.positions() {
        assert_eq!(grid.get(pos.x, pos.y), Ok(CellState::Empty));
    }
}

#[test]
fn test_grid_zero_dimension_rejected() {
    assert_eq!(
        Grid::new(0, 3),
        Err(BoardError::Configuration(ConfigError::ZeroDimension { cols: 0, rows: 3 }))
    );
}

#[test]
fn test_grid_set_and_get() {
    let mut grid = Grid::new(3, 3).unwrap();
    grid.set(2, 1, CellState::Tile(4)).unwrap();
    assert_eq!(grid.get(2, 1), Ok(CellState::Tile(4)));
    assert_eq!(grid.tile_count(), 1);

    grid.set(2, 1, CellState::Empty).unwrap();
    assert_eq!(grid.get(2, 1), Ok(CellState::Empty));
}

#[test]
fn test_grid_out_of_bounds() {
    let mut grid = Grid::new(3, 2).unwrap();
    assert_eq!(
        grid.get(3, 0),
        Err(BoardError::OutOfBounds {
            x: 3,
            y: 0,
            cols: 3,
            rows: 2
        })
    );
    assert!(matches!(
        grid.set(0, 2, CellState::Tile(0)),
        Err(BoardError::OutOfBounds { .. })
    ));
    assert!(!grid.in_bounds(usize::MAX, 0));
}

#[test]
fn test_grid_parse_and_display() {
    let text = "01.\n.2a\n";
    let grid = Grid::parse(text).unwrap();
    assert_eq!(grid.get(2, 1), Ok(CellState::Tile(10)));
    assert_eq!(grid.get(0, 1), Ok(CellState::Empty));
    assert_eq!(grid.to_string(), text);
}

#[test]
fn test_grid_parse_rejects_ragged_rows() {
    assert!(matches!(
        Grid::parse("000\n00"),
        Err(BoardError::Configuration(ConfigError::RaggedRows { .. }))
    ));
    assert!(matches!(
        Grid::parse("0?"),
        Err(BoardError::Configuration(ConfigError::InvalidCell('?')))
    ));
}

#[test]
fn test_grid_neighbors_orthogonal_only() {
    let grid = Grid::new(3, 3).unwrap();

    let mut center: Vec<Pos> = grid.neighbors(Pos::new(1, 1)).into_iter().collect();
    center.sort();
    assert_eq!(
        center,
        vec![Pos::new(0, 1), Pos::new(1, 0), Pos::new(1, 2), Pos::new(2, 1)]
    );

    assert_eq!(grid.neighbors(Pos::new(0, 0)).len(), 2);
    assert_eq!(grid.neighbors(Pos::new(2, 1)).len(), 3);
}

#[test]
fn test_grid_column_top_to_bottom() {
    let grid = Grid::parse("0\n.\n2").unwrap();
    assert_eq!(
        grid.column(0).unwrap(),
        vec![CellState::Tile(0), CellState::Empty, CellState::Tile(2)]
    );
    assert!(grid.column(1).is_err());
}
