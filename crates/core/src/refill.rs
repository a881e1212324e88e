//! Refill module - spawn new tiles into empty cells

use rand::Rng;

use crate::grid::Grid;
use crate::types::{CellState, ColorId, Pos};

/// A tile written into a previously empty cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spawn {
    pub pos: Pos,
    pub color: ColorId,
}

/// Uniformly random colour in `[0, palette_size)`
pub fn random_color<R: Rng + ?Sized>(rng: &mut R, palette_size: usize) -> ColorId {
    rng.gen_range(0..palette_size.max(1)) as ColorId
}

/// Fill every empty cell with a random colour
///
/// Columns are filled left to right, each from the top down. After gravity
/// has converged the empty cells are exactly the top of each column, so new
/// tiles never need to fall further.
pub fn fill<R: Rng + ?Sized>(grid: &mut Grid, palette_size: usize, rng: &mut R) -> Vec<Spawn> {
    let mut spawned = Vec::new();
    for x in 0..grid.cols() {
        for y in 0..grid.rows() {
            let pos = Pos::new(x, y);
            if grid.at(pos).is_empty() {
                let color = random_color(rng, palette_size);
                grid.put(pos, CellState::Tile(color));
                spawned.push(Spawn { pos, color });
            }
        }
    }
    spawned
}
