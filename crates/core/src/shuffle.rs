//! Shuffle module - redistribute colours so a move exists again
//!
//! The shuffle keeps tile positions and rewrites colours. It first plants one
//! guaranteed match, then deals the remaining colours over the other tiles in
//! random order. Planting prefers strategies that keep the colour multiset
//! unchanged:
//!
//! 1. **Block**: a 2x2 square of tiles painted with a colour that occurs at
//!    least 4 times
//! 2. **Pair**: two adjacent tiles painted with a colour that occurs at least
//!    twice
//! 3. **Recolored**: every colour is unique, so a 2x2 square (or a pair on
//!    boards without one) is painted with one randomly drawn colour and the
//!    same number of colours is dropped from the pool. The multiset changes,
//!    but the board becomes playable.
//! 4. **Unplayable**: no two tiles touch; colours are only permuted.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{CellMask, Exclusion, Grid};
use crate::refill::Spawn;
use crate::types::{CellState, ColorId, Pos};

/// How the guaranteed match was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShuffleKind {
    Block,
    Pair,
    Recolored,
    Unplayable,
}

impl ShuffleKind {
    /// True if the colour multiset is the same before and after
    pub fn conserves_colors(&self) -> bool {
        !matches!(self, ShuffleKind::Recolored)
    }

    /// True if the shuffled board is guaranteed to contain a playable group
    pub fn guarantees_match(&self) -> bool {
        !matches!(self, ShuffleKind::Unplayable)
    }
}

/// Result of a shuffle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleReport {
    pub kind: ShuffleKind,
    /// Cells whose colour changed, in row-major order
    pub recolored: Vec<Spawn>,
}

/// Rewrite the colours of all non-excluded tiles
///
/// Empty and excluded cells are never touched.
pub fn shuffle<E, R>(grid: &mut Grid, excluded: &E, rng: &mut R) -> ShuffleReport
where
    E: Exclusion + ?Sized,
    R: Rng + ?Sized,
{
    let before = grid.clone();
    let slots: Vec<Pos> = grid
        .positions()
        .filter(|&p| grid.at(p).is_tile() && !excluded.excludes(p))
        .collect();
    let mut pool: Vec<ColorId> = slots.iter().filter_map(|&p| grid.at(p).color()).collect();
    let mut processed = CellMask::for_grid(grid);

    let kind = plant_match(grid, &slots, &mut pool, &mut processed, rng);

    pool.shuffle(rng);
    for &slot in &slots {
        if processed.contains(slot) {
            continue;
        }
        if let Some(color) = pool.pop() {
            grid.put(slot, CellState::Tile(color));
        }
    }

    let recolored = slots
        .iter()
        .filter_map(|&pos| match grid.at(pos) {
            CellState::Tile(color) if before.at(pos) != CellState::Tile(color) => {
                Some(Spawn { pos, color })
            }
            _ => None,
        })
        .collect();

    ShuffleReport { kind, recolored }
}

fn plant_match<R: Rng + ?Sized>(
    grid: &mut Grid,
    slots: &[Pos],
    pool: &mut Vec<ColorId>,
    processed: &mut CellMask,
    rng: &mut R,
) -> ShuffleKind {
    let mut is_slot = CellMask::for_grid(grid);
    for &slot in slots {
        is_slot.insert(slot);
    }

    let blocks: Vec<[Pos; 4]> = slots
        .iter()
        .filter(|p| p.x + 1 < grid.cols() && p.y + 1 < grid.rows())
        .map(|&p| {
            [
                p,
                Pos::new(p.x + 1, p.y),
                Pos::new(p.x, p.y + 1),
                Pos::new(p.x + 1, p.y + 1),
            ]
        })
        .filter(|block| block.iter().all(|&c| is_slot.contains(c)))
        .collect();

    let mut pairs: Vec<[Pos; 2]> = Vec::new();
    for &p in slots {
        let right = Pos::new(p.x + 1, p.y);
        let down = Pos::new(p.x, p.y + 1);
        if right.x < grid.cols() && is_slot.contains(right) {
            pairs.push([p, right]);
        }
        if down.y < grid.rows() && is_slot.contains(down) {
            pairs.push([p, down]);
        }
    }

    let mut counts = [0usize; 256];
    for &c in pool.iter() {
        counts[usize::from(c)] += 1;
    }
    let colors_with = |n: usize| -> Vec<ColorId> {
        (0..=ColorId::MAX)
            .filter(|&c| counts[usize::from(c)] >= n)
            .collect()
    };

    if let (Some(block), Some(&color)) = (blocks.choose(rng), colors_with(4).choose(rng)) {
        paint(grid, processed, block, color);
        for _ in 0..4 {
            take_color(pool, color);
        }
        return ShuffleKind::Block;
    }

    if let (Some(pair), Some(&color)) = (pairs.choose(rng), colors_with(2).choose(rng)) {
        paint(grid, processed, pair, color);
        take_color(pool, color);
        take_color(pool, color);
        return ShuffleKind::Pair;
    }

    let cells: &[Pos] = match (blocks.choose(rng), pairs.choose(rng)) {
        (Some(block), _) => &block[..],
        (None, Some(pair)) => &pair[..],
        (None, None) => return ShuffleKind::Unplayable,
    };
    let color = pool.swap_remove(rng.gen_range(0..pool.len()));
    paint(grid, processed, cells, color);
    for _ in 1..cells.len() {
        if pool.is_empty() {
            break;
        }
        let idx = rng.gen_range(0..pool.len());
        pool.swap_remove(idx);
    }
    ShuffleKind::Recolored
}

fn paint(grid: &mut Grid, processed: &mut CellMask, cells: &[Pos], color: ColorId) {
    for &pos in cells {
        grid.put(pos, CellState::Tile(color));
        processed.insert(pos);
    }
}

fn take_color(pool: &mut Vec<ColorId>, color: ColorId) {
    if let Some(idx) = pool.iter().position(|&c| c == color) {
        pool.swap_remove(idx);
    }
}
