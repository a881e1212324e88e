//! Pending module - tiles scheduled for destruction
//!
//! Queued batches are tracked as a tag layer shaped like the grid. A tag
//! travels with its tile when gravity moves it, so a batch always removes the
//! tiles that were clicked even if an earlier batch made them fall.

use crate::grid::{Exclusion, Grid};
use crate::types::Pos;

/// Identifier of one queued destruction batch
pub type BatchId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingTags {
    cols: usize,
    tags: Vec<Option<BatchId>>,
}

impl PendingTags {
    pub(crate) fn for_grid(grid: &Grid) -> Self {
        Self {
            cols: grid.cols(),
            tags: vec![None; grid.cols() * grid.rows()],
        }
    }

    #[inline(always)]
    fn index(&self, pos: Pos) -> usize {
        pos.y * self.cols + pos.x
    }

    pub(crate) fn get(&self, pos: Pos) -> Option<BatchId> {
        self.tags.get(self.index(pos)).copied().flatten()
    }

    pub(crate) fn tag(&mut self, pos: Pos, id: BatchId) {
        let idx = self.index(pos);
        self.tags[idx] = Some(id);
    }

    /// Follow a tile that dropped from `from` to `to`
    pub(crate) fn move_tag(&mut self, from: Pos, to: Pos) {
        let (from, to) = (self.index(from), self.index(to));
        self.tags[to] = self.tags[from].take();
    }

    /// Clear and return every cell tagged `id`, in row-major order
    pub(crate) fn take(&mut self, id: BatchId) -> Vec<Pos> {
        let cols = self.cols;
        self.tags
            .iter_mut()
            .enumerate()
            .filter(|(_, tag)| **tag == Some(id))
            .map(|(i, tag)| {
                *tag = None;
                Pos::new(i % cols, i / cols)
            })
            .collect()
    }

    pub(crate) fn count(&self) -> usize {
        self.tags.iter().filter(|t| t.is_some()).count()
    }

    pub(crate) fn clear(&mut self) {
        self.tags.fill(None);
    }

    pub(crate) fn to_mask(&self) -> Vec<bool> {
        self.tags.iter().map(Option::is_some).collect()
    }
}

impl Exclusion for PendingTags {
    fn excludes(&self, pos: Pos) -> bool {
        self.get(pos).is_some()
    }
}
