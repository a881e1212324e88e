use crate::scoring::ScoreBoard;
use crate::types::{BoardPhase, ColorId, Pos, Tier};

/// Point-in-time copy of everything an observer needs to draw the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub cols: usize,
    pub rows: usize,
    /// Row-major colours, `None` for empty cells
    pub cells: Vec<Option<ColorId>>,
    /// Row-major appearance tiers, `None` for empty cells
    pub tiers: Vec<Option<Tier>>,
    /// Row-major flags for tiles queued for destruction
    pub pending: Vec<bool>,
    pub phase: BoardPhase,
    pub queued_batches: usize,
    pub score: ScoreBoard,
    pub episode_id: u32,
    pub seed: u64,
}

impl BoardSnapshot {
    pub fn cell(&self, pos: Pos) -> Option<ColorId> {
        if pos.x >= self.cols || pos.y >= self.rows {
            return None;
        }
        self.cells[pos.y * self.cols + pos.x]
    }

    pub fn tier(&self, pos: Pos) -> Option<Tier> {
        if pos.x >= self.cols || pos.y >= self.rows {
            return None;
        }
        self.tiers[pos.y * self.cols + pos.x]
    }

    /// Rows of colours, top row first
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Option<ColorId>]> {
        self.cells.chunks(self.cols)
    }

    pub fn is_idle(&self) -> bool {
        self.phase == BoardPhase::Idle && self.queued_batches == 0
    }
}
