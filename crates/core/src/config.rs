//! Board configuration

use crate::error::ConfigError;
use crate::palette::Palette;
use crate::types::{DEFAULT_COLS, DEFAULT_ROWS};

/// Everything a board needs to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    pub palette: Palette,
    /// Check for deadlock after each resolution and shuffle when stuck
    pub deadlock_shuffle: bool,
    /// Seed for every random draw (fill, refill, shuffle)
    pub seed: u64,
    /// Maximum number of queued destruction batches; `None` is unbounded
    pub max_pending_batches: Option<usize>,
}

impl BoardConfig {
    pub fn new(cols: usize, rows: usize, palette: Palette) -> Self {
        Self {
            rows,
            cols,
            palette,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_deadlock_shuffle(mut self, enabled: bool) -> Self {
        self.deadlock_shuffle = enabled;
        self
    }

    pub fn with_max_pending_batches(mut self, max: Option<usize>) -> Self {
        self.max_pending_batches = max;
        self
    }

    /// Fail-fast checks run before a board is built
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::ZeroDimension {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.max_pending_batches == Some(0) {
            return Err(ConfigError::ZeroQueueDepth);
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            palette: Palette::classic(),
            deadlock_shuffle: true,
            seed: 1,
            max_pending_batches: None,
        }
    }
}
