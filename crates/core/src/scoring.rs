//! Scoring module - per-batch score deltas and the running points total
//!
//! Every resolved batch emits a score delta equal to its tile count. The
//! running total converts tiles to points at `POINTS_PER_TILE` each.

use crate::types::POINTS_PER_TILE;

/// Points for clearing a batch of `tiles` tiles
pub fn calculate_batch_points(tiles: usize) -> u32 {
    (tiles as u32).saturating_mul(POINTS_PER_TILE)
}

/// Running score for one episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBoard {
    pub points: u32,
    pub tiles_cleared: u32,
    pub batches: u32,
    /// Largest single batch so far
    pub best_batch: u32,
}

impl ScoreBoard {
    /// Record one resolved batch; returns the points it was worth
    pub fn record_batch(&mut self, tiles: usize) -> u32 {
        let points = calculate_batch_points(tiles);
        self.points = self.points.saturating_add(points);
        self.tiles_cleared = self.tiles_cleared.saturating_add(tiles as u32);
        self.batches += 1;
        self.best_batch = self.best_batch.max(tiles as u32);
        points
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_points() {
        assert_eq!(calculate_batch_points(0), 0);
        assert_eq!(calculate_batch_points(2), 200);
        assert_eq!(calculate_batch_points(13), 1300);
    }

    #[test]
    fn test_record_batches() {
        let mut score = ScoreBoard::default();
        assert_eq!(score.record_batch(4), 400);
        assert_eq!(score.record_batch(2), 200);
        assert_eq!(score.points, 600);
        assert_eq!(score.tiles_cleared, 6);
        assert_eq!(score.batches, 2);
        assert_eq!(score.best_batch, 4);

        score.reset();
        assert_eq!(score, ScoreBoard::default());
    }
}
