//! Board controller - the click → remove → gravity → refill → deadlock cycle
//!
//! The controller exclusively owns the grid. A click computes the group under
//! the cursor and, if it is playable, queues it as a destruction batch. Batches
//! are resolved strictly in FIFO order, one per [`BoardController::step`]:
//!
//! 1. remove the batch's tiles and emit a score delta
//! 2. apply gravity until no tile sits above an empty cell
//! 3. refill the empty cells at the top of each column
//! 4. recompute appearance tiers
//!
//! When the queue drains the board is checked for deadlock and shuffled if
//! no playable group remains, then the controller returns to `Idle`.
//!
//! Clicks made while batches are queued are accepted (unless the queue is at
//! its configured limit). Tiles already queued can not be clicked again and
//! never join a new group.
//!
//! All randomness comes from one seeded `StdRng`, so a seed plus a sequence of
//! clicks fully determines the session.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::BoardConfig;
use crate::deadlock::{first_playable_group, is_deadlocked};
use crate::error::{BoardError, ConfigError, Result};
use crate::gravity::apply_gravity;
use crate::grid::Grid;
use crate::group::{all_groups, find_group, Group};
use crate::pending::{BatchId, PendingTags};
use crate::refill::fill;
use crate::scoring::ScoreBoard;
use crate::shuffle::{shuffle, ShuffleKind};
use crate::snapshot::BoardSnapshot;
use crate::types::{BoardEvent, BoardPhase, CellState, Pos, Tier};

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Clicked an empty cell; nothing happens
    Empty,
    /// Clicked a tile already queued for destruction; nothing happens
    AlreadyPending,
    /// The group is smaller than `MIN_GROUP_SIZE`; nothing happens
    TooSmall,
    /// The group was queued as a destruction batch
    Queued { batch: BatchId, size: usize },
    /// `max_pending_batches` batches are already waiting; click dropped
    QueueFull,
}

impl ClickOutcome {
    pub fn is_queued(&self) -> bool {
        matches!(self, ClickOutcome::Queued { .. })
    }
}

/// Summary of one resolved batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub batch: BatchId,
    pub removed: usize,
    pub points: u32,
    pub moves: usize,
    pub spawned: usize,
    /// Set when this batch drained the queue and the board had to be shuffled
    pub shuffle: Option<ShuffleKind>,
}

#[derive(Debug, Clone, Copy)]
struct Batch {
    id: BatchId,
    size: usize,
}

/// Complete board state machine
#[derive(Debug, Clone)]
pub struct BoardController {
    config: BoardConfig,
    grid: Grid,
    /// Current appearance tier of each cell, `None` for empty cells
    tiers: Vec<Option<Tier>>,
    pending: PendingTags,
    queue: VecDeque<Batch>,
    next_batch_id: BatchId,
    phase: BoardPhase,
    score: ScoreBoard,
    rng: StdRng,
    /// Monotonic episode id (increments on restart)
    episode_id: u32,
    shuffles: u32,
    events: Vec<BoardEvent>,
}

impl BoardController {
    /// Validate `config` and generate a fresh random board
    pub fn new(config: BoardConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.cols, config.rows)?;
        let mut board = Self::with_parts(config, grid);
        board.generate();
        Ok(board)
    }

    /// Start from a fixed grid instead of a random one
    ///
    /// The grid's dimensions replace the config's. No events are emitted and no
    /// deadlock check runs, so a deliberately stuck board stays stuck until
    /// [`check_deadlock`](Self::check_deadlock) or the next resolution.
    pub fn from_grid(mut config: BoardConfig, grid: Grid) -> Result<Self> {
        config.cols = grid.cols();
        config.rows = grid.rows();
        config.validate()?;
        let palette = config.palette.len();
        if let Some(color) = grid
            .cells()
            .iter()
            .filter_map(CellState::color)
            .find(|&c| usize::from(c) >= palette)
        {
            return Err(BoardError::Configuration(ConfigError::ColorOutOfPalette { color, palette }));
        }
        let mut board = Self::with_parts(config, grid);
        board.refresh_appearance();
        board.events.clear();
        Ok(board)
    }

    fn with_parts(config: BoardConfig, grid: Grid) -> Self {
        let cells = grid.cols() * grid.rows();
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            tiers: vec![None; cells],
            pending: PendingTags::for_grid(&grid),
            queue: VecDeque::new(),
            next_batch_id: 0,
            phase: BoardPhase::Idle,
            score: ScoreBoard::default(),
            episode_id: 0,
            shuffles: 0,
            events: Vec::new(),
            config,
            grid,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    pub fn score(&self) -> &ScoreBoard {
        &self.score
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    /// Number of shuffles performed this episode
    pub fn shuffles(&self) -> u32 {
        self.shuffles
    }

    /// Batches waiting to be resolved
    pub fn queued_batches(&self) -> usize {
        self.queue.len()
    }

    pub fn is_pending(&self, pos: Pos) -> bool {
        self.grid.in_bounds(pos.x, pos.y) && self.pending.get(pos).is_some()
    }

    pub fn tier_at(&self, pos: Pos) -> Option<Tier> {
        if !self.grid.in_bounds(pos.x, pos.y) {
            return None;
        }
        self.tiers[self.index(pos)]
    }

    /// Events emitted since the last call, oldest first
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    /// A playable group that is not already queued, if one exists
    pub fn hint(&self) -> Option<Group> {
        first_playable_group(&self.grid, &self.pending)
    }

    pub fn is_deadlocked(&self) -> bool {
        is_deadlocked(&self.grid, &self.pending)
    }

    /// Handle a click on cell (x, y)
    ///
    /// Only queues work; call [`step`](Self::step) or
    /// [`resolve`](Self::resolve) to apply it. Clicking outside the board is
    /// an integration error and fails with `OutOfBounds`.
    pub fn on_cell_clicked(&mut self, x: usize, y: usize) -> Result<ClickOutcome> {
        let pos = Pos::new(x, y);
        let group = find_group(&self.grid, pos, &self.pending)?;

        if self.grid.at(pos).is_empty() {
            return Ok(ClickOutcome::Empty);
        }
        if self.pending.get(pos).is_some() {
            return Ok(ClickOutcome::AlreadyPending);
        }
        log::trace!(
            "click at {} hit a group of {} ({} tiles already pending)",
            pos,
            group.len(),
            self.pending.count()
        );
        if !group.is_playable() {
            return Ok(ClickOutcome::TooSmall);
        }
        if let Some(max) = self.config.max_pending_batches {
            if self.queue.len() >= max {
                log::warn!("click at {} dropped: {} batches already queued", pos, max);
                return Ok(ClickOutcome::QueueFull);
            }
        }

        let id = self.next_batch_id;
        self.next_batch_id = self.next_batch_id.wrapping_add(1);
        for &cell in group.cells() {
            self.pending.tag(cell, id);
        }
        let size = group.len();
        self.queue.push_back(Batch { id, size });
        self.phase = BoardPhase::Resolving;
        Ok(ClickOutcome::Queued { batch: id, size })
    }

    /// Resolve the oldest queued batch
    ///
    /// Returns `None` when nothing is queued.
    pub fn step(&mut self) -> Option<BatchReport> {
        let batch = self.queue.pop_front()?;

        let removed = self.pending.take(batch.id);
        debug_assert_eq!(removed.len(), batch.size);
        for &pos in &removed {
            self.grid.put(pos, CellState::Empty);
            let idx = self.index(pos);
            self.tiers[idx] = None;
            self.events.push(BoardEvent::TileRemoved { pos });
        }
        self.events.push(BoardEvent::ScoreDelta {
            amount: removed.len() as u32,
        });
        let points = self.score.record_batch(removed.len());

        let moves = apply_gravity(&mut self.grid);
        for m in &moves {
            self.pending.move_tag(m.from, m.to);
            let (from, to) = (self.index(m.from), self.index(m.to));
            self.tiers[to] = self.tiers[from].take();
            self.events.push(BoardEvent::TileMoved {
                from: m.from,
                to: m.to,
                color: m.color,
            });
        }

        let spawned = fill(&mut self.grid, self.config.palette.len(), &mut self.rng);
        for s in &spawned {
            self.events.push(BoardEvent::TileSpawned {
                pos: s.pos,
                color: s.color,
            });
        }

        self.refresh_appearance();
        log::debug!(
            "resolved batch {}: {} removed, {} moves, {} spawned, {} still queued",
            batch.id,
            removed.len(),
            moves.len(),
            spawned.len(),
            self.queue.len()
        );

        let mut report = BatchReport {
            batch: batch.id,
            removed: removed.len(),
            points,
            moves: moves.len(),
            spawned: spawned.len(),
            shuffle: None,
        };
        if self.queue.is_empty() {
            report.shuffle = self.finish_resolution();
        }
        Some(report)
    }

    /// Resolve every queued batch and return to `Idle`
    pub fn resolve(&mut self) -> Vec<BatchReport> {
        let mut reports = Vec::new();
        while let Some(report) = self.step() {
            reports.push(report);
        }
        reports
    }

    /// Click and immediately resolve everything queued
    pub fn click_and_resolve(&mut self, x: usize, y: usize) -> Result<ClickOutcome> {
        let outcome = self.on_cell_clicked(x, y)?;
        self.resolve();
        Ok(outcome)
    }

    /// Shuffle now if the board is deadlocked and shuffling is enabled
    ///
    /// Only acts while `Idle`; returns the shuffle strategy used, if any.
    pub fn check_deadlock(&mut self) -> Option<ShuffleKind> {
        if self.phase != BoardPhase::Idle || !self.config.deadlock_shuffle {
            return None;
        }
        self.shuffle_if_deadlocked()
    }

    /// Throw away the current episode and generate a new board
    ///
    /// Cancels any queued batches and drops undelivered events, so nothing
    /// from the interrupted cycle is observable afterwards.
    pub fn restart(&mut self) {
        self.episode_id = self.episode_id.wrapping_add(1);
        let seed = self.config.seed.wrapping_add(u64::from(self.episode_id));
        log::info!(
            "restarting board (episode {}, {} batches cancelled)",
            self.episode_id,
            self.queue.len()
        );
        self.rng = StdRng::seed_from_u64(seed);
        self.queue.clear();
        self.pending.clear();
        self.phase = BoardPhase::Idle;
        self.score.reset();
        self.shuffles = 0;
        self.events.clear();
        self.generate();
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            cols: self.grid.cols(),
            rows: self.grid.rows(),
            cells: self.grid.cells().iter().map(CellState::color).collect(),
            tiers: self.tiers.clone(),
            pending: self.pending.to_mask(),
            phase: self.phase,
            queued_batches: self.queue.len(),
            score: self.score,
            episode_id: self.episode_id,
            seed: self.config.seed.wrapping_add(u64::from(self.episode_id)),
        }
    }

    fn index(&self, pos: Pos) -> usize {
        pos.y * self.grid.cols() + pos.x
    }

    fn generate(&mut self) {
        self.grid.clear();
        self.tiers.fill(None);
        let spawned = fill(&mut self.grid, self.config.palette.len(), &mut self.rng);
        for s in spawned {
            self.events.push(BoardEvent::TileSpawned {
                pos: s.pos,
                color: s.color,
            });
        }
        self.refresh_appearance();
        if self.config.deadlock_shuffle {
            self.shuffle_if_deadlocked();
        }
    }

    fn finish_resolution(&mut self) -> Option<ShuffleKind> {
        self.pending.clear();
        let shuffled = if self.config.deadlock_shuffle {
            self.shuffle_if_deadlocked()
        } else {
            None
        };
        self.phase = BoardPhase::Idle;
        shuffled
    }

    fn shuffle_if_deadlocked(&mut self) -> Option<ShuffleKind> {
        if !is_deadlocked(&self.grid, &self.pending) {
            return None;
        }
        let report = shuffle(&mut self.grid, &self.pending, &mut self.rng);
        self.shuffles += 1;
        self.events.push(BoardEvent::Shuffled);
        for r in &report.recolored {
            self.events.push(BoardEvent::TileRecolored {
                pos: r.pos,
                color: r.color,
            });
        }
        self.refresh_appearance();

        if report.kind.guarantees_match() {
            log::info!(
                "board deadlocked, shuffled ({:?}, {} tiles recoloured)",
                report.kind,
                report.recolored.len()
            );
        } else {
            log::warn!("board deadlocked and no two tiles touch; shuffle cannot create a match");
        }
        Some(report.kind)
    }

    /// Recompute tiers from current groups, emitting only changes
    ///
    /// Queued tiles keep whatever tier they had.
    fn refresh_appearance(&mut self) {
        for group in all_groups(&self.grid, &self.pending) {
            let tier = group.tier();
            for &pos in group.cells() {
                let idx = self.index(pos);
                if self.tiers[idx] != Some(tier) {
                    self.tiers[idx] = Some(tier);
                    self.events.push(BoardEvent::AppearanceChanged { pos, tier });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::NoExclusion;
    use crate::palette::Palette;
    use test_log::test;

    fn board(text: &str, colors: usize) -> BoardController {
        let config = BoardConfig {
            palette: Palette::numbered(colors).unwrap(),
            ..BoardConfig::default()
        };
        BoardController::from_grid(config, Grid::parse(text).unwrap()).unwrap()
    }

    #[test]
    fn test_new_board_is_full_and_idle() {
        let mut b = BoardController::new(BoardConfig::default()).unwrap();
        assert_eq!(b.grid().tile_count(), 100);
        assert_eq!(b.phase(), BoardPhase::Idle);
        assert!(!b.is_deadlocked());

        let events = b.take_events();
        let spawned = events
            .iter()
            .filter(|e| matches!(e, BoardEvent::TileSpawned { .. }))
            .count();
        assert_eq!(spawned, 100);
        assert!(b.take_events().is_empty());
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = BoardController::new(BoardConfig::default().with_seed(77)).unwrap();
        let b = BoardController::new(BoardConfig::default().with_seed(77)).unwrap();
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn test_invalid_config_refused() {
        let config = BoardConfig {
            rows: 0,
            ..BoardConfig::default()
        };
        assert!(matches!(
            BoardController::new(config),
            Err(BoardError::Configuration(ConfigError::ZeroDimension { .. }))
        ));
    }

    #[test]
    fn test_from_grid_rejects_colour_outside_palette() {
        let config = BoardConfig {
            palette: Palette::numbered(2).unwrap(),
            ..BoardConfig::default()
        };
        let grid = Grid::parse("05").unwrap();
        assert_eq!(
            BoardController::from_grid(config, grid).err(),
            Some(BoardError::Configuration(ConfigError::ColorOutOfPalette {
                color: 5,
                palette: 2
            }))
        );
    }

    #[test]
    fn test_click_queues_then_step_resolves() {
        let mut b = board("0011\n2301", 4);
        let outcome = b.on_cell_clicked(0, 0).unwrap();
        assert_eq!(outcome, ClickOutcome::Queued { batch: 0, size: 2 });
        assert_eq!(b.phase(), BoardPhase::Resolving);
        assert!(b.is_pending(Pos::new(1, 0)));
        assert_eq!(b.queued_batches(), 1);

        let report = b.step().unwrap();
        assert_eq!(report.removed, 2);
        assert_eq!(report.points, 200);
        assert_eq!(report.spawned, 2);
        assert_eq!(b.phase(), BoardPhase::Idle);
        assert_eq!(b.grid().tile_count(), 8);
        assert!(b.step().is_none());
    }

    #[test]
    fn test_click_on_pending_tile_ignored() {
        let mut b = board("0011\n2301", 4);
        b.on_cell_clicked(0, 0).unwrap();
        assert_eq!(b.on_cell_clicked(1, 0).unwrap(), ClickOutcome::AlreadyPending);
        assert_eq!(b.queued_batches(), 1);
    }

    #[test]
    fn test_single_tile_click_mutates_nothing() {
        let mut b = board("0011\n2301", 4);
        let before = b.grid().clone();
        assert_eq!(b.on_cell_clicked(0, 1).unwrap(), ClickOutcome::TooSmall);
        assert_eq!(b.phase(), BoardPhase::Idle);
        assert_eq!(b.grid(), &before);
        assert!(b.events().is_empty());
        assert!(b.step().is_none());
    }

    #[test]
    fn test_out_of_bounds_click_is_error() {
        let mut b = board("00", 2);
        assert!(matches!(
            b.on_cell_clicked(2, 0),
            Err(BoardError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_queue_limit() {
        let config = BoardConfig {
            palette: Palette::numbered(3).unwrap(),
            max_pending_batches: Some(1),
            ..BoardConfig::default()
        };
        let grid = Grid::parse("0011\n2222").unwrap();
        let mut b = BoardController::from_grid(config, grid).unwrap();
        assert!(b.on_cell_clicked(0, 0).unwrap().is_queued());
        assert_eq!(b.on_cell_clicked(2, 0).unwrap(), ClickOutcome::QueueFull);
        b.resolve();
        assert_eq!(b.score().batches, 1);
    }

    #[test]
    fn test_pending_tiles_follow_gravity() {
        // Clearing the bottom pair drops the column-0 pair; the second batch
        // must still remove those same tiles at their new positions.
        let mut b = board(
            "
            12
            12
            00
            ",
            3,
        );
        assert!(b.on_cell_clicked(0, 2).unwrap().is_queued());
        assert!(b.on_cell_clicked(0, 0).unwrap().is_queued());

        let first = b.step().unwrap();
        assert_eq!(first.removed, 2);
        assert!(b.is_pending(Pos::new(0, 1)));
        assert!(b.is_pending(Pos::new(0, 2)));
        assert!(!b.is_pending(Pos::new(0, 0)));

        let second = b.step().unwrap();
        assert_eq!(second.removed, 2);
        assert_eq!(b.score().tiles_cleared, 4);
        assert_eq!(b.grid().tile_count(), 6);
        assert_eq!(b.phase(), BoardPhase::Idle);
    }

    #[test]
    fn test_restart_cancels_queue_and_resets_score() {
        let mut b = board("0011\n2301", 4);
        b.click_and_resolve(0, 0).unwrap();
        b.on_cell_clicked(2, 0).unwrap();
        assert!(b.score().points > 0);

        b.restart();
        assert_eq!(b.phase(), BoardPhase::Idle);
        assert_eq!(b.queued_batches(), 0);
        assert_eq!(b.score(), &ScoreBoard::default());
        assert_eq!(b.episode_id(), 1);
        assert!(b.grid().positions().all(|p| !b.is_pending(p)));
        assert_eq!(b.grid().tile_count(), 8);

        let events = b.take_events();
        assert!(events
            .iter()
            .all(|e| !matches!(e, BoardEvent::TileRemoved { .. } | BoardEvent::ScoreDelta { .. })));
        let spawned = events
            .iter()
            .filter(|e| matches!(e, BoardEvent::TileSpawned { .. }))
            .count();
        assert_eq!(spawned, 8);
    }

    #[test]
    fn test_check_deadlock_shuffles_stuck_board() {
        let mut b = board("0101\n1010\n0101", 2);
        assert!(b.is_deadlocked());
        assert_eq!(b.check_deadlock(), Some(ShuffleKind::Block));
        assert!(!b.is_deadlocked());
        assert_eq!(b.shuffles(), 1);
        assert!(b.events().contains(&BoardEvent::Shuffled));
    }

    #[test]
    fn test_deadlock_shuffle_disabled() {
        let config = BoardConfig {
            palette: Palette::numbered(2).unwrap(),
            deadlock_shuffle: false,
            ..BoardConfig::default()
        };
        let mut b = BoardController::from_grid(config, Grid::parse("0101\n1010").unwrap()).unwrap();
        assert_eq!(b.check_deadlock(), None);
        assert!(b.is_deadlocked());
    }

    #[test]
    fn test_appearance_tiers_follow_group_size() {
        let b = board("00000\n11112", 3);
        assert_eq!(b.tier_at(Pos::new(0, 0)), Some(Tier::Medium));
        assert_eq!(b.tier_at(Pos::new(0, 1)), Some(Tier::Base));
        assert_eq!(b.tier_at(Pos::new(4, 1)), Some(Tier::Base));
    }

    #[test]
    fn test_hint_skips_pending_groups() {
        let mut b = board("0012", 3);
        assert_eq!(b.hint().map(|g| g.len()), Some(2));
        b.on_cell_clicked(0, 0).unwrap();
        assert!(b.hint().is_none());
        assert!(crate::deadlock::is_deadlocked(b.grid(), &b.pending));
        assert!(!crate::deadlock::is_deadlocked(b.grid(), &NoExclusion));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut b = board("0011\n2301", 4);
        b.on_cell_clicked(2, 0).unwrap();
        let snap = b.snapshot();
        assert_eq!((snap.cols, snap.rows), (4, 2));
        assert_eq!(snap.cell(Pos::new(2, 1)), Some(0));
        assert_eq!(snap.cell(Pos::new(9, 9)), None);
        assert_eq!(snap.pending, vec![false, false, true, true, false, false, false, true]);
        assert_eq!(snap.queued_batches, 1);
        assert_eq!(b.queued_batches(), 1);
        assert!(!snap.is_idle());
    }
}
