//! Core board logic - pure, deterministic, and testable
//!
//! This crate contains every rule of the tile-matching board: group detection,
//! gravity, refill, deadlock detection, shuffling and the controller state
//! machine that sequences them. It performs no I/O; rendering and input live
//! in the consumer, which reads the event outbox or a snapshot.
//!
//! # Module Structure
//!
//! - [`grid`]: rectangular board storage, `y = 0` is the top row
//! - [`group`]: 4-connected same-colour flood fill
//! - [`gravity`]: single-cell drop passes until the board settles
//! - [`refill`]: random colours for empty cells
//! - [`deadlock`]: "is any group of two or more left?"
//! - [`shuffle`]: rearrange colours so at least one match exists
//! - [`controller`]: click queueing, batch resolution, events
//! - [`palette`], [`config`], [`scoring`], [`snapshot`]: supporting types
//!
//! # Board Rules
//!
//! | Rule | Value |
//! |------|-------|
//! | Minimum group | 2 tiles, orthogonal neighbours only |
//! | Points | 100 per cleared tile |
//! | Tiers | Base < 5, Medium 5-7, Large 8-9, Huge 10+ |
//! | Gravity | tiles fall straight down, never sideways |
//!
//! # Example
//!
//! ```
//! use tilepop_core::{find_group, Grid, NoExclusion};
//! use tilepop_core::types::Pos;
//!
//! let grid = Grid::parse(
//!     "
//!     001
//!     012
//!     ",
//! )
//! .unwrap();
//!
//! let group = find_group(&grid, Pos::new(0, 0), &NoExclusion).unwrap();
//! assert_eq!(group.len(), 3);
//! assert!(group.is_playable());
//! ```
//!
//! Driving a whole board:
//!
//! ```
//! use tilepop_core::{BoardConfig, BoardController};
//!
//! let mut board = BoardController::new(BoardConfig::default().with_seed(7)).unwrap();
//! let target = board.hint().expect("fresh boards always have a move");
//! let pos = target.cells()[0];
//!
//! board.on_cell_clicked(pos.x, pos.y).unwrap();
//! let reports = board.resolve();
//!
//! assert_eq!(reports.len(), 1);
//! assert_eq!(board.score().points, 100 * target.len() as u32);
//! assert_eq!(board.grid().tile_count(), 100);
//! ```

pub mod config;
pub mod controller;
pub mod deadlock;
pub mod error;
pub mod gravity;
pub mod grid;
pub mod group;
pub mod palette;
mod pending;
pub mod refill;
pub mod scoring;
pub mod shuffle;
pub mod snapshot;

pub use tilepop_types as types;

// Re-export commonly used types for convenience
pub use config::BoardConfig;
pub use controller::{BatchReport, BoardController, ClickOutcome};
pub use deadlock::{first_playable_group, is_deadlocked};
pub use error::{BoardError, ConfigError, Result};
pub use gravity::{apply_gravity, gravity_pass, is_settled, TileMove};
pub use grid::{CellMask, Exclusion, Grid, NoExclusion};
pub use group::{all_groups, find_group, Group};
pub use palette::{ColorDef, Palette};
pub use pending::BatchId;
pub use refill::{fill, random_color, Spawn};
pub use scoring::{calculate_batch_points, ScoreBoard};
pub use shuffle::{shuffle, ShuffleKind, ShuffleReport};
pub use snapshot::BoardSnapshot;
