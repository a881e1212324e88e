//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the tile board.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, event protocol, external renderers).
//!
//! # Board Coordinates
//!
//! - `x` is the column, `0..cols`, left to right
//! - `y` is the row, `0..rows`, top to bottom
//! - `y = 0` is the top row; tiles fall toward increasing `y`
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_ROWS` | 10 | Default board height |
//! | `DEFAULT_COLS` | 10 | Default board width |
//! | `MIN_GROUP_SIZE` | 2 | Smallest group a click can clear |
//! | `APPEARANCE_TIERS` | 4 | Appearance variants every colour must provide |
//! | `POINTS_PER_TILE` | 100 | Points awarded per cleared tile |
//!
//! # Appearance Tiers
//!
//! | Group size | Tier |
//! |------------|------|
//! | 1-4 | `Tier::Base` |
//! | 5-7 | `Tier::Medium` |
//! | 8-9 | `Tier::Large` |
//! | 10+ | `Tier::Huge` |
//!
//! # Examples
//!
//! ```
//! use tilepop_types::{CellState, Pos, Tier};
//!
//! let cell = CellState::Tile(3);
//! assert_eq!(cell.color(), Some(3));
//! assert!(CellState::Empty.is_empty());
//!
//! assert_eq!(Tier::for_group_size(7), Tier::Medium);
//! assert_eq!(Pos::new(2, 5).to_string(), "(2, 5)");
//! ```

use std::fmt;

/// Default board height in rows
pub const DEFAULT_ROWS: usize = 10;

/// Default board width in columns
pub const DEFAULT_COLS: usize = 10;

/// Smallest connected group that a click removes
pub const MIN_GROUP_SIZE: usize = 2;

/// Number of appearance variants each palette colour must define
pub const APPEARANCE_TIERS: usize = 4;

/// Group size at which tiles switch to the medium appearance
pub const TIER_MEDIUM_MIN: usize = 5;

/// Group size at which tiles switch to the large appearance
pub const TIER_LARGE_MIN: usize = 8;

/// Group size at which tiles switch to the huge appearance
pub const TIER_HUGE_MIN: usize = 10;

/// Points added to the running total for every cleared tile
pub const POINTS_PER_TILE: u32 = 100;


/// Palette index of a tile colour
pub type ColorId = u8;

/// A board coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Pos {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

/// A cell on the board
///
/// - `Empty`: nothing here (vacated by a clear, waiting for gravity or refill)
/// - `Tile(ColorId)`: a tile of the given palette colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Empty,
    Tile(ColorId),
}

impl CellState {
    /// Colour of the tile, `None` for an empty cell
    pub fn color(&self) -> Option<ColorId> {
        match self {
            CellState::Empty => None,
            CellState::Tile(c) => Some(*c),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellState::Empty)
    }

    pub fn is_tile(&self) -> bool {
        matches!(self, CellState::Tile(_))
    }
}

impl From<Option<ColorId>> for CellState {
    fn from(value: Option<ColorId>) -> Self {
        match value {
            Some(c) => CellState::Tile(c),
            None => CellState::Empty,
        }
    }
}

/// Appearance bucket chosen from the size of the group a tile belongs to
///
/// Purely cosmetic: matching never looks at tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Tier {
    #[default]
    Base,
    Medium,
    Large,
    Huge,
}

impl Tier {
    pub const ALL: [Tier; APPEARANCE_TIERS] = [Tier::Base, Tier::Medium, Tier::Large, Tier::Huge];

    /// Pick the tier for a group of `size` tiles
    ///
    /// # Examples
    ///
    /// ```
    /// use tilepop_types::Tier;
    ///
    /// assert_eq!(Tier::for_group_size(2), Tier::Base);
    /// assert_eq!(Tier::for_group_size(8), Tier::Large);
    /// assert_eq!(Tier::for_group_size(12), Tier::Huge);
    /// ```
    pub fn for_group_size(size: usize) -> Self {
        if size >= TIER_HUGE_MIN {
            Tier::Huge
        } else if size >= TIER_LARGE_MIN {
            Tier::Large
        } else if size >= TIER_MEDIUM_MIN {
            Tier::Medium
        } else {
            Tier::Base
        }
    }

    /// Index into a colour's appearance list (0..APPEARANCE_TIERS)
    pub fn index(&self) -> usize {
        match self {
            Tier::Base => 0,
            Tier::Medium => 1,
            Tier::Large => 2,
            Tier::Huge => 3,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Base => "base",
            Tier::Medium => "medium",
            Tier::Large => "large",
            Tier::Huge => "huge",
        }
    }
}

/// Board controller lifecycle
///
/// - **Idle**: waiting for a click, nothing queued
/// - **Resolving**: one or more destruction batches are queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoardPhase {
    #[default]
    Idle,
    Resolving,
}

impl BoardPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardPhase::Idle => "idle",
            BoardPhase::Resolving => "resolving",
        }
    }
}

/// Events emitted by the board for external collaborators (renderer, score display)
///
/// Events are ordered exactly as the logical mutations happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// A destruction batch of `amount` tiles was resolved
    ScoreDelta { amount: u32 },
    /// A tile dropped one cell during gravity
    TileMoved { from: Pos, to: Pos, color: ColorId },
    /// A new tile was written into an empty cell
    TileSpawned { pos: Pos, color: ColorId },
    /// A tile was destroyed
    TileRemoved { pos: Pos },
    /// A tile's appearance tier was recomputed
    AppearanceChanged { pos: Pos, tier: Tier },
    /// A shuffle rewrote the colour of a tile
    TileRecolored { pos: Pos, color: ColorId },
    /// The board was deadlocked and has been shuffled
    Shuffled,
}

impl BoardEvent {
    /// Event name used by the line protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardEvent::ScoreDelta { .. } => "scoreDelta",
            BoardEvent::TileMoved { .. } => "tileMoved",
            BoardEvent::TileSpawned { .. } => "tileSpawned",
            BoardEvent::TileRemoved { .. } => "tileRemoved",
            BoardEvent::AppearanceChanged { .. } => "appearanceChanged",
            BoardEvent::TileRecolored { .. } => "tileRecolored",
            BoardEvent::Shuffled => "shuffled",
        }
    }
}
