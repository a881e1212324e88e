//! Error types for the board engine

use thiserror::Error;

use crate::types::APPEARANCE_TIERS;

/// Errors returned by coordinate-taking and constructing operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell ({x}, {y}) is outside the {cols}x{rows} board")]
    OutOfBounds {
        x: usize,
        y: usize,
        cols: usize,
        rows: usize,
    },
    #[error("invalid board configuration: {0}")]
    Configuration(#[from] ConfigError),
}

/// Reasons a board refuses to start
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board dimensions must be non-zero (got {cols}x{rows})")]
    ZeroDimension { cols: usize, rows: usize },
    #[error("palette has no colours")]
    EmptyPalette,
    #[error("palette has {0} colours, more than a colour id can address")]
    PaletteTooLarge(usize),
    #[error("colour [{color}] defines {found} appearance tiers, {} required", APPEARANCE_TIERS)]
    MissingTiers { color: String, found: usize },
    #[error("max pending batches must be at least 1")]
    ZeroQueueDepth,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unrecognised cell character [{0}]")]
    InvalidCell(char),
    #[error("colour id {color} is outside a palette of {palette} colours")]
    ColorOutOfPalette { color: u8, palette: usize },
}

pub type Result<T, E = BoardError> = std::result::Result<T, E>;
