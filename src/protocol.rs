//! Protocol module - line-delimited JSON messages for the `tilepop` driver
//!
//! Input is one plain-text command per line:
//!
//! ```text
//! click X Y    queue the group under (X, Y) and resolve it
//! hint         print a playable group, if any
//! show         print the current board
//! restart      start a new episode
//! quit         exit
//! ```
//!
//! Output (with `--json`) is one JSON object per line. Every message has a
//! `type` and a monotonically increasing `seq`:
//!
//! ```text
//! {"type":"click","seq":1,"x":0,"y":9,"outcome":"queued","batch":0,"size":3}
//! {"seq":2,"type":"tileRemoved","pos":{"x":0,"y":9}}
//! {"seq":3,"type":"scoreDelta","amount":3}
//! {"seq":4,"type":"tileMoved","from":{"x":0,"y":8},"to":{"x":0,"y":9},"color":2}
//! {"type":"observation","seq":5,"episode_id":0,...}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{BoardSnapshot, ClickOutcome, Group};
use crate::types::{BoardEvent, BoardPhase, ColorId, Pos, Tier};

// ============== Input Commands ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Click { x: usize, y: usize },
    Hint,
    Show,
    Restart,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command [{0}]")]
    Unknown(String),
    #[error("click needs two coordinates: click X Y")]
    MissingCoordinate,
    #[error("invalid coordinate [{0}]")]
    InvalidCoordinate(String),
    #[error("unexpected argument [{0}]")]
    TrailingArgument(String),
}

/// Parse one input line
///
/// Blank lines and lines starting with `#` yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    if head.starts_with('#') {
        return Ok(None);
    }

    let command = if head.eq_ignore_ascii_case("click") {
        let x = parse_coordinate(words.next())?;
        let y = parse_coordinate(words.next())?;
        Command::Click { x, y }
    } else if head.eq_ignore_ascii_case("hint") {
        Command::Hint
    } else if head.eq_ignore_ascii_case("show") {
        Command::Show
    } else if head.eq_ignore_ascii_case("restart") {
        Command::Restart
    } else if head.eq_ignore_ascii_case("quit") || head.eq_ignore_ascii_case("exit") {
        Command::Quit
    } else {
        return Err(CommandError::Unknown(head.to_string()));
    };

    if let Some(extra) = words.next() {
        return Err(CommandError::TrailingArgument(extra.to_string()));
    }
    Ok(Some(command))
}

fn parse_coordinate(word: Option<&str>) -> Result<usize, CommandError> {
    let word = word.ok_or(CommandError::MissingCoordinate)?;
    word.parse()
        .map_err(|_| CommandError::InvalidCoordinate(word.to_string()))
}

// ============== Output Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub x: usize,
    pub y: usize,
}

impl From<Pos> for CellPos {
    fn from(pos: Pos) -> Self {
        Self { x: pos.x, y: pos.y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TierLower {
    #[serde(rename = "base")]
    Base,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "large")]
    Large,
    #[serde(rename = "huge")]
    Huge,
}

impl From<Tier> for TierLower {
    fn from(value: Tier) -> Self {
        match value {
            Tier::Base => Self::Base,
            Tier::Medium => Self::Medium,
            Tier::Large => Self::Large,
            Tier::Huge => Self::Huge,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseLower {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "resolving")]
    Resolving,
}

impl From<BoardPhase> for PhaseLower {
    fn from(value: BoardPhase) -> Self {
        match value {
            BoardPhase::Idle => Self::Idle,
            BoardPhase::Resolving => Self::Resolving,
        }
    }
}

/// Board event payload, tagged by `type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventBody {
    ScoreDelta { amount: u32 },
    TileMoved { from: CellPos, to: CellPos, color: ColorId },
    TileSpawned { pos: CellPos, color: ColorId },
    TileRemoved { pos: CellPos },
    AppearanceChanged { pos: CellPos, tier: TierLower },
    TileRecolored { pos: CellPos, color: ColorId },
    Shuffled,
}

impl From<BoardEvent> for EventBody {
    fn from(event: BoardEvent) -> Self {
        match event {
            BoardEvent::ScoreDelta { amount } => Self::ScoreDelta { amount },
            BoardEvent::TileMoved { from, to, color } => Self::TileMoved {
                from: from.into(),
                to: to.into(),
                color,
            },
            BoardEvent::TileSpawned { pos, color } => Self::TileSpawned {
                pos: pos.into(),
                color,
            },
            BoardEvent::TileRemoved { pos } => Self::TileRemoved { pos: pos.into() },
            BoardEvent::AppearanceChanged { pos, tier } => Self::AppearanceChanged {
                pos: pos.into(),
                tier: tier.into(),
            },
            BoardEvent::TileRecolored { pos, color } => Self::TileRecolored {
                pos: pos.into(),
                color,
            },
            BoardEvent::Shuffled => Self::Shuffled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMessage {
    pub seq: u64,
    #[serde(flatten)]
    pub body: EventBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClickType {
    #[serde(rename = "click")]
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClickResult {
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "already_pending")]
    AlreadyPending,
    #[serde(rename = "too_small")]
    TooSmall,
    #[serde(rename = "queued")]
    Queued,
    #[serde(rename = "queue_full")]
    QueueFull,
}

/// Result of a `click` command, sent before the events it caused
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickMessage {
    #[serde(rename = "type")]
    pub msg_type: ClickType,
    pub seq: u64,
    pub x: usize,
    pub y: usize,
    pub outcome: ClickResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HintType {
    #[serde(rename = "hint")]
    Hint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintMessage {
    #[serde(rename = "type")]
    pub msg_type: HintType,
    pub seq: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorId>,
    /// Empty when the board has no playable group
    pub cells: Vec<CellPos>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub points: u32,
    #[serde(rename = "tiles_cleared")]
    pub tiles_cleared: u32,
    pub batches: u32,
    #[serde(rename = "best_batch")]
    pub best_batch: u32,
}

/// Full board state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    #[serde(rename = "episode_id")]
    pub episode_id: u32,
    pub seed: u64,
    pub phase: PhaseLower,
    #[serde(rename = "queued_batches")]
    pub queued_batches: usize,
    pub cols: usize,
    pub rows: usize,
    /// Rows top to bottom, `null` for empty cells
    pub cells: Vec<Vec<Option<ColorId>>>,
    pub tiers: Vec<Vec<Option<TierLower>>>,
    pub score: ScoreSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "out_of_bounds")]
    OutOfBounds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub code: ErrorCode,
    pub message: String,
}

// ============== Encoder ==============

/// Builds outgoing messages with a shared sequence counter
#[derive(Debug, Default)]
pub struct MessageEncoder {
    seq: u64,
}

impl MessageEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number of the last message built
    pub fn seq(&self) -> u64 {
        self.seq
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn event(&mut self, event: BoardEvent) -> EventMessage {
        EventMessage {
            seq: self.next_seq(),
            body: event.into(),
        }
    }

    pub fn click(&mut self, x: usize, y: usize, outcome: ClickOutcome) -> ClickMessage {
        let (result, batch, size) = match outcome {
            ClickOutcome::Empty => (ClickResult::Empty, None, None),
            ClickOutcome::AlreadyPending => (ClickResult::AlreadyPending, None, None),
            ClickOutcome::TooSmall => (ClickResult::TooSmall, None, None),
            ClickOutcome::QueueFull => (ClickResult::QueueFull, None, None),
            ClickOutcome::Queued { batch, size } => (ClickResult::Queued, Some(batch), Some(size)),
        };
        ClickMessage {
            msg_type: ClickType::Click,
            seq: self.next_seq(),
            x,
            y,
            outcome: result,
            batch,
            size,
        }
    }

    pub fn hint(&mut self, group: Option<&Group>) -> HintMessage {
        HintMessage {
            msg_type: HintType::Hint,
            seq: self.next_seq(),
            color: group.and_then(Group::color),
            cells: group
                .map(|g| g.cells().iter().map(|&p| p.into()).collect())
                .unwrap_or_default(),
        }
    }

    pub fn observation(&mut self, snapshot: &BoardSnapshot) -> ObservationMessage {
        let cols = snapshot.cols.max(1);
        ObservationMessage {
            msg_type: ObservationType::Observation,
            seq: self.next_seq(),
            episode_id: snapshot.episode_id,
            seed: snapshot.seed,
            phase: snapshot.phase.into(),
            queued_batches: snapshot.queued_batches,
            cols: snapshot.cols,
            rows: snapshot.rows,
            cells: snapshot.cells.chunks(cols).map(<[_]>::to_vec).collect(),
            tiers: snapshot
                .tiers
                .chunks(cols)
                .map(|row| row.iter().map(|t| t.map(TierLower::from)).collect())
                .collect(),
            score: ScoreSnapshot {
                points: snapshot.score.points,
                tiles_cleared: snapshot.score.tiles_cleared,
                batches: snapshot.score.batches,
                best_batch: snapshot.score.best_batch,
            },
        }
    }

    pub fn error(&mut self, code: ErrorCode, message: impl Into<String>) -> ErrorMessage {
        ErrorMessage {
            msg_type: ErrorType::Error,
            seq: self.next_seq(),
            code,
            message: message.into(),
        }
    }
}

/// Serialize one message as a JSON line (without the trailing newline)
pub fn to_line<T: Serialize>(msg: &T) -> serde_json::Result<String> {
    serde_json::to_string(msg)
}
