//! Tilepop runner (default binary).
//!
//! Reads commands from stdin, one per line, and drives a seeded board.
//! Plain mode prints the board as text; `--json` prints the protocol's
//! JSON lines instead. Logs go to stderr (`RUST_LOG=debug` for detail).

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;

use tilepop::core::{BoardConfig, BoardController, BoardError, BoardSnapshot, ClickOutcome, Palette};
use tilepop::protocol::{self, Command, ErrorCode, MessageEncoder};
use tilepop::types::{DEFAULT_COLS, DEFAULT_ROWS};

/// Tile-matching board driven by stdin commands.
#[derive(Debug, Parser)]
#[command(
    name = "tilepop",
    version,
    about = "Deterministic tile-matching board. Reads `click X Y`, `hint`, `show`, `restart` and `quit` from stdin."
)]
struct Args {
    /// Board height in cells.
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,

    /// Board width in cells.
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,

    /// Number of tile colours.
    #[arg(long, default_value_t = 5)]
    colors: usize,

    /// Seed for every random draw.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Leave deadlocked boards stuck instead of shuffling them.
    #[arg(long)]
    no_shuffle: bool,

    /// Maximum number of queued destruction batches.
    #[arg(long)]
    max_queue: Option<usize>,

    /// Emit JSON lines instead of text.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn board_config(&self) -> Result<BoardConfig> {
        let classic = Palette::classic();
        let palette = match classic.colors().get(..self.colors) {
            Some(defs) => Palette::new(defs.to_vec()),
            None => Palette::numbered(self.colors),
        }
        .context("invalid --colors")?;

        Ok(BoardConfig::new(self.cols, self.rows, palette)
            .with_seed(self.seed)
            .with_deadlock_shuffle(!self.no_shuffle)
            .with_max_pending_batches(self.max_queue))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let board = BoardController::new(args.board_config()?).context("failed to build board")?;
    log::info!(
        "board ready: {}x{}, {} colours, seed {}",
        args.cols,
        args.rows,
        args.colors,
        args.seed
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut runner = Runner {
        board,
        encoder: MessageEncoder::new(),
        json: args.json,
        out: stdout.lock(),
    };
    runner.run(stdin.lock())
}

struct Runner<W: Write> {
    board: BoardController,
    encoder: MessageEncoder,
    json: bool,
    out: W,
}

impl<W: Write> Runner<W> {
    fn run(&mut self, input: impl BufRead) -> Result<()> {
        if self.json {
            self.emit_events()?;
            self.show()?;
        } else {
            self.board.take_events();
            self.show()?;
        }

        for line in input.lines() {
            let line = line.context("failed to read stdin")?;
            let command = match protocol::parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    self.report_error(ErrorCode::InvalidCommand, &err.to_string())?;
                    continue;
                }
            };

            match command {
                Command::Click { x, y } => self.click(x, y)?,
                Command::Hint => self.hint()?,
                Command::Show => self.show()?,
                Command::Restart => {
                    self.board.restart();
                    if self.json {
                        self.emit_events()?;
                    } else {
                        self.board.take_events();
                    }
                    self.show()?;
                }
                Command::Quit => break,
            }
            self.out.flush()?;
        }
        Ok(())
    }

    fn click(&mut self, x: usize, y: usize) -> Result<()> {
        let outcome = match self.board.on_cell_clicked(x, y) {
            Ok(outcome) => outcome,
            Err(err @ BoardError::OutOfBounds { .. }) => {
                return self.report_error(ErrorCode::OutOfBounds, &err.to_string());
            }
            Err(err) => return Err(err.into()),
        };
        let reports = self.board.resolve();

        if self.json {
            let msg = self.encoder.click(x, y, outcome);
            writeln!(self.out, "{}", protocol::to_line(&msg)?)?;
            self.emit_events()?;
            return Ok(());
        }

        self.board.take_events();
        match outcome {
            ClickOutcome::Queued { size, .. } => {
                let points: u32 = reports.iter().map(|r| r.points).sum();
                writeln!(self.out, "cleared {} tiles (+{} points)", size, points)?;
                if reports.iter().any(|r| r.shuffle.is_some()) {
                    writeln!(self.out, "no moves left, board shuffled")?;
                }
                self.show()?;
            }
            ClickOutcome::Empty => writeln!(self.out, "({}, {}) is empty", x, y)?,
            ClickOutcome::AlreadyPending => writeln!(self.out, "({}, {}) is already clearing", x, y)?,
            ClickOutcome::TooSmall => writeln!(self.out, "({}, {}) has no matching neighbour", x, y)?,
            ClickOutcome::QueueFull => writeln!(self.out, "too many clears queued, try again")?,
        }
        Ok(())
    }

    fn hint(&mut self) -> Result<()> {
        let group = self.board.hint();
        if self.json {
            let msg = self.encoder.hint(group.as_ref());
            writeln!(self.out, "{}", protocol::to_line(&msg)?)?;
            return Ok(());
        }
        match group.and_then(|g| g.cells().first().copied()) {
            Some(pos) => writeln!(self.out, "try {} {}", pos.x, pos.y)?,
            None => writeln!(self.out, "no moves available")?,
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let snapshot = self.board.snapshot();
        if self.json {
            let msg = self.encoder.observation(&snapshot);
            writeln!(self.out, "{}", protocol::to_line(&msg)?)?;
        } else {
            write!(self.out, "{}", render_text(&snapshot))?;
        }
        Ok(())
    }

    fn emit_events(&mut self) -> Result<()> {
        for event in self.board.take_events() {
            let msg = self.encoder.event(event);
            writeln!(self.out, "{}", protocol::to_line(&msg)?)?;
        }
        Ok(())
    }

    fn report_error(&mut self, code: ErrorCode, message: &str) -> Result<()> {
        log::warn!("{}", message);
        if self.json {
            let msg = self.encoder.error(code, message);
            writeln!(self.out, "{}", protocol::to_line(&msg)?)?;
        } else {
            writeln!(self.out, "error: {}", message)?;
        }
        Ok(())
    }
}

/// Board as text: column header, one row per line, `.` for empty cells
fn render_text(snapshot: &BoardSnapshot) -> String {
    let mut out = String::new();
    out.push_str("   ");
    for x in 0..snapshot.cols {
        out.push(std::char::from_digit((x % 10) as u32, 10).unwrap_or('?'));
    }
    out.push('\n');
    for (y, row) in snapshot.rows_iter().enumerate() {
        out.push_str(&format!("{:>2} ", y));
        for cell in row {
            out.push(match cell {
                Some(c) => std::char::from_digit(u32::from(*c), 36).unwrap_or('#'),
                None => '.',
            });
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "score {} | episode {}\n",
        snapshot.score.points, snapshot.episode_id
    ));
    out
}
