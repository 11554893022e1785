//! Terminal UI module using ratatui
//!
//! Every pipeline stage reports through the [`Ui`] trait:
//! - Current phase (Checking, Downloading, ..., Writing database)
//! - Progress (current/total with a label)
//! - Per-table row tallies
//! - Activity log (scrollable history)

mod components;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Duration;

use components::{LogPanel, ProgressPanel, StatusPanel, TallyPanel};

/// Application phases shown in the status panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Checking,
    Downloading,
    Extracting,
    LoadingNames,
    Walking,
    Resolving,
    Writing,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Checking => write!(f, "Checking for updates"),
            Phase::Downloading => write!(f, "Downloading SDE"),
            Phase::Extracting => write!(f, "Extracting files"),
            Phase::LoadingNames => write!(f, "Loading names"),
            Phase::Walking => write!(f, "Walking universe"),
            Phase::Resolving => write!(f, "Resolving links"),
            Phase::Writing => write!(f, "Writing database"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Progress information for the current operation
#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
    pub label: String,
}

impl Progress {
    pub fn new(current: u64, total: u64, label: impl Into<String>) -> Self {
        Self {
            current,
            total,
            label: label.into(),
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

/// Trait for UI implementations - allows the TUI, plain console output, and
/// silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_info(&mut self, info: impl Into<String>);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);
    /// Rows written for a table
    fn tally(&mut self, table: &str, rows: u64);
}

/// Main UI application state - full TUI implementation
pub struct UiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    status: StatusPanel,
    progress: ProgressPanel,
    tally: TallyPanel,
    log: LogPanel,
}

impl UiApp {
    /// Create a new UI application and enter the alternate screen
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            status: StatusPanel::new(),
            progress: ProgressPanel::new(),
            tally: TallyPanel::new(),
            log: LogPanel::new(),
        })
    }

    fn draw(&mut self) -> Result<()> {
        let status = &self.status;
        let progress = &self.progress;
        let tally = &self.tally;
        let log = &self.log;

        self.terminal.draw(|frame| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(5), // Status panel
                    Constraint::Length(3), // Progress bar
                    Constraint::Min(8),    // Tally + log
                ])
                .split(frame.area());

            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(34), Constraint::Min(20)])
                .split(rows[2]);

            status.render(frame, rows[0]);
            progress.render(frame, rows[1]);
            tally.render(frame, columns[0]);
            log.render(frame, columns[1]);
        })?;

        Ok(())
    }

    /// Finish the UI, wait for a key, and restore the terminal
    pub fn finish(mut self, summary: &str) -> Result<()> {
        self.set_phase(Phase::Complete);
        self.clear_progress();
        self.log(summary);
        self.log("Press q or Enter to exit...");
        self.draw()?;

        loop {
            if event::poll(Duration::from_millis(100))? {
                if let CrosstermEvent::Key(KeyEvent { code, .. }) = event::read()? {
                    if matches!(code, KeyCode::Char('q') | KeyCode::Enter | KeyCode::Esc) {
                        break;
                    }
                }
            }
        }

        self.restore()
    }

    /// Restore terminal without waiting
    pub fn restore(mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Ui for UiApp {
    fn set_phase(&mut self, phase: Phase) {
        self.status.set_phase(phase);
        self.draw().ok();
    }

    fn set_info(&mut self, info: impl Into<String>) {
        self.status.set_info(info);
        self.draw().ok();
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        self.progress
            .set_progress(Progress::new(current, total, label));
        self.draw().ok();
    }

    fn clear_progress(&mut self) {
        self.progress.clear();
        self.draw().ok();
    }

    fn log(&mut self, message: impl Into<String>) {
        self.log.add(message);
        self.draw().ok();
    }

    fn tally(&mut self, table: &str, rows: u64) {
        self.tally.set(table, rows);
        self.draw().ok();
    }
}

impl Drop for UiApp {
    fn drop(&mut self) {
        // Best effort cleanup
        terminal::disable_raw_mode().ok();
        self.terminal
            .backend_mut()
            .execute(LeaveAlternateScreen)
            .ok();
        self.terminal.show_cursor().ok();
    }
}

/// Line-oriented output for pipes, CI logs and `--plain`
#[derive(Default)]
pub struct ConsoleUi {
    last_percent: Option<u64>,
}

impl ConsoleUi {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        self.last_percent = None;
        println!("==> {}", phase);
    }

    fn set_info(&mut self, info: impl Into<String>) {
        println!("    {}", info.into());
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        // Only print on every tenth percent to keep logs readable
        let percent = Progress::new(current, total, "").ratio() * 100.0;
        let step = (percent as u64) / 10 * 10;
        if self.last_percent != Some(step) {
            self.last_percent = Some(step);
            println!("    {:>3}% {}", step, label.into());
        }
    }

    fn clear_progress(&mut self) {
        self.last_percent = None;
    }

    fn log(&mut self, message: impl Into<String>) {
        println!("    {}", message.into());
    }

    fn tally(&mut self, table: &str, rows: u64) {
        println!("    {:<16} {:>8} rows", table, rows);
    }
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_info(&mut self, _info: impl Into<String>) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
    fn tally(&mut self, _table: &str, _rows: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_ratio() {
        assert_eq!(Progress::new(5, 0, "x").ratio(), 0.0);
        assert_eq!(Progress::new(1, 4, "x").ratio(), 0.25);
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(Phase::Walking.to_string(), "Walking universe");
        assert_eq!(Phase::Writing.to_string(), "Writing database");
    }
}
