//! UI Components for the terminal interface

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Row, Table};
use ratatui::Frame;

use super::{Phase, Progress};

const MAX_LOG_ENTRIES: usize = 200;

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Blue))
}

/// Status panel showing current phase and info
pub struct StatusPanel {
    phase: Phase,
    info: String,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self {
            phase: Phase::Checking,
            info: String::new(),
        }
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn set_info(&mut self, info: impl Into<String>) {
        self.info = info.into();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let color = match self.phase {
            Phase::Complete => Color::Green,
            _ => Color::Cyan,
        };
        let phase_style = Style::default().fg(color).add_modifier(Modifier::BOLD);

        let indicator = match self.phase {
            Phase::Checking => "◐",
            Phase::Downloading => "↓",
            Phase::Extracting => "⤷",
            Phase::LoadingNames => "≡",
            Phase::Walking => "⌂",
            Phase::Resolving => "⇄",
            Phase::Writing => "⚙",
            Phase::Complete => "✓",
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(format!(" {} ", indicator), phase_style),
                Span::styled(self.phase.to_string(), phase_style),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::raw("   "),
                Span::styled(self.info.as_str(), Style::default().fg(Color::Gray)),
            ]),
        ];

        frame.render_widget(
            Paragraph::new(lines).block(panel(" EVE Universe to SQLite ")),
            area,
        );
    }
}

/// Progress panel showing a progress bar
pub struct ProgressPanel {
    progress: Option<Progress>,
}

impl ProgressPanel {
    pub fn new() -> Self {
        Self { progress: None }
    }

    pub fn set_progress(&mut self, progress: Progress) {
        self.progress = Some(progress);
    }

    pub fn clear(&mut self) {
        self.progress = None;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::Blue));

        let Some(progress) = &self.progress else {
            frame.render_widget(Paragraph::new("").block(block), area);
            return;
        };

        let label = if progress.total > 0 {
            format!(
                "{}: {}/{} ({:.0}%)",
                progress.label,
                progress.current,
                progress.total,
                progress.ratio() * 100.0
            )
        } else {
            progress.label.clone()
        };

        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
            .ratio(progress.ratio().min(1.0))
            .label(label);

        frame.render_widget(gauge, area);
    }
}

/// Rows written per table, in the order tables were first reported
pub struct TallyPanel {
    counts: Vec<(String, u64)>,
}

impl TallyPanel {
    pub fn new() -> Self {
        Self { counts: Vec::new() }
    }

    pub fn set(&mut self, table: &str, rows: u64) {
        match self.counts.iter_mut().find(|(name, _)| name == table) {
            Some(entry) => entry.1 = rows,
            None => self.counts.push((table.to_string(), rows)),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .counts
            .iter()
            .map(|(name, count)| Row::new(vec![name.clone(), count.to_string()]))
            .collect();

        let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(8)])
            .header(
                Row::new(vec!["table", "rows"])
                    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
            )
            .block(panel(" Tables "));

        frame.render_widget(table, area);
    }
}

/// Log panel showing scrollable history
pub struct LogPanel {
    entries: Vec<String>,
}

impl LogPanel {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.entries.push(message.into());
        if self.entries.len() > MAX_LOG_ENTRIES {
            self.entries.remove(0);
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let visible_height = area.height.saturating_sub(2) as usize; // -2 for borders
        let start = self.entries.len().saturating_sub(visible_height);
        let newest = self.entries.len().saturating_sub(1);

        let items: Vec<ListItem> = self.entries[start..]
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let color = if start + i == newest {
                    Color::White
                } else {
                    Color::DarkGray
                };
                ListItem::new(Span::styled(format!(" {}", entry), Style::default().fg(color)))
            })
            .collect();

        frame.render_widget(List::new(items).block(panel(" Activity ")), area);
    }
}
