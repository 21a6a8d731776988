//! Live status view: one folder header per working directory, one line per task

use crate::error::OutputError;
use crate::runner::{lock, RunEvent, RunObserver, RunSnapshot, RunStatus};
use crossterm::style::Stylize;
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::warn;

use super::terminal::clear_screen;

pub fn icon(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Succeeded => "✅",
        RunStatus::Failed => "❌",
        RunStatus::Pending => "⏳",
        RunStatus::Running => "🔄",
        RunStatus::Skipped => "⏩",
    }
}

/// Highlight `text` with the background color of `status`
pub fn paint(status: RunStatus, text: &str) -> String {
    match status {
        RunStatus::Succeeded => text.black().on_dark_green().to_string(),
        RunStatus::Failed => text.on_dark_red().to_string(),
        RunStatus::Pending => text.on_blue().to_string(),
        RunStatus::Running => text.black().on_yellow().to_string(),
        RunStatus::Skipped => text.black().on_grey().to_string(),
    }
}

pub fn format_status(snapshot: &RunSnapshot) -> String {
    snapshot
        .groups()
        .into_iter()
        .map(|(cwd, entries)| {
            let mut lines = vec![format!("📂 {}", cwd)];
            lines.extend(entries.iter().map(|entry| {
                format!("  {} {}", icon(entry.status), paint(entry.status, &entry.command))
            }));
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub trait Renderer: Send + Sync {
    fn render(&self, snapshot: &RunSnapshot) -> Result<(), OutputError>;
}

/// Clears the terminal and redraws the whole status view on stdout
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&self, snapshot: &RunSnapshot) -> Result<(), OutputError> {
        let text = format_status(snapshot);
        let mut out = io::stdout().lock();
        clear_screen(&mut out)
            .and_then(|_| writeln!(out, "{}", text))
            .and_then(|_| out.flush())
            .map_err(OutputError::Terminal)
    }
}

/// Keeps every rendered snapshot
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    snapshots: Mutex<Vec<RunSnapshot>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<RunSnapshot> {
        lock(&self.snapshots).clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, snapshot: &RunSnapshot) -> Result<(), OutputError> {
        lock(&self.snapshots).push(snapshot.clone());
        Ok(())
    }
}

/// Observer that redraws through a renderer on every lifecycle event
pub struct StatusReporter<R> {
    renderer: R,
}

impl<R: Renderer> StatusReporter<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }
}

impl<R: Renderer> RunObserver for StatusReporter<R> {
    fn on_event(&self, _event: &RunEvent, snapshot: &RunSnapshot) {
        if let Err(e) = self.renderer.render(snapshot) {
            warn!("Failed to render status: {}", e);
        }
    }
}

impl<R: Renderer + ?Sized> Renderer for std::sync::Arc<R> {
    fn render(&self, snapshot: &RunSnapshot) -> Result<(), OutputError> {
        (**self).render(snapshot)
    }
}
