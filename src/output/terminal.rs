use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use std::io::{self, Write};
use tracing::warn;

pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))
}

/// Hides the cursor while alive and shows it again exactly once on drop
pub struct CursorGuard<'a, W: Write> {
    out: &'a mut W,
}

impl<'a, W: Write> CursorGuard<'a, W> {
    pub fn hide(out: &'a mut W) -> io::Result<Self> {
        execute!(out, Hide)?;
        Ok(Self { out })
    }
}

impl<W: Write> Drop for CursorGuard<'_, W> {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, Show) {
            warn!("Failed to restore cursor: {}", e);
        }
    }
}
