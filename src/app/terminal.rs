use std::{
    io::{self, Stdout},
    sync::Once,
};

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};

static RESTORE_ON_PANIC: Once = Once::new();

/// Raw-mode alternate screen held for the lifetime of a form session.
/// Dropping it hands the terminal back in its original state.
pub(crate) struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err).context("failed to enter alternate screen");
        }
        let terminal =
            Terminal::new(CrosstermBackend::new(stdout)).context("failed to initialize terminal")?;
        RESTORE_ON_PANIC.call_once(|| {
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                restore();
                previous(info);
            }));
        });
        tracing::debug!("terminal switched to raw alternate screen");
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> Result<()> {
        self.terminal
            .draw(render)
            .map(|_| ())
            .context("failed to draw frame")
    }

    pub fn resize(&mut self, area: Rect) -> Result<()> {
        self.terminal
            .resize(area)
            .context("failed to resize terminal")
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        restore();
        tracing::debug!("terminal restored");
    }
}

fn restore() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}
