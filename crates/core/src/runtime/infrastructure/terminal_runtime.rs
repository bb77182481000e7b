use std::io::{self, Stdout};
use std::time::Instant;

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::cursor::{Hide, Show};
use ratatui::crossterm::event::{
    self, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use ratatui::Terminal;

use crate::runtime::domain::frame_clock::FrameClock;
use crate::runtime::domain::pixel_canvas::PixelCanvas;
use crate::runtime::domain::runtime::{FrameInput, Runtime, RuntimeError};

use super::canvas_widget::CanvasWidget;
use super::key_tracker::KeyTracker;

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Full-screen terminal host: alternate screen, raw mode and a fixed
/// frame clock. The terminal is restored on drop.
pub struct TerminalRuntime {
    terminal: Option<CrosstermTerminal>,
    tracker: KeyTracker,
    clock: FrameClock,
    enhanced_keys: bool,
}

impl TerminalRuntime {
    pub fn start(fps: u32) -> Result<Self, RuntimeError> {
        enable_raw_mode()?;
        undo_on_error(Self::enter(fps), || {
            let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
            let _ = disable_raw_mode();
        })
    }

    /// Everything after raw mode is on.
    fn enter(fps: u32) -> Result<Self, RuntimeError> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;

        let enhanced_keys = matches!(supports_keyboard_enhancement(), Ok(true));
        if enhanced_keys {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
        }
        log::info!(
            "Terminal runtime at {fps} fps, key releases {}",
            if enhanced_keys { "reported" } else { "not reported" }
        );

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal: Some(terminal),
            tracker: KeyTracker::new(enhanced_keys),
            clock: FrameClock::new(fps, Instant::now()),
            enhanced_keys,
        })
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.terminal.take().is_none() {
            return Ok(());
        }
        let mut stdout = io::stdout();
        if self.enhanced_keys {
            execute!(stdout, PopKeyboardEnhancementFlags)?;
        }
        disable_raw_mode()?;
        execute!(stdout, LeaveAlternateScreen, Show)
    }

    fn hang_up(&mut self, error: &io::Error) {
        log::warn!("Terminal input lost: {error}");
        self.tracker.hang_up();
    }
}

fn undo_on_error<T, E>(result: Result<T, E>, undo: impl FnOnce()) -> Result<T, E> {
    if result.is_err() {
        undo();
    }
    result
}

impl Runtime for TerminalRuntime {
    fn next_frame(&mut self) -> Result<FrameInput, RuntimeError> {
        loop {
            let remaining = self.clock.remaining(Instant::now());
            match event::poll(remaining) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    self.hang_up(&e);
                    break;
                }
            }
            match event::read() {
                Ok(event) => self.tracker.handle(&event),
                Err(e) => self.hang_up(&e),
            }
            if self.tracker.is_terminating() {
                break;
            }
        }
        if self.clock.advance(Instant::now()) {
            log::trace!("Frame overran its slot");
        }
        Ok(self.tracker.frame())
    }

    fn present(&mut self, canvas: &PixelCanvas) -> Result<(), RuntimeError> {
        if let Some(terminal) = self.terminal.as_mut() {
            terminal.draw(|frame| frame.render_widget(CanvasWidget::new(canvas), frame.size()))?;
        }
        Ok(())
    }
}

impl Drop for TerminalRuntime {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::error!("Failed to restore terminal: {e}");
        }
    }
}
