//! Terminal driver abstraction and crossterm implementation.
//!
//! The window engine only needs a narrow contract from the terminal:
//! * `Surface`: move-then-print, clear screen, flush.
//! * `Terminal`: size query, scoped full-screen/raw/hidden-cursor mode, one
//!   key read with a timeout, and a way to report resizes.
//!
//! `CrosstermBackend` is the real driver. `memory::MemoryTerminal` is a
//! headless driver with scripted input used by window and controller tests.

use anyhow::Result;
use core_events::{KeyEvent, ResizeFlag};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event as CEvent},
    execute, queue,
    style::Print,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode,
        enable_raw_mode,
    },
};
use std::io::{Stdout, Write, stdout};
use std::ops::{Deref, DerefMut};
use std::time::Duration;

mod keys;
pub mod memory;

pub use memory::MemoryTerminal;

/// Something windows can draw on.
pub trait Surface {
    /// Move to `(x, y)` and print `text`. Positions outside the addressable
    /// range (negative) are skipped.
    fn print_at(&mut self, x: i32, y: i32, text: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

pub trait Terminal: Surface {
    /// Current `(columns, rows)`.
    fn size(&self) -> Result<(u16, u16)>;
    /// Enter full-screen + raw + hidden-cursor mode. Idempotent.
    fn enter(&mut self) -> Result<()>;
    /// Restore the mode captured by `enter`. Idempotent.
    fn leave(&mut self) -> Result<()>;
    /// Wait at most `timeout` for one key press.
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>>;
    /// Signal `flag` whenever the driver observes a resize.
    fn subscribe_resize(&mut self, flag: ResizeFlag);
}

/// RAII guard ensuring terminal state restoration even if the caller
/// early-returns or panics. `release` restores explicitly and surfaces the
/// restore error; drop restores best-effort.
pub struct TerminalGuard<'a, T: Terminal + ?Sized> {
    backend: &'a mut T,
    active: bool,
}

impl<'a, T: Terminal + ?Sized> TerminalGuard<'a, T> {
    /// Enter and return a guard that will leave on drop.
    pub fn enter(backend: &'a mut T) -> Result<Self> {
        backend.enter()?;
        tracing::debug!(target: "terminal", "enter");
        Ok(Self {
            backend,
            active: true,
        })
    }

    pub fn release(mut self) -> Result<()> {
        self.active = false;
        tracing::debug!(target: "terminal", "leave");
        self.backend.leave()
    }
}

impl<T: Terminal + ?Sized> Deref for TerminalGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.backend
    }
}

impl<T: Terminal + ?Sized> DerefMut for TerminalGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.backend
    }
}

impl<T: Terminal + ?Sized> Drop for TerminalGuard<'_, T> {
    fn drop(&mut self) {
        if self.active {
            tracing::debug!(target: "terminal", "leave_on_drop");
            let _ = self.backend.leave();
        }
    }
}

fn to_cell(v: i32) -> Option<u16> {
    u16::try_from(v).ok()
}

pub struct CrosstermBackend {
    out: Stdout,
    entered: bool,
    resize: Option<ResizeFlag>,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self {
            out: stdout(),
            entered: false,
            resize: None,
        }
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(self.out, SetTitle(title))?;
        Ok(())
    }
}

impl Surface for CrosstermBackend {
    fn print_at(&mut self, x: i32, y: i32, text: &str) -> Result<()> {
        let (Some(x), Some(y)) = (to_cell(x), to_cell(y)) else {
            return Ok(());
        };
        queue!(self.out, MoveTo(x, y), Print(text))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::All))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

impl Terminal for CrosstermBackend {
    fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }

    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(self.out, EnterAlternateScreen, Hide)?;
            self.entered = true;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(self.out, LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
        }
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            CEvent::Key(key) => Ok(keys::map_key_event(&key)),
            CEvent::Resize(columns, rows) => {
                tracing::debug!(target: "terminal", columns, rows, "resize_observed");
                if let Some(flag) = &self.resize {
                    flag.signal();
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn subscribe_resize(&mut self, flag: ResizeFlag) {
        self.resize = Some(flag);
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}
