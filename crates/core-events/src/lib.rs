//! Core event types shared by the terminal driver, windows and the controller.
//!
//! Two concerns live here:
//! * The normalized key model (`KeyEvent` = `KeyCode` + `KeyModifiers`) that
//!   windows dispatch on. Terminal backends translate their native events into
//!   this shape so window code never sees backend types.
//! * `ResizeFlag`, the single piece of cross-context state in the system. It
//!   is set by whatever notices a terminal resize (backend event reader,
//!   signal handler, another thread) and drained exactly once per loop tick by
//!   the controller. Multiple resizes between drains coalesce into one.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Logical key identity. Extensible: unknown backend keys are dropped by the
/// translator rather than surfaced as a catch-all variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    F(u8),
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Unmodified key press.
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn is_escape(&self) -> bool {
        self.code == KeyCode::Esc
    }

    /// Ctrl-C. Raw mode disables the terminal's own interrupt handling, so the
    /// controller has to recognize it explicitly.
    pub fn is_interrupt(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
            && matches!(self.code, KeyCode::Char('c') | KeyCode::Char('C'))
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::plain(code)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

/// Coalescing "terminal was resized" notification.
///
/// Cloning shares the underlying flag. `signal` only performs an atomic store,
/// so it is safe to call from a signal handler or any thread; `take` is the
/// single drain point and clears the flag in the same atomic operation.
#[derive(Debug, Clone, Default)]
pub struct ResizeFlag {
    pending: Arc<AtomicBool>,
}

impl ResizeFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a resize as pending.
    pub fn signal(&self) {
        self.pending.store(true, Ordering::SeqCst);
    }

    /// Return whether a resize was pending and clear it.
    pub fn take(&self) -> bool {
        let was = self.pending.swap(false, Ordering::SeqCst);
        if was {
            tracing::trace!(target: "events.resize", "resize_drained");
        }
        was
    }

    /// Peek without clearing.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }
}
