//! Windows: bordered, titled boxes laid out by `core-layout`, plus the
//! scrollable text specialization.
//!
//! The set of window kinds is closed (`WindowKind`); shared behavior is the
//! `WindowBehavior` trait. Subtypes reach base behavior through the inherent
//! `Window` methods (`draw_chrome`, `handle_key`, `resize_to_terminal`) so an
//! override can chain to it explicitly.

mod chrome;
mod kind;
mod text;
mod window;

pub use kind::WindowKind;
pub use text::{SCROLL_STATUS, TextWindow};
pub use window::{ChildFactory, ControllerId, DEFAULT_STATUS, Window, WindowBuilder};

use anyhow::Result;
use core_events::KeyEvent;
use core_layout::Rect;
use core_terminal::Surface;

/// Capability interface shared by every window kind.
pub trait WindowBehavior {
    fn base(&self) -> &Window;
    fn base_mut(&mut self) -> &mut Window;

    /// Paint the window. Clears the redraw flag.
    fn draw(&mut self, surface: &mut dyn Surface) -> Result<()>;

    fn handle_input(&mut self, key: &KeyEvent);

    /// Recompute size-dependent state from the current terminal bounds.
    fn handle_resize(&mut self);

    /// Periodic hook, called once per loop tick while this window is on top.
    fn tick(&mut self) {}

    fn close(&mut self) {
        self.base_mut().close();
    }

    /// Bind to new terminal bounds and re-run the resize handler.
    fn attach(&mut self, term: Rect) {
        self.base_mut().set_term(term);
        self.handle_resize();
    }
}
