use crate::{TextWindow, Window, WindowBehavior};
use anyhow::Result;
use core_events::KeyEvent;
use core_layout::Rect;
use core_terminal::Surface;

/// Every window kind the controller can host.
#[derive(Debug)]
pub enum WindowKind {
    Plain(Window),
    Text(TextWindow),
}

impl WindowKind {
    pub fn as_text(&self) -> Option<&TextWindow> {
        match self {
            Self::Text(t) => Some(t),
            Self::Plain(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextWindow> {
        match self {
            Self::Text(t) => Some(t),
            Self::Plain(_) => None,
        }
    }

    fn inner(&self) -> &dyn WindowBehavior {
        match self {
            Self::Plain(w) => w,
            Self::Text(t) => t,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn WindowBehavior {
        match self {
            Self::Plain(w) => w,
            Self::Text(t) => t,
        }
    }
}

impl From<Window> for WindowKind {
    fn from(w: Window) -> Self {
        Self::Plain(w)
    }
}

impl From<TextWindow> for WindowKind {
    fn from(t: TextWindow) -> Self {
        Self::Text(t)
    }
}

impl WindowBehavior for WindowKind {
    fn base(&self) -> &Window {
        self.inner().base()
    }

    fn base_mut(&mut self) -> &mut Window {
        self.inner_mut().base_mut()
    }

    fn draw(&mut self, surface: &mut dyn Surface) -> Result<()> {
        self.inner_mut().draw(surface)
    }

    fn handle_input(&mut self, key: &KeyEvent) {
        self.inner_mut().handle_input(key);
    }

    fn handle_resize(&mut self) {
        self.inner_mut().handle_resize();
    }

    fn tick(&mut self) {
        self.inner_mut().tick();
    }

    fn close(&mut self) {
        self.inner_mut().close();
    }

    fn attach(&mut self, term: Rect) {
        self.inner_mut().attach(term);
    }
}
