use core_layout::Rect;
use core_terminal::Surface;
use core_window::{ControllerId, WindowBehavior, WindowKind};
use tracing::debug;

/// Ordered windows, topmost last. Kept apart from the terminal so the loop
/// can borrow both at once.
#[derive(Debug)]
pub(crate) struct WindowStack {
    pub(crate) id: ControllerId,
    pub(crate) bounds: Rect,
    windows: Vec<WindowKind>,
}

impl WindowStack {
    pub(crate) fn new(id: ControllerId, bounds: Rect) -> Self {
        Self {
            id,
            bounds,
            windows: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.windows.len()
    }

    pub(crate) fn top(&self) -> Option<&WindowKind> {
        self.windows.last()
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut WindowKind> {
        self.windows.last_mut()
    }

    pub(crate) fn push(&mut self, mut window: WindowKind) {
        window.attach(self.bounds);
        let base = window.base_mut();
        base.redraw = true;
        base.set_owner(Some(self.id));
        debug!(
            target: "controller",
            title = base.title.as_str(),
            depth = self.windows.len() + 1,
            "push"
        );
        self.windows.push(window);
    }

    pub(crate) fn pop(&mut self) -> Option<WindowKind> {
        let mut window = self.windows.pop()?;
        window.base_mut().set_owner(None);
        if let Some(parent) = self.windows.last_mut() {
            let base = parent.base_mut();
            base.child = None;
            base.redraw = true;
        }
        debug!(
            target: "controller",
            title = window.base().title.as_str(),
            depth = self.windows.len(),
            "pop"
        );
        Some(window)
    }

    /// Pop everything, topmost first.
    pub(crate) fn clear(&mut self) -> usize {
        let mut popped = 0;
        while self.pop().is_some() {
            popped += 1;
        }
        popped
    }

    /// Clear the surface and draw every window, bottom first, so lower windows
    /// show around the ones stacked over them.
    pub(crate) fn repaint(&mut self, surface: &mut dyn Surface) -> anyhow::Result<()> {
        surface.clear()?;
        for window in &mut self.windows {
            window.draw(surface)?;
        }
        Ok(())
    }

    /// Rebind every window to `bounds` and re-run its resize handler.
    pub(crate) fn reattach(&mut self, bounds: Rect) {
        self.bounds = bounds;
        for window in &mut self.windows {
            window.attach(bounds);
        }
        debug!(
            target: "controller",
            columns = bounds.width,
            rows = bounds.height,
            windows = self.windows.len(),
            "resize_applied"
        );
    }
}
