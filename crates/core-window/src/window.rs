use crate::chrome::{THUMB, VERTICAL, bottom_border, side_fill, thumb_row, top_border};
use crate::{WindowBehavior, WindowKind};
use anyhow::Result;
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_layout::{ConstrainedDimensions, Dim, Dimensions, OffsetDimensions, Rect, Region};
use core_terminal::Surface;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_STATUS: &str = "[Esc=Close]";

/// Builds the window pushed when a bound key is pressed.
pub type ChildFactory = Box<dyn FnMut() -> WindowKind>;

/// Identity of the controller that currently owns a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerId(u64);

impl ControllerId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Base window: frame, title, status bar and the modal child slot.
///
/// `position` is the declared geometry bound to the terminal bounds; the
/// content rectangle is always projected from it on demand.
pub struct Window {
    pub title: String,
    pub border: bool,
    pub status_bar: String,
    /// Scrollbar thumb placement in `[0, 1]`; `None` hides the scrollbar.
    pub scroll_pos: Option<f64>,
    pub child: Option<Box<WindowKind>>,
    pub position: ConstrainedDimensions,
    pub redraw: bool,
    closed: bool,
    owner: Option<ControllerId>,
    content: OffsetDimensions,
    term: Rect,
    bindings: Vec<(KeyCode, ChildFactory)>,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("title", &self.title)
            .field("border", &self.border)
            .field("status_bar", &self.status_bar)
            .field("scroll_pos", &self.scroll_pos)
            .field("closed", &self.closed)
            .field("has_child", &self.child.is_some())
            .field("owner", &self.owner)
            .field("position", &self.position)
            .field("redraw", &self.redraw)
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

impl Window {
    pub fn builder() -> WindowBuilder {
        WindowBuilder::default()
    }

    /// Bordered window of full terminal size with the given title.
    pub fn new(title: impl Into<String>, term: Rect) -> Self {
        Self::builder().title(title).build(term)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn close(&mut self) {
        if !self.closed {
            tracing::debug!(target: "window", title = self.title.as_str(), "close");
        }
        self.closed = true;
    }

    pub fn owner(&self) -> Option<ControllerId> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: Option<ControllerId>) {
        self.owner = owner;
    }

    /// Terminal bounds this window was last attached to.
    pub fn term(&self) -> Rect {
        self.term
    }

    /// Replace the terminal bounds without running any resize handler. Use
    /// `WindowBehavior::attach` to bind and resize in one step.
    pub fn set_term(&mut self, term: Rect) {
        self.term = term;
    }

    /// Offsets between the outer box and the content area.
    pub fn content_offsets(&self) -> Rect {
        self.content.offsets
    }

    /// Content area projected from the current position.
    pub fn content(&self) -> Region {
        self.content.project(&self.position)
    }

    /// Resolved outer box in whole cells.
    pub fn outer_rect(&self) -> Rect {
        self.position.resolve()
    }

    /// Content area in whole cells.
    pub fn content_rect(&self) -> Rect {
        let outer = self.outer_rect();
        self.content.project(&outer).to_rect().unwrap_or(outer)
    }

    /// Register a key that fills the child slot with `factory()`.
    pub fn bind_child<F>(&mut self, key: KeyCode, factory: F)
    where
        F: FnMut() -> WindowKind + 'static,
    {
        self.bindings.push((key, Box::new(factory)));
    }

    /// Base resize: bind the position's parent bounds to the terminal.
    pub fn resize_to_terminal(&mut self) {
        self.position.constraints = self.term;
        tracing::debug!(
            target: "window",
            title = self.title.as_str(),
            columns = self.term.width,
            rows = self.term.height,
            "resize"
        );
    }

    /// Base input: escape closes, bound keys spawn a child. Anything else is
    /// ignored.
    pub fn handle_key(&mut self, key: &KeyEvent) {
        if key.is_escape() {
            self.close();
            return;
        }
        if self.child.is_some() || key.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) {
            return;
        }
        if let Some((_, factory)) = self.bindings.iter_mut().find(|(k, _)| *k == key.code) {
            let child = factory();
            tracing::debug!(target: "window", title = self.title.as_str(), key = %key, "child_spawned");
            self.child = Some(Box::new(child));
        }
    }

    /// Base draw: frame with title, status and scrollbar. Unbordered windows
    /// only clear their redraw flag.
    pub fn draw_chrome(&mut self, surface: &mut dyn Surface) -> Result<()> {
        self.redraw = false;
        if !self.border {
            return Ok(());
        }
        let outer = self.outer_rect();
        let content = self.content_rect();
        let inner = usize::try_from(outer.width - 2).unwrap_or(0);
        let scrollable = self.scroll_pos.is_some();

        surface.print_at(outer.x, outer.y, &top_border(&self.title, inner, scrollable))?;
        surface.print_at(
            outer.x,
            outer.bottom() - 1,
            &bottom_border(&self.status_bar, inner, scrollable),
        )?;

        let thumb = thumb_row(self.scroll_pos, content.height);
        let fill = side_fill(inner);
        let mut right = [0u8; 4];
        for row in 0..content.height.max(0) {
            let edge = if thumb == Some(row) { THUMB } else { VERTICAL };
            surface.print_at(outer.x, content.y + row, &fill)?;
            surface.print_at(
                outer.right() - 1,
                content.y + row,
                edge.encode_utf8(&mut right),
            )?;
        }
        surface.flush()
    }
}

impl WindowBehavior for Window {
    fn base(&self) -> &Window {
        self
    }

    fn base_mut(&mut self) -> &mut Window {
        self
    }

    fn draw(&mut self, surface: &mut dyn Surface) -> Result<()> {
        self.draw_chrome(surface)
    }

    fn handle_input(&mut self, key: &KeyEvent) {
        self.handle_key(key);
    }

    fn handle_resize(&mut self) {
        self.resize_to_terminal();
    }
}

/// Declarative window construction.
#[derive(Debug, Clone)]
pub struct WindowBuilder {
    title: String,
    border: bool,
    status_bar: Option<String>,
    dims: Dimensions,
}

impl Default for WindowBuilder {
    fn default() -> Self {
        Self {
            title: String::new(),
            border: true,
            status_bar: None,
            dims: Dimensions::default(),
        }
    }
}

impl WindowBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Status text shown in the bottom border. Empty text falls back to the
    /// default close hint.
    pub fn status_bar(mut self, status: impl Into<String>) -> Self {
        self.status_bar = Some(status.into());
        self
    }

    pub fn x(mut self, x: impl Into<Dim>) -> Self {
        self.dims.x = Some(x.into());
        self
    }

    pub fn y(mut self, y: impl Into<Dim>) -> Self {
        self.dims.y = Some(y.into());
        self
    }

    pub fn width(mut self, width: impl Into<Dim>) -> Self {
        self.dims.width = Some(width.into());
        self
    }

    pub fn height(mut self, height: impl Into<Dim>) -> Self {
        self.dims.height = Some(height.into());
        self
    }

    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dims = dims;
        self
    }

    /// Build a window bound to `term`.
    pub fn build(self, term: Rect) -> Window {
        let status_bar = self
            .status_bar
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());
        let content = if self.border {
            OffsetDimensions::border()
        } else {
            OffsetDimensions::none()
        };
        let mut window = Window {
            title: self.title,
            border: self.border,
            status_bar,
            scroll_pos: None,
            child: None,
            position: ConstrainedDimensions::new(self.dims, term),
            redraw: true,
            closed: false,
            owner: None,
            content,
            term,
            bindings: Vec::new(),
        };
        window.attach(term);
        window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_terminal::MemoryTerminal;

    fn screen() -> Rect {
        Rect::screen(80, 24)
    }

    #[test]
    fn default_initialization() {
        let w = Window::builder().build(screen());
        assert_eq!(w.title, "");
        assert!(w.border);
        assert_eq!(w.status_bar, DEFAULT_STATUS);
        assert_eq!(w.scroll_pos, None);
        assert!(!w.is_closed());
        assert!(w.child.is_none());
        assert!(w.redraw);
        assert_eq!(w.owner(), None);
        assert_eq!(w.term(), screen());
    }

    #[test]
    fn custom_initialization() {
        let w = Window::builder()
            .title("Test Window")
            .width(80)
            .height(24)
            .border(false)
            .status_bar("Custom status")
            .x(10)
            .y(5)
            .build(screen());
        assert_eq!(w.title, "Test Window");
        assert!(!w.border);
        assert_eq!(w.status_bar, "Custom status");
        assert_eq!(w.outer_rect(), Rect::new(10, 5, 70, 19));
    }

    #[test]
    fn resize_rebinds_constraints() {
        let mut w = Window::builder().width(0.5).height(0.5).build(screen());
        assert_eq!(w.outer_rect().width, 40);
        w.attach(Rect::screen(120, 40));
        assert_eq!(w.position.constraints, Rect::new(0, 0, 120, 40));
        assert_eq!(w.outer_rect().width, 60);
        assert_eq!(w.outer_rect().height, 20);
    }

    #[test]
    fn set_term_alone_does_not_resize() {
        let mut w = Window::builder().build(screen());
        w.set_term(Rect::screen(100, 30));
        assert_eq!(w.position.constraints, screen());
        w.handle_resize();
        assert_eq!(w.position.constraints, Rect::screen(100, 30));
    }

    #[test]
    fn escape_closes_other_keys_do_not() {
        let mut w = Window::builder().build(screen());
        w.handle_input(&KeyEvent::plain(KeyCode::Enter));
        assert!(!w.is_closed());
        w.handle_input(&KeyEvent::plain(KeyCode::Esc));
        assert!(w.is_closed());
    }

    #[test]
    fn close_sets_flag() {
        let mut w = Window::builder().build(screen());
        WindowBehavior::close(&mut w);
        assert!(w.is_closed());
    }

    #[test]
    fn tick_is_a_noop() {
        let mut w = Window::builder().build(screen());
        w.redraw = false;
        w.tick();
        assert!(!w.redraw);
        assert!(!w.is_closed());
    }

    #[test]
    fn content_insets_when_bordered() {
        let w = Window::builder().width(50).height(20).build(screen());
        let outer = w.outer_rect();
        let content = w.content_rect();
        assert_eq!(content.x, outer.x + 1);
        assert_eq!(content.y, outer.y + 1);
        assert_eq!(content.width, outer.width - 2);
        assert_eq!(content.height, outer.height - 2);
        assert_eq!(w.content().to_rect(), Some(content));
    }

    #[test]
    fn content_matches_outer_without_border() {
        let w = Window::builder().width(50).height(20).border(false).build(screen());
        assert_eq!(w.content_rect(), w.outer_rect());
    }

    #[test]
    fn draw_without_border_only_clears_flag() {
        let mut term = MemoryTerminal::new(80, 24);
        let mut w = Window::builder().border(false).build(screen());
        w.draw(&mut term).unwrap();
        assert!(!w.redraw);
        assert_eq!(term.print_count(), 0);
    }

    #[test]
    fn draw_with_border_paints_frame() {
        let mut term = MemoryTerminal::new(80, 24);
        let mut w = Window::builder().title("Test").width(50).height(20).build(screen());
        let content_height = w.content_rect().height as usize;
        w.draw(&mut term).unwrap();
        assert!(!w.redraw);
        // top + bottom + two prints per side row
        assert_eq!(term.print_count(), 2 + 2 * content_height);

        let outer = w.outer_rect();
        let top = term.row(outer.y as usize);
        let top = &top[outer.x as usize..outer.right() as usize];
        assert!(top.starts_with('+') && top.ends_with('+'));
        assert!(top.contains(" Test "));
        let bottom = term.row((outer.bottom() - 1) as usize);
        assert!(bottom.contains(" [Esc=Close] +"));
        let side = term.row((outer.y + 1) as usize);
        assert_eq!(side.chars().nth(outer.x as usize), Some('|'));
        assert_eq!(side.chars().nth((outer.right() - 1) as usize), Some('|'));
    }

    #[test]
    fn scrollbar_thumb_and_corners() {
        let mut term = MemoryTerminal::new(80, 24);
        let mut w = Window::builder().width(20).height(12).x(0).y(0).build(screen());
        w.scroll_pos = Some(0.5);
        w.draw(&mut term).unwrap();
        // content height 10 -> thumb on row 5
        assert_eq!(term.row(0).chars().nth(19), Some('^'));
        assert_eq!(term.row(11).chars().nth(19), Some('v'));
        assert_eq!(term.row(1 + 5).chars().nth(19), Some('='));
        assert_eq!(term.row(1 + 4).chars().nth(19), Some('|'));
    }

    #[test]
    fn bound_key_spawns_single_child() {
        let mut w = Window::builder().build(screen());
        w.bind_child(KeyCode::Char('?'), || {
            WindowKind::from(Window::new("Help", Rect::screen(80, 24)))
        });
        w.handle_input(&KeyEvent::plain(KeyCode::Char('x')));
        assert!(w.child.is_none());
        w.handle_input(&KeyEvent::plain(KeyCode::Char('?')));
        assert_eq!(w.child.as_ref().map(|c| c.base().title.as_str()), Some("Help"));
        assert!(!w.is_closed());
    }

    #[test]
    fn controller_ids_are_unique() {
        assert_ne!(ControllerId::next(), ControllerId::next());
    }
}
